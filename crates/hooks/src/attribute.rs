use document::{Document, NodeId};
use shared::error::ConfigurationError;

pub fn required_attribute(
    document: &Document,
    element: NodeId,
    attribute: &str,
) -> Result<String, ConfigurationError> {
    document
        .attribute(element, attribute)
        .ok_or_else(|| ConfigurationError::MissingAttribute {
            attribute: attribute.to_string(),
            element: document.describe(element),
        })
}

pub fn optional_attribute(document: &Document, element: NodeId, attribute: &str) -> Option<String> {
    document.attribute(element, attribute)
}

/// Reads the leading base-10 integer of `value`, the way `parseInt` does:
/// leading whitespace and an optional sign are skipped and parsing stops at the
/// first non-digit, so `"300ms"` is 300 and `"1.5"` is 1. Fails when no digit
/// leads the value or the number is negative.
pub fn parse_integer(attribute: &str, value: &str) -> Result<u64, ConfigurationError> {
    let invalid = || ConfigurationError::InvalidInteger {
        attribute: attribute.to_string(),
        value: value.to_string(),
    };

    let trimmed = value.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits = unsigned
        .find(|ch: char| !ch.is_ascii_digit())
        .map_or(unsigned, |end| &unsigned[..end]);

    let number = digits.parse::<u64>().map_err(|_| invalid())?;
    if negative && number != 0 {
        return Err(invalid());
    }
    Ok(number)
}

pub fn required_integer(
    document: &Document,
    element: NodeId,
    attribute: &str,
) -> Result<u64, ConfigurationError> {
    let raw = required_attribute(document, element, attribute)?;
    parse_integer(attribute, &raw)
}

#[cfg(test)]
#[path = "tests/attribute_tests.rs"]
mod tests;
