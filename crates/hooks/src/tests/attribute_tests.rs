use super::*;

use document::NodeSpec;

fn element_with(attrs: &[(&str, &str)]) -> (Document, NodeId) {
    let spec = attrs
        .iter()
        .fold(NodeSpec::element("template").attr("id", "modal"), |spec, (k, v)| {
            spec.attr(*k, *v)
        });
    let document = Document::new();
    let element = document.build(&spec).expect("build");
    (document, element)
}

#[test]
fn required_attribute_returns_the_value() {
    let (document, element) = element_with(&[("data-target", "#tray")]);

    assert_eq!(
        required_attribute(&document, element, "data-target"),
        Ok("#tray".to_string())
    );
}

#[test]
fn missing_required_attribute_names_attribute_and_element() {
    let (document, element) = element_with(&[]);

    assert_eq!(
        required_attribute(&document, element, "data-target"),
        Err(ConfigurationError::MissingAttribute {
            attribute: "data-target".into(),
            element: "template#modal".into(),
        })
    );
}

#[test]
fn optional_attribute_is_none_when_absent() {
    let (document, element) = element_with(&[("data-update", "append")]);

    assert_eq!(
        optional_attribute(&document, element, "data-update").as_deref(),
        Some("append")
    );
    assert_eq!(optional_attribute(&document, element, "data-other"), None);
}

#[test]
fn parse_integer_reads_the_leading_digits() {
    for (raw, expected) in [
        ("0", 0),
        (" 1500 ", 1500),
        ("300ms", 300),
        ("1.5", 1),
        ("+42", 42),
        ("\t250 px", 250),
        ("-0", 0),
    ] {
        assert_eq!(parse_integer("data-close-delay", raw), Ok(expected), "{raw:?}");
    }
}

#[test]
fn parse_integer_rejects_values_without_leading_digits_or_negative_values() {
    for raw in ["", "   ", "soon", "ms", "-5", "-", "+", ".5", "px10"] {
        assert_eq!(
            parse_integer("data-close-delay", raw),
            Err(ConfigurationError::InvalidInteger {
                attribute: "data-close-delay".into(),
                value: raw.into(),
            }),
            "{raw:?}"
        );
    }
}

#[test]
fn required_integer_reports_missing_before_parsing() {
    let (document, element) = element_with(&[]);

    assert!(matches!(
        required_integer(&document, element, "data-close-delay"),
        Err(ConfigurationError::MissingAttribute { .. })
    ));

    let (document, element) = element_with(&[("data-close-delay", "250")]);
    assert_eq!(required_integer(&document, element, "data-close-delay"), Ok(250));
}
