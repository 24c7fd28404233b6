use super::*;

use std::{cell::RefCell, rc::Rc};

use document::{Event, NodeSpec};
use serde_json::json;

#[test]
fn forwarded_kinds_come_from_handler_slots_only() {
    let events = forwarded_events();

    assert!(events.contains(&"click"));
    assert!(events.contains(&"input"));
    assert!(events.contains(&"focus"));
    assert!(!events.contains(&"location"));
    assert!(!events.contains(&"ation"));
    assert!(events.iter().all(|kind| !kind.starts_with("on")));
    assert_eq!(
        events.len(),
        document::global_properties()
            .iter()
            .filter(|name| name.starts_with("on"))
            .count()
    );
}

#[test]
fn forwarded_kinds_are_computed_once() {
    assert!(std::ptr::eq(forwarded_events(), forwarded_events()));
}

#[test]
fn forwarding_re_dispatches_on_origin_and_stops_at_clone() {
    let document = Document::from_spec(
        &NodeSpec::element("body")
            .child(NodeSpec::element("template").attr("id", "origin"))
            .child(NodeSpec::element("aside").attr("id", "tray")),
    )
    .expect("document");
    let find = |selector: &str| {
        document
            .query_selector(selector)
            .expect("selector")
            .expect("node")
    };
    let origin = find("#origin");
    let tray = find("#tray");
    let clone = document.create_element("button");
    document.append_child(tray, clone).expect("attach");

    let origin_events = Rc::new(RefCell::new(Vec::new()));
    let tray_hits = Rc::new(RefCell::new(0));

    let seen = Rc::clone(&origin_events);
    document
        .add_event_listener(
            origin,
            "click",
            listener(move |_, event| {
                seen.borrow_mut()
                    .push((event.target(), event.detail().clone()))
            }),
        )
        .expect("origin listener");
    let hits = Rc::clone(&tray_hits);
    document
        .add_event_listener(tray, "click", listener(move |_, _| *hits.borrow_mut() += 1))
        .expect("tray listener");

    let ids = forward_events(&document, origin, clone).expect("forward");
    assert_eq!(ids.len(), forwarded_events().len());

    let event = document
        .dispatch_event(clone, Event::new("click").with_detail(json!({ "button": 0 })))
        .expect("dispatch");

    assert!(event.is_propagation_stopped());
    assert_eq!(*tray_hits.borrow(), 0);
    assert_eq!(
        *origin_events.borrow(),
        vec![(Some(origin), json!({ "button": 0 }))]
    );
}

#[test]
fn listen_all_registers_every_kind() {
    let document = Document::from_spec(&NodeSpec::element("body").child(NodeSpec::element("aside")))
        .expect("document");
    let aside = document.query_selector("aside").expect("selector").expect("aside");

    let ids = listen_all(
        &document,
        aside,
        [
            ("mouseenter", listener(|_, _| {})),
            ("mouseleave", listener(|_, _| {})),
        ],
    )
    .expect("listen");

    assert_eq!(ids.len(), 2);
    assert_eq!(document.listener_count(aside), 2);
}

#[test]
fn listen_all_on_a_discarded_element_is_a_configuration_error() {
    let document = Document::new();
    let aside = document.create_element("aside");
    assert!(document.discard(aside));

    let err = listen_all(
        &document,
        aside,
        [
            ("mouseenter", listener(|_, _| {})),
            ("mouseleave", listener(|_, _| {})),
        ],
    )
    .expect_err("listening should fail");

    assert!(matches!(err, ConfigurationError::ListenerRejected { .. }));
    assert!(err.to_string().starts_with("cannot listen for events on <"));
    assert_eq!(document.listener_count(aside), 0);
}
