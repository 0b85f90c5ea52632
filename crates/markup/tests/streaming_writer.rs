use markup::{MarkupConfig, MarkupError, MarkupTree, ModelKind};
use markup_test_support::{
    EventLog, ListenerEvent, RecordingListener, assert_lines_eq, markup_lines,
};

fn started(name: &str, attributes: &[(&str, &str)]) -> ListenerEvent {
    ListenerEvent::Started {
        name: name.to_string(),
        attributes: attributes
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

fn ended(name: &str) -> ListenerEvent {
    ListenerEvent::Ended {
        name: name.to_string(),
    }
}

#[test]
fn listeners_see_initial_attributes_in_registration_order() {
    let mut tree = MarkupTree::new(MarkupConfig::default());
    let log: EventLog = Default::default();
    tree.add_listener(Box::new(RecordingListener::with_log(&log)));
    tree.add_listener(Box::new(RecordingListener::with_log(&log)));

    tree.open_element("form", &[("method", Some("post")), ("action", None)]);
    tree.set_attributes(&[("id", Some("login"))]).unwrap();
    tree.close_element().unwrap();

    let events = log.borrow();
    assert_eq!(
        *events,
        vec![
            started("form", &[("method", "post")]),
            started("form", &[("method", "post")]),
            ended("form"),
            ended("form"),
        ]
    );
}

#[test]
fn removed_listener_stops_receiving_events() {
    let mut tree = MarkupTree::new(MarkupConfig::default());
    let (listener, log) = RecordingListener::new();
    let id = tree.add_listener(Box::new(listener));

    tree.open_element("p", &[]);
    assert!(tree.remove_listener(id).is_some());
    assert!(tree.remove_listener(id).is_none());
    tree.close_element().unwrap();

    assert_eq!(*log.borrow(), vec![started("p", &[])]);
}

#[test]
fn retroactive_children_do_not_notify_listeners() {
    let mut tree = MarkupTree::new(MarkupConfig::default());
    let (listener, log) = RecordingListener::new();
    tree.add_listener(Box::new(listener));

    let head = tree.open_element("head", &[]);
    tree.close_element().unwrap();
    tree.element_mut(head)
        .unwrap()
        .append_element("link", &[("rel", Some("stylesheet"))]);

    assert_eq!(log.borrow().len(), 2);
    assert_eq!(tree.serialize(), "<head><link rel=\"stylesheet\"></head>");
}

#[test]
fn balanced_sequences_serialize_and_one_extra_close_fails() {
    for depth in [1usize, 2, 7, 64] {
        let mut tree = MarkupTree::new(MarkupConfig::default());
        for level in 0..depth {
            tree.open_element("section", &[("data-level", Some(&level.to_string()))]);
        }
        for _ in 0..depth {
            tree.close_element().unwrap();
        }
        let out = tree.serialize();
        assert_eq!(out.matches("<section").count(), depth);
        assert_eq!(out.matches("</section>").count(), depth);
        assert_eq!(tree.close_element(), Err(MarkupError::UnbalancedClose));
    }
}

#[test]
fn unclosed_elements_still_serialize_with_end_tags() {
    let mut tree = MarkupTree::new(MarkupConfig {
        model: ModelKind::Xml,
        ..MarkupConfig::default()
    });
    tree.open_element("a", &[]);
    tree.open_element("b", &[]);
    tree.write_text("x");
    assert_lines_eq(
        &["<a>", "<b>", "x", "</b>", "</a>"],
        &markup_lines(&tree.serialize()),
    );
}

#[test]
fn first_write_wins_across_streaming_and_element_handles() {
    let mut tree = MarkupTree::new(MarkupConfig::default());
    let input = tree.open_element("input", &[("type", Some("text"))]);
    tree.set_attributes(&[("type", Some("password"))]).unwrap();
    tree.element_mut(input)
        .unwrap()
        .attribute("type", Some("email"))
        .force_attribute("value", Some("x"))
        .force_attribute("value", None);
    tree.close_element().unwrap();
    assert_eq!(tree.serialize(), "<input type=\"text\">");
}
