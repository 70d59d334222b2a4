mod common;

use common::{Direction, MockModule, Recorder};
use portmount_core::{
    reconcile, InstanceRegistry, Listener, ModuleDescriptor, MountTarget, NodeRef, PortError,
    PortOperation, PropertySet,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

fn mounted(ports: &[(&str, Direction)]) -> (InstanceRegistry, Uuid, Arc<Recorder>) {
    let module = MockModule::new(ports);
    let recorder = module.recorder();
    let mut registry = InstanceRegistry::new();
    let id = Uuid::new_v4();
    let instance = module.initialize(MountTarget::fresh(NodeRef::fresh()));
    registry.create(id, instance).unwrap();
    (registry, id, recorder)
}

#[test]
fn same_listener_twice_subscribes_once() {
    let (mut registry, id, recorder) = mounted(&[("onChange", Direction::Out)]);
    let props = PropertySet::new().with_listener("onChange", Listener::new(|_| {}));

    reconcile(registry.get_mut(id).unwrap(), &props);
    let second = reconcile(registry.get_mut(id).unwrap(), &props);

    assert!(second.is_noop());
    assert_eq!(recorder.subscribes("onChange").len(), 1);
    assert!(recorder.unsubscribes("onChange").is_empty());
}

#[test]
fn removed_listener_is_unsubscribed_once_per_distinct_callback() {
    let (mut registry, id, recorder) = mounted(&[("onChange", Direction::Out)]);
    let callbacks: Vec<Listener> = (0..4).map(|_| Listener::new(|_| {})).collect();

    for listener in &callbacks {
        let props = PropertySet::new().with_listener("onChange", listener.clone());
        // Repeat each one to make sure unchanged passes add nothing.
        reconcile(registry.get_mut(id).unwrap(), &props);
        reconcile(registry.get_mut(id).unwrap(), &props);
    }
    reconcile(registry.get_mut(id).unwrap(), &PropertySet::new());

    let subscribed = recorder.subscribes("onChange");
    let unsubscribed = recorder.unsubscribes("onChange");
    assert_eq!(subscribed.len(), callbacks.len());
    assert_eq!(unsubscribed.len(), callbacks.len());
    for (listener, released) in callbacks.iter().zip(&unsubscribed) {
        assert!(listener.same(released));
    }
    assert_eq!(recorder.subscriber_count("onChange"), 0);
}

#[test]
fn data_is_resent_on_every_pass() {
    let (mut registry, id, recorder) = mounted(&[("label", Direction::In)]);
    let props = PropertySet::new().with_data("label", "x");

    reconcile(registry.get_mut(id).unwrap(), &props);
    reconcile(registry.get_mut(id).unwrap(), &props);

    assert_eq!(recorder.sends("label"), vec![json!("x"), json!("x")]);
}

#[test]
fn removing_data_triggers_no_calls() {
    let (mut registry, id, recorder) = mounted(&[("label", Direction::Both)]);
    reconcile(
        registry.get_mut(id).unwrap(),
        &PropertySet::new().with_data("label", "x"),
    );
    recorder.clear();

    let report = reconcile(registry.get_mut(id).unwrap(), &PropertySet::new());

    assert!(report.is_noop());
    assert!(recorder.calls().is_empty());
}

#[test]
fn null_payloads_are_sent_like_any_other_value() {
    let (mut registry, id, recorder) = mounted(&[("className", Direction::In)]);
    let props = PropertySet::from_json(json!({ "className": null })).unwrap();

    reconcile(registry.get_mut(id).unwrap(), &props);

    assert_eq!(recorder.sends("className"), vec![json!(null)]);
}

#[test]
fn one_missing_port_does_not_block_the_rest() {
    let (mut registry, id, recorder) =
        mounted(&[("label", Direction::In), ("onChange", Direction::Out)]);
    let props = PropertySet::new()
        .with_data("count", 1)
        .with_data("label", "x")
        .with_listener("onChange", Listener::new(|_| {}))
        .with_listener("onMissing", Listener::new(|_| {}));

    let report = reconcile(registry.get_mut(id).unwrap(), &props);

    assert_eq!(
        report.errors(),
        vec![
            PortError::MissingPort("count".to_string()),
            PortError::MissingPort("onMissing".to_string()),
        ]
    );
    assert_eq!(
        report.operations(),
        &[
            PortOperation::Send {
                port: "label".to_string()
            },
            PortOperation::Subscribe {
                port: "onChange".to_string()
            },
        ]
    );
    assert_eq!(recorder.calls().len(), 2);
}

#[test]
fn wrong_direction_counts_as_missing() {
    let (mut registry, id, recorder) =
        mounted(&[("label", Direction::Out), ("onChange", Direction::In)]);
    let props = PropertySet::new()
        .with_data("label", "x")
        .with_listener("onChange", Listener::new(|_| {}));

    let report = reconcile(registry.get_mut(id).unwrap(), &props);

    assert_eq!(
        report.missing_ports(),
        &["label".to_string(), "onChange".to_string()]
    );
    assert!(recorder.calls().is_empty());
    assert_eq!(registry.get(id).unwrap().listener_count(), 0);
}

#[test]
fn listener_to_data_switch_releases_subscription_first() {
    let (mut registry, id, recorder) = mounted(&[("value", Direction::Both)]);
    let listener = Listener::new(|_| {});
    reconcile(
        registry.get_mut(id).unwrap(),
        &PropertySet::new().with_listener("value", listener.clone()),
    );
    recorder.clear();

    let report = reconcile(
        registry.get_mut(id).unwrap(),
        &PropertySet::new().with_data("value", 5),
    );

    assert_eq!(
        report.operations(),
        &[
            PortOperation::Unsubscribe {
                port: "value".to_string()
            },
            PortOperation::Send {
                port: "value".to_string()
            },
        ]
    );
    assert!(recorder.unsubscribes("value")[0].same(&listener));
    assert_eq!(registry.get(id).unwrap().listener_count(), 0);
}

#[test]
fn data_to_listener_switch_subscribes_without_releasing_anything() {
    let (mut registry, id, recorder) = mounted(&[("value", Direction::Both)]);
    reconcile(
        registry.get_mut(id).unwrap(),
        &PropertySet::new().with_data("value", 5),
    );
    recorder.clear();

    let listener = Listener::new(|_| {});
    let report = reconcile(
        registry.get_mut(id).unwrap(),
        &PropertySet::new().with_listener("value", listener.clone()),
    );

    assert_eq!(
        report.operations(),
        &[PortOperation::Subscribe {
            port: "value".to_string()
        }]
    );
    let subscribed = recorder.subscribes("value");
    assert_eq!(subscribed.len(), 1);
    assert!(subscribed[0].same(&listener));
    assert!(recorder.unsubscribes("value").is_empty());
    assert!(recorder.sends("value").is_empty());
    assert!(registry
        .get(id)
        .unwrap()
        .active_listener("value")
        .is_some_and(|active| active.same(&listener)));
}

#[test]
fn non_object_props_are_rejected() {
    for value in [json!(1), json!("x"), json!([1]), json!(null)] {
        let err = PropertySet::from_json(value).unwrap_err();
        assert_eq!(err.code(), "invalid_props");
    }
}
