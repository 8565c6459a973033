use nodegate_canonical::{decode, DecodeError, GlobalId, IdComponents, Namespace};
use nodegate_core::{
    Abilities, BindingSubject, CoreError, Event, EventComponents, Interruption, RequestContext,
    ResourceCategory, RoleBinding, Rule, RuleAuthorizer, Subject,
};
use serde_json::json;
use std::time::{Duration, Instant};

fn make_event(check: Option<&str>) -> Event {
    let mut raw = json!({
        "timestamp": 1000,
        "entity": {
            "metadata": { "name": "web-1", "namespace": "prod" },
            "entity_class": "agent"
        }
    });
    if let Some(name) = check {
        raw["check"] = json!({
            "config": {
                "metadata": { "name": name, "namespace": "prod" },
                "command": "check-cpu.sh"
            },
            "output": "CPU OK",
            "executed": 995
        });
    }
    serde_json::from_value(raw).unwrap()
}

fn make_authorizer(rule: Rule) -> RuleAuthorizer {
    RuleAuthorizer::new(vec![RoleBinding {
        name: "test".into(),
        subjects: vec![BindingSubject::User("alice".into())],
        rules: vec![rule],
    }])
}

#[test]
fn test_event_defaults_from_minimal_json() {
    let event = make_event(Some("check-cpu"));
    let check = event.check.as_ref().unwrap();
    assert_eq!(check.status, 0);
    assert_eq!(check.config.interval, 0);
    assert!(check.config.subscriptions.is_empty());
    assert!(event.metrics.is_none());
    assert_eq!(event.namespace().as_str(), "prod");
}

#[test]
fn test_missing_namespace_defaults() {
    let event: Event = serde_json::from_value(json!({
        "timestamp": 1,
        "entity": { "metadata": { "name": "web-1" }, "entity_class": "proxy" }
    }))
    .unwrap();
    assert_eq!(event.namespace().as_str(), Namespace::DEFAULT);
}

#[test]
fn test_invalid_namespace_is_rejected_on_load() {
    let raw = json!({
        "timestamp": 1,
        "entity": { "metadata": { "name": "web-1", "namespace": "Acme" }, "entity_class": "agent" }
    });
    assert!(serde_json::from_value::<Event>(raw).is_err());
}

#[test]
fn test_loaded_event_ids_always_decode() {
    let mut event = make_event(Some("check-cpu"));
    event.entity.metadata.name = "x".repeat(800);
    let key = EventComponents::for_event(&event).unwrap();
    let token = key.to_global_id().encode();

    let decoded = EventComponents::from_global_id(&decode(token.as_str()).unwrap()).unwrap();
    assert_eq!(decoded, key);
}

#[test]
fn test_check_event_id_round_trip() {
    let event = make_event(Some("check-cpu"));
    let key = EventComponents::for_event(&event).unwrap();
    let token = key.to_global_id().encode();

    let decoded = EventComponents::from_global_id(&decode(token.as_str()).unwrap()).unwrap();
    assert_eq!(decoded, key);
    assert!(decoded.matches(&event));
    assert_eq!(decoded.namespace.as_str(), "prod");
}

#[test]
fn test_padded_timestamp_names_no_event() {
    let id = GlobalId::new(
        EventComponents::resource_tag(),
        Namespace::default(),
        vec!["web-1".into(), "check-cpu".into(), "+01000".into()],
    );
    assert_eq!(
        EventComponents::from_global_id(&id),
        Err(DecodeError::InvalidComponent {
            field: "timestamp",
            value: "+01000".into()
        })
    );
}

#[test]
fn test_metrics_only_event_has_no_check_id() {
    let event = make_event(None);
    assert!(matches!(
        EventComponents::for_event(&event),
        Err(CoreError::MissingCheck { ref entity }) if entity == "web-1"
    ));
}

#[test]
fn test_events_are_authorized_by_entity_name() {
    let authorizer = make_authorizer(Rule::read([ResourceCategory::Events]).named("web-1"));
    let ctx = RequestContext::new(Subject::new("alice"));
    let abilities = Abilities::events(&authorizer, &ctx);
    assert!(abilities.can_read(&make_event(Some("check-cpu"))));
    assert!(!Abilities::entities(&authorizer, &ctx).can_read(&make_event(None).entity));
}

#[test]
fn test_deadline_interrupts_request() {
    let ctx = RequestContext::new(Subject::new("alice")).with_timeout(Duration::from_secs(60));
    assert_eq!(ctx.interruption(), None);

    let expired = ctx.clone().with_deadline(Instant::now());
    assert_eq!(expired.interruption(), Some(Interruption::DeadlineExceeded));

    ctx.cancel();
    assert_eq!(expired.interruption(), Some(Interruption::Cancelled));
}
