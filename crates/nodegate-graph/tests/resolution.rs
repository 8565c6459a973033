use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use nodegate_canonical::{decode, DecodeError, GlobalId, IdComponents, Namespace, ResourceTag};
use nodegate_core::{
    BindingSubject, Check, CheckConfig, CheckConfigComponents, Entity, EntityComponents, Event,
    EventComponents, Interruption, Metrics, ObjectMeta, RequestContext, ResourceCategory,
    RoleBinding, Rule, RuleAuthorizer, Subject,
};
use nodegate_graph::{
    Backend, DispatcherConfig, ErrorClass, FieldValue, Node, RegistryError, ResolveError, Schema,
};
use nodegate_store::{CheckConfigStore, EntityStore, EventStore, MemoryStore, StoreError};
use std::sync::Arc;

fn entity(name: &str) -> Entity {
    Entity {
        metadata: ObjectMeta::new(name, Namespace::default()),
        entity_class: "agent".into(),
        subscriptions: vec!["linux".into()],
        last_seen: 990,
    }
}

fn config(name: &str) -> CheckConfig {
    CheckConfig {
        metadata: ObjectMeta::new(name, Namespace::default()),
        command: format!("{name} --warn 80"),
        interval: 60,
        subscriptions: vec!["linux".into()],
        publish: true,
        handlers: vec!["slack".into()],
    }
}

fn check_event(entity_name: &str, check: &str, timestamp: i64) -> Event {
    Event {
        timestamp,
        entity: entity(entity_name),
        check: Some(Check {
            config: config(check),
            output: "CPU OK".into(),
            status: 0,
            issued: timestamp - 10,
            executed: timestamp - 5,
            duration: 1.25,
        }),
        metrics: None,
    }
}

fn metrics_event(entity_name: &str, timestamp: i64) -> Event {
    Event {
        timestamp,
        entity: entity(entity_name),
        check: None,
        metrics: Some(Metrics {
            handlers: vec!["influx".into()],
            points: vec![],
        }),
    }
}

fn store() -> MemoryStore {
    let store = MemoryStore::new();
    store.insert_entity(entity("web-1"));
    store.insert_check_config(config("check-cpu"));
    store.insert_event(check_event("web-1", "check-cpu", 1000));
    store.insert_event(metrics_event("web-1", 1500));
    store.insert_event(check_event("web-1", "check-cpu", 2000));
    store
}

fn user(name: &str, resources: Vec<ResourceCategory>) -> RoleBinding {
    RoleBinding {
        name: format!("{name}-binding"),
        subjects: vec![BindingSubject::User(name.into())],
        rules: vec![Rule::read(resources)],
    }
}

fn authorizer() -> RuleAuthorizer {
    RuleAuthorizer::new(vec![
        user(
            "admin",
            vec![
                ResourceCategory::Events,
                ResourceCategory::Entities,
                ResourceCategory::Checks,
            ],
        ),
        user("operator", vec![ResourceCategory::Events, ResourceCategory::Checks]),
        user("viewer", vec![ResourceCategory::Entities]),
    ])
}

fn schema_over(store: Arc<dyn nodegate_store::Store>) -> Schema {
    Schema::build(
        Backend::new(store, Arc::new(authorizer())),
        DispatcherConfig::default(),
    )
    .unwrap()
}

fn schema() -> Schema {
    schema_over(Arc::new(store()))
}

fn ctx(username: &str) -> RequestContext {
    RequestContext::new(Subject::new(username))
}

fn event_token(entity: &str, check: &str, timestamp: i64) -> String {
    EventComponents {
        namespace: Namespace::default(),
        entity: entity.into(),
        check: check.into(),
        timestamp,
    }
    .to_global_id()
    .encode()
    .into_string()
}

async fn fetch_event(schema: &Schema, username: &str, timestamp: i64) -> Node {
    schema
        .fetch(&event_token("web-1", "check-cpu", timestamp), &ctx(username))
        .await
        .unwrap()
        .into_option()
        .expect("event should be visible")
}

/// Fails every event lookup.
struct BrokenEvents(MemoryStore);

#[async_trait]
impl EventStore for BrokenEvents {
    async fn get_events_by_entity(
        &self,
        _ctx: &RequestContext,
        _namespace: &Namespace,
        _entity: &str,
    ) -> Result<Vec<Arc<Event>>, StoreError> {
        Err(StoreError::Unavailable("event shard offline".into()))
    }
}

#[async_trait]
impl EntityStore for BrokenEvents {
    async fn get_entity_by_name(
        &self,
        ctx: &RequestContext,
        namespace: &Namespace,
        name: &str,
    ) -> Result<Option<Arc<Entity>>, StoreError> {
        self.0.get_entity_by_name(ctx, namespace, name).await
    }
}

#[async_trait]
impl CheckConfigStore for BrokenEvents {
    async fn get_check_config_by_name(
        &self,
        ctx: &RequestContext,
        namespace: &Namespace,
        name: &str,
    ) -> Result<Option<Arc<CheckConfig>>, StoreError> {
        self.0.get_check_config_by_name(ctx, namespace, name).await
    }
}

#[test]
fn event_token_decodes_to_its_natural_key() {
    let id = decode(&event_token("web-1", "check-cpu", 1000)).unwrap();
    let key = EventComponents::from_global_id(&id).unwrap();
    assert_eq!(key.entity, "web-1");
    assert_eq!(key.check, "check-cpu");
    assert_eq!(key.timestamp, 1000);
}

#[tokio::test]
async fn readable_check_event_is_returned() {
    let schema = schema();
    let node = fetch_event(&schema, "admin", 1000).await;
    let event = node.downcast::<Event>().unwrap();
    assert_eq!(event.timestamp, 1000);
    assert_eq!(event.check_name(), Some("check-cpu"));
    assert_eq!(schema.type_of(&node).unwrap().name(), "CheckEvent");
}

#[tokio::test]
async fn unreadable_event_is_absent_not_an_error() {
    let schema = schema();
    let token = event_token("web-1", "check-cpu", 1000);
    let hidden = schema.fetch(&token, &ctx("viewer")).await.unwrap();
    let missing = schema
        .fetch(&event_token("web-1", "check-cpu", 1234), &ctx("admin"))
        .await
        .unwrap();
    assert!(hidden.is_absent());
    assert_eq!(hidden, missing);
}

#[tokio::test]
async fn unregistered_tag_is_internal_error() {
    let token = GlobalId::new(ResourceTag::new("widget"), Namespace::default(), vec!["w".into()])
        .encode();
    let err = schema().fetch(token.as_str(), &ctx("admin")).await.unwrap_err();
    assert!(matches!(&err, ResolveError::NoMatchingResolver { tag } if tag == "widget"));
    assert_eq!(err.class(), ErrorClass::Internal);
}

#[tokio::test]
async fn entity_field_is_null_without_entity_read() {
    let schema = schema();
    let ctx = ctx("operator");
    let node = fetch_event(&schema, "operator", 1000).await;
    let object = schema.resolve_object(&node, &ctx).await.unwrap();

    assert_eq!(object.type_name, "CheckEvent");
    assert!(object.fields["entity"].is_null());
    assert_eq!(object.fields["output"], FieldValue::String("CPU OK".into()));
    assert_eq!(object.fields["status"], FieldValue::Int(0));
    assert_eq!(object.fields["executed"], FieldValue::Timestamp(995));
    assert!(object.fields["config"].as_node().is_some());
}

#[tokio::test]
async fn related_objects_are_checked_against_their_own_category() {
    let schema = schema();
    let node = fetch_event(&schema, "admin", 1000).await;
    let ctx = ctx("admin");

    let entity = schema
        .resolve_field("CheckEvent", "entity", &node, &ctx)
        .await
        .unwrap();
    assert_eq!(entity.as_node().unwrap().downcast::<Entity>().unwrap().metadata.name, "web-1");

    let restricted = RuleAuthorizer::new(vec![user("admin", vec![ResourceCategory::Events])]);
    let narrow = Schema::build(
        Backend::new(Arc::new(store()), Arc::new(restricted)),
        DispatcherConfig::default(),
    )
    .unwrap();
    for field in ["entity", "config"] {
        let value = narrow.resolve_field("CheckEvent", field, &node, &ctx).await.unwrap();
        assert!(value.is_null(), "{field} should be hidden");
    }
}

#[tokio::test]
async fn wrong_envelope_version_is_client_error() {
    let token = URL_SAFE_NO_PAD
        .encode(br#"v2:{"c":["web-1","check-cpu","1000"],"n":"default","t":"check"}"#);
    let err = schema().fetch(&token, &ctx("admin")).await.unwrap_err();
    assert!(matches!(
        err,
        ResolveError::InvalidId(DecodeError::UnsupportedVersion(ref v)) if v == "v2"
    ));
    assert_eq!(err.class(), ErrorClass::Client);
}

#[tokio::test]
async fn malformed_components_are_client_errors() {
    let short = GlobalId::new(
        EventComponents::resource_tag(),
        Namespace::default(),
        vec!["web-1".into()],
    )
    .encode();
    let err = schema().fetch(short.as_str(), &ctx("admin")).await.unwrap_err();
    assert!(matches!(err, ResolveError::InvalidId(DecodeError::Arity { .. })));

    for garbage in ["", "%%%", "djE6bm90IGpzb24"] {
        let err = schema().fetch(garbage, &ctx("admin")).await.unwrap_err();
        assert_eq!(err.class(), ErrorClass::Client, "{garbage:?}");
    }
}

#[tokio::test]
async fn oversized_tokens_are_rejected_before_decoding() {
    let schema = Schema::build(
        Backend::new(Arc::new(store()), Arc::new(authorizer())),
        DispatcherConfig { max_id_len: 16 },
    )
    .unwrap();
    let err = schema
        .fetch(&event_token("web-1", "check-cpu", 1000), &ctx("admin"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ResolveError::InvalidId(DecodeError::TooLong { max: 16, .. })
    ));
}

#[tokio::test]
async fn id_field_reissues_the_fetched_token() {
    let schema = schema();
    let token = event_token("web-1", "check-cpu", 2000);
    let node = fetch_event(&schema, "admin", 2000).await;
    let id = schema
        .resolve_field("CheckEvent", "id", &node, &ctx("admin"))
        .await
        .unwrap();
    assert_eq!(id.as_str(), Some(token.as_str()));
}

#[tokio::test]
async fn events_without_a_check_are_not_check_events() {
    let schema = schema();
    let node = Node::Event(Arc::new(metrics_event("web-1", 1500)));
    assert!(schema.type_of(&node).is_none());

    let err = schema
        .resolve_field("CheckEvent", "output", &node, &ctx("admin"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ResolveError::MissingSubstructure { substructure: "check", .. }
    ));
    let handlers = schema
        .resolve_field("CheckEvent", "metricsHandlers", &node, &ctx("admin"))
        .await
        .unwrap();
    assert_eq!(handlers, FieldValue::List(vec![FieldValue::from("influx")]));
}

#[tokio::test]
async fn field_resolvers_reject_foreign_sources() {
    let schema = schema();
    let node = Node::Entity(Arc::new(entity("web-1")));
    let err = schema
        .resolve_field("CheckEvent", "output", &node, &ctx("admin"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ResolveError::UnexpectedSource { expected: "Event", actual: "Entity" }
    ));
    assert_eq!(err.class(), ErrorClass::Internal);

    assert!(matches!(
        schema.resolve_field("Widget", "id", &node, &ctx("admin")).await,
        Err(ResolveError::UnknownType(_))
    ));
    assert!(matches!(
        schema.resolve_field("Entity", "colour", &node, &ctx("admin")).await,
        Err(ResolveError::UnknownField { type_name: "Entity", .. })
    ));
}

#[tokio::test]
async fn entities_and_check_configs_resolve_by_name() {
    let schema = schema();
    let entity_token = EntityComponents {
        namespace: Namespace::default(),
        name: "web-1".into(),
    }
    .to_global_id()
    .encode();
    let config_token = CheckConfigComponents {
        namespace: Namespace::default(),
        name: "check-cpu".into(),
    }
    .to_global_id()
    .encode();

    let entity = schema.fetch(entity_token.as_str(), &ctx("viewer")).await.unwrap();
    assert!(entity.is_visible());
    let config = schema.fetch(config_token.as_str(), &ctx("viewer")).await.unwrap();
    assert!(config.is_absent());

    let config = schema
        .fetch(config_token.as_str(), &ctx("operator"))
        .await
        .unwrap()
        .into_option()
        .unwrap();
    let object = schema.resolve_object(&config, &ctx("operator")).await.unwrap();
    assert_eq!(object.type_name, "CheckConfig");
    assert_eq!(object.fields["interval"], FieldValue::Int(60));
    assert_eq!(object.fields["id"].as_str(), Some(config_token.as_str()));
}

#[tokio::test]
async fn entity_events_lists_only_readable_check_events() {
    let schema = schema();
    let node = Node::Entity(Arc::new(entity("web-1")));

    let events = schema
        .resolve_field("Entity", "events", &node, &ctx("admin"))
        .await
        .unwrap();
    let stamps: Vec<i64> = events
        .as_list()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_node()?.downcast::<Event>())
        .map(|e| e.timestamp)
        .collect();
    assert_eq!(stamps, vec![1000, 2000]);

    let hidden = schema
        .resolve_field("Entity", "events", &node, &ctx("viewer"))
        .await
        .unwrap();
    assert_eq!(hidden, FieldValue::List(vec![]));
}

#[tokio::test]
async fn store_failures_propagate_through_relationship_fields() {
    let schema = schema_over(Arc::new(BrokenEvents(store())));
    let node = Node::Entity(Arc::new(entity("web-1")));
    let err = schema
        .resolve_field("Entity", "events", &node, &ctx("admin"))
        .await
        .unwrap_err();
    assert!(matches!(err, ResolveError::Store(StoreError::Unavailable(_))));
    assert_eq!(err.class(), ErrorClass::Store);

    let err = schema
        .fetch(&event_token("web-1", "check-cpu", 1000), &ctx("admin"))
        .await
        .unwrap_err();
    assert!(matches!(err, ResolveError::Store(_)));
}

#[tokio::test]
async fn cancelled_requests_stop_dispatch() {
    let schema = schema();
    let ctx = ctx("admin");
    ctx.cancel();
    let err = schema
        .fetch(&event_token("web-1", "check-cpu", 1000), &ctx)
        .await
        .unwrap_err();
    assert!(matches!(err, ResolveError::Interrupted(Interruption::Cancelled)));
    assert_eq!(err.class(), ErrorClass::Store);
}

#[tokio::test]
async fn concurrent_fetches_share_one_schema() {
    let schema = Arc::new(schema());
    let mut handles = Vec::new();
    for i in 0..16 {
        let schema = Arc::clone(&schema);
        handles.push(tokio::spawn(async move {
            let (username, timestamp) = if i % 2 == 0 { ("admin", 1000) } else { ("viewer", 2000) };
            schema
                .fetch(&event_token("web-1", "check-cpu", timestamp), &ctx(username))
                .await
                .map(|r| r.is_visible())
        }));
    }
    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.await.unwrap().unwrap(), i % 2 == 0);
    }
}

#[test]
fn built_in_kinds_are_registered_once() {
    let schema = schema();
    let kinds = schema.dispatcher().registry().kinds();
    let names: Vec<&str> = kinds.iter().map(|k| k.type_name).collect();
    assert_eq!(names, vec!["CheckEvent", "Entity", "CheckConfig"]);
    assert_eq!(kinds[0].tags, vec!["check"]);
    for object in schema.object_types() {
        assert_eq!(object.interfaces(), &["Node"]);
        assert_eq!(object.field_names()[0], "id");
    }
}

#[test]
fn registering_a_kind_twice_fails() {
    let backend = Backend::new(Arc::new(store()), Arc::new(authorizer()));
    let mut kinds = nodegate_graph::kinds::all(&backend);
    kinds.push(nodegate_graph::kinds::entity::registration(&backend));
    let err = Schema::assemble(kinds, DispatcherConfig::default()).err().unwrap();
    assert_eq!(err, RegistryError::DuplicateType("Entity"));
}
