//! Fetch command implementation.

use crate::config::Config;
use crate::output;
use nodegate_core::{RequestContext, RoleBinding, RuleAuthorizer, Subject};
use nodegate_graph::{Backend, DispatcherConfig, Resolution, ResolveError, Schema};
use nodegate_store::{Fixture, MemoryStore};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Store contents plus the role bindings used to authorize the caller.
#[derive(Debug, Deserialize)]
struct FetchFixture {
    #[serde(flatten)]
    store: Fixture,
    #[serde(default)]
    role_bindings: Vec<RoleBinding>,
}

pub struct FetchArgs {
    pub fixture: String,
    pub id: String,
    pub user: String,
    pub groups: Vec<String>,
    pub raw: bool,
    pub timeout_ms: Option<u64>,
}

pub fn run(args: FetchArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(&args.fixture)
        .map_err(|e| format!("Failed to read fixture {}: {}", args.fixture, e))?;
    let fixture: FetchFixture =
        serde_json::from_str(&raw).map_err(|e| format!("Invalid fixture: {}", e))?;
    info!(
        entities = fixture.store.entities.len(),
        events = fixture.store.events.len(),
        bindings = fixture.role_bindings.len(),
        "loaded fixture"
    );

    let backend = Backend::new(
        Arc::new(MemoryStore::from_fixture(fixture.store)),
        Arc::new(RuleAuthorizer::new(fixture.role_bindings)),
    );
    let schema = Schema::build(
        backend,
        DispatcherConfig {
            max_id_len: config.max_id_len,
        },
    )?;

    let subject = args
        .groups
        .into_iter()
        .fold(Subject::new(args.user), |subject, group| subject.with_group(group));
    let mut ctx = RequestContext::new(subject);
    if let Some(ms) = args.timeout_ms {
        ctx = ctx.with_timeout(Duration::from_millis(ms));
    }

    let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    let rendered = runtime.block_on(render(&schema, &ctx, args.id.trim(), args.raw))?;

    println!("{}", rendered);
    Ok(())
}

/// Fetches the node and renders it; absent and hidden nodes both print `null`.
async fn render(
    schema: &Schema,
    ctx: &RequestContext,
    id: &str,
    raw: bool,
) -> Result<String, ResolveError> {
    let node = match schema.fetch(id, ctx).await? {
        Resolution::Visible(node) => node,
        Resolution::Absent => return Ok("null".to_string()),
    };
    if raw {
        return Ok(output::format_json(&node));
    }
    let object = schema.resolve_object(&node, ctx).await?;
    Ok(output::format_json(&object))
}
