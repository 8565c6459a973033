//! Kinds command implementation.

use crate::config::Config;
use crate::output;
use nodegate_core::RuleAuthorizer;
use nodegate_graph::{Backend, DispatcherConfig, Schema};
use nodegate_store::MemoryStore;
use std::sync::Arc;

pub fn run(json: bool, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    // Registration does not touch the store, so an empty one is enough.
    let backend = Backend::new(
        Arc::new(MemoryStore::new()),
        Arc::new(RuleAuthorizer::default()),
    );
    let schema = Schema::build(
        backend,
        DispatcherConfig {
            max_id_len: config.max_id_len,
        },
    )?;
    let kinds = schema.dispatcher().registry().kinds();

    if json {
        println!("{}", serde_json::to_string(&kinds)?);
        return Ok(());
    }

    output::print_kinds_header();
    for kind in &kinds {
        println!(
            "{}",
            output::format_kind_row(kind, schema.object_type(kind.type_name))
        );
    }
    Ok(())
}
