//! Decode command implementation.

use crate::config::Config;
use crate::output;
use nodegate_canonical::decode_bounded;

pub fn run(id: String, json: bool, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let id = decode_bounded(id.trim(), config.max_id_len)
        .map_err(|e| format!("Invalid global id: {}", e))?;

    if json {
        println!("{}", serde_json::to_string(&id)?);
    } else {
        println!("{}", output::format_global_id(&id));
    }
    Ok(())
}
