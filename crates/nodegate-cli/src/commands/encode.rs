//! Encode command implementation.

use nodegate_canonical::{GlobalId, Namespace, ResourceTag};

pub fn run(
    tag: String,
    components: Vec<String>,
    namespace: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let tag = ResourceTag::parse(tag).map_err(|e| format!("Invalid resource tag: {}", e))?;
    let namespace =
        Namespace::parse(namespace).map_err(|e| format!("Invalid namespace: {}", e))?;

    let id = GlobalId::new(tag, namespace, components);
    println!("{}", id.encode());
    Ok(())
}
