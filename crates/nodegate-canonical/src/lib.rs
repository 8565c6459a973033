//! Opaque global identifiers for nodegate resources.
//!
//! A global ID names exactly one domain object across every resource kind.
//! The token is `base64url(no pad)` over a versioned plaintext envelope:
//!
//! ```text
//! v1:{"c":[<component>...],"n":"<namespace>","t":"<tag>"}
//! ```
//!
//! The envelope body is canonical JSON (sorted keys, minimal escaping), so a
//! given `(tag, namespace, components)` triple has exactly one token. The
//! codec never consults the node registry: decoding an unregistered tag
//! succeeds, and deciding who owns it is left to the caller.
//!
#![deny(missing_docs)]

/// Typed per-kind component bundles layered over the shared envelope.
pub mod components;
/// Envelope encoding and decoding.
pub mod global_id;
/// Resource tags and namespaces.
pub mod identifiers;
/// Validation helpers used by identifier newtypes.
pub mod validation;

pub use components::{parse_part, require_arity, IdComponents};
pub use global_id::{
    decode, decode_bounded, encode, DecodeError, GlobalId, OpaqueId, DEFAULT_MAX_ID_LEN,
    ENVELOPE_VERSION,
};
pub use identifiers::{Namespace, ResourceTag};
pub use validation::ValidationError;
