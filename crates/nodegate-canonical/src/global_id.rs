//! Versioned envelope codec for opaque global IDs.
//!
//! Tokens are `base64url_no_pad(version ":" canonical_json(envelope))`. The
//! version marker is part of the plaintext so that a future layout can be
//! introduced without invalidating tokens clients have already cached.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::identifiers::{Namespace, ResourceTag};
use crate::validation::ValidationError;

/// Version marker written into every envelope.
pub const ENVELOPE_VERSION: &str = "v1";

/// Default upper bound on token length for callers of [`decode_bounded`]
/// that accept IDs from untrusted clients.
pub const DEFAULT_MAX_ID_LEN: usize = 1024;

/// Encoded token handed to clients.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpaqueId(String);

impl OpaqueId {
    /// Returns the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the token, returning the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for OpaqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for OpaqueId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Decoded global ID: the resource tag, its namespace and the kind-specific
/// natural key components, in order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GlobalId {
    tag: ResourceTag,
    namespace: Namespace,
    components: Vec<String>,
}

impl GlobalId {
    /// Builds a global ID from its parts.
    pub fn new(tag: ResourceTag, namespace: Namespace, components: Vec<String>) -> Self {
        Self {
            tag,
            namespace,
            components,
        }
    }

    /// Resource tag naming the kind of object.
    pub fn tag(&self) -> &ResourceTag {
        &self.tag
    }

    /// Namespace the object lives in.
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Kind-specific natural key components.
    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// Encodes this ID into its opaque token.
    pub fn encode(&self) -> OpaqueId {
        encode(self)
    }
}

impl fmt::Display for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(encode(self).as_str())
    }
}

impl FromStr for GlobalId {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

/// Errors produced while decoding a token or its typed components.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The token was empty.
    #[error("global id is empty")]
    Empty,
    /// The token exceeds the configured maximum length.
    #[error("global id length {len} exceeds maximum {max}")]
    TooLong {
        /// Length of the offending token.
        len: usize,
        /// Configured maximum.
        max: usize,
    },
    /// The token is not base64url without padding.
    #[error("global id is not valid base64url: {0}")]
    Base64(String),
    /// The decoded bytes are not UTF-8.
    #[error("global id payload is not valid UTF-8")]
    InvalidUtf8,
    /// The plaintext carries no version marker.
    #[error("global id has no version marker")]
    MissingVersion,
    /// The plaintext carries a version this codec does not understand.
    #[error("unsupported global id version '{0}'")]
    UnsupportedVersion(String),
    /// The envelope body is not the expected JSON shape.
    #[error("malformed global id envelope: {0}")]
    Malformed(String),
    /// The tag or namespace fails its pattern.
    #[error("invalid identifier in global id: {0}")]
    InvalidIdentifier(#[from] ValidationError),
    /// The envelope parsed, but is not in canonical form.
    #[error("global id envelope is not canonical")]
    NonCanonical,
    /// Typed components were requested for a different tag.
    #[error("expected resource tag '{expected}', found '{actual}'")]
    WrongTag {
        /// Tag the component type owns.
        expected: &'static str,
        /// Tag found in the envelope.
        actual: String,
    },
    /// The envelope holds the wrong number of components for its kind.
    #[error("resource tag '{tag}' expects {expected} components, found {actual}")]
    Arity {
        /// Tag being decoded.
        tag: &'static str,
        /// Number of components the kind requires.
        expected: usize,
        /// Number of components present.
        actual: usize,
    },
    /// A component failed to parse into its typed field.
    #[error("component {field} ('{value}') is invalid")]
    InvalidComponent {
        /// Name of the natural key field.
        field: &'static str,
        /// Raw component value.
        value: String,
    },
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Envelope {
    c: Vec<String>,
    n: String,
    t: String,
}

/// Encodes a global ID into its opaque token.
///
/// Deterministic and injective: distinct `(tag, namespace, components)`
/// triples always produce distinct tokens.
pub fn encode(id: &GlobalId) -> OpaqueId {
    OpaqueId(URL_SAFE_NO_PAD.encode(plaintext(id).as_bytes()))
}

/// Decodes a token of any length.
///
/// Every token produced by [`encode`] decodes here. Entry points facing
/// clients should prefer [`decode_bounded`].
pub fn decode(token: &str) -> Result<GlobalId, DecodeError> {
    decode_bounded(token, usize::MAX)
}

/// Decodes a token, rejecting tokens longer than `max_len` before any work.
///
/// Succeeds for any well-formed envelope, whether or not its tag is known to
/// a registry.
pub fn decode_bounded(token: &str, max_len: usize) -> Result<GlobalId, DecodeError> {
    if token.is_empty() {
        return Err(DecodeError::Empty);
    }
    if token.len() > max_len {
        return Err(DecodeError::TooLong {
            len: token.len(),
            max: max_len,
        });
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|e| DecodeError::Base64(e.to_string()))?;
    let text = String::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)?;

    let (version, body) = split_version(&text)?;
    if version != ENVELOPE_VERSION {
        return Err(DecodeError::UnsupportedVersion(version.to_string()));
    }

    let envelope: Envelope =
        serde_json::from_str(body).map_err(|e| DecodeError::Malformed(e.to_string()))?;
    let id = GlobalId {
        tag: ResourceTag::parse(envelope.t)?,
        namespace: Namespace::parse(envelope.n)?,
        components: envelope.c,
    };

    // One object, one token: reject whitespace, reordered keys and
    // alternative escapes.
    if plaintext(&id) != text {
        return Err(DecodeError::NonCanonical);
    }

    Ok(id)
}

fn split_version(text: &str) -> Result<(&str, &str), DecodeError> {
    let (version, body) = text.split_once(':').ok_or(DecodeError::MissingVersion)?;
    let is_marker = version.len() >= 2
        && version.starts_with('v')
        && version[1..].bytes().all(|b| b.is_ascii_digit());
    if !is_marker {
        return Err(DecodeError::MissingVersion);
    }
    Ok((version, body))
}

/// Builds the versioned plaintext from the RFC 8785 form of the envelope.
fn plaintext(id: &GlobalId) -> String {
    let envelope = json!({
        "c": id.components,
        "n": id.namespace.as_str(),
        "t": id.tag.as_str(),
    });
    let body = canonical_json::to_string(&envelope).expect("string-only envelope serializes");
    format!("{}:{}", ENVELOPE_VERSION, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_id() -> GlobalId {
        GlobalId::new(
            ResourceTag::new("check"),
            Namespace::default(),
            vec!["web-1".into(), "check-cpu".into(), "1000".into()],
        )
    }

    fn token_for(plaintext: &str) -> String {
        URL_SAFE_NO_PAD.encode(plaintext.as_bytes())
    }

    #[test]
    fn plaintext_layout_is_stable() {
        assert_eq!(
            plaintext(&check_id()),
            r#"v1:{"c":["web-1","check-cpu","1000"],"n":"default","t":"check"}"#
        );
    }

    #[test]
    fn token_uses_url_safe_alphabet() {
        let token = encode(&check_id());
        assert!(token
            .as_str()
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_'));
    }

    #[test]
    fn decodes_unregistered_tags() {
        let id = GlobalId::new(ResourceTag::new("widget"), Namespace::default(), vec![]);
        assert_eq!(decode(encode(&id).as_str()).unwrap(), id);
    }

    #[test]
    fn rejects_other_versions() {
        let token = token_for(r#"v2:{"c":[],"n":"default","t":"check"}"#);
        assert_eq!(
            decode(&token),
            Err(DecodeError::UnsupportedVersion("v2".into()))
        );
    }

    #[test]
    fn rejects_missing_version() {
        let token = token_for(r#"{"c":[],"n":"default","t":"check"}"#);
        assert_eq!(decode(&token), Err(DecodeError::MissingVersion));
    }

    #[test]
    fn rejects_non_canonical_whitespace() {
        let token = token_for(r#"v1:{"c": [],"n":"default","t":"check"}"#);
        assert_eq!(decode(&token), Err(DecodeError::NonCanonical));
    }

    #[test]
    fn rejects_unknown_envelope_fields() {
        let token = token_for(r#"v1:{"c":[],"n":"default","t":"check","x":1}"#);
        assert!(matches!(decode(&token), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn rejects_invalid_tag() {
        let token = token_for(r#"v1:{"c":[],"n":"default","t":"Check"}"#);
        assert!(matches!(
            decode(&token),
            Err(DecodeError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn rejects_garbage_and_padding() {
        assert!(matches!(decode("not base64!"), Err(DecodeError::Base64(_))));
        let padded = format!("{}=", encode(&check_id()));
        assert!(decode(&padded).is_err());
        assert_eq!(decode(""), Err(DecodeError::Empty));
    }

    #[test]
    fn enforces_length_bound() {
        let token = encode(&check_id());
        assert!(matches!(
            decode_bounded(token.as_str(), 8),
            Err(DecodeError::TooLong { max: 8, .. })
        ));
    }

    #[test]
    fn unbounded_decode_accepts_long_tokens() {
        let id = GlobalId::new(
            ResourceTag::new("entity"),
            Namespace::default(),
            vec!["x".repeat(800)],
        );
        let token = encode(&id);
        assert!(token.as_str().len() > DEFAULT_MAX_ID_LEN);
        assert_eq!(decode(token.as_str()).unwrap(), id);
        assert!(matches!(
            decode_bounded(token.as_str(), DEFAULT_MAX_ID_LEN),
            Err(DecodeError::TooLong { .. })
        ));
    }

    #[test]
    fn escapes_non_ascii_and_controls() {
        let id = GlobalId::new(
            ResourceTag::new("entity"),
            Namespace::default(),
            vec!["a\"b\\c\n\u{1}".into(), "\u{e9}\u{7f}\u{2028}".into()],
        );
        assert_eq!(
            plaintext(&id),
            r#"v1:{"c":["a\"b\\c\n\u0001","\u00e9\u007f\u2028"],"n":"default","t":"entity"}"#
        );
        assert_eq!(decode(encode(&id).as_str()).unwrap(), id);
    }

    #[test]
    fn rejects_raw_non_ascii() {
        let token = token_for("v1:{\"c\":[\"\u{e9}\"],\"n\":\"default\",\"t\":\"entity\"}");
        assert_eq!(decode(&token), Err(DecodeError::NonCanonical));
    }
}
