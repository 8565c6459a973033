use std::fmt::Display;
use std::str::FromStr;

use crate::global_id::{DecodeError, GlobalId};
use crate::identifiers::{Namespace, ResourceTag};

/// Typed natural key for one resource kind.
///
/// Implementors own a single tag and a fixed component layout. The shared
/// envelope lets any token be decoded far enough to read its tag before the
/// kind-specific layout is known.
pub trait IdComponents: Sized {
    /// Resource tag owned by this kind. Changing it invalidates every token
    /// previously issued for the kind.
    const TAG: &'static str;

    /// Namespace of the identified object.
    fn namespace(&self) -> &Namespace;

    /// Natural key fields in envelope order.
    fn to_parts(&self) -> Vec<String>;

    /// Rebuilds the typed key from envelope components.
    fn from_parts(namespace: Namespace, parts: &[String]) -> Result<Self, DecodeError>;

    /// Resource tag as a value.
    fn resource_tag() -> ResourceTag {
        ResourceTag::new(Self::TAG)
    }

    /// Builds the decoded global ID for these components.
    fn to_global_id(&self) -> GlobalId {
        GlobalId::new(Self::resource_tag(), self.namespace().clone(), self.to_parts())
    }

    /// Extracts typed components, refusing IDs of another kind.
    fn from_global_id(id: &GlobalId) -> Result<Self, DecodeError> {
        if id.tag() != Self::TAG {
            return Err(DecodeError::WrongTag {
                expected: Self::TAG,
                actual: id.tag().to_string(),
            });
        }
        Self::from_parts(id.namespace().clone(), id.components())
    }
}

/// Checks that a kind received exactly `expected` components.
pub fn require_arity(
    tag: &'static str,
    parts: &[String],
    expected: usize,
) -> Result<(), DecodeError> {
    if parts.len() != expected {
        return Err(DecodeError::Arity {
            tag,
            expected,
            actual: parts.len(),
        });
    }
    Ok(())
}

/// Parses one component into a typed field.
///
/// Only the canonical rendering is accepted (`"1000"`, never `"+01000"`), so
/// each typed key has exactly one token.
pub fn parse_part<T>(field: &'static str, value: &str) -> Result<T, DecodeError>
where
    T: FromStr + Display,
{
    let invalid = || DecodeError::InvalidComponent {
        field,
        value: value.to_string(),
    };
    let parsed: T = value.parse().map_err(|_| invalid())?;
    if parsed.to_string() != value {
        return Err(invalid());
    }
    Ok(parsed)
}
