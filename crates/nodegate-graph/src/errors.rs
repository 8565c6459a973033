use nodegate_canonical::DecodeError;
use nodegate_core::Interruption;
use nodegate_store::StoreError;
use thiserror::Error;

/// Who a resolution error should be reported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad client input; never retried.
    Client,
    /// Schema or registration defect; should not occur in a wired process.
    Internal,
    /// Store failure or abandoned request, passed through as-is.
    Store,
}

/// Errors raised while resolving nodes or fields.
///
/// Authorization denial is deliberately absent from this type.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The global ID, or its kind-specific components, failed to decode.
    #[error("invalid global id: {0}")]
    InvalidId(#[from] DecodeError),
    /// No registered resolver claims the decoded tag.
    #[error("no node resolver registered for resource tag '{tag}'")]
    NoMatchingResolver {
        /// Decoded tag.
        tag: String,
    },
    /// More than one resolver predicate claims the decoded tag.
    #[error("resource tag '{tag}' is claimed by both {first} and {second}")]
    AmbiguousResolver {
        /// Decoded tag.
        tag: String,
        /// First claiming type.
        first: &'static str,
        /// Second claiming type.
        second: &'static str,
    },
    /// A field resolver received a parent object of the wrong kind.
    #[error("source object is not {expected} (got {actual})")]
    UnexpectedSource {
        /// Kind the resolver expects.
        expected: &'static str,
        /// Kind it received.
        actual: &'static str,
    },
    /// A required nested substructure is missing from the source object.
    #[error("{type_name} source is missing required {substructure}")]
    MissingSubstructure {
        /// Object type being resolved.
        type_name: &'static str,
        /// Missing substructure.
        substructure: &'static str,
    },
    /// The schema has no such object type.
    #[error("unknown object type '{0}'")]
    UnknownType(String),
    /// The object type has no such field.
    #[error("{type_name} has no field '{field}'")]
    UnknownField {
        /// Object type.
        type_name: &'static str,
        /// Requested field.
        field: String,
    },
    /// The request was cancelled or timed out.
    #[error("request interrupted: {0:?}")]
    Interrupted(Interruption),
    /// The store failed.
    #[error("store error: {0}")]
    Store(StoreError),
}

impl ResolveError {
    /// Reporting class of this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            ResolveError::InvalidId(_) => ErrorClass::Client,
            ResolveError::NoMatchingResolver { .. }
            | ResolveError::AmbiguousResolver { .. }
            | ResolveError::UnexpectedSource { .. }
            | ResolveError::MissingSubstructure { .. }
            | ResolveError::UnknownType(_)
            | ResolveError::UnknownField { .. } => ErrorClass::Internal,
            ResolveError::Interrupted(_) | ResolveError::Store(_) => ErrorClass::Store,
        }
    }
}

impl From<StoreError> for ResolveError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Cancelled => ResolveError::Interrupted(Interruption::Cancelled),
            StoreError::DeadlineExceeded => {
                ResolveError::Interrupted(Interruption::DeadlineExceeded)
            }
            other => ResolveError::Store(other),
        }
    }
}

impl From<Interruption> for ResolveError {
    fn from(value: Interruption) -> Self {
        ResolveError::Interrupted(value)
    }
}

/// Errors raised while assembling the registry or schema at start-up.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Two resolvers claim the same tag.
    #[error("resource tag '{tag}' is already claimed by {existing}; refusing {incoming}")]
    TagCollision {
        /// Contested tag.
        tag: String,
        /// Type already holding the tag.
        existing: &'static str,
        /// Type being registered.
        incoming: &'static str,
    },
    /// A resolver declares no tags.
    #[error("{type_name} declares no resource tags")]
    NoTags {
        /// Offending type.
        type_name: &'static str,
    },
    /// Two object types share a name.
    #[error("object type {0} is defined twice")]
    DuplicateType(&'static str),
}
