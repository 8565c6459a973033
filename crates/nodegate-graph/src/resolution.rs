/// Outcome of a lookup that may be hidden from the caller.
///
/// `Absent` covers both "does not exist" and "exists but the caller may not
/// read it"; the two are intentionally indistinguishable. Failures travel
/// separately as `Err(ResolveError)`.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum Resolution<T> {
    /// Found, and the caller may read it.
    Visible(T),
    /// Not found, or not readable by the caller.
    Absent,
}

impl<T> Resolution<T> {
    /// Whether a value is visible.
    pub fn is_visible(&self) -> bool {
        matches!(self, Resolution::Visible(_))
    }

    /// Whether nothing is visible.
    pub fn is_absent(&self) -> bool {
        matches!(self, Resolution::Absent)
    }

    /// Converts into an `Option`, dropping the distinction's name.
    pub fn into_option(self) -> Option<T> {
        match self {
            Resolution::Visible(value) => Some(value),
            Resolution::Absent => None,
        }
    }

    /// Borrows the visible value.
    pub fn as_ref(&self) -> Resolution<&T> {
        match self {
            Resolution::Visible(value) => Resolution::Visible(value),
            Resolution::Absent => Resolution::Absent,
        }
    }

    /// Maps the visible value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolution<U> {
        match self {
            Resolution::Visible(value) => Resolution::Visible(f(value)),
            Resolution::Absent => Resolution::Absent,
        }
    }
}

impl<T> From<Option<T>> for Resolution<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Resolution::Visible(value),
            None => Resolution::Absent,
        }
    }
}
