use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Caller identity attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Authenticated username.
    pub username: String,
    /// Groups the user belongs to.
    #[serde(default)]
    pub groups: Vec<String>,
}

impl Subject {
    /// Creates a subject with no groups.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            groups: Vec::new(),
        }
    }

    /// Adds a group membership.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.groups.push(group.into());
        self
    }
}

/// Why a request stopped before completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interruption {
    /// The request was cancelled by its owner.
    Cancelled,
    /// The request ran past its deadline.
    DeadlineExceeded,
}

/// Per-request context: who is asking, and whether they are still waiting.
///
/// Cheap to clone; clones share the same cancellation token. Resolvers pass
/// the context to the store unmodified.
#[derive(Debug, Clone)]
pub struct RequestContext {
    subject: Arc<Subject>,
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// Creates a context for `subject` with no deadline.
    pub fn new(subject: Subject) -> Self {
        Self {
            subject: Arc::new(subject),
            cancel: CancellationToken::new(),
            deadline: None,
        }
    }

    /// Replaces the cancellation token, e.g. with a child of a server-wide token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Sets a deadline `timeout` from now.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    /// Sets an absolute deadline.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Caller identity.
    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    /// Token cancelled when the request is abandoned.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Cancels the request and every clone of this context.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns why the request should stop, if it should.
    pub fn interruption(&self) -> Option<Interruption> {
        if self.cancel.is_cancelled() {
            return Some(Interruption::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(Interruption::DeadlineExceeded),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_cancellation() {
        let ctx = RequestContext::new(Subject::new("alice"));
        let clone = ctx.clone();
        assert_eq!(clone.interruption(), None);
        ctx.cancel();
        assert_eq!(clone.interruption(), Some(Interruption::Cancelled));
    }

    #[test]
    fn expired_deadline_interrupts() {
        let ctx = RequestContext::new(Subject::new("alice")).with_deadline(Instant::now());
        assert_eq!(ctx.interruption(), Some(Interruption::DeadlineExceeded));
    }

    #[test]
    fn child_token_follows_parent() {
        let parent = CancellationToken::new();
        let ctx =
            RequestContext::new(Subject::new("alice")).with_cancellation(parent.child_token());
        parent.cancel();
        assert_eq!(ctx.interruption(), Some(Interruption::Cancelled));
    }
}
