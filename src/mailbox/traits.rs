//! Mailbox error types.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
// (none)

/// Errors raised by mailbox send/receive operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MailboxError {
    /// The mailbox's receiving end has been dropped.
    #[error("mailbox is closed")]
    Closed,
}

/// Non-blocking receive outcome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TryRecvError {
    /// No envelope is currently queued.
    #[error("mailbox is empty")]
    Empty,
    /// The mailbox's sending ends have all been dropped.
    #[error("mailbox is closed")]
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mailbox_error_display() {
        assert_eq!(MailboxError::Closed.to_string(), "mailbox is closed");
    }

    #[test]
    fn test_try_recv_error_display() {
        assert_eq!(TryRecvError::Empty.to_string(), "mailbox is empty");
        assert_eq!(TryRecvError::Closed.to_string(), "mailbox is closed");
    }
}
