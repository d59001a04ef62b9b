//! Unit tests for the in-memory message store

use core_types::{Mailbox, MemoryMailbox, MemoryMessage, Message};

#[cfg(test)]
mod memory_message_tests {
    use super::*;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let msg = MemoryMessage::new(1).with_header("X-Spam-Flag", "YES");
        assert!(msg.has_header("x-spam-flag").unwrap());
        assert!(!msg.has_header("x-spam-level").unwrap());
        assert_eq!(msg.header_names().unwrap(), vec!["X-Spam-Flag".to_string()]);
    }

    #[test]
    fn test_envelope() {
        let msg = MemoryMessage::new(1)
            .with_envelope_sender("bounce@lists.example.org")
            .with_envelope_date("Mon, 12 Oct 2026 10:00:00 +0000");
        assert_eq!(
            msg.envelope_sender().unwrap().as_deref(),
            Some("bounce@lists.example.org")
        );
        assert_eq!(msg.envelope_recipient().unwrap(), None);
        assert!(msg.envelope_date().unwrap().is_some());
    }

    #[test]
    fn test_mark_deleted() {
        let mut msg = MemoryMessage::new(1);
        assert!(!msg.is_deleted());
        msg.mark_deleted().unwrap();
        assert!(msg.is_deleted());
    }
}

#[cfg(test)]
mod memory_mailbox_tests {
    use super::*;

    #[test]
    fn test_push_and_count() {
        let mut mbox = MemoryMailbox::new();
        mbox.push(MemoryMessage::new(1));
        mbox.push(MemoryMessage::new(2));
        assert_eq!(mbox.message_count().unwrap(), 2);
        assert_eq!(mbox.message_mut(0).unwrap().uid(), 1);
    }
}
