//! Mailbox drivers
//!
//! Feed messages to a [`Machine`]. A failure while evaluating one message is
//! logged and recorded, and the driver moves on; pool errors end the scan.

use core_types::{Mailbox, Message, SieveError, SieveResult};

use crate::vm::{Machine, RunReport};

/// A message whose evaluation was aborted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageFailure {
    /// Message number (1-based position in the mailbox)
    pub message: usize,
    /// Why evaluation stopped
    pub error: SieveError,
}

/// Outcome of a mailbox scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Reports of the messages evaluated to completion
    pub runs: Vec<RunReport>,
    /// Messages whose evaluation was aborted
    pub failures: Vec<MessageFailure>,
}

impl ScanReport {
    /// Number of messages visited
    pub fn visited(&self) -> usize {
        self.runs.len() + self.failures.len()
    }

    /// Total number of actions executed
    pub fn action_count(&self) -> usize {
        self.runs.iter().map(|run| run.action_count).sum()
    }
}

impl Machine {
    /// Evaluate the script against every message of `mailbox`, in order.
    pub fn run_mailbox(&self, mailbox: &mut dyn Mailbox) -> SieveResult<ScanReport> {
        let count = mailbox.message_count()?;
        tracing::info!(messages = count, "scanning mailbox.");

        let mut report = ScanReport::default();
        for index in 0..count {
            let number = index + 1;
            let result = mailbox
                .message_mut(index)
                .and_then(|message| self.run(message));
            match result {
                Ok(run) => report.runs.push(run),
                Err(error) if error.is_fatal() => {
                    tracing::error!(message = number, %error, "mailbox scan aborted.");
                    return Err(error);
                }
                Err(error) => {
                    tracing::warn!(message = number, %error, "message evaluation aborted.");
                    report.failures.push(MessageFailure {
                        message: number,
                        error,
                    });
                }
            }
        }
        Ok(report)
    }

    /// Evaluate a newly delivered message.
    ///
    /// Returns `None` when evaluation of this message was aborted.
    pub fn message_arrived(&self, message: &mut dyn Message) -> SieveResult<Option<RunReport>> {
        let uid = message.uid();
        match self.run(message) {
            Ok(run) => Ok(Some(run)),
            Err(error) if error.is_fatal() => {
                tracing::error!(message = uid, %error, "evaluation failed.");
                Err(error)
            }
            Err(error) => {
                tracing::warn!(message = uid, %error, "message evaluation aborted.");
                Ok(None)
            }
        }
    }
}
