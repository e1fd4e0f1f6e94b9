//! Enable the test_helpers feature to expose in-memory stand-ins for the mail store, the
//! annotation store and the notification sink, for testing code that raises events.
//!
//! To use, add a dev-dependency on this crate with the feature "test_helpers", e.g.
//!
//! ```toml
//! [dependencies]
//! imap-notify = { version = "0.1" }
//!
//! [dev-dependencies]
//! # mirror the same configuration your dependencies and add test_helpers
//! imap-notify = { version = "0.1", features = ["test_helpers"] }
//! ```

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::sink::Sink;
use crate::store::{AnnotationStore, IndexRecord, Mailbox};
use crate::types::{Uid, UidValidity};

/// A [`Mailbox`] whose state is set up front.
///
/// ```
/// # use imap_notify::testing::MemoryMailbox;
/// # use imap_notify::store::Mailbox;
/// let inbox = MemoryMailbox::new("user.bob").last_uid(41).exists(3);
/// assert_eq!(Mailbox::last_uid(&inbox), 41);
/// ```
#[derive(Clone, Debug)]
pub struct MemoryMailbox {
    name: String,
    uidvalidity: UidValidity,
    last_uid: Uid,
    exists: u32,
    unseen: u32,
    message_ids: HashMap<Uid, String>,
    failing: bool,
}

impl MemoryMailbox {
    /// An empty mailbox with `UIDVALIDITY` 1.
    pub fn new(name: impl Into<String>) -> Self {
        MemoryMailbox {
            name: name.into(),
            uidvalidity: 1,
            last_uid: 0,
            exists: 0,
            unseen: 0,
            message_ids: HashMap::new(),
            failing: false,
        }
    }

    /// Set the `UIDVALIDITY`.
    pub fn uidvalidity(mut self, uidvalidity: UidValidity) -> Self {
        self.uidvalidity = uidvalidity;
        self
    }

    /// Set the highest assigned UID.
    pub fn last_uid(mut self, last_uid: Uid) -> Self {
        self.last_uid = last_uid;
        self
    }

    /// Set the number of messages.
    pub fn exists(mut self, exists: u32) -> Self {
        self.exists = exists;
        self
    }

    /// Set the number of unseen messages.
    pub fn unseen(mut self, unseen: u32) -> Self {
        self.unseen = unseen;
        self
    }

    /// Give message `uid` a `Message-ID`.
    pub fn message_id(mut self, uid: Uid, message_id: impl Into<String>) -> Self {
        self.message_ids.insert(uid, message_id.into());
        self
    }

    /// Make every lookup fail.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    fn check(&self) -> Result<()> {
        if self.failing {
            Err(Error::Store(format!("mailbox {} is unavailable", self.name)))
        } else {
            Ok(())
        }
    }
}

impl Mailbox for MemoryMailbox {
    fn name(&self) -> &str {
        &self.name
    }

    fn uidvalidity(&self) -> UidValidity {
        self.uidvalidity
    }

    fn last_uid(&self) -> Uid {
        self.last_uid
    }

    fn exists(&self) -> u32 {
        self.exists
    }

    fn count_unseen(&self) -> Result<u32> {
        self.check()?;
        Ok(self.unseen)
    }

    fn message_id(&self, record: &IndexRecord) -> Result<Option<String>> {
        self.check()?;
        Ok(self.message_ids.get(&record.uid).cloned())
    }
}

/// An [`AnnotationStore`] backed by a map, ignoring the user.
#[derive(Clone, Debug, Default)]
pub struct MemoryAnnotations {
    entries: HashMap<(String, String), String>,
    failing: Vec<String>,
}

impl MemoryAnnotations {
    /// A store without annotations.
    pub fn new() -> Self {
        MemoryAnnotations::default()
    }

    /// Set `entry` on `mailbox`.
    pub fn set(
        mut self,
        mailbox: impl Into<String>,
        entry: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.entries
            .insert((mailbox.into(), entry.into()), value.into());
        self
    }

    /// Make lookups on `mailbox` fail.
    pub fn fail_on(mut self, mailbox: impl Into<String>) -> Self {
        self.failing.push(mailbox.into());
        self
    }
}

impl AnnotationStore for MemoryAnnotations {
    fn lookup(&self, mailbox: &str, entry: &str, _userid: Option<&str>) -> Result<Option<String>> {
        if self.failing.iter().any(|m| m == mailbox) {
            return Err(Error::Annotation(format!("{} on {}", entry, mailbox)));
        }
        Ok(self
            .entries
            .get(&(mailbox.to_string(), entry.to_string()))
            .cloned())
    }
}

/// One payload handed to a [`RecordingSink`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    /// The notifier method.
    pub method: String,
    /// The notification class.
    pub class: String,
    /// The JSON payload.
    pub message: String,
}

/// A [`Sink`] keeping every payload it is given.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    notifications: Vec<Notification>,
    failing: bool,
}

impl RecordingSink {
    /// An empty sink.
    pub fn new() -> Self {
        RecordingSink::default()
    }

    /// A sink refusing every payload.
    pub fn failing() -> Self {
        RecordingSink {
            failing: true,
            ..RecordingSink::default()
        }
    }

    /// Everything accepted so far, in order.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// The payloads accepted so far, in order.
    pub fn messages(&self) -> Vec<&str> {
        self.notifications
            .iter()
            .map(|n| n.message.as_str())
            .collect()
    }
}

impl Sink for RecordingSink {
    fn notify(&mut self, method: &str, class: &str, message: &str) -> Result<()> {
        if self.failing {
            return Err(Error::Sink("recording sink is closed".to_string()));
        }
        self.notifications.push(Notification {
            method: method.to_string(),
            class: class.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }
}
