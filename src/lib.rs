//! Mailbox event notifications for IMAP mail stores, following
//! [RFC 5423](https://tools.ietf.org/html/rfc5423).
//!
//! A mail store raises events as its operations run (a message is delivered, flags change, a
//! quota is crossed, a user logs in), fills them with what it knows, and dispatches them once
//! the operation completes. Each event becomes one or more flat JSON objects handed to a
//! [`Sink`](sink::Sink).
//!
//! # Usage
//!
//! ```
//! use imap_notify::sink::WriterSink;
//! use imap_notify::store::{IndexRecord, Mailbox};
//! use imap_notify::{Config, Engine, EventGroup, EventType, ExtraParam};
//!
//! # struct Inbox;
//! # impl Mailbox for Inbox {
//! #     fn name(&self) -> &str { "user.bob" }
//! #     fn uidvalidity(&self) -> u32 { 1234 }
//! #     fn last_uid(&self) -> u32 { 7 }
//! #     fn exists(&self) -> u32 { 1 }
//! #     fn count_unseen(&self) -> imap_notify::Result<u32> { Ok(1) }
//! #     fn message_id(&self, _: &IndexRecord) -> imap_notify::Result<Option<String>> { Ok(None) }
//! # }
//! # let inbox = Inbox;
//! // built once at startup and shared by every session
//! let engine = Engine::new(
//!     Config::new("log")
//!         .group(EventGroup::Message)
//!         .extra_param(ExtraParam::Uidnext)
//!         .server_name("mail.example.com"),
//! );
//!
//! // one queue per operation
//! let mut queue = engine.queue();
//! let new = queue.enqueue(EventType::MessageNew);
//! if let Some(event) = queue.get_mut(new) {
//!     event.extract_record(&inbox, &IndexRecord::new(7))?;
//!     event.extract_mailbox(&inbox)?;
//! }
//!
//! let mut sink = WriterSink::new(Vec::new());
//! assert_eq!(queue.notify(&mut sink), 1);
//! let payload = String::from_utf8(sink.into_inner()).unwrap();
//! assert!(payload.starts_with(
//!     r#"{"event":"MessageNew","uri":"imap://bob@mail.example.com/INBOX;UIDVALIDITY=1234/;UID=7","uidnext":8,"#
//! ));
//! # Ok::<(), imap_notify::Error>(())
//! ```
//!
//! Event creation is the only admission check: when notification is off or the event's group
//! is not enabled, [`Engine::new_event`] and [`EventQueue::enqueue`] return `None` and nothing
//! else needs to be done. An event on a mailbox whose notifications are suppressed is
//! cancelled by [`Event::extract_mailbox`] and silently dropped at dispatch.
//!
//! Logging goes through the [`log`](https://docs.rs/log) facade.

mod content;
mod engine;
mod event;
mod expected;
mod imap_url;
mod namespace;
mod queue;

pub mod config;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod sink;
pub mod store;
pub mod types;

#[cfg(any(test, feature = "test_helpers"))]
pub mod testing;

pub use crate::config::{Config, ContentInclusionMode};
pub use crate::content::content_window;
pub use crate::engine::Engine;
pub use crate::error::{Error, Result};
pub use crate::event::{Event, EventState};
pub use crate::expected::expected;
pub use crate::imap_url::ImapUrl;
pub use crate::namespace::{Namespace, StandardNamespace};
pub use crate::queue::{EventHandle, EventQueue};
pub use crate::types::{EventGroup, EventType, ExtraParam, Param};
