//! The interface between the engine and the mail store it reports on.
//!
//! The engine never touches storage itself: the mail store hands over its mailboxes through
//! [`Mailbox`], its per-message metadata as [`IndexRecord`]s, and answers special-use lookups
//! through an [`AnnotationStore`].

use crate::error::Result;
use crate::types::{Flag, ModSeq, Uid, UidValidity};

/// The annotation holding the special-use attributes of a mailbox.
pub const SPECIALUSE_ANNOTATION: &str = "/specialuse";

/// An open mailbox of the mail store.
pub trait Mailbox {
    /// Internal name of the mailbox, as understood by the [`Namespace`](crate::Namespace).
    fn name(&self) -> &str;

    /// The current `UIDVALIDITY`.
    fn uidvalidity(&self) -> UidValidity;

    /// The highest UID assigned so far.
    fn last_uid(&self) -> Uid;

    /// Number of messages in the mailbox.
    fn exists(&self) -> u32;

    /// Count the messages that do not have `\Seen` set for the owner of the mailbox.
    fn count_unseen(&self) -> Result<u32>;

    /// The `Message-ID` header of a message, from the mailbox cache.
    fn message_id(&self, record: &IndexRecord) -> Result<Option<String>>;
}

/// Per-message metadata from the mailbox index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexRecord {
    /// UID of the message.
    pub uid: Uid,
    /// Last modification sequence of the message.
    pub modseq: ModSeq,
    /// Size of the raw message in octets.
    pub size: usize,
    /// Size of the header section, including the empty line ending it.
    pub header_size: usize,
    /// Cached `ENVELOPE`.
    pub envelope: String,
    /// Cached `BODYSTRUCTURE`.
    pub body_structure: String,
    /// Flags currently set on the message.
    pub flags: Vec<Flag<'static>>,
}

impl IndexRecord {
    /// A record for the given UID with no metadata.
    pub fn new(uid: Uid) -> Self {
        IndexRecord {
            uid,
            ..IndexRecord::default()
        }
    }

    /// Size of the body, after the header section.
    pub fn body_size(&self) -> usize {
        self.size.saturating_sub(self.header_size)
    }
}

/// Server-side mailbox annotations ([RFC 5464](https://tools.ietf.org/html/rfc5464)).
pub trait AnnotationStore {
    /// The value of `entry` on `mailbox`, as seen by the internal user id `userid`, or `None` if
    /// it is not set.
    fn lookup(&self, mailbox: &str, entry: &str, userid: Option<&str>) -> Result<Option<String>>;
}

/// An annotation store without any annotation.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAnnotations;

impl AnnotationStore for NoAnnotations {
    fn lookup(&self, _: &str, _: &str, _: Option<&str>) -> Result<Option<String>> {
        Ok(None)
    }
}
