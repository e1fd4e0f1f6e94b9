//! A single event and the extractors filling its parameters.

use chrono::{DateTime, Utc};
use log::debug;
use std::fs::File;

use crate::content::{content_window, read_window};
use crate::engine::Engine;
use crate::error::Result;
use crate::queue::EventQueue;
use crate::sink::Sink;
use crate::store::{IndexRecord, Mailbox};
use crate::types::{
    EventType, Flag, Param, Params, Quota, QuotaResource, Uid, UidSet, MAILBOX_EVENTS,
    QUOTA_EVENTS, REPORTED_SYSTEM_FLAGS, SINGLE_MESSAGE_EVENTS,
};

/// Whether an event is still to be reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventState {
    /// The event will be dispatched.
    Active,
    /// The event was suppressed after creation and will be dropped silently.
    Cancelled,
}

/// One occurrence of a state change to report.
///
/// An event is created through [`Engine::new_event`] or [`EventQueue::enqueue`], filled by the
/// extractor methods as the operation proceeds, and consumed by dispatch. All extractors are
/// no-ops on a cancelled event, except that [`extract_record`](Event::extract_record) still
/// records the UID.
#[derive(Debug)]
pub struct Event<'e> {
    engine: &'e Engine,
    ty: EventType,
    state: EventState,
    timestamp: Option<DateTime<Utc>>,
    params: Params,
    pub(crate) uids: UidSet,
    pub(crate) old_uids: UidSet,
    pub(crate) message_ids: Vec<String>,
    pub(crate) flag_names: Vec<String>,
    // survives the UID set being folded into the URL
    pub(crate) multiple_messages: bool,
}

impl<'e> Event<'e> {
    pub(crate) fn new(engine: &'e Engine, ty: EventType) -> Self {
        let mut params = Params::new();
        params.fill_int(Param::Pid, u64::from(std::process::id()));
        Event {
            engine,
            ty,
            state: EventState::Active,
            timestamp: engine
                .expected(ty, Param::Timestamp)
                .then(Utc::now),
            params,
            uids: UidSet::new(),
            old_uids: UidSet::new(),
            message_ids: Vec::new(),
            flag_names: Vec::new(),
            multiple_messages: false,
        }
    }

    /// The type this event was created with.
    pub fn event_type(&self) -> EventType {
        self.ty
    }

    /// Whether the event will be dispatched or dropped.
    pub fn state(&self) -> EventState {
        self.state
    }

    /// Whether the event was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.state == EventState::Cancelled
    }

    /// Whether this is an active event of type `ty`.
    pub fn is(&self, ty: EventType) -> bool {
        !self.is_cancelled() && self.ty == ty
    }

    /// Suppress the event: it stays in its queue but nothing is emitted for it.
    pub fn cancel(&mut self) {
        if !self.is_cancelled() {
            debug!("{} event cancelled", self.ty);
            self.state = EventState::Cancelled;
        }
    }

    /// The parameters filled so far.
    pub fn params(&self) -> &Params {
        &self.params
    }

    pub(crate) fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    /// When the event was created, if its type carries a timestamp.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    /// UIDs of the messages the event refers to.
    pub fn uids(&self) -> &UidSet {
        &self.uids
    }

    /// UIDs of the source messages of a copy or move.
    pub fn old_uids(&self) -> &UidSet {
        &self.old_uids
    }

    /// Message ids collected so far, parallel to [`uids`](Event::uids).
    pub fn message_ids(&self) -> &[String] {
        &self.message_ids
    }

    /// Flag names collected so far.
    pub fn flag_names(&self) -> &[String] {
        &self.flag_names
    }

    pub(crate) fn engine(&self) -> &'e Engine {
        self.engine
    }

    fn expects(&self, param: Param) -> bool {
        self.engine.expected(self.ty, param)
    }

    /// Dispatch this event on its own. See [`EventQueue::notify`].
    pub fn notify(self, sink: &mut dyn Sink) -> usize {
        let mut queue = EventQueue::new(self.engine);
        queue.push(self);
        queue.notify(sink)
    }

    /// Record the session an access event belongs to.
    ///
    /// Fills `uri` (and `mailboxID` for mailbox events) from `mailbox`, or with the server URL
    /// when there is no mailbox, then the addresses and the user where they apply. Addresses
    /// are given as `host;port`. A `Logout` without a `userid` is cancelled, since only logouts
    /// following a successful login are reported.
    pub fn set_access(
        &mut self,
        server_addr: Option<&str>,
        client_addr: Option<&str>,
        userid: Option<&str>,
        mailbox: Option<&str>,
    ) {
        if userid.is_none() && self.ty == EventType::Logout {
            debug!("Logout without a userid is not reported");
            self.cancel();
            return;
        }
        if self.is_cancelled() {
            return;
        }

        if !self.params.is_filled(Param::Uri) {
            let url = match mailbox {
                Some(mailbox) => self.engine.mailbox_url(mailbox),
                None => self.engine.server_url(),
            }
            .to_string();
            if MAILBOX_EVENTS.contains(self.ty) {
                self.params.fill_str(Param::MailboxId, url.clone());
            }
            self.params.fill_str(Param::Uri, url);
        }

        if let Some(addr) = server_addr.filter(|_| self.expects(Param::ServerAddress)) {
            self.params.fill_str(Param::ServerAddress, addr);
        }
        if let Some(addr) = client_addr.filter(|_| self.expects(Param::ClientAddress)) {
            self.params.fill_str(Param::ClientAddress, addr);
        }
        if let Some(userid) = userid.filter(|_| self.expects(Param::User)) {
            let user = self.engine.namespace().user_to_external(userid);
            self.params.fill_str(Param::User, user);
        }
    }

    /// Record the subject and new rights of an ACL change.
    pub fn set_acl(&mut self, identifier: &str, rights: &str) {
        if self.is_cancelled() {
            return;
        }
        self.params.fill_str(Param::AclSubject, identifier);
        self.params.fill_str(Param::AclRights, rights);
    }

    /// Add a message to the event.
    ///
    /// `modseq` is only kept while the event refers to a single message. The message id, size,
    /// envelope and body structure are filled where they apply.
    pub fn extract_record(&mut self, mailbox: &dyn Mailbox, record: &IndexRecord) -> Result<()> {
        // looked up first so that a failure leaves the UID and message id lists aligned
        let msgid = if !self.is_cancelled() && self.expects(Param::Midset) {
            Some(mailbox.message_id(record)?.unwrap_or_else(|| "NIL".to_string()))
        } else {
            None
        };

        self.uids.add(record.uid);
        if self.uids.len() > 1 {
            self.multiple_messages = true;
        }

        if self.expects(Param::Modseq) {
            if self.multiple_messages {
                self.params.unfill(Param::Modseq);
            } else {
                self.params.fill_int(Param::Modseq, record.modseq);
            }
        }

        if self.is_cancelled() {
            return Ok(());
        }

        if let Some(msgid) = msgid {
            self.message_ids.push(msgid);
        }
        if self.expects(Param::MessageSize) {
            self.params.fill_int(Param::MessageSize, record.size as u64);
        }
        if self.expects(Param::Envelope) {
            self.params.fill_str(Param::Envelope, record.envelope.as_str());
        }
        if self.expects(Param::BodyStructure) {
            self.params
                .fill_str(Param::BodyStructure, record.body_structure.as_str());
        }
        Ok(())
    }

    /// Add the source UID of a copied or moved message. The first one also records the source
    /// mailbox in `oldMailboxID`.
    pub fn extract_copied_record(&mut self, mailbox: &dyn Mailbox, uid: Uid) {
        if self.is_cancelled() {
            return;
        }
        let first = self.old_uids.is_empty();
        self.old_uids.add(uid);
        if first {
            self.extract_old_mailbox(mailbox);
        }
    }

    /// Fill `messageContent` from the raw message in `content`, according to the configured
    /// inclusion mode.
    pub fn extract_content(&mut self, record: &IndexRecord, content: &File) -> Result<()> {
        if self.is_cancelled() || !self.expects(Param::MessageContent) {
            return Ok(());
        }
        let config = self.engine.config();
        let window =
            match content_window(config.content_inclusion_mode, config.content_size, record) {
                Some(window) => window,
                None => {
                    debug!(
                        "Message {} of {} octets is too large to include",
                        record.uid, record.size
                    );
                    return Ok(());
                }
            };
        let content = read_window(content, window)?;
        self.params.fill_str(Param::MessageContent, content);
        Ok(())
    }

    /// Fill the quota parameters for `resource` from a quota snapshot.
    ///
    /// Only `STORAGE` and `MESSAGE` are reported. For quota events without a URL yet, the URL
    /// of the quota root is used.
    pub fn extract_quota(&mut self, quota: &Quota, resource: &QuotaResource) {
        if self.is_cancelled() {
            return;
        }
        if let Some(usage) = quota.usage(resource) {
            match resource {
                QuotaResource::Storage => {
                    if let Some(limit) = usage.limit.filter(|_| self.expects(Param::DiskQuota)) {
                        self.params.fill_int(Param::DiskQuota, limit);
                    }
                    if self.expects(Param::DiskUsed) {
                        self.params.fill_int(Param::DiskUsed, usage.used_in_units());
                    }
                }
                QuotaResource::Message => {
                    if let Some(limit) = usage.limit {
                        self.params.fill_int(Param::MaxMessages, limit);
                    }
                    self.params.fill_int(Param::Messages, usage.used);
                }
                QuotaResource::Atom(_) => {}
            }
        }

        if !self.params.is_filled(Param::Uri) && QUOTA_EVENTS.contains(self.ty) {
            let url = self.engine.mailbox_url(quota.root()).to_string();
            self.params.fill_str(Param::Uri, url);
        }
    }

    /// Fill `vnd.cmu.unseenMessages`, asking the mailbox when `unseen` is not known.
    pub fn set_unseen(&mut self, mailbox: &dyn Mailbox, unseen: Option<u32>) -> Result<()> {
        if self.is_cancelled() || !self.expects(Param::UnseenMessages) {
            return Ok(());
        }
        let count = match unseen {
            Some(count) => count,
            None => mailbox.count_unseen()?,
        };
        self.params.fill_int(Param::UnseenMessages, u64::from(count));
        Ok(())
    }

    /// Record the mailbox the event happened in.
    ///
    /// Only the first call has an effect. The event is cancelled if notification is disabled
    /// for the mailbox, or if that cannot be determined, in which case the error is returned. For `MessageNew` and `MessageAppend` the URL names the message itself,
    /// and the UID set is dropped.
    pub fn extract_mailbox(&mut self, mailbox: &dyn Mailbox) -> Result<()> {
        if self.is_cancelled() || self.params.is_filled(Param::Uri) {
            return Ok(());
        }
        match self.engine.enabled_for_mailbox(mailbox) {
            Ok(true) => {}
            Ok(false) => {
                self.cancel();
                return Ok(());
            }
            Err(e) => {
                // without a URL the event cannot be reported
                self.cancel();
                return Err(e);
            }
        }

        let mut url = self
            .engine
            .mailbox_url(mailbox.name())
            .uidvalidity(mailbox.uidvalidity());
        if SINGLE_MESSAGE_EVENTS.contains(self.ty) {
            if let Some(uid) = self.uids.first() {
                url = url.uid(uid);
                self.uids.clear();
            }
        }
        let url = url.to_string();

        if MAILBOX_EVENTS.contains(self.ty) {
            self.params.fill_str(Param::MailboxId, url.clone());
        }
        self.params.fill_str(Param::Uri, url);

        if self.expects(Param::Uidnext) {
            self.params
                .fill_int(Param::Uidnext, u64::from(mailbox.last_uid()) + 1);
        }
        // the number of messages in the mailbox, not the message count quota
        if self.expects(Param::Messages) {
            self.params
                .fill_int(Param::Messages, u64::from(mailbox.exists()));
        }
        Ok(())
    }

    /// Record the source mailbox of a copy, move or rename in `oldMailboxID`.
    pub fn extract_old_mailbox(&mut self, mailbox: &dyn Mailbox) {
        if self.is_cancelled() {
            return;
        }
        let url = self
            .engine
            .mailbox_url(mailbox.name())
            .uidvalidity(mailbox.uidvalidity())
            .to_string();
        self.params.fill_str(Param::OldMailboxId, url);
    }

    /// Add the reportable flags of a message, system flags first.
    ///
    /// Excluded flags are skipped, and a flag already present is not added again.
    pub fn add_flags(&mut self, flags: &[Flag<'_>]) {
        if self.is_cancelled() {
            return;
        }
        let system = REPORTED_SYSTEM_FLAGS
            .iter()
            .filter(|f| flags.contains(*f))
            .map(|f| f.to_string());
        let keywords = flags
            .iter()
            .filter(|f| !f.is_system())
            .map(|f| f.to_string());
        for name in system.chain(keywords) {
            if !self.engine.config().is_flag_excluded(&name) {
                self.push_flag(name);
            }
        }
    }

    /// Add a single flag name, for events that report flag names.
    pub fn add_flag(&mut self, flag: &str) {
        if self.is_cancelled() || !self.expects(Param::FlagNames) {
            return;
        }
        self.push_flag(flag.to_string());
    }

    fn push_flag(&mut self, name: String) {
        if !self
            .flag_names
            .iter()
            .any(|f| f.eq_ignore_ascii_case(&name))
        {
            self.flag_names.push(name);
        }
    }
}
