use log::debug;
use std::fmt;

use crate::config::Config;
use crate::error::Result;
use crate::event::Event;
use crate::expected::expected;
use crate::imap_url::ImapUrl;
use crate::namespace::{Namespace, StandardNamespace};
use crate::queue::EventQueue;
use crate::store::{AnnotationStore, Mailbox, NoAnnotations, SPECIALUSE_ANNOTATION};
use crate::types::{EventType, Param};

/// The notification engine: the configuration together with the collaborators needed to name
/// mailboxes.
///
/// One `Engine` is built at startup and shared, usually behind an `Arc`, by every session. It is
/// never mutated afterwards; events and queues borrow it.
///
/// # Examples
///
/// ```
/// use imap_notify::{Config, Engine, EventGroup, EventType};
///
/// let engine = Engine::new(Config::new("log").group(EventGroup::Mailbox));
/// assert!(engine.new_event(EventType::MailboxCreate).is_some());
/// // the group is not enabled
/// assert!(engine.new_event(EventType::Login).is_none());
/// ```
pub struct Engine {
    config: Config,
    namespace: Box<dyn Namespace + Send + Sync>,
    annotations: Box<dyn AnnotationStore + Send + Sync>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// An engine using the [`StandardNamespace`] with `.` as separator, and no annotations.
    pub fn new(config: Config) -> Self {
        Engine {
            config,
            namespace: Box::new(StandardNamespace::default()),
            annotations: Box::new(NoAnnotations),
        }
    }

    /// Use `namespace` to translate mailbox names.
    pub fn with_namespace<N>(mut self, namespace: N) -> Self
    where
        N: Namespace + Send + Sync + 'static,
    {
        self.namespace = Box::new(namespace);
        self
    }

    /// Use `annotations` to look up special-use attributes.
    pub fn with_annotations<A>(mut self, annotations: A) -> Self
    where
        A: AnnotationStore + Send + Sync + 'static,
    {
        self.annotations = Box::new(annotations);
        self
    }

    /// The configuration this engine was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The namespace used to build URLs.
    pub fn namespace(&self) -> &dyn Namespace {
        &*self.namespace
    }

    /// Whether `param` applies to events of type `ty`. See [`expected`].
    pub fn expected(&self, ty: EventType, param: Param) -> bool {
        expected(&self.config, ty, param)
    }

    /// Create an event of type `ty`.
    ///
    /// Returns `None` when notification is turned off, or when no enabled group contains `ty`.
    /// Every operation taking an `Option<Event>` treats `None` as a no-op, so callers need not
    /// check.
    pub fn new_event(&self, ty: EventType) -> Option<Event<'_>> {
        if !self.config.is_enabled() || !self.config.enabled_events().contains(ty) {
            return None;
        }
        Some(Event::new(self, ty))
    }

    /// Start an empty queue of events for one operation.
    pub fn queue(&self) -> EventQueue<'_> {
        EventQueue::new(self)
    }

    /// Whether events on `mailbox` are reported at all.
    ///
    /// When `ALL` is among the excluded special-use attributes, only personal INBOXes are
    /// reported. Otherwise the mailbox is suppressed if one of its special-use attributes is
    /// excluded.
    pub fn enabled_for_mailbox(&self, mailbox: &dyn Mailbox) -> Result<bool> {
        let name = mailbox.name();
        if self.config.subfolders_disabled() && !self.namespace.is_user_inbox(name) {
            debug!("Notification disabled for sub-folder {}", name);
            return Ok(false);
        }

        if self.config.exclude_specialuse.is_empty() {
            return Ok(true);
        }

        let userid = self.namespace.userid(name);
        let attributes =
            self.annotations
                .lookup(name, SPECIALUSE_ANNOTATION, userid.as_deref())?;
        let excluded = attributes.as_deref().unwrap_or("").split_whitespace().find(|attr| {
            self.config
                .exclude_specialuse
                .iter()
                .any(|excluded| excluded == attr)
        });
        if let Some(attr) = excluded {
            debug!("Notification disabled for {} mailbox {}", attr, name);
            return Ok(false);
        }
        Ok(true)
    }

    /// The URL of an internal mailbox name, relative to its owner.
    pub(crate) fn mailbox_url(&self, mailbox: &str) -> ImapUrl {
        let mut url = ImapUrl::new(self.config.server_name.clone())
            .mailbox(self.namespace.to_external(mailbox));
        if let Some(owner) = self.namespace.owner(mailbox) {
            url = url.user(owner);
        }
        url
    }

    /// The URL of the server alone.
    pub(crate) fn server_url(&self) -> ImapUrl {
        ImapUrl::new(self.config.server_name.clone())
    }
}
