use enumset::{enum_set, EnumSet, EnumSetType};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// The kinds of events a mail store reports, as listed in [RFC 5423 section
/// 4](https://tools.ietf.org/html/rfc5423#section-4), plus the `vnd.cmu` copy and move
/// extensions.
///
/// One event carries exactly one type. Types are grouped into overlapping sets (see the
/// `*_EVENTS` constants) that drive both enabling and parameter expectations.
#[derive(EnumSetType, Debug, Hash, PartialOrd, Ord)]
pub enum EventType {
    /// A message was appended to a mailbox by a client (`APPEND`, `COPY` target, ...).
    MessageAppend,
    /// A message expired and was removed.
    MessageExpire,
    /// A message was expunged.
    MessageExpunge,
    /// A message was delivered.
    MessageNew,
    /// `vnd.cmu.MessageCopy`: messages were copied from another mailbox.
    MessageCopy,
    /// `vnd.cmu.MessageMove`: messages were moved from another mailbox.
    MessageMove,
    /// An operation failed because it would exceed a quota.
    QuotaExceed,
    /// Usage went back under a quota.
    QuotaWithin,
    /// A quota limit was changed.
    QuotaChange,
    /// `\Seen` was set on messages.
    MessageRead,
    /// `\Deleted` was set on messages.
    MessageTrash,
    /// Flags were set on messages.
    FlagsSet,
    /// Flags were cleared from messages.
    FlagsClear,
    /// A user logged in.
    Login,
    /// A user logged out.
    Logout,
    /// A mailbox was created.
    MailboxCreate,
    /// A mailbox was deleted.
    MailboxDelete,
    /// A mailbox was renamed.
    MailboxRename,
    /// A mailbox was subscribed to.
    MailboxSubscribe,
    /// A mailbox was unsubscribed from.
    MailboxUnsubscribe,
    /// The access control list of a mailbox changed.
    AclChange,
}

/// Events about messages entering or leaving a mailbox.
pub const MESSAGE_EVENTS: EnumSet<EventType> = enum_set!(
    EventType::MessageAppend
        | EventType::MessageExpire
        | EventType::MessageExpunge
        | EventType::MessageNew
        | EventType::MessageCopy
        | EventType::MessageMove
);

/// Events about message flag changes.
pub const FLAGS_EVENTS: EnumSet<EventType> = enum_set!(
    EventType::FlagsSet | EventType::FlagsClear | EventType::MessageRead | EventType::MessageTrash
);

/// Events about a mailbox as a whole.
pub const MAILBOX_EVENTS: EnumSet<EventType> = enum_set!(
    EventType::MailboxCreate
        | EventType::MailboxDelete
        | EventType::MailboxRename
        | EventType::AclChange
);

/// Subscription changes.
pub const SUBSCRIPTION_EVENTS: EnumSet<EventType> =
    enum_set!(EventType::MailboxSubscribe | EventType::MailboxUnsubscribe);

/// Quota threshold crossings and limit changes.
pub const QUOTA_EVENTS: EnumSet<EventType> =
    enum_set!(EventType::QuotaExceed | EventType::QuotaWithin | EventType::QuotaChange);

/// Session access events, together with ACL changes.
pub const ACCESS_EVENTS: EnumSet<EventType> =
    enum_set!(EventType::Login | EventType::Logout | EventType::AclChange);

/// Events which refer to one or more messages of a mailbox.
pub const MESSAGE_OR_FLAGS_EVENTS: EnumSet<EventType> = enum_set!(
    EventType::MessageAppend
        | EventType::MessageExpire
        | EventType::MessageExpunge
        | EventType::MessageNew
        | EventType::MessageCopy
        | EventType::MessageMove
        | EventType::FlagsSet
        | EventType::FlagsClear
        | EventType::MessageRead
        | EventType::MessageTrash
);

/// Events which report a single message through a URL carrying its UID.
pub const SINGLE_MESSAGE_EVENTS: EnumSet<EventType> =
    enum_set!(EventType::MessageNew | EventType::MessageAppend);

impl EventType {
    /// The name of this event type in a notification payload.
    pub fn name(self) -> &'static str {
        match self {
            EventType::MessageAppend => "MessageAppend",
            EventType::MessageExpire => "MessageExpire",
            EventType::MessageExpunge => "MessageExpunge",
            EventType::MessageNew => "MessageNew",
            EventType::MessageCopy => "vnd.cmu.MessageCopy",
            EventType::MessageMove => "vnd.cmu.MessageMove",
            EventType::QuotaExceed => "QuotaExceed",
            EventType::QuotaWithin => "QuotaWithin",
            EventType::QuotaChange => "QuotaChange",
            EventType::MessageRead => "MessageRead",
            EventType::MessageTrash => "MessageTrash",
            EventType::FlagsSet => "FlagsSet",
            EventType::FlagsClear => "FlagsClear",
            EventType::Login => "Login",
            EventType::Logout => "Logout",
            EventType::MailboxCreate => "MailboxCreate",
            EventType::MailboxDelete => "MailboxDelete",
            EventType::MailboxRename => "MailboxRename",
            EventType::MailboxSubscribe => "MailboxSubscribe",
            EventType::MailboxUnsubscribe => "MailboxUnSubscribe",
            EventType::AclChange => "AclChange",
        }
    }

    /// Whether this type belongs to the given set of types.
    pub fn is_in(self, set: EnumSet<EventType>) -> bool {
        set.contains(self)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Coarse categories of events that can be turned on as a whole.
#[derive(EnumSetType, Debug, Hash)]
pub enum EventGroup {
    /// `MessageAppend`, `MessageExpire`, `MessageExpunge`, `MessageNew` and the copy/move
    /// extensions.
    Message,
    /// `QuotaExceed`, `QuotaWithin` and `QuotaChange`.
    Quota,
    /// `FlagsSet`, `FlagsClear`, `MessageRead` and `MessageTrash`.
    Flags,
    /// `Login`, `Logout` and `AclChange`.
    Access,
    /// `MailboxSubscribe` and `MailboxUnSubscribe`.
    Subscription,
    /// `MailboxCreate`, `MailboxDelete`, `MailboxRename` and `AclChange`.
    Mailbox,
}

impl EventGroup {
    /// The event types turned on by this group.
    pub fn events(self) -> EnumSet<EventType> {
        match self {
            EventGroup::Message => MESSAGE_EVENTS,
            EventGroup::Quota => QUOTA_EVENTS,
            EventGroup::Flags => FLAGS_EVENTS,
            EventGroup::Access => ACCESS_EVENTS,
            EventGroup::Subscription => SUBSCRIPTION_EVENTS,
            EventGroup::Mailbox => MAILBOX_EVENTS,
        }
    }
}

impl FromStr for EventGroup {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "message" => Ok(EventGroup::Message),
            "quota" => Ok(EventGroup::Quota),
            "flags" => Ok(EventGroup::Flags),
            "access" => Ok(EventGroup::Access),
            "subscription" => Ok(EventGroup::Subscription),
            "mailbox" => Ok(EventGroup::Mailbox),
            _ => Err(ConfigError::UnknownGroup(s.to_string())),
        }
    }
}
