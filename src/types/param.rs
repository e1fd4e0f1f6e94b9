use enumset::EnumSetType;
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Every field a notification can carry, in the order they appear in a payload.
///
/// The declaration order is significant: [`Params`] iterates in this order, and the serialized
/// object follows it.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Param {
    /// `timestamp`: when the event happened.
    Timestamp,
    /// `service`: the service that generated the event.
    Service,
    /// `serverAddress`: `domain;port` of the server the client talked to.
    ServerAddress,
    /// `clientAddress`: `ip;port` of the client.
    ClientAddress,
    /// `oldMailboxID`: URL of the source mailbox of a copy, move or rename.
    OldMailboxId,
    /// `vnd.cmu.oldUidset`: UIDs of the source messages of a copy or move.
    OldUidset,
    /// `mailboxID`: URL of the mailbox, for mailbox events.
    MailboxId,
    /// `uri`: URL of the mailbox or message.
    Uri,
    /// `modseq`: the modification sequence of a single message.
    Modseq,
    /// `diskQuota`: storage quota limit.
    DiskQuota,
    /// `diskUsed`: storage usage.
    DiskUsed,
    /// `maxMessages`: message count quota limit.
    MaxMessages,
    /// `aclSubject`: identifier whose rights changed.
    AclSubject,
    /// `aclRights`: the new rights.
    AclRights,
    /// `messages`: number of messages in the mailbox or quota root.
    Messages,
    /// `vnd.cmu.unseenMessages`: number of unseen messages.
    UnseenMessages,
    /// `uidnext`: the next UID of the mailbox.
    Uidnext,
    /// `uidset`: the affected UIDs.
    Uidset,
    /// `vnd.cmu.midset`: message ids of the affected messages, parallel to `uidset`.
    Midset,
    /// `flagNames`: space separated flag names.
    FlagNames,
    /// `pid`: id of the process that generated the event.
    Pid,
    /// `user`: the authenticated user.
    User,
    /// `messageSize`: size of the message.
    MessageSize,
    /// `vnd.cmu.envelope`: the IMAP `ENVELOPE` of the message.
    Envelope,
    /// `bodyStructure`: the IMAP `BODYSTRUCTURE` of the message.
    BodyStructure,
    /// `messageContent`: (part of) the raw message.
    MessageContent,
}

/// The kind of value a [`Param`] holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    /// A string, serialized as a JSON string.
    String,
    /// An unsigned integer, serialized as a JSON number.
    Integer,
    /// An ordered list of strings, serialized as a JSON array.
    StringArray,
}

impl Param {
    /// All parameters in payload order.
    pub const ALL: [Param; 26] = [
        Param::Timestamp,
        Param::Service,
        Param::ServerAddress,
        Param::ClientAddress,
        Param::OldMailboxId,
        Param::OldUidset,
        Param::MailboxId,
        Param::Uri,
        Param::Modseq,
        Param::DiskQuota,
        Param::DiskUsed,
        Param::MaxMessages,
        Param::AclSubject,
        Param::AclRights,
        Param::Messages,
        Param::UnseenMessages,
        Param::Uidnext,
        Param::Uidset,
        Param::Midset,
        Param::FlagNames,
        Param::Pid,
        Param::User,
        Param::MessageSize,
        Param::Envelope,
        Param::BodyStructure,
        Param::MessageContent,
    ];

    /// The key of this parameter in a payload.
    pub fn name(self) -> &'static str {
        match self {
            Param::Timestamp => "timestamp",
            Param::Service => "service",
            Param::ServerAddress => "serverAddress",
            Param::ClientAddress => "clientAddress",
            Param::OldMailboxId => "oldMailboxID",
            Param::OldUidset => "vnd.cmu.oldUidset",
            Param::MailboxId => "mailboxID",
            Param::Uri => "uri",
            Param::Modseq => "modseq",
            Param::DiskQuota => "diskQuota",
            Param::DiskUsed => "diskUsed",
            Param::MaxMessages => "maxMessages",
            Param::AclSubject => "aclSubject",
            Param::AclRights => "aclRights",
            Param::Messages => "messages",
            Param::UnseenMessages => "vnd.cmu.unseenMessages",
            Param::Uidnext => "uidnext",
            Param::Uidset => "uidset",
            Param::Midset => "vnd.cmu.midset",
            Param::FlagNames => "flagNames",
            Param::Pid => "pid",
            Param::User => "user",
            Param::MessageSize => "messageSize",
            Param::Envelope => "vnd.cmu.envelope",
            Param::BodyStructure => "bodyStructure",
            Param::MessageContent => "messageContent",
        }
    }

    /// The kind of value this parameter holds.
    pub fn kind(self) -> ParamKind {
        match self {
            Param::Modseq
            | Param::DiskQuota
            | Param::DiskUsed
            | Param::MaxMessages
            | Param::Messages
            | Param::UnseenMessages
            | Param::Uidnext
            | Param::Pid
            | Param::MessageSize => ParamKind::Integer,
            Param::Midset => ParamKind::StringArray,
            _ => ParamKind::String,
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Optional parameters that are only computed when turned on in the configuration.
#[derive(EnumSetType, Debug, Hash)]
pub enum ExtraParam {
    /// `timestamp`
    Timestamp,
    /// `service`
    Service,
    /// `clientAddress`
    ClientAddress,
    /// `diskUsed` on `QuotaChange`
    DiskUsed,
    /// `messages` outside of quota threshold events
    Messages,
    /// `modseq`
    Modseq,
    /// `flagNames` on `MessageNew` and `MessageAppend`
    FlagNames,
    /// `uidnext`
    Uidnext,
    /// `messageSize`
    MessageSize,
    /// `bodyStructure`
    BodyStructure,
    /// `messageContent`
    MessageContent,
    /// `vnd.cmu.midset`
    Midset,
    /// `vnd.cmu.unseenMessages`
    UnseenMessages,
    /// `vnd.cmu.envelope`
    Envelope,
}

impl ExtraParam {
    /// The parameter this toggle turns on.
    pub fn param(self) -> Param {
        match self {
            ExtraParam::Timestamp => Param::Timestamp,
            ExtraParam::Service => Param::Service,
            ExtraParam::ClientAddress => Param::ClientAddress,
            ExtraParam::DiskUsed => Param::DiskUsed,
            ExtraParam::Messages => Param::Messages,
            ExtraParam::Modseq => Param::Modseq,
            ExtraParam::FlagNames => Param::FlagNames,
            ExtraParam::Uidnext => Param::Uidnext,
            ExtraParam::MessageSize => Param::MessageSize,
            ExtraParam::BodyStructure => Param::BodyStructure,
            ExtraParam::MessageContent => Param::MessageContent,
            ExtraParam::Midset => Param::Midset,
            ExtraParam::UnseenMessages => Param::UnseenMessages,
            ExtraParam::Envelope => Param::Envelope,
        }
    }
}

impl FromStr for ExtraParam {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let found = enumset::EnumSet::<ExtraParam>::all()
            .iter()
            .find(|extra| extra.param().name() == s);
        found.ok_or_else(|| ConfigError::UnknownParam(s.to_string()))
    }
}

/// The value of a filled parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamValue {
    /// A [`ParamKind::String`] value.
    Str(String),
    /// A [`ParamKind::Integer`] value.
    Int(u64),
    /// A [`ParamKind::StringArray`] value.
    Array(Vec<String>),
}

impl ParamValue {
    /// The string held by this value, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The integer held by this value, if it is one.
    pub fn as_int(&self) -> Option<u64> {
        match *self {
            ParamValue::Int(i) => Some(i),
            _ => None,
        }
    }
}

/// The parameters of one event. A parameter is filled exactly when it has an entry here.
///
/// Each event owns its own `Params`; values are dropped together with the event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Params {
    values: BTreeMap<Param, ParamValue>,
}

impl Params {
    /// An empty table with no parameter filled.
    pub fn new() -> Self {
        Params::default()
    }

    /// Fill a string parameter, replacing any previous value.
    pub fn fill_str(&mut self, param: Param, value: impl Into<String>) {
        debug_assert_eq!(param.kind(), ParamKind::String, "{} is not a string", param);
        self.values.insert(param, ParamValue::Str(value.into()));
    }

    /// Fill an integer parameter, replacing any previous value.
    pub fn fill_int(&mut self, param: Param, value: u64) {
        debug_assert_eq!(param.kind(), ParamKind::Integer, "{} is not an integer", param);
        self.values.insert(param, ParamValue::Int(value));
    }

    /// Fill a string array parameter, replacing any previous value.
    pub fn fill_array(&mut self, param: Param, value: Vec<String>) {
        debug_assert_eq!(param.kind(), ParamKind::StringArray, "{} is not an array", param);
        self.values.insert(param, ParamValue::Array(value));
    }

    /// Mark a parameter as not filled, releasing its value.
    pub fn unfill(&mut self, param: Param) -> Option<ParamValue> {
        self.values.remove(&param)
    }

    /// Whether the parameter has been filled.
    pub fn is_filled(&self, param: Param) -> bool {
        self.values.contains_key(&param)
    }

    /// The value of a filled parameter.
    pub fn get(&self, param: Param) -> Option<&ParamValue> {
        self.values.get(&param)
    }

    /// Number of filled parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no parameter is filled.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Filled parameters in payload order.
    pub fn iter(&self) -> btree_map::Iter<'_, Param, ParamValue> {
        self.values.iter()
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a Param, &'a ParamValue);
    type IntoIter = btree_map::Iter<'a, Param, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_order_matches_declaration() {
        let mut sorted = Param::ALL;
        sorted.sort();
        assert_eq!(sorted, Param::ALL);
        assert_eq!(Param::ALL[0].name(), "timestamp");
        assert_eq!(Param::ALL[25].name(), "messageContent");
    }

    #[test]
    fn iterates_in_table_order() {
        let mut params = Params::new();
        params.fill_int(Param::Pid, 42);
        params.fill_str(Param::Uri, "imap://localhost/INBOX");
        params.fill_str(Param::Timestamp, "now");
        let order: Vec<_> = params.iter().map(|(p, _)| p.name()).collect();
        assert_eq!(order, vec!["timestamp", "uri", "pid"]);
    }

    #[test]
    fn unfill_releases() {
        let mut params = Params::new();
        params.fill_int(Param::Modseq, 7);
        assert!(params.is_filled(Param::Modseq));
        assert_eq!(params.unfill(Param::Modseq), Some(ParamValue::Int(7)));
        assert!(!params.is_filled(Param::Modseq));
        assert!(params.is_empty());
    }

    #[test]
    fn extra_params_by_name() {
        assert_eq!("vnd.cmu.midset".parse::<ExtraParam>(), Ok(ExtraParam::Midset));
        assert_eq!("modseq".parse::<ExtraParam>(), Ok(ExtraParam::Modseq));
        assert!("uri".parse::<ExtraParam>().is_err());
    }
}
