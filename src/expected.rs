//! Which parameters apply to which event types.
//!
//! [`expected`] is consulted before computing a parameter, so that nothing is looked up for a
//! field that will not be sent, and again at dispatch to verify that nothing required is missing.

use crate::config::Config;
use crate::types::{
    EventType, ExtraParam, Param, MAILBOX_EVENTS, MESSAGE_OR_FLAGS_EVENTS, QUOTA_EVENTS,
    SINGLE_MESSAGE_EVENTS,
};
use enumset::enum_set;

/// Whether `param` applies to an event of type `ty` under `config`.
///
/// This only reads `config.extra_params`; the result for a given configuration never changes.
pub fn expected(config: &Config, ty: EventType, param: Param) -> bool {
    use EventType::*;

    let extra = |toggle: ExtraParam| config.extra_params.contains(toggle);
    let is = |set: enumset::EnumSet<EventType>| set.contains(ty);

    match param {
        Param::BodyStructure => extra(ExtraParam::BodyStructure) && is(SINGLE_MESSAGE_EVENTS),
        Param::Envelope => extra(ExtraParam::Envelope) && is(SINGLE_MESSAGE_EVENTS),
        Param::MessageContent => extra(ExtraParam::MessageContent) && is(SINGLE_MESSAGE_EVENTS),
        Param::MessageSize => extra(ExtraParam::MessageSize) && is(SINGLE_MESSAGE_EVENTS),
        Param::ClientAddress => extra(ExtraParam::ClientAddress) && is(enum_set!(Login | Logout)),
        Param::ServerAddress => is(enum_set!(Login | Logout)),
        Param::DiskQuota | Param::MaxMessages => is(QUOTA_EVENTS),
        // quota usage is not known on message events
        Param::DiskUsed => {
            is(enum_set!(QuotaExceed | QuotaWithin))
                || (extra(ExtraParam::DiskUsed) && ty == QuotaChange)
        }
        Param::FlagNames => {
            is(enum_set!(FlagsSet | FlagsClear))
                || (extra(ExtraParam::FlagNames) && is(SINGLE_MESSAGE_EVENTS))
        }
        Param::MailboxId => is(MAILBOX_EVENTS),
        Param::OldMailboxId => is(enum_set!(MessageCopy | MessageMove | MailboxRename)),
        Param::OldUidset => is(enum_set!(MessageCopy | MessageMove)),
        Param::Service => extra(ExtraParam::Service),
        Param::Timestamp => extra(ExtraParam::Timestamp),
        Param::AclSubject | Param::AclRights => ty == AclChange,
        Param::User => is(enum_set!(MailboxSubscribe | MailboxUnsubscribe | Login | Logout)),
        Param::Uri | Param::Pid => true,
        Param::Messages => {
            is(enum_set!(QuotaExceed | QuotaWithin))
                || (extra(ExtraParam::Messages) && is(MESSAGE_OR_FLAGS_EVENTS))
        }
        Param::Modseq => extra(ExtraParam::Modseq) && is(MESSAGE_OR_FLAGS_EVENTS),
        Param::Uidnext => extra(ExtraParam::Uidnext) && is(MESSAGE_OR_FLAGS_EVENTS),
        Param::Midset => extra(ExtraParam::Midset) && is(MESSAGE_OR_FLAGS_EVENTS),
        Param::UnseenMessages => extra(ExtraParam::UnseenMessages) && is(MESSAGE_OR_FLAGS_EVENTS),
        // New and Append carry their UID in the URI instead
        Param::Uidset => !is(SINGLE_MESSAGE_EVENTS) && is(MESSAGE_OR_FLAGS_EVENTS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enumset::EnumSet;

    fn expected_params(config: &Config, ty: EventType) -> Vec<&'static str> {
        Param::ALL
            .iter()
            .filter(|&&p| expected(config, ty, p))
            .map(|p| p.name())
            .collect()
    }

    #[test]
    fn minimal_message_new() {
        let config = Config::new("log");
        assert_eq!(expected_params(&config, EventType::MessageNew), vec!["uri", "pid"]);
    }

    #[test]
    fn flags_set() {
        let config = Config::new("log");
        assert_eq!(
            expected_params(&config, EventType::FlagsSet),
            vec!["uri", "uidset", "flagNames", "pid"]
        );
        assert_eq!(
            expected_params(&config, EventType::MessageTrash),
            vec!["uri", "uidset", "pid"]
        );
    }

    #[test]
    fn login() {
        let config = Config::new("log").extra_param(ExtraParam::ClientAddress);
        assert_eq!(
            expected_params(&config, EventType::Login),
            vec!["serverAddress", "clientAddress", "uri", "pid", "user"]
        );
    }

    #[test]
    fn quota() {
        let config = Config::new("log");
        assert_eq!(
            expected_params(&config, EventType::QuotaExceed),
            vec!["uri", "diskQuota", "diskUsed", "maxMessages", "messages", "pid"]
        );
        assert_eq!(
            expected_params(&config, EventType::QuotaChange),
            vec!["uri", "diskQuota", "maxMessages", "pid"]
        );
        let config = config.extra_param(ExtraParam::DiskUsed);
        assert!(expected(&config, EventType::QuotaChange, Param::DiskUsed));
        assert!(!expected(&config, EventType::MessageAppend, Param::DiskUsed));
    }

    #[test]
    fn toggles_only_apply_to_their_events() {
        let mut config = Config::new("log");
        config.extra_params = EnumSet::all();
        assert!(expected(&config, EventType::MessageCopy, Param::Modseq));
        assert!(!expected(&config, EventType::Login, Param::Modseq));
        assert!(!expected(&config, EventType::MailboxCreate, Param::Midset));
        assert!(expected(&config, EventType::MessageNew, Param::MessageContent));
        assert!(!expected(&config, EventType::MessageCopy, Param::MessageContent));
        assert!(expected(&config, EventType::MessageAppend, Param::FlagNames));
        assert!(expected(&config, EventType::Logout, Param::Timestamp));
        assert!(!expected(&config, EventType::MessageNew, Param::Uidset));
        assert!(expected(&config, EventType::MessageExpunge, Param::Uidset));
    }

    #[test]
    fn acl_and_mailbox() {
        let config = Config::new("log");
        assert_eq!(
            expected_params(&config, EventType::AclChange),
            vec!["mailboxID", "uri", "aclSubject", "aclRights", "pid"]
        );
        assert_eq!(
            expected_params(&config, EventType::MailboxRename),
            vec!["oldMailboxID", "mailboxID", "uri", "pid"]
        );
        assert_eq!(
            expected_params(&config, EventType::MailboxSubscribe),
            vec!["uri", "pid", "user"]
        );
    }

    #[test]
    fn repeated_calls_agree() {
        let mut config = Config::new("log");
        config.extra_params = ExtraParam::Modseq | ExtraParam::Uidnext;
        for ty in EnumSet::<EventType>::all() {
            for param in Param::ALL {
                assert_eq!(expected(&config, ty, param), expected(&config, ty, param));
            }
        }
    }
}
