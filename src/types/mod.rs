//! Value types shared by the notification engine: event types, parameters, flags, UID sets and
//! quota snapshots.

pub use enumset::EnumSet;

/// From section [2.3.1.1 of RFC 3501](https://tools.ietf.org/html/rfc3501#section-2.3.1.1).
///
/// A 32-bit value assigned to each message, which when used with the unique identifier validity
/// value forms a 64-bit value that will not refer to any other message in the mailbox or any
/// subsequent mailbox with the same name forever. Unique identifiers are assigned in a strictly
/// ascending fashion in the mailbox.
pub type Uid = u32;

/// The `UIDVALIDITY` of a mailbox, which together with a [`Uid`] names one message forever.
pub type UidValidity = u32;

/// A mod-sequence value from [CONDSTORE](https://tools.ietf.org/html/rfc7162).
pub type ModSeq = u64;

mod event_type;
pub use self::event_type::{
    EventGroup, EventType, ACCESS_EVENTS, FLAGS_EVENTS, MAILBOX_EVENTS, MESSAGE_EVENTS,
    MESSAGE_OR_FLAGS_EVENTS, QUOTA_EVENTS, SINGLE_MESSAGE_EVENTS, SUBSCRIPTION_EVENTS,
};

mod flag;
pub use self::flag::Flag;
pub(crate) use self::flag::REPORTED_SYSTEM_FLAGS;

mod param;
pub use self::param::{ExtraParam, Param, ParamKind, ParamValue, Params};

mod quota;
pub use self::quota::{Quota, QuotaResource, QuotaUsage};

mod uid_set;
pub use self::uid_set::UidSet;
