//! Turning events into payloads.
//!
//! For each event of a queue, dispatch:
//!
//! 1. drops it if it was cancelled, if it is a message or flags event that never got a message
//!    (a URL with a UID for `MessageNew`/`MessageAppend`, a UID otherwise), or if it is a quota
//!    event without any limit;
//! 2. fills `service`, `timestamp`, `uidset`, `vnd.cmu.midset` and `vnd.cmu.oldUidset`;
//! 3. derives the reported type: a `FlagsSet` including `\Deleted` is first reported as
//!    `MessageTrash`, then one including `\Seen` as `MessageRead`, and any remaining flags as a
//!    `FlagsSet` carrying them in `flagNames`;
//! 4. checks that every expected parameter is there, and sends the payload.

use chrono::SecondsFormat;
use log::{debug, error, warn};

use crate::config::ContentInclusionMode;
use crate::error::MissingParameters;
use crate::event::Event;
use crate::format::to_json;
use crate::sink::{Sink, EVENT_CLASS};
use crate::types::{
    EventType, Param, MESSAGE_OR_FLAGS_EVENTS, QUOTA_EVENTS, SINGLE_MESSAGE_EVENTS,
};

/// Why an event is dropped without a payload.
fn skip_reason(event: &Event<'_>) -> Option<&'static str> {
    let ty = event.event_type();
    let params = event.params();
    if event.is_cancelled() {
        return Some("cancelled");
    }
    if MESSAGE_OR_FLAGS_EVENTS.contains(ty) {
        if SINGLE_MESSAGE_EVENTS.contains(ty) {
            if !params.is_filled(Param::Uri) {
                return Some("no message URL");
            }
        } else if event.uids.is_empty() {
            return Some("no message");
        }
    }
    // other resources are not covered by RFC 5423
    if QUOTA_EVENTS.contains(ty)
        && !params.is_filled(Param::DiskQuota)
        && !params.is_filled(Param::MaxMessages)
    {
        return Some("no quota limit");
    }
    None
}

fn finalize(event: &mut Event<'_>) {
    let ty = event.event_type();
    let engine = event.engine();

    if engine.expected(ty, Param::Service) {
        let service = engine.config().service.clone();
        event.params_mut().fill_str(Param::Service, service);
    }
    if engine.expected(ty, Param::Timestamp) {
        if let Some(ts) = event.timestamp() {
            let ts = ts.to_rfc3339_opts(SecondsFormat::Millis, false);
            event.params_mut().fill_str(Param::Timestamp, ts);
        }
    }
    if !event.uids.is_empty() {
        let uidset = event.uids.to_string();
        event.params_mut().fill_str(Param::Uidset, uidset);
    }
    if !event.message_ids.is_empty() {
        let midset = event.message_ids.clone();
        event.params_mut().fill_array(Param::Midset, midset);
    }
    if !event.old_uids.is_empty() {
        let old_uidset = event.old_uids.to_string();
        event.params_mut().fill_str(Param::OldUidset, old_uidset);
    }
}

fn position(flags: &[String], name: &str) -> Option<usize> {
    flags.iter().position(|f| f == name)
}

/// Pick the type of the next payload of `event`, consuming the flag it is derived from.
fn derive_type(event: &mut Event<'_>) -> EventType {
    let ty = event.event_type();
    if ty != EventType::FlagsSet {
        return ty;
    }
    if let Some(i) = position(&event.flag_names, "\\Deleted") {
        event.flag_names.remove(i);
        EventType::MessageTrash
    } else if let Some(i) = position(&event.flag_names, "\\Seen") {
        event.flag_names.remove(i);
        EventType::MessageRead
    } else {
        ty
    }
}

/// Check that every parameter expected for `ty` is filled on `event`.
///
/// `ty` is the reported type, which may differ from the type the event was created with.
/// Quota limits and usages come in pairs of which one is enough, `flagNames` is optional on
/// `MessageNew` and `MessageAppend`, `messageContent` may be left out in standard inclusion
/// mode, and `modseq` is dropped once an event refers to several messages.
pub fn check_complete(event: &Event<'_>, ty: EventType) -> Result<(), MissingParameters> {
    let engine = event.engine();
    let params = event.params();
    let missing: Vec<&'static str> = Param::ALL
        .iter()
        .filter(|&&param| engine.expected(ty, param) && !params.is_filled(param))
        .filter(|&&param| match param {
            Param::DiskQuota => !params.is_filled(Param::MaxMessages),
            Param::MaxMessages => !params.is_filled(Param::DiskQuota),
            Param::DiskUsed => !params.is_filled(Param::Messages),
            Param::Messages => !params.is_filled(Param::DiskUsed),
            Param::FlagNames => !SINGLE_MESSAGE_EVENTS.contains(ty),
            Param::MessageContent => {
                engine.config().content_inclusion_mode != ContentInclusionMode::Standard
            }
            Param::Modseq => !event.multiple_messages,
            _ => true,
        })
        .map(|param| param.name())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(MissingParameters {
            event: ty.name(),
            params: missing,
        })
    }
}

fn send(event: &Event<'_>, ty: EventType, sink: &mut dyn Sink) -> bool {
    let config = event.engine().config();

    if let Err(missing) = check_complete(event, ty) {
        error!("{}", missing);
        if config.verify {
            panic!("{}", missing);
        }
    }

    let payload = match to_json(ty, event.params()) {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Cannot format {} event: {}", ty, e);
            return false;
        }
    };
    debug!("Sending {} event: {}", ty, payload);

    let method = config.notifier.as_deref().unwrap_or_default();
    match sink.notify(method, EVENT_CLASS, &payload) {
        Ok(()) => true,
        Err(e) => {
            warn!("Notification of {} event failed: {}", ty, e);
            false
        }
    }
}

/// Send the payloads of one event. Returns how many the sink accepted.
pub(crate) fn dispatch(mut event: Event<'_>, sink: &mut dyn Sink) -> usize {
    if let Some(reason) = skip_reason(&event) {
        debug!("Not sending {} event: {}", event.event_type(), reason);
        return 0;
    }

    finalize(&mut event);

    let mut sent = 0;
    loop {
        let ty = derive_type(&mut event);

        if !event.flag_names.is_empty() {
            match ty {
                // the remaining flags go into a later FlagsSet payload
                EventType::MessageTrash | EventType::MessageRead
                    if event.event_type() == EventType::FlagsSet => {}
                EventType::MessageTrash | EventType::MessageRead => event.flag_names.clear(),
                _ => {
                    let names = event.flag_names.join(" ");
                    event.params_mut().fill_str(Param::FlagNames, names);
                    event.flag_names.clear();
                }
            }
        }

        if send(&event, ty, sink) {
            sent += 1;
        }

        if event.flag_names.is_empty() {
            break;
        }
    }
    sent
}
