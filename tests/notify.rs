extern crate imap_notify;

use imap_notify::store::{IndexRecord, SPECIALUSE_ANNOTATION};
use imap_notify::testing::{MemoryAnnotations, MemoryMailbox, RecordingSink};
use imap_notify::types::{Flag, Quota, QuotaResource};
use imap_notify::{
    Config, ContentInclusionMode, Engine, EventGroup, EventType, ExtraParam, StandardNamespace,
};
use serde_json::Value;
use std::io::Write;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn engine(config: Config) -> Engine {
    Engine::new(config.server_name("mail.example.com").verify(true))
        .with_namespace(StandardNamespace::new('/'))
}

fn payloads(sink: &RecordingSink) -> Vec<Value> {
    sink.messages()
        .into_iter()
        .map(|m| serde_json::from_str(m).unwrap())
        .collect()
}

#[test]
fn store_flags_transaction() {
    init_logger();
    let engine = engine(
        Config::new("log")
            .group(EventGroup::Flags)
            .extra_param(ExtraParam::UnseenMessages),
    );
    let inbox = MemoryMailbox::new("user.bob").uidvalidity(5).unseen(2);

    // STORE 1:2 +FLAGS (\Flagged) -FLAGS (\Seen)
    let mut queue = engine.queue();
    let set = queue.enqueue(EventType::FlagsSet);
    let clear = queue.enqueue(EventType::FlagsClear);
    for uid in 1..=2 {
        let record = IndexRecord::new(uid);
        if let Some(event) = queue.get_mut(set) {
            event.add_flag("\\Flagged");
            event.extract_record(&inbox, &record).unwrap();
        }
        if let Some(event) = queue.get_mut(clear) {
            event.add_flag("\\Seen");
            event.extract_record(&inbox, &record).unwrap();
        }
    }
    for handle in [set, clear] {
        if let Some(event) = queue.get_mut(handle) {
            event.extract_mailbox(&inbox).unwrap();
            event.set_unseen(&inbox, None).unwrap();
        }
    }

    let mut sink = RecordingSink::new();
    assert_eq!(queue.notify(&mut sink), 2);
    let sent = payloads(&sink);

    assert_eq!(sent[0]["event"], "FlagsClear");
    assert_eq!(sent[0]["flagNames"], "\\Seen");
    assert_eq!(sent[1]["event"], "FlagsSet");
    assert_eq!(sent[1]["flagNames"], "\\Flagged");
    for payload in &sent {
        assert_eq!(payload["uri"], "imap://bob@mail.example.com/INBOX;UIDVALIDITY=5");
        assert_eq!(payload["uidset"], "1:2");
        assert_eq!(payload["vnd.cmu.unseenMessages"], 2);
    }
    assert!(sink.notifications().iter().all(|n| n.method == "log" && n.class == "EVENT"));
}

#[test]
fn trash_read_and_remaining_flags() {
    init_logger();
    let engine = engine(Config::new("log").group(EventGroup::Flags));
    let inbox = MemoryMailbox::new("user.bob");
    let mut queue = engine.queue();
    let set = queue.enqueue(EventType::FlagsSet);
    if let Some(event) = queue.get_mut(set) {
        let record = IndexRecord {
            flags: Flag::from_strs(["custom", "\\Seen", "\\Deleted"]).collect(),
            ..IndexRecord::new(12)
        };
        event.add_flags(&record.flags);
        event.extract_record(&inbox, &record).unwrap();
        event.extract_mailbox(&inbox).unwrap();
    }

    let mut sink = RecordingSink::new();
    assert_eq!(queue.notify(&mut sink), 3);
    let sent = payloads(&sink);
    let events: Vec<_> = sent.iter().map(|p| p["event"].as_str().unwrap()).collect();
    assert_eq!(events, ["MessageTrash", "MessageRead", "FlagsSet"]);
    assert!(sent[0].get("flagNames").is_none());
    assert!(sent[1].get("flagNames").is_none());
    assert_eq!(sent[2]["flagNames"], "custom");
}

#[test]
fn new_message_delivery() {
    init_logger();
    let engine = engine(
        Config::new("log")
            .group(EventGroup::Message)
            .extra_param(ExtraParam::MessageSize)
            .extra_param(ExtraParam::Envelope)
            .extra_param(ExtraParam::BodyStructure)
            .extra_param(ExtraParam::MessageContent)
            .extra_param(ExtraParam::Midset)
            .content(ContentInclusionMode::Header, 0),
    );
    let inbox = MemoryMailbox::new("user.bob")
        .uidvalidity(99)
        .last_uid(3)
        .message_id(3, "<m3@example.com>");

    let raw = b"From: a@example.com\r\n\r\nHello\r\n";
    let mut file = tempfile::tempfile().unwrap();
    file.write_all(raw).unwrap();
    let record = IndexRecord {
        size: raw.len(),
        header_size: 23,
        envelope: "(NIL \"hi\")".to_string(),
        body_structure: "(\"TEXT\" \"PLAIN\")".to_string(),
        ..IndexRecord::new(3)
    };

    let mut queue = engine.queue();
    let new = queue.enqueue(EventType::MessageNew);
    if let Some(event) = queue.get_mut(new) {
        event.extract_record(&inbox, &record).unwrap();
        event.extract_content(&record, &file).unwrap();
        event.extract_mailbox(&inbox).unwrap();
    }

    let mut sink = RecordingSink::new();
    assert_eq!(queue.notify(&mut sink), 1);
    let payload = &payloads(&sink)[0];
    let keys: Vec<_> = payload.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        [
            "event",
            "uri",
            "vnd.cmu.midset",
            "pid",
            "messageSize",
            "vnd.cmu.envelope",
            "bodyStructure",
            "messageContent"
        ]
    );
    assert_eq!(
        payload["uri"],
        "imap://bob@mail.example.com/INBOX;UIDVALIDITY=99/;UID=3"
    );
    assert_eq!(payload["vnd.cmu.midset"], serde_json::json!(["<m3@example.com>"]));
    assert_eq!(payload["messageSize"], raw.len());
    assert_eq!(payload["messageContent"], "From: a@example.com\r\n\r\n");
}

#[test]
fn anonymous_logout_is_not_reported() {
    init_logger();
    let engine = engine(Config::new("log").group(EventGroup::Access));
    let mut queue = engine.queue();
    let logout = queue.enqueue(EventType::Logout);
    if let Some(event) = queue.get_mut(logout) {
        event.set_access(Some("mail.example.com;143"), Some("192.0.2.1;40000"), None, None);
    }
    assert_eq!(queue.len(), 1);

    let mut sink = RecordingSink::new();
    assert_eq!(queue.notify(&mut sink), 0);
    assert!(sink.messages().is_empty());
}

#[test]
fn login_is_reported_with_addresses() {
    init_logger();
    let engine = engine(
        Config::new("log")
            .group(EventGroup::Access)
            .extra_param(ExtraParam::ClientAddress),
    );
    let mut queue = engine.queue();
    let login = queue.enqueue(EventType::Login);
    if let Some(event) = queue.get_mut(login) {
        event.set_access(
            Some("mail.example.com;143"),
            Some("192.0.2.1;40000"),
            Some("bob"),
            None,
        );
    }
    let mut sink = RecordingSink::new();
    assert_eq!(queue.notify(&mut sink), 1);
    let payload = &payloads(&sink)[0];
    assert_eq!(payload["serverDomain"], "mail.example.com");
    assert_eq!(payload["serverPort"], 143);
    assert_eq!(payload["clientIP"], "192.0.2.1");
    assert_eq!(payload["clientPort"], 40000);
    assert_eq!(payload["user"], "bob");
    assert_eq!(payload["uri"], "imap://mail.example.com/");
}

#[test]
fn disabled_group_is_a_no_op() {
    let engine = engine(Config::new("log").group(EventGroup::Message));
    let mut queue = engine.queue();
    let handle = queue.enqueue(EventType::MailboxCreate);
    assert!(handle.is_none());
    assert!(queue.get_mut(handle).is_none());
    assert!(queue.is_empty());
    assert_eq!(queue.notify(&mut RecordingSink::new()), 0);
}

#[test]
fn excluded_specialuse_mailbox_is_silent() {
    init_logger();
    let annotations =
        MemoryAnnotations::new().set("user.bob.Sent", SPECIALUSE_ANNOTATION, "\\Sent");
    let engine = engine(
        Config::new("log")
            .group(EventGroup::Message)
            .exclude_specialuse("\\Sent"),
    )
    .with_annotations(annotations);
    let sent = MemoryMailbox::new("user.bob.Sent");

    let mut queue = engine.queue();
    let append = queue.enqueue(EventType::MessageAppend);
    if let Some(event) = queue.get_mut(append) {
        event.extract_record(&sent, &IndexRecord::new(1)).unwrap();
        event.extract_mailbox(&sent).unwrap();
        assert!(event.is_cancelled());
    }
    assert_eq!(queue.notify(&mut RecordingSink::new()), 0);
}

#[test]
fn quota_exceeded() {
    init_logger();
    let engine = engine(Config::new("log").group(EventGroup::Quota));
    let quota = Quota::new("user.bob")
        .limit(QuotaResource::Storage, 100, 150 * 1024)
        .limit(QuotaResource::Message, -1, 30);

    let mut queue = engine.queue();
    let exceed = queue.enqueue(EventType::QuotaExceed);
    if let Some(event) = queue.get_mut(exceed) {
        event.extract_quota(&quota, &QuotaResource::Storage);
        event.extract_quota(&quota, &QuotaResource::Message);
    }
    let mut sink = RecordingSink::new();
    assert_eq!(queue.notify(&mut sink), 1);
    let payload = &payloads(&sink)[0];
    assert_eq!(payload["uri"], "imap://bob@mail.example.com/INBOX");
    assert_eq!(payload["diskQuota"], 100);
    assert_eq!(payload["diskUsed"], 150);
    assert_eq!(payload["messages"], 30);
    assert!(payload.get("maxMessages").is_none());
}

#[test]
fn mailbox_rename() {
    init_logger();
    let engine = engine(Config::new("log").group(EventGroup::Mailbox));
    let old = MemoryMailbox::new("user.bob.Work").uidvalidity(1);
    let new = MemoryMailbox::new("user.bob.Archive.Work").uidvalidity(2);

    let mut queue = engine.queue();
    let rename = queue.enqueue(EventType::MailboxRename);
    if let Some(event) = queue.get_mut(rename) {
        event.extract_old_mailbox(&old);
        event.extract_mailbox(&new).unwrap();
    }
    let mut sink = RecordingSink::new();
    assert_eq!(queue.notify(&mut sink), 1);
    assert_eq!(
        sink.messages()[0],
        format!(
            r#"{{"event":"MailboxRename","oldMailboxID":"{}","mailboxID":"{}","uri":"{}","pid":{}}}"#,
            "imap://bob@mail.example.com/INBOX/Work;UIDVALIDITY=1",
            "imap://bob@mail.example.com/INBOX/Archive/Work;UIDVALIDITY=2",
            "imap://bob@mail.example.com/INBOX/Archive/Work;UIDVALIDITY=2",
            std::process::id()
        )
    );
}

#[test]
fn config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "event_notifier = \"log\"\nevent_groups = \"mailbox subscription\"\nservername = \"imap.test\""
    )
    .unwrap();
    let config = Config::from_file(file.path()).unwrap();
    let engine = Engine::new(config);
    assert!(engine.new_event(EventType::MailboxSubscribe).is_some());
    assert!(engine.new_event(EventType::MessageNew).is_none());
    assert_eq!(engine.config().server_name, "imap.test");
}

#[test]
fn shared_engine_across_threads() {
    let engine = std::sync::Arc::new(engine(Config::new("log").group(EventGroup::Subscription)));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let engine = engine.clone();
            std::thread::spawn(move || {
                let mut event = engine.new_event(EventType::MailboxSubscribe).unwrap();
                let user = format!("user{}", i);
                let mailbox = format!("user.{}.Lists", user);
                event.set_access(None, None, Some(&user), Some(&mailbox));
                event.notify(&mut RecordingSink::new())
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 1);
    }
}
