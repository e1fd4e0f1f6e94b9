//! IMAP URLs as defined in [RFC 5092](https://tools.ietf.org/html/rfc5092).

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::fmt;

use crate::types::{Uid, UidValidity};

/// Characters escaped in the user and mailbox parts. `/` is kept since it is the hierarchy
/// separator of the URL path.
const URL_UNSAFE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b':')
    .add(b';')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// An `imap://` URL naming a server, a mailbox or a single message.
///
/// ```
/// # use imap_notify::ImapUrl;
/// let url = ImapUrl::new("mail.example.com")
///     .user("bob")
///     .mailbox("INBOX/Sent Items")
///     .uidvalidity(1234)
///     .uid(7);
/// assert_eq!(
///     url.to_string(),
///     "imap://bob@mail.example.com/INBOX/Sent%20Items;UIDVALIDITY=1234/;UID=7"
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImapUrl {
    server: String,
    user: Option<String>,
    mailbox: Option<String>,
    uidvalidity: Option<UidValidity>,
    uid: Option<Uid>,
}

impl ImapUrl {
    /// A URL naming only the server.
    pub fn new(server: impl Into<String>) -> Self {
        ImapUrl {
            server: server.into(),
            ..ImapUrl::default()
        }
    }

    /// Set the user the mailbox name is relative to.
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Set the external mailbox name.
    pub fn mailbox(mut self, mailbox: impl Into<String>) -> Self {
        self.mailbox = Some(mailbox.into());
        self
    }

    /// Set the `UIDVALIDITY` of the mailbox.
    pub fn uidvalidity(mut self, uidvalidity: UidValidity) -> Self {
        self.uidvalidity = Some(uidvalidity);
        self
    }

    /// Point the URL at one message.
    pub fn uid(mut self, uid: Uid) -> Self {
        self.uid = Some(uid);
        self
    }
}

impl fmt::Display for ImapUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("imap://")?;
        if let Some(ref user) = self.user {
            write!(f, "{}@", utf8_percent_encode(user, URL_UNSAFE))?;
        }
        write!(f, "{}/", self.server)?;

        // UIDVALIDITY and UID only make sense below a mailbox
        if let Some(ref mailbox) = self.mailbox {
            write!(f, "{}", utf8_percent_encode(mailbox, URL_UNSAFE))?;
            if let Some(uidvalidity) = self.uidvalidity {
                write!(f, ";UIDVALIDITY={}", uidvalidity)?;
            }
            if let Some(uid) = self.uid {
                write!(f, "/;UID={}", uid)?;
            }
        }
        Ok(())
    }
}
