//! Translation of internal mailbox names to the names clients see.

/// Maps internal mailbox names to external ones, and finds their owners.
///
/// The engine builds every IMAP URL through this trait, so the URLs in notifications match what
/// the owner of the mailbox would see in a `LIST` response.
pub trait Namespace {
    /// The external name of `mailbox`, as seen by its owner.
    fn to_external(&self, mailbox: &str) -> String;

    /// The internal user id of the owner of `mailbox`, if it is a personal mailbox.
    fn userid(&self, mailbox: &str) -> Option<String>;

    /// The external user id of the owner of `mailbox`, if it is a personal mailbox.
    fn owner(&self, mailbox: &str) -> Option<String> {
        self.userid(mailbox)
            .map(|userid| self.user_to_external(&userid))
    }

    /// Whether `mailbox` is the INBOX of a user, rather than one of its sub-folders or a shared
    /// folder.
    fn is_user_inbox(&self, mailbox: &str) -> bool;

    /// The external form of an internal user id.
    fn user_to_external(&self, userid: &str) -> String {
        userid.to_string()
    }
}

/// The usual server layout: internal names use `.` as hierarchy separator, `user.<id>` is the
/// INBOX of `<id>` and everything below it is a personal folder. Other names are shared folders.
/// A virtual domain is appended after `@`, as in `user.alice.Sent@example.com`.
///
/// ```
/// # use imap_notify::{Namespace, StandardNamespace};
/// let ns = StandardNamespace::new('/');
/// assert_eq!(ns.to_external("user.alice.Sent"), "INBOX/Sent");
/// assert_eq!(ns.owner("user.alice.Sent").as_deref(), Some("alice"));
/// assert_eq!(ns.to_external("shared.news"), "shared/news");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StandardNamespace {
    separator: char,
}

impl Default for StandardNamespace {
    fn default() -> Self {
        StandardNamespace::new('.')
    }
}

struct Parsed<'a> {
    domain: Option<&'a str>,
    owner: Option<&'a str>,
    // name below the INBOX, or the full shared name
    rest: Option<&'a str>,
}

impl StandardNamespace {
    /// A namespace presenting `separator` as the hierarchy separator, either `.` or `/`.
    pub fn new(separator: char) -> Self {
        StandardNamespace { separator }
    }

    fn parse<'a>(&self, mailbox: &'a str) -> Parsed<'a> {
        let (name, domain) = match mailbox.rsplit_once('@') {
            Some((name, domain)) => (name, Some(domain)),
            None => (mailbox, None),
        };
        match name.strip_prefix("user.") {
            Some(personal) => {
                let (owner, rest) = match personal.split_once('.') {
                    Some((owner, rest)) => (owner, Some(rest)),
                    None => (personal, None),
                };
                Parsed {
                    domain,
                    owner: Some(owner),
                    rest,
                }
            }
            None => Parsed {
                domain,
                owner: None,
                rest: Some(name),
            },
        }
    }

    fn hiersep_to_external(&self, name: &str) -> String {
        if self.separator == '/' {
            name.chars()
                .map(|c| match c {
                    '.' => '/',
                    '^' => '.',
                    c => c,
                })
                .collect()
        } else {
            name.to_string()
        }
    }
}

impl Namespace for StandardNamespace {
    fn to_external(&self, mailbox: &str) -> String {
        let parsed = self.parse(mailbox);
        match (parsed.owner, parsed.rest) {
            (Some(_), None) => "INBOX".to_string(),
            (Some(_), Some(rest)) => {
                format!("INBOX{}{}", self.separator, self.hiersep_to_external(rest))
            }
            (None, Some(rest)) => self.hiersep_to_external(rest),
            (None, None) => String::new(),
        }
    }

    fn userid(&self, mailbox: &str) -> Option<String> {
        let parsed = self.parse(mailbox);
        let owner = parsed.owner?;
        Some(match parsed.domain {
            Some(domain) => format!("{}@{}", owner, domain),
            None => owner.to_string(),
        })
    }

    fn is_user_inbox(&self, mailbox: &str) -> bool {
        let parsed = self.parse(mailbox);
        parsed.owner.is_some() && parsed.rest.is_none()
    }

    fn user_to_external(&self, userid: &str) -> String {
        if self.separator == '/' {
            userid.replace('^', ".")
        } else {
            userid.to_string()
        }
    }
}
