use std::borrow::Cow;
use std::fmt;

/// A message flag as stored on an index record.
///
/// All variants except [`Flag::Keyword`] are system flags from
/// [RFC 3501 section 2.3.2](https://tools.ietf.org/html/rfc3501#section-2.3.2) and begin with
/// `\` on the wire. Only `\Deleted`, `\Answered`, `\Flagged`, `\Draft` and `\Seen` are ever
/// reported in a notification; `\Recent` and `\*` are session artifacts.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
#[non_exhaustive]
pub enum Flag<'a> {
    /// Message has been read
    Seen,

    /// Message has been answered
    Answered,

    /// Message is "flagged" for urgent/special attention
    Flagged,

    /// Message is "deleted" for removal by later EXPUNGE
    Deleted,

    /// Message has not completed composition
    Draft,

    /// Message arrived since the last session selected the mailbox
    Recent,

    /// `\*`, only ever found in a mailbox's permanent flags
    MayCreate,

    /// A user- or server-defined keyword.
    Keyword(Cow<'a, str>),
}

/// System flags in the order they are reported in `flagNames`.
pub(crate) const REPORTED_SYSTEM_FLAGS: [Flag<'static>; 5] = [
    Flag::Deleted,
    Flag::Answered,
    Flag::Flagged,
    Flag::Draft,
    Flag::Seen,
];

impl Flag<'static> {
    fn system(s: &str) -> Option<Self> {
        match s {
            "\\Seen" => Some(Flag::Seen),
            "\\Answered" => Some(Flag::Answered),
            "\\Flagged" => Some(Flag::Flagged),
            "\\Deleted" => Some(Flag::Deleted),
            "\\Draft" => Some(Flag::Draft),
            "\\Recent" => Some(Flag::Recent),
            "\\*" => Some(Flag::MayCreate),
            _ => None,
        }
    }

    /// Turn a list of flag names into owned flags.
    pub fn from_strs<S: ToString>(
        v: impl IntoIterator<Item = S>,
    ) -> impl Iterator<Item = Flag<'static>> {
        v.into_iter().map(|s| Flag::from(s.to_string()))
    }
}

impl<'a> Flag<'a> {
    /// Whether this is one of the predefined `\` flags.
    pub fn is_system(&self) -> bool {
        !matches!(self, Flag::Keyword(_))
    }
}

impl<'a> fmt::Display for Flag<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Flag::Seen => write!(f, "\\Seen"),
            Flag::Answered => write!(f, "\\Answered"),
            Flag::Flagged => write!(f, "\\Flagged"),
            Flag::Deleted => write!(f, "\\Deleted"),
            Flag::Draft => write!(f, "\\Draft"),
            Flag::Recent => write!(f, "\\Recent"),
            Flag::MayCreate => write!(f, "\\*"),
            Flag::Keyword(ref s) => write!(f, "{}", s),
        }
    }
}

impl<'a> From<String> for Flag<'a> {
    fn from(s: String) -> Self {
        if let Some(f) = Flag::system(&s) {
            f
        } else {
            Flag::Keyword(Cow::Owned(s))
        }
    }
}

impl<'a> From<&'a str> for Flag<'a> {
    fn from(s: &'a str) -> Self {
        if let Some(f) = Flag::system(s) {
            f
        } else {
            Flag::Keyword(Cow::Borrowed(s))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_flags_parse() {
        assert_eq!(Flag::from("\\Deleted"), Flag::Deleted);
        assert_eq!(Flag::from("$Junk"), Flag::Keyword(Cow::Borrowed("$Junk")));
        // system flag names are case-sensitive here; matching is done by name elsewhere
        assert!(!Flag::from("\\seen").is_system());
    }

    #[test]
    fn owned_from_strs() {
        let flags: Vec<_> = Flag::from_strs(["\\Recent", "\\Seen", "work"]).collect();
        assert_eq!(
            flags,
            vec![Flag::Recent, Flag::Seen, Flag::Keyword(Cow::Owned("work".to_string()))]
        );
    }
}
