use super::Uid;
use std::collections::BTreeSet;
use std::fmt;
use std::ops::RangeInclusive;

/// A sparse set of message UIDs within one mailbox.
///
/// The set keeps its members sorted and renders as an IMAP sequence set, collapsing runs of
/// consecutive UIDs into ranges:
///
/// ```
/// # use imap_notify::types::UidSet;
/// let mut uids = UidSet::new();
/// for uid in [5, 1, 2, 3, 9] {
///     uids.add(uid);
/// }
/// assert_eq!(uids.to_string(), "1:3,5,9");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UidSet {
    uids: BTreeSet<Uid>,
}

impl UidSet {
    /// An empty set.
    pub fn new() -> Self {
        UidSet::default()
    }

    /// Add a UID, returning whether it was not yet present.
    pub fn add(&mut self, uid: Uid) -> bool {
        self.uids.insert(uid)
    }

    /// Number of UIDs in the set.
    pub fn len(&self) -> usize {
        self.uids.len()
    }

    /// Whether the set holds no UID.
    pub fn is_empty(&self) -> bool {
        self.uids.is_empty()
    }

    /// The lowest UID.
    pub fn first(&self) -> Option<Uid> {
        self.uids.iter().next().copied()
    }

    /// Remove every UID.
    pub fn clear(&mut self) {
        self.uids.clear()
    }

    /// Iterate over the UIDs in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Uid> + '_ {
        self.uids.iter().copied()
    }

    /// Iterate over maximal runs of consecutive UIDs.
    pub fn ranges(&self) -> impl Iterator<Item = RangeInclusive<Uid>> + '_ {
        let mut uids = self.uids.iter().copied().peekable();
        std::iter::from_fn(move || {
            let start = uids.next()?;
            let mut end = start;
            while let Some(&next) = uids.peek() {
                if Some(next) != end.checked_add(1) {
                    break;
                }
                end = next;
                uids.next();
            }
            Some(start..=end)
        })
    }
}

impl fmt::Display for UidSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for range in self.ranges() {
            if !first {
                f.write_str(",")?;
            }
            first = false;
            if range.start() == range.end() {
                write!(f, "{}", range.start())?;
            } else {
                write!(f, "{}:{}", range.start(), range.end())?;
            }
        }
        Ok(())
    }
}

impl FromIterator<Uid> for UidSet {
    fn from_iter<T: IntoIterator<Item = Uid>>(iter: T) -> Self {
        UidSet {
            uids: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_collapse() {
        let uids: UidSet = [7, 3, 4, 5, 10, 11, u32::MAX].into_iter().collect();
        let ranges: Vec<_> = uids.ranges().collect();
        assert_eq!(ranges, vec![3..=5, 7..=7, 10..=11, u32::MAX..=u32::MAX]);
        assert_eq!(uids.to_string(), format!("3:5,7,10:11,{}", u32::MAX));
    }

    #[test]
    fn duplicates_are_ignored() {
        let mut uids = UidSet::new();
        assert!(uids.add(4));
        assert!(!uids.add(4));
        assert_eq!(uids.len(), 1);
        assert_eq!(uids.first(), Some(4));
    }

    #[test]
    fn empty_set_renders_empty() {
        assert_eq!(UidSet::new().to_string(), "");
    }
}
