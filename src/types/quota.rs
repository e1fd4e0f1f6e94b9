use std::fmt::{Display, Formatter};

/// A quota resource, from [RFC 2087 section 3](https://datatracker.ietf.org/doc/html/rfc2087#section-3).
///
/// Only `STORAGE` and `MESSAGE` are reported in notifications.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub enum QuotaResource {
    /// Sum of messages' RFC822.SIZE, in units of 1024 octets
    Storage,
    /// Number of messages
    Message,
    /// Any other string (for future RFCs)
    Atom(String),
}

impl QuotaResource {
    /// The unit in which usage of this resource is reported, in the resource's raw measure.
    pub fn unit(&self) -> u64 {
        match self {
            QuotaResource::Storage => 1024,
            _ => 1,
        }
    }
}

impl Display for QuotaResource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            QuotaResource::Storage => write!(f, "STORAGE"),
            QuotaResource::Message => write!(f, "MESSAGE"),
            QuotaResource::Atom(s) => write!(f, "{}", s),
        }
    }
}

/// Limit and usage of one resource under a quota root.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuotaUsage {
    /// The configured limit, if any.
    pub limit: Option<u64>,
    /// The raw usage.
    pub used: u64,
    /// Divisor applied to `used` when reporting it.
    pub unit: u64,
}

impl QuotaUsage {
    /// Usage with a unit of one. A negative `limit` means no limit is set.
    pub fn new(limit: i64, used: u64) -> Self {
        QuotaUsage {
            limit: u64::try_from(limit).ok(),
            used,
            unit: 1,
        }
    }

    /// The same usage, reported in the given unit.
    pub fn in_units(self, unit: u64) -> Self {
        QuotaUsage { unit, ..self }
    }

    /// `used` divided by `unit`.
    pub fn used_in_units(&self) -> u64 {
        self.used / self.unit.max(1)
    }
}

/// A snapshot of a quota root, as handed over by the mail store when a quota event is raised.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Quota {
    root: String,
    resources: Vec<(QuotaResource, QuotaUsage)>,
}

impl Quota {
    /// A quota root with no resource limited yet.
    pub fn new(root: impl Into<String>) -> Self {
        Quota {
            root: root.into(),
            resources: Vec::new(),
        }
    }

    /// Set limit and usage for a resource, in the resource's conventional unit.
    pub fn limit(self, resource: QuotaResource, limit: i64, used: u64) -> Self {
        let usage = QuotaUsage::new(limit, used).in_units(resource.unit());
        self.with_usage(resource, usage)
    }

    /// Set the usage of a resource, replacing any previous one.
    pub fn with_usage(mut self, resource: QuotaResource, usage: QuotaUsage) -> Self {
        self.resources.retain(|(r, _)| *r != resource);
        self.resources.push((resource, usage));
        self
    }

    /// Internal name of the quota root.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Usage of a resource, if it is tracked for this root.
    pub fn usage(&self, resource: &QuotaResource) -> Option<&QuotaUsage> {
        self.resources
            .iter()
            .find(|(r, _)| r == resource)
            .map(|(_, usage)| usage)
    }
}
