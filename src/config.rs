//! Process-wide notification settings.
//!
//! A [`Config`] is built once at startup, either programmatically or from TOML text, and is then
//! only read. The TOML keys follow the historical `imapd.conf` option names:
//!
//! ```toml
//! event_notifier = "log"
//! event_groups = "message flags quota"
//! event_extra_params = "timestamp vnd.cmu.midset"
//! event_exclude_flags = "$Junk"
//! event_exclude_specialuse = "\\Junk \\Sent"
//! event_content_inclusion_mode = "headerbody"
//! event_content_size = 2048
//! servername = "mail.example.com"
//! syslog_prefix = "imap"
//! ```

use enumset::EnumSet;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

use crate::error::{ConfigError, Result};
use crate::types::{EventGroup, EventType, ExtraParam};

/// How much of a new message goes into the `messageContent` parameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ContentInclusionMode {
    /// The whole message if it is no larger than the content size, otherwise nothing.
    #[default]
    Standard,
    /// The message, truncated to the content size.
    Message,
    /// The header section, truncated to the content size.
    Header,
    /// The body, truncated to the content size.
    Body,
    /// The full header section followed by the body truncated to the content size.
    HeaderBody,
}

impl FromStr for ContentInclusionMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(ContentInclusionMode::Standard),
            "message" => Ok(ContentInclusionMode::Message),
            "header" => Ok(ContentInclusionMode::Header),
            "body" => Ok(ContentInclusionMode::Body),
            "headerbody" => Ok(ContentInclusionMode::HeaderBody),
            _ => Err(ConfigError::UnknownContentMode(s.to_string())),
        }
    }
}

/// Settings consulted by every event. See the [module documentation](self) for the file format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Notification method handed to the sink. `None` turns notification off entirely.
    pub notifier: Option<String>,
    /// Enabled event groups.
    pub groups: EnumSet<EventGroup>,
    /// Enabled optional parameters.
    pub extra_params: EnumSet<ExtraParam>,
    /// Flags never reported, compared case-insensitively.
    pub exclude_flags: Vec<String>,
    /// Special-use attributes of mailboxes whose events are suppressed. `ALL` suppresses every
    /// mailbox but personal INBOXes.
    pub exclude_specialuse: Vec<String>,
    /// What goes into `messageContent`.
    pub content_inclusion_mode: ContentInclusionMode,
    /// Truncation size for `messageContent`; 0 means no limit.
    pub content_size: usize,
    /// Host part of the IMAP URLs.
    pub server_name: String,
    /// Value of the `service` parameter.
    pub service: String,
    /// Check every payload for missing parameters and panic on a violation.
    pub verify: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            notifier: None,
            groups: EnumSet::empty(),
            extra_params: EnumSet::empty(),
            exclude_flags: Vec::new(),
            exclude_specialuse: Vec::new(),
            content_inclusion_mode: ContentInclusionMode::Standard,
            content_size: 0,
            server_name: "localhost".to_string(),
            service: "imap".to_string(),
            verify: cfg!(debug_assertions),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    event_notifier: Option<String>,
    event_groups: Option<String>,
    event_extra_params: Option<String>,
    event_exclude_flags: Option<String>,
    event_exclude_specialuse: Option<String>,
    event_content_inclusion_mode: Option<String>,
    event_content_size: Option<usize>,
    servername: Option<String>,
    syslog_prefix: Option<String>,
    verify: Option<bool>,
}

fn split_words(s: &str) -> Vec<String> {
    s.split_whitespace().map(str::to_string).collect()
}

fn parse_set<T>(s: &str) -> std::result::Result<EnumSet<T>, ConfigError>
where
    T: enumset::EnumSetType + FromStr<Err = ConfigError>,
{
    s.split_whitespace().map(str::parse::<T>).collect()
}

impl Config {
    /// A configuration with notification turned on through `notifier`, and nothing enabled yet.
    pub fn new(notifier: impl Into<String>) -> Self {
        Config {
            notifier: Some(notifier.into()),
            ..Config::default()
        }
    }

    /// Enable an event group.
    pub fn group(mut self, group: EventGroup) -> Self {
        self.groups |= group;
        self
    }

    /// Enable an optional parameter.
    pub fn extra_param(mut self, extra: ExtraParam) -> Self {
        self.extra_params |= extra;
        self
    }

    /// Never report the given flag.
    pub fn exclude_flag(mut self, flag: impl Into<String>) -> Self {
        self.exclude_flags.push(flag.into());
        self
    }

    /// Suppress events on mailboxes carrying the given special-use attribute.
    pub fn exclude_specialuse(mut self, attribute: impl Into<String>) -> Self {
        self.exclude_specialuse.push(attribute.into());
        self
    }

    /// Set how message content is included, and the truncation size.
    pub fn content(mut self, mode: ContentInclusionMode, size: usize) -> Self {
        self.content_inclusion_mode = mode;
        self.content_size = size;
        self
    }

    /// Set the host part of IMAP URLs.
    pub fn server_name(mut self, server_name: impl Into<String>) -> Self {
        self.server_name = server_name.into();
        self
    }

    /// Set the `service` parameter value.
    pub fn service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    /// Turn payload verification on or off.
    pub fn verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Parse a configuration from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(s)?;
        let mut config = Config {
            notifier: raw.event_notifier.filter(|n| !n.is_empty()),
            ..Config::default()
        };
        if let Some(groups) = raw.event_groups {
            config.groups = parse_set(&groups)?;
        }
        if let Some(extra) = raw.event_extra_params {
            config.extra_params = parse_set(&extra)?;
        }
        if let Some(flags) = raw.event_exclude_flags {
            config.exclude_flags = split_words(&flags);
        }
        if let Some(specialuse) = raw.event_exclude_specialuse {
            config.exclude_specialuse = split_words(&specialuse);
        }
        if let Some(mode) = raw.event_content_inclusion_mode {
            config.content_inclusion_mode = mode.parse()?;
        }
        if let Some(size) = raw.event_content_size {
            config.content_size = size;
        }
        if let Some(server_name) = raw.servername {
            config.server_name = server_name;
        }
        if let Some(service) = raw.syslog_prefix {
            config.service = service;
        }
        if let Some(verify) = raw.verify {
            config.verify = verify;
        }
        Ok(config)
    }

    /// Read and parse a TOML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Config::from_toml_str(&content)
    }

    /// Whether notification is turned on at all.
    pub fn is_enabled(&self) -> bool {
        self.notifier.is_some()
    }

    /// Every event type turned on by the enabled groups.
    pub fn enabled_events(&self) -> EnumSet<EventType> {
        self.groups
            .iter()
            .fold(EnumSet::empty(), |events, group| events | group.events())
    }

    /// Whether `ALL` appears among the excluded special-use attributes, which turns off
    /// notification for every mailbox but personal INBOXes.
    pub fn subfolders_disabled(&self) -> bool {
        self.exclude_specialuse
            .iter()
            .any(|s| s.eq_ignore_ascii_case("ALL"))
    }

    pub(crate) fn is_flag_excluded(&self, flag: &str) -> bool {
        self.exclude_flags
            .iter()
            .any(|f| f.eq_ignore_ascii_case(flag))
    }
}
