use crate::error::{FilterError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Number of MIDI channels
pub const CHANNEL_COUNT: u8 = 16;

/// Channel of an item for filtering; items without a channel are `Independent`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "ChannelRepr", into = "ChannelRepr")]
pub enum ChannelKey {
    Channel(u8),
    Independent,
}

impl ChannelKey {
    pub fn of(channel: Option<u8>) -> Self {
        channel.map_or(Self::Independent, Self::Channel)
    }
}

impl fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Channel(ch) => write!(f, "{ch}"),
            Self::Independent => f.write_str("independent"),
        }
    }
}

impl FromStr for ChannelKey {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("independent") || s == "-" {
            return Ok(Self::Independent);
        }
        match s.parse::<u8>() {
            Ok(ch) if ch < CHANNEL_COUNT => Ok(Self::Channel(ch)),
            _ => Err(FilterError::InvalidChannel(s.to_string())),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ChannelRepr {
    Number(u8),
    Name(String),
}

impl TryFrom<ChannelRepr> for ChannelKey {
    type Error = FilterError;

    fn try_from(repr: ChannelRepr) -> Result<Self> {
        match repr {
            ChannelRepr::Number(ch) if ch < CHANNEL_COUNT => Ok(Self::Channel(ch)),
            ChannelRepr::Number(ch) => Err(FilterError::InvalidChannel(ch.to_string())),
            ChannelRepr::Name(name) => name.parse(),
        }
    }
}

impl From<ChannelKey> for ChannelRepr {
    fn from(key: ChannelKey) -> Self {
        match key {
            ChannelKey::Channel(ch) => Self::Number(ch),
            ChannelKey::Independent => Self::Name("independent".to_string()),
        }
    }
}

/// Channels an item may be on to stay visible
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelSet(BTreeSet<ChannelKey>);

impl ChannelSet {
    /// Every channel plus the channel-independent marker
    pub fn all() -> Self {
        let mut set: BTreeSet<ChannelKey> = (0..CHANNEL_COUNT).map(ChannelKey::Channel).collect();
        set.insert(ChannelKey::Independent);
        Self(set)
    }

    pub fn none() -> Self {
        Self(BTreeSet::new())
    }

    pub fn contains(&self, key: ChannelKey) -> bool {
        self.0.contains(&key)
    }

    pub fn insert(&mut self, key: ChannelKey) -> bool {
        self.0.insert(key)
    }

    pub fn remove(&mut self, key: ChannelKey) -> bool {
        self.0.remove(&key)
    }

    pub fn is_all(&self) -> bool {
        *self == Self::all()
    }

    pub fn iter(&self) -> impl Iterator<Item = ChannelKey> + '_ {
        self.0.iter().copied()
    }
}

impl Default for ChannelSet {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<ChannelKey> for ChannelSet {
    fn from_iter<I: IntoIterator<Item = ChannelKey>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Complete filter state, supplied whole on every change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Always applied
    pub channels: ChannelSet,

    pub limit_range: bool,
    /// Inclusive tick bounds
    pub range_from: u64,
    pub range_to: u64,

    pub limit_tracks: bool,
    pub tracks: BTreeSet<u32>,

    pub limit_by_type: bool,
    /// Taxonomy node ids, resolved against the current tree before filtering
    pub selected_node_ids: BTreeSet<String>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            channels: ChannelSet::all(),
            limit_range: false,
            range_from: 0,
            // Largest tick that still fits a TOML integer
            range_to: i64::MAX as u64,
            limit_tracks: false,
            tracks: BTreeSet::new(),
            limit_by_type: false,
            selected_node_ids: BTreeSet::new(),
        }
    }
}

impl FilterCriteria {
    /// Builder: only keep items on `channels`
    #[must_use]
    pub fn channels(mut self, channels: impl IntoIterator<Item = ChannelKey>) -> Self {
        self.channels = channels.into_iter().collect();
        self
    }

    /// Builder: only keep ticks in `from..=to`
    #[must_use]
    pub fn range(mut self, from: u64, to: u64) -> Self {
        self.limit_range = true;
        self.range_from = from;
        self.range_to = to;
        self
    }

    /// Builder: only keep items on `tracks`
    #[must_use]
    pub fn tracks(mut self, tracks: impl IntoIterator<Item = u32>) -> Self {
        self.limit_tracks = true;
        self.tracks = tracks.into_iter().collect();
        self
    }

    /// Builder: only keep items classified at or below the nodes with these ids
    #[must_use]
    pub fn types<S: Into<String>>(mut self, ids: impl IntoIterator<Item = S>) -> Self {
        self.limit_by_type = true;
        self.selected_node_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// True when filtering cannot drop anything
    pub fn is_pass_through(&self) -> bool {
        self.channels.is_all() && !self.limit_range && !self.limit_tracks && !self.limit_by_type
    }

    /// Reject criteria a user should not be offered; filtering itself never fails
    pub fn validate(&self) -> Result<()> {
        if self.limit_range && self.range_from > self.range_to {
            return Err(FilterError::InvalidRange {
                from: self.range_from,
                to: self.range_to,
            });
        }
        Ok(())
    }
}
