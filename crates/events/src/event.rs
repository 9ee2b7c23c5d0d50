use crate::error::{EventsError, Result};
use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Largest tick an event may carry; ticks are stored as signed attribute values
pub const MAX_TICK: u64 = i64::MAX as u64;

/// One decoded MIDI message as it was observed.
///
/// Channel and system messages carry their wire bytes; meta events are
/// `FF <type> <data...>` and system exclusive messages `F0 <data...> [F7]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    /// At most [`MAX_TICK`]
    #[serde(deserialize_with = "tick_in_range")]
    pub tick: u64,

    #[serde(default)]
    pub track: u32,

    /// Integer array or hex text such as `"90 3C 64"`
    #[serde(serialize_with = "bytes_to_hex", deserialize_with = "bytes_from_any")]
    pub bytes: Vec<u8>,
}

impl RawEvent {
    pub fn new(tick: u64, track: u32, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            tick,
            track,
            bytes: bytes.into(),
        }
    }
}

/// Parse hex text into bytes; whitespace between bytes is optional
pub fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let digits: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() % 2 != 0 {
        return Err(EventsError::InvalidHex(text.to_string()));
    }
    digits
        .chunks(2)
        .map(|pair| {
            let pair: String = pair.iter().collect();
            u8::from_str_radix(&pair, 16).map_err(|_| EventsError::InvalidHex(text.to_string()))
        })
        .collect()
}

/// Upper-case hex, bytes separated by spaces
pub fn format_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02X}")).join(" ")
}

fn bytes_to_hex<S: Serializer>(bytes: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_hex(bytes))
}

fn tick_in_range<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u64, D::Error> {
    let tick = u64::deserialize(deserializer)?;
    if tick > MAX_TICK {
        return Err(serde::de::Error::custom(EventsError::TickOutOfRange(tick)));
    }
    Ok(tick)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ByteRepr {
    List(Vec<u8>),
    Hex(String),
}

fn bytes_from_any<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error> {
    match ByteRepr::deserialize(deserializer)? {
        ByteRepr::List(bytes) => Ok(bytes),
        ByteRepr::Hex(text) => parse_hex(&text).map_err(serde::de::Error::custom),
    }
}
