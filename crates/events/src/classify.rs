use crate::attribute::AttributeId;
use crate::error::{EventsError, Result};
use crate::event::{RawEvent, MAX_TICK};
use crate::names;
use itertools::Itertools;
use midiscope_taxonomy::{AttrValue, PathSegment};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How node names are rendered; node ids are the same for every style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelStyle {
    /// "Note On"
    #[default]
    Descriptive,
    /// "NOTE_ON"
    Mnemonic,
}

impl LabelStyle {
    pub fn render(self, name: &str) -> String {
        match self {
            Self::Descriptive => name.to_string(),
            Self::Mnemonic => name
                .split(|c: char| !c.is_ascii_alphanumeric())
                .filter(|word| !word.is_empty())
                .map(str::to_ascii_uppercase)
                .join("_"),
        }
    }
}

impl FromStr for LabelStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "descriptive" => Ok(Self::Descriptive),
            "mnemonic" => Ok(Self::Mnemonic),
            other => Err(format!("unknown label style: {other}")),
        }
    }
}

/// Top level of the MIDI taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Family {
    ChannelVoice,
    ChannelMode,
    SystemCommon,
    SystemRealTime,
    Meta,
    Unknown,
}

impl Family {
    /// Families that are always shown, even before anything was classified into them
    pub const STRUCTURAL: [Self; 5] = [
        Self::ChannelVoice,
        Self::ChannelMode,
        Self::SystemCommon,
        Self::SystemRealTime,
        Self::Meta,
    ];

    pub const fn id(self) -> &'static str {
        match self {
            Self::ChannelVoice => "channelVoice",
            Self::ChannelMode => "channelMode",
            Self::SystemCommon => "systemCommon",
            Self::SystemRealTime => "systemRealTime",
            Self::Meta => "meta",
            Self::Unknown => "unknown",
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::ChannelVoice => "Channel Voice",
            Self::ChannelMode => "Channel Mode",
            Self::SystemCommon => "System Common",
            Self::SystemRealTime => "System Real-Time",
            Self::Meta => "Meta Event",
            Self::Unknown => "Unknown",
        }
    }

    const fn sort_key(self) -> &'static str {
        match self {
            Self::ChannelVoice => "1",
            Self::ChannelMode => "2",
            Self::SystemCommon => "3",
            Self::SystemRealTime => "4",
            Self::Meta => "5",
            Self::Unknown => "6",
        }
    }
}

/// Where an event lands in the taxonomy, and what it carries
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub family: Family,

    /// Path below the taxonomy root, family first
    pub path: Vec<PathSegment>,

    pub attributes: Vec<(AttributeId, AttrValue)>,

    /// Text for the leaf tooltip (text meta events)
    pub attachment: Option<String>,
}

/// Maps decoded MIDI messages to taxonomy paths and typed attributes
#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier {
    style: LabelStyle,
}

impl Classifier {
    pub const fn new(style: LabelStyle) -> Self {
        Self { style }
    }

    pub const fn style(&self) -> LabelStyle {
        self.style
    }

    pub fn family_segment(&self, family: Family) -> PathSegment {
        PathSegment::new(family.id(), self.style.render(family.name())).sort_key(family.sort_key())
    }

    fn segment(&self, id: impl Into<String>, name: &str, code: String, sort_key: String) -> PathSegment {
        PathSegment::new(id, self.style.render(name))
            .code(code)
            .sort_key(sort_key)
    }

    pub fn classify(&self, event: &RawEvent) -> Result<Classification> {
        if event.tick > MAX_TICK {
            return Err(EventsError::TickOutOfRange(event.tick));
        }
        let (&status, data) = event.bytes.split_first().ok_or(EventsError::EmptyMessage)?;

        let mut out = Classification {
            family: Family::Unknown,
            path: Vec::new(),
            attributes: vec![
                (AttributeId::StatusCode, AttrValue::from(status)),
                (AttributeId::Data, AttrValue::from(event.bytes.clone())),
            ],
            attachment: None,
        };

        match status {
            0x00..=0x7F => {
                out.path = vec![
                    self.family_segment(Family::Unknown),
                    PathSegment::new("dataWithoutStatus", self.style.render("Data Without Status")),
                ];
            }
            0x80..=0xEF => self.channel_message(status, data, &mut out)?,
            0xFF if !data.is_empty() => self.meta_event(data, &mut out)?,
            _ => self.system_message(status, data, &mut out)?,
        }

        Ok(out)
    }

    fn channel_message(&self, status: u8, data: &[u8], out: &mut Classification) -> Result<()> {
        let nibble = status >> 4;
        out.attributes.push((AttributeId::Channel, AttrValue::from(status & 0x0F)));

        let voice_leaf = |nibble: u8| {
            let (id, name) = names::channel_voice(nibble);
            self.segment(id, name, format!("{nibble:X}n"), format!("{nibble:X}0"))
        };

        match nibble {
            0x8 | 0x9 => {
                let &[key, velocity] = data_bytes::<2>(status, data)?;
                out.attributes.push((AttributeId::NoteNumber, AttrValue::from(key)));
                out.attributes.push((AttributeId::Velocity, AttrValue::from(velocity)));
                // Note on with velocity 0 is a note off
                let kind = if nibble == 0x9 && velocity == 0 { 0x8 } else { nibble };
                out.family = Family::ChannelVoice;
                out.path = vec![self.family_segment(Family::ChannelVoice), voice_leaf(kind)];
            }
            0xA => {
                let &[key, pressure] = data_bytes::<2>(status, data)?;
                out.attributes.push((AttributeId::NoteNumber, AttrValue::from(key)));
                out.attributes.push((AttributeId::Pressure, AttrValue::from(pressure)));
                out.family = Family::ChannelVoice;
                out.path = vec![self.family_segment(Family::ChannelVoice), voice_leaf(nibble)];
            }
            0xB => {
                let &[number, value] = data_bytes::<2>(status, data)?;
                out.attributes.push((AttributeId::Controller, AttrValue::from(number)));
                out.attributes.push((AttributeId::ControlValue, AttrValue::from(value)));
                if number >= 120 {
                    let (id, name) = names::channel_mode(number);
                    out.family = Family::ChannelMode;
                    out.path = vec![
                        self.family_segment(Family::ChannelMode),
                        self.segment(id, name, number.to_string(), format!("{number:03}")),
                    ];
                } else {
                    let name = names::controller(number)
                        .map_or_else(|| format!("Controller {number}"), str::to_string);
                    out.family = Family::ChannelVoice;
                    out.path = vec![
                        self.family_segment(Family::ChannelVoice),
                        voice_leaf(nibble),
                        self.segment(
                            format!("cc{number}"),
                            &name,
                            number.to_string(),
                            format!("{number:03}"),
                        ),
                    ];
                }
            }
            0xC | 0xD => {
                let &[value] = data_bytes::<1>(status, data)?;
                let attr = if nibble == 0xC {
                    AttributeId::Program
                } else {
                    AttributeId::Pressure
                };
                out.attributes.push((attr, AttrValue::from(value)));
                out.family = Family::ChannelVoice;
                out.path = vec![self.family_segment(Family::ChannelVoice), voice_leaf(nibble)];
            }
            _ => {
                let &[lsb, msb] = data_bytes::<2>(status, data)?;
                let bend = ((i64::from(msb) << 7) | i64::from(lsb)) - 8192;
                out.attributes.push((AttributeId::PitchBend, AttrValue::Int(bend)));
                out.family = Family::ChannelVoice;
                out.path = vec![self.family_segment(Family::ChannelVoice), voice_leaf(nibble)];
            }
        }
        Ok(())
    }

    fn system_message(&self, status: u8, data: &[u8], out: &mut Classification) -> Result<()> {
        let family = if status >= 0xF8 {
            Family::SystemRealTime
        } else {
            Family::SystemCommon
        };

        match status {
            0xF1 | 0xF3 => {
                let &[value] = data_bytes::<1>(status, data)?;
                out.attributes.push((AttributeId::ControlValue, AttrValue::from(value)));
            }
            0xF2 => {
                let &[lsb, msb] = data_bytes::<2>(status, data)?;
                let beats = (u16::from(msb) << 7) | u16::from(lsb);
                out.attributes.push((AttributeId::ControlValue, AttrValue::from(beats)));
            }
            _ => {}
        }

        let leaf = match names::system(status) {
            Some((id, name)) => self.segment(id, name, format!("{status:02X}"), format!("{status:02X}")),
            None => self.segment(
                format!("undefined{status:02X}"),
                &format!("Undefined {status:02X}"),
                format!("{status:02X}"),
                format!("{status:02X}"),
            ),
        };
        out.family = family;
        out.path = vec![self.family_segment(family), leaf];
        Ok(())
    }

    fn meta_event(&self, data: &[u8], out: &mut Classification) -> Result<()> {
        let (&kind, payload) = data.split_first().ok_or(EventsError::EmptyMessage)?;
        out.attributes.push((AttributeId::MetaType, AttrValue::from(kind)));

        match kind {
            0x01..=0x0F => {
                let text = String::from_utf8_lossy(payload).into_owned();
                if !text.is_empty() {
                    out.attachment = Some(text.clone());
                }
                out.attributes.push((AttributeId::Text, AttrValue::Text(text)));
            }
            0x51 => {
                let &[a, b, c] = raw_bytes::<3>(payload)?;
                let tempo = (u32::from(a) << 16) | (u32::from(b) << 8) | u32::from(c);
                out.attributes.push((AttributeId::Tempo, AttrValue::from(tempo)));
                if tempo > 0 {
                    let bpm = (60_000_000.0 / f64::from(tempo) * 100.0).round() / 100.0;
                    out.attributes.push((AttributeId::Bpm, AttrValue::Float(bpm)));
                }
            }
            _ => {}
        }

        let leaf = match names::meta(kind) {
            Some((id, name)) => self.segment(id, name, format!("FF {kind:02X}"), format!("{kind:02X}")),
            None => self.segment(
                format!("meta{kind:02X}"),
                &format!("Meta {kind:02X}"),
                format!("FF {kind:02X}"),
                format!("{kind:02X}"),
            ),
        };
        out.family = Family::Meta;
        out.path = vec![self.family_segment(Family::Meta), leaf];
        Ok(())
    }
}

/// First `N` data bytes of a channel or system message, each below 0x80
fn data_bytes<const N: usize>(status: u8, data: &[u8]) -> Result<&[u8; N]> {
    let bytes = raw_bytes::<N>(data).map_err(|_| EventsError::Truncated {
        status,
        expected: N,
        found: data.len(),
    })?;
    match bytes.iter().find(|&&byte| byte >= 0x80) {
        Some(&byte) => Err(EventsError::InvalidDataByte { status, byte }),
        None => Ok(bytes),
    }
}

/// First `N` bytes without range checks (meta payloads use the full byte range)
fn raw_bytes<const N: usize>(data: &[u8]) -> Result<&[u8; N]> {
    data.get(..N)
        .and_then(|head| head.try_into().ok())
        .ok_or(EventsError::Truncated {
            status: 0xFF,
            expected: N,
            found: data.len(),
        })
}
