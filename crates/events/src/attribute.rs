use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of attributes an event can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeId {
    Tick,
    Track,
    Channel,
    StatusCode,
    NoteNumber,
    Velocity,
    Controller,
    ControlValue,
    Program,
    Pressure,
    PitchBend,
    MetaType,
    /// Microseconds per quarter note
    Tempo,
    Bpm,
    Text,
    /// Raw message bytes
    Data,
}

impl AttributeId {
    pub const ALL: [Self; 16] = [
        Self::Tick,
        Self::Track,
        Self::Channel,
        Self::StatusCode,
        Self::NoteNumber,
        Self::Velocity,
        Self::Controller,
        Self::ControlValue,
        Self::Program,
        Self::Pressure,
        Self::PitchBend,
        Self::MetaType,
        Self::Tempo,
        Self::Bpm,
        Self::Text,
        Self::Data,
    ];

    /// Machine name, as used in config files and JSON output
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tick => "tick",
            Self::Track => "track",
            Self::Channel => "channel",
            Self::StatusCode => "status_code",
            Self::NoteNumber => "note_number",
            Self::Velocity => "velocity",
            Self::Controller => "controller",
            Self::ControlValue => "control_value",
            Self::Program => "program",
            Self::Pressure => "pressure",
            Self::PitchBend => "pitch_bend",
            Self::MetaType => "meta_type",
            Self::Tempo => "tempo",
            Self::Bpm => "bpm",
            Self::Text => "text",
            Self::Data => "data",
        }
    }

    /// Column header
    pub const fn label(self) -> &'static str {
        match self {
            Self::Tick => "Tick",
            Self::Track => "Track",
            Self::Channel => "Ch",
            Self::StatusCode => "Status",
            Self::NoteNumber => "Note",
            Self::Velocity => "Vel",
            Self::Controller => "CC",
            Self::ControlValue => "Value",
            Self::Program => "Program",
            Self::Pressure => "Pressure",
            Self::PitchBend => "Bend",
            Self::MetaType => "Meta",
            Self::Tempo => "Tempo",
            Self::Bpm => "BPM",
            Self::Text => "Text",
            Self::Data => "Data",
        }
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttributeId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|attr| attr.as_str() == wanted)
            .ok_or_else(|| format!("unknown attribute: {s}"))
    }
}
