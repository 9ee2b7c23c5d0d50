use thiserror::Error;

/// Result type for event decoding and classification
pub type Result<T> = std::result::Result<T, EventsError>;

/// Errors raised while turning raw MIDI bytes into classified items
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventsError {
    /// Message carries no bytes at all
    #[error("Empty MIDI message")]
    EmptyMessage,

    /// Fewer data bytes than the status byte requires
    #[error("Truncated message {status:#04X}: expected {expected} data bytes, found {found}")]
    Truncated {
        status: u8,
        expected: usize,
        found: usize,
    },

    /// A data byte has its high bit set
    #[error("Invalid data byte {byte:#04X} in message {status:#04X}")]
    InvalidDataByte { status: u8, byte: u8 },

    /// Tick does not fit the signed attribute range
    #[error("Tick {0} is out of range")]
    TickOutOfRange(u64),

    /// Hex text could not be decoded into bytes
    #[error("Invalid hex bytes: {0}")]
    InvalidHex(String),
}
