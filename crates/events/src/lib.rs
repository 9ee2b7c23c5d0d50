//! # Midiscope Events
//!
//! Decoded MIDI messages turned into classified items.
//!
//! ```text
//! RawEvent { tick, track, bytes }
//!     │
//!     ├──> Classifier (label style)
//!     │      ├─ family / kind / controller path segments
//!     │      └─ typed attributes (channel, note, tempo, ...)
//!     │
//!     └──> ClassifiedItem { attributes, leaf, sequence }
//!            └─ total order: tick, track, note (same note family), sequence
//! ```

mod attribute;
mod classify;
mod error;
mod event;
mod item;
mod names;

pub use attribute::AttributeId;
pub use classify::{Classification, Classifier, Family, LabelStyle};
pub use error::{EventsError, Result};
pub use event::{format_hex, parse_hex, RawEvent, MAX_TICK};
pub use item::{sort_items, ClassifiedItem, LABEL_GLYPH};
