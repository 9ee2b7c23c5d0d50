//! # Midiscope Filter
//!
//! Order-preserving filtering of classified MIDI items, and the session that
//! ties events, taxonomy, criteria and visible rows together.
//!
//! ## Architecture
//!
//! ```text
//! RawEvent[] ──> Session::ingest(style)
//!                  ├─ Classifier per event
//!                  ├─ TaxonomyBuilder (counts, aggregates)
//!                  └─ sort_items
//!
//! FilterCriteria ──> Session::apply
//!                  ├─ resolve_ids(selected_node_ids)
//!                  └─ FilterEngine: channel AND range AND track AND type
//!                        └─ visible rows (indices into sorted items)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use midiscope_events::{LabelStyle, RawEvent};
//! use midiscope_filter::{FilterCriteria, Session};
//!
//! let events = vec![
//!     RawEvent::new(0, 0, vec![0x90, 60, 100]),
//!     RawEvent::new(0, 1, vec![0x91, 62, 100]),
//! ];
//! let mut session = Session::ingest(events, LabelStyle::Descriptive).unwrap();
//! session.apply(FilterCriteria::default().tracks([1]));
//! assert_eq!(session.visible_count(), 1);
//! ```

mod criteria;
mod engine;
mod error;
mod session;

pub use criteria::{ChannelKey, ChannelSet, FilterCriteria, CHANNEL_COUNT};
pub use engine::{filter, FilterEngine};
pub use error::{FilterError, Result};
pub use session::{MidiTaxonomy, NodeData, Session, ROOT_NAME};
