//! # Midiscope Taxonomy
//!
//! Classification tree over observed items, built incrementally while items are
//! ingested and frozen before anything reads it.
//!
//! ## Features
//!
//! - **Incremental build** - each item adds its classification path, creating
//!   missing nodes and counting itself on every node it passes
//! - **Stable ordering** - siblings are ordered by sort key, independent of
//!   insertion order
//! - **Attribute aggregates** - per-node ranges and distinct value sets
//! - **Selection round trip** - node ids survive a full rebuild of the tree
//!
//! ## Architecture
//!
//! ```text
//! PathSegment[] per item
//!     │
//!     ├──> TaxonomyBuilder (petgraph arena)
//!     │      ├─ add / add_without_incrementing
//!     │      ├─ NodeFactory builds node payloads
//!     │      └─ payload_mut for aggregates
//!     │
//!     └──> finalize() ──> Taxonomy (read-only)
//!            ├─ children in sort-key order
//!            ├─ ids_of / resolve_ids
//!            └─ expand_or_collapse / visible_rows
//! ```
//!
//! ## Example
//!
//! ```rust
//! use midiscope_taxonomy::{AttributeAggregates, PathSegment, TaxonomyBuilder};
//!
//! let mut builder: TaxonomyBuilder<AttributeAggregates<&str>> = TaxonomyBuilder::new("All");
//! let path = [
//!     PathSegment::new("channelVoice", "Channel Voice"),
//!     PathSegment::new("noteOn", "Note On"),
//! ];
//! for tick in [10u32, 20] {
//!     let leaf = builder.add(&path, None).unwrap();
//!     builder.payload_mut(leaf).unwrap().set_option("tick", tick);
//! }
//!
//! let taxonomy = builder.finalize();
//! assert_eq!(taxonomy[taxonomy.root()].count(), 2);
//! ```

mod aggregates;
mod builder;
mod error;
mod node;
mod tree;
mod value;

pub use aggregates::{AttributeAggregates, ValueRange, DEFAULT_SEPARATOR};
pub use builder::TaxonomyBuilder;
pub use error::{Result, TaxonomyError};
pub use node::{DefaultFactory, FnFactory, NodeFactory, NodeId, PathSegment, TaxonomyNode};
pub use tree::{Lineage, Taxonomy, TreeRow};
pub use value::{AttrValue, DistinctValue};
