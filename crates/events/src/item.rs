use crate::attribute::AttributeId;
use itertools::Itertools;
use midiscope_taxonomy::{AttrValue, NodeId, Taxonomy};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Glyph between levels of a compact type label
pub const LABEL_GLYPH: &str = " ◂ ";

const NOTE_OFF: u8 = 0x80;
const NOTE_ON: u8 = 0x90;

/// One observed event, classified into a leaf of the session taxonomy.
///
/// Display order is defined by [`ClassifiedItem::compare`] pair by pair and
/// realized for whole lists by [`sort_items`].
#[derive(Debug, Clone)]
pub struct ClassifiedItem {
    attributes: BTreeMap<AttributeId, AttrValue>,
    leaf: NodeId,
    sequence: u64,
}

impl ClassifiedItem {
    /// `sequence` must increase strictly within a track
    pub fn new(tick: u64, track: u32, sequence: u64, leaf: NodeId) -> Self {
        let mut attributes = BTreeMap::new();
        attributes.insert(AttributeId::Tick, AttrValue::from(tick));
        attributes.insert(AttributeId::Track, AttrValue::from(track));
        Self {
            attributes,
            leaf,
            sequence,
        }
    }

    /// Builder: set an attribute
    #[must_use]
    pub fn with_attribute(mut self, id: AttributeId, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(id, value.into());
        self
    }

    /// Builder: set several attributes
    #[must_use]
    pub fn with_attributes(mut self, attributes: impl IntoIterator<Item = (AttributeId, AttrValue)>) -> Self {
        self.attributes.extend(attributes);
        self
    }

    pub fn attribute(&self, id: AttributeId) -> Option<&AttrValue> {
        self.attributes.get(&id)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (AttributeId, &AttrValue)> {
        self.attributes.iter().map(|(&id, value)| (id, value))
    }

    pub const fn leaf(&self) -> NodeId {
        self.leaf
    }

    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn tick(&self) -> u64 {
        self.small(AttributeId::Tick).unwrap_or(0)
    }

    pub fn track(&self) -> u32 {
        self.small(AttributeId::Track).unwrap_or(0)
    }

    /// Channel, or `None` for messages that are not channel-bound
    pub fn channel(&self) -> Option<u8> {
        self.small(AttributeId::Channel)
    }

    pub fn status(&self) -> Option<u8> {
        self.small(AttributeId::StatusCode)
    }

    pub fn note(&self) -> Option<u8> {
        self.small(AttributeId::NoteNumber)
    }

    fn small<T: TryFrom<i64>>(&self, id: AttributeId) -> Option<T> {
        self.attribute(id)
            .and_then(AttrValue::as_i64)
            .and_then(|v| T::try_from(v).ok())
    }

    /// Coarse command family when it is note on or note off
    fn note_family(&self) -> Option<u8> {
        let family = self.status()? & 0xF0;
        (family == NOTE_ON || family == NOTE_OFF).then_some(family)
    }

    /// Leaf-to-root names of the item's type, root excluded
    pub fn type_label<P>(&self, taxonomy: &Taxonomy<P>) -> String {
        taxonomy
            .lineage(self.leaf)
            .map(|id| taxonomy[id].name())
            .join(LABEL_GLYPH)
    }

    /// Root-to-leaf type description, one indented line per level
    pub fn type_tooltip<P>(&self, taxonomy: &Taxonomy<P>) -> String {
        taxonomy
            .path(self.leaf)
            .into_iter()
            .enumerate()
            .map(|(depth, id)| {
                let node = &taxonomy[id];
                let indent = "  ".repeat(depth);
                match node.code() {
                    Some(code) => format!("{indent}{} [{code}]", node.name()),
                    None => format!("{indent}{}", node.name()),
                }
            })
            .join("\n")
    }

    /// Pairwise display order: tick, then track, then note number when both
    /// items are note messages of the same kind, then ingestion sequence.
    ///
    /// This is only consistent pair by pair. Notes interleaved with other
    /// messages on one (tick, track) can form cycles, so it is not a total
    /// order and must not drive a sort; use [`sort_items`] instead.
    pub fn compare(&self, other: &Self) -> Ordering {
        self.tick()
            .cmp(&other.tick())
            .then_with(|| self.track().cmp(&other.track()))
            .then_with(|| match (self.note_family(), other.note_family()) {
                (Some(a), Some(b)) if a == b => self.note().cmp(&other.note()),
                _ => Ordering::Equal,
            })
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

/// Sort items into display order.
///
/// Items are laid out by tick, track and sequence; within each (tick, track)
/// run the note-on and note-off messages are then reordered by note number in
/// the slots they already occupy. [`ClassifiedItem::compare`] is not transitive
/// when notes interleave with other messages on the same tick, so this never
/// relies on it for sorting.
pub fn sort_items(items: &mut [ClassifiedItem]) {
    items.sort_by_key(|item| (item.tick(), item.track(), item.sequence));

    let mut start = 0;
    while start < items.len() {
        let run = (items[start].tick(), items[start].track());
        let len = items[start..]
            .iter()
            .take_while(|item| (item.tick(), item.track()) == run)
            .count();
        let end = start + len;

        for family in [NOTE_OFF, NOTE_ON] {
            let slots: Vec<usize> = (start..end)
                .filter(|&i| items[i].note_family() == Some(family))
                .collect();
            if slots.len() < 2 {
                continue;
            }
            let mut notes: Vec<ClassifiedItem> = slots.iter().map(|&i| items[i].clone()).collect();
            notes.sort_by_key(|item| (item.note(), item.sequence));
            for (slot, item) in slots.into_iter().zip(notes) {
                items[slot] = item;
            }
        }
        start = end;
    }
}
