use crate::value::{AttrValue, DistinctValue};
use itertools::Itertools;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Separator used by [`AttributeAggregates::get_distinct_options`] callers that have no preference
pub const DEFAULT_SEPARATOR: &str = ", ";

/// Running minimum and maximum of an orderable attribute
#[derive(Debug, Clone, PartialEq)]
pub struct ValueRange {
    pub min: AttrValue,
    pub max: AttrValue,
}

impl ValueRange {
    fn new(value: AttrValue) -> Self {
        Self {
            min: value.clone(),
            max: value,
        }
    }

    /// Widen the range to include `value`; returns false if the kinds do not compare
    fn widen(&mut self, value: &AttrValue) -> bool {
        let (Some(lo), Some(hi)) = (value.compare(&self.min), value.compare(&self.max)) else {
            return false;
        };
        if lo == Ordering::Less {
            self.min = value.clone();
        }
        if hi == Ordering::Greater {
            self.max = value.clone();
        }
        true
    }

    #[must_use]
    pub fn is_single(&self) -> bool {
        self.min.compare(&self.max) == Some(Ordering::Equal)
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single() {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{} - {}", self.min, self.max)
        }
    }
}

/// Per-attribute aggregates kept on a taxonomy node.
///
/// Used as the node payload of a `Taxonomy<AttributeAggregates<K>>`, where `K`
/// is the caller's closed set of attribute ids.
#[derive(Debug, Clone)]
pub struct AttributeAggregates<K> {
    latest: BTreeMap<K, AttrValue>,
    ranges: BTreeMap<K, ValueRange>,
    distinct: BTreeMap<K, BTreeSet<DistinctValue>>,
}

impl<K> Default for AttributeAggregates<K> {
    fn default() -> Self {
        Self {
            latest: BTreeMap::new(),
            ranges: BTreeMap::new(),
            distinct: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Clone> AttributeAggregates<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the most recent value for `attr`, widening its range when orderable
    pub fn set_option(&mut self, attr: K, value: impl Into<AttrValue>) {
        let value = value.into();
        if value.is_orderable() {
            match self.ranges.get_mut(&attr) {
                Some(range) => {
                    if !range.widen(&value) {
                        log::debug!("Ignoring {value:?} for range of mismatched kind");
                    }
                }
                None => {
                    self.ranges.insert(attr.clone(), ValueRange::new(value.clone()));
                }
            }
        }
        self.latest.insert(attr, value);
    }

    /// Most recent value written for `attr`
    pub fn option(&self, attr: &K) -> Option<&AttrValue> {
        self.latest.get(attr)
    }

    pub fn range(&self, attr: &K) -> Option<&ValueRange> {
        self.ranges.get(attr)
    }

    /// `"<min> - <max>"`, or the single value when min equals max
    pub fn get_range(&self, attr: &K) -> Option<String> {
        self.ranges.get(attr).map(ToString::to_string)
    }

    /// Add `value` to the distinct set of `attr`.
    ///
    /// Only text and integer values are kept; other kinds are ignored and
    /// `false` is returned.
    pub fn set_distinct_option(&mut self, attr: K, value: impl Into<AttrValue>) -> bool {
        let Some(value) = DistinctValue::from_attr(&value.into()) else {
            return false;
        };
        self.distinct.entry(attr).or_default().insert(value);
        true
    }

    pub fn distinct_options(&self, attr: &K) -> Option<&BTreeSet<DistinctValue>> {
        self.distinct.get(attr)
    }

    /// Distinct values of `attr` in ascending order joined by `separator`
    pub fn get_distinct_options(&self, attr: &K, separator: &str) -> Option<String> {
        let values = self.distinct.get(attr)?;
        match values.len() {
            1 => values.first().map(ToString::to_string),
            _ => Some(values.iter().join(separator)),
        }
    }

    /// Attributes that have a recorded range
    pub fn ranged_attributes(&self) -> impl Iterator<Item = &K> {
        self.ranges.keys()
    }

    /// Attributes that have a distinct-value set
    pub fn distinct_attributes(&self) -> impl Iterator<Item = &K> {
        self.distinct.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_empty() && self.distinct.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_tracks_min_and_max() {
        let mut agg = AttributeAggregates::new();
        assert_eq!(agg.get_range(&"tick"), None);

        agg.set_option("tick", 10u32);
        assert_eq!(agg.get_range(&"tick").as_deref(), Some("10"));

        agg.set_option("tick", 20u32);
        agg.set_option("tick", 15u32);
        assert_eq!(agg.get_range(&"tick").as_deref(), Some("10 - 20"));
        assert_eq!(agg.option(&"tick"), Some(&AttrValue::Int(15)));
    }

    #[test]
    fn repeated_value_renders_single() {
        let mut agg = AttributeAggregates::new();
        agg.set_option("note", 60u8);
        agg.set_option("note", 60u8);
        assert_eq!(agg.get_range(&"note").as_deref(), Some("60"));
    }

    #[test]
    fn unorderable_values_skip_range() {
        let mut agg = AttributeAggregates::new();
        agg.set_option("data", vec![1u8, 2]);
        assert_eq!(agg.get_range(&"data"), None);
        assert_eq!(agg.option(&"data"), Some(&AttrValue::Bytes(vec![1, 2])));
    }

    #[test]
    fn nan_never_enters_a_range() {
        let mut agg = AttributeAggregates::new();
        agg.set_option("bpm", f64::NAN);
        assert_eq!(agg.get_range(&"bpm"), None);
        assert!(agg.option(&"bpm").is_some());

        agg.set_option("bpm", 120.0);
        agg.set_option("bpm", f64::NAN);
        agg.set_option("bpm", 90.5);
        assert_eq!(agg.get_range(&"bpm").as_deref(), Some("90.5 - 120"));
    }

    #[test]
    fn mismatched_kind_keeps_range() {
        let mut agg = AttributeAggregates::new();
        agg.set_option("x", 5i64);
        agg.set_option("x", "text");
        assert_eq!(agg.get_range(&"x").as_deref(), Some("5"));
        assert_eq!(agg.option(&"x"), Some(&AttrValue::from("text")));
    }

    #[test]
    fn distinct_options_dedupe_and_sort() {
        let mut agg = AttributeAggregates::new();
        assert_eq!(agg.get_distinct_options(&"ch", DEFAULT_SEPARATOR), None);

        for ch in [9u8, 0, 9, 3, 0] {
            assert!(agg.set_distinct_option("ch", ch));
        }
        assert_eq!(
            agg.get_distinct_options(&"ch", DEFAULT_SEPARATOR).as_deref(),
            Some("0, 3, 9")
        );
        assert_eq!(agg.get_distinct_options(&"ch", "|").as_deref(), Some("0|3|9"));
    }

    #[test]
    fn distinct_single_member_is_not_joined() {
        let mut agg = AttributeAggregates::new();
        agg.set_distinct_option("name", "Piano");
        agg.set_distinct_option("name", "Piano");
        assert_eq!(agg.get_distinct_options(&"name", " / ").as_deref(), Some("Piano"));
    }

    #[test]
    fn distinct_ignores_unsupported_kinds() {
        let mut agg = AttributeAggregates::new();
        assert!(!agg.set_distinct_option("bpm", 120.0));
        assert!(!agg.set_distinct_option("bpm", true));
        assert_eq!(agg.get_distinct_options(&"bpm", DEFAULT_SEPARATOR), None);
        assert!(agg.is_empty());
    }
}
