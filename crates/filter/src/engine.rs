use crate::criteria::{ChannelKey, FilterCriteria};
use midiscope_events::ClassifiedItem;
use midiscope_taxonomy::{NodeId, Taxonomy};
use std::collections::BTreeSet;

/// Selects the items that pass every enabled test of a [`FilterCriteria`].
///
/// The engine borrows its inputs and keeps no state between passes; every
/// call recomputes from scratch. Output preserves input order.
pub struct FilterEngine<'a, P> {
    criteria: &'a FilterCriteria,
    resolved: &'a BTreeSet<NodeId>,
    taxonomy: &'a Taxonomy<P>,
}

impl<'a, P> FilterEngine<'a, P> {
    /// `resolved` are the taxonomy nodes of `criteria.selected_node_ids`,
    /// looked up in `taxonomy` (see [`Taxonomy::resolve_ids`]).
    pub const fn new(
        criteria: &'a FilterCriteria,
        resolved: &'a BTreeSet<NodeId>,
        taxonomy: &'a Taxonomy<P>,
    ) -> Self {
        Self {
            criteria,
            resolved,
            taxonomy,
        }
    }

    /// True when `item` passes the channel, range, track and type tests
    pub fn matches(&self, item: &ClassifiedItem) -> bool {
        let criteria = self.criteria;

        if !criteria.channels.contains(ChannelKey::of(item.channel())) {
            return false;
        }

        if criteria.limit_range {
            let tick = item.tick();
            if tick < criteria.range_from || tick > criteria.range_to {
                return false;
            }
        }

        if criteria.limit_tracks && !criteria.tracks.contains(&item.track()) {
            return false;
        }

        if criteria.limit_by_type
            && !self
                .taxonomy
                .is_self_or_descendant_of(item.leaf(), self.resolved)
        {
            return false;
        }

        true
    }

    pub fn filter<'i>(&self, items: &'i [ClassifiedItem]) -> Vec<&'i ClassifiedItem> {
        let visible: Vec<_> = items.iter().filter(|item| self.matches(item)).collect();
        log::debug!("Filter pass kept {} of {} items", visible.len(), items.len());
        visible
    }

    /// Positions in `items` of the matching items, ascending
    pub fn filter_indices(&self, items: &[ClassifiedItem]) -> Vec<usize> {
        let visible: Vec<usize> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| self.matches(item))
            .map(|(index, _)| index)
            .collect();
        log::debug!("Filter pass kept {} of {} items", visible.len(), items.len());
        visible
    }
}

/// One-shot filter pass
pub fn filter<'i, P>(
    items: &'i [ClassifiedItem],
    criteria: &FilterCriteria,
    resolved: &BTreeSet<NodeId>,
    taxonomy: &Taxonomy<P>,
) -> Vec<&'i ClassifiedItem> {
    FilterEngine::new(criteria, resolved, taxonomy).filter(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::ChannelSet;
    use midiscope_events::AttributeId;
    use midiscope_taxonomy::{PathSegment, TaxonomyBuilder};
    use pretty_assertions::assert_eq;

    struct Fixture {
        taxonomy: Taxonomy<()>,
        note_on: NodeId,
        note_off: NodeId,
        tempo: NodeId,
    }

    fn fixture() -> Fixture {
        let voice = PathSegment::new("channelVoice", "Channel Voice");
        let meta = PathSegment::new("meta", "Meta Event");
        let mut builder = TaxonomyBuilder::<()>::new("All Events");
        let note_on = builder
            .add(&[voice.clone(), PathSegment::new("noteOn", "Note On")], None)
            .unwrap();
        let note_off = builder
            .add(&[voice, PathSegment::new("noteOff", "Note Off")], None)
            .unwrap();
        let tempo = builder
            .add(&[meta, PathSegment::new("tempo", "Set Tempo")], None)
            .unwrap();
        Fixture {
            taxonomy: builder.finalize(),
            note_on,
            note_off,
            tempo,
        }
    }

    fn items(fx: &Fixture) -> Vec<ClassifiedItem> {
        vec![
            ClassifiedItem::new(0, 0, 0, fx.note_on).with_attribute(AttributeId::Channel, 0u8),
            ClassifiedItem::new(0, 0, 1, fx.tempo),
            ClassifiedItem::new(10, 1, 0, fx.note_on).with_attribute(AttributeId::Channel, 9u8),
            ClassifiedItem::new(20, 1, 1, fx.note_off).with_attribute(AttributeId::Channel, 9u8),
        ]
    }

    fn run(fx: &Fixture, criteria: &FilterCriteria) -> Vec<usize> {
        let resolved = fx.taxonomy.resolve_ids(&criteria.selected_node_ids);
        FilterEngine::new(criteria, &resolved, &fx.taxonomy).filter_indices(&items(fx))
    }

    #[test]
    fn channel_test_is_always_applied() {
        let fx = fixture();
        let only_nine = FilterCriteria::default().channels([ChannelKey::Channel(9)]);
        assert_eq!(run(&fx, &only_nine), vec![2, 3]);

        let independent = FilterCriteria::default().channels([ChannelKey::Independent]);
        assert_eq!(run(&fx, &independent), vec![1]);

        let none = FilterCriteria {
            channels: ChannelSet::none(),
            ..FilterCriteria::default()
        };
        assert!(run(&fx, &none).is_empty());
    }

    #[test]
    fn range_is_inclusive_and_only_applied_when_enabled() {
        let fx = fixture();
        assert_eq!(run(&fx, &FilterCriteria::default().range(10, 20)), vec![2, 3]);
        assert_eq!(run(&fx, &FilterCriteria::default().range(20, 10)), Vec::<usize>::new());

        let mut disabled = FilterCriteria::default().range(20, 10);
        disabled.limit_range = false;
        assert_eq!(run(&fx, &disabled), vec![0, 1, 2, 3]);
    }

    #[test]
    fn track_test() {
        let fx = fixture();
        assert_eq!(run(&fx, &FilterCriteria::default().tracks([1])), vec![2, 3]);
        assert!(run(&fx, &FilterCriteria::default().tracks(std::iter::empty())).is_empty());
    }

    #[test]
    fn type_test_accepts_descendants_of_selected_nodes() {
        let fx = fixture();
        assert_eq!(
            run(&fx, &FilterCriteria::default().types(["channelVoice"])),
            vec![0, 2, 3]
        );
        assert_eq!(run(&fx, &FilterCriteria::default().types(["noteOff"])), vec![3]);
        assert!(run(&fx, &FilterCriteria::default().types(["missing"])).is_empty());
    }

    #[test]
    fn tests_are_combined() {
        let fx = fixture();
        let criteria = FilterCriteria::default()
            .channels([ChannelKey::Channel(9), ChannelKey::Independent])
            .range(0, 10)
            .types(["noteOn", "tempo"]);
        assert_eq!(run(&fx, &criteria), vec![1, 2]);
    }

    #[test]
    fn free_function_borrows_items() {
        let fx = fixture();
        let items = items(&fx);
        let criteria = FilterCriteria::default().tracks([0]);
        let resolved = BTreeSet::new();
        let visible = filter(&items, &criteria, &resolved, &fx.taxonomy);
        let sequences: Vec<u64> = visible.iter().map(|item| item.sequence()).collect();
        assert_eq!(sequences, vec![0, 1]);
    }
}
