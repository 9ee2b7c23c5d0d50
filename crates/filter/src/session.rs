use crate::criteria::FilterCriteria;
use crate::engine::FilterEngine;
use crate::error::Result;
use midiscope_events::{sort_items, AttributeId, ClassifiedItem, Classifier, Family, LabelStyle, RawEvent};
use midiscope_taxonomy::{AttrValue, AttributeAggregates, NodeId, Taxonomy, TaxonomyBuilder};
use std::collections::{BTreeSet, HashMap};

/// Name of the taxonomy root before label styling
pub const ROOT_NAME: &str = "All Events";

/// Aggregates kept on every taxonomy node
pub type NodeData = AttributeAggregates<AttributeId>;

pub type MidiTaxonomy = Taxonomy<NodeData>;

/// Everything a viewer shows for one set of observed events: the taxonomy,
/// the sorted items, the active criteria and the rows that pass them.
#[derive(Debug, Clone)]
pub struct Session {
    events: Vec<RawEvent>,
    style: LabelStyle,
    taxonomy: MidiTaxonomy,
    items: Vec<ClassifiedItem>,
    criteria: FilterCriteria,
    selection: BTreeSet<NodeId>,
    /// Indices into `items`
    visible: Vec<usize>,
    skipped: usize,
}

impl Session {
    /// Classify `events` into a fresh taxonomy. Messages that cannot be
    /// decoded are logged and skipped; every other event becomes an item.
    pub fn ingest(events: Vec<RawEvent>, style: LabelStyle) -> Result<Self> {
        let (taxonomy, items, skipped) = build(&events, style)?;
        let mut session = Self {
            events,
            style,
            taxonomy,
            items,
            criteria: FilterCriteria::default(),
            selection: BTreeSet::new(),
            visible: Vec::new(),
            skipped,
        };
        session.refilter();
        Ok(session)
    }

    pub fn taxonomy(&self) -> &MidiTaxonomy {
        &self.taxonomy
    }

    /// Mutable access for expanding and collapsing branches
    pub fn taxonomy_mut(&mut self) -> &mut MidiTaxonomy {
        &mut self.taxonomy
    }

    /// All items in display order, filtered or not
    pub fn items(&self) -> &[ClassifiedItem] {
        &self.items
    }

    pub fn events(&self) -> &[RawEvent] {
        &self.events
    }

    pub const fn style(&self) -> LabelStyle {
        self.style
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Events dropped during ingestion
    pub const fn skipped(&self) -> usize {
        self.skipped
    }

    /// Replace the criteria and recompute the visible rows.
    ///
    /// The selection becomes the nodes of `criteria.selected_node_ids`.
    pub fn apply(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.refilter();
    }

    /// Select taxonomy nodes; the criteria's type ids follow the selection
    pub fn select(&mut self, nodes: &BTreeSet<NodeId>) {
        let mut criteria = self.criteria.clone();
        criteria.selected_node_ids = self.taxonomy.ids_of(nodes);
        self.apply(criteria);
    }

    pub fn selection(&self) -> &BTreeSet<NodeId> {
        &self.selection
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    pub fn item_at(&self, row: usize) -> Option<&ClassifiedItem> {
        self.visible.get(row).and_then(|&index| self.items.get(index))
    }

    pub fn attribute_at(&self, row: usize, attr: AttributeId) -> Option<&AttrValue> {
        self.item_at(row)?.attribute(attr)
    }

    pub fn visible_items(&self) -> impl Iterator<Item = &ClassifiedItem> + '_ {
        self.visible.iter().filter_map(|&index| self.items.get(index))
    }

    /// Rebuild the taxonomy with another label style.
    ///
    /// Node handles do not survive a rebuild, so the selection travels as
    /// node ids and is resolved again in the new tree.
    pub fn relabel(&mut self, style: LabelStyle) -> Result<()> {
        let selected = self.taxonomy.ids_of(&self.selection);
        let (taxonomy, items, skipped) = build(&self.events, style)?;

        self.style = style;
        self.taxonomy = taxonomy;
        self.items = items;
        self.skipped = skipped;
        self.criteria.selected_node_ids = selected;
        self.refilter();
        Ok(())
    }

    fn refilter(&mut self) {
        self.selection = self.taxonomy.resolve_ids(&self.criteria.selected_node_ids);
        self.visible = FilterEngine::new(&self.criteria, &self.selection, &self.taxonomy)
            .filter_indices(&self.items);
    }
}

fn build(events: &[RawEvent], style: LabelStyle) -> Result<(MidiTaxonomy, Vec<ClassifiedItem>, usize)> {
    let classifier = Classifier::new(style);
    let mut builder = TaxonomyBuilder::<NodeData>::new(style.render(ROOT_NAME));
    for family in Family::STRUCTURAL {
        builder.add_without_incrementing(&[classifier.family_segment(family)])?;
    }

    let mut sequences: HashMap<u32, u64> = HashMap::new();
    let mut items = Vec::with_capacity(events.len());
    let mut skipped = 0;

    for event in events {
        let classification = match classifier.classify(event) {
            Ok(classification) => classification,
            Err(err) => {
                log::warn!(
                    "Skipping event at tick {} on track {}: {}",
                    event.tick,
                    event.track,
                    err
                );
                skipped += 1;
                continue;
            }
        };

        let leaf = builder.add(&classification.path, classification.attachment.as_deref())?;
        let sequence = sequences.entry(event.track).or_insert(0);
        let item = ClassifiedItem::new(event.tick, event.track, *sequence, leaf)
            .with_attributes(classification.attributes);
        *sequence += 1;

        if let Some(data) = builder.payload_mut(leaf) {
            for (attr, value) in item.attributes() {
                if attr != AttributeId::Data {
                    data.set_option(attr, value.clone());
                }
            }
            if let Some(channel) = item.channel() {
                data.set_distinct_option(AttributeId::Channel, channel);
            }
            data.set_distinct_option(AttributeId::Track, item.track());
        }

        items.push(item);
    }

    let taxonomy = builder.finalize();
    sort_items(&mut items);
    log::debug!(
        "Ingested {} events into {} items ({} skipped)",
        events.len(),
        items.len(),
        skipped
    );
    Ok((taxonomy, items, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn events() -> Vec<RawEvent> {
        vec![
            RawEvent::new(0, 0, vec![0xFF, 0x03, b'P', b'n', b'o']),
            RawEvent::new(0, 0, vec![0x90, 60, 100]),
            RawEvent::new(10, 0, vec![0x90, 64, 90]),
            RawEvent::new(20, 1, vec![0x99, 36, 120]),
            RawEvent::new(30, 0, vec![0x80, 60, 0]),
            RawEvent::new(40, 1, vec![]),
        ]
    }

    fn node_by_id(taxonomy: &MidiTaxonomy, id: &str) -> NodeId {
        let ids = BTreeSet::from([id.to_string()]);
        taxonomy
            .resolve_ids(&ids)
            .into_iter()
            .next()
            .unwrap()
    }

    #[test]
    fn ingest_counts_and_skips() {
        let session = Session::ingest(events(), LabelStyle::Descriptive).unwrap();
        assert_eq!(session.skipped(), 1);
        assert_eq!(session.items().len(), 5);
        assert_eq!(session.visible_count(), 5);

        let taxonomy = session.taxonomy();
        assert_eq!(taxonomy[taxonomy.root()].count(), 5);
        assert_eq!(taxonomy[taxonomy.root()].name(), "All Events");

        let note_on = node_by_id(taxonomy, "noteOn");
        let data = taxonomy[note_on].payload();
        assert_eq!(taxonomy[note_on].count(), 3);
        assert_eq!(data.get_range(&AttributeId::NoteNumber).as_deref(), Some("36 - 64"));
        assert_eq!(
            data.get_distinct_options(&AttributeId::Channel, ", ").as_deref(),
            Some("0, 9")
        );
        assert_eq!(
            data.get_distinct_options(&AttributeId::Track, ", ").as_deref(),
            Some("0, 1")
        );
        assert!(data.option(&AttributeId::Data).is_none());

        let track_name = node_by_id(taxonomy, "trackName");
        assert_eq!(taxonomy[track_name].tooltip(), "Pno");
    }

    #[test]
    fn structural_families_exist_without_items() {
        let session = Session::ingest(Vec::new(), LabelStyle::Descriptive).unwrap();
        let taxonomy = session.taxonomy();
        let families: Vec<&str> = taxonomy
            .children(taxonomy.root())
            .iter()
            .map(|&id| taxonomy[id].name())
            .collect();
        assert_eq!(
            families,
            vec![
                "Channel Voice",
                "Channel Mode",
                "System Common",
                "System Real-Time",
                "Meta Event"
            ]
        );
        assert!(taxonomy
            .children(taxonomy.root())
            .iter()
            .all(|&id| taxonomy[id].count() == 0));
    }

    #[test]
    fn structural_families_are_branches() {
        let mut session =
            Session::ingest(vec![RawEvent::new(0, 0, vec![0x90, 60, 100])], LabelStyle::Descriptive)
                .unwrap();
        let families = session.taxonomy().children(session.taxonomy().root()).to_vec();
        assert_eq!(families.len(), 5);
        assert!(families.iter().all(|&id| session.taxonomy()[id].is_branch()));

        session
            .taxonomy_mut()
            .expand_or_collapse(&BTreeSet::new(), true);
        let taxonomy = session.taxonomy();
        assert!(families.iter().all(|&id| taxonomy[id].is_expanded()));
        assert!(taxonomy[node_by_id(taxonomy, "noteOn")].is_leaf());
    }

    #[test]
    fn table_reads_follow_the_filter() {
        let mut session = Session::ingest(events(), LabelStyle::Descriptive).unwrap();
        session.apply(FilterCriteria::default().tracks([1]));

        assert_eq!(session.visible_count(), 1);
        assert_eq!(
            session
                .attribute_at(0, AttributeId::NoteNumber)
                .and_then(AttrValue::as_i64),
            Some(36)
        );
        assert_eq!(session.item_at(0).and_then(ClassifiedItem::channel), Some(9));
        assert!(session.item_at(1).is_none());
        assert!(session.attribute_at(0, AttributeId::Tempo).is_none());
    }

    #[test]
    fn selection_drives_type_filter() {
        let mut session = Session::ingest(events(), LabelStyle::Descriptive).unwrap();
        let note_off = node_by_id(session.taxonomy(), "noteOff");

        let mut criteria = session.criteria().clone();
        criteria.limit_by_type = true;
        session.apply(criteria);
        session.select(&BTreeSet::from([note_off]));

        assert_eq!(session.selection(), &BTreeSet::from([note_off]));
        assert_eq!(session.visible_count(), 1);
        assert_eq!(session.item_at(0).map(ClassifiedItem::tick), Some(30));
    }

    #[test]
    fn relabel_keeps_selection_and_filter() {
        let mut session = Session::ingest(events(), LabelStyle::Descriptive).unwrap();
        session.apply(FilterCriteria::default().types(["channelVoice"]));
        assert_eq!(session.visible_count(), 4);

        session.relabel(LabelStyle::Mnemonic).unwrap();

        let taxonomy = session.taxonomy();
        assert_eq!(taxonomy[taxonomy.root()].name(), "ALL_EVENTS");
        let selected: Vec<&str> = session
            .selection()
            .iter()
            .map(|&id| taxonomy[id].name())
            .collect();
        assert_eq!(selected, vec!["CHANNEL_VOICE"]);
        assert_eq!(
            taxonomy.ids_of(session.selection()),
            BTreeSet::from(["channelVoice".to_string()])
        );
        assert_eq!(session.visible_count(), 4);
        assert_eq!(session.style(), LabelStyle::Mnemonic);
    }
}
