use itertools::Itertools;
use midiscope_events::{format_hex, AttributeId, ClassifiedItem};
use midiscope_filter::{MidiTaxonomy, NodeData, Session};
use midiscope_taxonomy::{AttrValue, DEFAULT_SEPARATOR};
use serde::Serialize;
use std::collections::BTreeMap;

/// Ranges shown next to a tree node, in this order
const TREE_RANGES: [AttributeId; 9] = [
    AttributeId::NoteNumber,
    AttributeId::Velocity,
    AttributeId::Controller,
    AttributeId::ControlValue,
    AttributeId::Program,
    AttributeId::Pressure,
    AttributeId::PitchBend,
    AttributeId::Bpm,
    AttributeId::Tick,
];

const TREE_DISTINCT: [AttributeId; 2] = [AttributeId::Channel, AttributeId::Track];

/// Attributes that get their own table column or are not worth listing
const TABLE_SKIPPED: [AttributeId; 6] = [
    AttributeId::Tick,
    AttributeId::Track,
    AttributeId::Channel,
    AttributeId::StatusCode,
    AttributeId::MetaType,
    AttributeId::Data,
];

/// Visible rows of the taxonomy, indented by depth.
///
/// `+` marks a collapsed branch and `-` an expanded one.
pub fn render_tree(taxonomy: &MidiTaxonomy) -> String {
    let mut out = String::new();
    for row in taxonomy.visible_rows() {
        let node = &taxonomy[row.id];
        let marker = if node.is_leaf() {
            ' '
        } else if node.is_expanded() {
            '-'
        } else {
            '+'
        };
        out.push_str(&"  ".repeat(row.depth));
        out.push(marker);
        out.push(' ');
        out.push_str(&node.label());

        let summary = summarize(node.payload());
        if !summary.is_empty() {
            out.push_str("  ");
            out.push_str(&summary);
        }
        out.push('\n');
    }
    out
}

fn summarize(data: &NodeData) -> String {
    let ranges = TREE_RANGES
        .iter()
        .filter_map(|attr| Some(format!("{} {}", attr.label(), data.get_range(attr)?)));
    let distinct = TREE_DISTINCT.iter().filter_map(|attr| {
        let values = data.get_distinct_options(attr, DEFAULT_SEPARATOR)?;
        Some(format!("{} {values}", attr.label()))
    });
    ranges.chain(distinct).join(" | ")
}

/// Filtered items as an aligned text table
pub fn render_table(session: &Session) -> String {
    let taxonomy = session.taxonomy();
    let header = ["Tick", "Track", "Ch", "Type", "Details", "Data"].map(str::to_string);
    let rows: Vec<[String; 6]> = session
        .visible_items()
        .map(|item| {
            [
                item.tick().to_string(),
                item.track().to_string(),
                item.channel().map_or_else(|| "-".to_string(), |ch| ch.to_string()),
                item.type_label(taxonomy),
                details(item),
                data_hex(item),
            ]
        })
        .collect();

    let mut widths = header.clone().map(|cell| cell.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in std::iter::once(&header).chain(&rows) {
        let line = row
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out.push_str(&format!(
        "{} of {} events shown\n",
        session.visible_count(),
        session.items().len()
    ));
    out
}

fn details(item: &ClassifiedItem) -> String {
    item.attributes()
        .filter(|(attr, _)| !TABLE_SKIPPED.contains(attr))
        .map(|(attr, value)| format!("{} {value}", attr.label()))
        .join(" ")
}

fn data_hex(item: &ClassifiedItem) -> String {
    item.attribute(AttributeId::Data)
        .and_then(AttrValue::as_bytes)
        .map(format_hex)
        .unwrap_or_default()
}

#[derive(Debug, Serialize)]
pub struct JsonRow<'a> {
    pub tick: u64,
    pub track: u32,
    pub channel: Option<u8>,
    #[serde(rename = "type")]
    pub kind: String,
    pub data: String,
    pub attributes: BTreeMap<&'static str, &'a AttrValue>,
}

#[derive(Debug, Serialize)]
pub struct JsonListing<'a> {
    pub total: usize,
    pub visible: usize,
    pub skipped: usize,
    pub rows: Vec<JsonRow<'a>>,
}

pub fn json_listing(session: &Session) -> JsonListing<'_> {
    let taxonomy = session.taxonomy();
    let rows = session
        .visible_items()
        .map(|item| JsonRow {
            tick: item.tick(),
            track: item.track(),
            channel: item.channel(),
            kind: item.type_label(taxonomy),
            data: data_hex(item),
            attributes: item
                .attributes()
                .filter(|(attr, _)| !TABLE_SKIPPED.contains(attr))
                .map(|(attr, value)| (attr.as_str(), value))
                .collect(),
        })
        .collect();
    JsonListing {
        total: session.items().len(),
        visible: session.visible_count(),
        skipped: session.skipped(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use midiscope_events::{LabelStyle, RawEvent};
    use midiscope_filter::FilterCriteria;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn session() -> Session {
        Session::ingest(
            vec![
                RawEvent::new(0, 0, vec![0x90, 60, 100]),
                RawEvent::new(10, 0, vec![0x90, 64, 90]),
                RawEvent::new(20, 1, vec![0xFF, 0x2F]),
            ],
            LabelStyle::Descriptive,
        )
        .unwrap()
    }

    #[test]
    fn collapsed_tree_shows_families() {
        let mut session = session();
        session
            .taxonomy_mut()
            .expand_or_collapse(&BTreeSet::new(), false);
        let tree = render_tree(session.taxonomy());
        let lines: Vec<&str> = tree.lines().collect();
        assert_eq!(lines[0], "- All Events (3)");
        assert_eq!(lines[1], "  + Channel Voice (2)");
        assert_eq!(lines[2], "  + Channel Mode (0)");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn expanded_tree_shows_leaves() {
        let mut session = session();
        session
            .taxonomy_mut()
            .expand_or_collapse(&BTreeSet::new(), true);
        let tree = render_tree(session.taxonomy());
        assert!(tree.contains("    Note On [9n] (2)  Note 60 - 64"));
        assert!(tree.contains("    End of Track [FF 2F] (1)"));
    }

    #[test]
    fn table_lists_visible_items() {
        let mut session = session();
        session.apply(FilterCriteria::default().tracks([0]));
        let table = render_table(&session);
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[0].starts_with("Tick  Track  Ch  Type"));
        assert!(lines[1].contains("Note On ◂ Channel Voice"));
        assert!(lines[1].contains("Note 60 Vel 100"));
        assert!(lines[1].ends_with("90 3C 64"));
        assert_eq!(lines.last().copied(), Some("2 of 3 events shown"));
    }

    #[test]
    fn json_rows_name_attributes() {
        let session = session();
        let value = serde_json::to_value(json_listing(&session)).unwrap();
        assert_eq!(value["visible"], 3);
        assert_eq!(value["rows"][0]["type"], "Note On ◂ Channel Voice");
        assert_eq!(value["rows"][0]["attributes"]["note_number"], 60);
        assert_eq!(value["rows"][2]["channel"], serde_json::Value::Null);
        assert_eq!(value["rows"][2]["data"], "FF 2F");
    }
}
