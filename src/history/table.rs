//! history::table
//!
//! Server-side table envelope for history pages.
//!
//! Grid widgets that page on the server send a `draw` counter with every
//! request and expect it echoed back, together with the total row count
//! and the rows themselves. `recordsTotal` carries the completeness signal
//! of [`HistoryPage::total_known`], so the widget keeps offering a next
//! page until the history has been walked to its end.

use serde::Serialize;

use super::{HistoryItem, HistoryPage};

/// One table row: a history item keyed by its row id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    #[serde(rename = "DT_RowId")]
    pub row_id: String,
    #[serde(flatten)]
    pub item: HistoryItem,
}

/// JSON envelope for one table draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableResponse {
    pub draw: u64,
    pub records_total: usize,
    pub records_filtered: usize,
    pub data: Vec<TableRow>,
    #[serde(rename = "fully_loaded")]
    pub fully_loaded: bool,
}

impl TableResponse {
    /// Wrap a page for the table request numbered `draw`.
    pub fn new(draw: u64, page: HistoryPage) -> Self {
        let data = page
            .items
            .into_iter()
            .map(|item| TableRow {
                row_id: item.row_id.clone(),
                item,
            })
            .collect();

        Self {
            draw,
            records_total: page.total_known,
            records_filtered: page.total_known,
            data,
            fully_loaded: page.is_complete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::DocPath;
    use crate::format::identity::Identity;
    use crate::format::RevisionLink;
    use crate::store::MemoryStore;

    fn item(seq: u64) -> HistoryItem {
        let revision = MemoryStore::revision(seq, "ann@example.com", 0);
        HistoryItem {
            identity: Identity {
                avatar_url: "https://example.com/a".into(),
                placeholder: false,
            },
            row_id: revision.revision_id.to_string(),
            date: "Jan 01, 1970 12:00 AM".into(),
            link: RevisionLink::new("", &DocPath::new("home").unwrap(), &revision.revision_id),
            revision,
        }
    }

    #[test]
    fn envelope_field_names() {
        let page = HistoryPage {
            items: vec![item(1), item(2)],
            total_known: 3,
            is_complete: false,
        };

        let json = serde_json::to_value(TableResponse::new(7, page)).unwrap();

        assert_eq!(json["draw"], 7);
        assert_eq!(json["recordsTotal"], 3);
        assert_eq!(json["recordsFiltered"], 3);
        assert_eq!(json["fully_loaded"], false);
        let rows = json["data"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["DT_RowId"], rows[0]["revision_id"]);
        assert_eq!(rows[0]["author_email"], "ann@example.com");
        assert!(rows[0]["link"].as_str().unwrap().starts_with("/_commit/"));
    }

    #[test]
    fn empty_complete_page() {
        let page = HistoryPage {
            items: Vec::new(),
            total_known: 0,
            is_complete: true,
        };

        let response = TableResponse::new(1, page);

        assert!(response.data.is_empty());
        assert_eq!(response.records_total, 0);
        assert!(response.fully_loaded);
    }
}
