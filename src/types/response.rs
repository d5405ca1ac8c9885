//! Response type definitions
//!
//! Typed views over portal payloads. Records are passed through largely
//! unmodified; only the fields the client must reason about are normalized,
//! everything else stays in an opaque extra map.

use crate::types::serde_helpers::{
    deserialize_flexible_count, deserialize_flexible_episodes, deserialize_flexible_id,
};
use serde::{Deserialize, Serialize};

/// A category or genre entry from the portal catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Upstream category identifier (`*` denotes "all")
    #[serde(default, deserialize_with = "deserialize_flexible_id")]
    pub id: Option<String>,
    /// Display title
    #[serde(default)]
    pub title: String,
    /// Remaining upstream fields, passed through untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One listing record (a movie, channel, or series folder)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Upstream content identifier
    #[serde(default, deserialize_with = "deserialize_flexible_id")]
    pub id: Option<String>,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Upstream playback command, when the portal supplies one
    #[serde(default)]
    pub cmd: Option<String>,
    /// Episode numbers when this record is a series/season folder
    #[serde(default, deserialize_with = "deserialize_flexible_episodes")]
    pub series: Vec<u32>,
    /// Remaining upstream fields, passed through untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Record {
    /// Whether this record is a folder of sub-items rather than directly
    /// playable content
    pub fn is_folder(&self) -> bool {
        !self.series.is_empty()
    }

    /// First and last episode number for a series folder
    pub fn episode_range(&self) -> Option<(u32, u32)> {
        match (self.series.first(), self.series.last()) {
            (Some(&first), Some(&last)) => Some((first, last)),
            _ => None,
        }
    }
}

/// One upstream listing page as returned by `get_ordered_list`
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    /// Records on this page
    #[serde(default)]
    pub data: Vec<Record>,
    /// Total matching items across all pages
    #[serde(default, deserialize_with = "deserialize_flexible_count")]
    pub total_items: u32,
    /// Upstream page size
    #[serde(default, deserialize_with = "deserialize_flexible_count")]
    pub max_page_items: u32,
}

/// Concatenation of a fetched page window into one logical page.
///
/// `total_items` and `page_size` reflect the last page fetched in the
/// window, mirroring upstream behaviour.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AggregatedListing {
    /// Records in fetch order
    pub records: Vec<Record>,
    /// Total matching items reported by the final fetched page
    pub total_items: u32,
    /// Page size reported by the final fetched page
    pub page_size: u32,
}

impl AggregatedListing {
    /// Number of records aggregated across the window
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the window produced no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_record_folder_detection() {
        let folder: Record = serde_json::from_value(json!({
            "id": "99", "name": "The Blacklist S10", "series": [1, 2, 3]
        }))
        .unwrap();
        assert!(folder.is_folder());
        assert_eq!(folder.episode_range(), Some((1, 3)));

        let movie: Record = serde_json::from_value(json!({
            "id": 42, "name": "Some Movie", "series": []
        }))
        .unwrap();
        assert!(!movie.is_folder());
        assert_eq!(movie.episode_range(), None);
    }

    #[test]
    fn test_record_preserves_unknown_fields() {
        let record: Record = serde_json::from_value(json!({
            "id": "7", "name": "USA NETWORK", "hd": 1,
            "screenshot_uri": "/shots/7.png"
        }))
        .unwrap();
        assert_eq!(record.extra["hd"], json!(1));
        assert_eq!(record.extra["screenshot_uri"], json!("/shots/7.png"));
    }

    #[test]
    fn test_page_with_string_counters() {
        let page: Page = serde_json::from_value(json!({
            "data": [{"id": "1", "name": "A"}],
            "total_items": "10",
            "max_page_items": "2"
        }))
        .unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.total_items, 10);
        assert_eq!(page.max_page_items, 2);
    }

    #[test]
    fn test_page_defaults_when_fields_absent() {
        let page: Page = serde_json::from_value(json!({})).unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.total_items, 0);
        assert_eq!(page.max_page_items, 0);
    }

    #[test]
    fn test_category_with_wildcard_id() {
        let category: Category =
            serde_json::from_value(json!({"id": "*", "title": "All"})).unwrap();
        assert_eq!(category.id.as_deref(), Some("*"));
        assert_eq!(category.title, "All");
    }

    #[test]
    fn test_aggregated_listing_len() {
        let listing = AggregatedListing::default();
        assert!(listing.is_empty());
        assert_eq!(listing.len(), 0);
    }
}
