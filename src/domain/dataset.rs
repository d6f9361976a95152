//! Export dataset snapshot types
//!
//! These types mirror the payload of the backend's series export endpoint.
//! The dataset is a read-only snapshot owned by one pipeline run; nothing
//! here is ever mutated after deserialization, and the portfolio order is
//! preserved verbatim because it defines final page order.

use crate::domain::ids::SeriesId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Series metadata plus the block templates used to annotate export pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesInfo {
    pub id: SeriesId,

    /// Series display name, used in the artifact filename
    pub nama: String,

    /// Block templates keyed by position; supplies optional instructional
    /// captions matched against a portfolio's actual content blocks
    #[serde(default)]
    pub blocks: Vec<SeriesBlockTemplate>,
}

impl SeriesInfo {
    /// Look up the instructional caption for a block position
    ///
    /// Matching is exact `block_order` equality; a portfolio block with no
    /// matching template simply renders without a caption.
    pub fn instruction_for(&self, block_order: i32) -> Option<&str> {
        self.blocks
            .iter()
            .find(|b| b.block_order == block_order)
            .and_then(|b| b.instruksi.as_deref())
    }
}

/// One entry of a series template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesBlockTemplate {
    pub block_order: i32,

    /// Optional instructional caption shown above the matching block
    #[serde(default)]
    pub instruksi: Option<String>,
}

/// Identity fields of a portfolio owner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserExportInfo {
    pub username: String,
    pub nama: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub kelas_nama: Option<String>,
    #[serde(default)]
    pub jurusan_nama: Option<String>,
    #[serde(default)]
    pub nisn: Option<String>,
    #[serde(default)]
    pub nis: Option<String>,
}

/// One published portfolio in the export dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioExportItem {
    pub id: i64,
    pub judul: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub user: UserExportInfo,
    #[serde(default)]
    pub content_blocks: Vec<ContentBlockExportItem>,
}

impl PortfolioExportItem {
    /// Content blocks sorted ascending by `block_order`
    pub fn blocks_in_order(&self) -> Vec<&ContentBlockExportItem> {
        let mut blocks: Vec<&ContentBlockExportItem> = self.content_blocks.iter().collect();
        blocks.sort_by_key(|b| b.block_order);
        blocks
    }
}

/// One typed content block of a portfolio
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlockExportItem {
    pub id: i64,
    pub block_order: i32,
    #[serde(flatten)]
    pub payload: BlockPayload,
}

/// Closed sum type over the known block variants
///
/// The wire format tags the variant with `block_type` and carries the
/// variant-specific fields under `payload`. Future variants the backend may
/// introduce deserialize into [`BlockPayload::Unknown`], which the composer
/// silently skips; an unrecognized tag is never an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "block_type", content = "payload", rename_all = "snake_case")]
pub enum BlockPayload {
    Text {
        content: String,
    },
    Image {
        url: String,
        #[serde(default)]
        caption: Option<String>,
    },
    Youtube {
        video_id: String,
        #[serde(default)]
        title: Option<String>,
    },
    Button {
        text: String,
        url: String,
    },
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    #[serde(other)]
    Unknown,
}

/// The unit fetched once per run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDataset {
    pub series: SeriesInfo,
    #[serde(default)]
    pub portfolios: Vec<PortfolioExportItem>,
}

impl ExportDataset {
    /// True when the scope matched no published portfolios
    pub fn is_empty(&self) -> bool {
        self.portfolios.is_empty()
    }

    /// Distinct owner usernames in dataset order
    ///
    /// Drives both code generation (one code per user regardless of
    /// portfolio count) and the artifact filename.
    pub fn distinct_usernames(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut usernames = Vec::new();
        for portfolio in &self.portfolios {
            if seen.insert(portfolio.user.username.clone()) {
                usernames.push(portfolio.user.username.clone());
            }
        }
        usernames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(username: &str) -> UserExportInfo {
        UserExportInfo {
            username: username.to_string(),
            nama: username.to_uppercase(),
            avatar_url: None,
            kelas_nama: None,
            jurusan_nama: None,
            nisn: None,
            nis: None,
        }
    }

    fn portfolio(id: i64, username: &str) -> PortfolioExportItem {
        PortfolioExportItem {
            id,
            judul: format!("Karya {id}"),
            created_at: Utc::now(),
            thumbnail_url: None,
            user: user(username),
            content_blocks: Vec::new(),
        }
    }

    #[test]
    fn test_block_payload_text_deserializes() {
        let json = r#"{"id": 1, "block_order": 1, "block_type": "text", "payload": {"content": "Halo"}}"#;
        let block: ContentBlockExportItem = serde_json::from_str(json).unwrap();
        assert!(matches!(block.payload, BlockPayload::Text { ref content } if content == "Halo"));
    }

    #[test]
    fn test_block_payload_image_without_caption() {
        let json = r#"{"id": 2, "block_order": 3, "block_type": "image", "payload": {"url": "https://cdn.example/x.png"}}"#;
        let block: ContentBlockExportItem = serde_json::from_str(json).unwrap();
        match block.payload {
            BlockPayload::Image { url, caption } => {
                assert_eq!(url, "https://cdn.example/x.png");
                assert!(caption.is_none());
            }
            other => panic!("Expected image payload, got {other:?}"),
        }
    }

    #[test]
    fn test_block_payload_table_deserializes() {
        let json = r#"{"id": 3, "block_order": 2, "block_type": "table",
            "payload": {"headers": ["A", "B"], "rows": [["1", "2"], ["3"]]}}"#;
        let block: ContentBlockExportItem = serde_json::from_str(json).unwrap();
        match block.payload {
            BlockPayload::Table { headers, rows } => {
                assert_eq!(headers, vec!["A", "B"]);
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[1], vec!["3"]);
            }
            other => panic!("Expected table payload, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_block_type_falls_back() {
        let json = r#"{"id": 4, "block_order": 5, "block_type": "hologram", "payload": {"beam": 3}}"#;
        let block: ContentBlockExportItem = serde_json::from_str(json).unwrap();
        assert!(matches!(block.payload, BlockPayload::Unknown));
    }

    #[test]
    fn test_blocks_in_order_sorts_ascending() {
        let mut p = portfolio(1, "alice");
        p.content_blocks = vec![
            ContentBlockExportItem {
                id: 1,
                block_order: 3,
                payload: BlockPayload::Unknown,
            },
            ContentBlockExportItem {
                id: 2,
                block_order: 1,
                payload: BlockPayload::Unknown,
            },
        ];
        let ordered = p.blocks_in_order();
        assert_eq!(ordered[0].block_order, 1);
        assert_eq!(ordered[1].block_order, 3);
    }

    #[test]
    fn test_distinct_usernames_preserves_dataset_order() {
        let dataset = ExportDataset {
            series: SeriesInfo {
                id: SeriesId::new(1).unwrap(),
                nama: "Demo".to_string(),
                blocks: Vec::new(),
            },
            portfolios: vec![
                portfolio(1, "budi"),
                portfolio(2, "siti"),
                portfolio(3, "budi"),
                portfolio(4, "ahmad"),
            ],
        };
        assert_eq!(dataset.distinct_usernames(), vec!["budi", "siti", "ahmad"]);
    }

    #[test]
    fn test_instruction_for_exact_match_only() {
        let series = SeriesInfo {
            id: SeriesId::new(1).unwrap(),
            nama: "Demo".to_string(),
            blocks: vec![
                SeriesBlockTemplate {
                    block_order: 1,
                    instruksi: Some("Tuliskan pengalamanmu".to_string()),
                },
                SeriesBlockTemplate {
                    block_order: 2,
                    instruksi: None,
                },
            ],
        };
        assert_eq!(series.instruction_for(1), Some("Tuliskan pengalamanmu"));
        assert_eq!(series.instruction_for(2), None);
        assert_eq!(series.instruction_for(9), None);
    }

    #[test]
    fn test_empty_dataset_detection() {
        let dataset = ExportDataset {
            series: SeriesInfo {
                id: SeriesId::new(1).unwrap(),
                nama: "Demo".to_string(),
                blocks: Vec::new(),
            },
            portfolios: Vec::new(),
        };
        assert!(dataset.is_empty());
    }
}
