//! Record shapes flowing through the pipeline.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One image entry: resolution key -> URL.
pub type ImageDescriptor = Map<String, Value>;

/// A marketplace listing as found in a source page.
///
/// Fields the pipeline does not look at are kept in `extra` so a cached
/// snapshot carries the full record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawListing {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: f64,
    #[serde(default)]
    pub num_favorers: u64,
    #[serde(default)]
    pub who_made: Option<String>,
    #[serde(default)]
    pub category_path_ids: Vec<i64>,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(rename = "Images", alias = "images", default)]
    pub images: Vec<ImageDescriptor>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Final per-item projection written to the items artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedItem {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category_path_ids: Vec<i64>,
    pub category_id: i64,
    pub materials: Vec<String>,
    pub images: Vec<ImageDescriptor>,
    pub handmade: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_favorers: Option<u64>,
}

/// Row of the category reference table, restricted to the exported fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub category_id: i64,
    #[serde(default)]
    pub page_title: Option<String>,
    #[serde(default)]
    pub page_description: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub parent: Option<Value>,
}

/// Prices show up both as JSON numbers and as decimal strings ("12.50").
fn lenient_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| serde::de::Error::custom(format!("price {} out of range", n))),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("price {:?} is not a number", s))),
        Value::Null => Ok(0.0),
        other => Err(serde::de::Error::custom(format!(
            "price has unexpected type: {}",
            other
        ))),
    }
}
