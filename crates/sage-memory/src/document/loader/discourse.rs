use std::path::Path;

use serde::Deserialize;
use serde::de::Deserializer;

use super::super::error::DocumentError;

/// One exported forum post. `post_id` arrives as a JSON number or string
/// depending on the exporter version; both are normalized to a string.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoursePost {
    #[serde(deserialize_with = "deserialize_post_id")]
    pub post_id: String,
    pub url: String,
    #[serde(default)]
    pub content: String,
}

fn deserialize_post_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Num(u64),
        Text(String),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Num(value) => Ok(value.to_string()),
        Repr::Text(text) => Ok(text),
    }
}

/// Load the post export: a JSON array of post objects.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid JSON.
pub async fn load_posts(path: &Path) -> Result<Vec<DiscoursePost>, DocumentError> {
    let raw = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&raw)?)
}
