//! Normalization of scraped payloads pushed by the browser extension.
//!
//! The extension posts a free-form JSON object; each entry under
//! `data.results` is decoded as a feed post or a profile search result.
//! An entry that decodes as neither is rejected outright rather than being
//! silently treated as a profile.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Provenance marker stamped on every normalized record, distinguishing
/// externally-ingested records from stored events.
pub const PROVENANCE: &str = "chrome_extension";

const FEED_POSTS_CONTENT: &str = "feed_posts";
const FEED_POST_TYPE: &str = "feed_post";

#[derive(Debug, Deserialize)]
struct ExtensionPayload {
    source: Option<String>,
    timestamp: Option<String>,
    #[serde(default)]
    data: ScrapedData,
}

#[derive(Debug, Default, Deserialize)]
struct ScrapedData {
    #[serde(default)]
    results: Vec<Value>,
    #[serde(rename = "contentType")]
    content_type: Option<String>,
    #[serde(rename = "searchKeywords", default)]
    search_keywords: String,
}

/// A normalized scraper record. The `type` tag discriminates the two shapes
/// on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NormalizedRecord {
    FeedPost(FeedPostRecord),
    Profile(ProfileRecord),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedPostRecord {
    pub id: Option<Value>,
    pub name: String,
    pub author: String,
    pub description: String,
    pub event_type: String,
    pub platform: String,
    pub urn: String,
    pub likes: i64,
    pub comments: i64,
    pub reposts: i64,
    #[serde(rename = "extractedAt")]
    pub extracted_at: Option<String>,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub id: Option<Value>,
    pub name: String,
    pub description: String,
    pub event_type: String,
    pub platform: String,
    pub link: String,
    pub location: String,
    pub image_url: String,
    #[serde(rename = "extractedAt")]
    pub extracted_at: Option<String>,
    pub keywords: String,
    pub source: String,
}

/// The per-session batch: normalized records plus the raw payload they came
/// from. One slot per session; each ingest overwrites the previous batch.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoredBatch {
    pub data: Vec<NormalizedRecord>,
    pub timestamp: String,
    pub source: String,
    pub original_data: Value,
}

/// Raw scraper entry carrying its own `type` tag.
#[derive(Debug, Deserialize)]
struct FeedPostEntry {
    #[serde(rename = "type")]
    kind: String,
    id: Option<Value>,
    author: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    urn: String,
    #[serde(default)]
    likes: i64,
    #[serde(default)]
    comments: i64,
    #[serde(default)]
    reposts: i64,
    #[serde(rename = "extractedAt")]
    extracted_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProfileEntry {
    id: Option<Value>,
    name: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(rename = "profileUrl")]
    profile_url: Option<String>,
    #[serde(default)]
    location: String,
    #[serde(rename = "imageUrl", default)]
    image_url: String,
    #[serde(rename = "extractedAt")]
    extracted_at: Option<String>,
}

/// Normalizes a full extension payload into a storable batch.
/// `source` defaults to "unknown" and `timestamp` to the current server
/// time, matching what the extension omits in practice.
pub fn normalize_payload(raw: &Value) -> Result<StoredBatch, String> {
    let payload: ExtensionPayload =
        serde_json::from_value(raw.clone()).map_err(|e| format!("Malformed payload: {e}"))?;

    let content_type = payload
        .data
        .content_type
        .unwrap_or_else(|| "search_results".to_string());

    let mut records = Vec::with_capacity(payload.data.results.len());
    for (index, entry) in payload.data.results.iter().enumerate() {
        records.push(normalize_entry(
            entry,
            index,
            &content_type,
            &payload.data.search_keywords,
        )?);
    }

    Ok(StoredBatch {
        data: records,
        timestamp: payload
            .timestamp
            .unwrap_or_else(|| Utc::now().to_rfc3339()),
        source: payload.source.unwrap_or_else(|| "unknown".to_string()),
        original_data: raw.get("data").cloned().unwrap_or(Value::Null),
    })
}

fn normalize_entry(
    entry: &Value,
    index: usize,
    content_type: &str,
    search_keywords: &str,
) -> Result<NormalizedRecord, String> {
    if content_type == FEED_POSTS_CONTENT {
        if let Ok(post) = serde_json::from_value::<FeedPostEntry>(entry.clone()) {
            if post.kind == FEED_POST_TYPE {
                return Ok(NormalizedRecord::FeedPost(FeedPostRecord {
                    id: post.id,
                    name: "Feed Post".to_string(),
                    author: post.author.unwrap_or_else(|| "Unknown".to_string()),
                    description: post.description,
                    event_type: FEED_POST_TYPE.to_string(),
                    platform: "linkedin".to_string(),
                    urn: post.urn,
                    likes: post.likes,
                    comments: post.comments,
                    reposts: post.reposts,
                    extracted_at: post.extracted_at,
                    source: PROVENANCE.to_string(),
                }));
            }
        }
    }

    // Anything else, including entries under an unrecognized contentType,
    // is read as a profile search result.
    match serde_json::from_value::<ProfileEntry>(entry.clone()) {
        Ok(profile) => Ok(NormalizedRecord::Profile(ProfileRecord {
            id: profile.id,
            name: profile.name.unwrap_or_else(|| "Unknown".to_string()),
            description: profile.description,
            event_type: "profile".to_string(),
            platform: "linkedin".to_string(),
            link: profile.profile_url.unwrap_or_else(|| "#".to_string()),
            location: profile.location,
            image_url: profile.image_url,
            extracted_at: profile.extracted_at,
            keywords: search_keywords.to_string(),
            source: PROVENANCE.to_string(),
        })),
        Err(_) => Err(format!(
            "results[{index}] is neither a feed post nor a profile result"
        )),
    }
}
