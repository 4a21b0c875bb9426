//! Title and description handed to the uploader alongside the video

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// "News & Politics" on the video platform
pub const NEWS_CATEGORY_ID: &str = "25";

/// Upload parameters for one generated video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadMetadata {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub category_id: String,
    pub privacy_status: String,
}

impl UploadMetadata {
    /// Metadata stamped with the given local time
    pub fn for_timestamp(at: NaiveDateTime) -> Self {
        let date = at.format("%Y-%m-%d");
        let time = at.format("%H:%M:%S");

        Self {
            title: format!("Auto News || Date : {}", date),
            description: format!(
                "This video was generated automatically from the day's top headlines. \
                 Date of upload : {} and Time of upload : {}.\n\n\
                 Subscribe and hit the bell icon to be notified of new uploads",
                date, time
            ),
            tags: ["news", "auto-generated", "rust"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
            category_id: NEWS_CATEGORY_ID.to_string(),
            privacy_status: "public".to_string(),
        }
    }

    /// Metadata stamped with the current local time
    pub fn now() -> Self {
        Self::for_timestamp(Local::now().naive_local())
    }
}
