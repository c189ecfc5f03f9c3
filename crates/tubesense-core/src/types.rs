use serde::{Deserialize, Serialize};

/// One row of the discovery CSV
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewEntry {
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "YouTube Review URL")]
    pub url: String,
}

impl ReviewEntry {
    pub const HEADERS: [&'static str; 2] = ["Phone", "YouTube Review URL"];
}

/// A caption track offered for a video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionTrack {
    pub language_code: String,
    pub language: String,
    pub is_generated: bool,
    pub is_translatable: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscriptListing {
    pub video_id: String,
    pub tracks: Vec<CaptionTrack>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// One row of the sentiment summary CSV
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub filename: String,
    pub overall_sentiment: String,
    pub polarity: String,
    pub subjectivity: String,
    pub highlighted_phrases: String,
    pub is_advertisement: String,
    pub advertisement_explanation: String,
    pub sentiment_explanation: String,
}

impl SummaryRow {
    pub const HEADERS: [&'static str; 8] = [
        "filename",
        "overall_sentiment",
        "polarity",
        "subjectivity",
        "highlighted_phrases",
        "is_advertisement",
        "advertisement_explanation",
        "sentiment_explanation",
    ];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscoveryReport {
    pub phones: usize,
    pub rows_written: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranscriptReport {
    pub saved: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisReport {
    pub rows: Vec<SummaryRow>,
    pub failed: usize,
}

impl AnalysisReport {
    pub fn analyzed(&self) -> usize {
        self.rows.len()
    }
}
