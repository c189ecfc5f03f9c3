use std::path::PathBuf;
use thiserror::Error;

use crate::provider::ProviderError;

#[derive(Error, Debug)]
pub enum TubesenseError {
    #[error("Search failed for {query}: {reason}")]
    SearchFailed { query: String, reason: String },

    #[error("Invalid ISO-8601 duration {value:?} for video {video_id}")]
    InvalidDuration { video_id: String, value: String },

    #[error("Completion failed: {reason}")]
    CompletionFailed { reason: String },

    #[error("Failed to parse JSON from model response")]
    UnparseableResponse,

    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Failed to set up the transcript client: {reason}")]
    CaptionClient { reason: String },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Missing API key: {env_var} environment variable is not set")]
    MissingApiKey { env_var: String },
}

pub type Result<T> = std::result::Result<T, TubesenseError>;

/// Per-video transcript failures; the stage logs these and moves on
#[derive(Error, Debug)]
pub enum TranscriptError {
    #[error("No usable transcript found for {video_id}")]
    NoTranscriptFound { video_id: String },

    #[error("Transcripts are disabled for {video_id}")]
    TranscriptsDisabled { video_id: String },

    #[error("Video {video_id} is unavailable")]
    VideoUnavailable { video_id: String },

    #[error("YouTube is blocking transcript requests for {video_id}")]
    RequestBlocked { video_id: String },

    #[error("Could not retrieve transcript for {video_id}: {reason}")]
    CouldNotRetrieve { video_id: String, reason: String },

    #[error("Malformed transcript response for {video_id}: {reason}")]
    Malformed { video_id: String, reason: String },
}
