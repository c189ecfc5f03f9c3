//! Tubesense Core Library
//!
//! Finds YouTube phone reviews, downloads their transcripts, and scores
//! sentiment and sponsorship disclosure with a language model.

pub mod analysis;
pub mod captions;
pub mod config;
pub mod discovery;
pub mod error;
pub mod extract;
pub mod format;
pub mod llm;
pub mod paths;
pub mod pipeline;
pub mod provider;
pub mod transcripts;
pub mod types;
pub mod youtube;

// Re-export commonly used items at crate root
pub use analysis::{analyze_text, build_prompt, run_analysis, summary_row};
pub use captions::{TranscriptSource, YouTubeCaptions};
pub use config::{PipelineConfig, load_env_file, youtube_api_key};
pub use discovery::{find_reviews, parse_iso8601_duration, run_discovery};
pub use error::{Result, TranscriptError, TubesenseError};
pub use extract::{Extracted, extract_json};
pub use format::{format_summary_readable, format_transcript_plain};
pub use llm::{ChatCompletionClient, CompletionClient};
pub use paths::{get_analysis_path, get_summary_path, get_transcript_path, sanitize_phone_name};
pub use pipeline::{PipelineReport, Services, run_all};
pub use provider::{Provider, ProviderConfig, ProviderError};
pub use transcripts::{extract_video_id, fetch_english_transcript, run_transcripts};
pub use types::{
    AnalysisReport, CaptionTrack, DiscoveryReport, ReviewEntry, Snippet, SummaryRow,
    TranscriptListing, TranscriptReport,
};
pub use youtube::{VideoSearch, YouTubeDataApi};
