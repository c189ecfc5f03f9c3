use std::{path::PathBuf, time::Duration};

use crate::{
    error::{Result, TubesenseError},
    provider::Provider,
};

pub const DEFAULT_PHONES: [&str; 10] = [
    "'iPhone 16 Pro Max'",
    "'Samsung Galaxy S25 Ultra'",
    "'Google Pixel 9 Pro'",
    "'OnePlus 12'",
    "'Google Pixel 9 Pro Fold'",
    "'Samsung Galaxy S24 Ultra'",
    "'Apple iPhone 16'",
    "'Moto Edge 2024'",
    "'Samsung Galaxy S25'",
    "'Nothing Phone 3a Pro'",
];

pub const DEFAULT_MAX_RESULTS: u32 = 150;

/// Videos shorter than this are treated as Shorts
pub const DEFAULT_MIN_DURATION: Duration = Duration::from_secs(90);

pub const YOUTUBE_API_KEY_VARS: [&str; 2] = ["YOUTUBE_API_KEY", "yt_api_key"];

/// Everything one pipeline run needs, built once and handed to each stage
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub phones: Vec<String>,
    pub reviews_csv: PathBuf,
    pub transcripts_dir: PathBuf,
    pub results_dir: PathBuf,
    pub max_results: u32,
    pub min_duration: Duration,
    pub provider: Provider,
    pub jobs: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            phones: DEFAULT_PHONES.iter().map(|p| p.to_string()).collect(),
            reviews_csv: PathBuf::from("top_youtube_reviews.csv"),
            transcripts_dir: PathBuf::from("transcripts"),
            results_dir: PathBuf::from("sentiment_results"),
            max_results: DEFAULT_MAX_RESULTS,
            min_duration: DEFAULT_MIN_DURATION,
            provider: Provider::default(),
            jobs: 1,
        }
    }
}

impl PipelineConfig {
    /// Bound on in-flight items for the per-item stages, never below one
    pub fn concurrency(&self) -> usize {
        self.jobs.max(1)
    }
}

/// Load `.env` from the working directory (or a parent) if one exists
pub fn load_env_file() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// API key for the YouTube Data API
pub fn youtube_api_key() -> Result<String> {
    YOUTUBE_API_KEY_VARS
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()))
        .ok_or_else(|| TubesenseError::MissingApiKey {
            env_var: YOUTUBE_API_KEY_VARS[0].to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_batch_layout() {
        let config = PipelineConfig::default();
        assert_eq!(config.phones.len(), 10);
        assert_eq!(config.phones[0], "'iPhone 16 Pro Max'");
        assert_eq!(config.reviews_csv, PathBuf::from("top_youtube_reviews.csv"));
        assert_eq!(config.transcripts_dir, PathBuf::from("transcripts"));
        assert_eq!(config.results_dir, PathBuf::from("sentiment_results"));
        assert_eq!(config.min_duration, Duration::from_secs(90));
        assert_eq!(config.max_results, 150);
    }

    #[test]
    fn zero_jobs_still_runs_one_item() {
        let config = PipelineConfig {
            jobs: 0,
            ..Default::default()
        };
        assert_eq!(config.concurrency(), 1);
    }
}
