use async_trait::async_trait;
use yt_transcript_rs::api::YouTubeTranscriptApi;

use crate::{
    error::{Result, TranscriptError, TubesenseError},
    types::{CaptionTrack, Snippet, TranscriptListing},
};

/// Lists and downloads caption tracks for a video
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn list_transcripts(
        &self,
        video_id: &str,
    ) -> std::result::Result<TranscriptListing, TranscriptError>;

    /// Download `track`, machine-translated to `translate_to` when given
    async fn fetch_track(
        &self,
        video_id: &str,
        track: &CaptionTrack,
        translate_to: Option<&str>,
    ) -> std::result::Result<Vec<Snippet>, TranscriptError>;
}

/// Caption retrieval from youtube.com through `yt-transcript-rs`
pub struct YouTubeCaptions {
    api: YouTubeTranscriptApi,
    http: reqwest::Client,
}

impl YouTubeCaptions {
    /// Client without proxy or cookie authentication
    pub fn new() -> Result<Self> {
        let api = YouTubeTranscriptApi::new(None, None, None).map_err(|e| {
            TubesenseError::CaptionClient {
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            api,
            http: reqwest::Client::new(),
        })
    }
}

#[async_trait]
impl TranscriptSource for YouTubeCaptions {
    async fn list_transcripts(
        &self,
        video_id: &str,
    ) -> std::result::Result<TranscriptListing, TranscriptError> {
        let list = self
            .api
            .list_transcripts(video_id)
            .await
            .map_err(|e| classify_failure(video_id, &e.to_string()))?;

        let tracks = list
            .transcripts()
            .map(|t| CaptionTrack {
                language_code: t.language_code.clone(),
                language: t.language.clone(),
                is_generated: t.is_generated,
                is_translatable: t.is_translatable(),
            })
            .collect();

        Ok(TranscriptListing {
            video_id: video_id.to_string(),
            tracks,
        })
    }

    async fn fetch_track(
        &self,
        video_id: &str,
        track: &CaptionTrack,
        translate_to: Option<&str>,
    ) -> std::result::Result<Vec<Snippet>, TranscriptError> {
        let list = self
            .api
            .list_transcripts(video_id)
            .await
            .map_err(|e| classify_failure(video_id, &e.to_string()))?;

        let found = list
            .transcripts()
            .find(|t| t.language_code == track.language_code && t.is_generated == track.is_generated)
            .ok_or_else(|| TranscriptError::NoTranscriptFound {
                video_id: video_id.to_string(),
            })?;

        let fetched = match translate_to {
            Some(lang) => {
                found
                    .translate(lang)
                    .map_err(|e| classify_failure(video_id, &e.to_string()))?
                    .fetch(&self.http, false)
                    .await
            }
            None => found.fetch(&self.http, false).await,
        }
        .map_err(|e| classify_failure(video_id, &e.to_string()))?;

        Ok(fetched
            .snippets
            .into_iter()
            .map(|s| Snippet {
                text: s.text,
                start: s.start,
                duration: s.duration,
            })
            .collect())
    }
}

/// Map a retrieval failure message onto the per-video error kinds
pub fn classify_failure(video_id: &str, message: &str) -> TranscriptError {
    let lowered = message.to_lowercase();
    let video_id = video_id.to_string();

    if lowered.contains("subtitles are disabled") || lowered.contains("transcripts disabled") {
        TranscriptError::TranscriptsDisabled { video_id }
    } else if lowered.contains("no transcripts were found") {
        TranscriptError::NoTranscriptFound { video_id }
    } else if lowered.contains("no longer available") || lowered.contains("video unavailable") {
        TranscriptError::VideoUnavailable { video_id }
    } else if lowered.contains("blocking requests") || lowered.contains("ip blocked") {
        TranscriptError::RequestBlocked { video_id }
    } else if lowered.contains("unparsable") || lowered.contains("could not be parsed") {
        TranscriptError::Malformed {
            video_id,
            reason: message.to_string(),
        }
    } else {
        TranscriptError::CouldNotRetrieve {
            video_id,
            reason: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_map_to_their_kind() {
        let disabled = "Could not retrieve a transcript for the video https://www.youtube.com/watch?v=abc! This is most likely caused by:\n\nSubtitles are disabled for this video";
        assert!(matches!(
            classify_failure("abc", disabled),
            TranscriptError::TranscriptsDisabled { .. }
        ));

        assert!(matches!(
            classify_failure(
                "abc",
                "No transcripts were found for any of the requested language codes: [\"en\"]"
            ),
            TranscriptError::NoTranscriptFound { .. }
        ));
        assert!(matches!(
            classify_failure("abc", "The video is no longer available"),
            TranscriptError::VideoUnavailable { .. }
        ));
        assert!(matches!(
            classify_failure("abc", "YouTube is blocking requests from your IP"),
            TranscriptError::RequestBlocked { .. }
        ));
        assert!(matches!(
            classify_failure("abc", "The data required to fetch the transcript is unparsable"),
            TranscriptError::Malformed { .. }
        ));
    }

    #[test]
    fn unknown_failures_keep_their_message() {
        match classify_failure("abc", "connection reset by peer") {
            TranscriptError::CouldNotRetrieve { video_id, reason } => {
                assert_eq!(video_id, "abc");
                assert_eq!(reason, "connection reset by peer");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
