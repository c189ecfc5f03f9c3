use std::path::Path;

use futures::{StreamExt, stream};
use tokio::fs;

use crate::{
    captions::TranscriptSource,
    config::PipelineConfig,
    error::{Result, TranscriptError},
    format::format_transcript_plain,
    paths::get_transcript_path,
    types::{CaptionTrack, ReviewEntry, Snippet, TranscriptListing, TranscriptReport},
};

pub const TARGET_LANGUAGE: &str = "en";

/// Video id from the `v=` query parameter, if the URL has a non-empty one
pub fn extract_video_id(url: &str) -> Option<&str> {
    if !url.contains("v=") {
        return None;
    }
    let id = url.rsplit("v=").next()?.split('&').next()?;
    (!id.is_empty()).then_some(id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackChoice<'a> {
    Native(&'a CaptionTrack),
    Translated(&'a CaptionTrack),
}

/// Pick the track to fetch for `language`
///
/// A manual track in the language wins over a generated one; failing both,
/// the first translatable track is machine-translated.
pub fn choose_track<'a>(listing: &'a TranscriptListing, language: &str) -> Option<TrackChoice<'a>> {
    let in_language = |generated: bool| {
        listing
            .tracks
            .iter()
            .find(|t| t.language_code == language && t.is_generated == generated)
    };

    in_language(false)
        .or_else(|| in_language(true))
        .map(TrackChoice::Native)
        .or_else(|| {
            listing
                .tracks
                .iter()
                .find(|t| t.is_translatable)
                .map(TrackChoice::Translated)
        })
}

/// Fetch an English transcript, translating when no English track exists
pub async fn fetch_english_transcript<S: TranscriptSource + ?Sized>(
    source: &S,
    video_id: &str,
) -> std::result::Result<Vec<Snippet>, TranscriptError> {
    let listing = source.list_transcripts(video_id).await?;

    match choose_track(&listing, TARGET_LANGUAGE) {
        Some(TrackChoice::Native(track)) => source.fetch_track(video_id, track, None).await,
        Some(TrackChoice::Translated(track)) => {
            tracing::debug!(video_id, from = %track.language_code, "translating transcript");
            source
                .fetch_track(video_id, track, Some(TARGET_LANGUAGE))
                .await
        }
        None => Err(TranscriptError::NoTranscriptFound {
            video_id: video_id.to_string(),
        }),
    }
}

/// Read the review CSV, skipping rows that are too short to use
pub fn read_review_entries(path: &Path) -> Result<(Vec<ReviewEntry>, usize)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let mut entries = Vec::new();
    let mut skipped = 0;
    for record in reader.records() {
        let record = record?;
        match (record.get(0), record.get(1)) {
            (Some(phone), Some(url)) => entries.push(ReviewEntry {
                phone: phone.to_string(),
                url: url.to_string(),
            }),
            _ => {
                tracing::warn!(row = ?record, "skipping malformed review row");
                skipped += 1;
            }
        }
    }

    Ok((entries, skipped))
}

async fn save_entry<S: TranscriptSource + ?Sized>(
    source: &S,
    transcripts_dir: &Path,
    entry: ReviewEntry,
) -> bool {
    let Some(video_id) = extract_video_id(&entry.url) else {
        tracing::warn!(url = %entry.url, "invalid video URL");
        return false;
    };
    let phone = entry.phone.trim();

    tracing::info!(phone, video_id, "downloading transcript");

    let snippets = match fetch_english_transcript(source, video_id).await {
        Ok(snippets) => snippets,
        Err(e) => {
            tracing::warn!(video_id, url = %entry.url, error = %e, "no usable transcript");
            return false;
        }
    };

    let path = get_transcript_path(transcripts_dir, phone, video_id);
    if let Err(e) = fs::write(&path, format_transcript_plain(&snippets)).await {
        tracing::warn!(path = %path.display(), error = %e, "failed to write transcript");
        return false;
    }

    tracing::info!(path = %path.display(), "saved transcript");
    true
}

/// Stage 2: fetch a transcript for every review row
pub async fn run_transcripts<S: TranscriptSource + ?Sized>(
    source: &S,
    config: &PipelineConfig,
) -> Result<TranscriptReport> {
    fs::create_dir_all(&config.transcripts_dir).await?;

    let (entries, malformed) = read_review_entries(&config.reviews_csv)?;
    let mut report = TranscriptReport {
        saved: 0,
        skipped: malformed,
    };

    let mut outcomes = stream::iter(
        entries
            .into_iter()
            .map(|entry| save_entry(source, &config.transcripts_dir, entry)),
    )
    .buffered(config.concurrency());

    while let Some(saved) = outcomes.next().await {
        if saved {
            report.saved += 1;
        } else {
            report.skipped += 1;
        }
    }

    Ok(report)
}
