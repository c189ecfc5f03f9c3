use std::{
    collections::HashMap,
    path::Path,
    sync::Mutex,
};

use async_trait::async_trait;
use tubesense_core::{
    CaptionTrack, CompletionClient, PipelineConfig, Result, Services, Snippet, TranscriptError,
    TranscriptListing, TranscriptSource, VideoSearch, run_all, run_analysis, run_transcripts,
};

const POSITIVE: &str = r#"{"sentiment":{"overall":"positive","polarity":0.8,"subjectivity":0.5,"explanation":"...","highlighted_phrases":["great camera"]},"advertisement":{"is_ad":"No","explanation":"..."}}"#;

/// Answers by looking for a marker word in the prompt
struct ScriptedModel {
    answers: Vec<(&'static str, String)>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    fn new(answers: Vec<(&'static str, String)>) -> Self {
        Self {
            answers,
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CompletionClient for ScriptedModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self
            .answers
            .iter()
            .find(|(marker, _)| prompt.contains(marker))
            .map(|(_, answer)| answer.clone())
            .unwrap_or_else(|| "I'm not able to help with that.".to_string()))
    }
}

#[derive(Default)]
struct FakeCaptions {
    listings: HashMap<&'static str, Vec<CaptionTrack>>,
    translations: Mutex<Vec<String>>,
}

fn track(code: &str, translatable: bool) -> CaptionTrack {
    CaptionTrack {
        language_code: code.to_string(),
        language: code.to_string(),
        is_generated: false,
        is_translatable: translatable,
    }
}

#[async_trait]
impl TranscriptSource for FakeCaptions {
    async fn list_transcripts(
        &self,
        video_id: &str,
    ) -> std::result::Result<TranscriptListing, TranscriptError> {
        match self.listings.get(video_id) {
            Some(tracks) => Ok(TranscriptListing {
                video_id: video_id.to_string(),
                tracks: tracks.clone(),
            }),
            None => Err(TranscriptError::VideoUnavailable {
                video_id: video_id.to_string(),
            }),
        }
    }

    async fn fetch_track(
        &self,
        video_id: &str,
        track: &CaptionTrack,
        translate_to: Option<&str>,
    ) -> std::result::Result<Vec<Snippet>, TranscriptError> {
        if let Some(lang) = translate_to {
            self.translations
                .lock()
                .unwrap()
                .push(format!("{}:{}->{}", video_id, track.language_code, lang));
        }
        Ok(vec![
            Snippet {
                text: format!("{} review {}", video_id, translate_to.unwrap_or(&track.language_code)),
                start: 0.0,
                duration: 2.0,
            },
            Snippet {
                text: "great camera".to_string(),
                start: 2.0,
                duration: 2.0,
            },
        ])
    }
}

fn config_in(root: &Path) -> PipelineConfig {
    PipelineConfig {
        phones: vec!["'Google Pixel 9 Pro'".to_string()],
        reviews_csv: root.join("top_youtube_reviews.csv"),
        transcripts_dir: root.join("transcripts"),
        results_dir: root.join("sentiment_results"),
        ..Default::default()
    }
}

fn json_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .flatten()
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".json"))
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn one_good_and_one_unparseable_transcript() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    std::fs::create_dir_all(&config.transcripts_dir).unwrap();
    std::fs::write(config.transcripts_dir.join("Pixel-good.txt"), "MARKER_GOOD the camera").unwrap();
    std::fs::write(config.transcripts_dir.join("Pixel-bad.txt"), "MARKER_BAD mumbling").unwrap();

    let model = ScriptedModel::new(vec![
        ("MARKER_GOOD", format!("```json\n{}\n```", POSITIVE)),
        ("MARKER_BAD", "Sorry, no JSON today.".to_string()),
    ]);

    let report = run_analysis(&model, &config).await.unwrap();
    assert_eq!(report.analyzed(), 1);
    assert_eq!(report.failed, 1);
    assert_eq!(model.prompts.lock().unwrap().len(), 2);

    assert_eq!(json_files(&config.results_dir), ["Pixel-good.json"]);

    let saved: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(config.results_dir.join("Pixel-good.json")).unwrap(),
    )
    .unwrap();
    let expected: serde_json::Value = serde_json::from_str(POSITIVE).unwrap();
    assert_eq!(saved, expected);

    let summary =
        std::fs::read_to_string(config.results_dir.join("sentiment_summary.csv")).unwrap();
    let lines: Vec<_> = summary.lines().collect();
    assert_eq!(
        lines,
        [
            "filename,overall_sentiment,polarity,subjectivity,highlighted_phrases,is_advertisement,advertisement_explanation,sentiment_explanation",
            "Pixel-good.txt,positive,0.8,0.5,great camera,No,...,...",
        ]
    );
}

#[tokio::test]
async fn empty_transcript_dir_still_writes_header() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    std::fs::create_dir_all(&config.transcripts_dir).unwrap();

    let report = run_analysis(&ScriptedModel::new(Vec::new()), &config)
        .await
        .unwrap();
    assert_eq!(report.analyzed(), 0);

    let summary =
        std::fs::read_to_string(config.results_dir.join("sentiment_summary.csv")).unwrap();
    assert_eq!(summary.lines().count(), 1);
}

#[tokio::test]
async fn transcripts_skip_bad_rows_and_translate_when_needed() {
    let dir = tempfile::tempdir().unwrap();
    let config = PipelineConfig {
        jobs: 3,
        ..config_in(dir.path())
    };
    std::fs::write(
        &config.reviews_csv,
        "Phone,YouTube Review URL\n\
         'OnePlus 12',https://www.youtube.com/watch?v=english\n\
         'OnePlus 12',https://youtu.be/no-parameter\n\
         'Moto Edge 2024',https://www.youtube.com/watch?v=german&t=10\n\
         'Moto Edge 2024',https://www.youtube.com/watch?v=gone\n\
         'Moto Edge 2024',https://www.youtube.com/watch?v=locked\n",
    )
    .unwrap();

    let captions = FakeCaptions {
        listings: HashMap::from([
            ("english", vec![track("de", true), track("en", false)]),
            ("german", vec![track("ja", false), track("de", true)]),
            ("locked", vec![track("ja", false)]),
        ]),
        ..Default::default()
    };

    let report = run_transcripts(&captions, &config).await.unwrap();
    assert_eq!(report.saved, 2);
    assert_eq!(report.skipped, 3);

    let english =
        std::fs::read_to_string(config.transcripts_dir.join("OnePlus_12-english.txt")).unwrap();
    assert_eq!(english, "english review en\ngreat camera");

    let german =
        std::fs::read_to_string(config.transcripts_dir.join("Moto_Edge_2024-german.txt")).unwrap();
    assert_eq!(german, "german review en\ngreat camera");
    assert_eq!(*captions.translations.lock().unwrap(), ["german:de->en"]);

    let mut written: Vec<_> = std::fs::read_dir(&config.transcripts_dir)
        .unwrap()
        .flatten()
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    written.sort();
    assert_eq!(written, ["Moto_Edge_2024-german.txt", "OnePlus_12-english.txt"]);
}

struct OneVideoSearch;

#[async_trait]
impl VideoSearch for OneVideoSearch {
    async fn search_video_ids(&self, _query: &str, _max_results: u32) -> Result<Vec<String>> {
        Ok(vec!["english".to_string(), "short".to_string()])
    }

    async fn video_durations(&self, _ids: &[String]) -> Result<Vec<(String, String)>> {
        Ok(vec![
            ("english".to_string(), "PT8M20S".to_string()),
            ("short".to_string(), "PT45S".to_string()),
        ])
    }
}

#[tokio::test]
async fn full_run_hands_off_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let captions = FakeCaptions {
        listings: HashMap::from([("english", vec![track("en", true)])]),
        ..Default::default()
    };
    let model = ScriptedModel::new(vec![("great camera", POSITIVE.to_string())]);

    let report = run_all(
        Services {
            search: &OneVideoSearch,
            captions: &captions,
            completions: &model,
        },
        &config,
    )
    .await
    .unwrap();

    assert_eq!(report.discovery.rows_written, 1);
    assert_eq!(report.transcripts.saved, 1);
    assert_eq!(report.analysis.analyzed(), 1);
    assert_eq!(
        report.analysis.rows[0].filename,
        "Google_Pixel_9_Pro-english.txt"
    );
    assert_eq!(
        json_files(&config.results_dir),
        ["Google_Pixel_9_Pro-english.json"]
    );
}
