use std::path::Path;

use futures::{StreamExt, stream};
use serde_json::Value;
use tokio::fs;

use crate::{
    config::PipelineConfig,
    error::{Result, TubesenseError},
    extract::{Extracted, extract_json},
    llm::CompletionClient,
    paths::{find_transcripts, get_analysis_path, get_summary_path},
    types::{AnalysisReport, SummaryRow},
};

/// Instruction sent to the model, with the transcript appended at the end
pub fn build_prompt(transcript: &str) -> String {
    format!(
        r#"
You are a helpful assistant that analyzes the sentiment of a YouTube video transcript focused on a specific phone model.

Analyze the following transcript and return a JSON object including these keys:

- sentiment: {{
    overall: "positive"|"neutral"|"negative",
    polarity: float (range -1 to 1),
    subjectivity: float (range 0 to 1),
    explanation: string,
    highlighted_phrases: list of key phrases illustrating sentiment
  }}

- advertisement: {{
    is_ad: "Yes"|"No",
    explanation: string
  }}

IMPORTANT: When determining if the video is an advertisement, specifically check if the transcript contains explicit statements that the video is sponsored or paid to review or promote the phone being discussed. Ignore any mentions of sponsorships by other companies or general positive language about the phone. Only consider it an advertisement if it clearly states or implies sponsorship or paid promotion for that specific phone.

Return only valid JSON in your response, no additional text.

Transcript:
"""
{transcript}
"""
"#,
        transcript = transcript
    )
}

/// Ask the model about one transcript and pull JSON out of its answer
pub async fn analyze_text<C: CompletionClient + ?Sized>(
    client: &C,
    transcript: &str,
) -> Result<Extracted> {
    let raw = client.complete(&build_prompt(transcript)).await?;
    Ok(extract_json(&raw))
}

fn field_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Flatten an analysis object into one summary row; missing fields become ""
pub fn summary_row(filename: &str, analysis: &Value) -> SummaryRow {
    let sentiment = &analysis["sentiment"];
    let advertisement = &analysis["advertisement"];

    let highlighted_phrases = match &sentiment["highlighted_phrases"] {
        Value::Array(phrases) => phrases
            .iter()
            .map(field_text)
            .collect::<Vec<_>>()
            .join("; "),
        other => field_text(other),
    };

    SummaryRow {
        filename: filename.to_string(),
        overall_sentiment: field_text(&sentiment["overall"]),
        polarity: field_text(&sentiment["polarity"]),
        subjectivity: field_text(&sentiment["subjectivity"]),
        highlighted_phrases,
        is_advertisement: field_text(&advertisement["is_ad"]),
        advertisement_explanation: field_text(&advertisement["explanation"]),
        sentiment_explanation: field_text(&sentiment["explanation"]),
    }
}

async fn analyze_file<C: CompletionClient + ?Sized>(
    client: &C,
    results_dir: &Path,
    path: &Path,
) -> Result<SummaryRow> {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    tracing::info!(file = %filename, "analyzing");

    let transcript = fs::read_to_string(path)
        .await
        .map_err(|source| TubesenseError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;

    let analysis = analyze_text(client, &transcript)
        .await?
        .into_object()
        .ok_or(TubesenseError::UnparseableResponse)?;

    let json_path = get_analysis_path(results_dir, path);
    fs::write(&json_path, serde_json::to_string_pretty(&analysis)?).await?;

    Ok(summary_row(&filename, &analysis))
}

/// Stage 3: score every transcript and write per-file JSON plus the summary CSV
pub async fn run_analysis<C: CompletionClient + ?Sized>(
    client: &C,
    config: &PipelineConfig,
) -> Result<AnalysisReport> {
    fs::create_dir_all(&config.results_dir).await?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(get_summary_path(&config.results_dir))?;
    writer.write_record(SummaryRow::HEADERS)?;
    writer.flush()?;

    let files = find_transcripts(&config.transcripts_dir)?;
    let mut report = AnalysisReport::default();

    let mut outcomes = stream::iter(files.iter().map(|path| async move {
        (path, analyze_file(client, &config.results_dir, path).await)
    }))
    .buffered(config.concurrency());

    while let Some((path, outcome)) = outcomes.next().await {
        match outcome {
            Ok(row) => {
                writer.serialize(&row)?;
                writer.flush()?;
                report.rows.push(row);
            }
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "analysis failed, skipping");
                report.failed += 1;
            }
        }
    }

    Ok(report)
}
