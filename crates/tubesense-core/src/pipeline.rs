use crate::{
    analysis::run_analysis,
    captions::TranscriptSource,
    config::PipelineConfig,
    discovery::run_discovery,
    error::Result,
    llm::CompletionClient,
    transcripts::run_transcripts,
    types::{AnalysisReport, DiscoveryReport, TranscriptReport},
    youtube::VideoSearch,
};

#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    pub discovery: DiscoveryReport,
    pub transcripts: TranscriptReport,
    pub analysis: AnalysisReport,
}

/// Clients for the three external services a full run talks to
pub struct Services<'a> {
    pub search: &'a dyn VideoSearch,
    pub captions: &'a dyn TranscriptSource,
    pub completions: &'a dyn CompletionClient,
}

/// Run discovery, transcript retrieval and analysis back to back
///
/// Stages still hand off through the files named in `config`, so any stage
/// can be rerun on its own afterwards.
pub async fn run_all(services: Services<'_>, config: &PipelineConfig) -> Result<PipelineReport> {
    let discovery = run_discovery(services.search, config).await?;
    tracing::info!(rows = discovery.rows_written, "discovery finished");

    let transcripts = run_transcripts(services.captions, config).await?;
    tracing::info!(
        saved = transcripts.saved,
        skipped = transcripts.skipped,
        "transcripts finished"
    );

    let analysis = run_analysis(services.completions, config).await?;
    tracing::info!(
        analyzed = analysis.analyzed(),
        failed = analysis.failed,
        "analysis finished"
    );

    Ok(PipelineReport {
        discovery,
        transcripts,
        analysis,
    })
}
