use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use tubesense_core::{
    ChatCompletionClient, PipelineConfig, Provider, Services, YouTubeCaptions, YouTubeDataApi,
    format_summary_readable, load_env_file, run_all, run_analysis, run_discovery, run_transcripts,
    youtube_api_key,
};

/// CLI wrapper for Provider enum (needed for clap ValueEnum)
#[derive(Clone, Copy, Default, ValueEnum)]
enum CliProvider {
    #[default]
    Openai,
    Grok,
    Gemini,
}

impl From<CliProvider> for Provider {
    fn from(cli: CliProvider) -> Self {
        match cli {
            CliProvider::Openai => Provider::Openai,
            CliProvider::Grok => Provider::Grok,
            CliProvider::Gemini => Provider::Gemini,
        }
    }
}

#[derive(Subcommand, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Search YouTube for phone reviews and write the review CSV
    Discover,
    /// Download an English transcript for every review in the CSV
    Transcripts,
    /// Score every transcript for sentiment and sponsorship
    Analyze,
    /// Run all three stages in order
    Run,
}

#[derive(Parser)]
#[command(name = "tubesense")]
#[command(
    about = "Find YouTube phone reviews, fetch their transcripts, and score sentiment and ad disclosure with AI"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Phone model to search for (repeatable). Defaults to the built-in list.
    #[arg(long = "phone", global = true)]
    phones: Vec<String>,

    /// Review CSV written by discovery and read by transcripts
    #[arg(long, global = true, default_value = "top_youtube_reviews.csv")]
    reviews_csv: PathBuf,

    /// Directory for transcript text files
    #[arg(long, global = true, default_value = "transcripts")]
    transcripts_dir: PathBuf,

    /// Directory for analysis JSON and the summary CSV
    #[arg(long, global = true, default_value = "sentiment_results")]
    results_dir: PathBuf,

    /// Search results requested per phone
    #[arg(long, global = true, default_value_t = 150)]
    max_results: u32,

    /// Videos shorter than this many seconds are treated as Shorts
    #[arg(long, global = true, default_value_t = 90)]
    min_duration_secs: u64,

    /// AI provider for sentiment analysis
    #[arg(short, long, global = true, default_value = "openai")]
    provider: CliProvider,

    /// Transcripts or analyses in flight at once
    #[arg(short, long, global = true, default_value_t = 1)]
    jobs: usize,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn pipeline_config(&self) -> PipelineConfig {
        let mut config = PipelineConfig {
            reviews_csv: self.reviews_csv.clone(),
            transcripts_dir: self.transcripts_dir.clone(),
            results_dir: self.results_dir.clone(),
            max_results: self.max_results,
            min_duration: Duration::from_secs(self.min_duration_secs),
            provider: self.provider.into(),
            jobs: self.jobs,
            ..Default::default()
        };
        if !self.phones.is_empty() {
            config.phones = self.phones.clone();
        }
        config
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("tubesense={level},tubesense_core={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", (secs / 60.0).floor(), secs % 60.0)
    }
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", style("Error:").red().bold(), message);
    std::process::exit(1);
}

fn elapsed(start: Instant) -> String {
    style(format!("[{}]", format_duration(start.elapsed())))
        .dim()
        .to_string()
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_file = load_env_file();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Some(path) = &env_file {
        tracing::debug!(path = %path.display(), "loaded environment file");
    }

    let command = cli.command.unwrap_or(Command::Run);
    let config = cli.pipeline_config();
    let needs_search = matches!(command, Command::Discover | Command::Run);
    let needs_model = matches!(command, Command::Analyze | Command::Run);

    // Validate API keys early
    let search = if needs_search {
        Some(YouTubeDataApi::new(
            youtube_api_key().unwrap_or_else(|e| fail(e)),
        ))
    } else {
        None
    };
    let completions = if needs_model {
        Some(ChatCompletionClient::new(config.provider).unwrap_or_else(|e| fail(e)))
    } else {
        None
    };
    let captions = YouTubeCaptions::new().unwrap_or_else(|e| fail(e));

    println!(
        "\n{}  {}\n",
        style("tubesense").cyan().bold(),
        style("Phone Review Sentiment").dim()
    );

    let total_start = Instant::now();

    match (command, search.as_ref(), completions.as_ref()) {
        (Command::Discover, Some(search), _) => {
            let start = Instant::now();
            let spinner = create_spinner(&format!(
                "Searching reviews for {} phones...",
                config.phones.len()
            ));
            let report = run_discovery(search, &config).await?;
            spinner.finish_with_message(format!(
                "{} Discovered {} reviews across {} phones {}",
                style("✓").green().bold(),
                report.rows_written,
                report.phones,
                elapsed(start)
            ));
        }
        (Command::Transcripts, _, _) => {
            let start = Instant::now();
            let spinner = create_spinner("Downloading transcripts...");
            let report = run_transcripts(&captions, &config).await?;
            spinner.finish_with_message(format!(
                "{} Transcripts saved: {}, skipped: {} {}",
                style("✓").green().bold(),
                report.saved,
                style(report.skipped).yellow(),
                elapsed(start)
            ));
        }
        (Command::Analyze, _, Some(completions)) => {
            let start = Instant::now();
            let spinner = create_spinner(&format!(
                "Analyzing transcripts with {}...",
                completions.provider().name()
            ));
            let report = run_analysis(completions, &config).await?;
            spinner.finish_with_message(format!(
                "{} Analyzed: {}, failed: {} {}",
                style("✓").green().bold(),
                report.analyzed(),
                style(report.failed).yellow(),
                elapsed(start)
            ));
            println!("{}", style("─".repeat(60)).dim());
            println!("{}", format_summary_readable(&report.rows));
        }
        (Command::Run, Some(search), Some(completions)) => {
            let spinner = create_spinner(&format!(
                "Running discovery, transcripts and {} analysis...",
                completions.provider().name()
            ));
            let report = run_all(
                Services {
                    search,
                    captions: &captions,
                    completions,
                },
                &config,
            )
            .await?;
            spinner.finish_with_message(format!(
                "{} Reviews: {} | transcripts: {} ({} skipped) | analyzed: {} ({} failed)",
                style("✓").green().bold(),
                report.discovery.rows_written,
                report.transcripts.saved,
                report.transcripts.skipped,
                report.analysis.analyzed(),
                report.analysis.failed
            ));
            println!("{}", style("─".repeat(60)).dim());
            println!("{}", format_summary_readable(&report.analysis.rows));
        }
        _ => unreachable!("API clients are built for every command that needs them"),
    }

    println!(
        "\n{} {}\n",
        style("Total time:").dim(),
        style(format_duration(total_start.elapsed())).cyan().bold()
    );
    println!(
        "{} {}",
        style("Saved:").dim(),
        style(match command {
            Command::Discover => config.reviews_csv.display().to_string(),
            Command::Transcripts => config.transcripts_dir.display().to_string(),
            Command::Analyze | Command::Run => config.results_dir.display().to_string(),
        })
        .cyan()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_invocation_keeps_batch_defaults() {
        let cli = Cli::parse_from(["tubesense"]);
        assert!(cli.command.is_none());

        let config = cli.pipeline_config();
        let defaults = PipelineConfig::default();
        assert_eq!(config.phones, defaults.phones);
        assert_eq!(config.reviews_csv, defaults.reviews_csv);
        assert_eq!(config.min_duration, Duration::from_secs(90));
        assert_eq!(config.provider, Provider::Openai);
        assert_eq!(config.jobs, 1);
    }

    #[test]
    fn flags_override_config_after_subcommand() {
        let cli = Cli::parse_from([
            "tubesense",
            "analyze",
            "--provider",
            "grok",
            "--jobs",
            "4",
            "--phone",
            "Pixel 9",
            "--phone",
            "OnePlus 12",
        ]);
        assert!(cli.command == Some(Command::Analyze));

        let config = cli.pipeline_config();
        assert_eq!(config.provider, Provider::Grok);
        assert_eq!(config.jobs, 4);
        assert_eq!(config.phones, ["Pixel 9", "OnePlus 12"]);
    }

    #[test]
    fn durations_read_naturally() {
        assert_eq!(format_duration(Duration::from_millis(1_500)), "1.5s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
    }
}
