use std::{sync::LazyLock, time::Duration};

use regex::Regex;

use crate::{
    config::PipelineConfig,
    error::{Result, TubesenseError},
    types::{DiscoveryReport, ReviewEntry},
    youtube::VideoSearch,
};

static ISO_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^P(?:(\d+)W)?(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+(?:\.\d+)?)S)?)?$")
        .expect("duration pattern is valid")
});

/// Parse an ISO-8601 duration such as `PT1H2M3S` or `P1DT5M`
pub fn parse_iso8601_duration(value: &str) -> Option<Duration> {
    let caps = ISO_DURATION.captures(value.trim())?;
    if value.trim().ends_with('T') || caps.iter().skip(1).all(|c| c.is_none()) {
        return None;
    }

    // Out-of-range numbers make the whole value unusable
    let whole = |i: usize, unit: u64| -> Option<u64> {
        match caps.get(i) {
            Some(m) => m.as_str().parse::<u64>().ok()?.checked_mul(unit),
            None => Some(0),
        }
    };
    let seconds = match caps.get(5) {
        Some(m) => Duration::try_from_secs_f64(m.as_str().parse::<f64>().ok()?).ok()?,
        None => Duration::ZERO,
    };

    let whole_seconds = whole(1, 7 * 86_400)?
        .checked_add(whole(2, 86_400)?)?
        .checked_add(whole(3, 3_600)?)?
        .checked_add(whole(4, 60)?)?;
    Duration::from_secs(whole_seconds).checked_add(seconds)
}

/// Anything shorter than `min_duration` counts as a Short
pub fn is_long_form(duration: Duration, min_duration: Duration) -> bool {
    duration >= min_duration
}

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// Most viewed long-form review URLs for one phone, in search order
pub async fn find_reviews<S: VideoSearch + ?Sized>(
    search: &S,
    phone: &str,
    max_results: u32,
    min_duration: Duration,
) -> Result<Vec<String>> {
    let query = format!("{} review", phone);
    let ids = search.search_video_ids(&query, max_results).await?;
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let durations = search.video_durations(&ids).await?;

    let mut urls = Vec::new();
    for id in &ids {
        let Some((_, raw)) = durations.iter().find(|(vid, _)| vid == id) else {
            tracing::debug!(video_id = %id, "no metadata returned, dropping");
            continue;
        };

        let duration =
            parse_iso8601_duration(raw).ok_or_else(|| TubesenseError::InvalidDuration {
                video_id: id.clone(),
                value: raw.clone(),
            })?;

        if is_long_form(duration, min_duration) {
            urls.push(watch_url(id));
        } else {
            tracing::debug!(video_id = %id, seconds = duration.as_secs(), "short-form, excluded");
        }
    }

    Ok(urls)
}

/// Stage 1: search every configured phone and write the review CSV
pub async fn run_discovery<S: VideoSearch + ?Sized>(
    search: &S,
    config: &PipelineConfig,
) -> Result<DiscoveryReport> {
    if let Some(parent) = config.reviews_csv.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&config.reviews_csv)?;
    writer.write_record(ReviewEntry::HEADERS)?;

    let mut report = DiscoveryReport::default();

    for phone in &config.phones {
        tracing::info!(phone = %phone, "fetching reviews");
        let urls = find_reviews(search, phone, config.max_results, config.min_duration).await?;
        tracing::info!(phone = %phone, found = urls.len(), "reviews kept");

        for url in urls {
            writer.serialize(ReviewEntry {
                phone: phone.clone(),
                url,
            })?;
            report.rows_written += 1;
        }
        writer.flush()?;
        report.phones += 1;
    }

    Ok(report)
}
