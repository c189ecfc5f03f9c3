use std::path::{Path, PathBuf};

pub const SUMMARY_CSV_NAME: &str = "sentiment_summary.csv";

/// Turn a phone query into a file-name-safe stem
pub fn sanitize_phone_name(phone: &str) -> String {
    phone.trim().replace(' ', "_").replace('\'', "")
}

/// Get the path for a transcript text file
pub fn get_transcript_path(transcripts_dir: &Path, phone: &str, video_id: &str) -> PathBuf {
    transcripts_dir.join(format!("{}-{}.txt", sanitize_phone_name(phone), video_id))
}

/// Get the path for the analysis JSON that belongs to a transcript file
pub fn get_analysis_path(results_dir: &Path, transcript_file: &Path) -> PathBuf {
    let stem = transcript_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    results_dir.join(format!("{}.json", stem))
}

pub fn get_summary_path(results_dir: &Path) -> PathBuf {
    results_dir.join(SUMMARY_CSV_NAME)
}

/// List `.txt` files in a directory, sorted by file name
pub fn find_transcripts(transcripts_dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();

    for entry in std::fs::read_dir(transcripts_dir)?.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().is_some_and(|ext| ext == "txt") {
            found.push(path);
        }
    }

    found.sort();
    Ok(found)
}
