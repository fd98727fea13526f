//! Human-readable sizes, durations, and the staged-files summary.

use console::Term;
use fob_memfs::FileInfo;
use owo_colors::{OwoColorize, Stream::Stderr};
use std::time::Duration;

/// Format a byte count with the largest fitting unit.
///
/// ```
/// use fob_serve::ui::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(1024), "1.00 KB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

/// Format a duration as `ms`, seconds, or `Xm Ys`.
///
/// ```
/// use std::time::Duration;
/// use fob_serve::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Print the files staged by one build, followed by the total size and build time.
pub fn print_staged_summary(files: &[FileInfo], elapsed: Duration) {
    let width = (Term::stderr().size().1 as usize).min(80);

    eprintln!();
    for file in files {
        eprintln!(
            "  {} {} {}",
            "▸".if_supports_color(Stderr, |s| s.blue()),
            file.name().if_supports_color(Stderr, |s| s.bold()),
            format_size(file.size()).if_supports_color(Stderr, |s| s.dimmed())
        );
    }
    eprintln!("{}", "─".repeat(width));

    let total: u64 = files.iter().map(FileInfo::size).sum();
    eprintln!(
        "  {} {} files, {} in {}",
        "Staged:".if_supports_color(Stderr, |s| s.bold()),
        files.len(),
        format_size(total).if_supports_color(Stderr, |s| s.green()),
        format_duration(elapsed).if_supports_color(Stderr, |s| s.green())
    );
}

/// The lines printed once the server is listening.
pub fn server_banner(url: &str, stream_path: &str) -> String {
    format!(
        "Dev server running at {}\n  Live reload stream: {}{}",
        url, url.trim_end_matches('/'), stream_path
    )
}
