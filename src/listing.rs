//! Series list rendering and message chunking
//!
//! The chat transport caps messages at 4096 characters. The series list is
//! unbounded, so it gets split into chunks at newline boundaries nearest to
//! (but not exceeding) the limit. A line longer than the limit on its own
//! is hard-split at exactly the limit; that is the deterministic fallback
//! for input the newline rule cannot handle.

use crate::catalog::SeriesOverview;

/// Transport message size ceiling, in characters
pub const MESSAGE_LIMIT: usize = 4096;

/// Render the "list all series" text, one entry per series
pub fn render_series(series: &[SeriesOverview]) -> String {
    let mut out = String::new();
    for s in series {
        out.push_str(&format!(
            "• {} ({})\n        status: {}\n        monitored: {}\n",
            s.title, s.year, s.status, s.monitored
        ));
    }
    out
}

/// Split text into chunks of at most `limit` characters
///
/// Splits only at newline boundaries; joining the chunks with '\n' restores
/// the original text. The single exception is a line longer than `limit`,
/// which is hard-split at the limit.
pub fn chunk_lines(text: &str, limit: usize) -> Vec<String> {
    assert!(limit > 0, "chunk limit must be positive");

    if text.is_empty() {
        return Vec::new();
    }

    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;
    let mut lines_in_chunk = 0usize;

    for line in text.split('\n') {
        let mut rest = line;
        loop {
            let line_len = rest.chars().count();
            let (piece, piece_len, forced) = if line_len > limit {
                // hard split at the limit, on a char boundary
                let at = rest
                    .char_indices()
                    .nth(limit)
                    .map(|(i, _)| i)
                    .unwrap_or(rest.len());
                let (head, tail) = rest.split_at(at);
                rest = tail;
                (head, limit, true)
            } else {
                let piece = rest;
                rest = "";
                (piece, line_len, false)
            };

            if lines_in_chunk > 0 && current_len + 1 + piece_len > limit {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
                lines_in_chunk = 0;
            }
            if lines_in_chunk > 0 {
                current.push('\n');
                current_len += 1;
            }
            current.push_str(piece);
            current_len += piece_len;
            lines_in_chunk += 1;

            if !forced {
                break;
            }
            // the tail of a hard-split line starts a fresh chunk
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
            lines_in_chunk = 0;
        }
    }

    chunks.push(current);
    chunks
}

/// Human-readable byte count (1024-based), for root folder free space
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}
