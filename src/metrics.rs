use std::time::{Duration, Instant};

/// Number of whitespace separated words in the snippet
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Words per minute for `words` typed over `elapsed`, rounded to the nearest integer.
///
/// Returns None when no time has elapsed; callers show a placeholder instead of a rate.
pub fn wpm(words: usize, elapsed: Duration) -> Option<u64> {
    if elapsed.is_zero() {
        return None;
    }
    let minutes = elapsed.as_secs_f64() / 60.0;
    Some((words as f64 / minutes).round() as u64)
}

/// Share of keystrokes that matched, as a rounded percentage
pub fn accuracy(matched: usize, mistakes: usize) -> Option<f64> {
    match matched + mistakes {
        0 => None,
        total => Some(((matched as f64 / total as f64) * 100.0).round()),
    }
}

/// Span between two recorded instants; None until both exist
pub fn elapsed_between(start: Option<Instant>, end: Option<Instant>) -> Option<Duration> {
    match (start, end) {
        (Some(start), Some(end)) => Some(end.saturating_duration_since(start)),
        _ => None,
    }
}
