use std::time::{Duration, Instant};

use log::debug;

use crate::key::KeyInput;
use crate::language::Snippet;
use crate::metrics;

/// Classification of a single keystroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Advanced,
    Mistake,
    Ignored,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Index of the next expected char; never decreases within a session
    pub cursor: usize,
    pub mistakes: usize,
    pub started_at: Option<Instant>,
    pub ended_at: Option<Instant>,
}

impl SessionState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Advance `state` through `target` for one keystroke received at `now`.
///
/// Mistakes never move the cursor and cannot be undone. Once the cursor
/// reaches the end of the target every key is ignored.
pub fn apply_key(
    state: &mut SessionState,
    target: &[char],
    key: KeyInput,
    now: Instant,
) -> Outcome {
    let Some(&expected) = target.get(state.cursor) else {
        return Outcome::Ignored;
    };

    let matched = match key {
        KeyInput::Tab => expected == '\t',
        KeyInput::Enter => expected == '\n',
        KeyInput::Char(c) if c == expected => true,
        KeyInput::Char(c) if !c.is_control() => false,
        KeyInput::Char(_) | KeyInput::Ignored => return Outcome::Ignored,
    };

    if state.cursor == 0 && state.started_at.is_none() {
        state.started_at = Some(now);
    }

    if !matched {
        state.mistakes += 1;
        return Outcome::Mistake;
    }

    state.cursor += 1;
    if state.cursor == target.len() && state.ended_at.is_none() {
        state.ended_at = Some(now);
    }
    Outcome::Advanced
}

/// A typing session: one snippet plus the progress made on it
#[derive(Debug, Clone)]
pub struct Session {
    snippet: Snippet,
    target: Vec<char>,
    word_count: usize,
    state: SessionState,
}

impl Session {
    pub fn new(snippet: Snippet) -> Self {
        let target = snippet.text().chars().collect();
        let word_count = metrics::word_count(snippet.text());
        Self {
            snippet,
            target,
            word_count,
            state: SessionState::default(),
        }
    }

    pub fn handle_key(&mut self, key: KeyInput) -> Outcome {
        self.handle_key_at(key, Instant::now())
    }

    pub fn handle_key_at(&mut self, key: KeyInput, now: Instant) -> Outcome {
        let outcome = apply_key(&mut self.state, &self.target, key, now);
        if outcome != Outcome::Ignored {
            debug!(
                "{:?} at {}/{} ({} mistakes)",
                outcome,
                self.state.cursor,
                self.target.len(),
                self.state.mistakes
            );
        }
        outcome
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Swap in a new snippet; progress on the old one is discarded
    pub fn replace_snippet(&mut self, snippet: Snippet) {
        *self = Self::new(snippet);
    }

    pub fn snippet(&self) -> &Snippet {
        &self.snippet
    }

    pub fn target(&self) -> &[char] {
        &self.target
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn len(&self) -> usize {
        self.target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.state.cursor
    }

    pub fn mistakes(&self) -> usize {
        self.state.mistakes
    }

    pub fn expected_char(&self) -> Option<char> {
        self.target.get(self.state.cursor).copied()
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn has_started(&self) -> bool {
        self.state.started_at.is_some()
    }

    pub fn has_finished(&self) -> bool {
        self.state.ended_at.is_some()
    }

    /// Time spent so far, measured up to `now` while the session is running
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        match (self.state.started_at, self.state.ended_at) {
            (Some(start), Some(end)) => end.saturating_duration_since(start),
            (Some(start), None) => now.saturating_duration_since(start),
            _ => Duration::ZERO,
        }
    }

    /// Final words per minute; None until the session has both timestamps
    pub fn wpm(&self) -> Option<u64> {
        metrics::elapsed_between(self.state.started_at, self.state.ended_at)
            .and_then(|elapsed| metrics::wpm(self.word_count, elapsed))
    }

    pub fn accuracy(&self) -> Option<f64> {
        if !self.has_finished() {
            return None;
        }
        metrics::accuracy(self.state.cursor, self.state.mistakes)
    }
}
