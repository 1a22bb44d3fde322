// Error types for typr

use snafu::Snafu;
use std::{io, path::PathBuf};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TyprError {
    // Snippet registry errors
    #[snafu(display("Unknown language: {key}"))]
    UnknownLanguage { key: String },
    #[snafu(display("Snippet file not embedded: {file}"))]
    SnippetMissing { file: String },
    #[snafu(display("Error reading snippet file {}", path.display()))]
    SnippetRead { path: PathBuf, source: io::Error },
    #[snafu(display("Snippet is empty, nothing to type"))]
    EmptySnippet,
    #[snafu(display("Snippet contains a character that cannot be typed: {ch:?}"))]
    UntypeableChar { ch: char },

    // Config management errors
    #[snafu(display("Error writing config file"))]
    ConfigIo { source: io::Error },
    #[snafu(display("Error serializing config file"))]
    ConfigSerialize { source: serde_json::Error },

    // Terminal errors
    #[snafu(display("stdin must be a tty"))]
    NotATerminal,
}

pub type Result<T, E = TyprError> = std::result::Result<T, E>;
