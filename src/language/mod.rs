pub mod registry;

use std::str::FromStr;

use clap::ValueEnum;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::TyprError;

// Re-export the main types for convenience
pub use registry::{Snippet, SnippetRegistry};

/// Programming languages with a built-in practice snippet
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Default,
    ValueEnum,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    #[strum(serialize = "JavaScript")]
    Javascript,
    #[strum(serialize = "Python")]
    Python,
    #[strum(serialize = "Java")]
    Java,
    #[value(name = "cplusplus", alias = "c++")]
    #[serde(alias = "c++")]
    #[strum(serialize = "C++")]
    Cplusplus,
    #[strum(serialize = "Ruby")]
    Ruby,
    #[value(name = "csharp", alias = "c#")]
    #[serde(alias = "c#")]
    #[strum(serialize = "C#")]
    Csharp,
    #[strum(serialize = "Go")]
    Go,
    #[strum(serialize = "Swift")]
    Swift,
}

impl Language {
    /// Selection order, as shown in the picker
    pub const ALL: [Language; 8] = [
        Language::Javascript,
        Language::Python,
        Language::Java,
        Language::Cplusplus,
        Language::Ruby,
        Language::Csharp,
        Language::Go,
        Language::Swift,
    ];

    /// Stable lookup key, also used for the embedded snippet file name
    pub fn key(&self) -> &'static str {
        match self {
            Language::Javascript => "javascript",
            Language::Python => "python",
            Language::Java => "java",
            Language::Cplusplus => "cplusplus",
            Language::Ruby => "ruby",
            Language::Csharp => "csharp",
            Language::Go => "go",
            Language::Swift => "swift",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|l| l == self)
            .unwrap_or_default()
    }

    pub fn next(&self) -> Language {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Language {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn random() -> Language {
        let mut rng = rand::thread_rng();
        *Self::ALL.choose(&mut rng).unwrap_or(&Language::Javascript)
    }
}

impl FromStr for Language {
    type Err = TyprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        let found = match key.as_str() {
            "c++" => Some(Language::Cplusplus),
            "c#" => Some(Language::Csharp),
            other => Self::ALL.iter().find(|l| l.key() == other).copied(),
        };
        found.ok_or(TyprError::UnknownLanguage { key })
    }
}
