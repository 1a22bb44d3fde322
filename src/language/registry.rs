use include_dir::{include_dir, Dir};
use snafu::{OptionExt, ResultExt};
use std::borrow::Cow;
use std::path::Path;

use super::Language;
use crate::error::{
    EmptySnippetSnafu, Result, SnippetMissingSnafu, SnippetReadSnafu, UntypeableCharSnafu,
};

static SNIPPET_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/snippets");

/// Lookup table from language key to the embedded practice snippet.
/// Snippet text is returned exactly as stored.
pub struct SnippetRegistry;

impl SnippetRegistry {
    pub fn get(language: Language) -> Result<&'static str> {
        let file_name = format!("{}.txt", language.key());
        SNIPPET_DIR
            .get_file(&file_name)
            .and_then(|f| f.contents_utf8())
            .context(SnippetMissingSnafu { file: file_name })
    }

    pub fn lookup(key: &str) -> Result<&'static str> {
        Self::get(key.parse()?)
    }
}

/// Target text for one typing session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    name: String,
    language: Option<Language>,
    text: Cow<'static, str>,
}

impl Snippet {
    pub fn builtin(language: Language) -> Result<Self> {
        Ok(Self {
            name: language.to_string(),
            language: Some(language),
            text: Cow::Borrowed(SnippetRegistry::get(language)?),
        })
    }

    /// User supplied text. Only `\t`, `\n` and printable chars can be typed,
    /// so any other control char is rejected.
    pub fn custom(name: impl Into<String>, text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.is_empty() {
            return EmptySnippetSnafu.fail();
        }
        if let Some(ch) = text.chars().find(|&c| c.is_control() && c != '\t' && c != '\n') {
            return UntypeableCharSnafu { ch }.fail();
        }
        Ok(Self {
            name: name.into(),
            language: None,
            text: Cow::Owned(text),
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).context(SnippetReadSnafu { path })?;
        // files saved with windows line endings
        let text = text.replace("\r\n", "\n");
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "custom".to_string());
        Self::custom(name, text)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// None for snippets that did not come from the registry
    pub fn language(&self) -> Option<Language> {
        self.language
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TyprError;
    use assert_matches::assert_matches;
    use std::io::Write;

    #[test]
    fn test_every_language_has_a_snippet() {
        for lang in Language::ALL {
            let text = SnippetRegistry::get(lang).unwrap();
            assert!(!text.is_empty(), "{} snippet is empty", lang.key());
        }
    }

    #[test]
    fn test_snippets_are_verbatim() {
        let python = SnippetRegistry::get(Language::Python).unwrap();
        assert!(python.starts_with("def quick_sort(arr):\n    if len(arr) <= 1:"));
        assert!(python.ends_with("return quick_sort(left) + [pivot] + quick_sort(right)"));

        let js = SnippetRegistry::get(Language::Javascript).unwrap();
        assert!(js.ends_with(";\n  }"));

        let go = SnippetRegistry::get(Language::Go).unwrap();
        assert!(go.starts_with("package main\n\nimport \"fmt\"\n"));
    }

    #[test]
    fn test_lookup_by_key_and_alias() {
        assert_eq!(
            SnippetRegistry::lookup("c++").unwrap(),
            SnippetRegistry::get(Language::Cplusplus).unwrap()
        );
        assert!(SnippetRegistry::lookup("swift")
            .unwrap()
            .starts_with("func quickSort"));
    }

    #[test]
    fn test_lookup_unknown_key() {
        assert_matches!(
            SnippetRegistry::lookup("brainfuck"),
            Err(TyprError::UnknownLanguage { .. })
        );
    }

    #[test]
    fn test_builtin_snippet() {
        let snippet = Snippet::builtin(Language::Ruby).unwrap();
        assert_eq!(snippet.name(), "Ruby");
        assert_eq!(snippet.language(), Some(Language::Ruby));
        assert!(snippet.text().starts_with("def quick_sort(arr)\n"));
    }

    #[test]
    fn test_custom_snippet_rejects_empty() {
        assert_matches!(Snippet::custom("x", ""), Err(TyprError::EmptySnippet));
        let snippet = Snippet::custom("prompt", " keep  spacing \n").unwrap();
        assert_eq!(snippet.text(), " keep  spacing \n");
        assert_eq!(snippet.language(), None);
    }

    #[test]
    fn test_snippet_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fib.rs");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "fn fib() {{}}\n").unwrap();

        let snippet = Snippet::from_file(&path).unwrap();
        assert_eq!(snippet.name(), "fib.rs");
        assert_eq!(snippet.text(), "fn fib() {}\n");
    }

    #[test]
    fn test_snippet_from_crlf_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crlf.txt");
        std::fs::write(&path, "a\r\nb\r\n").unwrap();

        let snippet = Snippet::from_file(&path).unwrap();
        assert_eq!(snippet.text(), "a\nb\n");
    }

    #[test]
    fn test_custom_snippet_rejects_control_chars() {
        assert_matches!(
            Snippet::custom("x", "a\r\nb"),
            Err(TyprError::UntypeableChar { ch: '\r' })
        );
        assert_matches!(
            Snippet::custom("x", "bell\u{7}"),
            Err(TyprError::UntypeableChar { ch: '\u{7}' })
        );
        assert!(Snippet::custom("x", "\tindent\nnext").is_ok());
    }

    #[test]
    fn test_snippet_from_file_with_lone_cr() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cr.txt");
        std::fs::write(&path, "a\rb").unwrap();
        assert_matches!(
            Snippet::from_file(&path),
            Err(TyprError::UntypeableChar { ch: '\r' })
        );
    }

    #[test]
    fn test_snippet_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_matches!(
            Snippet::from_file(dir.path().join("nope.txt")),
            Err(TyprError::SnippetRead { .. })
        );
    }
}
