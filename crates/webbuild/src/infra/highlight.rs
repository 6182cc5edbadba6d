//! Syntax highlighting to class-annotated HTML, built on top of syntect.

use std::sync::Arc;

use once_cell::sync::Lazy;
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

static DEFAULT_SYNTAXES: Lazy<Arc<SyntaxSet>> =
    Lazy::new(|| Arc::new(SyntaxSet::load_defaults_newlines()));

/// Language names missing from the default syntax set, mapped to the closest
/// syntax it ships.
const LANGUAGE_ALIASES: &[(&str, &str)] = &[
    ("typescript", "js"),
    ("ts", "js"),
    ("tsx", "js"),
    ("jsx", "js"),
    ("shell", "bash"),
    ("console", "bash"),
    ("yml", "yaml"),
];

/// Leading tokens of common snippets, tried in order when the first line
/// carries no shebang or modeline.
const LEADING_TOKENS: &[(&str, &str)] = &[
    ("<", "html"),
    ("fn ", "rs"),
    ("pub ", "rs"),
    ("use ", "rs"),
    ("impl ", "rs"),
    ("struct ", "rs"),
    ("#[", "rs"),
    ("let mut ", "rs"),
    ("def ", "py"),
    ("from ", "py"),
    ("import ", "py"),
    ("function ", "js"),
    ("const ", "js"),
    ("let ", "js"),
    ("var ", "js"),
    ("#include", "cpp"),
    ("package ", "go"),
    ("func ", "go"),
];

/// How the syntax for a snippet was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightMode {
    /// The caller named a language the highlighter knows.
    Declared,
    /// Picked by first-line detection or the snippet's leading token.
    Detected,
    /// Nothing matched; rendered with the plain text syntax.
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightResult {
    pub html: String,
    pub language: String,
    pub mode: HighlightMode,
}

#[derive(Debug, Clone)]
pub struct Highlighter {
    syntax_set: Arc<SyntaxSet>,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    pub fn new() -> Self {
        Self {
            syntax_set: Arc::clone(&DEFAULT_SYNTAXES),
        }
    }

    /// Highlight `code` as `language`, detecting the syntax when the name is unknown.
    pub fn highlight_language(
        &self,
        code: &str,
        language: &str,
    ) -> Result<HighlightResult, syntect::Error> {
        match self.syntax_for_token(language) {
            Some(syntax) => Ok(HighlightResult {
                html: self.render(code, syntax)?,
                language: syntax.name.clone(),
                mode: HighlightMode::Declared,
            }),
            None => {
                tracing::warn!(language, "unknown code block language, detecting instead");
                self.highlight_auto(code)
            }
        }
    }

    /// Highlight `code` with a detected syntax, or plain text when detection fails.
    pub fn highlight_auto(&self, code: &str) -> Result<HighlightResult, syntect::Error> {
        let (syntax, mode) = match self.detect_syntax(code) {
            Some(syntax) => (syntax, HighlightMode::Detected),
            None => (
                self.syntax_set.find_syntax_plain_text(),
                HighlightMode::Plain,
            ),
        };
        Ok(HighlightResult {
            html: self.render(code, syntax)?,
            language: syntax.name.clone(),
            mode,
        })
    }

    fn render(&self, code: &str, syntax: &SyntaxReference) -> Result<String, syntect::Error> {
        let mut generator = ClassedHTMLGenerator::new_with_class_style(
            syntax,
            &self.syntax_set,
            ClassStyle::Spaced,
        );
        for line in LinesWithEndings::from(code) {
            generator.parse_html_for_line_which_includes_newline(line)?;
        }
        Ok(generator.finalize())
    }

    fn syntax_for_token(&self, token: &str) -> Option<&SyntaxReference> {
        let token = token.trim().to_ascii_lowercase();
        if token.is_empty() {
            return None;
        }
        let token = LANGUAGE_ALIASES
            .iter()
            .find(|(alias, _)| *alias == token)
            .map_or(token.as_str(), |&(_, target)| target);
        self.syntax_set.find_syntax_by_token(token)
    }

    fn detect_syntax(&self, code: &str) -> Option<&SyntaxReference> {
        let first_line = code.lines().find(|line| !line.trim().is_empty())?;
        if let Some(syntax) = self.syntax_set.find_syntax_by_first_line(first_line) {
            return Some(syntax);
        }
        let first_line = first_line.trim_start();
        LEADING_TOKENS
            .iter()
            .find(|(prefix, _)| first_line.starts_with(prefix))
            .and_then(|(_, token)| self.syntax_set.find_syntax_by_token(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_rust_produces_class_spans() -> Result<(), syntect::Error> {
        let highlighter = Highlighter::new();
        let result = highlighter.highlight_language("fn main() {}\n", "rust")?;

        assert_eq!(result.mode, HighlightMode::Declared);
        assert_eq!(result.language, "Rust");
        assert!(result.html.contains("<span class=\""));
        Ok(())
    }

    #[test]
    fn shebang_is_detected() -> Result<(), syntect::Error> {
        let highlighter = Highlighter::new();
        let result = highlighter.highlight_auto("#!/bin/bash\necho hi\n")?;
        assert_eq!(result.mode, HighlightMode::Detected);
        assert_eq!(result.language, "Bourne Again Shell (bash)");
        Ok(())
    }

    #[test]
    fn common_snippets_are_detected_without_markers() -> Result<(), syntect::Error> {
        let highlighter = Highlighter::new();

        let rust = highlighter.highlight_auto("fn main() {\n    let x = 1;\n}\n")?;
        assert_eq!(rust.mode, HighlightMode::Detected);
        assert_eq!(rust.language, "Rust");

        let html = highlighter.highlight_auto("\n<div class=\"note\">hi</div>\n")?;
        assert_eq!(html.mode, HighlightMode::Detected);
        assert_eq!(html.language, "HTML");
        Ok(())
    }

    #[test]
    fn missing_languages_use_their_closest_syntax() -> Result<(), syntect::Error> {
        let highlighter = Highlighter::new();
        let result = highlighter.highlight_language("let x: number = 1;\n", "TypeScript")?;
        assert_eq!(result.mode, HighlightMode::Declared);
        assert_eq!(result.language, "JavaScript");
        Ok(())
    }

    #[test]
    fn unknown_language_falls_back_to_plain_text() -> Result<(), syntect::Error> {
        let highlighter = Highlighter::new();
        let result = highlighter.highlight_language("just words", "klingon")?;
        assert_eq!(result.mode, HighlightMode::Plain);
        assert_eq!(result.language, "Plain Text");
        assert!(result.html.contains("just words"));
        Ok(())
    }

    #[test]
    fn markup_characters_are_escaped() -> Result<(), syntect::Error> {
        let highlighter = Highlighter::new();
        let result = highlighter.highlight_auto("a < b && c > d")?;
        assert!(result.html.contains("&lt;"));
        assert!(result.html.contains("&amp;&amp;"));
        assert!(!result.html.contains(" < "));
        Ok(())
    }
}
