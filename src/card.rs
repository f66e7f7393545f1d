//! The suggestion card
//!
//! Splits a model suggestion into its labeled sections so it can be shown as
//! a bordered card in the terminal, exported as Markdown, or copied to the
//! clipboard for sharing.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fmt;
use std::fs;
use std::path::Path;
use unicode_width::UnicodeWidthStr;

use crate::ui::{self, rgb};

/// File name used when the card is saved without an explicit path
pub const DEFAULT_CARD_FILENAME: &str = "project-suggestion.md";

/// Narrowest card that still leaves room for text inside the border
const MIN_CARD_WIDTH: usize = 24;

/// Labeled parts of a suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// Text that appears before any label
    Intro,
    Why,
    KeyFeatures,
    TechStack,
    NextSteps,
}

impl SectionKind {
    pub const fn heading(self) -> &'static str {
        match self {
            Self::Intro => "",
            Self::Why => "Why",
            Self::KeyFeatures => "Key Features",
            Self::TechStack => "Tech Stack",
            Self::NextSteps => "Next Steps",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Title,
    Section(SectionKind),
}

/// Recognized labels, longest first so "key features" wins over "features"
const LABELS: &[(&str, Label)] = &[
    ("key features", Label::Section(SectionKind::KeyFeatures)),
    ("tech stack", Label::Section(SectionKind::TechStack)),
    ("next steps", Label::Section(SectionKind::NextSteps)),
    ("features", Label::Section(SectionKind::KeyFeatures)),
    ("title", Label::Title),
    ("stack", Label::Section(SectionKind::TechStack)),
    ("why", Label::Section(SectionKind::Why)),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSection {
    pub kind: SectionKind,
    pub lines: Vec<String>,
}

/// A parsed suggestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionCard {
    pub title: Option<String>,
    pub sections: Vec<CardSection>,
}

fn strip_emphasis(s: &str) -> &str {
    s.trim_matches(|c: char| c == '*' || c == '_' || c.is_whitespace())
}

/// Recognize `Title: x`, `**Why:** x`, `## Key Features` and similar.
/// Returns the label and whatever text follows it on the same line.
fn split_label(line: &str) -> Option<(Label, String)> {
    let trimmed = line.trim();
    let is_heading = trimmed.starts_with('#');
    let body = strip_emphasis(trimmed.trim_start_matches('#'));
    let lower = body.to_ascii_lowercase();

    for (name, label) in LABELS {
        if !lower.starts_with(name) {
            continue;
        }
        // Labels are ASCII, so the byte offset carries over from the lowercased copy
        let rest = body.get(name.len()..).unwrap_or_default();
        let rest = rest.trim_start_matches(['*', '_']);

        if let Some(after_colon) = rest.strip_prefix(':') {
            return Some((*label, strip_emphasis(after_colon).to_string()));
        }
        if strip_emphasis(rest).is_empty() && (is_heading || trimmed.starts_with("**")) {
            return Some((*label, String::new()));
        }
    }
    None
}

impl SuggestionCard {
    /// Parse suggestion text. Nothing is dropped: unlabeled text lands in an intro section.
    pub fn parse(text: &str) -> Self {
        let mut title: Option<String> = None;
        let mut awaiting_title = false;
        let mut sections: Vec<CardSection> = Vec::new();

        for raw in text.lines() {
            let line = raw.trim_end();
            if line.trim().is_empty() {
                continue;
            }

            if let Some((label, rest)) = split_label(line) {
                match label {
                    Label::Title if title.is_none() => {
                        awaiting_title = rest.is_empty();
                        if !rest.is_empty() {
                            title = Some(rest);
                        }
                        continue;
                    }
                    Label::Title => {}
                    Label::Section(kind) => {
                        awaiting_title = false;
                        let mut lines = Vec::new();
                        if !rest.is_empty() {
                            lines.push(rest);
                        }
                        sections.push(CardSection { kind, lines });
                        continue;
                    }
                }
            }

            if awaiting_title {
                title = Some(strip_emphasis(line.trim_start_matches('#')).to_string());
                awaiting_title = false;
                continue;
            }

            match sections.last_mut() {
                Some(section) => section.lines.push(line.trim().to_string()),
                None => sections.push(CardSection {
                    kind: SectionKind::Intro,
                    lines: vec![line.trim().to_string()],
                }),
            }
        }

        Self { title, sections }
    }

    pub fn section(&self, kind: SectionKind) -> Option<&CardSection> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    /// Markdown export of the card
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        if let Some(title) = &self.title {
            out.push_str(&format!("# {title}\n\n"));
        }
        for section in &self.sections {
            if section.kind != SectionKind::Intro {
                out.push_str(&format!("## {}\n\n", section.kind.heading()));
            }
            for line in &section.lines {
                out.push_str(line);
                out.push('\n');
            }
            out.push('\n');
        }
        out.trim_end().to_string() + "\n"
    }

    /// Write the Markdown export to `path`
    pub fn save_markdown(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_markdown())
            .with_context(|| format!("Failed to write card to {}", path.display()))
    }

    /// Put the Markdown export on the system clipboard
    pub fn copy_to_clipboard(&self) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new().context("Clipboard unavailable")?;
        clipboard
            .set_text(self.to_markdown())
            .context("Failed to copy card to clipboard")
    }

    /// Colored card for the terminal
    pub fn render_terminal(&self, width: usize) -> String {
        self.render(width, true)
    }

    /// Lay the card out as bordered lines of at most `width` columns
    pub fn render(&self, width: usize, colorize: bool) -> String {
        let width = width.max(MIN_CARD_WIDTH);
        let inner = width - 4;
        let mut rows: Vec<(String, RowStyle)> = Vec::new();

        if let Some(title) = &self.title {
            for line in textwrap::wrap(title, inner) {
                rows.push((line.into_owned(), RowStyle::Title));
            }
            rows.push((String::new(), RowStyle::Body));
        }

        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                rows.push((String::new(), RowStyle::Body));
            }
            if section.kind != SectionKind::Intro {
                rows.push((section.kind.heading().to_string(), RowStyle::Heading));
            }
            for line in &section.lines {
                let indent = bullet_indent(line);
                let options = textwrap::Options::new(inner).subsequent_indent(&indent);
                for wrapped in textwrap::wrap(line, options) {
                    rows.push((wrapped.into_owned(), RowStyle::Body));
                }
            }
        }

        let border = |s: &str| {
            if colorize {
                let (r, g, b) = rgb::ELECTRIC_PURPLE;
                s.truecolor(r, g, b).to_string()
            } else {
                s.to_string()
            }
        };

        let mut out = String::new();
        out.push_str(&border(&format!("╭{}╮", "─".repeat(width - 2))));
        out.push('\n');
        for (text, style) in rows {
            let pad = inner.saturating_sub(text.width());
            let styled = if colorize { style.apply(&text) } else { text };
            out.push_str(&border("│ "));
            out.push_str(&styled);
            out.push_str(&" ".repeat(pad));
            out.push_str(&border(" │"));
            out.push('\n');
        }
        out.push_str(&border(&format!("╰{}╯", "─".repeat(width - 2))));
        out
    }
}

impl fmt::Display for SuggestionCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_markdown())
    }
}

#[derive(Debug, Clone, Copy)]
enum RowStyle {
    Title,
    Heading,
    Body,
}

impl RowStyle {
    fn apply(self, text: &str) -> String {
        match self {
            Self::Title => ui::gradient_text(text, &ui::GRADIENT_AURORA),
            Self::Heading => {
                let (r, g, b) = rgb::CORAL;
                text.truecolor(r, g, b).bold().to_string()
            }
            Self::Body => text.to_string(),
        }
    }
}

/// Continuation lines of a bullet or numbered step line up with its text
fn bullet_indent(line: &str) -> String {
    let marker_len = if line.starts_with("- ") || line.starts_with("* ") || line.starts_with("• ") {
        2
    } else {
        let digits = line.chars().take_while(char::is_ascii_digit).count();
        let after = line.get(digits..).unwrap_or_default();
        if digits > 0 && (after.starts_with(". ") || after.starts_with(") ")) {
            digits + 2
        } else {
            0
        }
    };
    " ".repeat(marker_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_label_variants() {
        assert_eq!(
            split_label("**Title:** Rusty Radar"),
            Some((Label::Title, "Rusty Radar".to_string()))
        );
        assert_eq!(
            split_label("## Key Features"),
            Some((Label::Section(SectionKind::KeyFeatures), String::new()))
        );
        assert_eq!(
            split_label("Tech Stack: Rust, Axum"),
            Some((Label::Section(SectionKind::TechStack), "Rust, Axum".to_string()))
        );
        assert_eq!(split_label("Why not build a game?"), None);
        assert_eq!(split_label("- Stack traces everywhere"), None);
    }

    #[test]
    fn test_bullet_indent() {
        assert_eq!(bullet_indent("- item"), "  ");
        assert_eq!(bullet_indent("12. step"), "    ");
        assert_eq!(bullet_indent("plain"), "");
    }

    #[test]
    fn test_title_on_following_line() {
        let card = SuggestionCard::parse("# Title\nOrbit Notes\nWhy: because");
        assert_eq!(card.title.as_deref(), Some("Orbit Notes"));
        assert_eq!(card.sections.len(), 1);
    }
}
