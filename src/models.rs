//! Data structures and types for streambrowse
//!
//! Contains the shared models used across the application organized by domain:
//! - **Columns**: provider-declared table columns and their render hints
//! - **Listings**: opaque provider rows with name-keyed field access
//! - **Highlighting**: pattern-to-style rules used to decorate title cells

use ratatui::style::Style;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Column Model
// =============================================================================

/// Horizontal alignment hint for a table column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnAlign {
    #[default]
    Left,
    Right,
}

/// A provider-declared table column with render hints
///
/// Columns are declared once per provider and are immutable after the
/// table is built. Declaration order is preserved in the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Field name used to look up cell values on a listing
    pub name: String,
    /// Fixed width in cells; remaining space goes to unsized columns
    pub width: Option<u16>,
    /// Alignment hint
    pub align: ColumnAlign,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            width: None,
            align: ColumnAlign::Left,
        }
    }

    /// Set a fixed width hint
    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    /// Right-align cell values (sizes, counts)
    pub fn right_aligned(mut self) -> Self {
        self.align = ColumnAlign::Right;
        self
    }

    /// Header label: upper-cased name with underscores spaced out
    pub fn label(&self) -> String {
        self.name.replace('_', " ").to_uppercase()
    }
}

// =============================================================================
// Listing Model
// =============================================================================

/// Selection payload carried by a listing row
///
/// This is what the download and inspect commands act on; the table itself
/// never interprets the locator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Payload {
    /// Provider-meaningful locator (path, URL, magnet, ...)
    pub locator: String,
    /// Display title
    pub title: String,
    /// Detail text surfaced by the inspect command
    pub detail: String,
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.locator)
    }
}

/// One row of a provider listing
///
/// Providers decide what fields a row carries; the table only needs
/// name-keyed access to render cells for its declared columns.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Listing {
    fields: Vec<(String, String)>,
    pub payload: Payload,
}

impl Listing {
    pub fn new(payload: Payload) -> Self {
        Self {
            fields: Vec::new(),
            payload,
        }
    }

    /// Attach a named field value, preserving insertion order
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Name-keyed cell lookup; missing fields render as empty cells
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.payload.title)
    }
}

// =============================================================================
// Highlight Rules
// =============================================================================

/// A text fragment produced by [`HighlightRules::decorate`]
pub type Fragment<'a> = (Option<Style>, &'a str);

/// Pattern-to-style rules used to decorate a title cell
///
/// The union of all rule patterns segments the text; each matched fragment
/// is styled by the first rule whose pattern matches it. Fragments
/// concatenate back to the original text exactly.
#[derive(Debug, Clone)]
pub struct HighlightRules {
    pattern: Regex,
    map: Vec<(Regex, Style)>,
}

impl HighlightRules {
    /// Build rules from `(pattern, style)` pairs
    ///
    /// Fails if any pattern (or their alternation) is not a valid regex.
    pub fn new(rules: &[(&str, Style)]) -> Result<Self, regex::Error> {
        let union = rules
            .iter()
            .map(|(p, _)| format!("(?:{})", p))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&union)?;
        let map = rules
            .iter()
            .map(|(p, s)| Regex::new(p).map(|re| (re, *s)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { pattern, map })
    }

    /// Rules that match nothing, for providers without highlighting
    pub fn none() -> Self {
        Self {
            // An empty character class never matches
            pattern: Regex::new("[^\\s\\S]").expect("static pattern"),
            map: Vec::new(),
        }
    }

    /// The compiled union pattern
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Split `text` into styled and plain fragments
    ///
    /// Empty fragments are dropped; concatenating the fragment texts in
    /// order yields `text` exactly.
    pub fn decorate<'a>(&self, text: &'a str) -> Vec<Fragment<'a>> {
        let mut fragments = Vec::new();
        let mut last = 0;
        for m in self.pattern.find_iter(text) {
            if m.start() > last {
                fragments.push((None, &text[last..m.start()]));
            }
            last = m.end();
            let frag = m.as_str();
            if frag.is_empty() {
                continue;
            }
            let style = self
                .map
                .iter()
                .find(|(re, _)| re.is_match(frag))
                .map(|(_, style)| *style);
            fragments.push((style, frag));
        }
        if last < text.len() {
            fragments.push((None, &text[last..]));
        }
        fragments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    fn quality_rules() -> HighlightRules {
        HighlightRules::new(&[
            (r"\b2160p\b", Style::default().fg(Color::Magenta)),
            (r"\b1080p\b", Style::default().fg(Color::Cyan)),
            (r"\b720p\b", Style::default().fg(Color::Yellow)),
        ])
        .unwrap()
    }

    fn concat(fragments: &[Fragment<'_>]) -> String {
        fragments.iter().map(|(_, t)| *t).collect()
    }

    #[test]
    fn test_column_label() {
        assert_eq!(Column::new("title").label(), "TITLE");
        assert_eq!(Column::new("file_size").label(), "FILE SIZE");
    }

    #[test]
    fn test_column_hints() {
        let col = Column::new("size").width(10).right_aligned();
        assert_eq!(col.width, Some(10));
        assert_eq!(col.align, ColumnAlign::Right);
    }

    #[test]
    fn test_listing_field_lookup() {
        let row = Listing::new(Payload::default())
            .with_field("title", "Dune 1080p")
            .with_field("year", "2021");
        assert_eq!(row.field("title"), Some("Dune 1080p"));
        assert_eq!(row.field("year"), Some("2021"));
        assert_eq!(row.field("missing"), None);
    }

    #[test]
    fn test_decorate_round_trip() {
        let rules = quality_rules();
        let inputs = [
            "The.Batman.2022.1080p.BluRay",
            "1080p",
            "no quality tokens here",
            "",
            "720p 1080p 2160p",
        ];
        for input in inputs {
            let fragments = rules.decorate(input);
            assert_eq!(concat(&fragments), input, "round-trip for {:?}", input);
        }
    }

    #[test]
    fn test_decorate_styles_matches_only() {
        let rules = quality_rules();
        let fragments = rules.decorate("Dune 1080p WEB");
        assert_eq!(fragments.len(), 3);
        assert_eq!(fragments[0], (None, "Dune "));
        assert_eq!(
            fragments[1],
            (Some(Style::default().fg(Color::Cyan)), "1080p")
        );
        assert_eq!(fragments[2], (None, " WEB"));
    }

    #[test]
    fn test_decorate_drops_empty_fragments() {
        let rules = quality_rules();
        // Match at the very start: no empty leading fragment
        let fragments = rules.decorate("1080p rip");
        assert_eq!(fragments[0].1, "1080p");
        assert!(fragments.iter().all(|(_, t)| !t.is_empty()));
    }

    #[test]
    fn test_decorate_none_rules() {
        let rules = HighlightRules::none();
        let fragments = rules.decorate("anything at all");
        assert_eq!(fragments, vec![(None, "anything at all")]);
    }
}
