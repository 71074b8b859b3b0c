//! Line-oriented markdown renderer for analytical text fields
//!
//! Supports a fixed subset: `#`/`##`/`###` headings, `-`/`*` bullets,
//! `N. ` numbered items, blank spacers and `**bold**` inline runs. Every
//! line is classified on its own; there is no multi-line grouping.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static NUMBERED_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.\s").expect("numbered list pattern is valid"));

const BOLD_MARKER: &str = "**";

/// Inline formatted span
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "text", rename_all = "snake_case")]
pub enum Run {
    Plain(String),
    Bold(String),
}

#[cfg(test)]
impl Run {
    pub fn text(&self) -> &str {
        match self {
            Run::Plain(text) | Run::Bold(text) => text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Bullet,
    Numbered,
}

/// Line-level display unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading { level: u8, runs: Vec<Run> },
    ListItem { kind: ListKind, runs: Vec<Run> },
    BlankSpacer,
    Paragraph { runs: Vec<Run> },
}

#[cfg(test)]
impl Block {
    /// Concatenated text of all runs, markers removed
    pub fn plain_text(&self) -> String {
        match self {
            Block::Heading { runs, .. } | Block::ListItem { runs, .. } | Block::Paragraph { runs } => {
                runs.iter().map(Run::text).collect()
            }
            Block::BlankSpacer => String::new(),
        }
    }
}

/// Render text into display blocks, one block per line.
pub fn render(text: &str) -> Vec<Block> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n').map(render_line).collect()
}

fn render_line(line: &str) -> Block {
    let line = line.strip_suffix('\r').unwrap_or(line);

    if let Some(rest) = line.strip_prefix("### ") {
        return Block::Heading {
            level: 3,
            runs: format_inline(rest),
        };
    }
    if let Some(rest) = line.strip_prefix("## ") {
        return Block::Heading {
            level: 2,
            runs: format_inline(rest),
        };
    }
    if let Some(rest) = line.strip_prefix("# ") {
        return Block::Heading {
            level: 1,
            runs: format_inline(rest),
        };
    }
    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return Block::ListItem {
            kind: ListKind::Bullet,
            runs: format_inline(rest),
        };
    }
    if let Some(prefix) = NUMBERED_PREFIX.find(line) {
        let rest = line.get(prefix.end()..).unwrap_or_default();
        return Block::ListItem {
            kind: ListKind::Numbered,
            runs: format_inline(rest),
        };
    }
    if line.trim().is_empty() {
        return Block::BlankSpacer;
    }
    Block::Paragraph {
        runs: format_inline(line),
    }
}

/// Split a line on paired `**` markers.
///
/// Segments at odd positions sit between a pair and become bold. An even
/// number of segments means an unpaired marker, in which case the whole
/// text stays plain.
pub fn format_inline(text: &str) -> Vec<Run> {
    let segments: Vec<&str> = text.split(BOLD_MARKER).collect();
    if segments.len() == 1 || segments.len() % 2 == 0 {
        return vec![Run::Plain(text.to_string())];
    }

    segments
        .into_iter()
        .enumerate()
        .filter_map(|(i, segment)| {
            if i % 2 == 1 {
                Some(Run::Bold(segment.to_string()))
            } else if segment.is_empty() {
                None
            } else {
                Some(Run::Plain(segment.to_string()))
            }
        })
        .collect()
}
