//! Renderer for the small markdown dialect the model is prompted to emit.
//!
//! [`render`] is a single pass over the lines of its input and never fails:
//! anything it does not recognize becomes a [`Block::Paragraph`]. It is meant
//! to be called again on every streamed update, so the output for a prefix
//! that ends on a line boundary is reproduced unchanged when more lines
//! arrive. The one exception is a table at the very end of the prefix, which
//! keeps collecting body rows as they stream in.

use serde::Serialize;

/// One classified unit of renderable content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Heading { level: u8, text: String },
    BoldLabel { text: String },
    BulletItem { text: String },
    Table { header: Vec<String>, rows: Vec<Vec<String>> },
    Paragraph { text: String },
    Spacer,
}

impl Block {
    fn paragraph(line: &str) -> Self {
        Block::Paragraph {
            text: line.to_owned(),
        }
    }
}

pub fn render(text: &str) -> Vec<Block> {
    let lines: Vec<&str> = text.lines().collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].trim();

        if let Some(rest) = line.strip_prefix("## ") {
            blocks.push(heading(2, rest));
        } else if let Some(rest) = line.strip_prefix("### ") {
            blocks.push(heading(3, rest));
        } else if let Some(rest) = line.strip_prefix("#### ") {
            blocks.push(heading(4, rest));
        } else if line.starts_with("**") {
            blocks.push(Block::BoldLabel {
                text: line.replace("**", ""),
            });
        } else if let Some(rest) = line.strip_prefix("* ") {
            blocks.push(Block::BulletItem {
                text: rest.to_owned(),
            });
        } else if line.starts_with('|') {
            let next_is_separator = lines
                .get(i + 1)
                .is_some_and(|next| is_table_separator(next.trim()));

            if next_is_separator {
                let (table, next) = table(&lines, i);
                blocks.push(table);
                i = next;
                continue;
            }

            blocks.push(Block::paragraph(line));
        } else if line.is_empty() {
            blocks.push(Block::Spacer);
        } else {
            blocks.push(Block::paragraph(line));
        }

        i += 1;
    }

    blocks
}

fn heading(level: u8, text: &str) -> Block {
    Block::Heading {
        level,
        text: text.to_owned(),
    }
}

/// Parse the table whose header sits at `start` (separator at `start + 1`).
///
/// Returns the block and the index of the first line after the table.
fn table(lines: &[&str], start: usize) -> (Block, usize) {
    let header = parse_row(lines[start]);
    let mut rows = Vec::new();
    let mut next = start + 2;

    while let Some(line) = lines.get(next).map(|line| line.trim()) {
        if !line.starts_with('|') {
            break;
        }

        let cells = parse_row(line);
        if cells.len() == header.len() {
            rows.push(cells);
        }

        next += 1;
    }

    (Block::Table { header, rows }, next)
}

/// `|---|:---:|` style rows: at least one run of three hyphens and nothing
/// but hyphens, pipes, colons and whitespace.
fn is_table_separator(line: &str) -> bool {
    line.contains("---")
        && line
            .chars()
            .all(|c| matches!(c, '-' | '|' | ':') || c.is_whitespace())
}

fn parse_row(line: &str) -> Vec<String> {
    let line = line.trim();
    let line = line.strip_prefix('|').unwrap_or(line).trim_start();
    let line = line.strip_suffix('|').unwrap_or(line);

    line.split('|').map(|cell| cell.trim().to_owned()).collect()
}
