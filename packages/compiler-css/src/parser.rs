//! Indentation-based stylesheet parser.
//!
//! A line followed by a more indented line opens a block (selector or
//! at-rule); every other line is a leaf: a variable assignment, a
//! declaration, or a bodiless at-rule directive. Plain CSS parses too:
//! braces and semicolons split it into the same logical lines.

use crate::error::{StylesheetError, StylesheetResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Item {
    Variable {
        name: String,
        value: String,
        line: usize,
    },
    Declaration {
        property: String,
        value: String,
        line: usize,
    },
    Directive {
        text: String,
    },
    Block {
        header: String,
        line: usize,
        children: Vec<Item>,
    },
}

#[derive(Debug, Clone)]
struct Line {
    number: usize,
    indent: usize,
    text: String,
    /// Opened with `{`, so it is a block even without children.
    braced: bool,
}

pub(crate) struct Parser {
    lines: Vec<Line>,
    pos: usize,
}

impl Parser {
    pub fn new(source: &str) -> StylesheetResult<Self> {
        Ok(Self {
            lines: significant_lines(source)?,
            pos: 0,
        })
    }

    pub fn parse(mut self) -> StylesheetResult<Vec<Item>> {
        let Some(base) = self.lines.first().map(|line| line.indent) else {
            return Ok(Vec::new());
        };

        let items = self.parse_block(base)?;

        // Anything left dedented below the first line's column.
        if let Some(line) = self.peek() {
            return Err(StylesheetError::InconsistentDedent { line: line.number });
        }

        Ok(items)
    }

    fn peek(&self) -> Option<&Line> {
        self.lines.get(self.pos)
    }

    fn parse_block(&mut self, indent: usize) -> StylesheetResult<Vec<Item>> {
        let mut items = Vec::new();

        while let Some(line) = self.peek().cloned() {
            if line.indent < indent {
                break;
            }
            if line.indent > indent {
                return Err(StylesheetError::UnexpectedIndent { line: line.number });
            }
            self.pos += 1;

            let child_indent = self
                .peek()
                .map(|next| next.indent)
                .filter(|&next| next > indent);

            match child_indent {
                Some(child_indent) => {
                    let children = self.parse_block(child_indent)?;
                    if let Some(next) = self.peek() {
                        if next.indent > indent {
                            return Err(StylesheetError::InconsistentDedent { line: next.number });
                        }
                    }
                    items.push(Item::Block {
                        header: line.text,
                        line: line.number,
                        children,
                    });
                }
                None if line.braced => items.push(Item::Block {
                    header: line.text,
                    line: line.number,
                    children: Vec::new(),
                }),
                None => items.push(leaf(&line)?),
            }
        }

        Ok(items)
    }
}

/// Split `source` into logical lines.
///
/// Outside braces a line's indentation is its own. Inside braces, nesting
/// comes from the braces alone: `{` opens a block, `;` ends a declaration and
/// `}` closes the block, so several logical lines can share one source line.
fn significant_lines(source: &str) -> StylesheetResult<Vec<Line>> {
    let source = strip_block_comments(source);
    let mut lines: Vec<Line> = Vec::new();
    // (indent, line) of every header whose `{` is still open.
    let mut open: Vec<(usize, usize)> = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let number = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }

        let own_indent = raw.len() - raw.trim_start().len();
        let mut start = 0;
        let mut parens = 0usize;
        let mut quote: Option<char> = None;

        for (at, ch) in trimmed.char_indices() {
            match (quote, ch) {
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'') => quote = Some(ch),
                (None, '(') => parens += 1,
                (None, ')') => parens = parens.saturating_sub(1),
                (None, '{' | '}' | ';') if parens == 0 => {
                    let indent = open.last().map_or(own_indent, |(header, _)| header + 2);
                    let text = trimmed[start..at].trim();
                    start = at + ch.len_utf8();

                    if !text.is_empty() {
                        lines.push(Line {
                            number,
                            indent,
                            text: text.to_string(),
                            braced: ch == '{',
                        });
                    }

                    match ch {
                        '{' if text.is_empty() => {
                            // `{` on its own line opens the previous header.
                            let header = match lines.last_mut() {
                                Some(previous) => {
                                    previous.braced = true;
                                    previous.indent
                                }
                                None => indent,
                            };
                            open.push((header, number));
                        }
                        '{' => open.push((indent, number)),
                        '}' => {
                            if open.pop().is_none() {
                                return Err(StylesheetError::UnmatchedBrace { line: number });
                            }
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        let rest = trimmed[start..].trim();
        if !rest.is_empty() {
            lines.push(Line {
                number,
                indent: open.last().map_or(own_indent, |(header, _)| header + 2),
                text: rest.to_string(),
                braced: false,
            });
        }
    }

    if let Some((_, line)) = open.first() {
        return Err(StylesheetError::UnclosedBrace { line: *line });
    }

    Ok(lines)
}

/// Remove `/* */` comments, keeping their line breaks so line numbers hold
fn strip_block_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        let comment = &rest[start + 2..];
        let end = comment.find("*/").map_or(comment.len(), |end| end + 2);
        out.extend(comment[..end].chars().filter(|&c| c == '\n'));
        rest = &comment[end..];
    }

    out.push_str(rest);
    out
}

fn leaf(line: &Line) -> StylesheetResult<Item> {
    let text = line.text.as_str();

    if text.starts_with('@') {
        return Ok(Item::Directive {
            text: text.to_string(),
        });
    }

    if let Some((name, value)) = text.split_once('=') {
        let name = name.trim();
        if is_variable_name(name) {
            return Ok(Item::Variable {
                name: name.to_string(),
                value: value.trim().to_string(),
                line: line.number,
            });
        }
    }

    let split = text
        .find(|c: char| c == ':' || c.is_whitespace())
        .unwrap_or(text.len());
    let (property, rest) = text.split_at(split);
    let value = rest.trim_start_matches(|c: char| c == ':' || c.is_whitespace());

    if value.is_empty() {
        return Err(StylesheetError::MissingValue {
            line: line.number,
            property: property.to_string(),
        });
    }

    Ok(Item::Declaration {
        property: property.to_string(),
        value: value.to_string(),
        line: line.number,
    })
}

pub(crate) fn is_variable_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '$' || first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
