//! # Weekly stylesheet compiler
//!
//! Compiles the indentation-based stylesheet language used by `styles`
//! sections into compact CSS.
//!
//! ```text
//! $accent = #c00
//! .wy-section-header
//!   h2
//!     color $accent
//!   &:hover
//!     color white
//! @media (max-width: 600px)
//!   .wy-section-link
//!     padding 0
//! ```
//!
//! compiles to
//!
//! ```text
//! .wy-section-header h2{color:#c00}
//! .wy-section-header:hover{color:white}
//! @media (max-width: 600px){.wy-section-link{padding:0}}
//! ```

mod error;
mod parser;

pub use error::{StylesheetError, StylesheetResult};

use parser::{is_variable_name, Item, Parser};
use std::collections::HashMap;
use tracing::debug;

/// Compile stylesheet source to CSS, one rule per line
pub fn compile_to_css(source: &str) -> StylesheetResult<String> {
    let items = Parser::new(source)?.parse()?;

    let mut emitter = Emitter::default();
    let mut rules = Vec::new();
    emitter.emit_items(&items, &[], &mut rules)?;

    debug!(rules = rules.len(), variables = emitter.variables.len(), "Stylesheet compiled");
    Ok(rules.join("\n"))
}

#[derive(Default)]
struct Emitter {
    variables: HashMap<String, String>,
}

impl Emitter {
    fn emit_items(
        &mut self,
        items: &[Item],
        parents: &[String],
        out: &mut Vec<String>,
    ) -> StylesheetResult<()> {
        let mut declarations = Vec::new();
        let mut nested = Vec::new();

        for item in items {
            match item {
                Item::Variable { name, value, line } => {
                    let value = self.substitute(value, *line)?;
                    self.variables.insert(name.clone(), value);
                }
                Item::Declaration {
                    property,
                    value,
                    line,
                } => {
                    if parents.is_empty() {
                        return Err(StylesheetError::PropertyOutsideRule {
                            line: *line,
                            property: property.clone(),
                        });
                    }
                    let value = self.substitute(value, *line)?;
                    declarations.push(format!("{}:{}", property, value));
                }
                Item::Directive { text } => nested.push(format!("{};", text)),
                Item::Block {
                    header, children, ..
                } if header.starts_with('@') => {
                    self.emit_at_rule(header, children, parents, &mut nested)?;
                }
                Item::Block {
                    header,
                    line,
                    children,
                } => {
                    let selectors = combine_selectors(parents, header, *line)?;
                    self.emit_items(children, &selectors, &mut nested)?;
                }
            }
        }

        if !declarations.is_empty() {
            out.push(format!("{}{{{}}}", parents.join(","), declarations.join(";")));
        }
        out.append(&mut nested);

        Ok(())
    }

    fn emit_at_rule(
        &mut self,
        header: &str,
        children: &[Item],
        parents: &[String],
        out: &mut Vec<String>,
    ) -> StylesheetResult<()> {
        let has_declarations = children
            .iter()
            .any(|child| matches!(child, Item::Declaration { .. }));

        // `@font-face` style blocks hold declarations directly.
        if parents.is_empty() && has_declarations {
            return self.emit_items(children, &[header.to_string()], out);
        }

        let mut inner = Vec::new();
        self.emit_items(children, parents, &mut inner)?;
        if !inner.is_empty() {
            out.push(format!("{}{{{}}}", header, inner.join("")));
        }
        Ok(())
    }

    /// Replace every identifier that names a known variable with its value
    fn substitute(&self, value: &str, line: usize) -> StylesheetResult<String> {
        let mut result = String::with_capacity(value.len());
        let mut word = String::new();

        for ch in value.chars().chain(std::iter::once('\0')) {
            if ch.is_ascii_alphanumeric() || ch == '$' || ch == '-' || ch == '_' {
                word.push(ch);
                continue;
            }

            if !word.is_empty() {
                match self.variables.get(&word) {
                    Some(replacement) => result.push_str(replacement),
                    None if word.starts_with('$') && is_variable_name(&word) => {
                        return Err(StylesheetError::UndefinedVariable { line, name: word });
                    }
                    None => result.push_str(&word),
                }
                word.clear();
            }

            if ch != '\0' {
                result.push(ch);
            }
        }

        Ok(result)
    }
}

fn combine_selectors(parents: &[String], header: &str, line: usize) -> StylesheetResult<Vec<String>> {
    let parts: Vec<&str> = header.split(',').map(str::trim).collect();
    if parts.iter().any(|part| part.is_empty()) {
        return Err(StylesheetError::EmptySelector { line });
    }

    if parents.is_empty() {
        return Ok(parts.iter().map(|part| part.to_string()).collect());
    }

    let mut selectors = Vec::with_capacity(parents.len() * parts.len());
    for parent in parents {
        for part in &parts {
            if part.contains('&') {
                selectors.push(part.replace('&', parent));
            } else {
                selectors.push(format!("{} {}", parent, part));
            }
        }
    }
    Ok(selectors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_simple_rule() {
        let css = compile_to_css(".wy-section-header\n  color red\n  padding: 10px\n").unwrap();
        assert_eq!(css, ".wy-section-header{color:red;padding:10px}");
    }

    #[test]
    fn test_compile_nested_and_parent_reference() {
        let source = r#"
.card
  margin 0
  h2, h3
    color #333
  &:hover
    color white
"#;
        let css = compile_to_css(source).unwrap();
        let rules: Vec<&str> = css.lines().collect();

        assert_eq!(rules[0], ".card{margin:0}");
        assert_eq!(rules[1], ".card h2,.card h3{color:#333}");
        assert_eq!(rules[2], ".card:hover{color:white}");
    }

    #[test]
    fn test_compile_with_variables() {
        let source = "$accent = #c00\nborder-color = $accent\n.a\n  color $accent\n  border 1px solid border-color\n";
        let css = compile_to_css(source).unwrap();
        assert_eq!(css, ".a{color:#c00;border:1px solid #c00}");
    }

    #[test]
    fn test_undefined_variable_fails() {
        let err = compile_to_css(".a\n  color $missing\n").unwrap_err();
        assert_eq!(
            err,
            StylesheetError::UndefinedVariable {
                line: 2,
                name: "$missing".to_string()
            }
        );
    }

    #[test]
    fn test_property_outside_rule_fails() {
        let err = compile_to_css("color red\n").unwrap_err();
        assert!(matches!(err, StylesheetError::PropertyOutsideRule { line: 1, .. }));
    }

    #[test]
    fn test_media_query_wraps_nested_rules() {
        let source = "@media (max-width: 600px)\n  .a\n    padding 0\n";
        let css = compile_to_css(source).unwrap();
        assert_eq!(css, "@media (max-width: 600px){.a{padding:0}}");
    }

    #[test]
    fn test_font_face_holds_declarations() {
        let source = "@font-face\n  font-family Mono\n  src url(mono.woff)\n";
        let css = compile_to_css(source).unwrap();
        assert_eq!(css, "@font-face{font-family:Mono;src:url(mono.woff)}");
    }

    #[test]
    fn test_plain_css_is_accepted() {
        let source = ".a {\n  color: red;\n}\n\n// comment\n.b {\n  margin: 0 auto;\n}\n";
        let css = compile_to_css(source).unwrap();
        assert_eq!(css, ".a{color:red}\n.b{margin:0 auto}");
    }

    #[test]
    fn test_one_line_plain_css_rules() {
        let css = compile_to_css(".wy-link a { color: red; }\n").unwrap();
        assert_eq!(css, ".wy-link a{color:red}");

        let css = compile_to_css(".a {\n  color: red; margin: 0;\n}").unwrap();
        assert_eq!(css, ".a{color:red;margin:0}");
    }

    #[test]
    fn test_multiline_comment_is_skipped() {
        let css = compile_to_css("/* brand\n   colors */\n.a\n  color red\n").unwrap();
        assert_eq!(css, ".a{color:red}");
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(compile_to_css("").unwrap(), "");
        assert_eq!(compile_to_css("\n  \n// nothing\n").unwrap(), "");
    }
}
