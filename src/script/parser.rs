//! Indentation-based script parser.
//!
//! Each non-blank line is one node, written as `name`, `name:value` or
//! `name:type:value`, nested three spaces per level:
//!
//! ```text
//! .arguments
//!    id.eq:long
//! auth.ticket.verify:admin, root
//! .is-statistics:bool:true
//! ```

use std::fs;
use std::path::Path;

use super::node::{Node, Value};
use crate::error::{ManifestError, Result};

const INDENT: usize = 3;

/// Loads a script file into a node tree without executing it.
pub trait ScriptLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<Node>;
}

/// Default loader for the indentation-based script format.
#[derive(Debug, Clone, Copy, Default)]
pub struct LambdaParser;

impl ScriptLoader for LambdaParser {
    fn load(&self, path: &Path) -> Result<Node> {
        let source = fs::read_to_string(path).map_err(|e| ManifestError::io(path, e))?;
        parse(&source).map_err(|(line, message)| ManifestError::Parse {
            path: path.to_path_buf(),
            line,
            message,
        })
    }
}

/// Parse script text into an unnamed root node whose children are the
/// top-level instructions. Errors carry the 1-based line number.
pub fn parse(source: &str) -> std::result::Result<Node, (usize, String)> {
    // stack[0] is the root; stack[d + 1] is the open node at depth d.
    let mut stack: Vec<Node> = vec![Node::new("")];

    for (idx, raw) in source.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = raw.trim_start_matches(' ');
        if trimmed.trim().is_empty() || trimmed.starts_with("//") {
            continue;
        }
        if trimmed.starts_with('\t') {
            return Err((line_no, "tab indentation is not allowed".to_string()));
        }

        let spaces = raw.len() - trimmed.len();
        if spaces % INDENT != 0 {
            return Err((
                line_no,
                format!("indentation of {} spaces is not a multiple of {}", spaces, INDENT),
            ));
        }
        let depth = spaces / INDENT;
        if depth + 1 > stack.len() {
            return Err((line_no, "indentation skips a level".to_string()));
        }

        let node = parse_line(trimmed).map_err(|message| (line_no, message))?;

        while stack.len() > depth + 1 {
            close_top(&mut stack);
        }
        stack.push(node);
    }

    while stack.len() > 1 {
        close_top(&mut stack);
    }
    Ok(stack.pop().unwrap_or_default())
}

fn close_top(stack: &mut Vec<Node>) {
    if let Some(done) = stack.pop() {
        if let Some(parent) = stack.last_mut() {
            parent.push(done);
        }
    }
}

fn parse_line(text: &str) -> std::result::Result<Node, String> {
    let (name, rest) = if text.starts_with('"') {
        read_quoted(text)?
    } else {
        match text.find(':') {
            Some(pos) => (text[..pos].to_string(), &text[pos..]),
            None => (text.trim_end().to_string(), ""),
        }
    };

    let rest = rest.trim_end();
    if rest.is_empty() {
        return Ok(Node::new(name));
    }
    let Some(value_text) = rest.strip_prefix(':') else {
        return Err(format!("unexpected text after name: {}", rest));
    };

    Ok(Node {
        name,
        value: Some(parse_value(value_text)?),
        children: Vec::new(),
    })
}

fn parse_value(text: &str) -> std::result::Result<Value, String> {
    if text.starts_with('"') {
        return quoted_only(text).map(Value::String);
    }
    if let Some((keyword, tail)) = text.split_once(':') {
        if let Some(value) = parse_typed(keyword, tail)? {
            return Ok(value);
        }
    }
    Ok(Value::String(text.to_string()))
}

/// Converts `tail` according to a type keyword. Returns `Ok(None)` when the
/// keyword is not a known type, in which case the caller keeps the raw text.
fn parse_typed(keyword: &str, tail: &str) -> std::result::Result<Option<Value>, String> {
    let value = match keyword {
        "string" => {
            if tail.starts_with('"') {
                Value::String(quoted_only(tail)?)
            } else {
                Value::String(tail.to_string())
            }
        }
        "bool" => match tail.trim() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            other => return Err(format!("invalid bool value: {}", other)),
        },
        "int" | "long" => tail
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|e| format!("invalid {} value '{}': {}", keyword, tail, e))?,
        "decimal" | "double" | "float" => tail
            .trim()
            .parse::<f64>()
            .map(Value::Decimal)
            .map_err(|e| format!("invalid {} value '{}': {}", keyword, tail, e))?,
        _ => return Ok(None),
    };
    Ok(Some(value))
}

fn quoted_only(text: &str) -> std::result::Result<String, String> {
    let (s, rest) = read_quoted(text)?;
    if !rest.trim().is_empty() {
        return Err(format!("unexpected text after quoted string: {}", rest));
    }
    Ok(s)
}

/// Reads a double-quoted string at the start of `text`, returning the
/// unescaped content and the remainder after the closing quote.
fn read_quoted(text: &str) -> std::result::Result<(String, &str), String> {
    let mut out = String::new();
    let mut chars = text.char_indices().skip(1);
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Ok((out, &text[i + 1..])),
            '\\' => match chars.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, 'r')) => out.push('\r'),
                Some((_, 't')) => out.push('\t'),
                Some((_, other)) => out.push(other),
                None => break,
            },
            c => out.push(c),
        }
    }
    Err("unterminated string literal".to_string())
}
