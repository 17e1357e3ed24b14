/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! Character-by-character classification of a single source line into a
//! directive, a label, an instruction, or nothing at all. Comment stripping
//! (`;`, `//`, and multiline `/* */`) happens first; `in_block_comment`
//! carries state across calls for a single file so a `/*` left open on one
//! line keeps swallowing lines until a matching `*/` is seen.

use crate::errors::AssemblyError;
use crate::instruction::Instruction;

#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Blank,
    Directive { name: String, rest: String },
    Label(String),
    Instruction(Instruction),
}

/// Strips `;`/`//`/`/* */` comments from `raw`, honouring `"…"`/`'…'` quoting
/// so a comment marker inside a string literal isn't mistaken for one.
/// `in_block_comment` is updated in place to carry an unterminated `/*`
/// across the call boundary.
fn strip_comment(raw: &str, in_block_comment: &mut bool) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut i = 0;
    let mut code = String::new();
    let mut in_string: Option<char> = None;

    if *in_block_comment {
        match find_close_comment(&chars, 0) {
            Some(after) => {
                *in_block_comment = false;
                i = after;
            }
            None => return code,
        }
    }

    while i < chars.len() {
        let c = chars[i];
        if let Some(quote) = in_string {
            code.push(c);
            if c == quote {
                in_string = None;
            }
            i += 1;
            continue;
        }
        if c == '"' || c == '\'' {
            in_string = Some(c);
            code.push(c);
            i += 1;
            continue;
        }
        if c == ';' {
            break;
        }
        if c == '/' && chars.get(i + 1) == Some(&'/') {
            break;
        }
        if c == '/' && chars.get(i + 1) == Some(&'*') {
            match find_close_comment(&chars, i + 2) {
                Some(after) => {
                    i = after;
                    continue;
                }
                None => {
                    *in_block_comment = true;
                    break;
                }
            }
        }
        code.push(c);
        i += 1;
    }
    code
}

/// Finds the index just past the next `*/` at or after `from`, if any.
fn find_close_comment(chars: &[char], from: usize) -> Option<usize> {
    let mut i = from;
    while i + 1 < chars.len() {
        if chars[i] == '*' && chars[i + 1] == '/' {
            return Some(i + 2);
        }
        i += 1;
    }
    None
}

/// Splits `s` on top-level commas, leaving `"…"`/`'…'` spans untouched.
pub fn split_operands(s: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut buf = String::new();
    let mut in_string: Option<char> = None;

    for c in s.chars() {
        if let Some(quote) = in_string {
            buf.push(c);
            if c == quote {
                in_string = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => {
                in_string = Some(c);
                buf.push(c);
            }
            ',' => {
                parts.push(buf.trim().to_string());
                buf = String::new();
            }
            _ => buf.push(c),
        }
    }
    if !buf.trim().is_empty() || !parts.is_empty() {
        parts.push(buf.trim().to_string());
    }
    parts.into_iter().filter(|p| !p.is_empty()).collect()
}

/// Classifies one raw source line, after comment-stripping, into a
/// directive, a label, an instruction, or a blank line.
pub fn classify_line(
    raw: &str,
    in_block_comment: &mut bool,
    file: &str,
    line: usize,
) -> Result<Line, AssemblyError> {
    let code = strip_comment(raw, in_block_comment);
    let code = code.trim();
    if code.is_empty() {
        return Ok(Line::Blank);
    }

    if let Some(rest) = code.strip_prefix('.') {
        let (name, rest) = match rest.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (rest, ""),
        };
        if name.is_empty() {
            return Err(AssemblyError::Syntax {
                file: file.to_string(),
                line,
                reason: "'.' with no directive name".to_string(),
            });
        }
        return Ok(Line::Directive {
            name: name.to_ascii_lowercase(),
            rest: rest.to_string(),
        });
    }

    if code.ends_with(':') && !code[..code.len() - 1].contains(char::is_whitespace) {
        return Ok(Line::Label(code[..code.len() - 1].to_string()));
    }

    let (mnemonic, rest) = match code.split_once(char::is_whitespace) {
        Some((mnemonic, rest)) => (mnemonic, rest.trim()),
        None => (code, ""),
    };
    let operands = if rest.is_empty() {
        Vec::new()
    } else {
        split_operands(rest)
    };
    Ok(Line::Instruction(Instruction::new(
        mnemonic.to_ascii_uppercase(),
        operands,
    )))
}
