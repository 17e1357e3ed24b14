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

//! Reduces a single operand-sized text fragment to a numeric literal, an
//! indirect-wrapped numeric literal, a register/condition-code name, or a
//! string literal, using the shunting-yard algorithm for anything with
//! operators in it.

use crate::assembler::symbol_table::{Pass, SymbolTable};
use crate::errors::AssemblyError;
use crate::number::parse_number;
use crate::registers::is_register_or_condition_code;

/// Operator precedence, highest first. All operators are left-associative;
/// there are no unary operators.
fn precedence(op: &str) -> u8 {
    match op {
        "*" | "/" => 6,
        "+" | "-" => 5,
        ">>" | "<<" => 4,
        "&" => 3,
        "^" => 2,
        "|" => 1,
        _ => 0,
    }
}

fn is_operator(token: &str) -> bool {
    matches!(
        token,
        "+" | "-" | "*" | "/" | "&" | "|" | "^" | "<<" | ">>"
    )
}

/// Splits an expression fragment into tokens: numbers, names, operators, and
/// parentheses. `"…"`/`'…'` spans are passed through verbatim. `>>`/`<<` are
/// only recognised when the character repeats; a lone `>` or `<` is emitted
/// as its own one-character token (and will fail evaluation as an unknown
/// operator, matching the narrow grammar this language supports).
fn tokenize(expr: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut buf = String::new();
    let mut in_string = false;
    let chars: Vec<char> = expr.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '"' || c == '\'' {
            buf.push(c);
            in_string = !in_string;
            i += 1;
            continue;
        }
        if in_string {
            buf.push(c);
            i += 1;
            continue;
        }
        if c == '('
            || c == ')'
            || c == '+'
            || c == '-'
            || c == '*'
            || c == '/'
            || c == '&'
            || c == '|'
            || c == '^'
            || c == '>'
            || c == '<'
        {
            if !buf.is_empty() {
                tokens.push(std::mem::take(&mut buf));
            }
            if (c == '>' || c == '<') && chars.get(i + 1) == Some(&c) {
                tokens.push(format!("{c}{c}"));
                i += 2;
                continue;
            }
            tokens.push(c.to_string());
            i += 1;
            continue;
        }
        if c.is_whitespace() {
            if !buf.is_empty() {
                tokens.push(std::mem::take(&mut buf));
            }
            i += 1;
            continue;
        }
        buf.push(c);
        i += 1;
    }
    if !buf.is_empty() {
        tokens.push(buf);
    }
    tokens
}

enum RpnStep {
    Push(i32),
    Apply(String),
}

/// Converts infix tokens to reverse Polish notation via shunting-yard,
/// substituting symbol-table values for any token that isn't a numeric
/// literal or a bare operator/parenthesis.
fn to_rpn(
    tokens: &[String],
    symbol_table: &SymbolTable,
    pass: Pass,
    file: &str,
    line: usize,
) -> Result<Vec<RpnStep>, AssemblyError> {
    let mut output: Vec<RpnStep> = Vec::new();
    let mut operators: Vec<String> = Vec::new();

    for token in tokens {
        if let Some(value) = parse_number(token) {
            output.push(RpnStep::Push(value));
            continue;
        }
        if token == "(" {
            operators.push(token.clone());
            continue;
        }
        if token == ")" {
            loop {
                match operators.pop() {
                    Some(op) if op == "(" => break,
                    Some(op) => output.push(RpnStep::Apply(op)),
                    None => {
                        return Err(AssemblyError::Expression {
                            file: file.to_string(),
                            line,
                            reason: "unbalanced parenthesis: extra ')'".to_string(),
                        });
                    }
                }
            }
            continue;
        }
        if is_operator(token) {
            while let Some(top) = operators.last() {
                if is_operator(top) && precedence(top) > precedence(token) {
                    output.push(RpnStep::Apply(operators.pop().unwrap()));
                } else {
                    break;
                }
            }
            operators.push(token.clone());
            continue;
        }
        match symbol_table.lookup(token, pass) {
            Some(value) => output.push(RpnStep::Push(value)),
            None => {
                return Err(AssemblyError::Symbol {
                    file: file.to_string(),
                    line,
                    reason: format!("undefined symbol '{token}'"),
                });
            }
        }
    }

    while let Some(op) = operators.pop() {
        if op == "(" || op == ")" {
            return Err(AssemblyError::Expression {
                file: file.to_string(),
                line,
                reason: format!("unbalanced parenthesis: extra '{op}'"),
            });
        }
        output.push(RpnStep::Apply(op));
    }

    Ok(output)
}

fn fold_rpn(rpn: &[RpnStep], file: &str, line: usize) -> Result<Vec<i32>, AssemblyError> {
    let mut stack: Vec<i32> = Vec::new();
    for step in rpn {
        match step {
            RpnStep::Push(value) => stack.push(*value),
            RpnStep::Apply(op) => {
                if stack.len() < 2 {
                    return Err(AssemblyError::Expression {
                        file: file.to_string(),
                        line,
                        reason: "missing operand for expression".to_string(),
                    });
                }
                let second = stack.pop().unwrap();
                let first = stack.pop().unwrap();
                let result = apply_operator(op, first, second, file, line)?;
                stack.push(result);
            }
        }
    }
    Ok(stack)
}

/// `>>`/`<<` treat their operands as unsigned; `^` is corrected here to mean
/// XOR rather than the distilled source's `&` (see DESIGN.md).
fn apply_operator(
    op: &str,
    first: i32,
    second: i32,
    file: &str,
    line: usize,
) -> Result<i32, AssemblyError> {
    match op {
        "+" => Ok(first.wrapping_add(second)),
        "-" => Ok(first.wrapping_sub(second)),
        "*" => Ok(first.wrapping_mul(second)),
        "/" => {
            if second == 0 {
                Err(AssemblyError::Expression {
                    file: file.to_string(),
                    line,
                    reason: "division by zero".to_string(),
                })
            } else {
                Ok(first.wrapping_div(second))
            }
        }
        ">>" => Ok(((first as u32) >> (second as u32 & 31)) as i32),
        "<<" => Ok(((first as u32) << (second as u32 & 31)) as i32),
        "|" => Ok(first | second),
        "&" => Ok(first & second),
        "^" => Ok(first ^ second),
        _ => Err(AssemblyError::Expression {
            file: file.to_string(),
            line,
            reason: format!("unknown operator '{op}'"),
        }),
    }
}

/// Reduces `fragment` to its final textual form for an operand slot: a
/// decimal-literal string, that same literal re-wrapped in `[...]`, an
/// uppercased register/condition-code name, or an unchanged string literal.
pub fn simplify(
    fragment: &str,
    symbol_table: &SymbolTable,
    pass: Pass,
    file: &str,
    line: usize,
) -> Result<String, AssemblyError> {
    let fragment = fragment.trim();
    if fragment.is_empty() {
        return Err(AssemblyError::Syntax {
            file: file.to_string(),
            line,
            reason: "expected an operand".to_string(),
        });
    }

    let upper = fragment.to_uppercase();
    if is_register_or_condition_code(&upper) {
        return Ok(upper);
    }

    if fragment.starts_with('"') && fragment.ends_with('"') && fragment.len() >= 2 {
        return Ok(fragment.to_string());
    }

    let (inner, indirect) = if fragment.starts_with('[') && fragment.ends_with(']') {
        (&fragment[1..fragment.len() - 1], true)
    } else {
        (fragment, false)
    };

    let tokens = tokenize(inner);
    if tokens.is_empty() {
        return Err(AssemblyError::Expression {
            file: file.to_string(),
            line,
            reason: "empty expression".to_string(),
        });
    }
    let rpn = to_rpn(&tokens, symbol_table, pass, file, line)?;
    let stack = fold_rpn(&rpn, file, line)?;
    if stack.len() != 1 {
        return Err(AssemblyError::Expression {
            file: file.to_string(),
            line,
            reason: format!("malformed expression '{inner}'"),
        });
    }

    let result = stack[0].to_string();
    Ok(if indirect {
        format!("[{result}]")
    } else {
        result
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(expr: &str) -> i32 {
        let table = SymbolTable::new();
        simplify(expr, &table, Pass::Emit, "t", 1)
            .unwrap()
            .parse()
            .unwrap()
    }

    #[test]
    fn arithmetic_precedence() {
        assert_eq!(eval("1 + 2 * 3"), 7);
        assert_eq!(eval("(1 + 2) * 3"), 9);
    }

    #[test]
    fn shift_and_mask() {
        assert_eq!(eval("1 << 4"), 16);
        assert_eq!(eval("0xFF >> 4"), 0x0F);
    }

    #[test]
    fn xor_is_corrected_to_real_xor() {
        assert_eq!(eval("0b0110 ^ 0b0101"), 0b0011);
    }

    #[test]
    fn commutativity() {
        assert_eq!(eval("3 + 5"), eval("5 + 3"));
        assert_eq!(eval("3 * 5"), eval("5 * 3"));
    }

    #[test]
    fn shift_algebra() {
        for n in 0..16 {
            assert_eq!(eval(&format!("7 << {n}")), 7 * (1 << n));
        }
    }

    #[test]
    fn indirect_wrapping_round_trips() {
        let table = SymbolTable::new();
        let simplified = simplify("[1 + 2]", &table, Pass::Emit, "t", 1).unwrap();
        assert_eq!(simplified, "[3]");
    }

    #[test]
    fn idempotent_on_pure_numeric_forms() {
        let table = SymbolTable::new();
        let once = simplify("1 + 2 * 3", &table, Pass::Emit, "t", 1).unwrap();
        let twice = simplify(&once, &table, Pass::Emit, "t", 1).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn register_and_condition_code_pass_through() {
        let table = SymbolTable::new();
        assert_eq!(
            simplify("hl", &table, Pass::Emit, "t", 1).unwrap(),
            "HL"
        );
        assert_eq!(simplify("nz", &table, Pass::Emit, "t", 1).unwrap(), "NZ");
    }

    #[test]
    fn string_literal_passes_through_unchanged() {
        let table = SymbolTable::new();
        assert_eq!(
            simplify("\"hello\"", &table, Pass::Emit, "t", 1).unwrap(),
            "\"hello\""
        );
    }

    #[test]
    fn unbalanced_parens_is_an_error() {
        let table = SymbolTable::new();
        assert!(simplify("(1 + 2", &table, Pass::Emit, "t", 1).is_err());
        assert!(simplify("1 + 2)", &table, Pass::Emit, "t", 1).is_err());
    }

    #[test]
    fn division_by_zero_is_a_reported_error_not_a_panic() {
        let table = SymbolTable::new();
        assert!(simplify("1 / 0", &table, Pass::Emit, "t", 1).is_err());
    }

    #[test]
    fn forward_reference_substitutes_zero_on_resolve_pass() {
        let mut table = SymbolTable::new();
        table.declare_label("later", "t", 1).unwrap();
        assert_eq!(
            simplify("later", &table, Pass::Resolve, "t", 2).unwrap(),
            "0"
        );
        assert!(simplify("later", &table, Pass::Emit, "t", 2).is_err());
    }
}
