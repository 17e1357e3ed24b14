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

/// Parses a single numeric literal token: decimal, `0x`/`0X` hex, leading-zero
/// octal, `0b` binary, or a three-character `'X'` character literal. Returns
/// `None` rather than erroring — callers decide whether a parse failure means
/// "not a number" (e.g. a symbol name) or a fatal number error.
pub fn parse_number(token: &str) -> Option<i32> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    if let Some(bits) = token.strip_prefix("0b").or_else(|| token.strip_prefix("0B")) {
        return i32::from_str_radix(bits, 2).ok();
    }

    if token.len() == 3 && token.as_bytes()[0] == b'\'' && token.as_bytes()[2] == b'\'' {
        return Some(token.as_bytes()[1] as i32);
    }

    let (negative, rest) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };

    let value = if let Some(hex) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        i32::from_str_radix(hex, 16).ok()?
    } else if rest.len() > 1 && rest.starts_with('0') {
        i32::from_str_radix(&rest[1..], 8).ok()?
    } else {
        rest.parse::<i32>().ok()?
    };

    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal() {
        assert_eq!(parse_number("66"), Some(66));
        assert_eq!(parse_number("-3"), Some(-3));
    }

    #[test]
    fn hex() {
        assert_eq!(parse_number("0x1234"), Some(0x1234));
        assert_eq!(parse_number("0X42"), Some(0x42));
    }

    #[test]
    fn octal() {
        assert_eq!(parse_number("010"), Some(8));
    }

    #[test]
    fn binary() {
        assert_eq!(parse_number("0b1010"), Some(10));
    }

    #[test]
    fn character_literal() {
        assert_eq!(parse_number("'A'"), Some(65));
    }

    #[test]
    fn not_a_number() {
        assert_eq!(parse_number("label"), None);
        assert_eq!(parse_number(""), None);
    }
}
