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

use crate::errors::AssemblyError;
use crate::instruction::Instruction;
use crate::number::parse_number;

/// Reads operand `i` as a bare integer (register/condition-code forms and
/// string literals are never valid here).
pub fn operand_as_number(
    instruction: &Instruction,
    i: usize,
    file: &str,
    line: usize,
) -> Result<i32, AssemblyError> {
    let operand = strip_indirect(&instruction.operands[i]);
    parse_number(operand).ok_or_else(|| AssemblyError::Number {
        file: file.to_string(),
        line,
        reason: format!("expected a number, got '{}'", instruction.operands[i]),
    })
}

/// Like `operand_as_number`, but checked to fit in a single byte slot.
pub fn operand_as_byte(
    instruction: &Instruction,
    i: usize,
    file: &str,
    line: usize,
) -> Result<u8, AssemblyError> {
    let value = operand_as_number(instruction, i, file, line)?;
    if !(0..=255).contains(&value) {
        return Err(AssemblyError::Number {
            file: file.to_string(),
            line,
            reason: format!("byte value {value} out of range"),
        });
    }
    Ok(value as u8)
}

/// Like `operand_as_number`, but checked to fit in a 16-bit word.
pub fn operand_as_word(
    instruction: &Instruction,
    i: usize,
    file: &str,
    line: usize,
) -> Result<u16, AssemblyError> {
    let value = operand_as_number(instruction, i, file, line)?;
    if !(0..=0xFFFF).contains(&value) {
        return Err(AssemblyError::Number {
            file: file.to_string(),
            line,
            reason: format!("word value {value} out of range"),
        });
    }
    Ok(value as u16)
}

/// Strips the `[...]` indirection wrapper, if present, so the inner numeric
/// text can be parsed.
pub fn strip_indirect(operand: &str) -> &str {
    if operand.starts_with('[') && operand.ends_with(']') {
        &operand[1..operand.len() - 1]
    } else {
        operand
    }
}

/// Extracts the raw bytes of a `"..."` string-literal operand.
pub fn operand_as_string_bytes(
    instruction: &Instruction,
    i: usize,
    file: &str,
    line: usize,
) -> Result<Vec<u8>, AssemblyError> {
    let operand = &instruction.operands[i];
    if operand.len() < 2 || !operand.starts_with('"') || !operand.ends_with('"') {
        return Err(AssemblyError::Syntax {
            file: file.to_string(),
            line,
            reason: format!("expected a string literal, got '{operand}'"),
        });
    }
    Ok(operand[1..operand.len() - 1].bytes().collect())
}

pub fn check_operand_count(
    instruction: &Instruction,
    allowed: &[usize],
    file: &str,
    line: usize,
) -> Result<(), AssemblyError> {
    if allowed.contains(&instruction.operands.len()) {
        Ok(())
    } else {
        Err(AssemblyError::Instruction {
            file: file.to_string(),
            line,
            reason: format!(
                "incorrect number of operands for '{}' (got {})",
                instruction.mnemonic,
                instruction.operands.len()
            ),
        })
    }
}
