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

use crate::registers::{CONDITION_CODES, REGISTERS_16, REGISTERS_8};

/// What shape an already-simplified, already-uppercased-where-applicable
/// operand string has. `[HL]` is deliberately its own Register8 case rather
/// than a bare register name with special-cased handling scattered through
/// the encoder: it gives encoders R-table index 6 through the same tag used
/// for `A`..`L`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandType {
    ConditionCode,
    Register8,
    Register16,
    String,
    ValueIndirect,
    Value,
}

/// Classifies `operand`, first match wins. `can_be_condition_code` is false
/// in contexts where a condition code would be ambiguous with a register
/// name (there is no overlap today, but the flag mirrors the source
/// semantics: only `JP`/`CALL`/`RET` with two operands allow condition
/// codes).
pub fn classify(operand: &str, can_be_condition_code: bool) -> OperandType {
    if can_be_condition_code && CONDITION_CODES.contains(&operand) {
        return OperandType::ConditionCode;
    }
    if REGISTERS_8.contains(&operand) || operand == "[HL]" {
        return OperandType::Register8;
    }
    if REGISTERS_16.contains(&operand) {
        return OperandType::Register16;
    }
    if operand.starts_with('"') && operand.ends_with('"') {
        return OperandType::String;
    }
    if operand.contains('[') {
        return OperandType::ValueIndirect;
    }
    OperandType::Value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hl_indirect_is_register8_not_register16() {
        assert_eq!(classify("[HL]", false), OperandType::Register8);
    }

    #[test]
    fn bc_indirect_is_register16() {
        assert_eq!(classify("[BC]", false), OperandType::Register16);
    }

    #[test]
    fn condition_code_only_when_allowed() {
        // "C" is both the 8-bit register C and the carry condition code;
        // condition-code wins only when the context allows it.
        assert_eq!(classify("C", true), OperandType::ConditionCode);
        assert_eq!(classify("C", false), OperandType::Register8);
    }

    #[test]
    fn value_and_value_indirect() {
        assert_eq!(classify("1234", false), OperandType::Value);
        assert_eq!(classify("[1234]", false), OperandType::ValueIndirect);
    }

    #[test]
    fn string_literal() {
        assert_eq!(classify("\"hi\"", false), OperandType::String);
    }
}
