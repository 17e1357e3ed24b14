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

//! Pure encoding of a reduced `Instruction` into its final byte sequence,
//! implementing the LR35902 instruction matrix plus the `DB`/`DW`/`ASCII`/
//! `ASCIZ` pseudo-directives. Nothing here touches the symbol table or the
//! output cursor; the driver calls `calculate_instruction_size` during pass 1
//! and `encode_instruction` during pass 2.

pub mod components;
pub mod constants;
pub mod utility_functions;

use components::{asm_xzqp, asm_xzy};
use constants::{alu_index, cc_index, r_index, rot_index, rp2_index, rp_index};
use utility_functions::{
    check_operand_count, operand_as_byte, operand_as_string_bytes, operand_as_word, strip_indirect,
};

use crate::errors::AssemblyError;
use crate::instruction::Instruction;
use crate::number::parse_number;
use crate::operand::{classify, OperandType};

/// Computes the byte length an instruction will occupy without generating its
/// bytes. Used on pass 1 to advance the output cursor before every label's
/// final address is known.
pub fn calculate_instruction_size(
    instruction: &Instruction,
    file: &str,
    line: usize,
) -> Result<usize, AssemblyError> {
    Ok(encode_instruction(instruction, file, line)?.len())
}

/// Encodes `instruction` to its final bytes. Pure: callers supply already
/// fully-simplified operand strings (see `expr::simplify`).
pub fn encode_instruction(
    instruction: &Instruction,
    file: &str,
    line: usize,
) -> Result<Vec<u8>, AssemblyError> {
    match instruction.mnemonic.as_str() {
        "DB" => encode_db(instruction, file, line),
        "DW" => encode_dw(instruction, file, line),
        "ASCII" => encode_ascii(instruction, file, line, false),
        "ASCIZ" => encode_ascii(instruction, file, line, true),

        "ADD" | "ADC" | "SUB" | "SBC" | "AND" | "XOR" | "OR" | "CP" => {
            encode_alu(instruction, file, line)
        }

        "RLC" | "RRC" | "RL" | "RR" | "SLA" | "SRA" | "SWAP" | "SRL" => {
            encode_rotate(instruction, file, line)
        }

        "BIT" | "RES" | "SET" => encode_bit_op(instruction, file, line),

        "CALL" | "JP" => encode_call_or_jp(instruction, file, line),

        "INC" | "DEC" => encode_inc_or_dec(instruction, file, line),

        "LD" => encode_ld(instruction, file, line),
        "LDH" => encode_ldh(instruction, file, line),
        "LDI" | "LDD" => encode_ldi_or_ldd(instruction, file, line),

        "PUSH" | "POP" => encode_push_or_pop(instruction, file, line),

        "RET" => encode_ret(instruction, file, line),

        "CPL" => singleton(instruction, file, line, 0x2F),
        "DI" => singleton(instruction, file, line, 0xF3),
        "EI" => singleton(instruction, file, line, 0xFB),
        "HALT" => singleton(instruction, file, line, 0x76),
        "NOP" => singleton(instruction, file, line, 0x00),
        "RETI" => singleton(instruction, file, line, 0xD9),

        other => Err(AssemblyError::Instruction {
            file: file.to_string(),
            line,
            reason: format!("unknown mnemonic '{other}'"),
        }),
    }
}

fn instruction_error(file: &str, line: usize, reason: impl Into<String>) -> AssemblyError {
    AssemblyError::Instruction {
        file: file.to_string(),
        line,
        reason: reason.into(),
    }
}

fn singleton(
    instruction: &Instruction,
    file: &str,
    line: usize,
    opcode: u8,
) -> Result<Vec<u8>, AssemblyError> {
    check_operand_count(instruction, &[0], file, line)?;
    Ok(vec![opcode])
}

fn encode_db(instruction: &Instruction, file: &str, line: usize) -> Result<Vec<u8>, AssemblyError> {
    if instruction.operands.is_empty() {
        return Err(instruction_error(file, line, "'DB' requires at least one operand"));
    }
    let mut bytes = Vec::with_capacity(instruction.operands.len());
    for i in 0..instruction.operands.len() {
        bytes.push(operand_as_byte(instruction, i, file, line)?);
    }
    Ok(bytes)
}

fn encode_dw(instruction: &Instruction, file: &str, line: usize) -> Result<Vec<u8>, AssemblyError> {
    if instruction.operands.is_empty() {
        return Err(instruction_error(file, line, "'DW' requires at least one operand"));
    }
    let mut bytes = Vec::with_capacity(instruction.operands.len() * 2);
    for i in 0..instruction.operands.len() {
        let value = operand_as_word(instruction, i, file, line)?;
        bytes.push((value & 0xFF) as u8);
        bytes.push((value >> 8) as u8);
    }
    Ok(bytes)
}

fn encode_ascii(
    instruction: &Instruction,
    file: &str,
    line: usize,
    terminated: bool,
) -> Result<Vec<u8>, AssemblyError> {
    check_operand_count(instruction, &[1], file, line)?;
    let mut bytes = operand_as_string_bytes(instruction, 0, file, line)?;
    if terminated {
        bytes.push(0x00);
    }
    Ok(bytes)
}

/// Reads an operand directly as a byte-range numeric literal, stripping any
/// `[...]` indirect wrapper first. Used by the ALU immediate form, where the
/// operand being read isn't necessarily at a fixed index.
fn numeric_operand_as_byte(operand: &str, file: &str, line: usize) -> Result<u8, AssemblyError> {
    let stripped = strip_indirect(operand);
    let value = parse_number(stripped).ok_or_else(|| AssemblyError::Number {
        file: file.to_string(),
        line,
        reason: format!("expected a number, got '{operand}'"),
    })?;
    if !(0..=255).contains(&value) {
        return Err(AssemblyError::Number {
            file: file.to_string(),
            line,
            reason: format!("byte value {value} out of range"),
        });
    }
    Ok(value as u8)
}

/// `ADD ADC SUB SBC AND XOR OR CP`. Two-operand forms require `A` as the
/// first operand, except `ADD HL, rr`. The immediate opcode form is
/// `0b11yyy110`, built directly since its field layout straddles the
/// `p`/`q` split that `asm_xzqp` encodes.
fn encode_alu(instruction: &Instruction, file: &str, line: usize) -> Result<Vec<u8>, AssemblyError> {
    check_operand_count(instruction, &[1, 2], file, line)?;
    let yyy = alu_index(&instruction.mnemonic).expect("dispatched only for ALU mnemonics");

    let target = if instruction.operands.len() == 2 {
        if instruction.mnemonic == "ADD" && instruction.operands[0] == "HL" {
            let rp = rp_index(&instruction.operands[1]).ok_or_else(|| {
                instruction_error(file, line, "'ADD HL' requires a 16-bit register pair")
            })?;
            return Ok(vec![asm_xzqp(0, 1, 1, rp)]);
        }
        if instruction.operands[0] != "A" {
            return Err(instruction_error(
                file,
                line,
                format!("'{}' with two operands requires 'A' as the first", instruction.mnemonic),
            ));
        }
        &instruction.operands[1]
    } else {
        &instruction.operands[0]
    };

    match classify(target, false) {
        OperandType::Register8 => {
            let rrr = r_index(target).expect("Register8 tag implies R-table membership");
            Ok(vec![asm_xzy(2, rrr, yyy)])
        }
        OperandType::Value | OperandType::ValueIndirect => {
            let imm = numeric_operand_as_byte(target, file, line)?;
            Ok(vec![0b11_000_110 | (yyy << 3), imm])
        }
        _ => Err(instruction_error(file, line, format!("invalid operand '{target}' for ALU instruction"))),
    }
}

fn encode_rotate(instruction: &Instruction, file: &str, line: usize) -> Result<Vec<u8>, AssemblyError> {
    check_operand_count(instruction, &[1], file, line)?;
    let reg = &instruction.operands[0];
    let rrr = r_index(reg).ok_or_else(|| {
        instruction_error(file, line, format!("'{}' is not a valid register operand", instruction.mnemonic))
    })?;
    let yyy = rot_index(&instruction.mnemonic).expect("dispatched only for rotate mnemonics");
    Ok(vec![0xCB, asm_xzy(0, rrr, yyy)])
}

fn encode_bit_op(instruction: &Instruction, file: &str, line: usize) -> Result<Vec<u8>, AssemblyError> {
    check_operand_count(instruction, &[2], file, line)?;
    let bit_index = operand_as_byte(instruction, 0, file, line)?;
    if bit_index > 7 {
        return Err(AssemblyError::Number {
            file: file.to_string(),
            line,
            reason: format!("bit index {bit_index} out of range 0..7"),
        });
    }
    let reg = &instruction.operands[1];
    let rrr = r_index(reg).ok_or_else(|| {
        instruction_error(file, line, format!("'{reg}' is not a valid register operand"))
    })?;
    let x = match instruction.mnemonic.as_str() {
        "BIT" => 1,
        "RES" => 2,
        "SET" => 3,
        _ => unreachable!(),
    };
    Ok(vec![0xCB, asm_xzy(x, rrr, bit_index)])
}

fn encode_call_or_jp(instruction: &Instruction, file: &str, line: usize) -> Result<Vec<u8>, AssemblyError> {
    check_operand_count(instruction, &[1, 2], file, line)?;
    let is_call = instruction.mnemonic == "CALL";

    if instruction.operands.len() == 1 {
        let target = &instruction.operands[0];
        if !is_call && (target == "[HL]" || target == "HL") {
            return Ok(vec![asm_xzqp(3, 1, 1, 2)]);
        }
        let addr = operand_as_word(instruction, 0, file, line)?;
        let opcode = if is_call { 0xCD } else { 0xC3 };
        return Ok(vec![opcode, (addr & 0xFF) as u8, (addr >> 8) as u8]);
    }

    let cc = cc_index(&instruction.operands[0]).ok_or_else(|| {
        instruction_error(file, line, format!("'{}' is not a valid condition code", instruction.operands[0]))
    })?;
    let addr = operand_as_word(instruction, 1, file, line)?;
    let opcode = asm_xzy(3, if is_call { 4 } else { 2 }, cc);
    Ok(vec![opcode, (addr & 0xFF) as u8, (addr >> 8) as u8])
}

fn encode_inc_or_dec(instruction: &Instruction, file: &str, line: usize) -> Result<Vec<u8>, AssemblyError> {
    check_operand_count(instruction, &[1], file, line)?;
    let operand = &instruction.operands[0];
    let is_inc = instruction.mnemonic == "INC";

    if let Some(rrr) = r_index(operand) {
        let suffix = if is_inc { 4 } else { 5 };
        return Ok(vec![asm_xzy(0, suffix, rrr)]);
    }
    if let Some(rp) = rp_index(operand) {
        let q = if is_inc { 0 } else { 1 };
        return Ok(vec![asm_xzqp(0, 3, q, rp)]);
    }
    Err(instruction_error(file, line, format!("'{operand}' is not a valid INC/DEC target")))
}

/// Eight distinct `LD` cases, discriminated on destination/source operand
/// type. `[HL]` participates in the r8<-r8 family through R-table index 6
/// rather than as a separate case.
fn encode_ld(instruction: &Instruction, file: &str, line: usize) -> Result<Vec<u8>, AssemblyError> {
    check_operand_count(instruction, &[2], file, line)?;
    let dst = &instruction.operands[0];
    let src = &instruction.operands[1];
    let dst_type = classify(dst, false);
    let src_type = classify(src, false);

    // [BC]/[DE] <-> A short forms.
    if dst == "[BC]" && src == "A" {
        return Ok(vec![0x02]);
    }
    if dst == "A" && src == "[BC]" {
        return Ok(vec![0x0A]);
    }
    if dst == "[DE]" && src == "A" {
        return Ok(vec![0x12]);
    }
    if dst == "A" && src == "[DE]" {
        return Ok(vec![0x1A]);
    }

    // [nn] <-> A.
    if dst_type == OperandType::ValueIndirect && src == "A" {
        let addr = operand_as_word(instruction, 0, file, line)?;
        return Ok(vec![0xEA, (addr & 0xFF) as u8, (addr >> 8) as u8]);
    }
    if dst == "A" && src_type == OperandType::ValueIndirect {
        let addr = operand_as_word(instruction, 1, file, line)?;
        return Ok(vec![0xFA, (addr & 0xFF) as u8, (addr >> 8) as u8]);
    }

    // rp <- imm16.
    if let Some(rp) = rp_index(dst) {
        if matches!(src_type, OperandType::Value | OperandType::ValueIndirect) {
            let value = operand_as_word(instruction, 1, file, line)?;
            let opcode = asm_xzqp(0, 1, 0, rp);
            return Ok(vec![opcode, (value & 0xFF) as u8, (value >> 8) as u8]);
        }
    }

    // r8 <- r8 (includes [HL] on either side via the R table). Destination
    // occupies the middle (y) field, source the low (z) field.
    if let (Some(dst_r), Some(src_r)) = (r_index(dst), r_index(src)) {
        return Ok(vec![asm_xzy(1, src_r, dst_r)]);
    }

    // r8 <- imm8. The `110` suffix occupies the low field, the destination
    // register the middle field.
    if let Some(dst_r) = r_index(dst) {
        if matches!(src_type, OperandType::Value | OperandType::ValueIndirect) {
            let imm = operand_as_byte(instruction, 1, file, line)?;
            return Ok(vec![asm_xzy(0, 6, dst_r), imm]);
        }
    }

    Err(instruction_error(
        file,
        line,
        format!("invalid operand combination for 'LD {dst}, {src}'"),
    ))
}

/// `LDH A, [n]` / `LDH [n], A`; the address must be in `0x00..0xFF` or
/// `0xFF00..0xFFFF` (the latter rebased by subtracting `0xFF00`).
fn encode_ldh(instruction: &Instruction, file: &str, line: usize) -> Result<Vec<u8>, AssemblyError> {
    check_operand_count(instruction, &[2], file, line)?;
    let dst = &instruction.operands[0];
    let src = &instruction.operands[1];

    let (addr_operand_index, to_a) = if dst == "A" {
        (1, true)
    } else if src == "A" {
        (0, false)
    } else {
        return Err(instruction_error(file, line, "'LDH' requires 'A' as one operand"));
    };

    let raw = operand_as_word(instruction, addr_operand_index, file, line)?;
    let offset = if raw <= 0xFF {
        raw as u8
    } else if (0xFF00..=0xFFFF).contains(&raw) {
        (raw - 0xFF00) as u8
    } else {
        return Err(AssemblyError::Number {
            file: file.to_string(),
            line,
            reason: format!("'LDH' address {raw:#06X} out of range"),
        });
    };

    Ok(if to_a { vec![0xF0, offset] } else { vec![0xE0, offset] })
}

fn encode_ldi_or_ldd(instruction: &Instruction, file: &str, line: usize) -> Result<Vec<u8>, AssemblyError> {
    check_operand_count(instruction, &[2], file, line)?;
    let dst = &instruction.operands[0];
    let src = &instruction.operands[1];
    let is_ldi = instruction.mnemonic == "LDI";

    if dst == "[HL]" && src == "A" {
        return Ok(vec![if is_ldi { 0x22 } else { 0x32 }]);
    }
    if dst == "A" && src == "[HL]" {
        return Ok(vec![if is_ldi { 0x2A } else { 0x3A }]);
    }
    Err(instruction_error(
        file,
        line,
        format!("'{}' only supports 'A, [HL]' or '[HL], A'", instruction.mnemonic),
    ))
}

fn encode_push_or_pop(instruction: &Instruction, file: &str, line: usize) -> Result<Vec<u8>, AssemblyError> {
    check_operand_count(instruction, &[1], file, line)?;
    let pair = rp2_index(&instruction.operands[0]).ok_or_else(|| {
        instruction_error(file, line, format!("'{}' is not a valid register pair", instruction.operands[0]))
    })?;
    let z = if instruction.mnemonic == "PUSH" { 5 } else { 1 };
    Ok(vec![asm_xzqp(3, z, 0, pair)])
}

fn encode_ret(instruction: &Instruction, file: &str, line: usize) -> Result<Vec<u8>, AssemblyError> {
    check_operand_count(instruction, &[0, 1], file, line)?;
    if instruction.operands.is_empty() {
        return Ok(vec![asm_xzqp(3, 1, 1, 0)]);
    }
    let cc = cc_index(&instruction.operands[0]).ok_or_else(|| {
        instruction_error(file, line, format!("'{}' is not a valid condition code", instruction.operands[0]))
    })?;
    Ok(vec![asm_xzy(3, 0, cc)])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ins(mnemonic: &str, operands: &[&str]) -> Instruction {
        Instruction::new(mnemonic.to_string(), operands.iter().map(|s| s.to_string()).collect())
    }

    fn enc(mnemonic: &str, operands: &[&str]) -> Vec<u8> {
        encode_instruction(&ins(mnemonic, operands), "t", 1).unwrap()
    }

    #[test]
    fn jp_and_call_forms() {
        assert_eq!(enc("JP", &["1234"]), vec![0xC3, 0xD2, 0x04]);
        assert_eq!(enc("JP", &["Z", "1234"]), vec![0xCA, 0xD2, 0x04]);
        assert_eq!(enc("JP", &["[HL]"]), vec![0xE9]);
        assert_eq!(enc("CALL", &["1234"]), vec![0xCD, 0xD2, 0x04]);
        assert_eq!(enc("CALL", &["Z", "1234"]), vec![0xCC, 0xD2, 0x04]);
        assert_eq!(enc("RET", &[]), vec![0xC9]);
        assert_eq!(enc("RET", &["Z"]), vec![0xC8]);
        assert_eq!(enc("RETI", &[]), vec![0xD9]);
    }

    #[test]
    fn load_forms() {
        assert_eq!(enc("LD", &["A", "B"]), vec![0x78]);
        assert_eq!(enc("LD", &["B", "66"]), vec![0x06, 0x42]);
        assert_eq!(enc("LD", &["BC", "1234"]), vec![0x01, 0xD2, 0x04]);
        assert_eq!(enc("LD", &["[HL]", "A"]), vec![0x77]);
        assert_eq!(enc("LD", &["[1234]", "A"]), vec![0xEA, 0xD2, 0x04]);
        assert_eq!(enc("LD", &["A", "[1234]"]), vec![0xFA, 0xD2, 0x04]);
        assert_eq!(enc("LDH", &["[40]", "A"]), vec![0xE0, 0x28]);
        assert_eq!(enc("LDH", &["[65320]", "A"]), vec![0xE0, 0x28]);
    }

    #[test]
    fn ldi_ldd_forms() {
        assert_eq!(enc("LDI", &["[HL]", "A"]), vec![0x22]);
        assert_eq!(enc("LDI", &["A", "[HL]"]), vec![0x2A]);
        assert_eq!(enc("LDD", &["[HL]", "A"]), vec![0x32]);
        assert_eq!(enc("LDD", &["A", "[HL]"]), vec![0x3A]);
    }

    #[test]
    fn alu_forms() {
        assert_eq!(enc("ADD", &["A", "B"]), vec![0x80]);
        assert_eq!(enc("ADD", &["A", "66"]), vec![0xC6, 0x42]);
        assert_eq!(enc("ADD", &["HL", "SP"]), vec![0x39]);
        assert_eq!(enc("CP", &["[HL]"]), vec![0xBE]);
    }

    #[test]
    fn rotate_and_bit_forms() {
        assert_eq!(enc("BIT", &["1", "A"]), vec![0xCB, 0x4F]);
        assert_eq!(enc("RES", &["2", "B"]), vec![0xCB, 0x90]);
        assert_eq!(enc("SET", &["3", "[HL]"]), vec![0xCB, 0xDE]);
        assert_eq!(enc("SWAP", &["A"]), vec![0xCB, 0x37]);
    }

    #[test]
    fn stack_forms() {
        assert_eq!(enc("PUSH", &["BC"]), vec![0xC5]);
        assert_eq!(enc("PUSH", &["AF"]), vec![0xF5]);
        assert_eq!(enc("POP", &["DE"]), vec![0xD1]);
    }

    #[test]
    fn pseudo_directives() {
        assert_eq!(enc("DB", &["66", "66", "66"]), vec![0x42, 0x42, 0x42]);
        assert_eq!(enc("DW", &["1234"]), vec![0xD2, 0x04]);
        assert_eq!(enc("ASCIZ", &["\"hello\""]), vec![0x68, 0x65, 0x6C, 0x6C, 0x6F, 0x00]);
    }

    #[test]
    fn inc_dec_both_widths() {
        assert_eq!(enc("INC", &["A"]), vec![0x3C]);
        assert_eq!(enc("DEC", &["[HL]"]), vec![0x35]);
        assert_eq!(enc("INC", &["BC"]), vec![0x03]);
        assert_eq!(enc("DEC", &["SP"]), vec![0x3B]);
    }

    #[test]
    fn zero_operand_singletons() {
        assert_eq!(enc("NOP", &[]), vec![0x00]);
        assert_eq!(enc("HALT", &[]), vec![0x76]);
        assert_eq!(enc("CPL", &[]), vec![0x2F]);
        assert_eq!(enc("DI", &[]), vec![0xF3]);
        assert_eq!(enc("EI", &[]), vec![0xFB]);
    }

    #[test]
    fn unknown_mnemonic_is_an_error() {
        assert!(encode_instruction(&ins("FROB", &["A"]), "t", 1).is_err());
    }

    #[test]
    fn wrong_operand_count_is_an_error() {
        assert!(encode_instruction(&ins("NOP", &["A"]), "t", 1).is_err());
        assert!(encode_instruction(&ins("LD", &["A"]), "t", 1).is_err());
    }

    #[test]
    fn bit_index_out_of_range_is_an_error() {
        assert!(encode_instruction(&ins("BIT", &["8", "A"]), "t", 1).is_err());
    }

    #[test]
    fn calculate_size_matches_encoded_length() {
        let instruction = ins("LD", &["BC", "1234"]);
        assert_eq!(calculate_instruction_size(&instruction, "t", 1).unwrap(), 3);
    }
}
