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

//! The four fixed lookup tables from the LR35902 instruction matrix, plus the
//! two mnemonic tables (`ALU`, `ROT`) used to pick the `y`/`yyy` field.

/// 8-bit register + `[HL]` -> 0..7.
pub fn r_index(name: &str) -> Option<u8> {
    Some(match name {
        "B" => 0,
        "C" => 1,
        "D" => 2,
        "E" => 3,
        "H" => 4,
        "L" => 5,
        "[HL]" => 6,
        "A" => 7,
        _ => return None,
    })
}

/// 16-bit register pair -> 0..3, with `SP` as the fourth member.
pub fn rp_index(name: &str) -> Option<u8> {
    Some(match name {
        "BC" => 0,
        "DE" => 1,
        "HL" => 2,
        "SP" => 3,
        _ => return None,
    })
}

/// Alternate 16-bit pairing used by `PUSH`/`POP`, with `AF` replacing `SP`.
pub fn rp2_index(name: &str) -> Option<u8> {
    Some(match name {
        "BC" => 0,
        "DE" => 1,
        "HL" => 2,
        "AF" => 3,
        _ => return None,
    })
}

/// Condition code -> 0..7.
pub fn cc_index(name: &str) -> Option<u8> {
    Some(match name {
        "NZ" => 0,
        "Z" => 1,
        "NC" => 2,
        "C" => 3,
        "PO" => 4,
        "PE" => 5,
        "P" => 6,
        "M" => 7,
        _ => return None,
    })
}

/// ALU mnemonic -> `yyy` field (0..7).
pub fn alu_index(mnemonic: &str) -> Option<u8> {
    Some(match mnemonic {
        "ADD" => 0,
        "ADC" => 1,
        "SUB" => 2,
        "SBC" => 3,
        "AND" => 4,
        "XOR" => 5,
        "OR" => 6,
        "CP" => 7,
        _ => return None,
    })
}

/// CB-prefixed rotate/shift mnemonic -> `yyy` field (0..7).
pub fn rot_index(mnemonic: &str) -> Option<u8> {
    Some(match mnemonic {
        "RLC" => 0,
        "RRC" => 1,
        "RL" => 2,
        "RR" => 3,
        "SLA" => 4,
        "SRA" => 5,
        "SWAP" => 6,
        "SRL" => 7,
        _ => return None,
    })
}
