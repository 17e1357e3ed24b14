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

//! Shared name tables for register and condition-code spellings. Used by the
//! expression evaluator (to decide what not to touch) and the operand
//! classifier (to decide what something is).

pub const REGISTERS_8: &[&str] = &["A", "B", "C", "D", "E", "F", "H", "L"];

pub const REGISTERS_16: &[&str] = &[
    "AF", "BC", "[BC]", "DE", "[DE]", "HL", "[HL]", "PC", "SP",
];

pub const CONDITION_CODES: &[&str] = &["NZ", "Z", "NC", "C", "PO", "PE", "P", "M"];

/// True if `uppercased` (already uppercased by the caller) names a register
/// or condition code. Expression evaluation and pre-processing use this to
/// pass such tokens through unchanged rather than trying to evaluate them.
pub fn is_register_or_condition_code(uppercased: &str) -> bool {
    REGISTERS_8.contains(&uppercased)
        || REGISTERS_16.contains(&uppercased)
        || CONDITION_CODES.contains(&uppercased)
}
