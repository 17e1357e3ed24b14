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

//! The two-pass driver: a single recursive-descent scan over a source file
//! and its `.incasm` tree, parameterised by which of three passes is
//! running. Pass behaviour differs only in what a label/`.def`/instruction
//! line does; include handling, comment state, and line classification are
//! written once.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::encoder;
use super::symbol_table::{Pass as ExprPass, SymbolTable};
use crate::errors::AssemblyError;
use crate::expr;
use crate::file_reader::FileReader;
use crate::line::{classify_line, Line};
use crate::number::parse_number;
use crate::rom::Rom;

/// Which of the two address-resolving passes is running. The label-discovery
/// pre-pass has no cursor and is handled by `discover_labels` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Resolve,
    Emit,
}

impl Pass {
    fn expr_pass(self) -> ExprPass {
        match self {
            Pass::Resolve => ExprPass::Resolve,
            Pass::Emit => ExprPass::Emit,
        }
    }
}

/// Pre-pass: recursively walks the source tree declaring every `NAME:`
/// label, without maintaining an output cursor or assembling anything.
/// Reports an include-cycle error rather than recursing unboundedly.
pub fn discover_labels<F: FileReader>(
    path: &Path,
    stack: &mut HashSet<PathBuf>,
    table: &mut SymbolTable,
    reader: &F,
) -> Result<(), AssemblyError> {
    if !stack.insert(path.to_path_buf()) {
        return Err(AssemblyError::include_cycle(path));
    }
    let file_label = path.display().to_string();
    let source = reader
        .read_to_string(path)
        .map_err(|e| AssemblyError::io(format!("reading '{file_label}': {e}")))?;

    let mut in_block_comment = false;
    for (i, raw) in source.lines().enumerate() {
        let line_no = i + 1;
        match classify_line(raw, &mut in_block_comment, &file_label, line_no)? {
            Line::Label(name) => table.declare_label(&name, &file_label, line_no)?,
            Line::Directive { name, rest } if name == "incasm" => {
                let include_path = resolve_include_path(path, &rest, &file_label, line_no)?;
                discover_labels(&include_path, stack, table, reader)?;
            }
            _ => {}
        }
    }

    stack.remove(path);
    Ok(())
}

/// Pass 1 (`Resolve`) or pass 2 (`Emit`): walks the tree again, this time
/// maintaining an output cursor. On `Emit`, encoded bytes are written into
/// `rom`; on `Resolve`, only the cursor advances (via
/// `calculate_instruction_size`) so every label's final address is known
/// before pass 2 runs.
#[allow(clippy::too_many_arguments)]
pub fn run_pass<F: FileReader>(
    path: &Path,
    pass: Pass,
    cursor: &mut u16,
    final_logical_addr: u16,
    table: &mut SymbolTable,
    rom: &mut Option<&mut Rom>,
    stack: &mut HashSet<PathBuf>,
    reader: &F,
) -> Result<(), AssemblyError> {
    if !stack.insert(path.to_path_buf()) {
        return Err(AssemblyError::include_cycle(path));
    }
    let file_label = path.display().to_string();
    let source = reader
        .read_to_string(path)
        .map_err(|e| AssemblyError::io(format!("reading '{file_label}': {e}")))?;

    let mut in_block_comment = false;
    for (i, raw) in source.lines().enumerate() {
        let line_no = i + 1;
        match classify_line(raw, &mut in_block_comment, &file_label, line_no)? {
            Line::Blank => {}

            Line::Label(name) => {
                if pass == Pass::Resolve {
                    table.assign(&name, *cursor as i32, &file_label, line_no)?;
                }
            }

            Line::Directive { name, rest } => match name.as_str() {
                "def" => {
                    if pass == Pass::Resolve {
                        let (def_name, expr_text) = split_def(&rest, &file_label, line_no)?;
                        let simplified =
                            expr::simplify(expr_text, table, ExprPass::Resolve, &file_label, line_no)?;
                        let value = parse_number(&simplified).ok_or_else(|| AssemblyError::Number {
                            file: file_label.clone(),
                            line: line_no,
                            reason: format!("'.def' value '{simplified}' is not a number"),
                        })?;
                        table.assign(def_name, value, &file_label, line_no)?;
                    }
                }
                "org" => {
                    let simplified =
                        expr::simplify(&rest, table, pass.expr_pass(), &file_label, line_no)?;
                    let value = parse_number(&simplified).ok_or_else(|| AssemblyError::Number {
                        file: file_label.clone(),
                        line: line_no,
                        reason: format!("'.org' value '{simplified}' is not a number"),
                    })?;
                    if value < 0 || value as u32 > final_logical_addr as u32 {
                        return Err(AssemblyError::Syntax {
                            file: file_label,
                            line: line_no,
                            reason: format!(
                                "'.org' address 0x{value:04X} exceeds the final address 0x{final_logical_addr:04X}"
                            ),
                        });
                    }
                    *cursor = value as u16;
                }
                "incasm" => {
                    let include_path = resolve_include_path(path, &rest, &file_label, line_no)?;
                    run_pass(&include_path, pass, cursor, final_logical_addr, table, rom, stack, reader)?;
                }
                other => {
                    return Err(AssemblyError::Syntax {
                        file: file_label,
                        line: line_no,
                        reason: format!("unknown directive '.{other}'"),
                    })
                }
            },

            Line::Instruction(mut instruction) => {
                for operand in instruction.operands.iter_mut() {
                    *operand = expr::simplify(operand, table, pass.expr_pass(), &file_label, line_no)?;
                }
                match pass {
                    Pass::Resolve => {
                        let size =
                            encoder::calculate_instruction_size(&instruction, &file_label, line_no)?;
                        advance_cursor(cursor, size, &file_label, line_no)?;
                    }
                    Pass::Emit => {
                        let bytes = encoder::encode_instruction(&instruction, &file_label, line_no)?;
                        if let Some(rom) = rom.as_mut() {
                            rom.write_bytes(*cursor, &bytes)?;
                        }
                        advance_cursor(cursor, bytes.len(), &file_label, line_no)?;
                    }
                }
            }
        }
    }

    stack.remove(path);
    Ok(())
}

fn advance_cursor(cursor: &mut u16, by: usize, file: &str, line: usize) -> Result<(), AssemblyError> {
    let next = *cursor as u32 + by as u32;
    if next > 0xFFFF {
        return Err(AssemblyError::Syntax {
            file: file.to_string(),
            line,
            reason: "output cursor overflowed 16 bits".to_string(),
        });
    }
    *cursor = next as u16;
    Ok(())
}

/// Splits a `.def` directive's remainder into the defined name and the
/// expression text that follows it.
fn split_def<'a>(rest: &'a str, file: &str, line: usize) -> Result<(&'a str, &'a str), AssemblyError> {
    match rest.split_once(char::is_whitespace) {
        Some((name, expr_text)) if !name.is_empty() && !expr_text.trim().is_empty() => {
            Ok((name, expr_text.trim()))
        }
        _ => Err(AssemblyError::Syntax {
            file: file.to_string(),
            line,
            reason: "'.def' requires a name and a value".to_string(),
        }),
    }
}

/// Resolves an `.incasm "relative/path"` argument against the including
/// file's directory. The resulting path (not a canonicalised filesystem
/// path — this driver works equally against an in-memory mock tree) is also
/// the key used for include-cycle detection.
fn resolve_include_path(
    current_file: &Path,
    rest: &str,
    file: &str,
    line: usize,
) -> Result<PathBuf, AssemblyError> {
    let rest = rest.trim();
    if rest.len() < 2 || !rest.starts_with('"') || !rest.ends_with('"') {
        return Err(AssemblyError::Syntax {
            file: file.to_string(),
            line,
            reason: "'.incasm' requires a quoted path".to_string(),
        });
    }
    let relative = &rest[1..rest.len() - 1];
    let base = current_file.parent().unwrap_or_else(|| Path::new("."));
    Ok(base.join(relative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_reader::MockFileReader;

    fn assemble(source_files: &[(&str, &str)], origin: u16, final_addr: u16) -> (SymbolTable, Vec<u8>) {
        let mut reader = MockFileReader::default();
        for (path, content) in source_files {
            reader.add_file(path, content);
        }
        let root = PathBuf::from(source_files[0].0);

        let mut table = SymbolTable::new();
        let mut stack = HashSet::new();
        discover_labels(&root, &mut stack, &mut table, &reader).unwrap();

        let mut cursor = origin;
        let mut stack = HashSet::new();
        let mut none: Option<&mut Rom> = None;
        run_pass(&root, Pass::Resolve, &mut cursor, final_addr, &mut table, &mut none, &mut stack, &reader)
            .unwrap();

        let mut rom = Rom::new();
        let mut cursor = origin;
        let mut stack = HashSet::new();
        let mut some_rom = Some(&mut rom);
        run_pass(&root, Pass::Emit, &mut cursor, final_addr, &mut table, &mut some_rom, &mut stack, &reader)
            .unwrap();

        (table, rom.into_bytes())
    }

    #[test]
    fn forward_reference_resolves_across_passes() {
        let (table, bytes) = assemble(&[("main.asm", "LD HL, later\nlater:\n")], 0x150, 0x7FFF);
        assert_eq!(&bytes[0x150..0x153], &[0x21, 0x53, 0x01]);
        assert_eq!(table.definitions().get("later"), Some(&0x0153));
    }

    #[test]
    fn incasm_recurses_into_included_file() {
        let (_, bytes) = assemble(
            &[
                ("main.asm", ".incasm \"child.asm\"\nNOP\n"),
                ("child.asm", "HALT\n"),
            ],
            0x150,
            0x7FFF,
        );
        assert_eq!(&bytes[0x150..0x152], &[0x76, 0x00]);
    }

    #[test]
    fn include_cycle_is_reported_not_a_stack_overflow() {
        let mut reader = MockFileReader::default();
        reader.add_file("a.asm", ".incasm \"b.asm\"\n");
        reader.add_file("b.asm", ".incasm \"a.asm\"\n");
        let mut table = SymbolTable::new();
        let mut stack = HashSet::new();
        let result = discover_labels(&PathBuf::from("a.asm"), &mut stack, &mut table, &reader);
        assert!(matches!(result, Err(AssemblyError::IncludeCycle { .. })));
    }

    #[test]
    fn def_directive_assigns_before_use() {
        let (table, bytes) = assemble(&[("main.asm", ".def START 0x60\nLD A, START\n")], 0x150, 0x7FFF);
        assert_eq!(table.definitions().get("START"), Some(&0x60));
        assert_eq!(&bytes[0x150..0x152], &[0x3E, 0x60]);
    }

    #[test]
    fn org_directive_moves_the_cursor() {
        let (_, bytes) = assemble(&[("main.asm", ".org 0x200\nNOP\n")], 0x150, 0x7FFF);
        assert_eq!(bytes[0x200], 0x00);
    }

    #[test]
    fn unresolved_symbol_on_emit_pass_is_an_error() {
        let mut reader = MockFileReader::default();
        reader.add_file("main.asm", "LD HL, missing\n");
        let mut table = SymbolTable::new();
        let mut stack = HashSet::new();
        discover_labels(&PathBuf::from("main.asm"), &mut stack, &mut table, &reader).unwrap();

        let mut cursor = 0x150u16;
        let mut stack = HashSet::new();
        let mut none: Option<&mut Rom> = None;
        let result = run_pass(
            &PathBuf::from("main.asm"),
            Pass::Resolve,
            &mut cursor,
            0x7FFF,
            &mut table,
            &mut none,
            &mut stack,
            &reader,
        );
        assert!(result.is_err());
    }
}
