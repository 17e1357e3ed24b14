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

pub mod driver;
pub mod encoder;
pub mod symbol_table;

use std::collections::HashSet;
use std::path::Path;

use crate::errors::AssemblyError;
use crate::file_reader::FileReader;
use crate::rom::Rom;
use driver::Pass;
use symbol_table::SymbolTable;

/// Runs the full three-pass pipeline (discover, resolve, emit) over
/// `source_path` and its `.incasm` tree, writing code into `rom` at
/// `origin`. `rom`'s header must already be written, since encoding depends
/// only on the symbol table, not on header contents.
pub fn assemble_into_rom<F: FileReader>(
    source_path: &Path,
    origin: u16,
    final_logical_addr: u16,
    rom: &mut Rom,
    reader: &F,
) -> Result<SymbolTable, AssemblyError> {
    let mut table = SymbolTable::new();

    let mut stack = HashSet::new();
    driver::discover_labels(source_path, &mut stack, &mut table, reader)?;

    let mut cursor = origin;
    let mut stack = HashSet::new();
    let mut no_rom: Option<&mut Rom> = None;
    driver::run_pass(
        source_path,
        Pass::Resolve,
        &mut cursor,
        final_logical_addr,
        &mut table,
        &mut no_rom,
        &mut stack,
        reader,
    )?;

    let mut cursor = origin;
    let mut stack = HashSet::new();
    let mut with_rom = Some(rom);
    driver::run_pass(
        source_path,
        Pass::Emit,
        &mut cursor,
        final_logical_addr,
        &mut table,
        &mut with_rom,
        &mut stack,
        reader,
    )?;

    Ok(table)
}
