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

pub mod assembler;
pub mod config;
pub mod errors;
pub mod expr;
pub mod file_reader;
pub mod instruction;
pub mod line;
pub mod number;
pub mod operand;
pub mod registers;
pub mod rom;

use std::path::Path;

use anyhow::{Context, Result};

use file_reader::FileReader;
use rom::{Rom, HEADER_END};

/// The two shapes a ROM can be assembled as: a normal cartridge (header
/// stamped, code starting at `0x0150`) or a boot ROM (no header, code
/// starting at `0x0000`, confined below the switchable-bank boundary).
#[derive(Debug, Clone, Copy)]
pub struct AssembleOptions {
    pub origin: u16,
    pub final_logical_addr: u16,
    pub with_header: bool,
}

impl AssembleOptions {
    pub fn cartridge() -> Self {
        Self {
            origin: HEADER_END as u16,
            final_logical_addr: 0x7FFF,
            with_header: true,
        }
    }

    pub fn boot() -> Self {
        Self {
            origin: 0x0000,
            final_logical_addr: 0x3FFF,
            with_header: false,
        }
    }
}

/// Assembles `source_path` (and its `.incasm` tree) into a 32 KiB ROM image.
/// When `options.with_header` is set, `info_path` is read via `reader` to
/// populate the cartridge header before any code is assembled.
pub fn assemble<F: FileReader>(
    source_path: &Path,
    info_path: &Path,
    options: &AssembleOptions,
    reader: &F,
) -> Result<Vec<u8>> {
    let mut rom = Rom::new();

    if options.with_header {
        let info = config::load_rom_info(info_path, reader)
            .context("Failed to load ROM configuration")?;
        rom.write_header(&info).context("Failed to write ROM header")?;
    }

    assembler::assemble_into_rom(
        source_path,
        options.origin,
        options.final_logical_addr,
        &mut rom,
        reader,
    )
    .context("Failed during assembly")?;

    rom.finalize();
    Ok(rom.into_bytes())
}
