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

//! Real-filesystem integration tests, driving the crate through `AsmFileReader`
//! rather than the in-memory mock used by the unit tests, so the CLI/config
//! path (reading `info.toml` and a tree of real `.incasm` files off disk) gets
//! exercised too.

use std::fs;
use std::path::Path;

use gbasm::file_reader::AsmFileReader;
use gbasm::{assemble, AssembleOptions};

#[test]
fn assembles_a_cartridge_from_real_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("main.asm"), "NOP\nHALT\n").unwrap();
    fs::write(
        dir.path().join("info.toml"),
        "name = \"CARTTEST\"\nsupports_dmg = true\n",
    )
    .unwrap();

    let rom_bytes = assemble(
        &dir.path().join("main.asm"),
        &dir.path().join("info.toml"),
        &AssembleOptions::cartridge(),
        &AsmFileReader,
    )
    .unwrap();

    assert_eq!(rom_bytes.len(), gbasm::rom::ROM_SIZE);
    assert_eq!(&rom_bytes[0x150..0x152], &[0x00, 0x76]);
    assert_eq!(&rom_bytes[0x134..0x13C], b"CARTTEST");
}

#[test]
fn follows_incasm_across_real_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("main.asm"), ".incasm \"lib/sub.asm\"\nNOP\n").unwrap();
    fs::create_dir(dir.path().join("lib")).unwrap();
    fs::write(dir.path().join("lib/sub.asm"), "HALT\n").unwrap();
    fs::write(
        dir.path().join("info.toml"),
        "name = \"INC\"\nsupports_dmg = false\n",
    )
    .unwrap();

    let rom_bytes = assemble(
        &dir.path().join("main.asm"),
        &dir.path().join("info.toml"),
        &AssembleOptions::cartridge(),
        &AsmFileReader,
    )
    .unwrap();

    assert_eq!(&rom_bytes[0x150..0x152], &[0x76, 0x00]);
}

#[test]
fn missing_source_file_is_a_reported_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("info.toml"),
        "name = \"X\"\nsupports_dmg = true\n",
    )
    .unwrap();

    let result = assemble(
        Path::new("does-not-exist.asm"),
        &dir.path().join("info.toml"),
        &AssembleOptions::cartridge(),
        &AsmFileReader,
    );

    assert!(result.is_err());
}

#[test]
fn header_checksum_is_valid_on_a_real_assembled_rom() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("main.asm"), "LD HL, later\nlater:\n").unwrap();
    fs::write(
        dir.path().join("info.toml"),
        "name = \"CHK\"\nsupports_dmg = true\n",
    )
    .unwrap();

    let rom_bytes = assemble(
        &dir.path().join("main.asm"),
        &dir.path().join("info.toml"),
        &AssembleOptions::cartridge(),
        &AsmFileReader,
    )
    .unwrap();

    let sum: u8 = rom_bytes[0x134..=0x14D]
        .iter()
        .fold(0u8, |acc, &b| acc.wrapping_add(b));
    assert_eq!(sum.wrapping_add(0x19), 0);
}
