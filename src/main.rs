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

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use gbasm::file_reader::AsmFileReader;
use gbasm::AssembleOptions;

#[derive(Parser)]
#[clap(version, author = "Connor Nolan")]
struct Opts {
    /// Source file to assemble.
    #[clap(short, long)]
    input: PathBuf,

    /// Where to write the assembled ROM.
    #[clap(short, long, default_value = "out.gb")]
    output: PathBuf,

    /// Configuration file providing the ROM name and DMG-compatibility flag.
    /// Ignored in `boot` mode.
    #[clap(short, long, default_value = "info.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble as a boot ROM: no cartridge header, code starts at 0x0000,
    /// confined to the fixed 0x0000-0x3FFF address range.
    Boot,
}

fn main() -> ExitCode {
    let opts = Opts::parse();
    let options = match &opts.command {
        Some(Commands::Boot) => AssembleOptions::boot(),
        None => AssembleOptions::cartridge(),
    };

    let reader = AsmFileReader;
    eprintln!("Assembling {}...", opts.input.display());

    let rom_bytes = match gbasm::assemble(&opts.input, &opts.config, &options, &reader) {
        Ok(rom_bytes) => rom_bytes,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = fs::write(&opts.output, rom_bytes) {
        eprintln!("error: failed to write '{}': {err}", opts.output.display());
        return ExitCode::FAILURE;
    }

    println!(
        "Successfully assembled {} to {}",
        opts.input.display(),
        opts.output.display()
    );
    ExitCode::SUCCESS
}
