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

//! Loads `info.toml` (the ROM name and DMG-compatibility flag) from the
//! working directory before assembly starts.

use std::path::Path;

use serde::Deserialize;

use crate::errors::AssemblyError;
use crate::file_reader::FileReader;

#[derive(Debug, Clone, Deserialize)]
pub struct RomInfo {
    pub name: String,
    pub supports_dmg: bool,
}

const MAX_NAME_LEN: usize = 15;

/// Reads and validates `path` (typically `info.toml`). A missing file,
/// unreadable file, malformed TOML, or an over-length name are all reported
/// as an `AssemblyError` rather than panicking.
pub fn load_rom_info<F: FileReader>(path: &Path, reader: &F) -> Result<RomInfo, AssemblyError> {
    let file_label = path.display().to_string();
    let text = reader
        .read_to_string(path)
        .map_err(|e| AssemblyError::io(format!("reading '{file_label}': {e}")))?;

    let info: RomInfo = toml::from_str(&text)
        .map_err(|e| AssemblyError::io(format!("parsing '{file_label}': {e}")))?;

    if info.name.len() > MAX_NAME_LEN {
        return Err(AssemblyError::Syntax {
            file: file_label,
            line: 0,
            reason: format!(
                "rom name '{}' is {} bytes, exceeding the {MAX_NAME_LEN}-byte limit",
                info.name,
                info.name.len()
            ),
        });
    }

    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_reader::MockFileReader;
    use std::path::PathBuf;

    #[test]
    fn loads_valid_config() {
        let mut reader = MockFileReader::default();
        reader.add_file("info.toml", "name = \"GAME\"\nsupports_dmg = true\n");
        let info = load_rom_info(&PathBuf::from("info.toml"), &reader).unwrap();
        assert_eq!(info.name, "GAME");
        assert!(info.supports_dmg);
    }

    #[test]
    fn rejects_overlong_name() {
        let mut reader = MockFileReader::default();
        reader.add_file(
            "info.toml",
            "name = \"WAY TOO LONG NAME\"\nsupports_dmg = false\n",
        );
        assert!(load_rom_info(&PathBuf::from("info.toml"), &reader).is_err());
    }

    #[test]
    fn rejects_malformed_toml() {
        let mut reader = MockFileReader::default();
        reader.add_file("info.toml", "not valid toml {{{");
        assert!(load_rom_info(&PathBuf::from("info.toml"), &reader).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let reader = MockFileReader::default();
        assert!(load_rom_info(&PathBuf::from("info.toml"), &reader).is_err());
    }
}
