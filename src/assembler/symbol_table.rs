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

use crate::errors::AssemblyError;
use std::collections::{HashMap, HashSet};

/// Which pass expression evaluation is running under. On `Resolve`, a
/// declared-but-unassigned label substitutes 0 so cursor arithmetic is
/// stable; on `Emit` every referenced symbol must already be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Resolve,
    Emit,
}

/// Process-wide mapping from label/constant name to value, plus the set of
/// names declared (as labels) but not yet address-assigned. A name is never
/// inserted into `definitions` twice, and by the time the `Emit` pass runs
/// every name ever placed in `unpointed` must have been promoted into
/// `definitions`.
#[derive(Debug, Default)]
pub struct SymbolTable {
    definitions: HashMap<String, i32>,
    unpointed: HashSet<String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pass 0: record that a label with this name exists, without yet
    /// knowing its address.
    pub fn declare_label(
        &mut self,
        name: &str,
        file: &str,
        line: usize,
    ) -> Result<(), AssemblyError> {
        if self.definitions.contains_key(name) || self.unpointed.contains(name) {
            return Err(AssemblyError::Symbol {
                file: file.to_string(),
                line,
                reason: format!("duplicate label or constant '{name}'"),
            });
        }
        self.unpointed.insert(name.to_string());
        Ok(())
    }

    /// Assigns a value to `name`, failing if it is already defined.
    pub fn assign(
        &mut self,
        name: &str,
        value: i32,
        file: &str,
        line: usize,
    ) -> Result<(), AssemblyError> {
        if self.definitions.contains_key(name) {
            return Err(AssemblyError::Symbol {
                file: file.to_string(),
                line,
                reason: format!("duplicate label or constant '{name}'"),
            });
        }
        self.unpointed.remove(name);
        self.definitions.insert(name.to_string(), value);
        Ok(())
    }

    /// Looks up `name`. On `Pass::Resolve`, a declared-but-unassigned label
    /// resolves to 0; on `Pass::Emit`, only `definitions` is consulted and a
    /// miss means the caller should report an unresolved-symbol error.
    pub fn lookup(&self, name: &str, pass: Pass) -> Option<i32> {
        if let Some(value) = self.definitions.get(name) {
            return Some(*value);
        }
        if pass == Pass::Resolve && self.unpointed.contains(name) {
            return Some(0);
        }
        None
    }

    pub fn definitions(&self) -> &HashMap<String, i32> {
        &self.definitions
    }
}
