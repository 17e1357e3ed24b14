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

use thiserror::Error;

/// A single diagnostic emitted by the assembler. Every fatal condition in the
/// core is constructed as one of these and propagated with `?` rather than
/// panicking; `main` is the only place that turns one into a process exit.
#[derive(Error, Debug, PartialEq)]
pub enum AssemblyError {
    #[error("{file}:{line}: syntax error: {reason}")]
    Syntax {
        file: String,
        line: usize,
        reason: String,
    },

    #[error("{file}:{line}: symbol error: {reason}")]
    Symbol {
        file: String,
        line: usize,
        reason: String,
    },

    #[error("{file}:{line}: expression error: {reason}")]
    Expression {
        file: String,
        line: usize,
        reason: String,
    },

    #[error("{file}:{line}: number error: {reason}")]
    Number {
        file: String,
        line: usize,
        reason: String,
    },

    #[error("{file}:{line}: instruction error: {reason}")]
    Instruction {
        file: String,
        line: usize,
        reason: String,
    },

    #[error("I/O error: {reason}")]
    Io { reason: String },

    #[error("include cycle detected: {path} is already being assembled")]
    IncludeCycle { path: String },
}

impl AssemblyError {
    pub fn io(reason: impl Into<String>) -> Self {
        AssemblyError::Io {
            reason: reason.into(),
        }
    }

    pub fn include_cycle(path: &std::path::Path) -> Self {
        AssemblyError::IncludeCycle {
            path: path.display().to_string(),
        }
    }
}
