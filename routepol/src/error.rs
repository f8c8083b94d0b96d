// Routepol: Routing-Policy Expression Evaluation
// Copyright (C) 2021  Tibor Schneider
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! Module containing the main error type

use crate::types::{ConfigError, ConstructionError, EvalError};
use thiserror::Error;

/// Main error type
#[derive(Debug, Error)]
pub enum Error {
    /// Error raised while evaluating an expression
    #[error("Evaluation Error: {0}")]
    EvalError(#[from] EvalError),
    /// Error raised while building an expression
    #[error("Construction Error: {0}")]
    ConstructionError(#[from] ConstructionError),
    /// Error raised while building a configuration
    #[error("Configuration Error: {0}")]
    ConfigError(#[from] ConfigError),
    /// The JSON document could not be read or written
    #[error("JSON Error: {0}")]
    JsonError(#[from] serde_json::Error),
    /// The binary document could not be read or written
    #[error("Binary Encoding Error: {0}")]
    BinaryError(#[from] bincode2::Error),
}
