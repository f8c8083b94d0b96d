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

//! # Codec
//!
//! Persistence of the IR and of configurations. Everything that derives `Serialize` and
//! `Deserialize` can be written as JSON (for caching parsed configurations) or in a compact
//! binary form (for shipping expressions to other workers). Both formats reproduce an equal
//! object, and validated nodes are checked again while they are read.
//!
//! ```
//! use routepol::codec;
//! use routepol::expr::BooleanExpr;
//!
//! fn main() -> Result<(), routepol::Error> {
//!     let expr = BooleanExpr::Not(Box::new(BooleanExpr::True));
//!     let json = codec::to_json(&expr)?;
//!     assert_eq!(codec::from_json::<BooleanExpr>(&json)?, expr);
//!     let bytes = codec::to_bytes(&expr)?;
//!     assert_eq!(codec::from_bytes::<BooleanExpr>(&bytes)?, expr);
//!     Ok(())
//! }
//! ```

use crate::Error;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Write `value` as pretty printed JSON
pub fn to_json<T: Serialize>(value: &T) -> Result<String, Error> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Read a value from JSON
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, Error> {
    Ok(serde_json::from_str(json)?)
}

/// Write `value` in the binary format
pub fn to_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, Error> {
    Ok(bincode2::serialize(value)?)
}

/// Read a value from the binary format
pub fn from_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, Error> {
    Ok(bincode2::deserialize(bytes)?)
}
