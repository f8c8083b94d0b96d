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

//! AS number expressions

use crate::bgp::{AsId, AsSet};
use crate::environment::Environment;
use crate::types::{Direction, EvalError};
use serde::{Deserialize, Serialize};

/// Expression deriving a 32 bit AS number from the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AsExpr {
    /// AS of the local end of the BGP session
    LocalAs,
    /// AS of the remote end of the BGP session
    RemoteAs,
    /// On import, the neighboring AS as seen in the AS-path (or the remote AS if the path is
    /// empty). On export, the local AS.
    AutoAs,
    /// The originating AS (last element of the AS-path)
    LastAs,
    /// Explicit AS number
    ExplicitAs(AsId),
}

impl AsExpr {
    /// Evaluate the expression.
    ///
    /// `LocalAs`, `RemoteAs` and `AutoAs` on export require BGP session properties. `AutoAs` on
    /// import and `LastAs` require the selected route to be a BGP route, and the inspected
    /// AS-set to be a singleton. `LastAs` fails on an empty AS-path, while `AutoAs` falls back to
    /// the remote AS of the session.
    pub fn evaluate(&self, env: &Environment<'_>) -> Result<AsId, EvalError> {
        match self {
            Self::LocalAs => Ok(env.require_session_properties()?.head_as),
            Self::RemoteAs => Ok(env.require_session_properties()?.tail_as),
            Self::AutoAs => match env.direction() {
                Direction::In => {
                    let attrs = env.bgp_attributes()?;
                    match attrs.as_path.first() {
                        Some(set) => singleton(set),
                        None => Ok(env.require_session_properties()?.remote_as()),
                    }
                }
                Direction::Out => Ok(env.require_session_properties()?.local_as()),
            },
            Self::LastAs => {
                let attrs = env.bgp_attributes()?;
                match attrs.as_path.last() {
                    Some(set) => singleton(set),
                    None => Err(EvalError::EmptyAsPath),
                }
            }
            Self::ExplicitAs(as_id) => Ok(*as_id),
        }
    }
}

fn singleton(set: &AsSet) -> Result<AsId, EvalError> {
    set.singleton().ok_or_else(|| EvalError::NonSingletonAsSet(set.to_string()))
}
