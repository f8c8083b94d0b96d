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

//! # AS-Path Set Expressions
//!
//! AS-paths are matched by rendering them as the space-separated sequence of their AS numbers
//! (see [`AsPath`]'s `Display`) and searching that string with a regex. The search is not
//! anchored: `"13$"` matches both `"11 12 13"` and `"13 113"`, while `" 13$"` only matches the
//! former.

use super::unresolved;
use crate::bgp::AsPath;
use crate::environment::Environment;
use crate::types::{EvalError, LineAction, PolicyRegex};
use log::*;
use serde::{Deserialize, Serialize};

/// Regex over the string rendering of an AS-path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegexAsPathSetElem(pub PolicyRegex);

impl RegexAsPathSetElem {
    /// Returns `true` if the regex matches anywhere in the rendered path.
    pub fn matches(&self, path: &str) -> bool {
        self.0.is_match(path)
    }
}

/// AS-path set expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AsPathSetExpr {
    /// Matches if any of the regexes matches
    ExplicitAsPathSet(Vec<RegexAsPathSetElem>),
    /// Reference to an AS-path access-list of the configuration
    NamedAsPathSet(String),
}

impl AsPathSetExpr {
    /// Returns `true` if `as_path` is in the set.
    pub fn matches(&self, env: &Environment<'_>, as_path: &AsPath) -> Result<bool, EvalError> {
        let rendered = as_path.to_string();
        match self {
            Self::ExplicitAsPathSet(elems) => Ok(elems.iter().any(|e| e.matches(&rendered))),
            Self::NamedAsPathSet(name) => {
                let list = unresolved(env.structures().as_path_access_list(name))?;
                Ok(list.matches(&rendered))
            }
        }
    }
}

/// Single line of an [`AsPathAccessList`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AsPathAccessListLine {
    /// Action taken when the regex matches
    pub action: LineAction,
    /// Regex over the rendered AS-path
    pub regex: PolicyRegex,
}

/// Ordered list of permit/deny regex lines. The first matching line decides; an exhausted
/// list does not match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AsPathAccessList {
    lines: Vec<AsPathAccessListLine>,
}

impl AsPathAccessList {
    /// Create a new list from its lines, in order.
    pub fn new(lines: Vec<(LineAction, PolicyRegex)>) -> Self {
        Self {
            lines: lines
                .into_iter()
                .map(|(action, regex)| AsPathAccessListLine { action, regex })
                .collect(),
        }
    }

    /// Lines of the list
    pub fn lines(&self) -> &[AsPathAccessListLine] {
        &self.lines
    }

    /// Returns `true` if the first line matching the rendered AS-path is a permit line.
    pub fn matches(&self, path: &str) -> bool {
        for (i, line) in self.lines.iter().enumerate() {
            if line.regex.is_match(path) {
                trace!("as-path access-list line {} matches {:?}: {}", i, path, line.action);
                return line.action.is_permit();
            }
        }
        false
    }
}
