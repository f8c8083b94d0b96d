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

//! # Community List
//!
//! Ordered permit/deny lines over community set expressions. Every query scans the lines in
//! order and stops at the first line whose expression satisfies it; the action of that line
//! decides. If no line matches, the list does not match.

use super::community::CommunitySetExpr;
use crate::bgp::Community;
use crate::environment::Environment;
use crate::types::{EvalError, LineAction};
use log::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Single line of a [`CommunityList`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommunityListLine {
    /// Action taken when the line matches
    pub action: LineAction,
    /// Condition of the line
    pub match_condition: CommunitySetExpr,
}

/// Named, ordered list of community lines.
///
/// With `invert_match`, both the decision of the matching line and the default of an exhausted
/// scan are negated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommunityList {
    lines: Vec<CommunityListLine>,
    invert_match: bool,
}

impl CommunityList {
    /// Create a new list from its lines, in order.
    pub fn new(lines: Vec<(LineAction, CommunitySetExpr)>) -> Self {
        Self {
            lines: lines
                .into_iter()
                .map(|(action, match_condition)| CommunityListLine { action, match_condition })
                .collect(),
            invert_match: false,
        }
    }

    /// Set the list-level negation
    pub fn with_invert_match(mut self, invert_match: bool) -> Self {
        self.invert_match = invert_match;
        self
    }

    /// Lines of the list
    pub fn lines(&self) -> &[CommunityListLine] {
        &self.lines
    }

    /// Returns `true` if the list is negated.
    pub fn invert_match(&self) -> bool {
        self.invert_match
    }

    fn first_match<F>(&self, mut matches: F) -> Result<bool, EvalError>
    where
        F: FnMut(&CommunitySetExpr) -> Result<bool, EvalError>,
    {
        for (i, line) in self.lines.iter().enumerate() {
            if matches(&line.match_condition)? {
                trace!("community-list line {} matches: {}", i, line.action);
                return Ok(line.action.is_permit() != self.invert_match);
            }
        }
        trace!("community-list exhausted");
        Ok(self.invert_match)
    }

    /// Returns `true` if the first line matching `community` permits it.
    pub fn match_community(
        &self,
        env: &Environment<'_>,
        community: &Community,
    ) -> Result<bool, EvalError> {
        self.first_match(|e| e.match_community(env, community))
    }

    /// Returns `true` if the first line whose required communities are all present in
    /// `communities` is a permit line.
    pub fn match_communities(
        &self,
        env: &Environment<'_>,
        communities: &BTreeSet<Community>,
    ) -> Result<bool, EvalError> {
        self.first_match(|e| e.match_communities(env, communities))
    }

    /// Returns `true` if the first line matching any of `communities` is a permit line.
    pub fn match_any_community(
        &self,
        env: &Environment<'_>,
        communities: &BTreeSet<Community>,
    ) -> Result<bool, EvalError> {
        self.first_match(|e| e.match_any_community(env, communities))
    }

    /// Returns the communities that are individually permitted by the list.
    pub fn matched_communities(
        &self,
        env: &Environment<'_>,
        communities: &BTreeSet<Community>,
    ) -> Result<BTreeSet<Community>, EvalError> {
        let mut matched = BTreeSet::new();
        for c in communities {
            if self.match_community(env, c)? {
                matched.insert(*c);
            }
        }
        Ok(matched)
    }

    /// Union of the literal communities of all permit lines. Every line must be reducible,
    /// including deny lines, and an inverted list is never reducible.
    pub fn as_literal_communities(
        &self,
        env: &Environment<'_>,
    ) -> Result<BTreeSet<Community>, EvalError> {
        if self.invert_match {
            return Err(EvalError::NotReducible("inverted CommunityList"));
        }
        let mut result = BTreeSet::new();
        for line in self.lines.iter() {
            let communities = line.match_condition.as_literal_communities(env)?;
            if line.action.is_permit() {
                result.extend(communities);
            }
        }
        Ok(result)
    }
}
