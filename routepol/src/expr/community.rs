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

//! # Community Set Expressions
//!
//! A [`CommunitySetExpr`] is both a predicate over communities and, when it is *reducible*, a
//! finite set of literal communities. Every expression supports four queries against a route's
//! communities:
//!
//! - [`match_community`](CommunitySetExpr::match_community): does a single community satisfy it,
//! - [`match_communities`](CommunitySetExpr::match_communities): are the required communities all
//!   present in the candidate set,
//! - [`match_any_community`](CommunitySetExpr::match_any_community): does at least one candidate
//!   satisfy it individually,
//! - [`matched_communities`](CommunitySetExpr::matched_communities): which candidates satisfy it.
//!
//! [`as_literal_communities`](CommunitySetExpr::as_literal_communities) enumerates the expression,
//! and fails with [`EvalError::NotReducible`] for regexes, ranges and conjunctions.

use super::community_list::CommunityList;
use super::unresolved;
use crate::bgp::Community;
use crate::environment::Environment;
use crate::types::{EvalError, PolicyRegex, StructureKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Matcher for one 16 bit half of a standard community
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommunityHalf {
    /// Exactly this value
    LiteralCommunityHalf(u16),
    /// Any value in the inclusive range `[lo, hi]`
    RangeCommunityHalf(u16, u16),
}

impl CommunityHalf {
    /// Returns `true` if `value` is matched.
    pub fn matches(&self, value: u16) -> bool {
        match self {
            Self::LiteralCommunityHalf(n) => *n == value,
            Self::RangeCommunityHalf(lo, hi) => (*lo..=*hi).contains(&value),
        }
    }
}

/// Matcher composed of one matcher for the high half and one for the low half of a standard
/// community. Large communities are never matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommunityHalvesExpr {
    /// Matcher for the upper 16 bits
    pub high: CommunityHalf,
    /// Matcher for the lower 16 bits
    pub low: CommunityHalf,
}

impl CommunityHalvesExpr {
    /// Create a new matcher
    pub fn new(high: CommunityHalf, low: CommunityHalf) -> Self {
        Self { high, low }
    }

    /// Returns `true` if both halves of `community` are matched.
    pub fn matches(&self, community: &Community) -> bool {
        match community.as_standard() {
            Some(c) => self.high.matches(c.high()) && self.low.matches(c.low()),
            None => false,
        }
    }
}

/// Community set expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommunitySetExpr {
    /// A single community
    LiteralCommunity(Community),
    /// A disjunctive set of communities
    LiteralCommunitySet(BTreeSet<Community>),
    /// All of the communities must be present at once
    LiteralCommunityConjunction(BTreeSet<Community>),
    /// No community
    EmptyCommunitySet,
    /// Communities whose canonical string form matches the regex
    RegexCommunitySet(PolicyRegex),
    /// Reference to a community-list of the configuration
    NamedCommunitySet(String),
    /// Standard communities whose halves are matched
    CommunityHalves(CommunityHalvesExpr),
    /// Raw 32 bit standard communities
    InlineCommunitySet(Vec<u32>),
}

impl CommunitySetExpr {
    /// Returns `true` if `community` on its own satisfies the expression.
    pub fn match_community(
        &self,
        env: &Environment<'_>,
        community: &Community,
    ) -> Result<bool, EvalError> {
        Ok(match self {
            Self::LiteralCommunity(c) => c == community,
            Self::LiteralCommunitySet(set) => set.contains(community),
            Self::LiteralCommunityConjunction(set) => set.len() == 1 && set.contains(community),
            Self::EmptyCommunitySet => false,
            Self::RegexCommunitySet(regex) => regex.is_match(&community.to_string()),
            Self::NamedCommunitySet(name) => {
                return with_named(env, name, |list| list.match_community(env, community))
            }
            Self::CommunityHalves(halves) => halves.matches(community),
            Self::InlineCommunitySet(values) => {
                values.iter().any(|v| Community::standard(*v) == *community)
            }
        })
    }

    /// Returns `true` if the communities required by the expression are all present in
    /// `communities`. Predicates (regexes, ranges) require at least one matching community.
    pub fn match_communities(
        &self,
        env: &Environment<'_>,
        communities: &BTreeSet<Community>,
    ) -> Result<bool, EvalError> {
        Ok(match self {
            Self::LiteralCommunity(c) => communities.contains(c),
            Self::LiteralCommunitySet(set) | Self::LiteralCommunityConjunction(set) => {
                set.is_subset(communities)
            }
            Self::EmptyCommunitySet => false,
            Self::NamedCommunitySet(name) => {
                return with_named(env, name, |list| list.match_communities(env, communities))
            }
            Self::InlineCommunitySet(values) => {
                values.iter().all(|v| communities.contains(&Community::standard(*v)))
            }
            Self::RegexCommunitySet(_) | Self::CommunityHalves(_) => {
                return self.match_any_community(env, communities)
            }
        })
    }

    /// Returns `true` if at least one community in `communities` satisfies the expression on its
    /// own.
    pub fn match_any_community(
        &self,
        env: &Environment<'_>,
        communities: &BTreeSet<Community>,
    ) -> Result<bool, EvalError> {
        if let Self::NamedCommunitySet(name) = self {
            return with_named(env, name, |list| list.match_any_community(env, communities));
        }
        for c in communities {
            if self.match_community(env, c)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Returns the subset of `communities` that satisfies the expression. For a conjunction,
    /// this is the whole conjunction if it is present, or nothing otherwise.
    pub fn matched_communities(
        &self,
        env: &Environment<'_>,
        communities: &BTreeSet<Community>,
    ) -> Result<BTreeSet<Community>, EvalError> {
        match self {
            Self::LiteralCommunityConjunction(set) => {
                if !set.is_empty() && set.is_subset(communities) {
                    Ok(set.clone())
                } else {
                    Ok(BTreeSet::new())
                }
            }
            Self::NamedCommunitySet(name) => {
                with_named(env, name, |list| list.matched_communities(env, communities))
            }
            _ => {
                let mut matched = BTreeSet::new();
                for c in communities {
                    if self.match_community(env, c)? {
                        matched.insert(*c);
                    }
                }
                Ok(matched)
            }
        }
    }

    /// Enumerate the communities denoted by the expression. Fails with
    /// [`EvalError::NotReducible`] if the expression is a predicate or a conjunction.
    pub fn as_literal_communities(
        &self,
        env: &Environment<'_>,
    ) -> Result<BTreeSet<Community>, EvalError> {
        match self {
            Self::LiteralCommunity(c) => Ok(std::iter::once(*c).collect()),
            Self::LiteralCommunitySet(set) => Ok(set.clone()),
            Self::EmptyCommunitySet => Ok(BTreeSet::new()),
            Self::InlineCommunitySet(values) => {
                Ok(values.iter().map(|v| Community::standard(*v)).collect())
            }
            Self::NamedCommunitySet(name) => {
                with_named(env, name, |list| list.as_literal_communities(env))
            }
            Self::LiteralCommunityConjunction(_)
            | Self::RegexCommunitySet(_)
            | Self::CommunityHalves(_) => Err(EvalError::NotReducible(self.kind())),
        }
    }

    /// Returns `true` if matching a single community depends on more than set membership, i.e.,
    /// on a regex, a range, or a referenced list.
    pub fn dynamic_match_community(&self) -> bool {
        matches!(
            self,
            Self::RegexCommunitySet(_) | Self::CommunityHalves(_) | Self::NamedCommunitySet(_)
        )
    }

    /// Returns `true` if [`CommunitySetExpr::as_literal_communities`] is guaranteed to succeed.
    /// Named sets return `false`, since they depend on the referenced list.
    pub fn reducible(&self) -> bool {
        matches!(
            self,
            Self::LiteralCommunity(_)
                | Self::LiteralCommunitySet(_)
                | Self::EmptyCommunitySet
                | Self::InlineCommunitySet(_)
        )
    }

    /// Name of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LiteralCommunity(_) => "LiteralCommunity",
            Self::LiteralCommunitySet(_) => "LiteralCommunitySet",
            Self::LiteralCommunityConjunction(_) => "LiteralCommunityConjunction",
            Self::EmptyCommunitySet => "EmptyCommunitySet",
            Self::RegexCommunitySet(_) => "RegexCommunitySet",
            Self::NamedCommunitySet(_) => "NamedCommunitySet",
            Self::CommunityHalves(_) => "CommunityHalves",
            Self::InlineCommunitySet(_) => "InlineCommunitySet",
        }
    }
}

/// Resolve the community-list `name` and run `f` on it, guarding against lists that reference
/// themselves.
fn with_named<'a, T>(
    env: &Environment<'a>,
    name: &str,
    f: impl FnOnce(&'a CommunityList) -> Result<T, EvalError>,
) -> Result<T, EvalError> {
    let list = unresolved(env.structures().community_list(name))?;
    let _guard = env.enter_call(StructureKind::CommunityList, name)?;
    f(list)
}
