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

//! # Routing Policy Expressions
//!
//! This module contains the vendor independent intermediate representation of routing policy
//! expressions. Every category of expression is a closed enum, evaluated by a single match:
//!
//! - [`BooleanExpr`]: combinators, chains and leaf predicates, evaluating to a [`PolicyResult`].
//! - [`AsExpr`], [`IntExpr`], [`LongExpr`], [`IntMatchExpr`]: scalar values and comparisons.
//! - [`AdministrativeCostExpr`] and the local-preference / metric modifiers.
//! - [`NextHopExpr`]: next hop values.
//! - [`CommunitySetExpr`] and [`CommunityList`]: community matching and extraction.
//! - [`AsPathSetExpr`] and [`AsPathAccessList`]: AS-path regex matching.
//!
//! Expressions are immutable, and all per-evaluation state lives in the
//! [`Environment`](crate::Environment). The same expression tree can therefore be shared between
//! threads and evaluated against many routes concurrently.

mod as_expr;
mod as_path;
mod boolean;
mod community;
mod community_list;
mod int_expr;
mod modifiers;
mod next_hop;
mod predicates;

pub use as_expr::AsExpr;
pub use as_path::{AsPathAccessList, AsPathAccessListLine, AsPathSetExpr, RegexAsPathSetElem};
pub use boolean::BooleanExpr;
#[cfg(test)]
pub(crate) use boolean::{chain_decision, fold_junction, negate};
pub use community::{CommunityHalf, CommunityHalvesExpr, CommunitySetExpr};
pub use community_list::{CommunityList, CommunityListLine};
pub use int_expr::{IntComparator, IntExpr, IntMatchExpr, LongExpr};
pub use modifiers::{
    AdministrativeCostExpr, DecrementAdministrativeCost, DecrementLocalPreference,
    DecrementMetric, IncrementAdministrativeCost, IncrementLocalPreference, IncrementMetric,
    LiteralAdministrativeCost,
};
pub use next_hop::NextHopExpr;
pub use predicates::{
    BgpSessionMatchType, MatchBgpSessionType, MatchClusterListLength, MatchInterface,
    MatchOspfExternalType, MatchProcessAsn, MatchProtocol, MatchSourceInterface,
    MatchSourceProtocol, MatchSourceVrf, MatchTag,
};

use crate::types::EvalError;
use log::*;

/// Outcome of evaluating a [`BooleanExpr`].
///
/// Boolean combinators and leaf predicates always produce a definite result. Chains and named
/// routing policies set `fall_through` and `returned`. No expression node sets `exit`. It is
/// produced by statement engines built on top of the expressions
/// ([`PolicyResult::exit_with`]), and every combinator passes such a result on unchanged.
/// - `exit`: the policy took a final decision, and enclosing expressions must stop.
/// - `fall_through`: the policy did not decide, and a chain should continue with its next
///   subroutine.
/// - `returned`: the policy returned explicitly. Cleared when leaving a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PolicyResult {
    /// Boolean value of the result
    pub boolean_value: bool,
    /// Evaluation must stop
    pub exit: bool,
    /// No decision was taken
    pub fall_through: bool,
    /// The policy returned explicitly
    pub returned: bool,
}

impl PolicyResult {
    /// Definite result
    pub fn new(boolean_value: bool) -> Self {
        Self { boolean_value, ..Default::default() }
    }

    /// Final decision, which stops every enclosing expression
    pub fn exit_with(boolean_value: bool) -> Self {
        Self { boolean_value, exit: true, ..Default::default() }
    }

    /// Result that took no decision
    pub fn fall_through() -> Self {
        Self { fall_through: true, ..Default::default() }
    }

    /// Boolean value of the result
    pub fn value(&self) -> bool {
        self.boolean_value
    }

    /// Copy of self with the `returned` flag set to the given value
    pub fn with_return(self, returned: bool) -> Self {
        Self { returned, ..self }
    }
}

impl From<bool> for PolicyResult {
    fn from(b: bool) -> Self {
        Self::new(b)
    }
}

/// Log a failed lookup of a named structure before it is propagated
pub(crate) fn unresolved<T>(result: Result<T, EvalError>) -> Result<T, EvalError> {
    if let Err(e) = &result {
        warn!("{}", e);
    }
    result
}
