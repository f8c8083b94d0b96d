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

//! # Boolean Expressions
//!
//! [`BooleanExpr`] is the root of every routing policy match condition. It contains the static
//! literals, the combinators ([`Conjunction`](BooleanExpr::Conjunction),
//! [`Disjunction`](BooleanExpr::Disjunction), [`Not`](BooleanExpr::Not)), the chains that call
//! named routing policies, and the leaf predicates.
//!
//! Combinators short-circuit and stop at the first result with the `exit` flag set. Chains
//! additionally skip subroutines that fall through. When a chain runs out of subroutines, it
//! calls the default policy of the environment, or returns its neutral value if there is none:
//! `true` for a conjunction chain, `false` for a disjunction chain, and a fall-through result for
//! a first-match chain.

use super::as_path::AsPathSetExpr;
use super::community::CommunitySetExpr;
use super::int_expr::IntMatchExpr;
use super::predicates::{
    MatchBgpSessionType, MatchClusterListLength, MatchInterface, MatchOspfExternalType,
    MatchProcessAsn, MatchProtocol, MatchSourceInterface, MatchSourceProtocol, MatchSourceVrf,
    MatchTag,
};
use super::{unresolved, PolicyResult};
use crate::environment::Environment;
use crate::types::{EvalError, StructureKind};
use log::*;
use serde::{Deserialize, Serialize};

/// Boolean expression of a routing policy.
///
/// Equality is structural and order-sensitive, also for the combinators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BooleanExpr {
    /// Always true
    True,
    /// Always false
    False,
    /// Negation. A result with the `exit` flag set is passed on unchanged.
    Not(Box<BooleanExpr>),
    /// Logical AND, evaluated from left to right
    Conjunction(Vec<BooleanExpr>),
    /// Logical OR, evaluated from left to right
    Disjunction(Vec<BooleanExpr>),
    /// Stops at the first subroutine that rejects
    ConjunctionChain(Vec<BooleanExpr>),
    /// Stops at the first subroutine that accepts
    DisjunctionChain(Vec<BooleanExpr>),
    /// Stops at the first subroutine that takes a decision
    FirstMatchChain(Vec<BooleanExpr>),
    /// Evaluate the named routing policy
    CallExpr(String),
    /// Protocol of the route
    MatchProtocol(MatchProtocol),
    /// Protocol from which the route was redistributed
    MatchSourceProtocol(MatchSourceProtocol),
    /// VRF from which the route was leaked
    MatchSourceVrf(MatchSourceVrf),
    /// Interface on which the route was received
    MatchSourceInterface(MatchSourceInterface),
    /// Egress interface of the next hop
    MatchInterface(MatchInterface),
    /// Process AS number (EIGRP)
    MatchProcessAsn(MatchProcessAsn),
    /// OSPF external metric type
    MatchOspfExternalType(MatchOspfExternalType),
    /// Type of the BGP session
    MatchBgpSessionType(MatchBgpSessionType),
    /// Length of the cluster list
    MatchClusterListLength(MatchClusterListLength),
    /// Tag of the route
    MatchTag(MatchTag),
    /// Metric of the route
    MatchMetric(IntMatchExpr),
    /// Communities of the route. Routes without BGP attributes never match.
    MatchCommunitySet(CommunitySetExpr),
    /// AS-path of the route. Routes without BGP attributes never match.
    MatchAsPath(AsPathSetExpr),
}

impl BooleanExpr {
    /// Evaluate the expression against the environment.
    pub fn evaluate(&self, env: &Environment<'_>) -> Result<PolicyResult, EvalError> {
        Ok(match self {
            Self::True => PolicyResult::new(true),
            Self::False => PolicyResult::new(false),
            Self::Not(e) => negate(e.evaluate(env)?),
            Self::Conjunction(conjuncts) => {
                fold_junction(conjuncts.iter().map(|c| c.evaluate(env)), false)?
            }
            Self::Disjunction(disjuncts) => {
                fold_junction(disjuncts.iter().map(|d| d.evaluate(env)), true)?
            }
            Self::ConjunctionChain(subroutines) => {
                let results = subroutines.iter().map(|s| s.evaluate(env));
                match chain_decision("conjunction", results, |r| !r.boolean_value)? {
                    Some(result) => result,
                    None => chain_exhausted(env, PolicyResult::new(true))?,
                }
            }
            Self::DisjunctionChain(subroutines) => {
                let results = subroutines.iter().map(|s| s.evaluate(env));
                match chain_decision("disjunction", results, |r| r.boolean_value)? {
                    Some(result) => result,
                    None => chain_exhausted(env, PolicyResult::new(false))?,
                }
            }
            Self::FirstMatchChain(subroutines) => {
                let results = subroutines.iter().map(|s| s.evaluate(env));
                match chain_decision("first-match", results, |_| true)? {
                    Some(result) => result,
                    None => chain_exhausted(env, PolicyResult::fall_through())?,
                }
            }
            Self::CallExpr(name) => call(env, name)?,
            Self::MatchProtocol(m) => m.evaluate(env)?.into(),
            Self::MatchSourceProtocol(m) => m.evaluate(env)?.into(),
            Self::MatchSourceVrf(m) => m.evaluate(env)?.into(),
            Self::MatchSourceInterface(m) => m.evaluate(env)?.into(),
            Self::MatchInterface(m) => m.evaluate(env)?.into(),
            Self::MatchProcessAsn(m) => m.evaluate(env)?.into(),
            Self::MatchOspfExternalType(m) => m.evaluate(env)?.into(),
            Self::MatchBgpSessionType(m) => m.evaluate(env)?.into(),
            Self::MatchClusterListLength(m) => m.evaluate(env)?.into(),
            Self::MatchTag(m) => m.evaluate(env)?.into(),
            Self::MatchMetric(m) => m.matches(env.original_route().metric as i64, env)?.into(),
            Self::MatchCommunitySet(expr) => match env.try_bgp_attributes() {
                Some(attrs) => expr.match_communities(env, &attrs.communities)?.into(),
                None => PolicyResult::new(false),
            },
            Self::MatchAsPath(expr) => match env.try_bgp_attributes() {
                Some(attrs) => expr.matches(env, &attrs.as_path)?.into(),
                None => PolicyResult::new(false),
            },
        })
    }

    /// Returns an equivalent, simplified expression. Literals are folded into the combinators,
    /// and a combinator is truncated after the first child that decides its value. Simplifying
    /// a simplified expression returns it unchanged.
    pub fn simplify(&self) -> BooleanExpr {
        let simplified = match self {
            Self::Not(e) => match e.simplify() {
                Self::True => Self::False,
                Self::False => Self::True,
                e => Self::Not(Box::new(e)),
            },
            Self::Conjunction(conjuncts) => simplify_junction(conjuncts, true),
            Self::Disjunction(disjuncts) => simplify_junction(disjuncts, false),
            Self::ConjunctionChain(subs) => Self::ConjunctionChain(simplify_all(subs)),
            Self::DisjunctionChain(subs) => Self::DisjunctionChain(simplify_all(subs)),
            Self::FirstMatchChain(subs) => Self::FirstMatchChain(simplify_all(subs)),
            e => return e.clone(),
        };
        debug!("simplified {:?} to {:?}", self, simplified);
        simplified
    }
}

fn simplify_all(exprs: &[BooleanExpr]) -> Vec<BooleanExpr> {
    exprs.iter().map(|e| e.simplify()).collect()
}

/// Simplify a conjunction (`conjunction == true`) or a disjunction. `identity` is the literal
/// that is dropped, and `absorbing` is the literal that decides the result.
fn simplify_junction(children: &[BooleanExpr], conjunction: bool) -> BooleanExpr {
    let (identity, absorbing) = if conjunction {
        (BooleanExpr::True, BooleanExpr::False)
    } else {
        (BooleanExpr::False, BooleanExpr::True)
    };
    let mut simplified: Vec<BooleanExpr> = Vec::new();
    for child in children {
        let child = child.simplify();
        if child == absorbing {
            if simplified.is_empty() {
                return absorbing;
            }
            simplified.push(child);
            break;
        } else if child != identity {
            simplified.push(child);
        }
    }
    match simplified.len() {
        0 => identity,
        1 => simplified.remove(0),
        _ if conjunction => BooleanExpr::Conjunction(simplified),
        _ => BooleanExpr::Disjunction(simplified),
    }
}

/// Invert a definite result. Results that exit are passed on unchanged.
pub(crate) fn negate(result: PolicyResult) -> PolicyResult {
    if result.exit {
        result
    } else {
        PolicyResult { boolean_value: !result.boolean_value, ..result }
    }
}

/// Fold the lazily evaluated children of a conjunction (`absorbing = false`) or a disjunction
/// (`absorbing = true`). Stops at the first child that exits or has the absorbing value.
pub(crate) fn fold_junction<I>(children: I, absorbing: bool) -> Result<PolicyResult, EvalError>
where
    I: IntoIterator<Item = Result<PolicyResult, EvalError>>,
{
    for result in children {
        let result = result?;
        if result.exit {
            return Ok(result);
        } else if result.boolean_value == absorbing {
            return Ok(result.with_return(false));
        }
    }
    Ok(PolicyResult::new(!absorbing))
}

/// First subroutine result of a chain that exits, or that does not fall through and satisfies
/// `decides`. Returns `None` if the chain is exhausted.
pub(crate) fn chain_decision<I, F>(
    kind: &str,
    subroutines: I,
    decides: F,
) -> Result<Option<PolicyResult>, EvalError>
where
    I: IntoIterator<Item = Result<PolicyResult, EvalError>>,
    F: Fn(&PolicyResult) -> bool,
{
    for (i, result) in subroutines.into_iter().enumerate() {
        let result = result?;
        if result.exit {
            return Ok(Some(result));
        } else if !result.fall_through && decides(&result) {
            debug!("{} chain decided by subroutine {}", kind, i);
            return Ok(Some(result.with_return(false)));
        }
    }
    Ok(None)
}

/// Evaluate the named routing policy. The result is never marked as returned.
fn call(env: &Environment<'_>, name: &str) -> Result<PolicyResult, EvalError> {
    let policy = unresolved(env.structures().routing_policy(name))?;
    let _guard = env.enter_call(StructureKind::RoutingPolicy, name)?;
    debug!("calling routing policy {}", name);
    Ok(policy.evaluate(env)?.with_return(false))
}

/// Result of a chain whose subroutines all passed or fell through
fn chain_exhausted(
    env: &Environment<'_>,
    neutral: PolicyResult,
) -> Result<PolicyResult, EvalError> {
    match env.default_policy() {
        Some(policy) => {
            debug!("chain exhausted, calling default policy {}", policy);
            call(env, policy)
        }
        None => Ok(neutral),
    }
}
