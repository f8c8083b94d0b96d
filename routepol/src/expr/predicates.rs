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

//! # Leaf Predicates
//!
//! Each predicate reads a few fields of the original route, the BGP session or the environment,
//! and never changes them. Fields that are absent on the route never match; only the BGP session
//! predicates fail if the environment lacks what they need.

use super::int_expr::{IntComparator, IntExpr, LongExpr};
use crate::bgp::SessionType;
use crate::environment::Environment;
use crate::types::{ConstructionError, EvalError, OspfMetricType, RoutingProtocol};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::convert::TryFrom;

/// Matches if the protocol of the route is one of the given protocols. Compound protocols match
/// each of their members, but not a route tagged with the compound protocol itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchProtocol {
    /// Accepted protocols
    pub protocols: BTreeSet<RoutingProtocol>,
}

impl MatchProtocol {
    /// Create a new matcher
    pub fn new(protocols: impl IntoIterator<Item = RoutingProtocol>) -> Self {
        Self { protocols: protocols.into_iter().collect() }
    }

    /// Evaluate the predicate
    pub fn evaluate(&self, env: &Environment<'_>) -> Result<bool, EvalError> {
        Ok(matches_protocol(&self.protocols, env.original_route().protocol))
    }
}

fn matches_protocol(protocols: &BTreeSet<RoutingProtocol>, protocol: RoutingProtocol) -> bool {
    protocols.iter().flat_map(|p| p.matched_protocols()).any(|p| p == protocol)
}

/// Matches if the route was redistributed from the given protocol
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchSourceProtocol {
    /// Accepted source protocols
    pub protocols: BTreeSet<RoutingProtocol>,
}

impl MatchSourceProtocol {
    /// Create a new matcher
    pub fn new(protocols: impl IntoIterator<Item = RoutingProtocol>) -> Self {
        Self { protocols: protocols.into_iter().collect() }
    }

    /// Evaluate the predicate
    pub fn evaluate(&self, env: &Environment<'_>) -> Result<bool, EvalError> {
        Ok(env
            .original_route()
            .bgp_attributes()
            .and_then(|a| a.src_protocol)
            .map(|p| matches_protocol(&self.protocols, p))
            .unwrap_or(false))
    }
}

/// Matches if the route was leaked from the given VRF
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchSourceVrf {
    /// Name of the source VRF
    pub vrf: String,
}

impl MatchSourceVrf {
    /// Create a new matcher
    pub fn new(vrf: impl Into<String>) -> Self {
        Self { vrf: vrf.into() }
    }

    /// Evaluate the predicate
    pub fn evaluate(&self, env: &Environment<'_>) -> Result<bool, EvalError> {
        Ok(env.source_vrf() == Some(self.vrf.as_str()))
    }
}

/// Matches if the route was received on the given interface
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchSourceInterface {
    /// Name of the ingress interface
    pub interface: String,
}

impl MatchSourceInterface {
    /// Create a new matcher
    pub fn new(interface: impl Into<String>) -> Self {
        Self { interface: interface.into() }
    }

    /// Evaluate the predicate
    pub fn evaluate(&self, env: &Environment<'_>) -> Result<bool, EvalError> {
        Ok(env.original_route().source_interface.as_deref() == Some(self.interface.as_str()))
    }
}

/// Matches if the next hop of the route points out of one of the given interfaces
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchInterface {
    /// Names of the egress interfaces
    pub interfaces: BTreeSet<String>,
}

impl MatchInterface {
    /// Create a new matcher
    pub fn new<S: Into<String>>(interfaces: impl IntoIterator<Item = S>) -> Self {
        Self { interfaces: interfaces.into_iter().map(Into::into).collect() }
    }

    /// Evaluate the predicate
    pub fn evaluate(&self, env: &Environment<'_>) -> Result<bool, EvalError> {
        Ok(env
            .original_route()
            .next_hop
            .as_ref()
            .and_then(|nh| nh.interface())
            .map(|i| self.interfaces.contains(i))
            .unwrap_or(false))
    }
}

/// Matches if the route carries one of the given process AS numbers (e.g., EIGRP)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchProcessAsn {
    /// Accepted AS numbers
    pub asns: BTreeSet<u32>,
}

impl MatchProcessAsn {
    /// Create a new matcher
    pub fn new(asns: impl IntoIterator<Item = u32>) -> Self {
        Self { asns: asns.into_iter().collect() }
    }

    /// Evaluate the predicate
    pub fn evaluate(&self, env: &Environment<'_>) -> Result<bool, EvalError> {
        Ok(env.original_route().process_asn().map(|a| self.asns.contains(&a)).unwrap_or(false))
    }
}

/// Matches OSPF external routes of the given metric type, or of any type if `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchOspfExternalType(pub Option<OspfMetricType>);

impl MatchOspfExternalType {
    /// Evaluate the predicate
    pub fn evaluate(&self, env: &Environment<'_>) -> Result<bool, EvalError> {
        Ok(match (env.original_route().ospf_metric_type(), self.0) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(actual), Some(expected)) => actual == expected,
        })
    }
}

/// Session type class accepted by [`MatchBgpSessionType`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BgpSessionMatchType {
    /// Any eBGP session (single-hop, multi-hop, unnumbered)
    Ebgp,
    /// Any iBGP session (numbered, unnumbered)
    Ibgp,
}

impl BgpSessionMatchType {
    /// Returns `true` if `session_type` belongs to the class.
    pub fn matches(&self, session_type: SessionType) -> bool {
        match self {
            Self::Ebgp => session_type.is_ebgp(),
            Self::Ibgp => session_type.is_ibgp(),
        }
    }
}

/// Matches if the BGP session is of one of the given types. Needs session properties, and
/// fails on a session whose type is not set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawMatchBgpSessionType")]
pub struct MatchBgpSessionType {
    types: BTreeSet<BgpSessionMatchType>,
}

#[derive(Deserialize)]
struct RawMatchBgpSessionType {
    types: BTreeSet<BgpSessionMatchType>,
}

impl MatchBgpSessionType {
    /// Create a new matcher. Fails if `types` is empty.
    pub fn new(
        types: impl IntoIterator<Item = BgpSessionMatchType>,
    ) -> Result<Self, ConstructionError> {
        let types: BTreeSet<_> = types.into_iter().collect();
        if types.is_empty() {
            return Err(ConstructionError::EmptySessionTypes);
        }
        Ok(Self { types })
    }

    /// Accepted session types
    pub fn types(&self) -> &BTreeSet<BgpSessionMatchType> {
        &self.types
    }

    /// Evaluate the predicate
    pub fn evaluate(&self, env: &Environment<'_>) -> Result<bool, EvalError> {
        let session_type = env.require_session_properties()?.session_type;
        if session_type == SessionType::Unset {
            return Err(EvalError::UnsetSessionType);
        }
        Ok(self.types.iter().any(|t| t.matches(session_type)))
    }
}

impl TryFrom<RawMatchBgpSessionType> for MatchBgpSessionType {
    type Error = ConstructionError;

    fn try_from(raw: RawMatchBgpSessionType) -> Result<Self, Self::Error> {
        Self::new(raw.types)
    }
}

/// Compares the length of the cluster list. Routes without a cluster list have length 0.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchClusterListLength {
    /// Comparison operator, with the length on the left hand side
    pub comparator: IntComparator,
    /// Right hand side of the comparison
    pub expr: IntExpr,
}

impl MatchClusterListLength {
    /// Create a new matcher
    pub fn new(comparator: IntComparator, expr: IntExpr) -> Self {
        Self { comparator, expr }
    }

    /// Evaluate the predicate
    pub fn evaluate(&self, env: &Environment<'_>) -> Result<bool, EvalError> {
        let len = env.try_bgp_attributes().map(|a| a.cluster_list_len()).unwrap_or(0);
        Ok(self.comparator.compare(len as i64, self.expr.evaluate(env)? as i64))
    }
}

/// Compares the tag of the route
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchTag {
    /// Comparison operator, with the tag on the left hand side
    pub comparator: IntComparator,
    /// Right hand side of the comparison
    pub expr: LongExpr,
}

impl MatchTag {
    /// Create a new matcher
    pub fn new(comparator: IntComparator, expr: LongExpr) -> Self {
        Self { comparator, expr }
    }

    /// Evaluate the predicate
    pub fn evaluate(&self, env: &Environment<'_>) -> Result<bool, EvalError> {
        let tag = env.original_route().tag as i64;
        Ok(self.comparator.compare(tag, self.expr.evaluate(env)?))
    }
}
