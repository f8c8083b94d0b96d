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

//! Module containing the shared type definitions and the error types

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::Ipv4Addr;
use std::str::FromStr;
use thiserror::Error;

/// Largest administrative distance a route can carry.
pub const MAX_ADMIN_DISTANCE: u32 = 255;
/// Largest BGP local preference (`2^32 - 1`).
pub const MAX_LOCAL_PREFERENCE: u32 = u32::MAX;
/// Largest route metric (`2^32 - 1`).
pub const MAX_METRIC: u32 = u32::MAX;

/// IPv4 prefix, used to identify a route.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Prefix {
    /// Network address
    pub addr: Ipv4Addr,
    /// Prefix length
    pub len: u8,
}

impl Prefix {
    /// Create a new prefix. Fails if the length is larger than 32.
    pub fn new(addr: Ipv4Addr, len: u8) -> Result<Self, ConstructionError> {
        if len > 32 {
            return Err(ConstructionError::InvalidPrefix(format!("{}/{}", addr, len)));
        }
        Ok(Self { addr, len })
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.len)
    }
}

impl FromStr for Prefix {
    type Err = ConstructionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConstructionError::InvalidPrefix(s.to_string());
        let mut parts = s.splitn(2, '/');
        let addr = parts.next().and_then(|a| a.parse().ok()).ok_or_else(invalid)?;
        let len = parts.next().and_then(|l| l.parse().ok()).ok_or_else(invalid)?;
        Self::new(addr, len)
    }
}

/// Action of a single line in an ordered list (community-list, as-path access-list).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LineAction {
    /// The line permits what it matches
    Permit,
    /// The line denies what it matches
    Deny,
}

impl LineAction {
    /// Returns `true` if the action is `Permit`.
    pub fn is_permit(&self) -> bool {
        self == &Self::Permit
    }

    /// Returns `true` if the action is `Deny`.
    pub fn is_deny(&self) -> bool {
        self == &Self::Deny
    }
}

impl fmt::Display for LineAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Permit => write!(f, "permit"),
            Self::Deny => write!(f, "deny"),
        }
    }
}

/// Which leg of policy processing is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Import policy (routes received from a neighbor)
    In,
    /// Export policy (routes sent to a neighbor)
    Out,
}

/// Routing protocol from which a route was learned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum RoutingProtocol {
    #[serde(rename = "aggregate")]
    Aggregate,
    #[serde(rename = "bgp")]
    Bgp,
    #[serde(rename = "connected")]
    Connected,
    #[serde(rename = "egp")]
    Egp,
    #[serde(rename = "eigrp")]
    Eigrp,
    #[serde(rename = "eigrpEX")]
    EigrpEx,
    #[serde(rename = "evpn")]
    Evpn,
    #[serde(rename = "ibgp")]
    Ibgp,
    #[serde(rename = "igp")]
    Igp,
    /// Any IS-IS level. Only used inside matchers, never as the protocol of an actual route.
    #[serde(rename = "isis")]
    IsisAny,
    #[serde(rename = "isisEL1")]
    IsisEl1,
    #[serde(rename = "isisEL2")]
    IsisEl2,
    #[serde(rename = "isisL1")]
    IsisL1,
    #[serde(rename = "isisL2")]
    IsisL2,
    #[serde(rename = "kernel")]
    Kernel,
    #[serde(rename = "local")]
    Local,
    /// OSPF intra-area
    #[serde(rename = "ospf")]
    Ospf,
    /// OSPF external type 1
    #[serde(rename = "ospfE1")]
    OspfE1,
    /// OSPF external type 2
    #[serde(rename = "ospfE2")]
    OspfE2,
    /// OSPF inter-area
    #[serde(rename = "ospfIA")]
    OspfIa,
    #[serde(rename = "rip")]
    Rip,
    #[serde(rename = "static")]
    Static,
}

impl RoutingProtocol {
    /// Returns the protocols a matcher for `self` accepts. Compound values (`IsisAny`) expand to
    /// their concrete members, and are not contained in their own expansion.
    pub fn matched_protocols(self) -> Vec<RoutingProtocol> {
        match self {
            Self::IsisAny => vec![Self::IsisEl1, Self::IsisEl2, Self::IsisL1, Self::IsisL2],
            p => vec![p],
        }
    }

    /// Returns the canonical name of the protocol
    pub fn name(&self) -> &'static str {
        match self {
            Self::Aggregate => "aggregate",
            Self::Bgp => "bgp",
            Self::Connected => "connected",
            Self::Egp => "egp",
            Self::Eigrp => "eigrp",
            Self::EigrpEx => "eigrpEX",
            Self::Evpn => "evpn",
            Self::Ibgp => "ibgp",
            Self::Igp => "igp",
            Self::IsisAny => "isis",
            Self::IsisEl1 => "isisEL1",
            Self::IsisEl2 => "isisEL2",
            Self::IsisL1 => "isisL1",
            Self::IsisL2 => "isisL2",
            Self::Kernel => "kernel",
            Self::Local => "local",
            Self::Ospf => "ospf",
            Self::OspfE1 => "ospfE1",
            Self::OspfE2 => "ospfE2",
            Self::OspfIa => "ospfIA",
            Self::Rip => "rip",
            Self::Static => "static",
        }
    }
}

impl fmt::Display for RoutingProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// OSPF external metric type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OspfMetricType {
    /// External type 1: external cost plus internal cost
    E1,
    /// External type 2: external cost only
    E2,
}

/// Next hop of a route.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NextHop {
    /// Traffic is dropped
    Discard,
    /// Next hop is given by its IP address only
    Ip(Ipv4Addr),
    /// Next hop is an interface, optionally with the address of the neighbor on it
    Interface {
        /// Name of the egress interface
        name: String,
        /// Address of the next router on that interface
        ip: Option<Ipv4Addr>,
    },
}

impl NextHop {
    /// Returns the egress interface name, if the next hop names one.
    pub fn interface(&self) -> Option<&str> {
        match self {
            Self::Interface { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }
}

/// Regular expression as it appears in the IR. Compiled once at construction; compared, hashed
/// and serialized by its source pattern.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PolicyRegex(Regex);

impl PolicyRegex {
    /// Compile a new regex. Fails if the pattern is not a valid regular expression.
    pub fn new(pattern: &str) -> Result<Self, ConstructionError> {
        Regex::new(pattern).map(Self).map_err(|e| ConstructionError::InvalidRegex {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })
    }

    /// Source pattern of the regex
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns `true` if the regex matches anywhere inside `text` (not anchored).
    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }
}

impl fmt::Debug for PolicyRegex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PolicyRegex({:?})", self.as_str())
    }
}

impl PartialEq for PolicyRegex {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for PolicyRegex {}

impl Hash for PolicyRegex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl TryFrom<String> for PolicyRegex {
    type Error = ConstructionError;

    fn try_from(pattern: String) -> Result<Self, Self::Error> {
        Self::new(&pattern)
    }
}

impl From<PolicyRegex> for String {
    fn from(regex: PolicyRegex) -> Self {
        regex.as_str().to_string()
    }
}

/// Kind of a named structure stored in the configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureKind {
    /// Community-list
    CommunityList,
    /// AS-path access-list
    AsPathAccessList,
    /// Routing policy (route-map, policy-statement)
    RoutingPolicy,
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CommunityList => write!(f, "community-list"),
            Self::AsPathAccessList => write!(f, "as-path access-list"),
            Self::RoutingPolicy => write!(f, "routing policy"),
        }
    }
}

/// Error raised while building an IR node. An invalid node can never be constructed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    /// Administrative cost outside of `[0, MAX_ADMIN_DISTANCE]`
    #[error("Administrative cost {0} is outside of [0, {}]", MAX_ADMIN_DISTANCE)]
    AdministrativeCostOutOfRange(i64),
    /// Local preference amount outside of `[0, MAX_LOCAL_PREFERENCE]`
    #[error("Local preference {0} is outside of [0, {}]", MAX_LOCAL_PREFERENCE)]
    LocalPreferenceOutOfRange(i64),
    /// Metric amount outside of `[0, MAX_METRIC]`
    #[error("Metric {0} is outside of [0, {}]", MAX_METRIC)]
    MetricOutOfRange(i64),
    /// A BGP session type matcher needs at least one type
    #[error("MatchBgpSessionType requires at least one session type")]
    EmptySessionTypes,
    /// The pattern is not a valid regular expression
    #[error("Invalid regex {pattern:?}: {reason}")]
    InvalidRegex {
        /// The offending pattern
        pattern: String,
        /// Message of the regex compiler
        reason: String,
    },
    /// The string is not a valid prefix
    #[error("Invalid prefix: {0}")]
    InvalidPrefix(String),
    /// The string is not a valid community
    #[error("Invalid community: {0}")]
    InvalidCommunity(String),
}

/// Error raised while evaluating an IR node against an environment.
///
/// Except for [`EvalError::NotReducible`], these errors mean that the caller built an environment
/// that is incompatible with the expression, and the evaluation of the current route must stop.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// The expression needs BGP session properties, but the environment has none.
    #[error("Expected BGP session properties")]
    MissingSessionProperties,
    /// The expression reads BGP attributes, but the selected route is not a BGP route.
    #[error("Expected a BGP route, but the selected route was learned via {0}")]
    NotBgpRoute(RoutingProtocol),
    /// The AS-set at the inspected position of the AS-path contains more than one AS.
    #[error("Expected a singleton AS-set, found {0}")]
    NonSingletonAsSet(String),
    /// The expression reads the last AS of an empty AS-path.
    #[error("Cannot read the last AS of an empty AS-path")]
    EmptyAsPath,
    /// The BGP session type is not set.
    #[error("BGP session type is not set")]
    UnsetSessionType,
    /// The community-set expression cannot be statically enumerated.
    #[error("{0} cannot be reduced to a literal community set")]
    NotReducible(&'static str),
    /// A named structure was not found.
    #[error("Undefined {kind}: {name}")]
    UndefinedReference {
        /// What kind of structure was referenced
        kind: StructureKind,
        /// Name of the referenced structure
        name: String,
    },
    /// A named structure (transitively) references itself.
    #[error("Circular reference to {kind} {name}")]
    CircularReference {
        /// What kind of structure is evaluated twice
        kind: StructureKind,
        /// Name of the structure
        name: String,
    },
    /// The expression cannot be evaluated.
    #[error("Unsupported expression: {0}")]
    UnsupportedExpression(String),
    /// An intermediate value is outside of its domain.
    #[error("Value {value} is out of range for {what}")]
    ValueOutOfRange {
        /// The quantity that was computed
        what: &'static str,
        /// The offending value
        value: i64,
    },
}

impl EvalError {
    /// Returns `true` if this error signals an unsupported reduction, in which case the caller
    /// may fall back to a different strategy.
    pub fn is_not_reducible(&self) -> bool {
        matches!(self, Self::NotReducible(_))
    }
}

/// Configuration Error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A structure with the same kind and name is already defined
    #[error("The {kind} {name} is already defined")]
    DuplicateStructure {
        /// Kind of the structure
        kind: StructureKind,
        /// Name of the structure
        name: String,
    },
}
