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

//! Module containing definitions for BGP

use crate::types::{ConstructionError, RoutingProtocol};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::iter::FromIterator;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// AS Number
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AsId(pub u32);

impl fmt::Display for AsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Single element of an AS-path. Usually a single AS, but may contain several (`AS_SET` segments,
/// e.g., after aggregation or in confederations).
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Serialize, Deserialize)]
pub struct AsSet(pub BTreeSet<AsId>);

impl AsSet {
    /// Create an AS-set containing a single AS
    pub fn of(as_id: u32) -> Self {
        Self(std::iter::once(AsId(as_id)).collect())
    }

    /// Returns the contained AS if the set has exactly one element.
    pub fn singleton(&self) -> Option<AsId> {
        if self.0.len() == 1 {
            self.0.iter().next().copied()
        } else {
            None
        }
    }
}

impl fmt::Display for AsSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.singleton() {
            Some(as_id) => write!(f, "{}", as_id),
            None => write!(f, "{{{}}}", self.0.iter().join(",")),
        }
    }
}

/// AS-PATH, where the origin of the route is last, and the ID of a new AS is prepended.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Default, Serialize, Deserialize)]
pub struct AsPath(pub Vec<AsSet>);

impl AsPath {
    /// Returns `true` if the path has no elements
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length of the path
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// First (most recently prepended) element
    pub fn first(&self) -> Option<&AsSet> {
        self.0.first()
    }

    /// Last (originating) element
    pub fn last(&self) -> Option<&AsSet> {
        self.0.last()
    }
}

/// Build a path consisting only of singleton AS-sets
impl FromIterator<u32> for AsPath {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self(iter.into_iter().map(AsSet::of).collect())
    }
}

/// The string rendering used for AS-path regex matching: space separated, in path order.
impl fmt::Display for AsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join(" "))
    }
}

/// Standard (RFC 1997) community, 32 bits split into two 16 bit halves.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StandardCommunity(pub u32);

impl StandardCommunity {
    /// Build a community from its two halves
    pub fn of(high: u16, low: u16) -> Self {
        Self(((high as u32) << 16) | low as u32)
    }

    /// Upper 16 bits (usually the AS number)
    pub fn high(&self) -> u16 {
        (self.0 >> 16) as u16
    }

    /// Lower 16 bits
    pub fn low(&self) -> u16 {
        (self.0 & 0xffff) as u16
    }
}

impl fmt::Display for StandardCommunity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.high(), self.low())
    }
}

impl FromStr for StandardCommunity {
    type Err = ConstructionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConstructionError::InvalidCommunity(s.to_string());
        match s.split_once(':') {
            Some((high, low)) => Ok(Self::of(
                high.parse().map_err(|_| invalid())?,
                low.parse().map_err(|_| invalid())?,
            )),
            None => s.parse().map(Self).map_err(|_| invalid()),
        }
    }
}

/// Large (RFC 8092) community
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LargeCommunity {
    /// Global administrator
    pub global_admin: u32,
    /// First local data part
    pub local_data_1: u32,
    /// Second local data part
    pub local_data_2: u32,
}

impl fmt::Display for LargeCommunity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "large:{}:{}:{}", self.global_admin, self.local_data_1, self.local_data_2)
    }
}

/// BGP community attached to a route
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Community {
    /// Standard community
    Standard(StandardCommunity),
    /// Large community
    Large(LargeCommunity),
}

impl Community {
    /// Create a standard community from its raw 32 bit value
    pub fn standard(value: u32) -> Self {
        Self::Standard(StandardCommunity(value))
    }

    /// Create a standard community from its two halves
    pub fn of(high: u16, low: u16) -> Self {
        Self::Standard(StandardCommunity::of(high, low))
    }

    /// Returns the standard community, if it is one.
    pub fn as_standard(&self) -> Option<StandardCommunity> {
        match self {
            Self::Standard(c) => Some(*c),
            Self::Large(_) => None,
        }
    }
}

/// Canonical string form, matched by community regexes
impl fmt::Display for Community {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard(c) => c.fmt(f),
            Self::Large(c) => c.fmt(f),
        }
    }
}

impl From<StandardCommunity> for Community {
    fn from(c: StandardCommunity) -> Self {
        Self::Standard(c)
    }
}

impl From<LargeCommunity> for Community {
    fn from(c: LargeCommunity) -> Self {
        Self::Large(c)
    }
}

/// BGP path attributes read by the policy expressions.
///
/// The following attributes are omitted
/// - ORIGIN, MED, ORIGINATOR_ID: never read by any expression
/// - ATOMIC_AGGREGATE, AGGREGATOR: not used
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BgpAttributes {
    /// AS-PATH
    pub as_path: AsPath,
    /// Communities attached to the route
    pub communities: BTreeSet<Community>,
    /// CLUSTER_LIST. `None` if the attribute is absent.
    pub cluster_list: Option<BTreeSet<Ipv4Addr>>,
    /// LOCAL-PREF
    pub local_preference: u32,
    /// Protocol from which the route was redistributed into BGP
    pub src_protocol: Option<RoutingProtocol>,
}

impl Default for BgpAttributes {
    fn default() -> Self {
        Self {
            as_path: AsPath::default(),
            communities: BTreeSet::new(),
            cluster_list: None,
            local_preference: 100,
            src_protocol: None,
        }
    }
}

impl BgpAttributes {
    /// Length of the cluster list. A missing attribute has length 0.
    pub fn cluster_list_len(&self) -> usize {
        self.cluster_list.as_ref().map(|c| c.len()).unwrap_or(0)
    }
}

/// Type of a BGP session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionType {
    /// eBGP session between directly connected peers
    EbgpSinglehop,
    /// eBGP session between peers that are not directly connected
    EbgpMultihop,
    /// eBGP session over an unnumbered interface
    EbgpUnnumbered,
    /// iBGP session
    Ibgp,
    /// iBGP session over an unnumbered interface
    IbgpUnnumbered,
    /// The session type could not be determined
    Unset,
}

impl SessionType {
    /// returns true if the session type is an eBGP session
    pub fn is_ebgp(&self) -> bool {
        matches!(self, Self::EbgpSinglehop | Self::EbgpMultihop | Self::EbgpUnnumbered)
    }

    /// returns true if the session type is an iBGP session
    pub fn is_ibgp(&self) -> bool {
        matches!(self, Self::Ibgp | Self::IbgpUnnumbered)
    }
}

/// Properties of the BGP session over which the route is processed. The head is the local end
/// of the session, and the tail is the remote end.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BgpSessionProperties {
    /// AS of the local end
    pub head_as: AsId,
    /// AS of the remote end
    pub tail_as: AsId,
    /// Address of the local end
    pub head_ip: Ipv4Addr,
    /// Address of the remote end
    pub tail_ip: Ipv4Addr,
    /// Type of the session
    pub session_type: SessionType,
}

impl BgpSessionProperties {
    /// Create new session properties
    pub fn new(
        head_as: AsId,
        tail_as: AsId,
        head_ip: Ipv4Addr,
        tail_ip: Ipv4Addr,
        session_type: SessionType,
    ) -> Self {
        Self { head_as, tail_as, head_ip, tail_ip, session_type }
    }

    /// AS of the local router
    pub fn local_as(&self) -> AsId {
        self.head_as
    }

    /// AS of the neighbor
    pub fn remote_as(&self) -> AsId {
        self.tail_as
    }

    /// Address of the local router
    pub fn local_ip(&self) -> Ipv4Addr {
        self.head_ip
    }

    /// Address of the neighbor
    pub fn remote_ip(&self) -> Ipv4Addr {
        self.tail_ip
    }
}
