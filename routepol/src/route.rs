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

//! # Routes
//!
//! A [`Route`] bundles the fields that are common to all routes with the protocol specific
//! attributes ([`RouteAttributes`]). Policy expressions only ever read routes.

use crate::bgp::BgpAttributes;
use crate::types::{NextHop, OspfMetricType, Prefix, RoutingProtocol};
use serde::{Deserialize, Serialize};

/// Route, as stored in a RIB or as received from a neighbor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Route {
    /// Destination network
    pub prefix: Prefix,
    /// Protocol that produced the route
    pub protocol: RoutingProtocol,
    /// Administrative distance
    pub admin_cost: u32,
    /// Protocol metric
    pub metric: u32,
    /// Route tag
    pub tag: u32,
    /// Next hop of the route, if known.
    pub next_hop: Option<NextHop>,
    /// Interface on which the route was received
    pub source_interface: Option<String>,
    /// Protocol specific attributes
    pub attributes: RouteAttributes,
}

/// Protocol specific attributes of a route
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RouteAttributes {
    /// BGP route
    Bgp(BgpAttributes),
    /// OSPF external route
    OspfExternal {
        /// Metric type (E1 or E2)
        metric_type: OspfMetricType,
    },
    /// EIGRP internal route
    Eigrp {
        /// AS number of the EIGRP process
        process_asn: u32,
    },
    /// EIGRP external route
    EigrpExternal {
        /// AS number of the EIGRP process
        process_asn: u32,
    },
    /// IS-IS route. The level is part of the protocol.
    Isis,
    /// Static route
    Static,
    /// Connected route
    Connected,
    /// Any other route without specific attributes
    Generic,
}

impl Route {
    fn new(
        prefix: Prefix,
        protocol: RoutingProtocol,
        admin_cost: u32,
        attributes: RouteAttributes,
    ) -> Self {
        Self {
            prefix,
            protocol,
            admin_cost,
            metric: 0,
            tag: 0,
            next_hop: None,
            source_interface: None,
            attributes,
        }
    }

    /// Create a new BGP route (eBGP administrative distance)
    pub fn bgp(prefix: Prefix, attributes: BgpAttributes) -> Self {
        Self::new(prefix, RoutingProtocol::Bgp, 20, RouteAttributes::Bgp(attributes))
    }

    /// Create a new iBGP route
    pub fn ibgp(prefix: Prefix, attributes: BgpAttributes) -> Self {
        Self::new(prefix, RoutingProtocol::Ibgp, 200, RouteAttributes::Bgp(attributes))
    }

    /// Create a new static route towards the given next hop
    pub fn static_route(prefix: Prefix, next_hop: NextHop) -> Self {
        let mut route = Self::new(prefix, RoutingProtocol::Static, 1, RouteAttributes::Static);
        route.next_hop = Some(next_hop);
        route
    }

    /// Create a new connected route on the given interface
    pub fn connected(prefix: Prefix, interface: &str) -> Self {
        let mut route =
            Self::new(prefix, RoutingProtocol::Connected, 0, RouteAttributes::Connected);
        route.next_hop = Some(NextHop::Interface { name: interface.to_string(), ip: None });
        route
    }

    /// Create a new OSPF external route
    pub fn ospf_external(prefix: Prefix, metric_type: OspfMetricType) -> Self {
        let protocol = match metric_type {
            OspfMetricType::E1 => RoutingProtocol::OspfE1,
            OspfMetricType::E2 => RoutingProtocol::OspfE2,
        };
        Self::new(prefix, protocol, 110, RouteAttributes::OspfExternal { metric_type })
    }

    /// Create a new EIGRP internal route
    pub fn eigrp(prefix: Prefix, process_asn: u32) -> Self {
        Self::new(prefix, RoutingProtocol::Eigrp, 90, RouteAttributes::Eigrp { process_asn })
    }

    /// Create a new EIGRP external route
    pub fn eigrp_external(prefix: Prefix, process_asn: u32) -> Self {
        let attributes = RouteAttributes::EigrpExternal { process_asn };
        Self::new(prefix, RoutingProtocol::EigrpEx, 170, attributes)
    }

    /// Create a new IS-IS route. `protocol` carries the level.
    pub fn isis(prefix: Prefix, protocol: RoutingProtocol) -> Self {
        Self::new(prefix, protocol, 115, RouteAttributes::Isis)
    }

    /// Create a route of any protocol without specific attributes
    pub fn generic(prefix: Prefix, protocol: RoutingProtocol, admin_cost: u32) -> Self {
        Self::new(prefix, protocol, admin_cost, RouteAttributes::Generic)
    }

    /// Returns the BGP attributes if this is a BGP route.
    pub fn bgp_attributes(&self) -> Option<&BgpAttributes> {
        match &self.attributes {
            RouteAttributes::Bgp(attrs) => Some(attrs),
            _ => None,
        }
    }

    /// Returns `true` if this is a BGP route
    pub fn is_bgp(&self) -> bool {
        self.bgp_attributes().is_some()
    }

    /// Returns the AS number of the process that produced the route, if the protocol has one.
    pub fn process_asn(&self) -> Option<u32> {
        match &self.attributes {
            RouteAttributes::Eigrp { process_asn } => Some(*process_asn),
            RouteAttributes::EigrpExternal { process_asn } => Some(*process_asn),
            _ => None,
        }
    }

    /// Returns the OSPF metric type if this is an OSPF external route.
    pub fn ospf_metric_type(&self) -> Option<OspfMetricType> {
        match &self.attributes {
            RouteAttributes::OspfExternal { metric_type } => Some(*metric_type),
            _ => None,
        }
    }
}
