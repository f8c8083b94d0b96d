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

//! Next hop expressions

use crate::environment::Environment;
use crate::types::{EvalError, NextHop};
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// Expression computing the next hop of the output route. These only carry a value; the
/// session-dependent variants read the BGP session properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NextHopExpr {
    /// Drop the traffic
    DiscardNextHop,
    /// The local address of the BGP session
    SelfNextHop,
    /// Keep the next hop of the original route
    UnchangedNextHop,
    /// Fixed next hop address
    IpNextHop(Ipv4Addr),
    /// The remote address of the BGP session
    PeerAddressNextHop,
}

impl NextHopExpr {
    /// Compute the next hop. Returns `None` only for [`NextHopExpr::UnchangedNextHop`] on a route
    /// without a next hop.
    pub fn evaluate(&self, env: &Environment<'_>) -> Result<Option<NextHop>, EvalError> {
        Ok(match self {
            Self::DiscardNextHop => Some(NextHop::Discard),
            Self::SelfNextHop => Some(NextHop::Ip(env.require_session_properties()?.local_ip())),
            Self::UnchangedNextHop => env.original_route().next_hop.clone(),
            Self::IpNextHop(ip) => Some(NextHop::Ip(*ip)),
            Self::PeerAddressNextHop => {
                Some(NextHop::Ip(env.require_session_properties()?.remote_ip()))
            }
        })
    }
}
