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

#[cfg(test)]
mod test_as_path;
#[cfg(test)]
mod test_community;
#[cfg(test)]
mod test_predicates;

#[cfg(test)]
use crate::bgp::{AsId, AsPath, BgpAttributes, BgpSessionProperties, Community, SessionType};
#[cfg(test)]
use crate::route::Route;
#[cfg(test)]
use crate::types::Prefix;

/// Prefix used by all test routes
#[cfg(test)]
pub(crate) fn prefix() -> Prefix {
    "10.0.0.0/8".parse().unwrap()
}

/// eBGP route with the given AS-path and communities
#[cfg(test)]
pub(crate) fn bgp_route(as_path: &[u32], communities: &[Community]) -> Route {
    Route::bgp(
        prefix(),
        BgpAttributes {
            as_path: as_path.iter().copied().collect::<AsPath>(),
            communities: communities.iter().copied().collect(),
            ..Default::default()
        },
    )
}

/// eBGP single-hop session from AS 65000 (10.0.0.1) to AS 65001 (10.0.0.2)
#[cfg(test)]
pub(crate) fn ebgp_session() -> BgpSessionProperties {
    session(SessionType::EbgpSinglehop)
}

/// Session from AS 65000 (10.0.0.1) to AS 65001 (10.0.0.2) of the given type
#[cfg(test)]
pub(crate) fn session(session_type: SessionType) -> BgpSessionProperties {
    BgpSessionProperties::new(
        AsId(65000),
        AsId(65001),
        "10.0.0.1".parse().unwrap(),
        "10.0.0.2".parse().unwrap(),
        session_type,
    )
}
