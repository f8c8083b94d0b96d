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

#![deny(missing_docs)]

//! # Routepol: Routing-Policy Expression Evaluation
//! This is a library for evaluating vendor independent routing policy expressions against
//! routes. Vendor specific route-maps and policy-statements are translated (elsewhere) into a
//! small, closed expression algebra, and this library decides whether a route matches and
//! computes the new values of its attributes.
//!
//! ## Structure
//!
//! - **[`Expressions`](expr)**: The intermediate representation. Boolean expressions
//!   ([`BooleanExpr`](expr::BooleanExpr)) combine leaf predicates, community matching
//!   ([`CommunitySetExpr`](expr::CommunitySetExpr), [`CommunityList`](expr::CommunityList)) and
//!   AS-path matching ([`AsPathSetExpr`](expr::AsPathSetExpr)). Value expressions compute AS
//!   numbers, integers, administrative costs, local preferences, metrics and next hops.
//!
//! - **[`Environment`]**: The evaluation context, containing the route, the optional output
//!   route and intermediate BGP attributes, the BGP session and the named structures.
//!
//! - **[`Configuration`](config::Configuration)**: Named community-lists, AS-path access-lists
//!   and routing policies of a device, resolved through the
//!   [`NamedStructures`](config::NamedStructures) trait.
//!
//! - **[`Codec`](codec)**: JSON and binary persistence of expressions and configurations.
//!
//! ## Usage
//!
//! ```
//! use routepol::config::Configuration;
//! use routepol::expr::{BooleanExpr, CommunitySetExpr};
//! use routepol::{BgpAttributes, Community, Environment, Error, Route};
//! # use maplit::btreeset;
//!
//! fn main() -> Result<(), Error> {
//!     let config = Configuration::new("r1");
//!     let attrs = BgpAttributes {
//!         communities: btreeset! {Community::of(65000, 1), Community::of(65000, 2)},
//!         ..Default::default()
//!     };
//!     let route = Route::bgp("10.0.0.0/8".parse()?, attrs);
//!     let env = Environment::builder(&config, &route).build();
//!
//!     let expr = BooleanExpr::MatchCommunitySet(CommunitySetExpr::LiteralCommunity(
//!         Community::of(65000, 2),
//!     ));
//!     assert!(expr.evaluate(&env)?.value());
//!     Ok(())
//! }
//! ```

pub mod bgp;
pub mod codec;
pub mod config;
pub mod environment;
mod error;
pub mod expr;
pub mod route;
pub mod types;

// test modules
mod test;

pub use bgp::{AsId, AsPath, AsSet, BgpAttributes, BgpSessionProperties, Community, SessionType};
pub use config::Configuration;
pub use environment::Environment;
pub use error::Error;
pub use route::{Route, RouteAttributes};
pub use types::{
    ConfigError, ConstructionError, Direction, EvalError, LineAction, NextHop, Prefix,
    RoutingProtocol,
};
