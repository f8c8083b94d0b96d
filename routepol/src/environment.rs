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

//! # Environment
//!
//! The [`Environment`] bundles everything an expression can read while it is evaluated: the
//! route, the optional output route and intermediate BGP attributes, the BGP session, and the
//! named structures of the device. An environment is built once per route and per policy
//! invocation, and dropped afterwards. Expressions never modify it; the only interior state is
//! the call stack of named structures, which is used to detect circular calls.

use crate::bgp::{BgpAttributes, BgpSessionProperties};
use crate::config::NamedStructures;
use crate::route::Route;
use crate::types::{Direction, EvalError, StructureKind};
use std::cell::RefCell;

/// Evaluation context of a routing policy expression. Use [`Environment::builder`] to create
/// one:
///
/// ```
/// # use routepol::config::Configuration;
/// # use routepol::{BgpAttributes, Direction, Environment, Route};
/// let config = Configuration::new("r1");
/// let route = Route::bgp("10.0.0.0/8".parse().unwrap(), BgpAttributes::default());
/// let env = Environment::builder(&config, &route).direction(Direction::Out).build();
/// assert_eq!(env.direction(), Direction::Out);
/// ```
#[derive(Debug)]
pub struct Environment<'a> {
    structures: &'a dyn NamedStructures,
    direction: Direction,
    original_route: &'a Route,
    output_route: Option<&'a Route>,
    use_output_attributes: bool,
    intermediate_bgp_attributes: Option<&'a BgpAttributes>,
    read_from_intermediate_bgp_attributes: bool,
    bgp_session_properties: Option<&'a BgpSessionProperties>,
    vrf: String,
    source_vrf: Option<String>,
    default_policy: Option<String>,
    call_stack: RefCell<Vec<(StructureKind, String)>>,
}

impl<'a> Environment<'a> {
    /// Create a builder for an environment evaluating `original_route`, resolving named
    /// structures in `structures`.
    pub fn builder(
        structures: &'a dyn NamedStructures,
        original_route: &'a Route,
    ) -> EnvironmentBuilder<'a> {
        EnvironmentBuilder::new(structures, original_route)
    }

    /// Which leg of policy processing is active
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The route as received or stored
    pub fn original_route(&self) -> &'a Route {
        self.original_route
    }

    /// The route under construction, if output attributes are used
    pub fn output_route(&self) -> Option<&'a Route> {
        if self.use_output_attributes {
            self.output_route
        } else {
            None
        }
    }

    /// Named structures of the device
    pub fn structures(&self) -> &'a dyn NamedStructures {
        self.structures
    }

    /// Name of the VRF in which the policy is evaluated
    pub fn vrf(&self) -> &str {
        &self.vrf
    }

    /// Name of the VRF from which the route was leaked, if any
    pub fn source_vrf(&self) -> Option<&str> {
        self.source_vrf.as_deref()
    }

    /// Name of the policy to call when a chain is exhausted, if any
    pub fn default_policy(&self) -> Option<&str> {
        self.default_policy.as_deref()
    }

    /// BGP session properties, if the policy is applied on a BGP session
    pub fn bgp_session_properties(&self) -> Option<&'a BgpSessionProperties> {
        self.bgp_session_properties
    }

    /// BGP session properties, or [`EvalError::MissingSessionProperties`] if there are none.
    pub fn require_session_properties(&self) -> Result<&'a BgpSessionProperties, EvalError> {
        self.bgp_session_properties.ok_or(EvalError::MissingSessionProperties)
    }

    /// The route whose scalar attributes (administrative cost, metric) are currently being
    /// computed: the output route if output attributes are used, else the original route.
    pub fn current_route(&self) -> &'a Route {
        self.output_route().unwrap_or(self.original_route)
    }

    /// Select the BGP attributes to read. The precedence is fixed:
    ///
    /// 1. the output route, if output attributes are used and the output route is a BGP route,
    /// 2. the intermediate BGP attributes, if reading from them is enabled,
    /// 3. the original route, which then must be a BGP route ([`EvalError::NotBgpRoute`]).
    pub fn bgp_attributes(&self) -> Result<&'a BgpAttributes, EvalError> {
        match self.try_bgp_attributes() {
            Some(attrs) => Ok(attrs),
            None => Err(EvalError::NotBgpRoute(self.original_route.protocol)),
        }
    }

    /// Same as [`Environment::bgp_attributes`], but returns `None` instead of an error if the
    /// original route is no BGP route.
    pub fn try_bgp_attributes(&self) -> Option<&'a BgpAttributes> {
        if let Some(attrs) = self.output_route().and_then(|r| r.bgp_attributes()) {
            return Some(attrs);
        }
        if self.read_from_intermediate_bgp_attributes {
            if let Some(attrs) = self.intermediate_bgp_attributes {
                return Some(attrs);
            }
        }
        self.original_route.bgp_attributes()
    }

    /// Push a named structure on the call stack. It is popped again once the returned guard is
    /// dropped. Fails with [`EvalError::CircularReference`] if the structure is already being
    /// evaluated.
    pub(crate) fn enter_call(
        &self,
        kind: StructureKind,
        name: &str,
    ) -> Result<CallGuard<'_>, EvalError> {
        let mut stack = self.call_stack.borrow_mut();
        if stack.iter().any(|(k, n)| *k == kind && n == name) {
            return Err(EvalError::CircularReference { kind, name: name.to_string() });
        }
        stack.push((kind, name.to_string()));
        Ok(CallGuard { stack: &self.call_stack })
    }
}

/// Pops the call stack when dropped
#[derive(Debug)]
pub(crate) struct CallGuard<'e> {
    stack: &'e RefCell<Vec<(StructureKind, String)>>,
}

impl Drop for CallGuard<'_> {
    fn drop(&mut self) {
        self.stack.borrow_mut().pop();
    }
}

/// # Environment Builder
///
/// The original route and the named structures are required up front. Everything else is
/// optional: the direction defaults to [`Direction::In`], and output attributes, intermediate
/// BGP attributes and session properties are absent unless set.
#[derive(Debug, Clone)]
pub struct EnvironmentBuilder<'a> {
    structures: &'a dyn NamedStructures,
    original_route: &'a Route,
    direction: Direction,
    output_route: Option<&'a Route>,
    intermediate_bgp_attributes: Option<&'a BgpAttributes>,
    bgp_session_properties: Option<&'a BgpSessionProperties>,
    vrf: String,
    source_vrf: Option<String>,
    default_policy: Option<String>,
}

impl<'a> EnvironmentBuilder<'a> {
    fn new(structures: &'a dyn NamedStructures, original_route: &'a Route) -> Self {
        Self {
            structures,
            original_route,
            direction: Direction::In,
            output_route: None,
            intermediate_bgp_attributes: None,
            bgp_session_properties: None,
            vrf: String::from("default"),
            source_vrf: None,
            default_policy: None,
        }
    }

    /// Set the direction
    pub fn direction(&mut self, direction: Direction) -> &mut Self {
        self.direction = direction;
        self
    }

    /// Use the attributes of the route under construction
    pub fn output_route(&mut self, route: &'a Route) -> &mut Self {
        self.output_route = Some(route);
        self
    }

    /// Read BGP attributes from the intermediate attributes
    pub fn intermediate_bgp_attributes(&mut self, attrs: &'a BgpAttributes) -> &mut Self {
        self.intermediate_bgp_attributes = Some(attrs);
        self
    }

    /// Set the BGP session properties
    pub fn bgp_session_properties(&mut self, props: &'a BgpSessionProperties) -> &mut Self {
        self.bgp_session_properties = Some(props);
        self
    }

    /// Set the VRF in which the policy is evaluated
    pub fn vrf(&mut self, vrf: &str) -> &mut Self {
        self.vrf = vrf.to_string();
        self
    }

    /// Set the VRF from which the route was leaked
    pub fn source_vrf(&mut self, vrf: &str) -> &mut Self {
        self.source_vrf = Some(vrf.to_string());
        self
    }

    /// Set the policy that is called when a chain is exhausted
    pub fn default_policy(&mut self, policy: &str) -> &mut Self {
        self.default_policy = Some(policy.to_string());
        self
    }

    /// Build the environment
    pub fn build(&self) -> Environment<'a> {
        Environment {
            structures: self.structures,
            direction: self.direction,
            original_route: self.original_route,
            output_route: self.output_route,
            use_output_attributes: self.output_route.is_some(),
            intermediate_bgp_attributes: self.intermediate_bgp_attributes,
            read_from_intermediate_bgp_attributes: self.intermediate_bgp_attributes.is_some(),
            bgp_session_properties: self.bgp_session_properties,
            vrf: self.vrf.clone(),
            source_vrf: self.source_vrf.clone(),
            default_policy: self.default_policy.clone(),
            call_stack: RefCell::new(Vec::new()),
        }
    }
}
