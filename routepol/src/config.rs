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

//! # Configuration
//!
//! The [`Configuration`] stores the named structures of a single device (community-lists,
//! AS-path access-lists and routing policies), against which named references in the IR are
//! resolved. Resolution goes through the [`NamedStructures`] trait, such that evaluation can also
//! run against structures maintained elsewhere.
//!
//! ```
//! use routepol::config::{Configuration, NamedStructures};
//! use routepol::expr::{CommunityList, CommunitySetExpr};
//! use routepol::{Community, ConfigError, LineAction};
//!
//! fn main() -> Result<(), ConfigError> {
//!     let mut c = Configuration::new("r1");
//!     let list = CommunityList::new(vec![(
//!         LineAction::Permit,
//!         CommunitySetExpr::LiteralCommunity(Community::of(65000, 1)),
//!     )]);
//!     c.add_community_list("CL", list)?;
//!     assert!(c.community_list("CL").is_ok());
//!     assert!(c.community_list("OTHER").is_err());
//!     Ok(())
//! }
//! ```

use crate::expr::{AsPathAccessList, BooleanExpr, CommunityList};
use crate::types::{ConfigError, EvalError, StructureKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Read-only lookup of named structures by their exact name.
///
/// Unresolved names are reported as [`EvalError::UndefinedReference`].
pub trait NamedStructures: fmt::Debug {
    /// Lookup a community-list
    fn community_list(&self, name: &str) -> Result<&CommunityList, EvalError>;

    /// Lookup an AS-path access-list
    fn as_path_access_list(&self, name: &str) -> Result<&AsPathAccessList, EvalError>;

    /// Lookup a routing policy, given by the boolean expression it evaluates
    fn routing_policy(&self, name: &str) -> Result<&BooleanExpr, EvalError>;
}

/// # Device Configuration
/// Named structures of a single device. Every structure is unique per kind and name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Configuration {
    hostname: String,
    community_lists: BTreeMap<String, CommunityList>,
    as_path_access_lists: BTreeMap<String, AsPathAccessList>,
    routing_policies: BTreeMap<String, BooleanExpr>,
}

impl Configuration {
    /// Create an empty configuration
    pub fn new(hostname: impl Into<String>) -> Self {
        Self { hostname: hostname.into(), ..Default::default() }
    }

    /// Hostname of the device
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Add a community-list. This fails if a list with the same name already exists.
    pub fn add_community_list(
        &mut self,
        name: impl Into<String>,
        list: CommunityList,
    ) -> Result<(), ConfigError> {
        insert_unique(&mut self.community_lists, StructureKind::CommunityList, name.into(), list)
    }

    /// Add an AS-path access-list. This fails if a list with the same name already exists.
    pub fn add_as_path_access_list(
        &mut self,
        name: impl Into<String>,
        list: AsPathAccessList,
    ) -> Result<(), ConfigError> {
        insert_unique(
            &mut self.as_path_access_lists,
            StructureKind::AsPathAccessList,
            name.into(),
            list,
        )
    }

    /// Add a routing policy. This fails if a policy with the same name already exists.
    pub fn add_routing_policy(
        &mut self,
        name: impl Into<String>,
        policy: BooleanExpr,
    ) -> Result<(), ConfigError> {
        insert_unique(&mut self.routing_policies, StructureKind::RoutingPolicy, name.into(), policy)
    }

    /// Iterate over all routing policies
    pub fn routing_policies(&self) -> impl Iterator<Item = (&String, &BooleanExpr)> {
        self.routing_policies.iter()
    }
}

fn insert_unique<T>(
    map: &mut BTreeMap<String, T>,
    kind: StructureKind,
    name: String,
    value: T,
) -> Result<(), ConfigError> {
    if map.contains_key(&name) {
        return Err(ConfigError::DuplicateStructure { kind, name });
    }
    map.insert(name, value);
    Ok(())
}

impl NamedStructures for Configuration {
    fn community_list(&self, name: &str) -> Result<&CommunityList, EvalError> {
        self.community_lists.get(name).ok_or_else(|| EvalError::UndefinedReference {
            kind: StructureKind::CommunityList,
            name: name.to_string(),
        })
    }

    fn as_path_access_list(&self, name: &str) -> Result<&AsPathAccessList, EvalError> {
        self.as_path_access_lists.get(name).ok_or_else(|| EvalError::UndefinedReference {
            kind: StructureKind::AsPathAccessList,
            name: name.to_string(),
        })
    }

    fn routing_policy(&self, name: &str) -> Result<&BooleanExpr, EvalError> {
        self.routing_policies.get(name).ok_or_else(|| EvalError::UndefinedReference {
            kind: StructureKind::RoutingPolicy,
            name: name.to_string(),
        })
    }
}
