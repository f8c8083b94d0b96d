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

//! # Attribute Modifiers
//!
//! Expressions that compute a new administrative cost, local preference or metric from the
//! current one. All arithmetic saturates at the bounds of the attribute, it never wraps:
//!
//! - administrative cost: `[min, MAX_ADMIN_DISTANCE]`, where `min` is configured per expression,
//! - local preference: `[0, MAX_LOCAL_PREFERENCE]`,
//! - metric: `[0, MAX_METRIC]`.
//!
//! Amounts are validated when the expression is constructed (also when it is deserialized).

use crate::environment::Environment;
use crate::types::{
    ConstructionError, EvalError, MAX_ADMIN_DISTANCE, MAX_LOCAL_PREFERENCE, MAX_METRIC,
};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

fn admin_cost(value: i64) -> Result<u32, ConstructionError> {
    if (0..=MAX_ADMIN_DISTANCE as i64).contains(&value) {
        Ok(value as u32)
    } else {
        Err(ConstructionError::AdministrativeCostOutOfRange(value))
    }
}

fn local_pref(value: i64) -> Result<u32, ConstructionError> {
    if (0..=MAX_LOCAL_PREFERENCE as i64).contains(&value) {
        Ok(value as u32)
    } else {
        Err(ConstructionError::LocalPreferenceOutOfRange(value))
    }
}

fn metric(value: i64) -> Result<u32, ConstructionError> {
    if (0..=MAX_METRIC as i64).contains(&value) {
        Ok(value as u32)
    } else {
        Err(ConstructionError::MetricOutOfRange(value))
    }
}

/// Clamp `value` into `[min, max]`
fn clip(value: i64, min: u32, max: u32) -> u32 {
    value.max(min as i64).min(max as i64) as u32
}

/// Expression computing the administrative cost of the output route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdministrativeCostExpr {
    /// Fixed value
    LiteralAdministrativeCost(LiteralAdministrativeCost),
    /// Current value, increased
    IncrementAdministrativeCost(IncrementAdministrativeCost),
    /// Current value, decreased
    DecrementAdministrativeCost(DecrementAdministrativeCost),
}

impl AdministrativeCostExpr {
    /// Evaluate the expression against the administrative cost of the current route.
    pub fn evaluate(&self, env: &Environment<'_>) -> Result<u32, EvalError> {
        let current = env.current_route().admin_cost;
        Ok(match self {
            Self::LiteralAdministrativeCost(e) => e.value(),
            Self::IncrementAdministrativeCost(e) => e.apply(current),
            Self::DecrementAdministrativeCost(e) => e.apply(current),
        })
    }
}

/// Fixed administrative cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawLiteralAdministrativeCost")]
pub struct LiteralAdministrativeCost {
    value: u32,
}

#[derive(Deserialize)]
struct RawLiteralAdministrativeCost {
    value: u32,
}

impl LiteralAdministrativeCost {
    /// Create a new literal. Fails if the value is outside of `[0, MAX_ADMIN_DISTANCE]`.
    pub fn new(value: i64) -> Result<Self, ConstructionError> {
        Ok(Self { value: admin_cost(value)? })
    }

    /// The administrative cost
    pub fn value(&self) -> u32 {
        self.value
    }
}

impl TryFrom<RawLiteralAdministrativeCost> for LiteralAdministrativeCost {
    type Error = ConstructionError;

    fn try_from(raw: RawLiteralAdministrativeCost) -> Result<Self, Self::Error> {
        Self::new(raw.value as i64)
    }
}

/// Increase the administrative cost, saturating at `MAX_ADMIN_DISTANCE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawIncrementAdministrativeCost")]
pub struct IncrementAdministrativeCost {
    amount: u32,
}

#[derive(Deserialize)]
struct RawIncrementAdministrativeCost {
    amount: u32,
}

impl IncrementAdministrativeCost {
    /// Create a new increment. Fails if the amount is outside of `[0, MAX_ADMIN_DISTANCE]`.
    pub fn new(amount: i64) -> Result<Self, ConstructionError> {
        Ok(Self { amount: admin_cost(amount)? })
    }

    /// Amount by which the cost is increased
    pub fn amount(&self) -> u32 {
        self.amount
    }

    /// Compute `min(MAX_ADMIN_DISTANCE, current + amount)`
    pub fn apply(&self, current: u32) -> u32 {
        clip(current as i64 + self.amount as i64, 0, MAX_ADMIN_DISTANCE)
    }
}

impl TryFrom<RawIncrementAdministrativeCost> for IncrementAdministrativeCost {
    type Error = ConstructionError;

    fn try_from(raw: RawIncrementAdministrativeCost) -> Result<Self, Self::Error> {
        Self::new(raw.amount as i64)
    }
}

/// Decrease the administrative cost, but never below a configured minimum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDecrementAdministrativeCost")]
pub struct DecrementAdministrativeCost {
    amount: u32,
    min: u32,
}

#[derive(Deserialize)]
struct RawDecrementAdministrativeCost {
    amount: u32,
    min: u32,
}

impl DecrementAdministrativeCost {
    /// Create a new decrement. Fails if the amount or the minimum is outside of
    /// `[0, MAX_ADMIN_DISTANCE]`.
    pub fn new(amount: i64, min: i64) -> Result<Self, ConstructionError> {
        Ok(Self { amount: admin_cost(amount)?, min: admin_cost(min)? })
    }

    /// Amount by which the cost is decreased
    pub fn amount(&self) -> u32 {
        self.amount
    }

    /// Lowest cost the decrement can produce
    pub fn min(&self) -> u32 {
        self.min
    }

    /// Compute `current - amount`, clipped to `[min, MAX_ADMIN_DISTANCE]`
    pub fn apply(&self, current: u32) -> u32 {
        clip(current as i64 - self.amount as i64, self.min, MAX_ADMIN_DISTANCE)
    }
}

impl TryFrom<RawDecrementAdministrativeCost> for DecrementAdministrativeCost {
    type Error = ConstructionError;

    fn try_from(raw: RawDecrementAdministrativeCost) -> Result<Self, Self::Error> {
        Self::new(raw.amount as i64, raw.min as i64)
    }
}

/// Increase the local preference, saturating at `MAX_LOCAL_PREFERENCE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawAmount")]
pub struct IncrementLocalPreference {
    amount: u32,
}

/// Decrease the local preference, saturating at 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawAmount")]
pub struct DecrementLocalPreference {
    amount: u32,
}

/// Increase the metric, saturating at `MAX_METRIC`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawAmount")]
pub struct IncrementMetric {
    amount: u32,
}

/// Decrease the metric, saturating at 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawAmount")]
pub struct DecrementMetric {
    amount: u32,
}

#[derive(Deserialize)]
struct RawAmount {
    amount: u32,
}

impl IncrementLocalPreference {
    /// Create a new increment. Fails if the amount is outside of `[0, MAX_LOCAL_PREFERENCE]`.
    pub fn new(amount: i64) -> Result<Self, ConstructionError> {
        Ok(Self { amount: local_pref(amount)? })
    }

    /// Amount by which the local preference is increased
    pub fn amount(&self) -> u32 {
        self.amount
    }

    /// Compute `clamp(current + amount, 0, MAX_LOCAL_PREFERENCE)`
    pub fn apply(&self, current: u32) -> u32 {
        clip(current as i64 + self.amount as i64, 0, MAX_LOCAL_PREFERENCE)
    }

    /// Apply the increment on the local preference of the selected BGP attributes
    pub fn evaluate(&self, env: &Environment<'_>) -> Result<u32, EvalError> {
        Ok(self.apply(env.bgp_attributes()?.local_preference))
    }
}

impl DecrementLocalPreference {
    /// Create a new decrement. Fails if the amount is outside of `[0, MAX_LOCAL_PREFERENCE]`.
    pub fn new(amount: i64) -> Result<Self, ConstructionError> {
        Ok(Self { amount: local_pref(amount)? })
    }

    /// Amount by which the local preference is decreased
    pub fn amount(&self) -> u32 {
        self.amount
    }

    /// Compute `clamp(current - amount, 0, MAX_LOCAL_PREFERENCE)`
    pub fn apply(&self, current: u32) -> u32 {
        clip(current as i64 - self.amount as i64, 0, MAX_LOCAL_PREFERENCE)
    }

    /// Apply the decrement on the local preference of the selected BGP attributes
    pub fn evaluate(&self, env: &Environment<'_>) -> Result<u32, EvalError> {
        Ok(self.apply(env.bgp_attributes()?.local_preference))
    }
}

impl IncrementMetric {
    /// Create a new increment. Fails if the amount is outside of `[0, MAX_METRIC]`.
    pub fn new(amount: i64) -> Result<Self, ConstructionError> {
        Ok(Self { amount: metric(amount)? })
    }

    /// Amount by which the metric is increased
    pub fn amount(&self) -> u32 {
        self.amount
    }

    /// Compute `clamp(current + amount, 0, MAX_METRIC)`
    pub fn apply(&self, current: u32) -> u32 {
        clip(current as i64 + self.amount as i64, 0, MAX_METRIC)
    }

    /// Apply the increment on the metric of the current route
    pub fn evaluate(&self, env: &Environment<'_>) -> Result<u32, EvalError> {
        Ok(self.apply(env.current_route().metric))
    }
}

impl DecrementMetric {
    /// Create a new decrement. Fails if the amount is outside of `[0, MAX_METRIC]`.
    pub fn new(amount: i64) -> Result<Self, ConstructionError> {
        Ok(Self { amount: metric(amount)? })
    }

    /// Amount by which the metric is decreased
    pub fn amount(&self) -> u32 {
        self.amount
    }

    /// Compute `clamp(current - amount, 0, MAX_METRIC)`
    pub fn apply(&self, current: u32) -> u32 {
        clip(current as i64 - self.amount as i64, 0, MAX_METRIC)
    }

    /// Apply the decrement on the metric of the current route
    pub fn evaluate(&self, env: &Environment<'_>) -> Result<u32, EvalError> {
        Ok(self.apply(env.current_route().metric))
    }
}

impl TryFrom<RawAmount> for IncrementLocalPreference {
    type Error = ConstructionError;

    fn try_from(raw: RawAmount) -> Result<Self, Self::Error> {
        Self::new(raw.amount as i64)
    }
}

impl TryFrom<RawAmount> for DecrementLocalPreference {
    type Error = ConstructionError;

    fn try_from(raw: RawAmount) -> Result<Self, Self::Error> {
        Self::new(raw.amount as i64)
    }
}

impl TryFrom<RawAmount> for IncrementMetric {
    type Error = ConstructionError;

    fn try_from(raw: RawAmount) -> Result<Self, Self::Error> {
        Self::new(raw.amount as i64)
    }
}

impl TryFrom<RawAmount> for DecrementMetric {
    type Error = ConstructionError;

    fn try_from(raw: RawAmount) -> Result<Self, Self::Error> {
        Self::new(raw.amount as i64)
    }
}
