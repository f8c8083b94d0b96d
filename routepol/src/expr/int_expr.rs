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

//! Integer and long valued expressions, and comparisons over them.

use super::as_expr::AsExpr;
use super::modifiers::{
    DecrementLocalPreference, DecrementMetric, IncrementLocalPreference, IncrementMetric,
};
use crate::environment::Environment;
use crate::types::EvalError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntComparator {
    /// `lhs == rhs`
    Eq,
    /// `lhs >= rhs`
    Ge,
    /// `lhs > rhs`
    Gt,
    /// `lhs <= rhs`
    Le,
    /// `lhs < rhs`
    Lt,
}

impl IntComparator {
    /// Apply the comparison
    pub fn compare(&self, lhs: i64, rhs: i64) -> bool {
        match self {
            Self::Eq => lhs == rhs,
            Self::Ge => lhs >= rhs,
            Self::Gt => lhs > rhs,
            Self::Le => lhs <= rhs,
            Self::Lt => lhs < rhs,
        }
    }
}

impl fmt::Display for IntComparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq => write!(f, "=="),
            Self::Ge => write!(f, ">="),
            Self::Gt => write!(f, ">"),
            Self::Le => write!(f, "<="),
            Self::Lt => write!(f, "<"),
        }
    }
}

/// 32 bit integer expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntExpr {
    /// Literal value
    LiteralInt(i32),
    /// Named variable. Variables are never bound, so evaluating one fails.
    VarInt(String),
}

impl IntExpr {
    /// Evaluate the expression
    pub fn evaluate(&self, _env: &Environment<'_>) -> Result<i32, EvalError> {
        match self {
            Self::LiteralInt(v) => Ok(*v),
            Self::VarInt(var) => {
                Err(EvalError::UnsupportedExpression(format!("integer variable {}", var)))
            }
        }
    }
}

/// 64 bit integer expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LongExpr {
    /// Literal value
    LiteralLong(i64),
    /// Named variable. Variables are never bound, so evaluating one fails.
    VarLong(String),
    /// Value of an AS number expression
    AsnValue(AsExpr),
    /// 32 bit value packed from two 16 bit halves (e.g., `65000:100`)
    UInt32HighLow {
        /// Upper 16 bits
        high: IntExpr,
        /// Lower 16 bits
        low: IntExpr,
    },
    /// Current local preference, increased
    IncrementLocalPreference(IncrementLocalPreference),
    /// Current local preference, decreased
    DecrementLocalPreference(DecrementLocalPreference),
    /// Current metric, increased
    IncrementMetric(IncrementMetric),
    /// Current metric, decreased
    DecrementMetric(DecrementMetric),
}

impl LongExpr {
    /// Wrap an AS number expression
    pub fn asn_value(expr: AsExpr) -> Self {
        Self::AsnValue(expr)
    }

    /// Evaluate the expression
    pub fn evaluate(&self, env: &Environment<'_>) -> Result<i64, EvalError> {
        match self {
            Self::LiteralLong(v) => Ok(*v),
            Self::VarLong(var) => {
                Err(EvalError::UnsupportedExpression(format!("long variable {}", var)))
            }
            Self::AsnValue(e) => Ok(e.evaluate(env)?.0 as i64),
            Self::UInt32HighLow { high, low } => {
                let high = uint16(high.evaluate(env)?, "high half of a 32 bit value")?;
                let low = uint16(low.evaluate(env)?, "low half of a 32 bit value")?;
                Ok(((high << 16) | low) as i64)
            }
            Self::IncrementLocalPreference(e) => Ok(e.evaluate(env)? as i64),
            Self::DecrementLocalPreference(e) => Ok(e.evaluate(env)? as i64),
            Self::IncrementMetric(e) => Ok(e.evaluate(env)? as i64),
            Self::DecrementMetric(e) => Ok(e.evaluate(env)? as i64),
        }
    }
}

fn uint16(value: i32, what: &'static str) -> Result<u32, EvalError> {
    if (0..=0xffff).contains(&value) {
        Ok(value as u32)
    } else {
        Err(EvalError::ValueOutOfRange { what, value: value as i64 })
    }
}

/// Predicate over an integer value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntMatchExpr {
    /// `value <comparator> expr`
    IntComparison {
        /// Comparison operator
        comparator: IntComparator,
        /// Right hand side of the comparison
        expr: IntExpr,
    },
    /// Conjunction of predicates. An empty conjunction matches every value.
    IntMatchAll(Vec<IntMatchExpr>),
}

impl IntMatchExpr {
    /// Create a single comparison
    pub fn comparison(comparator: IntComparator, value: i32) -> Self {
        Self::IntComparison { comparator, expr: IntExpr::LiteralInt(value) }
    }

    /// Check if `value` satisfies the predicate
    pub fn matches(&self, value: i64, env: &Environment<'_>) -> Result<bool, EvalError> {
        match self {
            Self::IntComparison { comparator, expr } => {
                Ok(comparator.compare(value, expr.evaluate(env)? as i64))
            }
            Self::IntMatchAll(exprs) => {
                for e in exprs {
                    if !e.matches(value, env)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }
}
