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

use routepol::codec;
use routepol::config::Configuration;
use routepol::expr::BooleanExpr;
use routepol::{BgpAttributes, BgpSessionProperties, Direction, Environment, Route};

use clap::{Parser, Subcommand};
use log::*;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn Error>> {
    // initialize the env logger
    pretty_env_logger::init();
    // run clap
    let args = CommandLineArguments::parse();

    // match on the action
    match args.cmd {
        MainCommand::Evaluate { scenario, policy, binary } => {
            let mut scenario: Scenario = codec::from_json(&fs::read_to_string(scenario)?)?;
            if binary {
                let bytes = codec::to_bytes(&scenario)?;
                info!("Scenario has {} bytes in binary form", bytes.len());
                scenario = codec::from_bytes(&bytes)?;
            }
            let expr = match policy {
                Some(name) => BooleanExpr::CallExpr(name),
                None => scenario.expr.clone(),
            };
            let env = scenario.environment();
            let result = expr.evaluate(&env)?;
            info!("Evaluation result: {:?}", result);
            println!("{}", if result.value() { "permit" } else { "deny" });
        }
        MainCommand::Simplify { expr } => {
            let expr: BooleanExpr = codec::from_json(&fs::read_to_string(expr)?)?;
            let simplified = expr.simplify();
            debug!("Simplified {:?} to {:?}", expr, simplified);
            println!("{}", codec::to_json(&simplified)?);
        }
    }

    Ok(())
}

/// Everything needed to evaluate a single expression against a single route.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Scenario {
    configuration: Configuration,
    route: Route,
    #[serde(default)]
    output_route: Option<Route>,
    #[serde(default)]
    intermediate_bgp_attributes: Option<BgpAttributes>,
    #[serde(default)]
    session: Option<BgpSessionProperties>,
    #[serde(default = "default_direction")]
    direction: Direction,
    #[serde(default)]
    source_vrf: Option<String>,
    #[serde(default)]
    default_policy: Option<String>,
    expr: BooleanExpr,
}

fn default_direction() -> Direction {
    Direction::In
}

impl Scenario {
    fn environment(&self) -> Environment<'_> {
        let mut builder = Environment::builder(&self.configuration, &self.route);
        builder.direction(self.direction);
        if let Some(route) = self.output_route.as_ref() {
            builder.output_route(route);
        }
        if let Some(attrs) = self.intermediate_bgp_attributes.as_ref() {
            builder.intermediate_bgp_attributes(attrs);
        }
        if let Some(session) = self.session.as_ref() {
            builder.bgp_session_properties(session);
        }
        if let Some(vrf) = self.source_vrf.as_ref() {
            builder.source_vrf(vrf);
        }
        if let Some(policy) = self.default_policy.as_ref() {
            builder.default_policy(policy);
        }
        builder.build()
    }
}

#[derive(Parser, Debug)]
#[clap(name = "Routepol", author = "Tibor Schneider")]
struct CommandLineArguments {
    /// Action to perform
    #[clap(subcommand)]
    cmd: MainCommand,
}

#[derive(Subcommand, Debug)]
enum MainCommand {
    /// Evaluate the expression of a scenario, and print `permit` or `deny`
    #[clap(name = "evaluate")]
    Evaluate {
        /// JSON file containing the scenario
        scenario: PathBuf,
        /// Evaluate the named routing policy of the configuration instead of the expression
        #[clap(short = 'p', long)]
        policy: Option<String>,
        /// Round-trip the scenario through the binary encoding before evaluating it
        #[clap(short = 'b', long)]
        binary: bool,
    },
    /// Simplify a boolean expression, and print it as JSON
    #[clap(name = "simplify")]
    Simplify {
        /// JSON file containing the expression
        expr: PathBuf,
    },
}
