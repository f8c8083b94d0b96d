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

use super::{bgp_route, prefix};
use crate::bgp::{Community, LargeCommunity, StandardCommunity};
use crate::config::Configuration;
use crate::environment::Environment;
use crate::expr::CommunityHalf::*;
use crate::expr::CommunitySetExpr::*;
use crate::expr::{BooleanExpr, CommunityHalvesExpr, CommunityList};
use crate::route::Route;
use crate::types::{EvalError, LineAction, NextHop, PolicyRegex, StructureKind};
use maplit::btreeset;
use std::collections::BTreeSet;

fn c(value: u32) -> Community {
    Community::standard(value)
}

fn set(values: &[u32]) -> BTreeSet<Community> {
    values.iter().map(|v| c(*v)).collect()
}

fn large() -> Community {
    Community::Large(LargeCommunity { global_admin: 65000, local_data_1: 1, local_data_2: 2 })
}

#[test]
fn literal_community() {
    let config = Configuration::new("r1");
    let route = bgp_route(&[], &[]);
    let env = Environment::builder(&config, &route).build();
    let expr = LiteralCommunity(c(1));

    assert_eq!(expr.match_community(&env, &c(1)), Ok(true));
    assert_eq!(expr.match_community(&env, &c(2)), Ok(false));
    assert_eq!(expr.match_communities(&env, &set(&[1, 2])), Ok(true));
    assert_eq!(expr.match_any_community(&env, &set(&[2, 3])), Ok(false));
    assert_eq!(expr.matched_communities(&env, &set(&[1, 2])), Ok(set(&[1])));
    assert_eq!(expr.as_literal_communities(&env), Ok(set(&[1])));
    assert!(expr.reducible());
    assert!(!expr.dynamic_match_community());
}

#[test]
fn literal_set_is_superset_test() {
    let config = Configuration::new("r1");
    let route = bgp_route(&[], &[]);
    let env = Environment::builder(&config, &route).build();
    let expr = LiteralCommunitySet(set(&[1, 3]));

    assert_eq!(expr.match_communities(&env, &set(&[1, 2, 3])), Ok(true));
    assert_eq!(expr.match_communities(&env, &set(&[1, 2])), Ok(false));
    assert_eq!(expr.match_community(&env, &c(3)), Ok(true));
    assert_eq!(expr.match_any_community(&env, &set(&[2, 3])), Ok(true));
    assert_eq!(expr.matched_communities(&env, &set(&[1, 2, 3])), Ok(set(&[1, 3])));
    assert_eq!(expr.as_literal_communities(&env), Ok(set(&[1, 3])));
}

#[test]
fn literal_conjunction() {
    let config = Configuration::new("r1");
    let route = bgp_route(&[], &[]);
    let env = Environment::builder(&config, &route).build();
    let expr = LiteralCommunityConjunction(set(&[1, 3]));

    assert_eq!(expr.match_communities(&env, &set(&[1])), Ok(false));
    assert_eq!(expr.match_communities(&env, &set(&[1, 3])), Ok(true));
    assert_eq!(expr.match_communities(&env, &set(&[1, 2, 3])), Ok(true));
    // a single community can never satisfy two requirements
    assert_eq!(expr.match_community(&env, &c(1)), Ok(false));
    assert_eq!(expr.match_any_community(&env, &set(&[1, 3])), Ok(false));
    assert_eq!(expr.matched_communities(&env, &set(&[1, 2, 3])), Ok(set(&[1, 3])));
    assert_eq!(expr.matched_communities(&env, &set(&[1, 2])), Ok(set(&[])));
    assert_eq!(expr.as_literal_communities(&env), Err(EvalError::NotReducible(expr.kind())));
    assert!(!expr.reducible());

    let single = LiteralCommunityConjunction(set(&[1]));
    assert_eq!(single.match_community(&env, &c(1)), Ok(true));
}

#[test]
fn empty_set() {
    let config = Configuration::new("r1");
    let route = bgp_route(&[], &[]);
    let env = Environment::builder(&config, &route).build();
    let expr = EmptyCommunitySet;

    assert_eq!(expr.match_community(&env, &c(1)), Ok(false));
    assert_eq!(expr.match_communities(&env, &set(&[1, 2])), Ok(false));
    assert_eq!(expr.match_communities(&env, &set(&[])), Ok(false));
    assert_eq!(expr.match_any_community(&env, &set(&[1])), Ok(false));
    assert_eq!(expr.matched_communities(&env, &set(&[1, 2])), Ok(set(&[])));
    assert_eq!(expr.as_literal_communities(&env), Ok(set(&[])));
    assert!(expr.reducible());
}

#[test]
fn regex_set() {
    let config = Configuration::new("r1");
    let route = bgp_route(&[], &[]);
    let env = Environment::builder(&config, &route).build();
    let expr = RegexCommunitySet(PolicyRegex::new("^65000:").unwrap());
    let candidates = btreeset! {Community::of(65000, 1), Community::of(65001, 1), large()};

    assert_eq!(expr.match_community(&env, &Community::of(65000, 10)), Ok(true));
    assert_eq!(expr.match_community(&env, &Community::of(6500, 10)), Ok(false));
    assert_eq!(expr.match_community(&env, &large()), Ok(false));
    assert_eq!(expr.match_communities(&env, &candidates), Ok(true));
    assert_eq!(
        expr.matched_communities(&env, &candidates),
        Ok(btreeset! {Community::of(65000, 1)})
    );
    let err = expr.as_literal_communities(&env).unwrap_err();
    assert!(err.is_not_reducible());
    assert!(expr.dynamic_match_community());

    let large_regex = RegexCommunitySet(PolicyRegex::new("^large:65000:").unwrap());
    assert_eq!(large_regex.match_any_community(&env, &candidates), Ok(true));
}

#[test]
fn community_halves() {
    let config = Configuration::new("r1");
    let route = bgp_route(&[], &[]);
    let env = Environment::builder(&config, &route).build();
    let expr = CommunityHalves(CommunityHalvesExpr::new(
        LiteralCommunityHalf(65000),
        RangeCommunityHalf(100, 199),
    ));

    assert_eq!(expr.match_community(&env, &Community::of(65000, 100)), Ok(true));
    assert_eq!(expr.match_community(&env, &Community::of(65000, 199)), Ok(true));
    assert_eq!(expr.match_community(&env, &Community::of(65000, 200)), Ok(false));
    assert_eq!(expr.match_community(&env, &Community::of(65001, 150)), Ok(false));
    assert_eq!(expr.match_community(&env, &large()), Ok(false));
    assert_eq!(
        expr.matched_communities(
            &env,
            &btreeset! {Community::of(65000, 1), Community::of(65000, 150), large()}
        ),
        Ok(btreeset! {Community::of(65000, 150)})
    );
    assert_eq!(expr.as_literal_communities(&env), Err(EvalError::NotReducible("CommunityHalves")));
}

#[test]
fn inline_set() {
    let config = Configuration::new("r1");
    let route = bgp_route(&[], &[]);
    let env = Environment::builder(&config, &route).build();
    let expr = InlineCommunitySet(vec![3, 1, 3]);

    assert_eq!(expr.as_literal_communities(&env), Ok(set(&[1, 3])));
    assert_eq!(expr.match_any_community(&env, &set(&[2, 3])), Ok(true));
    assert_eq!(expr.match_any_community(&env, &set(&[2, 4])), Ok(false));
    assert_eq!(expr.match_communities(&env, &set(&[1, 3, 4])), Ok(true));
    assert_eq!(expr.match_communities(&env, &set(&[1])), Ok(false));
}

#[test]
fn named_set() {
    let mut config = Configuration::new("r1");
    let list = CommunityList::new(vec![
        (LineAction::Deny, LiteralCommunity(c(2))),
        (LineAction::Permit, LiteralCommunitySet(set(&[1, 2, 3]))),
    ]);
    config.add_community_list("CL", list).unwrap();
    let route = bgp_route(&[], &[]);
    let env = Environment::builder(&config, &route).build();
    let expr = NamedCommunitySet("CL".to_string());

    assert_eq!(expr.match_community(&env, &c(1)), Ok(true));
    assert_eq!(expr.match_community(&env, &c(2)), Ok(false));
    assert_eq!(expr.match_community(&env, &c(4)), Ok(false));
    assert_eq!(expr.matched_communities(&env, &set(&[1, 2, 3, 4])), Ok(set(&[1, 3])));
    assert_eq!(expr.as_literal_communities(&env), Ok(set(&[1, 2, 3])));
    assert!(!expr.reducible());

    let undefined = NamedCommunitySet("OTHER".to_string());
    assert_eq!(
        undefined.match_community(&env, &c(1)),
        Err(EvalError::UndefinedReference {
            kind: StructureKind::CommunityList,
            name: "OTHER".to_string()
        })
    );
}

#[test]
fn match_community_set_predicate() {
    let config = Configuration::new("r1");
    let expr = BooleanExpr::MatchCommunitySet(LiteralCommunitySet(set(&[1, 3])));

    let route = bgp_route(&[], &[c(1), c(2), c(3)]);
    let env = Environment::builder(&config, &route).build();
    assert!(expr.evaluate(&env).unwrap().value());

    let route = bgp_route(&[], &[c(1)]);
    let env = Environment::builder(&config, &route).build();
    assert!(!expr.evaluate(&env).unwrap().value());

    let route = Route::static_route(prefix(), NextHop::Discard);
    let env = Environment::builder(&config, &route).build();
    assert!(!expr.evaluate(&env).unwrap().value());
}

#[test]
fn canonical_strings() {
    assert_eq!(Community::of(65000, 100).to_string(), "65000:100");
    assert_eq!(large().to_string(), "large:65000:1:2");
    assert_eq!("65000:100".parse::<StandardCommunity>().unwrap().0, (65000 << 16) | 100);
    assert!("65000:65536".parse::<StandardCommunity>().is_err());
}
