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
use crate::bgp::{AsId, AsPath, AsSet, BgpAttributes};
use crate::config::Configuration;
use crate::environment::Environment;
use crate::expr::AsPathSetExpr::*;
use crate::expr::{AsPathAccessList, BooleanExpr, RegexAsPathSetElem};
use crate::route::Route;
use crate::types::LineAction::*;
use crate::types::{EvalError, PolicyRegex, RoutingProtocol, StructureKind};
use maplit::btreeset;

fn regex(pattern: &str) -> PolicyRegex {
    PolicyRegex::new(pattern).unwrap()
}

fn explicit(patterns: &[&str]) -> crate::expr::AsPathSetExpr {
    ExplicitAsPathSet(patterns.iter().map(|p| RegexAsPathSetElem(regex(p))).collect())
}

fn path(ases: &[u32]) -> AsPath {
    ases.iter().copied().collect()
}

#[test]
fn rendering() {
    assert_eq!(path(&[11, 12, 13]).to_string(), "11 12 13");
    assert_eq!(path(&[]).to_string(), "");
    let with_set = AsPath(vec![AsSet::of(1), AsSet(btreeset! {AsId(3), AsId(2)})]);
    assert_eq!(with_set.to_string(), "1 {2,3}");
}

#[test]
fn regex_boundary() {
    let c = Configuration::new("r1");
    let route = bgp_route(&[], &[]);
    let env = Environment::builder(&c, &route).build();

    let bounded = explicit(&[" 13$"]);
    assert_eq!(bounded.matches(&env, &path(&[11, 12, 13])), Ok(true));
    assert_eq!(bounded.matches(&env, &path(&[13, 113])), Ok(false));

    let unbounded = explicit(&["13$"]);
    assert_eq!(unbounded.matches(&env, &path(&[11, 12, 13])), Ok(true));
    assert_eq!(unbounded.matches(&env, &path(&[13, 113])), Ok(true));

    // any element may match
    let any = explicit(&["^1 ", "^2 "]);
    assert_eq!(any.matches(&env, &path(&[2, 3])), Ok(true));
    assert_eq!(any.matches(&env, &path(&[3, 2])), Ok(false));
    assert_eq!(explicit(&[]).matches(&env, &path(&[1])), Ok(false));
    assert_eq!(explicit(&["^$"]).matches(&env, &path(&[])), Ok(true));
}

#[test]
fn access_list_first_match() {
    let list = AsPathAccessList::new(vec![
        (Deny, regex("_?666$")),
        (Permit, regex("^65001 ")),
        (Permit, regex("^65002$")),
    ]);
    assert!(list.matches("65001 100"));
    assert!(!list.matches("65001 666"));
    assert!(list.matches("65002"));
    assert!(!list.matches("65003 100"));
    assert!(!AsPathAccessList::new(vec![]).matches("1"));
}

#[test]
fn named_set() {
    let mut c = Configuration::new("r1");
    let list = AsPathAccessList::new(vec![(Deny, regex("^1 ")), (Permit, regex("3$"))]);
    c.add_as_path_access_list("AL", list).unwrap();
    let route = bgp_route(&[], &[]);
    let env = Environment::builder(&c, &route).build();

    let named = NamedAsPathSet("AL".to_string());
    assert_eq!(named.matches(&env, &path(&[2, 3])), Ok(true));
    assert_eq!(named.matches(&env, &path(&[1, 3])), Ok(false));
    assert_eq!(named.matches(&env, &path(&[2, 4])), Ok(false));
    assert_eq!(
        NamedAsPathSet("OTHER".to_string()).matches(&env, &path(&[1])),
        Err(EvalError::UndefinedReference {
            kind: StructureKind::AsPathAccessList,
            name: "OTHER".to_string()
        })
    );
}

#[test]
fn match_as_path_predicate() {
    let c = Configuration::new("r1");
    let expr = BooleanExpr::MatchAsPath(explicit(&[" 13$"]));

    let route = bgp_route(&[11, 12, 13], &[]);
    let env = Environment::builder(&c, &route).build();
    assert!(expr.evaluate(&env).unwrap().value());

    // the output route takes precedence
    let output = bgp_route(&[13, 113], &[]);
    let env = Environment::builder(&c, &route).output_route(&output).build();
    assert!(!expr.evaluate(&env).unwrap().value());

    let route = Route::generic(prefix(), RoutingProtocol::Static, 1);
    let env = Environment::builder(&c, &route).build();
    assert!(!expr.evaluate(&env).unwrap().value());

    let route = Route::bgp(prefix(), BgpAttributes::default());
    let env = Environment::builder(&c, &route).build();
    assert!(!expr.evaluate(&env).unwrap().value());
}
