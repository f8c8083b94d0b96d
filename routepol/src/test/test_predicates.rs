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

use super::{bgp_route, ebgp_session, prefix, session};
use crate::bgp::{BgpAttributes, SessionType};
use crate::config::Configuration;
use crate::environment::Environment;
use crate::expr::*;
use crate::route::Route;
use crate::types::RoutingProtocol::*;
use crate::types::{ConstructionError, EvalError, NextHop, OspfMetricType};
use maplit::btreeset;

fn eval_on(expr: &BooleanExpr, route: &Route) -> Result<bool, EvalError> {
    let c = Configuration::new("r1");
    let env = Environment::builder(&c, route).build();
    Ok(expr.evaluate(&env)?.value())
}

#[test]
fn match_protocol() {
    let expr = BooleanExpr::MatchProtocol(MatchProtocol::new(vec![Bgp, Static]));
    assert_eq!(eval_on(&expr, &bgp_route(&[], &[])), Ok(true));
    assert_eq!(eval_on(&expr, &Route::static_route(prefix(), NextHop::Discard)), Ok(true));
    assert_eq!(eval_on(&expr, &Route::ibgp(prefix(), BgpAttributes::default())), Ok(false));
}

#[test]
fn match_protocol_isis_any() {
    let any = BooleanExpr::MatchProtocol(MatchProtocol::new(vec![IsisAny]));
    for level in vec![IsisL1, IsisL2, IsisEl1, IsisEl2] {
        assert_eq!(eval_on(&any, &Route::isis(prefix(), level)), Ok(true));
    }
    // the compound value does not contain itself
    assert_eq!(eval_on(&any, &Route::isis(prefix(), IsisAny)), Ok(false));
    assert_eq!(eval_on(&any, &Route::generic(prefix(), Ospf, 110)), Ok(false));

    let l1 = BooleanExpr::MatchProtocol(MatchProtocol::new(vec![IsisL1]));
    assert_eq!(eval_on(&l1, &Route::isis(prefix(), IsisL2)), Ok(false));
}

#[test]
fn match_bgp_session_type() {
    let c = Configuration::new("r1");
    let route = bgp_route(&[], &[]);
    let ebgp = MatchBgpSessionType::new(vec![BgpSessionMatchType::Ebgp]).unwrap();
    let ibgp = MatchBgpSessionType::new(vec![BgpSessionMatchType::Ibgp]).unwrap();
    let both =
        MatchBgpSessionType::new(vec![BgpSessionMatchType::Ibgp, BgpSessionMatchType::Ebgp])
            .unwrap();

    let ebgp_types =
        vec![SessionType::EbgpSinglehop, SessionType::EbgpMultihop, SessionType::EbgpUnnumbered];
    for t in ebgp_types {
        let s = session(t);
        let env = Environment::builder(&c, &route).bgp_session_properties(&s).build();
        assert_eq!(ebgp.evaluate(&env), Ok(true));
        assert_eq!(ibgp.evaluate(&env), Ok(false));
        assert_eq!(both.evaluate(&env), Ok(true));
    }
    for t in vec![SessionType::Ibgp, SessionType::IbgpUnnumbered] {
        let s = session(t);
        let env = Environment::builder(&c, &route).bgp_session_properties(&s).build();
        assert_eq!(ebgp.evaluate(&env), Ok(false));
        assert_eq!(ibgp.evaluate(&env), Ok(true));
    }

    let s = session(SessionType::Unset);
    let env = Environment::builder(&c, &route).bgp_session_properties(&s).build();
    assert_eq!(both.evaluate(&env), Err(EvalError::UnsetSessionType));

    let env = Environment::builder(&c, &route).build();
    assert_eq!(ebgp.evaluate(&env), Err(EvalError::MissingSessionProperties));

    assert_eq!(MatchBgpSessionType::new(vec![]), Err(ConstructionError::EmptySessionTypes));
}

#[test]
fn match_cluster_list_length() {
    let at_least_two = BooleanExpr::MatchClusterListLength(MatchClusterListLength::new(
        IntComparator::Ge,
        IntExpr::LiteralInt(2),
    ));
    let is_zero = BooleanExpr::MatchClusterListLength(MatchClusterListLength::new(
        IntComparator::Eq,
        IntExpr::LiteralInt(0),
    ));
    let attrs = BgpAttributes {
        cluster_list: Some(btreeset! {"1.1.1.1".parse().unwrap(), "2.2.2.2".parse().unwrap()}),
        ..Default::default()
    };
    let reflected = Route::ibgp(prefix(), attrs);
    assert_eq!(eval_on(&at_least_two, &reflected), Ok(true));
    assert_eq!(eval_on(&is_zero, &reflected), Ok(false));

    // absent cluster list, and non-BGP routes, have length 0
    assert_eq!(eval_on(&is_zero, &bgp_route(&[], &[])), Ok(true));
    assert_eq!(eval_on(&is_zero, &Route::generic(prefix(), Ospf, 110)), Ok(true));
    assert_eq!(eval_on(&at_least_two, &bgp_route(&[], &[])), Ok(false));
}

#[test]
fn match_ospf_external_type() {
    let any = BooleanExpr::MatchOspfExternalType(MatchOspfExternalType(None));
    let e1 = BooleanExpr::MatchOspfExternalType(MatchOspfExternalType(Some(OspfMetricType::E1)));
    let e1_route = Route::ospf_external(prefix(), OspfMetricType::E1);
    let e2_route = Route::ospf_external(prefix(), OspfMetricType::E2);
    let intra_area = Route::generic(prefix(), Ospf, 110);

    assert_eq!(eval_on(&any, &e1_route), Ok(true));
    assert_eq!(eval_on(&any, &e2_route), Ok(true));
    assert_eq!(eval_on(&any, &intra_area), Ok(false));
    assert_eq!(eval_on(&e1, &e1_route), Ok(true));
    assert_eq!(eval_on(&e1, &e2_route), Ok(false));
    assert_eq!(eval_on(&e1, &bgp_route(&[], &[])), Ok(false));
}

#[test]
fn match_interfaces() {
    let connected = Route::connected(prefix(), "eth0");
    let mut received = bgp_route(&[], &[]);
    received.source_interface = Some("eth1".to_string());

    let egress = BooleanExpr::MatchInterface(MatchInterface::new(vec!["eth0", "eth2"]));
    assert_eq!(eval_on(&egress, &connected), Ok(true));
    assert_eq!(eval_on(&egress, &received), Ok(false));
    let ip_next_hop = Route::static_route(prefix(), NextHop::Ip("10.0.0.2".parse().unwrap()));
    assert_eq!(eval_on(&egress, &ip_next_hop), Ok(false));

    let ingress = BooleanExpr::MatchSourceInterface(MatchSourceInterface::new("eth1"));
    assert_eq!(eval_on(&ingress, &received), Ok(true));
    assert_eq!(eval_on(&ingress, &connected), Ok(false));
}

#[test]
fn match_process_asn() {
    let expr = BooleanExpr::MatchProcessAsn(MatchProcessAsn::new(vec![1, 2]));
    assert_eq!(eval_on(&expr, &Route::eigrp(prefix(), 1)), Ok(true));
    assert_eq!(eval_on(&expr, &Route::eigrp_external(prefix(), 2)), Ok(true));
    assert_eq!(eval_on(&expr, &Route::eigrp(prefix(), 3)), Ok(false));
    assert_eq!(eval_on(&expr, &bgp_route(&[1], &[])), Ok(false));
}

#[test]
fn match_source_protocol_and_vrf() {
    let c = Configuration::new("r1");
    let attrs = BgpAttributes { src_protocol: Some(OspfE2), ..Default::default() };
    let redistributed = Route::bgp(prefix(), attrs);
    let plain = bgp_route(&[], &[]);

    let expr = BooleanExpr::MatchSourceProtocol(MatchSourceProtocol::new(vec![OspfE1, OspfE2]));
    assert_eq!(eval_on(&expr, &redistributed), Ok(true));
    assert_eq!(eval_on(&expr, &plain), Ok(false));

    let expr = BooleanExpr::MatchSourceVrf(MatchSourceVrf::new("blue"));
    let env = Environment::builder(&c, &plain).source_vrf("blue").build();
    assert!(expr.evaluate(&env).unwrap().value());
    let env = Environment::builder(&c, &plain).source_vrf("red").vrf("blue").build();
    assert!(!expr.evaluate(&env).unwrap().value());
    let env = Environment::builder(&c, &plain).build();
    assert_eq!(env.vrf(), "default");
    assert!(!expr.evaluate(&env).unwrap().value());
}

#[test]
fn match_tag_and_metric() {
    let mut route = Route::generic(prefix(), Ospf, 110);
    route.tag = 100;
    route.metric = 20;

    let tag = BooleanExpr::MatchTag(MatchTag::new(IntComparator::Eq, LongExpr::LiteralLong(100)));
    assert_eq!(eval_on(&tag, &route), Ok(true));
    let tag = BooleanExpr::MatchTag(MatchTag::new(IntComparator::Gt, LongExpr::LiteralLong(100)));
    assert_eq!(eval_on(&tag, &route), Ok(false));

    let metric = BooleanExpr::MatchMetric(IntMatchExpr::comparison(IntComparator::Le, 20));
    assert_eq!(eval_on(&metric, &route), Ok(true));
    let metric = BooleanExpr::MatchMetric(IntMatchExpr::comparison(IntComparator::Lt, 20));
    assert_eq!(eval_on(&metric, &route), Ok(false));
}

#[test]
fn next_hop_expressions() {
    let c = Configuration::new("r1");
    let s = ebgp_session();
    let route = Route::static_route(prefix(), NextHop::Ip("192.168.0.1".parse().unwrap()));
    let env = Environment::builder(&c, &route).bgp_session_properties(&s).build();

    let ip = |addr: &str| Some(NextHop::Ip(addr.parse().unwrap()));
    assert_eq!(NextHopExpr::DiscardNextHop.evaluate(&env), Ok(Some(NextHop::Discard)));
    assert_eq!(NextHopExpr::SelfNextHop.evaluate(&env), Ok(ip("10.0.0.1")));
    assert_eq!(NextHopExpr::PeerAddressNextHop.evaluate(&env), Ok(ip("10.0.0.2")));
    assert_eq!(NextHopExpr::UnchangedNextHop.evaluate(&env), Ok(ip("192.168.0.1")));
    let literal = NextHopExpr::IpNextHop("1.2.3.4".parse().unwrap());
    assert_eq!(literal.evaluate(&env), Ok(ip("1.2.3.4")));

    let env = Environment::builder(&c, &route).build();
    assert_eq!(NextHopExpr::SelfNextHop.evaluate(&env), Err(EvalError::MissingSessionProperties));
}
