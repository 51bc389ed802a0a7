//! Roster selection scenarios and properties

use chrono::Utc;
use proptest::prelude::*;

use crate::{Player, PlayerId, Roster, RosterError, RosterSelector, RosterState};

fn golfer(id: &str, points: f64) -> Player {
    Player::new(id, format!("Golfer {id}"), "USA", 10, points)
}

fn build(selector: &RosterSelector, points: &[f64]) -> Roster {
    let mut roster = Roster::new();
    for (i, p) in points.iter().enumerate() {
        selector.add(&golfer(&format!("r{i}"), *p), &mut roster).unwrap();
    }
    roster
}

#[cfg(test)]
mod scenario_tests {
    use super::*;

    #[test]
    fn test_eight_players_within_budget_are_submittable() {
        let selector = RosterSelector::default();
        let mut roster = Roster::new();
        for i in 0..8 {
            selector.add(&golfer(&format!("a{i}"), 4.0), &mut roster).unwrap();
        }
        assert_eq!(roster.total_points(), 32.0);
        assert!(selector.is_submittable(&roster));
        assert_eq!(roster.state(&selector.rules), RosterState::Submittable);
    }

    #[test]
    fn test_eighth_player_over_budget_is_rejected() {
        let selector = RosterSelector::default();
        let mut roster = build(&selector, &[5.0, 5.0, 5.0, 5.0, 5.0, 4.0, 4.0]);
        assert_eq!(roster.total_points(), 33.0);
        let before = roster.clone();

        let err = selector.add(&golfer("b8", 3.0), &mut roster).unwrap_err();
        assert!(matches!(err, RosterError::BudgetExceeded { total, limit } if total == 36.0 && limit == 35.0));
        assert_eq!(roster, before);
        assert_eq!(roster.len(), 7);
    }

    #[test]
    fn test_ninth_player_is_rejected() {
        let selector = RosterSelector::default();
        let mut roster = build(&selector, &[1.0; 8]);

        let err = selector.add(&golfer("c9", 0.5), &mut roster).unwrap_err();
        assert_eq!(err, RosterError::CapacityExceeded { max_players: 8 });
        assert_eq!(roster.len(), 8);
    }

    #[test]
    fn test_restricted_mode_blocks_started_replacement() {
        let selector = RosterSelector::default().with_restricted_mode(true);
        let mut roster = Roster::new();
        let x = golfer("x", 3.0).with_started(true);
        selector.add(&x, &mut roster).unwrap();
        selector.add(&golfer("other", 10.0), &mut roster).unwrap();
        let before = roster.clone();

        let y = golfer("y", 3.0).with_started(true);
        let err = selector.replace(&x.id, &y, &mut roster).unwrap_err();
        assert_eq!(err, RosterError::RestrictedReplacement { player_id: PlayerId::new("y") });
        assert_eq!(roster, before);
    }

    #[test]
    fn test_restricted_mode_allows_unstarted_replacement() {
        let selector = RosterSelector::default().with_restricted_mode(true);
        let mut roster = Roster::new();
        let x = golfer("x", 3.0).with_started(true);
        selector.add(&x, &mut roster).unwrap();
        selector.add(&golfer("other", 10.0), &mut roster).unwrap();
        let old_stamp = roster.get(&x.id).unwrap().selected_at;

        let y = golfer("y", 4.0);
        let started = Utc::now();
        let outgoing = selector.replace(&x.id, &y, &mut roster).unwrap();

        assert_eq!(outgoing.player.id, x.id);
        assert!(!roster.contains(&x.id));
        let entry = roster.get(&y.id).unwrap();
        assert!(entry.selected_at >= started);
        assert!(entry.selected_at >= old_stamp);
        assert_eq!(roster.total_points(), 14.0);
    }
}

fn points_strategy() -> impl Strategy<Value = f64> + Clone {
    // quarter-point steps keep sums exact
    (0u32..=48).prop_map(|q| f64::from(q) * 0.25)
}

fn feed_points_strategy() -> impl Strategy<Value = f64> + Clone {
    // three-decimal costs like the ranking feed's averages
    (0u32..=12_000).prop_map(|m| f64::from(m) / 1000.0)
}

#[derive(Debug, Clone)]
enum Op {
    Add(u8, f64),
    Remove(u8),
    Replace(u8, u8, f64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    ops_with(points_strategy())
}

fn ops_with(points: impl Strategy<Value = f64> + Clone) -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..16, points.clone()).prop_map(|(id, p)| Op::Add(id, p)),
        (0u8..16).prop_map(Op::Remove),
        (0u8..16, 0u8..16, points).prop_map(|(o, n, p)| Op::Replace(o, n, p)),
    ]
}

proptest! {
    #[test]
    fn prop_can_add_matches_definition(
        existing in proptest::collection::vec(points_strategy(), 0..10),
        candidate_points in points_strategy(),
        reuse_id in any::<bool>(),
    ) {
        let selector = RosterSelector::default();
        let mut roster = Roster::new();
        for (i, p) in existing.iter().enumerate() {
            let _ = selector.add(&golfer(&format!("r{i}"), *p), &mut roster);
        }
        let id = if reuse_id && !roster.is_empty() { "r0".to_string() } else { "fresh".to_string() };
        let candidate = golfer(&id, candidate_points);

        let expected = roster.len() < 8
            && !roster.contains(&candidate.id)
            && roster.total_points() + candidate.points <= 35.0;
        prop_assert_eq!(selector.can_add(&candidate, &roster), expected);
    }

    #[test]
    fn prop_add_then_remove_restores_roster(
        existing in proptest::collection::vec(points_strategy(), 0..7),
        candidate_points in points_strategy(),
    ) {
        let selector = RosterSelector::new(crate::RosterRules { max_players: 8, max_points: 1000.0 });
        let roster = build(&selector, &existing);
        let candidate = golfer("new", candidate_points);

        let mut edited = roster.clone();
        selector.add(&candidate, &mut edited).unwrap();
        selector.remove(&candidate.id, &mut edited).unwrap();
        prop_assert_eq!(edited, roster);
    }

    #[test]
    fn prop_operations_preserve_invariants(ops in proptest::collection::vec(op_strategy(), 0..60)) {
        let selector = RosterSelector::default();
        let mut roster = Roster::new();

        for op in ops {
            let before = roster.len();
            match op {
                Op::Add(id, p) => {
                    let ok = selector.add(&golfer(&format!("g{id}"), p), &mut roster).is_ok();
                    prop_assert!(roster.len() >= before);
                    prop_assert_eq!(roster.len(), before + usize::from(ok));
                }
                Op::Remove(id) => {
                    let _ = selector.remove(&PlayerId::new(format!("g{id}")), &mut roster);
                    prop_assert!(roster.len() <= before);
                }
                Op::Replace(out, new, p) => {
                    let _ = selector.replace(
                        &PlayerId::new(format!("g{out}")),
                        &golfer(&format!("g{new}"), p),
                        &mut roster,
                    );
                    prop_assert_eq!(roster.len(), before);
                }
            }

            prop_assert!(roster.len() <= 8);
            prop_assert!(roster.total_points() <= 35.0);
            let mut ids: Vec<_> = roster.player_ids().cloned().collect();
            ids.sort();
            ids.dedup();
            prop_assert_eq!(ids.len(), roster.len());
        }
    }

    #[test]
    fn prop_feed_costs_never_exceed_budget(
        ops in proptest::collection::vec(ops_with(feed_points_strategy()), 0..80),
    ) {
        let selector = RosterSelector::default();
        let mut roster = Roster::new();

        for op in ops {
            let accepted = match op {
                Op::Add(id, p) => selector.add(&golfer(&format!("g{id}"), p), &mut roster).is_ok(),
                Op::Remove(id) => selector.remove(&PlayerId::new(format!("g{id}")), &mut roster).is_ok(),
                Op::Replace(out, new, p) => selector
                    .replace(&PlayerId::new(format!("g{out}")), &golfer(&format!("g{new}"), p), &mut roster)
                    .is_ok(),
            };
            if accepted {
                prop_assert!(roster.total_points() <= 35.0, "total {} over budget", roster.total_points());
            }
            if roster.len() == 8 {
                prop_assert!(selector.is_submittable(&roster));
            }
        }
    }

    #[test]
    fn prop_replace_at_the_edge_keeps_budget(
        costs in proptest::collection::vec(feed_points_strategy(), 8),
        slot in 0usize..8,
    ) {
        let loose = RosterSelector::new(crate::RosterRules { max_players: 8, max_points: 1000.0 });
        let roster = build(&loose, &costs);
        prop_assume!(roster.total_points() <= 35.0);

        // largest incoming cost the naive arithmetic would allow
        let headroom = 35.0 - (roster.total_points() - costs[slot]);
        let selector = RosterSelector::default();
        let outgoing = PlayerId::new(format!("r{slot}"));
        for incoming in [headroom, (headroom * 1000.0).floor() / 1000.0] {
            if !(0.0..=1000.0).contains(&incoming) {
                continue;
            }
            let mut edited = roster.clone();
            if selector.replace(&outgoing, &golfer("edge", incoming), &mut edited).is_ok() {
                prop_assert!(edited.total_points() <= 35.0);
                prop_assert!(selector.is_submittable(&edited));
            }
        }
    }

    #[test]
    fn prop_submittable_definition(points in proptest::collection::vec(points_strategy(), 0..10)) {
        // wide budget while building so over-budget full rosters are reachable
        let loose = RosterSelector::new(crate::RosterRules { max_players: 8, max_points: 1000.0 });
        let mut roster = Roster::new();
        for (i, p) in points.iter().enumerate() {
            let _ = loose.add(&golfer(&format!("r{i}"), *p), &mut roster);
        }

        let selector = RosterSelector::default();
        let expected = roster.len() == 8 && roster.total_points() <= 35.0;
        prop_assert_eq!(selector.is_submittable(&roster), expected);
        prop_assert_eq!(selector.submit(&mut roster.clone()).is_ok(), expected);
    }
}
