//! Row ordering.
//!
//! Every level is its own function so it can be exercised alone. Pool
//! rankings chain points, head-to-head, set differential and game
//! differential; company rankings chain points, set differential, game
//! differential and name.
//!
//! Within an equal-points run, rows whose direct results form a cycle (A
//! beat B, B beat C, C beat A) skip the head-to-head level against each
//! other and fall through to the differentials, so the order inside a
//! cycle does not depend on input order. Head-to-head between rows that
//! are not on a common cycle can still disagree with the differentials, so
//! each run is settled with an insertion pass, which stays stable and
//! well-defined for any comparator.

use crate::core::aggregator::HeadToHead;
use crate::domain::model::{RankingPolicy, StandingsRow, TeamId};
use std::cmp::Ordering;
use std::collections::HashMap;

pub fn by_points(a: &StandingsRow, b: &StandingsRow) -> Ordering {
    b.points.cmp(&a.points)
}

/// More direct wins over the other row ranks first; `0 == 0` is a tie.
pub fn by_head_to_head(a: &StandingsRow, b: &StandingsRow, head_to_head: &HeadToHead) -> Ordering {
    let a_over_b = head_to_head.wins(a.team_id, b.team_id);
    let b_over_a = head_to_head.wins(b.team_id, a.team_id);
    b_over_a.cmp(&a_over_b)
}

pub fn by_set_diff(a: &StandingsRow, b: &StandingsRow) -> Ordering {
    b.set_diff().cmp(&a.set_diff())
}

pub fn by_game_diff(a: &StandingsRow, b: &StandingsRow) -> Ordering {
    b.game_diff().cmp(&a.game_diff())
}

pub fn by_name(a: &StandingsRow, b: &StandingsRow) -> Ordering {
    a.name.cmp(&b.name)
}

/// Head-to-head cycles among a set of rows. Each row on a cycle maps to
/// the cycle it belongs to; rows on no cycle are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cycles {
    cycle_of: HashMap<TeamId, usize>,
}

impl Cycles {
    /// An edge runs from `a` to `b` when `a` has more direct wins over `b`
    /// than the reverse. Two rows share a cycle when each reaches the other.
    pub fn find(rows: &[StandingsRow], head_to_head: &HeadToHead) -> Self {
        let n = rows.len();
        let mut reach: Vec<Vec<bool>> = rows
            .iter()
            .map(|a| {
                rows.iter()
                    .map(|b| by_head_to_head(a, b, head_to_head) == Ordering::Less)
                    .collect()
            })
            .collect();

        // transitive closure
        for k in 0..n {
            for i in 0..n {
                if !reach[i][k] {
                    continue;
                }
                for j in 0..n {
                    if reach[k][j] {
                        reach[i][j] = true;
                    }
                }
            }
        }

        // 以環中最小的索引作為環的編號
        let cycle_of = (0..n)
            .filter_map(|i| {
                (0..n)
                    .find(|&j| reach[i][j] && reach[j][i])
                    .map(|cycle| (rows[i].team_id, cycle))
            })
            .collect();

        Self { cycle_of }
    }

    pub fn together(&self, a: TeamId, b: TeamId) -> bool {
        matches!(
            (self.cycle_of.get(&a), self.cycle_of.get(&b)),
            (Some(x), Some(y)) if x == y
        )
    }
}

pub fn compare_pool(
    a: &StandingsRow,
    b: &StandingsRow,
    head_to_head: &HeadToHead,
    cycles: &Cycles,
) -> Ordering {
    by_points(a, b)
        .then_with(|| {
            if cycles.together(a.team_id, b.team_id) {
                Ordering::Equal
            } else {
                by_head_to_head(a, b, head_to_head)
            }
        })
        .then_with(|| by_set_diff(a, b))
        .then_with(|| by_game_diff(a, b))
}

pub fn compare_company(a: &StandingsRow, b: &StandingsRow) -> Ordering {
    by_points(a, b)
        .then_with(|| by_set_diff(a, b))
        .then_with(|| by_game_diff(a, b))
        .then_with(|| by_name(a, b))
}

pub fn sort_rows(rows: &mut [StandingsRow], policy: RankingPolicy, head_to_head: &HeadToHead) {
    match policy {
        RankingPolicy::PoolHeadToHead => sort_pool(rows, head_to_head),
        RankingPolicy::CompanyPoints => rows.sort_by(compare_company),
    }
}

pub fn sort_pool(rows: &mut [StandingsRow], head_to_head: &HeadToHead) {
    rows.sort_by(by_points);

    let mut start = 0;
    while start < rows.len() {
        let points = rows[start].points;
        let end = start
            + rows[start..]
                .iter()
                .take_while(|row| row.points == points)
                .count();
        let run = &mut rows[start..end];
        let cycles = Cycles::find(run, head_to_head);
        insertion_sort_by(run, |a, b| compare_pool(a, b, head_to_head, &cycles));
        start = end;
    }
}

/// A row only moves left past neighbours that compare strictly greater,
/// so equal rows keep their relative order and a sorted slice is untouched.
fn insertion_sort_by<T, F>(items: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && compare(&items[j - 1], &items[j]) == Ordering::Greater {
            items.swap(j - 1, j);
            j -= 1;
        }
    }
}
