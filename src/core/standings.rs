use crate::core::aggregator::{Anomaly, HeadToHead, MatchAggregator};
use crate::core::tiebreak::sort_rows;
use crate::domain::model::{Match, RankingPolicy, StandingsRow, Team, TeamId};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StandingsError {
    #[error("team {team_id} appears more than once in the ranked scope")]
    DuplicateTeam { team_id: TeamId },
}

/// Ordered rows plus what was learned while building them.
#[derive(Debug, Clone)]
pub struct Standings {
    pub policy: RankingPolicy,
    pub rows: Vec<StandingsRow>,
    pub head_to_head: HeadToHead,
    pub anomalies: Vec<Anomaly>,
}

impl Standings {
    /// `(position, row)` with 1-based positions in ranked order.
    pub fn positions(&self) -> impl Iterator<Item = (usize, &StandingsRow)> {
        self.rows.iter().enumerate().map(|(i, row)| (i + 1, row))
    }
}

/// Stateless ranking engine. Every call builds its own accumulator, so one
/// engine can serve any number of threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandingsEngine {
    policy: RankingPolicy,
}

impl StandingsEngine {
    pub fn new(policy: RankingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> RankingPolicy {
        self.policy
    }

    pub fn compute(&self, teams: &[Team], matches: &[Match]) -> Result<Standings, StandingsError> {
        ensure_unique(teams)?;

        let mut aggregator = MatchAggregator::new();
        match self.policy {
            RankingPolicy::PoolHeadToHead => {
                for team in teams {
                    let slot = aggregator.add_slot(team.id, &team.name);
                    aggregator.bind(team.id, slot);
                }
            }
            RankingPolicy::CompanyPoints => {
                // 同名公司合併為一列，以第一個出現的隊伍 id 為鍵
                let mut companies: HashMap<&str, usize> = HashMap::new();
                for team in teams {
                    let slot = match companies.get(team.name.as_str()) {
                        Some(slot) => *slot,
                        None => {
                            let slot = aggregator.add_slot(team.id, &team.name);
                            companies.insert(team.name.as_str(), slot);
                            slot
                        }
                    };
                    aggregator.bind(team.id, slot);
                }
            }
        }

        for game in matches {
            aggregator.record(game);
        }

        let mut aggregation = aggregator.finish();
        let points_per_win = self.policy.points_per_win();
        for row in &mut aggregation.rows {
            row.points = row.wins * points_per_win;
        }
        sort_rows(&mut aggregation.rows, self.policy, &aggregation.head_to_head);

        Ok(Standings {
            policy: self.policy,
            rows: aggregation.rows,
            head_to_head: aggregation.head_to_head,
            anomalies: aggregation.anomalies,
        })
    }
}

/// Pool standings: one row per team, 1 point per win, head-to-head before
/// set and game differential. Rows come back in ranked order.
pub fn compute_standings(
    teams: &[Team],
    matches: &[Match],
) -> Result<Vec<StandingsRow>, StandingsError> {
    StandingsEngine::new(RankingPolicy::PoolHeadToHead)
        .compute(teams, matches)
        .map(|standings| standings.rows)
}

fn ensure_unique(teams: &[Team]) -> Result<(), StandingsError> {
    let mut seen = HashSet::with_capacity(teams.len());
    for team in teams {
        if !seen.insert(team.id) {
            return Err(StandingsError::DuplicateTeam { team_id: team.id });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn teams(names: &[&str]) -> Vec<Team> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| Team::new(i as i64 + 1, *name).in_pool(1))
            .collect()
    }

    fn ids(rows: &[StandingsRow]) -> Vec<i64> {
        rows.iter().map(|r| r.team_id).collect()
    }

    #[test]
    fn test_single_match_winner_first() {
        let t = teams(&["Acme", "Globex"]);
        let matches = vec![Match::finished(1, &t[1], &t[0], Some("6-4,6-3"), Some("4-6,3-6"))];

        let rows = compute_standings(&t, &matches).unwrap();

        assert_eq!(ids(&rows), vec![1, 2]);
        let winner = &rows[0];
        assert_eq!(winner.wins, 1);
        assert_eq!(winner.points, 1);
        assert_eq!((winner.sets_for, winner.sets_against), (2, 0));
        assert_eq!((winner.games_for, winner.games_against), (12, 7));
    }

    #[test]
    fn test_no_matches_keeps_every_team_in_input_order() {
        let t = teams(&["F", "B", "D", "A", "E", "C"]);
        let rows = compute_standings(&t, &[]).unwrap();

        assert_eq!(rows.len(), 6);
        assert_eq!(ids(&rows), vec![1, 2, 3, 4, 5, 6]);
        assert!(rows.iter().all(StandingsRow::is_blank));
    }

    #[test]
    fn test_duplicate_team_is_rejected() {
        let mut t = teams(&["Acme", "Globex"]);
        t.push(Team::new(2, "Globex again"));

        assert_eq!(
            compute_standings(&t, &[]).unwrap_err(),
            StandingsError::DuplicateTeam { team_id: 2 }
        );
    }

    #[test]
    fn test_company_policy_merges_same_name_and_scores_three_per_win() {
        let acme_one = Team::new(1, "Acme");
        let globex = Team::new(2, "Globex");
        let acme_two = Team::new(3, "Acme");
        let all = vec![acme_one.clone(), globex.clone(), acme_two.clone()];
        let matches = vec![
            Match::finished(1, &acme_one, &globex, Some("2-6,2-6"), Some("6-2,6-2")),
            Match::finished(2, &acme_two, &globex, Some("4-6,4-6"), Some("6-4,6-4")),
            Match::finished(3, &acme_one, &acme_two, Some("0-6"), Some("6-0")),
        ];

        let standings = StandingsEngine::new(RankingPolicy::CompanyPoints)
            .compute(&all, &matches)
            .unwrap();

        assert_eq!(standings.rows.len(), 2);
        let acme = &standings.rows[0];
        assert_eq!(acme.name, "Acme");
        assert_eq!(acme.team_id, 1);
        assert_eq!((acme.played, acme.wins, acme.points), (2, 2, 6));
        assert_eq!(standings.rows[1].losses, 2);
        assert_eq!(standings.anomalies.len(), 1);
        assert!(matches!(standings.anomalies[0], Anomaly::SameCompany { match_id: 3, .. }));
    }

    #[test]
    fn test_positions_are_one_based() {
        let t = teams(&["Acme", "Globex", "Initech"]);
        let standings = StandingsEngine::default().compute(&t, &[]).unwrap();

        let positions: Vec<usize> = standings.positions().map(|(p, _)| p).collect();
        assert_eq!(positions, vec![1, 2, 3]);
        assert_eq!(standings.policy, RankingPolicy::PoolHeadToHead);
    }
}
