use pool_standings::{
    compute_standings, Anomaly, Match, RankingPolicy, StandingsEngine, StandingsError, StandingsRow,
    Team,
};
use std::collections::HashMap;

fn pool(names: &[&str]) -> Vec<Team> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| Team::new(i as i64 + 1, *name).in_pool(1))
        .collect()
}

fn by_id(rows: &[StandingsRow]) -> HashMap<i64, &StandingsRow> {
    rows.iter().map(|row| (row.team_id, row)).collect()
}

fn order(rows: &[StandingsRow]) -> Vec<&str> {
    rows.iter().map(|row| row.name.as_str()).collect()
}

/// Two teams, one match: side B takes both sets, 12 games to 7.
#[test]
fn test_single_straight_sets_win() {
    let teams = pool(&["Acme", "Globex"]);
    let matches = vec![Match::finished(1, &teams[0], &teams[1], Some("6-4,6-3"), Some("4-6,3-6"))];

    let rows = compute_standings(&teams, &matches).unwrap();

    assert_eq!(order(&rows), vec!["Globex", "Acme"]);
    let winner = &rows[0];
    assert_eq!(winner.wins, 1);
    assert_eq!(winner.sets_for, 2);
    assert_eq!(winner.sets_against, 0);
    assert_eq!(winner.games_for, 12);
    assert_eq!(winner.games_against, 7);
}

/// X and Y finish level on wins; X won their direct meeting, so X ranks
/// above Y even though Y has the better set and game differential.
#[test]
fn test_head_to_head_beats_differentials() {
    let teams = pool(&["Y", "X", "Z", "W"]);
    let (y, x, z, w) = (&teams[0], &teams[1], &teams[2], &teams[3]);
    let matches = vec![
        // X edges Y in three sets
        Match::finished(1, x, y, Some("4-6,6-4,5-7"), Some("6-4,4-6,7-5")),
        // Y thrashes Z, X is thrashed by W
        Match::finished(2, y, z, Some("0-6,0-6"), Some("6-0,6-0")),
        Match::finished(3, w, x, Some("1-6,1-6"), Some("6-1,6-1")),
        Match::finished(4, w, z, Some("3-6,3-6"), Some("6-3,6-3")),
    ];

    let rows = compute_standings(&teams, &matches).unwrap();
    let stats = by_id(&rows);

    assert_eq!(stats[&x.id].points, 1);
    assert_eq!(stats[&y.id].points, 1);
    assert!(stats[&y.id].set_diff() > stats[&x.id].set_diff());
    assert!(stats[&y.id].game_diff() > stats[&x.id].game_diff());

    assert_eq!(order(&rows), vec!["W", "X", "Y", "Z"]);
}

/// Only the first set pair is usable; `XX` is skipped.
#[test]
fn test_malformed_token_is_skipped() {
    let teams = pool(&["A", "B"]);
    let matches = vec![Match::finished(1, &teams[0], &teams[1], Some("6-4,XX"), Some("4-6,6-3"))];

    let standings = StandingsEngine::default().compute(&teams, &matches).unwrap();
    let stats = by_id(&standings.rows);
    let (a, b) = (stats[&1], stats[&2]);

    assert_eq!((a.sets_for, b.sets_for), (0, 1));
    assert_eq!((a.games_for, b.games_for), (4, 6));
    assert_eq!(a.sets_for, b.sets_against);
    assert_eq!((b.wins, a.losses), (1, 1));
    assert_eq!(order(&standings.rows), vec!["B", "A"]);
    assert_eq!(
        standings.anomalies,
        vec![Anomaly::MalformedSets { match_id: 1, skipped: 1 }]
    );
}

#[test]
fn test_null_scores_count_as_played_without_result() {
    let teams = pool(&["A", "B"]);
    let matches = vec![Match::finished(1, &teams[0], &teams[1], None, None)];

    let rows = compute_standings(&teams, &matches).unwrap();

    assert_eq!(order(&rows), vec!["A", "B"]);
    for row in &rows {
        assert_eq!(row.played, 1);
        assert_eq!((row.wins, row.losses), (0, 0));
        assert_eq!((row.sets_for, row.sets_against, row.games_for, row.games_against), (0, 0, 0, 0));
    }
}

/// A beat B, B beat C, C beat A, all in straight sets. Every team has one
/// win and a level set count, so game differential decides: A +9, C -1,
/// B -8, whatever order the teams arrive in.
#[test]
fn test_head_to_head_cycle_falls_through_to_differentials() {
    let a = Team::new(1, "A").in_pool(1);
    let b = Team::new(2, "B").in_pool(1);
    let c = Team::new(3, "C").in_pool(1);
    let matches = vec![
        Match::finished(1, &a, &b, Some("0-6,0-6"), Some("6-0,6-0")),
        Match::finished(2, &b, &c, Some("4-6,4-6"), Some("6-4,6-4")),
        Match::finished(3, &c, &a, Some("5-7,6-7"), Some("7-5,7-6")),
    ];

    let inputs = [
        [&a, &b, &c],
        [&b, &c, &a],
        [&c, &a, &b],
        [&a, &c, &b],
        [&c, &b, &a],
        [&b, &a, &c],
    ];
    for input in inputs {
        let teams: Vec<Team> = input.into_iter().cloned().collect();
        let standings = StandingsEngine::default().compute(&teams, &matches).unwrap();
        let rows = &standings.rows;

        assert_eq!(order(rows), vec!["A", "C", "B"]);
        assert!(rows.iter().all(|r| r.points == 1 && r.set_diff() == 0));
        let diffs: Vec<i64> = rows.iter().map(|r| r.game_diff()).collect();
        assert_eq!(diffs, vec![9, -1, -8]);

        let mut resorted = rows.clone();
        pool_standings::core::tiebreak::sort_pool(&mut resorted, &standings.head_to_head);
        assert_eq!(&resorted, rows);
    }
}

#[test]
fn test_six_team_pool_without_matches() {
    let teams = pool(&["Falcons", "Bears", "Otters", "Ants", "Eagles", "Crows"]);

    let rows = compute_standings(&teams, &[]).unwrap();

    assert_eq!(rows.len(), 6);
    assert_eq!(order(&rows), vec!["Falcons", "Bears", "Otters", "Ants", "Eagles", "Crows"]);
    assert!(rows.iter().all(StandingsRow::is_blank));
}

/// A full round robin with assorted scores: row count, zero-stat rows,
/// symmetry, point ordering and idempotent sorting.
#[test]
fn test_round_robin_invariants() {
    let teams = pool(&["A", "B", "C", "D", "E", "F"]);
    let scores = [
        ("4-6,2-6", "6-4,6-2"),
        ("6-3,3-6,7-6", "3-6,6-3,6-7"),
        ("0-6", "6-0"),
        ("", "0-6"),
        ("5-7,XX,1-6", "7-5,6-3,6-1"),
        ("6-6", "6-6"),
    ];

    let mut matches = Vec::new();
    let mut id = 0;
    // F sits out entirely
    for i in 0..5 {
        for j in (i + 1)..5 {
            let (score_a, score_b) = scores[(i + j) % scores.len()];
            id += 1;
            matches.push(Match::finished(id, &teams[i], &teams[j], Some(score_a), Some(score_b)));
        }
    }
    let outsider = Team::new(42, "Outsider");
    matches.push(Match::finished(99, &teams[0], &outsider, Some("0-6"), Some("6-0")));

    let standings = StandingsEngine::default().compute(&teams, &matches).unwrap();
    let rows = &standings.rows;

    assert_eq!(rows.len(), teams.len());
    assert!(by_id(rows)[&6].is_blank());

    let sets_for: u32 = rows.iter().map(|r| r.sets_for).sum();
    let sets_against: u32 = rows.iter().map(|r| r.sets_against).sum();
    let games_for: u32 = rows.iter().map(|r| r.games_for).sum();
    let games_against: u32 = rows.iter().map(|r| r.games_against).sum();
    assert_eq!(sets_for, sets_against);
    assert_eq!(games_for, games_against);

    let wins: u32 = rows.iter().map(|r| r.wins).sum();
    let losses: u32 = rows.iter().map(|r| r.losses).sum();
    assert_eq!(wins, losses);
    assert_eq!(wins, standings.head_to_head.total());

    for pair in rows.windows(2) {
        assert!(pair[0].points >= pair[1].points);
    }

    let mut resorted = rows.clone();
    pool_standings::core::tiebreak::sort_pool(&mut resorted, &standings.head_to_head);
    assert_eq!(&resorted, rows);

    assert!(standings
        .anomalies
        .contains(&Anomaly::OutOfScope { match_id: 99, team_id: 42 }));
    assert_eq!(by_id(rows)[&1].played, 4);
}

#[test]
fn test_company_policy_points_and_alphabetical_tiebreak() {
    let teams = vec![
        Team::new(1, "Zenith"),
        Team::new(2, "Apex"),
        Team::new(3, "Mid"),
    ];
    let matches = vec![
        Match::finished(1, &teams[0], &teams[2], Some("3-6,3-6"), Some("6-3,6-3")),
        Match::finished(2, &teams[1], &teams[2], Some("3-6,3-6"), Some("6-3,6-3")),
    ];

    let standings = StandingsEngine::new(RankingPolicy::CompanyPoints)
        .compute(&teams, &matches)
        .unwrap();

    assert_eq!(order(&standings.rows), vec!["Apex", "Zenith", "Mid"]);
    assert_eq!(standings.rows[0].points, 3);
    assert_eq!(standings.rows[2].points, 0);
}

#[test]
fn test_duplicate_team_ids_are_an_input_error() {
    let teams = vec![Team::new(1, "A"), Team::new(1, "A again")];
    assert_eq!(
        compute_standings(&teams, &[]),
        Err(StandingsError::DuplicateTeam { team_id: 1 })
    );
}

#[test]
fn test_engine_is_shareable_across_threads() {
    let engine = StandingsEngine::default();
    let handles: Vec<_> = (0..4)
        .map(|pool_id| {
            std::thread::spawn(move || {
                let teams: Vec<Team> = (1..=6)
                    .map(|i| Team::new(pool_id * 10 + i, format!("T{}", i)).in_pool(pool_id))
                    .collect();
                let matches = vec![Match::finished(1, &teams[5], &teams[0], Some("1-6"), Some("6-1"))];
                engine.compute(&teams, &matches).unwrap().rows[0].name.clone()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), "T6");
    }
}
