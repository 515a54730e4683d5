use crate::core::score::{parse_score, Side};
use crate::domain::model::{Match, MatchId, MatchStatus, StandingsRow, TeamId};
use std::collections::HashMap;
use std::fmt;

/// Direct results between pairs of rows: `(winner, loser) -> wins`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadToHead {
    wins: HashMap<(TeamId, TeamId), u32>,
}

impl HeadToHead {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, winner: TeamId, loser: TeamId) {
        *self.wins.entry((winner, loser)).or_insert(0) += 1;
    }

    /// How many times `winner` beat `loser`.
    pub fn wins(&self, winner: TeamId, loser: TeamId) -> u32 {
        self.wins.get(&(winner, loser)).copied().unwrap_or(0)
    }

    /// Decided meetings across all pairs.
    pub fn total(&self) -> u32 {
        self.wins.values().sum()
    }
}

/// Data-quality findings. None of these stop the computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    NotFinished { match_id: MatchId, status: MatchStatus },
    OutOfScope { match_id: MatchId, team_id: TeamId },
    SelfMatch { match_id: MatchId, team_id: TeamId },
    SameCompany { match_id: MatchId, company: String },
    MissingScore { match_id: MatchId },
    MalformedSets { match_id: MatchId, skipped: u32 },
    UnevenSetCount { match_id: MatchId, ignored: u32 },
    Undecided { match_id: MatchId },
}

impl Anomaly {
    pub fn match_id(&self) -> MatchId {
        match self {
            Anomaly::NotFinished { match_id, .. }
            | Anomaly::OutOfScope { match_id, .. }
            | Anomaly::SelfMatch { match_id, .. }
            | Anomaly::SameCompany { match_id, .. }
            | Anomaly::MissingScore { match_id }
            | Anomaly::MalformedSets { match_id, .. }
            | Anomaly::UnevenSetCount { match_id, .. }
            | Anomaly::Undecided { match_id } => *match_id,
        }
    }

    /// Whether the match was dropped entirely rather than counted with degraded data.
    pub fn excludes_match(&self) -> bool {
        matches!(
            self,
            Anomaly::NotFinished { .. }
                | Anomaly::OutOfScope { .. }
                | Anomaly::SelfMatch { .. }
                | Anomaly::SameCompany { .. }
        )
    }
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anomaly::NotFinished { match_id, status } => {
                write!(f, "match {} skipped: status is {}", match_id, status)
            }
            Anomaly::OutOfScope { match_id, team_id } => {
                write!(f, "match {} skipped: team {} is outside the ranked scope", match_id, team_id)
            }
            Anomaly::SelfMatch { match_id, team_id } => {
                write!(f, "match {} skipped: team {} is listed on both sides", match_id, team_id)
            }
            Anomaly::SameCompany { match_id, company } => {
                write!(f, "match {} skipped: both teams belong to '{}'", match_id, company)
            }
            Anomaly::MissingScore { match_id } => {
                write!(f, "match {} has no recorded score", match_id)
            }
            Anomaly::MalformedSets { match_id, skipped } => {
                write!(f, "match {}: {} set(s) could not be parsed", match_id, skipped)
            }
            Anomaly::UnevenSetCount { match_id, ignored } => write!(
                f,
                "match {}: {} trailing set token(s) without a counterpart were ignored",
                match_id, ignored
            ),
            Anomaly::Undecided { match_id } => {
                write!(f, "match {}: level on sets, no winner recorded", match_id)
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Tally {
    played: u32,
    wins: u32,
    losses: u32,
    sets_for: u32,
    sets_against: u32,
    games_for: u32,
    games_against: u32,
}

#[derive(Debug)]
struct Slot {
    key: TeamId,
    name: String,
    tally: Tally,
}

/// Per-call accumulator. Rows are registered up front as slots; team ids
/// are bound to a slot, so several teams can feed one row (company
/// rankings). Matches are then folded in one at a time.
#[derive(Debug, Default)]
pub struct MatchAggregator {
    slots: Vec<Slot>,
    index: HashMap<TeamId, usize>,
    head_to_head: HeadToHead,
    anomalies: Vec<Anomaly>,
}

/// What an aggregation pass leaves behind.
#[derive(Debug, Clone)]
pub struct Aggregation {
    /// Unsorted, in slot registration order; `points` still zero.
    pub rows: Vec<StandingsRow>,
    pub head_to_head: HeadToHead,
    pub anomalies: Vec<Anomaly>,
}

impl MatchAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new row keyed by `key` and returns its slot.
    pub fn add_slot(&mut self, key: TeamId, name: &str) -> usize {
        self.slots.push(Slot {
            key,
            name: name.to_string(),
            tally: Tally::default(),
        });
        self.slots.len() - 1
    }

    pub fn bind(&mut self, team_id: TeamId, slot: usize) {
        self.index.insert(team_id, slot);
    }

    pub fn slot_of(&self, team_id: TeamId) -> Option<usize> {
        self.index.get(&team_id).copied()
    }

    pub fn record(&mut self, game: &Match) {
        if !game.is_finished() {
            self.anomalies.push(Anomaly::NotFinished {
                match_id: game.id,
                status: game.status,
            });
            return;
        }

        if game.team_a.id == game.team_b.id {
            self.anomalies.push(Anomaly::SelfMatch {
                match_id: game.id,
                team_id: game.team_a.id,
            });
            return;
        }

        let slot_a = self.slot_of(game.team_a.id);
        let slot_b = self.slot_of(game.team_b.id);
        let (Some(slot_a), Some(slot_b)) = (slot_a, slot_b) else {
            let outsider = if slot_a.is_none() {
                game.team_a.id
            } else {
                game.team_b.id
            };
            self.anomalies.push(Anomaly::OutOfScope {
                match_id: game.id,
                team_id: outsider,
            });
            return;
        };

        if slot_a == slot_b {
            self.anomalies.push(Anomaly::SameCompany {
                match_id: game.id,
                company: self.slots[slot_a].name.clone(),
            });
            return;
        }

        let parsed = parse_score(game.score_a.as_deref(), game.score_b.as_deref());
        if parsed.missing {
            self.anomalies.push(Anomaly::MissingScore { match_id: game.id });
        }
        if parsed.skipped_sets > 0 {
            self.anomalies.push(Anomaly::MalformedSets {
                match_id: game.id,
                skipped: parsed.skipped_sets,
            });
        }
        if parsed.ignored_trailing > 0 {
            self.anomalies.push(Anomaly::UnevenSetCount {
                match_id: game.id,
                ignored: parsed.ignored_trailing,
            });
        }

        {
            let a = &mut self.slots[slot_a].tally;
            a.played += 1;
            a.sets_for += parsed.sets_a;
            a.sets_against += parsed.sets_b;
            a.games_for += parsed.games_a;
            a.games_against += parsed.games_b;
        }
        {
            let b = &mut self.slots[slot_b].tally;
            b.played += 1;
            b.sets_for += parsed.sets_b;
            b.sets_against += parsed.sets_a;
            b.games_for += parsed.games_b;
            b.games_against += parsed.games_a;
        }

        let (winner, loser) = match parsed.winner() {
            Some(Side::A) => (slot_a, slot_b),
            Some(Side::B) => (slot_b, slot_a),
            None => {
                if !parsed.missing {
                    self.anomalies.push(Anomaly::Undecided { match_id: game.id });
                }
                return;
            }
        };

        self.slots[winner].tally.wins += 1;
        self.slots[loser].tally.losses += 1;
        let (winner_key, loser_key) = (self.slots[winner].key, self.slots[loser].key);
        self.head_to_head.record(winner_key, loser_key);
    }

    pub fn finish(self) -> Aggregation {
        let rows = self
            .slots
            .into_iter()
            .map(|slot| StandingsRow {
                team_id: slot.key,
                name: slot.name,
                played: slot.tally.played,
                wins: slot.tally.wins,
                losses: slot.tally.losses,
                sets_for: slot.tally.sets_for,
                sets_against: slot.tally.sets_against,
                games_for: slot.tally.games_for,
                games_against: slot.tally.games_against,
                points: 0,
            })
            .collect();

        Aggregation {
            rows,
            head_to_head: self.head_to_head,
            anomalies: self.anomalies,
        }
    }
}
