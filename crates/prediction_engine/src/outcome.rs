//! Outcome resolution — pure function of the latest `MatchRecord`.

use serde::Serialize;

use crate::record::MatchRecord;

/// Výsledek série. `Undetermined` není chyba, jen "ještě nedohráno".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "label", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Team1Win(String),
    Team2Win(String),
    Draw(String),
    Undetermined,
}

impl Outcome {
    /// Canonical label of the winning side (team name or "d - d").
    pub fn label(&self) -> Option<&str> {
        match self {
            Outcome::Team1Win(label) | Outcome::Team2Win(label) | Outcome::Draw(label) => Some(label),
            Outcome::Undetermined => None,
        }
    }

    pub fn is_concluded(&self) -> bool {
        !matches!(self, Outcome::Undetermined)
    }

    /// Stable tag for the event log.
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Team1Win(_) => "TEAM1_WIN",
            Outcome::Team2Win(_) => "TEAM2_WIN",
            Outcome::Draw(_) => "DRAW",
            Outcome::Undetermined => "UNDETERMINED",
        }
    }
}

/// Order matters: team1 threshold, team2 threshold, draw, then undetermined.
pub fn resolve(record: &MatchRecord) -> Outcome {
    let winning_score = record.winning_score();

    if record.score1() >= winning_score {
        return Outcome::Team1Win(record.team1().to_string());
    }
    if record.score2() >= winning_score {
        return Outcome::Team2Win(record.team2().to_string());
    }

    let all_maps_played = record.score1() + record.score2() == record.bestof();
    if record.score1() == record.score2() && all_maps_played {
        if let Some(label) = record.draw_label() {
            return Outcome::Draw(label);
        }
    }

    Outcome::Undetermined
}
