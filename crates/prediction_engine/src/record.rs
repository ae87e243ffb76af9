//! Match record — validated snapshot of the current SCCT match.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Length of the series prefix in `bestof` ("BO5" → "5").
const BESTOF_PREFIX_LEN: usize = 2;

/// One exported SCCT field. Order of `ALL` is the validation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchField {
    Team1,
    Team2,
    BestOf,
    Score1,
    Score2,
    League,
}

impl MatchField {
    pub const ALL: [MatchField; 6] = [
        MatchField::Team1,
        MatchField::Team2,
        MatchField::BestOf,
        MatchField::Score1,
        MatchField::Score2,
        MatchField::League,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MatchField::Team1 => "team1",
            MatchField::Team2 => "team2",
            MatchField::BestOf => "bestof",
            MatchField::Score1 => "score1",
            MatchField::Score2 => "score2",
            MatchField::League => "league",
        }
    }
}

impl fmt::Display for MatchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw strings exactly as the source exported them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFields {
    pub team1: String,
    pub team2: String,
    pub bestof: String,
    pub score1: String,
    pub score2: String,
    pub league: String,
}

impl RawFields {
    pub fn get(&self, field: MatchField) -> &str {
        match field {
            MatchField::Team1 => &self.team1,
            MatchField::Team2 => &self.team2,
            MatchField::BestOf => &self.bestof,
            MatchField::Score1 => &self.score1,
            MatchField::Score2 => &self.score2,
            MatchField::League => &self.league,
        }
    }

    pub fn set(&mut self, field: MatchField, value: String) {
        match field {
            MatchField::Team1 => self.team1 = value,
            MatchField::Team2 => self.team2 = value,
            MatchField::BestOf => self.bestof = value,
            MatchField::Score1 => self.score1 = value,
            MatchField::Score2 => self.score2 = value,
            MatchField::League => self.league = value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("cannot parse {field}: {value:?}")]
    Parse { field: MatchField, value: String },

    #[error("invalid {field}: {reason}")]
    Validation { field: MatchField, reason: String },
}

impl BuildError {
    pub fn field(&self) -> MatchField {
        match self {
            BuildError::Parse { field, .. } | BuildError::Validation { field, .. } => *field,
        }
    }
}

/// Stav zápasu. Odvozené hodnoty (winning_score, draw) se vždy počítají z bestof.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MatchRecord {
    team1: String,
    team2: String,
    bestof: u32,
    score1: u32,
    score2: u32,
    league: String,
}

impl MatchRecord {
    pub fn new(
        team1: impl Into<String>,
        team2: impl Into<String>,
        bestof: u32,
        score1: u32,
        score2: u32,
        league: impl Into<String>,
    ) -> Result<Self, BuildError> {
        let team1 = require_name(MatchField::Team1, team1.into())?;
        let team2 = require_name(MatchField::Team2, team2.into())?;
        if bestof == 0 {
            return Err(BuildError::Validation {
                field: MatchField::BestOf,
                reason: "series length must be at least 1".to_string(),
            });
        }
        Ok(Self { team1, team2, bestof, score1, score2, league: league.into() })
    }

    pub fn team1(&self) -> &str {
        &self.team1
    }

    pub fn team2(&self) -> &str {
        &self.team2
    }

    pub fn bestof(&self) -> u32 {
        self.bestof
    }

    pub fn score1(&self) -> u32 {
        self.score1
    }

    pub fn score2(&self) -> u32 {
        self.score2
    }

    pub fn league(&self) -> &str {
        &self.league
    }

    /// Maps needed to take the series.
    pub fn winning_score(&self) -> u32 {
        self.bestof / 2 + 1
    }

    pub fn draw_possible(&self) -> bool {
        self.bestof % 2 == 0
    }

    /// Per-team score of a drawn series; `None` for odd series lengths.
    pub fn draw_score(&self) -> Option<u32> {
        self.draw_possible().then_some(self.bestof / 2)
    }

    /// "2 - 2" style label used both as prediction option and payout result.
    pub fn draw_label(&self) -> Option<String> {
        self.draw_score().map(|d| format!("{d} - {d}"))
    }
}

/// Raw fields → `MatchRecord`. Fail-fast: first bad field wins, the rest is not looked at.
pub fn build(raw: &RawFields) -> Result<MatchRecord, BuildError> {
    let team1 = require_name(MatchField::Team1, raw.team1.trim().to_string())?;
    let team2 = require_name(MatchField::Team2, raw.team2.trim().to_string())?;
    let bestof = parse_bestof(&raw.bestof)?;
    let score1 = parse_score(MatchField::Score1, &raw.score1)?;
    let score2 = parse_score(MatchField::Score2, &raw.score2)?;
    let league = raw.league.trim().to_string();

    MatchRecord::new(team1, team2, bestof, score1, score2, league)
}

fn require_name(field: MatchField, value: String) -> Result<String, BuildError> {
    if value.trim().is_empty() {
        return Err(BuildError::Validation { field, reason: "team name is empty".to_string() });
    }
    Ok(value)
}

fn parse_bestof(raw: &str) -> Result<u32, BuildError> {
    let trimmed = raw.trim();
    let parse_err = || BuildError::Parse { field: MatchField::BestOf, value: trimmed.to_string() };

    let digits = match trimmed.char_indices().nth(BESTOF_PREFIX_LEN) {
        Some((idx, _)) => &trimmed[idx..],
        None => return Err(parse_err()),
    };
    let bestof: u32 = digits.parse().map_err(|_| parse_err())?;

    if bestof == 0 {
        return Err(BuildError::Validation {
            field: MatchField::BestOf,
            reason: format!("series length must be at least 1, got {trimmed:?}"),
        });
    }
    Ok(bestof)
}

fn parse_score(field: MatchField, raw: &str) -> Result<u32, BuildError> {
    let trimmed = raw.trim();
    trimmed
        .parse()
        .map_err(|_| BuildError::Parse { field, value: trimmed.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(bestof: &str, score1: &str, score2: &str) -> RawFields {
        RawFields {
            team1: "Serral\n".to_string(),
            team2: "Clem".to_string(),
            bestof: bestof.to_string(),
            score1: score1.to_string(),
            score2: score2.to_string(),
            league: "EPT Cup".to_string(),
        }
    }

    #[test]
    fn derived_values_follow_series_length() {
        for bestof in 1..=15u32 {
            let record = MatchRecord::new("A", "B", bestof, 0, 0, "").unwrap();
            assert_eq!(record.winning_score(), bestof / 2 + 1);
            assert_eq!(record.draw_possible(), bestof % 2 == 0);
            if bestof % 2 == 0 {
                assert_eq!(record.draw_score(), Some(bestof / 2));
            } else {
                assert_eq!(record.draw_score(), None);
                assert_eq!(record.draw_label(), None);
            }
        }
    }

    #[test]
    fn builds_bo5_from_exported_text() {
        let record = build(&raw("BO5\n", "3", " 1 ")).unwrap();
        assert_eq!(record.team1(), "Serral");
        assert_eq!(record.bestof(), 5);
        assert_eq!(record.winning_score(), 3);
        assert!(!record.draw_possible());
        assert_eq!((record.score1(), record.score2()), (3, 1));
        assert_eq!(record.league(), "EPT Cup");
    }

    #[test]
    fn bo4_allows_draw() {
        let record = build(&raw("BO4", "2", "2")).unwrap();
        assert_eq!(record.winning_score(), 3);
        assert_eq!(record.draw_score(), Some(2));
        assert_eq!(record.draw_label().as_deref(), Some("2 - 2"));
    }

    #[test]
    fn non_numeric_bestof_is_parse_error() {
        let err = build(&raw("XY", "0", "0")).unwrap_err();
        assert_eq!(err, BuildError::Parse { field: MatchField::BestOf, value: "XY".to_string() });

        let err = build(&raw("BOx", "0", "0")).unwrap_err();
        assert!(matches!(err, BuildError::Parse { field: MatchField::BestOf, .. }));

        let err = build(&raw("B", "0", "0")).unwrap_err();
        assert!(matches!(err, BuildError::Parse { field: MatchField::BestOf, .. }));
    }

    #[test]
    fn zero_length_series_is_rejected() {
        let err = build(&raw("BO0", "0", "0")).unwrap_err();
        assert!(matches!(err, BuildError::Validation { field: MatchField::BestOf, .. }));
    }

    #[test]
    fn bad_scores_are_parse_errors() {
        let err = build(&raw("BO3", "-1", "0")).unwrap_err();
        assert_eq!(err.field(), MatchField::Score1);

        let err = build(&raw("BO3", "1", "two")).unwrap_err();
        assert_eq!(err, BuildError::Parse { field: MatchField::Score2, value: "two".to_string() });
    }

    #[test]
    fn first_invalid_field_wins() {
        let mut fields = raw("XY", "nope", "nope");
        fields.team2 = "   ".to_string();
        let err = build(&fields).unwrap_err();
        assert!(matches!(err, BuildError::Validation { field: MatchField::Team2, .. }));

        fields.team2 = "Clem".to_string();
        assert_eq!(build(&fields).unwrap_err().field(), MatchField::BestOf);
    }

    #[test]
    fn raw_fields_get_set_cover_every_field() {
        let mut fields = RawFields::default();
        for field in MatchField::ALL {
            fields.set(field, field.name().to_uppercase());
        }
        for field in MatchField::ALL {
            assert_eq!(fields.get(field), field.name().to_uppercase());
        }
    }
}
