//! Prediction plan — title + options for the prediction service, and payout mapping.

use serde::Serialize;

use crate::outcome::Outcome;
use crate::record::MatchRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionPlan {
    pub title: String,
    pub options: Vec<String>,
}

impl PredictionPlan {
    /// "Serral vs Clem (BO4)" → [Serral, "2 - 2", Clem]; draw option only for even series.
    pub fn for_match(record: &MatchRecord) -> Self {
        let title = format!("{} vs {} (BO{})", record.team1(), record.team2(), record.bestof());

        let mut options = vec![record.team1().to_string()];
        if let Some(draw) = record.draw_label() {
            options.push(draw);
        }
        options.push(record.team2().to_string());

        Self { title, options }
    }

    /// Index of the option matching the outcome label, exact title match.
    pub fn winning_option(&self, outcome: &Outcome) -> Option<usize> {
        let label = outcome.label()?;
        self.options.iter().position(|o| o == label)
    }
}

pub fn describe_undetermined(record: &MatchRecord) -> String {
    format!(
        "Could not determine outcome, match may not be finished: {} {} - {} {}",
        record.team1(),
        record.score1(),
        record.team2(),
        record.score2(),
    )
}
