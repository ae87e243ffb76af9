//! Prediction Engine — match record, outcome resolution a prediction plan
//!
//! Všechno tady je čistá logika bez I/O:
//! - `record`  — raw SCCT pole → validovaný `MatchRecord` (+ odvozené hodnoty)
//! - `outcome` — `MatchRecord` → `Outcome` (Team1Win / Team2Win / Draw / Undetermined)
//! - `plan`    — title + options pro predikci a mapování výsledku na option

pub mod outcome;
pub mod plan;
pub mod record;

pub use outcome::{resolve, Outcome};
pub use plan::{describe_undetermined, PredictionPlan};
pub use record::{build, BuildError, MatchField, MatchRecord, RawFields};
