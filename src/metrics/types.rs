use serde::Serialize;
use serde_json::json;

/// Per-stream delivery statistics over a set of normalized epics.
///
/// The dashboard consumes these as a fixed-order nine-element row; see
/// [`StreamStatistics::as_row`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StreamStatistics {
    pub total_epics: u64,
    pub completed: u64,
    pub in_progress: u64,
    pub at_risk: u64,
    /// No tracker field maps to this bucket today; always zero.
    pub delayed: u64,
    pub not_started: u64,
    /// Share of epics with a Committed or Stretch engineering response,
    /// in percent, rounded to two decimals.
    pub percent_delivery_commitment: f64,
    /// Mean days from creation to resolution, rounded to two decimals.
    pub avg_age_of_epic_days: f64,
    /// Mean days from first In Progress to first Closed transition,
    /// rounded to two decimals.
    pub avg_fix_time_days: f64,
}

impl StreamStatistics {
    /// The fixed-order row the front-end expects:
    /// [totalEpics, completed, inProgress, atRisk, delayed, notStarted,
    ///  percentDeliveryCommitment, avgAgeOfEpicDays, avgFixTimeDays].
    pub fn as_row(&self) -> Vec<serde_json::Value> {
        vec![
            json!(self.total_epics),
            json!(self.completed),
            json!(self.in_progress),
            json!(self.at_risk),
            json!(self.delayed),
            json!(self.not_started),
            json!(self.percent_delivery_commitment),
            json!(self.avg_age_of_epic_days),
            json!(self.avg_fix_time_days),
        ]
    }
}
