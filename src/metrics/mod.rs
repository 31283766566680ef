pub mod types;

pub use types::StreamStatistics;

use crate::normalize::{Epic, OnTrackStatus};

/// Reduce a stream's normalized epics into delivery statistics.
/// Single pass, deterministic, order-insensitive.
///
/// Missing day deltas are summed as zero, which silently depresses the
/// averages when changelog data is incomplete. That matches the observed
/// dashboard behavior and is kept on purpose.
pub fn compute_stream_statistics(epics: &[Epic]) -> StreamStatistics {
    let total_epics = epics.len() as u64;
    let mut completed = 0u64;
    let mut in_progress = 0u64;
    let mut at_risk = 0u64;
    let mut not_started = 0u64;
    let mut committed_or_stretch = 0u64;
    let mut total_days_created_to_resolved = 0i64;
    let mut total_days_in_progress_to_closed = 0i64;

    for epic in epics {
        match epic.on_track_status {
            Some(OnTrackStatus::Complete) => completed += 1,
            Some(OnTrackStatus::InProgress) => in_progress += 1,
            Some(OnTrackStatus::AtRisk) => at_risk += 1,
            Some(OnTrackStatus::NotStarted) => not_started += 1,
            Some(OnTrackStatus::Other(_)) | None => {}
        }

        if matches!(
            epic.engineering_response.as_deref(),
            Some("Committed") | Some("Stretch")
        ) {
            committed_or_stretch += 1;
        }

        total_days_created_to_resolved += epic.days_created_to_resolved.unwrap_or(0);
        total_days_in_progress_to_closed += epic.days_in_progress_to_closed.unwrap_or(0);
    }

    let (percent_delivery_commitment, avg_age_of_epic_days, avg_fix_time_days) =
        if total_epics > 0 {
            (
                round2(committed_or_stretch as f64 / total_epics as f64 * 100.0),
                round2(total_days_created_to_resolved as f64 / total_epics as f64),
                round2(total_days_in_progress_to_closed as f64 / total_epics as f64),
            )
        } else {
            (0.0, 0.0, 0.0)
        };

    StreamStatistics {
        total_epics,
        completed,
        in_progress,
        at_risk,
        // No source field ever maps here.
        delayed: 0,
        not_started,
        percent_delivery_commitment,
        avg_age_of_epic_days,
        avg_fix_time_days,
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
