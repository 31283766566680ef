use crate::date_util::{days_between, parse_timestamp};
use crate::jira::models::{Changelog, Issue, SelectValue};

/// Derived delivery-health classification for an epic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnTrackStatus {
    /// "Blue (Complete)" — also forced whenever the ticket status is
    /// Done, Closed, or Resolved.
    Complete,
    InProgress,
    AtRisk,
    NotStarted,
    /// Any other dropdown value (Yellow, Red, ...); counted in no
    /// statistics bucket.
    Other(String),
}

impl OnTrackStatus {
    pub fn from_raw(value: &str) -> Self {
        match value {
            "Blue (Complete)" => OnTrackStatus::Complete,
            "In Progress" => OnTrackStatus::InProgress,
            "At Risk" => OnTrackStatus::AtRisk,
            "Not Started" => OnTrackStatus::NotStarted,
            other => OnTrackStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            OnTrackStatus::Complete => "Blue (Complete)",
            OnTrackStatus::InProgress => "In Progress",
            OnTrackStatus::AtRisk => "At Risk",
            OnTrackStatus::NotStarted => "Not Started",
            OnTrackStatus::Other(value) => value,
        }
    }
}

/// The flat internal record every raw issue normalizes to. Each field has
/// a defined fallback (None or empty string) so aggregation never fails on
/// missing data.
#[derive(Debug, Clone, Default)]
pub struct Epic {
    pub issue_id: String,
    pub summary: String,
    pub product: Option<String>,
    pub track: Option<String>,
    pub on_track_comment: String,
    pub on_track_status: Option<OnTrackStatus>,
    pub engineering_response: Option<String>,
    pub release_type: Option<String>,
    pub revised_completed_date: Option<String>,
    pub created_date: Option<String>,
    pub resolved_date: Option<String>,
    /// First status transition to "In Progress" in the changelog.
    pub in_progress_date: Option<String>,
    /// First status transition to "Closed" in the changelog.
    pub closed_date: Option<String>,
    pub days_created_to_resolved: Option<i64>,
    pub days_in_progress_to_closed: Option<i64>,
}

/// Map a raw search hit onto the flat record. Pure; transition dates come
/// later from [`apply_transition_dates`] since search results carry no
/// changelog.
pub fn normalize(issue: &Issue) -> Epic {
    let fields = &issue.fields;

    let status_name = fields
        .status
        .as_ref()
        .and_then(|s| s.name.as_deref())
        .unwrap_or("");

    // Precedence chain across the three on-track field generations; a
    // terminal ticket status overrides whatever the dropdowns say.
    let mut on_track_status = select_chain(&[
        &fields.on_track,
        &fields.on_track_migrated,
        &fields.on_track_legacy,
    ])
    .map(|value| OnTrackStatus::from_raw(&value));

    if matches!(status_name, "Done" | "Closed" | "Resolved") {
        on_track_status = Some(OnTrackStatus::Complete);
    }

    let engineering_response = select_chain(&[
        &fields.engineering_response,
        &fields.engineering_response_migrated,
    ]);

    Epic {
        issue_id: issue.key.clone(),
        summary: fields.summary.clone().unwrap_or_default(),
        product: first_of_multi(&fields.product),
        track: first_of_multi(&fields.track),
        on_track_comment: issue
            .rendered_fields
            .on_track_comment
            .clone()
            .unwrap_or_default(),
        on_track_status,
        engineering_response,
        release_type: select_value(&fields.release_type),
        revised_completed_date: select_value(&fields.revised_completed_date),
        ..Epic::default()
    }
}

/// Fill in the changelog-derived dates and day deltas from a detail fetch.
/// A delta stays None when either endpoint is missing or unparsable.
pub fn apply_transition_dates(epic: &mut Epic, detail: &Issue) {
    epic.created_date = detail.fields.created.clone();
    epic.resolved_date = detail.fields.resolution_date.clone();

    if let Some(changelog) = &detail.changelog {
        epic.in_progress_date = first_transition(changelog, "In Progress");
        epic.closed_date = first_transition(changelog, "Closed");
    }

    epic.days_created_to_resolved =
        day_delta(epic.created_date.as_deref(), epic.resolved_date.as_deref());
    epic.days_in_progress_to_closed = day_delta(
        epic.in_progress_date.as_deref(),
        epic.closed_date.as_deref(),
    );
}

/// Timestamp of the first status transition to `target`, if any.
fn first_transition(changelog: &Changelog, target: &str) -> Option<String> {
    changelog.histories.iter().find_map(|history| {
        history
            .items
            .iter()
            .any(|item| item.field == "status" && item.to_string.as_deref() == Some(target))
            .then(|| history.created.clone())
    })
}

fn day_delta(start: Option<&str>, end: Option<&str>) -> Option<i64> {
    let start = parse_timestamp(start?)?;
    let end = parse_timestamp(end?)?;
    Some(days_between(start, end))
}

/// First present field in the chain wins; a present field with a null
/// value resolves to the empty string rather than falling through.
fn select_chain(candidates: &[&Option<SelectValue>]) -> Option<String> {
    candidates
        .iter()
        .find_map(|field| field.as_ref().map(|v| v.value.clone().unwrap_or_default()))
}

fn select_value(field: &Option<SelectValue>) -> Option<String> {
    field.as_ref().and_then(|v| v.value.clone())
}

fn first_of_multi(field: &Option<Vec<SelectValue>>) -> Option<String> {
    field
        .as_ref()
        .and_then(|values| values.first())
        .map(|v| v.value.clone().unwrap_or_default())
}
