pub mod config;
pub mod date_util;
pub mod error;
pub mod holiday;
pub mod jira;
pub mod llm;
pub mod metrics;
pub mod normalize;
pub mod query;
pub mod server;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use holiday::HolidayCalendar;
pub use jira::{JiraClient, JiraConfig};
pub use metrics::StreamStatistics;
pub use normalize::{Epic, OnTrackStatus};
pub use query::builder::JqlBuilder;
pub use query::{Stream, StreamSelection, ALL_STREAMS};

use chrono::NaiveDate;
use serde_json::{json, Value};

use llm::PromptKind;
use normalize::{apply_transition_dates, normalize};

/// Main entry point for the epic dashboard service: owns the tracker
/// client and the holiday calendar, and exposes one operation per
/// endpoint. The LLM agent is passed into the operations that need it
/// rather than stored here.
pub struct EpicDash {
    client: JiraClient,
    holidays: HolidayCalendar,
}

impl EpicDash {
    pub fn new(client: JiraClient, holidays: HolidayCalendar) -> Self {
        Self { client, holidays }
    }

    // ── Holidays ──────────────────────────────────────────────────────

    /// Company holidays whose month-day falls inside the range.
    pub fn holidays(&self, from: NaiveDate, to: NaiveDate) -> Vec<String> {
        self.holidays.between(from, to)
    }

    // ── Metrics ───────────────────────────────────────────────────────

    /// Per-stream delivery statistics over the resolution-date window.
    /// Returns a map of stream label to the fixed 9-element row; a stream
    /// with no matching epics maps to an empty array. For "All" the seven
    /// streams are fetched sequentially in display order.
    pub async fn metrics(
        &self,
        selection: StreamSelection,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Value> {
        let mut out = serde_json::Map::new();
        for stream in selection.streams() {
            let epics = self.fetch_epics_with_transitions(stream, from, to).await?;
            let row = if epics.is_empty() {
                json!([])
            } else {
                Value::Array(metrics::compute_stream_statistics(&epics).as_row())
            };
            out.insert(stream.label().to_string(), row);
        }
        Ok(Value::Object(out))
    }

    // ── Narrative summaries ───────────────────────────────────────────

    /// Cumulative per-category update summary, generated by the model.
    /// The model's output must parse as a JSON object.
    pub async fn updates(
        &self,
        agent: &mixtape_core::Agent,
        selection: StreamSelection,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Value> {
        let block = self.fetch_issue_blocks(selection, from, to, false).await?;
        let text = llm::summarize(agent, PromptKind::CategorySummary, &block, selection).await?;
        parse_model_json(&text, |v| v.is_object(), "object")
    }

    /// At-risk / delayed narrative, generated by the model from the
    /// Yellow/Red subset. The model's output must parse as a JSON array.
    pub async fn risk(
        &self,
        agent: &mixtape_core::Agent,
        selection: StreamSelection,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Value> {
        let block = self.fetch_issue_blocks(selection, from, to, true).await?;
        let text = llm::summarize(agent, PromptKind::RiskSummary, &block, selection).await?;
        parse_model_json(&text, |v| v.is_array(), "array")
    }

    // ── Fetch plumbing ────────────────────────────────────────────────

    /// Search one stream and normalize every hit, then fetch each issue's
    /// changelog to derive transition dates. Used by the metrics path only;
    /// the narrative paths never need the per-issue detail round-trips.
    async fn fetch_epics_with_transitions(
        &self,
        stream: Stream,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Epic>> {
        let issues = self.client.search_all(&build_jql(stream, from, to, false)).await?;
        let mut epics = Vec::with_capacity(issues.len());
        for issue in &issues {
            let mut epic = normalize(issue);
            let detail = self.client.issue_with_changelog(&issue.key).await?;
            apply_transition_dates(&mut epic, &detail);
            epics.push(epic);
        }
        Ok(epics)
    }

    /// Search each selected stream and render its epics into the delimited
    /// text block the prompts consume, concatenated in display order.
    async fn fetch_issue_blocks(
        &self,
        selection: StreamSelection,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        risk_only: bool,
    ) -> Result<String> {
        let mut block = String::new();
        for stream in selection.streams() {
            let issues = self
                .client
                .search_all(&build_jql(stream, from, to, risk_only))
                .await?;
            let epics: Vec<Epic> = issues.iter().map(normalize).collect();
            block.push_str(&llm::issue_block(stream.label(), &epics));
        }
        Ok(block)
    }
}

fn build_jql(stream: Stream, from: Option<NaiveDate>, to: Option<NaiveDate>, risk: bool) -> String {
    let mut builder = JqlBuilder::new(stream);
    if let Some(from) = from {
        builder = builder.resolved_after(from);
    }
    if let Some(to) = to {
        builder = builder.resolved_before(to);
    }
    if risk {
        builder = builder.risk_only();
    }
    builder.build()
}

fn parse_model_json(text: &str, check: fn(&Value) -> bool, expected: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| Error::Llm(format!("model returned malformed JSON: {e}")))?;
    if !check(&value) {
        return Err(Error::Llm(format!("model returned JSON that is not an {expected}")));
    }
    Ok(value)
}
