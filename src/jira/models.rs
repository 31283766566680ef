use serde::Deserialize;

/// One page of `/rest/api/3/search` results.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub issues: Vec<Issue>,
    #[serde(default)]
    pub total: u64,
}

/// A raw issue as the tracker returns it. Only the fields the reporting
/// pipeline reads are modeled; everything else is dropped at parse time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Issue {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub fields: IssueFields,
    #[serde(default, rename = "renderedFields")]
    pub rendered_fields: RenderedFields,
    /// Present only on detail fetches with `expand=changelog`.
    pub changelog: Option<Changelog>,
}

/// The tracker spreads one logical attribute across several custom fields
/// (pre- and post-migration copies). The serde renames pin each alias to
/// its wire id; precedence between aliases lives in the normalizer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssueFields {
    pub summary: Option<String>,
    pub status: Option<StatusField>,
    pub created: Option<String>,
    #[serde(rename = "resolutiondate")]
    pub resolution_date: Option<String>,
    /// Product (multi-select).
    #[serde(rename = "customfield_10078")]
    pub product: Option<Vec<SelectValue>>,
    /// Track (multi-select).
    #[serde(rename = "customfield_11020")]
    pub track: Option<Vec<SelectValue>>,
    /// On-track dropdown, highest priority.
    #[serde(rename = "customfield_10241")]
    pub on_track: Option<SelectValue>,
    /// On-track (migrated), second priority.
    #[serde(rename = "customfield_11404")]
    pub on_track_migrated: Option<SelectValue>,
    /// On-track (legacy), last resort.
    #[serde(rename = "customfield_11085")]
    pub on_track_legacy: Option<SelectValue>,
    /// Engineering response, preferred source.
    #[serde(rename = "customfield_10100")]
    pub engineering_response: Option<SelectValue>,
    /// Engineering response (migrated).
    #[serde(rename = "customfield_11084")]
    pub engineering_response_migrated: Option<SelectValue>,
    /// Revised completed date.
    #[serde(rename = "customfield_11291")]
    pub revised_completed_date: Option<SelectValue>,
    /// Release type.
    #[serde(rename = "customfield_11025")]
    pub release_type: Option<SelectValue>,
}

/// Fields returned through the `renderedFields` expansion.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenderedFields {
    /// On-track comment, rendered to HTML by the tracker.
    #[serde(rename = "customfield_10262")]
    pub on_track_comment: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusField {
    pub name: Option<String>,
}

/// A single- or multi-select option; `value` can be null on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectValue {
    pub value: Option<String>,
}

/// Field-transition history, ordered oldest first by the tracker.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Changelog {
    #[serde(default)]
    pub histories: Vec<History>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct History {
    pub created: String,
    #[serde(default)]
    pub items: Vec<HistoryItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryItem {
    #[serde(default)]
    pub field: String,
    #[serde(rename = "toString")]
    pub to_string: Option<String>,
}
