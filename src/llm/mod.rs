use crate::date_util::strip_code_fences;
use crate::error::{Error, Result};
use crate::normalize::Epic;
use crate::query::{StreamSelection, ALL_STREAMS};

/// Which instructional template wraps the issue block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Per-product-category cumulative summaries; the model is expected to
    /// return a JSON object mapping category to at most two strings.
    CategorySummary,
    /// At-risk/delayed narrative; the model is expected to return a JSON
    /// array of strings.
    RiskSummary,
}

/// Create a mixtape Agent for the configured provider and model.
pub async fn create_agent(provider: &str, model_name: &str) -> Result<mixtape_core::Agent> {
    // Each combination needs its own builder call since the model types
    // are different.
    match (provider, model_name) {
        ("bedrock", "claude-haiku-4-5" | "haiku") => mixtape_core::Agent::builder()
            .bedrock(mixtape_core::ClaudeHaiku4_5)
            .build()
            .await
            .map_err(|e| Error::Llm(e.to_string())),
        ("bedrock", _) => mixtape_core::Agent::builder()
            .bedrock(mixtape_core::ClaudeSonnet4_5)
            .build()
            .await
            .map_err(|e| Error::Llm(e.to_string())),
        ("anthropic", "claude-haiku-4-5" | "haiku") => mixtape_core::Agent::builder()
            .anthropic_from_env(mixtape_core::ClaudeHaiku4_5)
            .build()
            .await
            .map_err(|e| Error::Llm(e.to_string())),
        ("anthropic", _) => mixtape_core::Agent::builder()
            .anthropic_from_env(mixtape_core::ClaudeSonnet4_5)
            .build()
            .await
            .map_err(|e| Error::Llm(e.to_string())),
        (other, _) => Err(Error::Config(format!("unknown llm_provider: {other}"))),
    }
}

/// Serialize one stream's epics into the delimited block the prompts embed.
pub fn issue_block(stream_label: &str, epics: &[Epic]) -> String {
    let mut block = format!("{stream_label}:\n\n");
    for epic in epics {
        block.push_str(&format!(
            "- IssueId: {}, Summary: {}, Product: {}, Track: {}, On_Track_Comment: {}, OnTrack_Status: {}, Release_Type: {}\n",
            epic.issue_id,
            epic.summary,
            opt(epic.product.as_deref()),
            opt(epic.track.as_deref()),
            epic.on_track_comment,
            opt(epic.on_track_status.as_ref().map(|s| s.as_str())),
            opt(epic.release_type.as_deref()),
        ));
    }
    block.push('\n');
    block
}

fn opt(value: Option<&str>) -> &str {
    value.unwrap_or("None")
}

/// Build the full prompt for an issue block. When a single stream is
/// selected the model is told to restrict its output to it.
pub fn build_prompt(kind: PromptKind, issue_block: &str, selection: StreamSelection) -> String {
    let mut prompt = match kind {
        PromptKind::CategorySummary => category_summary_prompt(issue_block),
        PromptKind::RiskSummary => risk_summary_prompt(issue_block),
    };
    if selection != StreamSelection::All {
        prompt.push_str(&format!("\n\nOnly show data for: {}", selection.label()));
    }
    prompt
}

/// Run the prompt through the agent and return the generated text with
/// markdown fences stripped. The text is expected to parse as JSON but is
/// not validated here; that is the caller's concern.
pub async fn summarize(
    agent: &mixtape_core::Agent,
    kind: PromptKind,
    issue_block: &str,
    selection: StreamSelection,
) -> Result<String> {
    let prompt = build_prompt(kind, issue_block, selection);
    let response = agent
        .run(&prompt)
        .await
        .map_err(|e| Error::Llm(e.to_string()))?;
    Ok(strip_code_fences(response.text().trim()).to_string())
}

fn category_labels() -> String {
    ALL_STREAMS
        .iter()
        .map(|s| format!("\"{}\"", s.label()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn category_summary_prompt(issue_block: &str) -> String {
    format!(
        r#"You are an Engineering Operations Analyst responsible for categorizing and summarizing issue-tracker epics for different product stream categories.

## Instructions:
- Categorize the following data by the "Product" field.
- For each product category, combine all the "Summary" values for that category into a cumulative summary that is concise and provides an overview of all related issues. Return a JSON object where each key is a product category and each value is a list of at most two summary strings.
- Ensure the summary reflects the essence of all related issues in an informative yet compact manner.
- Don't include any text before or after the output.
- The categories to include are: {categories}.
- Return the output in the following format:
{{
"Identity Trust": ["One concise summary sentence.", "A second concise summary sentence."],
"AIC": ["One concise summary sentence."]
}}

- Here is the issue data to categorize:

{issue_block}"#,
        categories = category_labels(),
    )
}

fn risk_summary_prompt(issue_block: &str) -> String {
    format!(
        r#"You are an Engineering Operations Analyst responsible for summarizing features at risk or delayed and the reasons behind them.

## Instructions:
- Summarize features at risk or delayed, explicitly noting why each feature is at risk or delayed with respect to its product field.
- Use the "On_Track_Comment" field to identify and explain the reasons for delays or risks.
- Include all matching issues without omissions; the output can have multiple entries.
- Don't include any text before or after the output.
- Return the output as a JSON array of strings in the following format:
[
"In the MT SaaS product stream, the feature \"...\" (Issue Id: P1ME-59) is at risk/delayed. The delay is due to ...",
"In the AIC product stream, the feature \"...\" (Issue Id: FRAAS-18779) is at risk/delayed. ..."
]

- Here is the issue data:

{issue_block}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::OnTrackStatus;
    use crate::query::Stream;

    fn sample_epic() -> Epic {
        Epic {
            issue_id: "FRAAS-1".to_string(),
            summary: "API docs consolidation".to_string(),
            product: Some("AIC".to_string()),
            track: None,
            on_track_comment: "waiting on review".to_string(),
            on_track_status: Some(OnTrackStatus::AtRisk),
            release_type: Some("GA".to_string()),
            ..Epic::default()
        }
    }

    #[test]
    fn test_issue_block_renders_each_epic_on_one_line() {
        let block = issue_block("AIC", &[sample_epic()]);
        assert!(block.starts_with("AIC:\n\n"));
        assert!(block.contains("- IssueId: FRAAS-1, Summary: API docs consolidation"));
        assert!(block.contains("Track: None"));
        assert!(block.contains("OnTrack_Status: At Risk"));
        assert!(block.contains("Release_Type: GA"));
        assert!(block.ends_with("\n\n"));
    }

    #[test]
    fn test_category_prompt_lists_every_stream() {
        let prompt = build_prompt(PromptKind::CategorySummary, "block", StreamSelection::All);
        for stream in ALL_STREAMS {
            assert!(prompt.contains(stream.label()), "missing {}", stream.label());
        }
        assert!(!prompt.contains("Only show data for"));
    }

    #[test]
    fn test_single_stream_selection_appends_restriction() {
        let prompt = build_prompt(
            PromptKind::RiskSummary,
            "block",
            StreamSelection::One(Stream::Aic),
        );
        assert!(prompt.ends_with("Only show data for: AIC"));
        assert!(prompt.contains("at risk or delayed"));
    }

    #[test]
    fn test_prompt_kinds_select_different_templates() {
        let category = build_prompt(PromptKind::CategorySummary, "block", StreamSelection::All);
        let risk = build_prompt(PromptKind::RiskSummary, "block", StreamSelection::All);
        assert!(category.contains("categorizing"));
        assert!(risk.contains("On_Track_Comment"));
        assert_ne!(category, risk);
    }
}
