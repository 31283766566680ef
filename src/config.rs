use std::env;

use crate::error::{Error, Result};
use crate::jira::JiraConfig;

/// Runtime configuration, read from the environment at startup.
/// Jira credentials are required; everything else has a default.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jira: JiraConfig,
    pub bind_addr: String,
    pub holiday_file: String,
    pub llm_provider: String,
    pub llm_model: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let mut jira = JiraConfig::new(
            required("JIRA_BASE_URL")?,
            required("JIRA_EMAIL")?,
            required("JIRA_API_TOKEN")?,
        );
        if let Some(page_size) = optional_parsed("JIRA_PAGE_SIZE")? {
            jira.page_size = page_size;
        }
        if let Some(max_pages) = optional_parsed("JIRA_MAX_PAGES")? {
            jira.max_pages = max_pages;
        }
        if let Some(timeout) = optional_parsed("JIRA_TIMEOUT_SECS")? {
            jira.timeout_secs = timeout;
        }

        Ok(Self {
            jira,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string()),
            holiday_file: env::var("HOLIDAY_FILE").unwrap_or_else(|_| "holidays.csv".to_string()),
            llm_provider: env::var("LLM_PROVIDER").unwrap_or_else(|_| "bedrock".to_string()),
            llm_model: env::var("LLM_MODEL").unwrap_or_else(|_| "claude-sonnet-4-5".to_string()),
        })
    }
}

fn required(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("{name} must be set")))
}

fn optional_parsed<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("{name} is not a valid value: {raw}"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var tests mutate process state; keep them in one test so they
    // cannot race each other.
    #[test]
    fn test_from_env() {
        env::remove_var("JIRA_BASE_URL");
        let err = AppConfig::from_env().unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        env::set_var("JIRA_BASE_URL", "https://example.atlassian.net");
        env::set_var("JIRA_EMAIL", "bot@example.com");
        env::set_var("JIRA_API_TOKEN", "secret");
        env::remove_var("JIRA_PAGE_SIZE");
        env::remove_var("JIRA_MAX_PAGES");
        env::remove_var("BIND_ADDR");
        env::remove_var("LLM_PROVIDER");

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.jira.base_url, "https://example.atlassian.net");
        assert_eq!(config.jira.page_size, 50);
        assert_eq!(config.jira.max_pages, 100);
        assert_eq!(config.bind_addr, "0.0.0.0:8000");
        assert_eq!(config.llm_provider, "bedrock");
        assert_eq!(config.llm_model, "claude-sonnet-4-5");

        env::set_var("JIRA_PAGE_SIZE", "25");
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.jira.page_size, 25);

        env::set_var("JIRA_PAGE_SIZE", "not-a-number");
        let err = AppConfig::from_env().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        env::remove_var("JIRA_PAGE_SIZE");
    }
}
