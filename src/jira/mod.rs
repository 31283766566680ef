pub mod models;

pub use models::{Issue, SearchResponse};

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Fields requested on every search so the normalizer sees a consistent
/// shape regardless of which endpoint triggered the query.
const SEARCH_FIELDS: [&str; 14] = [
    "customfield_10078",
    "customfield_11020",
    "customfield_11025",
    "customfield_10112",
    "summary",
    "customfield_10262",
    "status",
    "customfield_10256",
    "customfield_10241",
    "customfield_10100",
    "customfield_11291",
    "customfield_11084",
    "customfield_11404",
    "customfield_11085",
];

/// Connection settings for the issue tracker. Credentials come from the
/// environment at startup and are passed through as-is on every request.
#[derive(Debug, Clone)]
pub struct JiraConfig {
    pub base_url: String,
    pub email: String,
    pub api_token: String,
    pub page_size: u32,
    pub max_pages: u32,
    pub timeout_secs: u64,
}

impl JiraConfig {
    pub fn new(base_url: impl Into<String>, email: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            email: email.into(),
            api_token: api_token.into(),
            page_size: 50,
            max_pages: 100,
            timeout_secs: 30,
        }
    }
}

/// Thin client over the tracker's search and issue-detail APIs.
/// Constructed once at process start and injected into the reporting
/// pipeline; holds no per-request state.
#[derive(Clone)]
pub struct JiraClient {
    http: reqwest::Client,
    config: JiraConfig,
}

impl JiraClient {
    pub fn new(config: JiraConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    /// Fetch every issue matching `jql`, paging through the search API
    /// with increasing offsets until the reported total is exhausted.
    /// The page cap guards against a misbehaving upstream; there is no
    /// retry, a failed page fails the whole fetch.
    pub async fn search_all(&self, jql: &str) -> Result<Vec<Issue>> {
        let page_size = self.config.page_size as u64;
        let mut issues = Vec::new();
        let mut start_at: u64 = 0;
        // Nonzero so the loop always issues the first request.
        let mut total: u64 = 1;
        let mut pages: u32 = 0;

        while start_at < total {
            if pages >= self.config.max_pages {
                return Err(Error::TooManyPages {
                    max_pages: self.config.max_pages,
                });
            }
            let page = self.search_page(jql, start_at).await?;
            total = page.total;
            issues.extend(page.issues);
            start_at += page_size;
            pages += 1;
        }

        log::debug!("fetched {} issues over {pages} page(s)", issues.len());
        Ok(issues)
    }

    async fn search_page(&self, jql: &str, start_at: u64) -> Result<SearchResponse> {
        let url = format!("{}/rest/api/3/search", self.config.base_url);
        let body = serde_json::json!({
            "jql": jql,
            "validateQuery": "warn",
            "startAt": start_at,
            "maxResults": self.config.page_size,
            "fields": SEARCH_FIELDS,
            "expand": ["renderedFields"],
        });

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.email, Some(&self.config.api_token))
            .json(&body)
            .send()
            .await?;
        Self::read_json(response).await
    }

    /// Fetch one issue with its full changelog, used to derive status
    /// transition dates on the metrics path.
    pub async fn issue_with_changelog(&self, key: &str) -> Result<Issue> {
        let url = format!(
            "{}/rest/api/3/issue/{key}?expand=changelog",
            self.config.base_url
        );
        let response = self
            .http
            .get(&url)
            .basic_auth(&self.config.email, Some(&self.config.api_token))
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn test_client(base_url: &str) -> JiraClient {
        JiraClient::new(JiraConfig::new(base_url, "bot@example.com", "token")).unwrap()
    }

    fn page_body(count: usize, offset: usize, total: u64) -> serde_json::Value {
        let issues: Vec<serde_json::Value> = (0..count)
            .map(|i| {
                serde_json::json!({
                    "key": format!("EPIC-{}", offset + i),
                    "fields": {"summary": format!("Epic {}", offset + i)}
                })
            })
            .collect();
        serde_json::json!({"issues": issues, "total": total})
    }

    #[tokio::test]
    async fn test_pagination_fetches_every_page() {
        let mut server = mockito::Server::new_async().await;

        // total=120 over pages of 50: exactly three requests at offsets
        // 0, 50, 100.
        let m0 = server
            .mock("POST", "/rest/api/3/search")
            .match_body(Matcher::PartialJson(serde_json::json!({"startAt": 0})))
            .with_body(page_body(50, 0, 120).to_string())
            .expect(1)
            .create_async()
            .await;
        let m1 = server
            .mock("POST", "/rest/api/3/search")
            .match_body(Matcher::PartialJson(serde_json::json!({"startAt": 50})))
            .with_body(page_body(50, 50, 120).to_string())
            .expect(1)
            .create_async()
            .await;
        let m2 = server
            .mock("POST", "/rest/api/3/search")
            .match_body(Matcher::PartialJson(serde_json::json!({"startAt": 100})))
            .with_body(page_body(20, 100, 120).to_string())
            .expect(1)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let issues = client.search_all("type in (Epic)").await.unwrap();

        assert_eq!(issues.len(), 120);
        assert_eq!(issues[0].key, "EPIC-0");
        assert_eq!(issues[119].key, "EPIC-119");
        m0.assert_async().await;
        m1.assert_async().await;
        m2.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_result_set() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/rest/api/3/search")
            .with_body(page_body(0, 0, 0).to_string())
            .create_async()
            .await;

        let client = test_client(&server.url());
        let issues = client.search_all("type in (Epic)").await.unwrap();
        assert!(issues.is_empty());
    }

    #[tokio::test]
    async fn test_non_2xx_surfaces_as_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/rest/api/3/search")
            .with_status(500)
            .with_body("jira is down")
            .create_async()
            .await;

        let client = test_client(&server.url());
        let err = client.search_all("type in (Epic)").await.unwrap_err();
        match err {
            Error::Upstream { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "jira is down");
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_page_cap_stops_runaway_totals() {
        let mut server = mockito::Server::new_async().await;
        // Upstream keeps reporting a huge total no matter the offset.
        server
            .mock("POST", "/rest/api/3/search")
            .with_body(page_body(50, 0, u64::MAX).to_string())
            .expect_at_least(1)
            .create_async()
            .await;

        let mut config = JiraConfig::new(server.url(), "bot@example.com", "token");
        config.max_pages = 3;
        let client = JiraClient::new(config).unwrap();

        let err = client.search_all("type in (Epic)").await.unwrap_err();
        assert!(matches!(err, Error::TooManyPages { max_pages: 3 }));
    }

    #[tokio::test]
    async fn test_issue_detail_parses_changelog() {
        let mut server = mockito::Server::new_async().await;
        let body = serde_json::json!({
            "key": "AIC-7",
            "fields": {
                "created": "2024-01-01T00:00:00.000+0000",
                "resolutiondate": "2024-01-10T00:00:00.000+0000"
            },
            "changelog": {
                "histories": [
                    {"created": "2024-01-02T00:00:00.000+0000",
                     "items": [{"field": "status", "toString": "In Progress"}]}
                ]
            }
        });
        server
            .mock("GET", "/rest/api/3/issue/AIC-7?expand=changelog")
            .with_body(body.to_string())
            .create_async()
            .await;

        let client = test_client(&server.url());
        let issue = client.issue_with_changelog("AIC-7").await.unwrap();
        assert_eq!(issue.key, "AIC-7");
        assert_eq!(issue.changelog.unwrap().histories.len(), 1);
    }
}
