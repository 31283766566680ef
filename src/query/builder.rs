use chrono::NaiveDate;

use crate::query::Stream;

/// Ordering applied to every query so the narrative output is stable:
/// product field, engineering response, on-track status, then key.
const ORDER_CLAUSE: &str =
    " order by cf[10078], \"Engineering Response\", On-Track desc, key";

/// At-risk/delayed filter: the Yellow/Red values of the current on-track
/// dropdown plus their equivalents on the migrated field.
const RISK_CLAUSE: &str = " and (\"On-Track[Dropdown]\" = Yellow or \"On-Track (migrated)\" = \"Yellow (At-Risk)\" or \"On-Track[Dropdown]\" = Red or \"On-Track (migrated)\" = \"Red (Delayed)\")";

/// Builder for the JQL filter expression behind every endpoint.
///
/// Combines the fixed `type in (Epic)` predicate with the stream's
/// project/label/team fragment, optional inclusive resolution-date bounds
/// (lower bound at start-of-day, upper bound at end-of-day), and an
/// optional at-risk filter variant. The ordering clause is appended
/// unconditionally.
#[derive(Debug, Clone)]
pub struct JqlBuilder {
    stream: Stream,
    resolved_after: Option<NaiveDate>,
    resolved_before: Option<NaiveDate>,
    risk_only: bool,
}

impl JqlBuilder {
    pub fn new(stream: Stream) -> Self {
        Self {
            stream,
            resolved_after: None,
            resolved_before: None,
            risk_only: false,
        }
    }

    /// Inclusive lower bound on the resolution timestamp (start-of-day).
    pub fn resolved_after(mut self, date: NaiveDate) -> Self {
        self.resolved_after = Some(date);
        self
    }

    /// Inclusive upper bound on the resolution timestamp (end-of-day).
    pub fn resolved_before(mut self, date: NaiveDate) -> Self {
        self.resolved_before = Some(date);
        self
    }

    /// Restrict to epics whose on-track status marks them at risk or delayed.
    pub fn risk_only(mut self) -> Self {
        self.risk_only = true;
        self
    }

    pub fn build(&self) -> String {
        let mut jql = format!("type in (Epic) and {}", self.stream.jql_fragment());

        if let Some(date) = self.resolved_after {
            jql.push_str(&format!(
                " and resolutiondate >= \"{} 00:00\"",
                date.format("%Y-%m-%d")
            ));
        }
        if let Some(date) = self.resolved_before {
            jql.push_str(&format!(
                " and resolutiondate <= \"{} 23:59\"",
                date.format("%Y-%m-%d")
            ));
        }

        if self.risk_only {
            jql.push_str(RISK_CLAUSE);
        }

        jql.push_str(ORDER_CLAUSE);
        jql
    }
}
