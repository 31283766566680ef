pub mod builder;

pub use builder::JqlBuilder;

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A named product stream: a fixed grouping of tracker projects, labels,
/// and teams. The filter fragments are opaque JQL composed at query-build
/// time; nothing validates the tracker-side fields exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    IdentityTrust,
    P1as,
    Iops,
    MtSaas,
    Software,
    AiAnalytics,
    Aic,
}

/// Every concrete stream, in the order the dashboard displays them.
/// The "All" pseudo-stream iterates this set.
pub const ALL_STREAMS: [Stream; 7] = [
    Stream::IdentityTrust,
    Stream::P1as,
    Stream::Iops,
    Stream::MtSaas,
    Stream::Software,
    Stream::AiAnalytics,
    Stream::Aic,
];

impl Stream {
    /// Display name, as sent by the front-end and echoed in responses.
    pub fn label(&self) -> &'static str {
        match self {
            Stream::IdentityTrust => "Identity Trust",
            Stream::P1as => "P1AS",
            Stream::Iops => "iOPS",
            Stream::MtSaas => "MT SaaS",
            Stream::Software => "Software",
            Stream::AiAnalytics => "AI / Analytics Data Platform",
            Stream::Aic => "AIC",
        }
    }

    /// The stream's fixed project/label/team JQL predicate.
    pub fn jql_fragment(&self) -> &'static str {
        match self {
            Stream::IdentityTrust => {
                "(issuetype = EPIC and (Project in (PID, PIM, PND, PIDPPQ, NEO) or project = P14C and team = 217c3afb-b962-4afb-8ca8-04769743a1cf-47) or labels in (PingOneMFA))"
            }
            Stream::P1as => "Project in (PDO, PP)",
            Stream::Iops => {
                "project in (\"SRE Observability Engineering\", \"SRE Production Services\", \"SRE Service Management\", \"SRE Operational Platforms\", DevTools, ORB)"
            }
            Stream::MtSaas => {
                "(filter in (\"Arun Goel Org\") or project in (\"PAX Platform\", \"PingOne End User Experience\", DV) or \"Product[Select List (multiple choices)]\" in (\"PingOne Platform\", \"PingOne DaVinci\"))"
            }
            Stream::Software => {
                "project in (BRASS, IK, PA, PAPQ, PAA, PASDKC, PASDKJ, PDI, PF, PPQ, POP, OPENIG, OPENIDM, OPENICF, OPENDJ, AMAGENTS, OPENAM)"
            }
            Stream::AiAnalytics => "project in (IGA, ANALYTICS, AI)",
            Stream::Aic => "project in (FRAAS)",
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Stream {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_STREAMS
            .iter()
            .find(|stream| stream.label() == s)
            .copied()
            .ok_or_else(|| Error::UnknownStream(s.to_string()))
    }
}

/// What a request selected: one concrete stream, or the "All"
/// pseudo-stream that fans out across the whole set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamSelection {
    All,
    One(Stream),
}

impl StreamSelection {
    pub fn label(&self) -> &'static str {
        match self {
            StreamSelection::All => "All",
            StreamSelection::One(stream) => stream.label(),
        }
    }

    /// The concrete streams this selection covers, in display order.
    pub fn streams(&self) -> Vec<Stream> {
        match self {
            StreamSelection::All => ALL_STREAMS.to_vec(),
            StreamSelection::One(stream) => vec![*stream],
        }
    }
}

impl FromStr for StreamSelection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "All" {
            Ok(StreamSelection::All)
        } else {
            Stream::from_str(s).map(StreamSelection::One)
        }
    }
}
