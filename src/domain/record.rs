//! Workflow log records for the ecFlow and SMS dialects

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::domain::date::DateRange;

/// Workflow engine dialect of the source logs.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum RepoType {
    #[default]
    Ecflow,
    Sms,
}

impl RepoType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepoType::Ecflow => "ecflow",
            RepoType::Sms => "sms",
        }
    }

    fn line_regex(&self) -> &'static Regex {
        match self {
            RepoType::Ecflow => &ECFLOW_LINE,
            RepoType::Sms => &SMS_LINE,
        }
    }
}

impl fmt::Display for RepoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepoType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ecflow" => Ok(RepoType::Ecflow),
            "sms" => Ok(RepoType::Sms),
            other => Err(format!("unknown repo type: {other}")),
        }
    }
}

/// Severity prefix of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Log,
    Msg,
    War,
    Err,
    Dbg,
}

impl FromStr for LogKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "LOG" => Ok(LogKind::Log),
            "MSG" => Ok(LogKind::Msg),
            "WAR" => Ok(LogKind::War),
            "ERR" => Ok(LogKind::Err),
            "DBG" => Ok(LogKind::Dbg),
            other => Err(format!("unknown log kind: {other}")),
        }
    }
}

/// Node status carried by a status change record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Submitted,
    Active,
    Complete,
    Aborted,
    Queued,
}

impl NodeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeStatus::Submitted => "submitted",
            NodeStatus::Active => "active",
            NodeStatus::Complete => "complete",
            NodeStatus::Aborted => "aborted",
            NodeStatus::Queued => "queued",
        }
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(NodeStatus::Submitted),
            "active" => Ok(NodeStatus::Active),
            "complete" => Ok(NodeStatus::Complete),
            "aborted" => Ok(NodeStatus::Aborted),
            "queued" => Ok(NodeStatus::Queued),
            other => Err(format!("unknown node status: {other}")),
        }
    }
}

// LOG:[05:26:42 1.1.2020]  active: /gmf/00/pre/get_data
static ECFLOW_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<kind>LOG|MSG|WAR|ERR|DBG):\[(?P<h>\d{1,2}):(?P<mi>\d{2}):(?P<s>\d{2}) (?P<d>\d{1,2})\.(?P<mo>\d{1,2})\.(?P<y>\d{4})\](?P<body>.*)$",
    )
    .expect("ecflow line regex")
});

// # LOG:[18:15:57 20.5.2014] submitted:/obs_reg/06/collect
static SMS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^# (?P<kind>LOG|MSG|WAR|ERR|DBG):\[(?P<h>\d{1,2}):(?P<mi>\d{2}):(?P<s>\d{2}) (?P<d>\d{1,2})\.(?P<mo>\d{1,2})\.(?P<y>\d{4})\](?P<body>.*)$",
    )
    .expect("sms line regex")
});

static STATUS_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<status>submitted|active|complete|aborted|queued):\s*(?P<path>/\S*)")
        .expect("status body regex")
});

/// One parsed log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowRecord {
    /// 1-based line number in the source log
    pub line_no: u64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub kind: LogKind,
    /// Text after the timestamp, trimmed
    pub body: String,
}

/// Status change extracted from a `LOG` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange<'a> {
    pub status: NodeStatus,
    pub node_path: &'a str,
}

impl WorkflowRecord {
    /// Parse a raw log line of the given dialect.
    ///
    /// Returns `None` for lines that are not records (blank lines, continuation
    /// output, other dialect, impossible timestamps).
    pub fn parse(line: &str, repo_type: RepoType, line_no: u64) -> Option<Self> {
        let caps = repo_type.line_regex().captures(line.trim_end())?;
        let kind = caps["kind"].parse().ok()?;
        let date = NaiveDate::from_ymd_opt(num(&caps, "y")?, num(&caps, "mo")?, num(&caps, "d")?)?;
        let time = NaiveTime::from_hms_opt(num(&caps, "h")?, num(&caps, "mi")?, num(&caps, "s")?)?;
        Some(Self {
            line_no,
            date,
            time,
            kind,
            body: caps["body"].trim().to_string(),
        })
    }

    pub fn status_change(&self) -> Option<StatusChange<'_>> {
        if self.kind != LogKind::Log {
            return None;
        }
        let caps = STATUS_BODY.captures(&self.body)?;
        let status = caps.name("status")?.as_str().parse().ok()?;
        let node_path = caps.name("path")?.as_str();
        Some(StatusChange { status, node_path })
    }
}

/// Scope of a record load: which repo, which dialect, which days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordQuery {
    pub owner: String,
    pub repo: String,
    pub repo_type: RepoType,
    pub range: DateRange,
}

fn num<T: FromStr>(caps: &Captures<'_>, name: &str) -> Option<T> {
    caps.name(name)?.as_str().parse().ok()
}
