use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One unit of awarded experience.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XpTransaction {
    pub amount: i64,
    pub created_at: DateTime<Utc>,
    pub path: String,
}

/// Highest-amount skill transaction per `skill_*` type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillTransaction {
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectTransaction {
    pub amount: i64,
    pub path: String,
}

/// One graded attempt. `grade` is null while an attempt is ungraded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    pub grade: Option<f64>,
    pub path: String,
    pub created_at: DateTime<Utc>,
}

impl ResultRecord {
    pub fn passed(&self) -> bool {
        self.grade.is_some_and(|g| g >= 1.0)
    }
}

/// Final `/`-separated segment of a record path.
pub fn last_path_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
