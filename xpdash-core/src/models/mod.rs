//! Typed shapes of the dashboard query result and of the derived views.

pub mod profile;
pub mod records;
pub mod summary;

use serde::{Deserialize, Serialize};

pub use profile::{CountAggregate, SumAggregate, UserProfile, XpAggregate};
pub use records::{ProjectTransaction, ResultRecord, SkillTransaction, XpTransaction};
pub use summary::{AttemptCounts, AttemptStats, CumulativePoint, ProjectSummary, SkillSummary};

/// The `data` payload of the dashboard query, one field per query alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub user: Vec<UserProfile>,
    pub transaction_aggregate: XpAggregate,
    pub transaction: Vec<XpTransaction>,
    pub skills: Vec<SkillTransaction>,
    pub pass: CountAggregate,
    pub fail: CountAggregate,
    pub xp_by_project: Vec<ProjectTransaction>,
    pub piscine_results: Vec<ResultRecord>,
}

impl DashboardData {
    /// The signed-in user. The service scopes `user` to the token holder, so
    /// there is at most one row.
    pub fn profile(&self) -> Option<&UserProfile> {
        self.user.first()
    }

    /// Sum of all xp amounts; zero when the user has none.
    pub fn total_xp(&self) -> i64 {
        self.transaction_aggregate.aggregate.sum.amount.unwrap_or(0)
    }

    pub fn pass_count(&self) -> i64 {
        self.pass.aggregate.count
    }

    pub fn fail_count(&self) -> i64 {
        self.fail.aggregate.count
    }
}
