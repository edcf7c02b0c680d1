//! Dashboard loading: guard check, then one query, then the four transforms.

use serde::Serialize;

use crate::format::pass_rate;
use crate::gateway::{DashboardSource, QueryError, QueryOutcome};
use crate::guard::{GuardActivation, GuardState, View};
use crate::models::{
    AttemptStats, CumulativePoint, DashboardData, ProjectSummary, SkillSummary, UserProfile,
};
use crate::pipeline;
use crate::session::Session;

/// Number of skills shown before "show all".
pub const VISIBLE_SKILLS: usize = 5;

/// Everything the dashboard needs, in a single request.
pub const DASHBOARD_QUERY: &str = r#"{
    user {
        id
        login
        auditRatio
    }
    transaction_aggregate(where: { type: { _eq: "xp" } }) {
        aggregate {
            sum { amount }
            count
        }
    }
    transaction(
        where: { type: { _eq: "xp" } }
        order_by: { createdAt: asc }
    ) {
        amount
        createdAt
        path
    }
    skills: transaction(
        where: { type: { _like: "skill_%" } }
        order_by: [{ type: asc }, { amount: desc }]
        distinct_on: type
    ) {
        type
        amount
    }
    pass: result_aggregate(where: { grade: { _gte: 1 } }) {
        aggregate { count }
    }
    fail: result_aggregate(where: { grade: { _lt: 1 } }) {
        aggregate { count }
    }
    xp_by_project: transaction(
        where: { type: { _eq: "xp" }, path: { _nlike: "%piscine%" } }
        order_by: { amount: desc }
    ) {
        amount
        path
    }
    piscine_results: result(
        where: { path: { _like: "%piscine-js%" } }
        order_by: { createdAt: asc }
    ) {
        grade
        path
        createdAt
    }
}"#;

/// Presentation-ready dashboard: the four derived views plus the profile and
/// aggregate counts passed through unmodified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub profile: Option<UserProfile>,
    pub total_xp: i64,
    pub pass_count: i64,
    pub fail_count: i64,
    pub pass_rate: Option<u32>,
    pub cumulative_xp: Vec<CumulativePoint>,
    pub skills: Vec<SkillSummary>,
    pub projects: Vec<ProjectSummary>,
    pub piscine: AttemptStats,
}

impl DashboardView {
    pub fn from_data(data: &DashboardData) -> Self {
        Self {
            profile: data.profile().cloned(),
            total_xp: data.total_xp(),
            pass_count: data.pass_count(),
            fail_count: data.fail_count(),
            pass_rate: pass_rate(data.pass_count(), data.fail_count()),
            cumulative_xp: pipeline::cumulative_xp(&data.transaction),
            skills: pipeline::skill_summary(&data.skills),
            projects: pipeline::project_summary(&data.xp_by_project),
            piscine: pipeline::attempt_stats(&data.piscine_results),
        }
    }

    /// Skills to display: the first `VISIBLE_SKILLS`, or all of them.
    pub fn visible_skills(&self, show_all: bool) -> &[SkillSummary] {
        if show_all {
            &self.skills
        } else {
            &self.skills[..self.skills.len().min(VISIBLE_SKILLS)]
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardLoad {
    Ready(Box<DashboardView>),
    /// Caller should navigate to this view; nothing was rendered.
    Redirect(View),
}

/// Run the `Protect` guard for this activation and, only once it is ready,
/// fetch and transform the dashboard. An auth failure reported by the query
/// redirects to the login view; the session is already cleared by then.
pub async fn load_dashboard(
    mut activation: GuardActivation,
    session: &Session,
    source: &dyn DashboardSource,
) -> Result<DashboardLoad, QueryError> {
    match activation.check(session) {
        GuardState::Ready => {}
        GuardState::Redirecting(view) => return Ok(DashboardLoad::Redirect(view)),
        GuardState::Checking => return Ok(DashboardLoad::Redirect(View::Login)),
    }

    match source.fetch_dashboard().await? {
        QueryOutcome::Data(data) => Ok(DashboardLoad::Ready(Box::new(DashboardView::from_data(&data)))),
        QueryOutcome::AuthExpired => Ok(DashboardLoad::Redirect(View::Login)),
    }
}
