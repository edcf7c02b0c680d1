//! Aggregation pipeline — pure transforms from query rows to chart-ready views.
//!
//! Every transform reads its input in the order supplied and never mutates it.
//! Ordering (time ascending, amount descending, skill rank) is the query's job.

use regex::Regex;

use crate::models::records::last_path_segment;
use crate::models::{
    AttemptCounts, AttemptStats, CumulativePoint, ProjectSummary, ProjectTransaction, ResultRecord,
    SkillSummary, SkillTransaction, XpTransaction,
};

/// Prefix carried by every skill transaction type.
pub const SKILL_PREFIX: &str = "skill_";

/// Number of projects kept by `project_summary`.
pub const TOP_PROJECTS: usize = 10;

/// Running xp total, one point per transaction.
pub fn cumulative_xp(transactions: &[XpTransaction]) -> Vec<CumulativePoint> {
    transactions
        .iter()
        .scan(0i64, |total, t| {
            *total = total.saturating_add(t.amount);
            Some(CumulativePoint {
                x: t.created_at,
                y: *total,
            })
        })
        .collect()
}

/// `"skill_front-end"` → `"Front End"`.
pub fn skill_label(kind: &str) -> String {
    let stripped = kind.replacen(SKILL_PREFIX, "", 1);
    let spaced = stripped.replace('-', " ");
    title_case(&spaced)
}

/// Uppercase the first character of every word, leaving the rest untouched.
fn title_case(s: &str) -> String {
    match Regex::new(r"\b\w") {
        Ok(re) => re
            .replace_all(s, |caps: &regex::Captures| caps[0].to_uppercase())
            .into_owned(),
        Err(e) => {
            tracing::error!(error = %e, "Word-start pattern failed to compile");
            s.to_string()
        }
    }
}

pub fn skill_summary(skills: &[SkillTransaction]) -> Vec<SkillSummary> {
    skills
        .iter()
        .map(|s| SkillSummary {
            name: skill_label(&s.kind),
            value: s.amount,
        })
        .collect()
}

/// First `TOP_PROJECTS` rows, named by the last path segment.
pub fn project_summary(transactions: &[ProjectTransaction]) -> Vec<ProjectSummary> {
    transactions
        .iter()
        .take(TOP_PROJECTS)
        .map(|t| ProjectSummary {
            project: last_path_segment(&t.path).to_string(),
            xp: t.amount,
        })
        .collect()
}

/// Pass/fail tallies plus attempts per exercise (last path segment).
pub fn attempt_stats(results: &[ResultRecord]) -> AttemptStats {
    let mut stats = AttemptStats {
        pass: 0,
        fail: 0,
        attempts: AttemptCounts::new(),
    };

    for r in results {
        if r.passed() {
            stats.pass += 1;
        } else {
            stats.fail += 1;
        }
        stats.attempts.increment(last_path_segment(&r.path));
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn xp(amount: i64, secs: i64) -> XpTransaction {
        XpTransaction {
            amount,
            created_at: at(secs),
            path: "/bahrain/bh-module/project".to_string(),
        }
    }

    fn result(grade: Option<f64>, path: &str) -> ResultRecord {
        ResultRecord {
            grade,
            path: path.to_string(),
            created_at: at(0),
        }
    }

    #[test]
    fn test_cumulative_xp_running_sum() {
        let input = vec![xp(10, 100), xp(-3, 200), xp(5, 300)];
        let points = cumulative_xp(&input);

        assert_eq!(
            points,
            vec![
                CumulativePoint { x: at(100), y: 10 },
                CumulativePoint { x: at(200), y: 7 },
                CumulativePoint { x: at(300), y: 12 },
            ]
        );
        // input untouched
        assert_eq!(input[1].amount, -3);
    }

    #[test]
    fn test_cumulative_xp_keeps_supplied_order_and_duplicates() {
        let input = vec![xp(1, 300), xp(1, 100), xp(1, 100)];
        let points = cumulative_xp(&input);
        let xs: Vec<i64> = points.iter().map(|p| p.x.timestamp()).collect();
        assert_eq!(xs, vec![300, 100, 100]);
        assert_eq!(points.last().map(|p| p.y), Some(3));
    }

    #[test]
    fn test_cumulative_xp_saturates_instead_of_overflowing() {
        let points = cumulative_xp(&[xp(i64::MAX, 100), xp(1, 200), xp(-5, 300)]);
        let ys: Vec<i64> = points.iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![i64::MAX, i64::MAX, i64::MAX - 5]);
    }

    #[test]
    fn test_cumulative_xp_empty() {
        assert!(cumulative_xp(&[]).is_empty());
    }

    #[test]
    fn test_skill_label() {
        assert_eq!(skill_label("skill_front-end"), "Front End");
        assert_eq!(skill_label("skill_go"), "Go");
        assert_eq!(skill_label("skill_back-end-dev"), "Back End Dev");
        assert_eq!(skill_label("skill_sys-admin"), "Sys Admin");
        // only the leading prefix is stripped
        assert_eq!(skill_label("skill_skill_x"), "Skill_x");
    }

    #[test]
    fn test_skill_summary_preserves_order() {
        let skills = vec![
            SkillTransaction { kind: "skill_prog".to_string(), amount: 90 },
            SkillTransaction { kind: "skill_front-end".to_string(), amount: 80 },
            SkillTransaction { kind: "skill_algo".to_string(), amount: 95 },
        ];
        let summary = skill_summary(&skills);
        assert_eq!(
            summary,
            vec![
                SkillSummary { name: "Prog".to_string(), value: 90 },
                SkillSummary { name: "Front End".to_string(), value: 80 },
                SkillSummary { name: "Algo".to_string(), value: 95 },
            ]
        );
    }

    #[test]
    fn test_project_summary_takes_first_ten_in_order() {
        let input: Vec<ProjectTransaction> = (0..12)
            .map(|i| ProjectTransaction {
                amount: 1000 - i * 50,
                path: format!("/bahrain/bh-module/project-{}", i),
            })
            .collect();

        let summary = project_summary(&input);
        assert_eq!(summary.len(), 10);
        for (i, p) in summary.iter().enumerate() {
            assert_eq!(p.project, format!("project-{}", i));
            assert_eq!(p.xp, input[i].amount);
        }
    }

    #[test]
    fn test_project_summary_keeps_tie_order() {
        let input = vec![
            ProjectTransaction { amount: 500, path: "/m/zeta".to_string() },
            ProjectTransaction { amount: 500, path: "/m/alpha".to_string() },
        ];
        let names: Vec<String> = project_summary(&input).into_iter().map(|p| p.project).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_project_summary_short_input() {
        let input = vec![ProjectTransaction { amount: 1, path: "/m/only".to_string() }];
        assert_eq!(project_summary(&input).len(), 1);
    }

    #[test]
    fn test_attempt_stats() {
        let input = vec![
            result(Some(1.0), "a/ex1"),
            result(Some(0.0), "a/ex1"),
            result(Some(1.0), "a/ex2"),
        ];
        let stats = attempt_stats(&input);

        assert_eq!(stats.pass, 2);
        assert_eq!(stats.fail, 1);
        assert_eq!(stats.attempts.get("ex1"), Some(2));
        assert_eq!(stats.attempts.get("ex2"), Some(1));
        assert_eq!(
            serde_json::to_value(&stats).unwrap(),
            serde_json::json!({ "pass": 2, "fail": 1, "attempts": { "ex1": 2, "ex2": 1 } })
        );
    }

    #[test]
    fn test_attempt_stats_ungraded_counts_as_fail() {
        let stats = attempt_stats(&[result(None, "/piscine-js/quest-02/is-it"), result(Some(2.5), "/piscine-js/quest-02/is-it")]);
        assert_eq!((stats.pass, stats.fail), (1, 1));
        assert_eq!(stats.attempts.get("is-it"), Some(2));
        assert_eq!(stats.total(), 2);
    }

    #[test]
    fn test_attempt_stats_empty() {
        let stats = attempt_stats(&[]);
        assert_eq!(stats, AttemptStats::default());
        assert!(stats.attempts.is_empty());
    }
}
