//! Plain-text rendering of the dashboard for terminal output.

use std::fmt::Write;

use xpdash_core::format::{format_audit_ratio, format_xp, AuditVerdict};
use xpdash_core::DashboardView;

/// Width of the widest bar in the project chart.
const BAR_WIDTH: usize = 30;

pub fn render_dashboard(view: &DashboardView, show_all_skills: bool) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    write_dashboard(&mut out, view, show_all_skills)?;
    Ok(out)
}

fn write_dashboard(out: &mut String, view: &DashboardView, show_all_skills: bool) -> std::fmt::Result {
    match &view.profile {
        Some(p) => writeln!(out, "Welcome, {}! (#{})", p.login, p.id)?,
        None => writeln!(out, "Welcome!")?,
    }
    writeln!(out)?;

    writeln!(out, "Total XP:     {}", format_xp(view.total_xp as f64))?;
    match view.pass_rate {
        Some(rate) => writeln!(
            out,
            "Pass Rate:    {}% ({} pass / {} fail)",
            rate, view.pass_count, view.fail_count
        )?,
        None => writeln!(out, "Pass Rate:    n/a")?,
    }
    if let Some(ratio) = view.profile.as_ref().and_then(|p| p.audit_ratio) {
        writeln!(
            out,
            "Audit Ratio:  {} ({})",
            format_audit_ratio(ratio),
            AuditVerdict::from_ratio(ratio).label()
        )?;
    }
    writeln!(out)?;

    writeln!(out, "SKILLS")?;
    let visible = view.visible_skills(show_all_skills);
    for skill in visible {
        writeln!(out, "  {:<24} {:>3}%", skill.name, skill.value)?;
    }
    if visible.len() < view.skills.len() {
        writeln!(out, "  … {} more (--all-skills)", view.skills.len() - visible.len())?;
    }
    writeln!(out)?;

    writeln!(out, "XP PROGRESS")?;
    match (view.cumulative_xp.first(), view.cumulative_xp.last()) {
        (Some(first), Some(last)) => writeln!(
            out,
            "  {} → {}: {} over {} transactions",
            first.x.format("%b %Y"),
            last.x.format("%b %Y"),
            format_xp(last.y as f64),
            view.cumulative_xp.len()
        )?,
        _ => writeln!(out, "  no xp yet")?,
    }
    writeln!(out)?;

    writeln!(out, "XP BY PROJECT")?;
    let max = view.projects.iter().map(|p| p.xp).max().unwrap_or(0).max(1);
    for p in &view.projects {
        let len = ((p.xp.max(0) as f64 / max as f64) * BAR_WIDTH as f64).round() as usize;
        writeln!(out, "  {:<24} {:<width$} {}", p.project, "█".repeat(len), format_xp(p.xp as f64), width = BAR_WIDTH)?;
    }
    writeln!(out)?;

    writeln!(out, "PISCINE")?;
    writeln!(out, "  Pass: {}  Fail: {}  Total: {}", view.piscine.pass, view.piscine.fail, view.piscine.total())?;
    for (exercise, count) in view.piscine.attempts.iter() {
        writeln!(out, "  {:<24} {} attempt{}", exercise, count, if count == 1 { "" } else { "s" })?;
    }

    Ok(())
}
