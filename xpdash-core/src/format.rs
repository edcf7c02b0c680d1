//! Display helpers shared by every frontend.

/// Round `n` up to three significant figures. `714.1` → `715`, `1.231` → `1.24`.
///
/// Returns the scaled integer mantissa and the power of ten it applies to, so
/// callers can print it without binary float noise.
fn ceil_to_3sf(n: f64) -> (f64, i32) {
    if n == 0.0 {
        return (0.0, 0);
    }
    let exponent = n.abs().log10().floor() as i32 - 2;
    let scaled = n / 10f64.powi(exponent);
    // 1.23 / 0.01 lands a hair above 123; snap before taking the ceiling.
    let mantissa = if (scaled - scaled.round()).abs() < 1e-9 {
        scaled.round()
    } else {
        scaled.ceil()
    };
    (mantissa, exponent)
}

fn render_3sf(n: f64) -> String {
    let (mantissa, exponent) = ceil_to_3sf(n);
    if exponent >= 0 {
        return format!("{}", mantissa * 10f64.powi(exponent));
    }
    let decimals = (-exponent) as usize;
    let text = format!("{:.*}", decimals, mantissa / 10f64.powi(-exponent));
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Human-readable xp size: `"1.24 MB"`, `"715 kB"`, `"512 bytes"`.
///
/// This is the ceiling-to-3-significant-figures variant; values are never
/// rounded down.
pub fn format_xp(xp: f64) -> String {
    if xp >= 1_000_000.0 {
        format!("{} MB", render_3sf(xp / 1_000_000.0))
    } else if xp >= 1_000.0 {
        format!("{} kB", render_3sf(xp / 1_000.0))
    } else {
        format!("{} bytes", xp)
    }
}

/// Percentage of passed results, rounded to the nearest integer.
/// `None` when there are no results at all.
pub fn pass_rate(pass: i64, fail: i64) -> Option<u32> {
    let total = pass + fail;
    if total <= 0 {
        return None;
    }
    Some(((pass as f64 / total as f64) * 100.0).round() as u32)
}

/// Ratio at which the audit gauge is full.
pub const AUDIT_GAUGE_MAX: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditVerdict {
    AboveAverage,
    NeedsImprovement,
}

impl AuditVerdict {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= 1.0 {
            AuditVerdict::AboveAverage
        } else {
            AuditVerdict::NeedsImprovement
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AuditVerdict::AboveAverage => "Above average",
            AuditVerdict::NeedsImprovement => "Needs improvement",
        }
    }
}

/// Audit ratio at one decimal, e.g. `"1.2"`.
pub fn format_audit_ratio(ratio: f64) -> String {
    format!("{:.1}", ratio)
}

/// Fraction of the audit gauge to fill, clamped to `[0, 1]`.
pub fn audit_gauge_fill(ratio: f64) -> f64 {
    (ratio.min(AUDIT_GAUGE_MAX) / AUDIT_GAUGE_MAX).max(0.0)
}
