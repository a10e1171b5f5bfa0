use crate::config::FALLBACK_COLOR;
use once_cell::sync::Lazy;
use regex::Regex;

// Colors coming from `<input type="color">` are always `#rrggbb`
static HEX_COLOR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").unwrap());

/// Labels that award another spin instead of starting the lockout.
const FREE_SPIN_LABELS: [&str; 3] = ["free spin", "freespin", "free-spin"];

/// Trim a prize label, returning `None` when nothing is left.
pub fn clean_label(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Return `input` if it is a `#rrggbb` color, otherwise the fallback gray.
pub fn normalize_color(input: &str) -> String {
    let trimmed = input.trim();
    if HEX_COLOR_REGEX.is_match(trimmed) {
        trimmed.to_string()
    } else {
        FALLBACK_COLOR.to_string()
    }
}

/// Whether landing on `label` grants an immediate re-spin.
///
/// Matching is case-insensitive and ignores surrounding whitespace, so the
/// padded default label `"Free Spin   "` qualifies.
pub fn is_free_spin(label: &str) -> bool {
    let norm = label.trim().to_lowercase();
    FREE_SPIN_LABELS.contains(&norm.as_str())
}

/// Format milliseconds as `mm:ss`, rounding seconds up.
///
/// # Examples
/// ```
/// use prize_wheel::utils::format_ms_to_mmss;
/// assert_eq!(format_ms_to_mmss(300_000.0), "05:00");
/// assert_eq!(format_ms_to_mmss(1.0), "00:01");
/// ```
pub fn format_ms_to_mmss(ms: f64) -> String {
    let total_sec = (ms.max(0.0) / 1000.0).ceil() as u64;
    format!("{:02}:{:02}", total_sec / 60, total_sec % 60)
}

/// Format milliseconds as seconds with one decimal, e.g. `9.4s`.
pub fn format_ms_to_tenths(ms: f64) -> String {
    format!("{:.1}s", ms.max(0.0) / 1000.0)
}
