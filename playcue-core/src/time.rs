//! Time token codec
//!
//! Converts between the human-readable time tokens used in rule text
//! (`ss`, `mm:ss`, `hh:mm:ss`) and whole-second offsets.
//!
//! Both directions are pure and total: malformed tokens parse to `None`,
//! non-positive offsets format as `0:00`. Formatting is for display only
//! and is not required to round-trip every parseable token.

/// Parse a time token into total seconds.
///
/// Accepts exactly one of three shapes, each component 1-2 ASCII digits:
/// - `ss` with `ss` in `0..=59`
/// - `mm:ss` with `mm` and `ss` in `0..=59`
/// - `hh:mm:ss` with `hh` unconstrained in range, `mm` and `ss` in `0..=59`
///
/// Anything else (extra components, out-of-range minutes/seconds, signs,
/// non-numeric text, empty string) is `None`.
///
/// # Examples
///
/// ```
/// use playcue_core::time::parse_time;
///
/// assert_eq!(parse_time("5"), Some(5));
/// assert_eq!(parse_time("1:10"), Some(70));
/// assert_eq!(parse_time("1:01:01"), Some(3661));
/// assert_eq!(parse_time("60:00"), None);
/// assert_eq!(parse_time("abc"), None);
/// ```
pub fn parse_time(token: &str) -> Option<u32> {
    let parts: Vec<&str> = token.split(':').collect();

    match parts.as_slice() {
        [ss] => {
            let ss = component(ss)?;
            (ss <= 59).then_some(ss)
        }
        [mm, ss] => {
            let mm = component(mm)?;
            let ss = component(ss)?;
            (mm <= 59 && ss <= 59).then_some(mm * 60 + ss)
        }
        [hh, mm, ss] => {
            let hh = component(hh)?;
            let mm = component(mm)?;
            let ss = component(ss)?;
            (mm <= 59 && ss <= 59).then_some(hh * 3600 + mm * 60 + ss)
        }
        _ => None,
    }
}

/// Parse one 1-2 digit numeric component.
fn component(s: &str) -> Option<u32> {
    if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Format a whole-second offset for display as `m:ss`.
///
/// Minutes are unbounded (no hours component), seconds zero-padded to two
/// digits. Non-positive input formats as `0:00`.
///
/// # Examples
///
/// ```
/// use playcue_core::time::format_time;
///
/// assert_eq!(format_time(5), "0:05");
/// assert_eq!(format_time(70), "1:10");
/// assert_eq!(format_time(-3), "0:00");
/// ```
pub fn format_time(seconds: i64) -> String {
    if seconds <= 0 {
        return "0:00".to_string();
    }

    let mins = seconds / 60;
    let secs = seconds % 60;
    format!("{}:{:02}", mins, secs)
}
