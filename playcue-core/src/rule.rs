//! Rule types and single-line DSL parsing
//!
//! A rule line schedules one playback action at an absolute elapsed-time
//! offset within a track:
//!
//! ```text
//! at <time> goto   <time>|next
//! at <time> seek   <+N|-N>
//! at <time> volume <N>
//! ```
//!
//! Malformed lines are a normal, expected outcome: `parse_rule` returns
//! `None` rather than an error, and one bad line never affects its
//! siblings.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::time::parse_time;

/// Track description consumed by the compiler and executor.
///
/// `duration_secs` is needed at parse time to resolve the `next` sentinel;
/// `rules` is the raw newline-separated rule text as persisted by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Track identity; a fresh table is compiled whenever it changes
    pub track_id: Uuid,

    /// Total track duration in whole seconds
    pub duration_secs: u32,

    /// Raw rule text, one rule per line (None when the track has no rules)
    pub rules: Option<String>,
}

/// Resolved effect of a rule, applied through `PlaybackControl` when the
/// rule fires.
///
/// Parameters are unclamped here; the executor clamps a seek target to
/// `[0, duration]` and a volume level to `[0, 100]` at fire time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Effect {
    /// Jump playback to an absolute offset in seconds.
    ///
    /// Signed: a `seek -N` line may resolve below zero before clamping.
    Seek { target: i64 },

    /// Set output volume.
    Volume { level: i64 },
}

/// One compiled rule: an absolute trigger offset plus its resolved effect.
///
/// Rules are immutable values produced only by successful parses; there is
/// no invalid-rule variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Elapsed-time offset (whole seconds from track start) at which the
    /// rule becomes eligible to fire
    pub trigger: u32,

    /// Resolved action and parameter
    pub effect: Effect,
}

/// Parse one rule line against the owning track's duration.
///
/// The line must be exactly four whitespace-delimited tokens starting with
/// the `at` keyword. Resolution:
/// - `goto <time>` - seek to the absolute offset
/// - `goto next` - seek to `track_duration` (end of track)
/// - `seek <±N>` - seek to `trigger + N` (relative to the rule's own
///   trigger, not to the moment it fires)
/// - `volume <N>` - set volume, unclamped at parse time
///
/// Returns `None` for wrong token count, unknown verb, unparsable time, or
/// a non-integer numeric argument.
pub fn parse_rule(line: &str, track_duration: u32) -> Option<Rule> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() != 4 || parts[0] != "at" {
        return None;
    }

    let trigger = parse_time(parts[1])?;

    let effect = match parts[2] {
        "goto" => {
            if parts[3] == "next" {
                Effect::Seek {
                    target: track_duration as i64,
                }
            } else {
                Effect::Seek {
                    target: parse_time(parts[3])? as i64,
                }
            }
        }
        "seek" => {
            let offset: i64 = parts[3].parse().ok()?;
            Effect::Seek {
                target: trigger as i64 + offset,
            }
        }
        "volume" => {
            let level: i64 = parts[3].parse().ok()?;
            Effect::Volume { level }
        }
        _ => return None,
    };

    Some(Rule { trigger, effect })
}
