//! Rule table compilation and rule-text validation
//!
//! Turns a track's full rule text into an executable table keyed by
//! `(track identity, trigger offset)`. The table is session-scoped: it is
//! rebuilt wholesale when the active track changes and entries are removed
//! as rules fire, so replaying a track re-arms every rule.

use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;

use crate::rule::{parse_rule, Rule, Track};

/// Composite key identifying one armed rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleKey {
    pub track_id: Uuid,
    pub trigger: u32,
}

/// Compiled, executable rule table for one playback session.
///
/// Exactly one rule per key: when two source lines resolve to the same
/// trigger for the same track, the later line silently overrides the
/// earlier one (last-write-wins, a deliberate simplification).
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    entries: HashMap<RuleKey, Rule>,
}

impl RuleTable {
    /// Create an empty table (no active track).
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile a track's rule text into a table.
    ///
    /// Splits on line breaks, parses each line independently, and folds
    /// successes into the map in source order so a duplicate trigger keeps
    /// the later line. Malformed lines are silently dropped; absent rule
    /// text yields an empty table.
    pub fn compile(track: &Track) -> Self {
        let mut entries = HashMap::new();

        if let Some(rules) = track.rules.as_deref() {
            for line in rules.split('\n') {
                if let Some(rule) = parse_rule(line, track.duration_secs) {
                    entries.insert(
                        RuleKey {
                            track_id: track.track_id,
                            trigger: rule.trigger,
                        },
                        rule,
                    );
                }
            }
        }

        debug!(
            "Compiled {} rules for track {}",
            entries.len(),
            track.track_id
        );

        Self { entries }
    }

    /// Look up the rule armed at `(track_id, trigger)`.
    pub fn get(&self, track_id: Uuid, trigger: u32) -> Option<&Rule> {
        self.entries.get(&RuleKey { track_id, trigger })
    }

    /// Retire a fired rule. Returns the removed rule, if any.
    pub fn remove(&mut self, track_id: Uuid, trigger: u32) -> Option<Rule> {
        self.entries.remove(&RuleKey { track_id, trigger })
    }

    /// Check whether a rule is still armed at `(track_id, trigger)`.
    pub fn contains(&self, track_id: Uuid, trigger: u32) -> bool {
        self.entries.contains_key(&RuleKey { track_id, trigger })
    }

    /// Iterate over all armed entries (unordered).
    pub fn entries(&self) -> impl Iterator<Item = (&RuleKey, &Rule)> {
        self.entries.iter()
    }

    /// Number of armed entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no entries remain armed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Re-serialize only the lines of `rules` that parse successfully.
///
/// Each surviving line keeps its original textual form (not a reformatted
/// one) and its original order, followed by a line break. Called before
/// handing edited rule text to storage, so the persisted text never
/// contains a line the parser would reject. Empty or absent input yields
/// an empty string.
pub fn validate_rules(rules: Option<&str>, track_duration: u32) -> String {
    let Some(rules) = rules else {
        return String::new();
    };

    let mut valid = String::new();
    for line in rules.split('\n') {
        if parse_rule(line, track_duration).is_some() {
            valid.push_str(line);
            valid.push('\n');
        }
    }

    valid
}
