//! # Playcue Core Library
//!
//! Playback-automation rule engine:
//! - Time token codec (`ss`, `mm:ss`, `hh:mm:ss` to whole seconds)
//! - Line-oriented rule DSL parser
//! - Rule table compilation keyed by (track identity, trigger offset)
//! - Per-session rule executor driving injected playback capabilities
//!
//! The engine is single-threaded and reactive: the host playback
//! subsystem owns the clock and delivers track-change and elapsed-sample
//! signals; the executor applies clamped seek/volume effects through the
//! `PlaybackControl` trait, firing each compiled rule at most once per
//! track-playback-session.

pub mod events;
pub mod executor;
pub mod rule;
pub mod ruleset;
pub mod time;

pub use events::EngineEvent;
pub use executor::{PlaybackControl, RuleExecutor};
pub use rule::{parse_rule, Effect, Rule, Track};
pub use ruleset::{validate_rules, RuleTable};
