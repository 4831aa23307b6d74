//! Subcommand implementations for the playcue CLI

use std::path::Path;

use playcue_core::time::{format_time, parse_time};
use playcue_core::{validate_rules, Rule, RuleExecutor, RuleTable, Track};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::sim::SimulatedPlayer;

/// Parse a duration argument: either a DSL time token (`hh:mm:ss` etc.)
/// or a plain seconds integer (for values like `200` that the bare token
/// form rejects).
pub fn parse_duration(value: &str) -> Result<u32> {
    if let Some(secs) = parse_time(value) {
        return Ok(secs);
    }
    value
        .parse::<u32>()
        .map_err(|_| Error::InvalidDuration(value.to_string()))
}

/// `validate`: print the cleaned rule text (only lines that parse).
pub fn run_validate(file: &Path, duration: u32) -> Result<()> {
    let text = std::fs::read_to_string(file)?;
    let cleaned = validate_rules(Some(&text), duration);

    let total = text.split('\n').filter(|l| !l.trim().is_empty()).count();
    let kept = cleaned.split('\n').filter(|l| !l.is_empty()).count();
    info!("Kept {} of {} non-blank lines", kept, total);

    print!("{}", cleaned);
    Ok(())
}

/// `compile`: print the compiled rule table as JSON, sorted by trigger.
pub fn run_compile(file: &Path, duration: u32) -> Result<()> {
    let text = std::fs::read_to_string(file)?;
    let track = Track {
        track_id: Uuid::new_v4(),
        duration_secs: duration,
        rules: Some(text),
    };

    let table = RuleTable::compile(&track);
    let mut rules: Vec<Rule> = table.entries().map(|(_, rule)| *rule).collect();
    rules.sort_by_key(|rule| rule.trigger);

    info!("Compiled {} rules", rules.len());
    println!("{}", serde_json::to_string_pretty(&rules)?);
    Ok(())
}

/// `simulate`: drive a simulated playback deck through an entire session,
/// applying rules as the clock passes their triggers.
pub async fn run_simulate(
    file: &Path,
    duration: u32,
    from: u32,
    volume: u8,
    realtime: bool,
) -> Result<()> {
    let text = std::fs::read_to_string(file)?;
    let track = Track {
        track_id: Uuid::new_v4(),
        duration_secs: duration,
        rules: Some(text),
    };

    let mut executor = RuleExecutor::new(SimulatedPlayer::new(from, volume));
    let mut events = executor.subscribe_events();
    executor.track_changed(Some(track), from);
    info!("Simulating session: {} armed rules", executor.armed_count());

    let mut interval = tokio::time::interval(std::time::Duration::from_secs(1));
    // Backward seeks replay earlier sections of the track; bound the
    // session so a pathological rule file terminates anyway
    let max_ticks = duration as usize * 4 + 16;
    let mut ticks = 0;

    loop {
        let position = executor.control().position();
        if position > duration {
            break;
        }

        if realtime {
            interval.tick().await;
        }

        executor.on_elapsed(position);
        executor.control_mut().tick();

        // Drain as we go so the event channel never lags behind
        while let Ok(event) = events.try_recv() {
            println!("{}", serde_json::to_string(&event)?);
        }

        ticks += 1;
        if ticks >= max_ticks {
            warn!("Session did not reach track end after {} samples; stopping", ticks);
            break;
        }
    }

    while let Ok(event) = events.try_recv() {
        println!("{}", serde_json::to_string(&event)?);
    }

    let player = executor.control();
    info!(
        "Session finished at {}: {} seeks, {} volume changes, final volume {}, {} rules still armed",
        format_time(player.position() as i64),
        player.seek_count(),
        player.volume_count(),
        player.volume(),
        executor.armed_count()
    );
    Ok(())
}
