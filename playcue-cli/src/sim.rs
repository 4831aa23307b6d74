//! Simulated playback deck for the `simulate` subcommand
//!
//! Stands in for a real playback engine: keeps its own elapsed position
//! and volume, and applies seeks to that position so the executor sees
//! the same discontinuous sample sequences a real player would produce.

use playcue_core::PlaybackControl;
use tracing::debug;

/// In-memory playback deck driven by the simulation loop.
#[derive(Debug)]
pub struct SimulatedPlayer {
    position: u32,
    volume: u8,
    seek_count: usize,
    volume_count: usize,
    seeked_this_tick: bool,
}

impl SimulatedPlayer {
    pub fn new(position: u32, volume: u8) -> Self {
        Self {
            position,
            volume,
            seek_count: 0,
            volume_count: 0,
            seeked_this_tick: false,
        }
    }

    /// Current playback position (seconds from track start).
    pub fn position(&self) -> u32 {
        self.position
    }

    /// Current output volume (0-100).
    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// Total seek commands applied.
    pub fn seek_count(&self) -> usize {
        self.seek_count
    }

    /// Total volume commands applied.
    pub fn volume_count(&self) -> usize {
        self.volume_count
    }

    /// Advance the clock by one second of playback, unless a seek already
    /// moved it this tick (the next sample then reports the seek target).
    pub fn tick(&mut self) {
        if self.seeked_this_tick {
            self.seeked_this_tick = false;
        } else {
            self.position += 1;
        }
    }
}

impl PlaybackControl for SimulatedPlayer {
    fn seek(&mut self, target_secs: u32) {
        debug!("simulated seek: {} -> {}", self.position, target_secs);
        self.position = target_secs;
        self.seek_count += 1;
        self.seeked_this_tick = true;
    }

    fn set_volume(&mut self, level: u8) {
        debug!("simulated volume: {} -> {}", self.volume, level);
        self.volume = level;
        self.volume_count += 1;
    }
}
