//! The transcript-view session: playback ticks and user gestures in,
//! resolved locations and scroll requests out.
//!
//! Everything runs on one logical thread of control. Entry points are
//! synchronous, processed strictly in call order, and each mutating call
//! returns a [`SyncUpdate`], the `{ location, scroll_to }` observable the
//! rendering layer applies. The session never fails and never panics; every
//! anomaly degrades to an inert update.

use serde::Serialize;
use tracing::{debug, trace};

use std::time::Instant;

use crate::arbiter::{ScrollArbiter, ScrollState};
use crate::clock::{Clock, MonotonicClock};
use crate::index::TimingIndex;
use crate::policy::SyncPolicy;
use crate::resolver::{PlaybackLocation, resolve_from, sanitize_time};

/// One step of engine output for the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncUpdate {
    /// The resolved current location, if synchronization is active.
    pub location: Option<PlaybackLocation>,
    /// Paragraph the viewport should scroll to, when arbitration permits.
    pub scroll_to: Option<usize>,
}

/// Returned by [`SyncSession::seek_to_word`] so the embedding layer can also
/// reposition the audio player.
#[derive(Debug, Clone)]
pub struct SeekOutcome {
    /// The playback time the player should jump to (the word's start).
    pub time_seconds: f32,
    pub update: SyncUpdate,
}

#[derive(Debug, Clone, Copy)]
struct SeekSettle {
    target_seconds: f32,
    issued_at: Instant,
}

/// The time-synchronized transcript playback session.
///
/// Owns the timing index, the scroll arbiter, and the last resolved location.
/// Constructed at view mount, reloaded on transcript change, dropped at
/// unmount (no timers or subscriptions outlive it).
pub struct SyncSession<C: Clock = MonotonicClock> {
    index: TimingIndex,
    policy: SyncPolicy,
    arbiter: ScrollArbiter,
    clock: C,
    location: Option<PlaybackLocation>,
    scrubbing: bool,
    pending_seek: Option<SeekSettle>,
}

impl SyncSession<MonotonicClock> {
    pub fn new(index: TimingIndex, policy: SyncPolicy) -> Self {
        Self::with_clock(index, policy, MonotonicClock)
    }
}

impl<C: Clock> SyncSession<C> {
    /// Create a session with an injected clock (tests, offline simulation).
    pub fn with_clock(index: TimingIndex, policy: SyncPolicy, clock: C) -> Self {
        Self {
            index,
            policy,
            arbiter: ScrollArbiter::new(policy),
            clock,
            location: None,
            scrubbing: false,
            pending_seek: None,
        }
    }

    /// Whether word-level synchronization is active for this transcript.
    ///
    /// `false` means the degraded mode of an empty index: the transcript is
    /// readable but no highlight or auto-scroll will be produced.
    pub fn is_synchronized(&self) -> bool {
        !self.index.is_empty()
    }

    pub fn index(&self) -> &TimingIndex {
        &self.index
    }

    pub fn location(&self) -> Option<&PlaybackLocation> {
        self.location.as_ref()
    }

    pub fn scroll_state(&self) -> ScrollState {
        self.arbiter.state()
    }

    /// Replace the transcript. Arbitration state, the resolved location, and
    /// any pending seek or scrub are discarded with the old index.
    pub fn load(&mut self, index: TimingIndex) {
        debug!(paragraphs = index.len(), "transcript loaded");
        self.index = index;
        self.arbiter.reset();
        self.location = None;
        self.scrubbing = false;
        self.pending_seek = None;
    }

    /// Periodic playback-position tick.
    ///
    /// Ticks are ignored while the user is scrubbing, and discarded while a
    /// just-issued seek settles (the position source may still be reporting
    /// the pre-seek time); an override always wins over ticks.
    pub fn on_playback_tick(&mut self, time_seconds: f32) -> SyncUpdate {
        let now = self.clock.now();

        if self.scrubbing {
            trace!(time_seconds, "tick ignored during scrub");
            return self.inert_update();
        }

        if let Some(settle) = self.pending_seek {
            let caught_up = (sanitize_time(time_seconds) - settle.target_seconds).abs()
                <= self.policy.seek_settle_tolerance_seconds;
            let window_elapsed =
                now.duration_since(settle.issued_at) >= self.policy.seek_settle_window;
            if !caught_up && !window_elapsed {
                trace!(time_seconds, "stale tick discarded during seek settle");
                return self.inert_update();
            }
            self.pending_seek = None;
        }

        let resolved = resolve_from(time_seconds, &self.index, self.location.as_ref(), &self.policy);
        let scroll_to = resolved
            .as_ref()
            .and_then(|loc| self.arbiter.on_location_changed(now, loc.paragraph_index));
        self.location = resolved;

        SyncUpdate {
            location: self.location.clone(),
            scroll_to,
        }
    }

    pub fn on_user_scroll_begin(&mut self) {
        let now = self.clock.now();
        self.arbiter.on_user_scroll_begin(now);
    }

    pub fn on_user_scroll_end(&mut self) {
        let now = self.clock.now();
        self.arbiter.on_user_scroll_end(now);
    }

    /// The rendering layer finished (or abandoned) the scroll animation.
    pub fn on_scroll_complete(&mut self) {
        let now = self.clock.now();
        self.arbiter.on_scroll_complete(now);
    }

    /// Explicit seek (slider release, waveform tap).
    ///
    /// Resolves at the target time and forces a scroll there, clearing any
    /// standing user-scroll lock and bypassing the re-scroll throttle.
    pub fn seek(&mut self, time_seconds: f32) -> SyncUpdate {
        let now = self.clock.now();
        let target = sanitize_time(time_seconds);
        self.scrubbing = false;

        let resolved = resolve_from(target, &self.index, self.location.as_ref(), &self.policy);
        let scroll_to = match resolved.as_ref() {
            Some(loc) => Some(self.arbiter.on_explicit_override(now, loc.paragraph_index)),
            // Nothing to scroll to, but the override still clears any
            // standing lock.
            None => {
                self.arbiter.reset();
                None
            }
        };
        self.location = resolved;
        self.pending_seek = Some(SeekSettle {
            target_seconds: target,
            issued_at: now,
        });
        debug!(seconds = target, "explicit seek");

        SyncUpdate {
            location: self.location.clone(),
            scroll_to,
        }
    }

    /// Direct tap on a word: seek to its start.
    ///
    /// Returns `None` when the word does not exist (stale tap against a
    /// reloaded transcript); nothing changes in that case.
    pub fn seek_to_word(&mut self, paragraph_index: usize, word_index: usize) -> Option<SeekOutcome> {
        let time_seconds = self
            .index
            .word(paragraph_index, word_index)
            .map(|w| w.start_seconds)?;
        Some(SeekOutcome {
            time_seconds,
            update: self.seek(time_seconds),
        })
    }

    /// The user grabbed the slider; intermediate values update the highlight
    /// only (see [`Self::scrub`]) until release commits the seek.
    pub fn begin_scrub(&mut self) {
        self.scrubbing = true;
    }

    /// Intermediate slider value: visual feedback only, never a scroll.
    pub fn scrub(&mut self, time_seconds: f32) -> SyncUpdate {
        self.scrubbing = true;
        self.location = resolve_from(time_seconds, &self.index, self.location.as_ref(), &self.policy);
        SyncUpdate {
            location: self.location.clone(),
            scroll_to: None,
        }
    }

    /// Slider release: commit the scrub as an explicit seek.
    pub fn end_scrub(&mut self, time_seconds: f32) -> SyncUpdate {
        self.scrubbing = false;
        self.seek(time_seconds)
    }

    fn inert_update(&self) -> SyncUpdate {
        SyncUpdate {
            location: self.location.clone(),
            scroll_to: None,
        }
    }
}
