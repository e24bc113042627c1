//! Scroll arbitration: decides whether a resolved location change may move
//! the viewport.
//!
//! The tug-of-war between playback-driven scrolling and live user gestures is
//! modelled as an explicit state machine instead of a pile of boolean flags:
//! a user gesture locks auto-scroll out, the lock cools down on release, and
//! a single-flight slot guarantees at most one scroll animation at a time.
//! Timer semantics are realized as deadlines checked on event entry, so the
//! machine stays deterministic under an injected clock.

use std::time::Instant;

use tracing::{debug, trace};

use crate::policy::SyncPolicy;

/// Externally observable arbitration state.
///
/// `UserScrolling` and `Locked` take precedence over `AutoScrollInFlight` in
/// this view: a user can grab the list while an animation is still settling,
/// and from that moment the gesture is what governs arbitration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollState {
    Idle,
    UserScrolling,
    Locked,
    AutoScrollInFlight,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    UserScrolling,
    Locked { until: Instant },
}

/// The scroll arbitration controller.
///
/// Owns all mutable scroll-lock state. An automatic scroll is issued only
/// when no gesture lock is active, no animation is in flight, the minimum
/// re-scroll interval has elapsed, and the target paragraph actually changed.
/// An explicit override (seek, tap) bypasses all of that.
#[derive(Debug)]
pub struct ScrollArbiter {
    policy: SyncPolicy,
    gesture: Gesture,
    in_flight_until: Option<Instant>,
    last_auto_scroll: Option<Instant>,
    last_scrolled_paragraph: Option<usize>,
}

impl ScrollArbiter {
    pub fn new(policy: SyncPolicy) -> Self {
        Self {
            policy,
            gesture: Gesture::Idle,
            in_flight_until: None,
            last_auto_scroll: None,
            last_scrolled_paragraph: None,
        }
    }

    /// The state as of the last processed event.
    pub fn state(&self) -> ScrollState {
        match self.gesture {
            Gesture::UserScrolling => ScrollState::UserScrolling,
            Gesture::Locked { .. } => ScrollState::Locked,
            Gesture::Idle if self.in_flight_until.is_some() => ScrollState::AutoScrollInFlight,
            Gesture::Idle => ScrollState::Idle,
        }
    }

    pub fn is_scroll_in_flight(&self) -> bool {
        self.in_flight_until.is_some()
    }

    /// The user put a finger down and the list is tracking it.
    pub fn on_user_scroll_begin(&mut self, now: Instant) {
        self.expire(now);
        // Entering UserScrolling discards any pending lock expiry.
        self.gesture = Gesture::UserScrolling;
        trace!("user scroll begin");
    }

    /// Drag release or momentum end: start the cool-down lock.
    pub fn on_user_scroll_end(&mut self, now: Instant) {
        self.expire(now);
        self.gesture = Gesture::Locked {
            until: now + self.policy.scroll_lock_duration,
        };
        trace!("user scroll end, lock started");
    }

    /// The scroll animation reported completion.
    pub fn on_scroll_complete(&mut self, now: Instant) {
        self.expire(now);
        if self.in_flight_until.take().is_some() {
            trace!("scroll animation completed");
        }
    }

    /// A new location was resolved. Returns the paragraph to scroll to, or
    /// `None` when the request is suppressed. Suppressed requests are not
    /// queued: the next qualifying change after unlock triggers normally.
    pub fn on_location_changed(&mut self, now: Instant, paragraph_index: usize) -> Option<usize> {
        self.expire(now);

        if !matches!(self.gesture, Gesture::Idle) {
            trace!(paragraph = paragraph_index, "auto-scroll suppressed: user lock");
            return None;
        }
        if self.in_flight_until.is_some() {
            trace!(paragraph = paragraph_index, "auto-scroll suppressed: in flight");
            return None;
        }
        if let Some(last) = self.last_auto_scroll {
            if now.duration_since(last) < self.policy.min_scroll_interval {
                trace!(paragraph = paragraph_index, "auto-scroll suppressed: throttle");
                return None;
            }
        }
        if self.last_scrolled_paragraph == Some(paragraph_index) {
            return None;
        }

        self.begin_scroll(now, paragraph_index);
        Some(paragraph_index)
    }

    /// Explicit user intent (seek, tap, slider release): always wins.
    ///
    /// Clears any gesture lock, replaces any in-flight animation, and ignores
    /// the re-scroll throttle for this one request.
    pub fn on_explicit_override(&mut self, now: Instant, paragraph_index: usize) -> usize {
        self.gesture = Gesture::Idle;
        self.begin_scroll(now, paragraph_index);
        debug!(paragraph = paragraph_index, "explicit override scroll");
        paragraph_index
    }

    /// Drop all pending deadlines and history (transcript change, unmount).
    pub fn reset(&mut self) {
        self.gesture = Gesture::Idle;
        self.in_flight_until = None;
        self.last_auto_scroll = None;
        self.last_scrolled_paragraph = None;
    }

    fn begin_scroll(&mut self, now: Instant, paragraph_index: usize) {
        self.in_flight_until = Some(now + self.policy.scroll_animation_timeout);
        self.last_auto_scroll = Some(now);
        self.last_scrolled_paragraph = Some(paragraph_index);
        debug!(paragraph = paragraph_index, "scroll issued");
    }

    /// Apply deadline expirations. A lost animation-completion callback can
    /// never wedge the single-flight slot past its timeout.
    fn expire(&mut self, now: Instant) {
        if let Gesture::Locked { until } = self.gesture {
            if now >= until {
                debug!("scroll lock expired");
                self.gesture = Gesture::Idle;
            }
        }
        if let Some(deadline) = self.in_flight_until {
            if now >= deadline {
                debug!("scroll animation timed out, releasing single-flight slot");
                self.in_flight_until = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};
    use crate::policy::DEFAULT_SYNC_POLICY;
    use std::time::Duration;

    fn arbiter() -> (ScrollArbiter, ManualClock) {
        (ScrollArbiter::new(DEFAULT_SYNC_POLICY), ManualClock::new())
    }

    #[test]
    fn first_location_change_scrolls() {
        let (mut arb, clock) = arbiter();
        assert_eq!(arb.on_location_changed(clock.now(), 0), Some(0));
        assert_eq!(arb.state(), ScrollState::AutoScrollInFlight);
    }

    #[test]
    fn same_paragraph_is_not_rescrolled() {
        let (mut arb, clock) = arbiter();
        assert_eq!(arb.on_location_changed(clock.now(), 2), Some(2));
        arb.on_scroll_complete(clock.now());
        clock.advance(Duration::from_secs(1));
        assert_eq!(arb.on_location_changed(clock.now(), 2), None);
    }

    #[test]
    fn user_scroll_suppresses_auto_scroll_until_lock_expires() {
        let (mut arb, clock) = arbiter();
        arb.on_user_scroll_begin(clock.now());
        assert_eq!(arb.state(), ScrollState::UserScrolling);
        assert_eq!(arb.on_location_changed(clock.now(), 1), None);

        arb.on_user_scroll_end(clock.now());
        assert_eq!(arb.state(), ScrollState::Locked);

        // 19s in: still locked.
        clock.advance(Duration::from_secs(19));
        assert_eq!(arb.on_location_changed(clock.now(), 2), None);
        assert_eq!(arb.state(), ScrollState::Locked);

        // 21s in: lock expired, scrolling resumes.
        clock.advance(Duration::from_secs(2));
        assert_eq!(arb.on_location_changed(clock.now(), 3), Some(3));
    }

    #[test]
    fn scroll_begin_cancels_pending_lock_expiry() {
        let (mut arb, clock) = arbiter();
        arb.on_user_scroll_end(clock.now());
        clock.advance(Duration::from_secs(19));

        // Grabbing the list again replaces the old lock entirely.
        arb.on_user_scroll_begin(clock.now());
        arb.on_user_scroll_end(clock.now());
        clock.advance(Duration::from_secs(2));

        // The original lock would have expired by now; the fresh one has not.
        assert_eq!(arb.on_location_changed(clock.now(), 1), None);
        assert_eq!(arb.state(), ScrollState::Locked);
    }

    #[test]
    fn single_flight_blocks_until_completion() {
        let (mut arb, clock) = arbiter();
        assert_eq!(arb.on_location_changed(clock.now(), 0), Some(0));

        // Past the throttle but the animation has not completed.
        clock.advance(Duration::from_millis(400));
        assert_eq!(arb.on_location_changed(clock.now(), 1), None);

        arb.on_scroll_complete(clock.now());
        clock.advance(Duration::from_millis(400));
        assert_eq!(arb.on_location_changed(clock.now(), 1), Some(1));
    }

    #[test]
    fn single_flight_slot_is_released_by_timeout() {
        let (mut arb, clock) = arbiter();
        assert_eq!(arb.on_location_changed(clock.now(), 0), Some(0));

        // Completion callback never arrives; the timeout frees the slot.
        clock.advance(DEFAULT_SYNC_POLICY.scroll_animation_timeout);
        assert_eq!(arb.on_location_changed(clock.now(), 1), Some(1));
    }

    #[test]
    fn throttle_suppresses_rapid_rescrolls() {
        let (mut arb, clock) = arbiter();
        assert_eq!(arb.on_location_changed(clock.now(), 0), Some(0));
        arb.on_scroll_complete(clock.now());

        clock.advance(Duration::from_millis(100));
        assert_eq!(arb.on_location_changed(clock.now(), 1), None);

        clock.advance(Duration::from_millis(300));
        assert_eq!(arb.on_location_changed(clock.now(), 1), Some(1));
    }

    #[test]
    fn override_bypasses_lock_throttle_and_in_flight() {
        let (mut arb, clock) = arbiter();
        assert_eq!(arb.on_location_changed(clock.now(), 0), Some(0));

        arb.on_user_scroll_begin(clock.now());
        arb.on_user_scroll_end(clock.now());

        // Locked, in flight, and well inside the throttle window; the
        // override scrolls anyway and clears the lock.
        assert_eq!(arb.on_explicit_override(clock.now(), 5), 5);
        assert_eq!(arb.state(), ScrollState::AutoScrollInFlight);

        arb.on_scroll_complete(clock.now());
        clock.advance(Duration::from_millis(400));
        assert_eq!(arb.on_location_changed(clock.now(), 6), Some(6));
    }

    #[test]
    fn reset_clears_history_and_deadlines() {
        let (mut arb, clock) = arbiter();
        arb.on_user_scroll_end(clock.now());
        assert_eq!(arb.on_location_changed(clock.now(), 0), None);

        arb.reset();
        assert_eq!(arb.state(), ScrollState::Idle);
        assert_eq!(arb.on_location_changed(clock.now(), 0), Some(0));
    }
}
