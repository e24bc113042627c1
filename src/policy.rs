use std::time::Duration;

/// Policy knobs for timing-index construction, position resolution, and
/// scroll arbitration.
///
/// These values are intentionally simple and expressed in human-friendly units
/// (seconds / `Duration`s). The defaults reproduce the tuned behavior of the
/// shipping player; treat them as named constants rather than retuning ad hoc.
#[derive(Debug, Clone, Copy)]
pub struct SyncPolicy {
    /// Duration substituted for a word whose end timestamp is missing,
    /// non-finite, or earlier than its start.
    pub default_word_duration_seconds: f32,

    /// Number of words grouped into one paragraph for display and
    /// scroll-granularity purposes.
    pub words_per_paragraph: usize,

    /// Silence after a word's end before the highlight advances to the next
    /// word in the same paragraph.
    pub word_advance_gap_seconds: f32,

    /// How far ahead of the current time the next paragraph's first word may
    /// start and still be selected once the current paragraph is exhausted.
    pub paragraph_lookahead_seconds: f32,

    /// Maximum number of paragraphs scanned forward when crossing a paragraph
    /// boundary. Keeps the worst-case cost of the fallback scan fixed.
    pub max_paragraph_lookahead: usize,

    /// How long auto-scroll stays suppressed after the user stops scrolling.
    pub scroll_lock_duration: Duration,

    /// Minimum interval between consecutive auto-scrolls.
    pub min_scroll_interval: Duration,

    /// Upper bound on how long a scroll animation may hold the single-flight
    /// slot before it is presumed finished.
    pub scroll_animation_timeout: Duration,

    /// Fallback paragraph height (logical pixels) used when the viewport
    /// cannot measure the target paragraph's anchor.
    pub average_paragraph_height: f32,

    /// After an explicit seek, playback ticks are discarded until the reported
    /// time is within this distance of the seek target...
    pub seek_settle_tolerance_seconds: f32,

    /// ...or until this much wall-clock time has elapsed since the seek.
    pub seek_settle_window: Duration,
}

/// Default policy matching the shipping player's tuning.
pub const DEFAULT_SYNC_POLICY: SyncPolicy = SyncPolicy {
    default_word_duration_seconds: 0.3,
    words_per_paragraph: 100,
    word_advance_gap_seconds: 0.1,
    paragraph_lookahead_seconds: 1.5,
    max_paragraph_lookahead: 3,
    scroll_lock_duration: Duration::from_secs(20),
    min_scroll_interval: Duration::from_millis(300),
    scroll_animation_timeout: Duration::from_millis(600),
    average_paragraph_height: 320.0,
    seek_settle_tolerance_seconds: 0.5,
    seek_settle_window: Duration::from_millis(1000),
};

impl Default for SyncPolicy {
    fn default() -> Self {
        DEFAULT_SYNC_POLICY
    }
}
