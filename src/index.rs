//! The timing index: ordered paragraphs of validated word timings.
//!
//! Built once per transcript load from the raw backend payload, then treated
//! as immutable. Malformed timestamps are repaired during the build, never
//! rejected, so a partial transcript stays navigable.

use serde::Serialize;
use tracing::debug;

use crate::policy::SyncPolicy;
use crate::raw::RawWord;

/// A transcript token with validated timing bounds.
///
/// Post-build invariant: `0 <= start_seconds <= end_seconds`.
#[derive(Debug, Clone, Serialize)]
pub struct TimedWord {
    /// Token text (punctuated form when the payload provides one).
    pub text: String,
    /// Start time in seconds.
    pub start_seconds: f32,
    /// End time in seconds.
    pub end_seconds: f32,
}

/// A contiguous run of timed words grouped for display and scroll-granularity
/// purposes. Bounds are derived from the first and last word.
#[derive(Debug, Clone, Serialize)]
pub struct Paragraph {
    pub index: usize,
    pub start_seconds: f32,
    pub end_seconds: f32,
    pub words: Vec<TimedWord>,
}

impl Paragraph {
    /// Whether `time` falls inside this paragraph's `[start, end)` interval.
    pub fn contains(&self, time: f32) -> bool {
        time >= self.start_seconds && time < self.end_seconds
    }

    /// Distance from `time` to the nearest of the paragraph's two bounds.
    pub(crate) fn boundary_distance(&self, time: f32) -> f32 {
        (time - self.start_seconds)
            .abs()
            .min((time - self.end_seconds).abs())
    }
}

/// Ordered, immutable paragraphs built once per transcript load.
///
/// An empty index means "no synchronization available": the transcript can
/// still be displayed, but no highlight or auto-scroll will be produced.
#[derive(Debug, Clone, Default)]
pub struct TimingIndex {
    paragraphs: Vec<Paragraph>,
}

impl TimingIndex {
    /// Build an index from raw backend records.
    ///
    /// Repair rules:
    /// - Records with no usable text are dropped.
    /// - A missing/negative/non-finite `start` inherits the previous word's
    ///   end (0 for the first word).
    /// - A missing/non-finite `end`, or one earlier than the repaired start,
    ///   becomes `start + default_word_duration_seconds`.
    ///
    /// Never fails: empty or entirely unusable input yields an empty index.
    pub fn build(raw_words: &[RawWord], policy: &SyncPolicy) -> Self {
        let mut words: Vec<TimedWord> = Vec::with_capacity(raw_words.len());
        let mut previous_end = 0.0f32;

        for raw in raw_words {
            let Some(text) = raw.display_text() else {
                continue;
            };

            let start = match raw.start {
                Some(s) if s.is_finite() && s >= 0.0 => s as f32,
                _ => previous_end,
            };
            let end = match raw.end {
                Some(e) if e.is_finite() && e as f32 >= start => e as f32,
                _ => start + policy.default_word_duration_seconds,
            };
            previous_end = end;

            words.push(TimedWord {
                text: text.to_owned(),
                start_seconds: start,
                end_seconds: end,
            });
        }

        let per_paragraph = policy.words_per_paragraph.max(1);
        let paragraphs: Vec<Paragraph> = words
            .chunks(per_paragraph)
            .enumerate()
            .map(|(index, chunk)| Paragraph {
                index,
                start_seconds: chunk[0].start_seconds,
                end_seconds: chunk[chunk.len() - 1].end_seconds,
                words: chunk.to_vec(),
            })
            .collect();

        debug!(
            raw = raw_words.len(),
            kept = words.len(),
            paragraphs = paragraphs.len(),
            "timing index built"
        );

        Self { paragraphs }
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn paragraph(&self, index: usize) -> Option<&Paragraph> {
        self.paragraphs.get(index)
    }

    /// Look up a word by paragraph and word index.
    pub fn word(&self, paragraph_index: usize, word_index: usize) -> Option<&TimedWord> {
        self.paragraphs
            .get(paragraph_index)
            .and_then(|p| p.words.get(word_index))
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Total time span covered by the index (end of the last paragraph).
    pub fn duration_seconds(&self) -> f32 {
        self.paragraphs.last().map_or(0.0, |p| p.end_seconds)
    }
}
