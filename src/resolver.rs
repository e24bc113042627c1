//! Pure resolution of a playback time to a (paragraph, word) location.
//!
//! Resolution is deterministic: for a fixed index and policy the output
//! depends only on the supplied time (and, for the last-resort retention
//! rule, the explicitly supplied previous location). No wall clock, no
//! randomness.

use serde::Serialize;

use crate::index::{Paragraph, TimedWord, TimingIndex};
use crate::policy::SyncPolicy;

/// The resolved "current" position for a playback time.
///
/// A derived, transient value: recomputed on every tick, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackLocation {
    pub paragraph_index: usize,
    pub word_index: usize,
    pub word_text: String,
}

/// Resolve a playback time against the index.
///
/// Returns `None` only when the index is empty. Times outside every
/// paragraph fall back to the nearest boundary, so any non-empty index
/// always resolves.
pub fn resolve(time: f32, index: &TimingIndex, policy: &SyncPolicy) -> Option<PlaybackLocation> {
    resolve_from(time, index, None, policy)
}

/// Like [`resolve`], but retains `previous` when nothing qualifies, so the
/// highlight never regresses to "undefined" during continuous playback.
pub fn resolve_from(
    time: f32,
    index: &TimingIndex,
    previous: Option<&PlaybackLocation>,
    policy: &SyncPolicy,
) -> Option<PlaybackLocation> {
    let time = sanitize_time(time);
    let Some(paragraph) = select_paragraph(time, index) else {
        return previous.cloned();
    };
    select_word(time, paragraph, index, policy).or_else(|| previous.cloned())
}

/// Clamp a playback time to something resolvable.
///
/// NaN and negative values map to 0 so a misbehaving position source cannot
/// poison resolution.
pub(crate) fn sanitize_time(time: f32) -> f32 {
    if !time.is_finite() || time < 0.0 { 0.0 } else { time }
}

/// Pick the paragraph for `time`: containment first, then nearest boundary.
///
/// On a distance tie the lower paragraph index wins (strict `<` while
/// scanning in order guarantees this).
fn select_paragraph(time: f32, index: &TimingIndex) -> Option<&Paragraph> {
    let paragraphs = index.paragraphs();

    if let Some(p) = paragraphs.iter().find(|p| p.contains(time)) {
        return Some(p);
    }

    let mut best: Option<&Paragraph> = None;
    let mut best_distance = f32::INFINITY;
    for p in paragraphs {
        let d = p.boundary_distance(time);
        if d < best_distance {
            best_distance = d;
            best = Some(p);
        }
    }
    best
}

/// Pick the word for `time` inside `paragraph`, in priority order:
/// exact containment, forward-looking advance over inter-word silence,
/// first upcoming word, bounded cross-paragraph look-ahead, nearest word.
fn select_word(
    time: f32,
    paragraph: &Paragraph,
    index: &TimingIndex,
    policy: &SyncPolicy,
) -> Option<PlaybackLocation> {
    let words = &paragraph.words;
    let first = words.first()?;

    if let Some((i, w)) = words
        .iter()
        .enumerate()
        .find(|(_, w)| time >= w.start_seconds && time < w.end_seconds)
    {
        return Some(location(paragraph.index, i, w));
    }

    // No word has started yet: highlight the first upcoming one.
    let Some(started) = words.iter().rposition(|w| w.start_seconds <= time) else {
        return Some(location(paragraph.index, 0, first));
    };

    // `started` has ended (containment would have matched otherwise).
    let previous = &words[started];
    let silence = time - previous.end_seconds;

    if let Some(next) = words.get(started + 1) {
        // Advance through inter-word silence so the highlight does not lag:
        // either the gap is long enough, or the next word is already nearer
        // than the previous word's end.
        let next_is_nearer = (next.start_seconds - time).abs() < silence;
        if silence > policy.word_advance_gap_seconds || next_is_nearer {
            return Some(location(paragraph.index, started + 1, next));
        }
        return Some(location(paragraph.index, started, previous));
    }

    // Paragraph exhausted. Cross the boundary when the next paragraph's
    // first word starts within the look-ahead window; this is what lets the
    // viewport scroll proactively during the silence between paragraphs.
    if silence > policy.word_advance_gap_seconds {
        if let Some(ahead) = lookahead(time, paragraph.index, index, policy) {
            return Some(ahead);
        }
    }

    // Nearest word by boundary distance: the last word of this paragraph.
    Some(location(paragraph.index, started, previous))
}

/// Bounded forward scan for the first upcoming word in the following
/// paragraphs. Iterative with a fixed maximum, never recursive.
fn lookahead(
    time: f32,
    from_paragraph: usize,
    index: &TimingIndex,
    policy: &SyncPolicy,
) -> Option<PlaybackLocation> {
    let first_candidate = from_paragraph + 1;
    let limit = first_candidate.saturating_add(policy.max_paragraph_lookahead);

    for paragraph_index in first_candidate..limit.min(index.len()) {
        let paragraph = index.paragraph(paragraph_index)?;
        let Some(first) = paragraph.words.first() else {
            continue;
        };
        if first.start_seconds - time <= policy.paragraph_lookahead_seconds {
            return Some(location(paragraph_index, 0, first));
        }
        // Paragraphs are time-ordered; anything farther starts even later.
        break;
    }
    None
}

fn location(paragraph_index: usize, word_index: usize, word: &TimedWord) -> PlaybackLocation {
    PlaybackLocation {
        paragraph_index,
        word_index,
        word_text: word.text.clone(),
    }
}
