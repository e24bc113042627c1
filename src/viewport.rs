use tracing::debug;

use crate::policy::SyncPolicy;

/// Measurement capability provided by the rendering surface.
///
/// The engine never talks to a real scroll view; it only needs to know where
/// a paragraph's anchor sits so the embedding layer can animate to it.
pub trait ViewportProbe {
    /// The scroll offset (logical pixels) of the paragraph's anchor, or
    /// `None` when layout has not produced one yet.
    fn paragraph_offset(&self, paragraph_index: usize) -> Option<f32>;
}

/// Compute the scroll offset for a paragraph.
///
/// When the anchor cannot be measured (layout not ready), falls back to an
/// approximate offset of `paragraph_index * average_paragraph_height`.
/// Degraded but safe; never an error.
pub fn scroll_offset_for<V: ViewportProbe + ?Sized>(
    viewport: &V,
    paragraph_index: usize,
    policy: &SyncPolicy,
) -> f32 {
    match viewport.paragraph_offset(paragraph_index) {
        Some(offset) => offset,
        None => {
            debug!(paragraph = paragraph_index, "anchor unmeasured, using approximate offset");
            paragraph_index as f32 * policy.average_paragraph_height
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::DEFAULT_SYNC_POLICY;

    struct FixedProbe {
        measured: Option<f32>,
    }

    impl ViewportProbe for FixedProbe {
        fn paragraph_offset(&self, _paragraph_index: usize) -> Option<f32> {
            self.measured
        }
    }

    #[test]
    fn uses_measured_offset_when_available() {
        let probe = FixedProbe {
            measured: Some(1234.5),
        };
        assert_eq!(scroll_offset_for(&probe, 3, &DEFAULT_SYNC_POLICY), 1234.5);
    }

    #[test]
    fn falls_back_to_approximate_offset() {
        let probe = FixedProbe { measured: None };
        let offset = scroll_offset_for(&probe, 3, &DEFAULT_SYNC_POLICY);
        assert_eq!(offset, 3.0 * DEFAULT_SYNC_POLICY.average_paragraph_height);
    }
}
