//! Presentation state: zoom level and the visibility filter.
//!
//! Neither is persisted. The filter only derives a shown/dimmed flag per
//! participant and never changes zone membership.

use crate::model::Participant;
use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f32 = 0.5;
pub const MAX_ZOOM: f32 = 2.0;
pub const ZOOM_STEP: f32 = 0.1;

/// Segment/score criteria for dimming participants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityFilter {
    /// Exact-match segment; empty means any segment.
    #[serde(default)]
    pub segment: String,
    /// Minimum score, 0..=100. Participants without a score count as 0.
    #[serde(default)]
    pub min_score: u8,
}

impl VisibilityFilter {
    pub fn is_visible(&self, participant: &Participant) -> bool {
        let segment_ok = self.segment.is_empty() || participant.segment == self.segment;
        segment_ok && participant.score.unwrap_or(0) >= self.min_score
    }

    pub fn is_active(&self) -> bool {
        !self.segment.is_empty() || self.min_score > 0
    }
}

/// Zoom plus filter, shared by one rendering surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    zoom: f32,
    pub filter: VisibilityFilter,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            filter: VisibilityFilter::default(),
        }
    }
}

impl ViewState {
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Set the zoom, clamped to [0.5, 2.0].
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_nan() {
            return;
        }
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Step up by 0.1, snapped to one decimal.
    pub fn zoom_in(&mut self) {
        self.set_zoom(snap(self.zoom + ZOOM_STEP));
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(snap(self.zoom - ZOOM_STEP));
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = 1.0;
    }

    pub fn set_segment(&mut self, segment: impl Into<String>) {
        self.filter.segment = segment.into();
    }

    pub fn set_min_score(&mut self, min_score: u8) {
        self.filter.min_score = min_score.min(100);
    }

    /// Whether `participant` renders fully. Read-only surfaces (reports
    /// and exports) always show everyone.
    pub fn is_visible(&self, participant: &Participant, read_only: bool) -> bool {
        read_only || self.filter.is_visible(participant)
    }
}

fn snap(zoom: f32) -> f32 {
    (zoom * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(segment: &str, score: Option<u8>) -> Participant {
        Participant {
            id: "p".into(),
            name: "P".into(),
            company: String::new(),
            segment: segment.into(),
            score,
            is_host: None,
        }
    }

    #[test]
    fn empty_filter_shows_everyone() {
        let filter = VisibilityFilter::default();
        assert!(filter.is_visible(&participant("", None)));
        assert!(filter.is_visible(&participant("finance", Some(3))));
        assert!(!filter.is_active());
    }

    #[test]
    fn segment_and_score_both_apply() {
        let filter = VisibilityFilter {
            segment: "tech".into(),
            min_score: 50,
        };
        assert!(filter.is_visible(&participant("tech", Some(50))));
        assert!(!filter.is_visible(&participant("tech", Some(49))));
        assert!(!filter.is_visible(&participant("Tech", Some(90))));
        assert!(!filter.is_visible(&participant("tech", None)));
    }

    #[test]
    fn read_only_bypasses_filter() {
        let mut view = ViewState::default();
        view.set_segment("tech");
        view.set_min_score(80);
        let p = participant("retail", Some(10));
        assert!(!view.is_visible(&p, false));
        assert!(view.is_visible(&p, true));
    }

    #[test]
    fn zoom_steps_and_clamps() {
        let mut view = ViewState::default();
        for _ in 0..20 {
            view.zoom_in();
        }
        assert_eq!(view.zoom(), MAX_ZOOM);
        for _ in 0..30 {
            view.zoom_out();
        }
        assert_eq!(view.zoom(), MIN_ZOOM);

        view.reset_zoom();
        view.zoom_in();
        view.zoom_in();
        view.zoom_in();
        assert!((view.zoom() - 1.3).abs() < 1e-6);

        view.set_zoom(1.25);
        assert_eq!(view.zoom(), 1.25);
        view.zoom_in();
        assert_eq!(view.zoom(), 1.4);

        view.set_zoom(7.0);
        assert_eq!(view.zoom(), 2.0);
        view.set_zoom(f32::NAN);
        assert_eq!(view.zoom(), 2.0);
    }

    #[test]
    fn min_score_caps_at_hundred() {
        let mut view = ViewState::default();
        view.set_min_score(250);
        assert_eq!(view.filter.min_score, 100);
    }
}
