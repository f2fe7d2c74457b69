//! Presentation flags derived purely from scroll position and layout metrics.
//!
//! Nothing here keeps state between calls: feed the same position and metrics
//! and you get the same snapshot.

use serde::{Deserialize, Serialize};

use super::observer::ScrollPosition;

/// Scroll-driven effects: header `scrolled` class and hero parallax.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollEffects {
    /// The header counts as scrolled strictly past this offset.
    pub header_threshold: f64,
    /// Hero translation per pixel scrolled.
    pub parallax_factor: f64,
}

impl Default for ScrollEffects {
    fn default() -> Self {
        Self {
            header_threshold: 100.0,
            parallax_factor: 0.5,
        }
    }
}

impl ScrollEffects {
    pub fn header_scrolled(&self, scroll_top: f64) -> bool {
        scroll_top > self.header_threshold
    }

    pub fn parallax_offset(&self, scroll_top: f64) -> f64 {
        scroll_top * self.parallax_factor
    }

    /// Computes every scroll-derived flag at once.
    ///
    /// `content` is the article body on single-post pages; pages without one
    /// have no reading progress.
    pub fn snapshot(&self, position: ScrollPosition, content: Option<ContentRegion>) -> ScrollSnapshot {
        ScrollSnapshot {
            scroll_top: position.scroll_top,
            header_scrolled: self.header_scrolled(position.scroll_top),
            parallax_offset: self.parallax_offset(position.scroll_top),
            reading_progress: content.map(|region| reading_progress(position, region)),
        }
    }
}

/// Vertical extent of the article body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContentRegion {
    pub top: f64,
    pub height: f64,
}

/// Percentage (0 to 100) of the content whose top has been scrolled past the
/// bottom of the viewport.
pub fn reading_progress(position: ScrollPosition, content: ContentRegion) -> f64 {
    let read = position.viewport_bottom() - content.top;
    if content.height <= 0.0 {
        return if read >= 0.0 { 100.0 } else { 0.0 };
    }
    (read / content.height * 100.0).clamp(0.0, 100.0)
}

/// Scroll-derived state for the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollSnapshot {
    pub scroll_top: f64,
    pub header_scrolled: bool,
    pub parallax_offset: f64,
    pub reading_progress: Option<f64>,
}

// ── Resize ────────────────────────────────────────────────────────────────────

/// Layout metrics reported after a resize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResizeMetrics {
    pub viewport_width: f64,
    pub header_height: f64,
}

/// Resize-driven effects: mobile menu collapse and sticky sidebar offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResizeEffects {
    /// Above this width the mobile menu is closed.
    pub mobile_breakpoint: f64,
    /// Gap between the header and sticky sidebars.
    pub sticky_gap: f64,
}

impl Default for ResizeEffects {
    fn default() -> Self {
        Self {
            mobile_breakpoint: 768.0,
            sticky_gap: 20.0,
        }
    }
}

impl ResizeEffects {
    pub fn snapshot(&self, metrics: ResizeMetrics) -> LayoutSnapshot {
        LayoutSnapshot {
            close_mobile_menu: metrics.viewport_width > self.mobile_breakpoint,
            sticky_top: metrics.header_height + self.sticky_gap,
        }
    }
}

/// Resize-derived state for the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub close_mobile_menu: bool,
    pub sticky_top: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_scrolled_is_strictly_past_threshold() {
        let effects = ScrollEffects::default();
        assert!(!effects.header_scrolled(0.0));
        assert!(!effects.header_scrolled(100.0));
        assert!(effects.header_scrolled(100.5));
    }

    #[test]
    fn test_parallax_is_half_the_scroll_offset() {
        let effects = ScrollEffects::default();
        assert_eq!(effects.parallax_offset(300.0), 150.0);
    }

    #[test]
    fn test_reading_progress_before_content_is_zero() {
        let progress = reading_progress(
            ScrollPosition::new(0.0, 800.0),
            ContentRegion { top: 1_000.0, height: 2_000.0 },
        );
        assert_eq!(progress, 0.0);
    }

    #[test]
    fn test_reading_progress_halfway() {
        // Arrange – viewport bottom at 2000, content spans 1000..3000
        let position = ScrollPosition::new(1_200.0, 800.0);
        let content = ContentRegion { top: 1_000.0, height: 2_000.0 };

        // Act
        let progress = reading_progress(position, content);

        // Assert
        assert!((progress - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reading_progress_is_capped_at_hundred() {
        let progress = reading_progress(
            ScrollPosition::new(10_000.0, 800.0),
            ContentRegion { top: 0.0, height: 500.0 },
        );
        assert_eq!(progress, 100.0);
    }

    #[test]
    fn test_reading_progress_with_empty_content_does_not_divide_by_zero() {
        let region = ContentRegion { top: 500.0, height: 0.0 };
        assert_eq!(reading_progress(ScrollPosition::new(0.0, 400.0), region), 0.0);
        assert_eq!(reading_progress(ScrollPosition::new(200.0, 400.0), region), 100.0);
    }

    #[test]
    fn test_snapshot_without_content_has_no_progress() {
        let snapshot = ScrollEffects::default().snapshot(ScrollPosition::new(150.0, 800.0), None);
        assert!(snapshot.header_scrolled);
        assert_eq!(snapshot.parallax_offset, 75.0);
        assert_eq!(snapshot.reading_progress, None);
    }

    #[test]
    fn test_resize_closes_menu_on_wide_viewports() {
        let effects = ResizeEffects::default();
        let wide = effects.snapshot(ResizeMetrics { viewport_width: 1_024.0, header_height: 80.0 });
        let narrow = effects.snapshot(ResizeMetrics { viewport_width: 768.0, header_height: 80.0 });
        assert!(wide.close_mobile_menu);
        assert!(!narrow.close_mobile_menu);
    }

    #[test]
    fn test_sticky_top_sits_below_header() {
        let layout = ResizeEffects::default().snapshot(ResizeMetrics {
            viewport_width: 1_280.0,
            header_height: 72.0,
        });
        assert_eq!(layout.sticky_top, 92.0);
    }
}
