//! Scroll-follow decision tracking.
//!
//! A view that sits at (or near) the bottom of its scrollable content keeps
//! following new output; a view scrolled up to read history is left alone.
//! The render layer reports every scroll observation here and consults
//! [`FollowTracker::should_follow`] after each batch of appended entries.

/// How close to the bottom (in content units) still counts as "at the
/// bottom". Matches the panel's original feel: a reader nudged a couple of
/// lines up is still following.
pub const FOLLOW_THRESHOLD: u32 = 30;

/// One scroll observation of the rendering surface, in abstract content
/// units. Pixels or rows, the tracker does not care, as long as all three
/// fields agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollMetrics {
    /// Distance from the top of the content to the top of the viewport.
    pub offset: u32,
    /// Height of the viewport.
    pub viewport: u32,
    /// Total height of the scrollable content.
    pub content: u32,
}

impl ScrollMetrics {
    /// Distance between the bottom edge of the viewport and the bottom of
    /// the content. Saturates at 0 for overscroll bounce.
    #[must_use]
    pub fn distance_to_bottom(&self) -> u32 {
        self.content.saturating_sub(self.offset.saturating_add(self.viewport))
    }
}

/// Tracks whether newly appended entries should force the view to the
/// bottom.
///
/// Starts following: a freshly expanded panel always shows the newest
/// output until the user scrolls away.
#[derive(Debug, Clone)]
pub struct FollowTracker {
    following: bool,
}

impl FollowTracker {
    /// Create a tracker in the following state.
    #[must_use]
    pub fn new() -> Self {
        Self { following: true }
    }

    /// Recompute the follow flag from a scroll observation.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) {
        self.following = metrics.distance_to_bottom() < FOLLOW_THRESHOLD;
    }

    /// Whether the render layer should pin the view to the bottom after
    /// appending entries.
    #[must_use]
    pub fn should_follow(&self) -> bool {
        self.following
    }
}

impl Default for FollowTracker {
    fn default() -> Self {
        Self::new()
    }
}
