//! Client display surface.

/// Where a client puts the broadcasts it receives.
///
/// Implementations append the display string as a new line and bring the
/// newest line into view. They must not deduplicate or reorder.
pub trait ChatView {
    fn on_broadcast_received(&mut self, display: &str);
}
