//! Seams to the document/rendering layer the coordinator runs inside.

use shared::{
    domain::{ScrollBehavior, SectionId},
    error::AudioError,
};

/// A scrollable element: the page container or the nested About panel.
pub trait ScrollRegion {
    fn scroll_top(&self) -> f64;
    fn scroll_height(&self) -> f64;
    fn client_height(&self) -> f64;
    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior);
    fn scroll_by(&mut self, delta: f64, behavior: ScrollBehavior);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerTarget {
    ScrollContainer,
    AboutPanel,
    Window,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    Scroll,
    Wheel,
    Resize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Listener {
    pub target: ListenerTarget,
    pub kind: ListenerKind,
}

impl Listener {
    pub const fn new(target: ListenerTarget, kind: ListenerKind) -> Self {
        Self { target, kind }
    }
}

/// Everything the coordinator needs from the page it is mounted in.
///
/// Element accessors return `None` while a ref is not attached; callers treat
/// that as a no-op rather than an error.
pub trait SiteHost {
    /// Schedule a single frame callback. The host answers by calling
    /// [`crate::Site::on_frame`] once.
    fn request_animation_frame(&mut self);

    /// Drop the frame callback requested earlier, if it has not run yet.
    fn cancel_animation_frame(&mut self);

    fn scroll_container(&mut self) -> Option<&mut dyn ScrollRegion>;

    fn about_panel(&mut self) -> Option<&mut dyn ScrollRegion>;

    fn set_root_attribute(&mut self, name: &str, value: &str);

    /// Offset of a section element from the top of the scroll container.
    fn section_offset(&self, section: &SectionId) -> Option<f64>;

    /// Point a deferred media element at its source, starting the load.
    fn assign_media_source(&mut self, section: &SectionId, source: &str);

    fn play_theme_cue(&mut self) -> Result<(), AudioError>;

    fn add_listener(&mut self, listener: Listener);

    fn remove_listener(&mut self, listener: Listener);

    fn observe_section(&mut self, section: &SectionId, threshold: f64);

    fn unobserve_section(&mut self, section: &SectionId);
}
