//! Scroll, visibility and animation coordinator for a single-page portfolio
//! site, plus its theme toggle and contact form flow.
//!
//! The host page forwards raw events (scroll, frame, wheel, resize,
//! intersection batches, clicks) to [`Site`]; the rendering layer reads
//! [`Site::state`] or follows [`Site::subscribe_events`].

use std::sync::Arc;

use serde::Serialize;
use shared::domain::{
    HeaderVisibility, NestedScrollState, ScrollBehavior, SectionDescriptor, SectionId,
    SectionStatus, Theme,
};
use tokio::sync::broadcast;
use tracing::{debug, info};

pub mod config;
pub mod contact;
pub mod events;
pub mod header;
pub mod headless;
pub mod host;
pub mod mosaic;
pub mod nested;
pub mod relay;
pub mod theme;
pub mod throttle;
pub mod tracker;

pub use config::{load_settings, SiteSettings};
pub use contact::{ContactForm, FormState};
pub use events::SiteEvent;
pub use host::{Listener, ListenerKind, ListenerTarget, ScrollRegion, SiteHost};
pub use nested::{StepAction, WheelOutcome};
pub use relay::{FormRelay, HttpFormRelay, MissingFormRelay, RelayError, RelayReply};
pub use tracker::IntersectionEntry;

use header::HeaderPolicy;
use nested::{NestedScroll, PanelMetrics};
use theme::ThemeToggle;
use throttle::{ScrollState, ScrollThrottle};
use tracker::{SectionTracker, TrackerEffect};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Snapshot of everything the rendering layer binds to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteState {
    pub scroll: ScrollState,
    pub header: HeaderVisibility,
    pub current_section_num: String,
    pub active_section: Option<SectionId>,
    pub sections: Vec<SectionStatus>,
    pub about: NestedScrollState,
    pub theme: Theme,
    pub mobile_menu_open: bool,
}

struct Registrations {
    listeners: Vec<Listener>,
    sections: Vec<SectionId>,
}

pub struct Site {
    throttle: ScrollThrottle,
    header_policy: HeaderPolicy,
    header: HeaderVisibility,
    tracker: SectionTracker,
    nested: NestedScroll,
    theme: ThemeToggle,
    mobile_menu_open: bool,
    pending_nested_reset: bool,
    frame_outstanding: bool,
    registrations: Option<Registrations>,
    contact: ContactForm,
    events: broadcast::Sender<SiteEvent>,
}

impl Site {
    pub fn new(
        settings: &SiteSettings,
        sections: Vec<SectionDescriptor>,
        relay: Arc<dyn FormRelay>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let header_policy =
            HeaderPolicy::new(settings.header_hide_offset, settings.scroll_up_offset)
                .with_hero(settings.hero_section.as_deref().map(SectionId::new));

        Self {
            throttle: ScrollThrottle::new(),
            header_policy,
            header: HeaderVisibility::default(),
            tracker: SectionTracker::new(sections, settings.visibility_threshold),
            nested: NestedScroll::new(settings.nested_bottom_tolerance, settings.nested_step),
            theme: ThemeToggle::new(Theme::default(), settings.theme_sound),
            mobile_menu_open: false,
            pending_nested_reset: false,
            frame_outstanding: false,
            registrations: None,
            contact: ContactForm::new(relay, settings.success_clear(), events.clone()),
            events,
        }
    }

    /// Deferred media for `section`, loaded the first time it becomes visible.
    pub fn with_media(mut self, section: impl Into<String>, source: impl Into<String>) -> Self {
        self.tracker.attach_media(&SectionId::new(section), source);
        self
    }

    /// Section hosting the nested About panel.
    pub fn with_nested_host(mut self, section: impl Into<String>) -> Self {
        self.tracker.set_nested_host(Some(SectionId::new(section)));
        self
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SiteEvent> {
        self.events.subscribe()
    }

    pub fn contact(&self) -> &ContactForm {
        &self.contact
    }

    pub fn header(&self) -> HeaderVisibility {
        self.header
    }

    pub fn scroll_ticks(&self) -> u64 {
        self.throttle.ticks()
    }

    pub fn is_mounted(&self) -> bool {
        self.registrations.is_some()
    }

    pub fn state(&self) -> SiteState {
        SiteState {
            scroll: self.throttle.state(),
            header: self.header,
            current_section_num: self.tracker.indicator().to_string(),
            active_section: self.tracker.active_section().cloned(),
            sections: self.tracker.statuses(),
            about: self.nested.state(),
            theme: self.theme.theme(),
            mobile_menu_open: self.mobile_menu_open,
        }
    }

    /// Registers listeners and section observations. Every registration is
    /// remembered so [`Site::unmount`] can undo exactly that set.
    pub fn mount<H: SiteHost + ?Sized>(&mut self, host: &mut H) {
        if self.registrations.is_some() {
            debug!("mount ignored: already mounted");
            return;
        }

        let mut listeners = Vec::new();
        if host.scroll_container().is_some() {
            listeners.push(Listener::new(ListenerTarget::ScrollContainer, ListenerKind::Scroll));
        }
        if let Some(panel) = host.about_panel() {
            self.nested.observe(PanelMetrics::read(panel));
            listeners.push(Listener::new(ListenerTarget::AboutPanel, ListenerKind::Scroll));
            listeners.push(Listener::new(ListenerTarget::AboutPanel, ListenerKind::Wheel));
        }
        listeners.push(Listener::new(ListenerTarget::Window, ListenerKind::Resize));
        for listener in &listeners {
            host.add_listener(*listener);
        }

        let threshold = self.tracker.threshold();
        let sections: Vec<SectionId> = self.tracker.section_ids().cloned().collect();
        for section in &sections {
            host.observe_section(section, threshold);
        }

        self.theme.apply(host);
        info!(
            listeners = listeners.len(),
            sections = sections.len(),
            "site mounted"
        );
        self.registrations = Some(Registrations {
            listeners,
            sections,
        });
    }

    pub fn unmount<H: SiteHost + ?Sized>(&mut self, host: &mut H) {
        let Some(registrations) = self.registrations.take() else {
            return;
        };
        for listener in registrations.listeners {
            host.remove_listener(listener);
        }
        for section in &registrations.sections {
            host.unobserve_section(section);
        }
        if std::mem::take(&mut self.frame_outstanding) {
            host.cancel_animation_frame();
        }
        self.throttle.reset_pending();
        self.pending_nested_reset = false;
        self.contact.detach();
        info!("site unmounted");
    }

    /// Raw scroll event from the page container.
    pub fn on_scroll<H: SiteHost + ?Sized>(&mut self, host: &mut H) {
        if self.throttle.on_scroll() {
            self.schedule_frame(host);
        }
    }

    /// Frame callback requested through [`SiteHost::request_animation_frame`].
    pub fn on_frame<H: SiteHost + ?Sized>(&mut self, host: &mut H) {
        self.frame_outstanding = false;

        let sampled = host.scroll_container().map(|container| container.scroll_top());
        if let Some(offset) = self.throttle.on_frame(sampled) {
            self.recompute_header(offset);
        }

        if std::mem::take(&mut self.pending_nested_reset) {
            if let Some(panel) = host.about_panel() {
                self.nested.reset(panel);
                self.publish(SiteEvent::NestedScrollChanged(self.nested.state()));
            }
        }
    }

    /// One intersection observer callback batch, in delivery order.
    pub fn on_intersections<H: SiteHost + ?Sized>(
        &mut self,
        host: &mut H,
        entries: &[IntersectionEntry],
    ) {
        for effect in self.tracker.apply(entries) {
            match effect {
                TrackerEffect::AnimationStarted(section) => {
                    self.publish(SiteEvent::SectionVisibilityChanged {
                        section,
                        visible: true,
                    });
                }
                TrackerEffect::AnimationStopped(section) => {
                    self.publish(SiteEvent::SectionVisibilityChanged {
                        section,
                        visible: false,
                    });
                }
                TrackerEffect::ActiveSectionChanged { section, order_num } => {
                    self.publish(SiteEvent::ActiveSectionChanged { section, order_num });
                    if self.header_policy.has_hero() {
                        self.recompute_header(self.throttle.offset_top());
                    }
                }
                TrackerEffect::LoadMedia { section, source } => {
                    info!(section = %section, source = %source, "loading deferred media");
                    host.assign_media_source(&section, &source);
                    self.publish(SiteEvent::MediaRequested { section, source });
                }
                TrackerEffect::ResetNestedScroll => {
                    // Applied on the next frame so the observer callback never scrolls.
                    self.pending_nested_reset = true;
                    self.schedule_frame(host);
                }
            }
        }
    }

    pub fn on_about_scroll<H: SiteHost + ?Sized>(&mut self, host: &mut H) {
        let Some(panel) = host.about_panel() else {
            return;
        };
        if self.nested.observe(PanelMetrics::read(panel)) {
            self.publish(SiteEvent::NestedScrollChanged(self.nested.state()));
        }
    }

    /// Wheel on the About panel. The host calls `preventDefault` when the
    /// returned outcome says so.
    pub fn on_about_wheel<H: SiteHost + ?Sized>(
        &mut self,
        host: &mut H,
        delta_y: f64,
    ) -> WheelOutcome {
        let Some(metrics) = host.about_panel().map(|panel| PanelMetrics::read(panel)) else {
            return WheelOutcome::Native;
        };
        let before = self.nested.state();
        let outcome = self.nested.on_wheel(delta_y, metrics, host.scroll_container());
        if self.nested.state() != before {
            self.publish(SiteEvent::NestedScrollChanged(self.nested.state()));
        }
        if let WheelOutcome::Delegated { distance } = outcome {
            debug!(distance, "about panel handed wheel to page");
        }
        outcome
    }

    /// Click/tap on the About advance icon.
    pub fn on_about_icon_click<H: SiteHost + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> Option<StepAction> {
        let panel = host.about_panel()?;
        let before = self.nested.state();
        let action = self.nested.step(panel);
        self.nested.observe(PanelMetrics::read(panel));
        if self.nested.state() != before {
            self.publish(SiteEvent::NestedScrollChanged(self.nested.state()));
        }
        Some(action)
    }

    pub fn on_resize<H: SiteHost + ?Sized>(&mut self, host: &mut H) {
        self.on_about_scroll(host);
    }

    pub fn toggle_theme<H: SiteHost + ?Sized>(&mut self, host: &mut H) -> Theme {
        let theme = self.theme.toggle(host);
        self.publish(SiteEvent::ThemeChanged(theme));
        theme
    }

    /// Hover-intent style override that keeps the header on screen.
    pub fn set_header_forced(&mut self, forced: bool) {
        if self.header.forced == forced {
            return;
        }
        self.header.forced = forced;
        self.publish(SiteEvent::HeaderChanged(self.header));
    }

    /// Smooth-scrolls the page to `section`. Returns `false` if the section
    /// or the container is not present.
    pub fn scroll_to_section<H: SiteHost + ?Sized>(
        &mut self,
        host: &mut H,
        section: &SectionId,
    ) -> bool {
        self.close_mobile_menu();
        let Some(offset) = host.section_offset(section) else {
            debug!(section = %section, "scroll target not found");
            return false;
        };
        let Some(container) = host.scroll_container() else {
            return false;
        };
        container.scroll_to(offset, ScrollBehavior::Smooth);
        true
    }

    pub fn scroll_to_top<H: SiteHost + ?Sized>(&mut self, host: &mut H) -> bool {
        let Some(container) = host.scroll_container() else {
            return false;
        };
        container.scroll_to(0.0, ScrollBehavior::Smooth);
        true
    }

    pub fn toggle_mobile_menu(&mut self) -> bool {
        self.mobile_menu_open = !self.mobile_menu_open;
        self.publish(SiteEvent::MobileMenuChanged(self.mobile_menu_open));
        self.mobile_menu_open
    }

    pub fn close_mobile_menu(&mut self) {
        if self.mobile_menu_open {
            self.mobile_menu_open = false;
            self.publish(SiteEvent::MobileMenuChanged(false));
        }
    }

    fn schedule_frame<H: SiteHost + ?Sized>(&mut self, host: &mut H) {
        if !self.frame_outstanding {
            self.frame_outstanding = true;
            host.request_animation_frame();
        }
    }

    fn recompute_header(&mut self, offset_top: f64) {
        let next = self
            .header_policy
            .derive(offset_top, self.tracker.active_section(), self.header.forced);
        if next != self.header {
            self.header = next;
            self.publish(SiteEvent::HeaderChanged(next));
        }
    }

    fn publish(&self, event: SiteEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
