//! In-memory host used by tests and the replay tool. Scrolls apply
//! immediately (smooth or not) and every call is recorded.

use std::collections::{BTreeMap, HashMap};

use shared::{
    domain::{ScrollBehavior, SectionId},
    error::AudioError,
};

use crate::host::{Listener, ScrollRegion, SiteHost};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollCall {
    To { top: f64, behavior: ScrollBehavior },
    By { delta: f64, behavior: ScrollBehavior },
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessRegion {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
    pub calls: Vec<ScrollCall>,
}

impl HeadlessRegion {
    pub fn new(scroll_height: f64, client_height: f64) -> Self {
        Self {
            scroll_top: 0.0,
            scroll_height,
            client_height,
            calls: Vec::new(),
        }
    }

    pub fn max_scroll_top(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }

    /// Moves the region as a user gesture would, without recording a call.
    pub fn set_scroll_top(&mut self, top: f64) {
        self.scroll_top = top.clamp(0.0, self.max_scroll_top());
    }
}

impl ScrollRegion for HeadlessRegion {
    fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    fn scroll_height(&self) -> f64 {
        self.scroll_height
    }

    fn client_height(&self) -> f64 {
        self.client_height
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        self.calls.push(ScrollCall::To { top, behavior });
        self.set_scroll_top(top);
    }

    fn scroll_by(&mut self, delta: f64, behavior: ScrollBehavior) {
        self.calls.push(ScrollCall::By { delta, behavior });
        self.set_scroll_top(self.scroll_top + delta);
    }
}

#[derive(Debug)]
pub struct HeadlessHost {
    pub container: Option<HeadlessRegion>,
    pub about: Option<HeadlessRegion>,
    pub frame_requests: usize,
    pub frame_cancellations: usize,
    pub root_attributes: HashMap<String, String>,
    pub section_offsets: HashMap<SectionId, f64>,
    pub media_sources: Vec<(SectionId, String)>,
    pub cue_result: Result<(), AudioError>,
    pub cue_attempts: usize,
    pub listeners: Vec<Listener>,
    pub observed: BTreeMap<SectionId, f64>,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self {
            container: None,
            about: None,
            frame_requests: 0,
            frame_cancellations: 0,
            root_attributes: HashMap::new(),
            section_offsets: HashMap::new(),
            media_sources: Vec::new(),
            cue_result: Ok(()),
            cue_attempts: 0,
            listeners: Vec::new(),
            observed: BTreeMap::new(),
        }
    }
}

impl HeadlessHost {
    /// A page of `sections` full-viewport sections with an About panel.
    pub fn page(viewport_height: f64, sections: &[&str]) -> Self {
        let mut host = Self {
            container: Some(HeadlessRegion::new(
                viewport_height * sections.len() as f64,
                viewport_height,
            )),
            about: Some(HeadlessRegion::new(viewport_height * 2.5, viewport_height)),
            ..Self::default()
        };
        for (idx, id) in sections.iter().enumerate() {
            host.section_offsets
                .insert(SectionId::new(*id), viewport_height * idx as f64);
        }
        host
    }

    pub fn container_top(&self) -> Option<f64> {
        self.container.as_ref().map(|region| region.scroll_top)
    }

    pub fn about_top(&self) -> Option<f64> {
        self.about.as_ref().map(|region| region.scroll_top)
    }
}

impl SiteHost for HeadlessHost {
    fn request_animation_frame(&mut self) {
        self.frame_requests += 1;
    }

    fn cancel_animation_frame(&mut self) {
        self.frame_cancellations += 1;
    }

    fn scroll_container(&mut self) -> Option<&mut dyn ScrollRegion> {
        self.container
            .as_mut()
            .map(|region| region as &mut dyn ScrollRegion)
    }

    fn about_panel(&mut self) -> Option<&mut dyn ScrollRegion> {
        self.about
            .as_mut()
            .map(|region| region as &mut dyn ScrollRegion)
    }

    fn set_root_attribute(&mut self, name: &str, value: &str) {
        self.root_attributes
            .insert(name.to_string(), value.to_string());
    }

    fn section_offset(&self, section: &SectionId) -> Option<f64> {
        self.section_offsets.get(section).copied()
    }

    fn assign_media_source(&mut self, section: &SectionId, source: &str) {
        self.media_sources
            .push((section.clone(), source.to_string()));
    }

    fn play_theme_cue(&mut self) -> Result<(), AudioError> {
        self.cue_attempts += 1;
        self.cue_result.clone()
    }

    fn add_listener(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    fn remove_listener(&mut self, listener: Listener) {
        if let Some(pos) = self.listeners.iter().position(|l| *l == listener) {
            self.listeners.remove(pos);
        }
    }

    fn observe_section(&mut self, section: &SectionId, threshold: f64) {
        self.observed.insert(section.clone(), threshold);
    }

    fn unobserve_section(&mut self, section: &SectionId) {
        self.observed.remove(section);
    }
}
