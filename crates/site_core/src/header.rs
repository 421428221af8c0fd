use shared::domain::{HeaderVisibility, SectionId};

pub const DEFAULT_HIDE_OFFSET: f64 = 100.0;
pub const DEFAULT_SCROLL_UP_OFFSET: f64 = 500.0;

/// Derives the fixed header flags from the scroll offset and, when a hero
/// section is configured, from whether the hero is the active section.
#[derive(Debug, Clone)]
pub struct HeaderPolicy {
    hide_offset: f64,
    scroll_up_offset: f64,
    hero_section: Option<SectionId>,
}

impl Default for HeaderPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_HIDE_OFFSET, DEFAULT_SCROLL_UP_OFFSET)
    }
}

impl HeaderPolicy {
    pub fn new(hide_offset: f64, scroll_up_offset: f64) -> Self {
        Self {
            hide_offset,
            scroll_up_offset,
            hero_section: None,
        }
    }

    pub fn with_hero(mut self, hero_section: Option<SectionId>) -> Self {
        self.hero_section = hero_section;
        self
    }

    pub fn has_hero(&self) -> bool {
        self.hero_section.is_some()
    }

    /// `true` when no hero is configured or no section has become active yet.
    pub fn is_on_hero(&self, active: Option<&SectionId>) -> bool {
        match (&self.hero_section, active) {
            (Some(hero), Some(active)) => hero == active,
            _ => true,
        }
    }

    /// Thresholds are exclusive: the header hides strictly after crossing.
    pub fn derive(
        &self,
        offset_top: f64,
        active: Option<&SectionId>,
        forced: bool,
    ) -> HeaderVisibility {
        // Off the hero section the compact header stays up whatever the offset.
        let hidden = offset_top > self.hide_offset && self.is_on_hero(active);
        HeaderVisibility {
            hidden,
            forced,
            scroll_up_visible: offset_top > self.scroll_up_offset,
        }
    }
}
