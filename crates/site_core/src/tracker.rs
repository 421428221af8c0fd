//! Per-section visibility state machine fed by intersection observer batches.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use shared::domain::{SectionDescriptor, SectionId, SectionPhase, SectionStatus};
use tracing::debug;

pub const DEFAULT_VISIBILITY_THRESHOLD: f64 = 0.3;

/// One observer report for one section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IntersectionEntry {
    pub section: SectionId,
    pub ratio: f64,
    pub is_intersecting: bool,
}

impl IntersectionEntry {
    pub fn new(section: impl Into<String>, ratio: f64, is_intersecting: bool) -> Self {
        Self {
            section: SectionId::new(section),
            ratio,
            is_intersecting,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerEffect {
    AnimationStarted(SectionId),
    AnimationStopped(SectionId),
    ActiveSectionChanged {
        section: SectionId,
        order_num: String,
    },
    LoadMedia {
        section: SectionId,
        source: String,
    },
    /// The nested-scroll host became visible again; its panel goes back to top.
    ResetNestedScroll,
}

#[derive(Debug, Clone)]
struct TrackedSection {
    descriptor: SectionDescriptor,
    phase: SectionPhase,
    media_source: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SectionTracker {
    threshold: f64,
    sections: Vec<TrackedSection>,
    index: HashMap<SectionId, usize>,
    requested_media: HashSet<SectionId>,
    nested_host: Option<SectionId>,
    active: Option<SectionId>,
    indicator: String,
}

impl SectionTracker {
    pub fn new(descriptors: Vec<SectionDescriptor>, threshold: f64) -> Self {
        let indicator = descriptors
            .first()
            .map(|descriptor| descriptor.order_num.clone())
            .unwrap_or_default();
        let mut index = HashMap::with_capacity(descriptors.len());
        let mut sections = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            if index.contains_key(&descriptor.id) {
                debug!(section = %descriptor.id, "duplicate section id ignored");
                continue;
            }
            index.insert(descriptor.id.clone(), sections.len());
            sections.push(TrackedSection {
                descriptor,
                phase: SectionPhase::Unseen,
                media_source: None,
            });
        }

        Self {
            threshold,
            sections,
            index,
            requested_media: HashSet::new(),
            nested_host: None,
            active: None,
            indicator,
        }
    }

    /// Attaches a deferred media source that loads the first time `section`
    /// becomes visible. Unknown sections are ignored.
    pub fn attach_media(&mut self, section: &SectionId, source: impl Into<String>) {
        if let Some(&idx) = self.index.get(section) {
            self.sections[idx].media_source = Some(source.into());
        }
    }

    pub fn set_nested_host(&mut self, section: Option<SectionId>) {
        self.nested_host = section;
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn section_ids(&self) -> impl Iterator<Item = &SectionId> {
        self.sections.iter().map(|section| &section.descriptor.id)
    }

    pub fn phase(&self, section: &SectionId) -> Option<SectionPhase> {
        self.index.get(section).map(|&idx| self.sections[idx].phase)
    }

    pub fn active_section(&self) -> Option<&SectionId> {
        self.active.as_ref()
    }

    /// Current "NN / NN" label.
    pub fn indicator(&self) -> &str {
        &self.indicator
    }

    pub fn statuses(&self) -> Vec<SectionStatus> {
        self.sections
            .iter()
            .map(|section| SectionStatus {
                id: section.descriptor.id.clone(),
                order_num: section.descriptor.order_num.clone(),
                is_visible: section.phase.is_visible(),
                was_ever_visible: section.phase.was_ever_visible(),
            })
            .collect()
    }

    pub fn media_requested(&self, section: &SectionId) -> bool {
        self.requested_media.contains(section)
    }

    /// Applies one observer batch in delivery order. Several entries for the
    /// same section are applied one after the other, so the last one decides
    /// its final phase.
    pub fn apply(&mut self, entries: &[IntersectionEntry]) -> Vec<TrackerEffect> {
        let mut effects = Vec::new();
        for entry in entries {
            let Some(&idx) = self.index.get(&entry.section) else {
                debug!(section = %entry.section, "intersection for unknown section");
                continue;
            };
            let visible = entry.is_intersecting && entry.ratio >= self.threshold;
            self.transition(idx, visible, &mut effects);
        }
        effects
    }

    fn transition(&mut self, idx: usize, visible: bool, effects: &mut Vec<TrackerEffect>) {
        let previous = self.sections[idx].phase;
        let next = match (previous, visible) {
            (SectionPhase::Visible, true) => return,
            (SectionPhase::Visible, false) => SectionPhase::SeenNotVisible,
            (_, true) => SectionPhase::Visible,
            (_, false) => return,
        };

        let section = &mut self.sections[idx];
        section.phase = next;
        let id = section.descriptor.id.clone();
        debug!(section = %id, from = ?previous, to = ?next, "section transition");

        if next == SectionPhase::SeenNotVisible {
            effects.push(TrackerEffect::AnimationStopped(id));
            return;
        }

        effects.push(TrackerEffect::AnimationStarted(id.clone()));

        let order_num = section.descriptor.order_num.clone();
        let media_source = section.media_source.clone();

        self.indicator.clone_from(&order_num);
        self.active = Some(id.clone());
        effects.push(TrackerEffect::ActiveSectionChanged {
            section: id.clone(),
            order_num,
        });

        // Guarded by the request set, not by the phase: visibility toggles again later.
        if let Some(source) = media_source {
            if self.requested_media.insert(id.clone()) {
                effects.push(TrackerEffect::LoadMedia {
                    section: id.clone(),
                    source,
                });
            }
        }

        if self.nested_host.as_ref() == Some(&id) {
            effects.push(TrackerEffect::ResetNestedScroll);
        }
    }
}

#[cfg(test)]
#[path = "tests/tracker_tests.rs"]
mod tests;
