use super::*;

fn descriptors() -> Vec<SectionDescriptor> {
    vec![
        SectionDescriptor::new("home", "01 / 04"),
        SectionDescriptor::new("about", "02 / 04"),
        SectionDescriptor::new("projects", "03 / 04"),
        SectionDescriptor::new("contact", "04 / 04"),
    ]
}

fn tracker() -> SectionTracker {
    let mut tracker = SectionTracker::new(descriptors(), DEFAULT_VISIBILITY_THRESHOLD);
    tracker.attach_media(&SectionId::new("projects"), "media/reel.mp4");
    tracker.set_nested_host(Some(SectionId::new("about")));
    tracker
}

fn load_count(effects: &[TrackerEffect]) -> usize {
    effects
        .iter()
        .filter(|effect| matches!(effect, TrackerEffect::LoadMedia { .. }))
        .count()
}

#[test]
fn indicator_starts_at_first_section() {
    let tracker = tracker();
    assert_eq!(tracker.indicator(), "01 / 04");
    assert_eq!(tracker.active_section(), None);
    assert!(tracker
        .statuses()
        .iter()
        .all(|status| !status.is_visible && !status.was_ever_visible));
}

#[test]
fn crossing_threshold_marks_section_visible() {
    let mut tracker = tracker();
    let effects = tracker.apply(&[IntersectionEntry::new("projects", 0.3, true)]);

    let projects = SectionId::new("projects");
    assert_eq!(tracker.phase(&projects), Some(SectionPhase::Visible));
    assert_eq!(tracker.indicator(), "03 / 04");
    assert!(effects.contains(&TrackerEffect::AnimationStarted(projects.clone())));
    assert!(effects.contains(&TrackerEffect::LoadMedia {
        section: projects,
        source: "media/reel.mp4".to_string(),
    }));
}

#[test]
fn below_threshold_intersection_does_not_count() {
    let mut tracker = tracker();
    let effects = tracker.apply(&[IntersectionEntry::new("projects", 0.29, true)]);
    assert!(effects.is_empty());
    assert_eq!(
        tracker.phase(&SectionId::new("projects")),
        Some(SectionPhase::Unseen)
    );
}

#[test]
fn media_loads_once_across_reentries() {
    let mut tracker = tracker();
    let mut loads = 0;
    for _ in 0..3 {
        loads += load_count(&tracker.apply(&[IntersectionEntry::new("projects", 0.8, true)]));
        loads += load_count(&tracker.apply(&[IntersectionEntry::new("projects", 0.0, false)]));
    }
    assert_eq!(loads, 1);
    assert!(tracker.media_requested(&SectionId::new("projects")));
}

#[test]
fn leaving_removes_animation_but_keeps_seen_flag() {
    let mut tracker = tracker();
    tracker.apply(&[IntersectionEntry::new("home", 1.0, true)]);
    let effects = tracker.apply(&[IntersectionEntry::new("home", 0.1, true)]);

    let home = SectionId::new("home");
    assert_eq!(effects, vec![TrackerEffect::AnimationStopped(home.clone())]);
    let status = tracker
        .statuses()
        .into_iter()
        .find(|status| status.id == home)
        .expect("home status");
    assert!(!status.is_visible);
    assert!(status.was_ever_visible);
}

#[test]
fn reentering_nested_host_requests_reset() {
    let mut tracker = tracker();
    tracker.apply(&[IntersectionEntry::new("about", 0.9, true)]);
    tracker.apply(&[IntersectionEntry::new("about", 0.0, false)]);
    let effects = tracker.apply(&[IntersectionEntry::new("about", 0.9, true)]);
    assert!(effects.contains(&TrackerEffect::ResetNestedScroll));
}

#[test]
fn last_entry_for_a_section_wins_within_a_batch() {
    let mut tracker = tracker();
    tracker.apply(&[
        IntersectionEntry::new("contact", 0.6, true),
        IntersectionEntry::new("contact", 0.0, false),
    ]);
    assert_eq!(
        tracker.phase(&SectionId::new("contact")),
        Some(SectionPhase::SeenNotVisible)
    );

    tracker.apply(&[
        IntersectionEntry::new("contact", 0.0, false),
        IntersectionEntry::new("contact", 0.6, true),
    ]);
    assert_eq!(
        tracker.phase(&SectionId::new("contact")),
        Some(SectionPhase::Visible)
    );
}

#[test]
fn indicator_follows_most_recent_transition_not_largest_ratio() {
    let mut tracker = tracker();
    tracker.apply(&[
        IntersectionEntry::new("about", 0.95, true),
        IntersectionEntry::new("projects", 0.31, true),
    ]);
    assert_eq!(tracker.indicator(), "03 / 04");
    assert_eq!(tracker.active_section(), Some(&SectionId::new("projects")));
}

#[test]
fn unknown_sections_are_ignored() {
    let mut tracker = tracker();
    let effects = tracker.apply(&[IntersectionEntry::new("footer", 1.0, true)]);
    assert!(effects.is_empty());
    assert_eq!(tracker.indicator(), "01 / 04");
}
