use super::*;
use crate::headless::{HeadlessHost, ScrollCall};
use async_trait::async_trait;
use shared::protocol::{ContactFields, FormStatusKind};

const SECTIONS: [&str; 6] = ["home", "about", "skills", "projects", "clients", "contact"];
const VIEWPORT: f64 = 800.0;

fn descriptors() -> Vec<SectionDescriptor> {
    SECTIONS
        .iter()
        .enumerate()
        .map(|(idx, id)| {
            SectionDescriptor::new(*id, shared::domain::order_label(idx + 1, SECTIONS.len()))
        })
        .collect()
}

fn site_with(settings: SiteSettings) -> Site {
    Site::new(&settings, descriptors(), Arc::new(MissingFormRelay))
        .with_media("projects", "media/showreel.mp4")
        .with_nested_host("about")
}

fn site() -> Site {
    site_with(SiteSettings {
        theme_sound: false,
        ..SiteSettings::default()
    })
}

fn host() -> HeadlessHost {
    HeadlessHost::page(VIEWPORT, &SECTIONS)
}

fn scroll_container_to(site: &mut Site, host: &mut HeadlessHost, top: f64) {
    host.container.as_mut().expect("container").set_scroll_top(top);
    site.on_scroll(host);
}

fn drain(rx: &mut broadcast::Receiver<SiteEvent>) -> Vec<SiteEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

struct AcceptingRelay;

#[async_trait]
impl FormRelay for AcceptingRelay {
    async fn post(&self, _fields: &ContactFields) -> Result<RelayReply, RelayError> {
        Ok(RelayReply::new(200, "{}"))
    }
}

#[test]
fn scroll_burst_recomputes_once_with_latest_position() {
    let mut site = site();
    let mut host = host();

    for top in [20.0, 60.0, 90.0, 140.0, 620.0] {
        scroll_container_to(&mut site, &mut host, top);
    }
    assert_eq!(host.frame_requests, 1);
    assert_eq!(site.scroll_ticks(), 0);
    assert!(site.state().scroll.is_throttle_pending);

    site.on_frame(&mut host);

    assert_eq!(site.scroll_ticks(), 1);
    let state = site.state();
    assert_eq!(state.scroll.offset_top, 620.0);
    assert!(!state.scroll.is_throttle_pending);
    assert!(state.header.hidden);
    assert!(state.header.scroll_up_visible);
}

#[test]
fn header_flags_follow_offsets_exclusively() {
    let mut site = site();
    let mut host = host();

    for top in [0.0, 100.0, 101.0, 500.0, 501.0, 40.0] {
        scroll_container_to(&mut site, &mut host, top);
        site.on_frame(&mut host);
        let header = site.header();
        assert_eq!(header.hidden, top > 100.0, "hidden at {top}");
        assert_eq!(header.scroll_up_visible, top > 500.0, "scroll-up at {top}");
    }
    assert_eq!(host.frame_requests, 6);
}

#[test]
fn forced_header_survives_scroll_ticks() {
    let mut site = site();
    let mut host = host();

    site.set_header_forced(true);
    scroll_container_to(&mut site, &mut host, 900.0);
    site.on_frame(&mut host);

    let header = site.header();
    assert!(header.hidden);
    assert!(header.forced);
    assert!(header.is_displayed());
}

#[test]
fn mount_and_unmount_are_symmetric() {
    let mut site = site();
    let mut host = host();

    site.mount(&mut host);
    assert!(site.is_mounted());
    assert_eq!(host.listeners.len(), 4);
    assert_eq!(host.observed.len(), SECTIONS.len());
    assert!(host.observed.values().all(|threshold| *threshold == 0.3));
    assert_eq!(
        host.root_attributes.get(theme::THEME_ATTRIBUTE).map(String::as_str),
        Some("light")
    );

    site.mount(&mut host);
    assert_eq!(host.listeners.len(), 4, "second mount registers nothing");

    site.unmount(&mut host);
    assert!(!site.is_mounted());
    assert!(host.listeners.is_empty());
    assert!(host.observed.is_empty());

    site.mount(&mut host);
    site.unmount(&mut host);
    assert!(host.listeners.is_empty());
}

#[test]
fn remount_after_dropped_frame_schedules_again() {
    let mut site = site();
    let mut host = host();
    site.mount(&mut host);

    scroll_container_to(&mut site, &mut host, 300.0);
    assert_eq!(host.frame_requests, 1);

    // The frame never runs: teardown cancels it.
    site.unmount(&mut host);
    assert_eq!(host.frame_cancellations, 1);
    assert!(!site.state().scroll.is_throttle_pending);

    site.mount(&mut host);
    scroll_container_to(&mut site, &mut host, 600.0);
    scroll_container_to(&mut site, &mut host, 700.0);
    assert_eq!(host.frame_requests, 2);

    site.on_frame(&mut host);
    let state = site.state();
    assert_eq!(state.scroll.offset_top, 700.0);
    assert!(state.header.hidden);
    assert!(state.header.scroll_up_visible);
}

#[test]
fn unmount_without_outstanding_frame_cancels_nothing() {
    let mut site = site();
    let mut host = host();
    site.mount(&mut host);
    scroll_container_to(&mut site, &mut host, 300.0);
    site.on_frame(&mut host);

    site.unmount(&mut host);
    assert_eq!(host.frame_cancellations, 0);
}

#[test]
fn mount_skips_listeners_for_missing_elements() {
    let mut site = site();
    let mut host = HeadlessHost::default();

    site.mount(&mut host);
    assert_eq!(
        host.listeners,
        vec![Listener::new(ListenerTarget::Window, ListenerKind::Resize)]
    );
    site.unmount(&mut host);
    assert!(host.listeners.is_empty());
}

#[test]
fn intersections_drive_indicator_and_one_time_media_load() {
    let mut site = site();
    let mut host = host();
    let mut rx = site.subscribe_events();

    for _ in 0..3 {
        site.on_intersections(&mut host, &[IntersectionEntry::new("projects", 0.6, true)]);
        site.on_intersections(&mut host, &[IntersectionEntry::new("projects", 0.0, false)]);
    }

    assert_eq!(
        host.media_sources,
        vec![(SectionId::new("projects"), "media/showreel.mp4".to_string())]
    );
    let state = site.state();
    assert_eq!(state.current_section_num, "04 / 06");
    let projects = state
        .sections
        .iter()
        .find(|status| status.id.as_str() == "projects")
        .expect("projects");
    assert!(!projects.is_visible);
    assert!(projects.was_ever_visible);

    let events = drain(&mut rx);
    let media_events = events
        .iter()
        .filter(|event| matches!(event, SiteEvent::MediaRequested { .. }))
        .count();
    assert_eq!(media_events, 1);
    assert!(events.contains(&SiteEvent::SectionVisibilityChanged {
        section: SectionId::new("projects"),
        visible: false,
    }));
}

#[test]
fn about_reentry_resets_panel_on_next_frame() {
    let mut site = site();
    let mut host = host();
    site.mount(&mut host);

    site.on_intersections(&mut host, &[IntersectionEntry::new("about", 1.0, true)]);
    site.on_frame(&mut host);
    host.about.as_mut().expect("about").set_scroll_top(900.0);
    site.on_about_scroll(&mut host);
    site.on_intersections(&mut host, &[IntersectionEntry::new("about", 0.0, false)]);

    let frames_before = host.frame_requests;
    site.on_intersections(&mut host, &[IntersectionEntry::new("about", 0.9, true)]);
    assert_eq!(host.about_top(), Some(900.0), "reset is deferred");
    assert_eq!(host.frame_requests, frames_before + 1);

    site.on_frame(&mut host);
    assert_eq!(host.about_top(), Some(0.0));
    assert!(site.state().about.at_top);
}

#[test]
fn scroll_and_deferred_reset_share_one_frame() {
    let mut site = site();
    let mut host = host();

    site.on_intersections(&mut host, &[IntersectionEntry::new("about", 1.0, true)]);
    scroll_container_to(&mut site, &mut host, 800.0);
    assert_eq!(host.frame_requests, 1);

    site.on_frame(&mut host);
    assert_eq!(site.scroll_ticks(), 1);
    assert!(site.header().hidden);
}

#[test]
fn wheel_up_at_panel_top_leaves_page_alone() {
    let mut site = site();
    let mut host = host();
    scroll_container_to(&mut site, &mut host, 800.0);
    site.on_frame(&mut host);

    let outcome = site.on_about_wheel(&mut host, -10.0);

    assert!(!outcome.prevent_default());
    assert_eq!(host.container_top(), Some(800.0));
    assert!(host.container.as_ref().expect("container").calls.is_empty());
}

#[test]
fn wheel_down_at_panel_bottom_advances_page() {
    let mut site = site();
    let mut host = host();
    host.container.as_mut().expect("container").set_scroll_top(800.0);
    let about = host.about.as_mut().expect("about");
    let bottom = about.max_scroll_top();
    about.set_scroll_top(bottom);

    let outcome = site.on_about_wheel(&mut host, 10.0);

    assert_eq!(outcome, WheelOutcome::Delegated { distance: VIEWPORT });
    assert!(outcome.prevent_default());
    assert_eq!(host.container_top(), Some(1600.0));
    assert!(site.state().about.at_bottom);
}

#[test]
fn wheel_without_panel_is_native() {
    let mut site = site();
    let mut host = HeadlessHost::default();
    assert_eq!(site.on_about_wheel(&mut host, 10.0), WheelOutcome::Native);
    assert_eq!(site.on_about_icon_click(&mut host), None);
}

#[test]
fn icon_click_steps_then_rewinds() {
    let mut site = site();
    let mut host = host();

    let mut actions = Vec::new();
    for _ in 0..5 {
        actions.push(site.on_about_icon_click(&mut host).expect("panel"));
    }

    // Panel: 2000 tall, 800 visible, so 1200 of travel in 350 steps.
    assert_eq!(
        actions,
        vec![
            StepAction::Advanced(350.0),
            StepAction::Advanced(350.0),
            StepAction::Advanced(350.0),
            StepAction::Advanced(350.0),
            StepAction::Rewound,
        ]
    );
    assert_eq!(host.about_top(), Some(0.0));
}

#[test]
fn resize_reevaluates_panel_boundaries() {
    let mut site = site();
    let mut host = host();
    let about = host.about.as_mut().expect("about");
    about.set_scroll_top(1000.0);
    site.on_about_scroll(&mut host);
    assert!(!site.state().about.at_bottom);

    host.about.as_mut().expect("about").client_height = 1000.0;
    site.on_resize(&mut host);
    assert!(site.state().about.at_bottom);
}

#[test]
fn scroll_to_section_closes_menu_and_scrolls_smoothly() {
    let mut site = site();
    let mut host = host();
    assert!(site.toggle_mobile_menu());

    assert!(site.scroll_to_section(&mut host, &SectionId::new("projects")));

    assert!(!site.state().mobile_menu_open);
    assert_eq!(
        host.container.as_ref().expect("container").calls,
        vec![ScrollCall::To {
            top: 2400.0,
            behavior: ScrollBehavior::Smooth
        }]
    );
    assert!(!site.scroll_to_section(&mut host, &SectionId::new("blog")));
}

#[test]
fn scroll_helpers_are_noops_without_container() {
    let mut site = site();
    let mut host = HeadlessHost::default();
    host.section_offsets.insert(SectionId::new("contact"), 4000.0);

    assert!(!site.scroll_to_section(&mut host, &SectionId::new("contact")));
    assert!(!site.scroll_to_top(&mut host));
}

#[test]
fn scroll_to_top_returns_to_start() {
    let mut site = site();
    let mut host = host();
    host.container.as_mut().expect("container").set_scroll_top(3000.0);

    assert!(site.scroll_to_top(&mut host));
    assert_eq!(host.container_top(), Some(0.0));
}

#[test]
fn theme_toggle_publishes_and_plays_cue() {
    let mut site = site_with(SiteSettings::default());
    let mut host = host();
    let mut rx = site.subscribe_events();

    assert_eq!(site.toggle_theme(&mut host), Theme::Dark);

    assert_eq!(host.cue_attempts, 1);
    assert_eq!(
        host.root_attributes.get(theme::THEME_ATTRIBUTE).map(String::as_str),
        Some("dark")
    );
    assert_eq!(drain(&mut rx), vec![SiteEvent::ThemeChanged(Theme::Dark)]);
}

#[test]
fn leaving_hero_section_shows_header() {
    let mut site = site_with(SiteSettings {
        hero_section: Some("home".to_string()),
        theme_sound: false,
        ..SiteSettings::default()
    });
    let mut host = host();

    site.on_intersections(&mut host, &[IntersectionEntry::new("home", 1.0, true)]);
    scroll_container_to(&mut site, &mut host, 300.0);
    site.on_frame(&mut host);
    assert!(site.header().hidden);

    site.on_intersections(
        &mut host,
        &[
            IntersectionEntry::new("home", 0.1, true),
            IntersectionEntry::new("about", 0.7, true),
        ],
    );
    assert!(!site.header().hidden);
}

#[tokio::test]
async fn unmount_cancels_pending_success_clear() {
    let settings = SiteSettings::default();
    let mut site = Site::new(&settings, descriptors(), Arc::new(AcceptingRelay));
    let mut host = host();
    site.mount(&mut host);

    let status = site
        .contact()
        .submit_fields(ContactFields::new("A", "a@b.com", "hi"))
        .await;
    assert_eq!(status.kind, FormStatusKind::Success);
    assert!(site.contact().has_pending_clear());

    site.unmount(&mut host);
    assert!(!site.contact().has_pending_clear());
    assert_eq!(site.contact().snapshot().status.kind, FormStatusKind::Success);
}
