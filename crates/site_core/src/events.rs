//! State changes published to the rendering layer.

use shared::domain::{HeaderVisibility, NestedScrollState, SectionId, Theme};

use crate::contact::FormState;

#[derive(Debug, Clone, PartialEq)]
pub enum SiteEvent {
    HeaderChanged(HeaderVisibility),
    SectionVisibilityChanged {
        section: SectionId,
        visible: bool,
    },
    ActiveSectionChanged {
        section: SectionId,
        order_num: String,
    },
    MediaRequested {
        section: SectionId,
        source: String,
    },
    NestedScrollChanged(NestedScrollState),
    ThemeChanged(Theme),
    MobileMenuChanged(bool),
    FormChanged(FormState),
}
