use shared::domain::Theme;
use tracing::{debug, warn};

use crate::host::SiteHost;

/// Root attribute the stylesheet keys its palette on.
pub const THEME_ATTRIBUTE: &str = "data-theme";

#[derive(Debug, Clone)]
pub struct ThemeToggle {
    theme: Theme,
    sound: bool,
}

impl ThemeToggle {
    pub fn new(theme: Theme, sound: bool) -> Self {
        Self { theme, sound }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Writes the current theme to the document root without toggling.
    pub fn apply<H: SiteHost + ?Sized>(&self, host: &mut H) {
        host.set_root_attribute(THEME_ATTRIBUTE, self.theme.as_str());
    }

    pub fn toggle<H: SiteHost + ?Sized>(&mut self, host: &mut H) -> Theme {
        self.theme = self.theme.toggled();
        self.apply(host);
        debug!(theme = self.theme.as_str(), "theme toggled");

        if self.sound {
            // Cosmetic only.
            if let Err(err) = host.play_theme_cue() {
                warn!(error = %err, "theme cue not played");
            }
        }
        self.theme
    }
}
