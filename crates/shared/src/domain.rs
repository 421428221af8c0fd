use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a content section (the element id in the document).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(pub String);

impl SectionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollBehavior {
    Auto,
    #[default]
    Smooth,
}

/// Fixed-header display flags, recomputed on every throttled scroll tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HeaderVisibility {
    pub hidden: bool,
    pub forced: bool,
    pub scroll_up_visible: bool,
}

impl HeaderVisibility {
    /// Forced display wins over scroll-derived hiding.
    pub fn is_displayed(&self) -> bool {
        self.forced || !self.hidden
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NestedScrollState {
    pub scroll_top: f64,
    pub at_top: bool,
    pub at_bottom: bool,
}

impl Default for NestedScrollState {
    fn default() -> Self {
        Self {
            scroll_top: 0.0,
            at_top: true,
            at_bottom: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionPhase {
    #[default]
    Unseen,
    Visible,
    SeenNotVisible,
}

impl SectionPhase {
    pub fn is_visible(self) -> bool {
        self == Self::Visible
    }

    pub fn was_ever_visible(self) -> bool {
        self != Self::Unseen
    }
}

/// A section as discovered in the document: its id and display-order label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDescriptor {
    pub id: SectionId,
    pub order_num: String,
}

impl SectionDescriptor {
    pub fn new(id: impl Into<String>, order_num: impl Into<String>) -> Self {
        Self {
            id: SectionId::new(id),
            order_num: order_num.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionStatus {
    pub id: SectionId,
    pub order_num: String,
    pub is_visible: bool,
    pub was_ever_visible: bool,
}

/// Builds an indicator label such as `03 / 06`.
pub fn order_label(ordinal: usize, total: usize) -> String {
    format!("{ordinal:02} / {total:02}")
}
