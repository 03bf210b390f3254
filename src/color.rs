use serde::Serialize;

use crate::editor::Command;

pub const DEFAULT_RECENT_COLOR: &str = "yellow";

/// A color pick aimed at either the text background or the text itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorTarget {
    Background(String),
    Foreground(String),
}

impl ColorTarget {
    /// Reads a palette swatch's `data-event` / `data-value` pair.
    pub fn from_event(event_name: &str, value: &str) -> Option<Self> {
        if value.is_empty() {
            return None;
        }

        match event_name {
            "backColor" => Some(Self::Background(value.to_string())),
            "foreColor" => Some(Self::Foreground(value.to_string())),
            _ => None,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Background(v) | Self::Foreground(v) => v,
        }
    }

    pub fn command(&self) -> Command {
        match self {
            Self::Background(_) => Command::BackColor,
            Self::Foreground(_) => Command::ForeColor,
        }
    }

    /// CSS property used to preview this color on the recent color indicator.
    pub fn css_property(&self) -> &'static str {
        match self {
            Self::Background(_) => "background-color",
            Self::Foreground(_) => "color",
        }
    }
}

/// The last applied background and foreground colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentColor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fore_color: Option<String>,
}

impl RecentColor {
    pub fn apply(&mut self, target: &ColorTarget) {
        match target {
            ColorTarget::Background(v) => self.back_color = Some(v.clone()),
            ColorTarget::Foreground(v) => self.fore_color = Some(v.clone()),
        }
    }
}

impl Default for RecentColor {
    fn default() -> Self {
        Self {
            back_color: Some(DEFAULT_RECENT_COLOR.to_string()),
            fore_color: None,
        }
    }
}
