//! Bounded, duplicate-free color selection.

use serde::{Deserialize, Serialize};

use catalogdesk_core::{DomainError, DomainResult};

pub const DEFAULT_MAX_COLORS: usize = 5;

/// Starting value of the custom color swatch.
pub const DEFAULT_CUSTOM_COLOR: &str = "#FFFFFF";

/// Quick-pick palette.
pub const PALETTE: [&str; 12] = [
    "#FF6B6B", // red
    "#4ECDC4", // teal
    "#45B7D1", // blue
    "#FDCB6E", // yellow
    "#6C5CE7", // purple
    "#00B894", // green
    "#FF8A5B", // orange
    "#A8E6CF", // mint
    "#FF69B4", // pink
    "#5F27CD", // deep purple
    "#10AC84", // emerald
    "#222F3E", // dark blue-gray
];

/// Named colors offered as checkboxes.
pub const NAMED_COLORS: [&str; 6] = ["Red", "Blue", "Green", "Yellow", "Black", "White"];

/// A single color: `#RRGGBB` (stored upper-case) or a color name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorToken(String);

impl ColorToken {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("color cannot be empty"));
        }
        if trimmed.starts_with('#') {
            return Ok(Self(trimmed.to_ascii_uppercase()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Default for ColorToken {
    fn default() -> Self {
        Self(DEFAULT_CUSTOM_COLOR.to_string())
    }
}

impl core::fmt::Display for ColorToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why an `add` left the set unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorRejection {
    AlreadySelected(ColorToken),
    LimitReached { max: usize },
}

impl ColorRejection {
    /// Operator-facing notice text.
    pub fn notice(&self) -> String {
        match self {
            ColorRejection::AlreadySelected(_) => "Color already selected".to_string(),
            ColorRejection::LimitReached { max } => format!("Maximum {max} colors allowed"),
        }
    }
}

impl From<ColorRejection> for DomainError {
    fn from(value: ColorRejection) -> Self {
        DomainError::validation(value.notice())
    }
}

/// Result of [`ColorSet::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    Added,
    Removed,
}

/// Ordered set of at most `max` distinct colors, in selection order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorSet {
    colors: Vec<ColorToken>,
    max: usize,
}

impl ColorSet {
    pub fn new(max: usize) -> Self {
        Self {
            colors: Vec::with_capacity(max),
            max,
        }
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.colors.len() >= self.max
    }

    pub fn contains(&self, color: &ColorToken) -> bool {
        self.colors.contains(color)
    }

    pub fn as_slice(&self) -> &[ColorToken] {
        &self.colors
    }

    /// Selection as wire strings.
    pub fn to_strings(&self) -> Vec<String> {
        self.colors.iter().map(|c| c.as_str().to_string()).collect()
    }

    /// Append `color`. Membership is checked before the cap.
    pub fn add(&mut self, color: ColorToken) -> Result<(), ColorRejection> {
        if self.contains(&color) {
            return Err(ColorRejection::AlreadySelected(color));
        }
        if self.is_full() {
            return Err(ColorRejection::LimitReached { max: self.max });
        }
        self.colors.push(color);
        Ok(())
    }

    /// Remove `color`; returns whether it was a member.
    pub fn remove(&mut self, color: &ColorToken) -> bool {
        let before = self.colors.len();
        self.colors.retain(|c| c != color);
        self.colors.len() != before
    }

    pub fn toggle(&mut self, color: ColorToken) -> Result<Toggled, ColorRejection> {
        if self.remove(&color) {
            return Ok(Toggled::Removed);
        }
        self.add(color).map(|()| Toggled::Added)
    }

    pub fn clear(&mut self) {
        self.colors.clear();
    }
}

impl Default for ColorSet {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_COLORS)
    }
}
