//! Syntax theme resolution
//!
//! Hosts describe their syntax themes as named settings maps that may inherit from a parent
//! theme. The guide takes its color from the foreground of the [`GUIDE_COLOR_KEY`] entry of the
//! resolved theme.
//!
//! # Example
//!
//! ```rust
//! use indent_guide::{Color, ThemeRegistry};
//!
//! let registry = ThemeRegistry::from_json(r##"{
//!     "Base": { "settings": { "surrounding_parens": { "foreground": "#0000ff" } } },
//!     "Dark": { "parent": "Base", "settings": { "surrounding_parens": { "foreground": "#dcdcdc" } } }
//! }"##).unwrap();
//!
//! assert_eq!(registry.guide_color("Dark").unwrap(), Color::new(0xdc, 0xdc, 0xdc));
//! ```

use crate::error::ThemeError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Settings key whose foreground color is used for the guide.
pub const GUIDE_COLOR_KEY: &str = "surrounding_parens";

/// An RGB color, written as `#rrggbb` (or the `#rgb` shorthand).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red component.
    pub r: u8,
    /// Green component.
    pub g: u8,
    /// Blue component.
    pub b: u8,
}

impl Color {
    /// Create a color from components.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for Color {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ThemeError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            // `#abc` expands to `#aabbcc`.
            3 => Ok(Self::new(
                channel(&hex[0..1])? * 0x11,
                channel(&hex[1..2])? * 0x11,
                channel(&hex[2..3])? * 0x11,
            )),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ThemeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Colors for one settings key. Unset fields are inherited from the parent theme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenStyle {
    #[serde(default)]
    /// Foreground color string.
    pub foreground: Option<String>,
    #[serde(default)]
    /// Background color string.
    pub background: Option<String>,
}

impl TokenStyle {
    fn merge_from(&mut self, other: &TokenStyle) {
        if other.foreground.is_some() {
            self.foreground.clone_from(&other.foreground);
        }
        if other.background.is_some() {
            self.background.clone_from(&other.background);
        }
    }
}

/// A syntax theme definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxTheme {
    #[serde(default)]
    /// Name of the theme this one extends.
    pub parent: Option<String>,
    #[serde(default)]
    /// Settings keyed by token kind.
    pub settings: HashMap<String, TokenStyle>,
}

/// Named syntax themes with parent inheritance.
#[derive(Debug, Clone, Default)]
pub struct ThemeRegistry {
    themes: HashMap<String, SyntaxTheme>,
}

impl ThemeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load themes from a JSON object mapping theme names to definitions.
    pub fn from_json(json: &str) -> Result<Self, ThemeError> {
        let themes: HashMap<String, SyntaxTheme> = serde_json::from_str(json)?;
        Ok(Self { themes })
    }

    /// Add themes from a JSON document, replacing themes with the same name.
    pub fn extend_from_json(&mut self, json: &str) -> Result<(), ThemeError> {
        let themes: HashMap<String, SyntaxTheme> = serde_json::from_str(json)?;
        self.themes.extend(themes);
        Ok(())
    }

    /// Register (or replace) a theme.
    pub fn register(&mut self, name: impl Into<String>, theme: SyntaxTheme) {
        self.themes.insert(name.into(), theme);
    }

    /// Returns `true` if a theme with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.themes.contains_key(name)
    }

    /// Registered theme names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.themes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Resolve a theme's settings, applying its parent chain (ancestors first).
    pub fn resolve(&self, name: &str) -> Result<HashMap<String, TokenStyle>, ThemeError> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(name);

        while let Some(theme_name) = current {
            if !seen.insert(theme_name) {
                return Err(ThemeError::InheritanceCycle(theme_name.to_string()));
            }
            let theme = self
                .themes
                .get(theme_name)
                .ok_or_else(|| ThemeError::UnknownTheme(theme_name.to_string()))?;
            chain.push(theme);
            current = theme.parent.as_deref();
        }

        let mut resolved: HashMap<String, TokenStyle> = HashMap::new();
        for theme in chain.into_iter().rev() {
            for (key, style) in &theme.settings {
                resolved
                    .entry(key.clone())
                    .and_modify(|existing| existing.merge_from(style))
                    .or_insert_with(|| style.clone());
            }
        }
        Ok(resolved)
    }

    /// Resolve the guide color of the named theme.
    pub fn guide_color(&self, name: &str) -> Result<Color, ThemeError> {
        let settings = self.resolve(name)?;
        let foreground = settings
            .get(GUIDE_COLOR_KEY)
            .and_then(|style| style.foreground.as_deref())
            .ok_or_else(|| ThemeError::MissingColor {
                theme: name.to_string(),
                key: GUIDE_COLOR_KEY.to_string(),
            })?;
        foreground.parse()
    }
}
