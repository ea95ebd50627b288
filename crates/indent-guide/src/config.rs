//! Guide configuration.

use crate::block::ScanBoundary;
use crate::geometry::ScaledOffset;
use crate::theme::Color;
use serde::{Deserialize, Serialize};

/// Color used when the host theme cannot provide one.
pub const DEFAULT_FALLBACK_COLOR: Color = Color::new(0x80, 0x80, 0x80);

/// Which line the guide hangs from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuideAnchor {
    /// Hang the guide under the block's opening line, at the opener's indent column.
    /// Blocks without an opener fall back to [`GuideAnchor::BlockStart`].
    #[default]
    Opener,
    /// Start the guide below the block's first line, at that line's indent column.
    BlockStart,
}

/// Configuration for [`IndentGuide`](crate::IndentGuide).
///
/// Every field has a default, so partial JSON documents deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuideConfig {
    /// How far the downward block scan may go.
    pub scan_boundary: ScanBoundary,
    /// Line the guide hangs from.
    pub anchor: GuideAnchor,
    /// Bottom cap offset, scaled by the active line height (half of it is applied).
    pub bottom_cap: ScaledOffset,
    /// Extra pixels added to the guide's x position.
    pub horizontal_offset: f32,
    /// Color used when theme resolution fails.
    pub fallback_color: Color,
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self {
            scan_boundary: ScanBoundary::default(),
            anchor: GuideAnchor::default(),
            bottom_cap: ScaledOffset::default(),
            horizontal_offset: 0.0,
            fallback_color: DEFAULT_FALLBACK_COLOR,
        }
    }
}

impl GuideConfig {
    /// Configuration matching the legacy behavior, where the downward scan never visits the
    /// buffer's last line.
    pub fn legacy() -> Self {
        Self {
            scan_boundary: ScanBoundary::ExcludeLastLine,
            ..Self::default()
        }
    }

    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
