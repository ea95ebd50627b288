#![warn(missing_docs)]
//! Indent Guide - Headless Indent Guide Engine
//!
//! # Overview
//!
//! `indent-guide` computes the vertical line an editor draws alongside the block of indented
//! code the cursor is in. It does not render anything: the host editor supplies text, cursor,
//! viewport and font information through the [`GuideHost`] trait and receives a segment to draw.
//!
//! # Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  IndentGuide (events → clear/draw)          │  ← Host-facing controller
//! ├─────────────────────────────────────────────┤
//! │  GuideGeometryCalculator                    │  ← Viewport clipping, pixels
//! ├─────────────────────────────────────────────┤
//! │  BlockLocator                               │  ← Indentation-based block range
//! ├─────────────────────────────────────────────┤
//! │  LineBuffer (Rope-based)                    │  ← Document lines
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use indent_guide::{BlockLocator, LineBuffer};
//!
//! let buffer = LineBuffer::from_text("if x:\n    a\n    b\n    c\n    d");
//! let range = BlockLocator::default().locate(&buffer, 3).unwrap().unwrap();
//!
//! assert_eq!((range.start, range.end), (2, 5));
//! assert_eq!(range.opener, Some(1));
//! ```
//!
//! # Module Description
//!
//! - [`line_buffer`] - Snapshot of the active document
//! - [`indent`] - Leading whitespace measurement
//! - [`block`] - Block range location
//! - [`geometry`] - Guide segment computation
//! - [`host`] - Host collaborator traits
//! - [`guide`] - Event-driven controller
//! - [`theme`] - Syntax theme color resolution
//! - [`config`] - Guide configuration

pub mod block;
pub mod config;
pub mod error;
pub mod geometry;
pub mod guide;
pub mod host;
pub mod indent;
pub mod line_buffer;
pub mod theme;

pub use block::{BlockLocator, BlockRange, ScanBoundary};
pub use config::{DEFAULT_FALLBACK_COLOR, GuideAnchor, GuideConfig};
pub use error::{GuideError, ThemeError};
pub use geometry::{
    FontMetrics, GuideGeometry, GuideGeometryCalculator, PixelBox, ScaledOffset, TextColumn,
    Viewport, ViewportRange,
};
pub use guide::{GuideEvent, IndentGuide, Placement};
pub use host::{GuideHost, HitTest};
pub use indent::{indent_width, is_blank};
pub use line_buffer::LineBuffer;
pub use theme::{Color, GUIDE_COLOR_KEY, SyntaxTheme, ThemeRegistry, TokenStyle};
