//! Piece model: a rectangular workpiece and its placement on the sheet.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How the contour of a piece is cut relative to its outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CutType {
    /// Cut outside the outline; the piece itself is kept.
    External,
    /// Cut inside the outline; the hole is kept.
    Internal,
    /// Cut directly on the outline, no compensation.
    Online,
}

impl Default for CutType {
    fn default() -> Self {
        Self::External
    }
}

impl std::fmt::Display for CutType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::External => write!(f, "external"),
            Self::Internal => write!(f, "internal"),
            Self::Online => write!(f, "online"),
        }
    }
}

/// A rectangular workpiece requested by the caller.
///
/// Immutable once created. `ignored` pieces are excluded from nesting and
/// toolpath generation but kept in the request so the caller can still
/// display them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    /// Caller-supplied identifier; generated when absent.
    pub id: String,
    pub width: f64,
    pub height: f64,
    pub cut_type: CutType,
    pub name: Option<String>,
    /// Position of the piece in the caller's original list.
    pub original_index: usize,
    pub ignored: bool,
}

impl Piece {
    /// Creates a new piece with a generated id.
    pub fn new(width: f64, height: f64, cut_type: CutType, original_index: usize) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            width,
            height,
            cut_type,
            name: None,
            original_index,
            ignored: false,
        }
    }

    /// Sets a display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Marks the piece as excluded from nesting and generation.
    pub fn with_ignored(mut self, ignored: bool) -> Self {
        self.ignored = ignored;
        self
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// A piece that has been placed on the sheet.
///
/// `x`/`y` is the bottom-left corner. Containment within the sheet and
/// pairwise non-overlap are established by the nesting engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedPiece {
    #[serde(flatten)]
    pub piece: Piece,
    pub x: f64,
    pub y: f64,
}

impl PositionedPiece {
    pub fn new(piece: Piece, x: f64, y: f64) -> Self {
        Self { piece, x, y }
    }

    pub fn right(&self) -> f64 {
        self.x + self.piece.width
    }

    pub fn top(&self) -> f64 {
        self.y + self.piece.height
    }

    /// True when the two bounding boxes, each inflated by `gap / 2` on
    /// every side, intersect with positive area.
    pub fn overlaps(&self, other: &PositionedPiece, gap: f64) -> bool {
        let g = gap / 2.0;
        self.x - g < other.right() + g
            && self.right() + g > other.x - g
            && self.y - g < other.top() + g
            && self.top() + g > other.y - g
    }

    /// True when the piece lies fully inside the sheet minus `margin`.
    pub fn within(&self, sheet_width: f64, sheet_height: f64, margin: f64) -> bool {
        self.x >= margin
            && self.y >= margin
            && self.right() <= sheet_width - margin
            && self.top() <= sheet_height - margin
    }
}
