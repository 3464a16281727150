use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn scaled(self, factor: f32) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.width.is_finite() && self.height.is_finite()
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn center(&self) -> Point {
        Point::new(self.width * 0.5, self.height * 0.5)
    }
}

/// Axis-aligned box stored by its top-left corner and extent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_center(center: Point, size: Size) -> Self {
        Self {
            x: center.x - size.width * 0.5,
            y: center.y - size.height * 0.5,
            w: size.width,
            h: size.height,
        }
    }

    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn inflate(self, pad: f32) -> Self {
        if pad <= 0.0 {
            return self;
        }
        Self {
            x: self.x - pad,
            y: self.y - pad,
            w: self.w + pad * 2.0,
            h: self.h + pad * 2.0,
        }
    }

    /// Strict intersection: boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Closed containment: `inner` may touch the border of `self`.
    pub fn contains_rect(&self, inner: &Rect) -> bool {
        inner.x >= self.x
            && inner.y >= self.y
            && inner.right() <= self.right()
            && inner.bottom() <= self.bottom()
    }

    pub fn overlap_area(&self, other: &Rect) -> f32 {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        (x1 - x0).max(0.0) * (y1 - y0).max(0.0)
    }
}

/// A tag ready for layout: its weight plus the caller-measured box at scale 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizedTag {
    pub label: String,
    pub count: u64,
    pub size: Size,
}

impl SizedTag {
    pub fn new(label: impl Into<String>, count: u64, size: Size) -> Self {
        Self {
            label: label.into(),
            count,
            size,
        }
    }
}

/// Final position of one tag.
///
/// `size` is the unscaled box; the occupied box is `size * scale` centered on
/// `center`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub size: Size,
    pub center: Point,
    pub scale: f32,
}

impl Placement {
    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.center, self.size.scaled(self.scale))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutStats {
    /// Spiral candidates examined across all tags.
    pub samples: usize,
    /// Largest number of candidates examined for a single tag.
    pub max_samples_per_tag: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
    pub placements: BTreeMap<String, Placement>,
    /// Labels in the order placement was attempted.
    pub order: Vec<String>,
    /// Labels whose spiral search ran out before a free spot was found.
    pub dropped: Vec<String>,
    pub counts: BTreeMap<String, u64>,
    pub stats: LayoutStats,
}

impl Layout {
    pub fn empty(canvas: Size) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            ..Default::default()
        }
    }

    pub fn canvas(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn get(&self, label: &str) -> Option<&Placement> {
        self.placements.get(label)
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Placed tags in placement order.
    pub fn iter_placed(&self) -> impl Iterator<Item = (&str, &Placement)> + '_ {
        self.order.iter().filter_map(|label| {
            self.placements
                .get(label)
                .map(|placement| (label.as_str(), placement))
        })
    }
}
