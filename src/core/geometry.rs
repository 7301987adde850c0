use serde::{Deserialize, Serialize};

/// A point in layout space: points, origin at the top-left of the page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn from_origin(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub fn width(&self) -> f32 {
        (self.x1 - self.x0).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.y1 - self.y0).max(0.0)
    }

    pub fn center(&self) -> (f32, f32) {
        ((self.x0 + self.x1) * 0.5, (self.y0 + self.y1) * 0.5)
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Shrinks the box by `pad` on every side, collapsing onto the center
    /// rather than inverting when the box is too small.
    pub fn inset(&self, pad: f32) -> Self {
        let (cx, cy) = self.center();
        let pad_x = pad.min(self.width() * 0.5);
        let pad_y = pad.min(self.height() * 0.5);
        Self {
            x0: (self.x0 + pad_x).min(cx),
            y0: (self.y0 + pad_y).min(cy),
            x1: (self.x1 - pad_x).max(cx),
            y1: (self.y1 - pad_y).max(cy),
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x0 && point.x <= self.x1 && point.y >= self.y0 && point.y <= self.y1
    }

    /// Splits off a band of `height` from the top, returning `(top, rest)`.
    pub fn split_top(&self, height: f32) -> (Self, Self) {
        let cut = (self.y0 + height).min(self.y1);
        (
            Self::new(self.x0, self.y0, self.x1, cut),
            Self::new(self.x0, cut, self.x1, self.y1),
        )
    }

    /// Splits off a band of `height` from the bottom, returning `(rest, bottom)`.
    pub fn split_bottom(&self, height: f32) -> (Self, Self) {
        let cut = (self.y1 - height).max(self.y0);
        (
            Self::new(self.x0, self.y0, self.x1, cut),
            Self::new(self.x0, cut, self.x1, self.y1),
        )
    }

    /// Largest box with the given aspect ratio that fits inside `self`, centered.
    pub fn fit_aspect(&self, width: u32, height: u32) -> Self {
        if width == 0 || height == 0 || self.width() <= 0.0 || self.height() <= 0.0 {
            return *self;
        }
        let scale = (self.width() / width as f32).min(self.height() / height as f32);
        let w = width as f32 * scale;
        let h = height as f32 * scale;
        let (cx, cy) = self.center();
        Self::new(cx - w * 0.5, cy - h * 0.5, cx + w * 0.5, cy + h * 0.5)
    }
}
