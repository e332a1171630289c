use serde::{Deserialize, Serialize};

/// An axis-aligned box in CSS pixels.
///
/// Depending on where it comes from, `y` is either relative to the document
/// origin (layout boxes) or to the viewport (client rects).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Returns the same box moved vertically by `dy`.
    pub fn translate_y(self, dy: f32) -> Self {
        Self {
            y: self.y + dy,
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(0.0, 120.0, 300.0, 40.0);
        assert_eq!(rect.top(), 120.0);
        assert_eq!(rect.bottom(), 160.0);
        assert_eq!(rect.size(), Size::new(300.0, 40.0));
    }

    #[test]
    fn test_translate_keeps_size() {
        let rect = Rect::new(10.0, 500.0, 80.0, 20.0).translate_y(-350.0);
        assert_eq!(rect.y, 150.0);
        assert_eq!(rect.x, 10.0);
        assert_eq!(rect.height, 20.0);
    }
}
