//! Geometric primitives

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    /// Rounds both dimensions up to whole points.
    pub fn integral(self) -> Self {
        Self {
            width: self.width.ceil(),
            height: self.height.ceil(),
        }
    }
}
