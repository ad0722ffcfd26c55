#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

/// The parts of a text style that influence its size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    /// Distance between baselines of consecutive lines.
    pub line_height: f32,
    pub weight: FontWeight,
    pub underline: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::white()
    }
}

impl TextStyle {
    pub const fn new(font_size: f32, line_height: f32) -> Self {
        Self {
            font_size,
            line_height,
            weight: FontWeight::Regular,
            underline: false,
        }
    }

    pub const fn bold(mut self) -> Self {
        self.weight = FontWeight::Bold;
        self
    }

    pub const fn underlined(mut self) -> Self {
        self.underline = true;
        self
    }

    /// Body copy on a dark banner.
    pub const fn white() -> Self {
        Self::new(14.0, 20.0)
    }

    /// Banner headlines.
    pub const fn bold_white() -> Self {
        Self::white().bold()
    }

    /// Call-to-action links.
    pub const fn white_underlined() -> Self {
        Self::white().underlined()
    }

    /// Large header titles.
    pub const fn title() -> Self {
        Self::new(24.0, 30.0).bold()
    }

    pub const fn caption() -> Self {
        Self::new(12.0, 16.0)
    }

    /// Bit-exact identity, used as a cache key.
    pub(crate) fn key(&self) -> (u32, u32, FontWeight, bool) {
        (
            self.font_size.to_bits(),
            self.line_height.to_bits(),
            self.weight,
            self.underline,
        )
    }
}
