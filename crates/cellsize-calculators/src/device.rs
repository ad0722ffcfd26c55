/// Screens at least this wide use the tablet layout.
pub const TABLET_MIN_SCREEN_WIDTH: f32 = 768.0;

/// Form factor of the device the feed is shown on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    #[default]
    Phone,
    Tablet,
}

impl DeviceClass {
    pub fn from_screen_width(width: f32) -> Self {
        if width >= TABLET_MIN_SCREEN_WIDTH {
            DeviceClass::Tablet
        } else {
            DeviceClass::Phone
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_width_selects_class() {
        assert_eq!(DeviceClass::from_screen_width(375.0), DeviceClass::Phone);
        assert_eq!(DeviceClass::from_screen_width(768.0), DeviceClass::Tablet);
        assert_eq!(DeviceClass::from_screen_width(1024.0), DeviceClass::Tablet);
    }
}
