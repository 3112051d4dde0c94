//! Color types and utilities

/// RGBA color with 8-bit components (straight alpha)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { a, r, g, b }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { a: 255, r, g, b }
    }

    /// Create from f32 components (0.0 to 1.0)
    pub fn from_f32(r: f32, g: f32, b: f32, a: f32) -> Self {
        let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::rgba(to_u8(r), to_u8(g), to_u8(b), to_u8(a))
    }

    /// Create from `0xRRGGBB`; any bits above the low 24 are ignored
    pub const fn from_hex_rgb(hex: u32) -> Self {
        Self::rgb(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    /// Create from `0xRRGGBBAA`
    pub const fn from_hex_rgba(hex: u32) -> Self {
        Self::rgba(
            ((hex >> 24) & 0xFF) as u8,
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    /// Parse `#RRGGBB`, `#RRGGBBAA`, or the same without the leading `#`
    pub fn parse_hex(text: &str) -> Option<Self> {
        let digits = text.trim().trim_start_matches('#');
        if !matches!(digits.len(), 6 | 8) || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(digits, 16).ok()?;
        if digits.len() == 6 {
            Some(Self::from_hex_rgb(value))
        } else {
            Some(Self::from_hex_rgba(value))
        }
    }

    /// Set alpha and return new color
    pub fn with_alpha(self, alpha: u8) -> Self {
        Self { a: alpha, ..self }
    }

    /// Multiply the alpha channel by `factor` (0.0 to 1.0)
    pub fn fade(self, factor: f32) -> Self {
        let a = (self.a as f32 * factor.clamp(0.0, 1.0)).round() as u8;
        self.with_alpha(a)
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Linear interpolation between two colors
    pub fn lerp(a: Color, b: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
        Color::rgba(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b), mix(a.a, b.a))
    }

    /// Convert to `[r, g, b, a]` bytes
    pub fn to_rgba8(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Convert to `[r, g, b, a]` in the 0.0 to 1.0 range
    pub fn to_f32_array(&self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }

    /// `#RRGGBBAA` representation
    pub fn to_hex_string(&self) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }
}

impl Default for Color {
    fn default() -> Self {
        Colors::BLACK
    }
}

/// Named colors
pub struct Colors;

impl Colors {
    pub const CLEAR: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const LIGHT_GRAY: Color = Color::rgb(211, 211, 211);
    pub const DARK_GRAY: Color = Color::rgb(64, 64, 64);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const ORANGE: Color = Color::rgb(255, 165, 0);
    pub const PURPLE: Color = Color::rgb(128, 0, 128);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Color::from_hex_rgb(0xFF0000), Colors::RED);
        assert_eq!(Color::from_hex_rgba(0x00FF0080), Color::rgba(0, 255, 0, 128));
        assert_eq!(Color::from_hex_rgba(0xFF000000), Color::rgba(255, 0, 0, 0));
        assert_eq!(Color::parse_hex("#FFFFFF"), Some(Colors::WHITE));
        assert_eq!(Color::parse_hex("0000FF80"), Some(Color::rgba(0, 0, 255, 128)));
        assert_eq!(Color::parse_hex("#12345"), None);
        assert_eq!(Color::parse_hex("#GGGGGG"), None);
        assert_eq!(Color::parse_hex("#+12345"), None);
        assert_eq!(Color::parse_hex("+1234567"), None);
    }

    #[test]
    fn test_fade_and_lerp() {
        assert_eq!(Colors::RED.fade(0.5).a, 128);
        assert_eq!(Color::lerp(Colors::BLACK, Colors::WHITE, 0.5), Color::rgb(128, 128, 128));
        assert_eq!(Colors::BLUE.to_hex_string(), "#0000FFFF");
    }
}
