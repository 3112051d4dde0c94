//! Drawboard configuration
//!
//! Read from a `drawboard.toml` file:
//!
//! ```toml
//! [surface]
//! scale = 2.0
//! transparent = false
//! background = "#F0F0F0"
//!
//! [text]
//! default_family = "sans-serif"
//! load_system_fonts = true
//!
//! [touch]
//! coordinates = "local"   # or "page"
//! multi_touch = true
//! ```
//!
//! Every key is optional.

use std::fs;
use std::path::Path;

use drawboard_graphics::Color;
use drawboard_platform::{TouchCoordinates, TouchRouter};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewError};

/// Top-level configuration
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct DrawboardConfig {
    #[serde(default)]
    pub surface: SurfaceConfig,
    #[serde(default)]
    pub text: TextConfig,
    #[serde(default)]
    pub touch: TouchConfig,
}

/// Native drawing surface settings
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SurfaceConfig {
    /// Device pixels per view unit
    #[serde(default = "default_scale")]
    pub scale: f32,
    /// Leave the surface transparent instead of painting a background
    #[serde(default)]
    pub transparent: bool,
    /// Background colour as `#RRGGBB` or `#RRGGBBAA`
    #[serde(default)]
    pub background: Option<String>,
}

fn default_scale() -> f32 {
    1.0
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            transparent: false,
            background: None,
        }
    }
}

impl SurfaceConfig {
    /// Parsed background colour
    pub fn background_color(&self) -> Result<Option<Color>> {
        match &self.background {
            None => Ok(None),
            Some(text) => Color::parse_hex(text)
                .map(Some)
                .ok_or_else(|| ViewError::InvalidConfig(format!("background colour {:?}", text))),
        }
    }
}

/// Text rendering settings
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TextConfig {
    /// Family used when a font names a generic or missing family
    #[serde(default = "default_family")]
    pub default_family: String,
    /// Scan the system font directories at startup
    #[serde(default = "default_true")]
    pub load_system_fonts: bool,
}

fn default_family() -> String {
    "sans-serif".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            default_family: default_family(),
            load_system_fonts: true,
        }
    }
}

/// Touch routing settings
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TouchConfig {
    #[serde(default)]
    pub coordinates: TouchCoordinates,
    /// Forward every concurrent touch, not only the primary one
    #[serde(default = "default_true")]
    pub multi_touch: bool,
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self {
            coordinates: TouchCoordinates::Local,
            multi_touch: true,
        }
    }
}

impl TouchConfig {
    /// A router configured from these settings
    pub fn router(&self) -> TouchRouter {
        TouchRouter::new()
            .with_coordinates(self.coordinates)
            .with_multi_touch(self.multi_touch)
    }
}

impl DrawboardConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: DrawboardConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ViewError::ConfigIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Serialize back to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ViewError::InvalidConfig(e.to_string()))
    }

    fn validate(&self) -> Result<()> {
        if !(self.surface.scale.is_finite() && self.surface.scale > 0.0) {
            return Err(ViewError::InvalidConfig(format!(
                "surface.scale must be positive, got {}",
                self.surface.scale
            )));
        }
        self.surface.background_color()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = DrawboardConfig::from_toml_str("").unwrap();
        assert_eq!(config, DrawboardConfig::default());
        assert_eq!(config.surface.scale, 1.0);
        assert!(config.text.load_system_fonts);
        assert_eq!(config.touch.coordinates, TouchCoordinates::Local);
    }

    #[test]
    fn test_partial_sections() {
        let config = DrawboardConfig::from_toml_str(
            r##"
            [surface]
            scale = 3.0
            background = "#102030"

            [touch]
            coordinates = "page"
            "##,
        )
        .unwrap();

        assert_eq!(config.surface.scale, 3.0);
        assert!(!config.surface.transparent);
        assert_eq!(
            config.surface.background_color().unwrap(),
            Some(Color::rgb(0x10, 0x20, 0x30))
        );
        assert_eq!(config.touch.coordinates, TouchCoordinates::Page);
        assert!(config.touch.multi_touch);
        assert_eq!(config.text.default_family, "sans-serif");
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            DrawboardConfig::from_toml_str("[surface]\nscale = 0.0"),
            Err(ViewError::InvalidConfig(_))
        ));
        assert!(matches!(
            DrawboardConfig::from_toml_str("[surface]\nbackground = \"teal\""),
            Err(ViewError::InvalidConfig(_))
        ));
        assert!(matches!(
            DrawboardConfig::from_toml_str("[touch]\ncoordinates = \"screen\""),
            Err(ViewError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_to_toml_string_reparses() {
        let mut config = DrawboardConfig::default();
        config.surface.background = Some("#FFFFFFFF".into());
        config.touch.multi_touch = false;
        let text = config.to_toml_string().unwrap();
        assert_eq!(DrawboardConfig::from_toml_str(&text).unwrap(), config);
    }
}
