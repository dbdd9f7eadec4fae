use crate::types::*;
use serde::{Deserialize, Serialize};

/// Fixed page geometry, all values in millimeters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    /// Left and right margin
    pub side_margin_mm: f32,
    /// Height of the coloured header band
    pub header_height_mm: f32,
    /// Gap between the header band and the first body line
    pub body_gap_mm: f32,
    /// Lowest point a body line may reach, measured from the page bottom
    pub bottom_margin_mm: f32,
    /// Distance of the footer rule from the page bottom
    pub footer_rule_mm: f32,
    /// Base line height for body text
    pub line_height_mm: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        // A4
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            side_margin_mm: 20.0,
            header_height_mm: 30.0,
            body_gap_mm: 10.0,
            bottom_margin_mm: 25.0,
            footer_rule_mm: 18.0,
            line_height_mm: 6.0,
        }
    }
}

impl PageGeometry {
    /// Width available to text between the side margins
    pub fn column_width_mm(&self) -> f32 {
        self.page_width_mm - 2.0 * self.side_margin_mm
    }

    /// Cursor position of the first body line on a fresh page
    pub fn body_top_mm(&self) -> f32 {
        self.header_height_mm + self.body_gap_mm
    }

    /// Cursor position no body line may extend past
    pub fn body_bottom_mm(&self) -> f32 {
        self.page_height_mm - self.bottom_margin_mm
    }
}

/// Colour palette for every line role and the page decoration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub navy: RgbColor,
    /// Accent colours of numbered sections 1 to 4
    pub sections: [RgbColor; 4],
    pub alert_text: RgbColor,
    pub alert_fill: RgbColor,
    pub question: RgbColor,
    pub answer: RgbColor,
    pub plain: RgbColor,
    pub header_text: RgbColor,
    pub rule: RgbColor,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            navy: RgbColor::from_u8(0, 51, 102),
            sections: [
                RgbColor::from_u8(0, 102, 204),  // blue
                RgbColor::from_u8(0, 153, 76),   // green
                RgbColor::from_u8(204, 0, 0),    // red
                RgbColor::from_u8(255, 128, 0),  // orange
            ],
            alert_text: RgbColor::from_u8(200, 0, 0),
            alert_fill: RgbColor::from_u8(255, 230, 230),
            question: RgbColor::from_u8(0, 102, 204),
            answer: RgbColor::from_u8(0, 128, 128),
            plain: RgbColor::from_u8(64, 64, 64),
            header_text: RgbColor::from_u8(255, 255, 255),
            rule: RgbColor::from_u8(160, 160, 160),
        }
    }
}

/// Font sizes in points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSizes {
    pub header_title: f32,
    pub header_subtitle: f32,
    pub title: f32,
    pub section: f32,
    pub body: f32,
    pub footer: f32,
}

impl Default for FontSizes {
    fn default() -> Self {
        Self {
            header_title: 18.0,
            header_subtitle: 10.0,
            title: 16.0,
            section: 13.0,
            body: 11.0,
            footer: 9.0,
        }
    }
}

/// Everything the render entry point needs besides the text itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuideConfig {
    pub app_name: String,
    pub geometry: PageGeometry,
    pub palette: Palette,
    pub font_sizes: FontSizes,
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self {
            app_name: "Neuro-Sortie".to_string(),
            geometry: PageGeometry::default(),
            palette: Palette::default(),
            font_sizes: FontSizes::default(),
        }
    }
}

impl GuideConfig {
    /// Load a configuration from a JSON file
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let config: Self = serde_json::from_slice(&bytes)
            .map_err(|e| GuideError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration as pretty JSON
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| GuideError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let g = &self.geometry;

        let positive = [
            ("page_width_mm", g.page_width_mm),
            ("page_height_mm", g.page_height_mm),
            ("line_height_mm", g.line_height_mm),
            ("header_height_mm", g.header_height_mm),
        ];
        for (name, value) in positive {
            if value <= 0.0 || !value.is_finite() {
                return Err(GuideError::Config(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        if g.side_margin_mm < 0.0 || g.column_width_mm() <= 0.0 {
            return Err(GuideError::Config(
                "Side margins leave no room for text".to_string(),
            ));
        }

        // Each page must fit at least the tallest single line
        let tallest = g.line_height_mm * self.line_scale(self.font_sizes.title);
        if g.body_bottom_mm() - g.body_top_mm() < tallest {
            return Err(GuideError::Config(
                "Body area is too small to hold a single line".to_string(),
            ));
        }

        let sizes = &self.font_sizes;
        for size in [sizes.title, sizes.section, sizes.body, sizes.footer] {
            if size <= 0.0 {
                return Err(GuideError::Config(format!(
                    "Font sizes must be positive, got {}",
                    size
                )));
            }
        }

        Ok(())
    }

    /// Line height multiplier for text larger than the body size
    pub(crate) fn line_scale(&self, size_pt: f32) -> f32 {
        (size_pt / self.font_sizes.body).max(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GuideConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_geometry_is_a4() {
        let g = PageGeometry::default();
        assert_eq!((g.page_width_mm, g.page_height_mm), (210.0, 297.0));
        assert_eq!(g.column_width_mm(), 170.0);
        assert_eq!(g.body_top_mm(), 40.0);
        assert_eq!(g.body_bottom_mm(), 272.0);
    }

    #[test]
    fn test_rejects_zero_line_height() {
        let mut config = GuideConfig::default();
        config.geometry.line_height_mm = 0.0;
        assert!(matches!(config.validate(), Err(GuideError::Config(_))));
    }

    #[test]
    fn test_rejects_margins_wider_than_page() {
        let mut config = GuideConfig::default();
        config.geometry.side_margin_mm = 120.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_body_without_room() {
        let mut config = GuideConfig::default();
        config.geometry.header_height_mm = 250.0;
        assert!(config.validate().is_err());
    }
}
