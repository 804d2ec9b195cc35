//! Visual parameters shared by every page.
//!
//! A `Theme` is a plain value handed to widgets through the page context.
//! Nothing here touches `egui::Style`, so two panels can render with different
//! themes in the same frame.

use egui::Color32;

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Forest green for success and healthy states.
    pub success: Color32,
    pub error: Color32,
    /// Amber for in-flight writes.
    pub pending: Color32,
    pub muted: Color32,
    pub accent: Color32,
    pub spacing: f32,
    pub drawer_width: f32,
    pub row_height: f32,
    pub header_height: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            success: Color32::from_rgb(34, 139, 34),
            error: Color32::from_rgb(220, 53, 69),
            pending: Color32::from_rgb(255, 193, 7),
            muted: Color32::GRAY,
            accent: Color32::from_rgb(66, 133, 244),
            spacing: 8.0,
            drawer_width: 180.0,
            row_height: 30.0,
            header_height: 24.0,
        }
    }
}

impl Theme {
    /// Compact variant for dense tables.
    pub fn compact() -> Self {
        Self {
            spacing: 4.0,
            drawer_width: 140.0,
            row_height: 22.0,
            header_height: 20.0,
            ..Self::default()
        }
    }
}
