//! Reusable egui widget components with a consistent styling.
//!
//! - **Buttons**: filled/outline/danger text buttons
//! - **Inputs**: styled single-line text fields
//! - **Layout**: section labels, separators, panel frames

pub mod buttons;
pub mod layout;

pub use buttons::{
    close_button_at, danger_btn, default_btn, inline_error, input_text, primary_btn,
    secondary_btn, TextButton,
};
pub use layout::{modal_frame, panel_frame, section_label, separator};

/// Standard sizing constants used across widgets.
pub mod sizing {
    /// Button height
    pub const BUTTON_HEIGHT: f32 = 28.0;
    /// Standard corner radius
    pub const CORNER_RADIUS: u8 = 4;
    /// Panel corner radius
    pub const PANEL_RADIUS: u8 = 8;
}

/// Standard colors used across widgets.
pub mod theme {
    use egui::Color32;

    /// Text color (dark gray)
    pub const TEXT: Color32 = Color32::from_rgb(60, 60, 60);
    /// Muted text color
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 120, 120);
    /// Border color
    pub const BORDER: Color32 = Color32::from_rgb(220, 220, 220);
    /// Selection/active color (blue)
    pub const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);
    /// Destructive action color (red)
    pub const DANGER: Color32 = Color32::from_rgb(239, 68, 68);
    /// Hover background
    pub const HOVER_BG: Color32 = Color32::from_rgb(245, 245, 245);
    /// Panel background
    pub const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(250, 250, 252, 250);
    /// Inline error text
    pub const ERROR_TEXT: Color32 = Color32::from_rgb(220, 38, 38);
}
