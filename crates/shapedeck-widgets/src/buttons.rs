//! Button and input components.

use egui::{
    vec2, Color32, CornerRadius, CursorIcon, FontId, Pos2, Response, Sense, Stroke, Ui,
};

use crate::{sizing, theme};

/// Visual variant of a [`TextButton`].
#[derive(Clone, Copy, PartialEq, Eq)]
enum ButtonVariant {
    /// Accent-filled with white text.
    Primary,
    /// Outlined, neutral text.
    Secondary,
    /// Outlined, destructive red text.
    Danger,
    /// Borderless, for inline actions.
    Plain,
}

/// A custom-painted text button.
pub struct TextButton<'a> {
    label: &'a str,
    variant: ButtonVariant,
    min_width: f32,
}

impl<'a> TextButton<'a> {
    fn new(label: &'a str, variant: ButtonVariant) -> Self {
        Self {
            label,
            variant,
            min_width: 0.0,
        }
    }

    /// Force a minimum width (labels narrower than this get centered).
    pub fn min_width(mut self, width: f32) -> Self {
        self.min_width = width;
        self
    }

    /// Paint the button; returns true when clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let font = FontId::proportional(13.0);
        let text_width = ui.fonts_mut(|f| {
            self.label
                .chars()
                .map(|c| f.glyph_width(&font, c))
                .sum::<f32>()
        });
        let width = (text_width + 24.0).max(self.min_width);
        let (rect, response) =
            ui.allocate_exact_size(vec2(width, sizing::BUTTON_HEIGHT), Sense::click());

        if ui.is_rect_visible(rect) {
            let hovered = response.hovered();
            let (bg, stroke, text_color) = match self.variant {
                ButtonVariant::Primary => {
                    let bg = if hovered {
                        Color32::from_rgb(37, 99, 235)
                    } else {
                        theme::ACCENT
                    };
                    (bg, Stroke::NONE, Color32::WHITE)
                }
                ButtonVariant::Secondary => {
                    let bg = if hovered { theme::HOVER_BG } else { Color32::WHITE };
                    (bg, Stroke::new(1.0, theme::BORDER), theme::TEXT)
                }
                ButtonVariant::Danger => {
                    let bg = if hovered {
                        Color32::from_rgb(254, 242, 242)
                    } else {
                        Color32::WHITE
                    };
                    (bg, Stroke::new(1.0, theme::BORDER), theme::DANGER)
                }
                ButtonVariant::Plain => {
                    let bg = if hovered { theme::HOVER_BG } else { Color32::TRANSPARENT };
                    (bg, Stroke::NONE, theme::ACCENT)
                }
            };

            let radius = CornerRadius::same(sizing::CORNER_RADIUS);
            ui.painter().rect_filled(rect, radius, bg);
            if stroke != Stroke::NONE {
                ui.painter()
                    .rect_stroke(rect, radius, stroke, egui::StrokeKind::Inside);
            }
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                self.label,
                font,
                text_color,
            );
        }

        response.on_hover_cursor(CursorIcon::PointingHand).clicked()
    }
}

/// Accent-filled button for the main action of a view.
pub fn primary_btn(ui: &mut Ui, label: &str) -> bool {
    TextButton::new(label, ButtonVariant::Primary).show(ui)
}

/// Outlined button for secondary actions (Cancel and friends).
pub fn secondary_btn(ui: &mut Ui, label: &str) -> bool {
    TextButton::new(label, ButtonVariant::Secondary).show(ui)
}

/// Outlined button with destructive styling.
pub fn danger_btn(ui: &mut Ui, label: &str) -> bool {
    TextButton::new(label, ButtonVariant::Danger).show(ui)
}

/// Borderless button for inline row actions.
pub fn default_btn(ui: &mut Ui, label: &str) -> bool {
    TextButton::new(label, ButtonVariant::Plain).show(ui)
}

/// Styled single-line text input.
pub fn input_text(ui: &mut Ui, text: &mut String, width: f32, hint: &str) -> Response {
    ui.add(
        egui::TextEdit::singleline(text)
            .desired_width(width)
            .hint_text(hint)
            .font(FontId::proportional(13.0))
            .margin(egui::Margin::symmetric(8, 6)),
    )
}

/// Text drawn under a field when validation fails.
pub fn inline_error(ui: &mut Ui, message: &str) {
    ui.label(
        egui::RichText::new(message)
            .size(11.0)
            .color(theme::ERROR_TEXT),
    );
}

/// Position helper for drawing a close "✕" affordance in a corner.
pub fn close_button_at(ui: &mut Ui, pos: Pos2) -> bool {
    let size = vec2(28.0, 28.0);
    let rect = egui::Rect::from_min_size(pos, size);
    let response = ui.allocate_rect(rect, Sense::click());

    if ui.is_rect_visible(rect) {
        let bg = if response.hovered() {
            Color32::from_gray(235)
        } else {
            Color32::from_gray(248)
        };
        ui.painter()
            .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), bg);
        ui.painter().text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "✕",
            FontId::proportional(14.0),
            theme::TEXT,
        );
    }

    response.on_hover_cursor(CursorIcon::PointingHand).clicked()
}
