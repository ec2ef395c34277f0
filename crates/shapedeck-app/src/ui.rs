//! UI components using egui.

use egui::{Align2, Color32, Context, Pos2, Vec2};
use egui_extras::{Column, TableBuilder};
use shapedeck_core::draft::DimensionField;
use shapedeck_core::shape::{Shape, ShapeKind};

use shapedeck_widgets::{
    close_button_at, danger_btn, default_btn, inline_error, input_text, modal_frame,
    panel_frame, primary_btn, secondary_btn, section_label, theme,
};

/// Actions emitted by the UI, applied by the app after the frame's pass.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    /// Open the creation form modal.
    OpenCreateForm,
    /// Close the creation form without creating (Cancel/backdrop).
    CloseCreateForm,
    /// Create a shape from validated form fields.
    CreateShape { name: String, kind: ShapeKind },
    /// Delete a shape immediately (no confirmation).
    DeleteShape(u64),
    /// Open the single-shape preview (with editor) for a record.
    PreviewShape(u64),
    /// Open the all-shapes preview (read-only).
    PreviewAll,
    /// Close the preview and return to the table.
    ClosePreview,
    /// An editor field changed; `input` is the raw text.
    EditDimension {
        field: DimensionField,
        input: String,
    },
    /// Commit the draft to the store and close the preview.
    SaveDraft,
}

/// What the preview overlay should show.
#[derive(Debug, Clone)]
pub enum PreviewView {
    /// Editing one shape; the draft's current state drives the heading.
    Single { draft: Shape },
    /// Viewing the whole list; no editor.
    All,
}

/// UI state owned by the app across frames.
pub struct UiState {
    /// Whether the creation form modal is open.
    pub form_open: bool,
    /// Creation form: name field.
    pub form_name: String,
    /// Creation form: selected kind (None until the user picks one).
    pub form_kind: Option<ShapeKind>,
    /// Creation form: inline validation message.
    pub form_error: Option<String>,
    /// Editor text buffers, parallel to [`DimensionField::ALL`].
    pub editor_inputs: [String; 6],
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            form_open: false,
            form_name: String::new(),
            form_kind: None,
            form_error: None,
            editor_inputs: Default::default(),
        }
    }
}

impl UiState {
    /// Reset the creation form for the next entry.
    pub fn reset_form(&mut self) {
        self.form_name.clear();
        self.form_kind = None;
        self.form_error = None;
    }

    /// Fill the editor buffers from a shape's current dimensions.
    pub fn load_editor_inputs(&mut self, shape: &Shape) {
        let d = &shape.dimensions;
        let values = [d.width, d.height, d.depth, d.x, d.y, d.z];
        for (buf, value) in self.editor_inputs.iter_mut().zip(values) {
            *buf = format_dimension(value);
        }
    }
}

/// Display form of a dimension value ("1.5", "2", "-7").
pub fn format_dimension(value: f64) -> String {
    format!("{}", value)
}

/// Validate the creation form. The only required field is the kind.
pub fn validate_form(kind: Option<&ShapeKind>) -> Result<ShapeKind, &'static str> {
    kind.cloned().ok_or("Shape type is required")
}

/// Render all UI for this frame; returns at most one action.
pub fn render_ui(
    ctx: &Context,
    ui_state: &mut UiState,
    shapes: &[Shape],
    preview: Option<&PreviewView>,
) -> Option<UiAction> {
    let mut action = None;

    match preview {
        None => {
            render_table(ctx, shapes, &mut action);
            if ui_state.form_open {
                render_create_form(ctx, ui_state, &mut action);
            }
        }
        Some(view) => {
            render_preview_overlay(ctx, ui_state, view, &mut action);
        }
    }

    action
}

/// The main list view: header actions plus the shape table.
fn render_table(ctx: &Context, shapes: &[Shape], action: &mut Option<UiAction>) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            ui.heading("Shapes");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if shapes.is_empty() {
                    ui.add_enabled_ui(false, |ui| {
                        let _ = secondary_btn(ui, "Render All");
                    });
                } else if secondary_btn(ui, "Render All") {
                    *action = Some(UiAction::PreviewAll);
                }
                if primary_btn(ui, "Create Shape") {
                    *action = Some(UiAction::OpenCreateForm);
                }
            });
        });
        ui.add_space(12.0);

        if shapes.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(48.0);
                ui.label(
                    egui::RichText::new("No shapes yet — use Create Shape to add one.")
                        .color(theme::TEXT_MUTED),
                );
            });
            return;
        }

        TableBuilder::new(ui)
            .striped(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::exact(60.0))
            .column(Column::remainder().at_least(120.0))
            .column(Column::exact(100.0))
            .column(Column::exact(140.0))
            .column(Column::exact(160.0))
            .header(26.0, |mut header| {
                for title in ["ID", "Name", "Type", "Dimensions", "Actions"] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for shape in shapes {
                    body.row(32.0, |mut row| {
                        row.col(|ui| {
                            ui.label(shape.id.to_string());
                        });
                        row.col(|ui| {
                            ui.label(&shape.name);
                        });
                        row.col(|ui| {
                            ui.label(shape.kind.label());
                        });
                        row.col(|ui| {
                            ui.label(shape.dimensions.summary());
                        });
                        row.col(|ui| {
                            if default_btn(ui, "Render") {
                                *action = Some(UiAction::PreviewShape(shape.id));
                            }
                            if danger_btn(ui, "Delete") {
                                *action = Some(UiAction::DeleteShape(shape.id));
                            }
                        });
                    });
                }
            });
    });
}

/// Modal dialog for creating a shape.
fn render_create_form(ctx: &Context, ui_state: &mut UiState, action: &mut Option<UiAction>) {
    // Semi-transparent backdrop; clicking it cancels.
    egui::Area::new(egui::Id::new("create_form_backdrop"))
        .fixed_pos(Pos2::ZERO)
        .order(egui::Order::Middle)
        .show(ctx, |ui| {
            let screen_rect = ctx.screen_rect();
            let response = ui.allocate_rect(screen_rect, egui::Sense::click());
            ui.painter()
                .rect_filled(screen_rect, 0.0, Color32::from_black_alpha(80));
            if response.clicked() {
                *action = Some(UiAction::CloseCreateForm);
            }
        });

    egui::Area::new(egui::Id::new("create_form"))
        .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            modal_frame().show(ui, |ui| {
                ui.set_width(300.0);
                ui.vertical(|ui| {
                    ui.label(
                        egui::RichText::new("Create a New Shape")
                            .size(16.0)
                            .strong()
                            .color(Color32::from_gray(30)),
                    );
                    ui.add_space(12.0);

                    section_label(ui, "Name (optional)");
                    input_text(ui, &mut ui_state.form_name, 300.0, "Shape name");
                    ui.add_space(8.0);

                    section_label(ui, "Type");
                    let selected = ui_state
                        .form_kind
                        .as_ref()
                        .map(|k| k.label().to_string())
                        .unwrap_or_else(|| "Select a type".to_string());
                    egui::ComboBox::from_id_salt("create_form_kind")
                        .selected_text(selected)
                        .width(300.0)
                        .show_ui(ui, |ui| {
                            for kind in ShapeKind::ALL {
                                let is_selected = ui_state.form_kind.as_ref() == Some(&kind);
                                if ui.selectable_label(is_selected, kind.label()).clicked() {
                                    ui_state.form_kind = Some(kind);
                                    ui_state.form_error = None;
                                }
                            }
                        });

                    if let Some(error) = &ui_state.form_error {
                        ui.add_space(4.0);
                        inline_error(ui, error);
                    }

                    ui.add_space(16.0);
                    ui.horizontal(|ui| {
                        if secondary_btn(ui, "Cancel") {
                            *action = Some(UiAction::CloseCreateForm);
                        }
                        if primary_btn(ui, "Create") {
                            match validate_form(ui_state.form_kind.as_ref()) {
                                Ok(kind) => {
                                    *action = Some(UiAction::CreateShape {
                                        name: ui_state.form_name.clone(),
                                        kind,
                                    });
                                }
                                Err(message) => {
                                    ui_state.form_error = Some(message.to_string());
                                }
                            }
                        }
                    });
                });
            });
        });
}

/// Overlay drawn on top of the 3D preview: close control, and the editor
/// panel in single-shape mode.
fn render_preview_overlay(
    ctx: &Context,
    ui_state: &mut UiState,
    view: &PreviewView,
    action: &mut Option<UiAction>,
) {
    // Close control in the top-right corner.
    egui::Area::new(egui::Id::new("preview_close"))
        .anchor(Align2::RIGHT_TOP, Vec2::new(-12.0, 12.0))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            if close_button_at(ui, ui.next_widget_position()) {
                *action = Some(UiAction::ClosePreview);
            }
        });

    let PreviewView::Single { draft } = view else {
        return;
    };

    egui::Area::new(egui::Id::new("preview_editor"))
        .anchor(Align2::LEFT_TOP, Vec2::new(16.0, 16.0))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.set_width(220.0);
                ui.label(
                    egui::RichText::new(format!("Name: {}", draft.name))
                        .size(14.0)
                        .strong()
                        .color(Color32::from_gray(30)),
                );
                ui.add_space(8.0);

                egui::Grid::new("preview_editor_fields")
                    .num_columns(2)
                    .spacing([8.0, 6.0])
                    .show(ui, |ui| {
                        for (index, field) in DimensionField::ALL.into_iter().enumerate() {
                            section_label(ui, field.label());
                            let response =
                                input_text(ui, &mut ui_state.editor_inputs[index], 110.0, "");
                            if response.changed() {
                                *action = Some(UiAction::EditDimension {
                                    field,
                                    input: ui_state.editor_inputs[index].clone(),
                                });
                            }
                            ui.end_row();
                        }
                    });

                ui.add_space(10.0);
                if primary_btn(ui, "Save Changes") {
                    *action = Some(UiAction::SaveDraft);
                }
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_form_requires_kind() {
        assert_eq!(validate_form(None), Err("Shape type is required"));
        assert_eq!(validate_form(Some(&ShapeKind::Cone)), Ok(ShapeKind::Cone));
    }

    #[test]
    fn test_reset_form_clears_everything() {
        let mut state = UiState::default();
        state.form_name = "x".to_string();
        state.form_kind = Some(ShapeKind::Cube);
        state.form_error = Some("err".to_string());

        state.reset_form();

        assert!(state.form_name.is_empty());
        assert!(state.form_kind.is_none());
        assert!(state.form_error.is_none());
    }

    #[test]
    fn test_load_editor_inputs_formats_values() {
        use shapedeck_core::shape::{Dimensions, Shape};

        let mut state = UiState::default();
        state.load_editor_inputs(&Shape {
            id: 1,
            name: "Shape-1".to_string(),
            kind: ShapeKind::Cube,
            dimensions: Dimensions {
                width: 1.5,
                height: 2.0,
                depth: 3.0,
                x: -7.0,
                y: 0.0,
                z: 0.25,
            },
        });

        assert_eq!(
            state.editor_inputs,
            ["1.5", "2", "3", "-7", "0", "0.25"].map(String::from)
        );
    }
}
