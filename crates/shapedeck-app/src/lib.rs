//! ShapeDeck Application
//!
//! The application shell providing windowing, GPU setup, and the
//! table / form / editor / preview UI over the shape store.

mod app;
mod ui;

pub use app::{App, AppConfig};
pub use ui::{render_ui, PreviewView, UiAction, UiState};
