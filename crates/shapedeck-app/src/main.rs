//! Main application entry point.

fn main() {
    env_logger::init();
    log::info!("Starting ShapeDeck");

    pollster::block_on(shapedeck_app::App::run());
}
