//! Core application state and lifecycle.

use std::sync::Arc;

use shapedeck_core::draft::ShapeDraft;
use shapedeck_core::shape::NewShape;
use shapedeck_core::storage::{FileStorage, MemoryStorage};
use shapedeck_core::store::ShapeStore;
use shapedeck_render::renderer::MeshRenderer;
use shapedeck_render::scene::PreviewScene;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

use crate::ui::{render_ui, PreviewView, UiAction, UiState};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Clear color of the 3D viewport.
    pub preview_background: wgpu::Color,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "ShapeDeck".to_string(),
            width: 1280,
            height: 800,
            preview_background: wgpu::Color {
                r: 0.02,
                g: 0.02,
                b: 0.03,
                a: 1.0,
            },
        }
    }
}

/// What the open preview is bound to.
enum PreviewMode {
    /// One shape, edited through an owned draft.
    Single { draft: ShapeDraft },
    /// The whole list, read-only.
    All,
}

/// A live preview: staged scene plus its GPU-side renderer.
///
/// Dropping the session releases every scene-graph node and GPU buffer it
/// created; closing and reopening always starts from a fresh scene.
struct PreviewSession {
    mode: PreviewMode,
    scene: PreviewScene,
    renderer: MeshRenderer,
    /// Set when the draft or the shape list changed; the scene is rebuilt
    /// from scratch before the next draw.
    dirty: bool,
}

/// Runtime state for the application.
struct AppState {
    // Windowing
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    device: wgpu::Device,
    queue: wgpu::Queue,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    ui_state: UiState,

    // State
    store: ShapeStore,
    preview: Option<PreviewSession>,
    config: AppConfig,
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    state: Option<AppState>,
}

impl App {
    /// Create a new application with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a new application with custom configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Run the application.
    pub async fn run() {
        let event_loop = EventLoop::new().expect("Failed to create event loop");
        let mut app = App::new();
        event_loop.run_app(&mut app).expect("Event loop error");
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        log::info!("Creating window...");

        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("Failed to create window"),
        );

        let size = window.inner_size();
        let (width, height) = if size.width == 0 || size.height == 0 {
            (self.config.width, self.config.height)
        } else {
            (size.width, size.height)
        };

        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window.clone())
            .expect("Failed to create surface");
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            force_fallback_adapter: false,
            compatible_surface: Some(&surface),
        }))
        .expect("No suitable GPU adapter");
        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("shapedeck device"),
            ..Default::default()
        }))
        .expect("Failed to create device");

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(caps.formats[0]);
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        // Initialize egui
        let egui_ctx = egui::Context::default();
        egui_ctx.set_visuals(egui::Visuals::light());
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer =
            egui_wgpu::Renderer::new(&device, format, egui_wgpu::RendererOptions::default());

        let store = open_store();

        log::info!("ShapeDeck initialized - {}x{}", width, height);

        self.state = Some(AppState {
            window: window.clone(),
            surface,
            surface_config,
            device,
            queue,
            egui_ctx,
            egui_state,
            egui_renderer,
            ui_state: UiState::default(),
            store,
            preview: None,
            config: self.config.clone(),
        });

        window.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        // Let egui process the event first.
        let egui_response = state.egui_state.on_window_event(&state.window, &event);
        if egui_response.repaint {
            state.window.request_redraw();
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }
                state.surface_config.width = size.width;
                state.surface_config.height = size.height;
                state
                    .surface
                    .configure(&state.device, &state.surface_config);
                state.window.request_redraw();
            }

            WindowEvent::RedrawRequested => {
                state.frame();
            }

            _ => {}
        }
    }
}

/// Open the shape store over the default file location, falling back to an
/// in-memory backend if the filesystem is unavailable.
fn open_store() -> ShapeStore {
    match FileStorage::default_location() {
        Ok(storage) => {
            log::info!("Persisting shapes under {}", storage.base_path().display());
            ShapeStore::open(Box::new(storage))
        }
        Err(e) => {
            log::warn!("Falling back to in-memory storage: {}", e);
            ShapeStore::open(Box::new(MemoryStorage::new()))
        }
    }
}

impl AppState {
    /// Render one frame: UI pass, action dispatch, 3D pass, egui pass.
    fn frame(&mut self) {
        // Build the UI.
        let preview_view = self.preview.as_ref().map(|p| match &p.mode {
            PreviewMode::Single { draft } => PreviewView::Single {
                draft: draft.shape().clone(),
            },
            PreviewMode::All => PreviewView::All,
        });
        let shapes = self.store.list().to_vec();

        let egui_input = self.egui_state.take_egui_input(&self.window);
        let mut action = None;
        let ui_state = &mut self.ui_state;
        let egui_output = self.egui_ctx.run(egui_input, |ctx| {
            action = render_ui(ctx, ui_state, &shapes, preview_view.as_ref());
        });

        self.egui_state
            .handle_platform_output(&self.window, egui_output.platform_output);
        let egui_primitives = self
            .egui_ctx
            .tessellate(egui_output.shapes, egui_output.pixels_per_point);

        if let Some(action) = action {
            self.apply_action(action);
        }

        // Animate and rebuild the preview scene as needed.
        if let Some(preview) = &mut self.preview {
            if preview.dirty {
                preview.scene = match &preview.mode {
                    PreviewMode::Single { draft } => PreviewScene::single(draft.shape()),
                    PreviewMode::All => PreviewScene::all(self.store.list()),
                };
                preview.renderer.rebuild(&self.device, &preview.scene);
                preview.dirty = false;
            }
            preview.scene.advance();
        }

        // Acquire the frame.
        let surface_texture = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.surface_config);
                self.window.request_redraw();
                return;
            }
            Err(e) => {
                log::warn!("Failed to get surface texture: {:?}", e);
                return;
            }
        };
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let width = self.surface_config.width;
        let height = self.surface_config.height;

        // 3D pass (clears the frame) when a preview is open.
        let mut frame_cleared = false;
        if let Some(preview) = &mut self.preview {
            match preview.renderer.render(
                &self.device,
                &self.queue,
                &surface_view,
                (width, height),
                &preview.scene,
                self.config.preview_background,
            ) {
                Ok(()) => frame_cleared = true,
                Err(e) => log::error!("Preview render failed: {}", e),
            }
        }

        // Update egui textures.
        for (id, image_delta) in &egui_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }

        // Render egui on top.
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: egui_output.pixels_per_point,
        };
        {
            let mut encoder = self
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("egui encoder"),
                });

            self.egui_renderer.update_buffers(
                &self.device,
                &self.queue,
                &mut encoder,
                &egui_primitives,
                &screen_descriptor,
            );

            let load = if frame_cleared {
                // Keep the 3D pass underneath.
                wgpu::LoadOp::Load
            } else {
                wgpu::LoadOp::Clear(wgpu::Color::WHITE)
            };
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // forget_lifetime satisfies egui-wgpu's 'static requirement.
            let mut render_pass = render_pass.forget_lifetime();
            self.egui_renderer
                .render(&mut render_pass, &egui_primitives, &screen_descriptor);
            drop(render_pass);

            self.queue.submit(std::iter::once(encoder.finish()));
        }

        for id in &egui_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
        surface_texture.present();

        // The animation loop runs only while a preview is open; table
        // frames are driven by input events instead.
        if self.preview.is_some() {
            self.window.request_redraw();
        }
    }

    /// Apply one UI action to the store / preview / form state.
    fn apply_action(&mut self, action: UiAction) {
        // The frame being drawn predates the action; show its result.
        self.window.request_redraw();
        match action {
            UiAction::OpenCreateForm => {
                self.ui_state.form_open = true;
                self.ui_state.form_error = None;
            }
            UiAction::CloseCreateForm => {
                self.ui_state.form_open = false;
                self.ui_state.reset_form();
            }
            UiAction::CreateShape { name, kind } => {
                let shape = self.store.create(NewShape { name, kind });
                log::info!("Created shape #{} ({})", shape.id, shape.kind);
                self.ui_state.form_open = false;
                self.ui_state.reset_form();
                self.mark_preview_dirty();
            }
            UiAction::DeleteShape(id) => {
                if self.store.delete(id) {
                    log::info!("Deleted shape #{}", id);
                }
                self.mark_preview_dirty();
            }
            UiAction::PreviewShape(id) => {
                let Some(shape) = self.store.get(id).cloned() else {
                    return;
                };
                let draft = ShapeDraft::new(shape);
                self.ui_state.load_editor_inputs(draft.shape());
                let scene = PreviewScene::single(draft.shape());
                self.open_preview(PreviewMode::Single { draft }, scene);
            }
            UiAction::PreviewAll => {
                let scene = PreviewScene::all(self.store.list());
                self.open_preview(PreviewMode::All, scene);
            }
            UiAction::ClosePreview => {
                // Dropping the session releases the scene and all GPU
                // resources it uploaded.
                self.preview = None;
                log::debug!("Preview closed");
            }
            UiAction::EditDimension { field, input } => {
                if let Some(preview) = &mut self.preview {
                    if let PreviewMode::Single { draft } = &mut preview.mode {
                        if draft.set_field(field, &input) {
                            preview.dirty = true;
                        }
                    }
                }
            }
            UiAction::SaveDraft => {
                let Some(preview) = self.preview.take() else {
                    return;
                };
                if let PreviewMode::Single { draft } = preview.mode {
                    let shape = draft.take();
                    let id = shape.id;
                    if self.store.update(shape) {
                        log::info!("Saved shape #{}", id);
                    }
                }
                // The preview closes with the save; the session (and its
                // GPU resources) was taken out of `self.preview` above.
            }
        }
    }

    fn open_preview(&mut self, mode: PreviewMode, scene: PreviewScene) {
        let mut renderer = MeshRenderer::new(&self.device, self.surface_config.format);
        renderer.rebuild(&self.device, &scene);
        log::debug!("Preview opened with {} mesh(es)", scene.len());
        self.preview = Some(PreviewSession {
            mode,
            scene,
            renderer,
            dirty: false,
        });
        self.window.request_redraw();
    }

    /// Re-stage the open preview after a store mutation.
    fn mark_preview_dirty(&mut self) {
        if let Some(preview) = &mut self.preview {
            preview.dirty = true;
        }
    }
}
