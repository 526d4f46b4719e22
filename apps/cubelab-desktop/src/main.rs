use anyhow::Result;
use clap::Parser;
use cubelab_assets::ShaderLibrary;
use cubelab_common::config::DEFAULT_CONFIG_PATH;
use cubelab_common::{CubelabConfig, PipelinePreset};
use cubelab_input::{Action, CursorCapture, InputState, Key, PointerTracker};
use cubelab_render::camera::FOV_RANGE;
use cubelab_render::frame::aspect_ratio;
use cubelab_render::scene::{AXIS_RANGE, SPIN_SPEED_RANGE};
use cubelab_render::{
    CursorPosition, FlyCamera, FramePlan, LightingDesc, RenderPipelineDesc, SceneParams,
};
use cubelab_render_wgpu::{GpuContext, WgpuRenderer};
use cubelab_tools::{CameraInspector, FrameTimer};
use egui::Context as EguiContext;
use glam::Vec2;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

#[derive(Parser)]
#[command(name = "cubelab-desktop", about = "Interactive textured-cube sandbox")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file (defaults are used if it does not exist)
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Pipeline preset to start with: textured, quad, lit or field
    #[arg(long)]
    pipeline: Option<PipelinePreset>,
}

/// Map a physical key to a sandbox key. Unbound keys map to `None`.
fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::KeyW => Some(Key::W),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyS => Some(Key::S),
        KeyCode::KeyD => Some(Key::D),
        KeyCode::Space => Some(Key::Space),
        KeyCode::ControlLeft => Some(Key::LeftControl),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::KeyM => Some(Key::M),
        _ => None,
    }
}

/// Grab and hide the cursor for mouse look, or release it for the overlay.
fn apply_cursor_capture(window: &Window, captured: bool) {
    if captured {
        let grabbed = window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
        if let Err(e) = grabbed {
            tracing::warn!("failed to grab cursor: {e}");
        }
    } else if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
        tracing::warn!("failed to release cursor: {e}");
    }
    window.set_cursor_visible(!captured);
}

/// Application state.
struct AppState {
    camera: FlyCamera,
    last_cursor: CursorPosition,
    pointer: PointerTracker,
    input: InputState,
    capture: CursorCapture,
    scene: SceneParams,
    desc: RenderPipelineDesc,
    lighting: LightingDesc,
    timer: FrameTimer,
    last_frame: Instant,
}

impl AppState {
    fn new(config: &CubelabConfig) -> Self {
        let last_cursor = CursorPosition::centered(config.window.width, config.window.height);
        Self {
            camera: FlyCamera::from_config(&config.camera),
            last_cursor,
            pointer: PointerTracker::new(Vec2::new(last_cursor.x, last_cursor.y)),
            input: InputState::default(),
            capture: CursorCapture::default(),
            scene: SceneParams::from_config(&config.scene),
            desc: RenderPipelineDesc::preset(config.scene.pipeline),
            lighting: LightingDesc::default(),
            timer: FrameTimer::default(),
            last_frame: Instant::now(),
        }
    }

    /// Anchor the virtual cursor at the middle of the framebuffer.
    fn center_cursor(&mut self, width: u32, height: u32) {
        self.last_cursor = CursorPosition::centered(width, height);
        self.pointer = PointerTracker::new(Vec2::new(self.last_cursor.x, self.last_cursor.y));
    }

    fn update(&mut self, dt: f32) {
        for direction in self.input.held_movements() {
            self.camera.keyboard_movement(direction, dt);
        }
        self.scene.advance(dt);
    }

    fn handle_key(&mut self, key: Key, pressed: bool, repeat: bool) -> Option<Action> {
        self.input.key_event(key, pressed, repeat)
    }

    /// Key event the debug overlay consumed. The overlay keeps presses, but
    /// releases still clear the held set so no movement key sticks down.
    fn overlay_key_event(&mut self, key: Key, pressed: bool) {
        if !pressed {
            self.input.key_event(key, false, false);
        }
    }

    /// Flip cursor capture. Re-capturing re-arms the first-mouse guard so the
    /// view does not jump to wherever the cursor wandered meanwhile.
    fn toggle_capture(&mut self) -> bool {
        let captured = self.capture.toggle();
        if captured {
            self.camera.reseed_mouse();
        }
        tracing::debug!(captured, "cursor capture toggled");
        captured
    }

    fn mouse_motion(&mut self, dx: f32, dy: f32) {
        if !self.capture.is_captured() {
            return;
        }
        let p = self.pointer.accumulate(dx, dy);
        self.camera.mouse_movement(&mut self.last_cursor, p.x, p.y);
    }

    fn set_preset(&mut self, preset: PipelinePreset) {
        tracing::info!("switching to pipeline '{preset}'");
        self.desc = RenderPipelineDesc::preset(preset);
    }

    fn plan(&self, width: u32, height: u32) -> FramePlan {
        self.desc.plan(
            &self.camera,
            &self.scene,
            &self.lighting,
            aspect_ratio(width, height),
        )
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        egui::Window::new("Debug Menu")
            .default_pos([10.0, 10.0])
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("Press M to toggle mouse");
                ui.separator();

                ui.checkbox(&mut self.scene.spin, "Continuous Spin");
                ui.add(
                    egui::Slider::new(&mut self.scene.spin_speed, SPIN_SPEED_RANGE)
                        .text("Spin Speed"),
                );
                ui.add(egui::Slider::new(&mut self.scene.axis.x, AXIS_RANGE).text("X Axis"));
                ui.add(egui::Slider::new(&mut self.scene.axis.y, AXIS_RANGE).text("Y Axis"));
                ui.add(egui::Slider::new(&mut self.scene.axis.z, AXIS_RANGE).text("Z Axis"));

                let mut fov = self.camera.fov;
                if ui.add(egui::Slider::new(&mut fov, FOV_RANGE).text("FOV")).changed() {
                    self.camera.set_fov(fov);
                }
                ui.separator();

                let summary = CameraInspector::summary(&self.camera);
                ui.label(format!("Yaw: {:.1}", summary.yaw));
                ui.label(format!("Pitch: {:.1}", summary.pitch));
                ui.label(format!(
                    "Position: ({:.2}, {:.2}, {:.2})",
                    summary.position[0], summary.position[1], summary.position[2]
                ));
                ui.label(format!(
                    "{:.3} ms/frame ({:.1} FPS)",
                    self.timer.average_ms(),
                    self.timer.fps()
                ));
                ui.separator();

                let mut preset = self.desc.preset;
                egui::ComboBox::from_label("Pipeline")
                    .selected_text(preset.name())
                    .show_ui(ui, |ui| {
                        for option in PipelinePreset::ALL {
                            ui.selectable_value(&mut preset, option, option.name());
                        }
                    });
                if preset != self.desc.preset {
                    self.set_preset(preset);
                }

                if self.desc.uses_lighting() {
                    let lamp = &mut self.lighting.point.position;
                    ui.label("Lamp Position:");
                    ui.horizontal(|ui| {
                        ui.add(egui::DragValue::new(&mut lamp.x).prefix("X: ").speed(0.05));
                        ui.add(egui::DragValue::new(&mut lamp.y).prefix("Y: ").speed(0.05));
                        ui.add(egui::DragValue::new(&mut lamp.z).prefix("Z: ").speed(0.05));
                    });
                }
            });
        self.scene.clamp_controls();
    }
}

struct GpuApp {
    state: AppState,
    config: CubelabConfig,
    shaders: ShaderLibrary,
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    renderer: Option<WgpuRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
    startup_error: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(config: CubelabConfig, shaders: ShaderLibrary) -> Self {
        Self {
            state: AppState::new(&config),
            config,
            shaders,
            window: None,
            gpu: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
            startup_error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_config = &self.config.window;
        let attrs = Window::default_attributes()
            .with_title(window_config.title.clone())
            .with_inner_size(PhysicalSize::new(window_config.width, window_config.height));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let size = window.inner_size();
        let gpu = GpuContext::new(window.clone(), size.width, size.height, window_config.vsync)?;
        let (width, height) = gpu.size();

        let renderer = WgpuRenderer::new(
            &gpu.device,
            &gpu.queue,
            gpu.format(),
            width,
            height,
            &self.shaders,
            &self.config.assets,
        );
        for (key, origin) in renderer.texture_origins() {
            tracing::debug!("texture {}: {:?}", key.name(), origin);
        }

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&gpu.device, gpu.format(), None, 1, false);

        self.state.center_cursor(width, height);
        apply_cursor_capture(&window, self.state.capture.is_captured());

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);

        tracing::info!("running pipeline '{}'", self.state.desc.preset);
        Ok(())
    }

    fn redraw(&mut self) {
        let now = Instant::now();
        let frame_time = now - self.state.last_frame;
        self.state.last_frame = now;
        self.state.timer.record(frame_time);
        self.state.update(frame_time.as_secs_f32().min(0.1));

        let Self {
            state,
            window,
            gpu,
            renderer,
            egui_ctx,
            egui_winit,
            egui_renderer,
            ..
        } = self;
        let (Some(window), Some(gpu), Some(renderer), Some(egui_winit), Some(egui_renderer)) =
            (window, gpu, renderer, egui_winit, egui_renderer)
        else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.reconfigure();
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let (width, height) = gpu.size();
        let plan = state.plan(width, height);
        renderer.render(&gpu.device, &gpu.queue, &view, &plan);

        let raw_input = egui_winit.take_egui_input(window);
        let full_output = egui_ctx.run(raw_input, |ctx| {
            state.draw_ui(ctx);
        });
        egui_winit.handle_platform_output(window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            egui_renderer.update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            egui_renderer.free_texture(id);
        }

        output.present();
        window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            tracing::error!("failed to initialise window: {e:#}");
            self.startup_error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(egui_winit), Some(window)) = (&mut self.egui_winit, &self.window) {
            // Pointer input belongs to mouse look while the cursor is captured.
            if !self.state.capture.is_captured() {
                let response = egui_winit.on_window_event(window, &event);
                if response.consumed {
                    if let WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                physical_key: PhysicalKey::Code(code),
                                state: key_state,
                                ..
                            },
                        ..
                    } = &event
                    {
                        if let Some(key) = map_key(*code) {
                            self.state
                                .overlay_key_event(key, *key_state == ElementState::Pressed);
                        }
                    }
                    return;
                }
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                    let (width, height) = gpu.size();
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(&gpu.device, width, height);
                    }
                }
            }
            WindowEvent::Focused(false) => {
                self.state.input.release_all();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: key_state,
                        repeat,
                        ..
                    },
                ..
            } => {
                let Some(key) = map_key(code) else {
                    return;
                };
                match self
                    .state
                    .handle_key(key, key_state == ElementState::Pressed, repeat)
                {
                    Some(Action::Quit) => {
                        tracing::info!("escape pressed, closing");
                        event_loop.exit();
                    }
                    Some(Action::ToggleCursorCapture) => {
                        let captured = self.state.toggle_capture();
                        if let Some(window) = &self.window {
                            apply_cursor_capture(window, captured);
                        }
                    }
                    _ => {}
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.state.mouse_motion(delta.0 as f32, delta.1 as f32);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("cubelab-desktop starting");

    let mut config = CubelabConfig::load(&cli.config)?;
    if let Some(preset) = cli.pipeline {
        config.scene.pipeline = preset;
    }
    let shaders = ShaderLibrary::load(config.assets.shader_dir());

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(config, shaders);
    event_loop.run_app(&mut app)?;

    if let Some(e) = app.startup_error.take() {
        return Err(e);
    }
    Ok(())
}
