use anyhow::Result;
use clap::Parser;
use egui::Context as EguiContext;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorIcon, Window, WindowId};

use glaze_animation::{Animator, FrameError, FrameTimer};
use glaze_assets::{LoadHandle, TemplateMesh};
use glaze_common::{Color, Extent, compute_viewport};
use glaze_input::{CursorMode, Effect, InputEvent, KeyCommand, dispatch};
use glaze_render_wgpu::{GpuRenderer, OrbitCamera};
use glaze_scene::{GRID_SPACING, Material, MaterialHandle, MaterialStore, Scene, SceneObject};

#[derive(Parser)]
#[command(name = "glaze-desktop", about = "Decorative bowl-grid scene viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Template model to load (binary glTF)
    #[arg(long, default_value = "assets/bowl.glb")]
    model: PathBuf,

    /// Seed for the backdrop color; derived from the clock when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Use a fixed square viewport instead of filling the window
    #[arg(long)]
    fixed: bool,

    /// Fraction of the window the viewport covers in fill mode
    #[arg(long, default_value = "1.0")]
    max_cover: f32,
}

/// Application state that exists independently of the GPU.
struct AppState {
    scene: Scene,
    materials: MaterialStore,
    bowl_material: MaterialHandle,
    animator: Animator,
    camera: OrbitCamera,
    timer: FrameTimer,
    show_stats: bool,
    fill_screen: bool,
    max_cover: f32,
    load: Option<LoadHandle>,
    pointer_over_surface: bool,
    last_frame: Instant,
}

impl AppState {
    fn new(seed: u64, fill_screen: bool, max_cover: f32, load: Option<LoadHandle>) -> Self {
        let backdrop = Color::muted_from_seed(seed);
        let mut materials = MaterialStore::new();
        let bowl_material = materials.add(Material {
            name: "bowl".into(),
            color: backdrop,
        });

        Self {
            scene: Scene::new(backdrop),
            materials,
            bowl_material,
            animator: Animator::new(),
            camera: OrbitCamera::default(),
            timer: FrameTimer::new(120),
            show_stats: false,
            fill_screen,
            max_cover,
            load,
            pointer_over_surface: false,
            last_frame: Instant::now(),
        }
    }

    /// Check the background load once per frame. When the template arrives
    /// the grid is populated; the returned mesh still needs a GPU upload.
    /// A failed load leaves the grid empty for the rest of the session.
    fn poll_load(&mut self) -> Option<TemplateMesh> {
        let handle = self.load.as_mut()?;
        let result = handle.poll()?;
        self.load = None;
        match result {
            Ok((id, mesh)) => {
                let template = SceneObject::new(self.bowl_material);
                self.scene
                    .populate_grid(&template, GRID_SPACING, self.bowl_material);
                tracing::info!(
                    id = id.0,
                    vertices = mesh.vertex_count(),
                    objects = self.scene.objects.len(),
                    "template ready, grid populated"
                );
                Some(mesh)
            }
            Err(error) => {
                tracing::error!(%error, "template load failed, grid stays empty");
                None
            }
        }
    }

    /// Run one input event through the dispatcher.
    fn dispatch(&mut self, event: InputEvent) -> Vec<Effect> {
        dispatch(&mut self.animator.flags, event)
    }
}

struct GpuApp {
    state: AppState,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<GpuRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl GpuApp {
    fn new(state: AppState) -> Self {
        Self {
            state,
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }

    /// Resize + reframe path shared by window resize and scale changes:
    /// reconfigure the surface, then recompute the viewport policy and frame
    /// the camera for its aspect ratio.
    fn reproject(&mut self, size: PhysicalSize<u32>) {
        if let (Some(surface), Some(device), Some(config)) =
            (&self.surface, &self.device, &mut self.config)
        {
            config.width = size.width.max(1);
            config.height = size.height.max(1);
            surface.configure(device, config);
            if let Some(renderer) = &mut self.renderer {
                renderer.resize(device, config.width, config.height);
            }
        }

        let viewport = compute_viewport(
            Extent::new(size.width, size.height),
            self.state.fill_screen,
            self.state.max_cover,
        );
        self.state.camera.frame_for_aspect(viewport.aspect);
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            aspect = viewport.aspect,
            "reprojected"
        );
    }

    fn apply_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Reproject => {
                    if let Some(size) = self.window.as_ref().map(|w| w.inner_size()) {
                        self.reproject(size);
                    }
                }
                Effect::Resume => {
                    if let Some(window) = &self.window {
                        window.request_redraw();
                    }
                }
                Effect::SetCursor(mode) => {
                    if let Some(window) = &self.window {
                        window.set_cursor(match mode {
                            CursorMode::Grab => CursorIcon::Grab,
                            CursorMode::Grabbing => CursorIcon::Grabbing,
                        });
                    }
                }
                Effect::ToggleStats => {
                    self.state.show_stats = !self.state.show_stats;
                }
            }
        }
    }

    fn frame(&mut self) {
        let now = Instant::now();
        let dt = now - self.state.last_frame;
        self.state.last_frame = now;
        self.state.timer.record(dt);

        // One-shot template arrival: populate the grid and upload the mesh.
        if let Some(mesh) = self.state.poll_load() {
            if let (Some(device), Some(renderer)) = (&self.device, &mut self.renderer) {
                renderer.upload_template(device, &mesh);
            }
        }

        let (
            Some(window),
            Some(surface),
            Some(device),
            Some(queue),
            Some(config),
            Some(renderer),
            Some(egui_winit),
            Some(egui_renderer),
        ) = (
            self.window.as_ref(),
            self.surface.as_ref(),
            self.device.as_ref(),
            self.queue.as_ref(),
            self.config.as_ref(),
            self.renderer.as_ref(),
            self.egui_winit.as_mut(),
            self.egui_renderer.as_mut(),
        )
        else {
            return;
        };

        let camera = &self.state.camera;
        let egui_ctx = &self.egui_ctx;
        let show_stats = self.state.show_stats;
        let fps = self.state.timer.fps();
        let frame_ms = self.state.timer.average().as_secs_f32() * 1000.0;
        let animating = self.state.animator.flags.objects_animating;

        let status = self.state.animator.step(
            &mut self.state.scene,
            &mut self.state.materials,
            self.state.bowl_material,
            |scene, materials| {
                let output = match surface.get_current_texture() {
                    Ok(output) => output,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        surface.configure(device, config);
                        return Ok(());
                    }
                    Err(error) => return Err(FrameError(error.to_string())),
                };

                let view = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());

                renderer.render(device, queue, &view, camera, scene, materials);

                if show_stats {
                    let raw_input = egui_winit.take_egui_input(window);
                    let full_output = egui_ctx.run(raw_input, |ctx| {
                        draw_stats(ctx, fps, frame_ms, scene.objects.len(), animating);
                    });
                    egui_winit.handle_platform_output(window, full_output.platform_output);

                    let paint_jobs = egui_ctx
                        .tessellate(full_output.shapes, full_output.pixels_per_point);
                    let screen_descriptor = egui_wgpu::ScreenDescriptor {
                        size_in_pixels: [config.width, config.height],
                        pixels_per_point: full_output.pixels_per_point,
                    };

                    for (id, image_delta) in &full_output.textures_delta.set {
                        egui_renderer.update_texture(device, queue, *id, image_delta);
                    }
                    let mut encoder =
                        device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("stats_encoder"),
                        });
                    egui_renderer.update_buffers(
                        device,
                        queue,
                        &mut encoder,
                        &paint_jobs,
                        &screen_descriptor,
                    );
                    {
                        let mut pass = encoder
                            .begin_render_pass(&wgpu::RenderPassDescriptor {
                                label: Some("stats_pass"),
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
                    queue.submit(std::iter::once(encoder.finish()));
                    for id in &full_output.textures_delta.free {
                        egui_renderer.free_texture(id);
                    }
                }

                output.present();
                Ok(())
            },
        );

        // Damping integrates once per completed frame; the loop only keeps
        // scheduling itself while the step succeeded.
        if status.continues() {
            self.state.camera.update();
            window.request_redraw();
        }
    }
}

fn draw_stats(ctx: &EguiContext, fps: f32, frame_ms: f32, objects: usize, animating: bool) {
    egui::Window::new("stats")
        .title_bar(false)
        .resizable(false)
        .anchor(egui::Align2::LEFT_TOP, [8.0, 8.0])
        .show(ctx, |ui| {
            ui.label(format!("{fps:.0} fps ({frame_ms:.2} ms)"));
            ui.label(format!("objects: {objects}"));
            ui.label(if animating { "animating" } else { "paused" });
        });
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        // Created hidden; shown once the GPU is ready so the first visible
        // frame is already the scene.
        let attrs = Window::default_attributes()
            .with_title("glaze")
            .with_inner_size(PhysicalSize::new(1280u32, 720))
            .with_visible(false);
        let window = Arc::new(event_loop.create_window(attrs).expect("create window"));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("create surface");

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .expect("find adapter");

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("glaze_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .expect("create device");

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let viewport = compute_viewport(
            Extent::new(size.width, size.height),
            self.state.fill_screen,
            self.state.max_cover,
        );
        self.state.camera.frame_for_aspect(viewport.aspect);

        let renderer = GpuRenderer::new(&device, surface_format, size.width, size.height);

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        window.set_cursor(CursorIcon::Grab);
        window.set_visible(true);

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);

        tracing::info!(
            backend = adapter.get_info().backend.to_str(),
            "GPU initialized"
        );
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(egui_winit), Some(window)) = (&mut self.egui_winit, &self.window) {
            let response = egui_winit.on_window_event(window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                let effects = self.state.dispatch(InputEvent::Resized);
                // The live window size can lag this event on some platforms;
                // reproject from the reported size instead.
                if effects.contains(&Effect::Reproject) {
                    self.reproject(new_size);
                }
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                let effects = self.state.dispatch(InputEvent::ScaleFactorChanged);
                self.apply_effects(effects);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match key {
                KeyCode::Space => {
                    let effects = self.state.dispatch(InputEvent::Key(KeyCommand::ToggleObjects));
                    self.apply_effects(effects);
                }
                KeyCode::Digit0 => {
                    let effects = self.state.dispatch(InputEvent::Key(KeyCommand::ToggleStats));
                    self.apply_effects(effects);
                }
                KeyCode::Escape => {
                    event_loop.exit();
                }
                _ => {}
            },
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: button_state,
                ..
            } => {
                let event = match button_state {
                    ElementState::Pressed => InputEvent::PointerDown,
                    ElementState::Released => InputEvent::PointerReleased {
                        over_surface: self.state.pointer_over_surface,
                    },
                };
                let effects = self.state.dispatch(event);
                self.apply_effects(effects);
            }
            WindowEvent::CursorMoved { .. } => {
                self.state.pointer_over_surface = true;
                let effects = self
                    .state
                    .dispatch(InputEvent::PointerMoved { over_surface: true });
                self.apply_effects(effects);
            }
            WindowEvent::CursorLeft { .. } => {
                self.state.pointer_over_surface = false;
                let effects = self.state.dispatch(InputEvent::PointerLeft);
                self.apply_effects(effects);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let amount = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32 * 0.05,
                };
                self.state.camera.zoom(amount);
            }
            WindowEvent::RedrawRequested => {
                self.frame();
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
            if self.state.animator.flags.pointer_down {
                self.state.camera.rotate(delta.0 as f32, delta.1 as f32);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        // Paused loops stop scheduling; a resume effect re-arms via an
        // explicit request_redraw.
        if self.state.animator.is_running() {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let seed = cli.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });

    tracing::info!(model = %cli.model.display(), seed, "glaze-desktop starting");

    let load = Some(LoadHandle::spawn(cli.model));
    let state = AppState::new(seed, !cli.fixed, cli.max_cover, load);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(state);
    event_loop.run_app(&mut app)?;

    Ok(())
}
