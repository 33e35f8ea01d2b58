//! Demo window: winit event loop around a [`FrameDriver`].
//!
//! The window, GPU setup and event pumping live here. Editor updates come
//! from the scripted session in [`crate::demo`], which runs as a tokio task
//! and wakes the loop through an [`EventLoopProxy`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use neogrid_config::Config;
use neogrid_fonts::{FontRasterizer, GlyphRasterizer, platform_dpi};
use neogrid_render::gpu::WgpuBackend;
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::window::{Window, WindowId};

use crate::cli::RuntimeOptions;
use crate::demo;
use crate::event_queue::EventQueue;
use crate::frame_driver::FrameDriver;

/// Seconds between scripted scroll steps.
const SCRIPT_INTERVAL: Duration = Duration::from_secs(1);

/// Wake-ups sent to the event loop from other threads.
#[derive(Debug, Clone, Copy)]
pub enum UserEvent {
    /// Sealed editor batches are waiting in the queue.
    EditorUpdate,
}

type Driver = FrameDriver<WgpuBackend, FontRasterizer>;

/// Main application state
pub struct App {
    config: Config,
    options: RuntimeOptions,
    runtime: Arc<Runtime>,
}

impl App {
    pub fn new(runtime: Arc<Runtime>, options: RuntimeOptions) -> Result<Self> {
        let mut config = match &options.config_path {
            Some(path) => Config::load_from(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => Config::load()?,
        };
        options.apply_to(&mut config);
        config.validate().context("Invalid configuration")?;
        crate::debug::apply_config_level(config.log_level);
        Ok(Self {
            config,
            options,
            runtime,
        })
    }

    /// Effective configuration after command-line overrides.
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn run(self) -> Result<()> {
        let event_loop = EventLoop::<UserEvent>::with_user_event().build()?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut state = AppState::new(self.config, self.options, self.runtime, event_loop.create_proxy());
        event_loop.run_app(&mut state)?;

        if let Some(task) = state.editor_task.take() {
            task.abort();
        }
        match state.fatal.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

struct AppState {
    config: Config,
    options: RuntimeOptions,
    runtime: Arc<Runtime>,
    proxy: EventLoopProxy<UserEvent>,
    queue: Arc<EventQueue>,

    window: Option<Arc<Window>>,
    driver: Option<Driver>,
    editor_task: Option<JoinHandle<()>>,
    started: Instant,
    /// Error that ended the event loop
    fatal: Option<anyhow::Error>,
}

impl AppState {
    fn new(
        config: Config,
        options: RuntimeOptions,
        runtime: Arc<Runtime>,
        proxy: EventLoopProxy<UserEvent>,
    ) -> Self {
        Self {
            config,
            options,
            runtime,
            proxy,
            queue: Arc::new(EventQueue::new()),
            window: None,
            driver: None,
            editor_task: None,
            started: Instant::now(),
            fatal: None,
        }
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attributes = Window::default_attributes().with_title(self.config.window_title.clone());
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("Failed to create window")?,
        );

        let dpi = self
            .config
            .dpi
            .unwrap_or_else(|| platform_dpi() * window.scale_factor() as f32);
        let rasterizer = FontRasterizer::new(
            &self.config.font_family,
            self.config.font_size,
            dpi,
            self.config.box_drawing,
        )
        .context("No usable font")?;

        let cell = rasterizer.cell_size();
        let _ = window.request_inner_size(PhysicalSize::new(
            cell.width * self.config.initial_cols as u32,
            cell.height * self.config.initial_rows as u32,
        ));

        let backend = self
            .runtime
            .block_on(WgpuBackend::new(Arc::clone(&window), self.config.vsync))
            .context("Failed to initialize GPU")?;
        let mut driver = FrameDriver::new(backend, rasterizer, Arc::clone(&self.queue), &self.config);

        let size = window.inner_size();
        let (rows, cols) = driver.resize_viewport(size.width, size.height);
        self.window = Some(window);
        self.driver = Some(driver);
        self.start_editor(rows, cols);
        Ok(())
    }

    /// (Re)start the scripted editor session for a `rows` x `cols` grid.
    fn start_editor(&mut self, rows: usize, cols: usize) {
        if let Some(task) = self.editor_task.take() {
            task.abort();
        }
        log::info!("Starting scripted editor session at {}x{}", rows, cols);
        let proxy = self.proxy.clone();
        let wake = move || {
            let _ = proxy.send_event(UserEvent::EditorUpdate);
        };
        self.editor_task = Some(self.runtime.spawn(demo::run_script(
            Arc::clone(&self.queue),
            rows,
            cols,
            SCRIPT_INTERVAL,
            wake,
        )));
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("Fatal: {:#}", error);
        self.fatal = Some(error);
        event_loop.exit();
    }

    fn check_exit_after(&self, event_loop: &ActiveEventLoop) {
        if let Some(seconds) = self.options.exit_after {
            let deadline = self.started + Duration::from_secs_f64(seconds.max(0.0));
            if Instant::now() >= deadline {
                log::info!("Exiting after {}s as requested", seconds);
                event_loop.exit();
            } else {
                event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
            }
        }
    }
}

impl ApplicationHandler<UserEvent> for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.initialize(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: UserEvent) {
        match event {
            UserEvent::EditorUpdate => self.request_redraw(),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                let Some(driver) = self.driver.as_mut() else {
                    return;
                };
                let (rows, cols) = driver.resize_viewport(size.width, size.height);
                let grid = driver.grid();
                if (rows, cols) != (grid.rows(), grid.cols()) {
                    self.start_editor(rows, cols);
                }
                self.request_redraw();
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if self.config.dpi.is_some() {
                    return;
                }
                if let Some(driver) = self.driver.as_mut() {
                    let dpi = platform_dpi() * scale_factor as f32;
                    if let Err(e) = driver.set_dpi(dpi) {
                        log::error!("Failed to apply DPI {}: {}", dpi, e);
                    }
                    self.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => {
                let Some(driver) = self.driver.as_mut() else {
                    return;
                };
                match driver.render_frame() {
                    Ok(true) => {
                        let stats = driver.stats();
                        log::debug!(
                            "Frame {}: {} cells redrawn, atlas generation {} ({:.0}% full)",
                            stats.frames_presented,
                            stats.cells_redrawn,
                            stats.atlas_generation,
                            stats.atlas_fill * 100.0
                        );
                    }
                    Ok(false) => {}
                    Err(e) => self.fail(event_loop, anyhow::Error::new(e).context("GPU render failed")),
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.queue.has_pending() {
            self.request_redraw();
        }
        self.check_exit_after(event_loop);
    }
}
