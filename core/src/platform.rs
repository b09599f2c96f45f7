//! Pull/push platform: window, input, time, presentation and audio.
//!
//! The winit event loop is pumped with a zero timeout on every [`Platform::pull`],
//! so the application owns its main loop and decides when to block.

use std::sync::Arc;
use std::time::Duration;

use glam::{IVec2, UVec2};
use tachyon_shared::{AudioFormat, Image};
use tracing::{debug, error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use crate::audio::{AudioCallback, AudioDevice};
use crate::config::Config;
use crate::graphics::{QuadBatch, Presenter, TextureId};
use crate::input::{GamepadPoller, Input};
use crate::pacing::FramePlatform;
use crate::state::{FrameState, WindowState};
use crate::time::Clock;

/// Pumps during initialization before giving up on window creation.
const INIT_PUMP_LIMIT: usize = 100;
const INIT_PUMP_TIMEOUT: Duration = Duration::from_millis(10);

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create window: {0}")]
    CreateWindow(#[from] winit::error::OsError),
    #[error("window was not created during initialization")]
    NoWindow,
    #[error("event loop exited during initialization (code {0})")]
    Exited(i32),
    #[error("failed to initialize graphics: {0:#}")]
    Graphics(anyhow::Error),
}

/// Event handler fed by the pumped event loop.
struct Shell {
    title: String,
    size: winit::dpi::LogicalSize<u32>,
    window: Option<Arc<Window>>,
    init_error: Option<PlatformError>,
    state: FrameState,
    quit: bool,
}

impl ApplicationHandler for Shell {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(self.size);

        match event_loop.create_window(window_attributes) {
            Ok(window) => {
                let window = Arc::new(window);
                let size = window.inner_size();
                self.state.window.size = UVec2::new(size.width, size.height);
                if let Ok(position) = window.inner_position() {
                    self.state.window.position = IVec2::new(position.x, position.y);
                }
                self.window = Some(window);
            }
            Err(e) => {
                error!("Failed to create window: {}", e);
                self.init_error = Some(e.into());
                self.quit = true;
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let input = &mut self.state.input;
        match event {
            WindowEvent::CloseRequested => {
                debug!("Window close requested");
                self.quit = true;
            }
            WindowEvent::Resized(size) => {
                self.state.window.size = UVec2::new(size.width, size.height);
                self.state.window.resized = true;
            }
            WindowEvent::Moved(position) => {
                self.state.window.position = IVec2::new(position.x, position.y);
            }
            WindowEvent::Focused(false) => input.keys.release_all(),
            WindowEvent::CursorMoved { position, .. } => {
                input.mouse.on_cursor_moved(position.x, position.y);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                input.mouse.on_button(button, state == ElementState::Pressed);
            }
            WindowEvent::MouseWheel { delta, .. } => input.mouse.on_scroll(delta),
            WindowEvent::KeyboardInput { event, .. } => {
                let pressed = event.state.is_pressed();
                if let PhysicalKey::Code(code) = event.physical_key
                    && !event.repeat
                {
                    input.keys.on_key(code, pressed);
                }
                if pressed && let Some(text) = &event.text {
                    input.on_text(text);
                }
            }
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.state.input.mouse.on_motion(dx, dy);
        }
    }
}

/// Window, input, clock, presenter and optional audio device.
pub struct Platform {
    event_loop: EventLoop<()>,
    shell: Shell,
    window: Arc<Window>,
    presenter: Presenter,
    batch: QuadBatch,
    clock: Clock,
    gamepads: GamepadPoller,
    audio: Option<AudioDevice>,
    config: Config,
}

impl Platform {
    /// Opens the window and initializes graphics.
    pub fn new(config: Config) -> Result<Self, PlatformError> {
        let mut event_loop = EventLoop::new()?;

        let mut shell = Shell {
            title: config.video.title.clone(),
            size: winit::dpi::LogicalSize::new(config.video.width, config.video.height),
            window: None,
            init_error: None,
            state: FrameState {
                window: WindowState {
                    title: config.video.title.clone(),
                    ..Default::default()
                },
                input: Input::new(&config.input),
                time: Default::default(),
            },
            quit: false,
        };

        for _ in 0..INIT_PUMP_LIMIT {
            if let PumpStatus::Exit(code) =
                event_loop.pump_app_events(Some(INIT_PUMP_TIMEOUT), &mut shell)
            {
                return Err(PlatformError::Exited(code));
            }
            if let Some(e) = shell.init_error.take() {
                return Err(e);
            }
            if shell.window.is_some() {
                break;
            }
        }

        let window = shell.window.clone().ok_or(PlatformError::NoWindow)?;
        let presenter =
            Presenter::new(window.clone(), config.video.vsync).map_err(PlatformError::Graphics)?;
        let batch = QuadBatch::new(presenter.size());
        shell.state.window.size = presenter.size();

        info!(
            "Platform initialized: \"{}\" {}x{}",
            config.video.title,
            presenter.size().x,
            presenter.size().y
        );

        Ok(Self {
            event_loop,
            shell,
            window,
            presenter,
            batch,
            clock: Clock::start(),
            gamepads: GamepadPoller::new(),
            audio: None,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Quads for the frame being built. Cleared after every push.
    pub fn canvas(&mut self) -> &mut QuadBatch {
        &mut self.batch
    }

    /// Pulled state and the frame's batch, borrowed together.
    pub fn frame_parts(&mut self) -> (&FrameState, &mut QuadBatch) {
        (&self.shell.state, &mut self.batch)
    }

    pub fn upload_image(&mut self, image: &Image) -> TextureId {
        self.presenter.upload_image(image)
    }

    /// Starts the audio device with `callback`.
    ///
    /// Returns the device format, or `None` with a warning if audio is
    /// disabled or no device could be opened.
    pub fn start_audio<C: AudioCallback>(&mut self, callback: C) -> Option<AudioFormat> {
        if !self.config.audio.enabled {
            info!("Audio disabled by configuration");
            return None;
        }
        self.shutdown_audio();
        match AudioDevice::start(&self.config.audio, callback) {
            Ok(device) => {
                let format = device.format();
                self.audio = Some(device);
                Some(format)
            }
            Err(e) => {
                warn!("Audio disabled: {}", e);
                None
            }
        }
    }

    /// Format the audio device would open with, without starting it.
    pub fn query_audio_format(&self) -> Option<AudioFormat> {
        if !self.config.audio.enabled {
            return None;
        }
        match AudioDevice::query_format(&self.config.audio) {
            Ok(format) => Some(format),
            Err(e) => {
                warn!("Audio device unavailable: {}", e);
                None
            }
        }
    }

    pub fn audio_format(&self) -> Option<AudioFormat> {
        self.audio.as_ref().map(AudioDevice::format)
    }

    /// Silences and stops the audio device, if any.
    pub fn shutdown_audio(&mut self) {
        if let Some(mut device) = self.audio.take()
            && let Err(e) = device.shutdown()
        {
            warn!("Audio shutdown failed: {}", e);
        }
    }

    fn pump(&mut self) {
        let input = &mut self.shell.state.input;
        input.begin_pull();
        self.shell.state.window.resized = false;

        if let PumpStatus::Exit(code) = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.shell)
        {
            debug!("Event loop exited with code {}", code);
            self.shell.quit = true;
        }

        let reading = self.gamepads.poll();
        self.shell.state.input.end_pull(reading.as_ref());
        self.clock.pull(&mut self.shell.state.time);

        if self.shell.state.window.resized {
            let size = self.shell.state.window.size;
            self.presenter.resize(size.x, size.y);
            if self.batch.is_empty() {
                self.batch.begin(size, self.batch.clear_color());
            }
        }
    }
}

impl FramePlatform for Platform {
    fn pull(&mut self) -> bool {
        if self.shell.quit {
            return false;
        }
        self.pump();
        !self.shell.quit
    }

    fn push(&mut self) {
        self.presenter.present(&self.batch);
        let size = self.shell.state.window.size;
        self.batch.begin(size, self.batch.clear_color());
    }

    fn state(&self) -> &FrameState {
        &self.shell.state
    }

    fn request_quit(&mut self) {
        self.shell.quit = true;
    }
}

impl Drop for Platform {
    fn drop(&mut self) {
        self.shutdown_audio();
    }
}
