//=========================================================================
// Platform Subsystem
//
// The OS window, owned by the main thread. Talks to the engine thread
// over three crossbeam channels and nothing else.
//
// ```text
//  Main thread (winit)                     Engine thread
//  ──────────────────                      ─────────────
//  window events → InputTranslator
//               → InputBuffer ── PlatformEvent ──► ChannelInput::pump
//
//  about_to_wait ◄──────────── DisplayCommand ──── DisplayHandle
//  Presenter     ◄──────────── Frame ───────────── WindowSurface::present
// ```
//
// Loop cadence: the event loop wakes at least every `POLL_INTERVAL`,
// forwards buffered input as one batch, applies display commands and
// asks for a redraw when a new frame arrived.
//
// Shutdown:
//   window closed → WindowClosed → engine quits, tears down, sends Close
//   engine exits  → Close (or disconnected display channel) → loop exits
//
//=========================================================================

//=== Submodules ==========================================================

mod channel_input;
mod frame;
mod input_buffer;
mod input_translator;
mod presenter;

//=== External Crates =====================================================

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use log::*;
use thiserror::Error;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    error::EventLoopError,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Fullscreen, Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::display::DisplayCommand;
use crate::core::input::InputEvent;
use crate::core::render::Size;
use input_buffer::InputBuffer;
use input_translator::InputTranslator;
use presenter::Presenter;

pub(crate) use channel_input::ChannelInput;
pub(crate) use frame::{Frame, WindowSurface};

/// Longest the event loop sleeps without new window events.
const POLL_INTERVAL: Duration = Duration::from_millis(4);

//=== PlatformEvent =======================================================

/// Messages from the window to the engine thread.
#[derive(Debug, Clone)]
pub(crate) enum PlatformEvent {
    /// Input gathered since the previous batch. `discrete` keeps arrival
    /// order; `continuous` holds the latest pointer position and size.
    Inputs {
        discrete: Vec<InputEvent>,
        continuous: Vec<InputEvent>,
    },

    WindowClosed,
}

//=== PlatformError =======================================================

#[derive(Debug, Error)]
pub(crate) enum PlatformError {
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(#[source] EventLoopError),

    #[error("event loop error: {0}")]
    EventLoopExecution(#[source] EventLoopError),
}

//=== PlatformConfig ======================================================

#[derive(Debug, Clone)]
pub(crate) struct PlatformConfig {
    pub title: String,
    pub size: Size,
}

//=== Channels ============================================================

/// Platform ends of the engine channels.
pub(crate) struct PlatformChannels {
    pub events: Sender<PlatformEvent>,
    pub display: Receiver<DisplayCommand>,
    pub frames: Receiver<Frame>,
}

//=== Platform ============================================================

/// Window owner. Not `Send`; must run on the main thread.
pub(crate) struct Platform {
    config: PlatformConfig,
    channels: PlatformChannels,

    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
    latest_frame: Option<Frame>,

    translator: InputTranslator,
    buffer: InputBuffer,
}

impl Platform {
    pub(crate) fn new(channels: PlatformChannels, config: PlatformConfig) -> Self {
        Self {
            config,
            channels,
            window: None,
            presenter: None,
            latest_frame: None,
            translator: InputTranslator::new(),
            buffer: InputBuffer::new(),
        }
    }

    /// Runs the winit event loop until the window closes or the engine
    /// asks to exit. Winit panics when this runs off the main thread on
    /// macOS.
    pub(crate) fn run(mut self) -> Result<(), PlatformError> {
        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;
        debug!(target: "platform", "Event loop started");
        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)
    }

    //--- Engine Traffic ---------------------------------------------------

    fn send_input(&mut self) {
        let Some((discrete, continuous)) = self.buffer.drain() else {
            return;
        };
        trace!(
            target: "platform::input",
            "Sending {} discrete + {} continuous events",
            discrete.len(),
            continuous.len()
        );
        if self.channels.events.send(PlatformEvent::Inputs { discrete, continuous }).is_err() {
            warn!(target: "platform::input", "Engine gone, input dropped");
        }
    }

    /// Applies pending display commands. `false` once the window should close.
    fn apply_display_commands(&mut self) -> bool {
        loop {
            match self.channels.display.try_recv() {
                Ok(DisplayCommand::SetTitle(title)) => {
                    if let Some(window) = &self.window {
                        window.set_title(&title);
                    }
                    self.config.title = title;
                }
                Ok(DisplayCommand::SetFullscreen(on)) => {
                    debug!(target: "platform", "Fullscreen: {}", on);
                    if let Some(window) = &self.window {
                        window.set_fullscreen(on.then_some(Fullscreen::Borderless(None)));
                    }
                }
                Ok(DisplayCommand::Close) => {
                    info!(target: "platform", "Engine closed the window");
                    return false;
                }
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => {
                    info!(target: "platform", "Engine thread finished");
                    return false;
                }
            }
        }
    }

    /// Keeps only the newest pending frame. Returns whether one arrived.
    fn receive_frames(&mut self) -> bool {
        match self.channels.frames.try_iter().last() {
            Some(frame) => {
                self.latest_frame = Some(frame);
                true
            }
            None => false,
        }
    }

    fn draw(&mut self) {
        let (Some(presenter), Some(frame)) = (self.presenter.as_mut(), self.latest_frame.as_ref())
        else {
            return;
        };
        if let Err(err) = presenter.show(frame) {
            warn!(target: "platform", "Presenting frame failed: {}", err);
        }
    }

    fn open_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), String> {
        let attrs = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.size.width, self.config.size.height));
        let window = Arc::new(event_loop.create_window(attrs).map_err(|e| e.to_string())?);

        info!(
            target: "platform",
            "Window created: {}x{} @ {}x DPI",
            window.inner_size().width,
            window.inner_size().height,
            window.scale_factor()
        );

        match Presenter::new(Arc::clone(&window)) {
            Ok(presenter) => self.presenter = Some(presenter),
            Err(err) => warn!(target: "platform", "No presentation surface, window stays blank: {}", err),
        }
        self.window = Some(window);
        Ok(())
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.open_window(event_loop) {
            error!(target: "platform", "Window creation failed: {}", err);
            let _ = self.channels.events.send(PlatformEvent::WindowClosed);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.send_input();
                let _ = self.channels.events.send(PlatformEvent::WindowClosed);
            }
            WindowEvent::Resized(size) => {
                self.buffer.push_continuous(self.translator.resize(size));
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.translator.set_modifiers(modifiers.state());
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.buffer.push_continuous(self.translator.cursor(position));
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(input) = self.translator.key(&event) {
                    self.buffer.push_discrete(input);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.buffer.push_discrete(self.translator.button(button, state));
            }
            WindowEvent::RedrawRequested => self.draw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.send_input();

        if !self.apply_display_commands() {
            event_loop.exit();
            return;
        }

        if self.receive_frames() {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
        event_loop.set_control_flow(ControlFlow::wait_duration(POLL_INTERVAL));
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
