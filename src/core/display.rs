//=========================================================================
// Display Handle
//=========================================================================
//
// Engine-side handle for window management requests.
//
// The window itself lives on the platform thread; the engine only sends
// commands. Without a platform (headless runs, tests) the handle is
// detached and commands are recorded locally.
//
//   Engine thread ── DisplayCommand ──► Platform (winit)
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::Sender;
use log::{debug, warn};

//=== DisplayCommand ======================================================

/// Requests sent from the engine to the platform layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DisplayCommand {
    SetTitle(String),
    SetFullscreen(bool),
    Close,
}

//=== DisplayHandle =======================================================

/// Window controls available to the engine and scenes.
#[derive(Debug, Default)]
pub struct DisplayHandle {
    sender: Option<Sender<DisplayCommand>>,
    title: String,
    fullscreen: bool,
}

impl DisplayHandle {
    /// Handle with no window attached.
    pub fn detached() -> Self {
        Self::default()
    }

    pub(crate) fn attached(sender: Sender<DisplayCommand>, fullscreen: bool) -> Self {
        Self {
            sender: Some(sender),
            title: String::new(),
            fullscreen,
        }
    }

    /// Sets the window caption.
    pub fn set_title(&mut self, title: &str) {
        if self.title == title {
            return;
        }
        self.title = title.to_owned();
        self.send(DisplayCommand::SetTitle(self.title.clone()));
    }

    /// Flips between windowed and borderless fullscreen.
    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
        debug!(target: "display", "Fullscreen toggled (now {})", self.fullscreen);
        self.send(DisplayCommand::SetFullscreen(self.fullscreen));
    }

    /// Asks the platform to close the window.
    pub(crate) fn close(&mut self) {
        self.send(DisplayCommand::Close);
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn send(&self, command: DisplayCommand) {
        if let Some(sender) = &self.sender {
            if sender.send(command).is_err() {
                warn!(target: "display", "Platform disconnected, dropping display command");
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn detached_handle_tracks_state() {
        let mut display = DisplayHandle::detached();
        display.set_title("Menu");
        display.toggle_fullscreen();

        assert_eq!(display.title(), "Menu");
        assert!(display.is_fullscreen());
    }

    #[test]
    fn attached_handle_forwards_commands() {
        let (tx, rx) = unbounded();
        let mut display = DisplayHandle::attached(tx, false);

        display.set_title("Splash");
        display.set_title("Splash");
        display.toggle_fullscreen();
        display.close();

        let received: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            received,
            vec![
                DisplayCommand::SetTitle("Splash".into()),
                DisplayCommand::SetFullscreen(true),
                DisplayCommand::Close,
            ]
        );
    }

    #[test]
    fn disconnected_platform_is_not_fatal() {
        let (tx, rx) = unbounded();
        drop(rx);
        let mut display = DisplayHandle::attached(tx, false);
        display.toggle_fullscreen();
    }
}
