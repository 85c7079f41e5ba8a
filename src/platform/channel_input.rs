//=========================================================================
// Channel Input
//=========================================================================
//
// Engine-side end of the platform channel.
//
//   Platform (main thread) ── PlatformEvent ──► ChannelInput::pump()
//
// A closed window, or a platform that went away, both surface as a
// single `InputEvent::Quit`.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::{debug, trace};

//=== Internal Dependencies ===============================================

use crate::core::input::{InputEvent, InputSource};

use super::PlatformEvent;

//=== ChannelInput ========================================================

/// [`InputSource`] fed by the winit platform thread.
pub(crate) struct ChannelInput {
    receiver: Receiver<PlatformEvent>,
    closed: bool,
}

impl ChannelInput {
    pub(crate) fn new(receiver: Receiver<PlatformEvent>) -> Self {
        Self {
            receiver,
            closed: false,
        }
    }
}

impl InputSource for ChannelInput {
    fn pump(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();
        if self.closed {
            return events;
        }

        loop {
            match self.receiver.try_recv() {
                Ok(PlatformEvent::Inputs { discrete, continuous }) => {
                    events.extend(discrete);
                    events.extend(continuous);
                }
                Ok(PlatformEvent::WindowClosed) => {
                    debug!(target: "platform", "Window closed");
                    self.closed = true;
                    events.push(InputEvent::Quit);
                    break;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    debug!(target: "platform", "Platform channel disconnected");
                    self.closed = true;
                    events.push(InputEvent::Quit);
                    break;
                }
            }
        }

        trace!(target: "platform::input", "Pumped {} event(s)", events.len());
        events
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::KeyCode;
    use crossbeam_channel::unbounded;

    #[test]
    fn merges_all_pending_batches() {
        let (tx, rx) = unbounded();
        let mut input = ChannelInput::new(rx);

        tx.send(PlatformEvent::Inputs {
            discrete: vec![InputEvent::key_down(KeyCode::KeyA)],
            continuous: vec![InputEvent::MouseMoved { x: 1.0, y: 2.0 }],
        })
        .unwrap();
        tx.send(PlatformEvent::Inputs {
            discrete: vec![InputEvent::key_down(KeyCode::KeyB)],
            continuous: vec![],
        })
        .unwrap();

        let events = input.pump();

        assert_eq!(events.len(), 3);
        assert_eq!(events[0], InputEvent::key_down(KeyCode::KeyA));
        assert_eq!(events[2], InputEvent::key_down(KeyCode::KeyB));
        assert!(input.pump().is_empty());
    }

    #[test]
    fn window_close_becomes_single_quit() {
        let (tx, rx) = unbounded();
        let mut input = ChannelInput::new(rx);
        tx.send(PlatformEvent::WindowClosed).unwrap();

        assert_eq!(input.pump(), vec![InputEvent::Quit]);
        drop(tx);
        assert!(input.pump().is_empty());
    }

    #[test]
    fn disconnect_becomes_quit() {
        let (tx, rx) = unbounded::<PlatformEvent>();
        let mut input = ChannelInput::new(rx);
        drop(tx);

        assert_eq!(input.pump(), vec![InputEvent::Quit]);
    }
}
