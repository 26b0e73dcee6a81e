//
// Copyright 2022-Present (c) Raja Lehtihet & Wael El Oraiby
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice,
// this list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
// this list of conditions and the following disclaimer in the documentation
// and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its contributors
// may be used to endorse or promote products derived from this software without
// specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE
// ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE
// LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR
// CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF
// SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS
// INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN
// CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE)
// ARISING IN ANY WAY OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE
// POSSIBILITY OF SUCH DAMAGE.
//
use super::*;

use bitflags::bitflags;

bitflags! {
    #[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
    /// Mouse buttons currently held, as tracked by the frame driver.
    pub struct MouseButtons : u32 {
        /// Left mouse button.
        const LEFT = 1;
        /// Middle mouse button.
        const MIDDLE = 2;
        /// Right mouse button.
        const RIGHT = 4;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Keys the frame driver reports, independent of the windowing layer's own
/// key numbering.
pub enum Key {
    /// Escape; also requests a close by default.
    Escape,
    /// F1; also triggers a screenshot by default.
    F1,
    /// Return / enter.
    Enter,
    /// Backspace.
    Backspace,
    /// A printable character key.
    Char(char),
    /// Any key without a dedicated variant.
    Other,
}

/// Handler the frame driver dispatches input to, one strongly typed method
/// per event kind. Events arrive synchronously during polling, on the frame
/// thread, before the next frame's draw list is built.
pub trait InputHandler {
    /// A key changed state.
    fn key(&mut self, key: Key, pressed: bool) {
        let _ = (key, pressed);
    }

    /// The cursor moved, in window pixel coordinates.
    fn cursor_pos(&mut self, x: f32, y: f32) {
        let _ = (x, y);
    }

    /// A mouse button changed state at the given cursor position.
    fn mouse_button(&mut self, button: MouseButtons, pressed: bool, x: f32, y: f32) {
        let _ = (button, pressed, x, y);
    }
}

/// Input state the frame driver accumulates between frames. Owned by the
/// driver and handed to the UI callback by reference; there are no
/// process-wide globals behind it.
#[derive(Default, Copy, Clone, Debug)]
pub struct InputState {
    /// Last reported cursor position in window pixels.
    pub cursor: Vec2f,
    /// Buttons currently held.
    pub buttons: MouseButtons,
    close_requested: bool,
}

impl InputState {
    /// Flags the frame loop to exit after the current iteration.
    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    /// Whether a close was requested by input or the window system.
    pub fn close_requested(&self) -> bool {
        self.close_requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_request_latches() {
        let mut state = InputState::default();
        assert!(!state.close_requested());
        state.request_close();
        assert!(state.close_requested());
    }

    #[test]
    fn button_bits_are_distinct() {
        let all = MouseButtons::LEFT | MouseButtons::MIDDLE | MouseButtons::RIGHT;
        assert_eq!(all.bits(), 7);
        assert!(!MouseButtons::LEFT.intersects(MouseButtons::RIGHT));
    }
}
