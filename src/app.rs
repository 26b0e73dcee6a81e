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
use std::{fs::File, io, io::BufWriter, sync::Arc};

use log::{debug, info, warn};

use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;
use sdl2::video::{GLContext, GLProfile, SwapInterval, Window};
use sdl2::{Sdl, VideoSubsystem};

use super::*;

/// Window parameters for the frame driver.
pub struct WindowConfig {
    /// Window title.
    pub title: String,
    /// Initial window width in pixels.
    pub width: u32,
    /// Initial window height in pixels.
    pub height: u32,
    /// Color the framebuffer is cleared to each frame.
    pub clear_color: Color4b,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "drawlist-replay".to_string(),
            width: 1920 / 2,
            height: 1080 / 2,
            clear_color: color4b(51, 77, 77, 255),
        }
    }
}

/// Frame driver over an SDL2 window with a core-profile GL 3.3 context.
///
/// Owns the window, the context, and all input state; nothing lives in
/// process-wide globals. The loop is strictly single-threaded: input
/// callbacks run during polling on the frame thread, before the next frame's
/// draw list is built, and the only blocking point is the vsync-paced swap.
pub struct App {
    sdl_ctx: Sdl,
    _sdl_vid: VideoSubsystem,
    _gl_ctx: GLContext,
    window: Window,
    gl: Arc<glow::Context>,
    clear_color: Color4b,
    input: InputState,
}

impl App {
    /// Creates the window and GL context. Any failure here is fatal; callers
    /// are expected to exit non-zero.
    pub fn new(config: &WindowConfig) -> Result<Self, InitError> {
        let sdl_ctx = sdl2::init().map_err(InitError::Window)?;
        let video = sdl_ctx.video().map_err(InitError::Window)?;

        let gl_attr = video.gl_attr();
        gl_attr.set_context_profile(GLProfile::Core);
        gl_attr.set_context_version(3, 3);

        let window = video
            .window(&config.title, config.width, config.height)
            .resizable()
            .opengl()
            .position_centered()
            .build()
            .map_err(|e| InitError::Window(e.to_string()))?;

        let gl_ctx = window.gl_create_context().map_err(InitError::Context)?;
        window.gl_make_current(&gl_ctx).map_err(InitError::Context)?;

        let gl = unsafe {
            glow::Context::from_loader_function(|s| video.gl_get_proc_address(s) as *const _)
        };

        if let Err(err) = video.gl_set_swap_interval(SwapInterval::VSync) {
            debug!("vsync unavailable: {}", err);
        }

        info!("window up: {}x{} core 3.3", config.width, config.height);

        Ok(Self {
            sdl_ctx,
            _sdl_vid: video,
            _gl_ctx: gl_ctx,
            window,
            gl: Arc::new(gl),
            clear_color: config.clear_color,
            input: InputState::default(),
        })
    }

    /// The GL context backing this window.
    pub fn gl(&self) -> Arc<glow::Context> { self.gl.clone() }

    /// Current drawable size in pixels.
    pub fn drawable_size(&self) -> (i32, i32) {
        let (w, h) = self.window.drawable_size();
        (w as i32, h as i32)
    }

    /// Input state accumulated so far.
    pub fn input(&self) -> &InputState { &self.input }

    /// Runs the frame loop until a close is requested.
    ///
    /// Each iteration queries the drawable size, asks `build_ui` for the
    /// frame's [`FrameDrawData`], replays it, presents, and then polls input.
    /// A degraded frame (e.g. a draw list over buffer capacity) is logged
    /// and the loop keeps going; Escape or a window close ends it.
    pub fn run<F>(
        &mut self,
        engine: &mut ReplayEngine<GlowBackend>,
        handler: &mut dyn InputHandler,
        mut build_ui: F,
    ) -> Result<(), InitError>
    where
        F: FnMut(Vec2f, &InputState) -> FrameDrawData,
    {
        let mut event_pump = self.sdl_ctx.event_pump().map_err(InitError::Window)?;

        while !self.input.close_requested() {
            let (width, height) = self.drawable_size();

            engine.backend_mut().begin_frame(width, height, self.clear_color);
            let frame = build_ui(Vec2f::new(width as f32, height as f32), &self.input);
            // replay warns for each skipped list itself; the returned error
            // only repeats the first of those
            let _ = engine.replay(&frame, width, height);
            engine.backend_mut().end_frame();
            self.window.gl_swap_window();

            for event in event_pump.poll_iter() {
                match event {
                    Event::Quit { .. } | Event::Window { win_event: WindowEvent::Close, .. } => {
                        self.input.request_close();
                    }
                    Event::KeyDown { keycode: Some(kc), .. } => {
                        let key = map_keycode(kc);
                        match key {
                            Key::Escape => self.input.request_close(),
                            Key::F1 => capture_screenshot(engine.backend(), width, height),
                            _ => {}
                        }
                        handler.key(key, true);
                    }
                    Event::KeyUp { keycode: Some(kc), .. } => {
                        handler.key(map_keycode(kc), false);
                    }
                    Event::MouseMotion { x, y, .. } => {
                        self.input.cursor = Vec2f::new(x as f32, y as f32);
                        handler.cursor_pos(x as f32, y as f32);
                    }
                    Event::MouseButtonDown { x, y, mouse_btn, .. } => {
                        let button = map_mouse_button(mouse_btn);
                        self.input.buttons |= button;
                        handler.mouse_button(button, true, x as f32, y as f32);
                    }
                    Event::MouseButtonUp { x, y, mouse_btn, .. } => {
                        let button = map_mouse_button(mouse_btn);
                        self.input.buttons &= !button;
                        handler.mouse_button(button, false, x as f32, y as f32);
                    }
                    _ => {}
                }
            }
        }

        info!("close requested, leaving frame loop");
        Ok(())
    }
}

fn map_keycode(kc: Keycode) -> Key {
    match kc {
        Keycode::Escape => Key::Escape,
        Keycode::F1 => Key::F1,
        Keycode::Return => Key::Enter,
        Keycode::Backspace => Key::Backspace,
        Keycode::Space => Key::Char(' '),
        _ => Key::Other,
    }
}

fn map_mouse_button(btn: sdl2::mouse::MouseButton) -> MouseButtons {
    match btn {
        sdl2::mouse::MouseButton::Left => MouseButtons::LEFT,
        sdl2::mouse::MouseButton::Middle => MouseButtons::MIDDLE,
        sdl2::mouse::MouseButton::Right => MouseButtons::RIGHT,
        _ => MouseButtons::empty(),
    }
}

fn capture_screenshot(backend: &GlowBackend, width: i32, height: i32) {
    let pixels = backend.read_framebuffer_rgba(width, height);
    match write_png("screenshot.png", width as u32, height as u32, &pixels) {
        Ok(()) => info!("wrote screenshot.png"),
        Err(err) => warn!("screenshot failed: {}", err),
    }
}

/// GL reads rows bottom-up; PNG wants them top-down.
fn flip_rows(stride: usize, data: &[u8]) -> Vec<u8> {
    let mut flipped = Vec::with_capacity(data.len());
    for row in data.chunks(stride).rev() {
        flipped.extend_from_slice(row);
    }
    flipped
}

fn write_png(path: &str, width: u32, height: u32, bottom_up_rgba: &[u8]) -> io::Result<()> {
    let flipped = flip_rows(width as usize * 4, bottom_up_rgba);

    let file = File::create(path)?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header().map_err(png_err)?;
    writer.write_image_data(&flipped).map_err(png_err)?;
    Ok(())
}

fn png_err(err: png::EncodingError) -> io::Error {
    io::Error::other(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keycode_mapping() {
        assert_eq!(map_keycode(Keycode::Escape), Key::Escape);
        assert_eq!(map_keycode(Keycode::F1), Key::F1);
        assert_eq!(map_keycode(Keycode::Space), Key::Char(' '));
        assert_eq!(map_keycode(Keycode::A), Key::Other);
    }

    #[test]
    fn mouse_button_mapping() {
        assert_eq!(map_mouse_button(sdl2::mouse::MouseButton::Left), MouseButtons::LEFT);
        assert_eq!(map_mouse_button(sdl2::mouse::MouseButton::X1), MouseButtons::empty());
    }

    #[test]
    fn screenshot_rows_are_flipped() {
        // two rows of one RGBA pixel each
        let bottom_up = [1, 1, 1, 1, 2, 2, 2, 2];
        let flipped = flip_rows(4, &bottom_up);
        assert_eq!(flipped, vec![2, 2, 2, 2, 1, 1, 1, 1]);
    }
}
