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
//! Windowed demo: renders a text panel and a cursor-following marker through
//! the replay engine. Escape quits, F1 writes `screenshot.png`.
//!
//! Pass a TTF path as the first argument to pick the font.

use drawlist_replay::*;

const DEFAULT_FONT: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";

struct DemoHandler;

impl InputHandler for DemoHandler {}

fn build_frame(
    atlas: &FontAtlas,
    atlas_texture: TextureHandle,
    display: Vec2f,
    input: &InputState,
) -> FrameDrawData {
    let mut frame = FrameDrawData::new(Vec2f::new(0.0, 0.0), display);
    let mut list = DrawCommandList::new();

    let white = color4b(0xFF, 0xFF, 0xFF, 0xFF);
    let dim = color4b(0xB4, 0xB4, 0xBE, 0xFF);
    let green = color4b(0x78, 0xC8, 0x78, 0xFF);

    atlas.fill_rect(
        &mut list,
        Vec2f::new(32.0, 32.0),
        Vec2f::new(380.0, 3.0 * atlas.line_height() + 32.0),
        color4b(0x26, 0x26, 0x30, 0xE6),
    );
    let mut pen = Vec2f::new(48.0, 48.0 + atlas.line_height());
    atlas.layout_text(&mut list, pen, "drawlist replay demo", white);
    pen.y += atlas.line_height();
    atlas.layout_text(&mut list, pen, "Esc quits, F1 saves screenshot.png", dim);
    pen.y += atlas.line_height();
    let status = format!(
        "cursor {:>4.0},{:>4.0}  buttons {:03b}",
        input.cursor.x,
        input.cursor.y,
        input.buttons.bits()
    );
    atlas.layout_text(&mut list, pen, &status, green);
    list.commit(ClipRect::full(display.x, display.y), atlas_texture);

    // marker stays clipped to the right half of the window, which makes the
    // scissor path visible as the cursor crosses the midline
    atlas.fill_rect(
        &mut list,
        Vec2f::new(input.cursor.x - 8.0, input.cursor.y - 8.0),
        Vec2f::new(16.0, 16.0),
        color4b(0xE6, 0x78, 0x3C, 0xFF),
    );
    list.commit(
        ClipRect::new(display.x * 0.5, 0.0, display.x, display.y),
        atlas_texture,
    );

    frame.lists.push(list);
    frame
}

fn run() -> Result<(), InitError> {
    let font_path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_FONT.to_string());
    let atlas = FontAtlas::from_file(&font_path, 18.0)?;

    let mut app = App::new(&WindowConfig::default())?;

    let mut backend = GlowBackend::new(app.gl(), &ReplayConfig::default())?;
    let atlas_texture = backend.create_texture(
        atlas.width() as i32,
        atlas.height() as i32,
        atlas.pixels(),
    );

    let mut engine = ReplayEngine::new(backend, RenderMode::Solid);
    let mut handler = DemoHandler;

    app.run(&mut engine, &mut handler, |display, input| {
        build_frame(&atlas, atlas_texture, display, input)
    })
}

fn main() {
    env_logger::init();

    if let Err(err) = run() {
        log::error!("startup failed: {}", err);
        std::process::exit(1);
    }
}
