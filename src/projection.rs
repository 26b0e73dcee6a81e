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

/// Builds the orthographic projection for a display rectangle given in
/// top-left-origin UI pixel space.
///
/// `(origin.x, origin.y + size.y)` lands on the clip-space bottom-left and
/// `(origin.x + size.x, origin.y)` on the top-right: the Y axis is flipped
/// relative to math convention so that UI coordinates grow downward while
/// clip space grows upward.
pub fn ui_projection(display_origin: Vec2f, display_size: Vec2f) -> Mat4f {
    let left = display_origin.x;
    let right = display_origin.x + display_size.x;
    let top = display_origin.y;
    let bottom = display_origin.y + display_size.y;
    ortho4(left, right, bottom, top, -1.0, 1.0)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Scissor region in bottom-left-origin framebuffer pixels, as the GL
/// scissor test expects.
pub struct ScissorRect {
    /// Left edge.
    pub x: i32,
    /// Bottom edge.
    pub y: i32,
    /// Region width.
    pub width: i32,
    /// Region height.
    pub height: i32,
}

impl ScissorRect {
    /// A scissor region covering the whole framebuffer.
    pub fn full(width: i32, height: i32) -> Self {
        Self { x: 0, y: 0, width, height }
    }
}

/// Converts a top-left-origin clip rectangle into a scissor region.
///
/// The vertical flip (`y = framebuffer_height - clip.bottom`) reconciles the
/// UI layer's top-left origin with the scissor test's bottom-left origin and
/// satisfies `y + height == framebuffer_height - clip.top`.
pub fn scissor_from_clip(clip: &ClipRect, framebuffer_height: i32) -> ScissorRect {
    ScissorRect {
        x: clip.left as i32,
        // subtract before truncating so a fractional bottom edge rounds the
        // same way the height does
        y: (framebuffer_height as f32 - clip.bottom) as i32,
        width: (clip.right - clip.left) as i32,
        height: (clip.bottom - clip.top) as i32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(m: &Mat4f, x: f32, y: f32) -> (f32, f32) {
        let v = *m * Vec4f::new(x, y, 0.0, 1.0);
        (v.x / v.w, v.y / v.w)
    }

    fn assert_close(actual: (f32, f32), expected: (f32, f32)) {
        assert!(
            (actual.0 - expected.0).abs() < 1e-5 && (actual.1 - expected.1).abs() < 1e-5,
            "{:?} != {:?}",
            actual,
            expected
        );
    }

    #[test]
    fn projection_flips_y() {
        let origin = Vec2f::new(0.0, 0.0);
        let size = Vec2f::new(1280.0, 720.0);
        let m = ui_projection(origin, size);

        // screen bottom-left -> NDC bottom-left, screen top-right -> NDC top-right
        assert_close(project(&m, 0.0, 720.0), (-1.0, -1.0));
        assert_close(project(&m, 1280.0, 0.0), (1.0, 1.0));
        assert_close(project(&m, 640.0, 360.0), (0.0, 0.0));
    }

    #[test]
    fn projection_honors_display_origin() {
        let origin = Vec2f::new(100.0, 50.0);
        let size = Vec2f::new(200.0, 100.0);
        let m = ui_projection(origin, size);

        assert_close(project(&m, 100.0, 150.0), (-1.0, -1.0));
        assert_close(project(&m, 300.0, 50.0), (1.0, 1.0));
    }

    #[test]
    fn scissor_round_trips_the_flip() {
        let fb_height = 720;
        for clip in [
            ClipRect::new(0.0, 0.0, 1280.0, 720.0),
            ClipRect::new(10.0, 20.0, 110.0, 220.0),
            ClipRect::new(600.0, 700.0, 640.0, 720.0),
        ] {
            let s = scissor_from_clip(&clip, fb_height);
            assert_eq!(s.y + s.height, fb_height - clip.top as i32);
            assert_eq!(s.width, (clip.right - clip.left) as i32);
        }
    }

    #[test]
    fn fractional_clip_bottom_truncates_after_the_flip() {
        let s = scissor_from_clip(&ClipRect::new(10.0, 20.0, 110.0, 219.5), 720);
        // 720 - 219.5 truncates to 500, not 720 - 219 = 501
        assert_eq!(s.y, 500);
        assert_eq!(s.height, 199);
    }

    #[test]
    fn full_framebuffer_clip_maps_to_origin() {
        let s = scissor_from_clip(&ClipRect::full(1280.0, 720.0), 720);
        assert_eq!(s, ScissorRect::full(1280, 720));
    }
}
