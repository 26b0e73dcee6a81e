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
use std::{collections::HashMap, fs::File, io::Read};

use fontdue::FontSettings;

use super::*;

const ATLAS_WIDTH: usize = 512;
const PADDING: usize = 1;
const FIRST_CHAR: u8 = 32;
const LAST_CHAR: u8 = 126;

#[derive(Copy, Clone, Debug)]
/// Placement and metrics of one rasterized glyph inside a [`FontAtlas`].
pub struct GlyphEntry {
    /// Top-left atlas coordinate, normalized.
    pub uv_min: Vec2f,
    /// Bottom-right atlas coordinate, normalized.
    pub uv_max: Vec2f,
    /// Glyph quad size in pixels.
    pub size: Vec2f,
    /// Offset from the pen position (x right, y up from the baseline to the
    /// quad's top, already negated for top-left-origin screen space).
    pub offset: Vec2f,
    /// Horizontal pen advance in pixels.
    pub advance: f32,
}

/// Printable-ASCII font atlas: white RGBA pixels with glyph coverage in the
/// alpha channel, shelf-packed into a fixed-width texture, plus the metrics
/// needed to lay out text as textured quads.
pub struct FontAtlas {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
    glyphs: HashMap<char, GlyphEntry>,
    white_uv: Vec2f,
    line_height: f32,
}

impl FontAtlas {
    /// Rasterizes the font at `path` at `size` pixels. A missing or
    /// unparsable file is a startup failure.
    pub fn from_file(path: &str, size: f32) -> Result<Self, InitError> {
        let mut data = Vec::new();
        File::open(path)
            .and_then(|mut f| f.read_to_end(&mut data))
            .map_err(|source| InitError::Asset { path: path.to_string(), source })?;
        Self::from_bytes(&data, size)
    }

    /// Rasterizes a font already loaded into memory at `size` pixels.
    pub fn from_bytes(data: &[u8], size: f32) -> Result<Self, InitError> {
        let font = fontdue::Font::from_bytes(data, FontSettings::default())
            .map_err(|e| InitError::Font(e.to_string()))?;

        let mut rasterized = Vec::new();
        for code in FIRST_CHAR..=LAST_CHAR {
            let ch = code as char;
            let (metrics, coverage) = font.rasterize(ch, size);
            rasterized.push((metrics, coverage, ch));
        }

        // slot 0 is a solid 2x2 white block so untextured quads can share
        // the atlas texture
        let mut sizes = Vec::with_capacity(rasterized.len() + 1);
        sizes.push((2usize, 2usize));
        sizes.extend(rasterized.iter().map(|(m, _, _)| (m.width, m.height)));

        let (positions, used_height) = pack_shelves(&sizes, ATLAS_WIDTH, PADDING);
        let height = used_height.next_power_of_two();

        let mut pixels = vec![0u8; ATLAS_WIDTH * height * 4];
        let mut glyphs = HashMap::new();

        let (wx, wy) = positions[0];
        blit_coverage(&mut pixels, ATLAS_WIDTH, wx, wy, &[0xFF; 4], 2, 2);
        let white_uv = Vec2f::new(
            (wx as f32 + 1.0) / ATLAS_WIDTH as f32,
            (wy as f32 + 1.0) / height as f32,
        );

        for (i, (metrics, coverage, ch)) in rasterized.iter().enumerate() {
            let (x, y) = positions[i + 1];
            blit_coverage(&mut pixels, ATLAS_WIDTH, x, y, coverage, metrics.width, metrics.height);

            glyphs.insert(
                *ch,
                GlyphEntry {
                    uv_min: Vec2f::new(x as f32 / ATLAS_WIDTH as f32, y as f32 / height as f32),
                    uv_max: Vec2f::new(
                        (x + metrics.width) as f32 / ATLAS_WIDTH as f32,
                        (y + metrics.height) as f32 / height as f32,
                    ),
                    size: Vec2f::new(metrics.width as f32, metrics.height as f32),
                    offset: Vec2f::new(
                        metrics.xmin as f32,
                        -(metrics.height as f32) - metrics.ymin as f32,
                    ),
                    advance: metrics.advance_width,
                },
            );
        }

        let line_height = font
            .horizontal_line_metrics(size)
            .map(|m| m.new_line_size)
            .unwrap_or(size * 1.2);

        Ok(Self { width: ATLAS_WIDTH, height, pixels, glyphs, white_uv, line_height })
    }

    /// Atlas width in pixels.
    pub fn width(&self) -> usize { self.width }

    /// Atlas height in pixels.
    pub fn height(&self) -> usize { self.height }

    /// RGBA8 pixel data, row-major from the top-left.
    pub fn pixels(&self) -> &[u8] { &self.pixels }

    /// Metrics for a glyph, if the character is in the printable-ASCII set.
    pub fn glyph(&self, ch: char) -> Option<&GlyphEntry> { self.glyphs.get(&ch) }

    /// Atlas coordinate of a guaranteed-white texel, for solid fills.
    pub fn white_uv(&self) -> Vec2f { self.white_uv }

    /// Baseline-to-baseline distance in pixels.
    pub fn line_height(&self) -> f32 { self.line_height }

    /// Lays `text` out as one quad per glyph starting at `pos` (pen position,
    /// `pos.y` being the baseline) and returns the advance consumed. Glyphs
    /// outside the atlas are skipped.
    pub fn layout_text(&self, list: &mut DrawCommandList, pos: Vec2f, text: &str, color: Color4b) -> f32 {
        let mut pen_x = pos.x;
        for ch in text.chars() {
            let Some(g) = self.glyphs.get(&ch) else { continue };
            if g.size.x > 0.0 && g.size.y > 0.0 {
                let p0 = Vec2f::new(pen_x + g.offset.x, pos.y + g.offset.y);
                let p1 = Vec2f::new(p0.x + g.size.x, p0.y + g.size.y);
                list.push_quad([
                    Vertex::new(p0, g.uv_min, color),
                    Vertex::new(Vec2f::new(p1.x, p0.y), Vec2f::new(g.uv_max.x, g.uv_min.y), color),
                    Vertex::new(p1, g.uv_max, color),
                    Vertex::new(Vec2f::new(p0.x, p1.y), Vec2f::new(g.uv_min.x, g.uv_max.y), color),
                ]);
            }
            pen_x += g.advance;
        }
        pen_x - pos.x
    }

    /// Fills the `size`-sized rectangle whose top-left corner is `pos` with
    /// a solid color using the atlas' white texel.
    pub fn fill_rect(&self, list: &mut DrawCommandList, pos: Vec2f, size: Vec2f, color: Color4b) {
        let p0 = pos;
        let p1 = Vec2f::new(pos.x + size.x, pos.y + size.y);
        let uv = self.white_uv;
        list.push_quad([
            Vertex::new(p0, uv, color),
            Vertex::new(Vec2f::new(p1.x, p0.y), uv, color),
            Vertex::new(p1, uv, color),
            Vertex::new(Vec2f::new(p0.x, p1.y), uv, color),
        ]);
    }
}

/// Left-to-right shelf packer: places each `(width, height)` on the current
/// row, opening a new row when the atlas width is exhausted. Returns the
/// positions and the total height consumed.
fn pack_shelves(sizes: &[(usize, usize)], atlas_width: usize, padding: usize) -> (Vec<(usize, usize)>, usize) {
    let mut positions = Vec::with_capacity(sizes.len());
    let mut pen_x = padding;
    let mut pen_y = padding;
    let mut row_height = 0;

    for &(w, h) in sizes {
        if pen_x + w + padding > atlas_width {
            pen_x = padding;
            pen_y += row_height + padding;
            row_height = 0;
        }
        positions.push((pen_x, pen_y));
        pen_x += w + padding;
        row_height = row_height.max(h);
    }

    (positions, pen_y + row_height + padding)
}

/// Expands 8-bit coverage into white RGBA at `(x, y)` inside a `dst_width`
/// wide RGBA8 image.
fn blit_coverage(dst: &mut [u8], dst_width: usize, x: usize, y: usize, coverage: &[u8], w: usize, h: usize) {
    for row in 0..h {
        for col in 0..w {
            let at = ((y + row) * dst_width + x + col) * 4;
            let c = coverage[row * w + col];
            dst[at] = 0xFF;
            dst[at + 1] = 0xFF;
            dst[at + 2] = 0xFF;
            dst[at + 3] = c;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shelves_do_not_overlap() {
        let sizes = [(10, 12), (30, 8), (25, 20), (40, 5), (12, 12), (60, 9)];
        let (positions, height) = pack_shelves(&sizes, 64, 1);

        for i in 0..sizes.len() {
            let (xa, ya) = positions[i];
            let (wa, ha) = sizes[i];
            assert!(xa + wa <= 64, "glyph {} exceeds atlas width", i);
            assert!(ya + ha <= height, "glyph {} exceeds atlas height", i);

            for j in (i + 1)..sizes.len() {
                let (xb, yb) = positions[j];
                let (wb, hb) = sizes[j];
                let disjoint_x = xa + wa <= xb || xb + wb <= xa;
                let disjoint_y = ya + ha <= yb || yb + hb <= ya;
                assert!(disjoint_x || disjoint_y, "glyphs {} and {} overlap", i, j);
            }
        }
    }

    #[test]
    fn shelf_height_covers_tallest_row() {
        let sizes = [(10, 4), (10, 16), (10, 2)];
        let (positions, height) = pack_shelves(&sizes, 64, 1);
        assert_eq!(positions.len(), 3);
        // all three fit one row; row height is the tallest glyph plus padding
        assert_eq!(height, 1 + 16 + 1);
    }

    #[test]
    fn blit_writes_white_with_coverage_alpha() {
        let mut dst = vec![0u8; 8 * 8 * 4];
        blit_coverage(&mut dst, 8, 2, 3, &[10, 20, 30, 40], 2, 2);

        let at = (3 * 8 + 2) * 4;
        assert_eq!(&dst[at..at + 4], &[0xFF, 0xFF, 0xFF, 10]);
        let at = (4 * 8 + 3) * 4;
        assert_eq!(&dst[at..at + 4], &[0xFF, 0xFF, 0xFF, 40]);
        // untouched texel stays clear
        assert_eq!(&dst[0..4], &[0, 0, 0, 0]);
    }

    fn test_atlas() -> FontAtlas {
        let mut glyphs = HashMap::new();
        glyphs.insert(
            'a',
            GlyphEntry {
                uv_min: Vec2f::new(0.0, 0.0),
                uv_max: Vec2f::new(0.5, 0.5),
                size: Vec2f::new(8.0, 10.0),
                offset: Vec2f::new(1.0, -10.0),
                advance: 9.0,
            },
        );
        glyphs.insert(
            ' ',
            GlyphEntry {
                uv_min: Vec2f::new(0.0, 0.0),
                uv_max: Vec2f::new(0.0, 0.0),
                size: Vec2f::new(0.0, 0.0),
                offset: Vec2f::new(0.0, 0.0),
                advance: 4.0,
            },
        );
        FontAtlas {
            width: 16,
            height: 16,
            pixels: vec![0; 16 * 16 * 4],
            glyphs,
            white_uv: Vec2f::new(0.9, 0.9),
            line_height: 14.0,
        }
    }

    #[test]
    fn layout_advances_pen_and_skips_empty_glyphs() {
        let atlas = test_atlas();
        let mut list = DrawCommandList::new();
        let advance = atlas.layout_text(
            &mut list,
            Vec2f::new(10.0, 40.0),
            "a a",
            color4b(0xFF, 0xFF, 0xFF, 0xFF),
        );

        // two visible glyphs, the space only advances
        assert_eq!(list.indices().len(), 12);
        assert_eq!(advance, 9.0 + 4.0 + 9.0);

        // first glyph top-left honors the offset, baseline at y = 40
        let v0 = list.vertices()[0];
        assert_eq!((v0.position().x, v0.position().y), (11.0, 30.0));
    }

    #[test]
    fn unknown_glyphs_are_skipped() {
        let atlas = test_atlas();
        let mut list = DrawCommandList::new();
        let advance =
            atlas.layout_text(&mut list, Vec2f::new(0.0, 0.0), "\u{e9}", color4b(0, 0, 0, 0xFF));
        assert_eq!(advance, 0.0);
        assert!(list.indices().is_empty());
    }

    #[test]
    fn fill_rect_uses_white_texel() {
        let atlas = test_atlas();
        let mut list = DrawCommandList::new();
        atlas.fill_rect(
            &mut list,
            Vec2f::new(5.0, 6.0),
            Vec2f::new(20.0, 10.0),
            color4b(0x20, 0x40, 0x60, 0xFF),
        );

        assert_eq!(list.vertices().len(), 4);
        for v in list.vertices() {
            assert_eq!((v.tex_coord().x, v.tex_coord().y), (0.9, 0.9));
        }
        let v2 = list.vertices()[2];
        assert_eq!((v2.position().x, v2.position().y), (25.0, 16.0));
    }

    #[test]
    fn missing_font_file_is_an_asset_error() {
        match FontAtlas::from_file("res/fonts/does-not-exist.ttf", 16.0) {
            Err(InitError::Asset { path, .. }) => {
                assert_eq!(path, "res/fonts/does-not-exist.ttf")
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("expected an error"),
        }
    }
}
