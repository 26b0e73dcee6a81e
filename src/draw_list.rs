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

#[derive(Default, Copy, Clone, Debug)]
#[repr(C)]
/// Vertex submitted by the UI: screen-space position, atlas coordinate,
/// rgba8 color. Stride is 20 bytes; backends assert this when they declare
/// the attribute layout.
pub struct Vertex {
    pos: Vec2f,
    uv: Vec2f,
    color: Color4b,
}

impl Vertex {
    /// Creates a vertex with the provided position, texture coordinate, and color.
    pub fn new(pos: Vec2f, uv: Vec2f, color: Color4b) -> Self { Self { pos, uv, color } }

    /// Returns the position of the vertex in screen space.
    pub fn position(&self) -> Vec2f { self.pos }

    /// Returns the texture coordinates associated with the vertex.
    pub fn tex_coord(&self) -> Vec2f { self.uv }

    /// Returns the vertex color.
    pub fn color(&self) -> Color4b { self.color }
}

#[derive(Copy, Clone, Debug, PartialEq)]
/// Clipping rectangle in framebuffer pixels, top-left origin, as produced by
/// the UI layer. Converted to a bottom-left-origin scissor region at replay
/// time (see [`scissor_from_clip`]).
pub struct ClipRect {
    /// Left edge, inclusive.
    pub left: f32,
    /// Top edge, inclusive.
    pub top: f32,
    /// Right edge, exclusive.
    pub right: f32,
    /// Bottom edge, exclusive.
    pub bottom: f32,
}

impl ClipRect {
    /// Creates a clip rectangle from its four edges.
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    /// A clip rectangle covering a whole `width` by `height` framebuffer.
    pub fn full(width: f32, height: f32) -> Self { Self::new(0.0, 0.0, width, height) }
}

#[derive(Copy, Clone, Debug)]
/// One GPU draw operation within a [`DrawCommandList`].
pub struct DrawCommand {
    /// Pixels outside this rectangle are discarded by the scissor test.
    pub clip_rect: ClipRect,
    /// Number of indices consumed by the draw.
    pub element_count: u32,
    /// Offset of the first index, in elements, into the list's index buffer.
    pub index_offset: u32,
    /// Bias added to every fetched index before it addresses the vertex
    /// buffer; lets several logical objects share one vertex buffer.
    pub vertex_base_offset: i32,
    /// Texture sampled by the draw. Ownership stays with the caller.
    pub texture: TextureHandle,
}

/// Ordered run of [`DrawCommand`]s plus the contiguous vertex and 16-bit
/// index buffers they address. Produced fresh each frame by the UI layer and
/// discarded after replay; the engine never holds onto one across frames.
#[derive(Default)]
pub struct DrawCommandList {
    vertices: Vec<Vertex>,
    indices: Vec<u16>,
    commands: Vec<DrawCommand>,
    pending_start: u32,
}

impl DrawCommandList {
    /// Creates an empty list.
    pub fn new() -> Self { Self::default() }

    /// Vertices shared by every command in the list.
    pub fn vertices(&self) -> &[Vertex] { &self.vertices }

    /// Indices shared by every command in the list.
    pub fn indices(&self) -> &[u16] { &self.indices }

    /// Commands in submission order.
    pub fn commands(&self) -> &[DrawCommand] { &self.commands }

    /// Size of the vertex payload in bytes.
    pub fn vertex_bytes(&self) -> usize { self.vertices.len() * core::mem::size_of::<Vertex>() }

    /// Size of the index payload in bytes.
    pub fn index_bytes(&self) -> usize { self.indices.len() * core::mem::size_of::<u16>() }

    /// Appends a quad as two triangles, winding 0-1-2 / 2-3-0. Corners are
    /// given clockwise from the top-left.
    pub fn push_quad(&mut self, corners: [Vertex; 4]) {
        debug_assert!(self.vertices.len() + 4 <= u16::MAX as usize + 1, "vertex index space exhausted");
        let base = self.vertices.len() as u16;
        self.indices.push(base);
        self.indices.push(base + 1);
        self.indices.push(base + 2);
        self.indices.push(base + 2);
        self.indices.push(base + 3);
        self.indices.push(base);
        self.vertices.extend_from_slice(&corners);
    }

    /// Closes the run of indices pushed since the previous commit into one
    /// command with the given clip rect and texture. An empty run commits
    /// nothing.
    pub fn commit(&mut self, clip_rect: ClipRect, texture: TextureHandle) {
        let element_count = self.indices.len() as u32 - self.pending_start;
        if element_count == 0 {
            return;
        }
        self.commands.push(DrawCommand {
            clip_rect,
            element_count,
            index_offset: self.pending_start,
            vertex_base_offset: 0,
            texture,
        });
        self.pending_start = self.indices.len() as u32;
    }

    /// Appends a command built elsewhere, e.g. one addressing shared
    /// geometry through a base-vertex offset.
    pub fn push_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
        self.pending_start = self.indices.len() as u32;
    }

    /// Appends raw geometry without creating a command for it.
    pub fn push_raw(&mut self, vertices: &[Vertex], indices: &[u16]) {
        self.vertices.extend_from_slice(vertices);
        self.indices.extend_from_slice(indices);
    }

    /// Whether the command's index range lies within this list's index
    /// buffer: `index_offset + element_count <= indices.len()`.
    pub fn command_in_bounds(&self, command: &DrawCommand) -> bool {
        let end = command.index_offset as u64 + command.element_count as u64;
        end <= self.indices.len() as u64
    }
}

/// Full payload for one frame: the display rectangle the projection is built
/// from and the command lists to replay, in painter's order.
pub struct FrameDrawData {
    /// Top-left corner of the display area in UI pixel space.
    pub display_origin: Vec2f,
    /// Size of the display area; both components must be strictly positive.
    pub display_size: Vec2f,
    /// Command lists in submission order; an empty sequence renders nothing.
    pub lists: Vec<DrawCommandList>,
}

impl FrameDrawData {
    /// Creates an empty frame for the given display rectangle.
    pub fn new(display_origin: Vec2f, display_size: Vec2f) -> Self {
        Self { display_origin, display_size, lists: Vec::new() }
    }
}
