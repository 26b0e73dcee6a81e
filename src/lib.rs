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
#![deny(missing_docs)]
//! `drawlist-replay` replays immediate-mode UI draw lists through OpenGL.
//!
//! The UI layer produces one [`FrameDrawData`] per frame: an ordered sequence
//! of [`DrawCommandList`]s, each carrying its own vertex and index buffers and
//! a run of [`DrawCommand`]s (clip rect, index range, base-vertex offset,
//! texture handle). The [`ReplayEngine`] translates that stream into dynamic
//! buffer rewrites, scissor updates, texture binds, and base-vertex indexed
//! draws, in strict list order. The GPU side sits behind the [`DrawBackend`]
//! trait; the crate ships a `glow` implementation plus an SDL2 frame driver,
//! both behind feature gates.

mod draw_list;
mod error;
mod input;
mod projection;
mod replay;

#[cfg(feature = "atlas-builder")]
mod atlas;
#[cfg(feature = "backend-glow")]
mod backend;
#[cfg(feature = "sdl2-window")]
mod app;

pub use draw_list::*;
pub use error::*;
pub use input::*;
pub use projection::*;
pub use replay::*;

#[cfg(feature = "atlas-builder")]
pub use atlas::*;
#[cfg(feature = "backend-glow")]
pub use backend::*;
#[cfg(feature = "sdl2-window")]
pub use app::*;

pub use rs_math3d::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// Opaque handle referencing a previously uploaded texture.
///
/// The handle is never validated here: binding a stale or foreign handle is a
/// caller error that surfaces as wrong pixels, not as a propagated error.
pub struct TextureHandle(u32);

impl TextureHandle {
    /// Wraps a raw backend texture name.
    pub fn from_raw(raw: u32) -> Self { Self(raw) }

    /// Returns the raw numeric name stored inside the handle.
    pub fn raw(self) -> u32 { self.0 }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Render passes the engine performs per frame, chosen at startup.
pub enum RenderMode {
    /// One textured, blended pass per frame.
    Solid,
    /// The solid pass followed by a second pass with the wireframe flag set,
    /// re-uploading the uniform block between the two.
    SolidWithWireframeOverlay,
}

impl RenderMode {
    pub(crate) fn wireframe_passes(self) -> &'static [bool] {
        match self {
            RenderMode::Solid => &[false],
            RenderMode::SolidWithWireframeOverlay => &[false, true],
        }
    }
}

/// Per-frame shader constants, uploaded wholesale once per pass.
#[derive(Copy, Clone, Debug)]
pub struct UniformBlock {
    /// Orthographic projection mapping UI pixel space into clip space.
    pub projection: Mat4f,
    /// Selects the wireframe fragment path; backends also switch the
    /// polygon fill mode to match.
    pub wireframe: bool,
}

impl UniformBlock {
    /// Size in bytes of the std140 image produced by [`UniformBlock::to_std140`].
    pub const STD140_SIZE: usize = 80;

    /// Serializes the block to its std140 layout: a column-major `mat4`
    /// followed by an `int` flag and 12 bytes of tail padding.
    pub fn to_std140(&self) -> [u8; Self::STD140_SIZE] {
        let mut raw = [0u8; Self::STD140_SIZE];
        for (c, col) in self.projection.col.iter().enumerate() {
            for (r, v) in [col.x, col.y, col.z, col.w].iter().enumerate() {
                let at = (c * 4 + r) * 4;
                raw[at..at + 4].copy_from_slice(&v.to_ne_bytes());
            }
        }
        raw[64..68].copy_from_slice(&(self.wireframe as i32).to_ne_bytes());
        raw
    }
}

/// Backend operations the [`ReplayEngine`] drives.
///
/// The engine checks upload sizes against the reported capacities before
/// calling the upload methods, so implementations may assume payloads fit.
pub trait DrawBackend {
    /// Capacity of the vertex buffer in bytes.
    fn vertex_capacity(&self) -> usize;
    /// Capacity of the index buffer in bytes.
    fn index_capacity(&self) -> usize;
    /// Uploads the full uniform block; no partial updates.
    fn set_uniforms(&mut self, block: &UniformBlock);
    /// Rewrites the vertex buffer from offset zero.
    fn upload_vertices(&mut self, vertices: &[Vertex]);
    /// Rewrites the index buffer from offset zero.
    fn upload_indices(&mut self, indices: &[u16]);
    /// Sets the scissor region, in bottom-left-origin framebuffer pixels.
    fn set_scissor(&mut self, rect: ScissorRect);
    /// Binds a texture to the pipeline's fixed texture unit. Stateless and
    /// idempotent; the handle is not validated.
    fn bind_texture(&mut self, texture: TextureHandle);
    /// Issues one indexed draw: `element_count` indices starting at
    /// `index_offset` (in elements), each biased by `vertex_base` before
    /// addressing the vertex buffer.
    fn draw_indexed(&mut self, element_count: u32, index_offset: u32, vertex_base: i32);
}

/// Sizing for the backend's fixed-capacity buffer pool.
#[derive(Copy, Clone, Debug)]
pub struct ReplayConfig {
    /// Vertex buffer capacity in bytes, allocated once at startup.
    pub vertex_capacity_bytes: usize,
    /// Index buffer capacity in bytes, allocated once at startup.
    pub index_capacity_bytes: usize,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            vertex_capacity_bytes: 256 * 1024,
            index_capacity_bytes: 256 * 1024,
        }
    }
}
