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
use core::slice;
use std::{num::NonZeroU32, sync::Arc};

use glow::*;

use super::*;

mod buffers;
mod shader;

pub use shader::{UI_FRAGMENT_SHADER, UI_VERTEX_SHADER, compile_program, load_shader_source};

use buffers::BufferPool;

const UNIFORM_BINDING: u32 = 0;

/// [`DrawBackend`] over a `glow` OpenGL 3.3 core context.
///
/// Owns the vertex array, the fixed-capacity buffer pool, the uniform buffer
/// at binding point 0, the replay program, and every texture it created; all
/// of it is released in reverse acquisition order on drop.
pub struct GlowBackend {
    gl: Arc<glow::Context>,
    program: NativeProgram,
    vao: NativeVertexArray,
    buffers: BufferPool,
    ubo: NativeBuffer,
    owned_textures: Vec<NativeTexture>,
}

impl GlowBackend {
    /// Builds a backend with the built-in replay shaders.
    pub fn new(gl: Arc<glow::Context>, config: &ReplayConfig) -> Result<Self, ShaderError> {
        Self::with_shaders(gl, config, UI_VERTEX_SHADER, UI_FRAGMENT_SHADER)
    }

    /// Builds a backend with caller-supplied GLSL source, e.g. loaded via
    /// [`load_shader_source`]. Compile or link failure aborts construction.
    pub fn with_shaders(
        gl: Arc<glow::Context>,
        config: &ReplayConfig,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self, ShaderError> {
        assert_eq!(core::mem::size_of::<Vertex>(), 20);

        let program = compile_program(&gl, vertex_source, fragment_source)?;

        unsafe {
            let vao = gl.create_vertex_array().expect("Cannot create vertex array");
            gl.bind_vertex_array(Some(vao));

            // the element buffer binding is captured by the bound VAO
            let buffers = BufferPool::new(&gl, config.vertex_capacity_bytes, config.index_capacity_bytes);

            gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffers.vbo()));
            gl.enable_vertex_attrib_array(0);
            gl.enable_vertex_attrib_array(1);
            gl.enable_vertex_attrib_array(2);
            gl.vertex_attrib_pointer_f32(0, 2, glow::FLOAT, false, 20, 0);
            gl.vertex_attrib_pointer_f32(1, 2, glow::FLOAT, false, 20, 8);
            gl.vertex_attrib_pointer_f32(2, 4, glow::UNSIGNED_BYTE, true, 20, 16);
            debug_assert!(gl.get_error() == 0);

            let ubo = gl.create_buffer().expect("Cannot create uniform buffer");
            gl.bind_buffer(glow::UNIFORM_BUFFER, Some(ubo));
            gl.buffer_data_size(glow::UNIFORM_BUFFER, UniformBlock::STD140_SIZE as i32, glow::DYNAMIC_DRAW);
            if let Some(index) = gl.get_uniform_block_index(program, "PerFrameData") {
                gl.uniform_block_binding(program, index, UNIFORM_BINDING);
            }
            gl.bind_buffer_base(glow::UNIFORM_BUFFER, UNIFORM_BINDING, Some(ubo));
            debug_assert!(gl.get_error() == 0);

            gl.use_program(Some(program));
            if let Some(loc) = gl.get_uniform_location(program, "uTexture") {
                gl.uniform_1_i32(Some(&loc), 0);
            }
            debug_assert!(gl.get_error() == 0);

            Ok(Self { gl, program, vao, buffers, ubo, owned_textures: Vec::new() })
        }
    }

    /// Sets up viewport, scissor, blend, and program state for UI replay and
    /// clears the color buffer.
    pub fn begin_frame(&mut self, width: i32, height: i32, clear: Color4b) {
        let gl = &self.gl;
        unsafe {
            gl.viewport(0, 0, width, height);
            gl.scissor(0, 0, width, height);
            gl.enable(glow::BLEND);
            gl.blend_equation(glow::FUNC_ADD);
            gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
            gl.disable(glow::CULL_FACE);
            gl.disable(glow::DEPTH_TEST);
            gl.enable(glow::SCISSOR_TEST);
            debug_assert!(gl.get_error() == 0);

            gl.clear_color(
                clear.x as f32 / 255.0,
                clear.y as f32 / 255.0,
                clear.z as f32 / 255.0,
                clear.w as f32 / 255.0,
            );
            gl.clear(glow::COLOR_BUFFER_BIT);

            gl.use_program(Some(self.program));
            gl.bind_vertex_array(Some(self.vao));
            gl.active_texture(glow::TEXTURE0);
            debug_assert!(gl.get_error() == 0);
        }
    }

    /// Restores the polygon mode and unbinds the replay program.
    pub fn end_frame(&mut self) {
        let gl = &self.gl;
        unsafe {
            gl.polygon_mode(glow::FRONT_AND_BACK, glow::FILL);
            gl.use_program(None);
            debug_assert!(gl.get_error() == 0);
        }
    }

    /// Uploads an RGBA8 image as a linearly filtered, single-level texture
    /// and returns its handle. The backend owns the texture until it drops.
    pub fn create_texture(&mut self, width: i32, height: i32, rgba: &[u8]) -> TextureHandle {
        debug_assert_eq!(rgba.len(), (width * height * 4) as usize);
        let gl = &self.gl;
        unsafe {
            let tex = gl.create_texture().expect("Cannot create texture");
            gl.bind_texture(glow::TEXTURE_2D, Some(tex));
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAX_LEVEL, 0);
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                width,
                height,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                PixelUnpackData::Slice(Some(rgba)),
            );
            debug_assert!(gl.get_error() == 0);
            gl.bind_texture(glow::TEXTURE_2D, None);

            self.owned_textures.push(tex);
            TextureHandle::from_raw(tex.0.get())
        }
    }

    /// Reads the current framebuffer back as RGBA8, rows bottom-up as GL
    /// delivers them.
    pub fn read_framebuffer_rgba(&self, width: i32, height: i32) -> Vec<u8> {
        let mut pixels = vec![0u8; (width * height * 4) as usize];
        let gl = &self.gl;
        unsafe {
            gl.pixel_store_i32(glow::PACK_ALIGNMENT, 1);
            gl.read_pixels(
                0,
                0,
                width,
                height,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                PixelPackData::Slice(Some(&mut pixels)),
            );
            debug_assert!(gl.get_error() == 0);
        }
        pixels
    }

    /// The context this backend renders through.
    pub fn gl(&self) -> &Arc<glow::Context> { &self.gl }
}

impl DrawBackend for GlowBackend {
    fn vertex_capacity(&self) -> usize { self.buffers.vertex_capacity() }

    fn index_capacity(&self) -> usize { self.buffers.index_capacity() }

    fn set_uniforms(&mut self, block: &UniformBlock) {
        let gl = &self.gl;
        unsafe {
            gl.bind_buffer(glow::UNIFORM_BUFFER, Some(self.ubo));
            gl.buffer_sub_data_u8_slice(glow::UNIFORM_BUFFER, 0, &block.to_std140());
            gl.polygon_mode(
                glow::FRONT_AND_BACK,
                if block.wireframe { glow::LINE } else { glow::FILL },
            );
            debug_assert!(gl.get_error() == 0);
        }
    }

    fn upload_vertices(&mut self, vertices: &[Vertex]) {
        let bytes = unsafe {
            slice::from_raw_parts(
                vertices.as_ptr() as *const u8,
                vertices.len() * core::mem::size_of::<Vertex>(),
            )
        };
        self.buffers.upload_vertex_bytes(&self.gl, bytes);
    }

    fn upload_indices(&mut self, indices: &[u16]) {
        let bytes = unsafe {
            slice::from_raw_parts(indices.as_ptr() as *const u8, indices.len() * core::mem::size_of::<u16>())
        };
        self.buffers.upload_index_bytes(&self.gl, bytes);
    }

    fn set_scissor(&mut self, rect: ScissorRect) {
        unsafe {
            self.gl.scissor(rect.x, rect.y, rect.width, rect.height);
        }
    }

    fn bind_texture(&mut self, texture: TextureHandle) {
        let gl = &self.gl;
        unsafe {
            gl.active_texture(glow::TEXTURE0);
            gl.bind_texture(glow::TEXTURE_2D, NonZeroU32::new(texture.raw()).map(NativeTexture));
        }
    }

    fn draw_indexed(&mut self, element_count: u32, index_offset: u32, vertex_base: i32) {
        let gl = &self.gl;
        unsafe {
            gl.draw_elements_base_vertex(
                glow::TRIANGLES,
                element_count as i32,
                glow::UNSIGNED_SHORT,
                (index_offset as i32) * core::mem::size_of::<u16>() as i32,
                vertex_base,
            );
            debug_assert!(gl.get_error() == 0);
        }
    }
}

impl Drop for GlowBackend {
    fn drop(&mut self) {
        let gl = &self.gl;
        unsafe {
            for tex in self.owned_textures.drain(..).rev() {
                gl.delete_texture(tex);
            }
            gl.delete_buffer(self.ubo);
            self.buffers.destroy(gl);
            gl.delete_vertex_array(self.vao);
            gl.delete_program(self.program);
        }
    }
}
