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
use glow::*;

/// Fixed-capacity dynamic vertex and index buffers, allocated once and
/// rewritten wholesale for each draw list. The replay engine checks payload
/// sizes against the capacities before calling the upload methods.
pub(crate) struct BufferPool {
    vbo: NativeBuffer,
    ibo: NativeBuffer,
    vertex_capacity: usize,
    index_capacity: usize,
}

impl BufferPool {
    pub(crate) fn new(gl: &glow::Context, vertex_capacity: usize, index_capacity: usize) -> Self {
        unsafe {
            let vbo = gl.create_buffer().expect("Cannot create vertex buffer");
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_size(glow::ARRAY_BUFFER, vertex_capacity as i32, glow::DYNAMIC_DRAW);
            debug_assert!(gl.get_error() == 0);

            let ibo = gl.create_buffer().expect("Cannot create index buffer");
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ibo));
            gl.buffer_data_size(glow::ELEMENT_ARRAY_BUFFER, index_capacity as i32, glow::DYNAMIC_DRAW);
            debug_assert!(gl.get_error() == 0);

            Self { vbo, ibo, vertex_capacity, index_capacity }
        }
    }

    pub(crate) fn vbo(&self) -> NativeBuffer { self.vbo }

    pub(crate) fn vertex_capacity(&self) -> usize { self.vertex_capacity }

    pub(crate) fn index_capacity(&self) -> usize { self.index_capacity }

    pub(crate) fn upload_vertex_bytes(&self, gl: &glow::Context, bytes: &[u8]) {
        debug_assert!(bytes.len() <= self.vertex_capacity);
        unsafe {
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vbo));
            gl.buffer_sub_data_u8_slice(glow::ARRAY_BUFFER, 0, bytes);
            debug_assert!(gl.get_error() == 0);
        }
    }

    pub(crate) fn upload_index_bytes(&self, gl: &glow::Context, bytes: &[u8]) {
        debug_assert!(bytes.len() <= self.index_capacity);
        unsafe {
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(self.ibo));
            gl.buffer_sub_data_u8_slice(glow::ELEMENT_ARRAY_BUFFER, 0, bytes);
            debug_assert!(gl.get_error() == 0);
        }
    }

    pub(crate) fn destroy(&self, gl: &glow::Context) {
        unsafe {
            gl.delete_buffer(self.ibo);
            gl.delete_buffer(self.vbo);
        }
    }
}
