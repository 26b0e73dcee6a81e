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
use log::warn;

use super::*;

#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
/// Counters for one fully replayed frame.
pub struct FrameStats {
    /// Lists replayed (per pass).
    pub lists: usize,
    /// Indexed draws issued.
    pub draw_calls: usize,
    /// Vertex bytes uploaded.
    pub vertex_bytes: usize,
    /// Index bytes uploaded.
    pub index_bytes: usize,
}

/// Replays [`FrameDrawData`] onto a [`DrawBackend`].
///
/// Each list costs at most one vertex and one index buffer rewrite per pass,
/// never one per command. Lists and commands execute strictly in submission
/// order; the UI layer depends on painter's ordering for overlapping
/// translucent quads.
pub struct ReplayEngine<B: DrawBackend> {
    backend: B,
    mode: RenderMode,
}

impl<B: DrawBackend> ReplayEngine<B> {
    /// Creates an engine over `backend` with the render mode fixed for the
    /// engine's lifetime.
    pub fn new(backend: B, mode: RenderMode) -> Self {
        Self { backend, mode }
    }

    /// Returns the render mode chosen at startup.
    pub fn mode(&self) -> RenderMode { self.mode }

    /// Shared access to the backend.
    pub fn backend(&self) -> &B { &self.backend }

    /// Exclusive access to the backend, e.g. for frame setup or texture
    /// creation.
    pub fn backend_mut(&mut self) -> &mut B { &mut self.backend }

    /// Consumes the engine and hands the backend back.
    pub fn into_backend(self) -> B { self.backend }

    /// Replays one frame against a `framebuffer_width` by
    /// `framebuffer_height` target.
    ///
    /// A list whose payload exceeds buffer capacity, or that carries an
    /// out-of-range command, is skipped in full before anything is uploaded;
    /// the remaining lists still replay and the scissor region is restored
    /// to the full framebuffer afterwards, so a bad list degrades exactly
    /// one frame. The first such failure is returned once the frame is done.
    pub fn replay(
        &mut self,
        frame: &FrameDrawData,
        framebuffer_width: i32,
        framebuffer_height: i32,
    ) -> Result<FrameStats, ReplayError> {
        if !(frame.display_size.x > 0.0 && frame.display_size.y > 0.0) {
            return Err(ReplayError::BadDisplaySize {
                width: frame.display_size.x,
                height: frame.display_size.y,
            });
        }

        let projection = ui_projection(frame.display_origin, frame.display_size);
        let mut stats = FrameStats::default();
        let mut first_error = None;

        for wireframe in self.mode.wireframe_passes() {
            self.backend.set_uniforms(&UniformBlock { projection, wireframe: *wireframe });

            for (li, list) in frame.lists.iter().enumerate() {
                if let Err(err) = self.replay_list(li, list, framebuffer_height, &mut stats) {
                    warn!("skipping draw list {}: {}", li, err);
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        self.backend.set_scissor(ScissorRect::full(framebuffer_width, framebuffer_height));

        match first_error {
            Some(err) => Err(err),
            None => Ok(stats),
        }
    }

    fn replay_list(
        &mut self,
        li: usize,
        list: &DrawCommandList,
        framebuffer_height: i32,
        stats: &mut FrameStats,
    ) -> Result<(), ReplayError> {
        if list.commands().is_empty() {
            return Ok(());
        }

        // Everything is validated before the first upload so a failing list
        // never leaves the buffers half written.
        let vertex_bytes = list.vertex_bytes();
        if vertex_bytes > self.backend.vertex_capacity() {
            return Err(ReplayError::VertexBufferOverflow {
                list: li,
                required: vertex_bytes,
                capacity: self.backend.vertex_capacity(),
            });
        }
        let index_bytes = list.index_bytes();
        if index_bytes > self.backend.index_capacity() {
            return Err(ReplayError::IndexBufferOverflow {
                list: li,
                required: index_bytes,
                capacity: self.backend.index_capacity(),
            });
        }
        for (ci, cmd) in list.commands().iter().enumerate() {
            if !list.command_in_bounds(cmd) {
                return Err(ReplayError::IndexRangeOutOfBounds {
                    list: li,
                    command: ci,
                    index_offset: cmd.index_offset,
                    element_count: cmd.element_count,
                    index_len: list.indices().len(),
                });
            }
        }

        self.backend.upload_vertices(list.vertices());
        self.backend.upload_indices(list.indices());
        stats.vertex_bytes += vertex_bytes;
        stats.index_bytes += index_bytes;

        for cmd in list.commands() {
            if cmd.element_count == 0 {
                continue;
            }
            self.backend.set_scissor(scissor_from_clip(&cmd.clip_rect, framebuffer_height));
            self.backend.bind_texture(cmd.texture);
            self.backend.draw_indexed(cmd.element_count, cmd.index_offset, cmd.vertex_base_offset);
            stats.draw_calls += 1;
        }
        stats.lists += 1;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Clone)]
    enum Call {
        Uniforms { wireframe: bool },
        UploadVertices(usize),
        UploadIndices(usize),
        Scissor(ScissorRect),
        Bind(TextureHandle),
        Draw { element_count: u32, index_offset: u32, vertex_base: i32 },
    }

    struct RecordingBackend {
        vertex_capacity: usize,
        index_capacity: usize,
        calls: Vec<Call>,
    }

    impl RecordingBackend {
        fn new(vertex_capacity: usize, index_capacity: usize) -> Self {
            Self { vertex_capacity, index_capacity, calls: Vec::new() }
        }

        fn uploads(&self) -> usize {
            self.calls
                .iter()
                .filter(|c| matches!(c, Call::UploadVertices(_) | Call::UploadIndices(_)))
                .count()
        }

        fn draws(&self) -> Vec<(u32, u32, i32)> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Draw { element_count, index_offset, vertex_base } => {
                        Some((*element_count, *index_offset, *vertex_base))
                    }
                    _ => None,
                })
                .collect()
        }
    }

    impl DrawBackend for RecordingBackend {
        fn vertex_capacity(&self) -> usize { self.vertex_capacity }
        fn index_capacity(&self) -> usize { self.index_capacity }
        fn set_uniforms(&mut self, block: &UniformBlock) {
            self.calls.push(Call::Uniforms { wireframe: block.wireframe });
        }
        fn upload_vertices(&mut self, vertices: &[Vertex]) {
            self.calls.push(Call::UploadVertices(vertices.len()));
        }
        fn upload_indices(&mut self, indices: &[u16]) {
            self.calls.push(Call::UploadIndices(indices.len()));
        }
        fn set_scissor(&mut self, rect: ScissorRect) { self.calls.push(Call::Scissor(rect)); }
        fn bind_texture(&mut self, texture: TextureHandle) { self.calls.push(Call::Bind(texture)); }
        fn draw_indexed(&mut self, element_count: u32, index_offset: u32, vertex_base: i32) {
            self.calls.push(Call::Draw { element_count, index_offset, vertex_base });
        }
    }

    fn triangle_list(texture: TextureHandle, clip: ClipRect) -> DrawCommandList {
        let white = color4b(0xFF, 0xFF, 0xFF, 0xFF);
        let mut list = DrawCommandList::new();
        list.push_raw(
            &[
                Vertex::new(Vec2f::new(0.0, 0.0), Vec2f::new(0.0, 0.0), white),
                Vertex::new(Vec2f::new(10.0, 0.0), Vec2f::new(1.0, 0.0), white),
                Vertex::new(Vec2f::new(0.0, 10.0), Vec2f::new(0.0, 1.0), white),
            ],
            &[0, 1, 2],
        );
        list.push_command(DrawCommand {
            clip_rect: clip,
            element_count: 3,
            index_offset: 0,
            vertex_base_offset: 0,
            texture,
        });
        list
    }

    fn frame_1280x720() -> FrameDrawData {
        FrameDrawData::new(Vec2f::new(0.0, 0.0), Vec2f::new(1280.0, 720.0))
    }

    #[test]
    fn empty_frame_performs_no_uploads_or_draws() {
        let mut engine = ReplayEngine::new(RecordingBackend::new(1024, 1024), RenderMode::Solid);
        let stats = engine.replay(&frame_1280x720(), 1280, 720).unwrap();

        assert_eq!(stats, FrameStats::default());
        let backend = engine.into_backend();
        assert_eq!(backend.uploads(), 0);
        assert!(backend.draws().is_empty());
    }

    #[test]
    fn single_command_call_sequence() {
        let tex = TextureHandle::from_raw(7);
        let mut frame = frame_1280x720();
        frame.lists.push(triangle_list(tex, ClipRect::full(1280.0, 720.0)));

        let mut engine = ReplayEngine::new(RecordingBackend::new(1024, 1024), RenderMode::Solid);
        let stats = engine.replay(&frame, 1280, 720).unwrap();

        assert_eq!(stats.draw_calls, 1);
        assert_eq!(stats.lists, 1);
        assert_eq!(
            engine.into_backend().calls,
            vec![
                Call::Uniforms { wireframe: false },
                Call::UploadVertices(3),
                Call::UploadIndices(3),
                Call::Scissor(ScissorRect::full(1280, 720)),
                Call::Bind(tex),
                Call::Draw { element_count: 3, index_offset: 0, vertex_base: 0 },
                Call::Scissor(ScissorRect::full(1280, 720)),
            ]
        );
    }

    #[test]
    fn clip_rect_becomes_flipped_scissor() {
        let tex = TextureHandle::from_raw(1);
        let mut frame = frame_1280x720();
        frame.lists.push(triangle_list(tex, ClipRect::new(10.0, 20.0, 110.0, 220.0)));

        let mut engine = ReplayEngine::new(RecordingBackend::new(1024, 1024), RenderMode::Solid);
        engine.replay(&frame, 1280, 720).unwrap();

        let backend = engine.into_backend();
        assert_eq!(
            backend.calls[3],
            Call::Scissor(ScissorRect { x: 10, y: 720 - 220, width: 100, height: 200 })
        );
    }

    #[test]
    fn oversized_list_is_skipped_without_uploads() {
        let tex = TextureHandle::from_raw(1);
        let mut frame = frame_1280x720();
        frame.lists.push(triangle_list(tex, ClipRect::full(1280.0, 720.0)));
        frame.lists.push(triangle_list(tex, ClipRect::full(1280.0, 720.0)));

        let white = color4b(0xFF, 0xFF, 0xFF, 0xFF);
        let mut big = DrawCommandList::new();
        for i in 0..8 {
            let x = i as f32;
            big.push_quad([
                Vertex::new(Vec2f::new(x, 0.0), Vec2f::new(0.0, 0.0), white),
                Vertex::new(Vec2f::new(x + 1.0, 0.0), Vec2f::new(1.0, 0.0), white),
                Vertex::new(Vec2f::new(x + 1.0, 1.0), Vec2f::new(1.0, 1.0), white),
                Vertex::new(Vec2f::new(x, 1.0), Vec2f::new(0.0, 1.0), white),
            ]);
        }
        big.commit(ClipRect::full(1280.0, 720.0), tex);
        frame.lists.insert(0, big);

        // 8 quads * 4 vertices * 20 bytes = 640 > 100; triangles are 60 <= 100.
        let mut engine = ReplayEngine::new(RecordingBackend::new(100, 1024), RenderMode::Solid);
        let err = engine.replay(&frame, 1280, 720).unwrap_err();

        assert_eq!(
            err,
            ReplayError::VertexBufferOverflow { list: 0, required: 640, capacity: 100 }
        );
        let backend = engine.into_backend();
        // only the two intact lists uploaded, two buffers each
        assert_eq!(backend.uploads(), 4);
        assert_eq!(backend.draws().len(), 2);
    }

    #[test]
    fn out_of_range_command_skips_its_list() {
        let tex = TextureHandle::from_raw(1);
        let mut list = triangle_list(tex, ClipRect::full(1280.0, 720.0));
        list.push_command(DrawCommand {
            clip_rect: ClipRect::full(1280.0, 720.0),
            element_count: 3,
            index_offset: 1,
            vertex_base_offset: 0,
            texture: tex,
        });
        let mut frame = frame_1280x720();
        frame.lists.push(list);
        frame.lists.push(triangle_list(tex, ClipRect::full(1280.0, 720.0)));

        let mut engine = ReplayEngine::new(RecordingBackend::new(1024, 1024), RenderMode::Solid);
        let err = engine.replay(&frame, 1280, 720).unwrap_err();

        assert_eq!(
            err,
            ReplayError::IndexRangeOutOfBounds {
                list: 0,
                command: 1,
                index_offset: 1,
                element_count: 3,
                index_len: 3,
            }
        );
        let backend = engine.into_backend();
        assert_eq!(backend.uploads(), 2);
        assert_eq!(backend.draws().len(), 1);
    }

    #[test]
    fn base_vertex_offsets_pass_through_disjoint() {
        let tex = TextureHandle::from_raw(1);
        let first = triangle_list(tex, ClipRect::full(1280.0, 720.0));

        let geometry = triangle_list(tex, ClipRect::full(1280.0, 720.0));
        let mut second = DrawCommandList::new();
        second.push_raw(geometry.vertices(), geometry.indices());
        second.push_command(DrawCommand {
            clip_rect: ClipRect::full(1280.0, 720.0),
            element_count: 3,
            index_offset: 0,
            vertex_base_offset: 3,
            texture: tex,
        });

        let mut frame = frame_1280x720();
        frame.lists.push(first);
        frame.lists.push(second);

        let mut engine = ReplayEngine::new(RecordingBackend::new(1024, 1024), RenderMode::Solid);
        engine.replay(&frame, 1280, 720).unwrap();

        let draws = engine.into_backend().draws();
        assert_eq!(draws, vec![(3, 0, 0), (3, 0, 3)]);

        // the first draw's highest biased index stays below the second
        // draw's base, so neither list can address the other's vertices
        let first_top = draws[0].2 + 2;
        assert!(first_top < draws[1].2);
    }

    #[test]
    fn wireframe_overlay_replays_each_list_twice() {
        let tex = TextureHandle::from_raw(1);
        let mut frame = frame_1280x720();
        frame.lists.push(triangle_list(tex, ClipRect::full(1280.0, 720.0)));

        let mut engine = ReplayEngine::new(
            RecordingBackend::new(1024, 1024),
            RenderMode::SolidWithWireframeOverlay,
        );
        let stats = engine.replay(&frame, 1280, 720).unwrap();

        assert_eq!(stats.draw_calls, 2);
        let backend = engine.into_backend();
        let uniforms: Vec<_> = backend
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Uniforms { wireframe } => Some(*wireframe),
                _ => None,
            })
            .collect();
        assert_eq!(uniforms, vec![false, true]);
        assert_eq!(backend.uploads(), 4);
    }

    #[test]
    fn zero_or_negative_display_size_is_rejected() {
        let mut engine = ReplayEngine::new(RecordingBackend::new(1024, 1024), RenderMode::Solid);

        let frame = FrameDrawData::new(Vec2f::new(0.0, 0.0), Vec2f::new(0.0, 720.0));
        let err = engine.replay(&frame, 1280, 720).unwrap_err();
        assert_eq!(err, ReplayError::BadDisplaySize { width: 0.0, height: 720.0 });
        assert!(engine.backend().calls.is_empty());
    }
}
