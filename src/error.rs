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
use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
/// Recoverable failures raised while replaying one frame.
///
/// All variants degrade a single frame: the offending list is skipped, the
/// remaining lists still replay, and the next frame starts from clean state.
pub enum ReplayError {
    /// The frame's display size had a zero or negative component.
    #[error("display size must be strictly positive, got {width}x{height}")]
    BadDisplaySize {
        /// Offending horizontal size.
        width: f32,
        /// Offending vertical size.
        height: f32,
    },
    /// A list's vertex payload exceeds the fixed vertex buffer capacity.
    #[error("list {list}: vertex upload of {required} bytes exceeds capacity of {capacity} bytes")]
    VertexBufferOverflow {
        /// Index of the offending list within the frame.
        list: usize,
        /// Bytes the upload would have needed.
        required: usize,
        /// Fixed capacity of the vertex buffer.
        capacity: usize,
    },
    /// A list's index payload exceeds the fixed index buffer capacity.
    #[error("list {list}: index upload of {required} bytes exceeds capacity of {capacity} bytes")]
    IndexBufferOverflow {
        /// Index of the offending list within the frame.
        list: usize,
        /// Bytes the upload would have needed.
        required: usize,
        /// Fixed capacity of the index buffer.
        capacity: usize,
    },
    /// A command addresses indices past the end of its list's index buffer.
    #[error("list {list}, command {command}: indices {index_offset}+{element_count} exceed buffer length {index_len}")]
    IndexRangeOutOfBounds {
        /// Index of the offending list within the frame.
        list: usize,
        /// Index of the offending command within the list.
        command: usize,
        /// First index the command would have read.
        index_offset: u32,
        /// Number of indices the command would have read.
        element_count: u32,
        /// Length of the list's index buffer, in elements.
        index_len: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Pipeline stage a shader failure originated from.
pub enum ShaderStage {
    /// Vertex stage.
    Vertex,
    /// Fragment stage.
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

#[derive(Debug, Error)]
/// Shader pipeline failures. Always fatal at startup: a broken program handle
/// renders nothing useful, so initialization aborts instead of limping on.
pub enum ShaderError {
    /// A stage failed to compile; `log` carries the driver's info log.
    #[error("{stage} shader compilation failed: {log}")]
    Compile {
        /// Stage that failed.
        stage: ShaderStage,
        /// Driver info log.
        log: String,
    },
    /// The program failed to link.
    #[error("program link failed: {log}")]
    Link {
        /// Driver info log.
        log: String,
    },
}

#[derive(Debug, Error)]
/// Fatal initialization failures for the frame driver and asset loading.
pub enum InitError {
    /// The windowing layer could not be brought up.
    #[error("window creation failed: {0}")]
    Window(String),
    /// A GL context could not be created or made current.
    #[error("GL context creation failed: {0}")]
    Context(String),
    /// A required asset file could not be read.
    #[error("cannot read '{path}': {source}")]
    Asset {
        /// Path that was attempted.
        path: String,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// A font file was read but could not be parsed.
    #[error("font load failed: {0}")]
    Font(String),
    /// Shader compilation or linking failed during startup.
    #[error(transparent)]
    Shader(#[from] ShaderError),
}
