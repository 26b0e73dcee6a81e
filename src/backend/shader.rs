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
use std::fs;

use glow::*;

use crate::{InitError, ShaderError, ShaderStage};

/// Built-in vertex stage for draw-list replay: UI pixel space through the
/// `PerFrameData` projection.
pub const UI_VERTEX_SHADER: &str = "#version 330 core
layout(std140) uniform PerFrameData
{
    mat4 uProjection;
    int uWireframe;
};
layout(location = 0) in vec2 aPosition;
layout(location = 1) in vec2 aTexCoord;
layout(location = 2) in vec4 aColor;
out vec2 vTexCoord;
out vec4 vColor;
void main()
{
    vTexCoord = aTexCoord;
    vColor = aColor;
    gl_Position = uProjection * vec4(aPosition, 0.0, 1.0);
}";

/// Built-in fragment stage: texture-modulated vertex color, or flat vertex
/// color when the wireframe flag is set.
pub const UI_FRAGMENT_SHADER: &str = "#version 330 core
layout(std140) uniform PerFrameData
{
    mat4 uProjection;
    int uWireframe;
};
in vec2 vTexCoord;
in vec4 vColor;
uniform sampler2D uTexture;
out vec4 fragColor;
void main()
{
    if (uWireframe != 0) {
        fragColor = vec4(vColor.rgb, 1.0);
    } else {
        fragColor = vColor * texture(uTexture, vTexCoord);
    }
}";

/// Compiles and links a program from vertex and fragment source.
///
/// Failure is fatal to initialization: partially built shaders and the
/// program object are deleted before the error is returned, and callers are
/// expected to abort startup rather than continue with a broken handle.
pub fn compile_program(
    gl: &glow::Context,
    vertex_source: &str,
    fragment_source: &str,
) -> Result<NativeProgram, ShaderError> {
    unsafe {
        let program = gl.create_program().expect("Cannot create program");

        let shader_sources = [
            (glow::VERTEX_SHADER, ShaderStage::Vertex, vertex_source),
            (glow::FRAGMENT_SHADER, ShaderStage::Fragment, fragment_source),
        ];

        let mut shaders = Vec::with_capacity(shader_sources.len());

        for (shader_type, stage, source) in shader_sources.iter() {
            let shader = gl.create_shader(*shader_type).expect("Cannot create shader");
            gl.shader_source(shader, source);
            gl.compile_shader(shader);
            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                gl.delete_shader(shader);
                for shader in shaders {
                    gl.delete_shader(shader);
                }
                gl.delete_program(program);
                return Err(ShaderError::Compile { stage: *stage, log });
            }
            gl.attach_shader(program, shader);
            shaders.push(shader);
        }

        gl.link_program(program);
        if !gl.get_program_link_status(program) {
            let log = gl.get_program_info_log(program);
            for shader in shaders {
                gl.delete_shader(shader);
            }
            gl.delete_program(program);
            return Err(ShaderError::Link { log });
        }

        for shader in shaders {
            gl.detach_shader(program, shader);
            gl.delete_shader(shader);
        }

        Ok(program)
    }
}

/// Reads GLSL source from a file; a missing file is a startup failure that
/// names the path.
pub fn load_shader_source(path: &str) -> Result<String, InitError> {
    fs::read_to_string(path).map_err(|source| InitError::Asset { path: path.to_string(), source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_shader_file_names_the_path() {
        let err = load_shader_source("res/shaders/missing.vert").unwrap_err();
        match err {
            InitError::Asset { path, .. } => assert_eq!(path, "res/shaders/missing.vert"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn builtin_sources_declare_the_uniform_block() {
        assert!(UI_VERTEX_SHADER.contains("PerFrameData"));
        assert!(UI_FRAGMENT_SHADER.contains("PerFrameData"));
        assert!(UI_FRAGMENT_SHADER.contains("uWireframe"));
    }
}
