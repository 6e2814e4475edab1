//! Program compilation, link, diagnostics, and the fullscreen quad.

use glow::HasContext;
use glslbind_lang::{Payload, Schema, UniformWrite, RESOLUTION};

use crate::error::RenderError;
use crate::locations::LocationTable;
use crate::textures::TextureUnits;

/// Built-in vertex stage: pixel-space quad positions divided by the
/// `resolution` uniform, flipped into clip space.
pub const VERTEX_SHADER: &str = "\
attribute vec2 position;
attribute vec2 texCoord_in;
uniform vec2 resolution;
varying vec2 texCoord;
void main () {
  vec2 zeroToOne = position / resolution;
  vec2 clipSpace = zeroToOne * 2.0 - 1.0;
  gl_Position = vec4(clipSpace * vec2(1, -1), 0, 1);
  texCoord = texCoord_in;
}
";

/// One compiled program and everything whose lifetime is tied to it:
/// the location table, the texture units, and the quad geometry.
/// Recompilation is destructive — a fresh `Program` replaces all of it.
pub struct Program {
    program: glow::NativeProgram,
    vao: glow::NativeVertexArray,
    position_buffer: glow::NativeBuffer,
    texcoord_buffer: glow::NativeBuffer,
    resolution_loc: Option<glow::NativeUniformLocation>,
    locations: LocationTable,
    textures: TextureUnits,
}

impl Program {
    /// Compile, link, and rebuild all per-program state. Compile and link
    /// failures are fatal; the partial objects are deleted before returning.
    pub fn load(
        gl: &glow::Context,
        vertex_src: &str,
        fragment_src: &str,
        schema: &Schema,
    ) -> Result<Self, RenderError> {
        let program = link_program(gl, vertex_src, fragment_src)?;
        unsafe { gl.use_program(Some(program)) };

        let locations = LocationTable::build(gl, program, schema);
        let resolution_loc = unsafe { gl.get_uniform_location(program, RESOLUTION) };

        let (vao, position_buffer, texcoord_buffer) =
            build_quad(gl, program).map_err(|e| {
                unsafe { gl.delete_program(program) };
                RenderError::Resource(e)
            })?;

        Ok(Self {
            program,
            vao,
            position_buffer,
            texcoord_buffer,
            resolution_loc,
            locations,
            textures: TextureUnits::new(),
        })
    }

    pub fn bind(&self, gl: &glow::Context) {
        unsafe {
            gl.use_program(Some(self.program));
            gl.bind_vertex_array(Some(self.vao));
        }
        // unit bindings are global state; other painters on the same
        // context overwrite them between frames
        self.textures.rebind(gl);
    }

    /// Update the viewport, the reserved `resolution` uniform, and the
    /// pixel-space quad positions.
    pub fn set_resolution(&self, gl: &glow::Context, width: i32, height: i32) {
        let (w, h) = (width as f32, height as f32);
        let positions: [f32; 12] = [
            0.0, 0.0,  w, 0.0,  0.0, h,
            0.0, h,    w, 0.0,  w, h,
        ];
        self.bind(gl);
        unsafe {
            gl.viewport(0, 0, width, height);
            gl.uniform_2_f32(self.resolution_loc.as_ref(), w, h);
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.position_buffer));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&positions),
                glow::STATIC_DRAW,
            );
        }
    }

    pub fn draw(&self, gl: &glow::Context) {
        self.bind(gl);
        unsafe { gl.draw_arrays(glow::TRIANGLES, 0, 6) };
    }

    /// Execute one binder command against this program's state.
    pub fn apply(&mut self, gl: &glow::Context, write: &UniformWrite) {
        let loc = self.locations.get(&write.path);
        unsafe {
            match &write.payload {
                Payload::Int(v) => gl.uniform_1_i32(loc, *v),
                Payload::Float(v) => gl.uniform_1_f32(loc, *v),

                Payload::IntVec { arity, v } => match *arity {
                    2 => gl.uniform_2_i32(loc, v[0], v[1]),
                    3 => gl.uniform_3_i32(loc, v[0], v[1], v[2]),
                    _ => gl.uniform_4_i32(loc, v[0], v[1], v[2], v[3]),
                },
                Payload::FloatVec { arity, v } => match *arity {
                    2 => gl.uniform_2_f32(loc, v[0], v[1]),
                    3 => gl.uniform_3_f32(loc, v[0], v[1], v[2]),
                    _ => gl.uniform_4_f32(loc, v[0], v[1], v[2], v[3]),
                },

                Payload::IntArray { components, data } => match *components {
                    1 => gl.uniform_1_i32_slice(loc, data),
                    2 => gl.uniform_2_i32_slice(loc, data),
                    3 => gl.uniform_3_i32_slice(loc, data),
                    _ => gl.uniform_4_i32_slice(loc, data),
                },
                Payload::FloatArray { components, data } => match *components {
                    1 => gl.uniform_1_f32_slice(loc, data),
                    2 => gl.uniform_2_f32_slice(loc, data),
                    3 => gl.uniform_3_f32_slice(loc, data),
                    _ => gl.uniform_4_f32_slice(loc, data),
                },

                Payload::Matrix { order, data } => match *order {
                    2 => gl.uniform_matrix_2_f32_slice(loc, false, data),
                    3 => gl.uniform_matrix_3_f32_slice(loc, false, data),
                    _ => gl.uniform_matrix_4_f32_slice(loc, false, data),
                },

                Payload::Texture(image) => {
                    // needs &mut textures, so re-borrow outside the match arm
                    let loc = loc.copied();
                    self.textures.upload(gl, &write.path, image.as_ref(), loc.as_ref());
                }
            }
        }
    }

    /// Delete every GL object owned by this program.
    pub fn destroy(&mut self, gl: &glow::Context) {
        self.textures.reset(gl);
        unsafe {
            gl.delete_buffer(self.position_buffer);
            gl.delete_buffer(self.texcoord_buffer);
            gl.delete_vertex_array(self.vao);
            gl.delete_program(self.program);
        }
    }
}

// ─── Compilation ─────────────────────────────────────────────────────────────

fn link_program(
    gl: &glow::Context,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<glow::NativeProgram, RenderError> {
    let vs = compile_shader(gl, glow::VERTEX_SHADER, vertex_src)
        .map_err(RenderError::VertexCompile)?;
    let fs = match compile_shader(gl, glow::FRAGMENT_SHADER, fragment_src) {
        Ok(fs) => fs,
        Err(log) => {
            unsafe { gl.delete_shader(vs) };
            return Err(RenderError::FragmentCompile(log));
        }
    };

    unsafe {
        let program = gl
            .create_program()
            .map_err(|e| RenderError::Resource(format!("create_program failed: {e}")))?;
        gl.attach_shader(program, vs);
        gl.attach_shader(program, fs);
        gl.link_program(program);
        gl.detach_shader(program, vs);
        gl.detach_shader(program, fs);
        gl.delete_shader(vs);
        gl.delete_shader(fs);

        if !gl.get_program_link_status(program) {
            let log = gl.get_program_info_log(program);
            gl.delete_program(program);
            return Err(RenderError::Link(log));
        }
        Ok(program)
    }
}

fn compile_shader(gl: &glow::Context, stage: u32, source: &str) -> Result<glow::NativeShader, String> {
    unsafe {
        let shader = gl
            .create_shader(stage)
            .map_err(|e| format!("create_shader failed: {e}"))?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);
        if !gl.get_shader_compile_status(shader) {
            let log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            return Err(annotate_info_log(&log, source));
        }
        Ok(shader)
    }
}

fn build_quad(
    gl: &glow::Context,
    program: glow::NativeProgram,
) -> Result<(glow::NativeVertexArray, glow::NativeBuffer, glow::NativeBuffer), String> {
    // quad texture coordinates, matching the position triangle order
    const TEXCOORDS: [f32; 12] = [
        0.0, 0.0,  1.0, 0.0,  0.0, 1.0,
        0.0, 1.0,  1.0, 0.0,  1.0, 1.0,
    ];
    unsafe {
        let vao = gl.create_vertex_array().map_err(|e| format!("create_vertex_array: {e}"))?;
        gl.bind_vertex_array(Some(vao));

        let texcoord_buffer = match gl.create_buffer() {
            Ok(buffer) => buffer,
            Err(e) => {
                gl.delete_vertex_array(vao);
                return Err(format!("create_buffer: {e}"));
            }
        };
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(texcoord_buffer));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck::cast_slice(&TEXCOORDS),
            glow::STATIC_DRAW,
        );
        if let Some(attrib) = gl.get_attrib_location(program, "texCoord_in") {
            gl.enable_vertex_attrib_array(attrib);
            gl.vertex_attrib_pointer_f32(attrib, 2, glow::FLOAT, false, 0, 0);
        }

        let position_buffer = match gl.create_buffer() {
            Ok(buffer) => buffer,
            Err(e) => {
                gl.delete_buffer(texcoord_buffer);
                gl.delete_vertex_array(vao);
                return Err(format!("create_buffer: {e}"));
            }
        };
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(position_buffer));
        if let Some(attrib) = gl.get_attrib_location(program, "position") {
            gl.enable_vertex_attrib_array(attrib);
            gl.vertex_attrib_pointer_f32(attrib, 2, glow::FLOAT, false, 0, 0);
        }

        Ok((vao, position_buffer, texcoord_buffer))
    }
}

// ─── Diagnostics ─────────────────────────────────────────────────────────────

/// Attach source context to a driver info log. Drivers report positions as
/// `ERROR: <column>:<line>: message` (column is rarely meaningful); we show
/// the offending line with a caret, best effort.
fn annotate_info_log(log: &str, source: &str) -> String {
    let mut out = log.trim_end().to_string();
    if let Some((column, line)) = parse_error_position(log) {
        if let Some(text) = source.lines().nth(line.saturating_sub(1)) {
            out.push('\n');
            out.push_str(text);
            out.push('\n');
            let caret_at = column.min(text.len());
            out.push_str(&" ".repeat(caret_at));
            out.push('^');
        }
    }
    out
}

/// `(column, line)` from the first `<int>:<int>` pair after the severity tag.
fn parse_error_position(log: &str) -> Option<(usize, usize)> {
    let mut parts = log.split(':').skip(1);
    let column = parts.next()?.trim().parse::<usize>().ok()?;
    let line = parts.next()?.trim().parse::<usize>().ok()?;
    Some((column, line))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
