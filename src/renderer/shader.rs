use wasm_bindgen::prelude::*;
use web_sys::{console, WebGl2RenderingContext, WebGlProgram, WebGlShader, WebGlUniformLocation};

// WebGL constants
pub const COLOR_BUFFER_BIT: u32 = WebGl2RenderingContext::COLOR_BUFFER_BIT;
pub const DEPTH_BUFFER_BIT: u32 = WebGl2RenderingContext::DEPTH_BUFFER_BIT;
pub const TRIANGLES: u32 = WebGl2RenderingContext::TRIANGLES;
pub const FLOAT: u32 = WebGl2RenderingContext::FLOAT;
pub const UNSIGNED_SHORT: u32 = WebGl2RenderingContext::UNSIGNED_SHORT;
pub const ARRAY_BUFFER: u32 = WebGl2RenderingContext::ARRAY_BUFFER;
pub const ELEMENT_ARRAY_BUFFER: u32 = WebGl2RenderingContext::ELEMENT_ARRAY_BUFFER;
pub const DYNAMIC_DRAW: u32 = WebGl2RenderingContext::DYNAMIC_DRAW;
pub const VERTEX_SHADER: u32 = WebGl2RenderingContext::VERTEX_SHADER;
pub const FRAGMENT_SHADER: u32 = WebGl2RenderingContext::FRAGMENT_SHADER;
pub const DEPTH_TEST: u32 = WebGl2RenderingContext::DEPTH_TEST;
pub const FRAMEBUFFER: u32 = WebGl2RenderingContext::FRAMEBUFFER;

// Shader sources for the full-surface blit quad
pub const QUAD_VERTEX_SHADER: &str = r#"#version 300 es
in vec2 a_position;
in vec2 a_texcoord;
out vec2 v_texcoord;
void main() {
    v_texcoord = a_texcoord;
    gl_Position = vec4(a_position, 0.0, 1.0);
}
"#;

pub const QUAD_FRAGMENT_SHADER: &str = r#"#version 300 es
precision mediump float;
uniform sampler2D u_texture;
in vec2 v_texcoord;
out vec4 fragColor;
void main() {
    fragColor = texture(u_texture, v_texcoord);
}
"#;

/// Linked vertex/fragment program with cached attribute and uniform locations.
///
/// The fixed interface is two attributes (`a_position`, `a_texcoord`) and
/// three uniforms (`u_projectionMatrix`, `u_viewMatrix`, `u_texture`).
/// Locations are resolved once at construction; a name missing from the
/// program source resolves to `-1` / `None` and stays that way.
pub struct ShaderProgram {
    program: WebGlProgram,
    vertex_shader: WebGlShader,
    fragment_shader: WebGlShader,

    position_location: i32,
    texcoord_location: i32,

    projection_matrix_location: Option<WebGlUniformLocation>,
    view_matrix_location: Option<WebGlUniformLocation>,
    sampler_location: Option<WebGlUniformLocation>,
}

impl ShaderProgram {
    /// Compile and link a program from vertex and fragment source.
    ///
    /// A failed compile of either stage is reported to the browser console
    /// and construction continues; the resulting program is still returned
    /// and draw calls through it produce blank output. Only failure to
    /// allocate the native objects is an error.
    pub fn new(
        gl: &WebGl2RenderingContext,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ShaderProgram, JsValue> {
        let vertex_shader = gl
            .create_shader(VERTEX_SHADER)
            .ok_or_else(|| JsValue::from_str("Unable to create vertex shader object"))?;
        let fragment_shader = gl
            .create_shader(FRAGMENT_SHADER)
            .ok_or_else(|| JsValue::from_str("Unable to create fragment shader object"))?;

        gl.shader_source(&vertex_shader, vertex_source);
        gl.shader_source(&fragment_shader, fragment_source);

        gl.compile_shader(&vertex_shader);
        gl.compile_shader(&fragment_shader);

        let program = gl
            .create_program()
            .ok_or_else(|| JsValue::from_str("Unable to create shader program"))?;
        gl.attach_shader(&program, &vertex_shader);
        gl.attach_shader(&program, &fragment_shader);
        gl.link_program(&program);

        log_compile_error(gl, &vertex_shader, "Vertex shader error");
        log_compile_error(gl, &fragment_shader, "Fragment shader error");

        let projection_matrix_location = gl.get_uniform_location(&program, "u_projectionMatrix");
        let view_matrix_location = gl.get_uniform_location(&program, "u_viewMatrix");
        let sampler_location = gl.get_uniform_location(&program, "u_texture");

        let position_location = gl.get_attrib_location(&program, "a_position");
        let texcoord_location = gl.get_attrib_location(&program, "a_texcoord");

        Ok(ShaderProgram {
            program,
            vertex_shader,
            fragment_shader,
            position_location,
            texcoord_location,
            projection_matrix_location,
            view_matrix_location,
            sampler_location,
        })
    }

    /// Make the program current.
    pub fn use_program(&self, gl: &WebGl2RenderingContext) {
        gl.use_program(Some(&self.program));
    }

    /// Cached location of `a_position` (`-1` if absent).
    pub fn position_location(&self) -> i32 {
        self.position_location
    }

    /// Cached location of `a_texcoord` (`-1` if absent).
    pub fn texcoord_location(&self) -> i32 {
        self.texcoord_location
    }

    /// Look up an attribute location by name, re-querying the program.
    pub fn attribute_location(&self, gl: &WebGl2RenderingContext, name: &str) -> i32 {
        gl.get_attrib_location(&self.program, name)
    }

    /// Look up a uniform location by name, re-querying the program.
    pub fn uniform_location(
        &self,
        gl: &WebGl2RenderingContext,
        name: &str,
    ) -> Option<WebGlUniformLocation> {
        gl.get_uniform_location(&self.program, name)
    }

    /// Upload the 3x3 projection matrix.
    pub fn apply_projection_matrix(&self, gl: &WebGl2RenderingContext, matrix: &[f32; 9]) {
        gl.uniform_matrix3fv_with_f32_array(self.projection_matrix_location.as_ref(), false, matrix);
    }

    /// Upload the 3x3 view matrix.
    pub fn apply_view_matrix(&self, gl: &WebGl2RenderingContext, matrix: &[f32; 9]) {
        gl.uniform_matrix3fv_with_f32_array(self.view_matrix_location.as_ref(), false, matrix);
    }

    /// Point the sampler uniform at a texture unit. The program must be
    /// current.
    pub fn set_sampler_unit(&self, gl: &WebGl2RenderingContext, unit: i32) {
        gl.uniform1i(self.sampler_location.as_ref(), unit);
    }

    /// Release both shader stages and the program.
    pub fn destroy(self, gl: &WebGl2RenderingContext) {
        gl.delete_shader(Some(&self.vertex_shader));
        gl.delete_shader(Some(&self.fragment_shader));
        gl.delete_program(Some(&self.program));
    }
}

/// Report a stage's compile failure to the console, if any.
fn log_compile_error(gl: &WebGl2RenderingContext, shader: &WebGlShader, stage: &str) {
    if !gl
        .get_shader_parameter(shader, WebGl2RenderingContext::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        let error = gl
            .get_shader_info_log(shader)
            .unwrap_or_else(|| "Unknown error".to_string());
        console::error_1(&format!("{}: {}", stage, error).into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_shaders_declare_blit_interface() {
        assert!(QUAD_VERTEX_SHADER.contains("in vec2 a_position"));
        assert!(QUAD_VERTEX_SHADER.contains("in vec2 a_texcoord"));
        assert!(QUAD_FRAGMENT_SHADER.contains("uniform sampler2D u_texture"));
    }

    #[test]
    fn quad_shaders_agree_on_varying() {
        assert!(QUAD_VERTEX_SHADER.contains("out vec2 v_texcoord"));
        assert!(QUAD_FRAGMENT_SHADER.contains("in vec2 v_texcoord"));
    }
}
