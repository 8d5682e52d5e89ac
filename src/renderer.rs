pub mod buffer;
pub mod drawer;
pub mod shader;
pub mod texture;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{WebGl2RenderingContext, WebGlFramebuffer};

use self::buffer::{BufferTarget, VertexBuffer};
use self::shader::{
    ShaderProgram, COLOR_BUFFER_BIT, FRAMEBUFFER, QUAD_FRAGMENT_SHADER, QUAD_VERTEX_SHADER,
    TRIANGLES, UNSIGNED_SHORT,
};
use self::texture::RenderTexture;

// Unit quad spanning the full render target: 4 vertices, 2 triangles
const QUAD_POSITIONS: [f32; 8] = [-1.0, -1.0, 1.0, -1.0, 1.0, 1.0, -1.0, 1.0];
const QUAD_TEXCOORDS: [f32; 8] = [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];
const QUAD_INDICES: [f32; 6] = [0.0, 1.0, 2.0, 0.0, 2.0, 3.0];

/// Offscreen render target composited to the visible canvas as a textured
/// quad.
///
/// Owns a framebuffer with a color texture and depth renderbuffer at a fixed
/// resolution, the unit-quad geometry and the blit shader. The texture's
/// storage dimensions equal the configured resolution for the lifetime of
/// the canvas.
pub struct OffscreenCanvas {
    texture: RenderTexture,
    framebuffer: WebGlFramebuffer,

    position_buffer: VertexBuffer,
    texcoord_buffer: VertexBuffer,
    index_buffer: VertexBuffer,

    shader: ShaderProgram,

    resolution_width: u32,
    resolution_height: u32,
}

impl OffscreenCanvas {
    pub fn new(
        gl: &WebGl2RenderingContext,
        resolution_width: u32,
        resolution_height: u32,
    ) -> Result<OffscreenCanvas, JsValue> {
        let mut position_buffer = VertexBuffer::new(gl, BufferTarget::Vertex)?;
        let mut texcoord_buffer = VertexBuffer::new(gl, BufferTarget::Vertex)?;
        let mut index_buffer = VertexBuffer::new(gl, BufferTarget::Index)?;

        let mut texture = RenderTexture::new(gl, resolution_width, resolution_height)?;

        let framebuffer = gl
            .create_framebuffer()
            .ok_or_else(|| JsValue::from_str("Failed to create framebuffer"))?;
        gl.bind_framebuffer(FRAMEBUFFER, Some(&framebuffer));
        texture.attach_to_framebuffer(gl)?;
        gl.bind_framebuffer(FRAMEBUFFER, None);

        position_buffer.upload(gl, &QUAD_POSITIONS);
        texcoord_buffer.upload(gl, &QUAD_TEXCOORDS);
        index_buffer.upload(gl, &QUAD_INDICES);

        let shader = ShaderProgram::new(gl, QUAD_VERTEX_SHADER, QUAD_FRAGMENT_SHADER)?;

        Ok(OffscreenCanvas {
            texture,
            framebuffer,
            position_buffer,
            texcoord_buffer,
            index_buffer,
            shader,
            resolution_width,
            resolution_height,
        })
    }

    /// Redirect subsequent draws into the offscreen framebuffer.
    ///
    /// Unbinds the owned texture first so it is never read and written at
    /// the same time.
    pub fn bind_to_canvas(&self, gl: &WebGl2RenderingContext) {
        self.texture.unbind(gl);
        gl.bind_framebuffer(FRAMEBUFFER, Some(&self.framebuffer));
        gl.viewport(
            0,
            0,
            self.resolution_width as i32,
            self.resolution_height as i32,
        );
    }

    /// Composite the offscreen texture to the visible canvas.
    ///
    /// Restores the default framebuffer, then draws the unit quad with the
    /// owned texture sampled from unit 0, at the canvas's full size.
    pub fn draw_canvas(&self, gl: &WebGl2RenderingContext) -> Result<(), JsValue> {
        self.unbind(gl);
        self.texture.bind(gl, 0);

        let position_location = self.shader.position_location();
        if position_location >= 0 {
            self.position_buffer
                .attach_attribute(gl, position_location as u32, 2);
        }
        let texcoord_location = self.shader.texcoord_location();
        if texcoord_location >= 0 {
            self.texcoord_buffer
                .attach_attribute(gl, texcoord_location as u32, 2);
        }
        self.index_buffer.bind(gl);

        self.shader.use_program(gl);
        self.shader.set_sampler_unit(gl, 0);

        gl.clear(COLOR_BUFFER_BIT);

        let (width, height) = canvas_size(gl)?;
        gl.viewport(0, 0, width as i32, height as i32);

        gl.draw_elements_with_i32(
            TRIANGLES,
            self.index_buffer.len() as i32,
            UNSIGNED_SHORT,
            0,
        );
        Ok(())
    }

    /// Restore the default framebuffer as the render target.
    pub fn unbind(&self, gl: &WebGl2RenderingContext) {
        gl.bind_framebuffer(FRAMEBUFFER, None);
    }

    /// The owned render texture.
    pub fn texture(&self) -> &RenderTexture {
        &self.texture
    }

    /// Configured offscreen resolution.
    pub fn resolution(&self) -> (u32, u32) {
        (self.resolution_width, self.resolution_height)
    }

    /// Release every GL resource the canvas owns: the render texture and its
    /// depth buffer, the framebuffer, the quad buffers and the shader.
    pub fn destroy(self, gl: &WebGl2RenderingContext) {
        gl.bind_framebuffer(FRAMEBUFFER, None);
        gl.delete_framebuffer(Some(&self.framebuffer));

        self.texture.destroy(gl);
        self.position_buffer.destroy(gl);
        self.texcoord_buffer.destroy(gl);
        self.index_buffer.destroy(gl);
        self.shader.destroy(gl);
    }
}

/// Dimensions of the canvas element behind a context.
pub(crate) fn canvas_size(gl: &WebGl2RenderingContext) -> Result<(u32, u32), JsValue> {
    let canvas = gl
        .canvas()
        .ok_or_else(|| JsValue::from_str("No canvas"))?
        .dyn_into::<web_sys::HtmlCanvasElement>()?;
    Ok((canvas.width(), canvas.height()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_has_four_vertices_and_six_indices() {
        assert_eq!(QUAD_POSITIONS.len(), 8);
        assert_eq!(QUAD_TEXCOORDS.len(), 8);
        assert_eq!(QUAD_INDICES.len(), 6);
    }

    #[test]
    fn quad_indices_reference_valid_vertices() {
        let vertex_count = (QUAD_POSITIONS.len() / 2) as f32;
        for &index in QUAD_INDICES.iter() {
            assert!(index >= 0.0);
            assert!(index < vertex_count);
        }
    }

    #[test]
    fn quad_spans_clip_space() {
        for corner in [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]] {
            let found = QUAD_POSITIONS
                .chunks(2)
                .any(|vertex| vertex == &corner[..]);
            assert!(found, "missing quad corner {:?}", corner);
        }
    }

    #[test]
    fn texcoords_cover_unit_square() {
        for &coord in QUAD_TEXCOORDS.iter() {
            assert!((0.0..=1.0).contains(&coord));
        }
    }
}
