use js_sys::{Float32Array, Uint16Array};
use wasm_bindgen::prelude::*;
use web_sys::{WebGl2RenderingContext, WebGlBuffer};

use super::shader::{ARRAY_BUFFER, DYNAMIC_DRAW, ELEMENT_ARRAY_BUFFER, FLOAT};

/// Binding target for a [`VertexBuffer`].
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum BufferTarget {
    /// Per-vertex attribute data, stored as 32-bit floats.
    Vertex,
    /// Triangle indices, stored as unsigned 16-bit integers.
    Index,
}

impl BufferTarget {
    fn gl_target(self) -> u32 {
        match self {
            BufferTarget::Vertex => ARRAY_BUFFER,
            BufferTarget::Index => ELEMENT_ARRAY_BUFFER,
        }
    }
}

/// Wrapper around one native buffer object.
pub struct VertexBuffer {
    buffer: WebGlBuffer,
    target: u32,
    len: usize,
}

impl VertexBuffer {
    pub fn new(gl: &WebGl2RenderingContext, target: BufferTarget) -> Result<VertexBuffer, JsValue> {
        let buffer = gl
            .create_buffer()
            .ok_or_else(|| JsValue::from_str("Failed to create buffer"))?;

        Ok(VertexBuffer {
            buffer,
            target: target.gl_target(),
            len: 0,
        })
    }

    /// Make the buffer current on its target.
    pub fn bind(&self, gl: &WebGl2RenderingContext) {
        gl.bind_buffer(self.target, Some(&self.buffer));
    }

    /// Point a float attribute of `dimensions` components at the buffer and
    /// enable it. Only meaningful for a vertex-target buffer; calling this on
    /// an index-target buffer is left to the underlying API to reject.
    pub fn attach_attribute(&self, gl: &WebGl2RenderingContext, location: u32, dimensions: i32) {
        self.bind(gl);
        gl.vertex_attrib_pointer_with_i32(location, dimensions, FLOAT, false, 0, 0);
        gl.enable_vertex_attrib_array(location);
    }

    /// Replace the buffer's entire contents. An index-target buffer narrows
    /// the data to unsigned 16-bit integers; a vertex-target buffer uploads
    /// 32-bit floats.
    pub fn upload(&mut self, gl: &WebGl2RenderingContext, data: &[f32]) {
        self.bind(gl);

        if self.target == ELEMENT_ARRAY_BUFFER {
            let indices = narrow_indices(data);
            unsafe {
                let array = Uint16Array::view(&indices);
                gl.buffer_data_with_array_buffer_view(self.target, &array, DYNAMIC_DRAW);
            }
        } else {
            unsafe {
                let array = Float32Array::view(data);
                gl.buffer_data_with_array_buffer_view(self.target, &array, DYNAMIC_DRAW);
            }
        }

        self.len = data.len();
    }

    /// Element count from the last upload.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bind the target to nothing.
    pub fn unbind(&self, gl: &WebGl2RenderingContext) {
        gl.bind_buffer(self.target, None);
    }

    /// Release the native buffer. Consumes the wrapper; the handle cannot be
    /// reused afterwards.
    pub fn destroy(self, gl: &WebGl2RenderingContext) {
        gl.bind_buffer(self.target, None);
        gl.delete_buffer(Some(&self.buffer));
    }
}

/// Narrow a flat numeric array to the 16-bit index encoding.
fn narrow_indices(data: &[f32]) -> Vec<u16> {
    data.iter().map(|&value| value as u16).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_indices_narrow_to_u16() {
        let indices = narrow_indices(&[0.0, 1.0, 2.0, 0.0, 2.0, 3.0]);
        assert_eq!(indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn narrowing_truncates_fractions() {
        assert_eq!(narrow_indices(&[2.9, 0.1]), vec![2, 0]);
    }

    #[test]
    fn narrowing_saturates_out_of_range_values() {
        assert_eq!(narrow_indices(&[-1.0]), vec![0]);
        assert_eq!(narrow_indices(&[70000.0]), vec![u16::MAX]);
    }

    #[test]
    fn targets_map_to_gl_enums() {
        assert_eq!(BufferTarget::Vertex.gl_target(), ARRAY_BUFFER);
        assert_eq!(BufferTarget::Index.gl_target(), ELEMENT_ARRAY_BUFFER);
    }
}
