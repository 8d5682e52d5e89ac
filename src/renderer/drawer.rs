use web_sys::WebGl2RenderingContext;

use super::shader::{COLOR_BUFFER_BIT, DEPTH_BUFFER_BIT, DEPTH_TEST, TRIANGLES, UNSIGNED_SHORT};

/// Stateless clear/draw helper.
#[derive(Default)]
pub struct Drawer;

impl Drawer {
    /// Set the background color, enable depth testing and clear both the
    /// color and depth buffers.
    pub fn clear(&self, gl: &WebGl2RenderingContext) {
        gl.clear_color(0.5, 0.5, 0.5, 0.9);
        gl.enable(DEPTH_TEST);
        gl.clear(COLOR_BUFFER_BIT | DEPTH_BUFFER_BIT);
    }

    /// Issue one indexed triangle draw of `index_count` 16-bit indices from
    /// the currently bound index buffer.
    pub fn draw(&self, gl: &WebGl2RenderingContext, index_count: i32) {
        gl.draw_elements_with_i32(TRIANGLES, index_count, UNSIGNED_SHORT, 0);
    }
}
