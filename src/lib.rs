pub mod renderer;

use crate::renderer::drawer::Drawer;
use crate::renderer::{canvas_size, OffscreenCanvas};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::WebGl2RenderingContext;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen]
pub fn init_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// One-shot entry point: find the page's canvas element, acquire a WebGL 2
/// context and perform a single bind -> clear -> composite pass.
#[wasm_bindgen]
pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("No document"))?;
    let canvas = document
        .get_element_by_id("canvas")
        .ok_or_else(|| JsValue::from_str("No canvas element"))?
        .dyn_into::<web_sys::HtmlCanvasElement>()?;
    let gl = canvas
        .get_context("webgl2")?
        .ok_or_else(|| JsValue::from_str("WebGL 2 not available"))?
        .dyn_into::<WebGl2RenderingContext>()?;

    let offscreen = OffscreenCanvas::new(&gl, canvas.width(), canvas.height())?;
    let drawer = Drawer::default();

    offscreen.bind_to_canvas(&gl);
    drawer.clear(&gl);
    offscreen.draw_canvas(&gl)?;

    Ok(())
}

/// Stateful compositor around an offscreen render target
#[wasm_bindgen]
#[derive(Default)]
pub struct CanvasCompositor {
    gl: Option<WebGl2RenderingContext>,
    canvas: Option<OffscreenCanvas>,
    drawer: Drawer,
}

#[wasm_bindgen]
impl CanvasCompositor {
    /// Create a new CanvasCompositor instance
    #[wasm_bindgen(constructor)]
    pub fn new() -> CanvasCompositor {
        CanvasCompositor::default()
    }

    /// Initialize with a WebGL 2.0 context
    ///
    /// Allocates the offscreen render target at the canvas's current
    /// dimensions.
    ///
    /// # Arguments
    /// * `gl` - WebGL 2.0 rendering context from canvas
    ///
    /// # Returns
    /// * `"init_done"` signal on success
    pub fn init(&mut self, gl: WebGl2RenderingContext) -> Result<String, JsValue> {
        let (width, height) = canvas_size(&gl)?;
        self.canvas = Some(OffscreenCanvas::new(&gl, width, height)?);
        self.gl = Some(gl);
        Ok("init_done".to_string())
    }

    /// Clear the offscreen target and composite it to the visible canvas
    ///
    /// # Returns
    /// * `"render_done"` signal on success
    pub fn render(&self) -> Result<String, JsValue> {
        let gl = self.gl.as_ref().ok_or_else(|| {
            JsValue::from_str("Compositor not initialized. Call init() first.")
        })?;
        let canvas = self.canvas.as_ref().ok_or_else(|| {
            JsValue::from_str("Compositor not initialized. Call init() first.")
        })?;

        canvas.bind_to_canvas(gl);
        self.drawer.clear(gl);
        canvas.draw_canvas(gl)?;
        Ok("render_done".to_string())
    }

    /// Rebuild the offscreen target when canvas dimensions change
    /// (e.g. fullscreen)
    ///
    /// # Returns
    /// * `"resize_done"` signal on success
    pub fn resize(&mut self) -> Result<String, JsValue> {
        let gl = self.gl.as_ref().ok_or_else(|| {
            JsValue::from_str("Compositor not initialized. Call init() first.")
        })?;

        let (width, height) = canvas_size(gl)?;
        if let Some(old) = self.canvas.take() {
            old.destroy(gl);
        }
        self.canvas = Some(OffscreenCanvas::new(gl, width, height)?);
        Ok("resize_done".to_string())
    }

    /// Release every GL resource held by the compositor
    ///
    /// # Returns
    /// * `"clear_done"` signal on success
    pub fn clear(&mut self) -> Result<String, JsValue> {
        let gl = self.gl.as_ref().ok_or_else(|| {
            JsValue::from_str("Compositor not initialized. Call init() first.")
        })?;

        if let Some(canvas) = self.canvas.take() {
            canvas.destroy(gl);
        }
        Ok("clear_done".to_string())
    }
}
