use wasm_bindgen::prelude::*;
use web_sys::{
    console, HtmlImageElement, WebGl2RenderingContext, WebGlRenderbuffer, WebGlTexture,
};

/// Wrapper around one native 2D texture.
///
/// Dimensions stay unset until the first upload. Sampling is fixed to
/// nearest filtering with clamp-to-edge wrapping, applied on every upload.
pub struct Texture {
    texture: WebGlTexture,
    width: Option<u32>,
    height: Option<u32>,
}

impl Texture {
    pub fn new(gl: &WebGl2RenderingContext) -> Result<Texture, JsValue> {
        let texture = gl
            .create_texture()
            .ok_or_else(|| JsValue::from_str("Failed to create texture"))?;

        Ok(Texture {
            texture,
            width: None,
            height: None,
        })
    }

    /// Bind to a numbered texture unit. Unit 0 is reserved for the offscreen
    /// canvas's composited output.
    pub fn bind(&self, gl: &WebGl2RenderingContext, unit: u32) {
        gl.active_texture(WebGl2RenderingContext::TEXTURE0 + unit);
        gl.bind_texture(WebGl2RenderingContext::TEXTURE_2D, Some(&self.texture));
    }

    fn apply_parameters(gl: &WebGl2RenderingContext) {
        gl.tex_parameteri(
            WebGl2RenderingContext::TEXTURE_2D,
            WebGl2RenderingContext::TEXTURE_MIN_FILTER,
            WebGl2RenderingContext::NEAREST as i32,
        );
        gl.tex_parameteri(
            WebGl2RenderingContext::TEXTURE_2D,
            WebGl2RenderingContext::TEXTURE_MAG_FILTER,
            WebGl2RenderingContext::NEAREST as i32,
        );
        gl.tex_parameteri(
            WebGl2RenderingContext::TEXTURE_2D,
            WebGl2RenderingContext::TEXTURE_WRAP_S,
            WebGl2RenderingContext::CLAMP_TO_EDGE as i32,
        );
        gl.tex_parameteri(
            WebGl2RenderingContext::TEXTURE_2D,
            WebGl2RenderingContext::TEXTURE_WRAP_T,
            WebGl2RenderingContext::CLAMP_TO_EDGE as i32,
        );
    }

    /// Upload a decoded image's pixels, recording its dimensions.
    ///
    /// A missing image is reported to the console and skipped; the texture's
    /// dimensions are left untouched.
    pub fn upload_image(
        &mut self,
        gl: &WebGl2RenderingContext,
        image: Option<&HtmlImageElement>,
    ) -> Result<(), JsValue> {
        let image = match image {
            Some(image) => image,
            None => {
                console::error_1(&"Image is null".into());
                return Ok(());
            }
        };

        self.bind(gl, 0);
        Self::apply_parameters(gl);
        gl.tex_image_2d_with_u32_and_u32_and_html_image_element(
            WebGl2RenderingContext::TEXTURE_2D,
            0,
            WebGl2RenderingContext::RGBA as i32,
            WebGl2RenderingContext::RGBA,
            WebGl2RenderingContext::UNSIGNED_BYTE,
            image,
        )?;

        self.width = Some(image.width());
        self.height = Some(image.height());
        Ok(())
    }

    pub fn width(&self) -> Option<u32> {
        self.width
    }

    pub fn height(&self) -> Option<u32> {
        self.height
    }

    /// Unbind from the current texture unit.
    pub fn unbind(&self, gl: &WebGl2RenderingContext) {
        gl.bind_texture(WebGl2RenderingContext::TEXTURE_2D, None);
    }

    /// Release the native texture.
    pub fn destroy(self, gl: &WebGl2RenderingContext) {
        gl.delete_texture(Some(&self.texture));
    }
}

/// Texture usable as a framebuffer color target, paired with a depth
/// renderbuffer of matching size.
///
/// Storage is allocated at construction, so the depth attachment created by
/// [`attach_to_framebuffer`](RenderTexture::attach_to_framebuffer) always
/// sees the final dimensions.
pub struct RenderTexture {
    inner: Texture,
    depth: Option<WebGlRenderbuffer>,
    width: u32,
    height: u32,
}

impl RenderTexture {
    /// Allocate GPU storage of the given dimensions (RGBA, 8 bits per
    /// channel, no initial pixel data).
    pub fn new(
        gl: &WebGl2RenderingContext,
        width: u32,
        height: u32,
    ) -> Result<RenderTexture, JsValue> {
        let mut inner = Texture::new(gl)?;

        inner.bind(gl, 0);
        Texture::apply_parameters(gl);
        gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
            WebGl2RenderingContext::TEXTURE_2D,
            0,
            WebGl2RenderingContext::RGBA as i32,
            width as i32,
            height as i32,
            0,
            WebGl2RenderingContext::RGBA,
            WebGl2RenderingContext::UNSIGNED_BYTE,
            None,
        )?;

        inner.width = Some(width);
        inner.height = Some(height);

        Ok(RenderTexture {
            inner,
            depth: None,
            width,
            height,
        })
    }

    /// Attach the texture as the color target of the currently bound
    /// framebuffer, plus a depth renderbuffer of the same dimensions.
    pub fn attach_to_framebuffer(&mut self, gl: &WebGl2RenderingContext) -> Result<(), JsValue> {
        gl.framebuffer_texture_2d(
            WebGl2RenderingContext::FRAMEBUFFER,
            WebGl2RenderingContext::COLOR_ATTACHMENT0,
            WebGl2RenderingContext::TEXTURE_2D,
            Some(&self.inner.texture),
            0,
        );

        let depth = gl
            .create_renderbuffer()
            .ok_or_else(|| JsValue::from_str("Failed to create depth renderbuffer"))?;
        gl.bind_renderbuffer(WebGl2RenderingContext::RENDERBUFFER, Some(&depth));
        gl.renderbuffer_storage(
            WebGl2RenderingContext::RENDERBUFFER,
            WebGl2RenderingContext::DEPTH_COMPONENT16,
            self.width as i32,
            self.height as i32,
        );
        gl.framebuffer_renderbuffer(
            WebGl2RenderingContext::FRAMEBUFFER,
            WebGl2RenderingContext::DEPTH_ATTACHMENT,
            WebGl2RenderingContext::RENDERBUFFER,
            Some(&depth),
        );

        self.depth = Some(depth);
        Ok(())
    }

    /// Bind the color texture to a numbered texture unit.
    pub fn bind(&self, gl: &WebGl2RenderingContext, unit: u32) {
        self.inner.bind(gl, unit);
    }

    pub fn unbind(&self, gl: &WebGl2RenderingContext) {
        self.inner.unbind(gl);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Release the depth renderbuffer and the color texture.
    pub fn destroy(self, gl: &WebGl2RenderingContext) {
        if let Some(depth) = self.depth {
            gl.delete_renderbuffer(Some(&depth));
        }
        self.inner.destroy(gl);
    }
}
