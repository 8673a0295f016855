//! WebAssembly bindings for pixelize

use image::RgbaImage;
use wasm_bindgen::prelude::*;

use crate::{Converter, Palette, Settings};

#[wasm_bindgen]
pub struct WasmConverter {
    palette: Palette,
    settings: Settings,
}

#[wasm_bindgen]
impl WasmConverter {
    /// Create a converter with the given palette.
    ///
    /// # Arguments
    /// * `colors` - Hex colors (`#RRGGBB` or `#RGB`); empty selects the built-in palette
    #[wasm_bindgen(constructor)]
    pub fn new(colors: Vec<String>) -> Result<WasmConverter, JsValue> {
        let palette = if colors.is_empty() {
            Palette::eight_bit()
        } else {
            Palette::from_hex(colors.as_slice()).map_err(|e| JsValue::from_str(&e.to_string()))?
        };

        Ok(WasmConverter {
            palette,
            settings: Settings::default(),
        })
    }

    #[wasm_bindgen]
    pub fn set_block_size(&mut self, block_size: u32) {
        self.settings.block_size = block_size;
    }

    #[wasm_bindgen]
    pub fn set_dither(&mut self, threshold: f64) {
        self.settings.dither_threshold = threshold;
    }

    /// Pixelize raw RGBA canvas data.
    /// Returns `{ data: Uint8ClampedArray, width, height }` sized to the whole-block grid.
    #[wasm_bindgen]
    pub fn process_image(&self, image_data: &[u8], width: u32, height: u32) -> Result<js_sys::Object, JsValue> {
        let img = RgbaImage::from_raw(width, height, image_data.to_vec())
            .ok_or_else(|| JsValue::from_str("Invalid image dimensions"))?;

        let (output, stats) = Converter::new(self.palette.clone())
            .with_settings(self.settings)
            .convert_rgba(&img)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        web_sys::console::debug_1(
            &format!("pixelize: {}x{} blocks, {} dithered", stats.columns, stats.rows, stats.dithered).into(),
        );

        let result = js_sys::Object::new();
        let data = js_sys::Uint8ClampedArray::from(output.as_raw().as_slice());
        js_sys::Reflect::set(&result, &"data".into(), &data)?;
        js_sys::Reflect::set(&result, &"width".into(), &output.width().into())?;
        js_sys::Reflect::set(&result, &"height".into(), &output.height().into())?;

        Ok(result)
    }
}
