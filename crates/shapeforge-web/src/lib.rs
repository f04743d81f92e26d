//! Shapeforge Web - the shape editor in the browser
//!
//! This crate provides the WASM entry point, the canvas-bound Bevy app, and
//! the browser file picker used for model uploads.

mod app;
mod file_picker;

use wasm_bindgen::prelude::*;

/// Entry point for WASM module
#[wasm_bindgen(start)]
pub fn main() {
    // Set panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging with filtering to reduce wgpu noise
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::INFO)
            .build()
    );

    app::run();
}
