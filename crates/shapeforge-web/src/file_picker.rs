//! Model upload through the browser file dialog
//!
//! The gallery raises [`GalleryActions::upload_requested`]; this plugin opens
//! a hidden `<input type="file">`, validates the pick, and registers accepted
//! bytes in the in-memory `upload://` asset source before opening the
//! editor on them.

use bevy::prelude::*;
use shapeforge_core::{accept_upload, upload::accept_attribute, upload_asset_path};
use shapeforge_scene::{EditorView, GalleryActions, Navigation};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::app::UploadDir;

/// File picker plugin
pub struct FilePickerPlugin;

impl Plugin for FilePickerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PendingFileResults>()
            .init_resource::<UploadCounter>()
            .add_systems(
                Update,
                (open_requested_picker, process_file_results)
                    .run_if(in_state(EditorView::Gallery)),
            );
    }
}

/// Result from a file picker operation
#[derive(Debug, Clone)]
pub struct FilePickerResult {
    /// Filename (without path)
    pub filename: String,
    /// File content, when the file was read
    pub content: Option<Vec<u8>>,
    /// Error message if the pick was rejected or could not be read
    pub error: Option<String>,
}

/// Pending file results from JavaScript callbacks
#[derive(Resource, Default)]
pub struct PendingFileResults(pub Arc<Mutex<VecDeque<FilePickerResult>>>);

/// Source of per-session upload ids
#[derive(Resource, Default)]
pub struct UploadCounter(u64);

impl UploadCounter {
    fn next(&mut self) -> u64 {
        let id = self.0;
        self.0 += 1;
        id
    }
}

fn open_requested_picker(mut actions: ResMut<GalleryActions>, pending: Res<PendingFileResults>) {
    if !actions.upload_requested {
        return;
    }
    actions.upload_requested = false;
    open_file_picker(&accept_attribute(), pending.0.clone());
}

/// Move results from JS callbacks into the app
fn process_file_results(
    pending: Res<PendingFileResults>,
    upload_dir: Res<UploadDir>,
    mut counter: ResMut<UploadCounter>,
    mut navigation: ResMut<Navigation>,
    mut next_view: ResMut<NextState<EditorView>>,
) {
    let results: Vec<FilePickerResult> = match pending.0.lock() {
        Ok(mut queue) => queue.drain(..).collect(),
        Err(_) => return,
    };

    for result in results {
        if let Some(error) = result.error {
            tracing::warn!("Upload of '{}' rejected: {}", result.filename, error);
            show_alert(&error);
            continue;
        }
        let bytes = result.content.unwrap_or_default();
        let id = counter.next();
        match accept_upload(id, &result.filename, &bytes) {
            Ok(shape) => {
                let path = upload_asset_path(id, &result.filename);
                upload_dir.0.insert_asset(Path::new(&path), bytes);
                tracing::info!("Registered upload {} as {}", result.filename, path);
                navigation.open(shape);
                next_view.set(EditorView::Customize);
            }
            Err(e) => {
                tracing::warn!("Upload rejected: {}", e);
                show_alert(&e.to_string());
            }
        }
    }
}

// ============================================================================
// JavaScript Interop (WASM only)
// ============================================================================

#[cfg(target_arch = "wasm32")]
mod js_interop {
    use super::*;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use shapeforge_core::validate_model_file;
    use web_sys::HtmlInputElement;

    fn push_result(pending: &Arc<Mutex<VecDeque<FilePickerResult>>>, result: FilePickerResult) {
        if let Ok(mut results) = pending.lock() {
            results.push_back(result);
        }
    }

    fn read_file(file: web_sys::File, pending: Arc<Mutex<VecDeque<FilePickerResult>>>) {
        let filename = file.name();
        let reader = match web_sys::FileReader::new() {
            Ok(reader) => reader,
            Err(e) => {
                tracing::error!("read_file: failed to create FileReader: {:?}", e);
                return;
            }
        };
        let reader_clone = reader.clone();

        let onload = Closure::wrap(Box::new(move |_: web_sys::Event| {
            let content = reader_clone
                .result()
                .ok()
                .and_then(|result| result.dyn_into::<js_sys::ArrayBuffer>().ok())
                .map(|buffer| js_sys::Uint8Array::new(&buffer).to_vec());
            let error = content
                .is_none()
                .then(|| "Could not read file".to_string());
            push_result(
                &pending,
                FilePickerResult {
                    filename: filename.clone(),
                    content,
                    error,
                },
            );
        }) as Box<dyn FnMut(_)>);

        reader.set_onload(Some(onload.as_ref().unchecked_ref()));
        onload.forget();

        reader.read_as_array_buffer(&file).ok();
    }

    /// Open a file picker dialog using HTML input element
    pub fn open_file_picker(accept: &str, pending_results: Arc<Mutex<VecDeque<FilePickerResult>>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            tracing::error!("open_file_picker: no document object");
            return;
        };

        // Create a hidden file input element
        let input: HtmlInputElement = match document
            .create_element("input")
            .ok()
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            Some(input) => input,
            None => {
                tracing::error!("open_file_picker: failed to create input element");
                return;
            }
        };

        input.set_type("file");
        input.set_accept(accept);
        input.style().set_property("display", "none").ok();

        let Some(body) = document.body() else {
            tracing::error!("open_file_picker: no document body");
            return;
        };
        if let Err(e) = body.append_child(&input) {
            tracing::error!("open_file_picker: failed to append input to body: {:?}", e);
            return;
        }

        let input_clone = input.clone();
        let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            if let Some(file) = input_clone.files().and_then(|files| files.get(0)) {
                let filename = file.name();
                // Reject by name before reading any bytes
                match validate_model_file(&filename) {
                    Ok(()) => read_file(file, pending_results.clone()),
                    Err(e) => push_result(
                        &pending_results,
                        FilePickerResult {
                            filename,
                            content: None,
                            error: Some(e.to_string()),
                        },
                    ),
                }
            } else {
                tracing::debug!("open_file_picker: no files selected");
            }

            // Remove the input element
            if let Some(parent) = input_clone.parent_node() {
                parent.remove_child(&input_clone).ok();
            }
        }) as Box<dyn FnMut(_)>);

        input.set_onchange(Some(closure.as_ref().unchecked_ref()));
        closure.forget();

        input.click();
    }

    pub fn show_alert(message: &str) {
        if let Some(window) = web_sys::window() {
            window.alert_with_message(message).ok();
        }
    }
}

// Non-WASM stubs
#[cfg(not(target_arch = "wasm32"))]
mod js_interop {
    use super::*;

    pub fn open_file_picker(accept: &str, pending_results: Arc<Mutex<VecDeque<FilePickerResult>>>) {
        tracing::debug!(accept, "No file dialog on this platform");
        if let Ok(mut results) = pending_results.lock() {
            results.push_back(FilePickerResult {
                filename: String::new(),
                content: None,
                error: Some("File picker not supported on this platform".to_string()),
            });
        }
    }

    pub fn show_alert(message: &str) {
        tracing::warn!("{}", message);
    }
}

pub use js_interop::{open_file_picker, show_alert};
