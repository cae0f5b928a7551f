//! Browser exports
//!
//! The front-end hands each selected file to [`deidentify_file`] together
//! with the recipe text from its editor, and zips whatever comes back. The
//! returned object never throws: failures arrive as `success == false` with
//! an `error` message.

use crate::deid::{self, bundled_recipe_names};
use crate::domain::DeidOutcome;
use js_sys::{Array, Uint8Array};
use wasm_bindgen::prelude::*;

/// Result handed back to JavaScript
#[wasm_bindgen]
pub struct DeidResult {
    outcome: DeidOutcome,
}

#[wasm_bindgen]
impl DeidResult {
    #[wasm_bindgen(getter)]
    pub fn success(&self) -> bool {
        self.outcome.is_success()
    }

    /// Cleaned record, `undefined` on failure
    #[wasm_bindgen(getter)]
    pub fn content(&self) -> Option<Uint8Array> {
        self.outcome.content().map(Uint8Array::from)
    }

    #[wasm_bindgen(getter)]
    pub fn path(&self) -> String {
        self.outcome.path().to_string()
    }

    /// Failure message, `undefined` on success
    #[wasm_bindgen(getter)]
    pub fn error(&self) -> Option<String> {
        self.outcome.error().map(str::to_string)
    }
}

/// De-identify one file held in memory
#[wasm_bindgen(js_name = deidentifyFile)]
pub fn deidentify_file(file_bytes: &[u8], recipe_text: &str, file_path: &str) -> DeidResult {
    DeidResult {
        outcome: deid::deidentify_file(file_bytes, recipe_text, file_path),
    }
}

/// Names of the recipes compiled into the module
#[wasm_bindgen(js_name = bundledRecipes)]
pub fn bundled_recipes() -> Array {
    bundled_recipe_names()
        .into_iter()
        .map(JsValue::from_str)
        .collect()
}

/// Text of a bundled recipe, `undefined` for an unknown name
#[wasm_bindgen(js_name = bundledRecipe)]
pub fn bundled_recipe(name: &str) -> Option<String> {
    deid::bundled_recipe(name).map(str::to_string)
}
