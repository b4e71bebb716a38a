use blockmark_core::{Block, ParseOptions, parse_lesson};
use serde::Serialize;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

// ============================================================================
// Parse Config
// ============================================================================

/// Configuration accepted by `parseLesson`.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct WasmParseConfig {
    #[serde(default, alias = "maxNestingDepth")]
    pub max_nesting_depth: Option<usize>,
    #[serde(default, alias = "stripFrontmatter")]
    pub strip_frontmatter: Option<bool>,
}

fn parse_config(config: JsValue) -> Result<WasmParseConfig, JsError> {
    if config.is_undefined() || config.is_null() {
        return Ok(WasmParseConfig::default());
    }
    serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))
}

/// Fills unset config fields from the lesson defaults.
pub fn build_parse_options(cfg: &WasmParseConfig) -> ParseOptions {
    let defaults = ParseOptions::lesson();
    ParseOptions {
        max_nesting_depth: cfg.max_nesting_depth.unwrap_or(defaults.max_nesting_depth),
        strip_frontmatter: cfg.strip_frontmatter.unwrap_or(defaults.strip_frontmatter),
    }
}

// ============================================================================
// Lesson API Types
// ============================================================================

/// Result of compiling a lesson document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonResult {
    /// Top-level blocks in document order.
    pub blocks: Vec<Block>,
    /// Serialized frontmatter as JSON string.
    pub frontmatter_json: String,
    /// Human-readable degradation messages.
    pub warnings: Vec<String>,
}

/// Compiles a lesson into the shape returned to JavaScript.
pub fn build_lesson_result(markdown: &str, options: &ParseOptions) -> LessonResult {
    let lesson = parse_lesson(markdown, options);
    let frontmatter_json =
        serde_json::to_string(&lesson.frontmatter).unwrap_or_else(|_| "{}".to_string());

    LessonResult {
        blocks: lesson.blocks,
        frontmatter_json,
        warnings: lesson.diagnostics.iter().map(ToString::to_string).collect(),
    }
}

// ============================================================================
// Lesson API
// ============================================================================

/// Compiles lesson markdown into an array of block objects.
///
/// # Example (JavaScript)
///
/// ```javascript
/// import { mdToBlocks } from './blockmark_wasm';
///
/// const blocks = mdToBlocks("# Title\n\n- item");
/// // [
/// //   { type: "heading", depth: 1, text: [...], toggleable: false },
/// //   { type: "bullet_item", text: [...] }
/// // ]
/// ```
#[wasm_bindgen(js_name = mdToBlocks)]
pub fn md_to_blocks(markdown: &str) -> Result<JsValue, JsError> {
    let blocks = blockmark_core::md_to_blocks(markdown);
    serde_wasm_bindgen::to_value(&blocks)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Compiles a lesson and returns `{ blocks, frontmatterJson, warnings }`.
///
/// # Arguments
///
/// * `markdown` - The lesson source
/// * `config` - Optional object with `maxNestingDepth` and `stripFrontmatter`
#[wasm_bindgen(js_name = parseLesson)]
pub fn parse_lesson_js(markdown: &str, config: JsValue) -> Result<JsValue, JsError> {
    let cfg = parse_config(config)?;
    let result = build_lesson_result(markdown, &build_parse_options(&cfg));

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}
