/*!
 * # bidimark - directional marks for subtitle releases
 *
 * A Rust library for preparing right-to-left subtitle releases. Every row of
 * every subtitle entry is prefixed with the Unicode embedding character that
 * matches its writing direction, so players that ignore paragraph direction
 * still render mixed Hebrew/Arabic and Latin captions correctly.
 *
 * ## Features
 *
 * - Per-row direction classification and marking (LRE U+202A / RLE U+202B)
 * - Pluggable direction classifier, with a first-strong-character default
 * - SRT and WebVTT loading and saving
 * - Single file and recursive folder processing
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `marker`: The line direction marker and the `LineDocument` boundary
 * - `direction`: `Direction` and the `DirectionClassifier` capability
 * - `markup`: Plain text view of tagged subtitle rows
 * - `subtitle_processor`: Subtitle documents, SRT parsing and rendering
 * - `webvtt`: WebVTT parsing and rendering
 * - `file_utils`: File system operations
 * - `app_config`: Configuration management
 * - `app_controller`: File and folder workflow
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod direction;
pub mod errors;
pub mod file_utils;
pub mod marker;
pub mod markup;
pub mod subtitle_processor;
pub mod webvtt;

// Re-export main types for easier usage
pub use app_config::Config;
pub use direction::{Direction, DirectionClassifier, FirstStrongClassifier};
pub use marker::{mark_directions, DirectionMarker, LineDocument, MarkSummary};
pub use subtitle_processor::{SubtitleCollection, SubtitleEntry, SubtitleFormat};
pub use errors::{AppError, DirectionError, MarkError, SubtitleError};
