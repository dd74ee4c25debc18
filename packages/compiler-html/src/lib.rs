//! # Pagesmith HTML export
//!
//! Turns a project's sections into one standalone HTML document. The output
//! needs nothing beyond a browser: styles are inline or in one embedded
//! stylesheet, and interactive widgets ship their behavior as embedded
//! scripts configured with JSON.
//!
//! ```text
//! Sections ──► compile_document ──► <!DOCTYPE html>
//!                  │                   ├── <style> shared widget CSS
//!                  │                   ├── one .pc-section block per section
//!                  │                   └── <script> router + one per widget
//!                  └─► elements (per-type markup)
//! ```

mod compiler;
mod elements;
pub mod escape;
pub mod runtime;
pub mod styles;

#[cfg(test)]
mod tests;

pub use compiler::{
    compile_document, compile_section, download, preview, CatalogOptions, CompileError,
    ExportOptions,
};
