//! # Runtime modules
//!
//! Behavior scripts embedded in exported documents.
//!
//! Each module is a fixed JavaScript function body that reads everything it
//! needs from a `config` object. The compiler never splices element data into
//! script text; it serializes the config as JSON and wraps the module in an
//! IIFE:
//!
//! ```text
//! (function (config) {
//!   ...module source...
//! })({"root":"carousel-1a2b3c4d","count":3,...});
//! ```
//!
//! All state of one instance (current index, autoplay handle, fetched pages)
//! lives in that closure, so two widgets on a page never share symbols.

use crate::escape::script_json;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeModule {
    Router,
    Carousel,
    CardsCarousel,
    Catalog,
    Form,
}

impl RuntimeModule {
    pub fn source(&self) -> &'static str {
        match self {
            RuntimeModule::Router => include_str!("router.js"),
            RuntimeModule::Carousel => include_str!("carousel.js"),
            RuntimeModule::CardsCarousel => include_str!("cards_carousel.js"),
            RuntimeModule::Catalog => include_str!("catalog.js"),
            RuntimeModule::Form => include_str!("form.js"),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RuntimeModule::Router => "router",
            RuntimeModule::Carousel => "carousel",
            RuntimeModule::CardsCarousel => "cards-carousel",
            RuntimeModule::Catalog => "catalog",
            RuntimeModule::Form => "form",
        }
    }
}

/// One module instance, ready to be written into a `<script>` block
#[derive(Debug, Clone)]
pub struct ScriptBlock {
    pub module: RuntimeModule,
    pub config: serde_json::Value,
}

impl ScriptBlock {
    pub fn new<C: Serialize>(module: RuntimeModule, config: &C) -> Result<Self, serde_json::Error> {
        Ok(Self {
            module,
            config: serde_json::to_value(config)?,
        })
    }

    /// Script text without the surrounding `<script>` tags
    pub fn render(&self) -> Result<String, serde_json::Error> {
        let config = script_json(&self.config)?;
        Ok(format!(
            "(function (config) {{\n{}}})({});",
            self.module.source(),
            config
        ))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterConfig {
    pub sections: Vec<RouteEntry>,
    pub home: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RouteEntry {
    pub id: String,
    pub slug: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselConfig {
    pub root: String,
    pub count: usize,
    pub autoplay: bool,
    pub interval: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardsCarouselConfig {
    pub root: String,
    pub count: usize,
    pub visible: usize,
    pub autoplay: bool,
    pub interval: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogConfig {
    pub root: String,
    pub api_base: String,
    pub identity: String,
    pub identity_param: String,
    pub branch_id: Option<String>,
    pub page_size: u64,
    pub currency: String,
    pub root_label: String,
    pub loading_text: String,
    pub empty_text: String,
    pub stock_label: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormConfig {
    pub root: String,
    pub kind: &'static str,
    pub action: Option<String>,
    pub success_message: String,
    pub error_message: String,
    pub required_message: String,
}
