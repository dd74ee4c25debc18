//! Inline style generation and the shared widget stylesheet

use crate::escape::escape_html;
use pagesmith_model::{format_px, Styles};

/// Properties whose numeric values carry no unit
const UNITLESS: &[&str] = &[
    "opacity",
    "z-index",
    "font-weight",
    "line-height",
    "flex",
    "flex-grow",
    "flex-shrink",
    "order",
    "zoom",
    "aspect-ratio",
];

/// `backgroundColor` → `background-color`
pub fn camel_to_kebab(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

fn css_value(property: &str, value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        serde_json::Value::Number(n) => {
            let n = n.as_f64()?;
            if UNITLESS.contains(&property) {
                Some(n.to_string())
            } else {
                Some(format_px(n))
            }
        }
        _ => None,
    }
}

/// An ordered list of `property: value` pairs
#[derive(Debug, Default, Clone)]
pub struct Declarations {
    entries: Vec<(String, String)>,
}

impl Declarations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, property: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entries.push((property.into(), value.into()));
        self
    }

    pub fn append(&mut self, other: &Declarations) -> &mut Self {
        self.entries.extend(other.entries.iter().cloned());
        self
    }

    /// Append the element's style map, keys rewritten to hyphenated form
    pub fn extend_styles(&mut self, styles: &Styles) -> &mut Self {
        for (key, value) in styles {
            let property = camel_to_kebab(key);
            // Values containing ';' would smuggle extra declarations
            if let Some(value) = css_value(&property, value).filter(|v| !v.contains(';')) {
                self.entries.push((property, value));
            }
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `a: b; c: d;`
    pub fn to_css(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{}: {};", k, v))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// ` style="..."`, or nothing when empty
    pub fn to_attribute(&self) -> String {
        if self.entries.is_empty() {
            String::new()
        } else {
            format!(" style=\"{}\"", escape_html(&self.to_css()))
        }
    }
}

/// Stylesheet covering every widget, emitted in every exported document
pub const SHARED_CSS: &str = r#"* { box-sizing: border-box; }
body { margin: 0; font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; color: #1f2937; background: #ffffff; }
.pc-section { overflow: hidden; }
.pc-el { margin: 0; }
.pc-text { white-space: pre-wrap; }
.pc-button { cursor: pointer; border: none; border-radius: 6px; padding: 12px 24px; background: #2563eb; color: #ffffff; font: inherit; text-align: center; text-decoration: none; display: inline-flex; align-items: center; justify-content: center; }
.pc-image img, img.pc-image { object-fit: cover; display: block; }
.pc-rectangle { background: #e5e7eb; }
.pc-circle { background: #e5e7eb; border-radius: 50%; }
.pc-triangle { background: #e5e7eb; clip-path: polygon(50% 0%, 0% 100%, 100% 100%); }
.pc-divider { background: #d1d5db; }
.pc-card { background: #ffffff; border-radius: 12px; box-shadow: 0 4px 16px rgba(0, 0, 0, 0.08); overflow: hidden; }
.pc-card-image img { width: 100%; height: 180px; object-fit: cover; display: block; }
.pc-card-body { padding: 16px; }
.pc-card-title { margin: 0 0 8px; font-size: 1.25rem; }
.pc-card-content { margin: 0; color: #4b5563; }
.pc-header { display: flex; align-items: center; justify-content: space-between; padding: 0 32px; background: #ffffff; }
.pc-header-logo { font-weight: 700; font-size: 1.5rem; }
.pc-header-logo img { max-height: 48px; display: block; }
.pc-header-nav { display: flex; gap: 24px; }
.pc-header-nav a { color: inherit; text-decoration: none; }
.pc-carousel { overflow: hidden; }
.pc-carousel-track { position: relative; width: 100%; height: 100%; }
.pc-carousel-slide { position: absolute; inset: 0; opacity: 0; transition: opacity 0.6s ease; }
.pc-carousel-slide.is-active { opacity: 1; }
.pc-carousel-slide img { width: 100%; height: 100%; object-fit: cover; display: block; }
.pc-carousel-caption { position: absolute; left: 0; right: 0; bottom: 0; padding: 24px 32px; color: #ffffff; background: linear-gradient(transparent, rgba(0, 0, 0, 0.6)); }
.pc-carousel-caption h3 { margin: 0 0 8px; }
.pc-carousel-caption p { margin: 0; }
.pc-carousel-arrow, .pc-cards-arrow { position: absolute; top: 50%; transform: translateY(-50%); z-index: 2; width: 40px; height: 40px; border: none; border-radius: 50%; background: rgba(255, 255, 255, 0.85); cursor: pointer; font-size: 24px; line-height: 1; }
.pc-carousel-prev, .pc-cards-prev { left: 12px; }
.pc-carousel-next, .pc-cards-next { right: 12px; }
.pc-carousel-dots { position: absolute; left: 0; right: 0; bottom: 12px; display: flex; justify-content: center; gap: 8px; z-index: 2; }
.pc-carousel-dot { width: 10px; height: 10px; padding: 0; border: none; border-radius: 50%; background: rgba(255, 255, 255, 0.5); cursor: pointer; }
.pc-carousel-dot.is-active { background: #ffffff; }
.pc-cards-carousel { overflow: hidden; }
.pc-cards-viewport { overflow: hidden; width: 100%; height: 100%; }
.pc-cards-track { display: flex; height: 100%; transition: transform 0.5s ease; }
.pc-cards-item { padding: 12px; }
.pc-cards-item .pc-card { height: 100%; }
.pc-catalog { overflow: auto; padding: 24px; background: #f9fafb; }
.pc-catalog-header { display: flex; align-items: center; justify-content: space-between; gap: 16px; margin-bottom: 16px; }
.pc-catalog-header h2 { margin: 0; }
.pc-catalog-search { display: flex; gap: 8px; }
.pc-catalog-search input { padding: 8px 12px; border: 1px solid #d1d5db; border-radius: 6px; min-width: 240px; }
.pc-catalog-breadcrumb { display: flex; gap: 8px; margin-bottom: 12px; }
.pc-crumb { border: none; background: none; color: #2563eb; cursor: pointer; padding: 0; font: inherit; }
.pc-crumb.is-current { color: #1f2937; cursor: default; }
.pc-catalog-families, .pc-catalog-collections { display: flex; flex-wrap: wrap; gap: 8px; margin-bottom: 12px; }
.pc-catalog-chip { border: 1px solid #d1d5db; border-radius: 999px; padding: 6px 14px; background: #ffffff; cursor: pointer; font: inherit; }
.pc-catalog-chip.is-active { background: #2563eb; border-color: #2563eb; color: #ffffff; }
.pc-catalog-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(200px, 1fr)); gap: 16px; }
.pc-product { background: #ffffff; border-radius: 10px; padding: 12px; cursor: pointer; box-shadow: 0 2px 8px rgba(0, 0, 0, 0.06); display: flex; flex-direction: column; gap: 6px; }
.pc-product-image { width: 100%; height: 160px; object-fit: cover; border-radius: 6px; }
.pc-product-name { margin: 0; font-size: 1rem; }
.pc-product-code { color: #6b7280; font-size: 0.8rem; }
.pc-product-price, .pc-detail-price { font-weight: 700; }
.pc-catalog-pagination { display: flex; align-items: center; justify-content: center; gap: 12px; margin-top: 16px; }
.pc-catalog-status { margin-top: 12px; color: #6b7280; text-align: center; }
.pc-modal { position: fixed; inset: 0; z-index: 1000; display: flex; align-items: center; justify-content: center; background: rgba(0, 0, 0, 0.5); }
.pc-modal[hidden] { display: none; }
.pc-modal-dialog { position: relative; width: min(720px, 92vw); max-height: 90vh; overflow: auto; background: #ffffff; border-radius: 12px; padding: 24px; }
.pc-modal-close { position: absolute; top: 8px; right: 12px; border: none; background: none; font-size: 28px; cursor: pointer; }
.pc-detail-image { width: 100%; max-height: 360px; object-fit: contain; }
.pc-detail-options { display: flex; flex-wrap: wrap; align-items: center; gap: 8px; margin-top: 12px; }
.pc-detail-option-name { font-weight: 600; margin-right: 8px; }
.pc-form { display: flex; flex-direction: column; gap: 12px; padding: 24px; background: #ffffff; border-radius: 12px; }
.pc-form h3 { margin: 0; }
.pc-form label { display: flex; flex-direction: column; gap: 4px; font-size: 0.9rem; }
.pc-form input, .pc-form textarea { padding: 10px 12px; border: 1px solid #d1d5db; border-radius: 6px; font: inherit; }
.pc-form textarea { min-height: 120px; resize: vertical; }
.pc-form button { align-self: flex-start; border: none; border-radius: 6px; padding: 10px 20px; background: #2563eb; color: #ffffff; cursor: pointer; font: inherit; }
.pc-newsletter-form .pc-form-row, .pc-search-form { flex-direction: row; align-items: center; }
.pc-form-row { display: flex; gap: 8px; }
.pc-form-row input { flex: 1; }
.pc-form-status { min-height: 1.2em; font-size: 0.9rem; color: #059669; }
.pc-form-status.is-error { color: #dc2626; }
"#;
