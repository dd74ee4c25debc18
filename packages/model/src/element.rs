//! # Element nodes
//!
//! The unit of the document tree. Every node owns its children through
//! `Arc`, so snapshots of the tree share every subtree that an edit did not
//! touch.

use crate::{IdGenerator, ModelError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Semantic content of a node (text, slides, link target, form fields, ...)
pub type Props = serde_json::Map<String, serde_json::Value>;

/// Visual style declarations, camelCase keys
pub type Styles = BTreeMap<String, serde_json::Value>;

/// An ordered list of sibling nodes. Order is paint order.
pub type Forest = Vec<Arc<Element>>;

/// Closed vocabulary of node tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementType {
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "heading")]
    Heading,
    #[serde(rename = "button")]
    Button,
    #[serde(rename = "image")]
    Image,
    #[serde(rename = "video")]
    Video,
    #[serde(rename = "icon")]
    Icon,
    #[serde(rename = "container")]
    Container,
    #[serde(rename = "section")]
    Section,
    #[serde(rename = "grid")]
    Grid,
    #[serde(rename = "columns")]
    Columns,
    #[serde(rename = "card")]
    Card,
    #[serde(rename = "header")]
    Header,
    #[serde(rename = "rectangle")]
    Rectangle,
    #[serde(rename = "circle")]
    Circle,
    #[serde(rename = "triangle")]
    Triangle,
    #[serde(rename = "divider")]
    Divider,
    #[serde(rename = "spacer")]
    Spacer,
    #[serde(rename = "carousel")]
    Carousel,
    #[serde(rename = "cardsCarousel")]
    CardsCarousel,
    #[serde(rename = "catalog-section")]
    CatalogSection,
    #[serde(rename = "contact-form")]
    ContactForm,
    #[serde(rename = "newsletter-form")]
    NewsletterForm,
    #[serde(rename = "search-form")]
    SearchForm,
}

impl ElementType {
    pub const ALL: [ElementType; 23] = [
        ElementType::Text,
        ElementType::Heading,
        ElementType::Button,
        ElementType::Image,
        ElementType::Video,
        ElementType::Icon,
        ElementType::Container,
        ElementType::Section,
        ElementType::Grid,
        ElementType::Columns,
        ElementType::Card,
        ElementType::Header,
        ElementType::Rectangle,
        ElementType::Circle,
        ElementType::Triangle,
        ElementType::Divider,
        ElementType::Spacer,
        ElementType::Carousel,
        ElementType::CardsCarousel,
        ElementType::CatalogSection,
        ElementType::ContactForm,
        ElementType::NewsletterForm,
        ElementType::SearchForm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Text => "text",
            ElementType::Heading => "heading",
            ElementType::Button => "button",
            ElementType::Image => "image",
            ElementType::Video => "video",
            ElementType::Icon => "icon",
            ElementType::Container => "container",
            ElementType::Section => "section",
            ElementType::Grid => "grid",
            ElementType::Columns => "columns",
            ElementType::Card => "card",
            ElementType::Header => "header",
            ElementType::Rectangle => "rectangle",
            ElementType::Circle => "circle",
            ElementType::Triangle => "triangle",
            ElementType::Divider => "divider",
            ElementType::Spacer => "spacer",
            ElementType::Carousel => "carousel",
            ElementType::CardsCarousel => "cardsCarousel",
            ElementType::CatalogSection => "catalog-section",
            ElementType::ContactForm => "contact-form",
            ElementType::NewsletterForm => "newsletter-form",
            ElementType::SearchForm => "search-form",
        }
    }

    /// Types whose children are laid out inside them
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            ElementType::Container
                | ElementType::Section
                | ElementType::Grid
                | ElementType::Columns
                | ElementType::Card
                | ElementType::Header
        )
    }

    /// Types that ship an embedded behavior script in exported documents
    pub fn is_interactive(&self) -> bool {
        matches!(
            self,
            ElementType::Carousel
                | ElementType::CardsCarousel
                | ElementType::CatalogSection
                | ElementType::ContactForm
                | ElementType::NewsletterForm
                | ElementType::SearchForm
        )
    }

    /// Geometry a freshly dropped node of this type starts with
    pub fn default_size(&self) -> Size {
        use Dimension::{Auto, Px};
        let (width, height) = match self {
            ElementType::Text => (Px(300.0), Auto),
            ElementType::Heading => (Px(400.0), Auto),
            ElementType::Button => (Px(160.0), Px(48.0)),
            ElementType::Image => (Px(300.0), Px(200.0)),
            ElementType::Video => (Px(480.0), Px(270.0)),
            ElementType::Icon => (Px(48.0), Px(48.0)),
            ElementType::Container => (Px(600.0), Px(300.0)),
            ElementType::Section => (Px(1450.0), Px(500.0)),
            ElementType::Grid | ElementType::Columns => (Px(1200.0), Px(400.0)),
            ElementType::Card => (Px(320.0), Px(400.0)),
            ElementType::Header => (Px(1450.0), Px(80.0)),
            ElementType::Rectangle => (Px(200.0), Px(120.0)),
            ElementType::Circle | ElementType::Triangle => (Px(150.0), Px(150.0)),
            ElementType::Divider => (Px(600.0), Px(2.0)),
            ElementType::Spacer => (Px(100.0), Px(50.0)),
            ElementType::Carousel => (Px(1200.0), Px(500.0)),
            ElementType::CardsCarousel => (Px(1200.0), Px(450.0)),
            ElementType::CatalogSection => (Px(1400.0), Px(900.0)),
            ElementType::ContactForm => (Px(500.0), Px(520.0)),
            ElementType::NewsletterForm => (Px(600.0), Px(160.0)),
            ElementType::SearchForm => (Px(500.0), Px(64.0)),
        };
        Size { width, height }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ModelError::UnknownElementType(s.to_string()))
    }
}

/// Pixel offset relative to the owning section (or container)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One axis of an element's size: a pixel length or intrinsic sizing
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Dimension {
    Px(f64),
    #[default]
    Auto,
}

impl Dimension {
    pub fn px(&self) -> Option<f64> {
        match self {
            Dimension::Px(v) => Some(*v),
            Dimension::Auto => None,
        }
    }
}

/// Format a pixel quantity without a trailing `.0` for whole numbers
pub fn format_px(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}px", value as i64)
    } else {
        format!("{}px", value)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Px(v) => f.write_str(&format_px(*v)),
            Dimension::Auto => f.write_str("auto"),
        }
    }
}

impl FromStr for Dimension {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed == "auto" {
            return Ok(Dimension::Auto);
        }
        trimmed
            .strip_suffix("px")
            .and_then(|n| n.trim().parse::<f64>().ok())
            .filter(|n| n.is_finite())
            .map(Dimension::Px)
            .ok_or_else(|| ModelError::InvalidDimension(s.to_string()))
    }
}

impl Serialize for Dimension {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Dimension {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(f64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
            // Bare numbers coming from drag handles are pixel lengths
            Raw::Number(n) if n.is_finite() => Ok(Dimension::Px(n)),
            Raw::Number(n) => Err(serde::de::Error::custom(ModelError::InvalidDimension(
                n.to_string(),
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: Dimension,
    pub height: Dimension,
}

impl Size {
    pub fn new(width: Dimension, height: Dimension) -> Self {
        Self { width, height }
    }

    pub fn px(width: f64, height: f64) -> Self {
        Self::new(Dimension::Px(width), Dimension::Px(height))
    }

    pub fn auto() -> Self {
        Self::new(Dimension::Auto, Dimension::Auto)
    }
}

/// A single visual node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: String,

    #[serde(rename = "type")]
    pub element_type: ElementType,

    #[serde(default)]
    pub props: Props,

    #[serde(default)]
    pub styles: Styles,

    #[serde(default)]
    pub position: Position,

    #[serde(default)]
    pub size: Size,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Forest,
}

impl Element {
    /// Create a node with the type's default geometry at the origin
    pub fn new(id: impl Into<String>, element_type: ElementType) -> Self {
        Self {
            id: id.into(),
            element_type,
            props: Props::new(),
            styles: Styles::new(),
            position: Position::default(),
            size: element_type.default_size(),
            children: Vec::new(),
        }
    }

    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.styles.insert(key.into(), value.into());
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Arc::new(child));
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// String prop lookup
    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(|v| v.as_str())
    }

    /// Numeric prop lookup, accepting numbers encoded as strings. Non-finite
    /// values count as absent.
    pub fn prop_f64(&self, key: &str) -> Option<f64> {
        let value = match self.props.get(key)? {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        value.filter(|v| v.is_finite())
    }

    pub fn prop_bool(&self, key: &str) -> Option<bool> {
        match self.props.get(key)? {
            serde_json::Value::Bool(b) => Some(*b),
            serde_json::Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn prop_array(&self, key: &str) -> &[serde_json::Value] {
        self.props
            .get(key)
            .and_then(|v| v.as_array())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Copy of this subtree with every node given a fresh id
    pub fn with_fresh_ids(&self, ids: &mut IdGenerator) -> Element {
        Element {
            id: ids.new_id(),
            children: self
                .children
                .iter()
                .map(|child| Arc::new(child.with_fresh_ids(ids)))
                .collect(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dimension_parsing() {
        assert_eq!("auto".parse::<Dimension>().unwrap(), Dimension::Auto);
        assert_eq!("200px".parse::<Dimension>().unwrap(), Dimension::Px(200.0));
        assert_eq!(" 12.5px ".parse::<Dimension>().unwrap(), Dimension::Px(12.5));
        assert!("200".parse::<Dimension>().is_err());
        assert!("50%".parse::<Dimension>().is_err());
        assert!("pxpx".parse::<Dimension>().is_err());
    }

    #[test]
    fn test_dimension_display() {
        assert_eq!(Dimension::Px(200.0).to_string(), "200px");
        assert_eq!(Dimension::Px(12.5).to_string(), "12.5px");
        assert_eq!(Dimension::Auto.to_string(), "auto");
    }

    #[test]
    fn test_size_serde_domain() {
        let size: Size = serde_json::from_value(json!({"width": "200px", "height": "auto"})).unwrap();
        assert_eq!(size, Size::new(Dimension::Px(200.0), Dimension::Auto));

        let size: Size = serde_json::from_value(json!({"width": 80, "height": "auto"})).unwrap();
        assert_eq!(size.width, Dimension::Px(80.0));

        let bad = serde_json::from_value::<Size>(json!({"width": "wide", "height": "auto"}));
        assert!(bad.is_err());

        assert_eq!(
            serde_json::to_value(Size::px(10.0, 20.0)).unwrap(),
            json!({"width": "10px", "height": "20px"})
        );
    }

    #[test]
    fn test_element_type_names() {
        for ty in ElementType::ALL {
            assert_eq!(ty.as_str().parse::<ElementType>().unwrap(), ty);
            let encoded = serde_json::to_value(ty).unwrap();
            assert_eq!(encoded, json!(ty.as_str()));
        }
        assert!("marquee".parse::<ElementType>().is_err());
    }

    #[test]
    fn test_element_deserializes_with_defaults() {
        let el: Element = serde_json::from_value(json!({
            "id": "a",
            "type": "catalog-section"
        }))
        .unwrap();
        assert_eq!(el.element_type, ElementType::CatalogSection);
        assert!(el.props.is_empty());
        assert!(el.is_leaf());
        assert_eq!(el.size, Size::auto());
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let result = serde_json::from_value::<Element>(json!({"id": "a", "type": "blink"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_fresh_ids_cover_subtree() {
        let el = Element::new("old-1", ElementType::Container)
            .with_child(Element::new("old-2", ElementType::Text))
            .with_child(Element::new("old-3", ElementType::Container).with_child(Element::new("old-4", ElementType::Image)));

        let mut ids = IdGenerator::new("fresh");
        let copy = el.with_fresh_ids(&mut ids);

        assert_eq!(copy.id, format!("{}-1", ids.seed()));
        assert_eq!(copy.children[1].children[0].id, format!("{}-4", ids.seed()));
        assert_eq!(copy.children[1].children[0].element_type, ElementType::Image);
    }

    #[test]
    fn test_prop_helpers() {
        let el = Element::new("a", ElementType::Grid)
            .with_prop("columns", "4")
            .with_prop("autoplay", true)
            .with_prop("slides", json!([{"image": "x.png"}]));
        assert_eq!(el.prop_f64("columns"), Some(4.0));
        assert_eq!(el.clone().with_prop("columns", "NaN").prop_f64("columns"), None);
        assert_eq!(el.clone().with_prop("columns", "inf").prop_f64("columns"), None);
        assert_eq!(el.prop_bool("autoplay"), Some(true));
        assert_eq!(el.prop_array("slides").len(), 1);
        assert!(el.prop_array("missing").is_empty());
    }
}
