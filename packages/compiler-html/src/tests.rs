use crate::{compile_document, compile_section, download, CatalogOptions, CompileError, ExportOptions};
use pagesmith_model::{Element, ElementType, Section, Sections, Size};
use serde_json::json;
use std::sync::Arc;

fn sections(list: Vec<Section>) -> Sections {
    list.into_iter().map(|s| (s.id.clone(), s)).collect()
}

fn single(elements: Vec<Element>) -> Sections {
    sections(vec![Section::home("home", "Home")
        .with_elements(elements.into_iter().map(Arc::new).collect())])
}

fn compile(sections: &Sections) -> String {
    compile_document(sections, &ExportOptions::default()).expect("Failed to compile")
}

fn catalog_options() -> ExportOptions {
    ExportOptions {
        catalog: Some(CatalogOptions::new("https://api.example.com/", "42")),
        ..ExportOptions::default()
    }
}

#[test]
fn test_heading_scenario() {
    let doc = single(vec![Element::new("h-1", ElementType::Heading)
        .with_prop("content", "Hello World")
        .with_size(Size::auto())]);

    let html = compile(&doc);
    println!("Generated HTML:\n{}", html);

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains(
        "<h2 id=\"pc-h-1\" class=\"pc-el pc-heading\" style=\"position: absolute; left: 0px; top: 0px; width: auto; height: auto;\">Hello World</h2>"
    ));
}

#[test]
fn test_heading_level_falls_back_for_non_numbers() {
    let doc = single(vec![
        Element::new("h-nan", ElementType::Heading).with_prop("level", "NaN"),
        Element::new("h-big", ElementType::Heading).with_prop("level", 9),
        Element::new("h-one", ElementType::Heading).with_prop("level", "1"),
    ]);

    let html = compile(&doc);
    assert!(html.contains("<h2 id=\"pc-h-nan\""));
    assert!(html.contains("<h6 id=\"pc-h-big\""));
    assert!(html.contains("<h1 id=\"pc-h-one\""));
    assert!(!html.contains("<h0"));
}

#[test]
fn test_geometry_and_styles() {
    let doc = single(vec![Element::new("r-1", ElementType::Rectangle)
        .with_position(10.0, 20.5)
        .with_size(Size::px(200.0, 100.0))
        .with_style("backgroundColor", "#ff0000")
        .with_style("borderRadius", 8)]);

    let html = compile(&doc);
    assert!(html.contains(
        "style=\"position: absolute; left: 10px; top: 20.5px; width: 200px; height: 100px; background-color: #ff0000; border-radius: 8px;\""
    ));
}

#[test]
fn test_text_is_escaped() {
    let doc = single(vec![Element::new("t-1", ElementType::Text).with_prop("content", "<b>bold</b> & co")]);
    let html = compile(&doc);
    assert!(html.contains("&lt;b&gt;bold&lt;/b&gt; &amp; co</p>"));
    assert!(!html.contains("<b>bold</b>"));
}

#[test]
fn test_shared_css_and_router_always_present() {
    let html = compile(&single(vec![]));
    assert_eq!(html.matches("<style>").count(), 1);
    assert!(html.contains(".pc-carousel-slide"));
    assert!(html.contains(".pc-catalog-grid"));
    assert_eq!(html.matches("<script data-module=\"router\">").count(), 1);
    assert!(html.contains("window.navigateToSection"));
}

#[test]
fn test_sections_home_first_and_only_home_visible() {
    let doc = sections(vec![
        Section::new("a-about", "About Us"),
        Section::home("z-home", "Home"),
    ]);
    let html = compile(&doc);

    let home = html.find("data-section-id=\"z-home\"").unwrap();
    let about = html.find("data-section-id=\"a-about\"").unwrap();
    assert!(home < about);
    assert!(html.contains("id=\"section-about-us\" data-section-id=\"a-about\" data-slug=\"about-us\" style=\"display: none;"));
    assert!(html.contains("id=\"section-home\" data-section-id=\"z-home\" data-slug=\"home\" style=\"display: block;"));
}

#[test]
fn test_button_section_link() {
    let doc = sections(vec![
        Section::home("home", "Home").with_elements(vec![Arc::new(
            Element::new("b-1", ElementType::Button)
                .with_prop("text", "Contact")
                .with_prop("sectionId", "s-contact"),
        )]),
        Section::new("s-contact", "Contact"),
    ]);
    let html = compile(&doc);

    assert!(html.contains("data-href=\"#contact\""));
    assert!(html.contains("onclick=\"navigateToSection(&quot;s-contact&quot;)\""));
    assert!(html.contains(">Contact</button>"));
}

#[test]
fn test_button_with_missing_section_falls_back() {
    let doc = single(vec![Element::new("b-1", ElementType::Button).with_prop("sectionId", "gone")]);
    let html = compile(&doc);
    assert!(html.contains("data-href=\"#\""));
    assert!(!html.contains("navigateToSection(&quot;gone&quot;)"));
    assert!(html.contains(">Button</button>"));
}

#[test]
fn test_button_url_opens_new_tab() {
    let doc = single(vec![
        Element::new("b-1", ElementType::Button).with_prop("text", "Docs").with_prop("url", "https://docs.rs"),
        Element::new("b-2", ElementType::Button).with_prop("url", "javascript:alert(1)"),
    ]);
    let html = compile(&doc);
    assert!(html.contains("<a id=\"pc-b-1\""));
    assert!(html.contains("href=\"https://docs.rs\" target=\"_blank\" rel=\"noopener noreferrer\""));
    assert!(!html.contains("javascript:alert"));
}

#[test]
fn test_grid_children_use_flow_layout() {
    let grid = Element::new("g-1", ElementType::Grid)
        .with_prop("columns", 4)
        .with_child(Element::new("c-1", ElementType::Rectangle).with_position(50.0, 50.0));
    let html = compile(&single(vec![grid]));

    assert!(html.contains("display: grid; grid-template-columns: repeat(4, minmax(0, 1fr)); gap: 16px;"));
    assert!(html.contains("id=\"pc-c-1\" class=\"pc-el pc-rectangle\" style=\"position: relative; width: 200px;"));
}

#[test]
fn test_container_children_nest() {
    let container = Element::new("c-1", ElementType::Container)
        .with_child(Element::new("t-1", ElementType::Text).with_prop("content", "inside"));
    let html = compile(&single(vec![container]));

    let open = html.find("id=\"pc-c-1\"").unwrap();
    let child = html.find("id=\"pc-t-1\"").unwrap();
    let close = html[child..].find("</div>").unwrap() + child;
    assert!(open < child && child < close);
}

#[test]
fn test_one_script_per_carousel() {
    let slides = json!([{ "image": "a.jpg", "title": "A" }, { "image": "b.jpg" }]);
    let doc = single(vec![
        Element::new("c-1", ElementType::Carousel).with_prop("slides", slides.clone()),
        Element::new("c-2", ElementType::Carousel).with_prop("slides", slides),
    ]);
    let html = compile(&doc);

    assert_eq!(html.matches("<script data-module=\"carousel\">").count(), 2);
    assert_eq!(html.matches("class=\"pc-carousel-slide").count(), 4);
    assert_eq!(html.matches("aria-label=\"Slide ").count(), 4);
    assert_eq!(html.matches("data-carousel=\"carousel-").count(), 2);
}

#[test]
fn test_cards_carousel_arrows_only_when_overflowing() {
    let cards = json!([{ "title": "One" }, { "title": "Two" }]);
    let doc = single(vec![Element::new("cc-1", ElementType::CardsCarousel)
        .with_prop("cards", cards)
        .with_prop("visibleCards", 3)]);
    let html = compile(&doc);

    assert!(html.contains("class=\"pc-el pc-cards-carousel\""));
    assert_eq!(html.matches("class=\"pc-cards-item\"").count(), 2);
    assert!(!html.contains("pc-cards-prev\" type"));
    assert_eq!(html.matches("<script data-module=\"cards-carousel\">").count(), 1);
}

#[test]
fn test_catalog_requires_identity() {
    let doc = single(vec![Element::new("cat-1", ElementType::CatalogSection)]);

    match compile_document(&doc, &ExportOptions::default()) {
        Err(CompileError::MissingCatalogIdentity(id)) => assert_eq!(id, "cat-1"),
        other => panic!("expected missing identity, got {:?}", other.map(|h| h.len())),
    }

    let html = compile_document(&doc, &catalog_options()).unwrap();
    assert!(html.contains("<script data-module=\"catalog\">"));
    assert!(html.contains("\"apiBase\":\"https://api.example.com\""));
    assert!(html.contains("\"identity\":\"42\""));
    assert!(html.contains("\"identityParam\":\"companyId\""));
    assert!(html.contains("class=\"pc-modal\" hidden"));
}

#[test]
fn test_forms_embed_config() {
    let doc = single(vec![
        Element::new("f-1", ElementType::ContactForm).with_prop("action", "https://forms.example.com"),
        Element::new("f-2", ElementType::NewsletterForm),
        Element::new("f-3", ElementType::SearchForm),
    ]);
    let html = compile(&doc);

    assert_eq!(html.matches("<script data-module=\"form\">").count(), 3);
    assert!(html.contains("name=\"email\" placeholder=\"\" required"));
    assert!(html.contains("<textarea name=\"message\""));
    assert!(html.contains("\"kind\":\"search\""));
    assert!(html.contains("\"action\":\"https://forms.example.com\""));
    assert!(html.contains("class=\"pc-el pc-search-form pc-form\""));
}

#[test]
fn test_script_config_cannot_break_out() {
    let doc = single(vec![Element::new("f-1", ElementType::ContactForm)
        .with_prop("successMessage", "</script><script>alert(1)</script>")]);
    let html = compile(&doc);
    assert!(!html.contains("<script>alert(1)"));
}

#[test]
fn test_compile_is_deterministic() {
    let doc = single(vec![
        Element::new("c-1", ElementType::Carousel).with_prop("slides", json!([{ "image": "a.jpg" }])),
        Element::new("h-1", ElementType::Heading).with_prop("content", "Same"),
    ]);
    assert_eq!(compile(&doc), compile(&doc));
}

#[test]
fn test_minified_output_has_no_newlines_in_markup() {
    let options = ExportOptions {
        pretty: false,
        ..ExportOptions::default()
    };
    let html = compile_document(&single(vec![Element::new("t-1", ElementType::Text)]), &options).unwrap();
    assert!(html.starts_with("<!DOCTYPE html><html lang=\"en\"><head>"));
}

#[test]
fn test_empty_document_is_an_error() {
    assert!(matches!(
        compile_document(&Sections::new(), &ExportOptions::default()),
        Err(CompileError::NoSections)
    ));
}

#[test]
fn test_compile_section_fragment() {
    let doc = single(vec![Element::new("t-1", ElementType::Text).with_prop("content", "frag")]);
    let html = compile_section(&doc["home"], &doc, &ExportOptions::default()).unwrap();
    assert!(!html.contains("<!DOCTYPE html>"));
    assert!(html.contains(">frag</p>"));
}

#[test]
fn test_download_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = download(&single(vec![]), &ExportOptions::default(), dir.path().join("site.html")).unwrap();
    let written = std::fs::read_to_string(path).unwrap();
    assert!(written.contains("<title>My Site</title>"));
}
