//! Per-type element serialization

use crate::compiler::{instance_id, CompileError, Context};
use crate::escape::{escape_html, js_call, safe_url};
use crate::runtime::{
    CardsCarouselConfig, CarouselConfig, CatalogConfig, FormConfig, RuntimeModule, ScriptBlock,
};
use crate::styles::Declarations;
use pagesmith_model::{format_px, Element, ElementType};
use serde_json::Value;

/// How an element is placed inside its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Layout {
    /// Offsets from `position`, the canvas model
    Absolute,
    /// Laid out by the parent (grid and columns cells)
    Flow,
}

pub(crate) fn compile_element(
    element: &Element,
    layout: Layout,
    ctx: &mut Context,
) -> Result<(), CompileError> {
    match element.element_type {
        ElementType::Text => {
            let content = text_of(element, &["content", "text"]);
            let open = open_tag("p", element, layout, &Declarations::new(), "");
            ctx.add_line(&format!("{}{}</p>", open, escape_html(content)));
        }

        ElementType::Heading => {
            let level = element.prop_f64("level").unwrap_or(2.0).clamp(1.0, 6.0) as u8;
            let tag = format!("h{}", level);
            let content = text_of(element, &["content", "text"]);
            let open = open_tag(&tag, element, layout, &Declarations::new(), "");
            ctx.add_line(&format!("{}{}</{}>", open, escape_html(content), tag));
        }

        ElementType::Button => compile_button(element, layout, ctx)?,

        ElementType::Image => {
            let src = text_of(element, &["src", "url"]);
            let alt = text_of(element, &["alt"]);
            let attrs = format!(
                " src=\"{}\" alt=\"{}\" loading=\"lazy\"",
                escape_html(safe_url(src)),
                escape_html(alt)
            );
            ctx.add_line(&open_tag("img", element, layout, &Declarations::new(), &attrs));
        }

        ElementType::Video => {
            let src = text_of(element, &["src", "url"]);
            let mut attrs = format!(" src=\"{}\" controls playsinline", escape_html(safe_url(src)));
            if let Some(poster) = element.prop_str("poster") {
                attrs.push_str(&format!(" poster=\"{}\"", escape_html(safe_url(poster))));
            }
            let open = open_tag("video", element, layout, &Declarations::new(), &attrs);
            ctx.add_line(&format!("{}</video>", open));
        }

        ElementType::Icon => {
            let icon = text_of(element, &["icon", "content"]);
            let open = open_tag("span", element, layout, &Declarations::new(), " aria-hidden=\"true\"");
            ctx.add_line(&format!("{}{}</span>", open, escape_html(icon)));
        }

        ElementType::Container => compile_container("div", element, layout, &Declarations::new(), ctx)?,

        ElementType::Section => compile_container("section", element, layout, &Declarations::new(), ctx)?,

        ElementType::Grid | ElementType::Columns => {
            let default_columns = if element.element_type == ElementType::Grid { 3.0 } else { 2.0 };
            let columns = element
                .prop_f64("columns")
                .unwrap_or(default_columns)
                .clamp(1.0, 12.0) as u32;
            let gap = element.prop_f64("gap").unwrap_or(16.0).max(0.0);

            let mut decls = Declarations::new();
            decls
                .push("display", "grid")
                .push("grid-template-columns", format!("repeat({}, minmax(0, 1fr))", columns))
                .push("gap", format_px(gap));

            ctx.add_line(&open_tag("div", element, layout, &decls, ""));
            ctx.indent();
            for child in &element.children {
                compile_element(child, Layout::Flow, ctx)?;
            }
            ctx.dedent();
            ctx.add_line("</div>");
        }

        ElementType::Card => {
            ctx.add_line(&open_tag("div", element, layout, &Declarations::new(), ""));
            ctx.indent();
            write_card_body(element, ctx);
            for child in &element.children {
                compile_element(child, Layout::Absolute, ctx)?;
            }
            ctx.dedent();
            ctx.add_line("</div>");
        }

        ElementType::Header => compile_header(element, layout, ctx)?,

        ElementType::Rectangle
        | ElementType::Circle
        | ElementType::Triangle
        | ElementType::Divider
        | ElementType::Spacer => {
            let attrs = if element.element_type == ElementType::Spacer {
                " aria-hidden=\"true\""
            } else {
                ""
            };
            ctx.add_line(&format!("{}</div>", open_tag("div", element, layout, &Declarations::new(), attrs)));
        }

        ElementType::Carousel => compile_carousel(element, layout, ctx)?,

        ElementType::CardsCarousel => compile_cards_carousel(element, layout, ctx)?,

        ElementType::CatalogSection => compile_catalog(element, layout, ctx)?,

        ElementType::ContactForm | ElementType::NewsletterForm | ElementType::SearchForm => {
            compile_form(element, layout, ctx)?
        }
    }

    Ok(())
}

/// First non-empty string prop among `keys`
fn text_of<'e>(element: &'e Element, keys: &[&str]) -> &'e str {
    keys.iter()
        .filter_map(|key| element.prop_str(key))
        .find(|value| !value.is_empty())
        .unwrap_or("")
}

fn field<'v>(value: &'v Value, keys: &[&str]) -> &'v str {
    keys.iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .find(|v| !v.is_empty())
        .unwrap_or("")
}

/// Geometry first, then type layout rules, then the element's own styles
fn box_declarations(element: &Element, layout: Layout, extra: &Declarations) -> Declarations {
    let mut decls = Declarations::new();
    match layout {
        Layout::Absolute => {
            decls
                .push("position", "absolute")
                .push("left", format_px(element.position.x))
                .push("top", format_px(element.position.y));
        }
        Layout::Flow => {
            decls.push("position", "relative");
        }
    }
    decls
        .push("width", element.size.width.to_string())
        .push("height", element.size.height.to_string());

    decls.append(extra).extend_styles(&element.styles);
    decls
}

/// `<tag id=".." class=".." attrs style="..">`
fn open_tag(tag: &str, element: &Element, layout: Layout, extra: &Declarations, attrs: &str) -> String {
    let type_class = match element.element_type {
        ElementType::CardsCarousel => "cards-carousel",
        ElementType::CatalogSection => "catalog",
        other => other.as_str(),
    };
    let form_class = if matches!(
        element.element_type,
        ElementType::ContactForm | ElementType::NewsletterForm | ElementType::SearchForm
    ) {
        " pc-form"
    } else {
        ""
    };
    format!(
        "<{} id=\"pc-{}\" class=\"pc-el pc-{}{}\"{}{}>",
        tag,
        escape_html(&element.id),
        type_class,
        form_class,
        attrs,
        box_declarations(element, layout, extra).to_attribute()
    )
}

fn compile_container(
    tag: &str,
    element: &Element,
    layout: Layout,
    extra: &Declarations,
    ctx: &mut Context,
) -> Result<(), CompileError> {
    ctx.add_line(&open_tag(tag, element, layout, extra, ""));
    ctx.indent();
    for child in &element.children {
        compile_element(child, Layout::Absolute, ctx)?;
    }
    ctx.dedent();
    ctx.add_line(&format!("</{}>", tag));
    Ok(())
}

/// Where a clickable control leads
enum LinkTarget<'e> {
    Section(&'e str),
    Url(&'e str),
    None,
}

fn link_target<'e>(value: &'e serde_json::Map<String, Value>) -> LinkTarget<'e> {
    let get = move |key: &str| value.get(key).and_then(Value::as_str).filter(|s| !s.is_empty());
    if let Some(section_id) = get("sectionId") {
        LinkTarget::Section(section_id)
    } else if let Some(url) = get("url").or_else(|| get("link")) {
        LinkTarget::Url(url)
    } else {
        LinkTarget::None
    }
}

/// `data-href` + `onclick` for a section link; `#` when the section is gone
fn section_link_attrs(section_id: &str, ctx: &Context) -> Result<String, CompileError> {
    match ctx.resolve_section(section_id) {
        Some(section) => Ok(format!(
            " data-href=\"#{}\" onclick=\"{}\"",
            escape_html(&section.slug),
            escape_html(&js_call("navigateToSection", &section.id)?)
        )),
        None => Ok(" data-href=\"#\"".to_string()),
    }
}

fn compile_button(element: &Element, layout: Layout, ctx: &mut Context) -> Result<(), CompileError> {
    let label = escape_html(match text_of(element, &["text", "content", "label"]) {
        "" => "Button",
        text => text,
    });

    match link_target(&element.props) {
        LinkTarget::Section(section_id) => {
            let attrs = format!(" type=\"button\"{}", section_link_attrs(section_id, ctx)?);
            let open = open_tag("button", element, layout, &Declarations::new(), &attrs);
            ctx.add_line(&format!("{}{}</button>", open, label));
        }
        LinkTarget::Url(url) => {
            let attrs = format!(
                " href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\"",
                escape_html(safe_url(url))
            );
            let open = open_tag("a", element, layout, &Declarations::new(), &attrs);
            ctx.add_line(&format!("{}{}</a>", open, label));
        }
        LinkTarget::None => {
            let open = open_tag("button", element, layout, &Declarations::new(), " type=\"button\"");
            ctx.add_line(&format!("{}{}</button>", open, label));
        }
    }
    Ok(())
}

/// Image block + title + content, shared by cards and carousel cards
fn write_card_parts(image: &str, alt: &str, title: &str, content: &str, ctx: &mut Context) {
    if !image.is_empty() {
        ctx.add_line(&format!(
            "<div class=\"pc-card-image\"><img src=\"{}\" alt=\"{}\" loading=\"lazy\" /></div>",
            escape_html(safe_url(image)),
            escape_html(alt)
        ));
    }
    ctx.add_line("<div class=\"pc-card-body\">");
    ctx.indent();
    if !title.is_empty() {
        ctx.add_line(&format!("<h3 class=\"pc-card-title\">{}</h3>", escape_html(title)));
    }
    if !content.is_empty() {
        ctx.add_line(&format!("<p class=\"pc-card-content\">{}</p>", escape_html(content)));
    }
    ctx.dedent();
    ctx.add_line("</div>");
}

fn write_card_body(element: &Element, ctx: &mut Context) {
    let title = text_of(element, &["title"]);
    write_card_parts(
        text_of(element, &["image", "src"]),
        text_of(element, &["alt", "title"]),
        title,
        text_of(element, &["content", "description", "text"]),
        ctx,
    );
}

fn compile_header(element: &Element, layout: Layout, ctx: &mut Context) -> Result<(), CompileError> {
    ctx.add_line(&open_tag("header", element, layout, &Declarations::new(), ""));
    ctx.indent();

    let logo_image = text_of(element, &["logoImage"]);
    let logo_text = text_of(element, &["logo", "title"]);
    if !logo_image.is_empty() {
        ctx.add_line(&format!(
            "<div class=\"pc-header-logo\"><img src=\"{}\" alt=\"{}\" /></div>",
            escape_html(safe_url(logo_image)),
            escape_html(logo_text)
        ));
    } else if !logo_text.is_empty() {
        ctx.add_line(&format!("<div class=\"pc-header-logo\">{}</div>", escape_html(logo_text)));
    }

    let links = element.prop_array("links");
    if !links.is_empty() {
        ctx.add_line("<nav class=\"pc-header-nav\">");
        ctx.indent();
        for link in links.iter().filter_map(Value::as_object) {
            let label = link.get("label").and_then(Value::as_str).unwrap_or("");
            let attrs = match link_target(link) {
                LinkTarget::Section(section_id) => {
                    let href = ctx
                        .resolve_section(section_id)
                        .map(|s| format!("#{}", s.slug))
                        .unwrap_or_else(|| "#".to_string());
                    format!(" href=\"{}\"{}", escape_html(&href), section_link_attrs(section_id, ctx)?)
                }
                LinkTarget::Url(url) => format!(" href=\"{}\"", escape_html(safe_url(url))),
                LinkTarget::None => " href=\"#\"".to_string(),
            };
            ctx.add_line(&format!("<a class=\"pc-header-link\"{}>{}</a>", attrs, escape_html(label)));
        }
        ctx.dedent();
        ctx.add_line("</nav>");
    }

    for child in &element.children {
        compile_element(child, Layout::Absolute, ctx)?;
    }

    ctx.dedent();
    ctx.add_line("</header>");
    Ok(())
}

fn write_arrows(prefix: &str, ctx: &mut Context) {
    ctx.add_line(&format!(
        "<button class=\"pc-{p}-arrow pc-{p}-prev\" type=\"button\" aria-label=\"Previous\">&#8249;</button>",
        p = prefix
    ));
    ctx.add_line(&format!(
        "<button class=\"pc-{p}-arrow pc-{p}-next\" type=\"button\" aria-label=\"Next\">&#8250;</button>",
        p = prefix
    ));
}

fn compile_carousel(element: &Element, layout: Layout, ctx: &mut Context) -> Result<(), CompileError> {
    let root = instance_id("carousel", &element.id);
    let slides = element.prop_array("slides");
    let show_arrows = element.prop_bool("showArrows").unwrap_or(true);
    let show_dots = element.prop_bool("showDots").unwrap_or(true);

    let attrs = format!(" data-carousel=\"{}\"", root);
    ctx.add_line(&open_tag("div", element, layout, &Declarations::new(), &attrs));
    ctx.indent();

    ctx.add_line("<div class=\"pc-carousel-track\">");
    ctx.indent();
    for (index, slide) in slides.iter().enumerate() {
        let active = if index == 0 { " is-active" } else { "" };
        ctx.add_line(&format!(
            "<div class=\"pc-carousel-slide{}\" data-index=\"{}\">",
            active, index
        ));
        ctx.indent();
        let image = field(slide, &["image", "src", "url"]);
        let title = field(slide, &["title"]);
        let description = field(slide, &["description", "subtitle", "text"]);
        if !image.is_empty() {
            ctx.add_line(&format!(
                "<img src=\"{}\" alt=\"{}\" />",
                escape_html(safe_url(image)),
                escape_html(field(slide, &["alt", "title"]))
            ));
        }
        if !title.is_empty() || !description.is_empty() {
            ctx.add_line("<div class=\"pc-carousel-caption\">");
            ctx.indent();
            if !title.is_empty() {
                ctx.add_line(&format!("<h3>{}</h3>", escape_html(title)));
            }
            if !description.is_empty() {
                ctx.add_line(&format!("<p>{}</p>", escape_html(description)));
            }
            ctx.dedent();
            ctx.add_line("</div>");
        }
        ctx.dedent();
        ctx.add_line("</div>");
    }
    ctx.dedent();
    ctx.add_line("</div>");

    if show_arrows && slides.len() > 1 {
        write_arrows("carousel", ctx);
    }
    if show_dots && slides.len() > 1 {
        ctx.add_line("<div class=\"pc-carousel-dots\">");
        ctx.indent();
        for index in 0..slides.len() {
            let active = if index == 0 { " is-active" } else { "" };
            ctx.add_line(&format!(
                "<button class=\"pc-carousel-dot{}\" type=\"button\" data-index=\"{}\" aria-label=\"Slide {}\"></button>",
                active,
                index,
                index + 1
            ));
        }
        ctx.dedent();
        ctx.add_line("</div>");
    }

    ctx.dedent();
    ctx.add_line("</div>");

    ctx.push_script(ScriptBlock::new(
        RuntimeModule::Carousel,
        &CarouselConfig {
            root,
            count: slides.len(),
            autoplay: element.prop_bool("autoplay").unwrap_or(true),
            interval: element.prop_f64("interval").unwrap_or(5000.0).max(1000.0) as u64,
        },
    )?);
    Ok(())
}

fn compile_cards_carousel(element: &Element, layout: Layout, ctx: &mut Context) -> Result<(), CompileError> {
    let root = instance_id("cards", &element.id);
    let cards = element.prop_array("cards");
    let visible = element.prop_f64("visibleCards").unwrap_or(3.0).clamp(1.0, 6.0) as usize;

    let attrs = format!(" data-cards-carousel=\"{}\"", root);
    ctx.add_line(&open_tag("div", element, layout, &Declarations::new(), &attrs));
    ctx.indent();

    ctx.add_line("<div class=\"pc-cards-viewport\">");
    ctx.indent();
    ctx.add_line("<div class=\"pc-cards-track\">");
    ctx.indent();
    for card in cards {
        ctx.add_line("<div class=\"pc-cards-item\">");
        ctx.indent();
        ctx.add_line("<div class=\"pc-card\">");
        ctx.indent();
        write_card_parts(
            field(card, &["image", "src"]),
            field(card, &["alt", "title"]),
            field(card, &["title"]),
            field(card, &["description", "content", "text"]),
            ctx,
        );
        if let Some(link) = card.as_object() {
            let label = field(card, &["buttonText"]);
            if !label.is_empty() {
                let attrs = match link_target(link) {
                    LinkTarget::Section(section_id) => {
                        format!(" type=\"button\"{}", section_link_attrs(section_id, ctx)?)
                    }
                    LinkTarget::Url(url) => format!(
                        " type=\"button\" onclick=\"{}\"",
                        escape_html(&js_call("window.open", safe_url(url))?)
                    ),
                    LinkTarget::None => " type=\"button\"".to_string(),
                };
                ctx.add_line(&format!(
                    "<button class=\"pc-button\"{}>{}</button>",
                    attrs,
                    escape_html(label)
                ));
            }
        }
        ctx.dedent();
        ctx.add_line("</div>");
        ctx.dedent();
        ctx.add_line("</div>");
    }
    ctx.dedent();
    ctx.add_line("</div>");
    ctx.dedent();
    ctx.add_line("</div>");

    if cards.len() > visible {
        write_arrows("cards", ctx);
    }

    ctx.dedent();
    ctx.add_line("</div>");

    ctx.push_script(ScriptBlock::new(
        RuntimeModule::CardsCarousel,
        &CardsCarouselConfig {
            root,
            count: cards.len(),
            visible,
            autoplay: element.prop_bool("autoplay").unwrap_or(false),
            interval: element.prop_f64("interval").unwrap_or(4000.0).max(1000.0) as u64,
        },
    )?);
    Ok(())
}

fn compile_catalog(element: &Element, layout: Layout, ctx: &mut Context) -> Result<(), CompileError> {
    let catalog = ctx
        .options
        .catalog
        .clone()
        .ok_or_else(|| CompileError::MissingCatalogIdentity(element.id.clone()))?;

    let root = instance_id("catalog", &element.id);
    let title = text_of(element, &["title"]);
    let placeholder = match text_of(element, &["searchPlaceholder"]) {
        "" => "Search by name or code",
        text => text,
    };

    let attrs = format!(" data-catalog=\"{}\"", root);
    ctx.add_line(&open_tag("div", element, layout, &Declarations::new(), &attrs));
    ctx.indent();

    ctx.add_line("<div class=\"pc-catalog-header\">");
    ctx.indent();
    if !title.is_empty() {
        ctx.add_line(&format!("<h2>{}</h2>", escape_html(title)));
    }
    if element.prop_bool("showSearch").unwrap_or(true) {
        ctx.add_line(&format!(
            "<form class=\"pc-catalog-search\" role=\"search\"><input type=\"search\" name=\"q\" placeholder=\"{}\" /><button type=\"submit\">Search</button></form>",
            escape_html(placeholder)
        ));
    }
    ctx.dedent();
    ctx.add_line("</div>");

    for part in ["breadcrumb", "families", "collections", "grid", "pagination"] {
        ctx.add_line(&format!("<div class=\"pc-catalog-{}\"></div>", part));
    }
    ctx.add_line("<div class=\"pc-catalog-status\" aria-live=\"polite\"></div>");
    ctx.add_line("<div class=\"pc-modal\" hidden>");
    ctx.indent();
    ctx.add_line("<div class=\"pc-modal-dialog\" role=\"dialog\" aria-modal=\"true\">");
    ctx.indent();
    ctx.add_line("<button class=\"pc-modal-close\" type=\"button\" aria-label=\"Close\">&times;</button>");
    ctx.add_line("<div class=\"pc-modal-body\"></div>");
    ctx.dedent();
    ctx.add_line("</div>");
    ctx.dedent();
    ctx.add_line("</div>");

    ctx.dedent();
    ctx.add_line("</div>");

    let branch_id = match element.props.get("branchId") {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };
    let label = |key: &str, default: &str| match text_of(element, &[key]) {
        "" => default.to_string(),
        text => text.to_string(),
    };

    ctx.push_script(ScriptBlock::new(
        RuntimeModule::Catalog,
        &CatalogConfig {
            root,
            api_base: catalog.api_base_url.trim_end_matches('/').to_string(),
            identity: catalog.identity,
            identity_param: catalog.identity_param,
            branch_id,
            page_size: element.prop_f64("pageSize").unwrap_or(12.0).clamp(1.0, 100.0) as u64,
            currency: catalog.currency,
            root_label: label("rootLabel", "All"),
            loading_text: label("loadingText", "Loading…"),
            empty_text: label("emptyText", "No products found"),
            stock_label: label("stockLabel", "Stock"),
        },
    )?);
    Ok(())
}

fn input_type(kind: &str) -> &'static str {
    match kind {
        "email" => "email",
        "tel" => "tel",
        "number" => "number",
        "url" => "url",
        "date" => "date",
        _ => "text",
    }
}

fn default_contact_fields() -> Vec<Value> {
    vec![
        serde_json::json!({"name": "name", "label": "Name", "type": "text", "required": true}),
        serde_json::json!({"name": "email", "label": "Email", "type": "email", "required": true}),
        serde_json::json!({"name": "message", "label": "Message", "type": "textarea", "required": true}),
    ]
}

fn compile_form(element: &Element, layout: Layout, ctx: &mut Context) -> Result<(), CompileError> {
    let kind = match element.element_type {
        ElementType::ContactForm => "contact",
        ElementType::NewsletterForm => "newsletter",
        _ => "search",
    };
    let root = instance_id(kind, &element.id);
    let text = |key: &str, default: &str| match text_of(element, &[key]) {
        "" => default.to_string(),
        value => value.to_string(),
    };

    let attrs = format!(" data-form=\"{}\" novalidate", root);
    let attrs = if kind == "search" {
        format!("{} role=\"search\"", attrs)
    } else {
        attrs
    };
    ctx.add_line(&open_tag("form", element, layout, &Declarations::new(), &attrs));
    ctx.indent();

    let title = text_of(element, &["title"]);
    if !title.is_empty() {
        ctx.add_line(&format!("<h3>{}</h3>", escape_html(title)));
    }
    let description = text_of(element, &["description"]);
    if !description.is_empty() {
        ctx.add_line(&format!("<p>{}</p>", escape_html(description)));
    }

    match element.element_type {
        ElementType::ContactForm => {
            let fields = match element.prop_array("fields") {
                [] => default_contact_fields(),
                fields => fields.to_vec(),
            };
            for descriptor in &fields {
                let name = field(descriptor, &["name"]);
                if name.is_empty() {
                    continue;
                }
                let label = match field(descriptor, &["label"]) {
                    "" => name,
                    label => label,
                };
                let required = descriptor
                    .get("required")
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                let placeholder = field(descriptor, &["placeholder"]);
                let common = format!(
                    " name=\"{}\" placeholder=\"{}\"{}",
                    escape_html(name),
                    escape_html(placeholder),
                    if required { " required" } else { "" }
                );
                let control = match field(descriptor, &["type"]) {
                    "textarea" => format!("<textarea{}></textarea>", common),
                    other => format!("<input type=\"{}\"{} />", input_type(other), common),
                };
                ctx.add_line(&format!("<label>{}{}</label>", escape_html(label), control));
            }
            ctx.add_line(&format!(
                "<button type=\"submit\">{}</button>",
                escape_html(&text("submitText", "Send"))
            ));
        }
        ElementType::NewsletterForm => {
            ctx.add_line("<div class=\"pc-form-row\">");
            ctx.indent();
            ctx.add_line(&format!(
                "<input type=\"email\" name=\"email\" placeholder=\"{}\" required />",
                escape_html(&text("placeholder", "you@example.com"))
            ));
            ctx.add_line(&format!(
                "<button type=\"submit\">{}</button>",
                escape_html(&text("buttonText", "Subscribe"))
            ));
            ctx.dedent();
            ctx.add_line("</div>");
        }
        _ => {
            ctx.add_line(&format!(
                "<input type=\"search\" name=\"q\" placeholder=\"{}\" />",
                escape_html(&text("placeholder", "Search…"))
            ));
            ctx.add_line(&format!(
                "<button type=\"submit\">{}</button>",
                escape_html(&text("buttonText", "Search"))
            ));
        }
    }

    if kind != "search" {
        ctx.add_line("<div class=\"pc-form-status\" aria-live=\"polite\"></div>");
    }

    ctx.dedent();
    ctx.add_line("</form>");

    let action = element
        .prop_str("action")
        .map(safe_url)
        .filter(|url| !url.is_empty() && *url != "#")
        .map(str::to_string);

    ctx.push_script(ScriptBlock::new(
        RuntimeModule::Form,
        &FormConfig {
            root,
            kind,
            action,
            success_message: text("successMessage", "Thanks! We'll be in touch."),
            error_message: text("errorMessage", "Something went wrong. Please try again."),
            required_message: text("requiredMessage", "Please fill in all required fields."),
        },
    )?);
    Ok(())
}
