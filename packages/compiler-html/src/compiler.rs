use crate::elements::{compile_element, Layout};
use crate::escape::escape_html;
use crate::runtime::{RouteEntry, RouterConfig, RuntimeModule, ScriptBlock};
use crate::styles::{Declarations, SHARED_CSS};
use pagesmith_model::{
    format_px, home_section, ordered_sections, seed_from_key, Dimension, Section, Sections,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during HTML compilation
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Nothing to compile: the document has no sections")]
    NoSections,

    #[error("Catalog section {0} needs a catalog identity in the export options")]
    MissingCatalogIdentity(String),

    #[error("Script config serialization failed: {0}")]
    Script(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Options for HTML export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    /// Document title
    pub title: String,
    /// `lang` attribute of the document
    pub lang: String,
    /// Width of every section block, the editor's canvas convention
    pub canvas_width: f64,
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
    /// Backend settings for catalog widgets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<CatalogOptions>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            title: "My Site".to_string(),
            lang: "en".to_string(),
            canvas_width: 1450.0,
            pretty: true,
            indent: "  ".to_string(),
            catalog: None,
        }
    }
}

/// Identity and endpoint the exported catalog mini-app talks to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogOptions {
    pub api_base_url: String,
    pub identity: String,
    #[serde(default = "default_identity_param")]
    pub identity_param: String,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_identity_param() -> String {
    "companyId".to_string()
}

fn default_currency() -> String {
    "$".to_string()
}

impl CatalogOptions {
    pub fn new(api_base_url: impl Into<String>, identity: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            identity: identity.into(),
            identity_param: default_identity_param(),
            currency: default_currency(),
        }
    }
}

pub(crate) struct Context<'a> {
    pub options: &'a ExportOptions,
    sections: &'a Sections,
    depth: usize,
    buffer: String,
    scripts: Vec<ScriptBlock>,
}

impl<'a> Context<'a> {
    fn new(options: &'a ExportOptions, sections: &'a Sections) -> Self {
        Self {
            options,
            sections,
            depth: 0,
            buffer: String::new(),
            scripts: Vec::new(),
        }
    }

    pub fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    pub fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
        }
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    pub fn push_script(&mut self, script: ScriptBlock) {
        self.scripts.push(script);
    }

    pub fn resolve_section(&self, id: &str) -> Option<&'a Section> {
        self.sections.get(id)
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Identifier for one widget instance in the exported document.
///
/// Derived from the element id so the same tree always compiles to the same
/// bytes; element ids are unique, so instance ids are too.
pub(crate) fn instance_id(kind: &str, element_id: &str) -> String {
    format!("{}-{}", kind, seed_from_key(element_id))
}

/// Compile every section into one standalone HTML document
pub fn compile_document(sections: &Sections, options: &ExportOptions) -> Result<String, CompileError> {
    if sections.is_empty() {
        return Err(CompileError::NoSections);
    }
    info!(sections = sections.len(), "Starting document export");

    let mut ctx = Context::new(options, sections);
    let home_id = home_section(sections).map(|s| s.id.clone());

    ctx.add_line("<!DOCTYPE html>");
    ctx.add_line(&format!("<html lang=\"{}\">", escape_html(&options.lang)));
    ctx.indent();

    compile_head(&mut ctx);

    ctx.add_line("<body>");
    ctx.indent();

    for section in ordered_sections(sections) {
        let visible = home_id.as_deref() == Some(section.id.as_str());
        compile_section_block(section, visible, &mut ctx)?;
    }

    let router = ScriptBlock::new(
        RuntimeModule::Router,
        &RouterConfig {
            sections: ordered_sections(sections)
                .into_iter()
                .map(|s| RouteEntry {
                    id: s.id.clone(),
                    slug: s.slug.clone(),
                })
                .collect(),
            home: home_id,
        },
    )?;
    let scripts = std::iter::once(router)
        .chain(std::mem::take(&mut ctx.scripts))
        .collect::<Vec<_>>();
    write_scripts(&scripts, &mut ctx)?;

    ctx.dedent();
    ctx.add_line("</body>");

    ctx.dedent();
    ctx.add_line("</html>");

    let html = ctx.get_output();
    info!(bytes = html.len(), scripts = scripts.len(), "Document export complete");
    Ok(html)
}

/// Compile one section's markup and widget scripts, without document chrome
pub fn compile_section(
    section: &Section,
    sections: &Sections,
    options: &ExportOptions,
) -> Result<String, CompileError> {
    let mut ctx = Context::new(options, sections);
    compile_section_block(section, true, &mut ctx)?;
    let scripts = std::mem::take(&mut ctx.scripts);
    write_scripts(&scripts, &mut ctx)?;
    Ok(ctx.get_output())
}

/// Write the document to `path` (the "download" entry point)
pub fn download(
    sections: &Sections,
    options: &ExportOptions,
    path: impl AsRef<Path>,
) -> Result<PathBuf, CompileError> {
    let html = compile_document(sections, options)?;
    let path = path.as_ref().to_path_buf();
    std::fs::write(&path, html)?;
    info!(path = %path.display(), "Wrote exported document");
    Ok(path)
}

/// Write the document into the temp directory for viewing (the "preview"
/// entry point). Returns the file path.
pub fn preview(sections: &Sections, options: &ExportOptions) -> Result<PathBuf, CompileError> {
    let html = compile_document(sections, options)?;
    let path = std::env::temp_dir().join(format!("pagesmith-preview-{}.html", seed_from_key(&html)));
    std::fs::write(&path, html)?;
    info!(path = %path.display(), "Wrote preview document");
    Ok(path)
}

fn compile_head(ctx: &mut Context) {
    ctx.add_line("<head>");
    ctx.indent();

    ctx.add_line("<meta charset=\"UTF-8\">");
    ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">");
    let title = escape_html(&ctx.options.title);
    ctx.add_line(&format!("<title>{}</title>", title));

    ctx.add_line("<style>");
    ctx.indent();
    for line in SHARED_CSS.lines() {
        ctx.add_line(line);
    }
    ctx.dedent();
    ctx.add_line("</style>");

    ctx.dedent();
    ctx.add_line("</head>");
}

fn compile_section_block(section: &Section, visible: bool, ctx: &mut Context) -> Result<(), CompileError> {
    debug!(section_id = %section.id, elements = section.elements.len(), "Compiling section");

    let mut decls = Declarations::new();
    decls
        .push("display", if visible { "block" } else { "none" })
        .push("position", "relative")
        .push("width", format_px(ctx.options.canvas_width))
        .push("min-height", format_px(section_height(section)))
        .push("margin", "0 auto");

    ctx.add_line(&format!(
        "<div class=\"pc-section\" id=\"section-{}\" data-section-id=\"{}\" data-slug=\"{}\"{}>",
        escape_html(&section.slug),
        escape_html(&section.id),
        escape_html(&section.slug),
        decls.to_attribute()
    ));
    ctx.indent();

    for element in &section.elements {
        compile_element(element, Layout::Absolute, ctx)?;
    }

    ctx.dedent();
    ctx.add_line("</div>");
    Ok(())
}

/// Lowest bottom edge among the section's top-level elements
fn section_height(section: &Section) -> f64 {
    const MIN_HEIGHT: f64 = 400.0;
    section
        .elements
        .iter()
        .map(|el| {
            let height = match el.size.height {
                Dimension::Px(h) => h,
                Dimension::Auto => el.element_type.default_size().height.px().unwrap_or(0.0),
            };
            el.position.y + height
        })
        .fold(MIN_HEIGHT, f64::max)
}

fn write_scripts(scripts: &[ScriptBlock], ctx: &mut Context) -> Result<(), CompileError> {
    for script in scripts {
        debug!(module = script.module.name(), "Embedding runtime module");
        ctx.add_line(&format!("<script data-module=\"{}\">", script.module.name()));
        ctx.add(&script.render()?);
        ctx.add("\n");
        ctx.add_line("</script>");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagesmith_model::{Element, ElementType, Size};
    use std::sync::Arc;

    #[test]
    fn test_section_height_uses_lowest_edge() {
        let section = Section::home("s", "Home").with_elements(vec![
            Arc::new(Element::new("a", ElementType::Rectangle).with_position(0.0, 600.0).with_size(Size::px(10.0, 100.0))),
            Arc::new(Element::new("b", ElementType::Text).with_position(0.0, 100.0).with_size(Size::auto())),
        ]);
        assert_eq!(section_height(&section), 700.0);

        let empty = Section::home("e", "Empty");
        assert_eq!(section_height(&empty), 400.0);
    }

    #[test]
    fn test_instance_ids_are_stable_and_distinct() {
        assert_eq!(instance_id("carousel", "x-1"), instance_id("carousel", "x-1"));
        assert_ne!(instance_id("carousel", "x-1"), instance_id("carousel", "x-2"));
        assert!(instance_id("catalog", "x-1").starts_with("catalog-"));
    }

    #[test]
    fn test_options_parse_with_defaults() {
        let options: ExportOptions = serde_json::from_str(
            r#"{ "title": "Shop", "catalog": { "apiBaseUrl": "https://api.test", "identity": "42" } }"#,
        )
        .unwrap();
        assert_eq!(options.title, "Shop");
        assert_eq!(options.canvas_width, 1450.0);
        let catalog = options.catalog.unwrap();
        assert_eq!(catalog.identity_param, "companyId");
        assert_eq!(catalog.currency, "$");
    }
}
