use std::sync::Arc;
use tera::Tera;

use crate::domain::invoice::DocumentTree;

const INVOICE_TEMPLATE: &str = "invoice.html.tera";

/// Lays a document tree out as styled HTML.
#[derive(Clone)]
pub struct HtmlInvoiceTemplate {
  tera: Arc<Tera>,
}

impl HtmlInvoiceTemplate {
  pub fn new() -> Result<Self, tera::Error> {
    let mut tera = Tera::default();
    tera.autoescape_on(vec!["html.tera", ".html"]);
    tera.add_raw_template(
      INVOICE_TEMPLATE,
      include_str!("../../../templates/invoice.html.tera"),
    )?;

    Ok(Self {
      tera: Arc::new(tera),
    })
  }

  pub fn render(&self, document: &DocumentTree) -> Result<String, tera::Error> {
    let mut context = tera::Context::new();
    context.insert("document", document);
    self.tera.render(INVOICE_TEMPLATE, &context)
  }
}
