mod factory;
mod html;
mod http_renderer;
mod wkhtmltopdf_renderer;

pub use factory::RendererFactory;
pub use html::HtmlInvoiceTemplate;
pub use http_renderer::HttpRenderer;
pub use wkhtmltopdf_renderer::WkHtmlToPdfRenderer;
