pub mod export_invoice;
pub mod render_invoice;

pub use export_invoice::{ExportInvoiceCommand, ExportInvoiceUseCase};
pub use render_invoice::{RenderInvoiceCommand, RenderInvoiceUseCase};
