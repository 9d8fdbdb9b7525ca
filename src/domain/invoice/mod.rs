pub mod document;
pub mod entities;
pub mod errors;
pub mod export;
pub mod line_items;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use document::{Block, DocumentTree, build_document};
pub use entities::{
  InvoiceSettings, InvoiceTotals, LineItem, LineItemField, LineItemId, PartyField, PartyInfo,
  SettingsField,
};
pub use errors::{ExportError, RenderError};
pub use export::{ExportPayload, PdfArtifact, handle_export_result};
pub use line_items::LineItemStore;
pub use ports::InvoiceRenderer;
pub use services::{ExportGuard, InvoiceSession, SharedInvoiceSession};
pub use value_objects::{Currency, TaxRate, ValueObjectError, round2};
