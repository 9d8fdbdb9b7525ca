use chrono::NaiveDate;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

use super::document::{DocumentTree, build_document};
use super::entities::{
  InvoiceSettings, InvoiceTotals, LineItemField, LineItemId, SettingsField, sample_line_item,
};
use super::errors::ExportError;
use super::export::ExportPayload;
use super::line_items::LineItemStore;

/// State of one invoice being edited. Every mutation leaves the derived values
/// consistent before it returns; totals and documents are recomputed on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceSession {
  id: Uuid,
  items: LineItemStore,
  settings: InvoiceSettings,
}

impl InvoiceSession {
  /// Session seeded like a fresh editor: default settings and one sample row.
  pub fn new() -> Self {
    Self::with_state(
      InvoiceSettings::default(),
      LineItemStore::with_items(vec![sample_line_item()]),
    )
  }

  pub fn with_state(settings: InvoiceSettings, items: LineItemStore) -> Self {
    Self {
      id: Uuid::new_v4(),
      items,
      settings,
    }
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn items(&self) -> &LineItemStore {
    &self.items
  }

  pub fn settings(&self) -> &InvoiceSettings {
    &self.settings
  }

  pub fn add_item(&mut self) -> LineItemId {
    self.items.add()
  }

  pub fn update_item(&mut self, id: LineItemId, field: LineItemField) -> bool {
    self.items.update(id, field)
  }

  pub fn delete_item(&mut self, id: LineItemId) -> bool {
    self.items.delete(id)
  }

  pub fn update_settings(&mut self, field: SettingsField) {
    self.settings.apply(field);
  }

  pub fn replace_settings(&mut self, settings: InvoiceSettings) {
    self.settings = settings;
  }

  pub fn totals(&self) -> InvoiceTotals {
    InvoiceTotals::calculate(self.items.as_slice(), self.settings.tax_rate)
  }

  pub fn document(&self, today: NaiveDate) -> DocumentTree {
    build_document(&self.settings, self.items.as_slice(), &self.totals(), today)
  }

  pub fn export_payload(&self) -> ExportPayload {
    ExportPayload::from_state(&self.settings, self.items.as_slice())
  }
}

impl Default for InvoiceSession {
  fn default() -> Self {
    Self::new()
  }
}

/// Session shared between tasks. All mutations go through one mutex, and at most one
/// export may be in flight; a second export is rejected rather than queued.
#[derive(Debug, Clone)]
pub struct SharedInvoiceSession {
  inner: Arc<Mutex<InvoiceSession>>,
  exporting: Arc<AtomicBool>,
}

impl SharedInvoiceSession {
  pub fn new(session: InvoiceSession) -> Self {
    Self {
      inner: Arc::new(Mutex::new(session)),
      exporting: Arc::new(AtomicBool::new(false)),
    }
  }

  /// Runs `f` with exclusive access to the session.
  pub fn with<R>(&self, f: impl FnOnce(&mut InvoiceSession) -> R) -> R {
    let mut session = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut session)
  }

  /// Consistent copy of the export-relevant state.
  pub fn snapshot(&self) -> ExportPayload {
    self.with(|session| session.export_payload())
  }

  pub fn is_exporting(&self) -> bool {
    self.exporting.load(Ordering::Acquire)
  }

  /// Claims the export slot. The slot is released when the guard is dropped.
  pub fn begin_export(&self) -> Result<ExportGuard, ExportError> {
    self
      .exporting
      .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
      .map_err(|_| ExportError::AlreadyInProgress)?;

    Ok(ExportGuard {
      exporting: Arc::clone(&self.exporting),
    })
  }
}

impl Default for SharedInvoiceSession {
  fn default() -> Self {
    Self::new(InvoiceSession::new())
  }
}

#[derive(Debug)]
pub struct ExportGuard {
  exporting: Arc<AtomicBool>,
}

impl Drop for ExportGuard {
  fn drop(&mut self) {
    self.exporting.store(false, Ordering::Release);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::invoice::value_objects::TaxRate;
  use rust_decimal_macros::dec;

  #[test]
  fn test_new_session_has_sample_item() {
    let session = InvoiceSession::new();
    assert_eq!(session.items().len(), 1);
    assert_eq!(session.totals().grand_total, dec!(100));
  }

  #[test]
  fn test_totals_follow_mutations() {
    let mut session = InvoiceSession::with_state(InvoiceSettings::default(), LineItemStore::new());
    let a = session.add_item();
    let b = session.add_item();
    session.update_item(a, LineItemField::UnitPrice(dec!(10.00)));
    session.update_item(a, LineItemField::Quantity(2));
    session.update_item(b, LineItemField::UnitPrice(dec!(15.00)));
    assert_eq!(session.totals().grand_total, dec!(35.00));

    session.update_settings(SettingsField::TaxRate(TaxRate::new(dec!(10))));
    assert_eq!(session.totals().tax, dec!(3.50));
    assert_eq!(session.totals().grand_total, dec!(38.50));

    session.delete_item(b);
    assert_eq!(session.totals().subtotal, dec!(20.00));
    assert_eq!(session.totals().grand_total, dec!(22.00));
  }

  #[test]
  fn test_document_reflects_session() {
    let mut session = InvoiceSession::new();
    session.update_settings(SettingsField::Notes(Some("Net 30".to_string())));
    let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

    let tree = session.document(today);
    assert_eq!(tree.notes(), Some("Net 30"));
    assert_eq!(tree.table().unwrap().body.len(), 1);
  }

  #[test]
  fn test_shared_session_serializes_mutations() {
    let shared = SharedInvoiceSession::default();
    let id = shared.with(|session| session.add_item());
    shared.with(|session| session.update_item(id, LineItemField::UnitPrice(dec!(5))));

    let payload = shared.snapshot();
    assert_eq!(payload.items.len(), 2);
    assert_eq!(payload.items[1].unit_price, dec!(5));
  }

  #[test]
  fn test_second_export_is_rejected_until_guard_drops() {
    let shared = SharedInvoiceSession::default();

    let guard = shared.begin_export().unwrap();
    assert!(shared.is_exporting());
    assert_eq!(
      shared.begin_export().unwrap_err(),
      ExportError::AlreadyInProgress
    );

    drop(guard);
    assert!(!shared.is_exporting());
    assert!(shared.begin_export().is_ok());
  }
}
