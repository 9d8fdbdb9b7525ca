use rust_decimal::Decimal;

use super::entities::{LineItem, LineItemField, LineItemId};

/// Ordered collection of line items. Iteration order is insertion order and is also
/// the print order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineItemStore {
  items: Vec<LineItem>,
}

impl LineItemStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_items(items: Vec<LineItem>) -> Self {
    Self { items }
  }

  /// Appends a blank item and returns its id.
  pub fn add(&mut self) -> LineItemId {
    self.push(LineItem::blank())
  }

  pub fn push(&mut self, item: LineItem) -> LineItemId {
    let id = item.id();
    self.items.push(item);
    id
  }

  /// Writes one field of the item with `id`, recomputing its line total when price or
  /// quantity change. Unknown ids are ignored; the return value only reports whether an
  /// item was touched.
  pub fn update(&mut self, id: LineItemId, field: LineItemField) -> bool {
    match self.items.iter_mut().find(|item| item.id() == id) {
      Some(item) => {
        item.apply(field);
        true
      }
      None => {
        tracing::debug!("Ignoring update for unknown line item {}", id);
        false
      }
    }
  }

  /// Removes the item with `id`. Any minimum-count policy belongs to the caller,
  /// see [`LineItemStore::can_delete`].
  pub fn delete(&mut self, id: LineItemId) -> bool {
    let before = self.items.len();
    self.items.retain(|item| item.id() != id);
    let removed = self.items.len() != before;
    if !removed {
      tracing::debug!("Ignoring delete for unknown line item {}", id);
    }
    removed
  }

  /// Sum of all line totals, zero when empty.
  pub fn total(&self) -> Decimal {
    self
      .items
      .iter()
      .fold(Decimal::ZERO, |acc, item| acc + item.line_total())
  }

  /// Editor policy: the last remaining row cannot be removed.
  pub fn can_delete(&self) -> bool {
    self.items.len() > 1
  }

  pub fn get(&self, id: LineItemId) -> Option<&LineItem> {
    self.items.iter().find(|item| item.id() == id)
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &LineItem> {
    self.items.iter()
  }

  pub fn as_slice(&self) -> &[LineItem] {
    &self.items
  }
}

impl FromIterator<LineItem> for LineItemStore {
  fn from_iter<I: IntoIterator<Item = LineItem>>(iter: I) -> Self {
    Self {
      items: iter.into_iter().collect(),
    }
  }
}
