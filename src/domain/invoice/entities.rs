use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::value_objects::{Currency, TaxRate, round2};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItemId(Uuid);

impl LineItemId {
  pub fn new() -> Self {
    Self(Uuid::new_v4())
  }

  pub fn as_uuid(&self) -> Uuid {
    self.0
  }
}

impl Default for LineItemId {
  fn default() -> Self {
    Self::new()
  }
}

impl From<Uuid> for LineItemId {
  fn from(id: Uuid) -> Self {
    Self(id)
  }
}

impl fmt::Display for LineItemId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Single field write on a line item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineItemField {
  Description(String),
  UnitPrice(Decimal),
  Quantity(u32),
}

// Line Item - one billable row. Fields are private so the line total can never go stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
  id: LineItemId,
  description: String,
  unit_price: Decimal,
  quantity: u32,
  line_total: Decimal,
}

impl LineItem {
  pub fn new(description: impl Into<String>, unit_price: Decimal, quantity: u32) -> Self {
    let mut item = Self {
      id: LineItemId::new(),
      description: description.into(),
      unit_price,
      quantity,
      line_total: Decimal::ZERO,
    };
    item.recompute_total();
    item
  }

  /// Blank row as created by "add item": quantity 1, price 0, no description.
  pub fn blank() -> Self {
    Self::new(String::new(), Decimal::ZERO, 1)
  }

  pub fn id(&self) -> LineItemId {
    self.id
  }

  pub fn description(&self) -> &str {
    &self.description
  }

  pub fn unit_price(&self) -> Decimal {
    self.unit_price
  }

  pub fn quantity(&self) -> u32 {
    self.quantity
  }

  pub fn line_total(&self) -> Decimal {
    self.line_total
  }

  /// Writes one field. Price and quantity writes recompute the line total in the same step.
  pub fn apply(&mut self, field: LineItemField) {
    match field {
      LineItemField::Description(description) => self.description = description,
      LineItemField::UnitPrice(unit_price) => {
        self.unit_price = unit_price;
        self.recompute_total();
      }
      LineItemField::Quantity(quantity) => {
        self.quantity = quantity;
        self.recompute_total();
      }
    }
  }

  fn recompute_total(&mut self) {
    self.line_total = round2(self.unit_price * Decimal::from(self.quantity));
  }
}

/// Single field write on a party.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartyField {
  Name(String),
  Address(String),
  Email(String),
  Phone(Option<String>),
}

// Party - company (sender) or customer (billed to)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyInfo {
  pub name: String,
  pub address: String,
  pub email: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub phone: Option<String>,
}

impl PartyInfo {
  pub fn default_company() -> Self {
    Self {
      name: "Your Company".to_string(),
      address: "123 Business St, City, State 12345".to_string(),
      email: "contact@yourcompany.com".to_string(),
      phone: Some("+1 (555) 123-4567".to_string()),
    }
  }

  pub fn apply(&mut self, field: PartyField) {
    match field {
      PartyField::Name(name) => self.name = name,
      PartyField::Address(address) => self.address = address,
      PartyField::Email(email) => self.email = email,
      PartyField::Phone(phone) => self.phone = phone,
    }
  }

  pub fn phone_text(&self) -> Option<&str> {
    non_blank(self.phone.as_deref())
  }
}

/// Single field write on the invoice settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsField {
  Currency(Currency),
  TaxRate(TaxRate),
  InvoiceNumber(Option<String>),
  IssueDate(Option<String>),
  Notes(Option<String>),
  Company(PartyField),
  Customer(PartyField),
}

// Invoice Settings - invoice level metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSettings {
  pub currency: Currency,
  pub tax_rate: TaxRate,
  pub invoice_number: Option<String>,
  pub issue_date: Option<String>,
  pub notes: Option<String>,
  pub company: PartyInfo,
  pub customer: PartyInfo,
}

impl Default for InvoiceSettings {
  fn default() -> Self {
    Self {
      currency: Currency::usd(),
      tax_rate: TaxRate::zero(),
      invoice_number: None,
      issue_date: None,
      notes: None,
      company: PartyInfo::default_company(),
      customer: PartyInfo::default(),
    }
  }
}

impl InvoiceSettings {
  pub fn apply(&mut self, field: SettingsField) {
    match field {
      SettingsField::Currency(currency) => self.currency = currency,
      SettingsField::TaxRate(tax_rate) => self.tax_rate = tax_rate,
      SettingsField::InvoiceNumber(number) => self.invoice_number = number,
      SettingsField::IssueDate(date) => self.issue_date = date,
      SettingsField::Notes(notes) => self.notes = notes,
      SettingsField::Company(field) => self.company.apply(field),
      SettingsField::Customer(field) => self.customer.apply(field),
    }
  }

  pub fn reset_company(&mut self) {
    self.company = PartyInfo::default_company();
  }

  pub fn reset_customer(&mut self) {
    self.customer = PartyInfo::default();
  }

  pub fn invoice_number_text(&self) -> Option<&str> {
    non_blank(self.invoice_number.as_deref())
  }

  pub fn issue_date_text(&self) -> Option<&str> {
    non_blank(self.issue_date.as_deref())
  }

  pub fn notes_text(&self) -> Option<&str> {
    non_blank(self.notes.as_deref())
  }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
  value.map(str::trim).filter(|v| !v.is_empty())
}

// Invoice Totals - derived, never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
  pub subtotal: Decimal,
  pub tax: Decimal,
  pub grand_total: Decimal,
}

impl InvoiceTotals {
  /// Subtotal is the exact sum of the already rounded line totals; tax and grand total
  /// are rounded to cents.
  pub fn calculate(items: &[LineItem], tax_rate: TaxRate) -> Self {
    let subtotal = items
      .iter()
      .fold(Decimal::ZERO, |acc, item| acc + item.line_total());
    let tax = tax_rate.tax_on(subtotal);
    let grand_total = round2(subtotal + tax);

    Self {
      subtotal,
      tax,
      grand_total,
    }
  }

  pub fn zero() -> Self {
    Self {
      subtotal: Decimal::ZERO,
      tax: Decimal::ZERO,
      grand_total: Decimal::ZERO,
    }
  }
}

/// The row a fresh editing session starts with.
pub fn sample_line_item() -> LineItem {
  LineItem::new("Sample Item", dec!(100), 1)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn widgets() -> Vec<LineItem> {
    vec![
      LineItem::new("Widget A", dec!(10.00), 2),
      LineItem::new("Widget B", dec!(15.00), 1),
    ]
  }

  #[test]
  fn test_line_item_total_on_creation() {
    let item = LineItem::new("Widget A", dec!(10.00), 2);
    assert_eq!(item.line_total(), dec!(20.00));
  }

  #[test]
  fn test_blank_line_item() {
    let item = LineItem::blank();
    assert_eq!(item.description(), "");
    assert_eq!(item.quantity(), 1);
    assert_eq!(item.unit_price(), dec!(0));
    assert_eq!(item.line_total(), dec!(0));
  }

  #[test]
  fn test_line_item_recomputes_on_price_and_quantity() {
    let mut item = LineItem::blank();

    item.apply(LineItemField::UnitPrice(dec!(12.50)));
    assert_eq!(item.line_total(), dec!(12.50));

    item.apply(LineItemField::Quantity(3));
    assert_eq!(item.line_total(), dec!(37.50));

    item.apply(LineItemField::Description("Consulting".to_string()));
    assert_eq!(item.description(), "Consulting");
    assert_eq!(item.line_total(), dec!(37.50));
  }

  #[test]
  fn test_line_item_total_rounds_half_away_from_zero() {
    let mut item = LineItem::blank();
    item.apply(LineItemField::UnitPrice(dec!(10.005)));
    assert_eq!(item.line_total(), dec!(10.01));
  }

  #[test]
  fn test_totals_without_tax() {
    let items = widgets();
    let totals = InvoiceTotals::calculate(&items, TaxRate::zero());

    assert_eq!(totals.subtotal, dec!(35.00));
    assert_eq!(totals.tax, dec!(0));
    assert_eq!(totals.grand_total, dec!(35.00));
  }

  #[test]
  fn test_totals_with_tax() {
    let items = widgets();
    let totals = InvoiceTotals::calculate(&items, TaxRate::new(dec!(10)));

    assert_eq!(totals.subtotal, dec!(35.00));
    assert_eq!(totals.tax, dec!(3.50));
    assert_eq!(totals.grand_total, dec!(38.50));
  }

  #[test]
  fn test_totals_empty_items() {
    let totals = InvoiceTotals::calculate(&[], TaxRate::new(dec!(25)));
    assert_eq!(totals, InvoiceTotals::zero());
  }

  #[test]
  fn test_totals_are_pure() {
    let items = widgets();
    let rate = TaxRate::new(dec!(8.25));
    assert_eq!(
      InvoiceTotals::calculate(&items, rate),
      InvoiceTotals::calculate(&items, rate)
    );
  }

  #[test]
  fn test_subtotal_sums_rounded_line_totals() {
    // 3 x 0.335 = 1.005 -> 1.01 per line; summing rounded lines gives 2.02, not round(2.01)
    let items = vec![
      LineItem::new("A", dec!(0.335), 3),
      LineItem::new("B", dec!(0.335), 3),
    ];
    let totals = InvoiceTotals::calculate(&items, TaxRate::zero());
    assert_eq!(totals.subtotal, dec!(2.02));
  }

  #[test]
  fn test_settings_defaults() {
    let settings = InvoiceSettings::default();
    assert_eq!(settings.company.name, "Your Company");
    assert_eq!(settings.currency.code(), "USD");
    assert!(!settings.tax_rate.is_applicable());
    assert!(settings.invoice_number_text().is_none());
    assert!(settings.notes_text().is_none());
  }

  #[test]
  fn test_settings_field_updates_and_reset() {
    let mut settings = InvoiceSettings::default();
    settings.apply(SettingsField::Customer(PartyField::Name(
      "John Doe".to_string(),
    )));
    settings.apply(SettingsField::Company(PartyField::Phone(None)));
    settings.apply(SettingsField::Notes(Some("   ".to_string())));
    settings.apply(SettingsField::TaxRate(TaxRate::new(dec!(5))));

    assert_eq!(settings.customer.name, "John Doe");
    assert!(settings.company.phone.is_none());
    assert!(settings.notes_text().is_none());
    assert_eq!(settings.tax_rate.percent(), dec!(5));

    settings.reset_company();
    settings.reset_customer();
    assert_eq!(settings.company, PartyInfo::default_company());
    assert_eq!(settings.customer, PartyInfo::default());
  }

  mod properties {
    use super::*;
    use proptest::prelude::*;

    fn line_items() -> impl Strategy<Value = Vec<LineItem>> {
      prop::collection::vec(
        (0i64..100_000_000, 0u32..=4, 1u32..100_000),
        0..20,
      )
      .prop_map(|rows| {
        rows
          .into_iter()
          .map(|(mantissa, scale, quantity)| {
            LineItem::new("Item", Decimal::new(mantissa, scale), quantity)
          })
          .collect()
      })
    }

    fn tax_rate() -> impl Strategy<Value = TaxRate> {
      (-5_000i64..50_000).prop_map(|basis| TaxRate::new(Decimal::new(basis, 2)))
    }

    proptest! {
      #[test]
      fn test_grand_total_is_subtotal_plus_tax(items in line_items(), rate in tax_rate()) {
        let totals = InvoiceTotals::calculate(&items, rate);

        prop_assert_eq!(
          totals.subtotal,
          items.iter().map(|item| item.line_total()).sum::<Decimal>()
        );
        prop_assert_eq!(totals.tax, rate.tax_on(totals.subtotal));
        prop_assert_eq!(totals.grand_total, totals.subtotal + totals.tax);
        if !rate.is_applicable() {
          prop_assert_eq!(totals.tax, Decimal::ZERO);
        }
      }

      #[test]
      fn test_totals_are_pure_for_any_items(items in line_items(), rate in tax_rate()) {
        let before = items.clone();

        let first = InvoiceTotals::calculate(&items, rate);
        let second = InvoiceTotals::calculate(&items, rate);

        prop_assert_eq!(first, second);
        prop_assert_eq!(items, before);
      }
    }
  }
}
