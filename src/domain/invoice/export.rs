use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::document::{DocumentTree, build_document};
use super::entities::{InvoiceSettings, InvoiceTotals, LineItem, PartyInfo};
use super::errors::{ExportError, RenderError};
use super::line_items::LineItemStore;
use super::value_objects::{Currency, TaxRate};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const PDF_FILENAME: &str = "invoice.pdf";

/// Upper bounds accepted at the boundary. Line totals, subtotals and tax stay well inside
/// the `Decimal` range for any realistic number of items.
pub const MAX_UNIT_PRICE: Decimal = dec!(1000000000);
pub const MAX_QUANTITY: u32 = 1_000_000;
pub const MAX_TAX_RATE: Decimal = dec!(1000);

fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
  let mut error = ValidationError::new(code);
  error.message = Some(message.into());
  error
}

fn validate_unit_price(value: &Decimal) -> Result<(), ValidationError> {
  if value.is_sign_negative() && !value.is_zero() {
    return Err(validation_error(
      "non_negative",
      "Unit price cannot be negative",
    ));
  }
  if *value > MAX_UNIT_PRICE {
    return Err(validation_error(
      "unit_price_too_large",
      "Unit price cannot exceed 1,000,000,000",
    ));
  }
  Ok(())
}

fn validate_tax_rate(value: &Decimal) -> Result<(), ValidationError> {
  if value.abs() > MAX_TAX_RATE {
    return Err(validation_error(
      "tax_rate_out_of_range",
      "Tax rate must be between -1000 and 1000 percent",
    ));
  }
  Ok(())
}

/// Party as sent to a renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PartyPayload {
  #[validate(length(min = 1, message = "Name is required"))]
  pub name: String,

  #[validate(length(min = 1, message = "Address is required"))]
  pub address: String,

  #[validate(email(message = "Invalid email format"))]
  pub email: String,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub phone: Option<String>,
}

impl From<&PartyInfo> for PartyPayload {
  fn from(party: &PartyInfo) -> Self {
    Self {
      name: party.name.clone(),
      address: party.address.clone(),
      email: party.email.clone(),
      phone: party.phone_text().map(str::to_string),
    }
  }
}

impl From<PartyPayload> for PartyInfo {
  fn from(party: PartyPayload) -> Self {
    Self {
      name: party.name,
      address: party.address,
      email: party.email,
      phone: party.phone,
    }
  }
}

/// Line item as sent to a renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
  #[validate(length(min = 1, message = "Description is required"))]
  pub description: String,

  #[validate(range(
    min = 1,
    max = 1_000_000,
    message = "Quantity must be between 1 and 1,000,000"
  ))]
  pub quantity: u32,

  #[serde(with = "rust_decimal::serde::float")]
  #[validate(custom(function = "validate_unit_price"))]
  pub unit_price: Decimal,
}

/// Wire object consumed by rendering backends.
///
/// Built from raw settings and items rather than from a document tree, so each backend
/// is free to lay the invoice out its own way. `currency` and `taxRate` default to USD
/// and zero, so payloads that omit them are still accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayload {
  #[validate(nested)]
  pub company: PartyPayload,

  #[validate(nested)]
  pub customer: PartyPayload,

  #[validate(nested)]
  pub items: Vec<ItemPayload>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub invoice_number: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub date: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub notes: Option<String>,

  #[serde(default)]
  pub currency: Currency,

  #[serde(default, with = "rust_decimal::serde::float")]
  #[validate(custom(function = "validate_tax_rate"))]
  pub tax_rate: Decimal,
}

impl ExportPayload {
  /// Assembles the payload for the current editing state.
  pub fn from_state(settings: &InvoiceSettings, items: &[LineItem]) -> Self {
    Self {
      company: PartyPayload::from(&settings.company),
      customer: PartyPayload::from(&settings.customer),
      items: items
        .iter()
        .map(|item| ItemPayload {
          description: item.description().to_string(),
          quantity: item.quantity(),
          unit_price: item.unit_price(),
        })
        .collect(),
      invoice_number: settings.invoice_number_text().map(str::to_string),
      date: settings.issue_date_text().map(str::to_string),
      notes: settings.notes_text().map(str::to_string),
      currency: settings.currency.clone(),
      tax_rate: settings.tax_rate.percent(),
    }
  }

  /// Rebuilds settings and items on the rendering side.
  pub fn to_state(&self) -> (InvoiceSettings, LineItemStore) {
    let settings = InvoiceSettings {
      currency: self.currency.clone(),
      tax_rate: TaxRate::new(self.tax_rate),
      invoice_number: self.invoice_number.clone(),
      issue_date: self.date.clone(),
      notes: self.notes.clone(),
      company: self.company.clone().into(),
      customer: self.customer.clone().into(),
    };

    let items = self
      .items
      .iter()
      .map(|item| LineItem::new(item.description.clone(), item.unit_price, item.quantity))
      .collect();

    (settings, items)
  }

  pub fn to_document(&self, today: NaiveDate) -> DocumentTree {
    let (settings, items) = self.to_state();
    let totals = InvoiceTotals::calculate(items.as_slice(), settings.tax_rate);
    build_document(&settings, items.as_slice(), &totals, today)
  }

  /// Demo invoice served when no payload is supplied.
  pub fn sample() -> Self {
    Self {
      company: PartyPayload::from(&PartyInfo::default_company()),
      customer: PartyPayload {
        name: "John Doe".to_string(),
        address: "123 Main St, Springfield, USA".to_string(),
        email: "john.doe@example.com".to_string(),
        phone: Some("+1 555-1234".to_string()),
      },
      items: vec![
        ItemPayload {
          description: "Widget A".to_string(),
          quantity: 2,
          unit_price: dec!(10.00),
        },
        ItemPayload {
          description: "Widget B".to_string(),
          quantity: 1,
          unit_price: dec!(15.00),
        },
      ],
      invoice_number: Some("0001".to_string()),
      date: Some("2024-06-01 10:00:00".to_string()),
      notes: Some("Thank you for your business!".to_string()),
      currency: Currency::usd(),
      tax_rate: Decimal::ZERO,
    }
  }
}

/// Rendered invoice ready to be returned to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfArtifact {
  pub bytes: Vec<u8>,
  pub content_type: &'static str,
  pub filename: String,
}

impl PdfArtifact {
  pub fn new(bytes: Vec<u8>) -> Self {
    Self {
      bytes,
      content_type: PDF_CONTENT_TYPE,
      filename: PDF_FILENAME.to_string(),
    }
  }

  pub fn content_disposition(&self) -> String {
    format!("inline; filename={}", self.filename)
  }
}

/// Converts a renderer outcome into a tagged export result.
pub fn handle_export_result(
  result: Result<Vec<u8>, RenderError>,
) -> Result<PdfArtifact, ExportError> {
  match result {
    Ok(bytes) if bytes.is_empty() => Err(ExportError::EmptyDocument),
    Ok(bytes) => Ok(PdfArtifact::new(bytes)),
    Err(e) => {
      tracing::warn!("Invoice export failed: {}", e);
      Err(ExportError::Render(e))
    }
  }
}
