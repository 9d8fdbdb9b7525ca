//! Layout independent description of a printable invoice.
//!
//! The tree only declares blocks and abstract style tags. Fonts, page size and
//! pagination are decided by whichever renderer consumes it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::entities::{InvoiceSettings, InvoiceTotals, LineItem};

pub const TITLE: &str = "INVOICE";
pub const INVOICE_NUMBER_PLACEHOLDER: &str = "INV-0001";
pub const THANK_YOU_MESSAGE: &str = "Thank you for your business!";
pub const UNTITLED_ITEM: &str = "Untitled Item";
pub const TABLE_HEADER: [&str; 4] = ["Item", "Quantity", "Unit Price", "Total"];
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Style {
  Header,
  SubHeader,
  TableHeader,
  TotalRow,
  Notes,
  Footer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
  Left,
  Center,
  Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
  pub text: String,
  pub col_span: u32,
  pub align: Align,
  pub bold: bool,
}

impl Cell {
  fn left(text: impl Into<String>) -> Self {
    Self {
      text: text.into(),
      col_span: 1,
      align: Align::Left,
      bold: false,
    }
  }

  fn right(text: impl Into<String>) -> Self {
    Self {
      align: Align::Right,
      ..Self::left(text)
    }
  }

  fn bold(mut self) -> Self {
    self.bold = true;
    self
  }

  fn spanning(mut self, columns: u32) -> Self {
    self.col_span = columns;
    self
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelLine {
  pub label: String,
  pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel {
  pub title: Option<String>,
  pub align: Align,
  pub lines: Vec<PanelLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
  pub widths: Vec<String>,
  pub header_style: Style,
  pub header: Vec<Cell>,
  pub body: Vec<Vec<Cell>>,
  pub total_row: Vec<Cell>,
}

impl Table {
  pub fn column_count(&self) -> usize {
    self.header.len()
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
  pub label: String,
  pub value: String,
  pub emphasis: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Block {
  Heading { text: String, style: Style },
  TwoColumn { left: Panel, right: Panel },
  Table(Table),
  Summary { rows: Vec<SummaryRow> },
  Notes { title: String, text: String, style: Style },
  Footer { text: String, style: Style },
}

/// Ordered blocks of one invoice, built once per export and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTree {
  pub blocks: Vec<Block>,
}

impl DocumentTree {
  pub fn table(&self) -> Option<&Table> {
    self.blocks.iter().find_map(|block| match block {
      Block::Table(table) => Some(table),
      _ => None,
    })
  }

  pub fn summary(&self) -> Option<&[SummaryRow]> {
    self.blocks.iter().find_map(|block| match block {
      Block::Summary { rows } => Some(rows.as_slice()),
      _ => None,
    })
  }

  pub fn has_tax_line(&self) -> bool {
    self
      .summary()
      .is_some_and(|rows| rows.iter().any(|row| row.label.starts_with("Tax")))
  }

  pub fn notes(&self) -> Option<&str> {
    self.blocks.iter().find_map(|block| match block {
      Block::Notes { text, .. } => Some(text.as_str()),
      _ => None,
    })
  }
}

/// Maps invoice state to a document tree.
///
/// Always emits title, parties panel, items table, totals summary and footer. The tax
/// line appears only for a positive rate on a non-empty invoice and the notes block only
/// for non-blank notes. `today` stands in for a missing issue date so that identical
/// inputs always give identical trees.
pub fn build_document(
  settings: &InvoiceSettings,
  items: &[LineItem],
  totals: &InvoiceTotals,
  today: NaiveDate,
) -> DocumentTree {
  let mut blocks = vec![
    Block::Heading {
      text: TITLE.to_string(),
      style: Style::Header,
    },
    parties_block(settings, today),
    Block::Table(items_table(settings, items, totals)),
    summary_block(settings, items, totals),
  ];

  if let Some(notes) = settings.notes_text() {
    blocks.push(Block::Notes {
      title: "Notes".to_string(),
      text: notes.to_string(),
      style: Style::Notes,
    });
  }

  blocks.push(Block::Footer {
    text: THANK_YOU_MESSAGE.to_string(),
    style: Style::Footer,
  });

  DocumentTree { blocks }
}

fn parties_block(settings: &InvoiceSettings, today: NaiveDate) -> Block {
  let customer = &settings.customer;
  let mut billed_to = vec![
    line("Name", &customer.name),
    line("Address", &customer.address),
    line("Email", &customer.email),
  ];
  if let Some(phone) = customer.phone_text() {
    billed_to.push(line("Phone Number", phone));
  }

  let date = settings
    .issue_date_text()
    .map(str::to_string)
    .unwrap_or_else(|| today.format(DATE_FORMAT).to_string());
  let number = settings
    .invoice_number_text()
    .unwrap_or(INVOICE_NUMBER_PLACEHOLDER);

  Block::TwoColumn {
    left: Panel {
      title: Some("Billed To:".to_string()),
      align: Align::Left,
      lines: billed_to,
    },
    right: Panel {
      title: None,
      align: Align::Right,
      lines: vec![line("Date", &date), line("Invoice #", number)],
    },
  }
}

fn items_table(settings: &InvoiceSettings, items: &[LineItem], totals: &InvoiceTotals) -> Table {
  let currency = &settings.currency;
  let columns = TABLE_HEADER.len() as u32;

  let header = TABLE_HEADER
    .iter()
    .enumerate()
    .map(|(i, title)| {
      let cell = if i == 0 {
        Cell::left(*title)
      } else {
        Cell::right(*title)
      };
      cell.bold()
    })
    .collect();

  let body = items
    .iter()
    .map(|item| {
      let description = if item.description().trim().is_empty() {
        UNTITLED_ITEM
      } else {
        item.description()
      };
      vec![
        Cell::left(description),
        Cell::right(item.quantity().to_string()),
        Cell::right(currency.format(item.unit_price())),
        Cell::right(currency.format(item.line_total())),
      ]
    })
    .collect();

  let total_row = vec![
    Cell::left("Total").bold().spanning(columns - 1),
    Cell::right(currency.format(totals.grand_total)).bold(),
  ];

  Table {
    widths: vec!["*".to_string(); TABLE_HEADER.len()],
    header_style: Style::TableHeader,
    header,
    body,
    total_row,
  }
}

fn summary_block(settings: &InvoiceSettings, items: &[LineItem], totals: &InvoiceTotals) -> Block {
  let currency = &settings.currency;
  let mut rows = vec![SummaryRow {
    label: "Subtotal".to_string(),
    value: currency.format(totals.subtotal),
    emphasis: false,
  }];

  if settings.tax_rate.is_applicable() && !items.is_empty() {
    rows.push(SummaryRow {
      label: format!("Tax ({})", settings.tax_rate),
      value: currency.format(totals.tax),
      emphasis: false,
    });
  }

  rows.push(SummaryRow {
    label: "Total".to_string(),
    value: currency.format(totals.grand_total),
    emphasis: true,
  });

  Block::Summary { rows }
}

fn line(label: &str, value: &str) -> PanelLine {
  PanelLine {
    label: label.to_string(),
    value: value.to_string(),
  }
}
