use lazy_static::lazy_static;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueObjectError {
  #[error("Invalid currency code: {0}")]
  InvalidCurrency(String),
}

lazy_static! {
  static ref CURRENCY_SYMBOLS: HashMap<&'static str, &'static str> = HashMap::from([
    ("USD", "$"),
    ("CAD", "CA$"),
    ("AUD", "A$"),
    ("EUR", "€"),
    ("GBP", "£"),
    ("JPY", "¥"),
    ("CNY", "CN¥"),
    ("INR", "₹"),
    ("KRW", "₩"),
    ("CHF", "CHF "),
    ("DKK", "kr "),
    ("SEK", "kr "),
    ("NOK", "kr "),
  ]);
}

/// Rounds a monetary amount to cents, halves away from zero.
pub fn round2(amount: Decimal) -> Decimal {
  amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

// Currency - ISO 4217 style three letter code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
  pub fn new(code: &str) -> Result<Self, ValueObjectError> {
    let trimmed = code.trim();
    if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
      return Err(ValueObjectError::InvalidCurrency(format!(
        "Currency code must be three letters: {}",
        code
      )));
    }
    Ok(Self(trimmed.to_ascii_uppercase()))
  }

  pub fn usd() -> Self {
    Self("USD".to_string())
  }

  pub fn code(&self) -> &str {
    &self.0
  }

  pub fn symbol(&self) -> Option<&'static str> {
    CURRENCY_SYMBOLS.get(self.0.as_str()).copied()
  }

  /// Formats an amount as symbol, grouped integer part and exactly two decimals,
  /// e.g. `$1,234.50`. Codes without a known symbol are used as a prefix: `XYZ 10.00`.
  pub fn format(&self, amount: Decimal) -> String {
    let rounded = round2(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
      "-"
    } else {
      ""
    };
    let digits = format!("{:.2}", rounded.abs());
    let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let prefix = match self.symbol() {
      Some(symbol) => symbol.to_string(),
      None => format!("{} ", self.0),
    };

    format!("{}{}{}.{}", sign, prefix, group_thousands(whole), cents)
  }
}

fn group_thousands(whole: &str) -> String {
  let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
  for (i, ch) in whole.chars().enumerate() {
    if i > 0 && (whole.len() - i) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(ch);
  }
  grouped
}

impl Default for Currency {
  fn default() -> Self {
    Self::usd()
  }
}

impl FromStr for Currency {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::new(s)
  }
}

impl TryFrom<String> for Currency {
  type Error = ValueObjectError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    Self::new(&value)
  }
}

impl From<Currency> for String {
  fn from(currency: Currency) -> Self {
    currency.0
  }
}

impl fmt::Display for Currency {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Tax rate in percent. Not range checked, a rate of zero or below means no tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxRate(Decimal);

impl TaxRate {
  pub fn new(percent: Decimal) -> Self {
    Self(percent)
  }

  pub fn zero() -> Self {
    Self(Decimal::ZERO)
  }

  pub fn percent(&self) -> Decimal {
    self.0
  }

  pub fn is_applicable(&self) -> bool {
    self.0 > Decimal::ZERO
  }

  pub fn tax_on(&self, amount: Decimal) -> Decimal {
    if !self.is_applicable() {
      return Decimal::ZERO;
    }
    round2(amount * self.0 / Decimal::ONE_HUNDRED)
  }
}

impl fmt::Display for TaxRate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}%", self.0.normalize())
  }
}
