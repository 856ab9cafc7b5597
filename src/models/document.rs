//! Source documents: their type, raw extracted values and normalized form.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CanonicalField;

/// The kind of tax form a document was extracted from.
///
/// Deserialization accepts the official form names as well as the compact
/// spellings OCR pipelines tend to produce (`w2`, `1099nec`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DocumentType {
    /// Form W-2, Wage and Tax Statement.
    #[serde(rename = "W-2", alias = "W2", alias = "w2", alias = "w-2")]
    W2,
    /// Form 1099-NEC, Nonemployee Compensation.
    #[serde(rename = "1099-NEC", alias = "1099nec", alias = "1099-nec", alias = "1099_nec")]
    Form1099Nec,
    /// Form 1099-MISC, Miscellaneous Information.
    #[serde(rename = "1099-MISC", alias = "1099misc", alias = "1099-misc", alias = "1099_misc")]
    Form1099Misc,
    /// Form 1099-INT, Interest Income.
    #[serde(rename = "1099-INT", alias = "1099int", alias = "1099-int", alias = "1099_int")]
    Form1099Int,
    /// Form 1099-DIV, Dividends and Distributions.
    #[serde(rename = "1099-DIV", alias = "1099div", alias = "1099-div", alias = "1099_div")]
    Form1099Div,
    /// Form 1099-B, Proceeds From Broker Transactions.
    #[serde(rename = "1099-B", alias = "1099b", alias = "1099-b", alias = "1099_b")]
    Form1099B,
    /// The form could not be identified; only unscoped rules apply.
    #[serde(rename = "Unknown", alias = "unknown")]
    Unknown,
}

impl DocumentType {
    /// The official form name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::W2 => "W-2",
            Self::Form1099Nec => "1099-NEC",
            Self::Form1099Misc => "1099-MISC",
            Self::Form1099Int => "1099-INT",
            Self::Form1099Div => "1099-DIV",
            Self::Form1099B => "1099-B",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = std::convert::Infallible;

    /// Lenient parse; anything unrecognized is [`DocumentType::Unknown`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        let compact = compact.strip_prefix("form").unwrap_or(&compact);

        Ok(match compact {
            "w2" => Self::W2,
            "1099nec" => Self::Form1099Nec,
            "1099misc" => Self::Form1099Misc,
            "1099int" => Self::Form1099Int,
            "1099div" => Self::Form1099Div,
            "1099b" => Self::Form1099B,
            _ => Self::Unknown,
        })
    }
}

/// Largest magnitude accepted as a money amount (one quadrillion).
///
/// Anything beyond it is treated as unreadable, which keeps every later sum far
/// from the `Decimal` overflow boundary.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// A raw value as produced by an extractor: text that may or may not hold an
/// amount, or an already numeric value.
///
/// JSON strings always stay text, so digit-only identifiers keep their leading
/// zeros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// A textual value such as `"$1,500.00"` or an identifier.
    Text(String),
    /// A numeric value.
    Number(Decimal),
}

impl RawValue {
    /// Parses the value as a money amount.
    ///
    /// Currency symbols, thousands separators, percent signs and whitespace are
    /// ignored; an amount wrapped in parentheses is negative. Returns `None` when
    /// nothing numeric remains or the magnitude exceeds [`MAX_AMOUNT`].
    ///
    /// # Example
    ///
    /// ```
    /// use tax_engine::models::RawValue;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(RawValue::from("$1,500.00").as_amount(), Some(Decimal::new(150000, 2)));
    /// assert_eq!(RawValue::from("(25)").as_amount(), Some(Decimal::from(-25)));
    /// assert_eq!(RawValue::from("N/A").as_amount(), None);
    /// ```
    pub fn as_amount(&self) -> Option<Decimal> {
        let amount = match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => parse_amount(text),
        }?;
        (amount.abs() <= MAX_AMOUNT).then_some(amount)
    }

    /// The value as trimmed text, for identifiers.
    pub fn as_text(&self) -> String {
        match self {
            Self::Number(value) => value.normalize().to_string(),
            Self::Text(text) => text.trim().to_string(),
        }
    }
}

impl From<Decimal> for RawValue {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A bag of raw label/value pairs from one document.
pub type RawFields = BTreeMap<String, RawValue>;

fn parse_amount(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    let (negative, inner) = match trimmed
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    {
        Some(inner) => (true, inner),
        None => (false, trimmed),
    };

    let cleaned: String = inner
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '%') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let value = Decimal::from_str(&cleaned).ok()?;
    Some(if negative { -value } else { value })
}

/// How a raw label was resolved to its canonical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    /// The label already was a canonical field name.
    Exact,
    /// A keyword rule from the priority table matched.
    Rule,
    /// Only the loose fallback heuristic matched.
    Fallback,
}

/// One label-to-field decision, kept for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// The label as it appeared in the raw data.
    pub raw_label: String,
    /// The canonical field it resolved to.
    pub field: CanonicalField,
    /// Which stage of the normalizer matched.
    pub source: MatchSource,
    /// Priority of the winning rule (0 for fallbacks).
    pub priority: u8,
}

/// A single document expressed in the canonical vocabulary.
///
/// Every amount field is present (zero when the document did not report it) and
/// never negative. The struct is read-only outside the crate; it is produced by
/// [`crate::extraction::normalize_fields`] or [`NormalizedDocument::from_amounts`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedDocument {
    document_type: DocumentType,
    amounts: BTreeMap<CanonicalField, Decimal>,
    identifiers: BTreeMap<CanonicalField, String>,
    mappings: Vec<FieldMapping>,
    unmapped_labels: Vec<String>,
    skipped_values: Vec<String>,
}

impl NormalizedDocument {
    /// An empty document: every amount zero, no identifiers.
    pub(crate) fn empty(document_type: DocumentType) -> Self {
        Self {
            document_type,
            amounts: CanonicalField::amounts()
                .map(|field| (field, Decimal::ZERO))
                .collect(),
            identifiers: BTreeMap::new(),
            mappings: Vec::new(),
            unmapped_labels: Vec::new(),
            skipped_values: Vec::new(),
        }
    }

    /// Builds a document from amounts that are already canonical.
    ///
    /// Follows the same rules as normalization: identifier fields are ignored here,
    /// negatives clamp to zero and a repeated field keeps the larger value.
    ///
    /// # Example
    ///
    /// ```
    /// use tax_engine::models::{CanonicalField, DocumentType, NormalizedDocument};
    /// use rust_decimal::Decimal;
    ///
    /// let doc = NormalizedDocument::from_amounts(
    ///     DocumentType::W2,
    ///     [(CanonicalField::Wages, Decimal::from(50000))],
    /// );
    /// assert_eq!(doc.amount(CanonicalField::Wages), Decimal::from(50000));
    /// assert_eq!(doc.amount(CanonicalField::InterestIncome), Decimal::ZERO);
    /// ```
    pub fn from_amounts(
        document_type: DocumentType,
        amounts: impl IntoIterator<Item = (CanonicalField, Decimal)>,
    ) -> Self {
        let mut doc = Self::empty(document_type);
        for (field, value) in amounts {
            doc.offer_amount(field, value);
        }
        doc
    }

    /// Records an amount, keeping the larger of the existing and new value.
    ///
    /// Returns true if the stored value changed.
    pub(crate) fn offer_amount(&mut self, field: CanonicalField, value: Decimal) -> bool {
        if !field.is_amount() {
            return false;
        }
        let value = value.max(Decimal::ZERO);
        let slot = self.amounts.entry(field).or_insert(Decimal::ZERO);
        if value > *slot {
            *slot = value;
            true
        } else {
            false
        }
    }

    pub(crate) fn set_identifier(&mut self, field: CanonicalField, value: String) {
        self.identifiers.insert(field, value);
    }

    pub(crate) fn record_mapping(&mut self, mapping: FieldMapping) {
        self.mappings.push(mapping);
    }

    pub(crate) fn record_unmapped(&mut self, label: &str) {
        self.unmapped_labels.push(label.to_string());
    }

    pub(crate) fn record_skipped(&mut self, label: &str) {
        self.skipped_values.push(label.to_string());
    }

    /// The form this document came from.
    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    /// The amount for a field; zero if unreported.
    pub fn amount(&self, field: CanonicalField) -> Decimal {
        self.amounts.get(&field).copied().unwrap_or(Decimal::ZERO)
    }

    /// All amount fields.
    pub fn amounts(&self) -> &BTreeMap<CanonicalField, Decimal> {
        &self.amounts
    }

    /// An identifier string, if one was extracted.
    pub fn identifier(&self, field: CanonicalField) -> Option<&str> {
        self.identifiers.get(&field).map(String::as_str)
    }

    /// All identifiers found on the document.
    pub fn identifiers(&self) -> &BTreeMap<CanonicalField, String> {
        &self.identifiers
    }

    /// The label-to-field decisions made while normalizing.
    pub fn mappings(&self) -> &[FieldMapping] {
        &self.mappings
    }

    /// Labels that matched no rule and were dropped.
    pub fn unmapped_labels(&self) -> &[String] {
        &self.unmapped_labels
    }

    /// Labels that mapped to an amount field but carried no readable amount.
    pub fn skipped_values(&self) -> &[String] {
        &self.skipped_values
    }

    /// True when no amount field is non-zero.
    pub fn is_blank(&self) -> bool {
        self.amounts.values().all(|value| value.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_document_type_serializes_official_names() {
        assert_eq!(serde_json::to_string(&DocumentType::W2).unwrap(), "\"W-2\"");
        assert_eq!(
            serde_json::to_string(&DocumentType::Form1099Nec).unwrap(),
            "\"1099-NEC\""
        );
    }

    #[test]
    fn test_document_type_accepts_aliases() {
        let doc: DocumentType = serde_json::from_str("\"w2\"").unwrap();
        assert_eq!(doc, DocumentType::W2);
        let doc: DocumentType = serde_json::from_str("\"1099-misc\"").unwrap();
        assert_eq!(doc, DocumentType::Form1099Misc);
    }

    #[test]
    fn test_document_type_from_str_is_lenient() {
        assert_eq!("Form W-2".parse::<DocumentType>().unwrap(), DocumentType::W2);
        assert_eq!("1099 INT".parse::<DocumentType>().unwrap(), DocumentType::Form1099Int);
        assert_eq!("paystub".parse::<DocumentType>().unwrap(), DocumentType::Unknown);
    }

    #[test]
    fn test_raw_value_parses_currency_text() {
        assert_eq!(RawValue::from("$23,500.00").as_amount(), Some(dec("23500.00")));
        assert_eq!(RawValue::from(" 12 % ").as_amount(), Some(dec("12")));
        assert_eq!(RawValue::from("($40.10)").as_amount(), Some(dec("-40.10")));
        assert_eq!(RawValue::from("-7").as_amount(), Some(dec("-7")));
    }

    #[test]
    fn test_raw_value_rejects_non_numeric_text() {
        assert_eq!(RawValue::from("").as_amount(), None);
        assert_eq!(RawValue::from("$").as_amount(), None);
        assert_eq!(RawValue::from("12-3456789").as_amount(), None);
        assert_eq!(RawValue::from("ACME Corp").as_amount(), None);
    }

    #[test]
    fn test_raw_value_untagged_deserialization() {
        let value: RawValue = serde_json::from_str("1500.5").unwrap();
        assert_eq!(value, RawValue::Number(dec("1500.5")));
        let value: RawValue = serde_json::from_str("\"$1,500\"").unwrap();
        assert_eq!(value, RawValue::Text("$1,500".to_string()));
    }

    #[test]
    fn test_digit_only_string_stays_text() {
        let value: RawValue = serde_json::from_str("\"012345678\"").unwrap();
        assert_eq!(value, RawValue::Text("012345678".to_string()));
        assert_eq!(value.as_text(), "012345678");
        assert_eq!(value.as_amount(), Some(dec("12345678")));
    }

    #[test]
    fn test_amount_beyond_limit_is_unreadable() {
        assert_eq!(MAX_AMOUNT, dec("1000000000000000"));
        assert_eq!(RawValue::from(MAX_AMOUNT).as_amount(), Some(MAX_AMOUNT));
        assert_eq!(RawValue::Number(dec("50000000000000000000000000000")).as_amount(), None);
        assert_eq!(RawValue::from("-1000000000000000.01").as_amount(), None);
    }

    #[test]
    fn test_empty_document_has_every_amount_field() {
        let doc = NormalizedDocument::empty(DocumentType::Unknown);
        assert_eq!(doc.amounts().len(), CanonicalField::amounts().count());
        assert!(doc.is_blank());
    }

    #[test]
    fn test_offer_amount_keeps_larger_value() {
        let mut doc = NormalizedDocument::empty(DocumentType::W2);
        assert!(doc.offer_amount(CanonicalField::Wages, dec("100")));
        assert!(doc.offer_amount(CanonicalField::Wages, dec("23500")));
        assert!(!doc.offer_amount(CanonicalField::Wages, dec("500")));
        assert_eq!(doc.amount(CanonicalField::Wages), dec("23500"));
    }

    #[test]
    fn test_offer_amount_clamps_negative_to_zero() {
        let mut doc = NormalizedDocument::empty(DocumentType::Form1099B);
        doc.offer_amount(CanonicalField::CapitalGains, dec("-1200"));
        assert_eq!(doc.amount(CanonicalField::CapitalGains), Decimal::ZERO);
    }

    #[test]
    fn test_offer_amount_ignores_identifier_fields() {
        let mut doc = NormalizedDocument::empty(DocumentType::W2);
        assert!(!doc.offer_amount(CanonicalField::EmployeeSsn, dec("123")));
        assert!(!doc.amounts().contains_key(&CanonicalField::EmployeeSsn));
    }
}
