//! Filer-supplied options for a tax calculation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// IRS filing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilingStatus {
    /// Single.
    #[serde(rename = "Single")]
    Single,
    /// Married Filing Jointly.
    #[serde(rename = "Married Filing Jointly")]
    MarriedFilingJointly,
    /// Married Filing Separately.
    #[serde(rename = "Married Filing Separately")]
    MarriedFilingSeparately,
    /// Head of Household.
    #[serde(rename = "Head of Household")]
    HeadOfHousehold,
    /// Qualifying Widow(er).
    #[serde(rename = "Qualifying Widow(er)")]
    QualifyingWidow,
}

impl FilingStatus {
    /// All five statuses.
    pub const ALL: [FilingStatus; 5] = [
        Self::Single,
        Self::MarriedFilingJointly,
        Self::MarriedFilingSeparately,
        Self::HeadOfHousehold,
        Self::QualifyingWidow,
    ];

    /// The official display name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::MarriedFilingJointly => "Married Filing Jointly",
            Self::MarriedFilingSeparately => "Married Filing Separately",
            Self::HeadOfHousehold => "Head of Household",
            Self::QualifyingWidow => "Qualifying Widow(er)",
        }
    }

    /// Parses a display name or snake_case form, ignoring case and punctuation.
    ///
    /// # Example
    ///
    /// ```
    /// use tax_engine::models::FilingStatus;
    ///
    /// assert_eq!(FilingStatus::parse("head_of_household"), Some(FilingStatus::HeadOfHousehold));
    /// assert_eq!(FilingStatus::parse("Qualifying Widow(er)"), Some(FilingStatus::QualifyingWidow));
    /// assert_eq!(FilingStatus::parse("Domestic Partner"), None);
    /// ```
    pub fn parse(value: &str) -> Option<Self> {
        let words = normalize_words(value);
        match words.as_str() {
            "single" => Some(Self::Single),
            "married filing jointly" | "mfj" => Some(Self::MarriedFilingJointly),
            "married filing separately" | "mfs" => Some(Self::MarriedFilingSeparately),
            "head of household" | "hoh" => Some(Self::HeadOfHousehold),
            "qualifying widow" | "qualifying widower" | "qualifying widow er"
            | "qualifying surviving spouse" => Some(Self::QualifyingWidow),
            _ => None,
        }
    }

    /// The bracket and EITC table this status shares: Married-Separate uses Single
    /// and Qualifying-Widow uses Married-Joint.
    pub fn table_status(self) -> Self {
        match self {
            Self::Single | Self::MarriedFilingSeparately => Self::Single,
            Self::MarriedFilingJointly | Self::QualifyingWidow => Self::MarriedFilingJointly,
            Self::HeadOfHousehold => Self::HeadOfHousehold,
        }
    }
}

impl std::fmt::Display for FilingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Standard or itemized deduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionType {
    /// The filing-status standard deduction.
    Standard,
    /// A filer-supplied itemized total.
    Itemized,
}

impl DeductionType {
    /// Lenient parse of `"standard"`, `"Itemized"`, `"itemized deduction"` and similar.
    pub fn parse(value: &str) -> Option<Self> {
        let words = normalize_words(value);
        if words.starts_with("standard") {
            Some(Self::Standard)
        } else if words.starts_with("itemiz") {
            Some(Self::Itemized)
        } else {
            None
        }
    }
}

fn normalize_words(value: &str) -> String {
    value
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Options supplied by the filer for one calculation.
///
/// Status and deduction type are kept as the caller sent them; the engine resolves
/// them and records a warning when it has to fall back. Negative dependents and
/// credit overrides are clamped to zero the same way.
///
/// # Example
///
/// ```
/// use tax_engine::models::{FilerConfig, FilingStatus};
///
/// let filer = FilerConfig::new(FilingStatus::HeadOfHousehold).with_dependents(2);
/// assert_eq!(filer.filing_status, "Head of Household");
/// assert_eq!(filer.num_dependents, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilerConfig {
    /// Filing status as supplied; unrecognized values fall back to Single.
    pub filing_status: String,
    /// Number of qualifying dependents.
    pub num_dependents: i64,
    /// `standard` or `itemized`.
    pub deduction_type: String,
    /// Itemized deduction total, used only when `deduction_type` is itemized.
    pub itemized_amount: Decimal,
    /// Education credits claimed.
    pub education_credits: Decimal,
    /// Child tax credit override; the larger of this and the per-dependent amount applies.
    pub child_tax_credit: Decimal,
    /// Earned income credit override; when positive it is used as-is.
    pub earned_income_credit: Decimal,
    /// Any other non-refundable credits, passed through.
    pub other_credits: Decimal,
    /// Compute the EITC from W-2 wages when no override is given.
    pub compute_earned_income_credit: bool,
}

impl Default for FilerConfig {
    fn default() -> Self {
        Self::new(FilingStatus::Single)
    }
}

impl FilerConfig {
    /// A standard-deduction filer with no dependents or credits.
    pub fn new(status: FilingStatus) -> Self {
        Self {
            filing_status: status.as_str().to_string(),
            num_dependents: 0,
            deduction_type: "standard".to_string(),
            itemized_amount: Decimal::ZERO,
            education_credits: Decimal::ZERO,
            child_tax_credit: Decimal::ZERO,
            earned_income_credit: Decimal::ZERO,
            other_credits: Decimal::ZERO,
            compute_earned_income_credit: false,
        }
    }

    /// Sets the number of dependents.
    pub fn with_dependents(mut self, num_dependents: i64) -> Self {
        self.num_dependents = num_dependents;
        self
    }

    /// Switches to an itemized deduction of the given amount.
    pub fn with_itemized(mut self, amount: Decimal) -> Self {
        self.deduction_type = "itemized".to_string();
        self.itemized_amount = amount;
        self
    }

    /// Opts in to computing the EITC from wages.
    pub fn with_computed_eitc(mut self) -> Self {
        self.compute_earned_income_credit = true;
        self
    }
}
