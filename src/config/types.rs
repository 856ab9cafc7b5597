//! Configuration types for a tax year.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files, and the validation that
//! runs once they are assembled.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{EngineError, EngineResult};
use crate::models::FilingStatus;

/// Metadata about the tax year tables.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxYearMetadata {
    /// The tax year (e.g., 2024).
    pub tax_year: u16,
    /// Human-readable name of the table set.
    pub name: String,
    /// URL of the IRS publication the tables come from.
    pub source_url: String,
}

/// Standard deduction per filing status.
#[derive(Debug, Clone, Deserialize)]
pub struct StandardDeductions {
    /// Single.
    pub single: Decimal,
    /// Married Filing Jointly.
    pub married_filing_jointly: Decimal,
    /// Married Filing Separately.
    pub married_filing_separately: Decimal,
    /// Head of Household.
    pub head_of_household: Decimal,
    /// Qualifying Widow(er).
    pub qualifying_widow: Decimal,
}

impl StandardDeductions {
    /// The standard deduction for a filing status.
    pub fn for_status(&self, status: FilingStatus) -> Decimal {
        match status {
            FilingStatus::Single => self.single,
            FilingStatus::MarriedFilingJointly => self.married_filing_jointly,
            FilingStatus::MarriedFilingSeparately => self.married_filing_separately,
            FilingStatus::HeadOfHousehold => self.head_of_household,
            FilingStatus::QualifyingWidow => self.qualifying_widow,
        }
    }
}

/// Deductions file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct DeductionsConfig {
    /// Standard deduction table.
    pub standard_deduction: StandardDeductions,
}

/// One progressive bracket. Its floor is the previous bracket's upper bound.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaxBracket {
    /// Upper bound of the bracket; `None` for the top bracket.
    pub upper_bound: Option<Decimal>,
    /// Marginal rate.
    pub rate: Decimal,
    /// Cumulative tax owed at the bracket's floor.
    pub base_tax: Decimal,
}

/// Bracket tables. Married-Separate shares Single and Qualifying-Widow shares
/// Married-Joint.
#[derive(Debug, Clone, Deserialize)]
pub struct BracketTables {
    /// Single (and Married Filing Separately).
    pub single: Vec<TaxBracket>,
    /// Married Filing Jointly (and Qualifying Widow(er)).
    pub married_filing_jointly: Vec<TaxBracket>,
    /// Head of Household.
    pub head_of_household: Vec<TaxBracket>,
}

impl BracketTables {
    /// The bracket table a filing status uses.
    pub fn for_status(&self, status: FilingStatus) -> &[TaxBracket] {
        match status.table_status() {
            FilingStatus::MarriedFilingJointly => &self.married_filing_jointly,
            FilingStatus::HeadOfHousehold => &self.head_of_household,
            _ => &self.single,
        }
    }
}

/// Self-employment tax parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct SelfEmploymentConfig {
    /// Share of net profit treated as net earnings from self-employment.
    pub net_earnings_factor: Decimal,
    /// Combined social security and medicare rate.
    pub tax_rate: Decimal,
}

/// EITC parameters for one dependent count.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EitcParameters {
    /// Number of qualifying children.
    pub dependents: u32,
    /// Rate at which the credit phases in.
    pub phase_in_rate: Decimal,
    /// Maximum credit.
    pub max_credit: Decimal,
    /// Earned income above which the credit phases out.
    pub phase_out_start: Decimal,
    /// Rate at which the credit phases out.
    pub phase_out_rate: Decimal,
}

/// EITC tables. Only Single and Married-Joint tables exist; Head-of-Household and
/// Married-Separate use Single, Qualifying-Widow uses Married-Joint.
#[derive(Debug, Clone, Deserialize)]
pub struct EitcTables {
    /// Filers with more dependents than this get no computed credit.
    pub max_dependents: u32,
    /// Single, Head of Household and Married Filing Separately.
    pub single: Vec<EitcParameters>,
    /// Married Filing Jointly and Qualifying Widow(er).
    pub married_filing_jointly: Vec<EitcParameters>,
}

impl EitcTables {
    /// Looks up parameters for a status and dependent count.
    pub fn lookup(&self, status: FilingStatus, dependents: u32) -> Option<&EitcParameters> {
        if dependents > self.max_dependents {
            return None;
        }
        let table = match status {
            FilingStatus::MarriedFilingJointly | FilingStatus::QualifyingWidow => {
                &self.married_filing_jointly
            }
            FilingStatus::Single
            | FilingStatus::HeadOfHousehold
            | FilingStatus::MarriedFilingSeparately => &self.single,
        };
        table.iter().find(|row| row.dependents == dependents)
    }
}

/// Credits file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct CreditsConfig {
    /// Child tax credit per qualifying dependent.
    pub child_tax_credit_per_dependent: Decimal,
    /// Earned income credit tables.
    pub earned_income_credit: EitcTables,
}

/// The complete, validated configuration for one tax year.
#[derive(Debug, Clone)]
pub struct TaxYearConfig {
    metadata: TaxYearMetadata,
    standard_deductions: StandardDeductions,
    brackets: BracketTables,
    self_employment: SelfEmploymentConfig,
    credits: CreditsConfig,
}

impl TaxYearConfig {
    /// Assembles a configuration from its parts, rejecting inconsistent tables.
    ///
    /// Each bracket table must have ascending upper bounds, exactly one unbounded
    /// final bracket, rates within `[0, 1]`, and cumulative `base_tax` values that
    /// equal the tax accumulated by walking the brackets below them.
    pub fn new(
        metadata: TaxYearMetadata,
        standard_deductions: StandardDeductions,
        brackets: BracketTables,
        self_employment: SelfEmploymentConfig,
        credits: CreditsConfig,
    ) -> EngineResult<Self> {
        validate_deductions(&standard_deductions)?;
        validate_brackets("brackets.single", &brackets.single)?;
        validate_brackets(
            "brackets.married_filing_jointly",
            &brackets.married_filing_jointly,
        )?;
        validate_brackets("brackets.head_of_household", &brackets.head_of_household)?;
        validate_self_employment(&self_employment)?;
        validate_eitc(&credits.earned_income_credit)?;

        Ok(Self {
            metadata,
            standard_deductions,
            brackets,
            self_employment,
            credits,
        })
    }

    /// Returns the tax year metadata.
    pub fn metadata(&self) -> &TaxYearMetadata {
        &self.metadata
    }

    /// Returns the standard deduction table.
    pub fn standard_deductions(&self) -> &StandardDeductions {
        &self.standard_deductions
    }

    /// Returns the bracket tables.
    pub fn brackets(&self) -> &BracketTables {
        &self.brackets
    }

    /// Returns the self-employment tax parameters.
    pub fn self_employment(&self) -> &SelfEmploymentConfig {
        &self.self_employment
    }

    /// Returns the credit parameters.
    pub fn credits(&self) -> &CreditsConfig {
        &self.credits
    }
}

fn invalid(table: &str, message: String) -> EngineError {
    EngineError::InvalidTaxTable {
        table: table.to_string(),
        message,
    }
}

fn validate_deductions(deductions: &StandardDeductions) -> EngineResult<()> {
    for status in FilingStatus::ALL {
        if deductions.for_status(status) < Decimal::ZERO {
            return Err(invalid(
                "standard_deduction",
                format!("negative deduction for {status}"),
            ));
        }
    }
    Ok(())
}

fn validate_brackets(table: &str, brackets: &[TaxBracket]) -> EngineResult<()> {
    let Some(last) = brackets.last() else {
        return Err(invalid(table, "no brackets".to_string()));
    };
    if last.upper_bound.is_some() {
        return Err(invalid(table, "final bracket must be unbounded".to_string()));
    }

    let mut floor = Decimal::ZERO;
    let mut expected_base = Decimal::ZERO;
    for (i, bracket) in brackets.iter().enumerate() {
        if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
            return Err(invalid(table, format!("bracket {i} rate {} out of range", bracket.rate)));
        }
        if bracket.base_tax != expected_base {
            return Err(invalid(
                table,
                format!(
                    "bracket {i} base {} does not match walk {}",
                    bracket.base_tax, expected_base
                ),
            ));
        }

        match bracket.upper_bound {
            Some(upper) if upper <= floor => {
                return Err(invalid(
                    table,
                    format!("bracket {i} upper bound {upper} is not above {floor}"),
                ));
            }
            Some(upper) => {
                expected_base += (upper - floor) * bracket.rate;
                floor = upper;
            }
            None if i + 1 != brackets.len() => {
                return Err(invalid(table, format!("bracket {i} is unbounded but not last")));
            }
            None => {}
        }
    }
    Ok(())
}

fn validate_self_employment(config: &SelfEmploymentConfig) -> EngineResult<()> {
    let in_unit_range = |value: Decimal| value >= Decimal::ZERO && value <= Decimal::ONE;
    if !in_unit_range(config.net_earnings_factor) || !in_unit_range(config.tax_rate) {
        return Err(invalid(
            "self_employment",
            "factor and rate must be between 0 and 1".to_string(),
        ));
    }
    Ok(())
}

fn validate_eitc(tables: &EitcTables) -> EngineResult<()> {
    for (name, table) in [
        ("earned_income_credit.single", &tables.single),
        (
            "earned_income_credit.married_filing_jointly",
            &tables.married_filing_jointly,
        ),
    ] {
        for dependents in 0..=tables.max_dependents {
            if !table.iter().any(|row| row.dependents == dependents) {
                return Err(invalid(
                    name,
                    format!("missing row for {dependents} dependents"),
                ));
            }
        }
    }
    Ok(())
}
