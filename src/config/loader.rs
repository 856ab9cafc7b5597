//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading tax-year
//! configurations from YAML files.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{EngineError, EngineResult};

use super::types::{
    BracketTables, CreditsConfig, DeductionsConfig, SelfEmploymentConfig, TaxYearConfig,
    TaxYearMetadata,
};

/// Loads and provides access to a tax year's configuration.
///
/// # Directory Structure
///
/// ```text
/// config/irs_2024/
/// ├── tax_year.yaml        # Tax year metadata
/// ├── deductions.yaml      # Standard deduction per filing status
/// ├── brackets.yaml        # Progressive bracket tables
/// ├── self_employment.yaml # SE tax factor and rate
/// └── credits.yaml         # Child tax credit and EITC tables
/// ```
///
/// # Example
///
/// ```no_run
/// use tax_engine::config::ConfigLoader;
/// use tax_engine::models::FilingStatus;
///
/// let loader = ConfigLoader::load("./config/irs_2024").unwrap();
/// let deduction = loader
///     .config()
///     .standard_deductions()
///     .for_status(FilingStatus::Single);
/// println!("{} standard deduction: ${}", loader.tax_year().tax_year, deduction);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: TaxYearConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing (`ConfigNotFound`)
    /// - Any file contains invalid YAML or misses a field (`ConfigParseError`)
    /// - A table is internally inconsistent (`InvalidTaxTable`)
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tax_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/irs_2024")?;
    /// # Ok::<(), tax_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<TaxYearMetadata>(&path.join("tax_year.yaml"))?;
        let deductions = Self::load_yaml::<DeductionsConfig>(&path.join("deductions.yaml"))?;
        let brackets = Self::load_yaml::<BracketTables>(&path.join("brackets.yaml"))?;
        let self_employment =
            Self::load_yaml::<SelfEmploymentConfig>(&path.join("self_employment.yaml"))?;
        let credits = Self::load_yaml::<CreditsConfig>(&path.join("credits.yaml"))?;

        let config = TaxYearConfig::new(
            metadata,
            deductions.standard_deduction,
            brackets,
            self_employment,
            credits,
        )?;

        info!(
            tax_year = config.metadata().tax_year,
            path = %path.display(),
            "loaded tax year configuration"
        );

        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying tax year configuration.
    pub fn config(&self) -> &TaxYearConfig {
        &self.config
    }

    /// Returns the tax year metadata.
    pub fn tax_year(&self) -> &TaxYearMetadata {
        self.config.metadata()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FilingStatus;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/irs_2024"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.tax_year().tax_year, 2024);
    }

    #[test]
    fn test_standard_deductions_loaded_correctly() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let deductions = loader.config().standard_deductions();

        assert_eq!(deductions.for_status(FilingStatus::Single), dec("14600"));
        assert_eq!(deductions.for_status(FilingStatus::MarriedFilingJointly), dec("29200"));
        assert_eq!(deductions.for_status(FilingStatus::MarriedFilingSeparately), dec("14600"));
        assert_eq!(deductions.for_status(FilingStatus::HeadOfHousehold), dec("21900"));
        assert_eq!(deductions.for_status(FilingStatus::QualifyingWidow), dec("29200"));
    }

    #[test]
    fn test_bracket_tables_loaded_correctly() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let brackets = loader.config().brackets();

        assert_eq!(brackets.single.len(), 7);
        assert_eq!(brackets.single[1].upper_bound, Some(dec("47150")));
        assert_eq!(brackets.single[6].base_tax, dec("183647.25"));
        assert_eq!(brackets.head_of_household[2].base_tax, dec("7241"));
        assert_eq!(brackets.married_filing_jointly[6].upper_bound, None);
    }

    #[test]
    fn test_status_aliases_share_tables() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let brackets = loader.config().brackets();

        assert_eq!(
            brackets.for_status(FilingStatus::MarriedFilingSeparately),
            brackets.for_status(FilingStatus::Single)
        );
        assert_eq!(
            brackets.for_status(FilingStatus::QualifyingWidow),
            brackets.for_status(FilingStatus::MarriedFilingJointly)
        );
    }

    #[test]
    fn test_self_employment_and_credits_loaded_correctly() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let config = loader.config();

        assert_eq!(config.self_employment().net_earnings_factor, dec("0.9235"));
        assert_eq!(config.self_employment().tax_rate, dec("0.153"));
        assert_eq!(config.credits().child_tax_credit_per_dependent, dec("2000"));

        let eitc = &config.credits().earned_income_credit;
        assert_eq!(eitc.max_dependents, 2);
        let two_kids = eitc.lookup(FilingStatus::MarriedFilingJointly, 2).unwrap();
        assert_eq!(two_kids.max_credit, dec("4964"));
        assert_eq!(two_kids.phase_out_start, dec("23693"));
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("tax_year.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }
}
