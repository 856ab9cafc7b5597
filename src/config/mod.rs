//! Configuration loading for the tax engine.
//!
//! This module loads a tax year's tables from YAML files: standard deductions,
//! progressive brackets, self-employment tax parameters and credit tables.
//!
//! # Example
//!
//! ```no_run
//! use tax_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/irs_2024").unwrap();
//! println!("Loaded tables: {}", config.tax_year().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    BracketTables, CreditsConfig, DeductionsConfig, EitcParameters, EitcTables,
    SelfEmploymentConfig, StandardDeductions, TaxBracket, TaxYearConfig, TaxYearMetadata,
};

/// The 2024 tables shipped in `config/irs_2024`, for unit tests.
#[cfg(test)]
pub(crate) fn test_config() -> TaxYearConfig {
    ConfigLoader::load("./config/irs_2024")
        .expect("config/irs_2024 should load")
        .config()
        .clone()
}
