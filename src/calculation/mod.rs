//! Calculation logic for the tax engine.
//!
//! This module aggregates normalized documents into totals and turns those totals
//! into a federal tax result: deduction selection, progressive bracket tax,
//! self-employment tax, the child and earned income credits, and the final refund
//! or amount due. Each step returns its value together with an audit step.

mod aggregation;
mod brackets;
mod credits;
mod deduction;
mod eitc;
mod engine;
mod rounding;
mod self_employment;

pub use aggregation::{NON_TAXABLE_FIELDS, aggregate_documents, document_warnings};
pub use brackets::{FederalTaxResult, bracket_slices, calculate_federal_tax, closed_form_tax};
pub use credits::{ChildTaxCreditResult, CreditTotalResult, calculate_child_tax_credit, total_credits};
pub use deduction::{DeductionResult, determine_deduction};
pub use eitc::{EitcResult, EitcSource, calculate_eitc, eitc_amount};
pub use engine::{calculate_for_documents, calculate_tax};
pub use rounding::round_currency;
pub use self_employment::{SelfEmploymentTaxResult, calculate_self_employment_tax};
