//! Core data models for the tax engine.
//!
//! This module contains the canonical field vocabulary and every type that flows
//! between extraction, aggregation and calculation.

mod audit;
mod canonical_field;
mod document;
mod filer;
mod tax_result;
mod totals;

pub use audit::{AuditStep, AuditTrace, AuditWarning, WarningCode};
pub use canonical_field::{CanonicalField, FieldKind};
pub use document::{
    DocumentType, FieldMapping, MAX_AMOUNT, MatchSource, NormalizedDocument, RawFields, RawValue,
};
pub use filer::{DeductionType, FilerConfig, FilingStatus};
pub use tax_result::{
    BracketSlice, CreditSummary, DeductionSummary, IncomeSummary, ResultType, TaxResult,
    WithholdingSummary,
};
pub use totals::AggregatedTotals;
