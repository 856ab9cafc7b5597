//! HTTP API module for the tax engine.
//!
//! This module provides the REST endpoints: `/extract` for raw text extraction,
//! `/normalize` for mapping one document onto canonical fields, and `/calculate`
//! for the full multi-document tax calculation.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CalculationRequest, DocumentRequest, ExtractRequest};
pub use response::{ApiError, CalculationResponse};
pub use state::AppState;
