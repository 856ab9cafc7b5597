//! Tax form normalization and federal tax estimation.
//!
//! This crate reads semi-structured text from W-2 and 1099 forms, maps each label
//! onto a fixed set of canonical fields, aggregates a filer's documents and
//! estimates federal income tax, self-employment tax, credits and the resulting
//! refund or amount due. Every calculation step is recorded in an audit trace.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod extraction;
pub mod models;
