//! HTTP request handlers.
//!
//! # Handler Modules
//!
//! - [`run`]: spreadsheet upload and calculation
//! - [`static_assets`]: embedded upload page
//!
//! # Error Handling
//!
//! Handlers return [`crate::errors::Error`], which converts to an HTTP status code and a
//! `{"detail": ...}` JSON body.

pub mod run;
pub mod static_assets;
