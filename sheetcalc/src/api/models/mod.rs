//! Request and response payloads.

pub mod run;
