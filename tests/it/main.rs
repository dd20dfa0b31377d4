//! Single test binary entry point.
//!
//! This consolidates all tests into a single binary, reducing linking
//! overhead to one link step.
//!
//! Structure:
//! - helpers: Document fixtures, fake engine, viewer builder
//! - integration: Viewer workflows across components
//! - unit: Single-component unit tests

mod helpers;
mod integration;
mod unit;
