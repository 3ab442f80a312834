//! Federal withholding engine
//!
//! This crate estimates annual U.S. federal withholding using the IRS
//! Publication 15-T percentage method: bracket income tax adjusted by the
//! W-4 Step 3 and Step 4 entries, plus Social Security and Medicare.
//! Results are served through a small web form and a JSON API.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
