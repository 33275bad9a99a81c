//! Body Metrics Tracker (BMT) Library
//!
//! BMI calculation, unit conversion, form validation and weight/BMI history
//! storage.

pub mod bmi;
pub mod build_info;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod tools;
pub mod validation;
