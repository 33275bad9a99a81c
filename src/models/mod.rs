//! Data models
//!
//! Rust structs representing database entities.

mod bmi_record;
mod profile;
mod weight_entry;

pub use bmi_record::{BmiRecord, BmiRecordCreate};
pub use profile::{Gender, UserProfile, UserProfileCreate, UserProfileUpdate};
pub use weight_entry::{WeightEntry, WeightEntryCreate};
