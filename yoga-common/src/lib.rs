//! # Yoga Common Library
//!
//! Shared code for the yoga practice tracker including:
//! - Practice data models (asanas, series, sequences, profiles, reminders)
//! - Ownership grouping and in-section ordering for search lists
//! - Base-letter collation
//! - Pose-creation payload validation
//! - Reminder selection and push payloads
//! - Personal data export
//! - Configuration loading

pub mod asana_input;
pub mod collation;
pub mod config;
pub mod error;
pub mod export;
pub mod grouping;
pub mod models;
pub mod ordering;
pub mod reminders;

pub use error::{Error, Result};
pub use grouping::{group_by_creator, limit_items, GroupConfig, Grouped, SectionMarker};
pub use ordering::{group_and_order, order_in_groups};
