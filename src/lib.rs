//! Filter-and-aggregate pipeline behind the vehicle listings dashboard.
//!
//! The GUI in `main.rs` owns a [`data::model::Dataset`] and calls
//! [`pipeline::render`] whenever the user changes the selection.

pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
