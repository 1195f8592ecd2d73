//! Application Layer
//!
//! Business services and data transfer objects. This layer orchestrates the
//! flow of data between the presentation and domain layers.

pub mod dto;
pub mod services;
