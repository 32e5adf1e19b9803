//! landpoints - Generate random coordinates inside a region's land boundary
//! and submit them to a routing table API

pub mod api;
pub mod config;
pub mod domain;
pub mod geometry;
pub mod output;
