//! drivetimes - Generate synthetic travel-time test data from random point
//! pairs inside a polygon

pub mod api;
pub mod batch;
pub mod collect;
pub mod config;
pub mod domain;
pub mod geometry;
pub mod output;
pub mod pipeline;
