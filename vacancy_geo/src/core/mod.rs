//! Core domain models for the vacancy geocoding pipeline.
//!
//! This module defines the reference cities, coordinates and match results
//! that flow between the pipeline stages, plus small helpers for reading
//! vacancy frames.

pub mod domain;

pub use domain::{
    column_names, column_text, Gazetteer, GazetteerEntry, GazetteerMatch, GeoPoint, MatchResult,
};
