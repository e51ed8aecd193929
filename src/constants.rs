//! # Constants and type definitions for cyclotrace
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! definitions** used throughout the `cyclotrace` library.
//!
//! ## Overview
//!
//! - Radar and geophysical constants
//! - Unit conversions (degrees ↔ radians, meters ↔ kilometers)
//! - Core type aliases used across the crate
//!
//! These definitions are used by all main modules, including the volume data model, the beam
//! geometry, and the vortex-center estimator.

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// Sentinel marking a gate with no usable data, as stored in the `f32` gate buffers
pub const MISSING: f32 = -999.0;

/// The same sentinel widened to `f64`, for metadata fields and matrix entries
pub const MISSING_F64: f64 = -999.0;

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Effective Earth radius under the standard 4/3 atmospheric refraction model, in kilometers
pub const EFFECTIVE_EARTH_RADIUS_KM: f64 = 4.0 * EARTH_RADIUS_KM / 3.0;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Meters → kilometers
pub const M_TO_KM: f64 = 1.0e-3;

/// Default maximum unambiguous range in kilometers, used as the fallback for
/// pre-gridded sources that carry no per-sweep range metadata. Overridable by
/// the surrounding configuration.
pub const DEFAULT_MAX_UNAMBIGUOUS_RANGE_KM: f64 = 148.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Distance in meters
pub type Meter = f64;
/// Speed in meters per second
pub type MetersPerSecond = f64;
