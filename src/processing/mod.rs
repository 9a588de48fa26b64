// src/processing/mod.rs
//! Derived metrics computed from buffered samples and spectra

pub mod balance;
pub mod bands;
pub mod harmonics;
pub mod heart_rate;
pub mod smoothing;
pub mod spatial;
pub mod spectrum;
pub mod stats;

pub use balance::*;
pub use bands::*;
pub use harmonics::*;
pub use heart_rate::*;
pub use smoothing::*;
pub use spatial::*;
pub use spectrum::*;
pub use stats::*;
