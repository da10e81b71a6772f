//! Stopped-flow kinetics viewer: raw file import, projection along time or
//! wavelength, trace algebra, SVD and tab-delimited export.
//!
//! Everything except rendering lives here so it can be tested headless; the
//! `rusty-stopflow` binary adds the egui front end.

pub mod analysis;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod state;
pub mod trace;
pub mod view;
