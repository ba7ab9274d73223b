// src/met/mod.rs
pub mod models;
pub mod stations;

pub use models::{Reading, Variable};
pub use stations::{Zone, HYDRO_STATIONS, MET_STATIONS};
