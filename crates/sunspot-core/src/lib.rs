pub mod acquisition;
pub mod config;
pub mod consts;
pub mod detection;
pub mod error;
pub mod filters;
pub mod frame;
pub mod geometry;
pub mod io;
pub mod normalize;
pub mod progress;
pub mod rotation;
pub mod series;
pub mod store;
pub mod tracking;
