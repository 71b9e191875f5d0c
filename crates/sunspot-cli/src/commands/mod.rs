pub mod config;
pub mod detect;
pub mod download;
pub mod fit;
pub mod track;
pub mod view;
