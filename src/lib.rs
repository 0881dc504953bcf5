pub mod config;
pub mod error;
pub mod event;
pub mod feed;
pub mod indicator;
pub mod input;
pub mod model;
pub mod plan;
pub mod ui;
