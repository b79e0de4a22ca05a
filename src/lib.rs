pub mod app;
pub mod config;
pub mod controller;
pub mod display;
pub mod fetch_error;
pub mod fetcher;
pub mod refresh;
pub mod scheduler;
