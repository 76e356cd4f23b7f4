// src/lib.rs
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod game;
pub mod guidance;
pub mod market;
pub mod models;
pub mod quiz;
pub mod report;
pub mod risk;
pub mod scoring;
pub mod store;
pub mod tools;
