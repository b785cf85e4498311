//! HTTP handlers

pub mod health;
pub mod model;
pub mod pages;
pub mod prediction;
