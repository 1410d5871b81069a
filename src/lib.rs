// src/lib.rs

//! bounty-watch: scope feed monitor library
//!
//! Compares the HackerOne and Bugcrowd scope feeds against the last stored
//! snapshot, derives probe URLs for new assets, and sends one alert each.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod trigger;
pub mod utils;
