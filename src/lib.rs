// src/lib.rs — Library root for Lucidra

pub mod api;
pub mod cli;
pub mod coach;
pub mod core;
pub mod infra;
pub mod provider;
pub mod usage;
