//! Query, statistics and map projections over a table of the world's tallest
//! freestanding structures. The `skyline-atlas` binary renders them with egui.

pub mod config;
pub mod data;
