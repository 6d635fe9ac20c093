// Crate root library declaration and module exports.
pub mod accumulator;
pub mod cli;
pub mod config;
pub mod context;
pub mod controller;
pub mod convert;
pub mod error;
pub mod html;
pub mod model;
pub mod source;
pub mod storage;
