//! tilepath CLI library.
//!
//! Scene loading and subcommand handlers for the `tilepath` binary. All
//! routing behaviour lives in `tilepath_lib`; this crate only reads scene
//! files, resolves node references and prints results.

pub mod commands;
pub mod output;
pub mod scene;
