//! Grid engines for a treasure-digging minigame: mining-pattern propagation, treasure
//! placement, and a dig site that ties both to per-cell material.
#![no_std]

extern crate alloc;

pub use config::*;
pub use error::*;
pub use generator::*;
pub use layout::*;
pub use pattern::*;
pub use shape::*;
pub use site::*;
pub use tool::*;
pub use types::*;

mod config;
mod error;
mod generator;
mod layout;
mod pattern;
mod shape;
mod site;
mod tool;
mod types;
