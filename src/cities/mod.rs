//! City directory module.
//!
//! Static list of recognized city/region names used for the
//! menu-driven city picker.

mod directory;

pub use directory::{REGIONS, first_letters, starting_with};
