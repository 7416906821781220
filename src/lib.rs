//! arXive: a frontend for rsync mirror synchronisation.
//!
//! Lists what a mirror of the source would delete at the destination, lets
//! the user confirm those deletions, then runs rsync.

pub mod cli;
pub mod session;
pub mod sync;
pub mod window;
pub mod workflow;
