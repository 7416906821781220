//! Window module - toolkit-independent core of the graphical frontend.

mod controller;
#[cfg(test)]
mod controller_test;

pub use controller::{
    AboutInfo, Candidate, ConfigForm, ConsoleLine, DirectoryRole, Tone, WindowController,
};
