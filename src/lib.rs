//! Probekit - supervised ffprobe/ffmpeg runs from the command line
//!
//! This library crate exposes configuration loading for the binary and for
//! integration testing. Media operations live in [`probekit_av`].

pub mod config;

pub use probekit_av as av;
