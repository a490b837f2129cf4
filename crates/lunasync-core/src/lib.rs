//! Real-time to game-time conversion for lunasync.
//!
//! This crate maps real offset date-times onto a game's day/night clock,
//! folding the real lunar cycle into the in-game moon phase, and applies the
//! result to host worlds.
//!
//! # Modules
//!
//! - [`constants`] -- Day length, day-start offset, and lunar constants.
//! - [`convert`] -- [`TimeConverter`]: the pure date-time to ticks mapping.
//! - [`temporal`] -- Parsing of `now` and ISO-8601 local command values.
//! - [`host`] -- [`WorldHost`] capability trait and [`InMemoryHost`].
//! - [`service`] -- [`DateAndTimeService`]: convert and apply to a world.
//! - [`command`] -- Sync command parsing and execution.
//! - [`config`] -- Configuration loading from `lunasync-config.yaml`.
//!
//! [`TimeConverter`]: convert::TimeConverter
//! [`WorldHost`]: host::WorldHost
//! [`InMemoryHost`]: host::InMemoryHost
//! [`DateAndTimeService`]: service::DateAndTimeService

pub mod command;
pub mod config;
pub mod constants;
pub mod convert;
pub mod host;
pub mod service;
pub mod temporal;
