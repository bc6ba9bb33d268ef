#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
pub mod configs;
pub mod downloads;
pub mod paper;
pub mod repository;
pub mod update;
pub mod verify;

pub mod error;
pub mod http;

pub mod fs;
pub mod java;
pub mod platform;
pub mod server;

pub mod consts;

pub use consts::*;
pub use error::{Error, Result};
