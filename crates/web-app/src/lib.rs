#![warn(clippy::pedantic)]

pub mod alert;
pub mod log;
pub mod service;
pub mod stopwatch;
