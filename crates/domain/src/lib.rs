#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod context;
mod duration;
mod error;
mod exercise;
mod name;
mod routine;
mod routine_form;
mod service;
mod session;
mod set;
mod user;
mod workout;
mod workout_session;

pub use context::*;
pub use duration::*;
pub use error::*;
pub use exercise::*;
pub use name::*;
pub use routine::*;
pub use routine_form::*;
pub use service::*;
pub use session::*;
pub use set::*;
pub use user::*;
pub use workout::*;
pub use workout_session::*;
