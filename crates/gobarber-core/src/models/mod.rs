//! Data models for the GoBarber client.
//!
//! - `User`: the signed-in user's record as returned by the backend
//! - `Credentials`, `NewUser`: sign-in and sign-up form payloads
//! - `ValidationErrors`: per-field form validation failures

pub mod forms;
pub mod user;

pub use forms::{Credentials, FieldError, NewUser, ValidationErrors};
pub use user::User;
