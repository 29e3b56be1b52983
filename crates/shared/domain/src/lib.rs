//! Domain layer - Identity and triage value types.
//!
//! This crate contains pure domain types with no infrastructure dependencies.
//! They are shared by the gateway and the triage pipeline.

pub mod constants;
pub mod error;
pub mod identity;
pub mod triage;

pub use constants::*;
pub use error::DomainError;
pub use identity::{IdentityUser, Session, UserProfile};
pub use triage::{InputMode, SpeechLanguage};
