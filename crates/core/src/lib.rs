pub mod catalog;
pub mod compose;
pub mod intent;
pub mod models;

pub use catalog::{canonical_country_name, validate_country_name, validate_message, ValidationError};
pub use compose::{compose_country_reply, no_country_reply, top_tips, used_fallback};
pub use intent::{classify_intent, looks_like_greeting};
pub use models::*;
