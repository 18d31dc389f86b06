//! Topic selection and pre-publish duplicate validation.
//!
//! [`TopicSelector`] picks the next topic from the catalog under the
//! diversity engine's weights; [`DuplicateValidator`] decides whether a
//! finished piece is distinct enough from recent history to publish.

pub mod selector;
pub mod types;
pub mod validator;

pub use selector::TopicSelector;
pub use types::*;
pub use validator::DuplicateValidator;
