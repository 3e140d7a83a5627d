//! Custom request extractors.

mod form_input;
mod validated_json;

pub use form_input::FormInput;
pub use validated_json::ValidatedJson;
