//! Traits for the assistant's external collaborators
//!
//! ```text
//! Natural language understanding:
//!   - IntentClassifier: utterance → IntentLabel
//!
//! Question answering:
//!   - ContextQa: (question, context) → answer
//! ```
//!
//! The dialogue controller depends only on these traits, so backends can be
//! swapped by configuration and replaced with stubs in tests.

mod intent;
mod qa;

pub use intent::IntentClassifier;
pub use qa::ContextQa;
