//! Scheme of work model.
//!
//! Loads flat CSV configuration tables (units, objectives, keywords,
//! assessments, group allocations, half terms) into an in-memory
//! [`SchemeLibrary`] ready for page rendering.

pub mod extract;
pub mod library;
pub mod settings;
pub mod tables;
pub mod textbooks;

pub use crate::library::{
    AllocatedScheme, AssessmentQuestion, HalfTerm, Scheme, SchemeLibrary, SchemeUnit,
};
pub use crate::settings::Settings;
pub use crate::textbooks::TextbookLink;
