pub mod confidence;
pub mod rules;
pub mod translation;

pub use rules::AdvisoryEngine;
pub use translation::{TranslationReconstructor, Translator};
