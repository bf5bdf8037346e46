//! Natural-language request to SQL script generation
//!
//! A free-text request ("change john doe's name to jane doe for user 42") is normalized,
//! classified into an intent, matched against a template library and turned into a
//! transaction-wrapped script with COMMIT/ROLLBACK commented out.
//!
//! # Pipeline
//!
//! 1. [`normalize`] the request
//! 2. [`classify`] it into an [`Intent`]
//! 3. pick a template with [`TemplateLibrary::find_for`]
//! 4. [`extract_values`] for the intent type
//! 5. [`build_script`] from the template and values
//!
//! Steps 2 to 4 can each end the pipeline early with the sentinel script
//! [`NO_MATCH_SCRIPT`] and an explanation. None of them is an error.
//!
//! # Usage
//!
//! ```rust
//! use sqldraft::generator::{ScriptGenerator, TemplateLibrary};
//!
//! let library = TemplateLibrary::from_iter(["DELETE FROM users WHERE user_id = 1;"]);
//! let result = ScriptGenerator::default().generate("delete old row for user 7", &library);
//! assert!(result.script.contains("WHERE user_id = 7;"));
//! ```

pub mod builder;
pub mod cache;
pub mod error;
pub mod extract;
pub mod intent;
pub mod library;
pub mod normalize;

pub use builder::{TemplateShape, build_script};
pub use cache::CachedTemplateProvider;
pub use error::{GeneratorError, GeneratorResult};
pub use extract::{ExtractedValues, extract_values};
pub use intent::{Action, Intent, IntentType, KeywordMode, classify};
pub use library::{
    DirectoryTemplateProvider, StaticTemplateProvider, TemplateLibrary, TemplateProvider,
};
pub use normalize::normalize;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Script returned whenever the pipeline stops early
pub const NO_MATCH_SCRIPT: &str = "/* No match found */";

/// The `{script, explanation}` pair handed back to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub script: String,
    pub explanation: String,
}

impl GenerationResult {
    fn no_match(explanation: impl Into<String>) -> Self {
        Self {
            script: NO_MATCH_SCRIPT.to_string(),
            explanation: explanation.into(),
        }
    }

    /// Whether this is the sentinel result rather than a generated script
    pub fn is_no_match(&self) -> bool {
        self.script == NO_MATCH_SCRIPT
    }
}

/// Runs the request-to-script pipeline against a template library
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptGenerator {
    keyword_mode: KeywordMode,
}

impl ScriptGenerator {
    pub fn new(keyword_mode: KeywordMode) -> Self {
        Self { keyword_mode }
    }

    pub fn keyword_mode(&self) -> KeywordMode {
        self.keyword_mode
    }

    /// Generate a script for a request. Never fails; early exits carry the sentinel script.
    pub fn generate(&self, request: &str, library: &TemplateLibrary) -> GenerationResult {
        let cleaned = normalize(request);
        debug!("Cleaned request: {}", cleaned);

        let Some(intent) = classify(&cleaned, self.keyword_mode) else {
            return GenerationResult::no_match("could not determine update type");
        };
        let intent_type = intent.intent_type;
        debug!("Intent: {} {}", intent.action, intent_type);

        let Some(template) = library.find_for(intent_type) else {
            debug!("No template found for {}", intent_type);
            return GenerationResult::no_match(format!("no matching template for {intent_type}"));
        };
        debug!("Library script chosen: {}", template);

        let values = extract_values(&cleaned, intent_type, self.keyword_mode);
        debug!("Extracted values: {:?}", values);
        if !values.is_complete_for(intent_type) {
            return GenerationResult::no_match(format!(
                "could not parse values for {intent_type}"
            ));
        }

        let script = build_script(template, intent_type, &values);
        debug!("Generated script: {}", script);

        GenerationResult {
            script,
            explanation: format!("updates {intent_type} for a user (review before committing)"),
        }
    }
}
