//! sqldraft turns plain-English data change requests into SQL scripts built from a library of
//! templates. Scripts are wrapped in a transaction with COMMIT and ROLLBACK commented out; they
//! are drafts for a human to review, never executed here.

pub mod audit_log;
pub mod config;
pub mod generator;
pub mod logging;
pub mod notify;
pub mod output;
pub mod service;

pub use config::Config;
pub use generator::{GenerationResult, ScriptGenerator, TemplateLibrary};
pub use service::ScriptService;
