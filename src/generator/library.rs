//! Template library and template providers
//!
//! A library is an ordered list of raw SQL templates. Order matters only for matching:
//! the first template whose text signals the intent type wins.

use super::error::{GeneratorError, GeneratorResult};
use super::intent::IntentType;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// An ordered, read-only collection of raw template strings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateLibrary {
    templates: Vec<String>,
}

impl TemplateLibrary {
    pub fn new(templates: Vec<String>) -> Self {
        Self { templates }
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.templates.iter().map(String::as_str)
    }

    /// First template relevant to the intent type, in library order
    pub fn find_for(&self, intent_type: IntentType) -> Option<&str> {
        self.iter()
            .find(|template| template_matches(template, intent_type))
    }
}

impl<S: Into<String>> FromIterator<S> for TemplateLibrary {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// Whether a template's text signals relevance to the intent type
pub fn template_matches(template: &str, intent_type: IntentType) -> bool {
    let lower = template.to_lowercase();
    match intent_type {
        IntentType::Name | IntentType::Phone | IntentType::Email | IntentType::Status => {
            lower.contains(intent_type.keyword())
                && (lower.contains("set") || lower.contains("update"))
        }
        IntentType::Delete => lower.contains("delete"),
        IntentType::Insert => lower.contains("insert"),
    }
}

/// Every intent type a template would be chosen for (if no earlier template claims it)
pub fn matching_types(template: &str) -> Vec<IntentType> {
    IntentType::ALL
        .into_iter()
        .filter(|intent_type| template_matches(template, *intent_type))
        .collect()
}

/// Source of the template library
#[async_trait]
pub trait TemplateProvider: Send + Sync {
    async fn load(&self) -> GeneratorResult<Arc<TemplateLibrary>>;
}

/// Serves a fixed library held in memory
pub struct StaticTemplateProvider {
    library: Arc<TemplateLibrary>,
}

impl StaticTemplateProvider {
    pub fn new(library: TemplateLibrary) -> Self {
        Self {
            library: Arc::new(library),
        }
    }
}

#[async_trait]
impl TemplateProvider for StaticTemplateProvider {
    async fn load(&self) -> GeneratorResult<Arc<TemplateLibrary>> {
        Ok(Arc::clone(&self.library))
    }
}

/// Reads one template per file from a directory, ordered by file name
pub struct DirectoryTemplateProvider {
    dir: PathBuf,
}

impl DirectoryTemplateProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl TemplateProvider for DirectoryTemplateProvider {
    async fn load(&self) -> GeneratorResult<Arc<TemplateLibrary>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(GeneratorError::LibraryNotFound(self.dir.clone()));
            }
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let hidden = entry.file_name().to_string_lossy().starts_with('.');
            if !hidden && entry.file_type().await?.is_file() {
                files.push(entry.path());
            }
        }
        files.sort();

        let mut templates = Vec::with_capacity(files.len());
        for path in &files {
            templates.push(tokio::fs::read_to_string(path).await?);
        }

        debug!(
            "Loaded {} templates from {}",
            templates.len(),
            self.dir.display()
        );
        Ok(Arc::new(TemplateLibrary::new(templates)))
    }
}
