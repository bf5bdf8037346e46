//! Request handling around the generation pipeline
//!
//! [`ScriptService`] is what a front end calls: it rejects empty requests, loads the template
//! library, runs the generator and then reports the result to the notification and audit-log
//! sinks. Sink failures are logged and otherwise ignored; they never change the result.

use crate::audit_log::{AuditLog, LogEntry, SqliteAuditLog};
use crate::config::Config;
use crate::generator::{
    CachedTemplateProvider, DirectoryTemplateProvider, GenerationResult, GeneratorError,
    GeneratorResult, ScriptGenerator, TemplateLibrary, TemplateProvider, normalize,
};
use crate::notify::{ConsoleNotifier, Notification, Notifier};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct ScriptService {
    provider: Arc<dyn TemplateProvider>,
    generator: ScriptGenerator,
    audit_log: Option<Arc<dyn AuditLog>>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl ScriptService {
    pub fn new(provider: Arc<dyn TemplateProvider>, generator: ScriptGenerator) -> Self {
        Self {
            provider,
            generator,
            audit_log: None,
            notifier: None,
        }
    }

    pub fn with_audit_log(mut self, audit_log: Arc<dyn AuditLog>) -> Self {
        self.audit_log = Some(audit_log);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Wire the service from configuration: directory templates (cached when a TTL is set),
    /// SQLite audit log and console notifications as enabled.
    ///
    /// An audit database that cannot be opened is logged and the service runs without one.
    pub async fn from_config(config: &Config) -> GeneratorResult<Self> {
        let directory: Arc<dyn TemplateProvider> =
            Arc::new(DirectoryTemplateProvider::new(&config.library_dir));
        let provider: Arc<dyn TemplateProvider> = match config.matching.cache_ttl_seconds {
            0 => directory,
            ttl => Arc::new(CachedTemplateProvider::new(
                directory,
                Duration::from_secs(ttl),
            )),
        };

        let mut service = Self::new(provider, ScriptGenerator::new(config.matching.keyword_mode));

        if config.audit.enabled {
            match SqliteAuditLog::open(&config.audit.database_path).await {
                Ok(log) => service = service.with_audit_log(Arc::new(log)),
                Err(e) => warn!(
                    "Audit log {} unavailable, continuing without it: {}",
                    config.audit.database_path.display(),
                    e
                ),
            }
        }
        if config.notification.enabled {
            service = service.with_notifier(Arc::new(ConsoleNotifier::new(
                config.notification.recipient.clone(),
            )));
        }

        Ok(service)
    }

    pub async fn library(&self) -> GeneratorResult<Arc<TemplateLibrary>> {
        self.provider.load().await
    }

    /// Generate a script for `request` on behalf of `user`
    pub async fn handle(&self, request: &str, user: &str) -> GeneratorResult<GenerationResult> {
        let request = request.trim();
        if normalize(request).is_empty() {
            return Err(GeneratorError::EmptyRequest);
        }
        info!("Received request: {}", request);

        let library = self.provider.load().await?;
        let result = self.generator.generate(request, &library);
        debug!("Explanation: {}", result.explanation);

        if let Some(notifier) = &self.notifier {
            let notification = Notification {
                request: request.to_string(),
                script: result.script.clone(),
                explanation: result.explanation.clone(),
            };
            if let Err(e) = notifier.notify(&notification).await {
                warn!("Notification failed: {}", e);
            }
        }

        if let Some(audit_log) = &self.audit_log {
            let entry = LogEntry::now(user, request, result.script.clone());
            if let Err(e) = audit_log.append(&entry).await {
                warn!("Could not write audit log entry: {}", e);
            }
        }

        Ok(result)
    }

    /// Recent audit-log entries, newest first; empty when auditing is off
    pub async fn history(&self, limit: usize) -> GeneratorResult<Vec<LogEntry>> {
        match &self.audit_log {
            Some(audit_log) => audit_log.recent(limit).await,
            None => Ok(Vec::new()),
        }
    }
}
