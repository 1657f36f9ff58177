// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.

use std::fmt;
use std::path::Path;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct OqError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl OqError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn invalid_payload(error: &serde_json::Error) -> Self {
        OqError::new("payload is not valid JSON")
            .with_context(error.to_string())
            .with_suggestion(r#"Quote the payload for your shell: --payload '{"name": "Ada"}'"#)
    }

    pub fn store_unavailable(dir: &Path) -> Self {
        OqError::new(format!("cannot open store directory {}", dir.display()))
            .with_suggestion("Check that the directory is writable")
            .with_suggestion("Point at another directory with --store DIR")
    }

    pub fn corrupt_store(dir: &Path) -> Self {
        OqError::new(format!("stored queue in {} cannot be read", dir.display()))
            .with_context("The record may have been truncated or edited by hand")
            .with_suggestion(format!(
                "Move {} aside to start with an empty queue",
                dir.display()
            ))
    }

    pub fn no_executors(config_path: &Path) -> Self {
        OqError::new("no executors configured")
            .with_context(format!("{} defines no [executors] tables", config_path.display()))
            .with_context("Sweeping now would drop every queued action as unhandled")
            .with_suggestion(format!(
                "Add an endpoint to {}:\n\n     [executors.CONTACT_FORM_SUBMIT]\n     url = \"https://example.com/api/contact\"",
                config_path.display()
            ))
    }
}

impl fmt::Display for OqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for OqError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}
