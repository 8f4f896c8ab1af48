//! ObservationScope for automatic begin/complete logging
//!
//! - Logs `{name}_BEGIN` on creation
//! - Logs `{name}_COMPLETE` on `complete()`
//! - Logs `{name}_FAILED` on `fail()`
//! - Logs `{name}_INCOMPLETE` if dropped without either

use std::time::Instant;

use super::logger::Logger;

/// A scope that logs the start and end of a build phase
///
/// ```ignore
/// let scope = ObservationScope::with_fields("DATABASE_INIT", &[("tables", "6")]);
/// // ... do work ...
/// scope.complete();
/// ```
pub struct ObservationScope {
    name: String,
    fields: Vec<(String, String)>,
    started: Instant,
    finished: bool,
}

impl ObservationScope {
    /// Create a new observation scope
    pub fn new(name: &str) -> Self {
        Self::with_fields(name, &[])
    }

    /// Create a new observation scope with fields repeated on every event
    pub fn with_fields(name: &str, fields: &[(&str, &str)]) -> Self {
        Logger::info(&format!("{}_BEGIN", name), fields);

        Self {
            name: name.to_string(),
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            started: Instant::now(),
            finished: false,
        }
    }

    /// Mark the scope as successfully completed
    pub fn complete(self) {
        self.complete_with_fields(&[]);
    }

    /// Mark the scope as completed with additional fields
    pub fn complete_with_fields(mut self, extra_fields: &[(&str, &str)]) {
        self.finished = true;
        let elapsed = self.elapsed_ms();
        let mut fields = self.field_refs();
        fields.extend(extra_fields.iter().copied());
        fields.push(("elapsed_ms", elapsed.as_str()));
        Logger::info(&format!("{}_COMPLETE", self.name), &fields);
    }

    /// Mark the scope as failed with a reason
    pub fn fail(mut self, reason: &str) {
        self.finished = true;
        let mut fields = self.field_refs();
        fields.push(("reason", reason));
        Logger::error(&format!("{}_FAILED", self.name), &fields);
    }

    /// Milliseconds since the scope began
    pub fn elapsed_ms(&self) -> String {
        self.started.elapsed().as_millis().to_string()
    }

    fn field_refs(&self) -> Vec<(&str, &str)> {
        self.fields
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}

impl Drop for ObservationScope {
    fn drop(&mut self) {
        if !self.finished {
            Logger::warn(
                &format!("{}_INCOMPLETE", self.name),
                &[("reason", "scope dropped without completion")],
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_complete() {
        let scope = ObservationScope::new("TEST");
        scope.complete();
    }

    #[test]
    fn test_scope_complete_with_extra_fields() {
        let scope = ObservationScope::with_fields("TEST", &[("table", "participants")]);
        scope.complete_with_fields(&[("statements", "3")]);
    }

    #[test]
    fn test_scope_fail() {
        let scope = ObservationScope::new("TEST");
        scope.fail("something went wrong");
    }

    #[test]
    fn test_scope_drop_without_complete() {
        let scope = ObservationScope::new("TEST");
        drop(scope);
    }
}
