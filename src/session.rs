//! Session state and the reducer operations that mutate it
//!
//! Records accumulate across submissions in insertion order. The selection
//! always points at an existing record or is None.

use crate::services::{Aggregator, ReportExtractor};
use crate::types::{DashboardStats, ExtractError, ReportRecord};

/// Which top-level view is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Input,
    Dashboard,
}

/// Irreversible action waiting for the user's confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    ClearAll,
    Remove(usize),
}

/// In-memory session
#[derive(Debug, Default)]
pub struct Session {
    records: Vec<ReportRecord>,
    selected: Option<usize>,
    view_mode: ViewMode,
    input: String,
    busy: bool,
    error: Option<String>,
    pending: Option<PendingAction>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ReportRecord] {
        &self.records
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_record(&self) -> Option<&ReportRecord> {
        self.selected.and_then(|i| self.records.get(i))
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Message of the last failed submission
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn pending(&self) -> Option<PendingAction> {
        self.pending
    }

    pub fn is_input_blank(&self) -> bool {
        self.input.trim().is_empty()
    }

    /// Submit control is enabled
    pub fn can_submit(&self) -> bool {
        !self.busy && !self.is_input_blank()
    }

    /// Dashboard statistics, recomputed from the current records
    pub fn stats(&self) -> Option<DashboardStats> {
        Aggregator::summarize(&self.records)
    }

    // ========== Submission ==========

    /// Start a submission of the input buffer.
    ///
    /// Returns the text to extract, or None when the input is blank or a
    /// submission is already in flight. Sets the busy flag on success.
    pub fn begin_submit(&mut self) -> Option<String> {
        if !self.can_submit() {
            tracing::debug!(busy = self.busy, "submission ignored");
            return None;
        }
        self.busy = true;
        self.error = None;
        Some(self.input.clone())
    }

    /// Apply the outcome of an extraction started by `begin_submit`.
    ///
    /// On success the records are appended, the view switches to the
    /// dashboard and the input is cleared. On failure only the error
    /// message changes.
    pub fn finish_submit(
        &mut self,
        result: Result<Vec<ReportRecord>, ExtractError>,
    ) -> Result<usize, ExtractError> {
        self.busy = false;

        let outcome = match result {
            Ok(records) if records.is_empty() => Err(ExtractError::NoResults),
            other => other,
        };

        match outcome {
            Ok(records) => {
                let added = records.len();
                self.records.extend(records);
                self.view_mode = ViewMode::Dashboard;
                self.input.clear();
                self.error = None;
                tracing::info!(added, total = self.records.len(), "records added");
                Ok(added)
            }
            Err(e) => {
                tracing::warn!(error = %e, "submission failed");
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Submit the current input buffer synchronously.
    /// Returns None when nothing was submitted.
    pub fn submit_with(
        &mut self,
        extractor: &dyn ReportExtractor,
    ) -> Option<Result<usize, ExtractError>> {
        let text = self.begin_submit()?;
        let result = extractor.extract(&text);
        Some(self.finish_submit(result))
    }

    /// Submit `raw_text` synchronously. Blank text leaves the session untouched.
    pub fn submit(
        &mut self,
        raw_text: &str,
        extractor: &dyn ReportExtractor,
    ) -> Option<Result<usize, ExtractError>> {
        if raw_text.trim().is_empty() || self.busy {
            return None;
        }
        self.input = raw_text.to_string();
        self.submit_with(extractor)
    }

    /// Hide the last error message. Returns true if one was shown.
    pub fn dismiss_error(&mut self) -> bool {
        self.error.take().is_some()
    }

    // ========== Confirmation ==========

    /// Ask to clear every record
    pub fn request_clear_all(&mut self) {
        if !self.busy && !self.records.is_empty() {
            self.pending = Some(PendingAction::ClearAll);
        }
    }

    /// Ask to remove the record at `index`
    pub fn request_remove(&mut self, index: usize) {
        if !self.busy && index < self.records.len() {
            self.pending = Some(PendingAction::Remove(index));
        }
    }

    pub fn request_remove_selected(&mut self) {
        if let Some(index) = self.selected {
            self.request_remove(index);
        }
    }

    /// Apply the pending action. Returns true if something was applied.
    /// Nothing is applied while an extraction is in flight.
    pub fn confirm(&mut self) -> bool {
        if self.busy {
            return false;
        }
        match self.pending.take() {
            Some(PendingAction::ClearAll) => {
                self.clear_all();
                true
            }
            Some(PendingAction::Remove(index)) => self.remove_at(index).is_some(),
            None => false,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    // ========== Mutations (after confirmation) ==========

    /// Drop every record and return to the input view
    pub fn clear_all(&mut self) {
        if self.busy {
            return;
        }
        let removed = self.records.len();
        self.records.clear();
        self.selected = None;
        self.view_mode = ViewMode::Input;
        tracing::info!(removed, "session cleared");
    }

    /// Remove one record, keeping the selection valid
    pub fn remove_at(&mut self, index: usize) -> Option<ReportRecord> {
        if self.busy || index >= self.records.len() {
            return None;
        }
        let removed = self.records.remove(index);

        if self.records.is_empty() {
            self.view_mode = ViewMode::Input;
            self.selected = None;
        } else if let Some(selected) = self.selected {
            if selected >= self.records.len() {
                self.selected = Some(self.records.len() - 1);
            }
        }

        tracing::info!(index, remaining = self.records.len(), "record removed");
        Some(removed)
    }

    // ========== Navigation ==========

    pub fn select(&mut self, index: usize) {
        if index < self.records.len() {
            self.selected = Some(index);
        }
    }

    pub fn select_next(&mut self) {
        let len = self.records.len();
        if len == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            None => 0,
            Some(i) => (i + 1).min(len - 1),
        });
    }

    pub fn select_prev(&mut self) {
        let len = self.records.len();
        if len == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            None => len - 1,
            Some(i) => i.saturating_sub(1),
        });
    }

    /// Switch views. The dashboard is only reachable with records and
    /// while no extraction is in flight.
    pub fn set_view_mode(&mut self, mode: ViewMode) -> bool {
        if mode == ViewMode::Dashboard && (self.busy || self.records.is_empty()) {
            return false;
        }
        self.view_mode = mode;
        true
    }

    // ========== Input buffer ==========

    pub fn push_char(&mut self, c: char) {
        if !self.busy {
            self.input.push(c);
        }
    }

    /// Append pasted text, normalizing line endings
    pub fn push_str(&mut self, text: &str) {
        if !self.busy {
            self.input.push_str(&text.replace("\r\n", "\n").replace('\r', "\n"));
        }
    }

    pub fn backspace(&mut self) {
        if !self.busy {
            self.input.pop();
        }
    }

    pub fn clear_input(&mut self) {
        if !self.busy {
            self.input.clear();
        }
    }
}
