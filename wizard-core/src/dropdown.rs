use std::fmt;

use crate::{
    binder::Action,
    error::ApiError,
    model::LocationCandidate,
    resolver::Suggestions,
};

pub const CURRENT_LOCATION_LABEL: &str = "Use My Current Location";
pub const NO_RESULTS_LABEL: &str = "No results found";

/// One row of the suggestion list.
#[derive(Debug, Clone, PartialEq)]
pub enum DropdownEntry {
    UseCurrentLocation,
    Candidate(LocationCandidate),
    NoResults,
}

impl fmt::Display for DropdownEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropdownEntry::UseCurrentLocation => f.write_str(CURRENT_LOCATION_LABEL),
            DropdownEntry::Candidate(c) => f.write_str(&c.display_name()),
            DropdownEntry::NoResults => f.write_str(NO_RESULTS_LABEL),
        }
    }
}

/// State of the search box and its suggestion list.
#[derive(Debug, Default)]
pub struct Dropdown {
    term: String,
    results: Vec<LocationCandidate>,
    open: bool,
}

impl Dropdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn focus(&mut self) {
        self.open = true;
    }

    /// Record the suggestions for `term`.
    ///
    /// A failed lookup clears the list and leaves the open flag alone; the
    /// error is handed back for the caller to surface.
    pub fn show(&mut self, term: &str, mut suggestions: Suggestions) -> Option<ApiError> {
        self.term = term.to_string();

        if let Some(err) = suggestions.take_error() {
            self.results.clear();
            return Some(err);
        }

        self.results = suggestions.collect();
        self.open = true;
        None
    }

    /// Rows to display; nothing while closed.
    pub fn entries(&self) -> Vec<DropdownEntry> {
        if !self.open {
            return Vec::new();
        }
        if self.term.trim().is_empty() {
            return vec![DropdownEntry::UseCurrentLocation];
        }
        if self.results.is_empty() {
            return vec![DropdownEntry::NoResults];
        }
        self.results.iter().cloned().map(DropdownEntry::Candidate).collect()
    }

    /// Turn a picked row into the action it stands for.
    pub fn choose(&mut self, entry: &DropdownEntry) -> Option<Action> {
        match entry {
            DropdownEntry::UseCurrentLocation => Some(Action::UseCurrentLocation),
            DropdownEntry::Candidate(candidate) => {
                self.term = candidate.display_name();
                self.open = false;
                Some(Action::SelectCandidate(candidate.clone()))
            }
            DropdownEntry::NoResults => None,
        }
    }

    /// The user interacted somewhere outside the list.
    pub fn dismiss_outside(&mut self) {
        self.open = false;
    }
}
