// Query filtering for the task collection

use crate::models::Task;

/// Which completion states a query includes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    All,
    Active,
    Completed,
}

impl FilterMode {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::Active => !task.completed,
            FilterMode::Completed => task.completed,
        }
    }
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterMode::All => write!(f, "all"),
            FilterMode::Active => write!(f, "active"),
            FilterMode::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(FilterMode::All),
            "active" => Ok(FilterMode::Active),
            "completed" => Ok(FilterMode::Completed),
            other => Err(format!(
                "unknown filter mode: {} (expected all/active/completed)",
                other
            )),
        }
    }
}

/// Combined filter-mode and search predicate for querying tasks
#[derive(Debug, Clone)]
pub struct Query {
    /// Completion-state filter
    pub mode: FilterMode,
    /// Case-insensitive substring match against task text; empty matches everything
    pub search: String,
}

impl Query {
    pub fn new(mode: FilterMode, search: &str) -> Self {
        Self {
            mode,
            search: search.to_lowercase(),
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.mode.matches(task) && task.text.to_lowercase().contains(&self.search)
    }
}
