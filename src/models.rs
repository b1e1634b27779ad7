// Data models for the task tracker

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub text: String,
    pub completed: bool,
    pub priority: Priority,
    #[serde(rename = "dueDate", default)]
    pub due_date: Option<NaiveDate>,
}

impl Task {
    /// A task is overdue when its due date is strictly before `today`
    /// and it has not been completed. Display-only; the stored task
    /// carries no overdue flag.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.due_date {
            Some(due) => due < today && !self.completed,
            None => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Display rank: high sorts before medium sorts before low.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(format!("unknown priority: {} (expected high/medium/low)", other)),
        }
    }
}

/// Fallback collection used when no valid persisted state exists.
pub fn seed_tasks() -> Vec<Task> {
    vec![
        Task {
            id: 1,
            text: "Complete project proposal".to_string(),
            completed: false,
            priority: Priority::High,
            due_date: NaiveDate::from_ymd_opt(2023, 12, 15),
        },
        Task {
            id: 2,
            text: "Buy groceries".to_string(),
            completed: true,
            priority: Priority::Medium,
            due_date: NaiveDate::from_ymd_opt(2023, 12, 10),
        },
        Task {
            id: 3,
            text: "Call mom".to_string(),
            completed: false,
            priority: Priority::Low,
            due_date: None,
        },
    ]
}

/// Helper function to get current timestamp in milliseconds
pub fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("System time before Unix epoch")
        .as_millis() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_ms() {
        let ts = now_ms();
        assert!(ts > 0);
        // Should be reasonable timestamp (after year 2020)
        assert!(ts > 1_600_000_000_000);
    }

    #[test]
    fn test_priority_serialization() {
        let json = serde_json::to_string(&Priority::High).unwrap();
        assert_eq!(json, "\"high\"");

        let json = serde_json::to_string(&Priority::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
    }

    #[test]
    fn test_priority_rank_order() {
        assert!(Priority::High.rank() > Priority::Medium.rank());
        assert!(Priority::Medium.rank() > Priority::Low.rank());
    }

    #[test]
    fn test_task_serialization_field_names() {
        let task = Task {
            id: 42,
            text: "Write report".to_string(),
            completed: false,
            priority: Priority::High,
            due_date: NaiveDate::from_ymd_opt(2024, 6, 1),
        };

        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"id\":42"));
        assert!(json.contains("\"text\":\"Write report\""));
        assert!(json.contains("\"completed\":false"));
        assert!(json.contains("\"priority\":\"high\""));
        assert!(json.contains("\"dueDate\":\"2024-06-01\""));

        let deserialized: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, task);
    }

    #[test]
    fn test_task_due_date_absent() {
        let json = r#"{"id":1,"text":"No deadline","completed":false,"priority":"low"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.due_date, None);
    }

    #[test]
    fn test_is_overdue() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let mut task = Task {
            id: 1,
            text: "Pay invoice".to_string(),
            completed: false,
            priority: Priority::Medium,
            due_date: NaiveDate::from_ymd_opt(2024, 3, 10),
        };
        assert!(task.is_overdue(today));

        // Completed tasks are never overdue
        task.completed = true;
        assert!(!task.is_overdue(today));

        // Due today is not overdue (strictly earlier)
        task.completed = false;
        task.due_date = Some(today);
        assert!(!task.is_overdue(today));

        task.due_date = None;
        assert!(!task.is_overdue(today));
    }

    #[test]
    fn test_seed_tasks_shape() {
        let seed = seed_tasks();
        assert_eq!(seed.len(), 3);

        // All three priorities represented
        assert!(seed.iter().any(|t| t.priority == Priority::High));
        assert!(seed.iter().any(|t| t.priority == Priority::Medium));
        assert!(seed.iter().any(|t| t.priority == Priority::Low));

        // Exactly one already completed
        assert_eq!(seed.iter().filter(|t| t.completed).count(), 1);

        // Two carry due dates, one does not
        assert_eq!(seed.iter().filter(|t| t.due_date.is_some()).count(), 2);

        let mut ids: Vec<i64> = seed.iter().map(|t| t.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }
}
