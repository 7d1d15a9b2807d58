use super::Subsystem;
use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceTask {
    /// `T-####`
    pub id: String,
    pub description: String,
    pub priority: TaskPriority,
    pub assigned_to: String,
    pub status: TaskStatus,
    pub due: NaiveDate,
}

impl MaintenanceTask {
    fn new(
        number: u16,
        description: &str,
        priority: TaskPriority,
        assigned_to: &str,
        status: TaskStatus,
        due: (i32, u32, u32),
    ) -> Self {
        Self {
            id: format!("T-{:04}", number),
            description: description.into(),
            priority,
            assigned_to: assigned_to.into(),
            status,
            due: NaiveDate::from_ymd_opt(due.0, due.1, due.2).unwrap_or(NaiveDate::MIN),
        }
    }

    pub fn is_open(&self) -> bool {
        self.status != TaskStatus::Completed
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaintenanceSchedule {
    pub tasks: Vec<MaintenanceTask>,
}

impl MaintenanceSchedule {
    pub fn standard() -> Self {
        use TaskPriority::{High, Medium};
        use TaskStatus::{Completed, InProgress, Pending};

        Self {
            tasks: vec![
                MaintenanceTask::new(1001, "Filter replacement in Section A", High, "Eng. Aisha Kapoor", InProgress, (2025, 4, 1)),
                MaintenanceTask::new(1002, "Calibrate radiation sensors", Medium, "Tech. Daniel Kim", Pending, (2025, 4, 2)),
                MaintenanceTask::new(1003, "Life support system check", High, "Eng. Carlos Mendez", Completed, (2025, 3, 30)),
                MaintenanceTask::new(1004, "Hydroponics nutrient cycle", Medium, "Dr. Elena Petrov", Pending, (2025, 4, 3)),
                MaintenanceTask::new(1005, "Quantum computer cooling system", High, "Eng. Aisha Kapoor", Pending, (2025, 4, 1)),
            ],
        }
    }

    pub fn open_tasks(&self) -> impl Iterator<Item = &MaintenanceTask> {
        self.tasks.iter().filter(|t| t.is_open())
    }

    pub fn by_priority(&self, priority: TaskPriority) -> impl Iterator<Item = &MaintenanceTask> {
        self.tasks.iter().filter(move |t| t.priority == priority)
    }
}

impl Subsystem for MaintenanceSchedule {
    const NAME: &'static str = "Maintenance";

    fn sample<R: Rng + ?Sized>(_rng: &mut R) -> Self {
        Self::standard()
    }
}
