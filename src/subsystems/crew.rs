use super::Subsystem;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const ROSTER_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DutyStatus {
    #[serde(rename = "On Duty")]
    OnDuty,
    #[serde(rename = "Off Duty")]
    OffDuty,
}

impl DutyStatus {
    pub fn label(self) -> &'static str {
        match self {
            DutyStatus::OnDuty => "On Duty",
            DutyStatus::OffDuty => "Off Duty",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: u32,
    pub name: String,
    pub role: String,
    pub status: DutyStatus,
    pub location: String,
    pub health: u8,
}

impl CrewMember {
    fn new(id: u32, name: &str, role: &str, status: DutyStatus, location: &str, health: u8) -> Self {
        debug_assert!(health <= 100, "Crew health {} exceeds 100", health);
        Self {
            id,
            name: name.into(),
            role: role.into(),
            status,
            location: location.into(),
            health,
        }
    }

    pub fn is_on_duty(&self) -> bool {
        self.status == DutyStatus::OnDuty
    }
}

/// Current crew manifest. Each refresh replaces it wholesale with the
/// standing roster.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrewRoster {
    pub members: Vec<CrewMember>,
}

impl CrewRoster {
    pub fn standard() -> Self {
        use DutyStatus::{OffDuty, OnDuty};

        Self {
            members: vec![
                CrewMember::new(1, "Cmdr. Sarah Chen", "Commander", OnDuty, "Command Center", 97),
                CrewMember::new(2, "Dr. Michael Rodriguez", "Medical Officer", OnDuty, "Medical Bay", 94),
                CrewMember::new(3, "Eng. Aisha Kapoor", "Chief Engineer", OnDuty, "Engine Room", 92),
                CrewMember::new(4, "Dr. James Wilson", "Science Officer", OffDuty, "Quarters", 98),
                CrewMember::new(5, "Lt. Yuki Tanaka", "Navigation Specialist", OnDuty, "Bridge", 95),
                CrewMember::new(6, "Eng. Carlos Mendez", "Systems Engineer", OffDuty, "Recreation", 91),
                CrewMember::new(7, "Dr. Elena Petrov", "Botanist", OnDuty, "Hydroponics", 96),
                CrewMember::new(8, "Tech. Daniel Kim", "Communications", OnDuty, "Comms Center", 93),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn on_duty(&self) -> usize {
        self.members.iter().filter(|m| m.is_on_duty()).count()
    }

    /// Arithmetic mean of crew health; `None` for an empty roster.
    pub fn average_health(&self) -> Option<f64> {
        if self.members.is_empty() {
            return None;
        }
        let total: u32 = self.members.iter().map(|m| u32::from(m.health)).sum();
        Some(f64::from(total) / self.members.len() as f64)
    }

    /// Members with the given duty status, or everyone for `None`.
    pub fn filter(&self, status: Option<DutyStatus>) -> Vec<&CrewMember> {
        self.members
            .iter()
            .filter(|m| status.map_or(true, |s| m.status == s))
            .collect()
    }

    pub fn find(&self, id: u32) -> Option<&CrewMember> {
        self.members.iter().find(|m| m.id == id)
    }
}

impl Subsystem for CrewRoster {
    const NAME: &'static str = "Crew";

    fn sample<R: Rng + ?Sized>(_rng: &mut R) -> Self {
        Self::standard()
    }
}
