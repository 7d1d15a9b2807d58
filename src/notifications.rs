use chrono::{DateTime, Utc};
use heapless::Vec;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use static_assertions::const_assert;
use uuid::Uuid;

pub const NOTIFICATION_CAPACITY: usize = 50;
pub const SIDEBAR_PREVIEW: usize = 5;

const_assert!(NOTIFICATION_CAPACITY >= SIDEBAR_PREVIEW);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Info, Severity::Warning, Severity::Critical];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

impl core::fmt::Display for Severity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub time: DateTime<Utc>,
    pub message: String,
    pub severity: Severity,
    pub read: bool,
}

/// First `shown` notifications plus how many were left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSummary {
    pub shown: std::vec::Vec<Notification>,
    pub remaining: usize,
}

/// Bounded notification history, newest first.
///
/// Entries are stored oldest-first internally; once the log is full the
/// oldest entry is dropped to make room. Eviction is silent.
#[derive(Debug, Clone, Default)]
pub struct NotificationLog {
    entries: Vec<Notification, NOTIFICATION_CAPACITY>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Record a message stamped with the current time.
    pub fn add(&mut self, message: impl Into<String>, severity: Severity) -> &Notification {
        self.add_at(message, severity, Utc::now())
    }

    pub fn add_at(
        &mut self,
        message: impl Into<String>,
        severity: Severity,
        time: DateTime<Utc>,
    ) -> &Notification {
        let notification = Notification {
            id: Uuid::new_v4(),
            time,
            message: message.into(),
            severity,
            read: false,
        };

        if self.entries.is_full() {
            self.entries.remove(0);
        }
        let pushed = self.entries.push(notification);
        debug_assert!(pushed.is_ok(), "Notification log full after eviction");

        debug_assert!(
            self.entries.len() <= NOTIFICATION_CAPACITY,
            "Notification log length {} exceeds capacity {}",
            self.entries.len(),
            NOTIFICATION_CAPACITY
        );

        &self.entries[self.entries.len() - 1]
    }

    /// Up to `limit` notifications, most recent first.
    pub fn list(&self, limit: usize) -> std::vec::Vec<&Notification> {
        self.iter().take(limit).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter().rev()
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn unread_count(&self) -> usize {
        self.entries.iter().filter(|n| !n.read).count()
    }

    pub fn mark_read(&mut self, id: Uuid) -> bool {
        match self.entries.iter_mut().find(|n| n.id == id) {
            Some(notification) => {
                notification.read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_read(&mut self) -> usize {
        let mut marked = 0;
        for notification in self.entries.iter_mut().filter(|n| !n.read) {
            notification.read = true;
            marked += 1;
        }
        marked
    }

    pub fn summary(&self, shown: usize) -> NotificationSummary {
        let shown: std::vec::Vec<Notification> = self.iter().take(shown).cloned().collect();
        NotificationSummary {
            remaining: self.len() - shown.len(),
            shown,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Serialize for NotificationLog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for NotificationLog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let newest_first = std::vec::Vec::<Notification>::deserialize(deserializer)?;
        let mut log = NotificationLog::new();
        for notification in newest_first.into_iter().take(NOTIFICATION_CAPACITY).rev() {
            let pushed = log.entries.push(notification);
            debug_assert!(pushed.is_ok(), "Restored notification log exceeds capacity");
        }
        Ok(log)
    }
}
