use serde::{Deserialize, Serialize};

const DEFAULT_ORG_NAME: &str = "BloodLink";

/// Application settings assembled once at process startup
/// All fields have sensible defaults for easy onboarding
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Organization name shown in notification email subjects and footers
    pub org_name: String,

    /// Broadcast queue capacity for in-process job distribution
    pub queue_capacity: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            org_name: DEFAULT_ORG_NAME.to_string(),
            queue_capacity: 1000,
        }
    }
}

impl AppSettings {
    pub fn with_org_name(mut self, org_name: impl Into<String>) -> Self {
        self.org_name = org_name.into();
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = AppSettings::default();
        assert_eq!(settings.org_name, "BloodLink");
        assert_eq!(settings.queue_capacity, 1000);
    }

    #[test]
    fn test_builders() {
        let settings = AppSettings::default()
            .with_org_name("NWU Blood Bank")
            .with_queue_capacity(64);
        assert_eq!(settings.org_name, "NWU Blood Bank");
        assert_eq!(settings.queue_capacity, 64);
    }
}
