//! Business hours read from configuration
//!
//! Implements the `BusinessHoursProvider` port from a tenant-to-hours map,
//! either built in code or loaded from a JSON/TOML file shaped like:
//!
//! ```toml
//! [[salon-1]]
//! day_of_week = 1
//! open = "09:00"
//! close = "17:00"
//!
//! [[salon-1]]
//! day_of_week = 6
//! open = "10:00"
//! close = "14:00"
//! ```
//!
//! A tenant missing from the map has no hours configured, which callers
//! treat as "use the default grid" rather than an error.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use chairside_core::ports::{BusinessHoursProvider, TenantId};
use chairside_domain::{BusinessHours, ChairsideError, Result as DomainResult};
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::config::loader::parse_document;

#[derive(Debug, Default)]
pub struct ConfiguredHoursProvider {
    hours: RwLock<HashMap<String, BusinessHours>>,
}

impl ConfiguredHoursProvider {
    pub fn new(hours: HashMap<String, BusinessHours>) -> Self {
        Self { hours: RwLock::new(hours) }
    }

    /// Load the tenant map from a `.json` or `.toml` file.
    ///
    /// # Errors
    /// Returns `ChairsideError::Config` when the file cannot be read or
    /// parsed, or when a tenant's hours are inconsistent.
    pub fn from_file(path: &Path) -> DomainResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ChairsideError::Config(format!("Failed to read hours file {}: {e}", path.display()))
        })?;
        let hours: HashMap<String, BusinessHours> = parse_document(&contents, path)?;
        info!(path = %path.display(), tenants = hours.len(), "Loaded business hours");
        Ok(Self::new(hours))
    }

    /// Replace one tenant's hours, e.g. after an admin edit.
    pub fn set(&self, tenant: &TenantId, hours: Option<BusinessHours>) {
        let mut map = self.hours.write();
        match hours {
            Some(hours) => {
                map.insert(tenant.to_string(), hours);
            }
            None => {
                map.remove(tenant.as_str());
            }
        }
    }
}

#[async_trait]
impl BusinessHoursProvider for ConfiguredHoursProvider {
    async fn fetch_business_hours(&self, tenant: &TenantId) -> DomainResult<Option<BusinessHours>> {
        let hours = self.hours.read().get(tenant.as_str()).cloned();
        if hours.is_none() {
            debug!(tenant = %tenant, "No business hours configured for tenant");
        }
        Ok(hours)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use chairside_domain::{DayHours, TimeOfDay};
    use tempfile::NamedTempFile;

    use super::*;

    fn tod(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_set_and_fetch() {
        let provider = ConfiguredHoursProvider::default();
        let tenant = TenantId::new("salon-1");
        assert_eq!(provider.fetch_business_hours(&tenant).await.unwrap(), None);

        let hours = BusinessHours::from_entries([DayHours::open(1, tod("09:00"), tod("17:00"))]).unwrap();
        provider.set(&tenant, Some(hours.clone()));
        assert_eq!(provider.fetch_business_hours(&tenant).await.unwrap(), Some(hours));

        provider.set(&tenant, None);
        assert_eq!(provider.fetch_business_hours(&tenant).await.unwrap(), None);
    }

    #[test]
    fn test_inverted_hours_rejected() {
        let json = r#"{ "salon-1": [ { "day_of_week": 1, "open": "17:00", "close": "09:00" } ] }"#;
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(json.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("json");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let result = ConfiguredHoursProvider::from_file(&path);
        std::fs::remove_file(path).ok();
        assert!(matches!(result, Err(ChairsideError::Config(_))));
    }
}
