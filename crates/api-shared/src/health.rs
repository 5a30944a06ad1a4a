use crate::dto::HealthRes;

/// Simple health service shared by the REST API and the CLI.
///
/// Reports liveness together with the size of the condition catalog, which is built lazily on
/// first use.
#[derive(Clone)]
pub struct HealthService;

impl HealthService {
    /// Creates a new instance of HealthService.
    ///
    /// # Returns
    /// A new `HealthService` instance.
    pub fn new() -> Self {
        Self
    }

    /// Static method to check health without creating an instance.
    ///
    /// # Returns
    /// A `HealthRes` indicating the service is healthy.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "MDM drafting engine is alive".into(),
            conditions: mdm_core::registry::registry().len(),
            checked_at: chrono::Utc::now(),
        }
    }
}

impl Default for HealthService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_reports_catalog_size() {
        let res = HealthService::check_health();
        assert!(res.ok);
        assert_eq!(res.conditions, 10);
    }
}
