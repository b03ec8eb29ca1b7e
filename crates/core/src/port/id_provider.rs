// ID Provider Port (for deterministic testing)

/// ID provider interface (allows deterministic patient IDs in tests)
pub trait IdProvider: Send + Sync {
    /// Generate a new unique patient session ID
    fn generate_id(&self) -> String;
}

/// UUID v4 provider (production), prefixed so IDs read as patient handles
pub struct UuidProvider;

impl IdProvider for UuidProvider {
    fn generate_id(&self) -> String {
        format!("P-{}", uuid::Uuid::new_v4().simple())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_provider_unique_and_prefixed() {
        let provider = UuidProvider;
        let a = provider.generate_id();
        let b = provider.generate_id();

        assert!(a.starts_with("P-"));
        assert_eq!(a.len(), 34);
        assert_ne!(a, b);
    }
}
