//! Per-backend feature support

use crate::connection::Connection;

/// Backend-specific feature flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSupport {
    /// True if the backend supports array columns and parameters, e.g. PostgreSQL
    pub arrays: bool,
}

/// Registered backends keyed by connection implementation identity. The
/// first entry is the fallback for unknown identities.
const FEATURES: &[(&str, FeatureSupport)] = &[
    ("SqlServerConnection", FeatureSupport { arrays: false }),
    ("PgConnection", FeatureSupport { arrays: true }),
];

impl FeatureSupport {
    /// Feature set for a connection identity, compared case-insensitively
    pub fn get(kind: &str) -> FeatureSupport {
        FEATURES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(kind))
            .or_else(|| FEATURES.first())
            .map(|(_, features)| *features)
            .unwrap_or(FeatureSupport { arrays: false })
    }

    pub fn for_connection<C: Connection + ?Sized>(connection: &C) -> FeatureSupport {
        Self::get(connection.kind())
    }
}
