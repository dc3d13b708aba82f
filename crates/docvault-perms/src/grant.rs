//! Access grants.
//!
//! A grant gives one identity typed, time-bounded access to one document.
//! Grants are keyed by `(document_id, grantee)`; issuing a new grant for the
//! same key replaces the old one outright.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use docvault_core::validation::{validate_distinct_grantee, validate_duration};
use docvault_core::{DocumentId, Identity, Timestamp, ValidationError};

/// Kind of access a grant confers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionType {
    View,
    Edit,
    Full,
}

impl PermissionType {
    pub const fn as_str(self) -> &'static str {
        match self {
            PermissionType::View => "view",
            PermissionType::Edit => "edit",
            PermissionType::Full => "full",
        }
    }
}

impl fmt::Display for PermissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionType {
    type Err = ValidationError;

    /// Exact, case-sensitive match on the wire names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view" => Ok(PermissionType::View),
            "edit" => Ok(PermissionType::Edit),
            "full" => Ok(PermissionType::Full),
            other => Err(ValidationError::InvalidAccessType(other.to_string())),
        }
    }
}

/// Grant input as supplied by the caller.
///
/// `permission_type` stays a string until issuance so an unknown value is
/// reported with the right error and at the right point in the check order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantRequest {
    pub grantee: Identity,
    pub permission_type: String,
    pub duration: u64,
    pub modification_allowed: bool,
}

impl GrantRequest {
    pub fn new(
        grantee: Identity,
        permission_type: impl Into<String>,
        duration: u64,
        modification_allowed: bool,
    ) -> Self {
        Self {
            grantee,
            permission_type: permission_type.into(),
            duration,
            modification_allowed,
        }
    }
}

/// A stored access grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGrant {
    pub document_id: DocumentId,
    pub grantee: Identity,
    pub permission_type: PermissionType,
    pub granted_at: Timestamp,
    pub expires_at: Timestamp,
    pub modification_allowed: bool,
}

impl AccessGrant {
    /// Check a request and build the grant it describes.
    ///
    /// The caller is responsible for the existence and ownership checks that
    /// precede this. Checks here run in order: distinct grantee, permission
    /// type, duration. `expires_at` is `now + duration`.
    pub fn issue(
        document_id: DocumentId,
        actor: &Identity,
        request: &GrantRequest,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        validate_distinct_grantee(&request.grantee, actor)?;
        let permission_type: PermissionType = request.permission_type.parse()?;
        validate_duration(request.duration)?;

        let expires_at = now
            .checked_add(request.duration)
            .ok_or(ValidationError::ExpiryOverflow {
                now,
                duration: request.duration,
            })?;

        Ok(Self {
            document_id,
            grantee: request.grantee,
            permission_type,
            granted_at: now,
            expires_at,
            modification_allowed: request.modification_allowed,
        })
    }

    /// Key under which this grant is stored.
    pub fn key(&self) -> (DocumentId, Identity) {
        (self.document_id, self.grantee)
    }

    /// Advisory only. Nothing in the registry consults this.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docvault_core::ErrorKind;
    use proptest::prelude::*;

    const OWNER: Identity = Identity::from_bytes([1; 32]);
    const READER: Identity = Identity::from_bytes([2; 32]);

    #[test]
    fn test_permission_type_parse() {
        assert_eq!("view".parse::<PermissionType>(), Ok(PermissionType::View));
        assert_eq!("edit".parse::<PermissionType>(), Ok(PermissionType::Edit));
        assert_eq!("full".parse::<PermissionType>(), Ok(PermissionType::Full));

        let err = "admin".parse::<PermissionType>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAccessType);
        assert!("View".parse::<PermissionType>().is_err());
    }

    #[test]
    fn test_permission_type_serde_names() {
        let json = serde_json::to_string(&PermissionType::Edit).unwrap();
        assert_eq!(json, "\"edit\"");
    }

    #[test]
    fn test_issue_computes_expiry() {
        let request = GrantRequest::new(READER, "view", 144, false);
        let grant = AccessGrant::issue(DocumentId(3), &OWNER, &request, 1_000).unwrap();

        assert_eq!(grant.key(), (DocumentId(3), READER));
        assert_eq!(grant.permission_type, PermissionType::View);
        assert_eq!(grant.granted_at, 1_000);
        assert_eq!(grant.expires_at, 1_144);
        assert!(!grant.modification_allowed);
    }

    #[test]
    fn test_issue_rejects_self_grant_first() {
        // Both the grantee and the permission type are bad; self-grant wins.
        let request = GrantRequest::new(OWNER, "bogus", 0, true);
        let err = AccessGrant::issue(DocumentId(1), &OWNER, &request, 0).unwrap_err();
        assert_eq!(err, ValidationError::SelfGrant);
    }

    #[test]
    fn test_issue_checks_type_before_duration() {
        let request = GrantRequest::new(READER, "bogus", 0, true);
        let err = AccessGrant::issue(DocumentId(1), &OWNER, &request, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAccessType);
    }

    #[test]
    fn test_issue_rejects_expiry_overflow() {
        let request = GrantRequest::new(READER, "full", 10, true);
        let err = AccessGrant::issue(DocumentId(1), &OWNER, &request, u64::MAX - 5).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidTimestamp);
    }

    #[test]
    fn test_is_expired() {
        let request = GrantRequest::new(READER, "edit", 10, true);
        let grant = AccessGrant::issue(DocumentId(1), &OWNER, &request, 100).unwrap();
        assert!(!grant.is_expired(109));
        assert!(grant.is_expired(110));
    }

    proptest! {
        #[test]
        fn test_duration_window(duration in 0u64..60_000, now in 0u64..1_000_000) {
            let request = GrantRequest::new(READER, "view", duration, false);
            let result = AccessGrant::issue(DocumentId(1), &OWNER, &request, now);
            if duration == 0 || duration > 52_560 {
                prop_assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidTimestamp);
            } else {
                prop_assert_eq!(result.unwrap().expires_at, now + duration);
            }
        }
    }
}
