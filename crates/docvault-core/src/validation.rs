//! Field-format and business-rule validation.
//!
//! Every predicate here is pure. The composite validators run their checks
//! in a fixed order and return the first failure.

use crate::document::{DocumentUpdate, NewDocument};
use crate::error::ValidationError;
use crate::types::Identity;

pub const MAX_NAME_LEN: usize = 50;
pub const DIGEST_LEN: usize = 64;
pub const MAX_DESCRIPTOR_LEN: usize = 200;
pub const MAX_CLASSIFICATION_LEN: usize = 20;
pub const MAX_TAGS: usize = 5;
pub const MAX_TAG_LEN: usize = 30;

/// Longest grant duration, in logical time units (one year of ten-minute blocks).
pub const MAX_GRANT_DURATION: u64 = 52_560;

fn char_len(s: &str) -> usize {
    s.chars().count()
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let len = char_len(name);
    if len == 0 || len > MAX_NAME_LEN {
        return Err(ValidationError::InvalidName { len });
    }
    Ok(())
}

/// Only the length is checked; the encoding is the caller's business.
pub fn validate_digest(digest: &str) -> Result<(), ValidationError> {
    let len = char_len(digest);
    if len != DIGEST_LEN {
        return Err(ValidationError::InvalidDigest { len });
    }
    Ok(())
}

pub fn validate_descriptor(descriptor: &str) -> Result<(), ValidationError> {
    let len = char_len(descriptor);
    if len == 0 || len > MAX_DESCRIPTOR_LEN {
        return Err(ValidationError::InvalidDescriptor { len });
    }
    Ok(())
}

pub fn validate_classification(classification: &str) -> Result<(), ValidationError> {
    let len = char_len(classification);
    if len == 0 || len > MAX_CLASSIFICATION_LEN {
        return Err(ValidationError::InvalidClassification { len });
    }
    Ok(())
}

pub fn validate_tags<S: AsRef<str>>(tags: &[S]) -> Result<(), ValidationError> {
    if tags.is_empty() || tags.len() > MAX_TAGS {
        return Err(ValidationError::InvalidTagCount { count: tags.len() });
    }
    for (index, tag) in tags.iter().enumerate() {
        let len = char_len(tag.as_ref());
        if len == 0 || len > MAX_TAG_LEN {
            return Err(ValidationError::InvalidTag { index, len });
        }
    }
    Ok(())
}

/// Grant duration must lie in `(0, MAX_GRANT_DURATION]`.
pub fn validate_duration(duration: u64) -> Result<(), ValidationError> {
    if duration == 0 || duration > MAX_GRANT_DURATION {
        return Err(ValidationError::InvalidDuration(duration));
    }
    Ok(())
}

/// A grant may not target the identity issuing it.
pub fn validate_distinct_grantee(grantee: &Identity, actor: &Identity) -> Result<(), ValidationError> {
    if grantee == actor {
        return Err(ValidationError::SelfGrant);
    }
    Ok(())
}

/// Validate registration input.
///
/// Order: name, digest, descriptor, classification, tags.
pub fn validate_new_document(doc: &NewDocument) -> Result<(), ValidationError> {
    validate_name(&doc.name)?;
    validate_digest(&doc.digest)?;
    validate_descriptor(&doc.descriptor)?;
    validate_classification(&doc.classification)?;
    validate_tags(&doc.tags)?;
    Ok(())
}

/// Validate an update delta.
///
/// Order: name, digest, descriptor, tags. Classification is immutable and
/// therefore never part of an update.
pub fn validate_document_update(update: &DocumentUpdate) -> Result<(), ValidationError> {
    validate_name(&update.name)?;
    validate_digest(&update.digest)?;
    validate_descriptor(&update.descriptor)?;
    validate_tags(&update.tags)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use proptest::prelude::*;

    fn valid_doc() -> NewDocument {
        NewDocument::new("Invoice A", "a".repeat(64), "Q1 invoice", "finance", ["tax", "2024"])
    }

    #[test]
    fn test_valid_document() {
        assert!(validate_new_document(&valid_doc()).is_ok());
    }

    #[test]
    fn test_name_bounds() {
        assert!(validate_name("").is_err());
        assert!(validate_name("n").is_ok());
        assert!(validate_name(&"n".repeat(50)).is_ok());
        assert_eq!(
            validate_name(&"n".repeat(51)),
            Err(ValidationError::InvalidName { len: 51 })
        );
    }

    #[test]
    fn test_digest_exact_length() {
        assert!(validate_digest(&"f".repeat(64)).is_ok());
        assert!(validate_digest(&"f".repeat(63)).is_err());
        assert!(validate_digest(&"f".repeat(65)).is_err());
        // Encoding is not checked.
        assert!(validate_digest(&"z".repeat(64)).is_ok());
    }

    #[test]
    fn test_descriptor_bounds() {
        assert!(validate_descriptor("").is_err());
        assert!(validate_descriptor(&"d".repeat(200)).is_ok());
        let err = validate_descriptor(&"d".repeat(201)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDescriptor);
    }

    #[test]
    fn test_classification_bounds() {
        assert!(validate_classification("").is_err());
        assert!(validate_classification(&"c".repeat(20)).is_ok());
        let err = validate_classification(&"c".repeat(21)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidClassification);
    }

    #[test]
    fn test_tags() {
        let empty: [&str; 0] = [];
        assert_eq!(
            validate_tags(&empty),
            Err(ValidationError::InvalidTagCount { count: 0 })
        );
        assert!(validate_tags(&["a", "b", "c", "d", "e"]).is_ok());
        assert!(validate_tags(&["a", "b", "c", "d", "e", "f"]).is_err());
        assert_eq!(
            validate_tags(&["ok", ""]),
            Err(ValidationError::InvalidTag { index: 1, len: 0 })
        );
        let long = "t".repeat(31);
        assert!(validate_tags(&["ok", long.as_str()]).is_err());
    }

    #[test]
    fn test_duration_bounds() {
        assert!(validate_duration(0).is_err());
        assert!(validate_duration(1).is_ok());
        assert!(validate_duration(MAX_GRANT_DURATION).is_ok());
        assert_eq!(
            validate_duration(MAX_GRANT_DURATION + 1),
            Err(ValidationError::InvalidDuration(52_561))
        );
    }

    #[test]
    fn test_distinct_grantee() {
        let a = Identity::from_bytes([1; 32]);
        let b = Identity::from_bytes([2; 32]);
        assert!(validate_distinct_grantee(&b, &a).is_ok());
        assert_eq!(validate_distinct_grantee(&a, &a), Err(ValidationError::SelfGrant));
    }

    #[test]
    fn test_lengths_count_characters() {
        // 50 two-byte characters is 100 bytes but still a valid name.
        assert!(validate_name(&"é".repeat(50)).is_ok());
        assert!(validate_digest(&"é".repeat(64)).is_ok());
    }

    #[test]
    fn test_first_failure_wins() {
        let mut doc = valid_doc();
        doc.name = String::new();
        doc.descriptor = String::new();
        assert!(matches!(
            validate_new_document(&doc),
            Err(ValidationError::InvalidName { .. })
        ));

        let mut doc = valid_doc();
        doc.descriptor = "d".repeat(201);
        doc.classification = String::new();
        assert!(matches!(
            validate_new_document(&doc),
            Err(ValidationError::InvalidDescriptor { .. })
        ));
    }

    #[test]
    fn test_update_ignores_classification() {
        let update = DocumentUpdate::new("n", "a".repeat(64), "d", ["t"]);
        assert!(validate_document_update(&update).is_ok());
    }

    proptest! {
        #[test]
        fn test_name_len_rule(len in 0usize..80) {
            let ok = validate_name(&"x".repeat(len)).is_ok();
            prop_assert_eq!(ok, (1..=MAX_NAME_LEN).contains(&len));
        }

        #[test]
        fn test_duration_rule(duration in any::<u64>()) {
            let ok = validate_duration(duration).is_ok();
            prop_assert_eq!(ok, duration > 0 && duration <= MAX_GRANT_DURATION);
        }
    }
}
