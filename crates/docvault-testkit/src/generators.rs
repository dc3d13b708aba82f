//! Proptest generators for property-based testing.
//!
//! Each field has a strategy producing values every validator accepts and
//! one producing values its validator rejects. Lengths are in characters,
//! so some strategies mix in multi-byte characters.

use proptest::prelude::*;

use docvault_core::validation::{
    MAX_CLASSIFICATION_LEN, MAX_DESCRIPTOR_LEN, MAX_GRANT_DURATION, MAX_NAME_LEN, MAX_TAGS,
    MAX_TAG_LEN,
};
use docvault_core::{DocumentUpdate, Identity, NewDocument, Timestamp};
use docvault_perms::GrantRequest;

/// Generate a random identity.
pub fn identity() -> impl Strategy<Value = Identity> {
    any::<[u8; 32]>().prop_map(Identity::from_bytes)
}

/// Generate a logical time that leaves room for any valid grant duration.
pub fn timestamp() -> impl Strategy<Value = Timestamp> {
    0u64..=i64::MAX as u64 - MAX_GRANT_DURATION
}

fn text(min: usize, max: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(prop_oneof![4 => prop::char::range('a', 'z'), 1 => Just('é')], min..=max)
        .prop_map(|chars| chars.into_iter().collect())
}

pub fn valid_name() -> impl Strategy<Value = String> {
    text(1, MAX_NAME_LEN)
}

pub fn invalid_name() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), text(MAX_NAME_LEN + 1, MAX_NAME_LEN + 20)]
}

/// Generate a 64-character hex digest.
pub fn valid_digest() -> impl Strategy<Value = String> {
    "[0-9a-f]{64}"
}

pub fn invalid_digest() -> impl Strategy<Value = String> {
    prop_oneof!["[0-9a-f]{0,63}", "[0-9a-f]{65,96}"]
}

pub fn valid_descriptor() -> impl Strategy<Value = String> {
    text(1, MAX_DESCRIPTOR_LEN)
}

pub fn invalid_descriptor() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        text(MAX_DESCRIPTOR_LEN + 1, MAX_DESCRIPTOR_LEN + 40)
    ]
}

pub fn valid_classification() -> impl Strategy<Value = String> {
    text(1, MAX_CLASSIFICATION_LEN)
}

pub fn invalid_classification() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        text(MAX_CLASSIFICATION_LEN + 1, MAX_CLASSIFICATION_LEN + 20)
    ]
}

pub fn valid_tags() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(text(1, MAX_TAG_LEN), 1..=MAX_TAGS)
}

/// No tags, too many tags, or one tag that is empty or too long.
pub fn invalid_tags() -> impl Strategy<Value = Vec<String>> {
    prop_oneof![
        Just(Vec::new()),
        prop::collection::vec(text(1, MAX_TAG_LEN), MAX_TAGS + 1..=MAX_TAGS + 4),
        (
            prop::collection::vec(text(1, MAX_TAG_LEN), 0..MAX_TAGS),
            prop_oneof![Just(String::new()), text(MAX_TAG_LEN + 1, MAX_TAG_LEN + 10)],
        )
            .prop_map(|(mut tags, bad)| {
                tags.push(bad);
                tags
            }),
    ]
}

pub fn valid_duration() -> impl Strategy<Value = u64> {
    1..=MAX_GRANT_DURATION
}

pub fn invalid_duration() -> impl Strategy<Value = u64> {
    prop_oneof![Just(0), MAX_GRANT_DURATION + 1..=u64::MAX]
}

pub fn permission_type() -> impl Strategy<Value = String> {
    prop_oneof![Just("view"), Just("edit"), Just("full")].prop_map(String::from)
}

/// Strings that do not name a permission type, including case variants.
pub fn invalid_permission_type() -> impl Strategy<Value = String> {
    "[a-zA-Z]{0,8}".prop_filter("must not be a permission type", |s| {
        !matches!(s.as_str(), "view" | "edit" | "full")
    })
}

/// Generate a document that passes every registration validator.
pub fn new_document() -> impl Strategy<Value = NewDocument> {
    (
        valid_name(),
        valid_digest(),
        valid_descriptor(),
        valid_classification(),
        valid_tags(),
    )
        .prop_map(|(name, digest, descriptor, classification, tags)| {
            NewDocument::new(name, digest, descriptor, classification, tags)
        })
}

/// Generate an update that passes every update validator.
pub fn document_update() -> impl Strategy<Value = DocumentUpdate> {
    (valid_name(), valid_digest(), valid_descriptor(), valid_tags())
        .prop_map(|(name, digest, descriptor, tags)| {
            DocumentUpdate::new(name, digest, descriptor, tags)
        })
}

/// Generate an update with exactly one invalid field.
pub fn invalid_document_update() -> impl Strategy<Value = DocumentUpdate> {
    (
        document_update(),
        prop_oneof![
            invalid_name().prop_map(|v| ("name", vec![v])),
            invalid_digest().prop_map(|v| ("digest", vec![v])),
            invalid_descriptor().prop_map(|v| ("descriptor", vec![v])),
            invalid_tags().prop_map(|v| ("tags", v)),
        ],
    )
        .prop_map(|(mut update, (field, mut value))| {
            match field {
                "name" => update.name = value.remove(0),
                "digest" => update.digest = value.remove(0),
                "descriptor" => update.descriptor = value.remove(0),
                _ => update.tags = value,
            }
            update
        })
}

/// Generate a grant request that passes every grant check for a grantee
/// other than the actor.
pub fn grant_request(grantee: Identity) -> impl Strategy<Value = GrantRequest> {
    (permission_type(), valid_duration(), any::<bool>()).prop_map(
        move |(permission_type, duration, modification_allowed)| {
            GrantRequest::new(grantee, permission_type, duration, modification_allowed)
        },
    )
}
