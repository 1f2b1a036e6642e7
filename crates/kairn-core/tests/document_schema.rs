//! JsonSchema validation for sidecar documents and verification reports, plus
//! hash stability across equivalent encodings.

use kairn_core::entities::{ClaimSet, Meaning, Uncertainty};
use kairn_core::hashing::{
    compute_claim_set_hash, compute_json_hash, compute_meaning_hash, compute_uncertainty_hash,
};
use kairn_core::responses::{HashMismatch, MismatchSource, VerifyAuditReport};
use pretty_assertions::assert_eq;
use schemars::schema_for;
use serde_json::json;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! document_matches_schema {
    ($name:ident, $ty:ty, $doc:expr) => {
        #[test]
        fn $name() {
            let raw: serde_json::Value = $doc;
            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let errors = validate_against_schema(&schema, &raw);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );

            let typed: $ty = serde_json::from_value(raw).unwrap();
            let reencoded = serde_json::to_value(&typed).unwrap();
            let errors = validate_against_schema(&schema, &reencoded);
            assert!(errors.is_empty(), "re-encoded {}: {:?}", stringify!($ty), errors);
        }
    };
}

document_matches_schema!(
    meaning_document,
    Meaning,
    json!({
        "schema_version": "meaning/v1",
        "title": "Tenancy deposit rules",
        "purpose": "Explain when a deposit must be returned",
        "scope": {
            "audience": ["tenants"],
            "jurisdiction": ["AT"],
            "timeframe": {"valid_from": "2024-01-01"}
        },
        "claims": [{"text": "Deposit is due within 14 days", "strength": "strong"}],
        "sources": [{"id": "s1", "type": "statute", "ref": "MRG 16b", "quote": {"snippet": "..."}}],
        "provenance": {"author": "legal-team", "created_at": "2024-02-01T10:00:00Z"},
        "integrity": {"narrative_id": "n-7", "conflicts_with": ["n-2"]}
    })
);

document_matches_schema!(
    claim_set_document,
    ClaimSet,
    json!({
        "schema_version": "claimset/v0",
        "version_id": "ver_1",
        "claims": [
            {"id": "c1", "text": "The bridge opened in 1901", "tags": ["history"]},
            {"id": "c2", "text": "The bridge opened in 1910"}
        ],
        "relations": [{"type": "CONTRADICTS", "from_claim_id": "c1", "to_claim_id": "c2"}]
    })
);

document_matches_schema!(
    uncertainty_document,
    Uncertainty,
    json!({
        "schema_version": "uncertainty/v0",
        "id": "u1",
        "type": "interpretative",
        "level": "high",
        "applies_to": {"scope": "claim", "claim_id": "c1"}
    })
);

#[test]
fn report_matches_schema() {
    let mut report = VerifyAuditReport {
        total_units: 1,
        total_versions: 2,
        hash_mismatches: vec![HashMismatch {
            unit_id: "unit_1".into(),
            version_id: "ver_1".into(),
            event_type: "MEANING_SET".into(),
            expected_hash: "aa".into(),
            found_hash: None,
            source: MismatchSource::Sidecar,
        }],
        ..VerifyAuditReport::default()
    };
    report.finish();
    assert!(!report.ok);

    let schema = serde_json::to_value(schema_for!(VerifyAuditReport)).unwrap();
    let instance = serde_json::to_value(&report).unwrap();
    let errors = validate_against_schema(&schema, &instance);
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(instance["hash_mismatches"][0]["source"], "sidecar");
}

#[test]
fn typed_hashes_ignore_input_formatting() {
    let a: Meaning =
        serde_json::from_str(r#"{"schema_version":"meaning/v1","title":"T","purpose":"P"}"#)
            .unwrap();
    let b: Meaning = serde_json::from_str(
        "{\n  \"purpose\": \"P\",\n  \"title\": \"T\",\n  \"schema_version\": \"meaning/v1\"\n}",
    )
    .unwrap();
    assert_eq!(
        compute_meaning_hash(&a).unwrap(),
        compute_meaning_hash(&b).unwrap()
    );
}

#[test]
fn typed_hash_equals_canonical_hash_of_its_encoding() {
    let claims: ClaimSet = serde_json::from_value(json!({
        "version_id": "ver_1",
        "schema_version": "claimset/v0",
        "claims": [{"text": "x", "id": "c1"}]
    }))
    .unwrap();
    let encoded = serde_json::to_vec(&claims).unwrap();
    assert_eq!(
        compute_claim_set_hash(&claims).unwrap(),
        compute_json_hash(&encoded).unwrap()
    );
}

#[test]
fn claim_order_changes_hash() {
    let doc = |first: &str, second: &str| -> ClaimSet {
        serde_json::from_value(json!({
            "schema_version": "claimset/v0",
            "version_id": "ver_1",
            "claims": [{"id": first, "text": "a"}, {"id": second, "text": "a"}]
        }))
        .unwrap()
    };
    assert_ne!(
        compute_claim_set_hash(&doc("c1", "c2")).unwrap(),
        compute_claim_set_hash(&doc("c2", "c1")).unwrap()
    );
}

#[test]
fn uncertainty_hash_is_stable() {
    let u: Uncertainty = serde_json::from_value(json!({
        "schema_version": "uncertainty/v0",
        "id": "u1",
        "type": "empirical",
        "level": "low",
        "applies_to": {"scope": "version"}
    }))
    .unwrap();
    assert_eq!(
        compute_uncertainty_hash(&u).unwrap(),
        compute_uncertainty_hash(&u.clone()).unwrap()
    );
    assert_eq!(compute_uncertainty_hash(&u).unwrap().len(), 64);
}
