//! Audit verification: missing, duplicate, and tampered records.

mod support;

use pretty_assertions::assert_eq;

use kairn_core::audit_detail::MeaningSetData;
use kairn_core::entities::{AuditEvent, AuditPayload, Unit, Version, VersionDraft};
use kairn_core::enums::SidecarKind;
use kairn_core::errors::KernelError;
use kairn_core::responses::{MismatchSource, MissingEvent};
use kairn_kernel::ports::{AuditLog, UnitRepository};
use kairn_kernel::usecases::VerifyAuditRequest;

use support::{Fixture, claims_doc, fixture, meaning_doc, sidecar, uncertainty_doc};

fn strict() -> VerifyAuditRequest {
    VerifyAuditRequest {
        unit_key: None,
        strict_hash: true,
    }
}

/// One unit, one version, all three sidecars attached.
fn annotated() -> (Fixture, Unit, Version) {
    let fx = fixture();
    let unit = fx.unit("abc");
    let version = fx.version("abc", "v1", "body");
    fx.kernel.set_meaning(&sidecar("abc", meaning_doc())).unwrap();
    fx.kernel
        .set_claims(&sidecar("abc", claims_doc(&version.id)))
        .unwrap();
    fx.kernel
        .set_uncertainty(&sidecar("abc", uncertainty_doc()))
        .unwrap();
    (fx, unit, version)
}

#[test]
fn clean_history_verifies() {
    let fx = fixture();
    fx.unit("abc");
    fx.version("abc", "v1", "one");
    fx.version("abc", "v2", "two");

    let report = fx.kernel.verify_audit(&strict()).unwrap();
    assert!(report.ok);
    assert_eq!(report.total_units, 1);
    assert_eq!(report.total_versions, 2);
    assert!(report.missing.is_empty());
}

#[test]
fn annotated_history_verifies_strictly() {
    let (fx, _, _) = annotated();
    let report = fx.kernel.verify_audit(&strict()).unwrap();
    assert!(report.ok, "{report:?}");
}

#[test]
fn empty_repository_is_ok() {
    let fx = fixture();
    let report = fx
        .kernel
        .verify_audit(&VerifyAuditRequest::default())
        .unwrap();
    assert!(report.ok);
    assert_eq!(report.total_units, 0);
}

#[test]
fn version_written_behind_the_kernel_is_missing() {
    let fx = fixture();
    let unit = fx.unit("abc");
    let rogue = Version::new(
        "ver_rogue",
        VersionDraft {
            unit_id: &unit.id,
            prev_version_id: None,
            label: "v1",
            content: "body",
            actor_id: "mallory",
            created_at_unix: 1,
        },
    )
    .unwrap();
    fx.repo.save_version(&rogue).unwrap();

    let report = fx
        .kernel
        .verify_audit(&VerifyAuditRequest::default())
        .unwrap();
    assert!(!report.ok);
    assert_eq!(
        report.missing,
        vec![MissingEvent {
            unit_id: unit.id,
            version_id: Some("ver_rogue".into()),
            event_type: "version.created".into(),
        }]
    );
}

#[test]
fn replayed_event_is_a_duplicate() {
    let fx = fixture();
    let unit = fx.unit("abc");
    let first = fx.events().remove(0);
    fx.journal.append(&first).unwrap();

    let report = fx
        .kernel
        .verify_audit(&VerifyAuditRequest::default())
        .unwrap();
    assert!(!report.ok);
    assert_eq!(report.duplicates.len(), 1);
    assert_eq!(report.duplicates[0].target_id, unit.id);
    assert_eq!(report.duplicates[0].count, 2);
}

#[test]
fn journal_hash_disagreement_is_reported_without_strict() {
    let (fx, unit, version) = annotated();
    // A second MEANING_SET carrying a different hash; the last one wins.
    let forged = AuditEvent::new(
        "evt_forged",
        0,
        "mallory",
        AuditPayload::MeaningSet(MeaningSetData {
            meaning_hash: "0".repeat(64),
            meaning_path: String::new(),
            schema_version: "meaning/v1".into(),
            inline_preview: None,
        }),
    )
    .for_unit(&unit.id)
    .for_version(&version.id);
    fx.journal.append(&forged).unwrap();

    let report = fx
        .kernel
        .verify_audit(&VerifyAuditRequest::default())
        .unwrap();
    assert!(!report.ok);
    assert_eq!(report.duplicates.len(), 1);
    assert_eq!(report.hash_mismatches.len(), 1);
    let mismatch = &report.hash_mismatches[0];
    assert_eq!(mismatch.event_type, "MEANING_SET");
    assert_eq!(mismatch.source, MismatchSource::Journal);
    assert_eq!(mismatch.found_hash, Some("0".repeat(64)));
}

#[test]
fn tampered_sidecars_need_strict_mode() {
    for kind in SidecarKind::ALL {
        let (fx, unit, version) = annotated();
        let mut doc = match kind {
            SidecarKind::Meaning => meaning_doc(),
            SidecarKind::ClaimSet => claims_doc(&version.id),
            SidecarKind::Uncertainty => uncertainty_doc(),
        };
        doc["tags"] = serde_json::json!(["edited"]);
        if kind == SidecarKind::Meaning {
            doc["title"] = "Edited title".into();
        }
        if kind == SidecarKind::ClaimSet {
            doc["claims"][0]["text"] = "Due within 7 days".into();
        }
        fx.repo
            .replace_sidecar_raw(&unit.id, &version.id, kind, doc)
            .unwrap();

        let lenient = fx
            .kernel
            .verify_audit(&VerifyAuditRequest::default())
            .unwrap();
        assert!(lenient.ok, "{kind}: {lenient:?}");

        let report = fx.kernel.verify_audit(&strict()).unwrap();
        assert!(!report.ok, "{kind}");
        assert_eq!(report.hash_mismatches.len(), 1, "{kind}");
        let mismatch = &report.hash_mismatches[0];
        assert_eq!(mismatch.event_type, kind.event_type().as_str());
        assert_eq!(mismatch.source, MismatchSource::Sidecar);
        assert_eq!(mismatch.version_id, version.id);
        assert!(mismatch.found_hash.is_some());
        assert_ne!(mismatch.found_hash.as_deref(), Some(mismatch.expected_hash.as_str()));
    }
}

#[test]
fn unreadable_sidecar_reports_no_found_hash() {
    let (fx, unit, version) = annotated();
    fx.repo
        .replace_sidecar_raw(
            &unit.id,
            &version.id,
            SidecarKind::Uncertainty,
            serde_json::json!("garbage"),
        )
        .unwrap();

    let report = fx.kernel.verify_audit(&strict()).unwrap();
    assert_eq!(report.hash_mismatches.len(), 1);
    assert_eq!(report.hash_mismatches[0].found_hash, None);
    assert_eq!(report.hash_mismatches[0].event_type, "UNCERTAINTY_SET");
}

#[test]
fn strict_mode_checks_version_content_hash() {
    let fx = fixture();
    fx.unit("abc");
    let mut version = fx.version("abc", "v1", "body");
    version.content_hash = "f".repeat(64);
    fx.repo.save_version(&version).unwrap();

    let lenient = fx
        .kernel
        .verify_audit(&VerifyAuditRequest::default())
        .unwrap();
    assert!(lenient.ok);

    let report = fx.kernel.verify_audit(&strict()).unwrap();
    assert_eq!(report.hash_mismatches.len(), 1);
    assert_eq!(report.hash_mismatches[0].event_type, "version.created");
    assert_eq!(report.hash_mismatches[0].source, MismatchSource::Journal);
}

#[test]
fn scoped_verification_ignores_other_units() {
    let fx = fixture();
    fx.unit("abc");
    let other = fx.unit("xyz");
    let rogue = Version::new(
        "ver_rogue",
        VersionDraft {
            unit_id: &other.id,
            prev_version_id: None,
            label: "v1",
            content: "body",
            actor_id: "mallory",
            created_at_unix: 1,
        },
    )
    .unwrap();
    fx.repo.save_version(&rogue).unwrap();

    let scoped = fx
        .kernel
        .verify_audit(&VerifyAuditRequest {
            unit_key: Some(" abc ".into()),
            strict_hash: false,
        })
        .unwrap();
    assert!(scoped.ok);
    assert_eq!(scoped.total_units, 1);

    let global = fx
        .kernel
        .verify_audit(&VerifyAuditRequest::default())
        .unwrap();
    assert!(!global.ok);

    let err = fx
        .kernel
        .verify_audit(&VerifyAuditRequest {
            unit_key: Some("nope".into()),
            strict_hash: false,
        })
        .unwrap_err();
    assert!(matches!(err, KernelError::UnitNotFound(_)));
}
