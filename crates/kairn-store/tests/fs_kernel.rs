//! The kernel over the file-backed adapters, including on-disk tampering.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use serde_json::json;

use kairn_core::enums::SidecarKind;
use kairn_core::responses::MismatchSource;
use kairn_kernel::Kernel;
use kairn_kernel::usecases::{
    CreateUnitRequest, CreateVersionRequest, ExportSnapshotRequest, SetSidecarRequest,
    VerifyAuditRequest,
};
use kairn_store::{AUDIT_FILE, FsUnitRepo, INDEX_DIR, UNITS_DIR, open_kernel};

fn create(kernel: &Kernel, key: &str) {
    kernel
        .create_unit(&CreateUnitRequest {
            key: key.into(),
            title: "Deposit rules".into(),
            description: Some("Tenancy".into()),
            actor_id: "alice".into(),
        })
        .unwrap();
}

fn add_version(kernel: &Kernel, key: &str, label: &str) -> String {
    kernel
        .create_version(&CreateVersionRequest {
            unit_key: key.into(),
            label: label.into(),
            content: format!("content of {label}"),
            base_version_id: None,
            actor_id: "alice".into(),
        })
        .unwrap()
        .id
}

fn body(doc: serde_json::Value) -> SetSidecarRequest {
    SetSidecarRequest {
        unit_key: "abc".into(),
        version_id: None,
        body: serde_json::to_vec(&doc).unwrap(),
        actor_id: "alice".into(),
    }
}

fn strict(kernel: &Kernel) -> kairn_core::responses::VerifyAuditReport {
    kernel
        .verify_audit(&VerifyAuditRequest {
            unit_key: None,
            strict_hash: true,
        })
        .unwrap()
}

/// Unit `abc` with one version and all three sidecars.
fn annotated(dir: &Path) -> (Kernel, String, String) {
    let kernel = open_kernel(dir).unwrap();
    create(&kernel, "abc");
    let version_id = add_version(&kernel, "abc", "v1");
    kernel
        .set_meaning(&body(json!({
            "schema_version": "meaning/v1",
            "title": "Deposit",
            "purpose": "Return rules"
        })))
        .unwrap();
    kernel
        .set_claims(&body(json!({
            "schema_version": "claimset/v0",
            "version_id": version_id,
            "claims": [{"id": "c1", "text": "Within 14 days"}]
        })))
        .unwrap();
    kernel
        .set_uncertainty(&body(json!({
            "schema_version": "uncertainty/v0",
            "id": "u1",
            "type": "empirical",
            "level": "low",
            "applies_to": {"scope": "version"}
        })))
        .unwrap();
    let unit_id = kernel.get_unit("abc").unwrap().id;
    (kernel, unit_id, version_id)
}

#[test]
fn lineage_and_snapshot_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let kernel = open_kernel(dir.path()).unwrap();
    create(&kernel, "abc");
    let v1 = add_version(&kernel, "abc", "v1");
    let v2 = add_version(&kernel, "abc", "v2");

    let req = ExportSnapshotRequest {
        unit_key: "abc".into(),
        include_audit: true,
    };
    let before = kernel.export_unit_snapshot(&req).unwrap();
    drop(kernel);

    let reopened = open_kernel(dir.path()).unwrap();
    let after = reopened.export_unit_snapshot(&req).unwrap();
    assert_eq!(before, after);

    let ids: Vec<_> = after.versions.iter().map(|v| v.id.clone()).collect();
    assert_eq!(ids, vec![v1.clone(), v2.clone()]);
    assert_eq!(after.versions[1].prev_version_id, Some(v1));
    assert_eq!(after.unit.head_version_id, Some(v2));
    assert_eq!(after.audit.map(|a| a.len()), Some(3));

    assert!(dir.path().join(AUDIT_FILE).is_file());
    assert!(dir.path().join(INDEX_DIR).join("units_by_key.json").is_file());
}

#[test]
fn clean_store_verifies_strictly() {
    let dir = tempfile::tempdir().unwrap();
    let (kernel, _, _) = annotated(dir.path());
    let report = strict(&kernel);
    assert!(report.ok, "{report:?}");
    assert_eq!(report.total_versions, 1);
}

#[test]
fn edited_sidecar_files_are_caught() {
    for kind in SidecarKind::ALL {
        let dir = tempfile::tempdir().unwrap();
        let (kernel, unit_id, version_id) = annotated(dir.path());
        let repo = FsUnitRepo::open(dir.path()).unwrap();
        let path = repo.sidecar_path(&unit_id, &version_id, kind);

        let mut doc: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        match kind {
            SidecarKind::Meaning => doc["purpose"] = json!("Keep the deposit"),
            SidecarKind::ClaimSet => doc["claims"][0]["text"] = json!("Within 90 days"),
            SidecarKind::Uncertainty => doc["level"] = json!("high"),
        }
        fs::write(&path, serde_json::to_vec_pretty(&doc).unwrap()).unwrap();

        let lenient = kernel
            .verify_audit(&VerifyAuditRequest::default())
            .unwrap();
        assert!(lenient.ok, "{kind}");

        let report = strict(&kernel);
        assert!(!report.ok, "{kind}");
        assert_eq!(report.hash_mismatches.len(), 1, "{kind}");
        assert_eq!(report.hash_mismatches[0].source, MismatchSource::Sidecar);
        assert_eq!(
            report.hash_mismatches[0].event_type,
            kind.event_type().as_str()
        );
    }
}

#[test]
fn reformatted_sidecar_still_verifies() {
    let dir = tempfile::tempdir().unwrap();
    let (kernel, unit_id, version_id) = annotated(dir.path());
    let repo = FsUnitRepo::open(dir.path()).unwrap();
    let path = repo.sidecar_path(&unit_id, &version_id, SidecarKind::Meaning);

    let doc: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    fs::write(&path, serde_json::to_vec(&doc).unwrap()).unwrap();

    assert!(strict(&kernel).ok);
}

#[test]
fn deleted_sidecar_reports_missing_hash() {
    let dir = tempfile::tempdir().unwrap();
    let (kernel, unit_id, version_id) = annotated(dir.path());
    let repo = FsUnitRepo::open(dir.path()).unwrap();
    fs::remove_file(repo.sidecar_path(&unit_id, &version_id, SidecarKind::ClaimSet)).unwrap();

    let report = strict(&kernel);
    assert_eq!(report.hash_mismatches.len(), 1);
    assert_eq!(report.hash_mismatches[0].found_hash, None);
}

#[test]
fn truncated_journal_reports_missing_events() {
    let dir = tempfile::tempdir().unwrap();
    let kernel = open_kernel(dir.path()).unwrap();
    create(&kernel, "abc");
    add_version(&kernel, "abc", "v1");

    let journal = dir.path().join(AUDIT_FILE);
    let first_line = fs::read_to_string(&journal)
        .unwrap()
        .lines()
        .next()
        .unwrap()
        .to_owned();
    fs::write(&journal, format!("{first_line}\n")).unwrap();

    let report = kernel
        .verify_audit(&VerifyAuditRequest::default())
        .unwrap();
    assert!(!report.ok);
    assert_eq!(report.missing.len(), 1);
    assert_eq!(report.missing[0].event_type, "version.created");
}

#[test]
fn lost_index_is_rebuilt() {
    let dir = tempfile::tempdir().unwrap();
    let kernel = open_kernel(dir.path()).unwrap();
    create(&kernel, "abc");
    create(&kernel, "xyz");
    drop(kernel);

    fs::remove_dir_all(dir.path().join(INDEX_DIR)).unwrap();
    fs::write(dir.path().join(UNITS_DIR).join("junk.json"), "{").unwrap();

    let kernel = open_kernel(dir.path()).unwrap();
    assert_eq!(kernel.get_unit("xyz").unwrap().key, "xyz");
    assert!(
        kernel
            .create_unit(&CreateUnitRequest {
                key: "abc".into(),
                title: "Again".into(),
                description: None,
                actor_id: String::new(),
            })
            .is_err()
    );
}
