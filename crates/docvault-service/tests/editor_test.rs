//! Integration tests for the editor session broker and the structured
//! spreadsheet path.

mod helpers;

use std::sync::Arc;

use bytes::Bytes;
use uuid::Uuid;

use docvault_core::error::ErrorKind;
use docvault_entity::file::{FileKind, FileRecord};
use docvault_entity::workbook::CellValue;
use docvault_service::{SaveCallback, SaveOutcome, SheetUpdate};

use helpers::{FailingFetcher, StaticFetcher, TestHarness, pdf_payload};

async fn upload_one(h: &TestHarness) -> FileRecord {
    h.upload
        .upload(&h.ctx, vec![pdf_payload("doc.pdf", "original")])
        .await
        .unwrap()
        .remove(0)
}

fn ready_callback(url: &str, users: Vec<&str>) -> SaveCallback {
    SaveCallback {
        status: 2,
        url: Some(url.to_string()),
        users: users.into_iter().map(String::from).collect(),
    }
}

#[tokio::test]
async fn test_create_session_descriptor() {
    let h = TestHarness::new().await;
    let record = upload_one(&h).await;

    let editor = h.editor_service(Arc::new(StaticFetcher {
        body: Bytes::new(),
    }));
    let session = editor.create_session(&h.ctx, record.id).await.unwrap();

    assert_eq!(session.document_key, format!("{}-1", record.id));
    assert_eq!(session.title, "doc.pdf");
    assert_eq!(session.document_type, "text");
    assert_eq!(
        session.document_url,
        format!("http://localhost:8080/uploads/{}", record.storage_path)
    );
    assert_eq!(
        session.callback_url,
        format!("http://localhost:8080/api/files/save-callback/{}", record.id)
    );
    assert!(session.can_edit);
}

#[tokio::test]
async fn test_document_key_changes_after_a_save() {
    let h = TestHarness::new().await;
    let record = upload_one(&h).await;

    let editor = h.editor_service(Arc::new(StaticFetcher {
        body: Bytes::from("edited"),
    }));

    let before = editor.create_session(&h.ctx, record.id).await.unwrap();
    editor
        .handle_save_callback(record.id, ready_callback("http://editor/doc", vec![]))
        .await
        .unwrap();
    let after = editor.create_session(&h.ctx, record.id).await.unwrap();

    assert_ne!(before.document_key, after.document_key);
    assert_eq!(after.document_key, format!("{}-2", record.id));
}

#[tokio::test]
async fn test_non_save_statuses_are_acknowledged_without_persisting() {
    let h = TestHarness::new().await;
    let record = upload_one(&h).await;

    let editor = h.editor_service(Arc::new(StaticFetcher {
        body: Bytes::from("should never be written"),
    }));

    for status in [0, 1, 3, 4, 6, 7] {
        let outcome = editor
            .handle_save_callback(
                record.id,
                SaveCallback {
                    status,
                    url: Some("http://editor/doc".into()),
                    users: vec![],
                },
            )
            .await
            .unwrap();
        assert!(matches!(outcome, SaveOutcome::Ignored));
    }

    // Status 2 without a URL is equally benign.
    let outcome = editor
        .handle_save_callback(
            record.id,
            SaveCallback {
                status: 2,
                url: None,
                users: vec![],
            },
        )
        .await
        .unwrap();
    assert!(matches!(outcome, SaveOutcome::Ignored));

    let unchanged = h.file_service.get_file(record.id).await.unwrap();
    assert_eq!(unchanged.version, 1);
    assert_eq!(
        h.blobs.get(&record.storage_path).await.unwrap(),
        Bytes::from("original")
    );
}

#[tokio::test]
async fn test_ready_callback_overwrites_blob_and_bumps_version() {
    let h = TestHarness::new().await;
    let record = upload_one(&h).await;
    let editor_user = Uuid::new_v4();
    let editor_user_id = editor_user.to_string();

    let editor = h.editor_service(Arc::new(StaticFetcher {
        body: Bytes::from("edited content"),
    }));

    let outcome = editor
        .handle_save_callback(
            record.id,
            ready_callback("http://editor/doc", vec![editor_user_id.as_str()]),
        )
        .await
        .unwrap();

    let SaveOutcome::Saved(saved) = outcome else {
        panic!("expected a save");
    };
    assert_eq!(saved.version, 2);
    assert_eq!(saved.size_bytes, 14);
    assert_eq!(saved.last_saved_by, Some(editor_user));
    assert!(saved.last_saved_at.is_some());

    // Overwritten in place: same locator, new bytes.
    assert_eq!(saved.storage_path, record.storage_path);
    assert_eq!(
        h.blobs.get(&record.storage_path).await.unwrap(),
        Bytes::from("edited content")
    );
}

#[tokio::test]
async fn test_unparseable_editor_user_degrades_to_none() {
    let h = TestHarness::new().await;
    let record = upload_one(&h).await;

    let editor = h.editor_service(Arc::new(StaticFetcher {
        body: Bytes::from("edited"),
    }));

    let outcome = editor
        .handle_save_callback(
            record.id,
            ready_callback("http://editor/doc", vec!["not-a-uuid"]),
        )
        .await
        .unwrap();

    let SaveOutcome::Saved(saved) = outcome else {
        panic!("expected a save");
    };
    assert_eq!(saved.version, 2);
    assert!(saved.last_saved_by.is_none());
}

#[tokio::test]
async fn test_failed_fetch_leaves_version_untouched() {
    let h = TestHarness::new().await;
    let record = upload_one(&h).await;

    let editor = h.editor_service(Arc::new(FailingFetcher));

    let err = editor
        .handle_save_callback(record.id, ready_callback("http://editor/doc", vec![]))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::SaveReconciliationFailed);

    let unchanged = h.file_service.get_file(record.id).await.unwrap();
    assert_eq!(unchanged.version, 1);
}

#[tokio::test]
async fn test_callback_for_unknown_file_is_not_found() {
    let h = TestHarness::new().await;

    let editor = h.editor_service(Arc::new(StaticFetcher {
        body: Bytes::from("x"),
    }));

    let err = editor
        .handle_save_callback(Uuid::new_v4(), ready_callback("http://editor/doc", vec![]))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_concurrent_callbacks_never_lose_or_double_count_versions() {
    let h = TestHarness::new().await;
    let record = upload_one(&h).await;

    let editor = Arc::new(h.editor_service(Arc::new(StaticFetcher {
        body: Bytes::from("concurrent edit"),
    })));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let editor = editor.clone();
        let id = record.id;
        handles.push(tokio::spawn(async move {
            editor
                .handle_save_callback(id, ready_callback("http://editor/doc", vec![]))
                .await
        }));
    }

    let mut saved = 0i32;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(SaveOutcome::Saved(_)) => saved += 1,
            Ok(SaveOutcome::Ignored) => panic!("ready callbacks must not be ignored"),
            // Losing the race repeatedly is the one acceptable failure.
            Err(e) => assert_eq!(e.kind, ErrorKind::ConcurrentModification),
        }
    }

    assert!(saved >= 1);
    let final_record = h.file_service.get_file(record.id).await.unwrap();
    // Exactly one increment per persisted save: none lost, none doubled.
    assert_eq!(final_record.version, 1 + saved);
}

#[tokio::test]
async fn test_read_structured_normalizes_blank_workbooks() {
    let h = TestHarness::new().await;
    let record = h.upload.create_blank(&h.ctx, FileKind::Xlsx).await.unwrap();

    let wb = h.workbook.read_structured(record.id).await.unwrap();
    assert_eq!(wb.sheets.len(), 1);
    assert!(!wb.sheets[0].rows.is_empty());
}

#[tokio::test]
async fn test_read_structured_on_missing_file_is_not_found() {
    let h = TestHarness::new().await;

    let err = h.workbook.read_structured(Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_read_structured_on_non_workbook_is_corrupt_document() {
    let h = TestHarness::new().await;
    let record = upload_one(&h).await;

    let err = h.workbook.read_structured(record.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::CorruptDocument);
}

#[tokio::test]
async fn test_structured_update_replaces_rows_and_bumps_version() {
    let h = TestHarness::new().await;
    let record = h.upload.create_blank(&h.ctx, FileKind::Xlsx).await.unwrap();

    let rows = vec![
        vec![CellValue::from("item"), CellValue::from("qty")],
        vec![CellValue::from("paper"), CellValue::from(3.0)],
    ];

    let updated = h
        .workbook
        .apply_structured_update(
            &h.ctx,
            record.id,
            vec![SheetUpdate {
                sheet_id: "sheet-1".into(),
                rows: rows.clone(),
            }],
        )
        .await
        .unwrap();

    assert_eq!(updated.version, 2);
    assert_eq!(updated.last_saved_by, Some(h.ctx.user_id));

    let wb = h.workbook.read_structured(record.id).await.unwrap();
    assert_eq!(wb.sheets[0].rows, rows);
}

#[tokio::test]
async fn test_structured_update_with_unknown_sheet_changes_nothing() {
    let h = TestHarness::new().await;
    let record = h.upload.create_blank(&h.ctx, FileKind::Xlsx).await.unwrap();
    let before = h.workbook.read_structured(record.id).await.unwrap();

    let err = h
        .workbook
        .apply_structured_update(
            &h.ctx,
            record.id,
            vec![
                SheetUpdate {
                    sheet_id: "sheet-1".into(),
                    rows: vec![vec![CellValue::from("x")]],
                },
                SheetUpdate {
                    sheet_id: "no-such-sheet".into(),
                    rows: vec![],
                },
            ],
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::SheetNotFound);

    // Sheet validation happens before any write.
    let after = h.workbook.read_structured(record.id).await.unwrap();
    assert_eq!(after, before);
    assert_eq!(
        h.file_service.get_file(record.id).await.unwrap().version,
        1
    );
}

#[tokio::test]
async fn test_structured_update_with_identical_rows_is_content_idempotent() {
    let h = TestHarness::new().await;
    let record = h.upload.create_blank(&h.ctx, FileKind::Xlsx).await.unwrap();

    let wb = h.workbook.read_structured(record.id).await.unwrap();
    let updates: Vec<SheetUpdate> = wb
        .sheets
        .iter()
        .map(|s| SheetUpdate {
            sheet_id: s.id.clone(),
            rows: s.rows.clone(),
        })
        .collect();

    let updated = h
        .workbook
        .apply_structured_update(&h.ctx, record.id, updates)
        .await
        .unwrap();

    // Visible content is unchanged, but the version still advances by
    // contract.
    let reread = h.workbook.read_structured(record.id).await.unwrap();
    assert_eq!(reread, wb);
    assert_eq!(updated.version, 2);
}
