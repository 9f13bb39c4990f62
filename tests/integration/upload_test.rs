//! Integration tests for uploads, copies, and downloads.

mod helpers;

use pathvault_core::config::{ConflictPolicy, StoreBackend};
use pathvault_core::error::ErrorKind;
use pathvault_service::Disposition;
use pathvault_service::file::CreateFileRequest;

#[tokio::test]
async fn test_repeated_upload_gets_numbered_names() {
    let app = helpers::TestApp::new().await;
    let ctx = &app.ctx;
    app.mkdir(ctx, "docs", "/").await;

    let first = app.upload(ctx, "/docs/", "a.txt", b"1").await;
    let second = app.upload(ctx, "/docs/", "a.txt", b"2").await;
    let third = app.upload(ctx, "/docs", "a.txt", b"3").await;

    assert_eq!(first.full_path(), "/docs/a.txt");
    assert_eq!(second.full_path(), "/docs/a (1).txt");
    assert_eq!(third.full_path(), "/docs/a (2).txt");
    assert_eq!(first.mime_type.as_deref(), Some("text/plain"));
    assert_eq!(app.read(ctx, "/docs/a (1).txt").await, b"2");
    assert_eq!(app.blob_count(), 3);

    let names: Vec<String> = app
        .services
        .files
        .list_by_folder(ctx, "/docs/")
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.file_name)
        .collect();
    assert_eq!(names, vec!["a (1).txt", "a (2).txt", "a.txt"]);
}

#[tokio::test]
async fn test_overwrite_replaces_record_and_blob() {
    let app = helpers::TestApp::new().await;
    let ctx = &app.ctx;
    let original = app.upload(ctx, "/", "report.pdf", b"v1").await;

    let mut req = helpers::upload_request("/", "report.pdf");
    req.policy = Some(ConflictPolicy::Overwrite);
    let replacement = app
        .services
        .files
        .upload(ctx, req, helpers::body(b"version two"))
        .await
        .unwrap();

    assert_ne!(replacement.id, original.id);
    assert_eq!(replacement.full_path(), "/report.pdf");
    assert_eq!(replacement.size_in_bytes, 11);
    assert_eq!(app.paths(ctx).await, vec!["/report.pdf"]);
    assert_eq!(app.read(ctx, "/report.pdf").await, b"version two");
    assert_eq!(app.blob_count(), 1);
}

#[tokio::test]
async fn test_reject_policy_leaves_no_orphan_blob() {
    let app =
        helpers::TestApp::with_config(|config| {
            config.hierarchy.default_conflict_policy = ConflictPolicy::Reject
        })
        .await;
    let ctx = &app.ctx;
    app.upload(ctx, "/", "a.txt", b"first").await;

    let err = app
        .services
        .files
        .upload(ctx, helpers::upload_request("/", "a.txt"), helpers::body(b"second"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::DuplicateName);
    assert_eq!(app.blob_count(), 1);
    assert_eq!(app.read(ctx, "/a.txt").await, b"first");
}

#[tokio::test]
async fn test_upload_into_missing_folder_fails() {
    let app = helpers::TestApp::new().await;
    let err = app
        .services
        .files
        .upload(
            &app.ctx,
            helpers::upload_request("/nowhere/", "a.txt"),
            helpers::body(b"x"),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidPath);
    assert_eq!(app.blob_count(), 0);
}

#[tokio::test]
async fn test_clone_copies_content_under_free_name() {
    let app = helpers::TestApp::new().await;
    let ctx = &app.ctx;
    app.mkdir(ctx, "backup", "/").await;
    let source = app.upload(ctx, "/", "notes.txt", b"remember").await;
    app.upload(ctx, "/backup/", "notes.txt", b"older").await;

    let copy = app
        .services
        .files
        .clone_file(ctx, source.id, "/backup/")
        .await
        .unwrap();
    assert_eq!(copy.full_path(), "/backup/notes (1).txt");
    assert_ne!(copy.file_source, source.file_source);
    assert_eq!(app.read(ctx, "/backup/notes (1).txt").await, b"remember");
    assert_eq!(app.blob_count(), 3);

    app.services.files.delete(ctx, source.id).await.unwrap();
    assert_eq!(app.read(ctx, "/backup/notes (1).txt").await, b"remember");

    let folder = app.services.files.get_by_full_path(ctx, "/backup/").await.unwrap();
    let err = app.services.files.clone_file(ctx, folder.id, "/").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidPath);
}

#[tokio::test]
async fn test_register_upload_respects_ignore_duplicate() {
    let app = helpers::TestApp::new().await;
    let ctx = &app.ctx;
    let request = |ignore_duplicate| CreateFileRequest {
        folder_path: "/".into(),
        file_name: "direct.png".into(),
        file_source: Some("remote-blob.png".into()),
        size_in_bytes: 42,
        mime_type: None,
        ignore_duplicate,
    };

    let first = app.services.files.register_upload(ctx, request(false)).await.unwrap();
    assert_eq!(first.mime_type.as_deref(), Some("image/png"));

    let err = app
        .services
        .files
        .register_upload(ctx, request(false))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::DuplicateName);

    let second = app.services.files.register_upload(ctx, request(true)).await.unwrap();
    assert_eq!(second.file_name, "direct (1).png");

    let err = app
        .services
        .files
        .upload_url(ctx, "/", "direct.png")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotImplemented);
}

#[tokio::test]
async fn test_download_metadata() {
    let app = helpers::TestApp::new().await;
    let ctx = &app.ctx;
    app.mkdir(ctx, "docs", "/").await;
    app.upload(ctx, "/docs/", "abc.txt", b"abc").await;

    let download = app
        .services
        .downloads
        .open(ctx, "/docs/abc.txt", Disposition::Inline)
        .await
        .unwrap();
    assert_eq!(download.content_type, "text/plain");
    assert_eq!(download.content_disposition(), "inline");
    assert_eq!(
        download.checksum,
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );

    let err = app
        .services
        .downloads
        .open(ctx, "/docs/", Disposition::Attachment)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_services_from_memory_config() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = pathvault_core::config::AppConfig::default();
    config.database.backend = StoreBackend::Memory;
    config.storage.local.root_path = dir.path().to_string_lossy().to_string();
    config.field_mappings.insert("id".into(), "_id".into());

    let services = pathvault_service::Services::from_config(&config).await.unwrap();
    assert_eq!(
        services.files.field_mappings().get("id").map(String::as_str),
        Some("_id")
    );
}
