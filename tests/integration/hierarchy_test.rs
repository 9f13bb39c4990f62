//! Integration tests for folder structure changes.

mod helpers;

use pathvault_core::config::CascadeMode;
use pathvault_core::error::{ErrorKind, codes};

#[tokio::test]
async fn test_rename_folder_rewrites_whole_subtree() {
    let app = helpers::TestApp::new().await;
    let ctx = &app.ctx;
    let docs = app.mkdir(ctx, "docs", "/").await;
    app.mkdir(ctx, "sub", "/docs/").await;
    app.mkdir(ctx, "deep", "/docs/sub/").await;
    app.upload(ctx, "/docs/sub/deep/", "x.txt", b"deep content").await;
    app.mkdir(ctx, "docs2", "/").await;
    app.upload(ctx, "/docs2/", "keep.txt", b"untouched").await;

    let renamed = app
        .services
        .files
        .rename(ctx, docs.id, "archive")
        .await
        .unwrap();
    assert_eq!(renamed.full_path(), "/archive/");

    assert_eq!(
        app.paths(ctx).await,
        vec![
            "/archive/",
            "/archive/sub/",
            "/archive/sub/deep/",
            "/archive/sub/deep/x.txt",
            "/docs2/",
            "/docs2/keep.txt",
        ]
    );
    assert_eq!(app.read(ctx, "/archive/sub/deep/x.txt").await, b"deep content");
    assert!(!app.services.files.exists(ctx, "/docs/sub/").await.unwrap());
}

#[tokio::test]
async fn test_move_folder_and_reject_moving_into_itself() {
    let app = helpers::TestApp::new().await;
    let ctx = &app.ctx;
    let docs = app.mkdir(ctx, "docs", "/").await;
    app.mkdir(ctx, "sub", "/docs/").await;
    app.mkdir(ctx, "target", "/").await;
    app.upload(ctx, "/docs/sub/", "a.txt", b"a").await;

    let err = app
        .services
        .files
        .move_to(ctx, docs.id, "/docs/sub/")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidPath);

    let moved = app
        .services
        .files
        .move_to(ctx, docs.id, "/target")
        .await
        .unwrap();
    assert_eq!(moved.full_path(), "/target/docs/");
    assert_eq!(
        app.paths(ctx).await,
        vec!["/target/", "/target/docs/", "/target/docs/sub/", "/target/docs/sub/a.txt"]
    );

    let err = app
        .services
        .files
        .move_to(ctx, docs.id, "/missing/")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidPath);
}

#[tokio::test]
async fn test_collisions_carry_legacy_codes() {
    let app = helpers::TestApp::new().await;
    let ctx = &app.ctx;
    app.mkdir(ctx, "docs", "/").await;
    let a = app.upload(ctx, "/", "a.txt", b"a").await;
    app.upload(ctx, "/", "b.txt", b"b").await;
    app.upload(ctx, "/docs/", "a.txt", b"other a").await;

    let err = app.services.files.rename(ctx, a.id, "b.txt").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::DuplicateName);
    assert_eq!(err.legacy_code(), Some(codes::RENAME_DUPLICATED_FILE));

    let err = app.services.files.move_to(ctx, a.id, "/docs/").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::DuplicateName);
    assert_eq!(err.legacy_code(), Some(codes::MOVE_DUPLICATED_FILE));

    let same = app.services.files.rename(ctx, a.id, "a.txt").await.unwrap();
    assert_eq!(same.full_path(), "/a.txt");
}

#[tokio::test]
async fn test_delete_folder_removes_subtree_and_blobs() {
    let app = helpers::TestApp::new().await;
    let ctx = &app.ctx;
    app.mkdir(ctx, "docs", "/").await;
    app.mkdir(ctx, "sub", "/docs/").await;
    app.upload(ctx, "/docs/", "a.txt", b"a").await;
    app.upload(ctx, "/docs/sub/", "b.txt", b"b").await;
    app.mkdir(ctx, "docs2", "/").await;
    app.upload(ctx, "/docs2/", "c.txt", b"c").await;
    assert_eq!(app.blob_count(), 3);

    let removed = app.services.files.delete_by_path(ctx, "/docs/").await.unwrap();
    assert_eq!(removed, 4);
    assert_eq!(app.paths(ctx).await, vec!["/docs2/", "/docs2/c.txt"]);
    assert_eq!(app.blob_count(), 1);
    assert_eq!(app.read(ctx, "/docs2/c.txt").await, b"c");
}

#[tokio::test]
async fn test_shallow_cascade_leaves_deeper_levels() {
    let app =
        helpers::TestApp::with_config(|config| config.hierarchy.cascade = CascadeMode::Shallow)
            .await;
    let ctx = &app.ctx;
    let docs = app.mkdir(ctx, "docs", "/").await;
    app.mkdir(ctx, "sub", "/docs/").await;
    app.upload(ctx, "/docs/sub/", "deep.txt", b"d").await;

    app.services.files.rename(ctx, docs.id, "archive").await.unwrap();
    assert_eq!(
        app.paths(ctx).await,
        vec!["/archive/", "/archive/sub/", "/docs/sub/deep.txt"]
    );
}

#[tokio::test]
async fn test_namespaces_are_isolated() {
    let app = helpers::TestApp::new().await;
    let t1 = app.tenant("t1");
    let t2 = app.tenant("t2");

    app.mkdir(&t1, "docs", "/").await;
    app.mkdir(&t2, "docs", "/").await;
    app.upload(&t1, "/docs/", "a.txt", b"one").await;
    app.upload(&t2, "/docs/", "a.txt", b"two").await;

    assert_eq!(app.read(&t1, "/docs/a.txt").await, b"one");
    assert_eq!(app.read(&t2, "/docs/a.txt").await, b"two");

    let t1_docs = app.services.files.get_by_full_path(&t1, "/docs/").await.unwrap();
    let err = app.services.files.delete(&t2, t1_docs.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    app.services.files.delete(&t1, t1_docs.id).await.unwrap();
    assert!(app.paths(&t1).await.is_empty());
    assert_eq!(app.paths(&t2).await, vec!["/docs/", "/docs/a.txt"]);
}

#[tokio::test]
async fn test_folder_tree_tracks_mutations() {
    let app = helpers::TestApp::new().await;
    let ctx = &app.ctx;
    app.mkdir(ctx, "b", "/").await;
    let a = app.mkdir(ctx, "a", "/").await;
    app.mkdir(ctx, "inner", "/a/").await;

    app.services.files.move_to(ctx, a.id, "/b/").await.unwrap();

    let tree = app.services.folders.folder_tree(ctx).await.unwrap();
    assert_eq!(tree.total_folders, 3);
    assert_eq!(tree.root.children.len(), 1);
    assert!(tree.root.find("/b/a/inner/").is_some());
}

#[tokio::test]
async fn test_unscoped_context_mutates_only_the_record_namespace() {
    let app = helpers::TestApp::new().await;
    let t1 = app.tenant("t1");
    let t2 = app.tenant("t2");

    let docs = app.mkdir(&t1, "docs", "/").await;
    app.mkdir(&t2, "docs", "/").await;
    let a = app.upload(&t1, "/docs/", "a.txt", b"one").await;
    app.upload(&t2, "/docs/", "a.txt", b"two").await;

    let copy = app
        .services
        .files
        .clone_file(&app.ctx, a.id, "/docs/")
        .await
        .unwrap();
    assert_eq!(copy.namespace.as_deref(), Some("t1"));
    assert_eq!(copy.full_path(), "/docs/a (1).txt");

    app.services
        .files
        .rename(&app.ctx, docs.id, "reports")
        .await
        .unwrap();
    assert_eq!(
        app.paths(&t1).await,
        vec!["/reports/", "/reports/a (1).txt", "/reports/a.txt"]
    );
    assert_eq!(app.paths(&t2).await, vec!["/docs/", "/docs/a.txt"]);

    app.services.files.delete(&app.ctx, docs.id).await.unwrap();
    assert!(app.paths(&t1).await.is_empty());
    assert_eq!(app.paths(&t2).await, vec!["/docs/", "/docs/a.txt"]);
    assert_eq!(app.read(&t2, "/docs/a.txt").await, b"two");
}
