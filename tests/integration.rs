use std::fs;
use std::path::Path;
use std::sync::Arc;

use saf_resolver::storage::{FsNode, MemoryNode};
use saf_resolver::{
    AccessError, AccessGrant, AccessIntent, AccessStrategySelector, BlockingResolver, IoError,
    LocalHost, LogicalPath, MatchQuality, ResolutionQuality, ResolverConfig, ResolverError,
};
use tempfile::TempDir;

const OWNER: &str = "com.mobile.legends";
const TARGET: &str = "files/dragon2017/assets";
const EXACT_KEY: &str = "primary:Android/data/com.mobile.legends/files/dragon2017/assets";

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn config_with_roots(roots: &[&Path]) -> ResolverConfig {
    let mut roots = roots.iter().map(|root| root.to_string_lossy().to_string());
    ResolverConfig {
        primary_storage_root: roots
            .next()
            .unwrap_or_else(|| "/nonexistent/saf-resolver".to_string()),
        alternate_storage_roots: roots.collect(),
        ..ResolverConfig::default()
    }
}

fn target() -> LogicalPath {
    LogicalPath::new(OWNER, TARGET)
}

#[test]
fn test_exact_grant_fixture() {
    let host = Arc::new(LocalHost::new());
    host.persist_grant(
        AccessGrant::new(EXACT_KEY, true, true),
        MemoryNode::directory("assets").into_ref(),
    );
    let selector = AccessStrategySelector::for_host(host, config_with_roots(&[]));

    assert_eq!(
        saf_resolver::grants::matches(EXACT_KEY, OWNER, TARGET),
        MatchQuality::Exact
    );
    let handle = selector.resolve(&target(), AccessIntent::Read).unwrap();
    assert_eq!(handle.quality(), ResolutionQuality::ExactMatch);
    assert!(handle.matched_segments().is_empty());
    assert!(selector.grant_store().has_access(&target()));
}

#[test]
fn test_broad_access_finds_alternate_root() {
    init_logging();
    let missing = TempDir::new().unwrap();
    let device = TempDir::new().unwrap();
    let assets = device
        .path()
        .join("Android/data/com.mobile.legends/files/dragon2017/assets");
    fs::create_dir_all(assets).unwrap();

    let host = Arc::new(LocalHost::new());
    host.set_broad_access(true);
    let gone = missing.path().join("gone");
    let config = config_with_roots(&[gone.as_path(), device.path()]);
    let selector = AccessStrategySelector::for_host(host, config);

    let handle = selector.resolve(&target(), AccessIntent::Read).unwrap();
    assert_eq!(handle.quality(), ResolutionQuality::BroadAccess);
    assert_eq!(handle.node().name().as_deref(), Some("assets"));
}

#[test]
fn test_broad_access_without_paths_falls_through_to_grant() {
    init_logging();
    let empty = TempDir::new().unwrap();
    let host = Arc::new(LocalHost::new());
    host.set_broad_access(true);
    host.persist_grant(
        AccessGrant::new(EXACT_KEY, true, true),
        MemoryNode::directory("assets").into_ref(),
    );

    let selector = AccessStrategySelector::for_host(host, config_with_roots(&[empty.path()]));
    let handle = selector.resolve(&target(), AccessIntent::Read).unwrap();
    assert_eq!(handle.quality(), ResolutionQuality::ExactMatch);
}

#[test]
fn test_broad_access_without_paths_or_grant_is_no_grant() {
    let empty = TempDir::new().unwrap();
    let host = Arc::new(LocalHost::new());
    host.set_broad_access(true);

    let selector = AccessStrategySelector::for_host(host, config_with_roots(&[empty.path()]));
    let result = selector.resolve(&target(), AccessIntent::Read);
    assert!(matches!(result, Err(AccessError::NoGrant(_))));

    let request = selector.consent_request(&target());
    assert!(request.initial_tree.ends_with("dragon2017%2Fassets"));
}

#[test]
fn test_write_then_read_five_bytes() {
    let host = Arc::new(LocalHost::new());
    let assets = MemoryNode::directory("assets");
    host.persist_grant(AccessGrant::new(EXACT_KEY, true, true), assets.clone().into_ref());
    let selector = AccessStrategySelector::for_host(host, config_with_roots(&[]));

    let handle = selector.resolve(&target(), AccessIntent::Write).unwrap();
    assert_eq!(handle.quality(), ResolutionQuality::ExactMatch);
    selector.write_file(&handle, "hello.bin", b"hello").unwrap();

    let handle = selector.resolve(&target(), AccessIntent::Read).unwrap();
    assert_eq!(selector.read_file(&handle, "hello.bin").unwrap(), b"hello");
    assert_eq!(assets.child("hello.bin").unwrap().content().len(), 5);
}

#[test]
fn test_revoked_between_resolve_and_read() {
    let host = Arc::new(LocalHost::new());
    let assets = MemoryNode::directory("assets");
    assets.add_child(MemoryNode::file("skin.dat", b"data"));
    host.persist_grant(AccessGrant::new(EXACT_KEY, true, true), assets.clone().into_ref());
    let selector = AccessStrategySelector::for_host(host, config_with_roots(&[]));

    let handle = selector.resolve(&target(), AccessIntent::Read).unwrap();
    assets.revoke();

    let read = selector.read_file(&handle, "skin.dat");
    assert!(matches!(read, Err(IoError::AccessRevokedMidUse(_))));
    let write = selector.write_file(&handle, "skin.dat", b"x");
    assert!(matches!(write, Err(IoError::AccessRevokedMidUse(_))));
}

#[test]
fn test_revoked_grant_is_no_longer_found() {
    let host = Arc::new(LocalHost::new());
    host.persist_grant(
        AccessGrant::new(EXACT_KEY, true, true),
        MemoryNode::directory("assets").into_ref(),
    );
    let selector = AccessStrategySelector::for_host(Arc::clone(&host), config_with_roots(&[]));
    assert!(selector.resolve(&target(), AccessIntent::Read).is_ok());

    host.revoke_grant(EXACT_KEY);
    assert!(matches!(
        selector.resolve(&target(), AccessIntent::Read),
        Err(AccessError::NoGrant(_))
    ));
}

#[test]
fn test_read_only_grant_cannot_serve_writes() {
    let host = Arc::new(LocalHost::new());
    host.persist_grant(
        AccessGrant::new(EXACT_KEY, true, false),
        MemoryNode::directory("assets").into_ref(),
    );
    let selector = AccessStrategySelector::for_host(host, config_with_roots(&[]));
    assert!(selector.resolve(&target(), AccessIntent::Read).is_ok());
    assert!(matches!(
        selector.resolve(&target(), AccessIntent::Write),
        Err(AccessError::NoGrant(_))
    ));
}

#[test]
fn test_grant_below_target_is_not_used() {
    let host = Arc::new(LocalHost::new());
    let dragon = MemoryNode::directory("dragon2017");
    host.persist_grant(
        AccessGrant::new("primary:Android/data/com.mobile.legends/files/dragon2017", true, true),
        dragon.clone().into_ref(),
    );
    let selector = AccessStrategySelector::for_host(host, config_with_roots(&[]));
    let files = LogicalPath::new(OWNER, "files");

    for intent in [AccessIntent::Read, AccessIntent::Write] {
        assert!(matches!(
            selector.resolve(&files, intent),
            Err(AccessError::NoGrant(_))
        ));
    }
    assert!(dragon.child("files").is_none());
    assert_eq!(dragon.node_count(), 1);
}

#[test]
fn test_filesystem_grant_with_opaque_key() {
    init_logging();
    let device = TempDir::new().unwrap();
    let data = device.path().join("Android/data");
    fs::create_dir_all(data.join("com.mobile.legends/Files/Dragon2017")).unwrap();

    let host = Arc::new(LocalHost::new());
    host.persist_grant(
        AccessGrant::new("tree:com.mobile.legends:files:dragon2017:assets", true, true),
        Arc::new(FsNode::new(data.join("com.mobile.legends"))),
    );
    let selector = AccessStrategySelector::for_host(host, config_with_roots(&[]));

    let read = selector.resolve(&target(), AccessIntent::Read).unwrap();
    assert_eq!(read.quality(), ResolutionQuality::AncestorMatch);
    assert_eq!(read.matched_segments(), ["Files", "Dragon2017"]);

    let write = selector.resolve(&target(), AccessIntent::Write).unwrap();
    assert_eq!(write.quality(), ResolutionQuality::ExactMatch);
    selector.write_file(&write, "index.json", b"{}").unwrap();
    assert_eq!(
        fs::read(data.join("com.mobile.legends/Files/Dragon2017/assets/index.json")).unwrap(),
        b"{}"
    );

    let entries = selector.list(&write).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "index.json");
}

#[tokio::test]
async fn test_blocking_resolver_round_trip() {
    let host = Arc::new(LocalHost::new());
    host.persist_grant(
        AccessGrant::new(EXACT_KEY, true, true),
        MemoryNode::directory("assets").into_ref(),
    );
    let resolver = BlockingResolver::new(AccessStrategySelector::for_host(
        host,
        config_with_roots(&[]),
    ));

    let handle = resolver.resolve(target(), AccessIntent::Write).await.unwrap();
    resolver
        .write_file(handle.clone(), "save.dat".into(), b"12345".to_vec())
        .await
        .unwrap();
    let content = resolver.read_file(handle.clone(), "save.dat".into()).await.unwrap();
    assert_eq!(content, b"12345");
    assert_eq!(resolver.list(handle).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_blocking_resolver_reports_no_grant() {
    let resolver = BlockingResolver::new(AccessStrategySelector::for_host(
        Arc::new(LocalHost::new()),
        config_with_roots(&[]),
    ));
    let result = resolver.resolve(target(), AccessIntent::Read).await;
    assert!(matches!(
        result,
        Err(ResolverError::Access(AccessError::NoGrant(_)))
    ));
}
