//! Navigation operations implementation

use log::{debug, warn};
use std::io;

use crate::navigate::results::{ResolutionQuality, ResolvedHandle};
use crate::storage::NodeRef;

/// Walks `segments` down from `root`.
///
/// Each segment is matched case-insensitively against the names of the
/// current directory's subdirectories; children without a name are skipped.
/// A missing segment is created when `create_missing` is set, otherwise the
/// walk stops and the deepest node reached is returned as an
/// [`ResolutionQuality::AncestorMatch`]. A failed creation stops the walk the
/// same way. Only a failure to list children is an error.
pub fn walk(
    root: NodeRef,
    segments: &[String],
    create_missing: bool,
) -> io::Result<ResolvedHandle> {
    let mut current = root;
    let mut matched: Vec<String> = Vec::with_capacity(segments.len());

    for segment in segments.iter().filter(|segment| !segment.is_empty()) {
        let children = current.list_children()?;
        let found = children.into_iter().find(|child| {
            child.is_directory()
                && child
                    .name()
                    .is_some_and(|name| same_name(&name, segment))
        });

        let next = match found {
            Some(child) => child,
            None if create_missing => match current.create_directory(segment) {
                Ok(created) => {
                    debug!("Created {segment} under {}", current.label());
                    created
                }
                Err(e) => {
                    warn!("Failed to create {segment} under {}: {e}", current.label());
                    return Ok(ResolvedHandle::new(
                        current,
                        matched,
                        ResolutionQuality::AncestorMatch,
                    ));
                }
            },
            None => {
                debug!("{segment} not found under {}", current.label());
                return Ok(ResolvedHandle::new(
                    current,
                    matched,
                    ResolutionQuality::AncestorMatch,
                ));
            }
        };

        matched.push(next.name().unwrap_or_else(|| segment.clone()));
        current = next;
    }

    Ok(ResolvedHandle::new(
        current,
        matched,
        ResolutionQuality::ExactMatch,
    ))
}

/// Segments left to walk from a grant root to the target.
///
/// `grant` is the document path the grant key encodes, `storage` the full
/// concrete path of the target (`Android/data/<owner>/<relative>`) and
/// `relative` the logical relative path alone.
///
/// 1. A grant that is a segment prefix of `storage` walks the remainder.
/// 2. A grant that lies strictly below `storage` cannot reach the target:
///    `None`.
/// 3. Otherwise a grant whose last segment names a level of `storage` walks
///    what follows that level.
/// 4. Otherwise the relative path is walked from the grant root.
pub fn remaining_segments(
    grant: &[String],
    storage: &[String],
    relative: &[String],
) -> Option<Vec<String>> {
    if is_segment_prefix(grant, storage) {
        return Some(storage[grant.len()..].to_vec());
    }
    if is_segment_prefix(storage, grant) {
        return None;
    }

    if let Some(last) = grant.last() {
        if let Some(position) = storage.iter().position(|segment| same_name(segment, last)) {
            return Some(storage[position + 1..].to_vec());
        }
    }

    Some(relative.to_vec())
}

fn is_segment_prefix(prefix: &[String], path: &[String]) -> bool {
    prefix.len() <= path.len()
        && prefix
            .iter()
            .zip(path)
            .all(|(held, wanted)| same_name(held, wanted))
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::split_segments;
    use crate::storage::{DirectoryNode, MemoryNode, NodeKind};
    use std::sync::Arc;

    fn segs(path: &str) -> Vec<String> {
        split_segments(path)
    }

    fn is_node(handle: &ResolvedHandle, node: &MemoryNode) -> bool {
        handle.node().name() == node.name() && handle.node().kind() == node.kind()
    }

    #[test]
    fn test_empty_path_returns_root() {
        let root = MemoryNode::directory("files");
        for create in [false, true] {
            let handle = walk(root.clone().into_ref(), &[], create).unwrap();
            assert_eq!(handle.quality(), ResolutionQuality::ExactMatch);
            assert!(handle.matched_segments().is_empty());
            assert!(is_node(&handle, &root));
        }
        assert_eq!(root.node_count(), 1);
    }

    #[test]
    fn test_walk_is_case_insensitive() {
        let root = MemoryNode::directory("files");
        root.add_path("Dragon2017/Assets");
        let handle = walk(root.into_ref(), &segs("dragon2017/ASSETS"), false).unwrap();
        assert_eq!(handle.quality(), ResolutionQuality::ExactMatch);
        assert_eq!(handle.matched_segments(), ["Dragon2017", "Assets"]);
    }

    #[test]
    fn test_missing_segment_without_create_is_ancestor() {
        let root = MemoryNode::directory("files");
        root.add_path("dragon2017");
        let before = root.node_count();

        let handle = walk(root.clone().into_ref(), &segs("dragon2017/assets"), false).unwrap();
        assert_eq!(handle.quality(), ResolutionQuality::AncestorMatch);
        assert_eq!(handle.matched_segments(), ["dragon2017"]);
        assert_eq!(handle.node().name().as_deref(), Some("dragon2017"));
        assert_eq!(root.node_count(), before);
    }

    #[test]
    fn test_create_missing_final_segment() {
        let root = MemoryNode::directory("files");
        root.add_path("dragon2017");
        let before = root.node_count();

        let handle = walk(root.clone().into_ref(), &segs("dragon2017/assets"), true).unwrap();
        assert_eq!(handle.quality(), ResolutionQuality::ExactMatch);
        assert_eq!(root.node_count(), before + 1);
        assert!(root.child("dragon2017").unwrap().child("assets").is_some());
    }

    #[test]
    fn test_failed_creation_stops_at_ancestor() {
        let root = MemoryNode::directory("files");
        let dragon = root.add_path("dragon2017");
        dragon.set_writable(false);

        let handle = walk(root.into_ref(), &segs("dragon2017/assets/maps"), true).unwrap();
        assert_eq!(handle.quality(), ResolutionQuality::AncestorMatch);
        assert_eq!(handle.matched_segments(), ["dragon2017"]);
    }

    #[test]
    fn test_unnamed_and_file_children_are_skipped() {
        let root = MemoryNode::directory("files");
        root.add_child(MemoryNode::unnamed_directory());
        root.add_child(MemoryNode::file("assets", b"not a dir"));
        let handle = walk(root.into_ref(), &segs("assets"), false).unwrap();
        assert_eq!(handle.quality(), ResolutionQuality::AncestorMatch);
        assert_eq!(handle.node().kind(), NodeKind::Directory);
    }

    #[test]
    fn test_childless_node_is_terminal_not_error() {
        let root = MemoryNode::directory("files");
        let handle = walk(root.into_ref(), &segs("anything"), false).unwrap();
        assert_eq!(handle.quality(), ResolutionQuality::AncestorMatch);
    }

    #[test]
    fn test_listing_failure_is_error() {
        let root = MemoryNode::directory("files");
        root.fail_listing(true);
        let node: NodeRef = Arc::new(root);
        assert!(walk(node, &segs("assets"), false).is_err());
    }

    #[test]
    fn test_remaining_after_prefix_grant() {
        let storage = segs("Android/data/com.mobile.legends/files/dragon2017/assets");
        let remaining = remaining_segments(
            &segs("android/DATA/com.mobile.legends/files"),
            &storage,
            &segs("files/dragon2017/assets"),
        );
        assert_eq!(remaining, Some(segs("dragon2017/assets")));
    }

    #[test]
    fn test_remaining_for_volume_root() {
        let storage = segs("Android/data/pkg/files");
        assert_eq!(remaining_segments(&[], &storage, &segs("files")), Some(storage));
    }

    #[test]
    fn test_remaining_after_matching_last_segment() {
        let storage = segs("Android/data/com.mobile.legends/files/dragon2017/assets");
        let remaining = remaining_segments(
            &segs("Backup/com.mobile.legends"),
            &storage,
            &segs("files/dragon2017/assets"),
        );
        assert_eq!(remaining, Some(segs("files/dragon2017/assets")));
    }

    #[test]
    fn test_remaining_falls_back_to_relative() {
        let storage = segs("Android/data/pkg/files");
        let remaining = remaining_segments(&segs("Download/elsewhere"), &storage, &segs("files"));
        assert_eq!(remaining, Some(segs("files")));
    }

    #[test]
    fn test_grant_below_target_has_no_remaining_path() {
        let storage = segs("Android/data/com.mobile.legends/files");
        let remaining = remaining_segments(
            &segs("Android/data/com.mobile.legends/files/dragon2017"),
            &storage,
            &segs("files"),
        );
        assert_eq!(remaining, None);
    }
}
