//! Storage operations
//!
//! Scoped read, write and list under a resolved directory node. Every entry
//! point re-validates the node first; streams are dropped on every path out.

use log::{debug, error, info, warn};
use std::io::{self, Read, Write};

use crate::error::IoError;
use crate::storage::node::{DirectoryNode, NodeRef};
use crate::storage::permissions::{ensure_readable, ensure_readable_directory, ensure_writable};
use crate::storage::results::DirectoryEntry;

const BUFFER_SIZE: usize = 8192;

/// Writes `data` to the child `name` of `directory`, creating it if needed.
///
/// The child is matched case-sensitively: file creation on the host is
/// case-preserving, so `Save.dat` and `save.dat` are different files.
pub fn write_file(directory: &dyn DirectoryNode, name: &str, data: &[u8]) -> Result<(), IoError> {
    ensure_writable(directory)?;
    if !directory.is_directory() {
        return Err(IoError::AccessRevokedMidUse(directory.label()));
    }

    let file = match find_file(directory, name)? {
        Some(existing) if existing.is_directory() => {
            warn!("{name} under {} is a directory", directory.label());
            return Err(IoError::CreateFailed {
                name: name.to_string(),
                source: io::Error::new(
                    io::ErrorKind::IsADirectory,
                    format!("{name} is a directory"),
                ),
            });
        }
        Some(existing) => {
            ensure_writable(existing.as_ref())?;
            existing
        }
        None => {
            debug!("Creating {name} under {}", directory.label());
            directory
                .create_file(name)
                .map_err(|source| IoError::CreateFailed {
                    name: name.to_string(),
                    source,
                })?
        }
    };

    let mut stream = file.open_write().map_err(|source| IoError::Stream {
        name: name.to_string(),
        transferred: 0,
        source,
    })?;

    let mut written = 0u64;
    for chunk in data.chunks(BUFFER_SIZE) {
        if let Err(source) = stream.write_all(chunk) {
            error!("Write to {name} failed after {written} bytes: {source}");
            return Err(IoError::Stream {
                name: name.to_string(),
                transferred: written,
                source,
            });
        }
        written += chunk.len() as u64;
    }

    stream.flush().map_err(|source| IoError::Stream {
        name: name.to_string(),
        transferred: written,
        source,
    })?;
    drop(stream);

    info!("Wrote {written} bytes to {name} under {}", directory.label());
    Ok(())
}

/// Reads the child `name` of `directory`.
///
/// Reads at most the length the host reports. If the stream ends early only
/// the bytes actually obtained are returned; the returned length is the
/// authoritative one.
pub fn read_file(directory: &dyn DirectoryNode, name: &str) -> Result<Vec<u8>, IoError> {
    ensure_readable_directory(directory)?;

    let file = find_file(directory, name)?
        .ok_or_else(|| IoError::FileNotFound(name.to_string()))?;
    if !file.exists() || file.is_directory() {
        return Err(IoError::FileNotFound(name.to_string()));
    }
    ensure_readable(file.as_ref())?;

    let expected = file.length();
    let stream = file.open_read().map_err(|source| IoError::Stream {
        name: name.to_string(),
        transferred: 0,
        source,
    })?;

    let mut limited = stream.take(expected);
    let mut content = Vec::with_capacity(expected.min(BUFFER_SIZE as u64 * 16) as usize);
    let mut buffer = [0u8; BUFFER_SIZE];
    loop {
        match limited.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => content.extend_from_slice(&buffer[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(source) => {
                error!("Read of {name} failed after {} bytes: {source}", content.len());
                return Err(IoError::Stream {
                    name: name.to_string(),
                    transferred: content.len() as u64,
                    source,
                });
            }
        }
    }

    if (content.len() as u64) < expected {
        warn!(
            "Short read on {name}: expected {expected} bytes, got {}",
            content.len()
        );
    }

    info!("Read {} bytes from {name} under {}", content.len(), directory.label());
    Ok(content)
}

/// Lists the named children of `directory`. Children without a name are skipped.
pub fn list_directory(directory: &dyn DirectoryNode) -> Result<Vec<DirectoryEntry>, IoError> {
    ensure_readable_directory(directory)?;

    let children = directory.list_children().map_err(|source| IoError::Stream {
        name: directory.label(),
        transferred: 0,
        source,
    })?;

    let entries: Vec<DirectoryEntry> = children
        .iter()
        .filter_map(|child| {
            child.name().map(|name| DirectoryEntry {
                name,
                kind: child.kind(),
                size: child.length(),
            })
        })
        .collect();

    debug!("Listed {} - {} entries", directory.label(), entries.len());
    Ok(entries)
}

/// Exact, case-sensitive lookup of a direct child.
fn find_file(directory: &dyn DirectoryNode, name: &str) -> Result<Option<NodeRef>, IoError> {
    let children = directory.list_children().map_err(|source| IoError::Stream {
        name: directory.label(),
        transferred: 0,
        source,
    })?;
    Ok(children
        .into_iter()
        .find(|child| child.name().as_deref() == Some(name)))
}
