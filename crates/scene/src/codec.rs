//! Binary snapshot codec and scene file I/O.
//!
//! The wire form is the bincode encoding of [`SceneSnapshot`]: kind as a
//! raw `u32` tag, name as a length-prefixed string, properties as a
//! string-keyed float map. The format is versionless and opaque; the
//! contract is round-trip fidelity, not a particular byte layout.

use std::{fs, io, path::Path};

use thiserror::Error;

use crate::snapshot::SceneSnapshot;

/// Errors emitted while encoding, decoding, or moving scene files.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("encode error: {0}")]
    Encode(bincode::Error),
    #[error("decode error: {0}")]
    Decode(bincode::Error),
    #[error("scene file missing: {0}")]
    NotFound(String),
}

/// Encode a snapshot to bytes.
pub fn encode_snapshot(snapshot: &SceneSnapshot) -> Result<Vec<u8>, CodecError> {
    bincode::serialize(snapshot).map_err(CodecError::Encode)
}

/// Decode a snapshot from bytes. Truncated or malformed input fails with
/// the underlying reason; unknown kind tags are not an error here (they
/// decode to `EntityKind::Unrecognized`).
pub fn decode_snapshot(bytes: &[u8]) -> Result<SceneSnapshot, CodecError> {
    bincode::deserialize(bytes).map_err(CodecError::Decode)
}

/// Write a snapshot to disk, returning the number of bytes written.
///
/// Writes go through a temp file and rename so a failed write never leaves
/// a half-written scene file behind.
pub fn save_scene(path: &Path, snapshot: &SceneSnapshot) -> Result<usize, CodecError> {
    let data = encode_snapshot(snapshot)?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, &data)?;
    fs::rename(&tmp, path)?;
    tracing::debug!(path = %path.display(), bytes = data.len(), "scene saved");
    Ok(data.len())
}

/// Read a whole scene file into memory, then decode it.
pub fn load_scene(path: &Path) -> Result<SceneSnapshot, CodecError> {
    match fs::read(path) {
        Ok(bytes) => {
            let snapshot = decode_snapshot(&bytes)?;
            tracing::debug!(path = %path.display(), entities = snapshot.entities.len(), "scene loaded");
            Ok(snapshot)
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            Err(CodecError::NotFound(path.display().to_string()))
        }
        Err(err) => Err(CodecError::Io(err)),
    }
}
