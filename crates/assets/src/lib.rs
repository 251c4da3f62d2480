//! Template mesh loading for the glaze viewer.
//!
//! The scene is built from a single model file in the binary glTF (GLB)
//! container format. This crate parses the container's JSON and BIN chunks
//! into a [`TemplateMesh`] the scene treats as an opaque clonable template,
//! and wraps the one-shot background load in a pollable [`LoadHandle`].
//!
//! # Invariants
//! - Parsing never panics on malformed input; every failure is an
//!   [`AssetError`].
//! - The load is fire-and-forget: no cancellation, no timeout, no retry.
//! - Asset ids are content-addressed (hash of the raw file bytes).

use serde_json::Value;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

const GLB_MAGIC: u32 = 0x4654_6C67; // "glTF"
const CHUNK_JSON: u32 = 0x4E4F_534A; // "JSON"
const CHUNK_BIN: u32 = 0x004E_4942; // "BIN\0"

const COMPONENT_U16: u64 = 5123;
const COMPONENT_U32: u64 = 5125;
const COMPONENT_F32: u64 = 5126;

/// Content-addressed asset id computed from the raw file bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(pub u64);

impl AssetId {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let digest = hasher.finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        Self(u64::from_le_bytes(head))
    }
}

/// The loaded template geometry: one mesh primitive, indexed triangles.
///
/// Consumers clone and position it; nothing downstream re-inspects the
/// source file.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateMesh {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl TemplateMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed GLB: {0}")]
    Malformed(String),
    #[error("asset contains no mesh primitive")]
    MissingMesh,
    #[error("unsupported glTF feature: {0}")]
    Unsupported(String),
    #[error("loader thread exited without a result")]
    WorkerLost,
}

/// Read a GLB file from disk and parse its template mesh.
pub fn load_template(path: impl AsRef<Path>) -> Result<(AssetId, TemplateMesh), AssetError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let id = AssetId::from_bytes(&bytes);
    let mesh = parse_glb(&bytes)?;
    tracing::info!(
        path = %path.display(),
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "template mesh loaded"
    );
    Ok((id, mesh))
}

/// Parse a GLB container into its template mesh.
///
/// Reads the first primitive of the first mesh: POSITION and NORMAL
/// attributes plus the index accessor. Missing normals default to +Y;
/// a missing index accessor yields a trivial 0..n index list.
pub fn parse_glb(bytes: &[u8]) -> Result<TemplateMesh, AssetError> {
    let (json, bin) = split_chunks(bytes)?;
    let doc: Value = serde_json::from_slice(json)?;

    let mesh = doc
        .get("meshes")
        .and_then(|m| m.as_array())
        .and_then(|m| m.first())
        .ok_or(AssetError::MissingMesh)?;
    let name = mesh
        .get("name")
        .and_then(|n| n.as_str())
        .unwrap_or("template")
        .to_string();
    let primitive = mesh
        .get("primitives")
        .and_then(|p| p.as_array())
        .and_then(|p| p.first())
        .ok_or(AssetError::MissingMesh)?;
    let attributes = primitive
        .get("attributes")
        .ok_or_else(|| AssetError::Malformed("primitive has no attributes".into()))?;

    let position_accessor = attributes
        .get("POSITION")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| AssetError::Malformed("primitive has no POSITION attribute".into()))?;
    let positions = read_vec3_accessor(&doc, bin, position_accessor)?;

    let normals = match attributes.get("NORMAL").and_then(|v| v.as_u64()) {
        Some(accessor) => {
            let normals = read_vec3_accessor(&doc, bin, accessor)?;
            if normals.len() != positions.len() {
                return Err(AssetError::Malformed(
                    "NORMAL count does not match POSITION count".into(),
                ));
            }
            normals
        }
        None => {
            tracing::debug!("mesh has no normals, defaulting to +Y");
            vec![[0.0, 1.0, 0.0]; positions.len()]
        }
    };

    let indices = match primitive.get("indices").and_then(|v| v.as_u64()) {
        Some(accessor) => read_index_accessor(&doc, bin, accessor)?,
        None => (0..positions.len() as u32).collect(),
    };
    if let Some(&max) = indices.iter().max() {
        if max as usize >= positions.len() {
            return Err(AssetError::Malformed(format!(
                "index {max} out of range for {} vertices",
                positions.len()
            )));
        }
    }

    Ok(TemplateMesh {
        name,
        positions,
        normals,
        indices,
    })
}

/// Split a GLB container into its JSON and BIN chunk payloads.
fn split_chunks(bytes: &[u8]) -> Result<(&[u8], &[u8]), AssetError> {
    if bytes.len() < 12 {
        return Err(AssetError::Malformed("shorter than the GLB header".into()));
    }
    if read_u32(bytes, 0) != GLB_MAGIC {
        return Err(AssetError::Malformed("bad magic".into()));
    }
    let version = read_u32(bytes, 4);
    if version != 2 {
        return Err(AssetError::Unsupported(format!("glTF version {version}")));
    }
    let declared = read_u32(bytes, 8) as usize;
    if declared > bytes.len() {
        return Err(AssetError::Malformed("declared length exceeds file".into()));
    }

    let mut json: Option<&[u8]> = None;
    let mut bin: &[u8] = &[];
    let mut offset = 12usize;
    while offset + 8 <= declared {
        let chunk_len = read_u32(bytes, offset) as usize;
        let chunk_type = read_u32(bytes, offset + 4);
        let start = offset + 8;
        let end = start
            .checked_add(chunk_len)
            .ok_or_else(|| AssetError::Malformed("chunk length overflow".into()))?;
        if end > declared {
            return Err(AssetError::Malformed("chunk exceeds container".into()));
        }
        match chunk_type {
            CHUNK_JSON if json.is_none() => json = Some(&bytes[start..end]),
            CHUNK_BIN => bin = &bytes[start..end],
            _ => {}
        }
        // Chunks are padded to 4-byte alignment.
        offset = end + (4 - end % 4) % 4;
    }

    let json = json.ok_or_else(|| AssetError::Malformed("no JSON chunk".into()))?;
    Ok((json, bin))
}

/// Resolve an accessor index to its raw byte slice plus element metadata.
fn accessor_bytes<'a>(
    doc: &Value,
    bin: &'a [u8],
    accessor_index: u64,
) -> Result<(&'a [u8], u64, usize), AssetError> {
    let accessor = doc
        .get("accessors")
        .and_then(|a| a.as_array())
        .and_then(|a| a.get(accessor_index as usize))
        .ok_or_else(|| AssetError::Malformed(format!("accessor {accessor_index} missing")))?;
    let component_type = accessor
        .get("componentType")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| AssetError::Malformed("accessor has no componentType".into()))?;
    let count = accessor
        .get("count")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| AssetError::Malformed("accessor has no count".into()))?
        as usize;
    let accessor_offset = accessor
        .get("byteOffset")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as usize;
    let view_index = accessor
        .get("bufferView")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| AssetError::Unsupported("accessor without bufferView".into()))?;

    let view = doc
        .get("bufferViews")
        .and_then(|v| v.as_array())
        .and_then(|v| v.get(view_index as usize))
        .ok_or_else(|| AssetError::Malformed(format!("bufferView {view_index} missing")))?;
    if view.get("byteStride").is_some() {
        return Err(AssetError::Unsupported("strided bufferView".into()));
    }
    let buffer = view.get("buffer").and_then(|v| v.as_u64()).unwrap_or(0);
    if buffer != 0 {
        return Err(AssetError::Unsupported("external buffer".into()));
    }
    let view_offset = view.get("byteOffset").and_then(|v| v.as_u64()).unwrap_or(0) as usize;
    let view_length = view
        .get("byteLength")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| AssetError::Malformed("bufferView has no byteLength".into()))?
        as usize;

    let start = view_offset + accessor_offset;
    let end = view_offset + view_length;
    if end > bin.len() || start > end {
        return Err(AssetError::Malformed("accessor outside BIN chunk".into()));
    }
    Ok((&bin[start..end], component_type, count))
}

fn read_vec3_accessor(
    doc: &Value,
    bin: &[u8],
    accessor_index: u64,
) -> Result<Vec<[f32; 3]>, AssetError> {
    let (bytes, component_type, count) = accessor_bytes(doc, bin, accessor_index)?;
    if component_type != COMPONENT_F32 {
        return Err(AssetError::Unsupported(format!(
            "vec3 componentType {component_type}"
        )));
    }
    let needed = count * 12;
    if bytes.len() < needed {
        return Err(AssetError::Malformed("vec3 accessor truncated".into()));
    }
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let base = i * 12;
        out.push([
            read_f32(bytes, base),
            read_f32(bytes, base + 4),
            read_f32(bytes, base + 8),
        ]);
    }
    Ok(out)
}

fn read_index_accessor(
    doc: &Value,
    bin: &[u8],
    accessor_index: u64,
) -> Result<Vec<u32>, AssetError> {
    let (bytes, component_type, count) = accessor_bytes(doc, bin, accessor_index)?;
    let width = match component_type {
        COMPONENT_U16 => 2,
        COMPONENT_U32 => 4,
        other => {
            return Err(AssetError::Unsupported(format!(
                "index componentType {other}"
            )));
        }
    };
    let needed = count * width;
    if bytes.len() < needed {
        return Err(AssetError::Malformed("index accessor truncated".into()));
    }
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let base = i * width;
        let value = match width {
            2 => u16::from_le_bytes([bytes[base], bytes[base + 1]]) as u32,
            _ => read_u32(bytes, base),
        };
        out.push(value);
    }
    Ok(out)
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(word)
}

fn read_f32(bytes: &[u8], offset: usize) -> f32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&bytes[offset..offset + 4]);
    f32::from_le_bytes(word)
}

/// Pollable handle for the one-shot background template load.
///
/// Models the load as an explicit asynchronous operation: the worker thread
/// sends exactly one result over a channel and the frame loop polls for it
/// without blocking. Once the result has been taken, `poll` returns `None`
/// forever.
pub struct LoadHandle {
    rx: mpsc::Receiver<Result<(AssetId, TemplateMesh), AssetError>>,
    finished: bool,
}

impl LoadHandle {
    /// Spawn the loader thread for `path`. Fire-and-forget: the thread is
    /// detached and cannot be cancelled.
    pub fn spawn(path: PathBuf) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            // A dropped receiver just discards the result.
            let _ = tx.send(load_template(&path));
        });
        Self {
            rx,
            finished: false,
        }
    }

    /// Non-blocking check for the load result. Yields the result exactly
    /// once; `None` means still pending (or already taken).
    pub fn poll(&mut self) -> Option<Result<(AssetId, TemplateMesh), AssetError>> {
        if self.finished {
            return None;
        }
        match self.rx.try_recv() {
            Ok(result) => {
                self.finished = true;
                Some(result)
            }
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => {
                self.finished = true;
                Some(Err(AssetError::WorkerLost))
            }
        }
    }

    /// Handle that resolves immediately with `mesh` (for tests and demos).
    pub fn ready(id: AssetId, mesh: TemplateMesh) -> Self {
        let (tx, rx) = mpsc::channel();
        let _ = tx.send(Ok((id, mesh)));
        Self {
            rx,
            finished: false,
        }
    }

    /// Handle that resolves immediately with `error` (for tests).
    pub fn failed(error: AssetError) -> Self {
        let (tx, rx) = mpsc::channel();
        let _ = tx.send(Err(error));
        Self {
            rx,
            finished: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// Assemble a GLB container from a JSON document and a BIN payload.
    fn build_glb(json: &str, bin: &[u8]) -> Vec<u8> {
        let mut json_chunk = json.as_bytes().to_vec();
        while json_chunk.len() % 4 != 0 {
            json_chunk.push(b' ');
        }
        let mut bin_chunk = bin.to_vec();
        while bin_chunk.len() % 4 != 0 {
            bin_chunk.push(0);
        }

        let mut total = 12 + 8 + json_chunk.len();
        if !bin_chunk.is_empty() {
            total += 8 + bin_chunk.len();
        }

        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(&GLB_MAGIC.to_le_bytes());
        out.extend_from_slice(&2u32.to_le_bytes());
        out.extend_from_slice(&(total as u32).to_le_bytes());
        out.extend_from_slice(&(json_chunk.len() as u32).to_le_bytes());
        out.extend_from_slice(&CHUNK_JSON.to_le_bytes());
        out.extend_from_slice(&json_chunk);
        if !bin_chunk.is_empty() {
            out.extend_from_slice(&(bin_chunk.len() as u32).to_le_bytes());
            out.extend_from_slice(&CHUNK_BIN.to_le_bytes());
            out.extend_from_slice(&bin_chunk);
        }
        out
    }

    fn triangle_glb() -> Vec<u8> {
        let positions: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let normals: [[f32; 3]; 3] = [[0.0, 0.0, 1.0]; 3];
        let indices: [u16; 3] = [0, 1, 2];

        let mut bin = Vec::new();
        for v in positions.iter().chain(normals.iter()) {
            for c in v {
                bin.extend_from_slice(&c.to_le_bytes());
            }
        }
        for i in indices {
            bin.extend_from_slice(&i.to_le_bytes());
        }

        let json = r#"{
            "asset": {"version": "2.0"},
            "meshes": [{"name": "bowl", "primitives": [
                {"attributes": {"POSITION": 0, "NORMAL": 1}, "indices": 2}
            ]}],
            "accessors": [
                {"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3"},
                {"bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC3"},
                {"bufferView": 2, "componentType": 5123, "count": 3, "type": "SCALAR"}
            ],
            "bufferViews": [
                {"buffer": 0, "byteOffset": 0, "byteLength": 36},
                {"buffer": 0, "byteOffset": 36, "byteLength": 36},
                {"buffer": 0, "byteOffset": 72, "byteLength": 6}
            ],
            "buffers": [{"byteLength": 78}]
        }"#;
        build_glb(json, &bin)
    }

    #[test]
    fn parse_triangle() {
        let mesh = parse_glb(&triangle_glb()).unwrap();
        assert_eq!(mesh.name, "bowl");
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.positions[1], [1.0, 0.0, 0.0]);
        assert_eq!(mesh.normals[2], [0.0, 0.0, 1.0]);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn missing_normals_default_to_up() {
        let positions: [[f32; 3]; 3] = [[0.0; 3]; 3];
        let mut bin = Vec::new();
        for v in positions {
            for c in v {
                bin.extend_from_slice(&c.to_le_bytes());
            }
        }
        let json = r#"{
            "asset": {"version": "2.0"},
            "meshes": [{"primitives": [{"attributes": {"POSITION": 0}}]}],
            "accessors": [
                {"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3"}
            ],
            "bufferViews": [{"buffer": 0, "byteOffset": 0, "byteLength": 36}],
            "buffers": [{"byteLength": 36}]
        }"#;
        let mesh = parse_glb(&build_glb(json, &bin)).unwrap();
        assert_eq!(mesh.name, "template");
        assert_eq!(mesh.normals, vec![[0.0, 1.0, 0.0]; 3]);
        // No index accessor: trivial index list.
        assert_eq!(mesh.indices, vec![0, 1, 2]);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = triangle_glb();
        bytes[0] = b'x';
        assert!(matches!(
            parse_glb(&bytes),
            Err(AssetError::Malformed(_))
        ));
    }

    #[test]
    fn rejects_wrong_version() {
        let mut bytes = triangle_glb();
        bytes[4..8].copy_from_slice(&1u32.to_le_bytes());
        assert!(matches!(
            parse_glb(&bytes),
            Err(AssetError::Unsupported(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_indices() {
        let mut mesh_bytes = triangle_glb();
        // The container ends with 6 index bytes plus 2 bytes of padding;
        // rewrite the third index to point past the vertex range.
        let bin_start = mesh_bytes.len() - 8;
        mesh_bytes[bin_start + 4..bin_start + 6].copy_from_slice(&9u16.to_le_bytes());
        assert!(matches!(
            parse_glb(&mesh_bytes),
            Err(AssetError::Malformed(_))
        ));
    }

    #[test]
    fn asset_id_tracks_content() {
        let a = triangle_glb();
        let mut b = a.clone();
        assert_eq!(AssetId::from_bytes(&a), AssetId::from_bytes(&b));
        *b.last_mut().unwrap() ^= 0xFF;
        assert_ne!(AssetId::from_bytes(&a), AssetId::from_bytes(&b));
    }

    #[test]
    fn load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&triangle_glb()).unwrap();
        let (_, mesh) = load_template(file.path()).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_template(dir.path().join("nope.glb"));
        assert!(matches!(result, Err(AssetError::Io(_))));
    }

    #[test]
    fn spawned_handle_resolves() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&triangle_glb()).unwrap();

        let mut handle = LoadHandle::spawn(file.path().to_path_buf());
        let result = loop {
            if let Some(result) = handle.poll() {
                break result;
            }
            thread::yield_now();
        };
        assert!(result.is_ok());
        // Result is yielded exactly once.
        assert!(handle.poll().is_none());
    }

    #[test]
    fn ready_and_failed_handles() {
        let mesh = parse_glb(&triangle_glb()).unwrap();
        let mut ok = LoadHandle::ready(AssetId(1), mesh);
        assert!(matches!(ok.poll(), Some(Ok(_))));
        assert!(ok.poll().is_none());

        let mut bad = LoadHandle::failed(AssetError::MissingMesh);
        assert!(matches!(bad.poll(), Some(Err(AssetError::MissingMesh))));
        assert!(bad.poll().is_none());
    }
}
