//! On-disk layout of the example index.
//!
//! The vector file is a flat little-endian dump:
//!
//! ```text
//! magic      8 bytes  b"SQLFIDX1"
//! dimension  u32
//! count      u64
//! vectors    count * dimension * f32
//! ```
//!
//! Metadata is a JSON array of [`Example`] records in the same row order.

use std::fs;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;

use crate::errors::FeedbackError;
use crate::errors::Result;
use crate::models::Example;

pub const INDEX_MAGIC: &[u8; 8] = b"SQLFIDX1";
const HEADER_LEN: usize = 8 + 4 + 8;
const F32_LEN: usize = std::mem::size_of::<f32>();

/// Read a vector index file, returning its dimension and flat row-major data
pub fn read_index(path: &Path) -> Result<(usize, Vec<f32>)> {
    let bytes = fs::read(path)?;
    decode_index(&bytes)
}

pub fn decode_index(bytes: &[u8]) -> Result<(usize, Vec<f32>)> {
    if bytes.len() < HEADER_LEN {
        return Err(FeedbackError::IndexCorruption(format!(
            "index file is {} bytes, shorter than its header",
            bytes.len()
        )));
    }
    let (header, body) = bytes.split_at(HEADER_LEN);
    if &header[..8] != INDEX_MAGIC {
        return Err(FeedbackError::IndexCorruption(
            "index file has an unrecognised magic header".to_string(),
        ));
    }

    let dimension = u32::from_le_bytes([header[8], header[9], header[10], header[11]]) as usize;
    let mut count_bytes = [0u8; 8];
    count_bytes.copy_from_slice(&header[12..20]);
    let count = usize::try_from(u64::from_le_bytes(count_bytes)).map_err(|_| {
        FeedbackError::IndexCorruption("index row count does not fit in memory".to_string())
    })?;

    if dimension == 0 {
        return Err(FeedbackError::IndexCorruption(
            "index dimension is zero".to_string(),
        ));
    }

    let expected_len = count
        .checked_mul(dimension)
        .and_then(|n| n.checked_mul(F32_LEN))
        .ok_or_else(|| FeedbackError::IndexCorruption("index size overflows".to_string()))?;
    if body.len() != expected_len {
        return Err(FeedbackError::IndexCorruption(format!(
            "index declares {count} x {dimension} vectors ({expected_len} bytes) but holds {} bytes",
            body.len()
        )));
    }

    let mut vectors = Vec::with_capacity(count * dimension);
    for chunk in body.chunks_exact(F32_LEN) {
        let value = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        if !value.is_finite() {
            return Err(FeedbackError::IndexCorruption(
                "index contains non-finite values".to_string(),
            ));
        }
        vectors.push(value);
    }

    Ok((dimension, vectors))
}

pub fn encode_index(dimension: usize, vectors: &[f32]) -> Result<Vec<u8>> {
    let dim = u32::try_from(dimension).map_err(|_| {
        FeedbackError::InvalidArgument(format!("dimension {dimension} does not fit in u32"))
    })?;
    if dimension == 0 || vectors.len() % dimension != 0 {
        return Err(FeedbackError::InvalidArgument(format!(
            "{} floats do not divide into rows of dimension {dimension}",
            vectors.len()
        )));
    }
    let count = (vectors.len() / dimension) as u64;

    let mut bytes = Vec::with_capacity(HEADER_LEN + vectors.len() * F32_LEN);
    bytes.extend_from_slice(INDEX_MAGIC);
    bytes.extend_from_slice(&dim.to_le_bytes());
    bytes.extend_from_slice(&count.to_le_bytes());
    for value in vectors {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    Ok(bytes)
}

pub fn write_index(path: &Path, dimension: usize, vectors: &[f32]) -> Result<()> {
    let bytes = encode_index(dimension, vectors)?;
    ensure_parent(path)?;
    fs::write(path, bytes)?;
    Ok(())
}

pub fn read_metadata(path: &Path) -> Result<Vec<Example>> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| {
        FeedbackError::IndexCorruption(format!(
            "metadata file {} is not a JSON array of examples: {e}",
            path.display()
        ))
    })
}

pub fn write_metadata(path: &Path, examples: &[Example]) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = BufWriter::new(fs::File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, examples)?;
    writer.flush()?;
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
