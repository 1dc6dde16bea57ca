use anyhow::{anyhow, Context};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::model::StudentRecord;

const MANIFEST_ENTRY: &str = "manifest.json";
const STUDENTS_ENTRY: &str = "students.json";
pub const BUNDLE_FORMAT_V1: &str = "students-bundle-v1";

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub bundle_format: String,
    pub student_count: usize,
}

#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub bundle_format_detected: String,
    pub students: Vec<StudentRecord>,
}

pub fn export_students_bundle(
    students: &[StudentRecord],
    out_path: &Path,
) -> anyhow::Result<ExportSummary> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.to_string_lossy()))?;
    }

    let out_file = File::create(out_path).with_context(|| {
        format!(
            "failed to create output file {}",
            out_path.to_string_lossy()
        )
    })?;
    let mut zip = ZipWriter::new(out_file);
    let opts = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let payload =
        serde_json::to_vec_pretty(students).context("failed to serialize student list")?;
    let exported_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let manifest = json!({
        "format": BUNDLE_FORMAT_V1,
        "version": 1,
        "appVersion": env!("CARGO_PKG_VERSION"),
        "exportedAt": exported_at,
        "bundleId": Uuid::new_v4().to_string(),
        "studentCount": students.len(),
        "sha256": hex_digest(&payload),
    });

    zip.start_file(MANIFEST_ENTRY, opts)
        .context("failed to start manifest entry")?;
    zip.write_all(
        serde_json::to_string_pretty(&manifest)
            .context("failed to serialize manifest")?
            .as_bytes(),
    )
    .context("failed to write manifest entry")?;

    zip.start_file(STUDENTS_ENTRY, opts)
        .context("failed to start students entry")?;
    zip.write_all(&payload)
        .context("failed to write students entry")?;

    zip.finish().context("failed to finalize zip bundle")?;

    Ok(ExportSummary {
        bundle_format: BUNDLE_FORMAT_V1.to_string(),
        student_count: students.len(),
    })
}

/// Reads and verifies a bundle. Nothing is applied here; the caller swaps
/// the verified list into the store, so a bad bundle leaves it untouched.
pub fn import_students_bundle(in_path: &Path) -> anyhow::Result<ImportSummary> {
    let in_file = File::open(in_path)
        .with_context(|| format!("failed to open bundle {}", in_path.to_string_lossy()))?;
    let mut archive = ZipArchive::new(in_file).context("invalid zip archive")?;

    let mut manifest_text = String::new();
    archive
        .by_name(MANIFEST_ENTRY)
        .context("bundle missing manifest.json")?
        .read_to_string(&mut manifest_text)
        .context("failed to read manifest.json")?;
    let manifest: serde_json::Value =
        serde_json::from_str(&manifest_text).context("manifest.json is invalid JSON")?;
    let format = manifest
        .get("format")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    if format != BUNDLE_FORMAT_V1 {
        return Err(anyhow!("unsupported bundle format: {}", format));
    }

    let mut payload = Vec::new();
    archive
        .by_name(STUDENTS_ENTRY)
        .context("bundle missing students.json")?
        .read_to_end(&mut payload)
        .context("failed to read students.json")?;

    if let Some(expected) = manifest.get("sha256").and_then(|v| v.as_str()) {
        let actual = hex_digest(&payload);
        if actual != expected {
            return Err(anyhow!("students.json checksum mismatch"));
        }
    }

    let students: Vec<StudentRecord> =
        serde_json::from_slice(&payload).context("students.json is not a valid record list")?;

    Ok(ImportSummary {
        bundle_format_detected: BUNDLE_FORMAT_V1.to_string(),
        students,
    })
}

fn hex_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}
