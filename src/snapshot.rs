//! Binary bucket snapshots — the crash-recovery safety net.
//!
//! Written once per run, immediately before the tabular export, one file per
//! in-memory bucket (`exact`, `no_results`, `had_result`). The program never
//! reads them back; they exist for manual recovery if the export step dies.
//! The format ends with a 4-byte CRC32 checksum (IEEE) of all preceding
//! bytes, allowing integrity verification on load.

use crate::buckets::ResultRecord;
use anyhow::{bail, Context, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::collections::BTreeSet;
use std::io::{Cursor, Read, Write};
use std::path::Path;

/// File magic: "AHSN" (acroharvest snapshot).
const MAGIC: u32 = u32::from_le_bytes(*b"AHSN");
const FORMAT_VERSION: u16 = 1;

/// Which bucket a snapshot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SnapshotKind {
    Exact = 0,
    NoResults = 1,
    HadResult = 2,
}

impl SnapshotKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Exact => "snapshot_exact.bin",
            Self::NoResults => "snapshot_no_results.bin",
            Self::HadResult => "snapshot_had_result.bin",
        }
    }

    fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Exact),
            1 => Some(Self::NoResults),
            2 => Some(Self::HadResult),
            _ => None,
        }
    }
}

/// Parsed snapshot contents, used by tests and recovery tooling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotContent {
    Records(Vec<ResultRecord>),
    Set(Vec<String>),
}

/// Compute CRC32 (IEEE/ISO 3309) checksum of data.
pub(crate) fn crc32(data: &[u8]) -> u32 {
    let mut crc: u32 = 0xFFFF_FFFF;
    for &byte in data {
        let index = ((crc ^ byte as u32) & 0xFF) as usize;
        crc = CRC32_TABLE[index] ^ (crc >> 8);
    }
    crc ^ 0xFFFF_FFFF
}

/// CRC32 lookup table (IEEE polynomial 0xEDB88320).
const CRC32_TABLE: [u32; 256] = {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u32;
        let mut j = 0;
        while j < 8 {
            if crc & 1 != 0 {
                crc = 0xEDB8_8320 ^ (crc >> 1);
            } else {
                crc >>= 1;
            }
            j += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
};

fn write_header<W: Write>(w: &mut W, kind: SnapshotKind, count: u32) -> std::io::Result<()> {
    w.write_u32::<LittleEndian>(MAGIC)?;
    w.write_u16::<LittleEndian>(FORMAT_VERSION)?;
    w.write_u8(kind as u8)?;
    w.write_u64::<LittleEndian>(chrono::Utc::now().timestamp().max(0) as u64)?;
    w.write_u32::<LittleEndian>(count)?;
    Ok(())
}

fn write_str<W: Write>(w: &mut W, s: &str) -> std::io::Result<()> {
    w.write_u32::<LittleEndian>(s.len() as u32)?;
    w.write_all(s.as_bytes())?;
    Ok(())
}

fn finish(path: &Path, mut buf: Vec<u8>) -> Result<()> {
    let checksum = crc32(&buf);
    buf.write_u32::<LittleEndian>(checksum)
        .context("checksum write to Vec should not fail")?;
    std::fs::write(path, &buf)
        .with_context(|| format!("failed to write snapshot: {}", path.display()))?;
    Ok(())
}

/// Snapshot a record bucket (`exact` or `had_result`).
pub fn write_records(dir: &Path, kind: SnapshotKind, records: &[ResultRecord]) -> Result<()> {
    let mut buf = Vec::new();
    write_header(&mut buf, kind, records.len() as u32)?;
    for r in records {
        write_str(&mut buf, &r.candidate)?;
        write_str(&mut buf, &r.expansion)?;
        write_str(&mut buf, &r.definition)?;
    }
    finish(&dir.join(kind.file_name()), buf)
}

/// Snapshot a candidate set (`no_results`). Iteration order of the
/// `BTreeSet` keeps the file deterministic.
pub fn write_set(dir: &Path, kind: SnapshotKind, set: &BTreeSet<String>) -> Result<()> {
    let mut buf = Vec::new();
    write_header(&mut buf, kind, set.len() as u32)?;
    for s in set {
        write_str(&mut buf, s)?;
    }
    finish(&dir.join(kind.file_name()), buf)
}

fn read_str(cur: &mut Cursor<&[u8]>) -> Result<String> {
    let len = cur.read_u32::<LittleEndian>()? as usize;
    if len > 1 << 24 {
        bail!("snapshot string length {len} is implausible");
    }
    let mut bytes = vec![0u8; len];
    cur.read_exact(&mut bytes)?;
    String::from_utf8(bytes).context("snapshot string is not UTF-8")
}

/// Read and verify a snapshot file. Not called by the harvest run itself;
/// used for integrity checks and manual recovery.
pub fn read(path: &Path) -> Result<(SnapshotKind, SnapshotContent)> {
    let data =
        std::fs::read(path).with_context(|| format!("failed to read snapshot: {}", path.display()))?;
    if data.len() < 4 {
        bail!("snapshot file too short");
    }
    let (body, trailer) = data.split_at(data.len() - 4);
    let stored = u32::from_le_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
    if crc32(body) != stored {
        bail!("snapshot checksum mismatch: {}", path.display());
    }

    let mut cur = Cursor::new(body);
    if cur.read_u32::<LittleEndian>()? != MAGIC {
        bail!("bad snapshot magic");
    }
    let version = cur.read_u16::<LittleEndian>()?;
    if version != FORMAT_VERSION {
        bail!("unsupported snapshot version {version}");
    }
    let kind = SnapshotKind::from_u8(cur.read_u8()?)
        .context("unknown snapshot bucket kind")?;
    let _written_at = cur.read_u64::<LittleEndian>()?;
    let count = cur.read_u32::<LittleEndian>()? as usize;

    let content = match kind {
        SnapshotKind::NoResults => {
            let mut set = Vec::with_capacity(count);
            for _ in 0..count {
                set.push(read_str(&mut cur)?);
            }
            SnapshotContent::Set(set)
        }
        SnapshotKind::Exact | SnapshotKind::HadResult => {
            let mut records = Vec::with_capacity(count);
            for _ in 0..count {
                records.push(ResultRecord {
                    candidate: read_str(&mut cur)?,
                    expansion: read_str(&mut cur)?,
                    definition: read_str(&mut cur)?,
                });
            }
            SnapshotContent::Records(records)
        }
    };

    Ok((kind, content))
}
