use bandforge_core::error::BandforgeError;
use std::io::Write;
use std::process::Command;

use bandforge_core::io::ledger_file::LedgerFile;
use bandforge_core::ledger::{
    LedgerFormat, LedgerSink, LedgerWriter, MetadataLedger, MetadataRecord,
};

/// Writer that accepts `capacity` bytes and then fails like a full disk.
struct FullDisk {
    written: Vec<u8>,
    capacity: usize,
}

impl Write for FullDisk {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let room = self.capacity - self.written.len();
        if room == 0 {
            return Err(std::io::Error::other("no space left on device"));
        }
        let n = room.min(buf.len());
        self.written.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn sample_ledger() -> MetadataLedger {
    let mut ledger = MetadataLedger::new();
    ledger.record("tile_a", 3.0, 3.0, 100, 200, "EPSG:32633");
    ledger.record("tile_b", 10.0, 10.5, 64, 32, "EPSG:4326");
    ledger
}

const EXPECTED_TEXT: &str = "\
File: tile_a
Pixel Width (meters): 3
Pixel Height (meters): 3
Raster Width (pixels): 100
Raster Height (pixels): 200
CRS: EPSG:32633

File: tile_b
Pixel Width (meters): 10
Pixel Height (meters): 10.5
Raster Width (pixels): 64
Raster Height (pixels): 32
CRS: EPSG:4326

";

#[test]
fn test_record_keeps_call_order() {
    let ledger = sample_ledger();
    let ids: Vec<&str> = ledger.records().iter().map(|r| r.file_id()).collect();
    assert_eq!(ids, vec!["tile_a", "tile_b"]);
    assert_eq!(ledger.len(), 2);
}

#[test]
fn test_no_deduplication() {
    let mut ledger = MetadataLedger::new();
    ledger.record("same", 1.0, 1.0, 1, 1, "EPSG:1");
    ledger.record("same", 1.0, 1.0, 1, 1, "EPSG:1");
    assert_eq!(ledger.len(), 2);
}

#[test]
fn test_record_fields() {
    let mut ledger = MetadataLedger::new();
    let record = ledger.record("f", 2.5, 4.0, 7, 9, "EPSG:3857").clone();
    assert_eq!(record.file_id(), "f");
    assert_eq!(record.pixel_width(), 2.5);
    assert_eq!(record.pixel_height(), 4.0);
    assert_eq!(record.raster_width(), 7);
    assert_eq!(record.raster_height(), 9);
    assert_eq!(record.crs(), "EPSG:3857");
}

#[test]
fn test_serialize_text_layout() {
    let ledger = sample_ledger();
    assert_eq!(ledger.serialize(LedgerFormat::Text).unwrap(), EXPECTED_TEXT);
}

#[test]
fn test_serialize_empty_ledger() {
    let empty = MetadataLedger::new();
    assert_eq!(empty.serialize(LedgerFormat::Text).unwrap(), "");
}

#[test]
fn test_writer_matches_serialize() {
    let ledger = sample_ledger();
    let mut buf = Vec::new();
    ledger.write_to(&mut buf, LedgerFormat::Text).unwrap();
    assert_eq!(String::from_utf8(buf).unwrap(), EXPECTED_TEXT);
}

#[test]
fn test_writer_counts_appends() {
    let mut writer = LedgerWriter::new(Vec::new(), LedgerFormat::Text);
    writer
        .append(MetadataRecord::new("x", 1.0, 1.0, 1, 1, "EPSG:1"))
        .unwrap();
    assert_eq!(writer.appended(), 1);
    assert!(!writer.into_inner().is_empty());
}

#[test]
fn test_toml_format_round_trip() {
    let ledger = sample_ledger();
    let text = ledger.serialize(LedgerFormat::Toml).unwrap();
    assert_eq!(text.matches("[[record]]").count(), 2);
    let parsed = MetadataLedger::from_toml(&text).unwrap();
    assert_eq!(parsed, ledger);
}

// ---------------------------------------------------------------------------
// LedgerFile
// ---------------------------------------------------------------------------

#[test]
fn test_ledger_file_appends_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("metadata.txt");

    for run in 0..2 {
        let mut file = LedgerFile::open(&path, LedgerFormat::Text).unwrap();
        file.append(MetadataRecord::new(
            format!("run_{run}"),
            3.0,
            3.0,
            10,
            10,
            "EPSG:32633",
        ))
        .unwrap();
        assert_eq!(file.appended(), 1);
    }

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("File: run_0"));
    assert!(text.contains("File: run_1"));
    assert!(text.find("run_0").unwrap() < text.find("run_1").unwrap());
}

#[test]
fn test_writer_failure_is_not_counted() {
    let mut writer = LedgerWriter::new(
        FullDisk {
            written: Vec::new(),
            capacity: 16,
        },
        LedgerFormat::Text,
    );
    let result = writer.append(MetadataRecord::new("x", 1.0, 1.0, 1, 1, "EPSG:1"));
    assert!(matches!(result, Err(BandforgeError::Io(_))));
    assert_eq!(writer.appended(), 0);
}

#[test]
fn test_ledger_file_single_writer() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("metadata.txt");

    let first = LedgerFile::open(&path, LedgerFormat::Text).unwrap();
    assert!(matches!(
        LedgerFile::open(&path, LedgerFormat::Text),
        Err(BandforgeError::LedgerLocked(_))
    ));

    drop(first);
    assert!(LedgerFile::open(&path, LedgerFormat::Text).is_ok());
    let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(leftovers.len(), 1);
}

const HOLD_LEDGER_ENV: &str = "BANDFORGE_TEST_HOLD_LEDGER";

#[test]
fn test_ledger_lock_released_when_holder_exits() {
    // Child mode: take the lock, then exit without running any destructor.
    if let Ok(held) = std::env::var(HOLD_LEDGER_ENV) {
        let ledger = LedgerFile::open(held, LedgerFormat::Text).unwrap();
        std::mem::forget(ledger);
        std::process::exit(3);
    }

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("metadata.txt");

    let status = Command::new(std::env::current_exe().unwrap())
        .args([
            "test_ledger_lock_released_when_holder_exits",
            "--exact",
            "--nocapture",
        ])
        .env(HOLD_LEDGER_ENV, &path)
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(3));
    assert!(path.exists());

    let mut reopened = LedgerFile::open(&path, LedgerFormat::Text).unwrap();
    reopened
        .append(MetadataRecord::new("after", 1.0, 1.0, 1, 1, "EPSG:1"))
        .unwrap();
}

#[test]
fn test_ledger_file_toml_stays_parseable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.toml");

    for id in ["a", "b"] {
        let mut file = LedgerFile::open(&path, LedgerFormat::Toml).unwrap();
        file.append(MetadataRecord::new(id, 1.0, 1.0, 2, 2, "EPSG:4326"))
            .unwrap();
    }

    let parsed = MetadataLedger::from_toml(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let ids: Vec<&str> = parsed.records().iter().map(|r| r.file_id()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}
