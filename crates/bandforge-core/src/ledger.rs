use std::io::Write;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::raster::RasterGeometry;

/// Geometry summary of one processed file. Immutable once created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    file: String,
    pixel_width: f64,
    pixel_height: f64,
    raster_width: usize,
    raster_height: usize,
    crs: String,
}

impl MetadataRecord {
    pub fn new(
        file_id: impl Into<String>,
        pixel_width: f64,
        pixel_height: f64,
        raster_width: usize,
        raster_height: usize,
        crs: impl Into<String>,
    ) -> Self {
        Self {
            file: file_id.into(),
            pixel_width,
            pixel_height,
            raster_width,
            raster_height,
            crs: crs.into(),
        }
    }

    pub fn from_geometry(file_id: impl Into<String>, geometry: &RasterGeometry) -> Self {
        Self::new(
            file_id,
            geometry.pixel_width,
            geometry.pixel_height,
            geometry.raster_width,
            geometry.raster_height,
            geometry.crs.clone(),
        )
    }

    pub fn file_id(&self) -> &str {
        &self.file
    }

    pub fn pixel_width(&self) -> f64 {
        self.pixel_width
    }

    pub fn pixel_height(&self) -> f64 {
        self.pixel_height
    }

    pub fn raster_width(&self) -> usize {
        self.raster_width
    }

    pub fn raster_height(&self) -> usize {
        self.raster_height
    }

    pub fn crs(&self) -> &str {
        &self.crs
    }

    /// Render as one ledger block, including the trailing blank separator line.
    pub fn render(&self, format: LedgerFormat) -> Result<String> {
        match format {
            LedgerFormat::Text => Ok(self.render_text()),
            LedgerFormat::Toml => {
                let table = toml::to_string(&LedgerDocument {
                    record: vec![self.clone()],
                })?;
                Ok(format!("{table}\n"))
            }
        }
    }

    fn render_text(&self) -> String {
        format!(
            "File: {}\n\
             Pixel Width (meters): {}\n\
             Pixel Height (meters): {}\n\
             Raster Width (pixels): {}\n\
             Raster Height (pixels): {}\n\
             CRS: {}\n\n",
            self.file,
            self.pixel_width,
            self.pixel_height,
            self.raster_width,
            self.raster_height,
            self.crs
        )
    }
}

/// On-disk layout of the ledger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerFormat {
    /// Fixed-field human-readable blocks.
    #[default]
    Text,
    /// One `[[record]]` table per file; still a valid document after appends.
    Toml,
}

impl std::fmt::Display for LedgerFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "Text"),
            Self::Toml => write!(f, "TOML"),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct LedgerDocument {
    #[serde(default)]
    record: Vec<MetadataRecord>,
}

/// Destination for metadata records, appended in call order.
pub trait LedgerSink {
    fn append(&mut self, record: MetadataRecord) -> Result<()>;
}

/// In-memory, insertion-ordered ledger. No sorting, no deduplication.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetadataLedger {
    records: Vec<MetadataRecord>,
}

impl MetadataLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record and append it.
    pub fn record(
        &mut self,
        file_id: impl Into<String>,
        pixel_width: f64,
        pixel_height: f64,
        raster_width: usize,
        raster_height: usize,
        crs: impl Into<String>,
    ) -> &MetadataRecord {
        self.records.push(MetadataRecord::new(
            file_id,
            pixel_width,
            pixel_height,
            raster_width,
            raster_height,
            crs,
        ));
        &self.records[self.records.len() - 1]
    }

    pub fn records(&self) -> &[MetadataRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Render every record in ledger order.
    pub fn serialize(&self, format: LedgerFormat) -> Result<String> {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(&record.render(format)?);
        }
        Ok(out)
    }

    /// Append the rendered ledger to `writer`.
    pub fn write_to<W: Write>(&self, writer: W, format: LedgerFormat) -> Result<()> {
        let mut sink = LedgerWriter::new(writer, format);
        for record in &self.records {
            sink.append(record.clone())?;
        }
        Ok(())
    }

    /// Parse a ledger previously written in [`LedgerFormat::Toml`].
    pub fn from_toml(text: &str) -> Result<Self> {
        let doc: LedgerDocument = toml::from_str(text)?;
        Ok(Self {
            records: doc.record,
        })
    }
}

impl LedgerSink for MetadataLedger {
    fn append(&mut self, record: MetadataRecord) -> Result<()> {
        self.records.push(record);
        Ok(())
    }
}

/// Streams each appended record to a writer as one complete block.
pub struct LedgerWriter<W: Write> {
    writer: W,
    format: LedgerFormat,
    appended: usize,
}

impl<W: Write> LedgerWriter<W> {
    pub fn new(writer: W, format: LedgerFormat) -> Self {
        Self {
            writer,
            format,
            appended: 0,
        }
    }

    /// Number of records written through this writer.
    pub fn appended(&self) -> usize {
        self.appended
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> LedgerSink for LedgerWriter<W> {
    fn append(&mut self, record: MetadataRecord) -> Result<()> {
        let block = record.render(self.format)?;
        self.writer.write_all(block.as_bytes())?;
        self.writer.flush()?;
        self.appended += 1;
        debug!(file = record.file_id(), "Appended ledger record");
        Ok(())
    }
}
