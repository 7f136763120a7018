//! End-to-end run: discover, extract, assemble, save.

use std::path::Path;

use tracing::info;

use crate::config::MapConfig;
use crate::error::MapError;
use crate::extract::{extract_all, ExtractionReport};
use crate::map::{ColorSource, MapAssembler, MapDocument};
use crate::source::{LocalRasterSource, LocalScanOptions};

/// Everything one run produced.
#[derive(Debug)]
pub struct ZoneMapRun {
    /// Number of raster files found below the root
    pub discovered: usize,
    pub report: ExtractionReport,
    pub document: MapDocument,
}

/// Map every raster below `root` and save the page to `assembler`'s output path.
///
/// Per-file failures are logged and kept in the report. No file is written
/// when nothing was discovered or nothing could be extracted.
///
/// # Errors
/// [`MapError::NoRastersFound`] or [`MapError::EmptyInput`] for the empty
/// results, [`MapError::Discovery`] if `root` cannot be scanned, and I/O
/// errors from writing the page.
pub fn build_zone_map<P, C>(
    root: P,
    options: &LocalScanOptions,
    assembler: &mut MapAssembler<C>,
) -> Result<ZoneMapRun, MapError>
where
    P: AsRef<Path>,
    C: ColorSource,
{
    let source = LocalRasterSource::scan(root, options)
        .map_err(|e| MapError::Discovery(e.to_string()))?;
    let discovered = source.len();
    info!(count = discovered, "Found TIF files");
    if source.is_empty() {
        return Err(MapError::NoRastersFound);
    }

    let report = extract_all(source.into_files());
    let output = assembler.config().output_path.clone();
    let document = assembler.assemble(&report.records, &output)?;

    Ok(ZoneMapRun {
        discovered,
        report,
        document,
    })
}

/// [`build_zone_map`] with default discovery, random colors and `config`.
///
/// # Errors
/// See [`build_zone_map`].
pub fn run<P: AsRef<Path>>(root: P, config: MapConfig) -> Result<ZoneMapRun, MapError> {
    let mut assembler = MapAssembler::new(config);
    build_zone_map(root, &LocalScanOptions::default(), &mut assembler)
}
