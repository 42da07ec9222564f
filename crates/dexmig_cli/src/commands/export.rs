//! Export command implementation.

use dexmig_core::{export_to_path, format_size, TracingProgress, CATALOG};
use dexmig_storage::{Compression, InMemoryRepository};
use std::path::Path;
use tracing::info;

/// Exports the snapshot at `source` to the interchange file `out`.
pub fn run(source: &Path, out: &Path) -> Result<(), Box<dyn std::error::Error>> {
    info!("Exporting {:?}", source);
    CATALOG.validate()?;

    let repo = InMemoryRepository::load_json(source)?;
    let compression = Compression::from_path(out);
    let report = export_to_path(&repo, &CATALOG, out, compression, &mut TracingProgress)?;

    println!("✓ Export complete");
    println!("  Path: {}", out.display());
    println!("  Compression: {}", compression.name());
    println!("  Size: {}", format_size(report.bytes));
    for section in &report.sections {
        println!(
            "  [{}] {} {} records",
            section.tag, section.written, section.label
        );
        if section.excluded > 0 {
            println!("      {} excluded without id", section.excluded);
        }
    }
    println!("  Elapsed: {:.3}s", report.elapsed.as_secs_f64());

    Ok(())
}
