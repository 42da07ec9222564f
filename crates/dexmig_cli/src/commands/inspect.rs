//! Inspect command implementation.

use dexmig_codec::glyph;
use dexmig_core::{format_size, CATALOG};
use dexmig_storage::Compression;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::io::{BufRead, Read};
use std::path::Path;

/// Interchange file summary.
#[derive(Debug, Default, Serialize)]
pub struct InspectResult {
    /// File path.
    pub path: String,
    /// Size on disk in bytes.
    pub size: u64,
    /// `gzip` or `none`.
    pub compression: String,
    /// SHA-256 of the bytes on disk.
    pub sha256: String,
    /// Header comment lines.
    pub header: Vec<String>,
    /// Total lines after decompression.
    pub lines: usize,
    /// Sections in file order.
    pub sections: Vec<SectionStats>,
    /// Data lines before the first section header.
    pub orphan_lines: usize,
}

/// Statistics for a single section.
#[derive(Debug, Serialize)]
pub struct SectionStats {
    /// Section tag.
    pub tag: String,
    /// Target table, if the tag is declared.
    pub table: Option<String>,
    /// 1-based line of the header.
    pub line: usize,
    /// Data lines in the section.
    pub records: usize,
}

/// Runs the inspect command.
pub fn run(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("No migration file found at {}", path.display()).into());
    }

    let mut result = summarize(dexmig_storage::open(path)?)?;
    result.path = path.display().to_string();
    result.size = std::fs::metadata(path)?.len();
    result.compression = Compression::detect(path)?.name().to_string();
    result.sha256 = digest(std::fs::File::open(path)?)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        _ => print_text_output(&result),
    }
    Ok(())
}

fn summarize<R: BufRead>(input: R) -> Result<InspectResult, Box<dyn std::error::Error>> {
    let mut result = InspectResult::default();

    for (index, line) in input.lines().enumerate() {
        let line = line?;
        result.lines += 1;

        if line.starts_with(glyph::COMMENT_MARKER) {
            if result.sections.is_empty() {
                result.header.push(line);
            }
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }
        if let Some(tag) = line.strip_prefix(glyph::SECTION_MARKER) {
            result.sections.push(SectionStats {
                tag: tag.to_string(),
                table: CATALOG.section(tag).map(|s| s.table.to_string()),
                line: index + 1,
                records: 0,
            });
            continue;
        }
        match result.sections.last_mut() {
            Some(section) => section.records += 1,
            None => result.orphan_lines += 1,
        }
    }
    Ok(result)
}

fn digest<R: Read>(mut input: R) -> std::io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = input.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

fn print_text_output(result: &InspectResult) {
    println!("dexmig Migration File Inspection");
    println!("================================");
    println!();
    println!("Path:        {}", result.path);
    println!("Size:        {}", format_size(result.size));
    println!("Compression: {}", result.compression);
    println!("SHA-256:     {}", result.sha256);
    println!();
    for line in &result.header {
        println!("  {line}");
    }
    println!();
    println!("Sections ({} lines):", result.lines);
    for section in &result.sections {
        let table = section.table.as_deref().unwrap_or("UNKNOWN");
        println!(
            "  [{}] line {}: {} records -> {}",
            section.tag, section.line, section.records, table
        );
    }
    if result.orphan_lines > 0 {
        println!();
        println!("Warning: {} data lines before the first section", result.orphan_lines);
    }
}
