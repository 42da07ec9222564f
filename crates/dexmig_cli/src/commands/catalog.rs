//! Catalog command implementation.

use dexmig_core::CATALOG;

/// Prints every exported section, where it lands and the target tables in
/// commit order.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    CATALOG.validate()?;

    println!("Sections:");
    for export in CATALOG.exports {
        let target = CATALOG
            .section(export.tag)
            .map_or("-", |section| section.table);
        println!(
            "  :{:<5} {:<16} {} -> {}",
            export.tag, export.label, export.source_table, target
        );
    }

    println!();
    println!("Tables (commit order):");
    for table in CATALOG.tables {
        let references: Vec<String> = table
            .foreign_keys()
            .map(|(field, target)| format!("{} -> {target}", field.name))
            .collect();
        println!("  {} ({} fields)", table.name, table.fields.len());
        if !references.is_empty() {
            println!("      {}", references.join(", "));
        }
        if let Some(policy) = &table.placeholder {
            println!(
                "      placeholders: {} = {} - missing id",
                policy.key_field, policy.offset
            );
        }
    }
    Ok(())
}
