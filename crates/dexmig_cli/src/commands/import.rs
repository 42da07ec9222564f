//! Import command implementation.
//!
//! The target snapshot is cleared before the file is loaded, so the command
//! asks for confirmation unless `--yes` is given. The snapshot is saved even
//! when the run fails, because tables committed before the failure are kept.

use dexmig_core::{clear_target, Config, Importer, TracingProgress, CATALOG};
use dexmig_storage::InMemoryRepository;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::info;

/// Arguments of the import command.
#[derive(Debug)]
pub struct ImportArgs {
    /// Target snapshot.
    pub target: PathBuf,
    /// Interchange file.
    pub file: PathBuf,
    /// Skip the confirmation prompt.
    pub yes: bool,
    /// Enable row-by-row fallback.
    pub row_fallback: bool,
    /// Audit log directory.
    pub log_dir: PathBuf,
}

/// Runs the import command.
pub fn run(args: &ImportArgs) -> Result<(), Box<dyn std::error::Error>> {
    if !args.file.exists() {
        return Err(format!("Migration file not found: {}", args.file.display()).into());
    }

    let config = Config::default().row_fallback(args.row_fallback);
    let importer = Importer::new(&CATALOG, &config)?;

    if !args.yes {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        if !confirm(&mut stdin.lock(), &mut stdout)? {
            println!("Migration canceled.");
            return Ok(());
        }
    }

    let mut repo = open_target(&args.target)?;
    clear_target(&mut repo, &CATALOG)?;
    info!("Importing {:?} into {:?}", args.file, args.target);

    let outcome = importer.run(&mut repo, &args.file, &args.log_dir, &mut TracingProgress);
    repo.save_json(&args.target)?;
    let report = outcome?;

    println!("✓ Import complete");
    println!("  Target: {}", args.target.display());
    println!("  Lines read: {}", report.lines_read);
    for table in &report.tables {
        println!("  {}", table.summary_line());
    }
    println!("  Placeholders created: {}", report.placeholders_created);
    println!("  Logs: {}", args.log_dir.display());
    println!("  Elapsed: {:.3}s", report.elapsed.as_secs_f64());

    Ok(())
}

fn open_target(path: &std::path::Path) -> Result<InMemoryRepository, Box<dyn std::error::Error>> {
    let repo = if path.exists() {
        InMemoryRepository::load_json(path)?
    } else {
        InMemoryRepository::new()
    };
    Ok(repo.with_unique("player", "discord_id"))
}

/// Asks whether to clear the target and proceed.
///
/// Only `proceed` continues; `cancel`, anything else and end of input stop.
fn confirm<I: BufRead, O: Write>(input: &mut I, output: &mut O) -> io::Result<bool> {
    writeln!(
        output,
        "This will DELETE every row of the target tables and replace them with the migration file."
    )?;
    write!(output, "Type 'proceed' to continue or 'cancel' to abort: ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("proceed"))
}
