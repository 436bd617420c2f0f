use anyhow::{Context, Result, bail};
use assetembed::verify;

use crate::cli::VerifyArgs;

/// Compare a generated file with the directory it was generated from
///
/// Prints `PASS` with the comparison count, or `FAIL` followed by one line
/// per file. Exits with an error when anything differs.
pub fn handle_verify(args: VerifyArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.generated)
        .with_context(|| format!("Failed to read generated file: {}", args.generated.display()))?;

    let parsed = verify::parse_generated(&text)
        .with_context(|| format!("Failed to parse generated file: {}", args.generated.display()))?;
    log::debug!(
        "{} uses {} encoding with {} entries",
        args.generated.display(),
        parsed.encoding,
        parsed.entries.len()
    );

    let assets = assetembed::find_assets(&args.directory)
        .with_context(|| format!("Failed to load assets from {}", args.directory.display()))?;

    let report = verify::compare(parsed, assets)?;
    let total = report.comparisons.len();

    if !args.quiet {
        if report.passed() {
            println!("PASS\t{total} comparisons");
        } else {
            println!("FAIL");
            for comparison in &report.comparisons {
                println!("{comparison}");
            }
        }
    }

    if !report.passed() {
        bail!("{} of {total} comparisons failed", report.failures().count());
    }
    Ok(())
}
