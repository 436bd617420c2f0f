use anyhow::{Context, Result};
use std::io::Write;

use crate::cli::{GenerateArgs, GenerateSettings};

/// Walk the directory, embed it, and write the generated file
///
/// The file is rendered in memory first and only written once rendering
/// succeeded, so a failed run never leaves a truncated file behind.
pub fn handle_generate(args: GenerateArgs) -> Result<()> {
    let settings = args.resolve()?;
    let rendered = render(&settings)?;

    if settings.to_stdout() {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(&rendered)
            .and_then(|()| stdout.flush())
            .context("Failed to write generated file to stdout")?;
        return Ok(());
    }

    std::fs::write(&settings.output, &rendered)
        .with_context(|| format!("Failed to write generated file: {}", settings.output.display()))?;

    println!(
        "Wrote {} ({} bytes, {} encoding)",
        settings.output.display(),
        rendered.len(),
        settings.options.encoding
    );
    Ok(())
}

/// Produce the generated file contents for `settings`
pub fn render(settings: &GenerateSettings) -> Result<Vec<u8>> {
    let assets = assetembed::find_assets(&settings.directory).with_context(|| {
        format!("Failed to load assets from {}", settings.directory.display())
    })?;
    let count = assets.len();

    log::info!(
        "Embedding {count} files from {} ({} encoding, {})",
        settings.directory.display(),
        settings.options.encoding,
        if settings.options.concurrent {
            format!("{} workers", settings.options.workers)
        } else {
            "sequential".to_string()
        }
    );

    let mut rendered = Vec::new();
    let written = settings
        .options
        .embedder()
        .embed(&mut rendered, assets, &settings.package, &settings.function)
        .context("Failed to embed assets")?;

    log::debug!("rendered {written} bytes for {count} assets");
    Ok(rendered)
}
