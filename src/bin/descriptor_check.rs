// Descriptor Check
// Parses panel descriptors and reports entries the builder would skip
// Usage: descriptor-check <file>... ; exits non-zero when any file fails or skips entries

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use quick_settings::descriptor::{CallbackScope, PanelDescriptor};
use quick_settings::{Capabilities, Panel};

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let paths: Vec<PathBuf> = std::env::args().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        bail!("usage: descriptor-check <descriptor>...");
    }

    let mut failures = 0;
    for path in &paths {
        match check(path) {
            Ok(true) => {}
            Ok(false) => failures += 1,
            Err(e) => {
                error!(path = %path.display(), "{:#}", e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} descriptors had problems", failures, paths.len());
    }
    Ok(())
}

/// True when every entry was added
fn check(path: &Path) -> Result<bool> {
    let source = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let descriptor = source.parse::<PanelDescriptor>().with_context(|| format!("Failed to parse {}", path.display()))?;

    // No host callbacks exist here; named callbacks are reported as unresolved
    let scope = CallbackScope::new();
    let mut panel = Panel::create(descriptor.x, descriptor.y, descriptor.title.as_deref())
        .with_capabilities(Capabilities::all());
    let report = descriptor.apply(&mut panel, &scope)?;

    for skipped in &report.skipped {
        warn!(path = %path.display(), "skipped: {}", skipped);
    }
    info!(
        path = %path.display(),
        title = %panel.title(),
        controls = panel.controls().len(),
        skipped = report.skipped.len(),
        "checked"
    );
    Ok(report.is_clean())
}
