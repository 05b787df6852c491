//! Steps shared by `inspect` and `place`: configuration lookup, input
//! loading and diagnostic rendering.

use std::path::{Path, PathBuf};

use bddlay_config::{BddlayConfig, CONFIG_FILE_NAME};
use bddlay_diagnostics::{Diagnostic, DiagnosticRenderer, DiagnosticSink, Severity, TerminalRenderer};
use bddlay_netlist::{Netlist, Structure};
use bddlay_source::SourceText;
use log::debug;

use crate::GlobalArgs;

/// A parsed and built input document.
pub struct LoadedInput {
    /// The document text.
    pub source: SourceText,
    /// Layers and control sequence.
    pub structure: Structure,
    /// The built netlist.
    pub netlist: Netlist,
}

/// Finds the configuration file to use, if any.
///
/// `--config` wins; otherwise `bddlay.toml` next to the input, then in the
/// current directory.
pub fn find_config(global: &GlobalArgs, input: &Path) -> Option<PathBuf> {
    if let Some(path) = &global.config {
        return Some(path.clone());
    }
    let beside_input = input
        .parent()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|p| p.is_file());
    beside_input.or_else(|| {
        let cwd = PathBuf::from(CONFIG_FILE_NAME);
        cwd.is_file().then_some(cwd)
    })
}

/// Loads the configuration for a run, falling back to defaults when no file
/// is found.
pub fn resolve_config(
    global: &GlobalArgs,
    input: &Path,
) -> Result<BddlayConfig, Box<dyn std::error::Error>> {
    match find_config(global, input) {
        Some(path) => {
            debug!("loading configuration from {}", path.display());
            let config = bddlay_config::load_config_file(&path)
                .map_err(|e| format!("{}: {e}", path.display()))?;
            Ok(config)
        }
        None => {
            debug!("no {CONFIG_FILE_NAME} found, using defaults");
            Ok(BddlayConfig::default())
        }
    }
}

/// Reads, parses, builds and validates the input.
///
/// Returns `Ok(None)` after rendering the error when the document is
/// malformed.
pub fn load_input(
    path: &Path,
    sink: &DiagnosticSink,
    global: &GlobalArgs,
) -> Result<Option<LoadedInput>, Box<dyn std::error::Error>> {
    let source =
        SourceText::load(path).map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    debug!(
        "read {} ({} lines, hash {})",
        path.display(),
        source.line_count(),
        source.content_hash.short()
    );

    match bddlay_netlist::load_netlist(&source, sink) {
        Ok((structure, netlist)) => Ok(Some(LoadedInput {
            source,
            structure,
            netlist,
        })),
        Err(e) => {
            sink.emit(e.to_diagnostic());
            render_diagnostics(&sink.take_all(), &source, global);
            Ok(None)
        }
    }
}

/// Prints diagnostics to stderr. Notes and warnings are suppressed by
/// `--quiet`.
pub fn render_diagnostics(diagnostics: &[Diagnostic], source: &SourceText, global: &GlobalArgs) {
    let renderer = TerminalRenderer::new(global.color);
    for diag in diagnostics {
        if global.quiet && diag.severity != Severity::Error {
            continue;
        }
        eprintln!("{}", renderer.render(diag, source));
    }
}

/// Writes `text` to `output`, or to stdout when no path is given.
pub fn emit(text: &str, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => {
            std::fs::write(path, text).map_err(|e| format!("cannot write {}: {e}", path.display()))?;
            debug!("wrote {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}
