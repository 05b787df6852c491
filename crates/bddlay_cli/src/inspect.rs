//! `bddlay inspect`: parse, build and validate a description, then print
//! netlist statistics and diagnostics.

use bddlay_diagnostics::{Diagnostic, DiagnosticSink, Severity};
use bddlay_netlist::{NetlistStats, Transistor};
use serde::Serialize;

use crate::pipeline::{emit, load_input, render_diagnostics, LoadedInput};
use crate::{GlobalArgs, InspectArgs, ReportFormat};

/// JSON shape of an inspection.
#[derive(Serialize)]
struct Inspection<'a> {
    input: String,
    input_hash: String,
    layers: usize,
    control: Vec<Option<String>>,
    stats: NetlistStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    transistors: Option<&'a [Transistor]>,
    diagnostics: &'a [Diagnostic],
}

/// Runs `bddlay inspect`. Returns 1 if the input is malformed or any error
/// diagnostic was emitted.
pub fn run(args: &InspectArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let sink = DiagnosticSink::new();
    let Some(loaded) = load_input(&args.file, &sink, global)? else {
        return Ok(1);
    };
    let diagnostics = sink.take_all();
    let has_errors = diagnostics.iter().any(|d| d.severity == Severity::Error);

    let text = match args.format {
        ReportFormat::Text => {
            render_diagnostics(&diagnostics, &loaded.source, global);
            render_text(&loaded, args.transistors)
        }
        ReportFormat::Json => {
            let inspection = Inspection {
                input: loaded.source.path.display().to_string(),
                input_hash: loaded.source.content_hash.to_hex(),
                layers: loaded.structure.layers.len(),
                control: loaded
                    .structure
                    .control
                    .entries
                    .iter()
                    .map(|e| e.as_ref().map(ToString::to_string))
                    .collect(),
                stats: NetlistStats::compute(&loaded.netlist),
                transistors: args.transistors.then(|| loaded.netlist.transistors()),
                diagnostics: &diagnostics,
            };
            let mut json = serde_json::to_string_pretty(&inspection)?;
            json.push('\n');
            json
        }
    };
    emit(&text, None)?;

    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!(
            "   Result: {} error(s), {} warning(s)",
            count(&diagnostics, Severity::Error),
            count(&diagnostics, Severity::Warning)
        );
    }
    Ok(if has_errors { 1 } else { 0 })
}

fn count(diagnostics: &[Diagnostic], severity: Severity) -> usize {
    diagnostics.iter().filter(|d| d.severity == severity).count()
}

fn render_text(loaded: &LoadedInput, with_transistors: bool) -> String {
    let mut out = format!(
        "input: {} ({})\nlayers: {}\n",
        loaded.source.path.display(),
        loaded.source.content_hash,
        loaded.structure.layers.len()
    );
    let control: Vec<String> = loaded
        .structure
        .control
        .entries
        .iter()
        .map(|e| e.as_ref().map_or_else(|| "-".to_string(), ToString::to_string))
        .collect();
    out.push_str(&format!("control: [{}]\n", control.join(", ")));
    out.push_str(&NetlistStats::compute(&loaded.netlist).to_string());

    if with_transistors {
        out.push_str("transistors:\n");
        for t in loaded.netlist.transistors() {
            out.push_str(&format!("  {}\n", t.description()));
        }
        out.push_str("nets:\n");
        for net in loaded.netlist.nets() {
            let members: Vec<String> = net.members.iter().map(ToString::to_string).collect();
            out.push_str(&format!("  {} at {}: {}\n", net.id, net.coord, members.join(" ")));
        }
    }
    out
}
