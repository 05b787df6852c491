//! `bddlay place`: build the netlist, anneal a layout and emit a report.

use bddlay_common::ContentHash;
use bddlay_config::{validate_config, BddlayConfig};
use bddlay_diagnostics::{DiagnosticSink, Severity};
use bddlay_netlist::Netlist;
use bddlay_place::{
    anneal, anneal_enhanced, AnnealOutcome, AnnealSchedule, Free2dLayout, Layout, LayoutReport,
    RowWeights, SingleRowLayout, StandardCellLayout,
};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::pipeline::{emit, load_input, render_diagnostics, resolve_config};
use crate::{GlobalArgs, ModelKind, PlaceArgs, ReportFormat};

/// Runs `bddlay place`.
pub fn run(args: &PlaceArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut config = resolve_config(global, &args.file)?;
    apply_overrides(&mut config, args)?;

    let sink = DiagnosticSink::new();
    let Some(loaded) = load_input(&args.file, &sink, global)? else {
        return Ok(1);
    };

    let mut rng = match config.anneal.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let report = place(
        &loaded.netlist,
        loaded.source.content_hash,
        args.model,
        !args.baseline,
        &config,
        &mut rng,
    )?;

    if let Some(violation) = report.standard_cell.as_ref().and_then(|g| g.violation) {
        sink.emit(violation.to_diagnostic());
    }
    let diagnostics = sink.take_all();
    render_diagnostics(&diagnostics, &loaded.source, global);

    let mut text = match args.format {
        ReportFormat::Text => report.to_string(),
        ReportFormat::Json => serde_json::to_string_pretty(&report)?,
    };
    if !text.ends_with('\n') {
        text.push('\n');
    }
    emit(&text, args.output.as_deref())?;

    let failed = diagnostics.iter().any(|d| d.severity == Severity::Error);
    Ok(if failed { 1 } else { 0 })
}

/// Folds command-line overrides into the loaded configuration and
/// revalidates it.
pub fn apply_overrides(
    config: &mut BddlayConfig,
    args: &PlaceArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(seed) = args.seed {
        config.anneal.seed = Some(seed);
    }
    if let Some(iterations) = args.iterations {
        config.anneal.max_iterations = iterations;
    }
    if let Some(w_wire) = args.w_wire {
        config.single_row.w_wire = w_wire;
    }
    if let Some(w_area) = args.w_area {
        config.single_row.w_area = w_area;
    }
    validate_config(config)?;
    Ok(())
}

/// Builds the selected layout, anneals it and summarizes the result.
pub fn place(
    netlist: &Netlist,
    input_hash: ContentHash,
    model: ModelKind,
    incremental: bool,
    config: &BddlayConfig,
    rng: &mut StdRng,
) -> Result<LayoutReport, Box<dyn std::error::Error>> {
    let schedule = AnnealSchedule::from(&config.anneal);
    info!(
        "placing {} transistors in {} nets",
        netlist.len(),
        netlist.net_count()
    );

    let report = match model {
        ModelKind::Free2d => {
            let layout = Free2dLayout::new(netlist, &config.free2d, rng)?;
            LayoutReport::free2d(&optimize(layout, &schedule, incremental, rng), input_hash)
        }
        ModelKind::SingleRow => {
            let layout = SingleRowLayout::new(netlist, RowWeights::from(&config.single_row), rng)?;
            LayoutReport::single_row(&optimize(layout, &schedule, incremental, rng), input_hash)
        }
        ModelKind::StandardCell => {
            let layout = StandardCellLayout::new(netlist, &config.standard_cell, rng)?;
            LayoutReport::standard_cell(&optimize(layout, &schedule, incremental, rng), input_hash)
        }
    };
    Ok(report)
}

fn optimize<L: Layout>(
    layout: L,
    schedule: &AnnealSchedule,
    incremental: bool,
    rng: &mut StdRng,
) -> AnnealOutcome<L> {
    if incremental {
        anneal_enhanced(layout, schedule, rng)
    } else {
        anneal(layout, schedule, rng)
    }
}
