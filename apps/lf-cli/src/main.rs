mod error;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use lf_components::DrawnState;
use lf_core::{LogicValue, NodeId};
use lf_graph::{Circuit, EngineConfig};
use lf_project::{load_doc, read_doc, to_doc, validate_doc, write_doc, Loaded};
use lf_sim::{run_sim, Probe, SimOptions};
use tracing::info;

use crate::error::{CliError, CliResult};

#[derive(Parser)]
#[command(name = "lf-cli")]
#[command(about = "LogicFlow CLI - digital logic circuit simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate circuit document syntax and structure
    Validate {
        /// Path to the circuit document (.json or .yaml)
        circuit_path: PathBuf,
    },
    /// Load a circuit, settle it and print every component and wire
    Inspect {
        /// Path to the circuit document (.json or .yaml)
        circuit_path: PathBuf,
        /// Settle iteration budget
        #[arg(long, default_value_t = EngineConfig::default().iteration_budget)]
        budget: usize,
    },
    /// Step a circuit through clock ticks and print probed values
    Run {
        /// Path to the circuit document (.json or .yaml)
        circuit_path: PathBuf,
        /// Number of ticks
        #[arg(long, default_value_t = SimOptions::default().ticks)]
        ticks: u64,
        /// Print every N-th tick
        #[arg(long, default_value_t = SimOptions::default().record_every)]
        record_every: u64,
        /// Settle iteration budget
        #[arg(long, default_value_t = EngineConfig::default().iteration_budget)]
        budget: usize,
        /// Document node keys to probe (defaults to every output probe)
        #[arg(long = "probe")]
        probes: Vec<u32>,
    },
    /// Load a circuit and save it again, converting by file extension
    Convert {
        /// Source document
        input: PathBuf,
        /// Destination document
        output: PathBuf,
    },
}

fn main() -> CliResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { circuit_path } => cmd_validate(&circuit_path),
        Commands::Inspect {
            circuit_path,
            budget,
        } => cmd_inspect(&circuit_path, budget),
        Commands::Run {
            circuit_path,
            ticks,
            record_every,
            budget,
            probes,
        } => cmd_run(
            &circuit_path,
            &SimOptions {
                ticks,
                record_every,
            },
            budget,
            &probes,
        ),
        Commands::Convert { input, output } => cmd_convert(&input, &output),
    }
}

fn load(path: &Path, budget: usize) -> CliResult<Loaded> {
    let doc = read_doc(path)?;
    let loaded = load_doc(
        &doc,
        EngineConfig {
            iteration_budget: budget,
        },
    )?;
    if !loaded.skipped_wires.is_empty() {
        println!(
            "! Skipped {} wire entr{}: {:?}",
            loaded.skipped_wires.len(),
            if loaded.skipped_wires.len() == 1 { "y" } else { "ies" },
            loaded.skipped_wires
        );
    }
    if let Err(err) = loaded.circuit.last_settle() {
        println!("! {err}");
    }
    Ok(loaded)
}

fn cmd_validate(circuit_path: &Path) -> CliResult<()> {
    println!("Validating circuit: {}", circuit_path.display());
    let doc = read_doc(circuit_path)?;
    validate_doc(&doc).map_err(lf_project::ProjectError::from)?;
    println!(
        "✓ Circuit is valid ({} components, {} wire entries)",
        doc.component_count(),
        doc.wires.len()
    );
    Ok(())
}

fn symbols(circuit: &Circuit, nodes: &[NodeId]) -> String {
    nodes
        .iter()
        .map(|n| circuit.value(*n).unwrap_or_default().symbol())
        .collect()
}

fn describe_drawn(state: DrawnState) -> Option<String> {
    let hex = |v: Option<u8>, digits: usize| match v {
        Some(v) => format!("{v:0digits$X}"),
        None => "?".repeat(digits),
    };
    match state {
        DrawnState::None => None,
        DrawnState::Level(v) => Some(v.to_string()),
        DrawnState::Segments(v) => Some(format!("segments {}", hex(v, 2))),
        DrawnState::Digit(v) => Some(format!("digit {}", hex(v, 1))),
        DrawnState::Byte(v) => Some(format!("byte {}", hex(v, 2))),
    }
}

fn cmd_inspect(circuit_path: &Path, budget: usize) -> CliResult<()> {
    let loaded = load(circuit_path, budget)?;
    let circuit = &loaded.circuit;

    println!("Components:");
    for comp in circuit.components() {
        let Some(model) = circuit.component(comp) else {
            continue;
        };
        let inputs = symbols(circuit, circuit.inputs_of(comp).unwrap_or_default());
        let outputs = symbols(circuit, circuit.outputs_of(comp).unwrap_or_default());
        let drawn = describe_drawn(model.drawn_state())
            .map(|d| format!("  [{d}]"))
            .unwrap_or_default();
        println!(
            "  #{comp:<3} {:<12} in: {inputs:<9} out: {outputs:<8}{drawn}",
            model.kind()
        );
    }

    if circuit.wire_count() > 0 {
        println!("Wires:");
        for wire in circuit.wires() {
            let value = circuit.value(wire.from()).unwrap_or_default();
            let mut extra = String::new();
            if wire.is_delayed() {
                extra.push_str(&format!(" delay={}", wire.delay()));
            }
            if let Some(style) = wire.style() {
                extra.push_str(&format!(" style={style}"));
            }
            println!(
                "  #{:<3} {} -> {} = {value}{extra}",
                wire.id(),
                wire.from(),
                wire.to()
            );
        }
    }

    match circuit.last_settle() {
        Ok(stats) => println!("✓ Settled ({} steps, {} recomputes)", stats.steps, stats.recomputes),
        Err(err) => println!("✗ {err}"),
    }
    Ok(())
}

fn cmd_run(
    circuit_path: &Path,
    opts: &SimOptions,
    budget: usize,
    keys: &[u32],
) -> CliResult<()> {
    let mut loaded = load(circuit_path, budget)?;

    let probes = if keys.is_empty() {
        Probe::from_sinks(&loaded.circuit)
    } else {
        keys.iter()
            .map(|k| {
                loaded
                    .keys
                    .get(k)
                    .map(|node| Probe::new(format!("k{k}"), *node))
                    .ok_or(CliError::UnknownKey { key: *k })
            })
            .collect::<CliResult<Vec<_>>>()?
    };
    info!(ticks = opts.ticks, probes = probes.len(), "running");

    let record = run_sim(&mut loaded.circuit, opts, &probes)?;

    let header: Vec<String> = record.labels.iter().map(|l| format!("{l:>8}")).collect();
    println!("{:>6} {}", "tick", header.join(""));
    for (i, tick) in record.ticks.iter().enumerate() {
        let row: String = record.values[i]
            .iter()
            .map(|v: &LogicValue| format!("{:>8}", v.symbol()))
            .collect();
        let flag = if record.settled[i] { "" } else { "  (unstable)" };
        println!("{tick:>6} {row}{flag}");
    }

    let unstable = record.unstable_count();
    if unstable > 0 {
        println!("✗ {unstable} sampled tick(s) did not settle");
    } else {
        println!("✓ {} samples", record.len());
    }
    Ok(())
}

fn cmd_convert(input: &Path, output: &Path) -> CliResult<()> {
    let loaded = load(input, EngineConfig::default().iteration_budget)?;
    let doc = to_doc(&loaded.circuit);
    write_doc(output, &doc)?;
    println!(
        "✓ Wrote {} ({} components, {} wires)",
        output.display(),
        doc.component_count(),
        doc.wires.len()
    );
    Ok(())
}
