//! CLI command implementations.

use anyhow::{bail, Context, Result};
use hwt_core::layout::Layout;
use hwt_core::routing::{Board, NetId, Point, RouteBackend, Router, RouterConfig};
use hwt_core::{HardwareDomain, Project};

/// Create a new project.
pub fn new_project(name: &str, domain: &str, output: Option<&str>) -> Result<()> {
    let domain = parse_domain(domain)?;
    let project = Project::new(name, domain);

    let output_dir = output.unwrap_or(".");
    let project_path = format!("{}/{}/project.hwt", output_dir, name);

    println!("Creating new {} project: {}", domain.display_name(), name);
    println!("  Domain: {} {}", domain.icon(), domain.display_name());
    println!("  Path: {}", project_path);

    // Create project directory structure
    let toml = project.to_toml()?;
    println!("\nProject configuration:");
    println!("{}", toml);

    println!("\n✓ Project created successfully!");
    println!("\nNext steps:");
    println!("  cd {}", name);
    println!("  hwt open .");

    Ok(())
}

/// Open a project.
pub fn open_project(path: &str, live: bool) -> Result<()> {
    if live {
        println!("Opening {} in live edit mode...", path);
    } else {
        println!("Opening {}...", path);
    }

    // TODO: Launch UI
    println!("(UI not yet implemented - coming soon!)");

    Ok(())
}

/// Import from external format.
pub fn import_project(format: &str, input: &str, output: Option<&str>) -> Result<()> {
    println!("Importing from {} format...", format);
    println!("  Input: {}", input);
    println!("  Output: {}", output.unwrap_or("."));

    match format.to_lowercase().as_str() {
        "kicad" => println!("  Importing KiCad project..."),
        "altium" => println!("  Importing Altium project..."),
        "eagle" => println!("  Importing Eagle project..."),
        "tscircuit" => println!("  Importing TSCircuit project..."),
        _ => bail!("Unknown format: {}", format),
    }

    // TODO: Implement import
    println!("\n(Import not yet implemented - coming soon!)");

    Ok(())
}

/// Export to external format.
pub fn export_project(format: &str, output: &str) -> Result<()> {
    println!("Exporting to {} format...", format);
    println!("  Output: {}", output);

    match format.to_lowercase().as_str() {
        "kicad" => println!("  Exporting to KiCad format..."),
        "gerber" => println!("  Exporting Gerber files..."),
        "step" => println!("  Exporting STEP 3D model..."),
        "gdsii" => println!("  Exporting GDSII..."),
        "circuit-json" => println!("  Exporting Circuit JSON..."),
        _ => bail!("Unknown format: {}", format),
    }

    // TODO: Implement export
    println!("\n(Export not yet implemented - coming soon!)");

    Ok(())
}

/// Run design rule check.
pub fn run_drc(path: &str, report: Option<&str>) -> Result<()> {
    println!("Running DRC on {}...", path);

    if let Some(report_path) = report {
        println!("  Report: {}", report_path);
    }

    // TODO: Implement DRC
    println!("\n(DRC not yet implemented - coming soon!)");

    Ok(())
}

/// Run benchmarks.
pub fn run_benchmark(suite: &str, iterations: u32) -> Result<()> {
    println!("Running {} benchmark suite ({} iterations)...", suite, iterations);

    println!("\nBenchmark Results");
    println!("═════════════════");
    println!("(Benchmarks not yet implemented - coming soon!)");

    Ok(())
}

/// Validate design data.
pub fn validate_data(path: &str, strict: bool) -> Result<()> {
    println!("Validating {}...", path);

    if strict {
        println!("  Mode: strict");
    }

    // TODO: Implement validation
    println!("\n(Validation not yet implemented - coming soon!)");

    Ok(())
}

/// Migrate data to new schema version.
pub fn migrate_data(path: &str, to: &str) -> Result<()> {
    println!("Migrating {} to version {}...", path, to);

    // TODO: Implement migration
    println!("\n(Migration not yet implemented - coming soon!)");

    Ok(())
}

/// Convert between data formats.
pub fn convert_data(input: &str, to: &str) -> Result<()> {
    println!("Converting {} to {} format...", input, to);

    // TODO: Implement conversion
    println!("\n(Conversion not yet implemented - coming soon!)");

    Ok(())
}

/// Show version and system info.
pub fn show_info() -> Result<()> {
    println!("Hardware Tool");
    println!("═════════════");
    println!();
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!("License: Apache-2.0");
    println!();
    println!("Supported Domains:");
    for domain in HardwareDomain::all() {
        println!("  {} {} - {}", domain.icon(), domain.display_name(), domain.accent_color());
    }
    println!();
    println!("Repository: https://github.com/WeaveITMeta/Hardware-Tool");

    Ok(())
}

/// Route a trace between two points on a layout, printing the resulting
/// polyline as a sequence of `x,y` waypoints.
pub fn route_trace(layout_path: &str, start: &str, end: &str, layer: &str, width: f64, net: &str) -> Result<()> {
    let layout = load_layout(layout_path)?;
    let board = Board::from_layout(&layout);
    let router = Router::new(&board, RouterConfig::default());

    let start = parse_point(start)?;
    let end = parse_point(end)?;
    let net_id = lookup_net_id(&board, net).with_context(|| format!("unknown net: {net}"))?;

    tracing::info!(layer, width, net, "routing trace");

    match router.route(start, end, layer, width, net_id) {
        Ok(result) => {
            let backend = match result.backend {
                RouteBackend::Walkaround => "walkaround",
                RouteBackend::AstarGrid => "astar-grid",
            };
            println!("Route found via {backend} backend ({} points):", result.polyline.len());
            for p in &result.polyline {
                println!("  {:.3},{:.3}", p.x, p.y);
            }
        }
        Err(err) => {
            bail!("routing failed: {err}");
        }
    }

    Ok(())
}

/// Check whether a via placement at `point` clears existing different-net
/// copper on every layer.
pub fn check_via(layout_path: &str, point: &str, radius: f64, net: &str) -> Result<()> {
    let layout = load_layout(layout_path)?;
    let board = Board::from_layout(&layout);
    let router = Router::new(&board, RouterConfig::default());

    let point = parse_point(point)?;
    let net_id = lookup_net_id(&board, net).with_context(|| format!("unknown net: {net}"))?;

    match router.check_via(point, radius, net_id) {
        Ok(()) => println!("Via at {:.3},{:.3} (r={radius}) is clear for net {net}.", point.x, point.y),
        Err(err) => bail!("via clearance violation: {err}"),
    }

    Ok(())
}

fn load_layout(path: &str) -> Result<Layout> {
    let contents = std::fs::read_to_string(path).with_context(|| format!("reading layout file: {path}"))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing layout JSON: {path}"))
}

fn parse_point(s: &str) -> Result<Point> {
    let (x, y) = s.split_once(',').with_context(|| format!("expected \"x,y\", got {s:?}"))?;
    Ok(Point::new(x.trim().parse()?, y.trim().parse()?))
}

/// Look up the `NetId` for a net name already present in the board's
/// interned net table (routing never interns new nets after `from_layout`).
fn lookup_net_id(board: &Board, name: &str) -> Option<NetId> {
    board
        .pads
        .iter()
        .map(|p| p.net_id)
        .chain(board.traces.iter().map(|t| t.net_id))
        .chain(board.vias.iter().map(|v| v.net_id))
        .find(|&id| board.nets.name_of(id) == Some(name))
}

/// Parse domain string to HardwareDomain.
fn parse_domain(s: &str) -> Result<HardwareDomain> {
    match s.to_lowercase().as_str() {
        "pcb" => Ok(HardwareDomain::Pcb),
        "ic" => Ok(HardwareDomain::Ic),
        "quantum" => Ok(HardwareDomain::Quantum),
        "mems" => Ok(HardwareDomain::Mems),
        "rf" => Ok(HardwareDomain::Rf),
        "packaging" => Ok(HardwareDomain::Packaging),
        _ => bail!(
            "Unknown domain: {}. Valid options: pcb, ic, quantum, mems, rf, packaging",
            s
        ),
    }
}
