//! Furnish Headless Arrangement Harness
//!
//! Validates the bundled household tables and runs arrangement scenarios
//! against pure logic. No simulator, no rendering.
//!
//! Usage:
//!   cargo run -p furnish-simtest
//!   cargo run -p furnish-simtest -- --verbose
//!   cargo run -p furnish-simtest -- --seed 42 --dump

use std::collections::BTreeSet;

use furnish_logic::bounds::{absolute_bounds, fits_in_region, footprint};
use furnish_logic::prelude::*;
use furnish_logic::tables::{validate, Severity};
use log::info;
use serde::Serialize;

/// Categories the sweeps arrange. Every root kind in the household data.
const ROOT_CATEGORIES: &[&str] = &["stool", "table", "side_table", "sofa", "shelf", "refrigerator"];

/// Seeds per sweep.
const SWEEP_SEEDS: u64 = 25;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

struct Options {
    verbose: bool,
    dump: bool,
    seed: u64,
}

impl Options {
    fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let seed = args
            .iter()
            .position(|a| a == "--seed")
            .and_then(|i| args.get(i + 1))
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);
        Self {
            verbose: args.iter().any(|a| a == "--verbose"),
            dump: args.iter().any(|a| a == "--dump"),
            seed,
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    if !verbose && std::env::var("RUST_LOG").is_err() {
        return;
    }
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("furnish_logic=debug,furnish_simtest=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let opts = Options::from_args();
    init_logging(opts.verbose);
    println!("=== Furnish Arrangement Harness (seed {}) ===\n", opts.seed);

    let mut results = Vec::new();

    // 1. Household data
    results.extend(validate_household_data(opts.verbose));

    // 2. Scenarios: stool, table, tiny region
    results.extend(validate_scenarios(opts.seed));

    // 3. Determinism across fresh engines
    results.extend(validate_determinism(opts.seed));

    // 4. Invariant sweep over seeds and categories
    results.extend(validate_invariant_sweep(opts.seed, opts.verbose));

    // 5. Left/right-of expansion
    results.extend(validate_beside_expansion(opts.seed, opts.verbose));

    if opts.dump {
        dump_arrangements(opts.seed);
    }

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || opts.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    info!("{} checks run, {} failed", total, failed);
    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn engine(seed: u64) -> Result<ArrangementEngine> {
    ArrangementEngine::household(EngineConfig {
        seed,
        ..EngineConfig::default()
    })
}

fn open_room() -> RegionBounds {
    RegionBounds::centered(0.0, 0.0, 12.0, 12.0)
}

fn error_result(name: &str, err: ArrangeError) -> TestResult {
    TestResult {
        name: name.into(),
        passed: false,
        detail: format!("error: {}", err),
    }
}

// ── 1. Household Data ───────────────────────────────────────────────────

fn validate_household_data(verbose: bool) -> Vec<TestResult> {
    println!("--- Household Data ---");
    let mut results = Vec::new();

    let (catalog, tables) = match (Catalog::household(), ArrangementTables::household()) {
        (Ok(c), Ok(t)) => (c, t),
        (Err(e), _) | (_, Err(e)) => {
            results.push(error_result("household_parse", e));
            return results;
        }
    };

    results.push(TestResult {
        name: "catalog_not_empty".into(),
        passed: catalog.len() > 20,
        detail: format!("{} models loaded", catalog.len()),
    });

    let missing: Vec<&str> = ROOT_CATEGORIES
        .iter()
        .copied()
        .filter(|c| !tables.has_category(c))
        .collect();
    results.push(TestResult {
        name: "root_categories_present".into(),
        passed: missing.is_empty(),
        detail: if missing.is_empty() {
            format!("{} categories", tables.categories.len())
        } else {
            format!("missing: {:?}", missing)
        },
    });

    let issues = validate(&tables, &catalog);
    let errors: Vec<_> = issues
        .iter()
        .filter(|i| i.severity == Severity::Error)
        .collect();
    if verbose {
        for issue in &issues {
            println!("    [{:?}] {}: {}", issue.severity, issue.category, issue.message);
        }
    }
    results.push(TestResult {
        name: "tables_validate".into(),
        passed: errors.is_empty(),
        detail: format!(
            "{} errors, {} warnings",
            errors.len(),
            issues.len() - errors.len()
        ),
    });

    results
}

// ── 2. Scenarios ────────────────────────────────────────────────────────

fn validate_scenarios(seed: u64) -> Vec<TestResult> {
    println!("--- Scenarios ---");
    let mut results = Vec::new();
    let room = open_room();

    // Stool at the origin of a 12×12 room
    match engine(seed).and_then(|mut e| e.arrange_at("stool", Vec3::ZERO, 0.0, &room)) {
        Ok(r) => {
            let ok = r.success
                && r.placements.len() == 1
                && r.placements[0].category == "stool"
                && (0.0..360.0).contains(&r.placements[0].rotation);
            results.push(TestResult {
                name: "stool_scenario".into(),
                passed: ok,
                detail: format!(
                    "success={} placements={} rotation={:.1}",
                    r.success,
                    r.placements.len(),
                    r.placements.first().map_or(f32::NAN, |p| p.rotation)
                ),
            });
        }
        Err(e) => results.push(error_result("stool_scenario", e)),
    }

    // Bowls sit on the table top
    let mut bowls = 0;
    let mut misplaced = 0;
    for s in 0..SWEEP_SEEDS {
        let mut e = match engine(seed.wrapping_add(s)) {
            Ok(e) => e,
            Err(err) => {
                results.push(error_result("table_bowls_height", err));
                return results;
            }
        };
        let base_y = 0.1;
        let r = match e.arrange_at("table", Vec3::new(0.0, base_y, 0.0), 0.0, &room) {
            Ok(r) => r,
            Err(err) => {
                results.push(error_result("table_bowls_height", err));
                return results;
            }
        };
        let Some(top) = r
            .placements
            .first()
            .and_then(|t| e.catalog().record(&t.model_name))
            .map(|m| m.bounds.top.y)
        else {
            continue;
        };
        for p in r.of_category("bowl") {
            bowls += 1;
            if (p.position.y - (top + base_y)).abs() > 1e-5 {
                misplaced += 1;
            }
        }
    }
    results.push(TestResult {
        name: "table_bowls_height".into(),
        passed: bowls > 0 && misplaced == 0,
        detail: format!("{} bowls over {} tables, {} off the top", bowls, SWEEP_SEEDS, misplaced),
    });

    // A region too small for anything
    let closet = RegionBounds::centered(0.0, 0.0, 0.05, 0.05);
    let mut failures = Vec::new();
    for category in ROOT_CATEGORIES {
        match engine(seed).and_then(|mut e| e.arrange_at(category, Vec3::ZERO, 0.0, &closet)) {
            Ok(r) if !r.success && r.object_ids.is_empty() => {}
            Ok(_) => failures.push(format!("{} placed", category)),
            Err(e) => failures.push(format!("{}: {}", category, e)),
        }
    }
    results.push(TestResult {
        name: "tiny_region_graceful".into(),
        passed: failures.is_empty(),
        detail: if failures.is_empty() {
            format!("{} categories fail cleanly", ROOT_CATEGORIES.len())
        } else {
            failures.join("; ")
        },
    });

    // Unknown category surfaces an error
    let unknown = engine(seed).and_then(|mut e| e.arrange_at("hovercraft", Vec3::ZERO, 0.0, &room));
    results.push(TestResult {
        name: "unknown_category_rejected".into(),
        passed: matches!(unknown, Err(ArrangeError::InvalidCategory(_))),
        detail: match unknown {
            Err(e) => e.to_string(),
            Ok(_) => "accepted an unknown category".into(),
        },
    });

    results
}

// ── 3. Determinism ──────────────────────────────────────────────────────

fn validate_determinism(seed: u64) -> Vec<TestResult> {
    println!("--- Determinism ---");
    let mut results = Vec::new();
    let room = open_room();

    for category in ROOT_CATEGORIES {
        let run = || -> Result<ArrangementResult> {
            engine(seed)?.arrange_at(category, Vec3::new(0.5, 0.0, -0.5), 30.0, &room)
        };
        let name = format!("deterministic_{}", category);
        match (run(), run()) {
            (Ok(a), Ok(b)) => results.push(TestResult {
                name,
                passed: a == b,
                detail: format!("{} placements", a.len()),
            }),
            (Err(e), _) | (_, Err(e)) => results.push(error_result(&name, e)),
        }
    }

    results
}

// ── 4. Invariant Sweep ──────────────────────────────────────────────────

#[derive(Default)]
struct SweepStats {
    arrangements: usize,
    placements: usize,
    escaped: usize,
    rotated_kinematic: usize,
    duplicate_ids: usize,
    unsorted_categories: usize,
}

fn validate_invariant_sweep(seed: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Invariant Sweep ---");
    let mut results = Vec::new();
    let regions = [
        RegionBounds::centered(0.0, 0.0, 12.0, 12.0),
        RegionBounds::centered(0.0, 0.0, 2.4, 1.2),
        RegionBounds::new(-0.3, 3.0, -0.8, 0.8),
    ];

    let mut e = match engine(seed) {
        Ok(e) => e,
        Err(err) => {
            results.push(error_result("sweep_engine", err));
            return results;
        }
    };
    let mut stats = SweepStats::default();
    let mut seen_ids = BTreeSet::new();

    for s in 0..SWEEP_SEEDS {
        e.reseed(seed.wrapping_add(s));
        for region in &regions {
            for category in ROOT_CATEGORIES {
                let rotation = (s as f32 * 37.0) % 360.0;
                let r = match e.arrange_at(category, Vec3::ZERO, rotation, region) {
                    Ok(r) => r,
                    Err(err) => {
                        results.push(error_result("sweep_arrange", err));
                        return results;
                    }
                };
                stats.arrangements += 1;
                stats.placements += r.len();

                for p in &r.placements {
                    let fits = e
                        .catalog()
                        .record(&p.model_name)
                        .is_some_and(|m| fits_in_region(m, p.position, region));
                    if !fits {
                        stats.escaped += 1;
                    }
                    if p.kinematic && p.rotation != 0.0 {
                        stats.rotated_kinematic += 1;
                    }
                    if !seen_ids.insert(p.id) {
                        stats.duplicate_ids += 1;
                    }
                }
                if r.categories.windows(2).any(|w| w[0] >= w[1]) {
                    stats.unsorted_categories += 1;
                }
            }
        }
    }

    if verbose {
        println!(
            "    {} arrangements, {} placements",
            stats.arrangements, stats.placements
        );
    }

    results.push(TestResult {
        name: "placements_inside_region".into(),
        passed: stats.escaped == 0,
        detail: format!("{} placements outside their region", stats.escaped),
    });
    results.push(TestResult {
        name: "kinematic_unrotated".into(),
        passed: stats.rotated_kinematic == 0,
        detail: format!("{} kinematic objects rotated", stats.rotated_kinematic),
    });
    results.push(TestResult {
        name: "ids_unique".into(),
        passed: stats.duplicate_ids == 0,
        detail: format!("{} ids over {} placements", seen_ids.len(), stats.placements),
    });
    results.push(TestResult {
        name: "categories_sorted".into(),
        passed: stats.unsorted_categories == 0,
        detail: format!("{} results unsorted", stats.unsorted_categories),
    });

    results.push(validate_packing_spacing(seed));
    results
}

/// Packed objects on one surface never sit closer than the larger footprint.
fn validate_packing_spacing(seed: u64) -> TestResult {
    let name = "packing_spacing";
    let mut e = match engine(seed) {
        Ok(e) => e,
        Err(err) => return error_result(name, err),
    };
    let params = e.tables().packing_params("table");
    let surface = Surface {
        size: (1.6, 0.9),
        center: Vec3::new(0.0, 0.76, 0.0),
        rotation: 15.0,
        params,
    };
    let categories: Vec<String> = ["bowl", "cup", "plate", "vase"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut packed = 0;
    let mut crowded = 0;
    for _ in 0..SWEEP_SEEDS {
        let out = match e.rectangular_arrangement(&surface, &categories) {
            Ok(out) => out,
            Err(err) => return error_result(name, err),
        };
        packed += out.placements.len();
        let sizes: Vec<f32> = out
            .placements
            .iter()
            .map(|p| e.catalog().record(&p.model_name).map_or(0.0, footprint))
            .collect();
        for (i, a) in out.placements.iter().enumerate() {
            for (j, b) in out.placements.iter().enumerate().skip(i + 1) {
                let min = sizes[i].max(sizes[j]) - 0.1 * params.cell_size;
                if a.position.distance(&b.position) <= min {
                    crowded += 1;
                }
            }
        }
    }
    TestResult {
        name: name.into(),
        passed: packed > 0 && crowded == 0,
        detail: format!("{} objects packed, {} crowded pairs", packed, crowded),
    }
}

// ── 5. Beside Expansion ─────────────────────────────────────────────────

fn validate_beside_expansion(seed: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Left/Right-of ---");
    let mut results = Vec::new();
    let living = RegionBounds::new(-2.0, 2.5, -1.5, 1.5);

    let mut flanked = 0;
    let mut escaped = 0;
    let mut too_many = 0;
    let mut inside_root = 0;
    for s in 0..SWEEP_SEEDS {
        let checked = engine(seed.wrapping_add(s)).and_then(|mut e| {
            let r = e.arrange_at("sofa", Vec3::ZERO, 0.0, &living)?;
            let escapes = r
                .placements
                .iter()
                .filter(|p| {
                    !e.catalog()
                        .record(&p.model_name)
                        .is_some_and(|m| fits_in_region(m, p.position, &living))
                })
                .count();
            // A neighbour's origin must never sit inside the sofa's own footprint.
            let sofa_bounds = r.placements.first().and_then(|root| {
                e.catalog()
                    .record(&root.model_name)
                    .map(|m| absolute_bounds(m, root.position))
            });
            let buried = sofa_bounds.map_or(0, |b| {
                r.of_category("side_table")
                    .filter(|p| b.contains(p.position.x, p.position.z))
                    .count()
            });
            Ok((r, escapes, buried))
        });
        let (r, escapes, buried) = match checked {
            Ok(checked) => checked,
            Err(err) => {
                results.push(error_result("beside_expansion", err));
                return results;
            }
        };
        inside_root += buried;
        let sides = r.of_category("side_table").count();
        if sides > 0 {
            flanked += 1;
        }
        if sides > 2 {
            too_many += 1;
        }
        escaped += escapes;
        if verbose && s < 3 {
            let names: Vec<&str> = r.placements.iter().map(|p| p.model_name.as_str()).collect();
            println!("    seed {}: {:?}", seed.wrapping_add(s), names);
        }
    }

    results.push(TestResult {
        name: "sofa_gets_side_tables".into(),
        passed: flanked > 0,
        detail: format!("{}/{} sofas flanked", flanked, SWEEP_SEEDS),
    });
    results.push(TestResult {
        name: "sofa_arrangement_inside_room".into(),
        passed: escaped == 0,
        detail: format!("{} placements outside the room", escaped),
    });
    results.push(TestResult {
        name: "side_tables_clear_of_sofa".into(),
        passed: inside_root == 0,
        detail: format!("{} side tables centered inside the sofa", inside_root),
    });
    results.push(TestResult {
        name: "at_most_one_per_side".into(),
        passed: too_many == 0,
        detail: format!("{} sofas with more than two neighbours", too_many),
    });

    results
}

// ── Dump ────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct Dump<'a> {
    category: &'a str,
    seed: u64,
    result: ArrangementResult,
}

fn dump_arrangements(seed: u64) {
    println!("\n--- Dump ---");
    let room = open_room();
    let mut dumps = Vec::new();
    for &category in ROOT_CATEGORIES {
        match engine(seed).and_then(|mut e| e.arrange_at(category, Vec3::ZERO, 0.0, &room)) {
            Ok(result) => dumps.push(Dump {
                category,
                seed,
                result,
            }),
            Err(e) => println!("  {}: {}", category, e),
        }
    }
    match serde_json::to_string_pretty(&dumps) {
        Ok(json) => println!("{}", json),
        Err(e) => println!("  dump failed: {}", e),
    }
}
