use anyhow::{anyhow, Context};
use chrono::Utc;
use clap::{value_parser, Arg, ArgAction, Command};
use peach_store::test_harness::{run_simulator, SimulatorConfig, TestHarness};
use peach_store::{views, DeskConfig, DeskState, Seed, Snapshot};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("peach-desk")
        .version(peach_store::VERSION)
        .about("Peach Reviews desk: seed, inspect and simulate the review workflow store")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(
            Command::new("simulate")
                .about("Run random operation sequences and check store invariants")
                .arg(
                    Arg::new("ops")
                        .long("ops")
                        .default_value("2000")
                        .value_parser(value_parser!(u64))
                        .help("Number of operations to run"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .default_value("42")
                        .value_parser(value_parser!(u64))
                        .help("Random seed for reproducibility"),
                )
                .arg(
                    Arg::new("stop-on-violation")
                        .long("stop-on-violation")
                        .action(ArgAction::SetTrue)
                        .help("Stop simulation on first violation"),
                ),
        )
        .subcommand(
            Command::new("certify")
                .about("Run the simulator over several seeds under both transition policies")
                .arg(
                    Arg::new("seeds")
                        .long("seeds")
                        .default_value("10")
                        .value_parser(value_parser!(u64)),
                )
                .arg(
                    Arg::new("ops")
                        .long("ops")
                        .default_value("1000")
                        .value_parser(value_parser!(u64)),
                ),
        )
        .subcommand(
            Command::new("seed")
                .about("Write the demo seed as a snapshot")
                .arg(
                    Arg::new("out")
                        .long("out")
                        .value_parser(value_parser!(PathBuf))
                        .help("Output path (defaults to snapshot_path from the config)"),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Print overview KPIs of a snapshot")
                .arg(
                    Arg::new("path")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("activity")
                .about("Page through the activity feed of a snapshot")
                .arg(
                    Arg::new("path")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("search")
                        .long("search")
                        .default_value("")
                        .help("Filter by action text or actor name"),
                )
                .arg(
                    Arg::new("page")
                        .long("page")
                        .default_value("1")
                        .value_parser(value_parser!(u64).range(1..))
                        .help("Page number, starting at 1"),
                ),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<DeskConfig> {
    let config = match path {
        Some(path) => DeskConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DeskConfig::default(),
    };
    Ok(config.with_env_overrides()?)
}

fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("json-logs"));
    let config = load_config(matches.get_one::<PathBuf>("config"))?;

    match matches.subcommand() {
        Some(("simulate", args)) => {
            let ops = args.get_one::<u64>("ops").copied().unwrap_or(2000);
            let seed = args.get_one::<u64>("seed").copied().unwrap_or(42);

            let report = run_simulator(SimulatorConfig {
                seed,
                total_operations: ops,
                transition_policy: config.transition_policy,
                stop_on_first_violation: args.get_flag("stop-on-violation"),
                ..Default::default()
            });
            println!("{}", report.generate_text());

            std::process::exit(if report.passed() { 0 } else { 1 });
        }
        Some(("certify", args)) => {
            let seeds = args.get_one::<u64>("seeds").copied().unwrap_or(10);
            let ops = args.get_one::<u64>("ops").copied().unwrap_or(1000);

            let report = TestHarness::run_certification(seeds, ops);
            println!("Certification Report:");
            println!("  Seeds Tested: {}", report.seeds_tested);
            println!("  Total Violations: {}", report.total_violations);
            println!("  Status: {}", if report.passed { "PASSED" } else { "FAILED" });

            std::process::exit(if report.passed { 0 } else { 1 });
        }
        Some(("seed", args)) => {
            let out = args
                .get_one::<PathBuf>("out")
                .cloned()
                .or_else(|| config.snapshot_path.clone())
                .ok_or_else(|| anyhow!("no output path: pass --out or set snapshot_path"))?;

            let snapshot = Snapshot::capture(&DeskState::from_seed(&Seed::demo()));
            snapshot.save(&out)?;
            println!(
                "wrote {} tasks, {} activity entries to {}",
                snapshot.state.tasks.len(),
                snapshot.state.global_activity.len(),
                out.display()
            );
        }
        Some(("inspect", args)) => {
            let path = args
                .get_one::<PathBuf>("path")
                .ok_or_else(|| anyhow!("missing snapshot path"))?;
            let snapshot = Snapshot::load(path)?;
            let report = views::overview(&snapshot.state, Utc::now(), config.at_risk_threshold);

            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Snapshot saved {}", snapshot.saved_at.to_rfc3339());
                println!("  Written this month:   {}", report.written_this_month);
                println!("  Pending:              {}", report.pending);
                println!("  Delivered this month: {}", report.delivered_this_month);
                println!("  Overdue:              {}", report.overdue);
                println!("  MRR:                  {:.2}", report.mrr);
                println!("  Annual revenue:       {:.2}", report.annual_revenue);
                for (status, count) in &report.client_status {
                    println!("  Clients {status}: {count}");
                }
                for location in &report.at_risk {
                    println!(
                        "  At risk: {} ({}, {}) {} pending",
                        location.name, location.client_name, location.city, location.pending_count
                    );
                }
            }
        }
        Some(("activity", args)) => {
            let path = args
                .get_one::<PathBuf>("path")
                .ok_or_else(|| anyhow!("missing snapshot path"))?;
            let search = args.get_one::<String>("search").map_or("", String::as_str);
            let page = usize::try_from(args.get_one::<u64>("page").copied().unwrap_or(1))?;

            let snapshot = Snapshot::load(path)?;
            let listing =
                views::activity_page(&snapshot.state, search, page - 1, config.activity_page_size);
            for entry in &listing.entries {
                println!(
                    "{}  {:<14} {}",
                    entry.timestamp.format("%Y-%m-%d %H:%M"),
                    entry.user_name.as_deref().unwrap_or("-"),
                    entry.action()
                );
            }
            println!(
                "page {page}, {} of {} entries{}",
                listing.entries.len(),
                listing.total,
                if listing.has_more { ", more available" } else { "" }
            );
        }
        _ => {
            cli().print_help()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn parses_simulate_flags() {
        let matches = cli()
            .try_get_matches_from(["peach-desk", "simulate", "--ops", "10", "--stop-on-violation"])
            .unwrap();
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "simulate");
        assert_eq!(args.get_one::<u64>("ops"), Some(&10));
        assert!(args.get_flag("stop-on-violation"));
    }

    #[test]
    fn activity_pages_start_at_one() {
        assert!(cli()
            .try_get_matches_from(["peach-desk", "activity", "desk.json", "--page", "0"])
            .is_err());
        let matches = cli()
            .try_get_matches_from(["peach-desk", "activity", "desk.json", "--search", "chloe"])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        assert_eq!(args.get_one::<u64>("page"), Some(&1));
        assert_eq!(args.get_one::<String>("search").map(String::as_str), Some("chloe"));
    }
}
