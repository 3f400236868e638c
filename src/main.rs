//! EdgePlan CLI: load the system and run configuration, search for the
//! cheapest feasible placement, then push the workload rate as high as the
//! chosen topology sustains.

use clap::Parser;
use std::path::Path;

use edgeplan::app_config::{ApplicationPaths, Cli};
use edgeplan::model::System;
use edgeplan::placement::Candidate;
use edgeplan::report;
use edgeplan::search::{ParallelDriver, RandomGreedy, WorkloadMaximizer};
use edgeplan::settings::Settings;
use edgeplan::{Error, Result};

fn main() {
    let args = Cli::parse();

    // Initialize logging
    use tracing_subscriber::{fmt, EnvFilter};
    fmt()
        .with_env_filter(EnvFilter::new(&args.verbosity))
        .init();

    if let Err(e) = run(&args) {
        tracing::error!("{e}");
        std::process::exit(e.exit_code());
    }
}

fn run(args: &Cli) -> Result<()> {
    let paths = ApplicationPaths::resolve(Path::new(&args.application_dir))?;
    let settings = Settings::from_path(&paths.input_file)?;
    let sys = System::from_path(&paths.system_file)?;

    let driver = match args.workers {
        Some(workers) => ParallelDriver::new(workers, settings.seed),
        None => ParallelDriver::with_all_cores(settings.seed),
    };

    let greedy = RandomGreedy::new(settings.greedy.k_best);
    let mut elites = driver.run_greedy(&sys, &greedy, &settings.greedy.budget);

    if !elites.has_feasible() {
        tracing::error!("no feasible solution found by the randomized greedy");
    } else if let Some(heuristic) = &settings.heuristic {
        let seeds: Vec<Candidate> = elites
            .iter()
            .filter(|c| c.is_feasible())
            .cloned()
            .collect();
        let refined = driver.run_heuristic(&sys, &heuristic.spec, &seeds, &heuristic.budget);
        elites.merge(refined);
    }

    let Some(best) = elites.best() else {
        return Err(Error::NoFeasibleSolution);
    };
    report::write_solution(&sys, best, &paths.output_file)?;

    let maximizer = WorkloadMaximizer {
        upper_bound_lambda: settings.binary_search.upper_bound_lambda,
        epsilon: settings.binary_search.epsilon,
    };
    let (max_lambda, evaluated) = maximizer.maximize(&sys, &best.placement);
    let scaled = sys.scaled_to(max_lambda);
    report::write_solution(&scaled, &evaluated, &paths.max_lambda_file)?;

    tracing::info!(
        cost = best.cost,
        feasible = best.is_feasible(),
        max_lambda,
        "optimization finished"
    );
    Ok(())
}
