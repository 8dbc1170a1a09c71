mod error;

use clap::{Parser, Subcommand};
use error::{CliError, CliResult};
use nalgebra::{DMatrix, DVector};
use ro_core::timing::Timer;
use ro_gaptooth::{
    GapToothConfig, PsiMap, evolve, jacobian_spectrum, segment_euler_step, steady_state,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ro")]
#[command(about = "RandONet surrogate evaluation and gap-tooth stepping tools", long_about = None)]
struct Cli {
    /// Report wall-clock timings on stderr
    #[arg(long, global = true)]
    timing: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a RandONet model on a request file
    Eval {
        /// Path to the model file (YAML or JSON)
        model_path: PathBuf,
        /// Path to the request file (YAML or JSON)
        request_path: PathBuf,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run the boundary-corrected stepper with a Bratu Euler propagator
    Step {
        /// Number of points in the state vector
        #[arg(long)]
        points: usize,
        /// Number of steps (the initial state counts as step 1)
        #[arg(long)]
        steps: usize,
        /// Number of equal sub-domains
        #[arg(long, default_value_t = 2)]
        segments: usize,
        /// Euler time step
        #[arg(long, default_value_t = 1e-4)]
        dt: f64,
        /// Bratu source strength
        #[arg(long, default_value_t = 1.0)]
        lambda: f64,
        /// Comma-separated initial state (defaults to zeros)
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        initial: Option<Vec<f64>>,
    },
    /// Gap-tooth projective integration experiments
    #[command(subcommand)]
    Gaptooth(GapToothCommands),
}

#[derive(Subcommand)]
enum GapToothCommands {
    /// Evolve a zero initial state up to t_end and print every tooth
    Evolution {
        /// Experiment configuration (YAML); defaults are used when omitted
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Solve psi(u) = 0 by Newton and print the steady state
    SteadyState {
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Steady state followed by the eigenvalues of the Jacobian of psi
    Eigenvalues {
        #[arg(long)]
        config: Option<PathBuf>,
        /// Number of smallest-modulus eigenvalues to print
        #[arg(long, default_value_t = 10)]
        count: usize,
    },
}

fn main() -> CliResult<()> {
    // Logs go to stderr; stdout carries CSV
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    if cli.timing {
        ro_core::timing::enable_timing();
    }

    match cli.command {
        Commands::Eval {
            model_path,
            request_path,
            output,
        } => cmd_eval(&model_path, &request_path, output.as_deref()),
        Commands::Step {
            points,
            steps,
            segments,
            dt,
            lambda,
            initial,
        } => cmd_step(points, steps, segments, dt, lambda, initial),
        Commands::Gaptooth(cmd) => match cmd {
            GapToothCommands::Evolution { config } => cmd_evolution(config.as_deref()),
            GapToothCommands::SteadyState { config } => cmd_steady_state(config.as_deref()),
            GapToothCommands::Eigenvalues { config, count } => {
                cmd_eigenvalues(config.as_deref(), count)
            }
        },
    }
}

fn cmd_eval(model_path: &Path, request_path: &Path, output: Option<&Path>) -> CliResult<()> {
    let timer = Timer::start("eval");
    let net = ro_operator::load_model(model_path)?;
    let request = ro_operator::load_request(request_path)?;
    let out = request.evaluate(&net)?;
    timer.stop_and_print();
    tracing::info!(rows = out.nrows(), cols = out.ncols(), "evaluation finished");

    let csv = matrix_to_csv(&out);
    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!(
            "✓ Wrote {} x {} output to {}",
            out.nrows(),
            out.ncols(),
            path.display()
        );
    } else {
        print!("{}", csv);
    }
    Ok(())
}

fn cmd_step(
    points: usize,
    steps: usize,
    segments: usize,
    dt: f64,
    lambda: f64,
    initial: Option<Vec<f64>>,
) -> CliResult<()> {
    let u0 = match initial {
        Some(values) if values.len() != points => {
            return Err(CliError::InvalidArg {
                what: format!("--initial has {} values, --points is {}", values.len(), points),
            });
        }
        Some(values) => DVector::from_vec(values),
        None => DVector::zeros(points),
    };
    if segments == 0 || points % segments != 0 || points / segments < 3 {
        return Err(CliError::InvalidArg {
            what: format!("cannot split {points} points into {segments} segments"),
        });
    }
    let dx = 1.0 / (points / segments - 1) as f64;

    let timer = Timer::start("step");
    let u = ro_stepper::run_segments(
        |u: &DVector<f64>| segment_euler_step(u, segments, dx, dt, lambda),
        &u0,
        steps,
        segments,
    )?;
    timer.stop_and_print();
    tracing::info!(points, steps, segments, "stepping finished");

    for (i, v) in u.iter().enumerate() {
        println!("{},{}", i, v);
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> CliResult<GapToothConfig> {
    let cfg = match path {
        Some(p) => GapToothConfig::load_yaml(p)?,
        None => GapToothConfig::default(),
    };
    cfg.validate()?;
    Ok(cfg)
}

fn cmd_evolution(config: Option<&Path>) -> CliResult<()> {
    let cfg = load_config(config)?;
    let layout = cfg.layout()?;
    println!(
        "Gap-tooth evolution: {} teeth x {} points, lambda = {}, T = {}",
        layout.n_teeth(),
        layout.points_per_tooth(),
        cfg.lambda,
        cfg.t_end
    );

    let timer = Timer::start("evolution");
    let u0 = DMatrix::zeros(layout.n_teeth(), layout.points_per_tooth());
    let u = evolve(&u0, &layout, &cfg, cfg.t_end)?;
    timer.stop_and_print();
    tracing::info!(t_end = cfg.t_end, "evolution finished");

    print_teeth(&layout.tooth_grids(), |k, j| u[(k, j)]);
    Ok(())
}

fn cmd_steady_state(config: Option<&Path>) -> CliResult<()> {
    let cfg = load_config(config)?;
    let psi = PsiMap::new(cfg)?;
    let layout = *psi.layout();

    let timer = Timer::start("steady state");
    let ss = steady_state(&psi, DVector::zeros(layout.flat_len()))?;
    timer.stop_and_print();
    psi.evaluations_counter().print_summary("psi");

    println!(
        "✓ Converged in {} iterations, residual = {:.3e}, psi evaluations = {}",
        ss.iterations, ss.residual_norm, ss.psi_evaluations
    );
    let patches = layout.to_patches(&ss.u)?;
    print_teeth(&layout.tooth_grids(), |k, j| patches[(k, j)]);
    Ok(())
}

fn cmd_eigenvalues(config: Option<&Path>, count: usize) -> CliResult<()> {
    let cfg = load_config(config)?;
    let psi = PsiMap::new(cfg)?;
    let n = psi.layout().flat_len();

    let timer = Timer::start("eigenvalues");
    let ss = steady_state(&psi, DVector::zeros(n))?;
    let spectrum = jacobian_spectrum(&psi, &ss.u)?;
    timer.stop_and_print();
    tracing::info!(
        psi_evaluations = psi.evaluations(),
        "eigenvalue computation finished"
    );
    psi.evaluations_counter().print_summary("psi");

    println!("psi norm at steady state: {:.3e}", spectrum.psi_norm);
    println!("re(1 - mu),im(mu)");
    for mu in spectrum.smallest(count) {
        println!("{},{}", 1.0 - mu.re, mu.im);
    }
    Ok(())
}

fn print_teeth<F: Fn(usize, usize) -> f64>(grids: &[Vec<f64>], value: F) {
    println!("tooth,x,u");
    for (k, grid) in grids.iter().enumerate() {
        for (j, x) in grid.iter().enumerate() {
            println!("{},{},{}", k, x, value(k, j));
        }
    }
}

fn matrix_to_csv(m: &DMatrix<f64>) -> String {
    let mut csv = String::new();
    for row in m.row_iter() {
        let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        csv.push_str(&line.join(","));
        csv.push('\n');
    }
    csv
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_flag_is_global() {
        let cli = Cli::try_parse_from(["ro", "gaptooth", "steady-state", "--timing"]).unwrap();
        assert!(cli.timing);
        assert!(matches!(
            cli.command,
            Commands::Gaptooth(GapToothCommands::SteadyState { config: None })
        ));

        let cli = Cli::try_parse_from(["ro", "eval", "m.yaml", "r.yaml"]).unwrap();
        assert!(!cli.timing);
    }

    #[test]
    fn step_accepts_negative_initial_values() {
        let cli = Cli::try_parse_from([
            "ro", "step", "--points", "6", "--steps", "2", "--initial", "-1,0,2.5,0,0,-3",
        ])
        .unwrap();
        match cli.command {
            Commands::Step { initial, .. } => {
                assert_eq!(initial, Some(vec![-1.0, 0.0, 2.5, 0.0, 0.0, -3.0]));
            }
            _ => panic!("expected step"),
        }
    }

    #[test]
    fn csv_has_one_line_per_row() {
        let m = DMatrix::from_row_slice(2, 2, &[1.0, 2.5, -3.0, 4.0]);
        assert_eq!(matrix_to_csv(&m), "1,2.5\n-3,4\n");
    }
}
