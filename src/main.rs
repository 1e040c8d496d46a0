use clap::Parser;
use flowfit::analysis::{self, Report};
use flowfit::compiler;
use flowfit::error::Result;
use flowfit::output;
use flowfit::parser;
use flowfit::stats::Stats;
use std::io::{self, Write};
use std::time::Instant;

/// Linear flow-conservation solvers and polynomial curve fitting
#[derive(Parser)]
#[command(name = "flowfit", version)]
struct Cli {
    /// Problem file to run
    problem: String,

    /// Append iterative convergence histories to solve output
    #[arg(long)]
    history: bool,

    /// Override the iterative convergence tolerance
    #[arg(long)]
    tol: Option<f64>,

    /// Override the iteration cap of the iterative methods
    #[arg(long)]
    max_iter: Option<usize>,

    /// Print performance stats to stderr
    #[arg(long)]
    stats: bool,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut stats = if cli.stats { Some(Stats::new()) } else { None };

    let input = std::fs::read_to_string(&cli.problem).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {}", cli.problem, e);
        std::process::exit(1);
    });

    let parse_start = Instant::now();
    let mut problem = parser::parse(&input).unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(1);
    });
    if let Some(ref mut s) = stats {
        s.add_phase("Parse", parse_start.elapsed());
    }

    // Command-line overrides win over .OPTIONS
    if cli.tol.is_some() {
        problem.options.tolerance = cli.tol;
    }
    if cli.max_iter.is_some() {
        problem.options.max_iterations = cli.max_iter;
    }

    let compile_start = Instant::now();
    let workload = compiler::compile(&problem).unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(1);
    });
    if let Some(ref mut s) = stats {
        s.add_phase("Compile", compile_start.elapsed());
    }

    if problem.analyses.is_empty() {
        tracing::warn!("problem file contains no analysis commands");
    }

    let mut stdout = io::stdout().lock();
    let analysis_start = Instant::now();

    for (i, analysis_cmd) in problem.analyses.iter().enumerate() {
        let report = analysis::run(&workload, analysis_cmd, stats.as_mut()).unwrap_or_else(|e| {
            eprintln!("Analysis error: {}", e);
            std::process::exit(1);
        });

        write_block(&mut stdout, &report, i > 0, cli.history).unwrap_or_else(|e| {
            eprintln!("Output error: {}", e);
            std::process::exit(1);
        });
    }

    if let Some(ref mut s) = stats {
        s.add_phase("Analysis", analysis_start.elapsed());
    }
    if let Some(ref stats) = stats {
        stats.display();
    }
}

/// Write one CSV block, separated from the previous one by a blank line.
fn write_block<W: Write>(writer: &mut W, report: &Report, separate: bool, history: bool) -> Result<()> {
    if separate {
        writeln!(writer)?;
    }
    output::write_report_csv(report, history, writer)
}
