//! Results output formatting (CSV).

use std::collections::BTreeMap;
use std::io::Write;

use crate::analysis::Report;
use crate::error::Result;
use crate::fit::FitCurve;
use crate::interpolate::InterpolationResult;
use crate::matrix::MatrixProperties;
use crate::solver::{Method, SolveResult};

/// Write one row per method with its residual, timing and solution.
///
/// Format:
/// ```csv
/// Method,Residual,Time (s),Iterations,Converged,x1,x2
/// SVD,1.2e-14,0.000031,,true,1.0,2.0
/// Jacobi,3.1e-11,0.000012,28,true,1.0,2.0
/// ```
pub fn write_solve_csv<W: Write>(
    results: &BTreeMap<Method, SolveResult>,
    writer: &mut W,
) -> Result<()> {
    let n = results.values().map(|r| r.solution.len()).max().unwrap_or(0);

    write!(writer, "Method,Residual,Time (s),Iterations,Converged")?;
    for i in 1..=n {
        write!(writer, ",x{}", i)?;
    }
    writeln!(writer)?;

    for r in results.values() {
        let iterations = r.iterations().map(|i| i.to_string()).unwrap_or_default();
        write!(
            writer,
            "{},{:e},{:.6},{},{}",
            r.method,
            r.residual,
            r.duration.as_secs_f64(),
            iterations,
            r.converged
        )?;
        for x in &r.solution {
            write!(writer, ",{}", x)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Write the convergence histories of the iterative methods, one column per
/// method. Shorter histories leave their cells empty.
///
/// Format:
/// ```csv
/// Iteration,Jacobi,Gauss-Seidel
/// 1,1.0,1.0
/// 2,0.25,0.12
/// 3,0.06,
/// ```
pub fn write_history_csv<W: Write>(
    results: &BTreeMap<Method, SolveResult>,
    writer: &mut W,
) -> Result<()> {
    let histories: Vec<(Method, &[f64])> = results
        .values()
        .filter_map(|r| r.history.as_deref().map(|h| (r.method, h)))
        .collect();

    write!(writer, "Iteration")?;
    for (method, _) in &histories {
        write!(writer, ",{}", method)?;
    }
    writeln!(writer)?;

    let rows = histories.iter().map(|(_, h)| h.len()).max().unwrap_or(0);
    for k in 0..rows {
        write!(writer, "{}", k + 1)?;
        for (_, h) in &histories {
            match h.get(k) {
                Some(e) => write!(writer, ",{:e}", e)?,
                None => write!(writer, ",")?,
            }
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Write matrix properties.
///
/// Format:
/// ```csv
/// Property,Value
/// Size,4x4
/// Condition Number,inf
/// Determinant,0
/// Rank,3
/// ```
pub fn write_properties_csv<W: Write>(props: &MatrixProperties, writer: &mut W) -> Result<()> {
    writeln!(writer, "Property,Value")?;
    writeln!(writer, "Size,{}x{}", props.nrows, props.ncols)?;
    writeln!(writer, "Condition Number,{:e}", props.condition_number)?;
    writeln!(writer, "Determinant,{}", props.determinant)?;
    writeln!(writer, "Rank,{}", props.rank)?;
    Ok(())
}

/// Write the interpolated value by each formulation.
///
/// Format:
/// ```csv
/// Query,Lagrange,Newton,Neville
/// 2.5,78.25,78.25,78.25
/// ```
pub fn write_interpolation_csv<W: Write>(
    result: &InterpolationResult,
    writer: &mut W,
) -> Result<()> {
    writeln!(writer, "Query,Lagrange,Newton,Neville")?;
    writeln!(
        writer,
        "{},{},{},{}",
        result.query, result.lagrange, result.newton, result.neville
    )?;
    Ok(())
}

/// Write a sampled fit curve.
///
/// Format:
/// ```csv
/// x,Cubic Spline
/// 2.0,80.0
/// 2.01,79.9
/// ```
pub fn write_fit_csv<W: Write>(curve: &FitCurve, writer: &mut W) -> Result<()> {
    writeln!(writer, "x,{}", curve.kind)?;
    for (x, y) in curve.domain.iter().zip(&curve.values) {
        writeln!(writer, "{},{}", x, y)?;
    }
    Ok(())
}

/// Write any report in its CSV format. Histories are appended to solve
/// reports when `history` is set.
pub fn write_report_csv<W: Write>(report: &Report, history: bool, writer: &mut W) -> Result<()> {
    match report {
        Report::Solve(results) => {
            write_solve_csv(results, writer)?;
            if history && results.values().any(|r| r.history.is_some()) {
                writeln!(writer)?;
                write_history_csv(results, writer)?;
            }
            Ok(())
        }
        Report::Properties(props) => write_properties_csv(props, writer),
        Report::Interpolation(result) => write_interpolation_csv(result, writer),
        Report::Fit(curve) => write_fit_csv(curve, writer),
    }
}
