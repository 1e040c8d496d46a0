//! Problem file parser.
//!
//! # Supported syntax
//!
//! ```text
//! * comment line
//! A v1 v2 ... vn          (matrix row, rows in order)
//! B b1 b2 ... bn          (right-hand side)
//! P x y                   (sample point, in order)
//! .OPTIONS [TOL=v] [MAXITER=n] [SVDTOL=v] [PIVTOL=v]
//! .SOLVE [SVD] [GAUSS] [JACOBI] [GS]
//! .PROPS
//! .INTERP x
//! .SPLINE npoints
//! .LSQ degree npoints
//! .END
//! ```
//!
//! Keywords are case-insensitive. Element names may carry a suffix (`A1`,
//! `Pday2`); only the first letter selects the statement.

use nom::branch::alt;
use nom::bytes::complete::{tag_no_case, take_while1};
use nom::character::complete::space1;
use nom::combinator::map;
use nom::multi::many1;
use nom::number::complete::double;
use nom::sequence::preceded;
use nom::IResult;
use nom::Parser;

use crate::error::{FlowfitError, Result};
use crate::ir::{Analysis, Problem};
use crate::solver::Method;

/// Parse a problem file into the IR.
pub fn parse(input: &str) -> Result<Problem> {
    let mut problem = Problem::default();

    for (line_num, raw_line) in input.lines().enumerate() {
        let line = raw_line.trim();

        // Skip blank lines and comments
        if line.is_empty() || line.starts_with('*') {
            continue;
        }

        if line.eq_ignore_ascii_case(".END") {
            break;
        }

        let Some(first) = line.chars().next() else {
            continue;
        };
        match first.to_ascii_uppercase() {
            'A' => {
                let row = parse_value_line(line).map_err(|e| parse_err(line_num, raw_line, &e))?;
                problem.rows.push(row);
            }
            'B' => {
                let rhs = parse_value_line(line).map_err(|e| parse_err(line_num, raw_line, &e))?;
                if problem.rhs.replace(rhs).is_some() {
                    return Err(parse_err(line_num, raw_line, "duplicate right-hand side"));
                }
            }
            'P' => {
                let point = parse_point_line(line).map_err(|e| parse_err(line_num, raw_line, &e))?;
                problem.points.push(point);
            }
            '.' => {
                let (keyword, params) = split_keyword(line);
                if keyword.eq_ignore_ascii_case(".OPTIONS") {
                    parse_options(params, &mut problem)
                        .map_err(|e| parse_err(line_num, raw_line, &e))?;
                } else {
                    let analysis = parse_dot_command(keyword, params)
                        .map_err(|e| parse_err(line_num, raw_line, &e))?;
                    if let Some(a) = analysis {
                        problem.analyses.push(a);
                    }
                }
            }
            _ => {
                return Err(FlowfitError::Parse(format!(
                    "line {}: unknown statement '{}': {}",
                    line_num + 1,
                    first,
                    raw_line
                )));
            }
        }
    }

    Ok(problem)
}

fn parse_err(line_num: usize, raw_line: &str, detail: &str) -> FlowfitError {
    FlowfitError::Parse(format!("line {}: {} in: {}", line_num + 1, detail, raw_line))
}

// ---------------------------------------------------------------------------
// Token parsers
// ---------------------------------------------------------------------------

/// Parse a statement name (everything up to the first whitespace).
fn element_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace())(input)
}

/// One or more whitespace-separated numbers.
fn number_list(input: &str) -> IResult<&str, Vec<f64>> {
    many1(preceded(space1, double)).parse(input)
}

fn parse_usize(input: &str) -> std::result::Result<(&str, usize), String> {
    let (rest, digits): (&str, &str) = take_while1(|c: char| c.is_ascii_digit())(input)
        .map_err(|_: nom::Err<nom::error::Error<&str>>| "expected integer".to_string())?;
    let n: usize = digits.parse().map_err(|_| "invalid integer".to_string())?;
    Ok((rest, n))
}

fn expect_end(rest: &str, what: &str) -> std::result::Result<(), String> {
    if rest.trim().is_empty() {
        Ok(())
    } else {
        Err(format!("unexpected input after {}: '{}'", what, rest.trim()))
    }
}

// ---------------------------------------------------------------------------
// A, B and P statements
// ---------------------------------------------------------------------------

/// Parse a line like: Aname v1 v2 ... vn
fn parse_value_line(line: &str) -> std::result::Result<Vec<f64>, String> {
    let (rest, (_, values)) = (element_name, number_list)
        .parse(line)
        .map_err(|_| "expected one or more numeric values".to_string())?;
    expect_end(rest, "values")?;
    Ok(values)
}

/// Parse a line like: Pname x y
fn parse_point_line(line: &str) -> std::result::Result<(f64, f64), String> {
    let (rest, (_, _, x, _, y)) = (element_name, space1, double, space1, double)
        .parse(line)
        .map_err(|_: nom::Err<nom::error::Error<&str>>| "expected point as: P x y".to_string())?;
    expect_end(rest, "point")?;
    Ok((x, y))
}

// ---------------------------------------------------------------------------
// Dot-command parsing
// ---------------------------------------------------------------------------

/// Parse key=value tokens of `.OPTIONS`, in any order.
fn parse_options(params: &str, problem: &mut Problem) -> std::result::Result<(), String> {
    let options = &mut problem.options;
    for token in params.split_whitespace() {
        let Some((key, value)) = token.split_once('=') else {
            return Err(format!("expected KEY=value, got: {}", token));
        };
        match key.to_uppercase().as_str() {
            "TOL" => options.tolerance = Some(option_value(key, value)?),
            "SVDTOL" => options.svd_tolerance = Some(option_value(key, value)?),
            "PIVTOL" => options.pivot_tolerance = Some(option_value(key, value)?),
            "MAXITER" => {
                let (rest, n) = parse_usize(value)?;
                expect_end(rest, "MAXITER")?;
                options.max_iterations = Some(n);
            }
            _ => return Err(format!("unknown option: {}", key)),
        }
    }
    Ok(())
}

fn option_value(key: &str, value: &str) -> std::result::Result<f64, String> {
    let (rest, v) = double(value)
        .map_err(|_: nom::Err<nom::error::Error<&str>>| {
            format!("failed to parse {} value: {}", key, value)
        })?;
    expect_end(rest, key)?;
    Ok(v)
}

/// Split a dot command into its keyword and the (left-trimmed) remainder.
fn split_keyword(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((keyword, params)) => (keyword, params.trim_start()),
        None => (line, ""),
    }
}

/// Parse an analysis command. Unrecognized dot commands (like .TITLE) are ignored.
fn parse_dot_command(keyword: &str, params: &str) -> std::result::Result<Option<Analysis>, String> {
    match keyword.to_ascii_uppercase().as_str() {
        ".SOLVE" => parse_solve_command(params).map(Some),
        ".PROPS" => {
            expect_end(params, ".PROPS")?;
            Ok(Some(Analysis::Properties))
        }
        ".INTERP" => {
            let (rest, query) = double(params)
                .map_err(|_: nom::Err<nom::error::Error<&str>>| {
                    "failed to parse .INTERP query point".to_string()
                })?;
            expect_end(rest, ".INTERP")?;
            Ok(Some(Analysis::Interpolate { query }))
        }
        ".SPLINE" => {
            let (rest, points) = parse_usize(params)?;
            expect_end(rest, ".SPLINE")?;
            Ok(Some(Analysis::Spline { points }))
        }
        ".LSQ" => {
            let (rest, degree) = parse_usize(params)?;
            let (rest, points) = parse_usize(rest.trim_start())?;
            expect_end(rest, ".LSQ")?;
            Ok(Some(Analysis::LeastSquares { degree, points }))
        }
        _ => {
            tracing::debug!(command = keyword, "ignoring dot command");
            Ok(None)
        }
    }
}

/// Parse: .SOLVE [SVD] [GAUSS] [JACOBI] [GS]
fn parse_solve_command(rest: &str) -> std::result::Result<Analysis, String> {
    let mut methods = Vec::new();
    for token in rest.split_whitespace() {
        let (tail, method) = parse_method(token)?;
        expect_end(tail, "method name")?;
        if !methods.contains(&method) {
            methods.push(method);
        }
    }
    Ok(Analysis::Solve { methods })
}

fn parse_method(input: &str) -> std::result::Result<(&str, Method), String> {
    // Order matters: GAUSS-SEIDEL must come before GAUSS
    alt((
        map(tag_no_case("SVD"), |_| Method::Svd),
        map(tag_no_case("GAUSS-SEIDEL"), |_| Method::GaussSeidel),
        map(tag_no_case("GAUSS"), |_| Method::GaussElimination),
        map(tag_no_case("JACOBI"), |_| Method::Jacobi),
        map(tag_no_case("GS"), |_| Method::GaussSeidel),
    ))
    .parse(input)
    .map_err(|_: nom::Err<nom::error::Error<&str>>| {
        format!("expected SVD, GAUSS, JACOBI or GS, got: {}", input)
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const NETWORK: &str = "\
* four-node transportation network
A  1 -1  0  0
A -1  2 -1  0
A  0 -1  2 -1
A  0  0 -1  1
B 10 5 -3 -12
.OPTIONS TOL=1e-10 MAXITER=1000
.PROPS
.SOLVE
.END
";

    #[test]
    fn test_network_problem() {
        let p = parse(NETWORK).unwrap();
        assert_eq!(p.rows.len(), 4);
        assert_eq!(p.rows[1], vec![-1.0, 2.0, -1.0, 0.0]);
        assert_eq!(p.rhs, Some(vec![10.0, 5.0, -3.0, -12.0]));
        assert_eq!(p.options.tolerance, Some(1e-10));
        assert_eq!(p.options.max_iterations, Some(1000));
        assert_eq!(
            p.analyses,
            vec![Analysis::Properties, Analysis::Solve { methods: vec![] }]
        );
    }

    #[test]
    fn test_sample_points_and_fits() {
        let input = "\
P1 2 80
P2 3 78
p3 4 82
.interp 2.5
.SPLINE 200
.LSQ 2 200
";
        let p = parse(input).unwrap();
        assert_eq!(p.points, vec![(2.0, 80.0), (3.0, 78.0), (4.0, 82.0)]);
        assert_eq!(
            p.analyses,
            vec![
                Analysis::Interpolate { query: 2.5 },
                Analysis::Spline { points: 200 },
                Analysis::LeastSquares { degree: 2, points: 200 },
            ]
        );
    }

    #[test]
    fn test_solve_method_list() {
        let p = parse(".SOLVE gs svd Gauss-Seidel JACOBI gauss\n").unwrap();
        assert_eq!(
            p.analyses,
            vec![Analysis::Solve {
                methods: vec![
                    Method::GaussSeidel,
                    Method::Svd,
                    Method::Jacobi,
                    Method::GaussElimination,
                ]
            }]
        );
    }

    #[test]
    fn test_unknown_method() {
        let err = parse(".SOLVE LU\n").unwrap_err().to_string();
        assert!(err.contains("line 1"), "got: {err}");
        assert!(err.contains("expected SVD"), "got: {err}");
    }

    #[test]
    fn test_options_all_keys() {
        let p = parse(".options svdtol=1e-12 pivtol=1e-9 tol=1e-6 maxiter=25\n").unwrap();
        assert_eq!(p.options.svd_tolerance, Some(1e-12));
        assert_eq!(p.options.pivot_tolerance, Some(1e-9));
        assert_eq!(p.options.tolerance, Some(1e-6));
        assert_eq!(p.options.max_iterations, Some(25));
    }

    #[test]
    fn test_bad_option() {
        assert!(parse(".OPTIONS FOO=1\n").is_err());
        assert!(parse(".OPTIONS TOL\n").is_err());
        assert!(parse(".OPTIONS MAXITER=1.5\n").is_err());
    }

    #[test]
    fn test_stops_at_end() {
        let p = parse("A 1\n.END\nA 2\n").unwrap();
        assert_eq!(p.rows.len(), 1);
    }

    #[test]
    fn test_unknown_statement_reports_line() {
        let err = parse("* ok\nX 1 2\n").unwrap_err().to_string();
        assert!(err.contains("line 2"), "got: {err}");
        assert!(err.contains("unknown statement"), "got: {err}");
    }

    #[test]
    fn test_trailing_garbage_in_row() {
        let err = parse("A 1 2 three\n").unwrap_err().to_string();
        assert!(err.contains("unexpected input"), "got: {err}");
    }

    #[test]
    fn test_point_needs_two_values() {
        assert!(parse("P 1\n").is_err());
        assert!(parse("P 1 2 3\n").is_err());
    }

    #[test]
    fn test_duplicate_rhs() {
        let err = parse("B 1 2\nB 3 4\n").unwrap_err().to_string();
        assert!(err.contains("duplicate"), "got: {err}");
    }

    #[test]
    fn test_ignores_unknown_dot_command() {
        let p = parse(".TITLE network\n.PROPS\n").unwrap();
        assert_eq!(p.analyses, vec![Analysis::Properties]);
    }

    #[test]
    fn test_non_ascii_keyword_does_not_panic() {
        // 'ſ' uppercases to ASCII 'S' but is two bytes wide
        let p = parse(".PROP\u{17f}\n.SOLVE\u{17f}\n").unwrap();
        assert!(p.analyses.is_empty());

        let err = parse(".INTERP \u{17f}\n").unwrap_err().to_string();
        assert!(err.contains("line 1"), "got: {err}");
        assert!(parse(".OPTIONS TOL=\u{17f}\n").is_err());
    }

    #[test]
    fn test_lsq_requires_both_numbers() {
        assert!(parse(".LSQ 2\n").is_err());
    }
}
