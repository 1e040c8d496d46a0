//! Performance statistics collection for `--stats` output.

use std::time::{Duration, Instant};

/// Collects performance counters and phase timings.
///
/// Created when `--stats` is passed, threaded as `Option<&mut Stats>`.
/// Zero cost when `None`: no timing calls, no counter increments.
pub struct Stats {
    total_start: Instant,
    phases: Vec<(&'static str, Duration)>,
    // Linear solves, one per method run
    pub linear_solves: u32,
    pub linear_solve: Duration,
    // Sweeps performed by the iterative methods
    pub iterations: u32,
    pub non_converged: u32,
    // Sample analyses
    pub interpolations: u32,
    pub fits: u32,
    pub fit_points: usize,
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Stats {
    pub fn new() -> Self {
        Self {
            total_start: Instant::now(),
            phases: Vec::new(),
            linear_solves: 0,
            linear_solve: Duration::ZERO,
            iterations: 0,
            non_converged: 0,
            interpolations: 0,
            fits: 0,
            fit_points: 0,
        }
    }

    /// Record a completed phase with its duration.
    pub fn add_phase(&mut self, name: &'static str, duration: Duration) {
        self.phases.push((name, duration));
    }

    pub fn phases(&self) -> &[(&'static str, Duration)] {
        &self.phases
    }

    /// Print the stats table to stderr.
    pub fn display(&self) {
        let total = self.total_start.elapsed();
        eprintln!();
        eprintln!("=== Flowfit Performance Stats ===");

        for (name, dur) in &self.phases {
            eprintln!("  {:<24} {:>8.3}s", name, dur.as_secs_f64());
        }

        if self.linear_solves > 0 {
            eprintln!("  Linear solves:          {}", self.linear_solves);
            eprintln!("    Solver time:          {:>8.6}s", self.linear_solve.as_secs_f64());
            if self.iterations > 0 {
                eprintln!("    Iterative sweeps:     {}", self.iterations);
            }
            if self.non_converged > 0 {
                eprintln!("    Not converged:        {}", self.non_converged);
            }
        }

        if self.interpolations > 0 {
            eprintln!("  Interpolations:         {}", self.interpolations);
        }

        if self.fits > 0 {
            eprintln!("  Curve fits:             {}  ({} grid points)", self.fits, self.fit_points);
        }

        eprintln!("  ─────────────────────────────────");
        eprintln!("  Total:                  {:>8.3}s", total.as_secs_f64());
    }
}
