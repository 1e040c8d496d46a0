pub mod analysis;
pub mod compiler;
pub mod error;
pub mod fit;
pub mod interpolate;
pub mod ir;
pub mod matrix;
pub mod output;
pub mod parser;
pub mod samples;
pub mod solver;
pub mod stats;
