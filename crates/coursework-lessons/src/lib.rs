//! Lesson solvers and the registry that dispatches to them

mod error;
pub mod lessons;
mod registry;
mod solver;

pub use error::{LessonError, Stage};
pub use registry::{LessonRegistry, SolverFactory, UnsupportedLessonSolver};
pub use solver::{LessonContext, Solver};
