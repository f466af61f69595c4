//! Compiler invocation and the parallel compilation pool.
//!
//! [`Invoker`] builds compiler and linker command lines from a
//! [`BuildProfile`](bake_config::BuildProfile), runs them as child processes
//! and streams their diagnostics through the GCC output parser.
//! [`WorkerPool`] runs many such compilations at once, keeping each task's
//! output together and stopping early after the first failure.

#![warn(missing_docs)]

pub mod error;
pub mod invoker;
pub mod output;
pub mod pool;
pub mod result;
pub mod toolchain;

pub use error::CompileError;
pub use invoker::Invoker;
pub use output::{Buffered, Console, OutputSink};
pub use pool::{StopSignal, TaskOutcome, WorkerPool};
pub use result::CompilationResult;
pub use toolchain::{CompilerCommand, Toolchain, OBJECT_DIR};
