// Copyright (c) Facebook, Inc. and its affiliates. All Rights Reserved
//! Grammar functions: casts, sweep constructors, ordering transforms and
//! the function-call evaluator.

pub mod cast;
pub mod eval;
pub mod functions;
pub mod utils;

pub use cast::*;
pub use eval::*;
pub use functions::*;
pub use utils::*;
