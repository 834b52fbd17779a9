// Copyright (c) Facebook, Inc. and its affiliates. All Rights Reserved
//! Ladon - An engine for evaluating parameter sweep grammars

pub mod core;
pub mod errors;
pub mod glob;
pub mod grammar;
pub mod sweep;
pub mod yaml;

pub use core::override_types::*;
pub use errors::{
    ArgumentShapeError, GrammarError, GrammarResult, InvalidCastValueError,
    InvalidSortShuffleArgumentError, InvalidSweepNestingError, InvalidTagArgumentError,
    NonEnumerableSweepError, UnknownFunctionError, UnsupportedCastError,
};
pub use glob::Glob;
pub use grammar::cast::{cast_bool, cast_float, cast_int, cast_str, cast_value, CastTarget};
pub use grammar::eval::Functions;
pub use grammar::functions::{choice, glob, interval, range, shuffle, shuffle_with_rng, sort, tag};
pub use grammar::utils::{
    element_to_source, escape_special_characters, is_cast_type, is_element_type,
    is_parsed_element_type, is_special_char, value_to_source,
};
pub use sweep::{expand, expand_with_rng, expansion_strings, expansion_strings_with_rng};
pub use yaml::{element_to_yaml, expansion_to_yaml, yaml_to_element};
