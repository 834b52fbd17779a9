// Copyright (c) Facebook, Inc. and its affiliates. All Rights Reserved
//! Core value types for the sweep grammar.

pub mod override_types;

pub use override_types::*;
