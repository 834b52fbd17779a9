// Copyright (c) Facebook, Inc. and its affiliates. All Rights Reserved
//! Sweep expansion: materializing grammar values into concrete elements.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::{OverrideValue, ParsedElement};
use crate::errors::{GrammarResult, NonEnumerableSweepError};
use crate::grammar::utils::element_to_source;

/// Materialize a value into its concrete elements.
///
/// An element expands to itself, a choice sweep to its list, a range
/// sweep to its enumerated progression. A sweep marked for shuffling
/// comes back in randomized order.
pub fn expand(value: &OverrideValue) -> GrammarResult<Vec<ParsedElement>> {
    expand_with_rng(value, &mut rand::rng())
}

/// Expand with a caller-provided random source
pub fn expand_with_rng<R: Rng + ?Sized>(
    value: &OverrideValue,
    rng: &mut R,
) -> GrammarResult<Vec<ParsedElement>> {
    match value {
        OverrideValue::Element(elem) => Ok(vec![elem.clone()]),
        OverrideValue::ChoiceSweep(sweep) => {
            let mut items = sweep.list.clone();
            if sweep.shuffle {
                items.shuffle(rng);
            }
            Ok(items)
        }
        OverrideValue::RangeSweep(sweep) => {
            let mut items: Vec<ParsedElement> = sweep
                .values()?
                .into_iter()
                .map(ParsedElement::from)
                .collect();
            if sweep.shuffle {
                items.shuffle(rng);
            }
            Ok(items)
        }
        OverrideValue::IntervalSweep(_) => Err(NonEnumerableSweepError::new(
            "IntervalSweep does not have a finite list of values to expand",
        )
        .into()),
        OverrideValue::Glob(_) => Err(NonEnumerableSweepError::new(
            "glob expansion requires the set of candidate config names",
        )
        .into()),
    }
}

/// Expand and render each element back to grammar text
pub fn expansion_strings(value: &OverrideValue) -> GrammarResult<Vec<String>> {
    Ok(expand(value)?.iter().map(element_to_source).collect())
}

/// Rendered expansion with a caller-provided random source
pub fn expansion_strings_with_rng<R: Rng + ?Sized>(
    value: &OverrideValue,
    rng: &mut R,
) -> GrammarResult<Vec<String>> {
    Ok(expand_with_rng(value, rng)?
        .iter()
        .map(element_to_source)
        .collect())
}
