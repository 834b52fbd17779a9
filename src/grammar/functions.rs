// Copyright (c) Facebook, Inc. and its affiliates. All Rights Reserved
//! Sweep constructors and ordering transforms.

use std::cmp::Ordering;
use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::{
    ChoiceSweep, IntervalSweep, Number, OverrideValue, ParsedElement, RangeSweep, Sweep,
};
use crate::errors::{
    ArgumentShapeError, GrammarError, GrammarResult, InvalidSortShuffleArgumentError,
    InvalidSweepNestingError, InvalidTagArgumentError,
};
use crate::glob::Glob;

use super::utils::element_to_source;

/// A choice sweep over the given values.
///
/// A single simple-form choice argument is promoted to explicit form in
/// place; any other sweep argument is a nesting error.
pub fn choice(mut args: Vec<OverrideValue>) -> GrammarResult<OverrideValue> {
    if args.len() == 1 {
        if let OverrideValue::ChoiceSweep(sweep) = &mut args[0] {
            if sweep.simple_form {
                sweep.simple_form = false;
                return Ok(args.remove(0));
            }
            return Err(InvalidSweepNestingError::new("nesting choices is not supported").into());
        }
    }
    let mut list = Vec::with_capacity(args.len());
    for arg in args {
        match arg {
            OverrideValue::Element(elem) => list.push(elem),
            OverrideValue::ChoiceSweep(_) => {
                return Err(
                    InvalidSweepNestingError::new("nesting choices is not supported").into(),
                )
            }
            other => {
                return Err(InvalidSweepNestingError::new(format!(
                    "nesting a {} inside a choice sweep is not supported",
                    other.type_name()
                ))
                .into())
            }
        }
    }
    Ok(OverrideValue::ChoiceSweep(ChoiceSweep::new(list)))
}

/// A range sweep `start, start+step, ...` with an exclusive stop
pub fn range(
    start: impl Into<Number>,
    stop: impl Into<Number>,
    step: impl Into<Number>,
) -> RangeSweep {
    RangeSweep::new(start, stop, step)
}

/// A continuous interval `[start, end]`
pub fn interval(start: f64, end: f64) -> IntervalSweep {
    IntervalSweep::new(start, end)
}

/// A glob over config names; lone pattern strings normalize to
/// one-element lists.
pub fn glob(include: ParsedElement, exclude: Option<ParsedElement>) -> GrammarResult<Glob> {
    let include = pattern_list("include", include)?;
    let exclude = match exclude {
        Some(patterns) => pattern_list("exclude", patterns)?,
        None => Vec::new(),
    };
    Ok(Glob::new().with_include(include).with_exclude(exclude))
}

fn pattern_list(name: &str, value: ParsedElement) -> GrammarResult<Vec<String>> {
    match value {
        ParsedElement::String(s) => Ok(vec![s]),
        ParsedElement::QuotedString(qs) => Ok(vec![qs.text]),
        ParsedElement::List(items) => {
            let mut patterns = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    ParsedElement::String(s) => patterns.push(s),
                    ParsedElement::QuotedString(qs) => patterns.push(qs.text),
                    other => return Err(pattern_error(name, other.type_name())),
                }
            }
            Ok(patterns)
        }
        other => Err(pattern_error(name, other.type_name())),
    }
}

fn pattern_error(name: &str, type_name: &str) -> GrammarError {
    ArgumentShapeError::new(format!("{} patterns must be strings, got {}", name, type_name))
        .with_function("glob")
        .into()
}

/// Tag a sweep with string tags, replacing any tags it already carries.
///
/// The sweep is the last positional argument or the `sweep` keyword; a
/// positional sweep requires at least one tag string before it.
pub fn tag(args: Vec<OverrideValue>, sweep: Option<OverrideValue>) -> GrammarResult<OverrideValue> {
    let explicit_sweep = sweep.is_some();
    let (tag_args, mut sweep_value) = match sweep {
        Some(sweep) => (args, sweep),
        None => {
            let mut args = args;
            match args.pop() {
                Some(last) => (args, last),
                None => {
                    return Err(InvalidTagArgumentError::new(
                        "Not enough arguments to tag, must take at least a sweep",
                    )
                    .into())
                }
            }
        }
    };

    if !explicit_sweep && tag_args.is_empty() {
        return Err(InvalidTagArgumentError::new(
            "Not enough arguments to tag, must take at least one tag and a sweep",
        )
        .into());
    }

    let mut tags = HashSet::new();
    for arg in &tag_args {
        match arg.as_element().and_then(ParsedElement::as_str) {
            Some(text) => {
                tags.insert(text.to_string());
            }
            None => {
                return Err(InvalidTagArgumentError::new(format!(
                    "tag arguments type must be string, got {}",
                    arg.type_name()
                ))
                .into())
            }
        }
    }

    match &mut sweep_value {
        OverrideValue::ChoiceSweep(s) => *s.tags_mut() = tags,
        OverrideValue::RangeSweep(s) => *s.tags_mut() = tags,
        OverrideValue::IntervalSweep(s) => *s.tags_mut() = tags,
        other => {
            return Err(InvalidTagArgumentError::new(format!(
                "Last argument to tag() must be a choice(), range() or interval(), got {}",
                other.type_name()
            ))
            .into())
        }
    }
    Ok(sweep_value)
}

/// Shuffle a list eagerly or mark a sweep for shuffled enumeration
pub fn shuffle(
    args: Vec<OverrideValue>,
    sweep: Option<OverrideValue>,
    list: Option<Vec<ParsedElement>>,
) -> GrammarResult<OverrideValue> {
    shuffle_with_rng(args, sweep, list, &mut rand::rng())
}

/// Shuffle with a caller-provided random source
pub fn shuffle_with_rng<R: Rng + ?Sized>(
    mut args: Vec<OverrideValue>,
    sweep: Option<OverrideValue>,
    list: Option<Vec<ParsedElement>>,
    rng: &mut R,
) -> GrammarResult<OverrideValue> {
    if let Some(mut items) = list {
        items.shuffle(rng);
        return Ok(OverrideValue::Element(ParsedElement::List(items)));
    }
    if let Some(sweep) = sweep {
        return shuffle_sweep(sweep);
    }
    match args.len() {
        0 => Err(InvalidSortShuffleArgumentError::new("empty shuffle input").into()),
        1 => match args.remove(0) {
            arg @ (OverrideValue::ChoiceSweep(_) | OverrideValue::RangeSweep(_)) => {
                shuffle_sweep(arg)
            }
            OverrideValue::Element(ParsedElement::List(mut items)) => {
                items.shuffle(rng);
                Ok(OverrideValue::Element(ParsedElement::List(items)))
            }
            OverrideValue::Element(elem) => {
                Ok(OverrideValue::Element(ParsedElement::List(vec![elem])))
            }
            other => Err(InvalidSortShuffleArgumentError::new(format!(
                "shuffle() of a {} is not supported",
                other.type_name()
            ))
            .into()),
        },
        _ => {
            elements_only("shuffle", &args)?;
            let mut sweep = list_to_simple_choice(args)?;
            sweep.shuffle = true;
            Ok(OverrideValue::ChoiceSweep(sweep))
        }
    }
}

fn shuffle_sweep(sweep: OverrideValue) -> GrammarResult<OverrideValue> {
    match sweep {
        OverrideValue::ChoiceSweep(mut s) => {
            s.shuffle = true;
            Ok(OverrideValue::ChoiceSweep(s))
        }
        OverrideValue::RangeSweep(mut s) => {
            s.shuffle = true;
            Ok(OverrideValue::RangeSweep(s))
        }
        other => Err(InvalidSortShuffleArgumentError::new(format!(
            "shuffle() of a {} is not supported",
            other.type_name()
        ))
        .into()),
    }
}

/// Sort a list or a choice sweep's values, or flip a range's direction.
///
/// Sorting a range never materializes it; the endpoints and step are
/// rewritten so the returned range enumerates the same values in the
/// requested order.
pub fn sort(
    mut args: Vec<OverrideValue>,
    sweep: Option<OverrideValue>,
    list: Option<Vec<ParsedElement>>,
    reverse: bool,
) -> GrammarResult<OverrideValue> {
    if let Some(items) = list {
        let items = sort_elements(items, reverse)?;
        return Ok(OverrideValue::Element(ParsedElement::List(items)));
    }
    if let Some(sweep) = sweep {
        return sort_sweep(sweep, reverse);
    }
    match args.len() {
        0 => Err(InvalidSortShuffleArgumentError::new("empty sort input").into()),
        1 => match args.remove(0) {
            arg @ (OverrideValue::ChoiceSweep(_) | OverrideValue::RangeSweep(_)) => {
                sort_sweep(arg, reverse)
            }
            OverrideValue::Element(ParsedElement::List(items)) => {
                let items = sort_elements(items, reverse)?;
                Ok(OverrideValue::Element(ParsedElement::List(items)))
            }
            OverrideValue::Element(elem) => Err(InvalidSortShuffleArgumentError::new(format!(
                "Invalid arguments: {}",
                element_to_source(&elem)
            ))
            .into()),
            other => Err(InvalidSortShuffleArgumentError::new(format!(
                "sort() of a {} is not supported",
                other.type_name()
            ))
            .into()),
        },
        _ => {
            elements_only("sort", &args)?;
            let sweep = list_to_simple_choice(args)?;
            sort_sweep(OverrideValue::ChoiceSweep(sweep), reverse)
        }
    }
}

fn sort_sweep(sweep: OverrideValue, reverse: bool) -> GrammarResult<OverrideValue> {
    match sweep {
        OverrideValue::ChoiceSweep(sweep) => {
            let ChoiceSweep {
                tags,
                list,
                simple_form,
                shuffle,
            } = sweep;
            let list = sort_elements(list, reverse)?;
            Ok(OverrideValue::ChoiceSweep(ChoiceSweep {
                tags,
                list,
                simple_form,
                shuffle,
            }))
        }
        OverrideValue::RangeSweep(sweep) => Ok(OverrideValue::RangeSweep(sort_range(sweep, reverse))),
        other => Err(InvalidSortShuffleArgumentError::new(format!(
            "sort() of a {} is not supported",
            other.type_name()
        ))
        .into()),
    }
}

/// Reorient a range without changing its value set. Flipping direction
/// swaps the endpoint roles and shifts both by `abs(step)` so the
/// exclusive bound lands on the correct side.
fn sort_range(mut sweep: RangeSweep, reverse: bool) -> RangeSweep {
    if !reverse {
        if sweep.start.as_f64() > sweep.stop.as_f64() {
            let shift = sweep.step.abs();
            let start = sweep.stop.add(shift);
            let stop = sweep.start.add(shift);
            sweep.start = start;
            sweep.stop = stop;
            sweep.step = sweep.step.neg();
        }
    } else if sweep.start.as_f64() < sweep.stop.as_f64() {
        let shift = sweep.step.abs();
        let start = sweep.stop.sub(shift);
        let stop = sweep.start.sub(shift);
        sweep.start = start;
        sweep.stop = stop;
        sweep.step = sweep.step.neg();
    }
    sweep
}

enum SortKey {
    Num(f64),
    Text(String),
}

fn sort_key(elem: &ParsedElement) -> GrammarResult<SortKey> {
    match elem {
        ParsedElement::Int(i) => Ok(SortKey::Num(*i as f64)),
        ParsedElement::Float(f) => Ok(SortKey::Num(*f)),
        ParsedElement::Bool(b) => Ok(SortKey::Num(if *b { 1.0 } else { 0.0 })),
        ParsedElement::String(s) => Ok(SortKey::Text(s.clone())),
        ParsedElement::QuotedString(qs) => Ok(SortKey::Text(qs.text.clone())),
        other => Err(InvalidSortShuffleArgumentError::new(format!(
            "sort() does not support {} elements",
            other.type_name()
        ))
        .into()),
    }
}

fn compare_keys(a: &SortKey, b: &SortKey) -> Option<Ordering> {
    match (a, b) {
        (SortKey::Num(x), SortKey::Num(y)) => Some(x.total_cmp(y)),
        (SortKey::Text(x), SortKey::Text(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn sort_elements(items: Vec<ParsedElement>, reverse: bool) -> GrammarResult<Vec<ParsedElement>> {
    let mut keyed = Vec::with_capacity(items.len());
    for elem in items {
        keyed.push((sort_key(&elem)?, elem));
    }
    // any mixed-class input has an adjacent mixed pair
    for pair in keyed.windows(2) {
        if compare_keys(&pair[0].0, &pair[1].0).is_none() {
            return Err(InvalidSortShuffleArgumentError::new(
                "sort() cannot compare a string with a number",
            )
            .into());
        }
    }
    keyed.sort_by(|a, b| {
        let ord = compare_keys(&a.0, &b.0).unwrap_or(Ordering::Equal);
        if reverse {
            ord.reverse()
        } else {
            ord
        }
    });
    Ok(keyed.into_iter().map(|(_, elem)| elem).collect())
}

fn elements_only(function: &str, args: &[OverrideValue]) -> GrammarResult<()> {
    for arg in args {
        if arg.as_element().is_none() {
            return Err(InvalidSortShuffleArgumentError::new(format!(
                "{}() arguments must all be primitives, got {}",
                function,
                arg.type_name()
            ))
            .into());
        }
    }
    Ok(())
}

/// Collapse positional element arguments into a simple-form choice sweep
pub(crate) fn list_to_simple_choice(args: Vec<OverrideValue>) -> GrammarResult<ChoiceSweep> {
    let mut list = Vec::with_capacity(args.len());
    for arg in args {
        match arg {
            OverrideValue::Element(elem) => list.push(elem),
            other => {
                return Err(ArgumentShapeError::new(format!(
                    "cannot build a choice sweep from a {}",
                    other.type_name()
                ))
                .into())
            }
        }
    }
    Ok(ChoiceSweep::simple(list))
}
