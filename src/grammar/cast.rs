// Copyright (c) Facebook, Inc. and its affiliates. All Rights Reserved
//! Casting engine: int/float/str/bool applied across elements and sweeps.

use crate::core::{ChoiceSweep, Number, OverrideValue, ParsedElement, RangeSweep};
use crate::errors::{
    ArgumentShapeError, GrammarResult, InvalidCastValueError, UnsupportedCastError,
};

use super::functions::list_to_simple_choice;
use super::utils::format_float;

/// Target primitive type of a cast
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CastTarget {
    Int,
    Float,
    Str,
    Bool,
}

impl CastTarget {
    /// The grammar-level function name
    pub fn name(&self) -> &'static str {
        match self {
            CastTarget::Int => "int",
            CastTarget::Float => "float",
            CastTarget::Str => "str",
            CastTarget::Bool => "bool",
        }
    }
}

/// Cast to int; positional values and `value=` are mutually exclusive.
pub fn cast_int(args: Vec<OverrideValue>, value: Option<OverrideValue>) -> GrammarResult<OverrideValue> {
    cast_value(CastTarget::Int, normalize_cast_input("int", args, value)?)
}

/// Cast to float; positional values and `value=` are mutually exclusive.
pub fn cast_float(
    args: Vec<OverrideValue>,
    value: Option<OverrideValue>,
) -> GrammarResult<OverrideValue> {
    cast_value(CastTarget::Float, normalize_cast_input("float", args, value)?)
}

/// Cast to str; positional values and `value=` are mutually exclusive.
pub fn cast_str(args: Vec<OverrideValue>, value: Option<OverrideValue>) -> GrammarResult<OverrideValue> {
    cast_value(CastTarget::Str, normalize_cast_input("str", args, value)?)
}

/// Cast to bool; positional values and `value=` are mutually exclusive.
pub fn cast_bool(
    args: Vec<OverrideValue>,
    value: Option<OverrideValue>,
) -> GrammarResult<OverrideValue> {
    cast_value(CastTarget::Bool, normalize_cast_input("bool", args, value)?)
}

/// Resolve the positional-vs-`value=` call shape into the single value to
/// cast. More than one positional value collapses into a simple choice
/// sweep first.
pub(crate) fn normalize_cast_input(
    function: &str,
    mut args: Vec<OverrideValue>,
    value: Option<OverrideValue>,
) -> GrammarResult<OverrideValue> {
    if !args.is_empty() && value.is_some() {
        return Err(ArgumentShapeError::new("cannot use both position and named arguments")
            .with_function(function)
            .into());
    }
    if let Some(value) = value {
        return Ok(value);
    }
    match args.len() {
        0 => Err(ArgumentShapeError::new("No positional args or value specified")
            .with_function(function)
            .into()),
        1 => Ok(args.remove(0)),
        _ => Ok(OverrideValue::ChoiceSweep(list_to_simple_choice(args)?)),
    }
}

/// Apply a cast to any grammar value
pub fn cast_value(target: CastTarget, value: OverrideValue) -> GrammarResult<OverrideValue> {
    match value {
        OverrideValue::Element(elem) => cast_element(target, elem).map(OverrideValue::Element),
        OverrideValue::ChoiceSweep(sweep) => {
            let ChoiceSweep {
                tags,
                list,
                simple_form,
                shuffle,
            } = sweep;
            let list = list
                .into_iter()
                .map(|elem| cast_element(target, elem))
                .collect::<GrammarResult<Vec<_>>>()?;
            Ok(OverrideValue::ChoiceSweep(ChoiceSweep {
                tags,
                list,
                simple_form,
                shuffle,
            }))
        }
        OverrideValue::RangeSweep(sweep) => cast_range(target, sweep).map(OverrideValue::RangeSweep),
        OverrideValue::IntervalSweep(_) => Err(UnsupportedCastError::new(
            "Intervals are always interpreted as floating-point intervals and cannot be cast",
        )
        .into()),
        OverrideValue::Glob(_) => Err(InvalidCastValueError::new(format!(
            "glob patterns cannot be cast to {}",
            target.name()
        ))
        .into()),
    }
}

/// Apply a cast to one element, recursing through containers
pub(crate) fn cast_element(target: CastTarget, elem: ParsedElement) -> GrammarResult<ParsedElement> {
    match elem {
        ParsedElement::QuotedString(qs) => cast_element(target, ParsedElement::String(qs.text)),
        ParsedElement::Dict(entries) => {
            let entries = entries
                .into_iter()
                .map(|(k, v)| cast_element(target, v).map(|cv| (k, cv)))
                .collect::<GrammarResult<Vec<_>>>()?;
            Ok(ParsedElement::Dict(entries))
        }
        ParsedElement::List(items) => {
            let items = items
                .into_iter()
                .map(|item| cast_element(target, item))
                .collect::<GrammarResult<Vec<_>>>()?;
            Ok(ParsedElement::List(items))
        }
        ParsedElement::Null => Err(InvalidCastValueError::new(format!(
            "null value cannot be cast to {}",
            target.name()
        ))
        .into()),
        scalar => cast_scalar(target, scalar),
    }
}

fn cast_scalar(target: CastTarget, elem: ParsedElement) -> GrammarResult<ParsedElement> {
    match target {
        CastTarget::Int => match elem {
            ParsedElement::Int(i) => Ok(ParsedElement::Int(i)),
            ParsedElement::Float(f) => {
                if f.is_nan() {
                    Err(InvalidCastValueError::new("cannot convert float NaN to integer").into())
                } else if f.is_infinite() {
                    Err(
                        InvalidCastValueError::new("cannot convert float infinity to integer")
                            .into(),
                    )
                } else {
                    Ok(ParsedElement::Int(f as i64))
                }
            }
            ParsedElement::Bool(b) => Ok(ParsedElement::Int(if b { 1 } else { 0 })),
            ParsedElement::String(s) => match s.parse::<i64>() {
                Ok(i) => Ok(ParsedElement::Int(i)),
                Err(_) => Err(InvalidCastValueError::new(format!(
                    "invalid literal for int() with base 10: '{}'",
                    s
                ))
                .into()),
            },
            _ => unreachable_scalar(target, &elem),
        },
        CastTarget::Float => match elem {
            ParsedElement::Int(i) => Ok(ParsedElement::Float(i as f64)),
            ParsedElement::Float(f) => Ok(ParsedElement::Float(f)),
            ParsedElement::Bool(b) => Ok(ParsedElement::Float(if b { 1.0 } else { 0.0 })),
            ParsedElement::String(s) => match s.parse::<f64>() {
                Ok(f) => Ok(ParsedElement::Float(f)),
                Err(_) => Err(InvalidCastValueError::new(format!(
                    "could not convert string to float: '{}'",
                    s
                ))
                .into()),
            },
            _ => unreachable_scalar(target, &elem),
        },
        CastTarget::Str => match elem {
            ParsedElement::Int(i) => Ok(ParsedElement::String(i.to_string())),
            ParsedElement::Float(f) => Ok(ParsedElement::String(format_float(f))),
            ParsedElement::Bool(b) => Ok(ParsedElement::String(
                if b { "true" } else { "false" }.to_string(),
            )),
            ParsedElement::String(s) => Ok(ParsedElement::String(s)),
            _ => unreachable_scalar(target, &elem),
        },
        CastTarget::Bool => match elem {
            ParsedElement::Bool(b) => Ok(ParsedElement::Bool(b)),
            ParsedElement::Int(i) => Ok(ParsedElement::Bool(i != 0)),
            ParsedElement::Float(f) => Ok(ParsedElement::Bool(f != 0.0)),
            ParsedElement::String(s) => {
                if s.eq_ignore_ascii_case("true") {
                    Ok(ParsedElement::Bool(true))
                } else if s.eq_ignore_ascii_case("false") {
                    Ok(ParsedElement::Bool(false))
                } else {
                    Err(InvalidCastValueError::new(format!("Cannot cast '{}' to bool", s)).into())
                }
            }
            _ => unreachable_scalar(target, &elem),
        },
    }
}

// cast_element strips containers, quotes and nulls before dispatching here
fn unreachable_scalar(target: CastTarget, elem: &ParsedElement) -> GrammarResult<ParsedElement> {
    Err(InvalidCastValueError::new(format!(
        "{} value cannot be cast to {}",
        elem.type_name(),
        target.name()
    ))
    .into())
}

fn cast_range(target: CastTarget, sweep: RangeSweep) -> GrammarResult<RangeSweep> {
    match target {
        CastTarget::Int => Ok(RangeSweep {
            start: number_to_int(sweep.start)?,
            stop: number_to_int(sweep.stop)?,
            step: number_to_int(sweep.step)?,
            tags: sweep.tags,
            shuffle: sweep.shuffle,
        }),
        CastTarget::Float => Ok(RangeSweep {
            start: Number::Float(sweep.start.as_f64()),
            stop: Number::Float(sweep.stop.as_f64()),
            step: Number::Float(sweep.step.as_f64()),
            tags: sweep.tags,
            shuffle: sweep.shuffle,
        }),
        CastTarget::Str | CastTarget::Bool => {
            Err(UnsupportedCastError::new("Range can only be cast to int or float").into())
        }
    }
}

fn number_to_int(n: Number) -> GrammarResult<Number> {
    match n {
        Number::Int(_) => Ok(n),
        Number::Float(f) => {
            if f.is_nan() {
                Err(InvalidCastValueError::new("cannot convert float NaN to integer").into())
            } else if f.is_infinite() {
                Err(InvalidCastValueError::new("cannot convert float infinity to integer").into())
            } else {
                Ok(Number::Int(f as i64))
            }
        }
    }
}
