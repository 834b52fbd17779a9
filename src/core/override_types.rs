// Copyright (c) Facebook, Inc. and its affiliates. All Rights Reserved
//! Value model for the sweep override grammar.

use std::collections::HashSet;

use crate::errors::{GrammarResult, NonEnumerableSweepError};
use crate::glob::Glob;

/// Quote style for quoted strings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Quote {
    Single = 0,
    Double = 1,
}

impl Quote {
    /// Get the quote character
    pub fn char(&self) -> char {
        match self {
            Quote::Single => '\'',
            Quote::Double => '"',
        }
    }
}

/// A quoted string with its quote style preserved
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuotedString {
    pub text: String,
    pub quote: Quote,
}

impl QuotedString {
    /// Create a new QuotedString
    pub fn new(text: String, quote: Quote) -> Self {
        Self { text, quote }
    }

    /// Create a single-quoted string
    pub fn single(text: String) -> Self {
        Self::new(text, Quote::Single)
    }

    /// Create a double-quoted string
    pub fn double(text: String) -> Self {
        Self::new(text, Quote::Double)
    }

    /// Return the string with quotes
    pub fn with_quotes(&self) -> String {
        let qc = self.quote.char();
        let esc_qc = format!("\\{}", qc);
        let escaped = self.text.replace(qc, &esc_qc);
        format!("{}{}{}", qc, escaped, qc)
    }
}

/// An int-or-float number, as used by range endpoints and steps.
///
/// An all-integer range enumerates integers and a range with any float
/// field enumerates floats, so the two kinds must stay distinct through
/// casts and reversal arithmetic.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Get the numeric value as f64
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }

    /// Check if this is the integer kind
    pub fn is_int(&self) -> bool {
        matches!(self, Number::Int(_))
    }

    /// Absolute value, kind preserved; integers saturate at `i64::MAX`
    pub fn abs(&self) -> Number {
        match self {
            Number::Int(i) => Number::Int(i.saturating_abs()),
            Number::Float(f) => Number::Float(f.abs()),
        }
    }

    /// Negation, kind preserved; integers saturate at `i64::MAX`
    pub fn neg(&self) -> Number {
        match self {
            Number::Int(i) => Number::Int(i.saturating_neg()),
            Number::Float(f) => Number::Float(-f),
        }
    }

    /// Addition; two ints stay int (saturating), any float makes the
    /// result float
    pub fn add(&self, other: Number) -> Number {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Number::Int(a.saturating_add(b)),
            _ => Number::Float(self.as_f64() + other.as_f64()),
        }
    }

    /// Subtraction; two ints stay int (saturating), any float makes the
    /// result float
    pub fn sub(&self, other: Number) -> Number {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Number::Int(a.saturating_sub(b)),
            _ => Number::Float(self.as_f64() - other.as_f64()),
        }
    }
}

impl From<i64> for Number {
    fn from(i: i64) -> Self {
        Number::Int(i)
    }
}

impl From<f64> for Number {
    fn from(f: f64) -> Self {
        Number::Float(f)
    }
}

impl From<Number> for ParsedElement {
    fn from(n: Number) -> Self {
        match n {
            Number::Int(i) => ParsedElement::Int(i),
            Number::Float(f) => ParsedElement::Float(f),
        }
    }
}

/// Type of value produced by grammar evaluation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ValueType {
    Element = 1,
    ChoiceSweep = 2,
    GlobChoiceSweep = 3,
    SimpleChoiceSweep = 4,
    RangeSweep = 5,
    IntervalSweep = 6,
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueType::Element => write!(f, "ELEMENT"),
            ValueType::ChoiceSweep => write!(f, "CHOICE_SWEEP"),
            ValueType::GlobChoiceSweep => write!(f, "GLOB_CHOICE_SWEEP"),
            ValueType::SimpleChoiceSweep => write!(f, "SIMPLE_CHOICE_SWEEP"),
            ValueType::RangeSweep => write!(f, "RANGE_SWEEP"),
            ValueType::IntervalSweep => write!(f, "INTERVAL_SWEEP"),
        }
    }
}

/// Base trait for sweep types
pub trait Sweep {
    fn tags(&self) -> &HashSet<String>;
    fn tags_mut(&mut self) -> &mut HashSet<String>;
}

/// A choice sweep (e.g., "db=mysql,postgresql" or "db=choice(mysql,postgresql)")
#[derive(Clone, Debug, PartialEq)]
pub struct ChoiceSweep {
    pub tags: HashSet<String>,
    pub list: Vec<ParsedElement>,
    pub simple_form: bool,
    pub shuffle: bool,
}

impl Default for ChoiceSweep {
    fn default() -> Self {
        Self {
            tags: HashSet::new(),
            list: Vec::new(),
            simple_form: false,
            shuffle: false,
        }
    }
}

impl ChoiceSweep {
    /// Create an explicit-form choice sweep
    pub fn new(list: Vec<ParsedElement>) -> Self {
        Self {
            list,
            ..Default::default()
        }
    }

    /// Create a simple-form choice sweep (built from bare comma-separated values)
    pub fn simple(list: Vec<ParsedElement>) -> Self {
        Self {
            list,
            simple_form: true,
            ..Default::default()
        }
    }
}

impl Sweep for ChoiceSweep {
    fn tags(&self) -> &HashSet<String> {
        &self.tags
    }

    fn tags_mut(&mut self) -> &mut HashSet<String> {
        &mut self.tags
    }
}

/// A range sweep (e.g., "x=range(1,10)")
#[derive(Clone, Debug, PartialEq)]
pub struct RangeSweep {
    pub tags: HashSet<String>,
    pub start: Number,
    pub stop: Number,
    pub step: Number,
    pub shuffle: bool,
}

impl RangeSweep {
    /// Create a new range sweep
    pub fn new(
        start: impl Into<Number>,
        stop: impl Into<Number>,
        step: impl Into<Number>,
    ) -> Self {
        Self {
            tags: HashSet::new(),
            start: start.into(),
            stop: stop.into(),
            step: step.into(),
            shuffle: false,
        }
    }

    /// Enumerate the progression: start, start+step, ... strictly before stop.
    ///
    /// An all-integer range yields integers, otherwise values are floats.
    /// A zero step cannot be enumerated.
    pub fn values(&self) -> GrammarResult<Vec<Number>> {
        match (self.start, self.stop, self.step) {
            (Number::Int(start), Number::Int(stop), Number::Int(step)) => {
                if step == 0 {
                    return Err(
                        NonEnumerableSweepError::new("range() step must not be zero").into(),
                    );
                }
                let mut out = Vec::new();
                let mut current = start;
                if step > 0 {
                    while current < stop {
                        out.push(Number::Int(current));
                        // overflow means the next value is already past stop
                        match current.checked_add(step) {
                            Some(next) => current = next,
                            None => break,
                        }
                    }
                } else {
                    while current > stop {
                        out.push(Number::Int(current));
                        match current.checked_add(step) {
                            Some(next) => current = next,
                            None => break,
                        }
                    }
                }
                Ok(out)
            }
            _ => {
                let step = self.step.as_f64();
                if step == 0.0 {
                    return Err(
                        NonEnumerableSweepError::new("range() step must not be zero").into(),
                    );
                }
                let stop = self.stop.as_f64();
                let mut out = Vec::new();
                let mut current = self.start.as_f64();
                if step > 0.0 {
                    while current < stop {
                        out.push(Number::Float(current));
                        current += step;
                    }
                } else {
                    while current > stop {
                        out.push(Number::Float(current));
                        current += step;
                    }
                }
                Ok(out)
            }
        }
    }
}

impl Sweep for RangeSweep {
    fn tags(&self) -> &HashSet<String> {
        &self.tags
    }

    fn tags_mut(&mut self) -> &mut HashSet<String> {
        &mut self.tags
    }
}

/// An interval sweep (e.g., "lr=interval(0.0, 1.0)")
///
/// Always floating-point, never enumerable.
#[derive(Clone, Debug, PartialEq)]
pub struct IntervalSweep {
    pub tags: HashSet<String>,
    pub start: f64,
    pub end: f64,
    pub shuffle: bool,
}

impl IntervalSweep {
    /// Create a new interval sweep
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            tags: HashSet::new(),
            start,
            end,
            shuffle: false,
        }
    }
}

impl Sweep for IntervalSweep {
    fn tags(&self) -> &HashSet<String> {
        &self.tags
    }

    fn tags_mut(&mut self) -> &mut HashSet<String> {
        &mut self.tags
    }
}

/// A parsed element value
#[derive(Clone, Debug, PartialEq)]
pub enum ParsedElement {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    QuotedString(QuotedString),
    List(Vec<ParsedElement>),
    Dict(Vec<(String, ParsedElement)>),
}

impl ParsedElement {
    /// Check if the element is null
    pub fn is_null(&self) -> bool {
        matches!(self, ParsedElement::Null)
    }

    /// Try to get as string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParsedElement::String(s) => Some(s),
            ParsedElement::QuotedString(qs) => Some(&qs.text),
            _ => None,
        }
    }

    /// Try to get as i64
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParsedElement::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get as f64
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParsedElement::Float(f) => Some(*f),
            ParsedElement::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParsedElement::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Name of the element's category, as used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ParsedElement::Null => "null",
            ParsedElement::Bool(_) => "bool",
            ParsedElement::Int(_) => "int",
            ParsedElement::Float(_) => "float",
            ParsedElement::String(_) => "str",
            ParsedElement::QuotedString(_) => "QuotedString",
            ParsedElement::List(_) => "list",
            ParsedElement::Dict(_) => "dict",
        }
    }
}

impl From<bool> for ParsedElement {
    fn from(b: bool) -> Self {
        ParsedElement::Bool(b)
    }
}

impl From<i64> for ParsedElement {
    fn from(i: i64) -> Self {
        ParsedElement::Int(i)
    }
}

impl From<f64> for ParsedElement {
    fn from(f: f64) -> Self {
        ParsedElement::Float(f)
    }
}

impl From<&str> for ParsedElement {
    fn from(s: &str) -> Self {
        ParsedElement::String(s.to_string())
    }
}

impl From<String> for ParsedElement {
    fn from(s: String) -> Self {
        ParsedElement::String(s)
    }
}

/// Any value a grammar function can take or return
#[derive(Clone, Debug, PartialEq)]
pub enum OverrideValue {
    Element(ParsedElement),
    ChoiceSweep(ChoiceSweep),
    RangeSweep(RangeSweep),
    IntervalSweep(IntervalSweep),
    Glob(Glob),
}

impl OverrideValue {
    /// Get the value type
    pub fn value_type(&self) -> ValueType {
        match self {
            OverrideValue::Element(_) => ValueType::Element,
            OverrideValue::ChoiceSweep(cs) if cs.simple_form => ValueType::SimpleChoiceSweep,
            OverrideValue::ChoiceSweep(_) => ValueType::ChoiceSweep,
            OverrideValue::RangeSweep(_) => ValueType::RangeSweep,
            OverrideValue::IntervalSweep(_) => ValueType::IntervalSweep,
            OverrideValue::Glob(_) => ValueType::GlobChoiceSweep,
        }
    }

    /// Check if this is a sweep
    pub fn is_sweep(&self) -> bool {
        !matches!(self, OverrideValue::Element(_))
    }

    /// Try to get the inner element
    pub fn as_element(&self) -> Option<&ParsedElement> {
        match self {
            OverrideValue::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Name of the value's category, as used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            OverrideValue::Element(e) => e.type_name(),
            OverrideValue::ChoiceSweep(_) => "ChoiceSweep",
            OverrideValue::RangeSweep(_) => "RangeSweep",
            OverrideValue::IntervalSweep(_) => "IntervalSweep",
            OverrideValue::Glob(_) => "Glob",
        }
    }
}

impl From<ParsedElement> for OverrideValue {
    fn from(e: ParsedElement) -> Self {
        OverrideValue::Element(e)
    }
}

impl From<ChoiceSweep> for OverrideValue {
    fn from(s: ChoiceSweep) -> Self {
        OverrideValue::ChoiceSweep(s)
    }
}

impl From<RangeSweep> for OverrideValue {
    fn from(s: RangeSweep) -> Self {
        OverrideValue::RangeSweep(s)
    }
}

impl From<IntervalSweep> for OverrideValue {
    fn from(s: IntervalSweep) -> Self {
        OverrideValue::IntervalSweep(s)
    }
}

impl From<Glob> for OverrideValue {
    fn from(g: Glob) -> Self {
        OverrideValue::Glob(g)
    }
}

impl From<bool> for OverrideValue {
    fn from(b: bool) -> Self {
        OverrideValue::Element(ParsedElement::Bool(b))
    }
}

impl From<i64> for OverrideValue {
    fn from(i: i64) -> Self {
        OverrideValue::Element(ParsedElement::Int(i))
    }
}

impl From<f64> for OverrideValue {
    fn from(f: f64) -> Self {
        OverrideValue::Element(ParsedElement::Float(f))
    }
}

impl From<&str> for OverrideValue {
    fn from(s: &str) -> Self {
        OverrideValue::Element(ParsedElement::String(s.to_string()))
    }
}

impl From<String> for OverrideValue {
    fn from(s: String) -> Self {
        OverrideValue::Element(ParsedElement::String(s))
    }
}

/// A function call produced by the grammar layer (e.g., "sort(1,3,2,reverse=true)")
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<OverrideValue>,
    pub kwargs: Vec<(String, OverrideValue)>,
}

impl FunctionCall {
    /// Create a call with no arguments
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            kwargs: Vec::new(),
        }
    }

    /// Append a positional argument
    pub fn with_arg(mut self, value: impl Into<OverrideValue>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Append a keyword argument
    pub fn with_kwarg(mut self, name: impl Into<String>, value: impl Into<OverrideValue>) -> Self {
        self.kwargs.push((name.into(), value.into()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_char() {
        assert_eq!(Quote::Single.char(), '\'');
        assert_eq!(Quote::Double.char(), '"');
    }

    #[test]
    fn test_quoted_string_with_quotes() {
        let qs = QuotedString::single("hello".to_string());
        assert_eq!(qs.with_quotes(), "'hello'");

        let qs = QuotedString::double("hello".to_string());
        assert_eq!(qs.with_quotes(), "\"hello\"");

        // Test escaping
        let qs = QuotedString::single("it's".to_string());
        assert_eq!(qs.with_quotes(), "'it\\'s'");
    }

    #[test]
    fn test_number_arithmetic_keeps_kind() {
        let a = Number::Int(3);
        let b = Number::Int(2);
        assert_eq!(a.add(b), Number::Int(5));
        assert_eq!(a.sub(b), Number::Int(1));

        let c = Number::Float(0.5);
        assert_eq!(a.add(c), Number::Float(3.5));
        assert_eq!(Number::Int(-4).abs(), Number::Int(4));
        assert_eq!(Number::Float(-2.5).neg(), Number::Float(2.5));
    }

    #[test]
    fn test_int_and_float_numbers_are_distinct() {
        assert_ne!(Number::Int(1), Number::Float(1.0));
        assert_eq!(Number::Int(1).as_f64(), Number::Float(1.0).as_f64());
    }

    #[test]
    fn test_number_arithmetic_saturates() {
        assert_eq!(Number::Int(i64::MIN).neg(), Number::Int(i64::MAX));
        assert_eq!(Number::Int(i64::MIN).abs(), Number::Int(i64::MAX));
        assert_eq!(
            Number::Int(i64::MAX).add(Number::Int(1)),
            Number::Int(i64::MAX)
        );
        assert_eq!(
            Number::Int(i64::MIN).sub(Number::Int(1)),
            Number::Int(i64::MIN)
        );
    }

    #[test]
    fn test_range_values_int() {
        let sweep = RangeSweep::new(1, 10, 1);
        let values = sweep.values().unwrap();
        assert_eq!(values, (1..10).map(Number::Int).collect::<Vec<_>>());
    }

    #[test]
    fn test_range_values_descending() {
        let sweep = RangeSweep::new(10, 1, -1);
        let values = sweep.values().unwrap();
        assert_eq!(
            values,
            (2..=10).rev().map(Number::Int).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_range_values_float() {
        let sweep = RangeSweep::new(1.0, 2.0, 0.5);
        let values = sweep.values().unwrap();
        assert_eq!(values, vec![Number::Float(1.0), Number::Float(1.5)]);
    }

    #[test]
    fn test_range_values_zero_step() {
        let sweep = RangeSweep::new(1, 10, 0);
        assert!(matches!(
            sweep.values(),
            Err(crate::errors::GrammarError::NonEnumerableSweepError(_))
        ));
    }

    #[test]
    fn test_range_values_at_i64_extremes() {
        let sweep = RangeSweep::new(i64::MAX - 1, i64::MAX, 2);
        assert_eq!(sweep.values().unwrap(), vec![Number::Int(i64::MAX - 1)]);

        let sweep = RangeSweep::new(i64::MIN + 1, i64::MIN, -2);
        assert_eq!(sweep.values().unwrap(), vec![Number::Int(i64::MIN + 1)]);
    }

    #[test]
    fn test_parsed_element_accessors() {
        let elem = ParsedElement::String("hello".to_string());
        assert_eq!(elem.as_str(), Some("hello"));
        assert_eq!(elem.as_int(), None);

        let elem = ParsedElement::Int(42);
        assert_eq!(elem.as_int(), Some(42));
        assert_eq!(elem.as_float(), Some(42.0));

        let elem = ParsedElement::QuotedString(QuotedString::double("db".to_string()));
        assert_eq!(elem.as_str(), Some("db"));
    }

    #[test]
    fn test_element_type_names() {
        assert_eq!(ParsedElement::Null.type_name(), "null");
        assert_eq!(ParsedElement::Int(1).type_name(), "int");
        assert_eq!(ParsedElement::List(vec![]).type_name(), "list");
        assert_eq!(
            OverrideValue::RangeSweep(RangeSweep::new(1, 2, 1)).type_name(),
            "RangeSweep"
        );
    }

    #[test]
    fn test_value_type() {
        let value = OverrideValue::Element(ParsedElement::Int(3306));
        assert_eq!(value.value_type(), ValueType::Element);
        assert!(!value.is_sweep());

        let value = OverrideValue::ChoiceSweep(ChoiceSweep::simple(vec![
            ParsedElement::Int(1),
            ParsedElement::Int(2),
        ]));
        assert_eq!(value.value_type(), ValueType::SimpleChoiceSweep);
        assert!(value.is_sweep());

        let value = OverrideValue::ChoiceSweep(ChoiceSweep::new(vec![ParsedElement::Int(1)]));
        assert_eq!(value.value_type(), ValueType::ChoiceSweep);

        let value = OverrideValue::IntervalSweep(IntervalSweep::new(0.0, 1.0));
        assert_eq!(value.value_type(), ValueType::IntervalSweep);
        assert_eq!(format!("{}", value.value_type()), "INTERVAL_SWEEP");
    }

    #[test]
    fn test_sweep_trait_tags() {
        let mut sweep = ChoiceSweep::new(vec![ParsedElement::Int(1)]);
        assert!(sweep.tags().is_empty());
        sweep.tags_mut().insert("fast".to_string());
        assert!(sweep.tags().contains("fast"));
    }

    #[test]
    fn test_function_call_builder() {
        let call = FunctionCall::new("sort")
            .with_arg(3)
            .with_arg(1)
            .with_kwarg("reverse", true);
        assert_eq!(call.name, "sort");
        assert_eq!(call.args.len(), 2);
        assert_eq!(
            call.kwargs,
            vec![(
                "reverse".to_string(),
                OverrideValue::Element(ParsedElement::Bool(true))
            )]
        );
    }
}
