// Copyright (c) Facebook, Inc. and its affiliates. All Rights Reserved
//! Function-call binding and dispatch for the sweep grammar.

use rand::Rng;

use crate::core::{FunctionCall, Number, OverrideValue, ParsedElement};
use crate::errors::{ArgumentShapeError, GrammarError, GrammarResult, UnknownFunctionError};

use super::cast::{cast_bool, cast_float, cast_int, cast_str};
use super::functions::{choice, glob, interval, range, shuffle_with_rng, sort, tag};
use super::utils::is_element_type;

const FUNCTION_NAMES: [&str; 11] = [
    "bool", "choice", "float", "glob", "int", "interval", "range", "shuffle", "sort", "str", "tag",
];

/// Evaluator for the closed set of grammar functions.
///
/// Binds a [`FunctionCall`]'s positional and keyword arguments to the
/// named function's signature, then invokes it.
#[derive(Clone, Debug, Default)]
pub struct Functions;

impl Functions {
    pub fn new() -> Self {
        Functions
    }

    /// The available function names, sorted
    pub fn names(&self) -> &'static [&'static str] {
        &FUNCTION_NAMES
    }

    /// Evaluate a call with the thread-local random source
    pub fn eval(&self, call: &FunctionCall) -> GrammarResult<OverrideValue> {
        self.eval_with_rng(call, &mut rand::rng())
    }

    /// Evaluate a call, threading the given random source into `shuffle`
    pub fn eval_with_rng<R: Rng + ?Sized>(
        &self,
        call: &FunctionCall,
        rng: &mut R,
    ) -> GrammarResult<OverrideValue> {
        let args: Vec<OverrideValue> = call.args.iter().cloned().map(unquote).collect();
        let kwargs: Vec<(String, OverrideValue)> = call
            .kwargs
            .iter()
            .map(|(key, value)| (key.clone(), unquote(value.clone())))
            .collect();

        match call.name.as_str() {
            "int" => {
                let (args, value) = bind_cast("int", args, kwargs)?;
                cast_int(args, value)
            }
            "float" => {
                let (args, value) = bind_cast("float", args, kwargs)?;
                cast_float(args, value)
            }
            "str" => {
                let (args, value) = bind_cast("str", args, kwargs)?;
                cast_str(args, value)
            }
            "bool" => {
                let (args, value) = bind_cast("bool", args, kwargs)?;
                cast_bool(args, value)
            }
            "choice" => {
                no_kwargs("choice", &kwargs)?;
                choice(args)
            }
            "range" => {
                let (start, stop, step) = bind_range(args, kwargs)?;
                Ok(OverrideValue::RangeSweep(range(start, stop, step)))
            }
            "interval" => {
                let (start, end) = bind_interval(args, kwargs)?;
                Ok(OverrideValue::IntervalSweep(interval(start, end)))
            }
            "tag" => {
                let (args, sweep) = bind_tag(args, kwargs)?;
                tag(args, sweep)
            }
            "shuffle" => {
                let (args, sweep, list) = bind_shuffle(args, kwargs)?;
                shuffle_with_rng(args, sweep, list, rng)
            }
            "sort" => {
                let (args, sweep, list, reverse) = bind_sort(args, kwargs)?;
                sort(args, sweep, list, reverse)
            }
            "glob" => {
                let (include, exclude) = bind_glob(args, kwargs)?;
                Ok(OverrideValue::Glob(glob(include, exclude)?))
            }
            name => Err(UnknownFunctionError::new(format!(
                "Unknown function '{}'\nAvailable: {}",
                name,
                FUNCTION_NAMES.join(",")
            ))
            .into()),
        }
    }
}

/// Top-level quoted strings are passed to functions as plain strings;
/// quoting only survives nested inside lists and dicts.
fn unquote(value: OverrideValue) -> OverrideValue {
    match value {
        OverrideValue::Element(ParsedElement::QuotedString(qs)) => {
            OverrideValue::Element(ParsedElement::String(qs.text))
        }
        other => other,
    }
}

fn shape(function: &str, message: impl Into<String>) -> GrammarError {
    ArgumentShapeError::new(message).with_function(function).into()
}

fn mismatch(function: &str, argument: &str, got: &str, expected: &str) -> GrammarError {
    ArgumentShapeError::new(format!(
        "mismatch type argument {}: {} is incompatible with {}",
        argument, got, expected
    ))
    .with_function(function)
    .into()
}

/// Bind positional-or-keyword parameters in declaration order
fn bind_fields(
    function: &str,
    params: &mut [(&'static str, Option<OverrideValue>)],
    args: Vec<OverrideValue>,
    kwargs: Vec<(String, OverrideValue)>,
) -> GrammarResult<()> {
    if args.len() > params.len() {
        return Err(shape(function, "too many positional arguments"));
    }
    for (slot, arg) in params.iter_mut().zip(args) {
        slot.1 = Some(arg);
    }
    for (key, value) in kwargs {
        match params.iter_mut().find(|(name, _)| *name == key) {
            Some(slot) => {
                if slot.1.is_some() {
                    return Err(shape(
                        function,
                        format!("multiple values for argument '{}'", key),
                    ));
                }
                slot.1 = Some(value);
            }
            None => {
                return Err(shape(
                    function,
                    format!("got an unexpected keyword argument '{}'", key),
                ))
            }
        }
    }
    Ok(())
}

fn no_kwargs(function: &str, kwargs: &[(String, OverrideValue)]) -> GrammarResult<()> {
    match kwargs.first() {
        Some((key, _)) => Err(shape(
            function,
            format!("got an unexpected keyword argument '{}'", key),
        )),
        None => Ok(()),
    }
}

fn bind_cast(
    function: &str,
    args: Vec<OverrideValue>,
    kwargs: Vec<(String, OverrideValue)>,
) -> GrammarResult<(Vec<OverrideValue>, Option<OverrideValue>)> {
    let mut value = None;
    for (key, kwarg_value) in kwargs {
        if key != "value" {
            return Err(shape(
                function,
                format!("got an unexpected keyword argument '{}'", key),
            ));
        }
        if value.is_some() {
            return Err(shape(function, "multiple values for argument 'value'"));
        }
        value = Some(kwarg_value);
    }
    Ok((args, value))
}

fn bind_range(
    args: Vec<OverrideValue>,
    kwargs: Vec<(String, OverrideValue)>,
) -> GrammarResult<(Number, Number, Number)> {
    let mut params = [("start", None), ("stop", None), ("step", None)];
    bind_fields("range", &mut params, args, kwargs)?;
    let [(_, start), (_, stop), (_, step)] = params;
    let start = require_number("range", "start", start)?;
    let stop = require_number("range", "stop", stop)?;
    let step = match step {
        Some(value) => to_number("range", "step", value)?,
        None => Number::Int(1),
    };
    Ok((start, stop, step))
}

fn bind_interval(
    args: Vec<OverrideValue>,
    kwargs: Vec<(String, OverrideValue)>,
) -> GrammarResult<(f64, f64)> {
    let mut params = [("start", None), ("end", None)];
    bind_fields("interval", &mut params, args, kwargs)?;
    let [(_, start), (_, end)] = params;
    let start = require_number("interval", "start", start)?;
    let end = require_number("interval", "end", end)?;
    Ok((start.as_f64(), end.as_f64()))
}

fn bind_glob(
    args: Vec<OverrideValue>,
    kwargs: Vec<(String, OverrideValue)>,
) -> GrammarResult<(ParsedElement, Option<ParsedElement>)> {
    let mut params = [("include", None), ("exclude", None)];
    bind_fields("glob", &mut params, args, kwargs)?;
    let [(_, include), (_, exclude)] = params;
    let include = match include {
        Some(value) => require_patterns("include", value)?,
        None => return Err(shape("glob", "missing a required argument: 'include'")),
    };
    let exclude = match exclude {
        Some(value) => Some(require_patterns("exclude", value)?),
        None => None,
    };
    Ok((include, exclude))
}

fn require_patterns(name: &str, value: OverrideValue) -> GrammarResult<ParsedElement> {
    match value {
        OverrideValue::Element(elem) => Ok(elem),
        other => Err(mismatch(
            "glob",
            name,
            other.type_name(),
            "a string or list of strings",
        )),
    }
}

fn bind_tag(
    args: Vec<OverrideValue>,
    kwargs: Vec<(String, OverrideValue)>,
) -> GrammarResult<(Vec<OverrideValue>, Option<OverrideValue>)> {
    let mut sweep = None;
    for (key, value) in kwargs {
        if key != "sweep" {
            return Err(shape(
                "tag",
                format!("got an unexpected keyword argument '{}'", key),
            ));
        }
        if sweep.is_some() {
            return Err(shape("tag", "multiple values for argument 'sweep'"));
        }
        if !is_sweep_value(&value) {
            return Err(mismatch("tag", "sweep", value.type_name(), "a sweep"));
        }
        sweep = Some(value);
    }
    for (idx, arg) in args.iter().enumerate() {
        let tag_like =
            matches!(arg, OverrideValue::Element(ParsedElement::String(_))) || is_sweep_value(arg);
        if !tag_like {
            return Err(mismatch(
                "tag",
                &format!("args[{}]", idx),
                arg.type_name(),
                "str or Sweep",
            ));
        }
    }
    Ok((args, sweep))
}

fn bind_shuffle(
    args: Vec<OverrideValue>,
    kwargs: Vec<(String, OverrideValue)>,
) -> GrammarResult<(Vec<OverrideValue>, Option<OverrideValue>, Option<Vec<ParsedElement>>)> {
    let mut sweep = None;
    let mut list = None;
    for (key, value) in kwargs {
        match key.as_str() {
            "sweep" => set_sweep_kwarg("shuffle", &mut sweep, value)?,
            "list" => set_list_kwarg("shuffle", &mut list, value)?,
            _ => {
                return Err(shape(
                    "shuffle",
                    format!("got an unexpected keyword argument '{}'", key),
                ))
            }
        }
    }
    for (idx, arg) in args.iter().enumerate() {
        let shuffleable = is_element_type(arg)
            || matches!(arg, OverrideValue::ChoiceSweep(_) | OverrideValue::RangeSweep(_));
        if !shuffleable {
            return Err(mismatch(
                "shuffle",
                &format!("args[{}]", idx),
                arg.type_name(),
                "an element, ChoiceSweep or RangeSweep",
            ));
        }
    }
    Ok((args, sweep, list))
}

fn bind_sort(
    args: Vec<OverrideValue>,
    kwargs: Vec<(String, OverrideValue)>,
) -> GrammarResult<(
    Vec<OverrideValue>,
    Option<OverrideValue>,
    Option<Vec<ParsedElement>>,
    bool,
)> {
    let mut sweep = None;
    let mut list = None;
    let mut reverse = None;
    for (key, value) in kwargs {
        match key.as_str() {
            "sweep" => set_sweep_kwarg("sort", &mut sweep, value)?,
            "list" => set_list_kwarg("sort", &mut list, value)?,
            "reverse" => {
                if reverse.is_some() {
                    return Err(shape("sort", "multiple values for argument 'reverse'"));
                }
                match value {
                    OverrideValue::Element(ParsedElement::Bool(b)) => reverse = Some(b),
                    other => return Err(mismatch("sort", "reverse", other.type_name(), "bool")),
                }
            }
            _ => {
                return Err(shape(
                    "sort",
                    format!("got an unexpected keyword argument '{}'", key),
                ))
            }
        }
    }
    for (idx, arg) in args.iter().enumerate() {
        let sortable = is_element_type(arg)
            || matches!(arg, OverrideValue::ChoiceSweep(_) | OverrideValue::RangeSweep(_));
        if !sortable {
            return Err(mismatch(
                "sort",
                &format!("args[{}]", idx),
                arg.type_name(),
                "an element, ChoiceSweep or RangeSweep",
            ));
        }
    }
    Ok((args, sweep, list, reverse.unwrap_or(false)))
}

// globs are sweep-like for expansion purposes but are not taggable
fn is_sweep_value(value: &OverrideValue) -> bool {
    matches!(
        value,
        OverrideValue::ChoiceSweep(_)
            | OverrideValue::RangeSweep(_)
            | OverrideValue::IntervalSweep(_)
    )
}

fn set_sweep_kwarg(
    function: &str,
    slot: &mut Option<OverrideValue>,
    value: OverrideValue,
) -> GrammarResult<()> {
    if slot.is_some() {
        return Err(shape(function, "multiple values for argument 'sweep'"));
    }
    if !matches!(
        value,
        OverrideValue::ChoiceSweep(_) | OverrideValue::RangeSweep(_)
    ) {
        return Err(mismatch(
            function,
            "sweep",
            value.type_name(),
            "ChoiceSweep or RangeSweep",
        ));
    }
    *slot = Some(value);
    Ok(())
}

fn set_list_kwarg(
    function: &str,
    slot: &mut Option<Vec<ParsedElement>>,
    value: OverrideValue,
) -> GrammarResult<()> {
    if slot.is_some() {
        return Err(shape(function, "multiple values for argument 'list'"));
    }
    match value {
        OverrideValue::Element(ParsedElement::List(items)) => {
            *slot = Some(items);
            Ok(())
        }
        other => Err(mismatch(function, "list", other.type_name(), "list")),
    }
}

fn require_number(function: &str, name: &str, value: Option<OverrideValue>) -> GrammarResult<Number> {
    match value {
        Some(value) => to_number(function, name, value),
        None => Err(shape(
            function,
            format!("missing a required argument: '{}'", name),
        )),
    }
}

fn to_number(function: &str, name: &str, value: OverrideValue) -> GrammarResult<Number> {
    match value {
        OverrideValue::Element(ParsedElement::Int(i)) => Ok(Number::Int(i)),
        OverrideValue::Element(ParsedElement::Float(f)) => Ok(Number::Float(f)),
        other => Err(mismatch(function, name, other.type_name(), "number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ChoiceSweep, QuotedString, RangeSweep};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn eval(call: FunctionCall) -> GrammarResult<OverrideValue> {
        Functions::new().eval(&call)
    }

    fn int_list(values: &[i64]) -> Vec<ParsedElement> {
        values.iter().map(|v| ParsedElement::Int(*v)).collect()
    }

    #[test]
    fn test_eval_casts() {
        let result = eval(FunctionCall::new("int").with_arg("10")).unwrap();
        assert_eq!(result, OverrideValue::from(10));

        let result = eval(FunctionCall::new("bool").with_kwarg("value", "TRUE")).unwrap();
        assert_eq!(result, OverrideValue::from(true));
    }

    #[test]
    fn test_eval_choice() {
        let result = eval(
            FunctionCall::new("choice")
                .with_arg("a")
                .with_arg("b"),
        )
        .unwrap();
        match result {
            OverrideValue::ChoiceSweep(cs) => {
                assert_eq!(cs.list.len(), 2);
                assert!(!cs.simple_form);
            }
            _ => panic!("Expected choice sweep"),
        }
    }

    #[test]
    fn test_eval_range_binding() {
        let positional = eval(
            FunctionCall::new("range")
                .with_arg(1)
                .with_arg(10)
                .with_arg(2),
        )
        .unwrap();
        assert_eq!(
            positional,
            OverrideValue::RangeSweep(RangeSweep::new(1, 10, 2))
        );

        let keyword = eval(
            FunctionCall::new("range")
                .with_arg(1)
                .with_kwarg("stop", 10),
        )
        .unwrap();
        assert_eq!(keyword, OverrideValue::RangeSweep(RangeSweep::new(1, 10, 1)));
    }

    #[test]
    fn test_eval_range_duplicate_argument() {
        let err = eval(
            FunctionCall::new("range")
                .with_arg(1)
                .with_arg(10)
                .with_kwarg("start", 5),
        )
        .unwrap_err();
        assert_eq!(format!("{}", err), "range(): multiple values for argument 'start'");
    }

    #[test]
    fn test_eval_range_missing_argument() {
        let err = eval(FunctionCall::new("range").with_arg(1)).unwrap_err();
        assert_eq!(
            format!("{}", err),
            "range(): missing a required argument: 'stop'"
        );
    }

    #[test]
    fn test_eval_range_type_mismatch() {
        let err = eval(
            FunctionCall::new("range")
                .with_arg("one")
                .with_arg(10),
        )
        .unwrap_err();
        assert_eq!(
            format!("{}", err),
            "range(): mismatch type argument start: str is incompatible with number"
        );
    }

    #[test]
    fn test_eval_interval() {
        let result = eval(
            FunctionCall::new("interval")
                .with_arg(0)
                .with_kwarg("end", 1.5),
        )
        .unwrap();
        match result {
            OverrideValue::IntervalSweep(iv) => {
                assert_eq!(iv.start, 0.0);
                assert_eq!(iv.end, 1.5);
            }
            _ => panic!("Expected interval sweep"),
        }

        let err = eval(
            FunctionCall::new("interval")
                .with_arg(0.0)
                .with_arg(1.0)
                .with_arg(2.0),
        )
        .unwrap_err();
        assert_eq!(format!("{}", err), "interval(): too many positional arguments");
    }

    #[test]
    fn test_eval_unexpected_keyword() {
        let err = eval(
            FunctionCall::new("choice")
                .with_arg(1)
                .with_kwarg("foo", 2),
        )
        .unwrap_err();
        assert_eq!(
            format!("{}", err),
            "choice(): got an unexpected keyword argument 'foo'"
        );
    }

    #[test]
    fn test_eval_unknown_function() {
        let err = eval(FunctionCall::new("max").with_arg(1)).unwrap_err();
        match err {
            GrammarError::UnknownFunctionError(e) => {
                assert_eq!(
                    e.message,
                    "Unknown function 'max'\nAvailable: bool,choice,float,glob,int,interval,range,shuffle,sort,str,tag"
                );
            }
            _ => panic!("Expected UnknownFunctionError"),
        }
    }

    #[test]
    fn test_eval_unquotes_top_level_strings() {
        let quoted = ParsedElement::QuotedString(QuotedString::double("fast".to_string()));
        let result = eval(FunctionCall::new("shuffle").with_arg(quoted)).unwrap();
        assert_eq!(
            result,
            OverrideValue::Element(ParsedElement::List(vec![ParsedElement::String(
                "fast".to_string()
            )]))
        );
    }

    #[test]
    fn test_eval_tag() {
        let result = eval(
            FunctionCall::new("tag")
                .with_arg("a")
                .with_arg("b")
                .with_kwarg("sweep", ChoiceSweep::new(int_list(&[1, 2]))),
        )
        .unwrap();
        match result {
            OverrideValue::ChoiceSweep(cs) => {
                assert!(cs.tags.contains("a"));
                assert!(cs.tags.contains("b"));
            }
            _ => panic!("Expected choice sweep"),
        }
    }

    #[test]
    fn test_eval_tag_rejects_non_string_args_at_binding() {
        let err = eval(
            FunctionCall::new("tag")
                .with_arg(3)
                .with_kwarg("sweep", ChoiceSweep::new(int_list(&[1]))),
        )
        .unwrap_err();
        assert_eq!(
            format!("{}", err),
            "tag(): mismatch type argument args[0]: int is incompatible with str or Sweep"
        );
    }

    #[test]
    fn test_eval_sort_with_reverse() {
        let result = eval(
            FunctionCall::new("sort")
                .with_arg(1)
                .with_arg(3)
                .with_arg(2)
                .with_kwarg("reverse", true),
        )
        .unwrap();
        match result {
            OverrideValue::ChoiceSweep(cs) => {
                assert_eq!(cs.list, int_list(&[3, 2, 1]));
            }
            _ => panic!("Expected choice sweep"),
        }
    }

    #[test]
    fn test_eval_sort_list_keyword() {
        let result = eval(
            FunctionCall::new("sort")
                .with_kwarg("list", ParsedElement::List(int_list(&[3, 1, 2]))),
        )
        .unwrap();
        assert_eq!(
            result,
            OverrideValue::Element(ParsedElement::List(int_list(&[1, 2, 3])))
        );
    }

    #[test]
    fn test_eval_sort_sweep_kwarg_rejects_interval() {
        let err = eval(
            FunctionCall::new("sort")
                .with_kwarg("sweep", crate::core::IntervalSweep::new(0.0, 1.0)),
        )
        .unwrap_err();
        assert_eq!(
            format!("{}", err),
            "sort(): mismatch type argument sweep: IntervalSweep is incompatible with ChoiceSweep or RangeSweep"
        );
    }

    #[test]
    fn test_eval_sort_rejects_non_sortable_arguments() {
        let err = eval(
            FunctionCall::new("sort").with_arg(crate::core::IntervalSweep::new(0.0, 1.0)),
        )
        .unwrap_err();
        assert_eq!(
            format!("{}", err),
            "sort(): mismatch type argument args[0]: IntervalSweep is incompatible with an element, ChoiceSweep or RangeSweep"
        );

        let err = eval(FunctionCall::new("sort").with_arg(ParsedElement::Null)).unwrap_err();
        assert!(matches!(err, GrammarError::ArgumentShapeError(_)));
    }

    #[test]
    fn test_eval_shuffle_is_seed_deterministic() {
        let call = FunctionCall::new("shuffle")
            .with_kwarg("list", ParsedElement::List(int_list(&(0..20).collect::<Vec<i64>>())));
        let functions = Functions::new();
        let mut first = StdRng::seed_from_u64(7);
        let mut second = StdRng::seed_from_u64(7);
        assert_eq!(
            functions.eval_with_rng(&call, &mut first).unwrap(),
            functions.eval_with_rng(&call, &mut second).unwrap()
        );
    }

    #[test]
    fn test_eval_shuffle_rejects_interval_argument() {
        let err = eval(
            FunctionCall::new("shuffle").with_arg(crate::core::IntervalSweep::new(0.0, 1.0)),
        )
        .unwrap_err();
        assert!(matches!(err, GrammarError::ArgumentShapeError(_)));
    }

    #[test]
    fn test_eval_glob() {
        let include = ParsedElement::List(vec![
            ParsedElement::String("*.py".to_string()),
            ParsedElement::String("*.md".to_string()),
        ]);
        let result = eval(
            FunctionCall::new("glob")
                .with_arg(include)
                .with_kwarg("exclude", "test_*"),
        )
        .unwrap();
        match result {
            OverrideValue::Glob(glob) => {
                assert_eq!(glob.include, vec!["*.py".to_string(), "*.md".to_string()]);
                assert_eq!(glob.exclude, vec!["test_*".to_string()]);
            }
            _ => panic!("Expected glob"),
        }
    }

    #[test]
    fn test_eval_names_are_sorted() {
        let functions = Functions::new();
        let mut sorted = functions.names().to_vec();
        sorted.sort_unstable();
        assert_eq!(functions.names(), sorted.as_slice());
    }
}
