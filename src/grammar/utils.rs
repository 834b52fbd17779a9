// Copyright (c) Facebook, Inc. and its affiliates. All Rights Reserved
//! Shared grammar helpers: value category checks, escaping, source rendering.

use crate::core::{Number, OverrideValue, ParsedElement};

/// Characters that must be escaped in bare override strings
const ESC_CHARS: &str = "\\()[]{}:=, \t";

/// Check if a character needs escaping in a bare string
pub fn is_special_char(c: char) -> bool {
    ESC_CHARS.contains(c)
}

/// Escape special characters in a bare string so it survives re-parsing
pub fn escape_special_characters(s: &str) -> String {
    if !s.chars().any(is_special_char) {
        return s.to_string();
    }
    let mut result = String::with_capacity(s.len() * 2);
    for c in s.chars() {
        if is_special_char(c) {
            result.push('\\');
        }
        result.push(c);
    }
    result
}

/// Check if the value is a plain element usable inside sweeps and lists
/// (quoted strings and nulls excluded)
pub fn is_element_type(value: &OverrideValue) -> bool {
    match value {
        OverrideValue::Element(e) => !matches!(
            e,
            ParsedElement::Null | ParsedElement::QuotedString(_)
        ),
        _ => false,
    }
}

/// Check if the value is any element, including null and quoted strings
pub fn is_parsed_element_type(value: &OverrideValue) -> bool {
    matches!(value, OverrideValue::Element(_))
}

/// Check if the value can be handed to a cast function
pub fn is_cast_type(value: &OverrideValue) -> bool {
    !matches!(value, OverrideValue::Glob(_))
}

/// Render a float the way override source text spells it: integral values
/// keep a trailing ".0", non-finite values use "nan"/"inf".
pub(crate) fn format_float(f: f64) -> String {
    if f.is_nan() {
        "nan".to_string()
    } else if f.is_infinite() {
        if f > 0.0 {
            "inf".to_string()
        } else {
            "-inf".to_string()
        }
    } else {
        let s = f.to_string();
        if s.contains('.') || s.contains('e') || s.contains('E') {
            s
        } else {
            format!("{}.0", s)
        }
    }
}

fn number_to_source(n: &Number) -> String {
    match n {
        Number::Int(i) => i.to_string(),
        Number::Float(f) => format_float(*f),
    }
}

/// Render an element back to its override source form
pub fn element_to_source(elem: &ParsedElement) -> String {
    match elem {
        ParsedElement::Null => "null".to_string(),
        ParsedElement::Bool(b) => if *b { "true" } else { "false" }.to_string(),
        ParsedElement::Int(i) => i.to_string(),
        ParsedElement::Float(f) => format_float(*f),
        ParsedElement::String(s) => escape_special_characters(s),
        ParsedElement::QuotedString(qs) => qs.with_quotes(),
        ParsedElement::List(items) => {
            let parts: Vec<_> = items.iter().map(element_to_source).collect();
            format!("[{}]", parts.join(","))
        }
        ParsedElement::Dict(entries) => {
            let parts: Vec<_> = entries
                .iter()
                .map(|(k, v)| format!("{}:{}", k, element_to_source(v)))
                .collect();
            format!("{{{}}}", parts.join(","))
        }
    }
}

/// Render any grammar value back to its override source form
pub fn value_to_source(value: &OverrideValue) -> String {
    match value {
        OverrideValue::Element(e) => element_to_source(e),
        OverrideValue::ChoiceSweep(cs) => {
            let parts: Vec<_> = cs.list.iter().map(element_to_source).collect();
            if cs.simple_form {
                parts.join(",")
            } else {
                format!("choice({})", parts.join(","))
            }
        }
        OverrideValue::RangeSweep(rs) => {
            if rs.step == Number::Int(1) {
                format!(
                    "range({},{})",
                    number_to_source(&rs.start),
                    number_to_source(&rs.stop)
                )
            } else {
                format!(
                    "range({},{},{})",
                    number_to_source(&rs.start),
                    number_to_source(&rs.stop),
                    number_to_source(&rs.step)
                )
            }
        }
        OverrideValue::IntervalSweep(is) => {
            format!("interval({},{})", format_float(is.start), format_float(is.end))
        }
        OverrideValue::Glob(glob) => {
            let include = pattern_list_to_source(&glob.include);
            if glob.exclude.is_empty() {
                format!("glob({})", include)
            } else {
                format!(
                    "glob({},exclude={})",
                    include,
                    pattern_list_to_source(&glob.exclude)
                )
            }
        }
    }
}

fn pattern_list_to_source(patterns: &[String]) -> String {
    match patterns {
        [single] => escape_special_characters(single),
        _ => {
            let parts: Vec<_> = patterns
                .iter()
                .map(|p| escape_special_characters(p))
                .collect();
            format!("[{}]", parts.join(","))
        }
    }
}
