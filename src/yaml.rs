// Copyright (c) Facebook, Inc. and its affiliates. All Rights Reserved
//! Conversions between grammar elements and YAML values.

use serde_yaml::{Mapping, Value};

use crate::core::{OverrideValue, ParsedElement};
use crate::errors::GrammarResult;
use crate::sweep::expand;

/// Convert an element into a YAML value.
///
/// Quoted strings flatten to their text; dict insertion order is
/// preserved.
pub fn element_to_yaml(elem: &ParsedElement) -> Value {
    match elem {
        ParsedElement::Null => Value::Null,
        ParsedElement::Bool(b) => Value::Bool(*b),
        ParsedElement::Int(i) => Value::Number((*i).into()),
        ParsedElement::Float(f) => Value::Number((*f).into()),
        ParsedElement::String(s) => Value::String(s.clone()),
        ParsedElement::QuotedString(qs) => Value::String(qs.text.clone()),
        ParsedElement::List(items) => Value::Sequence(items.iter().map(element_to_yaml).collect()),
        ParsedElement::Dict(entries) => {
            let mut mapping = Mapping::new();
            for (key, value) in entries {
                mapping.insert(Value::String(key.clone()), element_to_yaml(value));
            }
            Value::Mapping(mapping)
        }
    }
}

/// Convert a YAML value into an element; non-string mapping keys are
/// skipped.
pub fn yaml_to_element(yaml: &Value) -> ParsedElement {
    match yaml {
        Value::Null => ParsedElement::Null,
        Value::Bool(b) => ParsedElement::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                ParsedElement::Int(i)
            } else if let Some(f) = n.as_f64() {
                ParsedElement::Float(f)
            } else {
                ParsedElement::Null
            }
        }
        Value::String(s) => ParsedElement::String(s.clone()),
        Value::Sequence(seq) => ParsedElement::List(seq.iter().map(yaml_to_element).collect()),
        Value::Mapping(map) => {
            let mut entries = Vec::new();
            for (key, value) in map {
                if let Value::String(k) = key {
                    entries.push((k.clone(), yaml_to_element(value)));
                }
            }
            ParsedElement::Dict(entries)
        }
    }
}

/// Expand a value and convert each resulting element to YAML
pub fn expansion_to_yaml(value: &OverrideValue) -> GrammarResult<Vec<Value>> {
    Ok(expand(value)?.iter().map(element_to_yaml).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{QuotedString, RangeSweep};

    #[test]
    fn test_element_to_yaml_scalars() {
        assert_eq!(element_to_yaml(&ParsedElement::Null), Value::Null);
        assert_eq!(element_to_yaml(&ParsedElement::Bool(true)), Value::Bool(true));
        assert_eq!(
            element_to_yaml(&ParsedElement::Int(3)),
            Value::Number(3.into())
        );
        assert_eq!(
            element_to_yaml(&ParsedElement::String("a".to_string())),
            Value::String("a".to_string())
        );
    }

    #[test]
    fn test_quoted_string_flattens_to_text() {
        let quoted = ParsedElement::QuotedString(QuotedString::single("hello world".to_string()));
        assert_eq!(
            element_to_yaml(&quoted),
            Value::String("hello world".to_string())
        );
    }

    #[test]
    fn test_dict_order_preserved() {
        let dict = ParsedElement::Dict(vec![
            ("b".to_string(), ParsedElement::Int(1)),
            ("a".to_string(), ParsedElement::Int(2)),
        ]);
        match element_to_yaml(&dict) {
            Value::Mapping(mapping) => {
                let keys: Vec<String> = mapping
                    .iter()
                    .filter_map(|(k, _)| k.as_str().map(String::from))
                    .collect();
                assert_eq!(keys, vec!["b".to_string(), "a".to_string()]);
            }
            _ => panic!("Expected mapping"),
        }
    }

    #[test]
    fn test_yaml_to_element_numbers() {
        assert_eq!(yaml_to_element(&Value::Number(7.into())), ParsedElement::Int(7));
        assert_eq!(
            yaml_to_element(&Value::Number(1.5.into())),
            ParsedElement::Float(1.5)
        );
    }

    #[test]
    fn test_yaml_to_element_skips_non_string_keys() {
        let mut mapping = Mapping::new();
        mapping.insert(Value::Bool(true), Value::Number(1.into()));
        mapping.insert(Value::String("a".to_string()), Value::Number(2.into()));
        assert_eq!(
            yaml_to_element(&Value::Mapping(mapping)),
            ParsedElement::Dict(vec![("a".to_string(), ParsedElement::Int(2))])
        );
    }

    #[test]
    fn test_parsed_yaml_document() {
        let yaml: Value = serde_yaml::from_str("- 1\n- a\n- [true, null]\n").unwrap();
        assert_eq!(
            yaml_to_element(&yaml),
            ParsedElement::List(vec![
                ParsedElement::Int(1),
                ParsedElement::String("a".to_string()),
                ParsedElement::List(vec![ParsedElement::Bool(true), ParsedElement::Null]),
            ])
        );
    }

    #[test]
    fn test_expansion_to_yaml() {
        let value = OverrideValue::RangeSweep(RangeSweep::new(1, 4, 1));
        assert_eq!(
            expansion_to_yaml(&value).unwrap(),
            vec![
                Value::Number(1.into()),
                Value::Number(2.into()),
                Value::Number(3.into()),
            ]
        );
    }
}
