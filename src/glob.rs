// Copyright (c) Facebook, Inc. and its affiliates. All Rights Reserved
//! Glob value and pattern filtering for sweep overrides.

/// A glob over candidate names (e.g., "group=glob(*, exclude=db*)")
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Glob {
    /// Patterns a name must match one of
    pub include: Vec<String>,
    /// Patterns a name must match none of
    pub exclude: Vec<String>,
}

impl Glob {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_include(mut self, patterns: Vec<String>) -> Self {
        self.include = patterns;
        self
    }

    pub fn with_exclude(mut self, patterns: Vec<String>) -> Self {
        self.exclude = patterns;
        self
    }

    /// Keep the names matching at least one include pattern and no exclude
    /// pattern, in input order.
    pub fn filter(&self, names: &[String]) -> Vec<String> {
        names
            .iter()
            .filter(|name| {
                self.include.iter().any(|p| glob_match(p, name))
                    && !self.exclude.iter().any(|p| glob_match(p, name))
            })
            .cloned()
            .collect()
    }
}

/// Match a name against a glob pattern supporting `*` and `?`.
fn glob_match(pattern: &str, name: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let name: Vec<char> = name.chars().collect();
    match_chars(&pattern, &name)
}

fn match_chars(pattern: &[char], name: &[char]) -> bool {
    match pattern.split_first() {
        None => name.is_empty(),
        Some((&'*', rest)) => (0..=name.len()).any(|skip| match_chars(rest, &name[skip..])),
        Some((&'?', rest)) => match name.split_first() {
            Some((_, tail)) => match_chars(rest, tail),
            None => false,
        },
        Some((ch, rest)) => match name.split_first() {
            Some((nc, tail)) => nc == ch && match_chars(rest, tail),
            None => false,
        },
    }
}
