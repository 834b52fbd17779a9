// Copyright (c) Facebook, Inc. and its affiliates. All Rights Reserved
//! Grammar evaluation error types

use std::error::Error;
use std::fmt;

/// Base error type for grammar function evaluation
#[derive(Debug, Clone)]
pub enum GrammarError {
    ArgumentShapeError(ArgumentShapeError),
    UnsupportedCastError(UnsupportedCastError),
    InvalidCastValueError(InvalidCastValueError),
    InvalidSweepNestingError(InvalidSweepNestingError),
    InvalidTagArgumentError(InvalidTagArgumentError),
    InvalidSortShuffleArgumentError(InvalidSortShuffleArgumentError),
    UnknownFunctionError(UnknownFunctionError),
    NonEnumerableSweepError(NonEnumerableSweepError),
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::ArgumentShapeError(e) => write!(f, "{}", e),
            GrammarError::UnsupportedCastError(e) => write!(f, "{}", e),
            GrammarError::InvalidCastValueError(e) => write!(f, "{}", e),
            GrammarError::InvalidSweepNestingError(e) => write!(f, "{}", e),
            GrammarError::InvalidTagArgumentError(e) => write!(f, "{}", e),
            GrammarError::InvalidSortShuffleArgumentError(e) => write!(f, "{}", e),
            GrammarError::UnknownFunctionError(e) => write!(f, "{}", e),
            GrammarError::NonEnumerableSweepError(e) => write!(f, "{}", e),
        }
    }
}

impl Error for GrammarError {}

/// Error for conflicting, missing or ill-typed call arguments
#[derive(Debug, Clone)]
pub struct ArgumentShapeError {
    pub message: String,
    pub function: Option<String>,
}

impl ArgumentShapeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            function: None,
        }
    }

    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }
}

impl fmt::Display for ArgumentShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref function) = self.function {
            write!(f, "{}(): {}", function, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl Error for ArgumentShapeError {}

/// Error for casting a sweep to a type it does not support
#[derive(Debug, Clone)]
pub struct UnsupportedCastError {
    pub message: String,
}

impl UnsupportedCastError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for UnsupportedCastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for UnsupportedCastError {}

/// Error for a value that cannot be converted to the requested type
#[derive(Debug, Clone)]
pub struct InvalidCastValueError {
    pub message: String,
}

impl InvalidCastValueError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for InvalidCastValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for InvalidCastValueError {}

/// Error for nesting a sweep inside a choice sweep
#[derive(Debug, Clone)]
pub struct InvalidSweepNestingError {
    pub message: String,
}

impl InvalidSweepNestingError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for InvalidSweepNestingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for InvalidSweepNestingError {}

/// Error for ill-formed tag() arguments
#[derive(Debug, Clone)]
pub struct InvalidTagArgumentError {
    pub message: String,
}

impl InvalidTagArgumentError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for InvalidTagArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for InvalidTagArgumentError {}

/// Error for ill-formed sort() or shuffle() arguments
#[derive(Debug, Clone)]
pub struct InvalidSortShuffleArgumentError {
    pub message: String,
}

impl InvalidSortShuffleArgumentError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for InvalidSortShuffleArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for InvalidSortShuffleArgumentError {}

/// Error for calling a function the evaluator does not define
#[derive(Debug, Clone)]
pub struct UnknownFunctionError {
    pub message: String,
}

impl UnknownFunctionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for UnknownFunctionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for UnknownFunctionError {}

/// Error for materializing a sweep that has no finite value list
#[derive(Debug, Clone)]
pub struct NonEnumerableSweepError {
    pub message: String,
}

impl NonEnumerableSweepError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for NonEnumerableSweepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for NonEnumerableSweepError {}

/// Conversion implementations
impl From<ArgumentShapeError> for GrammarError {
    fn from(e: ArgumentShapeError) -> Self {
        GrammarError::ArgumentShapeError(e)
    }
}

impl From<UnsupportedCastError> for GrammarError {
    fn from(e: UnsupportedCastError) -> Self {
        GrammarError::UnsupportedCastError(e)
    }
}

impl From<InvalidCastValueError> for GrammarError {
    fn from(e: InvalidCastValueError) -> Self {
        GrammarError::InvalidCastValueError(e)
    }
}

impl From<InvalidSweepNestingError> for GrammarError {
    fn from(e: InvalidSweepNestingError) -> Self {
        GrammarError::InvalidSweepNestingError(e)
    }
}

impl From<InvalidTagArgumentError> for GrammarError {
    fn from(e: InvalidTagArgumentError) -> Self {
        GrammarError::InvalidTagArgumentError(e)
    }
}

impl From<InvalidSortShuffleArgumentError> for GrammarError {
    fn from(e: InvalidSortShuffleArgumentError) -> Self {
        GrammarError::InvalidSortShuffleArgumentError(e)
    }
}

impl From<UnknownFunctionError> for GrammarError {
    fn from(e: UnknownFunctionError) -> Self {
        GrammarError::UnknownFunctionError(e)
    }
}

impl From<NonEnumerableSweepError> for GrammarError {
    fn from(e: NonEnumerableSweepError) -> Self {
        GrammarError::NonEnumerableSweepError(e)
    }
}

pub type GrammarResult<T> = std::result::Result<T, GrammarError>;
