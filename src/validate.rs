use crate::matrix::Matrix;

/// How device output is compared against the reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Comparison {
    /// IEEE equality of every cell.
    Exact,
    /// `|x - y| <= tolerance * max(|x|, |y|, 1)`.
    Relative { tolerance: f32 },
}

impl Comparison {
    pub fn matches(&self, expected: f32, actual: f32) -> bool {
        match *self {
            Self::Exact => expected == actual,
            Self::Relative { tolerance } => {
                let scale = expected.abs().max(actual.abs()).max(1.0);
                (expected - actual).abs() <= tolerance * scale
            }
        }
    }
}

impl Default for Comparison {
    fn default() -> Self {
        Self::Relative { tolerance: 1e-4 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mismatch {
    pub row: usize,
    pub col: usize,
    pub expected: f32,
    pub actual: f32,
}

/// Outcome of comparing one device result with the reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    Correct,
    Incorrect { mismatches: usize, first: Mismatch },
    ShapeMismatch,
}

impl Validation {
    pub fn is_correct(&self) -> bool {
        matches!(self, Self::Correct)
    }
}

pub fn validate(reference: &Matrix, candidate: &Matrix, comparison: Comparison) -> Validation {
    let shape = reference.shape();
    if shape != candidate.shape() {
        return Validation::ShapeMismatch;
    }

    let mut first = None;
    let mut mismatches = 0;
    let pairs = reference.as_slice().iter().zip(candidate.as_slice());
    for (idx, (&expected, &actual)) in pairs.enumerate() {
        if !comparison.matches(expected, actual) {
            mismatches += 1;
            first.get_or_insert(Mismatch {
                row: idx / shape.cols,
                col: idx % shape.cols,
                expected,
                actual,
            });
        }
    }

    match first {
        None => Validation::Correct,
        Some(first) => Validation::Incorrect { mismatches, first },
    }
}
