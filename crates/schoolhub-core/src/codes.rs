//! Short human-readable codes for student and teacher records.
//!
//! Student codes are two uppercase letters followed by three zero-padded
//! digits (`AB123`). Teacher codes prefix a student code with `T-`
//! (`T-ZZ999`). Both spaces hold 676,000 values.
//!
//! [`resolve_unique_code`] draws candidates until the caller-supplied
//! existence check reports one as unused. The check is advisory only: nothing
//! is reserved, so the unique index in storage stays the final authority and a
//! concurrent insert of the same code surfaces there as a conflict.

use std::fmt;
use std::future::Future;

/// Default retry budget for [`resolve_unique_code`].
pub const DEFAULT_MAX_RETRIES: u32 = 10;

const TEACHER_PREFIX: &str = "T-";

/// Random source used by the code generator.
///
/// Implemented for every [`rand::Rng`], so production code passes a real
/// generator while tests can script the exact sequence of draws.
pub trait CodeRandom {
    /// Uniform integer in `[0, upper)`.
    fn next_below(&mut self, upper: u32) -> u32;

    /// Uniform uppercase ASCII letter.
    fn next_letter(&mut self) -> char {
        char::from(b'A' + self.next_below(26) as u8)
    }
}

impl<R> CodeRandom for R
where
    R: rand::Rng + ?Sized,
{
    fn next_below(&mut self, upper: u32) -> u32 {
        self.gen_range(0..upper)
    }

    fn next_letter(&mut self) -> char {
        char::from(self.gen_range(b'A'..=b'Z'))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeKind {
    Student,
    Teacher,
}

impl CodeKind {
    pub fn generate<R>(self, rng: &mut R) -> String
    where
        R: CodeRandom + ?Sized,
    {
        match self {
            CodeKind::Student => generate_student_code(rng),
            CodeKind::Teacher => generate_teacher_code(rng),
        }
    }

    /// Whether `code` has the shape this kind produces.
    pub fn matches(self, code: &str) -> bool {
        match self {
            CodeKind::Student => is_student_code(code),
            CodeKind::Teacher => is_teacher_code(code),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CodeKind::Student => "student",
            CodeKind::Teacher => "teacher",
        }
    }
}

impl fmt::Display for CodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn generate_student_code<R>(rng: &mut R) -> String
where
    R: CodeRandom + ?Sized,
{
    let first = rng.next_letter();
    let second = rng.next_letter();
    let digits = rng.next_below(1000);
    format!("{first}{second}{digits:03}")
}

pub fn generate_teacher_code<R>(rng: &mut R) -> String
where
    R: CodeRandom + ?Sized,
{
    format!("{TEACHER_PREFIX}{}", generate_student_code(rng))
}

pub fn is_student_code(code: &str) -> bool {
    let bytes = code.as_bytes();
    bytes.len() == 5
        && bytes[..2].iter().all(u8::is_ascii_uppercase)
        && bytes[2..].iter().all(u8::is_ascii_digit)
}

pub fn is_teacher_code(code: &str) -> bool {
    code.strip_prefix(TEACHER_PREFIX)
        .is_some_and(is_student_code)
}

/// Every candidate drawn within the retry budget was already taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetriesExhausted {
    pub kind: CodeKind,
    pub attempts: u32,
}

impl fmt::Display for RetriesExhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Could not generate a unique {} code after {} attempts",
            self.kind, self.attempts
        )
    }
}

impl std::error::Error for RetriesExhausted {}

/// Draws codes of `kind` until `exists` reports one as unused.
///
/// Checks run one after another, at most `max_retries` times. A budget of zero
/// fails without drawing or checking anything. Errors from `exists` are
/// returned untouched; only "already taken" answers consume the budget.
pub async fn resolve_unique_code<R, F, Fut, E>(
    kind: CodeKind,
    rng: &mut R,
    max_retries: u32,
    mut exists: F,
) -> Result<String, E>
where
    R: CodeRandom + ?Sized,
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool, E>>,
    E: From<RetriesExhausted>,
{
    for attempt in 1..=max_retries {
        let candidate = kind.generate(rng);

        if !exists(candidate.clone()).await? {
            return Ok(candidate);
        }

        tracing::debug!(%kind, attempt, "Generated code already in use");
    }

    tracing::warn!(%kind, max_retries, "Exhausted retries generating unique code");
    Err(RetriesExhausted {
        kind,
        attempts: max_retries,
    }
    .into())
}
