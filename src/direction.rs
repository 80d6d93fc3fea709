/*!
 * Writing direction of a piece of text.
 *
 * The marker never decides direction itself, it asks a `DirectionClassifier`.
 * Any `Fn(&str) -> bool` closure (returning `true` for right-to-left text) is a
 * classifier, which keeps stubbing trivial in tests. `FirstStrongClassifier` is
 * the default used by the command-line tool.
 */

use std::fmt;
use unicode_bidi::{bidi_class, BidiClass};

use crate::errors::DirectionError;

/// Base writing direction of a sub-line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    LeftToRight,
    RightToLeft,
}

impl Direction {
    /// Build a direction from an "is right to left" verdict
    pub fn from_rtl(is_rtl: bool) -> Self {
        if is_rtl {
            Self::RightToLeft
        } else {
            Self::LeftToRight
        }
    }

    pub fn is_rtl(self) -> bool {
        self == Self::RightToLeft
    }

    /// The embedding control character that opens a run in this direction
    pub fn embedding_mark(self) -> char {
        match self {
            Self::LeftToRight => crate::marker::LEFT_TO_RIGHT_EMBEDDING,
            Self::RightToLeft => crate::marker::RIGHT_TO_LEFT_EMBEDDING,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LeftToRight => write!(f, "ltr"),
            Self::RightToLeft => write!(f, "rtl"),
        }
    }
}

/// Capability that decides the writing direction of raw text
pub trait DirectionClassifier {
    fn classify(&self, text: &str) -> Result<Direction, DirectionError>;
}

impl<F> DirectionClassifier for F
where
    F: Fn(&str) -> bool,
{
    fn classify(&self, text: &str) -> Result<Direction, DirectionError> {
        Ok(Direction::from_rtl(self(text)))
    }
}

/// First-strong-character classifier.
///
/// Walks the text in logical order and returns the direction of the first
/// character whose bidi class is `L`, `R` or `AL`. Characters enclosed in an
/// isolate (`LRI`/`RLI`/`FSI` ... `PDI`) are skipped. Text without any strong
/// character is left-to-right.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstStrongClassifier;

impl FirstStrongClassifier {
    pub fn new() -> Self {
        Self
    }

    /// The direction of `text` by the first-strong rule
    pub fn first_strong(text: &str) -> Direction {
        let mut isolate_depth: usize = 0;

        for ch in text.chars() {
            match bidi_class(ch) {
                BidiClass::LRI | BidiClass::RLI | BidiClass::FSI => isolate_depth += 1,
                BidiClass::PDI => isolate_depth = isolate_depth.saturating_sub(1),
                BidiClass::L if isolate_depth == 0 => return Direction::LeftToRight,
                BidiClass::R | BidiClass::AL if isolate_depth == 0 => {
                    return Direction::RightToLeft;
                }
                _ => {}
            }
        }

        Direction::LeftToRight
    }
}

impl DirectionClassifier for FirstStrongClassifier {
    fn classify(&self, text: &str) -> Result<Direction, DirectionError> {
        Ok(Self::first_strong(text))
    }
}
