/*!
 * Directional marking of subtitle lines.
 *
 * Every line of a document is split into its sub-lines (on `\n`), each sub-line
 * is classified on its displayed text (see `markup`), and the matching
 * embedding character is prepended to the raw sub-line:
 * LRE (U+202A) for left-to-right text, RLE (U+202B) for right-to-left text.
 * No closing POP DIRECTIONAL FORMATTING is written unless explicitly requested.
 *
 * Marking is not idempotent. Running it twice prefixes every sub-line twice.
 */

use log::debug;

use crate::direction::{Direction, DirectionClassifier};
use crate::errors::{DirectionError, MarkError};
use crate::markup;

/// LEFT-TO-RIGHT EMBEDDING
pub const LEFT_TO_RIGHT_EMBEDDING: char = '\u{202A}';

/// RIGHT-TO-LEFT EMBEDDING
pub const RIGHT_TO_LEFT_EMBEDDING: char = '\u{202B}';

/// POP DIRECTIONAL FORMATTING
pub const POP_DIRECTIONAL_FORMATTING: char = '\u{202C}';

/// Separator between the visual rows of one subtitle line
pub const SUBLINE_SEPARATOR: char = '\n';

/// An ordered, index-addressable sequence of lines with mutable primary text
pub trait LineDocument {
    fn line_count(&self) -> usize;

    fn primary_text(&self, index: usize) -> &str;

    fn set_primary_text(&mut self, index: usize, text: String);
}

impl LineDocument for Vec<String> {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn primary_text(&self, index: usize) -> &str {
        &self[index]
    }

    fn set_primary_text(&mut self, index: usize, text: String) {
        self[index] = text;
    }
}

/// Counters collected while marking one document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkSummary {
    pub lines: usize,
    pub sub_lines: usize,
    pub rtl_sub_lines: usize,
    pub ltr_sub_lines: usize,
}

impl MarkSummary {
    fn record(&mut self, direction: Direction) {
        self.sub_lines += 1;
        match direction {
            Direction::LeftToRight => self.ltr_sub_lines += 1,
            Direction::RightToLeft => self.rtl_sub_lines += 1,
        }
    }
}

/// Marks documents using a classifier and marking options
#[derive(Debug, Clone)]
pub struct DirectionMarker<C> {
    classifier: C,
    close_embeddings: bool,
}

impl<C: DirectionClassifier> DirectionMarker<C> {
    pub fn new(classifier: C) -> Self {
        Self {
            classifier,
            close_embeddings: false,
        }
    }

    /// Also terminate every marked sub-line with POP DIRECTIONAL FORMATTING
    pub fn with_closing_marks(mut self, close_embeddings: bool) -> Self {
        self.close_embeddings = close_embeddings;
        self
    }

    /// Mark every sub-line of a single line's text
    pub fn mark_text(&self, text: &str) -> Result<String, DirectionError> {
        let mut summary = MarkSummary::default();
        self.mark_text_into(text, &mut summary)
    }

    fn mark_text_into(&self, text: &str, summary: &mut MarkSummary) -> Result<String, DirectionError> {
        let mut marked = String::with_capacity(text.len() + 8);

        for (i, sub_line) in text.split(SUBLINE_SEPARATOR).enumerate() {
            // Markup is kept in the output but has no say in the direction
            let direction = self.classifier.classify(&markup::plain_text(sub_line))?;
            summary.record(direction);

            if i > 0 {
                marked.push(SUBLINE_SEPARATOR);
            }
            marked.push(direction.embedding_mark());
            marked.push_str(sub_line);
            if self.close_embeddings {
                marked.push(POP_DIRECTIONAL_FORMATTING);
            }
        }

        Ok(marked)
    }

    /// Rewrite every line of `document` with directional marks.
    ///
    /// Lines are processed in index order and sub-lines in text order. Nothing
    /// is written back until every line has been marked, so a classifier
    /// failure leaves the document untouched.
    pub fn mark_directions<D>(&self, document: &mut D) -> Result<MarkSummary, MarkError>
    where
        D: LineDocument + ?Sized,
    {
        let line_count = document.line_count();
        let mut summary = MarkSummary::default();
        if line_count == 0 {
            return Ok(summary);
        }

        let mut marked_lines = Vec::with_capacity(line_count);
        for index in 0..line_count {
            let marked = self
                .mark_text_into(document.primary_text(index), &mut summary)
                .map_err(|source| MarkError::Line { index, source })?;
            marked_lines.push(marked);
        }

        for (index, marked) in marked_lines.into_iter().enumerate() {
            document.set_primary_text(index, marked);
        }
        summary.lines = line_count;

        debug!(
            "Marked {} lines ({} sub-lines: {} rtl, {} ltr)",
            summary.lines, summary.sub_lines, summary.rtl_sub_lines, summary.ltr_sub_lines
        );

        Ok(summary)
    }
}

/// Mark `document` in place with the legacy one-sided prefixes
pub fn mark_directions<D, C>(document: &mut D, classifier: C) -> Result<MarkSummary, MarkError>
where
    D: LineDocument + ?Sized,
    C: DirectionClassifier,
{
    DirectionMarker::new(classifier).mark_directions(document)
}

/// Whether every sub-line of `text` already starts with an embedding mark
pub fn is_marked(text: &str) -> bool {
    text.split(SUBLINE_SEPARATOR).all(|sub_line| {
        sub_line.starts_with(LEFT_TO_RIGHT_EMBEDDING) || sub_line.starts_with(RIGHT_TO_LEFT_EMBEDDING)
    })
}

/// Whether `text` holds nothing but directional control characters and separators
pub fn is_marker_only(text: &str) -> bool {
    text.chars().all(|c| {
        matches!(
            c,
            LEFT_TO_RIGHT_EMBEDDING | RIGHT_TO_LEFT_EMBEDDING | POP_DIRECTIONAL_FORMATTING | SUBLINE_SEPARATOR
        )
    })
}
