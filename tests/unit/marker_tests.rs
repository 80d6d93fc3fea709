/*!
 * Tests for the line direction marker
 */

use anyhow::Result;
use proptest::prelude::*;
use bidimark::marker::{self, DirectionMarker, LineDocument, MarkSummary};
use bidimark::{mark_directions, FirstStrongClassifier, MarkError};
use crate::common::{self, FailingClassifier, LRE, RLE};

fn document(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|line| line.to_string()).collect()
}

/// Mixed Hebrew and English rows get their own marks
#[test]
fn test_markDirections_withMixedRows_shouldMarkEachRow() -> Result<()> {
    let mut doc = document(&["Hello\nשלום"]);

    mark_directions(&mut doc, common::hebrew_stub)?;

    assert_eq!(doc[0], "\u{202A}Hello\n\u{202B}שלום");
    Ok(())
}

/// A single empty row becomes a lone LRE
#[test]
fn test_markDirections_withEmptyText_shouldLeaveOnlyMark() -> Result<()> {
    let mut doc = document(&[""]);

    mark_directions(&mut doc, |_: &str| false)?;

    assert_eq!(doc[0], "\u{202A}");
    Ok(())
}

/// Nothing to mark in an empty document
#[test]
fn test_markDirections_withEmptyDocument_shouldStayEmpty() -> Result<()> {
    let mut doc: Vec<String> = Vec::new();

    let summary = mark_directions(&mut doc, common::hebrew_stub)?;

    assert!(doc.is_empty());
    assert_eq!(summary, MarkSummary::default());
    Ok(())
}

/// Line count survives and no marker-only line is appended
#[test]
fn test_markDirections_withTwoLines_shouldKeepLineCount() -> Result<()> {
    let mut doc = document(&["first", "שני"]);

    mark_directions(&mut doc, common::hebrew_stub)?;

    assert_eq!(doc.line_count(), 2);
    assert!(doc.iter().all(|line| !marker::is_marker_only(line)));
    assert_eq!(doc, vec!["\u{202A}first".to_string(), "\u{202B}שני".to_string()]);
    Ok(())
}

/// Empty rows in the middle and at the edges are still marked
#[test]
fn test_markDirections_withBlankRows_shouldMarkEveryRow() -> Result<()> {
    let mut doc = document(&["\na\n\nb\n"]);

    let summary = mark_directions(&mut doc, |_: &str| false)?;

    assert_eq!(doc[0], "\u{202A}\n\u{202A}a\n\u{202A}\n\u{202A}b\n\u{202A}");
    assert_eq!(summary.sub_lines, 5);
    Ok(())
}

/// Marking twice prefixes twice
#[test]
fn test_markDirections_appliedTwice_shouldDoublePrefix() -> Result<()> {
    let mut doc = document(&["Hello\nשלום"]);

    mark_directions(&mut doc, FirstStrongClassifier::new())?;
    mark_directions(&mut doc, FirstStrongClassifier::new())?;

    assert_eq!(doc[0], "\u{202A}\u{202A}Hello\n\u{202B}\u{202B}שלום");
    Ok(())
}

/// The classifier's verdict is used as-is for neutral text
#[test]
fn test_markDirections_withNeutralText_shouldTrustClassifier() -> Result<()> {
    let mut doc = document(&["123 ...", "123 ..."]);

    let marker = DirectionMarker::new(|_: &str| true);
    marker.mark_directions(&mut doc)?;

    assert_eq!(doc[0], "\u{202B}123 ...");
    assert_eq!(doc[1], "\u{202B}123 ...");
    Ok(())
}

/// The summary counts rows per direction
#[test]
fn test_markDirections_summary_shouldCountRows() -> Result<()> {
    let mut doc = document(&["Hello\nשלום", "מה", "Fine"]);

    let summary = mark_directions(&mut doc, common::hebrew_stub)?;

    assert_eq!(
        summary,
        MarkSummary { lines: 3, sub_lines: 4, rtl_sub_lines: 2, ltr_sub_lines: 2 }
    );
    Ok(())
}

/// A classifier failure reports the line and leaves the document untouched
#[test]
fn test_markDirections_withFailingClassifier_shouldLeaveDocumentUnchanged() {
    let original = document(&["ok", "still ok\nboom", "never reached"]);
    let mut doc = original.clone();

    let result = mark_directions(&mut doc, FailingClassifier { poison: "boom" });

    match result {
        Err(MarkError::Line { index, source }) => {
            assert_eq!(index, 1);
            assert!(source.to_string().contains("boom"));
        }
        other => panic!("expected a line error, got {:?}", other),
    }
    assert_eq!(doc, original);
}

/// Closing marks are opt-in
#[test]
fn test_markText_withClosingMarks_shouldAppendPdf() -> Result<()> {
    let marker = DirectionMarker::new(common::hebrew_stub).with_closing_marks(true);

    let marked = marker.mark_text("Hello\nשלום")?;

    assert_eq!(marked, "\u{202A}Hello\u{202C}\n\u{202B}שלום\u{202C}");
    Ok(())
}

/// Rows are classified strictly in order
#[test]
fn test_markDirections_shouldClassifyRowsInOrder() -> Result<()> {
    let seen = std::cell::RefCell::new(Vec::new());
    let mut doc = document(&["a\nb", "c"]);

    mark_directions(&mut doc, |text: &str| {
        seen.borrow_mut().push(text.to_string());
        false
    })?;

    assert_eq!(seen.into_inner(), vec!["a", "b", "c"]);
    Ok(())
}

/// Formatting tags do not decide the direction of a row
#[test]
fn test_markText_withTaggedHebrewRows_shouldUseRle() -> Result<()> {
    let marker = DirectionMarker::new(FirstStrongClassifier::new());

    let marked = marker.mark_text("<i>שלום</i>\n<font color=\"#ffff00\">מה שלומך?</font>\n{\\an8}שלום")?;

    assert_eq!(
        marked,
        "\u{202B}<i>שלום</i>\n\u{202B}<font color=\"#ffff00\">מה שלומך?</font>\n\u{202B}{\\an8}שלום"
    );
    Ok(())
}

/// Tagged Latin rows stay left-to-right and keep their markup
#[test]
fn test_markText_withTaggedLatinRow_shouldUseLre() -> Result<()> {
    let marker = DirectionMarker::new(FirstStrongClassifier::new());

    assert_eq!(marker.mark_text("{\\an8}<b>Hello</b>")?, "\u{202A}{\\an8}<b>Hello</b>");
    Ok(())
}

/// Classifiers receive the displayed text of each row
#[test]
fn test_markDirections_shouldClassifyPlainText() -> Result<()> {
    let seen = std::cell::RefCell::new(Vec::new());
    let mut doc = document(&["<i>a</i>\n{\\an8}b &amp; c"]);

    mark_directions(&mut doc, |text: &str| {
        seen.borrow_mut().push(text.to_string());
        false
    })?;

    assert_eq!(seen.into_inner(), vec!["a", "b & c"]);
    assert_eq!(doc[0], "\u{202A}<i>a</i>\n\u{202A}{\\an8}b &amp; c");
    Ok(())
}

proptest! {
    /// Line count is preserved and every row receives exactly one mark
    #[test]
    fn prop_markDirections_shouldMarkEveryRowOnce(
        lines in proptest::collection::vec("[a-zא-ת 0-9\n]{0,24}", 0..8)
    ) {
        let mut doc = lines.clone();

        mark_directions(&mut doc, common::hebrew_stub).unwrap();

        prop_assert_eq!(doc.len(), lines.len());
        for (marked, original) in doc.iter().zip(lines.iter()) {
            let marks = marked.chars().filter(|c| *c == LRE || *c == RLE).count();
            prop_assert_eq!(marks, original.matches('\n').count() + 1);
            prop_assert!(marker::is_marked(marked));

            let stripped: String = marked.chars().filter(|c| *c != LRE && *c != RLE).collect();
            prop_assert_eq!(&stripped, original);
        }
    }
}
