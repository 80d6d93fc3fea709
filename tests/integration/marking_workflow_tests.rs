/*!
 * Integration tests for the load, mark and save workflow
 */

use std::fs;
use anyhow::Result;
use bidimark::{mark_directions, FirstStrongClassifier, LineDocument, SubtitleCollection, SubtitleFormat};
use crate::common;

/// An SRT file comes back with one mark per row and untouched timing
#[test]
fn test_srt_workflow_withMixedRows_shouldMarkAndSave() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.he.srt")?;

    let mut collection = SubtitleCollection::load(&input)?;
    assert_eq!(collection.format, SubtitleFormat::Srt);
    let before = collection.line_count();

    mark_directions(&mut collection, FirstStrongClassifier::new())?;
    assert_eq!(collection.line_count(), before);

    let output = temp_dir.path().join("movie.he.rtl.srt");
    collection.write_to_file(&output)?;

    let reloaded = SubtitleCollection::load(&output)?;
    assert_eq!(reloaded.entries.len(), 3);
    assert_eq!(reloaded.entries[0].text, "\u{202A}Hello\n\u{202B}שלום");
    assert_eq!(reloaded.entries[1].text, "\u{202B}מה שלומך?");
    assert_eq!(reloaded.entries[2].text, "\u{202A}Fine, thanks.");
    assert_eq!(reloaded.entries[2].start_time_ms, 10_000);
    assert!(reloaded.is_fully_marked());
    Ok(())
}

/// WebVTT input is written back as WebVTT
#[test]
fn test_vtt_workflow_withMixedRows_shouldKeepFormat() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "movie.he.vtt", common::MIXED_VTT)?;

    let mut collection = SubtitleCollection::load(&input)?;
    mark_directions(&mut collection, FirstStrongClassifier::new())?;
    collection.write_to_file(&input)?;

    let written = fs::read_to_string(&input)?;
    assert!(written.starts_with("WEBVTT\n\n"));
    assert!(written.contains("00:00:05.000 --> 00:00:09.000\n\u{202B}מה שלומך?\n"));

    let reloaded = SubtitleCollection::load(&input)?;
    assert_eq!(reloaded.format, SubtitleFormat::WebVtt);
    assert_eq!(reloaded.entries[0].text, "\u{202A}Hello\n\u{202B}שלום");
    Ok(())
}

/// Italic and positioned Hebrew rows in an SRT file are marked right-to-left
#[test]
fn test_srt_workflow_withTaggedRows_shouldMarkByDisplayedText() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "tagged.srt", common::TAGGED_SRT)?;

    let mut collection = SubtitleCollection::load(&input)?;
    mark_directions(&mut collection, FirstStrongClassifier::new())?;

    assert_eq!(collection.entries[0].text, "\u{202B}<i>שלום</i>\n\u{202A}<i>Hello</i>");
    assert_eq!(collection.entries[1].text, "\u{202B}{\\an8}<font color=\"#ffff00\">מה שלומך?</font>");
    Ok(())
}

/// WebVTT voice and class spans do not decide the direction
#[test]
fn test_vtt_workflow_withVoiceSpans_shouldMarkByDisplayedText() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "voices.vtt", common::TAGGED_VTT)?;

    let mut collection = SubtitleCollection::load(&input)?;
    mark_directions(&mut collection, FirstStrongClassifier::new())?;

    assert_eq!(collection.entries[0].text, "\u{202B}<v Dana>שלום");
    assert_eq!(collection.entries[1].text, "\u{202B}<c.yellow>מה</c> Dana?\n\u{202A}<v Tom>Fine &amp; you?");
    Ok(())
}

/// A cue-less WebVTT document passes through unchanged in size
#[test]
fn test_vtt_workflow_withNoCues_shouldStayEmpty() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "empty.vtt", "WEBVTT\n")?;

    let mut collection = SubtitleCollection::load(&input)?;
    let summary = mark_directions(&mut collection, FirstStrongClassifier::new())?;

    assert_eq!(collection.line_count(), 0);
    assert_eq!(summary.lines, 0);
    assert_eq!(collection.render(), "WEBVTT\n\n");
    Ok(())
}

/// Unknown content cannot be loaded
#[test]
fn test_load_withUnsupportedFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "notes.txt", "hello world")?;

    assert!(SubtitleCollection::load(&input).is_err());
    Ok(())
}
