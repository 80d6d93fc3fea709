/*!
 * Tests for file utility functions
 */

use std::fs;
use std::path::Path;
use anyhow::Result;
use bidimark::file_utils::{FileManager, FileType};
use bidimark::SubtitleFormat;
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "test_file_exists.tmp", "test content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::dir_exists(&test_file));
    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// Test that generate_output_path creates the correct path
#[test]
fn test_generate_output_path_withValidInputs_shouldCreateCorrectPath() {
    let input_file = Path::new("/tmp/input/movie.he.srt");
    let output_dir = Path::new("/tmp/output");

    let output_path = FileManager::generate_output_path(input_file, output_dir, "rtl", "srt");

    assert_eq!(output_path, Path::new("/tmp/output/movie.he.rtl.srt"));
}

/// Generated outputs are recognised by their suffix
#[test]
fn test_is_generated_output_shouldMatchSuffixBeforeExtension() {
    assert!(FileManager::is_generated_output("movie.he.rtl.srt", "rtl"));
    assert!(!FileManager::is_generated_output("movie.he.srt", "rtl"));
    assert!(!FileManager::is_generated_output("control.srt", "rtl"));
}

/// Subtitle discovery is recursive and ignores other files
#[test]
fn test_find_subtitle_files_withNestedDirs_shouldFindSrtAndVtt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "a.srt", common::MIXED_SRT)?;
    common::create_test_file(temp_dir.path(), "season1/b.VTT", common::MIXED_VTT)?;
    common::create_test_file(temp_dir.path(), "season1/notes.txt", "n/a")?;

    let files = FileManager::find_subtitle_files(temp_dir.path())?;

    assert_eq!(files.len(), 2);
    assert!(files.iter().any(|f| f.ends_with("a.srt")));
    assert!(files.iter().any(|f| f.ends_with("season1/b.VTT")));
    Ok(())
}

/// Atomic writes create parent directories and replace content
#[test]
fn test_write_atomically_shouldReplaceContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("out/marked.srt");

    FileManager::write_atomically(&target, "first")?;
    FileManager::write_atomically(&target, "second")?;

    assert_eq!(fs::read_to_string(&target)?, "second");
    assert_eq!(fs::read_dir(temp_dir.path().join("out"))?.count(), 1);
    Ok(())
}

/// Log lines are appended with a timestamp
#[test]
fn test_append_to_log_file_shouldAppendLines() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let log = temp_dir.path().join("run.log");

    FileManager::append_to_log_file(&log, "one")?;
    FileManager::append_to_log_file(&log, "two")?;

    let content = fs::read_to_string(&log)?;
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with('[') && lines[0].ends_with("] one"));
    Ok(())
}

/// File types come from the extension, then from the content
#[test]
fn test_detect_file_type_shouldUseExtensionThenContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let srt = common::create_test_file(temp_dir.path(), "x.srt", common::MIXED_SRT)?;
    let vtt_no_ext = common::create_test_file(temp_dir.path(), "captions", common::MIXED_VTT)?;
    let other = common::create_test_file(temp_dir.path(), "readme.md", "# hi")?;

    assert_eq!(FileManager::detect_file_type(&srt)?, FileType::Subtitle(SubtitleFormat::Srt));
    assert_eq!(FileManager::detect_file_type(&vtt_no_ext)?, FileType::Subtitle(SubtitleFormat::WebVtt));
    assert_eq!(FileManager::detect_file_type(&other)?, FileType::Unknown);
    assert!(FileManager::detect_file_type(temp_dir.path().join("missing.srt")).is_err());
    Ok(())
}
