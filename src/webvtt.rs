/*!
 * WebVTT reading and writing.
 *
 * Only what a subtitle release needs is kept: cue timing and cue text.
 * The file header, `NOTE`, `STYLE` and `REGION` blocks, cue identifiers and
 * cue settings are read past and not written back.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::SubtitleError;
use crate::subtitle_processor::SubtitleEntry;

static CUE_TIMING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:(\d{2,}):)?([0-5]\d):([0-5]\d)\.(\d{3})\s+-->\s+(?:(\d{2,}):)?([0-5]\d):([0-5]\d)\.(\d{3})\b(.*)$",
    )
    .expect("WebVTT cue timing pattern is valid")
});

const SIGNATURE: &str = "WEBVTT";

/// A run of non-blank lines and the one-based line number it starts at
struct Block<'a> {
    first_line: usize,
    lines: Vec<&'a str>,
}

fn blocks(content: &str) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();
    let mut current: Option<Block<'_>> = None;

    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            if let Some(block) = current.take() {
                blocks.push(block);
            }
            continue;
        }
        current
            .get_or_insert_with(|| Block { first_line: i + 1, lines: Vec::new() })
            .lines
            .push(line);
    }
    if let Some(block) = current {
        blocks.push(block);
    }

    blocks
}

fn is_keyword_block(first_line: &str, keyword: &str) -> bool {
    first_line == keyword
        || first_line
            .strip_prefix(keyword)
            .is_some_and(|rest| rest.starts_with([' ', '\t']))
}

fn timestamp_ms(caps: &regex::Captures, start_idx: usize, line: usize) -> Result<u64, SubtitleError> {
    let out_of_range = || SubtitleError::Parse {
        line,
        message: format!("cue timestamp out of range: {}", &caps[0]),
    };
    let field = |offset: usize| -> Result<u64, SubtitleError> {
        caps.get(start_idx + offset)
            .map_or(Ok(0), |m| m.as_str().parse().map_err(|_| out_of_range()))
    };

    // Hours are unbounded in WebVTT
    field(0)?
        .checked_mul(3_600_000)
        .and_then(|ms| ms.checked_add(field(1).ok()? * 60_000))
        .and_then(|ms| ms.checked_add(field(2).ok()? * 1_000))
        .and_then(|ms| ms.checked_add(field(3).ok()?))
        .ok_or_else(out_of_range)
}

/// Parse a WebVTT document into subtitle entries.
///
/// A file without cues is valid and yields no entries. A cue whose timing
/// line cannot be read aborts the parse.
pub fn parse_vtt_string(content: &str) -> Result<Vec<SubtitleEntry>, SubtitleError> {
    let content = content.trim_start_matches('\u{FEFF}');

    let header_ok = content
        .lines()
        .next()
        .is_some_and(|first| is_keyword_block(first.trim_end(), SIGNATURE));
    if !header_ok {
        return Err(SubtitleError::Parse {
            line: 1,
            message: format!("missing {} signature", SIGNATURE),
        });
    }

    let mut entries = Vec::new();

    // The first block is the header
    for block in blocks(content).into_iter().skip(1) {
        let first = block.lines[0].trim();
        if is_keyword_block(first, "NOTE")
            || is_keyword_block(first, "STYLE")
            || is_keyword_block(first, "REGION")
        {
            continue;
        }

        // Optional cue identifier before the timing line
        let (timing_offset, timing) = if first.contains("-->") {
            (0, first)
        } else {
            match block.lines.get(1) {
                Some(line) => (1, line.trim()),
                None => {
                    return Err(SubtitleError::Parse {
                        line: block.first_line,
                        message: format!("cue {:?} has no timing line", first),
                    });
                }
            }
        };

        let timing_line = block.first_line + timing_offset;
        let caps = CUE_TIMING_REGEX.captures(timing).ok_or_else(|| SubtitleError::Parse {
            line: timing_line,
            message: format!("invalid cue timing: {}", timing),
        })?;

        let text = block.lines[timing_offset + 1..]
            .iter()
            .map(|line| line.trim())
            .collect::<Vec<_>>()
            .join("\n");

        entries.push(SubtitleEntry::new(
            entries.len() + 1,
            timestamp_ms(&caps, 1, timing_line)?,
            timestamp_ms(&caps, 5, timing_line)?,
            text,
        ));
    }

    Ok(entries)
}

/// Format milliseconds as a WebVTT timestamp (HH:MM:SS.mmm)
pub fn format_vtt_timestamp(ms: u64) -> String {
    SubtitleEntry::format_timestamp(ms).replacen(',', ".", 1)
}

/// Render entries as a WebVTT document
pub fn to_vtt_string(entries: &[SubtitleEntry]) -> String {
    let mut out = String::from("WEBVTT\n\n");

    for entry in entries {
        out.push_str(&format_vtt_timestamp(entry.start_time_ms));
        out.push_str(" --> ");
        out.push_str(&format_vtt_timestamp(entry.end_time_ms));
        out.push('\n');
        out.push_str(&entry.text);
        out.push_str("\n\n");
    }

    out
}
