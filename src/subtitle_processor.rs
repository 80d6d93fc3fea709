use std::fmt;
use std::path::{Path, PathBuf};
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{Result, Context, anyhow};
use log::{warn, debug};
use crate::errors::SubtitleError;
use crate::file_utils::FileManager;
use crate::marker::{self, LineDocument};
use crate::webvtt;

// @module: Subtitle document loading, saving and line access

// @const: SRT timestamp regex
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}:\d{2}:\d{2},\d{3}) --> (\d{2}:\d{2}:\d{2},\d{3})")
        .expect("SRT timestamp pattern is valid")
});

/// Byte order mark some editors put in front of UTF-8 subtitle files
const UTF8_BOM: char = '\u{FEFF}';

/// Supported subtitle file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleFormat {
    Srt,
    WebVtt,
}

impl SubtitleFormat {
    /// Detect the format from a file extension (case-insensitive)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "srt" => Some(Self::Srt),
            "vtt" => Some(Self::WebVtt),
            _ => None,
        }
    }

    /// Detect the format from a path's extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Guess the format by looking at the content itself
    pub fn sniff(content: &str) -> Option<Self> {
        let content = content.trim_start_matches(UTF8_BOM);
        if content.starts_with("WEBVTT") {
            return Some(Self::WebVtt);
        }
        if TIMESTAMP_REGEX.is_match(content) {
            return Some(Self::Srt);
        }
        None
    }

    /// Canonical file extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::WebVtt => "vtt",
        }
    }
}

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    // @field: Sequence number
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Subtitle text, rows separated by '\n'
    pub text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry
    pub fn new(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: String) -> Self {
        SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text,
        }
    }

    // @creates: Validated subtitle entry
    // @validates: Time range and non-empty text
    pub fn new_validated(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: String) -> Result<Self> {
        if end_time_ms <= start_time_ms {
            return Err(anyhow!(
                "Invalid time range: end time {} <= start time {}",
                end_time_ms, start_time_ms
            ));
        }

        let trimmed_text = text.trim();
        if trimmed_text.is_empty() {
            return Err(anyhow!("Empty subtitle text for entry {}", seq_num));
        }

        Ok(SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text: trimmed_text.to_string(),
        })
    }

    /// Parse an SRT (`HH:MM:SS,mmm`) or WebVTT (`HH:MM:SS.mmm`) timestamp to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Result<u64> {
        let parts: Vec<&str> = timestamp.split(&[':', ',', '.'][..]).collect();

        if parts.len() != 4 {
            return Err(anyhow!("Invalid timestamp format: {}", timestamp));
        }

        let hours: u64 = parts[0].parse().context("Failed to parse hours")?;
        let minutes: u64 = parts[1].parse().context("Failed to parse minutes")?;
        let seconds: u64 = parts[2].parse().context("Failed to parse seconds")?;
        let millis: u64 = parts[3].parse().context("Failed to parse milliseconds")?;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(anyhow!("Invalid time components in timestamp: {}", timestamp));
        }

        Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_time_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_time_ms)
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// A subtitle document: ordered entries plus where they came from
#[derive(Debug, Clone)]
pub struct SubtitleCollection {
    /// Source filename
    pub source_file: PathBuf,

    /// Format the document was read from and will be written in
    pub format: SubtitleFormat,

    /// List of subtitle entries, in display order
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleCollection {
    /// Create a new, empty subtitle collection
    pub fn new(source_file: PathBuf, format: SubtitleFormat) -> Self {
        SubtitleCollection {
            source_file,
            format,
            entries: Vec::new(),
        }
    }

    /// Load a subtitle file, detecting its format from the extension or the content
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = FileManager::read_to_string(path)?;

        let format = SubtitleFormat::from_path(path)
            .or_else(|| SubtitleFormat::sniff(&content))
            .ok_or_else(|| SubtitleError::UnsupportedFormat(path.display().to_string()))?;

        let entries = Self::parse_string(&content, format)
            .with_context(|| format!("Failed to parse subtitle file: {}", path.display()))?;

        debug!("Loaded {} entries from {}", entries.len(), path.display());

        Ok(SubtitleCollection {
            source_file: path.to_path_buf(),
            format,
            entries,
        })
    }

    /// Parse content in the given format
    pub fn parse_string(content: &str, format: SubtitleFormat) -> Result<Vec<SubtitleEntry>> {
        match format {
            SubtitleFormat::Srt => Self::parse_srt_string(content),
            SubtitleFormat::WebVtt => Ok(webvtt::parse_vtt_string(content)?),
        }
    }

    /// Render the collection in its own format
    pub fn render(&self) -> String {
        match self.format {
            SubtitleFormat::Srt => self.to_srt_string(),
            SubtitleFormat::WebVtt => webvtt::to_vtt_string(&self.entries),
        }
    }

    /// Render the collection as SRT
    pub fn to_srt_string(&self) -> String {
        self.entries.iter().map(|entry| entry.to_string()).collect()
    }

    /// Render the collection as WebVTT
    pub fn to_vtt_string(&self) -> String {
        webvtt::to_vtt_string(&self.entries)
    }

    /// Write the collection to `path` in its own format.
    ///
    /// The file is replaced atomically, so a failed write never leaves a
    /// half-written subtitle behind.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        FileManager::write_atomically(path, &self.render())
    }

    /// True when the last entry carries nothing but directional marks.
    ///
    /// Older marking tools appended a temporary line and removed it when done,
    /// so such a trailing entry means a previous run was interrupted.
    pub fn has_trailing_marker_line(&self) -> bool {
        self.entries
            .last()
            .is_some_and(|entry| !entry.text.is_empty() && marker::is_marker_only(&entry.text))
    }

    /// True when every entry already starts each of its rows with an embedding mark
    pub fn is_fully_marked(&self) -> bool {
        !self.entries.is_empty() && self.entries.iter().all(|entry| marker::is_marked(&entry.text))
    }

    /// Parse SRT format string into subtitle entries
    pub fn parse_srt_string(content: &str) -> Result<Vec<SubtitleEntry>> {
        let content = content.trim_start_matches(UTF8_BOM);
        let mut entries = Vec::new();

        // State variables for parsing
        let mut current_seq_num: Option<usize> = None;
        let mut current_start_time_ms: Option<u64> = None;
        let mut current_end_time_ms: Option<u64> = None;
        let mut current_text = String::new();
        let mut line_count = 0;
        let mut skipping_block = false;

        let mut add_current_entry = |seq_num: usize, start_ms: u64, end_ms: u64, text: &str| {
            match SubtitleEntry::new_validated(seq_num, start_ms, end_ms, text.to_string()) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!("Skipping invalid subtitle entry {}: {}", seq_num, e),
            }
        };

        for line in content.lines() {
            line_count += 1;
            let trimmed = line.trim();

            // A blank line closes the current entry
            if trimmed.is_empty() {
                skipping_block = false;
                if let (Some(seq_num), Some(start_ms), Some(end_ms)) = (current_seq_num, current_start_time_ms, current_end_time_ms) {
                    if !current_text.is_empty() {
                        add_current_entry(seq_num, start_ms, end_ms, &current_text);

                        current_seq_num = None;
                        current_start_time_ms = None;
                        current_end_time_ms = None;
                        current_text.clear();
                    }
                }
                continue;
            }

            if skipping_block {
                continue;
            }

            // Sequence number, only when starting a new entry
            if current_seq_num.is_none() && current_text.is_empty() {
                if let Ok(num) = trimmed.parse::<usize>() {
                    current_seq_num = Some(num);
                    continue;
                }
            }

            // Timing line
            if current_seq_num.is_some() && current_start_time_ms.is_none() && current_end_time_ms.is_none() {
                if let Some(caps) = TIMESTAMP_REGEX.captures(trimmed) {
                    match (SubtitleEntry::parse_timestamp(&caps[1]), SubtitleEntry::parse_timestamp(&caps[2])) {
                        (Ok(start_ms), Ok(end_ms)) => {
                            current_start_time_ms = Some(start_ms);
                            current_end_time_ms = Some(end_ms);
                        }
                        (Err(e), _) | (_, Err(e)) => {
                            warn!("Skipping subtitle entry at line {}: {}", line_count, e);
                            current_seq_num = None;
                            skipping_block = true;
                        }
                    }
                    continue;
                }
            }

            if current_seq_num.is_some() && current_start_time_ms.is_some() && current_end_time_ms.is_some() {
                if !current_text.is_empty() {
                    current_text.push('\n');
                }
                current_text.push_str(trimmed);
            } else {
                warn!("Unexpected text at line {} before sequence number or timestamp: {}", line_count, trimmed);
            }
        }

        // Add the last entry if there is one
        if let (Some(seq_num), Some(start_ms), Some(end_ms)) = (current_seq_num, current_start_time_ms, current_end_time_ms) {
            if !current_text.is_empty() {
                add_current_entry(seq_num, start_ms, end_ms, &current_text);
            }
        }

        if entries.is_empty() {
            warn!("No valid subtitle entries found in content");
            return Err(SubtitleError::NoEntries.into());
        }

        let mut overlap_count = 0;
        for i in 0..entries.len().saturating_sub(1) {
            if entries[i].end_time_ms > entries[i+1].start_time_ms {
                overlap_count += 1;
            }
        }

        if overlap_count > 0 {
            warn!("Found {} overlapping subtitle entries", overlap_count);
        }

        // Renumber entries to ensure sequential order
        for (i, entry) in entries.iter_mut().enumerate() {
            entry.seq_num = i + 1;
        }

        Ok(entries)
    }
}

impl LineDocument for SubtitleCollection {
    fn line_count(&self) -> usize {
        self.entries.len()
    }

    fn primary_text(&self, index: usize) -> &str {
        &self.entries[index].text
    }

    fn set_primary_text(&mut self, index: usize, text: String) {
        self.entries[index].text = text;
    }
}

impl fmt::Display for SubtitleCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Collection")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Format: {}", self.format.extension())?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        Ok(())
    }
}
