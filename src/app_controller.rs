use anyhow::{anyhow, Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use crate::app_config::Config;
use crate::direction::FirstStrongClassifier;
use crate::file_utils::{FileManager, FileType};
use crate::marker::{DirectionMarker, MarkSummary};
use crate::subtitle_processor::{SubtitleCollection, SubtitleFormat};

// @module: Application controller for directional marking

/// Name of the summary log written into processed folders
pub const ISSUES_LOG_FILE: &str = "bidimark.issues.log";

/// What happened to one input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// The marked document was written to this path
    Marked(PathBuf),
    /// The output already exists and overwriting was not requested
    SkippedExisting(PathBuf),
    /// Every row of the document already carries a directional mark
    SkippedAlreadyMarked,
}

/// Counts reported after a folder run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub marked: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Main application controller
#[derive(Debug, Clone)]
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn marker(&self) -> DirectionMarker<FirstStrongClassifier> {
        DirectionMarker::new(FirstStrongClassifier::new())
            .with_closing_marks(self.config.marking.close_embeddings)
    }

    /// Where the marked version of `input_file`, read as `format`, is written
    pub fn output_path_for(&self, input_file: &Path, output_dir: &Path, format: SubtitleFormat) -> PathBuf {
        if self.config.output.in_place {
            return input_file.to_path_buf();
        }

        FileManager::generate_output_path(input_file, output_dir, &self.config.output.suffix, format.extension())
    }

    /// Mark an already loaded document in place
    pub fn mark_document(&self, subtitles: &mut SubtitleCollection) -> Result<MarkSummary> {
        if subtitles.has_trailing_marker_line() {
            warn!(
                "{} ends with an entry holding only directional marks, a previous marking run may have been interrupted",
                subtitles.source_file.display()
            );
        }

        let summary = self
            .marker()
            .mark_directions(subtitles)
            .with_context(|| format!("Failed to mark {}", subtitles.source_file.display()))?;

        Ok(summary)
    }

    /// Load, mark and save a single subtitle file
    pub fn mark_file(&self, input_file: &Path, output_dir: &Path, force_overwrite: bool) -> Result<FileOutcome> {
        let format = match FileManager::detect_file_type(input_file)? {
            FileType::Subtitle(format) => format,
            FileType::Unknown => {
                return Err(anyhow!("Not a supported subtitle file: {:?}", input_file));
            }
        };

        let output_path = self.output_path_for(input_file, output_dir, format);
        if !self.config.output.in_place && output_path.exists() && !force_overwrite {
            warn!("Skipping {}, output already exists (use -f to force overwrite)", input_file.display());
            return Ok(FileOutcome::SkippedExisting(output_path));
        }

        let mut subtitles = SubtitleCollection::load(input_file)?;

        if self.config.marking.skip_marked_documents && subtitles.is_fully_marked() {
            warn!("Skipping {}, it already carries directional marks", input_file.display());
            return Ok(FileOutcome::SkippedAlreadyMarked);
        }

        let summary = self.mark_document(&mut subtitles)?;
        debug!(
            "{}: {} rtl / {} ltr rows",
            input_file.display(),
            summary.rtl_sub_lines,
            summary.ltr_sub_lines
        );

        subtitles.write_to_file(&output_path)?;
        info!("Success: {}", output_path.display());

        Ok(FileOutcome::Marked(output_path))
    }

    /// Run the workflow for a single file
    pub async fn run(&self, input_file: PathBuf, output_dir: PathBuf, force_overwrite: bool) -> Result<FileOutcome> {
        if !FileManager::file_exists(&input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }
        FileManager::ensure_dir(&output_dir)?;

        let controller = self.clone();
        tokio::task::spawn_blocking(move || controller.mark_file(&input_file, &output_dir, force_overwrite))
            .await
            .map_err(|e| anyhow!("Marking task failed: {}", e))?
    }

    /// Run the workflow over every subtitle file below `input_dir`.
    ///
    /// Each marked file is written next to its source. Files that are outputs
    /// of a previous run are ignored.
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<FolderSummary> {
        let start_time = std::time::Instant::now();

        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let suffix = self.config.output.suffix.clone();
        let files: Vec<PathBuf> = FileManager::find_subtitle_files(&input_dir)?
            .into_iter()
            .filter(|path| self.config.output.in_place || !FileManager::is_generated_output(path, &suffix))
            .collect();

        if files.is_empty() {
            return Err(anyhow!("No subtitle files found in directory: {:?}", input_dir));
        }

        let folder_pb = ProgressBar::new(files.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("=> "));
        folder_pb.set_message("Marking");

        let results: Vec<(PathBuf, Result<FileOutcome>)> = stream::iter(files.into_iter().map(|file| {
            let controller = self.clone();
            let pb = folder_pb.clone();
            async move {
                let output_dir = file
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."));
                let task_file = file.clone();
                let result = tokio::task::spawn_blocking(move || {
                    controller.mark_file(&task_file, &output_dir, force_overwrite)
                })
                .await
                .map_err(|e| anyhow!("Marking task failed: {}", e))
                .and_then(|outcome| outcome);
                pb.inc(1);
                (file, result)
            }
        }))
        .buffer_unordered(self.config.concurrent_files)
        .collect()
        .await;

        folder_pb.finish_and_clear();

        let mut summary = FolderSummary::default();
        for (file, result) in results {
            match result {
                Ok(FileOutcome::Marked(_)) => summary.marked += 1,
                Ok(_) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing file {}: {:#}", file.display(), e);
                    summary.failed += 1;
                }
            }
        }

        let summary_message = format!(
            "Folder processing completed: {} marked, {} skipped, {} errors",
            summary.marked, summary.skipped, summary.failed
        );
        info!("{}", summary_message);

        let log_file_path = input_dir.join(ISSUES_LOG_FILE);
        let log_line = format!(
            "{} - {} - Duration: {}",
            input_dir.display(),
            summary_message,
            Self::format_duration(start_time.elapsed())
        );
        if let Err(e) = FileManager::append_to_log_file(&log_file_path, &log_line) {
            warn!("Failed to write folder log: {}", e);
        }

        Ok(summary)
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
