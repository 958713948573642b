use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::subtitle_processor::SubtitleCollection;
use crate::timing::{pace_bilingual, LanguagePacing, PacingConfig, Segment, Track, TimelineBuilder};
use crate::translation::{ChatService, LlmSegmenter, LlmTranslator, RuleSegmenter, Segmenter, Translator};

// @module: Application controller for bilingual subtitle generation

/// Result of processing one input
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Subtitle files were written
    Written {
        // @field: Written files, source track first
        outputs: Vec<PathBuf>,
        // @field: Number of subtitle entries per track
        segments: usize,
    },
    /// Outputs already existed and overwriting was not requested
    Skipped,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Raw text to segments
    segmenter: Box<dyn Segmenter>,
    // @field: Segments to translations
    translator: Box<dyn Translator>,
    // @field: Translation progress, hidden between runs
    progress: ProgressBar,
}

impl Controller {
    // @method: Create a controller using the configured LLM provider
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;

        let chat = ChatService::new(&config.translation)
            .context("Failed to create chat service")?;
        let progress = ProgressBar::hidden();

        let bar = progress.clone();
        let translator = LlmTranslator::new(chat.clone())
            .with_progress(Arc::new(move |done: usize, _total: usize| bar.set_position(done as u64)));
        let segmenter = LlmSegmenter::new(chat, config.source_language.clone());

        Ok(Self {
            config,
            segmenter: Box::new(segmenter),
            translator: Box::new(translator),
            progress,
        })
    }

    // @method: Create a controller with explicit collaborators
    pub fn with_collaborators(
        config: Config,
        segmenter: Box<dyn Segmenter>,
        translator: Box<dyn Translator>,
    ) -> Result<Self> {
        config.validate_offline()?;
        Ok(Self {
            config,
            segmenter,
            translator,
            progress: ProgressBar::hidden(),
        })
    }

    /// Controller for the offline modes (align, split); translation is unavailable
    pub fn offline(config: Config) -> Result<Self> {
        Self::with_collaborators(config, Box::new(RuleSegmenter), Box::new(OfflineTranslator))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Segment, translate and time one text file, writing both tracks
    pub async fn run(&self, input_file: PathBuf, output_dir: PathBuf, force_overwrite: bool) -> Result<RunOutcome> {
        let start_time = Instant::now();

        if !FileManager::file_exists(&input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }
        FileManager::ensure_dir(&output_dir)?;

        let outputs = self.bilingual_output_paths(&input_file, &output_dir);
        if !force_overwrite && outputs.iter().any(|p| p.exists()) {
            warn!("Skipping {:?}, subtitles already exist (use -f to force overwrite)", input_file);
            return Ok(RunOutcome::Skipped);
        }

        let raw_text = FileManager::read_to_string(&input_file)?;
        let source_segments = self
            .segmenter
            .segment(&raw_text)
            .await
            .with_context(|| format!("Failed to segment {:?}", input_file))?;
        if source_segments.is_empty() {
            return Err(anyhow!("No text to subtitle in {:?}", input_file));
        }
        info!("Segmented {:?} into {} segments", input_file, source_segments.len());

        let target_segments = self.translate_with_progress(&source_segments).await?;

        let outcome = self.write_bilingual(source_segments, target_segments, outputs)?;
        info!("Completed {:?} in {}", input_file, Self::format_duration(start_time.elapsed()));
        Ok(outcome)
    }

    /// Time pre-aligned source and target files (one segment per line)
    pub fn run_aligned(
        &self,
        source_file: &Path,
        target_file: &Path,
        output_dir: &Path,
        force_overwrite: bool,
    ) -> Result<RunOutcome> {
        FileManager::ensure_dir(output_dir)?;

        let outputs = self.bilingual_output_paths(source_file, output_dir);
        if !force_overwrite && outputs.iter().any(|p| p.exists()) {
            warn!("Skipping {:?}, subtitles already exist (use -f to force overwrite)", source_file);
            return Ok(RunOutcome::Skipped);
        }

        let source_lines = FileManager::read_segment_lines(source_file)?;
        let target_lines = FileManager::read_segment_lines(target_file)?;
        self.write_bilingual(source_lines, target_lines, outputs)
    }

    /// Split a text offline and time it as a single track in `language`
    pub async fn run_split(
        &self,
        input_file: &Path,
        output_dir: &Path,
        language: &str,
        force_overwrite: bool,
    ) -> Result<RunOutcome> {
        FileManager::ensure_dir(output_dir)?;

        let output = FileManager::generate_output_path(input_file, output_dir, language, "srt");
        if output.exists() && !force_overwrite {
            warn!("Skipping {:?}, {:?} already exists", input_file, output);
            return Ok(RunOutcome::Skipped);
        }

        let raw_text = FileManager::read_to_string(input_file)?;
        let segments = RuleSegmenter.segment(&raw_text).await?;

        let pacing = self.pacing_for_language(language)?;
        let builder = TimelineBuilder::new(pacing.config, pacing.mode)?;
        let track = Track::build(Segment::sequence(segments), &builder)?;

        SubtitleCollection::from_track(&track, language).write_to_srt(&output)?;
        info!("Wrote {} entries to {:?}", track.len(), output);

        Ok(RunOutcome::Written {
            outputs: vec![output],
            segments: track.len(),
        })
    }

    /// Process every `.txt` file in a directory.
    ///
    /// Outputs go next to each input, or under `output_dir` mirroring the
    /// input's sub-directories when one is given.
    pub async fn run_folder(
        &self,
        input_dir: PathBuf,
        output_dir: Option<PathBuf>,
        force_overwrite: bool,
    ) -> Result<Vec<RunOutcome>> {
        let start_time = Instant::now();

        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let files = FileManager::find_files(&input_dir, "txt")?;
        if files.is_empty() {
            warn!("No .txt files found in {:?}", input_dir);
            return Ok(Vec::new());
        }

        let mut outcomes = Vec::with_capacity(files.len());
        let mut failed = 0;
        for file in files {
            let parent = file.parent().unwrap_or(input_dir.as_path());
            let file_output_dir = match &output_dir {
                Some(root) => parent
                    .strip_prefix(&input_dir)
                    .map(|relative| root.join(relative))
                    .unwrap_or_else(|_| root.clone()),
                None => parent.to_path_buf(),
            };
            match self.run(file.clone(), file_output_dir, force_overwrite).await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    failed += 1;
                    warn!("Failed to process {:?}: {:#}", file, e);
                }
            }
        }

        info!(
            "Processed {} files ({} failed) in {}",
            outcomes.len() + failed,
            failed,
            Self::format_duration(start_time.elapsed())
        );
        Ok(outcomes)
    }

    async fn translate_with_progress(&self, segments: &[String]) -> Result<Vec<String>> {
        self.progress.set_draw_target(ProgressDrawTarget::stderr());
        self.progress.set_length(segments.len() as u64);
        self.progress.set_position(0);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} segments ({percent}%) {eta}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        self.progress.set_style(style.progress_chars("█▓▒░"));

        let result = self
            .translator
            .translate(segments, &self.config.source_language, &self.config.target_language)
            .await;

        self.progress.finish_and_clear();
        self.progress.set_draw_target(ProgressDrawTarget::hidden());
        result.context("Translation failed")
    }

    /// Pace both languages on one timeline and write the two SRT files
    fn write_bilingual(&self, source: Vec<String>, target: Vec<String>, outputs: [PathBuf; 2]) -> Result<RunOutcome> {
        let tracks = pace_bilingual(
            Segment::sequence(source),
            Segment::sequence(target),
            self.config.pacing.basis,
            self.config.source_pacing()?,
            self.config.target_pacing()?,
        )?;

        let [source_path, target_path] = outputs;
        SubtitleCollection::from_track(&tracks.source, &self.config.source_language).write_to_srt(&source_path)?;
        SubtitleCollection::from_track(&tracks.target, &self.config.target_language).write_to_srt(&target_path)?;
        info!("Wrote {:?} and {:?}", source_path, target_path);

        Ok(RunOutcome::Written {
            outputs: vec![source_path, target_path],
            segments: tracks.source.len(),
        })
    }

    fn bilingual_output_paths(&self, input_file: &Path, output_dir: &Path) -> [PathBuf; 2] {
        [
            FileManager::generate_output_path(input_file, output_dir, self.config.source_suffix(), "srt"),
            FileManager::generate_output_path(input_file, output_dir, self.config.target_suffix(), "srt"),
        ]
    }

    fn pacing_for_language(&self, language: &str) -> Result<LanguagePacing> {
        if language_utils::language_codes_match(language, &self.config.source_language) {
            return self.config.source_pacing();
        }
        if language_utils::language_codes_match(language, &self.config.target_language) {
            return self.config.target_pacing();
        }
        let mode = language_utils::language_mode_for(language)?;
        Ok(LanguagePacing::new(PacingConfig::default_for(mode), mode))
    }

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

/// Translator for offline controllers; any call is an error
struct OfflineTranslator;

#[async_trait::async_trait]
impl Translator for OfflineTranslator {
    async fn translate(&self, _segments: &[String], _source: &str, _target: &str) -> Result<Vec<String>> {
        Err(anyhow!("Translation is not available in offline mode"))
    }
}
