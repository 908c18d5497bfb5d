use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::analysis::{AnalysisResult, AnalysisService};
use crate::app_config::Config;
use crate::errors::AnalysisError;
use crate::fallback::{self, FallbackSegment};
use crate::file_utils::FileManager;
use crate::providers::openrouter::{ChatRequest, ChatResponse, OpenRouter};
use crate::providers::Provider;
use crate::sentences::{SentenceCard, SentenceView};
use crate::slang::{SlangLookup, UrbanDictionary};
use crate::subtitle_processor::{Cue, CueCollection};

// @module: Application controller for subtitle processing

// @const: Suffix of the card files written next to processed subtitles
pub const SENTENCES_SUFFIX: &str = "sentences.json";

/// One card together with its analysis outcome
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedSentence {
    pub card: SentenceCard,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalyzedSentence {
    fn new(card: SentenceCard, outcome: Result<AnalysisResult, AnalysisError>) -> Self {
        match outcome {
            Ok(analysis) => Self { card, analysis: Some(analysis), error: None },
            Err(e) => Self { card, analysis: None, error: Some(e.to_string()) },
        }
    }
}

/// Counts reported after a folder run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    /// The active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read and parse a subtitle file
    pub fn load_cues(&self, input_file: &Path) -> Result<CueCollection> {
        if !FileManager::file_exists(input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let content = FileManager::read_subtitle_file(input_file, self.config.upload.max_file_size_bytes)?;
        let collection = CueCollection::from_content(input_file.to_path_buf(), &content)
            .with_context(|| format!("Failed to parse subtitle file: {:?}", input_file))?;

        debug!("Loaded {} cues ({}) from {:?}", collection.len(), collection.format, input_file);
        Ok(collection)
    }

    /// Sentence cards for one subtitle file
    pub fn sentences(&self, input_file: &Path) -> Result<Vec<SentenceCard>> {
        let collection = self.load_cues(input_file)?;
        let view = SentenceView::new(collection.cues, self.config.normalizer.clone());
        Ok(view.cards().to_vec())
    }

    /// Coarse fallback segments for one subtitle file
    pub fn segments(&self, input_file: &Path) -> Result<Vec<FallbackSegment>> {
        let collection = self.load_cues(input_file)?;
        Ok(fallback::segment_cues(&collection.cues))
    }

    /// Write `<stem>.sentences.json` for one file; returns `None` when skipped
    pub fn process_file(&self, input_file: &Path, output_dir: &Path, force_overwrite: bool) -> Result<Option<PathBuf>> {
        let output_path = FileManager::generate_output_path(input_file, output_dir, SENTENCES_SUFFIX);
        if output_path.exists() && !force_overwrite {
            warn!("Skipping {:?}, output already exists (use -f to force overwrite)", input_file);
            return Ok(None);
        }

        let cards = self.sentences(input_file)?;
        let json = serde_json::to_string_pretty(&cards).context("Failed to serialize sentence cards")?;
        FileManager::write_to_file(&output_path, &json)?;

        info!("Success: {} ({} sentences)", output_path.display(), cards.len());
        Ok(Some(output_path))
    }

    /// Process every subtitle file below `input_dir`.
    ///
    /// Output goes next to each input unless `output_dir` is given. A failing
    /// file is logged and counted; the remaining files are still processed.
    pub fn process_folder(&self, input_dir: &Path, output_dir: Option<&Path>, force_overwrite: bool) -> Result<FolderSummary> {
        let start_time = Instant::now();

        if !FileManager::dir_exists(input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let files = FileManager::find_subtitle_files(input_dir)?;
        if files.is_empty() {
            return Err(anyhow!("No subtitle files found in directory: {:?}", input_dir));
        }

        let folder_pb = ProgressBar::new(files.len() as u64);
        folder_pb.set_style(progress_style("files"));
        folder_pb.set_message("Processing files");

        let mut summary = FolderSummary::default();

        for file in &files {
            let file_name = file.file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            let target_dir = match output_dir {
                Some(dir) => dir.to_path_buf(),
                None => file.parent().map(Path::to_path_buf).unwrap_or_else(|| input_dir.to_path_buf()),
            };

            match self.process_file(file, &target_dir, force_overwrite) {
                Ok(Some(_)) => summary.processed += 1,
                Ok(None) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing file {}: {:#}", file_name, e);
                    summary.failed += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_and_clear();

        info!(
            "Folder processing completed in {}: {} processed, {} skipped, {} errors",
            format_duration(start_time.elapsed()),
            summary.processed,
            summary.skipped,
            summary.failed
        );

        Ok(summary)
    }

    /// Analyse one card (`index`) or every card of a subtitle file through OpenRouter
    pub async fn analyze(&self, input_file: &Path, index: Option<usize>, series_name: Option<&str>) -> Result<Vec<AnalyzedSentence>> {
        self.config.validate_for_analysis()?;

        let analysis = &self.config.analysis;
        let provider = OpenRouter::new(
            analysis.resolved_api_key(),
            analysis.endpoint.clone(),
            analysis.model.clone(),
            analysis.timeout_secs,
        );

        let slang = self.config.slang.enabled.then(|| {
            UrbanDictionary::new(
                self.config.slang.endpoint.clone(),
                self.config.slang.limit,
                Duration::from_secs(self.config.slang.cache_ttl_secs),
                Duration::from_secs(analysis.timeout_secs),
            )
        });

        info!("Analysis model: {}", provider.model());
        let service = AnalysisService::new(provider, slang, analysis.clone());
        self.analyze_with(&service, input_file, index, series_name).await
    }

    /// Analyse a subtitle file with an already constructed service
    pub async fn analyze_with<P, S>(
        &self,
        service: &AnalysisService<P, S>,
        input_file: &Path,
        index: Option<usize>,
        series_name: Option<&str>,
    ) -> Result<Vec<AnalyzedSentence>>
    where
        P: Provider<Request = ChatRequest, Response = ChatResponse>,
        S: SlangLookup,
    {
        let collection = self.load_cues(input_file)?;
        analyze_cues(service, collection.cues, &self.config, index, series_name).await
    }
}

/// Analyse cues already in memory
pub async fn analyze_cues<P, S>(
    service: &AnalysisService<P, S>,
    cues: Vec<Cue>,
    config: &Config,
    index: Option<usize>,
    series_name: Option<&str>,
) -> Result<Vec<AnalyzedSentence>>
where
    P: Provider<Request = ChatRequest, Response = ChatResponse>,
    S: SlangLookup,
{
    let start_time = Instant::now();
    let view = SentenceView::new(cues, config.normalizer.clone());

    if let Some(index) = index {
        let context = view.context_for(index).ok_or_else(|| {
            anyhow!("Sentence index {} is out of range ({} sentences)", index, view.cards().len())
        })?;
        let outcome = service.create_translation_guide(&context, series_name).await;
        return Ok(vec![AnalyzedSentence::new(view.cards()[index].clone(), outcome)]);
    }

    let cards = view.cards();
    let progress_bar = ProgressBar::new(cards.len() as u64);
    progress_bar.set_style(progress_style("sentences"));
    progress_bar.set_message("Analysing");

    let pb = progress_bar.clone();
    let outcomes = service
        .analyze_cards(cards, series_name, move |completed, _total| pb.set_position(completed as u64))
        .await;

    progress_bar.finish_and_clear();

    let analyzed: Vec<AnalyzedSentence> = cards
        .iter()
        .cloned()
        .zip(outcomes)
        .map(|(card, outcome)| AnalyzedSentence::new(card, outcome))
        .collect();

    let failures = analyzed.iter().filter(|a| a.error.is_some()).count();
    if failures > 0 {
        warn!("Analysis completed with {} failed sentences.", failures);
    }
    info!("Analysed {} sentences in {}.", analyzed.len(), format_duration(start_time.elapsed()));

    Ok(analyzed)
}

fn progress_style(unit: &str) -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{percent}}%) {{msg}} {{eta}}",
            unit
        ))
        .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-")
}

// Format duration in a human-readable format
fn format_duration(duration: Duration) -> String {
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
