use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::export::ExportCommand;
use crate::file_utils::{FileManager, FileType};
use crate::screenplay::{
    demote_section, expand_templates, promote_section, shift_block, Classifier, EditScript,
    Element, Paginator, SceneNumbering, Script, ShiftDirection, TemplateValues,
};

// @module: Application controller for screenplay processing

/// Text-changing operation applied to a script file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptOperation {
    // @operation: Number scenes that have no number yet
    AddSceneNumbers,
    // @operation: Strip every scene number
    RemoveSceneNumbers,
    // @operation: Strip then add, giving sequential numbers
    Renumber,
    // @operation: Insert page break markers
    Paginate,
    // @operation: Expand template tokens with an optional title
    ExpandTemplates { title: Option<String> },
}

impl ScriptOperation {
    // @returns: Human readable operation name
    pub fn display_name(&self) -> &str {
        match self {
            Self::AddSceneNumbers => "Add scene numbers",
            Self::RemoveSceneNumbers => "Remove scene numbers",
            Self::Renumber => "Renumber scenes",
            Self::Paginate => "Paginate",
            Self::ExpandTemplates { .. } => "Expand templates",
        }
    }

    /// Suffix for output files written into a directory
    pub fn file_suffix(&self) -> &str {
        match self {
            Self::AddSceneNumbers => "numbered",
            Self::RemoveSceneNumbers => "unnumbered",
            Self::Renumber => "renumbered",
            Self::Paginate => "paginated",
            Self::ExpandTemplates { .. } => "expanded",
        }
    }
}

/// Main application controller for screenplay files
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Classifier built from the configured keywords
    classifier: Classifier,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let classifier = Classifier::new(&config.classifier)
            .context("Failed to build line classifier from configuration")?;

        Ok(Self { config, classifier })
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read a script file into a snapshot
    pub fn load_script<P: AsRef<Path>>(&self, path: P) -> Result<Script> {
        let path = path.as_ref();
        if !FileManager::file_exists(path) {
            return Err(anyhow::anyhow!("Input file does not exist: {:?}", path));
        }
        Ok(Script::new(FileManager::read_to_string(path)?))
    }

    /// Classify every line of a script
    pub fn classify(&self, script: &Script) -> Vec<Element> {
        self.classifier.classify_script(script)
    }

    /// Number every unnumbered scene heading
    pub fn add_scene_numbers(&self, script: &Script) -> Result<Script> {
        let elements = self.classify(script);
        let numbering = SceneNumbering::new(&self.config.numbering);

        let progress_bar = Self::create_progress_bar(0, "scenes");
        let edits = numbering.add_numbers_to_document(script, &elements, |done, total| {
            progress_bar.set_length(total as u64);
            progress_bar.set_position(done as u64);
        });
        progress_bar.finish_and_clear();

        Ok(edits?.apply_to(script))
    }

    /// Strip every scene number annotation
    pub fn remove_scene_numbers(&self, script: &Script) -> Script {
        let elements = self.classify(script);
        SceneNumbering::new(&self.config.numbering)
            .remove_numbers_from_document(script, &elements)
            .apply_to(script)
    }

    /// Insert page break markers at every computed break
    pub fn paginate(&self, script: &Script) -> Script {
        let elements = self.classify(script);
        let paginator = Paginator::new(&self.config.pagination);

        let progress_bar = Self::create_progress_bar(elements.len() as u64, "lines");
        let edits = paginator.paginate_document(script, &elements, |done, _| {
            progress_bar.set_position(done as u64);
        });
        progress_bar.finish_and_clear();

        edits.apply_to(script)
    }

    /// Page of a 1-based line and the total page count
    pub fn locate_page(&self, script: &Script, line: usize) -> (usize, usize) {
        let elements = self.classify(script);
        Paginator::new(&self.config.pagination).locate_current_page(
            script,
            &elements,
            line.saturating_sub(1),
        )
    }

    /// Insert a page break before the block containing a 1-based line
    pub fn insert_page_break(&self, script: &Script, line: usize) -> Result<Script> {
        let elements = self.classify(script);
        let edits = Paginator::new(&self.config.pagination).page_break_at(
            script,
            &elements,
            line.saturating_sub(1),
        )?;
        Ok(edits.apply_to(script))
    }

    /// Expand template tokens
    pub fn expand(&self, script: &Script, title: Option<&str>) -> Script {
        let values = TemplateValues::from_config(&self.config.template, title);
        expand_templates(script, &values).apply_to(script)
    }

    /// Shift the scene or section at a 1-based line
    pub fn shift(&self, script: &Script, line: usize, direction: ShiftDirection) -> Result<Script> {
        let elements = self.classify(script);
        let edits = shift_block(script, &elements, line.saturating_sub(1), direction)?;
        Ok(edits.apply_to(script))
    }

    /// Change the level of the section at a 1-based line
    pub fn change_section_level(&self, script: &Script, line: usize, promote: bool) -> Result<Script> {
        let elements = self.classify(script);
        let index = line.saturating_sub(1);
        let edits: EditScript = if promote {
            promote_section(script, &elements, index)?
        } else {
            demote_section(script, &elements, index)?
        };
        Ok(edits.apply_to(script))
    }

    /// Apply an operation to a script snapshot
    pub fn apply(&self, operation: &ScriptOperation, script: &Script) -> Result<Script> {
        match operation {
            ScriptOperation::AddSceneNumbers => self.add_scene_numbers(script),
            ScriptOperation::RemoveSceneNumbers => Ok(self.remove_scene_numbers(script)),
            ScriptOperation::Renumber => {
                let stripped = self.remove_scene_numbers(script);
                self.add_scene_numbers(&stripped)
            }
            ScriptOperation::Paginate => Ok(self.paginate(script)),
            ScriptOperation::ExpandTemplates { title } => Ok(self.expand(script, title.as_deref())),
        }
    }

    /// Run an operation on one file, writing to `output` or in place
    pub fn run(&self, operation: &ScriptOperation, input_file: &Path, output: Option<&Path>) -> Result<PathBuf> {
        let start_time = std::time::Instant::now();

        let script = self.load_script(input_file)?;
        let result = self
            .apply(operation, &script)
            .with_context(|| format!("{} failed for {:?}", operation.display_name(), input_file))?;

        let output_path = match output {
            Some(dir) if FileManager::dir_exists(dir) => {
                let extension = input_file
                    .extension()
                    .map(|ext| ext.to_string_lossy().to_string())
                    .unwrap_or_else(|| "fountain".to_string());
                FileManager::generate_output_path(input_file, dir, operation.file_suffix(), &extension)
            }
            Some(file) => file.to_path_buf(),
            None => input_file.to_path_buf(),
        };
        if result == script && output_path == input_file {
            debug!("No changes for {:?}", input_file);
            return Ok(output_path);
        }

        FileManager::write_to_file(&output_path, result.text())?;
        info!(
            "{}: {} ({})",
            operation.display_name(),
            output_path.display(),
            Self::format_duration(start_time.elapsed())
        );
        Ok(output_path)
    }

    /// Run an operation in place on every script in a directory
    pub fn run_folder(&self, operation: &ScriptOperation, input_dir: &Path) -> Result<()> {
        if !FileManager::dir_exists(input_dir) {
            return Err(anyhow::anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let scripts = FileManager::find_scripts(input_dir)?;
        if scripts.is_empty() {
            return Err(anyhow::anyhow!("No screenplay files found in directory: {:?}", input_dir));
        }

        let folder_pb = Self::create_progress_bar(scripts.len() as u64, "files");
        folder_pb.set_message("Processing files");

        let mut success_count = 0;
        let mut error_count = 0;
        let mut skip_count = 0;

        for script_file in &scripts {
            let file_name = script_file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            match FileManager::detect_file_type(script_file) {
                Ok(FileType::Screenplay) => {}
                _ => {
                    warn!("Skipping {}, not a screenplay file", file_name);
                    skip_count += 1;
                    folder_pb.inc(1);
                    continue;
                }
            }

            match self.run(operation, script_file, None) {
                Ok(_) => success_count += 1,
                Err(e) => {
                    error!("Error processing file {}: {:#}", file_name, e);
                    error_count += 1;
                }
            }
            folder_pb.inc(1);
        }

        folder_pb.finish_and_clear();
        info!(
            "Processed {} files: {} succeeded, {} failed, {} skipped",
            scripts.len(),
            success_count,
            error_count,
            skip_count
        );

        if error_count > 0 {
            return Err(anyhow::anyhow!("{} of {} files failed", error_count, scripts.len()));
        }
        Ok(())
    }

    /// Hand the raw markup file to the configured export program
    pub async fn export(&self, source: Option<&Path>) -> Result<PathBuf> {
        let command = ExportCommand::prepare(&self.config.export, source)?;
        command.run().await
    }

    fn create_progress_bar(length: u64, unit: &str) -> ProgressBar {
        let progress_bar = ProgressBar::new(length);
        let template = format!(
            "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{percent}}%) {{msg}}",
            unit
        );
        let style = ProgressStyle::default_bar()
            .template(&template)
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;

        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
