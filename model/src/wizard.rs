//! Step machines for the multi-screen flows.
//!
//! Each flow holds one step value plus the payload that later steps need.
//! Steps change only through the methods below; an action that is not valid
//! for the current step returns [`ModelError::InvalidTransition`] and leaves
//! the flow untouched.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::category::{CategoryBoard, Readiness};
use crate::error::{ModelError, ModelResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryStep {
    Select,
    CreationSelect,
    AutoLevel,
    ManualSelect,
    ManualNew,
    ManualExisting,
    AutoCategory,
    Processing,
    DbCreation,
    Complete,
}

impl CategoryStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryStep::Select => "select",
            CategoryStep::CreationSelect => "creation-select",
            CategoryStep::AutoLevel => "auto-level",
            CategoryStep::ManualSelect => "manual-select",
            CategoryStep::ManualNew => "manual-new",
            CategoryStep::ManualExisting => "manual-existing",
            CategoryStep::AutoCategory => "auto-category",
            CategoryStep::Processing => "processing",
            CategoryStep::DbCreation => "db-creation",
            CategoryStep::Complete => "complete",
        }
    }
}

impl fmt::Display for CategoryStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreationType {
    Auto,
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManualType {
    New,
    Existing,
}

/// Granularity of AI category generation, 1 (coarse) to 4 (fine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GenerationLevel(u8);

impl GenerationLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 4;

    pub fn new(level: u8) -> ModelResult<Self> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(Self(level))
        } else {
            Err(ModelError::validation("level", format!("Level must be between {} and {}.", Self::MIN, Self::MAX)))
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl Default for GenerationLevel {
    fn default() -> Self {
        Self(2)
    }
}

/// What the processing step runs, handed over when it starts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessingPlan {
    pub files: Vec<String>,
    pub creation_type: Option<CreationType>,
    pub manual_type: Option<ManualType>,
    pub level: Option<GenerationLevel>,
    /// Category name to sample doc ids; only for new manual categories.
    pub category_structure: Option<BTreeMap<String, Vec<String>>>,
}

/// Category-creation wizard.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryWizard {
    step: CategoryStep,
    creation_type: Option<CreationType>,
    manual_type: Option<ManualType>,
    level: GenerationLevel,
    plan: Option<ProcessingPlan>,
}

impl Default for CategoryWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryWizard {
    pub fn new() -> Self {
        Self { step: CategoryStep::Select, creation_type: None, manual_type: None, level: GenerationLevel::default(), plan: None }
    }

    pub fn step(&self) -> CategoryStep {
        self.step
    }

    pub fn creation_type(&self) -> Option<CreationType> {
        self.creation_type
    }

    pub fn manual_type(&self) -> Option<ManualType> {
        self.manual_type
    }

    pub fn level(&self) -> GenerationLevel {
        self.level
    }

    pub fn plan(&self) -> Option<&ProcessingPlan> {
        self.plan.as_ref()
    }

    fn expect(&self, allowed: &[CategoryStep], action: &'static str) -> ModelResult<()> {
        if allowed.contains(&self.step) {
            Ok(())
        } else {
            Err(ModelError::InvalidTransition { from: self.step.as_str(), action })
        }
    }

    fn go(&mut self, to: CategoryStep) {
        tracing::debug!(from = %self.step, to = %to, "category wizard step");
        self.step = to;
    }

    pub fn start(&mut self, selected_files: usize) -> ModelResult<()> {
        self.expect(&[CategoryStep::Select], "start")?;
        if selected_files == 0 {
            return Err(ModelError::validation("files", "Please select files to classify."));
        }
        self.go(CategoryStep::CreationSelect);
        Ok(())
    }

    pub fn choose_auto(&mut self) -> ModelResult<()> {
        self.expect(&[CategoryStep::CreationSelect], "choose auto generation")?;
        self.creation_type = Some(CreationType::Auto);
        self.manual_type = None;
        self.go(CategoryStep::AutoLevel);
        Ok(())
    }

    pub fn choose_manual(&mut self) -> ModelResult<()> {
        self.expect(&[CategoryStep::CreationSelect], "choose manual creation")?;
        self.creation_type = Some(CreationType::Manual);
        self.go(CategoryStep::ManualSelect);
        Ok(())
    }

    /// Starts authoring new categories; the board is reset.
    pub fn manual_new(&mut self, board: &mut CategoryBoard) -> ModelResult<()> {
        self.expect(&[CategoryStep::ManualSelect], "create new categories")?;
        self.manual_type = Some(ManualType::New);
        board.clear();
        self.go(CategoryStep::ManualNew);
        Ok(())
    }

    pub fn manual_existing(&mut self) -> ModelResult<()> {
        self.expect(&[CategoryStep::ManualSelect], "use existing categories")?;
        self.manual_type = Some(ManualType::Existing);
        self.go(CategoryStep::ManualExisting);
        Ok(())
    }

    /// Opens the sample-document filtering screen once every category has
    /// enough samples.
    pub fn filter_samples(&mut self, board: &CategoryBoard) -> ModelResult<()> {
        self.expect(&[CategoryStep::ManualNew], "filter sample documents")?;
        ensure_ready(board)?;
        self.go(CategoryStep::AutoCategory);
        Ok(())
    }

    pub fn set_level(&mut self, level: u8) -> ModelResult<()> {
        self.level = GenerationLevel::new(level)?;
        Ok(())
    }

    pub fn previous(&mut self) -> ModelResult<()> {
        let to = match self.step {
            CategoryStep::AutoLevel | CategoryStep::ManualSelect => CategoryStep::CreationSelect,
            CategoryStep::ManualNew | CategoryStep::ManualExisting => {
                self.manual_type = None;
                CategoryStep::ManualSelect
            }
            CategoryStep::AutoCategory => CategoryStep::ManualNew,
            CategoryStep::CreationSelect => CategoryStep::Select,
            _ => return Err(ModelError::InvalidTransition { from: self.step.as_str(), action: "go back" }),
        };
        self.go(to);
        Ok(())
    }

    /// Enters the processing step with the files (already in tree order) and
    /// the creation settings chosen so far.
    pub fn start_processing(&mut self, files: Vec<String>, board: &CategoryBoard) -> ModelResult<&ProcessingPlan> {
        self.expect(
            &[CategoryStep::AutoLevel, CategoryStep::ManualNew, CategoryStep::ManualExisting, CategoryStep::AutoCategory],
            "start processing",
        )?;
        let new_manual =
            self.creation_type == Some(CreationType::Manual) && self.manual_type == Some(ManualType::New);
        if new_manual {
            ensure_ready(board)?;
        }
        let category_structure = new_manual.then(|| board.training_structure());
        let level = (self.creation_type == Some(CreationType::Auto)).then_some(self.level);
        self.go(CategoryStep::Processing);
        Ok(self.plan.insert(ProcessingPlan {
            files,
            creation_type: self.creation_type,
            manual_type: self.manual_type,
            level,
            category_structure,
        }))
    }

    /// Backs out of the current step. Never undoes backend work already done.
    /// Processing and expert DB creation both return to the settings step.
    pub fn cancel(&mut self) -> ModelResult<()> {
        let to = match self.step {
            CategoryStep::Processing | CategoryStep::DbCreation => match (self.creation_type, self.manual_type) {
                (Some(CreationType::Auto), _) => CategoryStep::AutoLevel,
                (_, Some(ManualType::New)) => CategoryStep::ManualNew,
                _ => CategoryStep::ManualExisting,
            },
            CategoryStep::Complete => {
                return Err(ModelError::InvalidTransition { from: self.step.as_str(), action: "cancel" })
            }
            _ => CategoryStep::Select,
        };
        self.go(to);
        Ok(())
    }

    pub fn processing_finished(&mut self) -> ModelResult<()> {
        self.expect(&[CategoryStep::Processing], "finish processing")?;
        self.go(CategoryStep::DbCreation);
        Ok(())
    }

    pub fn db_creation_finished(&mut self) -> ModelResult<()> {
        self.expect(&[CategoryStep::DbCreation], "finish expert DB creation")?;
        self.go(CategoryStep::Complete);
        Ok(())
    }

    /// Acknowledges completion and resets the flow to the file list.
    pub fn confirm(&mut self) -> ModelResult<()> {
        self.expect(&[CategoryStep::Complete], "confirm")?;
        self.creation_type = None;
        self.manual_type = None;
        self.plan = None;
        self.go(CategoryStep::Select);
        Ok(())
    }
}

fn ensure_ready(board: &CategoryBoard) -> ModelResult<()> {
    match board.readiness() {
        Readiness::Ready { .. } => Ok(()),
        Readiness::NotReady { message } => Err(ModelError::validation("categories", message)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BatchStep {
    Browse,
    Processing,
    Complete,
}

impl BatchStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStep::Browse => "browse",
            BatchStep::Processing => "processing",
            BatchStep::Complete => "complete",
        }
    }
}

/// The browse → processing → complete flow shared by the OCR run and the
/// document classification run. Carries the files picked for the run.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchFlow {
    name: &'static str,
    step: BatchStep,
    files: Vec<String>,
}

pub type OcrFlow = BatchFlow;
pub type ClassificationFlow = BatchFlow;

impl BatchFlow {
    pub fn ocr() -> Self {
        Self { name: "ocr", step: BatchStep::Browse, files: Vec::new() }
    }

    pub fn classification() -> Self {
        Self { name: "classification", step: BatchStep::Browse, files: Vec::new() }
    }

    pub fn step(&self) -> BatchStep {
        self.step
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    fn go(&mut self, to: BatchStep) {
        tracing::debug!(flow = self.name, from = self.step.as_str(), to = to.as_str(), "batch flow step");
        self.step = to;
    }

    pub fn start(&mut self, files: Vec<String>) -> ModelResult<()> {
        if self.step != BatchStep::Browse {
            return Err(ModelError::InvalidTransition { from: self.step.as_str(), action: "start" });
        }
        if files.is_empty() {
            return Err(ModelError::validation("files", "Please select files to process."));
        }
        self.files = files;
        self.go(BatchStep::Processing);
        Ok(())
    }

    pub fn cancel(&mut self) -> ModelResult<()> {
        if self.step != BatchStep::Processing {
            return Err(ModelError::InvalidTransition { from: self.step.as_str(), action: "cancel" });
        }
        self.go(BatchStep::Browse);
        Ok(())
    }

    pub fn finished(&mut self) -> ModelResult<()> {
        if self.step != BatchStep::Processing {
            return Err(ModelError::InvalidTransition { from: self.step.as_str(), action: "finish" });
        }
        self.go(BatchStep::Complete);
        Ok(())
    }

    pub fn confirm(&mut self) -> ModelResult<()> {
        if self.step != BatchStep::Complete {
            return Err(ModelError::InvalidTransition { from: self.step.as_str(), action: "confirm" });
        }
        self.files.clear();
        self.go(BatchStep::Browse);
        Ok(())
    }
}
