//! Configuration types for training runs.
//!
//! This module contains the strongly-typed section structures that the
//! loader builds from a validated YAML document.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// How mixup/cutmix parameters are sampled across a batch.
///
/// # Example
///
/// ```
/// use run_config::config::MixMode;
///
/// let mode: MixMode = "pair".parse().unwrap();
/// assert_eq!(mode, MixMode::Pair);
/// assert_eq!(mode.to_string(), "pair");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MixMode {
    /// One mixing factor for the whole batch.
    Batch,
    /// One mixing factor per pair of samples.
    Pair,
    /// One mixing factor per sample.
    Elem,
}

impl MixMode {
    /// Accepted spellings, in declaration order.
    pub const VARIANTS: &'static [&'static str] = &["batch", "pair", "elem"];

    /// Returns the configuration spelling of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            MixMode::Batch => "batch",
            MixMode::Pair => "pair",
            MixMode::Elem => "elem",
        }
    }
}

impl FromStr for MixMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "batch" => Ok(MixMode::Batch),
            "pair" => Ok(MixMode::Pair),
            "elem" => Ok(MixMode::Elem),
            other => Err(format!("unknown mix mode '{}'", other)),
        }
    }
}

impl fmt::Display for MixMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The device the training harness places computation on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    /// Host CPU.
    Cpu,
    /// CUDA GPU.
    Cuda,
}

impl DeviceType {
    /// Accepted spellings, in declaration order.
    pub const VARIANTS: &'static [&'static str] = &["cpu", "cuda"];

    /// Returns the configuration spelling of this device.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Cpu => "cpu",
            DeviceType::Cuda => "cuda",
        }
    }

    /// Returns true when optimizer state has to be moved off the host.
    pub fn is_accelerator(&self) -> bool {
        matches!(self, DeviceType::Cuda)
    }
}

impl FromStr for DeviceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cpu" => Ok(DeviceType::Cpu),
            "cuda" => Ok(DeviceType::Cuda),
            other => Err(format!("unknown device type '{}'", other)),
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// General run settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommonSection {
    /// Label identifying the run in logs and output directories.
    pub run_label: String,
    /// Number of iterations between training log lines.
    pub log_freq: u32,
    /// Whether to train with automatic mixed precision.
    pub mixed_precision: bool,
    /// Whether to profile the first iterations before training.
    pub profile_first: bool,
}

impl CommonSection {
    /// Returns true when the given iteration should be logged.
    ///
    /// ```
    /// use run_config::config::CommonSection;
    ///
    /// let common = CommonSection {
    ///     run_label: "demo".to_string(),
    ///     log_freq: 100,
    ///     mixed_precision: true,
    ///     profile_first: false,
    /// };
    /// assert!(common.should_log(0));
    /// assert!(!common.should_log(99));
    /// assert!(common.should_log(200));
    /// ```
    pub fn should_log(&self, iteration: u64) -> bool {
        iteration.checked_rem(u64::from(self.log_freq)) == Some(0)
    }
}

/// Dataset locations and loader settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSection {
    /// Root directory of the training split.
    pub root_train: String,
    /// Root directory of the evaluation split.
    pub root_eval: String,
    /// Number of target classes.
    pub num_classes: u32,
    /// Training batch size.
    pub batch_size: u32,
    /// Evaluation batch size.
    pub batch_size_eval: u32,
    /// Number of data loader worker processes.
    pub num_workers: u32,
    /// Whether loaded batches are pinned in host memory.
    pub pin_memory: bool,
}

/// Mixup/cutmix augmentation parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MixSection {
    /// Beta distribution parameter for mixup (0 disables mixup).
    pub mixup_beta: f64,
    /// Beta distribution parameter for cutmix (0 disables cutmix).
    pub cutmix_beta: f64,
    /// Probability of applying any mixing to a batch.
    pub prob: f64,
    /// Probability of choosing cutmix over mixup when both are enabled.
    pub switch_prob: f64,
    /// How mixing factors are sampled.
    pub mode: MixMode,
}

impl MixSection {
    /// Returns false when no sample would ever be mixed.
    pub fn is_enabled(&self) -> bool {
        self.prob > 0.0 && (self.mixup_beta > 0.0 || self.cutmix_beta > 0.0)
    }
}

/// Optimizer hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizerSection {
    /// Base learning rate.
    pub learning_rate: f64,
    /// Weight decay coefficient.
    pub weight_decay: f64,
}

/// Learning-rate schedule parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchedulerSection {
    /// Epochs of linear warmup before the cosine schedule starts.
    pub warmup_epoch: u32,
    /// Period of the cosine annealing schedule, in epochs.
    pub cosine_tmax_epoch: u32,
    /// Total number of training epochs.
    pub max_epoch: u32,
    /// Floor of the cosine schedule. Defaults to 0 when absent.
    pub min_learning_rate: f64,
}

impl SchedulerSection {
    /// Returns the number of epochs that follow the warmup.
    pub fn cosine_epochs(&self) -> u32 {
        self.max_epoch.saturating_sub(self.warmup_epoch)
    }
}

/// Loss function parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionSection {
    /// Label smoothing factor.
    pub label_smoothing: f64,
}

/// Model selection and placement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSection {
    /// Architecture family (e.g., "convnext").
    pub model_type: String,
    /// Specific pretrained variant (e.g., "convnext_tiny").
    pub model_name: String,
    /// Square input resolution in pixels.
    pub input_resolution: u32,
    /// Decay of the exponential moving average of the weights.
    pub ema_momentum: f64,
    /// Device to train on.
    pub device_type: DeviceType,
}

/// The complete, validated configuration of a training run.
///
/// Only the loader constructs a `RunConfig`, and it offers no way to change
/// a value afterwards. Hand it to the training harness by reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunConfig {
    common: CommonSection,
    dataset: DatasetSection,
    mix: MixSection,
    optimizer: OptimizerSection,
    scheduler: SchedulerSection,
    criterion: CriterionSection,
    model: ModelSection,
}

impl RunConfig {
    pub(crate) fn new(
        common: CommonSection,
        dataset: DatasetSection,
        mix: MixSection,
        optimizer: OptimizerSection,
        scheduler: SchedulerSection,
        criterion: CriterionSection,
        model: ModelSection,
    ) -> Self {
        Self {
            common,
            dataset,
            mix,
            optimizer,
            scheduler,
            criterion,
            model,
        }
    }

    /// Returns the general run settings.
    pub fn common(&self) -> &CommonSection {
        &self.common
    }

    /// Returns the dataset settings.
    pub fn dataset(&self) -> &DatasetSection {
        &self.dataset
    }

    /// Returns the mixup/cutmix settings.
    pub fn mix(&self) -> &MixSection {
        &self.mix
    }

    /// Returns the optimizer settings.
    pub fn optimizer(&self) -> &OptimizerSection {
        &self.optimizer
    }

    /// Returns the learning-rate schedule settings.
    pub fn scheduler(&self) -> &SchedulerSection {
        &self.scheduler
    }

    /// Returns the loss settings.
    pub fn criterion(&self) -> &CriterionSection {
        &self.criterion
    }

    /// Returns the model settings.
    pub fn model(&self) -> &ModelSection {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mix(prob: f64, mixup_beta: f64, cutmix_beta: f64) -> MixSection {
        MixSection {
            mixup_beta,
            cutmix_beta,
            prob,
            switch_prob: 0.5,
            mode: MixMode::Batch,
        }
    }

    #[test]
    fn test_mix_mode_parses_every_variant() {
        for name in MixMode::VARIANTS {
            let mode: MixMode = name.parse().unwrap();
            assert_eq!(mode.as_str(), *name);
        }
        assert!("Batch".parse::<MixMode>().is_err());
    }

    #[test]
    fn test_device_type_parses_every_variant() {
        for name in DeviceType::VARIANTS {
            let device: DeviceType = name.parse().unwrap();
            assert_eq!(device.to_string(), *name);
        }
        assert!("tpu".parse::<DeviceType>().is_err());
    }

    #[test]
    fn test_only_cuda_is_accelerator() {
        assert!(DeviceType::Cuda.is_accelerator());
        assert!(!DeviceType::Cpu.is_accelerator());
    }

    #[test]
    fn test_mix_disabled_when_prob_zero() {
        assert!(!mix(0.0, 0.8, 1.0).is_enabled());
    }

    #[test]
    fn test_mix_disabled_when_both_betas_zero() {
        assert!(!mix(1.0, 0.0, 0.0).is_enabled());
    }

    #[test]
    fn test_mix_enabled_with_cutmix_only() {
        assert!(mix(0.5, 0.0, 1.0).is_enabled());
    }

    #[test]
    fn test_cosine_epochs_excludes_warmup() {
        let scheduler = SchedulerSection {
            warmup_epoch: 5,
            cosine_tmax_epoch: 45,
            max_epoch: 50,
            min_learning_rate: 0.0,
        };
        assert_eq!(scheduler.cosine_epochs(), 45);
    }

    #[test]
    fn test_enums_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&MixMode::Elem).unwrap(), "\"elem\"");
        assert_eq!(serde_json::to_string(&DeviceType::Cuda).unwrap(), "\"cuda\"");
    }
}
