//! Schema of a training run document.
//!
//! Walks a parsed YAML tree section by section and assembles a
//! [`RunConfig`]. Every problem found along the way is collected. Missing
//! sections come first, then field problems in schema order, then unknown
//! top-level keys, then cross-field invariants.

use serde_yaml::{Mapping, Value};

use crate::error::ConfigError;

use super::reader::{SectionReader, check_unknown_keys, type_name};
use super::rules::{FloatRule, IntRule};
use super::types::{
    CommonSection, CriterionSection, DatasetSection, DeviceType, MixMode, MixSection, ModelSection,
    OptimizerSection, RunConfig, SchedulerSection,
};

/// Names of the required top-level sections, in schema order.
pub const SECTIONS: [&str; 7] = [
    "common",
    "dataset",
    "mix",
    "optimizer",
    "scheduler",
    "criterion",
    "model",
];

/// Default for `scheduler.min_learning_rate` when the key is absent.
pub const DEFAULT_MIN_LEARNING_RATE: f64 = 0.0;

/// Builds a [`RunConfig`] from a parsed document, or returns every issue.
pub(crate) fn build(root: &Value, strict: bool) -> Result<RunConfig, Vec<ConfigError>> {
    let empty = Mapping::new();
    let root = match root {
        Value::Mapping(map) => map,
        Value::Null => &empty,
        other => {
            return Err(vec![ConfigError::TypeMismatch {
                field: "(root)".to_string(),
                expected: "mapping".to_string(),
                found: type_name(other).to_string(),
            }]);
        }
    };

    let mut issues = Vec::new();

    for name in SECTIONS {
        if root.get(name).is_none() {
            issues.push(ConfigError::MissingSection {
                section: name.to_string(),
            });
        }
    }

    let common = section(root, "common", &empty, &mut issues)
        .and_then(|map| read_common(map, strict, &mut issues));
    let dataset = section(root, "dataset", &empty, &mut issues)
        .and_then(|map| read_dataset(map, strict, &mut issues));
    let mix = section(root, "mix", &empty, &mut issues)
        .and_then(|map| read_mix(map, strict, &mut issues));
    let optimizer = section(root, "optimizer", &empty, &mut issues)
        .and_then(|map| read_optimizer(map, strict, &mut issues));
    let scheduler = section(root, "scheduler", &empty, &mut issues)
        .and_then(|map| read_scheduler(map, strict, &mut issues));
    let criterion = section(root, "criterion", &empty, &mut issues)
        .and_then(|map| read_criterion(map, strict, &mut issues));
    let model = section(root, "model", &empty, &mut issues)
        .and_then(|map| read_model(map, strict, &mut issues));

    check_unknown_keys(None, root, &SECTIONS, strict, &mut issues);
    check_invariants(scheduler.as_ref(), &mut issues);

    match (common, dataset, mix, optimizer, scheduler, criterion, model) {
        (
            Some(common),
            Some(dataset),
            Some(mix),
            Some(optimizer),
            Some(scheduler),
            Some(criterion),
            Some(model),
        ) if issues.is_empty() => Ok(RunConfig::new(
            common, dataset, mix, optimizer, scheduler, criterion, model,
        )),
        _ => Err(issues),
    }
}

/// Returns the named section as a mapping.
///
/// Absent sections were already reported; a present section with the wrong
/// type is reported here. A null section reads as `empty`.
fn section<'a>(
    root: &'a Mapping,
    name: &'static str,
    empty: &'a Mapping,
    issues: &mut Vec<ConfigError>,
) -> Option<&'a Mapping> {
    match root.get(name)? {
        Value::Mapping(map) => Some(map),
        Value::Null => Some(empty),
        other => {
            issues.push(ConfigError::TypeMismatch {
                field: name.to_string(),
                expected: "mapping".to_string(),
                found: type_name(other).to_string(),
            });
            None
        }
    }
}

fn read_common(
    map: &Mapping,
    strict: bool,
    issues: &mut Vec<ConfigError>,
) -> Option<CommonSection> {
    let mut r = SectionReader::new("common", map, issues);
    let run_label = r.text("run_label");
    let log_freq = r.integer("log_freq", IntRule::Positive);
    let mixed_precision = r.flag("mixed_precision");
    let profile_first = r.flag("profile_first");
    r.finish(strict);

    Some(CommonSection {
        run_label: run_label?,
        log_freq: log_freq?,
        mixed_precision: mixed_precision?,
        profile_first: profile_first?,
    })
}

fn read_dataset(
    map: &Mapping,
    strict: bool,
    issues: &mut Vec<ConfigError>,
) -> Option<DatasetSection> {
    let mut r = SectionReader::new("dataset", map, issues);
    let root_train = r.text("root_train");
    let root_eval = r.text("root_eval");
    let num_classes = r.integer("num_classes", IntRule::Positive);
    let batch_size = r.integer("batch_size", IntRule::Positive);
    let batch_size_eval = r.integer("batch_size_eval", IntRule::Positive);
    let num_workers = r.integer("num_workers", IntRule::NonNegative);
    let pin_memory = r.flag("pin_memory");
    r.finish(strict);

    Some(DatasetSection {
        root_train: root_train?,
        root_eval: root_eval?,
        num_classes: num_classes?,
        batch_size: batch_size?,
        batch_size_eval: batch_size_eval?,
        num_workers: num_workers?,
        pin_memory: pin_memory?,
    })
}

fn read_mix(map: &Mapping, strict: bool, issues: &mut Vec<ConfigError>) -> Option<MixSection> {
    let mut r = SectionReader::new("mix", map, issues);
    let mixup_beta = r.float("mixup_beta", FloatRule::NonNegative);
    let cutmix_beta = r.float("cutmix_beta", FloatRule::NonNegative);
    let prob = r.float("prob", FloatRule::Probability);
    let switch_prob = r.float("switch_prob", FloatRule::Probability);
    let mode = r.choice::<MixMode>("mode", MixMode::VARIANTS);
    r.finish(strict);

    Some(MixSection {
        mixup_beta: mixup_beta?,
        cutmix_beta: cutmix_beta?,
        prob: prob?,
        switch_prob: switch_prob?,
        mode: mode?,
    })
}

fn read_optimizer(
    map: &Mapping,
    strict: bool,
    issues: &mut Vec<ConfigError>,
) -> Option<OptimizerSection> {
    let mut r = SectionReader::new("optimizer", map, issues);
    let learning_rate = r.float("learning_rate", FloatRule::Positive);
    let weight_decay = r.float("weight_decay", FloatRule::NonNegative);
    r.finish(strict);

    Some(OptimizerSection {
        learning_rate: learning_rate?,
        weight_decay: weight_decay?,
    })
}

fn read_scheduler(
    map: &Mapping,
    strict: bool,
    issues: &mut Vec<ConfigError>,
) -> Option<SchedulerSection> {
    let mut r = SectionReader::new("scheduler", map, issues);
    let warmup_epoch = r.integer("warmup_epoch", IntRule::NonNegative);
    let cosine_tmax_epoch = r.integer("cosine_tmax_epoch", IntRule::Positive);
    let max_epoch = r.integer("max_epoch", IntRule::Positive);
    let min_learning_rate = r.float_or(
        "min_learning_rate",
        FloatRule::NonNegative,
        DEFAULT_MIN_LEARNING_RATE,
    );
    r.finish(strict);

    Some(SchedulerSection {
        warmup_epoch: warmup_epoch?,
        cosine_tmax_epoch: cosine_tmax_epoch?,
        max_epoch: max_epoch?,
        min_learning_rate: min_learning_rate?,
    })
}

fn read_criterion(
    map: &Mapping,
    strict: bool,
    issues: &mut Vec<ConfigError>,
) -> Option<CriterionSection> {
    let mut r = SectionReader::new("criterion", map, issues);
    let label_smoothing = r.float("label_smoothing", FloatRule::Fraction);
    r.finish(strict);

    Some(CriterionSection {
        label_smoothing: label_smoothing?,
    })
}

fn read_model(
    map: &Mapping,
    strict: bool,
    issues: &mut Vec<ConfigError>,
) -> Option<ModelSection> {
    let mut r = SectionReader::new("model", map, issues);
    let model_type = r.text("model_type");
    let model_name = r.text("model_name");
    let input_resolution = r.integer("input_resolution", IntRule::Positive);
    let ema_momentum = r.float("ema_momentum", FloatRule::Fraction);
    let device_type = r.choice::<DeviceType>("device_type", DeviceType::VARIANTS);
    r.finish(strict);

    Some(ModelSection {
        model_type: model_type?,
        model_name: model_name?,
        input_resolution: input_resolution?,
        ema_momentum: ema_momentum?,
        device_type: device_type?,
    })
}

/// Checks relations between fields.
///
/// An invariant is skipped when one of its operands failed to load.
fn check_invariants(scheduler: Option<&SchedulerSection>, issues: &mut Vec<ConfigError>) {
    let Some(scheduler) = scheduler else {
        return;
    };

    if scheduler.warmup_epoch > scheduler.max_epoch {
        issues.push(ConfigError::InvariantViolation {
            field: "scheduler.warmup_epoch".to_string(),
            message: format!(
                "warmup_epoch ({}) exceeds max_epoch ({})",
                scheduler.warmup_epoch, scheduler.max_epoch
            ),
        });
    }
}
