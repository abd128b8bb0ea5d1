//! Property-based tests for configuration loading

use super::loader::ConfigLoader;
use super::schema::{DEFAULT_MIN_LEARNING_RATE, SECTIONS};
use super::types::{DeviceType, MixMode};
use crate::error::{ConfigError, ConfigErrorKind};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct Doc {
    run_label: String,
    log_freq: u32,
    mixed_precision: bool,
    num_classes: u32,
    batch_size: u32,
    num_workers: u32,
    mixup_beta: f64,
    cutmix_beta: f64,
    prob: f64,
    switch_prob: f64,
    mode: MixMode,
    learning_rate: f64,
    weight_decay: f64,
    warmup_epoch: u32,
    max_epoch: u32,
    min_learning_rate: Option<f64>,
    label_smoothing: f64,
    model_name: String,
    ema_momentum: f64,
    device_type: DeviceType,
}

impl Doc {
    /// Renders each top-level section separately, in schema order.
    fn sections(&self) -> Vec<String> {
        let min_lr = self
            .min_learning_rate
            .map(|v| format!("  min_learning_rate: {}\n", v))
            .unwrap_or_default();
        vec![
            format!(
                "common:\n  run_label: \"{}\"\n  log_freq: {}\n  mixed_precision: {}\n  profile_first: false\n",
                self.run_label, self.log_freq, self.mixed_precision
            ),
            format!(
                "dataset:\n  root_train: \"/data/train\"\n  root_eval: \"/data/eval\"\n  num_classes: {}\n  batch_size: {}\n  batch_size_eval: {}\n  num_workers: {}\n  pin_memory: true\n",
                self.num_classes, self.batch_size, self.batch_size, self.num_workers
            ),
            format!(
                "mix:\n  mixup_beta: {}\n  cutmix_beta: {}\n  prob: {}\n  switch_prob: {}\n  mode: {}\n",
                self.mixup_beta, self.cutmix_beta, self.prob, self.switch_prob, self.mode
            ),
            format!(
                "optimizer:\n  learning_rate: {}\n  weight_decay: {}\n",
                self.learning_rate, self.weight_decay
            ),
            format!(
                "scheduler:\n  warmup_epoch: {}\n  cosine_tmax_epoch: {}\n  max_epoch: {}\n{}",
                self.warmup_epoch, self.max_epoch, self.max_epoch, min_lr
            ),
            format!("criterion:\n  label_smoothing: {}\n", self.label_smoothing),
            format!(
                "model:\n  model_type: \"convnext\"\n  model_name: \"{}\"\n  input_resolution: 224\n  ema_momentum: {}\n  device_type: {}\n",
                self.model_name, self.ema_momentum, self.device_type
            ),
        ]
    }

    fn to_yaml(&self) -> String {
        self.sections().concat()
    }
}

fn arb_mode() -> impl Strategy<Value = MixMode> {
    prop_oneof![
        Just(MixMode::Batch),
        Just(MixMode::Pair),
        Just(MixMode::Elem)
    ]
}

fn arb_device() -> impl Strategy<Value = DeviceType> {
    prop_oneof![Just(DeviceType::Cpu), Just(DeviceType::Cuda)]
}

fn arb_valid_doc() -> impl Strategy<Value = Doc> {
    (
        (
            "[a-z][a-z0-9_]{0,15}",                  // run_label
            1u32..10_000,                            // log_freq
            any::<bool>(),                           // mixed_precision
            1u32..22_000,                            // num_classes
            1u32..1024,                              // batch_size
            0u32..64,                                // num_workers
            0.0f64..4.0,                             // mixup_beta
            0.0f64..4.0,                             // cutmix_beta
            0.0f64..=1.0,                            // prob
            0.0f64..=1.0,                            // switch_prob
        ),
        (
            arb_mode(),
            1e-6f64..1.0,                            // learning_rate
            0.0f64..0.5,                             // weight_decay
            (1u32..500, 0u32..500),                  // max_epoch, warmup seed
            proptest::option::of(0.0f64..1e-6),      // min_learning_rate
            0.0f64..1.0,                             // label_smoothing
            "[a-z][a-z0-9_]{0,23}",                  // model_name
            0.0f64..1.0,                             // ema_momentum
            arb_device(),
        ),
    )
        .prop_map(
            |(
                (
                    run_label,
                    log_freq,
                    mixed_precision,
                    num_classes,
                    batch_size,
                    num_workers,
                    mixup_beta,
                    cutmix_beta,
                    prob,
                    switch_prob,
                ),
                (
                    mode,
                    learning_rate,
                    weight_decay,
                    (max_epoch, warmup_seed),
                    min_learning_rate,
                    label_smoothing,
                    model_name,
                    ema_momentum,
                    device_type,
                ),
            )| Doc {
                run_label,
                log_freq,
                mixed_precision,
                num_classes,
                batch_size,
                num_workers,
                mixup_beta,
                cutmix_beta,
                prob,
                switch_prob,
                mode,
                learning_rate,
                weight_decay,
                warmup_epoch: warmup_seed % (max_epoch + 1),
                max_epoch,
                min_learning_rate,
                label_smoothing,
                model_name,
                ema_momentum,
                device_type,
            },
        )
}

fn out_of_unit_interval() -> impl Strategy<Value = f64> {
    prop_oneof![-100.0f64..-1e-6, 1.000001f64..100.0]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_valid_doc_loads_and_round_trips(doc in arb_valid_doc()) {
        let config = ConfigLoader::default().load_str(&doc.to_yaml());
        prop_assert!(config.is_ok(), "{:?}", config.as_ref().err());
        let config = config.unwrap();

        prop_assert_eq!(&config.common().run_label, &doc.run_label);
        prop_assert_eq!(config.common().log_freq, doc.log_freq);
        prop_assert_eq!(config.common().mixed_precision, doc.mixed_precision);
        prop_assert_eq!(config.dataset().num_classes, doc.num_classes);
        prop_assert_eq!(config.dataset().batch_size, doc.batch_size);
        prop_assert_eq!(config.dataset().num_workers, doc.num_workers);
        prop_assert_eq!(config.mix().mixup_beta, doc.mixup_beta);
        prop_assert_eq!(config.mix().cutmix_beta, doc.cutmix_beta);
        prop_assert_eq!(config.mix().prob, doc.prob);
        prop_assert_eq!(config.mix().switch_prob, doc.switch_prob);
        prop_assert_eq!(config.mix().mode, doc.mode);
        prop_assert_eq!(config.optimizer().learning_rate, doc.learning_rate);
        prop_assert_eq!(config.optimizer().weight_decay, doc.weight_decay);
        prop_assert_eq!(config.scheduler().warmup_epoch, doc.warmup_epoch);
        prop_assert_eq!(config.scheduler().max_epoch, doc.max_epoch);
        prop_assert_eq!(
            config.scheduler().min_learning_rate,
            doc.min_learning_rate.unwrap_or(DEFAULT_MIN_LEARNING_RATE)
        );
        prop_assert_eq!(config.criterion().label_smoothing, doc.label_smoothing);
        prop_assert_eq!(&config.model().model_name, &doc.model_name);
        prop_assert_eq!(config.model().ema_momentum, doc.ema_momentum);
        prop_assert_eq!(config.model().device_type, doc.device_type);
    }

    #[test]
    fn prop_valid_doc_passes_strict_mode(doc in arb_valid_doc()) {
        prop_assert!(ConfigLoader::strict().load_str(&doc.to_yaml()).is_ok());
    }

    #[test]
    fn prop_loading_is_deterministic(doc in arb_valid_doc()) {
        let yaml = doc.to_yaml();
        let loader = ConfigLoader::default();
        prop_assert_eq!(loader.load_str(&yaml).unwrap(), loader.load_str(&yaml).unwrap());
    }

    #[test]
    fn prop_mix_prob_outside_unit_interval_fails(doc in arb_valid_doc(), prob in out_of_unit_interval()) {
        let mut doc = doc;
        doc.prob = prob;
        let err = ConfigLoader::default().load_str(&doc.to_yaml()).unwrap_err();
        prop_assert_eq!(err.kind(), ConfigErrorKind::ConstraintViolation);
        prop_assert_eq!(err.path(), "mix.prob");
    }

    #[test]
    fn prop_warmup_beyond_max_epoch_fails(doc in arb_valid_doc(), extra in 1u32..100) {
        let mut doc = doc;
        doc.warmup_epoch = doc.max_epoch + extra;
        let err = ConfigLoader::default().load_str(&doc.to_yaml()).unwrap_err();
        prop_assert_eq!(err.kind(), ConfigErrorKind::InvariantViolation);
        prop_assert_eq!(err.path(), "scheduler.warmup_epoch");
    }

    #[test]
    fn prop_missing_section_is_named(doc in arb_valid_doc(), index in 0usize..SECTIONS.len()) {
        let mut sections = doc.sections();
        sections.remove(index);
        let err = ConfigLoader::default().load_str(&sections.concat()).unwrap_err();
        prop_assert_eq!(
            err,
            ConfigError::MissingSection { section: SECTIONS[index].to_string() }
        );
    }

    #[test]
    fn prop_check_str_agrees_with_load_str(doc in arb_valid_doc(), prob in out_of_unit_interval()) {
        let mut doc = doc;
        doc.prob = prob;
        let yaml = doc.to_yaml();
        let loader = ConfigLoader::default();
        let first = loader.load_str(&yaml).unwrap_err();
        let all = loader.check_str(&yaml).unwrap_err();
        prop_assert_eq!(&all[0], &first);
    }
}
