use std::ffi::OsStr;
use std::fs::File;

use justconfig::item::ValueExtractor;
use justconfig::processors::Trim;
use justconfig::sources::env::Env;
use justconfig::sources::text::ConfigText;
use justconfig::ConfPath;
use justconfig::Config;

use crate::config_processors::Unquote;

// Set some default values
const DEFAULT_NEIGHBORHOOD_SIZE_K: usize = 10;
const DEFAULT_NUM_RECOMMENDATIONS: usize = 10;
const DEFAULT_NUM_TRIALS: usize = 100;
const DEFAULT_HOLDOUT_SIZE: usize = 5;
const DEFAULT_SEED: u64 = 42;

pub struct AppConfig {
    pub data: DataConfig,
    pub model: ModelConfig,
    pub evaluation: EvaluationConfig,
}

pub struct DataConfig {
    pub training_data_path: String,
}

pub struct ModelConfig {
    pub neighborhood_size_k: usize,
    pub num_recommendations: usize,
}

pub struct EvaluationConfig {
    pub num_trials: usize,
    pub holdout_size: usize,
    pub seed: u64,
}

impl AppConfig {
    pub fn new(config_path: String) -> AppConfig {
        // Initialize config object
        let mut conf = Config::default();

        // Check if there is a config file
        if let Ok(config_file) = File::open(&config_path) {
            let config_text = ConfigText::new(config_file, &config_path)
                .expect("Loading configuration file failed.");
            conf.add_source(config_text);
        }

        // Define config params from environment variables
        let config_env = Env::new(&[(
            ConfPath::from(&["data", "training_data_path"]),
            OsStr::new("TRAINING_DATA"),
        )]);
        conf.add_source(config_env);

        // Parse into custom config struct
        AppConfig::parse(conf)
    }

    fn parse(conf: justconfig::Config) -> AppConfig {
        AppConfig {
            data: DataConfig::parse(&conf, ConfPath::from(&["data"])),
            model: ModelConfig::parse(&conf, ConfPath::from(&["model"])),
            evaluation: EvaluationConfig::parse(&conf, ConfPath::from(&["evaluation"])),
        }
    }
}

impl DataConfig {
    fn parse(conf: &Config, path: ConfPath) -> DataConfig {
        DataConfig {
            training_data_path: conf
                .get(path.push("training_data_path"))
                .unquote()
                .value()
                .unwrap(),
        }
    }
}

impl ModelConfig {
    fn parse(conf: &Config, path: ConfPath) -> ModelConfig {
        ModelConfig {
            neighborhood_size_k: conf
                .get(path.push("neighborhood_size_k"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_NEIGHBORHOOD_SIZE_K),
            num_recommendations: conf
                .get(path.push("num_recommendations"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_NUM_RECOMMENDATIONS),
        }
    }
}

impl EvaluationConfig {
    fn parse(conf: &Config, path: ConfPath) -> EvaluationConfig {
        EvaluationConfig {
            num_trials: conf
                .get(path.push("num_trials"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_NUM_TRIALS),
            holdout_size: conf
                .get(path.push("holdout_size"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_HOLDOUT_SIZE),
            seed: conf
                .get(path.push("seed"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_SEED),
        }
    }
}
