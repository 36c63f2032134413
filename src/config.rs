use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::patches::Patches;
use crate::core::scan::is_glob_pattern;

pub const CONFIG_FILE_NAME: &str = "lit-localize.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_source_locale")]
    pub source_locale: String,
    #[serde(default)]
    pub target_locales: Vec<String>,
    #[serde(default = "default_input_files")]
    pub input_files: Vec<String>,
    #[serde(default = "default_ignores")]
    pub ignores: Vec<String>,
    #[serde(default = "default_api_modules")]
    pub api_modules: Vec<String>,
    #[serde(default)]
    pub interchange: InterchangeConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default, skip_serializing_if = "Patches::is_empty")]
    pub patches: Patches,
}

/// Where translators' files live, and in which shape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(
    tag = "format",
    rename_all = "lowercase",
    rename_all_fields = "camelCase"
)]
pub enum InterchangeConfig {
    /// One bundle written per run; translations read from a glob.
    Xlb {
        output_file: String,
        translations_glob: String,
    },
    /// One XLIFF 1.2 file per target locale.
    Xliff {
        xliff_dir: String,
        #[serde(default)]
        placeholder_style: PlaceholderStyle,
    },
}

impl Default for InterchangeConfig {
    fn default() -> Self {
        Self::Xliff {
            xliff_dir: "xliff".to_string(),
            placeholder_style: PlaceholderStyle::default(),
        }
    }
}

/// How placeholders are written into XLIFF.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderStyle {
    /// `<x id="0" equiv-text="..."/>`
    #[default]
    X,
    /// `<ph id="0">...</ph>`
    Ph,
}

/// Which of the two output strategies `build` runs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(
    tag = "mode",
    rename_all = "lowercase",
    rename_all_fields = "camelCase"
)]
pub enum OutputConfig {
    /// One lookup-table module per locale.
    Runtime {
        output_dir: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        locale_codes_module: Option<String>,
    },
    /// One rewritten copy of the program per locale.
    Transform { output_dir: String },
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::Runtime {
            output_dir: "src/generated/locales".to_string(),
            locale_codes_module: Some("src/generated/locale-codes.ts".to_string()),
        }
    }
}

impl OutputConfig {
    pub fn output_dir(&self) -> &str {
        match self {
            Self::Runtime { output_dir, .. } | Self::Transform { output_dir } => output_dir,
        }
    }
}

fn default_source_locale() -> String {
    "en".to_string()
}

fn default_input_files() -> Vec<String> {
    vec!["src".to_string()]
}

fn default_ignores() -> Vec<String> {
    vec!["**/node_modules/**".to_string()]
}

fn default_api_modules() -> Vec<String> {
    vec!["@lit/localize".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_locale: default_source_locale(),
            target_locales: Vec::new(),
            input_files: default_input_files(),
            ignores: default_ignores(),
            api_modules: default_api_modules(),
            interchange: InterchangeConfig::default(),
            output: OutputConfig::default(),
            patches: Patches::new(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }
        for pattern in self.input_files.iter().filter(|p| is_glob_pattern(p)) {
            Pattern::new(pattern).with_context(|| {
                format!("Invalid glob pattern in 'inputFiles': \"{}\"", pattern)
            })?;
        }
        if let InterchangeConfig::Xlb {
            translations_glob, ..
        } = &self.interchange
        {
            Pattern::new(translations_glob).with_context(|| {
                format!(
                    "Invalid glob pattern in 'interchange.translationsGlob': \"{}\"",
                    translations_glob
                )
            })?;
        }

        if self.source_locale.trim().is_empty() {
            bail!("'sourceLocale' must not be empty");
        }
        let mut seen = HashSet::new();
        for locale in &self.target_locales {
            if locale.trim().is_empty() {
                bail!("'targetLocales' must not contain empty locale codes");
            }
            if *locale == self.source_locale {
                bail!(
                    "Source locale \"{}\" must not be listed in 'targetLocales'",
                    locale
                );
            }
            if !seen.insert(locale.as_str()) {
                bail!("Duplicate locale \"{}\" in 'targetLocales'", locale);
            }
        }
        Ok(())
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Directory every configured path is relative to.
    pub root_dir: PathBuf,
    /// The file the config came from; `None` when using defaults.
    pub path: Option<PathBuf>,
}

fn read_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config file: {}", path.display()))?;
    Ok(config)
}

/// Load the config from `explicit`, or search upward from `start_dir`.
pub fn load_config(start_dir: &Path, explicit: Option<&Path>) -> Result<ConfigLoadResult> {
    let path = match explicit {
        Some(path) => {
            let path = start_dir.join(path);
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            Some(path)
        }
        None => find_config_file(start_dir),
    };
    match path {
        Some(path) => {
            let config = read_config(&path)?;
            let root_dir = path
                .parent()
                .map(Path::to_path_buf)
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| PathBuf::from("."));
            Ok(ConfigLoadResult {
                config,
                root_dir,
                path: Some(path),
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            root_dir: start_dir.to_path_buf(),
            path: None,
        }),
    }
}
