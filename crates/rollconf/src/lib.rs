//! Minimal configuration loading for the rollatron pipeline.
//!
//! This crate provides configuration loading with minimal dependencies,
//! designed to be imported by every pipeline crate without dragging in the
//! MIDI or HTTP stacks.
//!
//! # Usage
//!
//! ```rust,no_run
//! use rollconf::RollConfig;
//!
//! let config = RollConfig::load().expect("Failed to load config");
//!
//! println!("root: {}", config.paths.root.display());
//! println!("catalog: {}", config.catalog_file().display());
//! ```
//!
//! # Config File Locations
//!
//! Files are loaded in order (later wins):
//! 1. `/etc/rollatron/config.toml` (system)
//! 2. `~/.config/rollatron/config.toml` (user)
//! 3. `./rollatron.toml` (local override)
//! 4. Environment variables (`ROLLATRON_*`)
//!
//! # Example Config
//!
//! ```toml
//! [paths]
//! root = "~/pianolatron/data"
//!
//! [source]
//! repo_url = "https://github.com/pianolatron/roll-production.git"
//! checkout_dir = "~/.cache/rollatron/source"
//!
//! [build]
//! tempo_maps = false
//! skip = ["rr052wh1991", "hm136vg1420"]
//!
//! [publish]
//! author_name = "rollatron-bot"
//! push = true
//! ```
//!
//! # Directory Layout
//!
//! Everything under `[paths] root` follows a fixed layout:
//!
//! ```text
//! root/
//!   input/xml/       cached MODS records (never published)
//!   input/druids/    roster files scanned when no roster is given
//!   input/txt/       hole-analysis reports (default analysis source)
//!   midi/note/       note realizations (DRUID_note.mid)
//!   midi/exp/        expressive realizations (DRUID_exp.mid)
//!   output/json/     per-roll documents (DRUID.json)
//!   output/midi/     published realizations (note/DRUID.mid, exp/DRUID.mid)
//!   output/catalog.json
//! ```

pub mod loader;
pub mod sections;

pub use loader::{discover_config_files_with_override, ConfigSources};
pub use sections::{BuildConfig, MetadataConfig, PathsConfig, PublishConfig, SourceConfig};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Complete pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RollConfig {
    /// Filesystem roots.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Upstream data repository.
    #[serde(default)]
    pub source: SourceConfig,

    /// Metadata service endpoints.
    #[serde(default)]
    pub metadata: MetadataConfig,

    /// Build-step settings.
    #[serde(default)]
    pub build: BuildConfig,

    /// Publish-step settings.
    #[serde(default)]
    pub publish: PublishConfig,
}

impl RollConfig {
    /// Load configuration from all sources.
    ///
    /// Load order (later wins):
    /// 1. Compiled defaults
    /// 2. `/etc/rollatron/config.toml`
    /// 3. `~/.config/rollatron/config.toml`
    /// 4. `./rollatron.toml`
    /// 5. Environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(None)?;
        Ok(config)
    }

    /// Load configuration from a specific file path, then apply env overrides.
    ///
    /// If `config_path` is provided, it takes precedence over the local
    /// `./rollatron.toml` override. System and user configs still load first.
    pub fn load_from(config_path: Option<&std::path::Path>) -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(config_path)?;
        Ok(config)
    }

    /// Load configuration and return information about sources.
    pub fn load_with_sources() -> Result<(Self, ConfigSources), ConfigError> {
        Self::load_with_sources_from(None)
    }

    /// Load configuration from optional path and return information about sources.
    pub fn load_with_sources_from(
        config_path: Option<&std::path::Path>,
    ) -> Result<(Self, ConfigSources), ConfigError> {
        let mut sources = ConfigSources::default();
        let mut config = RollConfig::default();

        // Load config files in order
        for path in loader::discover_config_files_with_override(config_path) {
            let file_config = loader::load_from_file(&path)?;
            config = loader::merge_configs(config, file_config);
            sources.files.push(path);
        }

        // Apply environment variable overrides
        loader::apply_env_overrides(&mut config, &mut sources);

        Ok((config, sources))
    }

    /// Serialize config to TOML string.
    pub fn to_toml(&self) -> String {
        // Build TOML manually for nicer formatting
        let mut output = String::new();

        output.push_str("# Rollatron Configuration\n\n");

        output.push_str("[paths]\n");
        output.push_str(&format!("root = \"{}\"\n", self.paths.root.display()));

        output.push_str("\n[source]\n");
        output.push_str(&format!("repo_url = \"{}\"\n", self.source.repo_url));
        output.push_str(&format!(
            "checkout_dir = \"{}\"\n",
            self.source.checkout_dir.display()
        ));
        output.push_str(&format!(
            "note_midi_path = \"{}\"\n",
            self.source.note_midi_path.display()
        ));
        output.push_str(&format!(
            "exp_midi_path = \"{}\"\n",
            self.source.exp_midi_path.display()
        ));
        output.push_str(&format!("txt_path = \"{}\"\n", self.source.txt_path.display()));

        output.push_str("\n[metadata]\n");
        output.push_str(&format!("purl_base = \"{}\"\n", self.metadata.purl_base));
        output.push_str(&format!("iiif_base = \"{}\"\n", self.metadata.iiif_base));

        output.push_str("\n[build]\n");
        output.push_str(&format!(
            "midi_source_dir = \"{}\"\n",
            self.build.midi_source_dir.display()
        ));
        output.push_str(&format!(
            "analysis_source_dir = \"{}\"\n",
            self.build.analysis_source_dir.display()
        ));
        output.push_str(&format!("tempo_maps = {}\n", self.build.tempo_maps));
        output.push_str("skip = [\n");
        for druid in &self.build.skip {
            output.push_str(&format!("    \"{}\",\n", druid));
        }
        output.push_str("]\n");

        output.push_str("\n[publish]\n");
        output.push_str(&format!("author_name = \"{}\"\n", self.publish.author_name));
        output.push_str(&format!("author_email = \"{}\"\n", self.publish.author_email));
        output.push_str(&format!("remote = \"{}\"\n", self.publish.remote));
        output.push_str(&format!("branch = \"{}\"\n", self.publish.branch));
        output.push_str(&format!("push = {}\n", self.publish.push));
        output.push_str("allow = [\n");
        for pattern in &self.publish.allow {
            output.push_str(&format!("    \"{}\",\n", pattern));
        }
        output.push_str("]\n");

        output
    }
}

/// Directory layout helpers. All paths hang off `paths.root`; only the MIDI
/// and analysis source folders are relocatable via `[build]`.
impl RollConfig {
    /// Cache of downloaded MODS records: `input/xml/DRUID.xml`.
    pub fn xml_cache_dir(&self) -> PathBuf {
        self.paths.root.join("input/xml")
    }

    /// Roster folder scanned when no roster is given explicitly.
    pub fn druids_dir(&self) -> PathBuf {
        self.paths.root.join("input/druids")
    }

    /// Folder holding `note/DRUID_note.mid` and `exp/DRUID_exp.mid`.
    pub fn midi_source_dir(&self) -> PathBuf {
        self.paths.root.join(&self.build.midi_source_dir)
    }

    /// Relocated note realizations.
    pub fn midi_note_dir(&self) -> PathBuf {
        self.midi_source_dir().join("note")
    }

    /// Relocated expressive realizations.
    pub fn midi_exp_dir(&self) -> PathBuf {
        self.midi_source_dir().join("exp")
    }

    /// Folder holding hole-analysis reports (`DRUID.txt`).
    pub fn analysis_dir(&self) -> PathBuf {
        self.paths.root.join(&self.build.analysis_source_dir)
    }

    /// Per-roll document output: `output/json/DRUID.json`.
    pub fn json_output(&self, druid: &str) -> PathBuf {
        self.paths.root.join("output/json").join(format!("{druid}.json"))
    }

    /// Published note realization: `output/midi/note/DRUID.mid`.
    pub fn note_output(&self, druid: &str) -> PathBuf {
        self.paths
            .root
            .join("output/midi/note")
            .join(format!("{druid}.mid"))
    }

    /// Published expressive realization: `output/midi/exp/DRUID.mid`.
    pub fn exp_output(&self, druid: &str) -> PathBuf {
        self.paths
            .root
            .join("output/midi/exp")
            .join(format!("{druid}.mid"))
    }

    /// The consolidated catalog: `output/catalog.json`.
    pub fn catalog_file(&self) -> PathBuf {
        self.paths.root.join("output/catalog.json")
    }
}
