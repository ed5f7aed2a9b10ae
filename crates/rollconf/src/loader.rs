//! Config file discovery, loading, and environment variable overlay.

use crate::{
    BuildConfig, ConfigError, MetadataConfig, PathsConfig, PublishConfig, RollConfig, SourceConfig,
};
use std::env;
use std::path::{Path, PathBuf};

/// Information about where config values came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Config files that were loaded (in order)
    pub files: Vec<PathBuf>,
    /// Environment variables that overrode config values
    pub env_overrides: Vec<String>,
}

/// Discover config files in standard locations.
///
/// Returns paths in load order (system, user, local).
/// Only returns files that exist.
pub fn discover_config_files() -> Vec<PathBuf> {
    discover_config_files_with_override(None)
}

/// Discover config files, optionally with a CLI override path.
///
/// If `cli_path` is provided and exists, it replaces the local override.
/// Returns paths in load order (system, user, local/cli).
pub fn discover_config_files_with_override(cli_path: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    // System config
    let system = PathBuf::from("/etc/rollatron/config.toml");
    if system.exists() {
        files.push(system);
    }

    // User config (XDG_CONFIG_HOME or ~/.config)
    if let Some(config_dir) = directories::BaseDirs::new().map(|d| d.config_dir().to_path_buf()) {
        let user = config_dir.join("rollatron/config.toml");
        if user.exists() {
            files.push(user);
        }
    }

    // CLI override takes precedence over local
    if let Some(path) = cli_path {
        if path.exists() {
            files.push(path.to_path_buf());
            return files;
        }
    }

    // Local override (current directory)
    let local = PathBuf::from("rollatron.toml");
    if local.exists() {
        files.push(local);
    }

    files
}

/// Load config from a TOML file.
pub fn load_from_file(path: &Path) -> Result<RollConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_toml(&contents, path)
}

/// Parse config from TOML string.
fn parse_toml(contents: &str, path: &Path) -> Result<RollConfig, ConfigError> {
    // Parse as raw TOML table first to handle nested structure
    let table: toml::Table = contents.parse().map_err(|e: toml::de::Error| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut config = RollConfig::default();

    if let Some(paths) = table.get("paths").and_then(|v| v.as_table()) {
        if let Some(v) = paths.get("root").and_then(|v| v.as_str()) {
            config.paths.root = expand_path(v);
        }
    }

    if let Some(source) = table.get("source").and_then(|v| v.as_table()) {
        if let Some(v) = source.get("repo_url").and_then(|v| v.as_str()) {
            config.source.repo_url = v.to_string();
        }
        if let Some(v) = source.get("checkout_dir").and_then(|v| v.as_str()) {
            config.source.checkout_dir = expand_path(v);
        }
        if let Some(v) = source.get("note_midi_path").and_then(|v| v.as_str()) {
            config.source.note_midi_path = PathBuf::from(v);
        }
        if let Some(v) = source.get("exp_midi_path").and_then(|v| v.as_str()) {
            config.source.exp_midi_path = PathBuf::from(v);
        }
        if let Some(v) = source.get("txt_path").and_then(|v| v.as_str()) {
            config.source.txt_path = PathBuf::from(v);
        }
    }

    if let Some(metadata) = table.get("metadata").and_then(|v| v.as_table()) {
        if let Some(v) = metadata.get("purl_base").and_then(|v| v.as_str()) {
            config.metadata.purl_base = v.to_string();
        }
        if let Some(v) = metadata.get("iiif_base").and_then(|v| v.as_str()) {
            config.metadata.iiif_base = v.to_string();
        }
    }

    if let Some(build) = table.get("build").and_then(|v| v.as_table()) {
        if let Some(v) = build.get("midi_source_dir").and_then(|v| v.as_str()) {
            config.build.midi_source_dir = PathBuf::from(v);
        }
        if let Some(v) = build.get("analysis_source_dir").and_then(|v| v.as_str()) {
            config.build.analysis_source_dir = PathBuf::from(v);
        }
        if let Some(v) = build.get("tempo_maps").and_then(|v| v.as_bool()) {
            config.build.tempo_maps = v;
        }
        if let Some(v) = build.get("skip").and_then(|v| v.as_array()) {
            config.build.skip = v
                .iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.to_string())
                .collect();
        }
    }

    if let Some(publish) = table.get("publish").and_then(|v| v.as_table()) {
        if let Some(v) = publish.get("author_name").and_then(|v| v.as_str()) {
            config.publish.author_name = v.to_string();
        }
        if let Some(v) = publish.get("author_email").and_then(|v| v.as_str()) {
            config.publish.author_email = v.to_string();
        }
        if let Some(v) = publish.get("remote").and_then(|v| v.as_str()) {
            config.publish.remote = v.to_string();
        }
        if let Some(v) = publish.get("branch").and_then(|v| v.as_str()) {
            config.publish.branch = v.to_string();
        }
        if let Some(v) = publish.get("push").and_then(|v| v.as_bool()) {
            config.publish.push = v;
        }
        if let Some(v) = publish.get("allow").and_then(|v| v.as_array()) {
            config.publish.allow = v
                .iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.to_string())
                .collect();
        }
    }

    Ok(config)
}

/// Merge two configs, with `overlay` taking precedence.
///
/// A field from the overlay wins when it differs from the compiled default,
/// so later files only override what they actually set.
pub fn merge_configs(base: RollConfig, overlay: RollConfig) -> RollConfig {
    RollConfig {
        paths: PathsConfig {
            root: if overlay.paths.root != PathsConfig::default().root {
                overlay.paths.root
            } else {
                base.paths.root
            },
        },
        source: SourceConfig {
            repo_url: if overlay.source.repo_url != SourceConfig::default().repo_url {
                overlay.source.repo_url
            } else {
                base.source.repo_url
            },
            checkout_dir: if overlay.source.checkout_dir != SourceConfig::default().checkout_dir {
                overlay.source.checkout_dir
            } else {
                base.source.checkout_dir
            },
            note_midi_path: if overlay.source.note_midi_path != SourceConfig::default().note_midi_path {
                overlay.source.note_midi_path
            } else {
                base.source.note_midi_path
            },
            exp_midi_path: if overlay.source.exp_midi_path != SourceConfig::default().exp_midi_path {
                overlay.source.exp_midi_path
            } else {
                base.source.exp_midi_path
            },
            txt_path: if overlay.source.txt_path != SourceConfig::default().txt_path {
                overlay.source.txt_path
            } else {
                base.source.txt_path
            },
        },
        metadata: MetadataConfig {
            purl_base: if overlay.metadata.purl_base != MetadataConfig::default().purl_base {
                overlay.metadata.purl_base
            } else {
                base.metadata.purl_base
            },
            iiif_base: if overlay.metadata.iiif_base != MetadataConfig::default().iiif_base {
                overlay.metadata.iiif_base
            } else {
                base.metadata.iiif_base
            },
        },
        build: BuildConfig {
            midi_source_dir: if overlay.build.midi_source_dir != BuildConfig::default().midi_source_dir {
                overlay.build.midi_source_dir
            } else {
                base.build.midi_source_dir
            },
            analysis_source_dir: if overlay.build.analysis_source_dir
                != BuildConfig::default().analysis_source_dir
            {
                overlay.build.analysis_source_dir
            } else {
                base.build.analysis_source_dir
            },
            tempo_maps: if overlay.build.tempo_maps != BuildConfig::default().tempo_maps {
                overlay.build.tempo_maps
            } else {
                base.build.tempo_maps
            },
            skip: if overlay.build.skip != BuildConfig::default().skip {
                overlay.build.skip
            } else {
                base.build.skip
            },
        },
        publish: PublishConfig {
            author_name: if overlay.publish.author_name != PublishConfig::default().author_name {
                overlay.publish.author_name
            } else {
                base.publish.author_name
            },
            author_email: if overlay.publish.author_email != PublishConfig::default().author_email {
                overlay.publish.author_email
            } else {
                base.publish.author_email
            },
            remote: if overlay.publish.remote != PublishConfig::default().remote {
                overlay.publish.remote
            } else {
                base.publish.remote
            },
            branch: if overlay.publish.branch != PublishConfig::default().branch {
                overlay.publish.branch
            } else {
                base.publish.branch
            },
            push: if overlay.publish.push != PublishConfig::default().push {
                overlay.publish.push
            } else {
                base.publish.push
            },
            allow: if overlay.publish.allow != PublishConfig::default().allow {
                overlay.publish.allow
            } else {
                base.publish.allow
            },
        },
    }
}

/// Apply environment variable overrides to config.
pub fn apply_env_overrides(config: &mut RollConfig, sources: &mut ConfigSources) {
    if let Ok(v) = env::var("ROLLATRON_ROOT") {
        config.paths.root = expand_path(&v);
        sources.env_overrides.push("ROLLATRON_ROOT".to_string());
    }

    if let Ok(v) = env::var("ROLLATRON_SOURCE_URL") {
        config.source.repo_url = v;
        sources.env_overrides.push("ROLLATRON_SOURCE_URL".to_string());
    }
    if let Ok(v) = env::var("ROLLATRON_CHECKOUT_DIR") {
        config.source.checkout_dir = expand_path(&v);
        sources.env_overrides.push("ROLLATRON_CHECKOUT_DIR".to_string());
    }

    if let Ok(v) = env::var("ROLLATRON_PURL_BASE") {
        config.metadata.purl_base = v;
        sources.env_overrides.push("ROLLATRON_PURL_BASE".to_string());
    }
    if let Ok(v) = env::var("ROLLATRON_IIIF_BASE") {
        config.metadata.iiif_base = v;
        sources.env_overrides.push("ROLLATRON_IIIF_BASE".to_string());
    }

    if let Ok(v) = env::var("ROLLATRON_AUTHOR_NAME") {
        config.publish.author_name = v;
        sources.env_overrides.push("ROLLATRON_AUTHOR_NAME".to_string());
    }
    if let Ok(v) = env::var("ROLLATRON_AUTHOR_EMAIL") {
        config.publish.author_email = v;
        sources.env_overrides.push("ROLLATRON_AUTHOR_EMAIL".to_string());
    }
    if let Ok(v) = env::var("ROLLATRON_REMOTE") {
        config.publish.remote = v;
        sources.env_overrides.push("ROLLATRON_REMOTE".to_string());
    }
    if let Ok(v) = env::var("ROLLATRON_BRANCH") {
        config.publish.branch = v;
        sources.env_overrides.push("ROLLATRON_BRANCH".to_string());
    }
    if let Ok(v) = env::var("ROLLATRON_PUSH") {
        if let Ok(push) = v.parse() {
            config.publish.push = push;
            sources.env_overrides.push("ROLLATRON_PUSH".to_string());
        }
    }
}

/// Expand ~ and environment variables in a path.
pub fn expand_path(path: &str) -> PathBuf {
    let expanded = if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            home.join(stripped)
        } else {
            PathBuf::from(path)
        }
    } else if let Some(stripped) = path.strip_prefix('$') {
        // Handle $VAR/rest/of/path
        if let Some(slash_pos) = stripped.find('/') {
            let var_name = &stripped[..slash_pos];
            if let Ok(var_value) = env::var(var_name) {
                PathBuf::from(var_value).join(&stripped[slash_pos + 1..])
            } else {
                PathBuf::from(path)
            }
        } else {
            env::var(stripped)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(path))
        }
    } else {
        PathBuf::from(path)
    };

    expanded
}
