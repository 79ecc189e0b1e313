use crate::cli::{ConvertArgs, Target};
use crate::error::{CliError, Result};
use pdbshift::workflows::config::{ConversionConfig, ConversionConfigBuilder};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialConvertConfig {
    target: Option<Target>,
    cap_change: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialCliConfig {
    convert: Option<PartialConvertConfig>,
}

impl PartialCliConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Reads the config file if one was given, otherwise starts from an empty config.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Resolves the final conversion settings. Command-line values win over the file.
    pub fn merge_with_cli(self, args: &ConvertArgs) -> Result<ConversionConfig> {
        let file = self.convert.unwrap_or_default();

        let mut builder = ConversionConfigBuilder::new();
        if let Some(target) = args.to.or(file.target) {
            builder = builder.direction(target.into());
        }
        if let Some(enabled) = args.cap_change.resolve().or(file.cap_change) {
            builder = builder.cap_change(enabled);
        }

        let config = builder.build().map_err(|e| {
            CliError::Config(format!(
                "{}. Set it with --to or `target` in the [convert] table of the config file.",
                e
            ))
        })?;
        debug!("Resolved conversion config: {:?}", config);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use pdbshift::workflows::config::ConversionDirection;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn convert_args(extra: &[&str]) -> ConvertArgs {
        let mut argv = vec!["pdbshift", "convert", "in.pdb"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Convert(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("pdbshift.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn file_values_are_used_without_overrides() {
        let dir = tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
            [convert]
            target = "campari"
            cap-change = true
            "#,
        );

        let config = PartialCliConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&convert_args(&[]))
            .unwrap();
        assert_eq!(
            config,
            ConversionConfig {
                direction: ConversionDirection::GromacsToCampari,
                cap_change: true,
            }
        );
    }

    #[test]
    fn cli_arguments_override_file_values() {
        let dir = tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
            [convert]
            target = "campari"
            cap-change = true
            "#,
        );

        let config = PartialCliConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&convert_args(&["--to", "gromacs", "--no-cap-change"]))
            .unwrap();
        assert_eq!(config.direction, ConversionDirection::CampariToGromacs);
        assert!(!config.cap_change);
    }

    #[test]
    fn cap_change_falls_back_to_direction_default() {
        let config = PartialCliConfig::default()
            .merge_with_cli(&convert_args(&["--to", "gromacs"]))
            .unwrap();
        assert!(config.cap_change);
    }

    #[test]
    fn missing_target_is_a_config_error() {
        let result = PartialCliConfig::load(None)
            .unwrap()
            .merge_with_cli(&convert_args(&[]));
        match result {
            Err(CliError::Config(message)) => assert!(message.contains("direction")),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = write_config(dir.path(), "[convert]\ntarget = \"gromacs\"\ncaps = true\n");

        let result = PartialCliConfig::from_file(&path);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn missing_config_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let result = PartialCliConfig::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
