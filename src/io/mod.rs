//! Reading and writing of `planargrp` configuration files.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{self, ensure, Context};
use log;
use serde_yaml;

use crate::group::factory::GroupConfig;


/// The path of a configuration file, with the `.yml` extension added if `name` has none.
fn config_path<P: AsRef<Path>>(name: P) -> PathBuf {
    let path = name.as_ref().to_path_buf();
    if path.extension().is_some() {
        path
    } else {
        path.with_extension("yml")
    }
}

/// Checks that the numerical parameters of `config` can be used to build groups.
fn validate_group_config(config: &GroupConfig) -> Result<(), anyhow::Error> {
    ensure!(
        config.angle_threshold.is_finite() && config.angle_threshold > 0.0,
        "the angle threshold must be positive and finite, not {}",
        config.angle_threshold
    );
    ensure!(
        config.matrix_threshold.is_finite() && config.matrix_threshold > 0.0,
        "the matrix threshold must be positive and finite, not {}",
        config.matrix_threshold
    );
    ensure!(
        config.testing_elements > 0,
        "at least one testing element is required"
    );
    Ok(())
}

/// Reads a group configuration YAML file.
///
/// Fields missing from the file take their default values.
///
/// # Arguments
///
/// * `name` - The name of the file to be read in. Without an extension, `.yml` is assumed.
///
/// # Returns
///
/// A `Result` containing the validated configuration.
pub fn read_group_config_yaml<P: AsRef<Path>>(name: P) -> Result<GroupConfig, anyhow::Error> {
    let path = config_path(name);
    log::debug!("Reading group configuration from {}...", path.display());
    let file = File::open(&path)
        .with_context(|| format!("unable to open the configuration file {}", path.display()))?;
    let config: GroupConfig = serde_yaml::from_reader(BufReader::new(file))
        .with_context(|| format!("unable to parse the configuration file {}", path.display()))?;
    validate_group_config(&config)
        .with_context(|| format!("invalid configuration in {}", path.display()))?;
    log::debug!("Reading group configuration from {}... Done.", path.display());
    Ok(config)
}

/// Serialises a group configuration and writes it into a YAML file.
///
/// # Arguments
///
/// * `name` - The name of the YAML file to be written. Without an extension, `.yml` is added.
/// * `config` - The configuration to be written.
///
/// # Returns
///
/// The path of the written file.
pub fn write_group_config_yaml<P: AsRef<Path>>(
    name: P,
    config: &GroupConfig,
) -> Result<PathBuf, anyhow::Error> {
    validate_group_config(config)?;
    let path = config_path(name);
    let file = File::create(&path)
        .with_context(|| format!("unable to create the configuration file {}", path.display()))?;
    serde_yaml::to_writer(BufWriter::new(file), config)
        .with_context(|| format!("unable to write the configuration file {}", path.display()))?;
    log::debug!("Group configuration written to {}.", path.display());
    Ok(path)
}
