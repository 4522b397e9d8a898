// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Config command - show, get or set configuration values

use crate::config::{self, Config, KEYS};
use anyhow::Result;
use std::path::Path;

/// Run the config command
///
/// No key prints every value; a key alone prints one; key and value
/// writes the value to the config file at `path`.
pub fn run(current: &Config, path: &Path, key: Option<&str>, value: Option<&str>) -> Result<()> {
    match (key, value) {
        (None, _) => {
            println!("# {}", path.display());
            for key in KEYS {
                println!("{key} = {}", current.get(key)?);
            }
        }
        (Some(key), None) => println!("{}", current.get(key)?),
        (Some(key), Some(value)) => {
            config::set_value(path, key, value)?;
            println!("Set {key} = {value}");
        }
    }
    Ok(())
}
