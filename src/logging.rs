// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Optional file logging.
//!
//! The TUI owns the terminal, so nothing is ever written to stdout or stderr.
//! Set `PROTEUS_LOG_FILE` to a path to capture `tracing` events there;
//! `PROTEUS_LOG` (or `RUST_LOG`) selects the filter and defaults to `info`.

use std::env;
use std::error::Error;
use std::fs::OpenOptions;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

const LOG_FILE_ENV: &str = "PROTEUS_LOG_FILE";
const LOG_FILTER_ENV: &str = "PROTEUS_LOG";

/// Installs the file subscriber when `PROTEUS_LOG_FILE` is set.
///
/// Without the variable this is a no-op and `tracing` events are dropped.
pub fn init() -> Result<(), Box<dyn Error>> {
    let Some(path) = env::var_os(LOG_FILE_ENV) else {
        return Ok(());
    };

    let spec = filter_spec(env::var(LOG_FILTER_ENV).ok(), env::var("RUST_LOG").ok());
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(spec))
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|err| err as Box<dyn Error>)?;
    Ok(())
}

fn filter_spec(proteus_log: Option<String>, rust_log: Option<String>) -> String {
    let pick = |var: Option<String>| var.filter(|spec| !spec.trim().is_empty());
    pick(proteus_log).or_else(|| pick(rust_log)).unwrap_or_else(|| "info".to_owned())
}

#[cfg(test)]
mod tests {
    use super::filter_spec;

    #[test]
    fn filter_defaults_to_info() {
        assert_eq!(filter_spec(None, None), "info");
        assert_eq!(filter_spec(Some("  ".to_owned()), None), "info");
    }

    #[test]
    fn proteus_log_wins_over_rust_log() {
        let spec = filter_spec(Some("debug".to_owned()), Some("warn".to_owned()));
        assert_eq!(spec, "debug");
    }

    #[test]
    fn rust_log_applies_when_proteus_log_is_unset_or_blank() {
        let spec = filter_spec(None, Some("proteus=trace".to_owned()));
        assert_eq!(spec, "proteus=trace");

        let spec = filter_spec(Some(String::new()), Some("warn".to_owned()));
        assert_eq!(spec, "warn");
    }
}
