// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Proteus CLI entrypoint.
//!
//! Runs the interactive TUI: a JSON flow-document editor on the left and the
//! live-rendered diagram on the right. An optional positional argument seeds
//! the editor with an existing document; otherwise the built-in sample loads.

use std::error::Error;
use std::path::PathBuf;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<document.json>] [--export-dir <dir>]\n  {program} --help | --version\n\nOpens the flow document in the editor pane and renders it live; without a\ndocument the built-in sample is loaded.\n\n--export-dir selects where the `j`/`s`/`p` keys write flow.json, diagram.svg\nand diagram.png (default: current directory)."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    document: Option<String>,
    export_dir: Option<String>,
    help: bool,
    version: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--export-dir" => {
                if options.export_dir.is_some() {
                    return Err(());
                }
                let dir = args.next().ok_or(())?;
                options.export_dir = Some(dir);
            }
            "-h" | "--help" => {
                if options.help {
                    return Err(());
                }
                options.help = true;
            }
            "-V" | "--version" => {
                if options.version {
                    return Err(());
                }
                options.version = true;
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.document.is_some() {
                    return Err(());
                }
                options.document = Some(arg);
            }
        }
    }

    Ok(options)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "proteus".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        if options.help {
            print_usage(&program);
            return Ok(());
        }
        if options.version {
            println!("{program} {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }

        proteus::logging::init()?;

        let initial_source = match options.document {
            Some(path) => {
                let text = std::fs::read_to_string(&path)
                    .map_err(|err| format!("cannot read {path}: {err}"))?;
                Some(text)
            }
            None => None,
        };
        let export_dir = PathBuf::from(options.export_dir.unwrap_or_else(|| ".".to_owned()));

        proteus::tui::run(initial_source, export_dir)?;
        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("proteus: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_options, CliOptions};

    #[test]
    fn parses_empty_args() {
        let options = parse_options(std::iter::empty()).expect("parse options");
        assert_eq!(options, CliOptions::default());
    }

    #[test]
    fn parses_positional_document() {
        let options =
            parse_options(["flow.json".to_owned()].into_iter()).expect("parse options");
        assert_eq!(options.document.as_deref(), Some("flow.json"));
        assert!(options.export_dir.is_none());
    }

    #[test]
    fn parses_export_dir() {
        let options = parse_options(["--export-dir".to_owned(), "out".to_owned()].into_iter())
            .expect("parse options");
        assert_eq!(options.export_dir.as_deref(), Some("out"));
        assert!(options.document.is_none());
    }

    #[test]
    fn parses_document_and_export_dir_in_any_order() {
        let options = parse_options(
            ["flow.json".to_owned(), "--export-dir".to_owned(), "out".to_owned()].into_iter(),
        )
        .expect("parse options");
        assert_eq!(options.document.as_deref(), Some("flow.json"));
        assert_eq!(options.export_dir.as_deref(), Some("out"));

        let options = parse_options(
            ["--export-dir".to_owned(), "out".to_owned(), "flow.json".to_owned()].into_iter(),
        )
        .expect("parse options");
        assert_eq!(options.document.as_deref(), Some("flow.json"));
        assert_eq!(options.export_dir.as_deref(), Some("out"));
    }

    #[test]
    fn parses_help_and_version_flags() {
        let options = parse_options(["-h".to_owned()].into_iter()).expect("parse options");
        assert!(options.help);

        let options = parse_options(["--help".to_owned()].into_iter()).expect("parse options");
        assert!(options.help);

        let options = parse_options(["-V".to_owned()].into_iter()).expect("parse options");
        assert!(options.version);

        let options = parse_options(["--version".to_owned()].into_iter()).expect("parse options");
        assert!(options.version);
    }

    #[test]
    fn rejects_unknown_args() {
        parse_options(["--nope".to_owned()].into_iter()).unwrap_err();
    }

    #[test]
    fn rejects_duplicate_flags() {
        parse_options(
            [
                "--export-dir".to_owned(),
                "a".to_owned(),
                "--export-dir".to_owned(),
                "b".to_owned(),
            ]
            .into_iter(),
        )
        .unwrap_err();

        parse_options(["-h".to_owned(), "--help".to_owned()].into_iter()).unwrap_err();
    }

    #[test]
    fn rejects_missing_export_dir_value() {
        parse_options(["--export-dir".to_owned()].into_iter()).unwrap_err();
    }

    #[test]
    fn rejects_multiple_positional_documents() {
        parse_options(["one.json".to_owned(), "two.json".to_owned()].into_iter()).unwrap_err();
    }
}
