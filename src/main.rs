// MacroText
// Copyright (c) 2025 Harlen Batagelo
// https://github.com/hbatagelo/macrotext
// SPDX-License-Identifier: GPL-3.0-or-later

mod cli;

use owo_colors::OwoColorize;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = cli::parse_args();

    match cli::init_logger(config.log_level).and_then(|()| cli::run(&config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
