use std::io::{self, Write};

use serde::Serialize;

use crate::app::{FetchResult, InitResult, ProgressEvent, ProgressSink, PushResult};
use crate::walker::MergeAction;

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Text,
    Json,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_init(result: &InitResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_fetch(result: &FetchResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_push(result: &PushResult) -> io::Result<()> {
        Self::print_json(result)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

impl ProgressSink for JsonOutput {
    fn event(&self, _event: ProgressEvent) {}
}

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Human-readable output: progress on stderr, summaries on stdout.
pub struct TextOutput;

impl TextOutput {
    pub fn print_init(result: &InitResult) {
        println!("{CYAN}Initialized gost workspace at {}{RESET}", result.root);
        for file in &result.files {
            println!("{GREEN}  + {file}{RESET}");
        }
        println!("Please update your GOPATH and PATH. setenv.bash does this for you.");
        println!("  source ./setenv.bash");
    }

    pub fn print_fetch(result: &FetchResult) {
        println!(
            "{CYAN}gost get {} ({}){RESET}",
            result.package, result.branch
        );
        for merge in &result.merges {
            let (label, color) = match merge.action {
                MergeAction::Added => ("added", GREEN),
                MergeAction::Pulled => ("pulled", CYAN),
                MergeAction::Skipped => ("exists", YELLOW),
            };
            println!(
                "{color}  {label:<7} {} <- {}{RESET}",
                merge.prefix, merge.branch
            );
        }
        for pkg in &result.foreign {
            println!("{GREEN}  go get  {pkg}{RESET}");
        }
        for path in &result.sanitize.removed {
            println!("{YELLOW}  removed {path}{RESET}");
        }
        for failure in &result.sanitize.failed {
            println!("{RED}  kept    {} ({}){RESET}", failure.path, failure.message);
        }
        if result.committed {
            println!("{GREEN}Committed {} and its dependencies{RESET}", result.package);
        } else {
            println!("{YELLOW}Nothing to commit{RESET}");
        }
    }

    pub fn print_push(result: &PushResult) {
        for item in &result.items {
            match &item.error {
                None => println!("{GREEN}  pushed  {}{RESET}", item.prefix),
                Some(err) => println!("{RED}  failed  {}: {err}{RESET}", item.prefix),
            }
        }
    }
}

impl ProgressSink for TextOutput {
    fn event(&self, event: ProgressEvent) {
        eprintln!("{CYAN}>{RESET} {}", event.message);
    }
}
