// regex-replacer/src/utils/input.rs
//! Reading input and splitting it into documents.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};

use crate::cli::InputArgs;

/// Human-readable name of the input, used in reports.
pub fn source_name(args: &InputArgs) -> String {
    args.input_file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<stdin>".to_string())
}

/// Reads the whole input into memory.
pub fn read_input(args: &InputArgs) -> Result<String> {
    let mut content = String::new();
    match &args.input_file {
        Some(path) => {
            File::open(path)
                .with_context(|| format!("Failed to open input file {}", path.display()))?
                .read_to_string(&mut content)
                .with_context(|| format!("Failed to read input file {}", path.display()))?;
        }
        None => {
            io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read from stdin")?;
        }
    }
    Ok(content)
}

/// Opens the input as a line reader, for streaming.
pub fn open_reader(args: &InputArgs) -> Result<Box<dyn BufRead>> {
    match &args.input_file {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("Failed to open input file {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

/// One document per line, or the whole content as a single document.
/// Line mode strips `\r\n` as well as `\n`.
pub fn split_documents(content: String, whole: bool) -> Vec<String> {
    if whole {
        vec![content]
    } else {
        content.lines().map(str::to_string).collect()
    }
}
