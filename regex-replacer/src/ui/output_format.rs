// regex-replacer/src/ui/output_format.rs
//! Prefixed status messages written to stderr, colored when the stream is a terminal.

use owo_colors::{AnsiColors, OwoColorize};
use std::io::{self, Write};

fn print_message<W: Write>(
    writer: &mut W,
    prefix: &str,
    color: AnsiColors,
    msg: &str,
    supports_color: bool,
) -> io::Result<()> {
    if supports_color {
        writeln!(writer, "{} {}", prefix.color(color).bold(), msg)
    } else {
        writeln!(writer, "{} {}", prefix, msg)
    }
}

pub fn print_info_message<W: Write>(writer: &mut W, msg: &str, supports_color: bool) -> io::Result<()> {
    print_message(writer, "[info]", AnsiColors::Cyan, msg, supports_color)
}

pub fn print_warn_message<W: Write>(writer: &mut W, msg: &str, supports_color: bool) -> io::Result<()> {
    print_message(writer, "[warn]", AnsiColors::Yellow, msg, supports_color)
}

pub fn print_error_message<W: Write>(writer: &mut W, msg: &str, supports_color: bool) -> io::Result<()> {
    print_message(writer, "[error]", AnsiColors::Red, msg, supports_color)
}
