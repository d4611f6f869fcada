//! Log formatting with ANSI colors and fixed-width columns

use super::config::LoggerConfig;
use super::levels::LogLevel;
use super::tags::LogTag;
use chrono::Local;
use colored::*;
use std::io::{stderr, Write};

/// Column widths for alignment
const TAG_WIDTH: usize = 8;
const LEVEL_WIDTH: usize = 7;

/// Format and write a log line to stderr
pub fn format_and_log(config: &LoggerConfig, tag: LogTag, level: LogLevel, message: &str) {
    let time = Local::now().format("%H:%M:%S").to_string();
    let tag_str = format!("{:<width$}", tag.to_plain_string(), width = TAG_WIDTH);
    let level_str = format!("{:<width$}", level.as_str(), width = LEVEL_WIDTH);

    let line = if config.colors {
        format!(
            "{} [{}] [{}] {}",
            time.dimmed(),
            color_tag(tag, tag_str),
            color_level(level, level_str),
            message
        )
    } else {
        format!("{} [{}] [{}] {}", time, tag_str, level_str, message)
    };

    // A closed stderr is not worth failing a cache operation over
    let _ = writeln!(stderr(), "{}", line);
}

fn color_tag(tag: LogTag, text: String) -> ColoredString {
    match tag {
        LogTag::System => text.bright_yellow().bold(),
        LogTag::Config => text.bright_magenta().bold(),
        LogTag::Cache => text.bright_cyan().bold(),
        LogTag::Index => text.bright_blue().bold(),
        LogTag::Blobs => text.bright_green().bold(),
    }
}

fn color_level(level: LogLevel, text: String) -> ColoredString {
    match level {
        LogLevel::Error => text.bright_red().bold(),
        LogLevel::Warning => text.bright_yellow().bold(),
        LogLevel::Info => text.white().bold(),
        LogLevel::Debug | LogLevel::Verbose => text.dimmed(),
    }
}
