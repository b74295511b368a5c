// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::KeyInputError;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// Appender that writes to exactly `path_str`, never rotating. The file is created (or
/// appended to) right away, so a bad path fails here and not at the first log line.
pub fn try_create_log_file_appender(path_str: &str) -> miette::Result<RollingFileAppender> {
    let path = PathBuf::from(path_str);

    let file_name = path
        .file_name()
        .and_then(|it| it.to_str())
        .ok_or_else(|| KeyInputError::InvalidLogFilePath {
            path: path_str.to_string(),
        })?;

    // A bare file name has an empty parent, which means the current folder.
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(parent)
        .map_err(|source| KeyInputError::LogFileCreation {
            path: path_str.to_string(),
            source,
        })?;

    Ok(appender)
}

#[cfg(test)]
mod tests_rolling_file_appender_impl {
    use super::*;

    #[test]
    fn creates_file_at_exact_path() {
        let dir = std::env::temp_dir()
            .join(format!("r3bl_key_input_appender_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let file_path = dir.join("keys.log");

        let _appender = try_create_log_file_appender(file_path.to_str().unwrap()).unwrap();
        assert!(file_path.exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn path_without_file_name_is_rejected() {
        let result = try_create_log_file_appender("/");
        assert!(result.is_err());
        let message = result.unwrap_err().to_string();
        assert!(message.contains("no file name"));
    }
}
