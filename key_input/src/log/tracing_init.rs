// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{DisplayPreference, KeyInputError, TracingConfig, WriterConfig,
            try_create_log_file_appender};
use tracing::subscriber::DefaultGuard;
use tracing_core::LevelFilter;
use tracing_subscriber::{Layer, layer::SubscriberExt, registry::LookupSpan,
                         util::SubscriberInitExt};

pub type DynLayer<S> = dyn Layer<S> + Send + Sync + 'static;

/// Install a process wide subscriber. Does nothing when the level is
/// [`LevelFilter::OFF`].
///
/// # Errors
///
/// If the log file can't be created, or a global subscriber is already installed.
pub fn try_initialize_logging_global(options: impl Into<TracingConfig>) -> miette::Result<()> {
    let tracing_config: TracingConfig = options.into();
    if tracing_config.get_level_filter() == LevelFilter::OFF {
        return Ok(());
    }

    let layers = try_create_layers(&tracing_config)?;
    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(KeyInputError::LoggingInit)?;
    Ok(())
}

/// Install a subscriber for the current thread only, until the returned guard is
/// dropped. Handy in tests. Returns `None` when the level is [`LevelFilter::OFF`].
///
/// # Errors
///
/// If the log file can't be created.
pub fn try_initialize_logging_thread_local(
    options: impl Into<TracingConfig>,
) -> miette::Result<Option<DefaultGuard>> {
    let tracing_config: TracingConfig = options.into();
    if tracing_config.get_level_filter() == LevelFilter::OFF {
        return Ok(None);
    }

    let layers = try_create_layers(&tracing_config)?;
    let subscriber = tracing_subscriber::registry().with(layers);
    Ok(Some(tracing::subscriber::set_default(subscriber)))
}

/// The level filter first, then a display layer and a file layer, each only if
/// `tracing_config` asks for it.
pub fn try_create_layers(
    tracing_config: &TracingConfig,
) -> miette::Result<Vec<Box<DynLayer<tracing_subscriber::Registry>>>> {
    let level_filter = tracing_config.get_level_filter();
    let writer_config = tracing_config.get_writer_config();

    let mut return_it: Vec<Box<DynLayer<tracing_subscriber::Registry>>> = vec![];
    return_it.push(Box::new(level_filter));
    if let Some(layer) = try_create_display_layer(level_filter, &writer_config)? {
        return_it.push(layer);
    }
    if let Some(layer) = try_create_file_layer(level_filter, &writer_config)? {
        return_it.push(layer);
    }

    Ok(return_it)
}

pub fn try_create_display_layer<S>(
    level_filter: LevelFilter,
    writer_config: &WriterConfig,
) -> miette::Result<Option<Box<DynLayer<S>>>>
where
    S: tracing_core::Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

    Ok(match writer_config {
        WriterConfig::DisplayAndFile(display_pref, _) | WriterConfig::Display(display_pref) => {
            match display_pref {
                DisplayPreference::Stdout => Some(Box::new(
                    fmt_layer
                        .with_writer(std::io::stdout)
                        .with_filter(level_filter),
                )),
                DisplayPreference::Stderr => Some(Box::new(
                    fmt_layer
                        .with_writer(std::io::stderr)
                        .with_filter(level_filter),
                )),
            }
        }
        WriterConfig::None | WriterConfig::File(_) => None,
    })
}

pub fn try_create_file_layer<S>(
    level_filter: LevelFilter,
    writer_config: &WriterConfig,
) -> miette::Result<Option<Box<DynLayer<S>>>>
where
    S: tracing_core::Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    Ok(match writer_config {
        WriterConfig::DisplayAndFile(_, file_path) | WriterConfig::File(file_path) => {
            let file = try_create_log_file_appender(file_path)?;
            Some(Box::new(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(file)
                    .with_filter(level_filter),
            ))
        }
        WriterConfig::None | WriterConfig::Display(_) => None,
    })
}

#[cfg(test)]
mod tests_tracing_init {
    use super::*;
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    fn temp_log_file(name: &str) -> String {
        let dir = std::env::temp_dir()
            .join(format!("r3bl_key_input_tracing_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name).to_str().unwrap().to_string()
    }

    #[test]
    fn display_layer_only_for_display_configs() {
        let level_filter = LevelFilter::DEBUG;
        let display: Option<Box<DynLayer<tracing_subscriber::Registry>>> =
            try_create_display_layer(
                level_filter,
                &WriterConfig::Display(DisplayPreference::Stderr),
            )
            .unwrap();
        assert!(display.is_some());

        let none: Option<Box<DynLayer<tracing_subscriber::Registry>>> =
            try_create_display_layer(level_filter, &WriterConfig::None).unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn both_layers_plus_filter() {
        let file_path = temp_log_file("both.log");
        let tracing_config =
            TracingConfig::new_file_and_display(Some(file_path.clone()), DisplayPreference::Stderr);

        let layers = try_create_layers(&tracing_config).unwrap();
        assert_eq!(layers.len(), 3);
        assert!(std::path::Path::new(&file_path).exists());
    }

    #[test]
    fn level_off_installs_nothing() {
        let tracing_config = TracingConfig::new_file(None).with_level_filter(LevelFilter::OFF);
        assert!(
            try_initialize_logging_thread_local(tracing_config)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    #[serial]
    fn thread_local_subscriber_writes_to_file() {
        let file_path = temp_log_file("thread_local.log");
        {
            let _guard =
                try_initialize_logging_thread_local(TracingConfig::new_file(Some(file_path.clone())))
                    .unwrap();
            tracing::info!(message = "pipeline ready");
        }
        let contents = std::fs::read_to_string(&file_path).unwrap();
        assert!(contents.contains("pipeline ready"));
    }
}
