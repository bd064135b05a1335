use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use std::io::Read;
use std::path::{Path, PathBuf};
use webpify::{
    Cli, Commands, FileJournal, LocalStorage, RasterEditor, SettingValue, Settings, SettingsAction,
    TomlConfig, UploadDescriptor, UploadTransformer, DEFAULT_JOURNAL_NAME,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();

    match cli.command {
        Commands::Process {
            descriptor,
            file,
            url,
            mime_type,
            error,
            log_file,
        } => {
            let upload = match descriptor {
                Some(source) => read_descriptor(&source)?,
                None => UploadDescriptor {
                    file: file.context("--file is required")?,
                    url,
                    mime_type: mime_type.context("--type is required")?,
                    error,
                },
            };
            process_upload(&cli.config, upload, log_file)?;
        }
        Commands::Settings { action } => match action {
            SettingsAction::Show => show_settings(&cli.config)?,
            SettingsAction::Set { key, value } => set_setting(&cli.config, &key, &value)?,
        },
    }

    Ok(())
}

fn read_descriptor(source: &Path) -> anyhow::Result<UploadDescriptor> {
    let raw = if source == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read descriptor from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("Failed to read descriptor {}", source.display()))?
    };

    serde_json::from_str(&raw).context("Descriptor is not valid JSON")
}

fn journal_path(upload: &UploadDescriptor, log_file: Option<PathBuf>) -> PathBuf {
    log_file.unwrap_or_else(|| {
        let dir = upload
            .file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        dir.join(DEFAULT_JOURNAL_NAME)
    })
}

fn process_upload(
    config_path: &Path,
    upload: UploadDescriptor,
    log_file: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = TomlConfig::load(config_path)?;
    let journal = FileJournal::new(journal_path(&upload, log_file));

    let transformer = UploadTransformer::new(RasterEditor::default(), LocalStorage::new(), journal);
    let (result, outcome) = transformer.transform_with_outcome(upload, &config);

    log::debug!("Upload finished with outcome {:?}", outcome);
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}

fn show_settings(config_path: &Path) -> anyhow::Result<()> {
    let config = TomlConfig::load(config_path)?;
    let settings = Settings::from_provider(&config);

    println!("=== Settings ({}) ===", config.path().display());
    println!("max_width        = {}", settings.max_width);
    println!("max_height       = {}", settings.max_height);
    println!("quality          = {}", settings.quality);
    println!("delete_originals = {}", settings.delete_originals);

    Ok(())
}

fn set_setting(config_path: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let mut config = TomlConfig::load(config_path)?;

    let value = match value.trim().parse::<i64>() {
        Ok(number) => SettingValue::Int(number),
        Err(_) => SettingValue::Text(value.to_string()),
    };

    let stored = config.set(key, value)?;
    config.save()?;

    match stored {
        SettingValue::Int(v) => println!("{} = {}", key, v),
        SettingValue::Bool(v) => println!("{} = {}", key, v),
        SettingValue::Text(v) => println!("{} = {}", key, v),
    }

    Ok(())
}
