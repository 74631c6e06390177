use anyhow::Result;
use colored::Colorize;

use crate::config::Config;

pub async fn show_config() -> Result<()> {
    let config = Config::load()?;

    // Never echo tokens.
    let mut display = config.clone();
    if !display.auth.token.is_empty() {
        display.auth.token = "[redacted]".to_string();
    }
    if !display.auth.refresh_token.is_empty() {
        display.auth.refresh_token = "[redacted]".to_string();
    }

    println!("{}", toml::to_string_pretty(&display)?);
    println!("Config file: {}", Config::config_file()?.display());

    Ok(())
}

pub async fn init_config(force: bool) -> Result<()> {
    let config_file = Config::config_file()?;

    if config_file.exists() && !force {
        println!(
            "Config already exists at {}. Use {} to overwrite.",
            config_file.display(),
            "--force".bold()
        );
        return Ok(());
    }

    Config::default().save()?;
    println!("{} Wrote defaults to {}", "✓".green(), config_file.display());

    Ok(())
}
