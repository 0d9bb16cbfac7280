use anyhow::{anyhow, Result};

use pagetabs_core::AppConfig;

pub fn run(force: bool) -> Result<()> {
    let path = AppConfig::config_path();

    if path.exists() && !force {
        return Err(anyhow!(
            "Configuration already exists at {}\nUse --force to overwrite it.",
            path.display()
        ));
    }

    AppConfig::default().save()?;
    println!("Wrote configuration to {}", path.display());

    Ok(())
}
