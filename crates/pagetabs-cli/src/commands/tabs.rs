use anyhow::Result;

use pagetabs_core::{AppConfig, TabSet};

pub fn run(config: &AppConfig) -> Result<()> {
    let tabs = TabSet::from_config(&config.tabs)?;

    println!("Tabs ({}):\n", tabs.len());

    for (index, tab) in tabs.iter().enumerate() {
        println!("  {}. {} - {}", index + 1, tab.key, tab.label());
        println!("    Image: {}", tab.image);
    }

    Ok(())
}
