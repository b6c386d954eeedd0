use anyhow::Result;
use std::path::PathBuf;
use crate::cli::InitPreset;
use deploy_manifest::config::CONFIG_FILE;
use deploy_manifest::init::{self, InitOutcome};

pub fn handle_init(preset: InitPreset, path: Option<PathBuf>, quiet: bool) -> Result<()> {
    let init_preset = match preset {
        InitPreset::Permissive => init::InitPreset::Permissive,
        InitPreset::Standard => init::InitPreset::Standard,
        InitPreset::Strict => init::InitPreset::Strict,
    };
    let path = path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE));

    let outcome = init::generate_config_at_path(&path, init_preset)?;
    if !quiet {
        match outcome {
            InitOutcome::Created => println!("✅ Created {}", path.display()),
            InitOutcome::Updated => println!("✅ Updated {}", path.display()),
        }
    }
    Ok(())
}
