use anyhow::Result;
use std::path::Path;
use deploy_manifest::config::load_config;

pub fn handle_config(show: bool, validate: bool, path: Option<&Path>, quiet: bool) -> Result<()> {
    if !show && !validate {
        if !quiet {
            eprintln!("Use --show or --validate");
        }
        std::process::exit(1);
    }

    let config = match load_config(path) {
        Ok(config) => config,
        Err(e) => {
            if !quiet {
                eprintln!("❌ Error loading configuration: {:#}", e);
            }
            std::process::exit(1);
        }
    };

    if show && !quiet {
        println!("{}", serde_json::to_string_pretty(&config)?);
    }

    if validate {
        match config.validate() {
            Ok(()) => {
                if !quiet {
                    println!("✅ Configuration is valid");
                }
            }
            Err(e) => {
                if !quiet {
                    eprintln!("❌ Configuration validation failed: {}", e);
                }
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
