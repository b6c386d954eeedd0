use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use crate::cli::{OutputFormat, ReportArgs};
use deploy_manifest::analyzer::{ModuleAnalyzer, ModuleReport};
use deploy_manifest::config::{load_config, Config};
use deploy_manifest::output::format_table_output;
use deploy_manifest::store::ManifestStore;

pub fn handle_report(args: ReportArgs, config_path: Option<&Path>, quiet: bool, verbose: bool) -> Result<()> {
    let mut config = load_config(config_path)?;
    apply_overrides(&mut config, &args);

    let store = ManifestStore::from_config(args.repo.clone().or_else(|| config.local_repository.clone()));
    info!(repository = %store.root().display(), "using local repository");

    let modules = if args.modules.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        args.modules.clone()
    };

    let analyzer = ModuleAnalyzer::new(store, config.analysis_options());
    let mut reports = Vec::with_capacity(modules.len());
    for result in analyzer.analyze_all(&modules) {
        reports.push(result?);
    }

    let incompatible: usize = reports
        .iter()
        .filter_map(|r| r.licenses.as_ref())
        .map(|l| l.compliance.incompatible_count)
        .sum();

    // CLI flag wins over config
    let format = args.format.unwrap_or_else(|| match config.format.as_deref() {
        Some("json") => OutputFormat::Json,
        _ => OutputFormat::Table,
    });

    let output_content = match format {
        OutputFormat::Json => render_json(&reports)?,
        OutputFormat::Table => format_table_output(&reports, verbose),
    };

    match &args.output {
        Some(path) => fs::write(path, output_content)?,
        None => {
            if !quiet {
                println!("{}", output_content);
            }
        }
    }

    if incompatible > 0 {
        warn!(count = incompatible, "incompatible licenses found");
        if !quiet {
            eprintln!("Incompatible licenses found: {} dependencies", incompatible);
        }
        if config.fail_on_incompatible && !args.exit_zero {
            eprintln!("Exiting with error due to incompatible licenses");
            std::process::exit(1);
        }
    }

    Ok(())
}

fn apply_overrides(config: &mut Config, args: &ReportArgs) {
    if args.tree {
        config.dependency_tree.include = true;
    }
    if args.properties {
        config.properties.include = true;
    }
    if args.transitive {
        config.licenses.include_transitive = true;
    }
    if args.no_licenses {
        config.licenses.include = false;
    }
    if args.fail_on_incompatible {
        config.fail_on_incompatible = true;
    }
}

/// A single module renders as an object, several as an array
fn render_json(reports: &[ModuleReport]) -> Result<String> {
    let json = match reports {
        [single] => serde_json::to_string_pretty(single)?,
        many => serde_json::to_string_pretty(many)?,
    };
    Ok(json)
}
