use crate::analyzer::ModuleReport;
use crate::graph::DependencyTreeReport;
use crate::license::{LicenseDetail, LicenseReport, LicenseWarning, WarningSeverity};

pub fn format_table_output(reports: &[ModuleReport], verbose: bool) -> String {
    let mut output = String::new();
    for (i, report) in reports.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        output.push_str(&format_module(report, verbose));
    }
    output
}

fn format_module(report: &ModuleReport, verbose: bool) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "📦 {}:{}:{} ({})\n",
        report.group_id, report.artifact_id, report.version, report.packaging
    ));

    if let Some(licenses) = &report.licenses {
        output.push_str(&format_licenses(licenses, verbose));
    }
    if let Some(dependencies) = &report.dependencies {
        output.push_str(&format_dependency_summary(dependencies));
    }
    if let Some(profiles) = &report.profiles {
        output.push_str(&format!("🧩 Profiles: {}", profiles.available.join(", ")));
        if let Some(default) = &profiles.default_profile {
            output.push_str(&format!(" (default: {})", default));
        }
        output.push('\n');
    }
    if let Some(properties) = &report.properties {
        output.push_str(&format!(
            "🔧 Properties: {} maven, {} custom, {} masked\n",
            properties.maven.len(),
            properties.custom.len(),
            properties.masked_count
        ));
    }
    output
}

fn format_licenses(report: &LicenseReport, verbose: bool) -> String {
    let mut output = String::new();
    let summary = &report.summary;
    let compliance = &report.compliance;

    output.push_str(&format!("📜 License Summary ({} dependencies)\n", summary.total));
    output.push_str(&format!(
        "✅ {} identified  ⚠️ {} unknown  🚫 {} incompatible\n",
        summary.identified, summary.unknown, compliance.incompatible_count
    ));
    if !summary.by_type.is_empty() {
        let histogram: Vec<String> = summary
            .by_type
            .iter()
            .map(|(name, count)| format!("{} ×{}", name, count))
            .collect();
        output.push_str(&format!("   {}\n", histogram.join(", ")));
    }
    output.push('\n');

    if verbose {
        output.push_str("📦 All Dependencies:\n");
        output.push_str(&format_detail_table(&report.details));
    } else if !report.warnings.is_empty() {
        output.push_str("⚠️  Issues Found:\n");
        output.push_str(&format_warning_table(&report.warnings));
    } else {
        output.push_str("✅ No issues found!\n");
    }

    if !verbose && report.details.len() > report.warnings.len() {
        output.push_str(&format!(
            "\n💡 Run with --verbose to see all {} dependencies\n",
            report.details.len()
        ));
    }

    let viability = if compliance.commercially_viable { "yes" } else { "no" };
    let attribution = if compliance.requires_attribution { "yes" } else { "no" };
    output.push_str(&format!(
        "Commercially viable: {}  Attribution required: {}\n",
        viability, attribution
    ));
    output
}

fn format_detail_table(details: &[LicenseDetail]) -> String {
    if details.is_empty() {
        return "No dependencies found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str("┌───────────────────────────┬───────────┬──────────┬───────────────────┐\n");
    output.push_str("│ Artifact                  │ Version   │ Scope    │ License           │\n");
    output.push_str("├───────────────────────────┼───────────┼──────────┼───────────────────┤\n");
    for detail in details {
        let artifact = truncate(&format!("{}:{}", detail.group_id, detail.artifact_id), 25);
        let version = truncate(detail.version.as_deref().unwrap_or("unknown"), 9);
        let scope = truncate(&detail.scope, 8);
        let license = truncate(&detail.license, 17);
        output.push_str(&format!(
            "│ {:<25} │ {:<9} │ {:<8} │ {:<17} │\n",
            artifact, version, scope, license
        ));
    }
    output.push_str("└───────────────────────────┴───────────┴──────────┴───────────────────┘\n");
    output
}

fn format_warning_table(warnings: &[LicenseWarning]) -> String {
    let mut output = String::new();
    output.push_str("┌────────┬───────────────────────────┬─────────────┬───────────────────────────┐\n");
    output.push_str("│ Level  │ Artifact                  │ License     │ Issue                     │\n");
    output.push_str("├────────┼───────────────────────────┼─────────────┼───────────────────────────┤\n");
    for warning in warnings {
        let level = match warning.severity {
            WarningSeverity::High => "HIGH",
            WarningSeverity::Medium => "MEDIUM",
        };
        let artifact = truncate(&warning.artifact, 25);
        let license = truncate(&warning.license, 11);
        let reason = truncate(&warning.reason, 25);
        output.push_str(&format!(
            "│ {:<6} │ {:<25} │ {:<11} │ {:<25} │\n",
            level, artifact, license, reason
        ));
    }
    output.push_str("└────────┴───────────────────────────┴─────────────┴───────────────────────────┘\n");
    output
}

fn format_dependency_summary(report: &DependencyTreeReport) -> String {
    let summary = &report.summary;
    let scopes: Vec<String> = summary
        .scopes
        .iter()
        .map(|(scope, count)| format!("{} {}", count, scope))
        .collect();
    let mut output = format!(
        "🌳 Dependencies: {} total ({} direct, {} transitive, {} optional)\n",
        summary.total, summary.direct, summary.transitive, summary.optional
    );
    if !scopes.is_empty() {
        output.push_str(&format!("   {}\n", scopes.join(", ")));
    }
    output
}

/// Cut `s` to at most `max_len` characters, marking the cut with an ellipsis
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}
