use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

pub struct TestProject {
    pub dir: TempDir,
    pub binary_path: String,
}

impl TestProject {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let binary_path = env!("CARGO_BIN_EXE_deploy-manifest").to_string();
        fs::create_dir_all(dir.path().join("repo")).expect("Failed to create repo dir");

        Self { dir, binary_path }
    }

    pub fn repo(&self) -> PathBuf {
        self.dir.path().join("repo")
    }

    /// Install a manifest into the temporary local repository
    pub fn publish(&self, group: &str, artifact: &str, version: &str, inner: &str) {
        let dir = self
            .repo()
            .join(group.replace('.', "/"))
            .join(artifact)
            .join(version);
        fs::create_dir_all(&dir).expect("Failed to create artifact dir");
        fs::write(dir.join(format!("{artifact}-{version}.pom")), project_xml(group, artifact, version, inner))
            .expect("Failed to write pom");
    }

    /// Write a module's pom.xml under `name`
    pub fn module(&self, name: &str, content: &str) -> PathBuf {
        let dir = self.dir.path().join(name);
        fs::create_dir_all(&dir).expect("Failed to create module dir");
        fs::write(dir.join("pom.xml"), content).expect("Failed to write pom");
        dir
    }

    pub fn run(&self, cwd: &Path, args: &[&str]) -> std::process::Output {
        Command::new(&self.binary_path)
            .args(args)
            .current_dir(cwd)
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to run deploy-manifest")
    }

    /// `report --format json` against the temporary repository
    pub fn report_json(&self, module: &str, extra: &[&str]) -> serde_json::Value {
        let repo = self.repo();
        let mut args = vec!["report", "--format", "json", "--repo", repo.to_str().unwrap()];
        args.extend_from_slice(extra);
        let output = self.run(&self.dir.path().join(module), &args);
        assert!(
            output.status.success(),
            "report failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("report is not valid JSON")
    }
}

pub fn project_xml(group: &str, artifact: &str, version: &str, inner: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <modelVersion>4.0.0</modelVersion>
  <groupId>{group}</groupId>
  <artifactId>{artifact}</artifactId>
  <version>{version}</version>
  {inner}
</project>
"#
    )
}

pub fn dependency(group: &str, artifact: &str, version: &str, scope: Option<&str>) -> String {
    let scope = scope.map(|s| format!("<scope>{s}</scope>")).unwrap_or_default();
    format!("<dependency><groupId>{group}</groupId><artifactId>{artifact}</artifactId><version>{version}</version>{scope}</dependency>")
}

pub fn license(name: &str) -> String {
    format!("<licenses><license><name>{name}</name></license></licenses>")
}
