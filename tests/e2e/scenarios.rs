use super::helpers::{dependency, license, project_xml, TestProject};

#[test]
fn test_license_inherited_from_parent_manifest() {
    let env = TestProject::new();
    env.publish("g", "parent", "1.0", &license("Apache-2.0"));
    env.publish(
        "g",
        "a",
        "1.0",
        "<parent><groupId>g</groupId><artifactId>parent</artifactId><version>1.0</version></parent>",
    );
    env.module(
        "app",
        &project_xml(
            "com.example",
            "app",
            "1.0.0",
            &format!("<dependencies>{}</dependencies>", dependency("g", "a", "1.0", None)),
        ),
    );

    let report = env.report_json("app", &[]);
    let detail = &report["licenses"]["details"][0];
    assert_eq!(detail["license"], "Apache-2.0");
    assert_eq!(detail["scope"], "compile");
    assert_eq!(detail["depth"], 1);
    assert_eq!(report["artifactId"], "app");
}

#[test]
fn test_transitive_license_inherited_from_parent_manifest() {
    let env = TestProject::new();
    env.publish("g", "parent", "1.0", &license("Apache-2.0"));
    env.publish(
        "g",
        "b",
        "2.0",
        "<parent><groupId>g</groupId><artifactId>parent</artifactId><version>1.0</version></parent>",
    );
    env.publish(
        "com.example",
        "direct-a",
        "1.0",
        &format!("{}<dependencies>{}</dependencies>", license("MIT"), dependency("g", "b", "2.0", None)),
    );
    env.module(
        "app",
        &project_xml(
            "com.example",
            "app",
            "1.0.0",
            &format!("<dependencies>{}</dependencies>", dependency("com.example", "direct-a", "1.0", None)),
        ),
    );

    let report = env.report_json("app", &["--transitive"]);
    let details = report["licenses"]["details"].as_array().unwrap();
    let inherited = details.iter().find(|d| d["artifactId"] == "b").unwrap();
    assert_eq!(inherited["license"], "Apache-2.0");
    assert_eq!(inherited["depth"], 2);
}

#[test]
fn test_multi_license_dependency() {
    let env = TestProject::new();
    env.publish(
        "com.example",
        "dual",
        "1.0",
        "<licenses><license><name>MPL-2.0</name></license><license><name>EPL-1.0</name></license></licenses>",
    );
    env.module(
        "app",
        &project_xml(
            "com.example",
            "app",
            "1.0.0",
            &format!("<dependencies>{}</dependencies>", dependency("com.example", "dual", "1.0", None)),
        ),
    );

    let report = env.report_json("app", &[]);
    let licenses = &report["licenses"];
    assert_eq!(licenses["details"][0]["license"], "MPL-2.0 OR EPL-1.0");
    assert_eq!(licenses["details"][0]["multiLicense"], true);
    assert_eq!(licenses["summary"]["byType"]["MPL-2.0"], 1);
    assert_eq!(licenses["summary"]["byType"]["EPL-1.0"], 1);
}

fn gpl_project(env: &TestProject) {
    env.publish(
        "com.example",
        "direct-a",
        "1.0",
        &format!(
            "{}<dependencies>{}</dependencies>",
            license("Apache-2.0"),
            dependency("com.example", "gpl-lib", "2.1.0", Some("runtime"))
        ),
    );
    env.publish("com.example", "gpl-lib", "2.1.0", &license("GPL-3.0"));
    env.module(
        "app",
        &project_xml(
            "com.example",
            "app",
            "1.0.0",
            &format!("<dependencies>{}</dependencies>", dependency("com.example", "direct-a", "1.0", None)),
        ),
    );
}

#[test]
fn test_transitive_incompatible_license() {
    let env = TestProject::new();
    gpl_project(&env);

    let report = env.report_json("app", &["--transitive"]);
    let licenses = &report["licenses"];
    let high: Vec<_> = licenses["warnings"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|w| w["severity"] == "HIGH")
        .collect();
    assert_eq!(high.len(), 1);
    assert_eq!(high[0]["artifact"], "com.example:gpl-lib:2.1.0");
    assert_eq!(licenses["compliance"]["hasIncompatibleLicenses"], true);
    assert_eq!(licenses["compliance"]["commerciallyViable"], false);
}

#[test]
fn test_fail_on_incompatible_exit_code() {
    let env = TestProject::new();
    gpl_project(&env);
    let repo = env.repo();
    let module = env.dir.path().join("app");
    let base = ["report", "--format", "json", "--repo", repo.to_str().unwrap(), "--transitive"];

    let mut args = base.to_vec();
    args.push("--fail-on-incompatible");
    let output = env.run(&module, &args);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("incompatible"));

    args.push("--exit-zero");
    assert!(env.run(&module, &args).status.success());
}

#[test]
fn test_child_managed_version_beats_bom() {
    let env = TestProject::new();
    env.publish(
        "com.example",
        "platform-bom",
        "5.0",
        "<packaging>pom</packaging><dependencyManagement><dependencies><dependency><groupId>g</groupId><artifactId>a</artifactId><version>2.0</version></dependency></dependencies></dependencyManagement>",
    );
    env.publish("g", "a", "1.0", &license("MIT"));
    env.publish("g", "a", "2.0", &license("GPL-3.0"));
    env.module(
        "app",
        &project_xml(
            "com.example",
            "app",
            "1.0.0",
            r#"<dependencyManagement><dependencies>
                 <dependency><groupId>com.example</groupId><artifactId>platform-bom</artifactId><version>5.0</version><type>pom</type><scope>import</scope></dependency>
                 <dependency><groupId>g</groupId><artifactId>a</artifactId><version>1.0</version></dependency>
               </dependencies></dependencyManagement>
               <dependencies><dependency><groupId>g</groupId><artifactId>a</artifactId></dependency></dependencies>"#,
        ),
    );

    let report = env.report_json("app", &[]);
    let detail = &report["licenses"]["details"][0];
    assert_eq!(detail["version"], "1.0");
    assert_eq!(detail["license"], "MIT");
}

#[test]
fn test_bom_version_from_parent_property() {
    let env = TestProject::new();
    env.publish(
        "com.example",
        "corp-parent",
        "3",
        "<packaging>pom</packaging><properties><platform.version>5.0</platform.version></properties>",
    );
    env.publish(
        "com.example",
        "platform-bom",
        "5.0",
        "<packaging>pom</packaging><dependencyManagement><dependencies><dependency><groupId>g</groupId><artifactId>a</artifactId><version>2.0</version></dependency></dependencies></dependencyManagement>",
    );
    env.publish("g", "a", "2.0", &license("MIT"));
    env.module(
        "app",
        r#"<project>
  <parent><groupId>com.example</groupId><artifactId>corp-parent</artifactId><version>3</version><relativePath/></parent>
  <artifactId>app</artifactId>
  <dependencyManagement><dependencies>
    <dependency><groupId>com.example</groupId><artifactId>platform-bom</artifactId><version>${platform.version}</version><type>pom</type><scope>import</scope></dependency>
  </dependencies></dependencyManagement>
  <dependencies><dependency><groupId>g</groupId><artifactId>a</artifactId></dependency></dependencies>
</project>"#,
    );

    let report = env.report_json("app", &[]);
    let detail = &report["licenses"]["details"][0];
    assert_eq!(detail["version"], "2.0");
    assert_eq!(detail["license"], "MIT");
}

#[test]
fn test_cyclic_parents_terminate() {
    let env = TestProject::new();
    env.publish(
        "g",
        "p1",
        "1",
        "<parent><groupId>g</groupId><artifactId>p2</artifactId><version>1</version></parent>",
    );
    env.publish(
        "g",
        "p2",
        "1",
        "<parent><groupId>g</groupId><artifactId>p1</artifactId><version>1</version></parent>",
    );
    env.module(
        "app",
        r#"<project>
  <parent><groupId>g</groupId><artifactId>p1</artifactId><version>1</version><relativePath/></parent>
  <artifactId>app</artifactId>
  <dependencies><dependency><groupId>g</groupId><artifactId>missing</artifactId><version>${undefined.version}</version></dependency></dependencies>
</project>"#,
    );

    let report = env.report_json("app", &[]);
    assert_eq!(report["groupId"], "g");
    assert_eq!(report["version"], "1");
    assert_eq!(report["licenses"]["details"][0]["license"], "unknown");
}

#[test]
fn test_dependency_tree_and_properties_sections() {
    let env = TestProject::new();
    gpl_project(&env);

    let report = env.report_json("app", &["--tree", "--properties"]);
    let tree = &report["dependencies"];
    assert_eq!(tree["summary"]["total"], 2);
    assert_eq!(tree["summary"]["direct"], 1);
    assert_eq!(
        tree["flat"][1]["path"],
        "com.example:app:jar:1.0.0 -> com.example:direct-a:jar:1.0 -> com.example:gpl-lib:jar:2.1.0"
    );
    assert_eq!(report["properties"]["project"]["project.artifactId"], "app");
}

#[test]
fn test_missing_module_manifest_fails() {
    let env = TestProject::new();
    let repo = env.repo();
    let output = env.run(env.dir.path(), &["report", "--repo", repo.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to load module manifest"));
}

#[test]
fn test_init_then_validate_config() {
    let env = TestProject::new();
    let output = env.run(env.dir.path(), &["init", "strict"]);
    assert!(output.status.success());
    assert!(env.dir.path().join("deploy-manifest.toml").exists());

    let output = env.run(env.dir.path(), &["config", "--validate"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let output = env.run(env.dir.path(), &["config", "--show"]);
    let shown: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(shown["fail_on_incompatible"], true);
}
