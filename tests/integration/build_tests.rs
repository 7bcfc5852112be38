use crate::fixtures::{entry, plugin, Project};
use sass_modules::core::models::ResolveMode;
use sass_modules::utils::SassModulesError;
use sass_modules::SassModulesOptions;

#[tokio::test]
async fn test_stylesheet_module_exports_compiled_css() {
    let project = Project::new();
    project.write("src/_vars.scss", "$primary: #333;\n");
    project.write(
        "src/app.scss",
        "@import 'vars';\n.app { color: $primary; }\n",
    );
    let main = project.write("src/main.js", "import css from './app.scss';\nexport default css;\n");

    let host = project.host(plugin(SassModulesOptions::default()));
    let graph = host.build(&entry(&main)).await.unwrap();

    let app = graph.get(&project.id("src/app.scss")).unwrap();
    assert!(app.code.contains(&format!("import '{}';", project.id("src/_vars.scss"))));
    assert!(app.code.contains("export default '.app {\\n  color: #333;\\n}"));
    assert_eq!(app.dependencies, vec![project.id("src/_vars.scss")]);

    // The partial is part of the graph but already inlined by its importer
    let vars = graph.get(&project.id("src/_vars.scss")).unwrap();
    assert_eq!(vars.code, "export default '';\n");

    let written = project.read("dist/src/app.scss.js");
    assert_eq!(written, app.code);
    assert!(project.root.join("dist/src/app.scss.js.map").exists());
}

#[tokio::test]
async fn test_insert_mode_emits_style_injection() {
    let project = Project::new();
    let app = project.write("app.scss", ".a { b: c; }\n");

    let host = project.host(plugin(SassModulesOptions {
        insert: true,
        ..Default::default()
    }));
    let graph = host.build(&entry(&app)).await.unwrap();

    let module = graph.get(&project.id("app.scss")).unwrap();
    assert!(module.is_entry);
    assert!(module.code.contains("style.textContent = '.a {\\n  b: c;\\n}"));
    assert!(module.code.contains("head.appendChild(style);"));
}

#[tokio::test]
async fn test_package_imports_resolve_through_node_modules() {
    let project = Project::new();
    project.write("node_modules/theme/scss/_colors.scss", "$accent: #f00;\n");
    project.write(
        "node_modules/theme/scss/_buttons.scss",
        "@import 'theme/scss/colors';\n.btn { color: $accent; }\n",
    );
    let app = project.write("src/app.scss", "@import '~theme/scss/buttons';\n");

    let sass = plugin(SassModulesOptions::default());
    let host = project.host(sass.clone());
    let graph = host.build(&entry(&app)).await.unwrap();

    let module = graph.get(&project.id("src/app.scss")).unwrap();
    assert!(module.code.contains(&format!(
        "import '{}';",
        project.id("node_modules/theme/scss/_buttons.scss")
    )));
    assert!(module.code.contains("color: #f00"));

    // One include path for the package, however many imports used it
    let include_paths = sass.context().include_paths().snapshot();
    assert_eq!(include_paths.len(), 1);
    assert_eq!(include_paths[0].root, project.root.join("node_modules"));
}

#[tokio::test]
async fn test_shared_stylesheet_compiled_once_across_entries() {
    let project = Project::new();
    project.write("_shared.scss", ".shared { a: b; }\n");
    let first = project.write("first.scss", "@import 'shared';\n.first { a: b; }\n");
    let second = project.write("second.scss", "@import 'shared';\n.second { a: b; }\n");

    let sass = plugin(SassModulesOptions::default());
    let host = project.host(sass.clone());
    let graph = host.build(&[first, second]).await.unwrap();

    let shared = graph.get(&project.id("_shared.scss")).unwrap();
    assert_eq!(shared.code, "export default '';\n");
    for name in ["first.scss", "second.scss"] {
        let module = graph.get(&project.id(name)).unwrap();
        assert_eq!(module.dependencies, vec![project.id("_shared.scss")]);
        assert!(module.code.contains(".shared {"));
    }
    assert_eq!(
        sass.context().exported(),
        vec![project.id("first.scss"), project.id("second.scss")]
    );
}

#[tokio::test]
async fn test_compile_error_fails_the_build() {
    let project = Project::new();
    let app = project.write("broken.scss", "body { color: $undefined; }\n");

    let host = project.host(plugin(SassModulesOptions::default()));
    let err = host.build(&entry(&app)).await.unwrap_err();

    match err {
        SassModulesError::Compile { id, .. } => assert_eq!(id, project.id("broken.scss")),
        other => panic!("expected compile error, got {other}"),
    }
}

#[tokio::test]
async fn test_missing_import_fails_the_build() {
    let project = Project::new();
    let app = project.write("app.scss", "@import './nowhere';\n");

    let host = project.host(plugin(SassModulesOptions::default()));
    let err = host.build(&entry(&app)).await.unwrap_err();
    assert!(matches!(err, SassModulesError::Unresolved { .. }));
}

#[tokio::test]
async fn test_plugin_resolve_matches_transform_resolution() {
    let project = Project::new();
    project.write("styles/foo.scss", "");
    project.write("styles/_foo.scss", "");
    let importer = project.write("styles/main.scss", "");

    let sass = plugin(SassModulesOptions::default());
    let resolution = sass
        .resolve("./foo", &importer, ResolveMode::WithContents)
        .unwrap();
    assert_eq!(resolution.file, project.root.join("styles/foo.scss"));
    assert_eq!(resolution.contents.as_deref(), Some(""));
}

#[tokio::test]
async fn test_tilde_import_of_package_entry_point() {
    let project = Project::new();
    project.write("node_modules/theme/package.json", r#"{"sass": "dist/theme.scss"}"#);
    project.write("node_modules/theme/dist/theme.scss", ".theme { color: teal; }\n");
    let app = project.write("app.scss", "@import '~theme';\n");

    let host = project.host(plugin(SassModulesOptions::default()));
    let graph = host.build(&entry(&app)).await.unwrap();

    let module = graph.get(&project.id("app.scss")).unwrap();
    assert_eq!(
        module.dependencies,
        vec![project.id("node_modules/theme/dist/theme.scss")]
    );
    assert!(module.code.contains(".theme {\\n  color: teal;\\n}"));
}

#[tokio::test]
async fn test_nested_package_import_from_relative_partial() {
    let project = Project::new();
    project.write("node_modules/theme/_colors.scss", "$accent: navy;\n");
    project.write("_partial.scss", "@import 'theme/colors';\n.partial { color: $accent; }\n");
    let app = project.write("app.scss", "@import './partial';\n");

    let host = project.host(plugin(SassModulesOptions::default()));
    let graph = host.build(&entry(&app)).await.unwrap();

    let module = graph.get(&project.id("app.scss")).unwrap();
    assert!(module.code.contains("color: navy"));
    // The partial's own edge to the package file is still emitted
    let partial = graph.get(&project.id("_partial.scss")).unwrap();
    assert_eq!(
        partial.dependencies,
        vec![project.id("node_modules/theme/_colors.scss")]
    );
    assert_eq!(graph.len(), 3);
}
