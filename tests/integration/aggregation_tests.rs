use crate::fixtures::{entry, plugin, Project};
use sass_modules::core::interfaces::{CssPostProcessor, SyncProcessor};
use sass_modules::core::models::CompilerOptions;
use sass_modules::utils::Result;
use sass_modules::SassModulesOptions;
use std::sync::Arc;

fn aggregating(project: &Project) -> SassModulesOptions {
    SassModulesOptions {
        options: CompilerOptions {
            out_file: Some(project.root.join("dist/bundle.css")),
            ..Default::default()
        },
        ..Default::default()
    }
}

#[tokio::test]
async fn test_combined_output_follows_import_order() {
    let project = Project::new();
    project.write("a.scss", ".a { order: 1; }\n");
    project.write("b.scss", ".b { order: 2; }\n");
    project.write("c.scss", ".c { order: 3; }\n");
    let main = project.write(
        "main.js",
        "import './a.scss';\nimport './b.scss';\nimport './c.scss';\n",
    );

    let host = project.host(plugin(aggregating(&project)));
    let graph = host.build(&entry(&main)).await.unwrap();

    for name in ["a.scss", "b.scss", "c.scss"] {
        assert_eq!(
            graph.get(&project.id(name)).unwrap().code,
            "export default '';\n"
        );
    }

    let bundle = project.read("dist/bundle.css");
    let a = bundle.find(".a {").unwrap();
    let b = bundle.find(".b {").unwrap();
    let c = bundle.find(".c {").unwrap();
    assert!(a < b && b < c, "unexpected order:\n{}", bundle);
}

#[tokio::test]
async fn test_nested_imports_are_not_duplicated_in_bundle() {
    let project = Project::new();
    project.write("_base.scss", ".base { x: y; }\n");
    project.write("theme.scss", "@import 'base';\n.theme { x: y; }\n");
    let main = project.write("main.js", "import './theme.scss';\n");

    let host = project.host(plugin(aggregating(&project)));
    host.build(&entry(&main)).await.unwrap();

    let bundle = project.read("dist/bundle.css");
    assert_eq!(bundle.matches(".base {").count(), 1);
    assert!(bundle.find(".base {").unwrap() < bundle.find(".theme {").unwrap());
}

#[tokio::test]
async fn test_processor_runs_on_aggregated_css() {
    let project = Project::new();
    let app = project.write("app.scss", ".app { color: red; }\n");

    let processor: Arc<dyn CssPostProcessor> =
        Arc::new(SyncProcessor(|css: String| -> Result<String> {
            Ok(format!("/* processed */\n{}", css))
        }));
    let host = project.host(plugin(SassModulesOptions {
        processor: Some(processor),
        ..aggregating(&project)
    }));
    host.build(&entry(&app)).await.unwrap();

    let bundle = project.read("dist/bundle.css");
    assert!(bundle.starts_with("/* processed */\n.app {"));
}

#[tokio::test]
async fn test_nothing_written_without_stylesheets() {
    let project = Project::new();
    let main = project.write("main.js", "export const x = 1;\n");

    let host = project.host(plugin(aggregating(&project)));
    host.build(&entry(&main)).await.unwrap();

    assert!(!project.root.join("dist/bundle.css").exists());
    assert!(project.root.join("dist/main.js").exists());
}
