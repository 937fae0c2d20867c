//! Template precompilation driven by a config file.

use std::fs;

use dev_server::config::load_mote_targets;
use dev_server::mote::MoteTask;

#[test]
fn test_targets_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("views");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("_row.mote"), "<tr>\t{{cell}}</tr>").unwrap();
    fs::write(src.join("table.mote"), "<table>\r\n{{> row}}</table>").unwrap();

    let dest = dir.path().join("build/templates.js");
    let config_path = dir.path().join("devserver.toml");
    fs::write(
        &config_path,
        format!(
            r#"
[mote.views]
src = ["{src}"]
dest = "{dest}"
namespace = "Templates"
extensions = ["mote"]
strip_prefix = "{src}/"
"#,
            src = src.display(),
            dest = dest.display()
        ),
    )
    .unwrap();

    let targets = load_mote_targets(&config_path).unwrap();
    assert_eq!(targets.len(), 1);

    let task = MoteTask::new(targets["views"].clone()).unwrap();
    task.run().unwrap();

    let bundle = fs::read_to_string(&dest).unwrap();
    assert_eq!(
        bundle,
        [
            "this['Templates'] = this['Templates'] || {};",
            "mote.compilePartial('row', \"<tr>\\t{{cell}}</tr>\");",
            "this['Templates']['table.mote'] = mote.compile(\"<table>\\r\\n{{> row}}</table>\");",
        ]
        .join("\n\n")
    );
}
