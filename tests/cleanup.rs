use dataform_viz::cleanup::cleanup_sqlx_files;
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use tempfile::TempDir;

fn definitions() -> (TempDir, PathBuf) {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("definitions");
    std::fs::create_dir(&dir).unwrap();
    (tmp, dir)
}

#[test]
fn cleans_config_but_not_sql() {
    let (_tmp, dir) = definitions();
    let file = dir.join("test.sqlx");
    std::fs::write(
        &file,
        "config {
  type: \"table\",
  database: wwim_utils.PROJECT_ID
}

SELECT
  customer_id,
  wwim_utils.PROJECT_ID as project_id
FROM `${wwim_utils.PROJECT_ID}.dataset.table`
WHERE schema = 'wwim_utils.PROJECT_ID'
",
    )
    .unwrap();

    assert_eq!(cleanup_sqlx_files(&dir, false).unwrap(), 1);

    let cleaned = std::fs::read_to_string(&file).unwrap();
    assert!(!cleaned.lines().any(|l| l.trim_start().starts_with("database")));
    assert!(cleaned.contains("wwim_utils.PROJECT_ID as project_id"));
    assert!(cleaned.contains("${wwim_utils.PROJECT_ID}.dataset.table"));
    assert!(cleaned.contains("schema = 'wwim_utils.PROJECT_ID'"));
}

#[test]
fn keeps_other_config_properties() {
    let (_tmp, dir) = definitions();
    let file = dir.join("test.sqlx");
    std::fs::write(
        &file,
        "config {
  type: \"table\",
  database: wwim_utils.PROJECT_ID,
  schema: \"staging\",
  name: \"customers\"
}

SELECT * FROM source
",
    )
    .unwrap();

    assert_eq!(cleanup_sqlx_files(&dir, false).unwrap(), 1);
    let cleaned = std::fs::read_to_string(&file).unwrap();
    assert!(!cleaned.contains("database: wwim_utils.PROJECT_ID"));
    assert!(cleaned.contains("schema: \"staging\""));
    assert!(cleaned.contains("name: \"customers\""));
}

#[test]
fn writes_backup_with_original_content() {
    let (_tmp, dir) = definitions();
    let file = dir.join("test.sqlx");
    let content = "config { database: wwim_utils.PROJECT_ID }\nSELECT * FROM table\n";
    std::fs::write(&file, content).unwrap();

    assert_eq!(cleanup_sqlx_files(&dir, true).unwrap(), 1);
    let backup = dir.join("test.sqlx.bak");
    assert_eq!(std::fs::read_to_string(backup).unwrap(), content);
}

#[test]
fn unchanged_files_are_not_counted_or_backed_up() {
    let (_tmp, dir) = definitions();
    std::fs::write(dir.join("test.sqlx"), "config { type: \"table\" }\nSELECT * FROM table\n").unwrap();

    assert_eq!(cleanup_sqlx_files(&dir, true).unwrap(), 0);
    assert!(!dir.join("test.sqlx.bak").exists());
}

#[test]
fn counts_every_modified_file_recursively() {
    let (_tmp, dir) = definitions();
    for i in 0..3 {
        std::fs::write(
            dir.join(format!("test{i}.sqlx")),
            format!("config {{ database: project{i}_utils.PROJECT_ID }}\nSELECT * FROM table{i}\n"),
        )
        .unwrap();
    }
    let nested = dir.join("subdir");
    std::fs::create_dir(&nested).unwrap();
    std::fs::write(
        nested.join("test.sqlx"),
        "config { database: my_utils.PROJECT_ID }\nSELECT * FROM table\n",
    )
    .unwrap();
    std::fs::write(dir.join("notes.md"), "database: my_utils.PROJECT_ID   \n").unwrap();

    assert_eq!(cleanup_sqlx_files(&dir, false).unwrap(), 4);
    assert_eq!(
        std::fs::read_to_string(dir.join("notes.md")).unwrap(),
        "database: my_utils.PROJECT_ID   \n"
    );
}

#[test]
fn missing_or_empty_directory_is_zero() {
    let (tmp, dir) = definitions();
    assert_eq!(cleanup_sqlx_files(&dir, false).unwrap(), 0);
    assert_eq!(cleanup_sqlx_files(tmp.path().join("nonexistent_dir"), false).unwrap(), 0);
}
