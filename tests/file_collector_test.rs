//! Tests for FileCollector glob expansion and filtering

use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use chatctl::application::services::FileCollector;
use chatctl::application::ApplicationError;
use chatctl::domain::DomainError;
use chatctl::infrastructure::traits::RealFileSystem;

/// Helper to create a file (and its directories) below `root`
fn create_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn collector(temp: &TempDir) -> FileCollector {
    chatctl::util::testing::init_test_setup();
    FileCollector::new(Arc::new(RealFileSystem), temp.path().to_path_buf())
}

fn patterns(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn given_excluded_directories_when_collecting_then_skips_them() {
    // Arrange
    let temp = TempDir::new().unwrap();
    create_file(temp.path(), "src/app.ts", "export const app = 1;");
    create_file(temp.path(), "src/lib/util.ts", "export const util = 2;");
    create_file(temp.path(), "node_modules/dep/index.ts", "dep");
    create_file(temp.path(), "src/node_modules/nested/index.ts", "nested dep");
    create_file(temp.path(), ".git/hooks/pre-commit.ts", "hook");

    // Act
    let files = collector(&temp).collect(&patterns(&["**/*.ts"])).unwrap();

    // Assert
    let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["src/app.ts", "src/lib/util.ts"]);
    assert!(names
        .iter()
        .all(|n| !n.contains("node_modules/") && !n.contains(".git/")));
    assert_eq!(files[0].content, "export const app = 1;");
}

#[test]
fn given_overlapping_patterns_when_collecting_then_first_occurrence_wins() {
    // Arrange
    let temp = TempDir::new().unwrap();
    create_file(temp.path(), "b.md", "b");
    create_file(temp.path(), "a.rs", "a");
    create_file(temp.path(), "c.rs", "c");

    // Act
    let files = collector(&temp)
        .collect(&patterns(&["b.md", "*.rs", "*"]))
        .unwrap();

    // Assert
    let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["b.md", "a.rs", "c.rs"]);
}

#[test]
fn given_pattern_matching_nothing_when_collecting_then_returns_empty() {
    let temp = TempDir::new().unwrap();
    create_file(temp.path(), "a.rs", "a");

    let files = collector(&temp).collect(&patterns(&["**/*.py"])).unwrap();

    assert!(files.is_empty());
}

#[test]
fn given_directory_match_when_collecting_then_keeps_files_only() {
    let temp = TempDir::new().unwrap();
    create_file(temp.path(), "src/a.rs", "a");

    let files = collector(&temp).collect(&patterns(&["*"])).unwrap();

    assert!(files.is_empty(), "'src' is a directory and must be skipped");
}

#[test]
fn given_dot_slash_pattern_when_collecting_then_names_stay_relative() {
    let temp = TempDir::new().unwrap();
    create_file(temp.path(), "docs/readme.md", "# hi");

    let files = collector(&temp).collect(&patterns(&["./docs/*.md"])).unwrap();

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "docs/readme.md");
}

#[test]
fn given_invalid_pattern_when_collecting_then_returns_validation_error() {
    let temp = TempDir::new().unwrap();

    let result = collector(&temp).collect(&patterns(&["src/[a.rs"]));

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::InvalidPattern { .. }))
    ));
}

#[test]
fn given_non_utf8_file_when_collecting_then_read_fails() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("blob.bin"), [0xff, 0xfe, 0x00, 0x80]).unwrap();

    let result = collector(&temp).collect(&patterns(&["*.bin"]));

    assert!(matches!(
        result,
        Err(ApplicationError::OperationFailed { .. })
    ));
}
