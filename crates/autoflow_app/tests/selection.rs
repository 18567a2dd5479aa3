use std::fs;

use autoflow_app::selection::{count_valid_urls, selection_msgs};
use autoflow_core::{Msg, QueueEntry};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn counts_only_non_comment_lines() {
    let content = "\
# batch 1
https://example.com/a

   https://example.com/b   
  # indented comment
https://example.com/c
";
    assert_eq!(count_valid_urls(content), 3);
    assert_eq!(count_valid_urls(""), 0);
    assert_eq!(count_valid_urls("\n\n# only comments\n"), 0);
}

#[test]
fn files_are_grouped_and_folders_stand_alone() {
    let temp = TempDir::new().unwrap();
    let list = temp.path().join("list.txt");
    fs::write(&list, "https://a\nhttps://b\n").unwrap();
    let folder = temp.path().join("batch");
    fs::create_dir(&folder).unwrap();

    let msgs = selection_msgs(&[folder.clone(), list.clone()]).unwrap();

    let list_path = fs::canonicalize(&list).unwrap().to_string_lossy().into_owned();
    let folder_path = fs::canonicalize(&folder)
        .unwrap()
        .to_string_lossy()
        .into_owned();
    assert_eq!(
        msgs,
        vec![
            Msg::FilesSelected(vec![QueueEntry::file(list_path, "list.txt", Some(2))]),
            Msg::DirectorySelected {
                path: folder_path,
                name: "batch".to_string(),
            },
        ]
    );
}

#[test]
fn missing_path_is_an_error() {
    let temp = TempDir::new().unwrap();
    let err = selection_msgs(&[temp.path().join("nope.txt")]).unwrap_err();
    assert!(err.to_string().contains("nope.txt"));
}
