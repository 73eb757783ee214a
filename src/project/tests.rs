use super::*;

#[test]
fn test_upsert_replaces_in_place() {
    let mut files: FileSet = [
        ProjectFile::new("index.html", "<p>1</p>"),
        ProjectFile::new("app.js", "1"),
    ]
    .into_iter()
    .collect();

    files.upsert(ProjectFile::new("index.html", "<p>2</p>"));
    files.upsert(ProjectFile::new("style.css", "p {}"));

    let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["index.html", "app.js", "style.css"]);
    assert_eq!(files.get("index.html").unwrap().content, "<p>2</p>");
}

#[test]
fn test_from_iter_collapses_duplicate_names() {
    let files: FileSet = [ProjectFile::new("a.txt", "1"), ProjectFile::new("a.txt", "2")]
        .into_iter()
        .collect();

    assert_eq!(files.len(), 1);
    assert_eq!(files.get("a.txt").unwrap().content, "2");
}

#[test]
fn test_remove() {
    let mut files: FileSet = [ProjectFile::new("a.txt", "1")].into_iter().collect();
    assert!(files.remove("a.txt").is_some());
    assert!(files.remove("a.txt").is_none());
    assert!(files.is_empty());
}

#[test]
fn test_language_inference() {
    assert_eq!(FileType::from_name("index.HTML"), FileType::Html);
    assert_eq!(FileType::from_name("main.py"), FileType::Python);
    assert_eq!(FileType::from_name("logo.png"), FileType::Other);
    assert_eq!(FileType::from_name("Makefile"), FileType::Other);
}

#[test]
fn test_unknown_language_deserialises_as_other() {
    let file: ProjectFile =
        serde_json::from_str(r#"{"name":"main.rs","content":"fn main() {}","language":"rust"}"#)
            .unwrap();
    assert_eq!(file.language, FileType::Other);

    let file: ProjectFile = serde_json::from_str(r#"{"name":"a.css","content":""}"#).unwrap();
    assert_eq!(file.language, FileType::Other);
}

#[test]
fn test_loading_repeated_names_keeps_names_unique() {
    let json = r#"[
        {"name": "index.html", "content": "old"},
        {"name": "app.js", "content": "x"},
        {"name": "index.html", "content": "new"}
    ]"#;
    let files: FileSet = serde_json::from_str(json).unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files.as_slice()[0].name, "index.html");
    assert_eq!(files.get("index.html").unwrap().content, "new");

    // still written as a plain list
    let back = serde_json::to_value(&files).unwrap();
    assert_eq!(back.as_array().unwrap().len(), 2);
    assert_eq!(back[1]["name"], "app.js");
}
