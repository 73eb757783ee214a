use super::*;

/// helper to build a file set from (name, content) pairs
fn file_set(files: &[(&str, &str)]) -> FileSet {
    files
        .iter()
        .map(|(name, content)| ProjectFile::new(*name, *content))
        .collect()
}

/// helper to stage everything and commit
fn commit_all(repo: &Repository, files: &FileSet, message: &str) -> Repository {
    repo.stage_all(files).commit(files, message, "u").unwrap()
}

#[test]
fn test_initialize() {
    let repo = Repository::initialize();
    assert!(repo.is_initialized());
    assert_eq!(repo.branch_name(), "main");
    assert_eq!(repo.commit_count(), 0);
    assert!(repo.staged().is_empty());
    assert!(repo.head().is_none());
}

#[test]
fn test_commit_without_staged_changes_fails() {
    let files = file_set(&[("a.txt", "1")]);
    let repo = Repository::initialize();

    let result = repo.commit(&files, "init", "u");
    assert_eq!(result.unwrap_err(), VersionError::NoStagedChanges);
    assert_eq!(repo, Repository::initialize());

    // checked before the message is looked at
    let result = repo.commit(&files, "", "");
    assert_eq!(result.unwrap_err(), VersionError::NoStagedChanges);
}

#[test]
fn test_stage_commit_scenario() {
    let files = file_set(&[("a.txt", "1")]);
    let repo = Repository::initialize().stage(&["a.txt"]);
    let repo = repo.commit(&files, "init", "u").unwrap();

    assert_eq!(repo.commit_count(), 1);
    assert!(repo.staged().is_empty());
    assert!(compute_status(&files, &repo).is_empty());

    let head = repo.head().unwrap();
    assert_eq!(head.message, "init");
    assert_eq!(head.author, "u");
    assert_eq!(head.parent_id, None);
    assert_eq!(head.id.len(), 7);

    // modify then status
    let modified = file_set(&[("a.txt", "2")]);
    assert_eq!(
        compute_status(&modified, &repo),
        vec![FileStatus::new("a.txt", ChangeKind::Modified)]
    );
}

#[test]
fn test_status_ordering() {
    let committed = file_set(&[
        ("keep.txt", "k"),
        ("gone1.txt", "x"),
        ("edit.txt", "1"),
        ("gone2.txt", "y"),
    ]);
    let repo = commit_all(&Repository::initialize(), &committed, "init");

    let current = file_set(&[("new.txt", "n"), ("edit.txt", "2"), ("keep.txt", "k")]);
    let statuses = compute_status(&current, &repo);

    assert_eq!(
        statuses,
        vec![
            FileStatus::new("new.txt", ChangeKind::Added),
            FileStatus::new("edit.txt", ChangeKind::Modified),
            FileStatus::new("gone1.txt", ChangeKind::Deleted),
            FileStatus::new("gone2.txt", ChangeKind::Deleted),
        ]
    );
}

#[test]
fn test_status_categories_partition_names() {
    let committed = file_set(&[("a", "1"), ("b", "1"), ("c", "1")]);
    let repo = commit_all(&Repository::initialize(), &committed, "init");
    let current = file_set(&[("b", "2"), ("c", "1"), ("d", "1")]);

    let statuses = compute_status(&current, &repo);
    let mut names: Vec<&str> = statuses.iter().map(|s| s.file_name.as_str()).collect();
    names.sort_unstable();
    names.dedup();

    assert_eq!(names.len(), statuses.len(), "no name in two categories");
    assert_eq!(names, ["a", "b", "d"]);
    assert!(!statuses.iter().any(|s| s.file_name == "c"), "unchanged file reported");
}

#[test]
fn test_stage_is_idempotent() {
    let repo = Repository::initialize();
    let once = repo.stage(&["a", "b", "a"]);
    let twice = once.stage(&["a", "b", "a"]);

    assert_eq!(once, twice);
    assert_eq!(once.staged(), ["a", "b"]);
}

#[test]
fn test_unstage() {
    let repo = Repository::initialize().stage(&["a", "b", "c"]);
    let repo = repo.unstage(&["b", "missing"]);
    assert_eq!(repo.staged(), ["a", "c"]);
}

#[test]
fn test_commit_chain_integrity() {
    let mut repo = Repository::initialize();
    for n in 0..5 {
        let content = n.to_string();
        let files = file_set(&[("counter.txt", content.as_str())]);
        repo = commit_all(&repo, &files, &format!("commit {n}"));
    }

    let log: Vec<&Commit> = repo.log().collect();
    assert_eq!(log.len(), 5);
    for pair in log.windows(2) {
        assert_eq!(pair[0].parent_id.as_deref(), Some(pair[1].id.as_str()));
    }
    assert_eq!(log[4].parent_id, None);
    assert_eq!(log[0].message, "commit 4");
}

#[test]
fn test_partial_stage_keeps_unstaged_changes_out() {
    let files = file_set(&[("a.txt", "1"), ("b.txt", "1")]);
    let repo = Repository::initialize().stage(&["a.txt"]);
    let repo = repo.commit(&files, "only a", "u").unwrap();

    let snapshot: Vec<&str> = repo.head_snapshot().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(snapshot, ["a.txt"]);
    assert_eq!(
        compute_status(&files, &repo),
        vec![FileStatus::new("b.txt", ChangeKind::Added)]
    );
}

#[test]
fn test_staged_missing_file_commits_deletion() {
    let files = file_set(&[("a.txt", "1"), ("b.txt", "1")]);
    let repo = commit_all(&Repository::initialize(), &files, "init");

    let files = file_set(&[("a.txt", "1")]);
    let statuses = compute_status(&files, &repo);
    assert_eq!(statuses, vec![FileStatus::new("b.txt", ChangeKind::Deleted)]);

    let repo = repo.stage(&["b.txt"]).commit(&files, "remove b", "u").unwrap();
    assert_eq!(repo.head_snapshot().len(), 1);
    assert!(compute_status(&files, &repo).is_empty());
}

#[test]
fn test_commit_snapshot_is_a_copy() {
    let mut files = file_set(&[("a.txt", "1")]);
    let repo = commit_all(&Repository::initialize(), &files, "init");

    files.upsert(ProjectFile::new("a.txt", "changed"));
    assert_eq!(repo.head_snapshot()[0].content, "1");
}

#[test]
fn test_find_commit() {
    let files = file_set(&[("a.txt", "1")]);
    let repo = commit_all(&Repository::initialize(), &files, "init");
    let id = repo.head().unwrap().id.clone();

    assert_eq!(repo.find(&id).unwrap().message, "init");
    assert_eq!(
        repo.find("nope").unwrap_err(),
        VersionError::UnknownCommit("nope".to_string())
    );
}

#[test]
fn test_repository_serialises_camel_case() {
    let repo = Repository::initialize().stage(&["a"]);
    let json = serde_json::to_value(&repo).unwrap();
    assert_eq!(json["branchName"], "main");
    assert_eq!(json["stagedFileNames"][0], "a");

    let back: Repository = serde_json::from_value(json).unwrap();
    assert_eq!(back, repo);
}

#[test]
fn test_persisted_commits_are_newest_first() {
    let files = file_set(&[("a.txt", "1")]);
    let first = commit_all(&Repository::initialize(), &files, "first");
    let files = file_set(&[("a.txt", "2")]);
    let second = commit_all(&first, &files, "second");

    let json = serde_json::to_value(&second).unwrap();
    assert_eq!(json["commits"][0]["message"], "second");
    assert_eq!(json["commits"][1]["message"], "first");
    assert_eq!(json["commits"][0]["parentId"], json["commits"][1]["id"]);
    assert!(json["commits"][1]["parentId"].is_null());
    assert_eq!(second.head().unwrap().message, "second");
}
