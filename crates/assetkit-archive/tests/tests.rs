use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

use assetkit_archive::{
    ArchiveCleanup, ClearMode, EntryFilter, Error, ExtractOptions, Progress, ProgressCallback,
    Stage, unzip_file,
};
use zip::write::SimpleFileOptions;

/// `None` content marks a directory entry.
fn build_zip(path: &Path, entries: &[(&str, Option<&str>)]) {
    let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
    let options = SimpleFileOptions::default();
    for (name, content) in entries {
        match content {
            Some(text) => {
                writer.start_file(*name, options).unwrap();
                writer.write_all(text.as_bytes()).unwrap();
            }
            None => writer.add_directory(*name, options).unwrap(),
        }
    }
    writer.finish().unwrap();
}

fn scratch() -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix("assetkit-test-zip-")
        .tempdir()
        .expect("Failed to create temp dir")
}

#[test]
fn extract_nested_entries_and_remove_archive() {
    let dir = scratch();
    let archive = dir.path().join("a.zip");
    let target = dir.path().join("a");
    build_zip(&archive, &[("x.txt", Some("hello")), ("sub/y.txt", Some("world"))]);

    let report = unzip_file(&archive, &target, &ExtractOptions::default()).unwrap();

    assert_eq!(fs::read_to_string(target.join("x.txt")).unwrap(), "hello");
    assert_eq!(fs::read_to_string(target.join("sub/y.txt")).unwrap(), "world");
    assert!(!archive.exists(), "archive should be deleted after extraction");
    assert!(report.archive_removed);
    assert_eq!(report.entry_count, 2);
    assert_eq!(report.total_bytes, 10);
}

#[test]
fn extracted_files_are_byte_identical() {
    let dir = scratch();
    let archive = dir.path().join("bin.zip");
    let payload: Vec<u8> = (0..20_000u32).map(|i| (i * 31 % 256) as u8).collect();
    {
        let mut writer = zip::ZipWriter::new(File::create(&archive).unwrap());
        writer.start_file("blob.bin", SimpleFileOptions::default()).unwrap();
        writer.write_all(&payload).unwrap();
        writer.finish().unwrap();
    }

    unzip_file(&archive, dir.path().join("bin"), &ExtractOptions::default()).unwrap();
    assert_eq!(fs::read(dir.path().join("bin/blob.bin")).unwrap(), payload);
}

#[test]
fn directory_entries_become_directories() {
    let dir = scratch();
    let archive = dir.path().join("dirs.zip");
    let target = dir.path().join("dirs");
    build_zip(
        &archive,
        &[("empty/", None), ("listed/", None), ("listed/file.txt", Some("f")), ("implied/deep/z.txt", Some("z"))],
    );

    unzip_file(&archive, &target, &ExtractOptions::default()).unwrap();

    assert!(target.join("empty").is_dir());
    assert!(target.join("listed").is_dir());
    assert!(target.join("implied/deep").is_dir());
    assert_eq!(fs::read_to_string(target.join("implied/deep/z.txt")).unwrap(), "z");
}

#[test]
fn second_extraction_replaces_stale_top_level_entries() {
    let dir = scratch();
    let target = dir.path().join("pack");

    let first = dir.path().join("first.zip");
    build_zip(&first, &[("old.txt", Some("old")), ("olddir/inner.txt", Some("inner"))]);
    unzip_file(&first, &target, &ExtractOptions::default()).unwrap();
    assert!(target.join("olddir/inner.txt").exists());

    let second = dir.path().join("second.zip");
    build_zip(&second, &[("new.txt", Some("new"))]);
    let report = unzip_file(&second, &target, &ExtractOptions::default()).unwrap();

    let mut names: Vec<_> = fs::read_dir(&target)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    assert_eq!(names, vec!["new.txt"]);
    assert_eq!(report.cleared.removed, 2);
}

#[test]
fn files_only_clear_keeps_populated_directories() {
    let dir = scratch();
    let target = dir.path().join("pack");
    fs::create_dir_all(target.join("kept")).unwrap();
    fs::write(target.join("kept/old.txt"), "old").unwrap();
    fs::write(target.join("gone.txt"), "gone").unwrap();

    let archive = dir.path().join("pack.zip");
    build_zip(&archive, &[("fresh.txt", Some("fresh"))]);
    let options = ExtractOptions::default().clear_mode(ClearMode::FilesOnly);
    let report = unzip_file(&archive, &target, &options).unwrap();

    assert!(target.join("kept/old.txt").exists());
    assert!(!target.join("gone.txt").exists());
    assert_eq!(report.cleared.retained, vec![target.join("kept")]);
}

#[test]
fn zero_entry_archive_leaves_empty_target_and_deletes_archive() {
    let dir = scratch();
    let archive = dir.path().join("empty.zip");
    let target = dir.path().join("empty");
    fs::create_dir_all(&target).unwrap();
    fs::write(target.join("stale.txt"), "stale").unwrap();
    build_zip(&archive, &[]);

    let report = unzip_file(&archive, &target, &ExtractOptions::default()).unwrap();

    assert_eq!(report.entry_count, 0);
    assert!(target.is_dir());
    assert_eq!(fs::read_dir(&target).unwrap().count(), 0);
    assert!(!archive.exists());
}

#[test]
fn traversal_entry_is_rejected_and_nothing_escapes() {
    let dir = scratch();
    let archive = dir.path().join("evil.zip");
    let target = dir.path().join("jail/evil");
    build_zip(&archive, &[("../escape.txt", Some("pwned")), ("inside.txt", Some("ok"))]);

    let err = unzip_file(&archive, &target, &ExtractOptions::default()).unwrap_err();

    assert!(matches!(err, Error::ZipSlip { .. }), "{err}");
    assert!(!dir.path().join("jail/escape.txt").exists());
    assert!(!dir.path().join("escape.txt").exists());
    assert!(archive.exists(), "archive is kept when extraction fails");
}

#[test]
fn corrupted_archive_is_kept() {
    let dir = scratch();
    let archive = dir.path().join("broken.zip");
    fs::write(&archive, b"PK\x03\x04 definitely not a zip").unwrap();

    let result = unzip_file(&archive, dir.path().join("broken"), &ExtractOptions::default());

    assert!(result.is_err());
    assert!(archive.exists());
}

#[test]
fn keep_cleanup_leaves_archive() {
    let dir = scratch();
    let archive = dir.path().join("keep.zip");
    build_zip(&archive, &[("a.txt", Some("a"))]);

    let options = ExtractOptions::default().cleanup(ArchiveCleanup::Keep);
    let report = unzip_file(&archive, dir.path().join("keep"), &options).unwrap();

    assert!(archive.exists());
    assert!(!report.archive_removed);
}

#[test]
fn filter_skips_unmatched_entries() {
    let dir = scratch();
    let archive = dir.path().join("update.zip");
    let target = dir.path().join("update");
    build_zip(
        &archive,
        &[
            ("beauty/", None),
            ("beauty/filter_warm/lut.png", Some("lut")),
            ("beauty/sticker_cat/cat.png", Some("cat")),
            ("beauty/makeup/base.png", Some("base")),
        ],
    );

    let options =
        ExtractOptions::default().filter(EntryFilter::component_prefixes(1, ["filter_", "sticker_"]));
    let report = unzip_file(&archive, &target, &options).unwrap();

    assert_eq!(report.entry_count, 2);
    assert_eq!(report.skipped_count, 2);
    assert!(target.join("beauty/filter_warm/lut.png").exists());
    assert!(target.join("beauty/sticker_cat/cat.png").exists());
    assert!(!target.join("beauty/makeup").exists());
}

#[test]
fn progress_is_monotonic_and_completes() {
    let dir = scratch();
    let archive = dir.path().join("progress.zip");
    build_zip(
        &archive,
        &[("1.txt", Some("1")), ("2.txt", Some("2")), ("3.txt", Some("3")), ("4.txt", Some("4"))],
    );

    let seen: Arc<Mutex<Vec<Progress>>> = Arc::default();
    let sink = Arc::clone(&seen);
    let callback: ProgressCallback = Arc::new(move |p: &Progress| sink.lock().unwrap().push(p.clone()));
    let options = ExtractOptions::default().on_progress(callback);
    unzip_file(&archive, dir.path().join("progress"), &options).unwrap();

    let seen = seen.lock().unwrap();
    let percentages: Vec<_> = seen.iter().filter_map(Progress::percentage).collect();
    assert_eq!(percentages, vec![25, 50, 75, 100]);
    assert!(seen.iter().all(|p| p.stage == Stage::Extract && p.total == Some(4)));
}

#[cfg(unix)]
#[test]
fn retained_symlink_cannot_redirect_entries() {
    let dir = scratch();
    let target = dir.path().join("pack");
    let outside = dir.path().join("outside");
    fs::create_dir_all(target.join("kept")).unwrap();
    fs::create_dir_all(&outside).unwrap();
    std::os::unix::fs::symlink("../../outside", target.join("kept/link")).unwrap();

    let archive = dir.path().join("pack.zip");
    build_zip(&archive, &[("kept/link/pwn.txt", Some("pwned"))]);
    let options = ExtractOptions::default().clear_mode(ClearMode::FilesOnly);
    let err = unzip_file(&archive, &target, &options).unwrap_err();

    assert!(matches!(err, Error::ZipSlip { .. }), "{err}");
    assert!(!outside.join("pwn.txt").exists());
    assert!(archive.exists());
}

#[cfg(unix)]
#[test]
fn symlink_within_target_is_followed() {
    let dir = scratch();
    let target = dir.path().join("pack");
    fs::create_dir_all(target.join("real")).unwrap();
    std::os::unix::fs::symlink("real", target.join("alias")).unwrap();

    let archive = dir.path().join("pack.zip");
    build_zip(&archive, &[("alias/a.txt", Some("a"))]);
    let options = ExtractOptions::default().clear_mode(ClearMode::None);
    unzip_file(&archive, &target, &options).unwrap();

    assert_eq!(fs::read_to_string(target.join("real/a.txt")).unwrap(), "a");
}
