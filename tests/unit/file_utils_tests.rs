/*!
 * Tests for file utility functions
 */

use anyhow::Result;

use dualsrt::file_utils::FileManager;
use crate::common;

#[test]
fn test_findFiles_shouldMatchExtensionRecursivelyAndSort() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("part2");
    FileManager::ensure_dir(&nested)?;
    common::create_test_file(temp_dir.path(), "b.txt", "b")?;
    common::create_test_file(temp_dir.path(), "a.TXT", "a")?;
    common::create_test_file(temp_dir.path(), "notes.md", "skip")?;
    common::create_test_file(&nested, "c.txt", "c")?;

    let files = FileManager::find_files(temp_dir.path(), ".txt")?;

    let names: Vec<String> = files
        .iter()
        .map(|p| p.strip_prefix(temp_dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();
    assert_eq!(names, vec!["a.TXT", "b.txt", "part2/c.txt"]);
    Ok(())
}

#[test]
fn test_readSegmentLines_shouldSkipBlankLinesAndTrim() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "lines.txt", "  first  \n\n\t\nsecond\r\n")?;

    assert_eq!(FileManager::read_segment_lines(&path)?, vec!["first", "second"]);
    Ok(())
}

#[test]
fn test_writeToFile_shouldCreateParentDirectories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("a").join("b").join("out.srt");

    FileManager::write_to_file(&path, "content")?;

    assert!(FileManager::file_exists(&path));
    assert_eq!(FileManager::read_to_string(&path)?, "content");
    Ok(())
}

#[test]
fn test_readToString_withMissingFile_shouldFail() {
    assert!(FileManager::read_to_string("/definitely/not/here.txt").is_err());
}
