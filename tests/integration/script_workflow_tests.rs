/*!
 * Integration tests for the screenplay file workflow
 */

use anyhow::Result;

use scriptpage::app_config::Config;
use scriptpage::app_controller::{Controller, ScriptOperation};
use scriptpage::file_utils::FileManager;
use crate::common;

/// Test numbering, then renumbering, a script file in place
#[test]
fn test_script_workflow_withNumbering_shouldRewriteFile() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_script(temp_dir.path(), "draft.fountain")?;
    let controller = Controller::new_for_test()?;

    controller.run(&ScriptOperation::AddSceneNumbers, &path, None)?;
    let numbered = FileManager::read_to_string(&path)?;
    assert!(numbered.contains("EXT. GARDEN - DAY #10A#\n"));
    assert!(numbered.contains("INT. HOUSE - DAY #10#\n"));

    // Numbering again changes nothing
    controller.run(&ScriptOperation::AddSceneNumbers, &path, None)?;
    assert_eq!(FileManager::read_to_string(&path)?, numbered);

    controller.run(&ScriptOperation::Renumber, &path, None)?;
    let renumbered = FileManager::read_to_string(&path)?;
    assert!(renumbered.contains("INT. HOUSE - DAY #1#\n"));
    assert!(renumbered.contains("EXT. GARDEN - DAY #2#\n"));
    assert!(renumbered.contains("INT. HOUSE - NIGHT #3#\n"));

    controller.run(&ScriptOperation::RemoveSceneNumbers, &path, None)?;
    assert!(!FileManager::read_to_string(&path)?.contains('#'));

    Ok(())
}

/// Test that an output path leaves the input untouched
#[test]
fn test_script_workflow_withOutputPath_shouldKeepInput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_script(temp_dir.path(), "draft.fountain")?;
    let output = FileManager::generate_output_path(&path, temp_dir.path().join("out"), "expanded", "fountain");
    let controller = Controller::new_for_test()?;

    let operation = ScriptOperation::ExpandTemplates {
        title: Some("Big Fish".to_string()),
    };
    let written = controller.run(&operation, &path, Some(output.as_path()))?;

    assert_eq!(written, output);
    assert_eq!(FileManager::read_to_string(&path)?, common::SAMPLE_SCRIPT);
    let expanded = FileManager::read_to_string(&output)?;
    assert!(expanded.starts_with("Title: Big Fish\nAuthor: Anonymous\n"));

    Ok(())
}

/// Test that an output directory receives a suffixed copy
#[test]
fn test_script_workflow_withOutputDirectory_shouldNameBySuffix() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_script(temp_dir.path(), "draft.fountain")?;
    let out_dir = temp_dir.path().join("out");
    FileManager::ensure_dir(&out_dir)?;
    let controller = Controller::new_for_test()?;

    let written = controller.run(&ScriptOperation::AddSceneNumbers, &path, Some(out_dir.as_path()))?;

    assert_eq!(written, out_dir.join("draft.numbered.fountain"));
    assert!(FileManager::read_to_string(&written)?.contains("EXT. GARDEN - DAY #10A#"));
    assert_eq!(FileManager::read_to_string(&path)?, common::SAMPLE_SCRIPT);

    Ok(())
}

/// Test that a failing operation leaves the file untouched
#[test]
fn test_script_workflow_withOutOfOrderNumbers_shouldNotWrite() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = "INT. A - DAY #7#\n\nINT. B - DAY\n\nINT. C - DAY #3#\n";
    let path = common::create_test_file(temp_dir.path(), "broken.fountain", content)?;
    let controller = Controller::new_for_test()?;

    let result = controller.run(&ScriptOperation::AddSceneNumbers, &path, None);
    assert!(result.is_err());
    assert_eq!(FileManager::read_to_string(&path)?, content);

    Ok(())
}

/// Test pagination through configuration
#[test]
fn test_script_workflow_withSmallPages_shouldInsertBreaks() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "pages.fountain", "One.\n\nTwo.\n\nThree.\n\n===\n\nFour.\n")?;

    let mut config = Config::default();
    config.pagination.lines_per_page = Some(4);
    config.pagination.number_pages = true;
    let controller = Controller::with_config(config)?;

    controller.run(&ScriptOperation::Paginate, &path, None)?;
    assert_eq!(
        FileManager::read_to_string(&path)?,
        "One.\n\nTwo.\n\n=== 2\n\nThree.\n\n=== 3\n\nFour.\n"
    );

    Ok(())
}
