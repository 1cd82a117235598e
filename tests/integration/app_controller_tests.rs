/*!
 * Integration tests for the application controller
 */

use anyhow::Result;

use scriptpage::app_config::Config;
use scriptpage::app_controller::{Controller, ScriptOperation};
use scriptpage::errors::ScriptError;
use scriptpage::file_utils::FileManager;
use scriptpage::screenplay::{ElementKind, Script, ShiftDirection};
use crate::common;

/// Test folder mode over several scripts
#[test]
fn test_run_folder_withSeveralScripts_shouldProcessAll() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let first = common::create_test_script(temp_dir.path(), "one.fountain")?;
    let second = common::create_test_file(temp_dir.path(), "two.spmd", "INT. CAR - NIGHT\n\nDriving.\n")?;
    let notes = common::create_test_file(temp_dir.path(), "notes.txt", "INT. untouched\n")?;
    let controller = Controller::new_for_test()?;

    controller.run_folder(&ScriptOperation::AddSceneNumbers, temp_dir.path())?;

    assert!(FileManager::read_to_string(&first)?.contains("EXT. GARDEN - DAY #10A#"));
    assert_eq!(FileManager::read_to_string(&second)?, "INT. CAR - NIGHT #1#\n\nDriving.\n");
    assert_eq!(FileManager::read_to_string(&notes)?, "INT. untouched\n");

    Ok(())
}

/// Test folder mode failure reporting
#[test]
fn test_run_folder_withBrokenScript_shouldReportFailure() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_script(temp_dir.path(), "good.fountain")?;
    common::create_test_file(temp_dir.path(), "bad.fountain", "INT. A - DAY #x#\n")?;
    let controller = Controller::new_for_test()?;

    let result = controller.run_folder(&ScriptOperation::AddSceneNumbers, temp_dir.path());
    assert!(result.is_err());
    assert!(FileManager::read_to_string(temp_dir.path().join("good.fountain"))?.contains("#10A#"));

    let empty = common::create_temp_dir()?;
    assert!(controller.run_folder(&ScriptOperation::Paginate, empty.path()).is_err());

    Ok(())
}

/// Test classification through the controller
#[test]
fn test_classify_withSampleScript_shouldFindScenes() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let script = Script::new(common::SAMPLE_SCRIPT);

    let scenes = controller
        .classify(&script)
        .iter()
        .filter(|element| element.kind == ElementKind::SceneHeading)
        .count();
    assert_eq!(scenes, 3);

    let json = serde_json::to_string(&controller.classify(&script))?;
    assert!(json.contains("\"scene_heading\""));

    Ok(())
}

/// Test page lookup and manual breaks with 1-based lines
#[test]
fn test_page_commands_withOneBasedLines_shouldUseLineNumbers() -> Result<()> {
    let mut config = Config::default();
    config.pagination.lines_per_page = Some(4);
    let controller = Controller::with_config(config)?;
    let script = Script::new("One.\n\nTwo.\n\nThree.\n\nFour.\n");

    assert_eq!(controller.locate_page(&script, 1), (1, 2));
    assert_eq!(controller.locate_page(&script, 7), (2, 2));

    let broken = controller.insert_page_break(&script, 3)?;
    assert_eq!(broken.text(), "One.\n\n===\n\nTwo.\n\nThree.\n\nFour.\n");

    let error = controller.insert_page_break(&script, 2).unwrap_err();
    assert_eq!(
        error.downcast_ref::<ScriptError>(),
        Some(&ScriptError::NotMoveable { line: 2 })
    );

    Ok(())
}

/// Test outline moves through the controller
#[test]
fn test_outline_commands_withOneBasedLines_shouldMoveBlocks() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let script = Script::new("INT. A - DAY\n\nFirst.\n\nINT. B - DAY\n\nSecond.\n");

    let shifted = controller.shift(&script, 1, ShiftDirection::Down)?;
    assert_eq!(shifted.text(), "INT. B - DAY\n\nSecond.\n\nINT. A - DAY\n\nFirst.\n");

    let sections = Script::new("# One\n\n## Two\n");
    let demoted = controller.change_section_level(&sections, 3, false)?;
    assert_eq!(demoted.text(), "# One\n\n### Two\n");

    Ok(())
}

/// Test that export needs a file behind the script
#[tokio::test]
async fn test_export_withoutSource_shouldFail() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let error = controller.export(None).await.unwrap_err();
    assert_eq!(
        error.downcast_ref::<ScriptError>(),
        Some(&ScriptError::NoBackingDestination)
    );
    Ok(())
}

/// Test running a configured export program
#[cfg(unix)]
#[tokio::test]
async fn test_export_withShellProgram_shouldProduceOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_script(temp_dir.path(), "draft.fountain")?;

    let mut config = Config::default();
    config.export.program = "sh".to_string();
    config.export.args = vec!["-c".to_string(), "cp \"$0\" \"$1\"".to_string(), "{source}".to_string(), "{output}".to_string()];
    config.export.extension = "txt".to_string();
    let controller = Controller::with_config(config)?;

    let output = controller.export(Some(&path)).await?;
    assert_eq!(output, temp_dir.path().join("draft.txt"));
    assert_eq!(FileManager::read_to_string(&output)?, common::SAMPLE_SCRIPT);

    Ok(())
}

/// Test that a stuck export program times out
#[cfg(unix)]
#[tokio::test]
async fn test_export_withSlowProgram_shouldTimeOut() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_script(temp_dir.path(), "draft.fountain")?;

    let mut config = Config::default();
    config.export.program = "sleep".to_string();
    config.export.args = vec!["5".to_string()];
    config.export.timeout_secs = 1;
    let controller = Controller::with_config(config)?;

    let error = controller.export(Some(&path)).await.unwrap_err();
    assert!(error.to_string().contains("timed out"));

    Ok(())
}
