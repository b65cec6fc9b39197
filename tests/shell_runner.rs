use std::collections::BTreeMap;
use std::error::Error;
use std::fs;

use surveil::config::{ConfigFile, TaskConfig};
use surveil::exec::{ShellRunner, TaskRunner};

type TestResult = Result<(), Box<dyn Error>>;

fn runner_with(tasks: &[(&str, String)]) -> ShellRunner {
    let task = tasks
        .iter()
        .map(|(name, cmd)| (name.to_string(), TaskConfig { cmd: cmd.clone() }))
        .collect::<BTreeMap<_, _>>();
    ShellRunner::from_config(&ConfigFile {
        task,
        ..Default::default()
    })
}

#[tokio::test]
async fn batch_runs_sequentially_in_order() -> TestResult {
    let dir = tempfile::tempdir()?;
    let log = dir.path().join("log");

    let mut runner = runner_with(&[
        ("a", format!("echo a >> {}", log.display())),
        ("b", format!("echo b >> {}", log.display())),
    ]);

    runner.submit(vec!["a".to_string(), "b".to_string()]).await?;

    assert_eq!(fs::read_to_string(&log)?, "a\nb\n");
    Ok(())
}

#[tokio::test]
async fn failure_without_force_aborts_rest_of_batch_and_later_batches() -> TestResult {
    let dir = tempfile::tempdir()?;
    let after = dir.path().join("after");
    let later = dir.path().join("later");

    let mut runner = runner_with(&[
        ("fail", "exit 1".to_string()),
        ("after", format!("touch {}", after.display())),
        ("later", format!("touch {}", later.display())),
    ]);

    runner
        .submit(vec!["fail".to_string(), "after".to_string()])
        .await?;
    assert!(!after.exists());

    // The halted latch suppresses whole subsequent batches too.
    runner.submit(vec!["later".to_string()]).await?;
    assert!(!later.exists());
    Ok(())
}

#[tokio::test]
async fn force_keeps_running_past_failures() -> TestResult {
    let dir = tempfile::tempdir()?;
    let after = dir.path().join("after");

    let mut runner = runner_with(&[
        ("fail", "exit 1".to_string()),
        ("after", format!("touch {}", after.display())),
    ]);
    runner.set_force(true);

    runner
        .submit(vec!["fail".to_string(), "after".to_string()])
        .await?;

    assert!(after.exists());
    Ok(())
}

#[tokio::test]
async fn unconfigured_task_name_is_an_error() {
    let mut runner = runner_with(&[("a", "true".to_string())]);

    let err = runner.submit(vec!["ghost".to_string()]).await.unwrap_err();
    assert!(err.to_string().contains("no [task.ghost]"));
}
