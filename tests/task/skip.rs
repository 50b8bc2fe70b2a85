use crate::{TempDir, command::assert_cmd_snapshot};

/// Test that skipped tasks are hidden until they are restored.
#[test]
fn skip_and_unskip() {
    let tmp = TempDir::new();
    tmp.run(["task", "add", "water the plants"]);
    assert_cmd_snapshot!(
        tmp.cadence(["task", "skip", "1"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    skipped task 1

    ----- stderr -----
    ",
    );
    assert_cmd_snapshot!(
        tmp.cadence(["task", "list"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    No tasks for today.

    ----- stderr -----
    ",
    );
    assert_cmd_snapshot!(
        tmp.cadence(["task", "skip", "1"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    task 1 is already skipped

    ----- stderr -----
    ",
    );
    assert_cmd_snapshot!(
        tmp.cadence(["task", "unskip", "1"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    unskipped task 1

    ----- stderr -----
    ",
    );
    assert_cmd_snapshot!(
        tmp.cadence(["task", "list"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Sat, Jul 20, 2024
      [ ] 1. water the plants

    ----- stderr -----
    ",
    );
}

/// Test that skipping a recurring task schedules its next instance, and that
/// completing it afterwards neither schedules another one nor shows it again.
#[test]
fn recurring() {
    let tmp = TempDir::new();
    tmp.run(["task", "add", "board games", "-r", "last weekend of the month"]);
    assert_cmd_snapshot!(
        tmp.cadence(["task", "skip", "1"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    skipped task 1
    created task 2 for Sat, Aug 31, 2024 (Last weekend of each month)

    ----- stderr -----
    ",
    );
    assert_cmd_snapshot!(
        tmp.cadence(["task", "complete", "1"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    completed task 1

    ----- stderr -----
    ",
    );
    assert_cmd_snapshot!(
        tmp.cadence(["task", "list", "--all"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Sat, Aug 31, 2024
      [ ] 2. board games (Last weekend of each month)

    ----- stderr -----
    ",
    );
}

/// Test that reopening a skipped recurring task and then completing it
/// doesn't schedule its next instance a second time.
#[test]
fn unskip_then_complete() {
    let tmp = TempDir::new();
    tmp.run(["task", "add", "team sync", "-r", "every monday"]);
    assert_cmd_snapshot!(
        tmp.cadence(["task", "skip", "1"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    skipped task 1
    created task 2 for Mon, Jul 29, 2024 (Every Monday)

    ----- stderr -----
    ",
    );
    tmp.run(["task", "unskip", "1"]);
    assert_cmd_snapshot!(
        tmp.cadence(["task", "complete", "1"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    completed task 1

    ----- stderr -----
    ",
    );
    assert_cmd_snapshot!(
        tmp.cadence(["task", "list", "--all"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Mon, Jul 29, 2024
      [ ] 2. team sync (Every Monday)

    ----- stderr -----
    ",
    );
}
