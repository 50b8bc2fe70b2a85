use crate::{TempDir, command::assert_cmd_snapshot};

/// Test that completing a recurring task schedules its next instance, but
/// only the first time.
#[test]
fn recurring() {
    let tmp = TempDir::new();
    tmp.run(["task", "add", "team sync", "-r", "every monday"]);
    assert_cmd_snapshot!(
        tmp.cadence(["task", "complete", "1"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    completed task 1
    created task 2 for Mon, Jul 29, 2024 (Every Monday)

    ----- stderr -----
    ",
    );
    assert_cmd_snapshot!(
        tmp.cadence(["task", "complete", "1"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    task 1 is already completed

    ----- stderr -----
    ",
    );
    assert_cmd_snapshot!(
        tmp.cadence(["task", "incomplete", "1"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    marked task 1 as incomplete

    ----- stderr -----
    ",
    );
    assert_cmd_snapshot!(
        tmp.cadence(["task", "list", "--all"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Mon, Jul 22, 2024
      [ ] 1. team sync (Every Monday)

    Mon, Jul 29, 2024
      [ ] 2. team sync (Every Monday)

    ----- stderr -----
    ",
    );
}

/// Test that the next instance of a monthly task is clamped to the end of
/// short months.
#[test]
fn clamped() {
    let tmp = TempDir::new();
    tmp.run(["task", "add", "pay rent", "-r", "31st", "-d", "2024-08-01"]);
    assert_cmd_snapshot!(
        tmp.cadence(["task", "complete", "1"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    completed task 1
    created task 2 for Mon, Sep 30, 2024 (Day 31 of each month)

    ----- stderr -----
    ",
    );
}

/// Test that one-off tasks are simply completed.
#[test]
fn one_off() {
    let tmp = TempDir::new();
    tmp.run(["task", "add", "water the plants"]);
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
        tmp.cadence(["task", "list"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Sat, Jul 20, 2024
      [x] 1. water the plants

    ----- stderr -----
    ",
    );
}

/// Test the errors reported for bad task identifiers.
#[test]
fn bad_ids() {
    let tmp = TempDir::new();
    tmp.run(["task", "add", "water the plants"]);
    assert_cmd_snapshot!(
        tmp.cadence(["task", "complete"]),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    missing required task id
    ",
    );
    assert_cmd_snapshot!(
        tmp.cadence(["task", "complete", "9"]),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    task 9 not found
    ",
    );
    assert_cmd_snapshot!(
        tmp.cadence(["task", "complete", "0"]),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    invalid task id `0`, ids start at 1
    ",
    );
    assert_cmd_snapshot!(
        tmp.cadence(["task", "incomplete", "one"]),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    invalid task id `one`, expected a positive integer: invalid digit found in string
    ",
    );
}
