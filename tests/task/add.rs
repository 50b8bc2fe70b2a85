use crate::{TempDir, command::assert_cmd_snapshot};

/// Test that tasks fall on the current day unless a date is given.
#[test]
fn dates() {
    let tmp = TempDir::new();
    assert_cmd_snapshot!(
        tmp.cadence(["task", "add", "water", "the", "plants"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    added task 1 for Sat, Jul 20, 2024

    ----- stderr -----
    ",
    );
    assert_cmd_snapshot!(
        tmp.cadence(["task", "add", "call the bank", "-d", "tomorrow"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    added task 2 for Sun, Jul 21, 2024

    ----- stderr -----
    ",
    );
    assert_cmd_snapshot!(
        tmp.cadence(["task", "add", "renew passport", "--date=2024-09-03"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    added task 3 for Tue, Sep 3, 2024

    ----- stderr -----
    ",
    );
}

/// Test that recurring tasks start on the first occurrence of their pattern
/// on or after their date.
#[test]
fn recurring() {
    let tmp = TempDir::new();
    assert_cmd_snapshot!(
        tmp.cadence(["task", "add", "team sync", "-r", "every monday"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    added task 1 for Mon, Jul 22, 2024 (Every Monday)

    ----- stderr -----
    ",
    );
    assert_cmd_snapshot!(
        tmp.cadence(["task", "add", "groceries", "-r", "every saturday"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    added task 2 for Sat, Jul 20, 2024 (Every Saturday)

    ----- stderr -----
    ",
    );
    assert_cmd_snapshot!(
        tmp.cadence([
            "task",
            "add",
            "pay rent",
            "-r",
            "31st of each month",
            "-d",
            "2024-08-01",
        ]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    added task 3 for Sat, Aug 31, 2024 (Day 31 of each month)

    ----- stderr -----
    ",
    );
    assert_cmd_snapshot!(
        tmp.cadence(["task", "add", "one off", "-r", "none"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    added task 4 for Sat, Jul 20, 2024

    ----- stderr -----
    ",
    );
}

/// Test that details and tags are stored with the task.
#[test]
fn details_and_tags() {
    let tmp = TempDir::new();
    tmp.run([
        "task",
        "add",
        "standup",
        "-m",
        "  bring notes  ",
        "-t",
        "Work",
        "-t",
        "daily",
        "-t",
        "work",
    ]);
    let stored = tmp.read("tasks.jsonl");
    assert!(stored.contains(r#""details":"bring notes""#), "{stored}");
    assert!(stored.contains(r#""tags":["work","daily"]"#), "{stored}");
}

/// Test the errors reported for invalid tasks.
#[test]
fn invalid() {
    let tmp = TempDir::new();
    assert_cmd_snapshot!(
        tmp.cadence(["task", "add"]),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    missing required task title
    ",
    );
    assert_cmd_snapshot!(
        tmp.cadence(["task", "add", "   "]),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    task title cannot be empty
    ",
    );
    assert_cmd_snapshot!(
        tmp.cadence(["task", "add", "x", "-t", "not a tag"]),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    -t/--tag: invalid tag name `not a tag`, tag names can only contain letters, numbers, underscores and hyphens
    ",
    );
    assert_cmd_snapshot!(
        tmp.cadence(["task", "add", "x", "-r", "every other week"]),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    -r/--recur: invalid recurrence pattern `every other week`, supported patterns include `every monday`, `3rd of each month`, `2nd weekday of the month` and `last weekend of the month`
    ",
    );
    assert!(!tmp.store().exists());
}
