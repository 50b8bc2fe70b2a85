use crate::command::assert_cmd_snapshot;

fn next() -> crate::command::Command {
    crate::cadence(["pattern", "next"])
}

/// Test the next occurrence of each kind of pattern from the same reference
/// point.
#[test]
fn each_kind() {
    let kinds = [
        "every monday",
        "every saturday",
        "20th of each month",
        "31st of each month",
        "2nd weekday of the month",
        "last weekend of the month",
    ];
    let mut got = String::new();
    for kind in kinds {
        let snap = next().args([kind, "today"]).snapshot();
        got.push_str(&format!("{kind}: {}", snap.stdout()));
    }
    insta::assert_snapshot!(got, @r"
    every monday: 2024-07-22T00:00:00-04:00[America/New_York]
    every saturday: 2024-07-27T00:00:00-04:00[America/New_York]
    20th of each month: 2024-08-20T00:00:00-04:00[America/New_York]
    31st of each month: 2024-07-31T00:00:00-04:00[America/New_York]
    2nd weekday of the month: 2024-08-02T00:00:00-04:00[America/New_York]
    last weekend of the month: 2024-07-28T00:00:00-04:00[America/New_York]
    ");
}

/// Test that the next occurrence is strictly after the reference date,
/// regardless of the time of day.
#[test]
fn strictly_after() {
    assert_cmd_snapshot!(
        next().args(["every saturday", "now", "2024-07-20T23:59"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    2024-07-27T00:00:00-04:00[America/New_York]
    2024-07-27T00:00:00-04:00[America/New_York]

    ----- stderr -----
    ",
    );
}

/// Test that `-c/--count` prints successive occurrences, including days that
/// get clamped to the end of short months.
#[test]
fn count() {
    assert_cmd_snapshot!(
        next().args(["-c", "4", "31st of each month", "2024-01-15"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    2024-01-31T00:00:00-05:00[America/New_York]
    2024-02-29T00:00:00-05:00[America/New_York]
    2024-03-31T00:00:00-04:00[America/New_York]
    2024-04-30T00:00:00-04:00[America/New_York]

    ----- stderr -----
    ",
    );

    assert_cmd_snapshot!(
        next().args(["--count=3", "2nd weekday of the month", "2025-11-01"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    2025-11-04T00:00:00-05:00[America/New_York]
    2025-12-02T00:00:00-05:00[America/New_York]
    2026-01-02T00:00:00-05:00[America/New_York]

    ----- stderr -----
    ",
    );

    assert_cmd_snapshot!(
        next().args(["-c0", "every monday", "today"]),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    -c/--count: the number of occurrences must be at least 1
    ",
    );
}

/// Test that reference datetimes on stdin must be unambiguous, and that the
/// time zone of each reference datetime is preserved.
#[test]
fn stdin() {
    let stdin = "\
2024-07-20T16:30:55-04:00[America/New_York]
2024-07-28T09:00:00+10:00[Australia/Sydney]
";
    assert_cmd_snapshot!(
        next().arg("last weekend of the month").stdin(stdin),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    2024-07-28T00:00:00-04:00[America/New_York]
    2024-08-31T00:00:00+10:00[Australia/Sydney]

    ----- stderr -----
    ",
    );

    assert_cmd_snapshot!(
        next().arg("every monday").stdin("tomorrow\n"),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    line 1 of <stdin>: invalid datetime: unrecognized datetime `tomorrow`
    ",
    );
}

/// Test that whitespace around reference datetimes on stdin is ignored, along
/// with blank lines.
#[test]
fn stdin_whitespace() {
    let stdin = concat!(
        "  2024-07-20T16:30:55-04:00[America/New_York]\t\r\n",
        "\t\n",
        "   2024-07-23T08:00:00-04:00[America/New_York]\n",
    );
    assert_cmd_snapshot!(
        next().arg("every monday").stdin(stdin),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    2024-07-22T00:00:00-04:00[America/New_York]
    2024-07-29T00:00:00-04:00[America/New_York]

    ----- stderr -----
    ",
    );
}

/// Test that patterns which never recur are rejected.
#[test]
fn not_recurring() {
    assert_cmd_snapshot!(
        next().args(["none", "today"]),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    pattern `none` does not recur, so it has no next occurrence
    ",
    );

    assert_cmd_snapshot!(
        next(),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    missing required recurrence pattern
    ",
    );
}
