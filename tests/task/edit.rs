use crate::{TempDir, command::assert_cmd_snapshot};

/// Test that titles, details and tags can be changed.
#[test]
fn edit() {
    let tmp = TempDir::new();
    tmp.run(["task", "add", "wtaer plants", "-t", "home", "-m", "ferns"]);
    assert_cmd_snapshot!(
        tmp.cadence([
            "task",
            "edit",
            "1",
            "--title",
            "water the plants",
            "-t",
            "weekly",
        ]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    updated task 1

    ----- stderr -----
    ",
    );
    tmp.run(["task", "edit", "1", "-m", ""]);
    assert_cmd_snapshot!(
        tmp.cadence(["task", "list"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Sat, Jul 20, 2024
      [ ] 1. water the plants #home #weekly

    ----- stderr -----
    ",
    );

    tmp.run(["task", "edit", "1", "--clear-tags", "-t", "garden"]);
    assert_cmd_snapshot!(
        tmp.cadence(["task", "list"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Sat, Jul 20, 2024
      [ ] 1. water the plants #garden

    ----- stderr -----
    ",
    );
}

/// Test that an edit must change something and keep the task valid.
#[test]
fn invalid() {
    let tmp = TempDir::new();
    tmp.run(["task", "add", "water the plants"]);
    assert_cmd_snapshot!(
        tmp.cadence(["task", "edit", "1"]),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    nothing to change, use --title, -m/--details, -t/--tag or --clear-tags
    ",
    );
    assert_cmd_snapshot!(
        tmp.cadence(["task", "edit", "1", "--title", " "]),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    task title cannot be empty
    ",
    );
    assert_cmd_snapshot!(
        tmp.cadence(["task", "edit", "2", "--title", "x"]),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    task 2 not found
    ",
    );
}
