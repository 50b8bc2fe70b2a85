use crate::{TempDir, command::assert_cmd_snapshot};

/// Test that deleting a task leaves the others alone and never reuses the
/// identifier of the last task that still exists.
#[test]
fn delete() {
    let tmp = TempDir::new();
    tmp.run(["task", "add", "team sync", "-r", "every monday"]);
    tmp.run(["task", "complete", "1"]);
    assert_cmd_snapshot!(
        tmp.cadence(["task", "delete", "1"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    deleted task 1 (team sync)

    ----- stderr -----
    ",
    );
    assert_cmd_snapshot!(
        tmp.cadence(["task", "add", "water the plants"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    added task 3 for Sat, Jul 20, 2024

    ----- stderr -----
    ",
    );
    assert_cmd_snapshot!(
        tmp.cadence(["task", "list", "--all"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Sat, Jul 20, 2024
      [ ] 3. water the plants

    Mon, Jul 29, 2024
      [ ] 2. team sync (Every Monday)

    ----- stderr -----
    ",
    );
    assert_cmd_snapshot!(
        tmp.cadence(["task", "delete", "1"]),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    task 1 not found
    ",
    );
}
