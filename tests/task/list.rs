use crate::{TempDir, command::assert_cmd_snapshot};

/// Creates a store with tasks on a few different days.
fn populated() -> TempDir {
    let tmp = TempDir::new();
    tmp.run(["task", "add", "water the plants"]);
    tmp.run([
        "task",
        "add",
        "call the bank",
        "-d",
        "tomorrow",
        "-m",
        "ask about the fee\n\nand the card",
    ]);
    tmp.run([
        "task",
        "add",
        "team sync",
        "-r",
        "every monday",
        "-t",
        "work",
        "-t",
        "meetings",
    ]);
    tmp.run(["task", "add", "old thing", "-d", "yesterday"]);
    tmp.run(["task", "add", "standup", "-t", "work"]);
    tmp.run(["task", "complete", "5"]);
    tmp
}

/// Test that only today's tasks are listed by default.
#[test]
fn today() {
    let tmp = populated();
    assert_cmd_snapshot!(
        tmp.cadence(["task", "list"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Sat, Jul 20, 2024
      [ ] 1. water the plants
      [x] 5. standup #work

    ----- stderr -----
    ",
    );
}

/// Test that tasks before and after today can be listed.
#[test]
fn past_and_future() {
    let tmp = populated();
    assert_cmd_snapshot!(
        tmp.cadence(["task", "list", "--past"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Fri, Jul 19, 2024
      [ ] 4. old thing

    ----- stderr -----
    ",
    );
    assert_cmd_snapshot!(
        tmp.cadence(["task", "list", "--future"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Sun, Jul 21, 2024
      [ ] 2. call the bank
          ask about the fee

          and the card

    Mon, Jul 22, 2024
      [ ] 3. team sync (Every Monday) #work #meetings

    ----- stderr -----
    ",
    );
}

/// Test that tag filters require every tag and ignore case.
#[test]
fn tags() {
    let tmp = populated();
    assert_cmd_snapshot!(
        tmp.cadence(["task", "list", "--all", "-t", "work"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Sat, Jul 20, 2024
      [x] 5. standup #work

    Mon, Jul 22, 2024
      [ ] 3. team sync (Every Monday) #work #meetings

    ----- stderr -----
    ",
    );
    assert_cmd_snapshot!(
        tmp.cadence(["task", "list", "--all", "-t", "WORK", "-t", "meetings"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Mon, Jul 22, 2024
      [ ] 3. team sync (Every Monday) #work #meetings

    ----- stderr -----
    ",
    );
    assert_cmd_snapshot!(
        tmp.cadence(["task", "list", "-t", "meetings"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    No tasks for today.

    ----- stderr -----
    ",
    );
}

/// Test the message printed when nothing matches.
#[test]
fn empty() {
    let tmp = TempDir::new();
    let mut got = String::new();
    for when in ["--past", "--future", "--all"] {
        let snap = tmp.cadence(["task", "list", when]).snapshot();
        got.push_str(&snap.stdout().to_string());
    }
    insta::assert_snapshot!(got, @r"
    No past tasks.
    No future tasks.
    No tasks.
    ");
}

/// Test that only one date selection may be given.
#[test]
fn conflicting_dates() {
    let tmp = TempDir::new();
    assert_cmd_snapshot!(
        tmp.cadence(["task", "list", "--past", "--future"]),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    only one of --past, --future or --all may be given
    ",
    );
}
