use crate::command::assert_cmd_snapshot;

fn parse() -> crate::command::Command {
    crate::cadence(["pattern", "parse"])
}

/// Test that patterns can be given positionally or on stdin.
#[test]
fn positional_or_stdin() {
    assert_cmd_snapshot!(
        parse().args([
            "every monday",
            "3rd of each month",
            "2nd weekday of the month",
            "last weekend of the month",
            "none",
        ]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Every Monday
    Day 3 of each month
    2nd weekday of each month
    Last weekend of each month
    none

    ----- stderr -----
    ",
    );

    assert_cmd_snapshot!(
        parse().stdin("EVERY FRIDAY\n\n  31 of the month  \r\n"),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Every Friday
    Day 31 of each month

    ----- stderr -----
    ",
    );
}

/// Test that the canonical form of a pattern parses back into itself.
#[test]
fn canonical_forms_round_trip() {
    assert_cmd_snapshot!(
        parse()
            .args([
                "Every sunday",
                "on day 15",
                "fifth weekday of every month",
                "Last Weekend Of Month",
                "",
            ])
            .pipe(parse()),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Every Sunday
    Day 15 of each month
    5th weekday of each month
    Last weekend of each month
    none

    ----- stderr -----
    ",
    );
}

/// Test that `--recurring` reports whether a pattern recurs.
#[test]
fn recurring() {
    assert_cmd_snapshot!(
        parse().arg("--recurring").stdin("every monday\nnone\n1\n"),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    true
    false
    true

    ----- stderr -----
    ",
    );
}

/// Test that invalid patterns come with examples of valid ones.
#[test]
fn invalid() {
    assert_cmd_snapshot!(
        parse().arg("every other day"),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    invalid recurrence pattern `every other day`, supported patterns include `every monday`, `3rd of each month`, `2nd weekday of the month` and `last weekend of the month`
    ",
    );

    assert_cmd_snapshot!(
        parse().arg("0th of each month"),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    invalid day `0` for monthly recurrence, day must be in the range 1-31
    ",
    );

    assert_cmd_snapshot!(
        parse().stdin("every monday\nevery blue moon\nevery friday\n"),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----
    Every Monday

    ----- stderr -----
    line 2 of <stdin>: invalid recurrence pattern `every blue moon`, supported patterns include `every monday`, `3rd of each month`, `2nd weekday of the month` and `last weekend of the month`
    ",
    );
}

/// Test the short help output.
#[test]
fn short_help() {
    assert_cmd_snapshot!(
        parse().arg("-h"),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Parse recurrence patterns.

    This accepts one or more patterns as positional arguments. When no positional
    arguments are given, then line delimited patterns are read from stdin.

    Each pattern is printed in its canonical form, one per line. The canonical
    form of a pattern always parses back into the same pattern.

    USAGE:
        cadence pattern parse <pattern>...
        cadence pattern parse < line delimited <pattern>

    TIP:
        use -h for short docs and --help for long docs

    EXAMPLES:
        Check what a pattern means:

            $ cadence pattern parse '31st of each month'
            Day 31 of each month

    REQUIRED ARGUMENTS:
        <pattern>  A recurrence pattern, e.g., `every monday`.

    OPTIONS:
        -h/--help        This flag prints the help output for Cadence.
        --recurring      Print whether each pattern recurs instead of its canonical form.
        -s/--show-input  Print each pattern as given before its parsed form.
        --version        This flag prints the version of Cadence.

    ----- stderr -----
    ",
    );
}
