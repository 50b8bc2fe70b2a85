use std::{
    fmt::{Debug, Display, Write},
    str::FromStr,
    sync::LazyLock,
};

use {
    anyhow::Context,
    lexopt::{Arg, Parser, ValueExt},
    regex::Regex,
};

pub mod flags;
pub mod positional;

/// A piece of a command's configuration that knows how to consume some of
/// its arguments.
pub trait Configurable: Debug {
    /// Consume `arg` (and possibly its value from `p`) if it's recognized,
    /// and return whether it was.
    fn configure(
        &mut self,
        p: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool>;

    /// A list of `Usage` documentation for the flags/arguments that this
    /// implementation parses.
    ///
    /// This is optional because some implementations of this trait are
    /// pretty generic, and so callers should provide more concrete docs.
    fn usage(&self) -> &[Usage] {
        &[]
    }
}

/// Feeds every remaining argument in `p` to the first target that accepts
/// it.
///
/// `-h` and `--help` are handled here by rendering `usage` as an error that
/// `main` prints to stdout. The short flavor drops everything between
/// `%snip-start%` and `%snip-end%` markers.
pub fn configure(
    p: &mut Parser,
    usage: &str,
    targets: &mut [&mut dyn Configurable],
) -> anyhow::Result<()> {
    static REMOVE_SNIPS: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?m)^\s*%snip-start%\p{any}*?%snip-end%\s*$").unwrap()
    });
    static REMOVE_SNIP_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?m)^\s*%snip-(start|end)%\s*$").unwrap()
    });

    while let Some(arg) = p.next()? {
        if let Arg::Short('h') | Arg::Long("help") = arg {
            let args = collect_usage_for_args(targets);
            let flags = collect_usage_for_flags(targets);
            let (usage, args, flags) = if arg == Arg::Short('h') {
                let usage = REMOVE_SNIPS.replace_all(usage, "").into_owned();
                (usage, Usage::short(&args), Usage::short(&flags))
            } else {
                let usage =
                    REMOVE_SNIP_MARKERS.replace_all(usage, "").into_owned();
                (usage, Usage::long(&args), Usage::long(&flags))
            };
            let usage =
                usage.replace("%args%", &args).replace("%flags%", &flags);
            return Err(anyhow::Error::from(Help(usage.trim().to_string())));
        }
        // Disentangle the lifetime of `arg` from `p` so that targets can
        // borrow `p` mutably to read flag values. This costs a clone of each
        // long flag name.
        let long_flag: Option<String> = match arg {
            Arg::Long(name) => Some(name.to_string()),
            _ => None,
        };
        let mut arg = match long_flag {
            Some(ref flag) => Arg::Long(flag),
            None => match arg {
                Arg::Short(c) => Arg::Short(c),
                Arg::Long(_) => unreachable!(),
                Arg::Value(value) => Arg::Value(value),
            },
        };
        let mut recognized = false;
        for t in targets.iter_mut() {
            if t.configure(p, &mut arg)? {
                recognized = true;
                break;
            }
        }
        if !recognized {
            return Err(arg.unexpected().into());
        }
    }
    Ok(())
}

fn collect_usage_for_args(targets: &[&mut dyn Configurable]) -> Vec<Usage> {
    // Arguments are deliberately left unsorted, since positional arguments
    // are documented in the order they're given.
    targets
        .iter()
        .flat_map(|t| t.usage().iter().copied().filter(|u| !u.flag))
        .collect()
}

fn collect_usage_for_flags(targets: &[&mut dyn Configurable]) -> Vec<Usage> {
    let mut usages = vec![Help::USAGE, Version::USAGE];
    for t in targets.iter() {
        usages.extend(t.usage().iter().copied().filter(|u| u.flag));
    }
    usages.sort_by_key(|u| {
        u.format.split_once('/').map(|(_, long)| long).unwrap_or(u.format)
    });
    usages
}

/// Returns the next argument as the name of a sub-command.
///
/// With nothing left to parse, the `usage` of the command group becomes the
/// error. `-h/--help` and `--version` are turned into `Help` and `Version`
/// errors respectively.
pub fn next_as_command(usage: &str, p: &mut Parser) -> anyhow::Result<String> {
    let usage = usage.trim();
    match p.next()? {
        None => anyhow::bail!("{usage}"),
        Some(Arg::Value(cmd)) => Ok(cmd.string()?),
        Some(Arg::Short('h') | Arg::Long("help")) => {
            Err(anyhow::Error::from(Help(usage.to_string())))
        }
        Some(Arg::Long("version")) => Err(anyhow::Error::from(Version)),
        Some(arg) => Err(arg.unexpected().into()),
    }
}

/// Parses the value of the flag `flag_name` into `T`.
///
/// Errors are prefixed with `flag_name`.
pub fn parse<T>(p: &mut Parser, flag_name: &'static str) -> anyhow::Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: Display + Debug + Send + Sync + 'static,
{
    let value = p.value().context(flag_name)?;
    let value = value.into_string().map_err(|value| {
        let err = lexopt::Error::NonUnicodeValue(value);
        anyhow::Error::from(err).context(flag_name)
    })?;
    // `anyhow::Error` isn't a `std::error::Error`, so `Err` is only required
    // to be `Display`.
    value.parse().map_err(|err| anyhow::Error::msg(err).context(flag_name))
}

/// The documentation of a single flag or positional argument.
#[derive(Clone, Copy, Debug)]
pub struct Usage {
    /// True for optional flags, false for required arguments.
    pub flag: bool,
    /// How it's written, e.g., `-c/--count <number>`.
    pub format: &'static str,
    /// A one line description for `-h`.
    pub short: &'static str,
    /// One or more paragraphs for `--help`.
    pub long: &'static str,
}

impl Usage {
    pub const fn flag(
        format: &'static str,
        short: &'static str,
        long: &'static str,
    ) -> Usage {
        Usage { flag: true, format, short, long }
    }

    pub const fn arg(
        format: &'static str,
        short: &'static str,
        long: &'static str,
    ) -> Usage {
        Usage { flag: false, format, short, long }
    }

    /// Renders a table with one line per usage: its format, then its short
    /// description aligned to a common column.
    pub fn short(usages: &[Usage]) -> String {
        let width = usages.iter().map(|u| u.format.len()).max().unwrap_or(0);
        let mut out = String::new();
        for u in usages.iter() {
            // OK because writing to a `String` never fails.
            writeln!(out, "    {:width$}  {}", u.format, u.short).unwrap();
        }
        out
    }

    /// Renders every usage as its format followed by its long description,
    /// wrapped and indented beneath it.
    pub fn long(usages: &[Usage]) -> String {
        let opts = textwrap::Options::new(79)
            .initial_indent("        ")
            .subsequent_indent("        ");
        let entries: Vec<String> = usages
            .iter()
            .map(|u| {
                let paragraphs: Vec<String> = u
                    .long
                    .trim()
                    .split("\n\n")
                    .map(|para| {
                        let para = para.replace('\n', " ");
                        let lines = textwrap::wrap(&para, &opts);
                        format!("{}\n", lines.join("\n"))
                    })
                    .collect();
                format!("    {}\n{}", u.format, paragraphs.join("\n"))
            })
            .collect();
        entries.join("\n")
    }
}

/// The rendered `-h/--help` output of a command.
///
/// This travels up to `main` as an error, which prints it to stdout and
/// exits successfully.
#[derive(Debug)]
pub struct Help(String);

impl Help {
    const USAGE: Usage = Usage::flag(
        "-h/--help",
        "This flag prints the help output for Cadence.",
        r#"
This flag prints the help output for Cadence.

The short flag, -h, shows a condensed help output with a single line for every
flag. The long flag, --help, shows complete documentation.
"#,
    );
}

impl std::fmt::Display for Help {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for Help {}

/// A request for the version of Cadence, handled by `main` like `Help`.
#[derive(Debug)]
pub struct Version;

impl Version {
    const USAGE: Usage = Usage::flag(
        "--version",
        "This flag prints the version of Cadence.",
        r#"
This flag prints the version of Cadence.
"#,
    );
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Cadence {}", env!("CARGO_PKG_VERSION"))
    }
}

impl std::error::Error for Version {}
