use std::{
    fmt::Display,
    io::IsTerminal,
    sync::{Arc, LazyLock},
};

use anstyle::{AnsiColor, Effects, Style};

/// A theme that indicates how output should be styled.
///
/// Each theme comes with a set of styles for particular output components of
/// Cadence, e.g., task identifiers, dates and tags. The getter methods on a
/// theme provide these styles on a per-component basis.
///
/// The styles returned may be completely unstyled, for example, when stdout
/// isn't a tty or when `NO_COLOR` is set.
#[derive(Clone, Debug)]
pub struct Theme {
    inner: Option<Arc<ThemeInner>>,
}

impl Theme {
    /// Returns a theme for stdout.
    pub fn stdout() -> &'static Theme {
        static THEME: LazyLock<Theme> =
            LazyLock::new(|| Theme::detect(tty_stdout()));
        &*THEME
    }

    /// Returns a theme for stderr.
    pub fn stderr() -> &'static Theme {
        static THEME: LazyLock<Theme> =
            LazyLock::new(|| Theme::detect(tty_stderr()));
        &*THEME
    }

    fn detect(tty: bool) -> Theme {
        if !tty || !can_use_colors() {
            return Theme { inner: None };
        }
        Theme { inner: Some(Arc::new(ThemeInner::default())) }
    }

    /// Style for things that ought to stand out, like task identifiers.
    pub fn highlight<T: Display>(&self, data: T) -> Styled<'_, T> {
        self.styled(data, |inner| &inner.highlight)
    }

    /// Style for calendar dates heading a group of tasks.
    pub fn date<T: Display>(&self, data: T) -> Styled<'_, T> {
        self.styled(data, |inner| &inner.date)
    }

    /// Style for tag names.
    pub fn tag<T: Display>(&self, data: T) -> Styled<'_, T> {
        self.styled(data, |inner| &inner.tag)
    }

    /// Style for things that are done with, e.g., completed tasks.
    pub fn muted<T: Display>(&self, data: T) -> Styled<'_, T> {
        self.styled(data, |inner| &inner.muted)
    }

    /// Style for a log level.
    pub fn level(&self, level: log::Level) -> Styled<'_, log::Level> {
        self.styled(level, |inner| match level {
            log::Level::Error => &inner.error,
            log::Level::Warn => &inner.warn,
            _ => &inner.plain,
        })
    }

    fn styled<T: Display>(
        &self,
        data: T,
        pick: impl FnOnce(&ThemeInner) -> &Style,
    ) -> Styled<'_, T> {
        Styled { data, style: self.inner.as_deref().map(pick) }
    }
}

#[derive(Debug)]
struct ThemeInner {
    highlight: Style,
    date: Style,
    tag: Style,
    muted: Style,
    error: Style,
    warn: Style,
    plain: Style,
}

impl Default for ThemeInner {
    fn default() -> ThemeInner {
        ThemeInner {
            highlight: Style::new()
                .bold()
                .fg_color(Some(AnsiColor::Magenta.into())),
            date: Style::new().bold().fg_color(Some(AnsiColor::Blue.into())),
            tag: Style::new().fg_color(Some(AnsiColor::Cyan.into())),
            muted: Style::new().effects(Effects::DIMMED),
            error: Style::new().bold().fg_color(Some(AnsiColor::Red.into())),
            warn: Style::new().fg_color(Some(AnsiColor::Yellow.into())),
            plain: Style::new(),
        }
    }
}

/// A possibly unstyled piece of renderable data.
///
/// When this is unstyled, its `Display` impl does no styling and just
/// renders the underlying data.
#[derive(Clone, Debug)]
pub struct Styled<'s, T> {
    data: T,
    style: Option<&'s Style>,
}

impl<'s, T: Display> Display for Styled<'s, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let Some(style) = self.style else {
            return self.data.fmt(f);
        };
        write!(f, "{style}")?;
        write!(f, "{}", self.data)?;
        write!(f, "{style:#}")
    }
}

/// Returns true if there's a tty attached to stdout.
fn tty_stdout() -> bool {
    static YES: LazyLock<bool> =
        LazyLock::new(|| std::io::stdout().is_terminal());
    *YES
}

/// Returns true if there's a tty attached to stderr.
fn tty_stderr() -> bool {
    static YES: LazyLock<bool> =
        LazyLock::new(|| std::io::stderr().is_terminal());
    *YES
}

/// Whether colors have been globally disabled or not.
fn can_use_colors() -> bool {
    static YES: LazyLock<bool> = LazyLock::new(|| {
        if std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
            return false;
        }
        if std::env::var_os("TERM").is_some_and(|v| v == "dumb") {
            return false;
        }
        true
    });
    *YES
}
