//! Style constants and clap help styling configuration.

use anstyle::{AnsiColor, Effects, Style};

/// Green, for created files.
pub(crate) const SUCCESS: Style =
    Style::new().fg_color(Some(anstyle::Color::Ansi(AnsiColor::Green)));

/// Red, for failures.
pub(crate) const ERROR: Style = Style::new().fg_color(Some(anstyle::Color::Ansi(AnsiColor::Red)));

pub(crate) const WARNING: Style =
    Style::new().fg_color(Some(anstyle::Color::Ansi(AnsiColor::Yellow)));

pub(crate) const HINT: Style = Style::new().effects(Effects::DIMMED);

/// Help output styles matching the palette above.
pub(crate) fn clap_styles() -> clap::builder::Styles {
    let heading = Style::new()
        .fg_color(Some(anstyle::Color::Ansi(AnsiColor::Green)))
        .effects(Effects::BOLD);
    let literal = Style::new().fg_color(Some(anstyle::Color::Ansi(AnsiColor::Cyan)));

    clap::builder::Styles::styled()
        .header(heading)
        .usage(heading)
        .literal(literal)
        .placeholder(literal)
        .error(ERROR.effects(Effects::BOLD))
        .valid(SUCCESS)
        .invalid(WARNING)
}
