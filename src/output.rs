//! Terminal rendering of prayer lists

use crate::query::{Expr, Token};
use crate::record::{PrayerRecord, partition_by_status};
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Print matches grouped into current and answered lists
pub fn print_prayer_lists(
    records: &[&PrayerRecord],
    searching: bool,
    choice: ColorChoice,
) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(choice);
    render_prayer_lists(&mut stdout, records, searching)
}

/// Render the two status lists. `searching` selects the empty-list wording.
pub fn render_prayer_lists<W: WriteColor>(
    out: &mut W,
    records: &[&PrayerRecord],
    searching: bool,
) -> io::Result<()> {
    let parts = partition_by_status(records.iter().copied());

    let (no_current, no_answered) = if searching {
        (
            "No current prayer requests matching your search.",
            "No answered prayers matching your search.",
        )
    } else {
        ("No current prayer requests.", "No answered prayers yet.")
    };

    print_section(out, "Current requests", &parts.current, no_current)?;
    writeln!(out)?;
    print_section(out, "Answered prayers", &parts.answered, no_answered)?;

    Ok(())
}

fn print_section<W: WriteColor>(
    out: &mut W,
    title: &str,
    records: &[&PrayerRecord],
    empty_message: &str,
) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
    writeln!(out, "{} ({})", title, records.len())?;
    out.reset()?;

    if records.is_empty() {
        out.set_color(ColorSpec::new().set_dimmed(true))?;
        writeln!(out, "  {}", empty_message)?;
        out.reset()?;
        return Ok(());
    }

    for record in records {
        print_record(out, record)?;
    }

    Ok(())
}

fn print_record<W: WriteColor>(out: &mut W, record: &PrayerRecord) -> io::Result<()> {
    let requested = record
        .requested_at
        .map(|at| at.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| "Someday".to_string());

    // Header: name and request date
    write!(out, "  ")?;
    out.set_color(ColorSpec::new().set_bold(true))?;
    write!(out, "{}", record.name)?;
    out.reset()?;
    out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
    writeln!(out, "  {}", requested)?;
    out.reset()?;

    writeln!(out, "    {}", record.request_text)?;

    if record.is_answered() {
        let answered = record
            .answered_at
            .map(|at| at.format(DATE_FORMAT).to_string())
            .unwrap_or_else(|| "Recently".to_string());
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
        write!(out, "    Answered on {}:", answered)?;
        out.reset()?;
        writeln!(out, " {}", record.answer().unwrap_or(""))?;
    }

    Ok(())
}

/// Print the token list and compiled tree for a query
pub fn print_explain(tokens: &[Token], expr: Option<&Expr>, choice: ColorChoice) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(choice);
    render_explain(&mut stdout, tokens, expr)
}

pub fn render_explain<W: WriteColor>(
    out: &mut W,
    tokens: &[Token],
    expr: Option<&Expr>,
) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
    write!(out, "tokens:")?;
    out.reset()?;
    for token in tokens {
        match token {
            Token::Value(text) => write!(out, " {}", text)?,
            Token::And | Token::Or => {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
                write!(out, " {}", if *token == Token::And { "AND" } else { "OR" })?;
                out.reset()?;
            }
            Token::LParen => write!(out, " (")?,
            Token::RParen => write!(out, " )")?,
        }
    }
    writeln!(out)?;

    out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
    write!(out, "tree:")?;
    out.reset()?;
    match expr {
        Some(expr) => writeln!(out, " {}", expr)?,
        None => writeln!(out, " <matches everything>")?,
    }

    Ok(())
}

/// Print records as a JSON array
pub fn print_json(records: &[&PrayerRecord]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    serde_json::to_writer_pretty(&mut lock, records)?;
    writeln!(lock)?;
    Ok(())
}
