//! Interactive mode for a bare `shoplens` invocation on a TTY.
//!
//! Walks the user through picking a photo, supplying a key if none is
//! configured, optionally guessing the segment, and reading the result. A
//! running breakdown is kept for the session.

mod session;
mod theme;

use console::Style;
use dialoguer::Select;
use shoplens_core::{Config, SegmentTally};

use super::classify::print_breakdown;

/// Convert a dialoguer result into `Ok(Some(value))` on success, `Ok(None)` on
/// interrupt (Ctrl+C / terminal disconnect), and `Err` for other I/O failures.
fn handle_interrupt<T>(result: dialoguer::Result<T>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(dialoguer::Error::IO(e)) if e.kind() == std::io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e.into()),
    }
}

const MENU_ITEMS: &[&str] = &[
    "Segment a customer photo",
    "Show session breakdown",
    "About the segments",
    "Show configuration",
    "Exit",
];

/// Entry point for interactive mode.
pub async fn run(config: &Config) -> anyhow::Result<()> {
    theme::print_banner();

    let theme = theme::shoplens_theme();
    let mut session = session::Session::new(config);
    let mut tally = SegmentTally::new();

    loop {
        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(MENU_ITEMS)
            .default(0)
            .interact_opt()?;

        match selection {
            Some(0) => session.guided_classify(&mut tally).await?,
            Some(1) => show_breakdown(&tally),
            Some(2) => show_segments(&tally),
            Some(3) => show_config(config),
            Some(4) | None => break,
            Some(_) => continue,
        }
    }

    Ok(())
}

fn show_breakdown(tally: &SegmentTally) {
    let dim = Style::new().for_stderr().dim();
    if tally.classified() == 0 {
        eprintln!();
        eprintln!("  {}", dim.apply_to("Nothing segmented yet this session."));
        eprintln!();
        return;
    }
    print_breakdown(tally);
    let (correct, guesses) = tally.guess_score();
    if guesses > 0 {
        eprintln!("  Guesses: {correct}/{guesses} correct");
        eprintln!();
    }
}

/// Segment list with how often each was seen this session.
fn show_segments(tally: &SegmentTally) {
    let bold = Style::new().for_stderr().bold();
    let dim = Style::new().for_stderr().dim();
    eprintln!();
    for segment in shoplens_core::Segment::ALL {
        let seen = match tally.count(segment) {
            0 => String::new(),
            n => format!(" (seen {n}x)"),
        };
        eprintln!("  {}{}", bold.apply_to(segment.as_str()), dim.apply_to(seen));
        eprintln!("    {}", dim.apply_to(segment.description()));
    }
    eprintln!();
}

fn show_config(config: &Config) {
    let label = Style::new().for_stderr().bold();
    let dim = Style::new().for_stderr().dim();

    let config_path = Config::default_path();
    let path_note = if config_path.exists() {
        "(exists)"
    } else {
        "(using defaults)"
    };
    let key_note = if config.api.resolved_api_key().is_some() {
        "configured"
    } else {
        "not set (you will be asked)"
    };

    eprintln!();
    eprintln!(
        "    {:<16} {} {}",
        label.apply_to("Config file:"),
        config_path.display(),
        dim.apply_to(path_note)
    );
    eprintln!("    {:<16} {}", label.apply_to("Endpoint:"), config.api.endpoint);
    eprintln!("    {:<16} {}", label.apply_to("Model:"), config.api.model);
    eprintln!(
        "    {:<16} {}s",
        label.apply_to("Timeout:"),
        config.api.timeout_secs
    );
    eprintln!("    {:<16} {}", label.apply_to("API key:"), key_note);
    eprintln!();
}
