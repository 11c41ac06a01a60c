//! Dialoguer theme and banner for Shoplens interactive mode.

use console::{style, Style};
use dialoguer::theme::ColorfulTheme;

/// Shoplens dialoguer theme. Renders on stderr.
pub fn shoplens_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("?".to_string()).for_stderr().cyan(),
        prompt_style: Style::new().for_stderr().bold(),
        prompt_suffix: style("›".to_string()).for_stderr().bright().black(),
        active_item_prefix: style("❯".to_string()).for_stderr().magenta(),
        active_item_style: Style::new().for_stderr().magenta().bold(),
        success_prefix: style("✓".to_string()).for_stderr().green(),
        success_suffix: style("·".to_string()).for_stderr().bright().black(),
        error_prefix: style("✗".to_string()).for_stderr().red(),
        error_style: Style::new().for_stderr().red(),
        values_style: Style::new().for_stderr().cyan(),
        ..ColorfulTheme::default()
    }
}

/// Prints the boxed version banner to stderr.
pub fn print_banner() {
    let version_line = format!("Shoplens v{}", shoplens_core::VERSION);
    let tagline = "Real-time customer segmentation in retail";

    let inner_width = tagline.chars().count() + 4;

    let top = format!("  ╔{:═<width$}╗", "", width = inner_width);
    let mid1 = format!("  ║{:^width$}║", version_line, width = inner_width);
    let mid2 = format!("  ║{:^width$}║", tagline, width = inner_width);
    let bot = format!("  ╚{:═<width$}╝", "", width = inner_width);

    let frame = Style::new().for_stderr().magenta();

    eprintln!();
    eprintln!("{}", frame.apply_to(&top));
    eprintln!("{}", frame.apply_to(&mid1));
    eprintln!("{}", frame.apply_to(&mid2));
    eprintln!("{}", frame.apply_to(&bot));
    eprintln!();
}
