//! The `shoplens segments` command: list the label taxonomy.

use console::Style;
use shoplens_core::{Config, Segment};

/// One line per segment: label, then its explanation when engagement is on.
pub fn render(with_descriptions: bool) -> Vec<String> {
    Segment::ALL
        .iter()
        .map(|segment| {
            if with_descriptions {
                format!("{:<20} {}", segment.as_str(), segment.description())
            } else {
                segment.as_str().to_string()
            }
        })
        .collect()
}

/// Execute the segments command. The list goes to stdout so it can be piped.
pub fn execute(config: &Config) -> anyhow::Result<()> {
    let bold = Style::new().bold();
    let with_descriptions = config.engagement.enabled;

    for (segment, line) in Segment::ALL.iter().zip(render(with_descriptions)) {
        let label = segment.as_str();
        match line.strip_prefix(label) {
            Some(rest) => println!("{}{}", bold.apply_to(label), rest),
            None => println!("{line}"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_lists_all_segments_in_order() {
        let lines = render(false);
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[0], "Deal Seeker");
        assert_eq!(lines[10], "Checking Out");
    }

    #[test]
    fn render_with_descriptions() {
        let lines = render(true);
        assert!(lines[4].starts_with("Lost/Confused"));
        assert!(lines[4].contains(Segment::LostConfused.description()));
    }
}
