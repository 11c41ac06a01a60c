//! One guided classification: photo path, key, guess, result.

use console::Style;
use dialoguer::{Input, Password, Select};
use shoplens_core::{Classifier, Config, Segment, SegmentTally};
use std::path::PathBuf;

use super::handle_interrupt;
use super::theme::shoplens_theme;
use crate::cli::classify::{classify_file, print_result, resolve_api_key};

/// State kept across guided runs in one interactive session.
pub struct Session {
    classifier: Classifier,
    engagement: bool,
    configured_key: Option<String>,
    /// Key typed in during this session; never written to disk.
    session_key: Option<String>,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        let env_key = std::env::var(shoplens_core::config::API_KEY_ENV).ok();
        let configured_key = resolve_api_key(env_key.as_deref(), config);
        Self {
            classifier: Classifier::from_config(config),
            engagement: config.engagement.enabled,
            configured_key,
            session_key: None,
        }
    }

    /// Ask for everything needed and segment one photo.
    pub async fn guided_classify(&mut self, tally: &mut SegmentTally) -> anyhow::Result<()> {
        let Some(path) = prompt_image_path()? else {
            return Ok(());
        };
        let Some(api_key) = self.api_key()? else {
            return Ok(());
        };
        let guess = if self.engagement {
            prompt_guess()?
        } else {
            None
        };

        let spinner = indicatif::ProgressBar::new_spinner();
        spinner.set_message("Segmenting customer...");
        spinner.enable_steady_tick(std::time::Duration::from_millis(100));
        let (record, outcome) =
            classify_file(&self.classifier, &path, &api_key, guess, self.engagement).await;
        spinner.finish_and_clear();

        let red = Style::new().for_stderr().red();
        let green = Style::new().for_stderr().green();
        match outcome {
            Ok(scored) => {
                tally.record(&scored.label);
                print_result(&record);
                if let Some(guess) = &scored.guess {
                    tally.record_guess(guess);
                    if guess.correct {
                        eprintln!("  {} You guessed right!", green.apply_to("✓"));
                    } else {
                        eprintln!(
                            "  {} You guessed {}, the model said {}.",
                            red.apply_to("✗"),
                            guess.guessed,
                            guess.predicted
                        );
                    }
                    eprintln!();
                }
            }
            Err(e) => {
                tally.record_failure();
                eprintln!();
                eprintln!("  {} {e}", red.apply_to("✗"));
                eprintln!();
                if matches!(e, shoplens_core::ClassificationError::Remote { status: 401, .. }) {
                    // A rejected session key should be asked for again.
                    self.session_key = None;
                }
            }
        }
        Ok(())
    }

    /// Configured key, else the key entered earlier this session, else a
    /// masked prompt.
    fn api_key(&mut self) -> anyhow::Result<Option<String>> {
        if let Some(key) = self.configured_key.clone().or_else(|| self.session_key.clone()) {
            return Ok(Some(key));
        }

        let warn = Style::new().for_stderr().yellow();
        eprintln!(
            "  {}",
            warn.apply_to(format!("{} not set.", shoplens_core::config::API_KEY_ENV))
        );

        let theme = shoplens_theme();
        let entered = handle_interrupt(
            Password::with_theme(&theme)
                .with_prompt("Enter your OpenRouter API key (empty to cancel)")
                .allow_empty_password(true)
                .interact(),
        )?;

        match entered {
            Some(key) if !key.trim().is_empty() => {
                let key = key.trim().to_string();
                self.session_key = Some(key.clone());
                Ok(Some(key))
            }
            _ => Ok(None),
        }
    }
}

fn prompt_image_path() -> anyhow::Result<Option<PathBuf>> {
    let theme = shoplens_theme();
    let input = handle_interrupt(
        Input::<String>::with_theme(&theme)
            .with_prompt("Path to a customer photo (JPG/PNG)")
            .validate_with(|s: &String| -> Result<(), String> {
                let path = expand(s);
                if path.is_file() {
                    Ok(())
                } else {
                    Err(format!("No file at {}", path.display()))
                }
            })
            .interact_text(),
    )?;
    Ok(input.map(|s| expand(&s)))
}

fn prompt_guess() -> anyhow::Result<Option<Segment>> {
    let theme = shoplens_theme();
    let mut items = vec!["Skip"];
    items.extend(Segment::ALL.iter().map(Segment::as_str));

    let choice = Select::with_theme(&theme)
        .with_prompt("Guess the segment before the model answers")
        .items(&items)
        .default(0)
        .interact_opt()?;

    Ok(match choice {
        Some(i) if i > 0 => Segment::ALL.get(i - 1).copied(),
        _ => None,
    })
}

fn expand(s: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(s.trim()).into_owned())
}
