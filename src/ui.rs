// UI layer: the interactive, strictly sequential workflow. Prompts use
// `dialoguer`, pagination progress uses an `indicatif` spinner, and every
// network call is delegated to `api`.

use crate::api::{ApiClient, ApiError, Group};
use crate::config::Config;
use crate::extract::LinkExtractor;
use crate::harvest::{harvest_links, Harvest};
use crate::output::report_harvest;
use anyhow::{Context, Result};
use dialoguer::{Input, Password};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;
use thiserror::Error;

/// Why a typed group number was refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Please enter a valid number.")]
    NotANumber,
    #[error("Invalid choice. Please try again.")]
    OutOfRange,
}

/// Run the whole harvest: token, group choice, pagination, output.
/// Blocks until the operator presses Enter at the end.
pub fn run(mut api: ApiClient, config: &Config) -> Result<()> {
    print_instructions();
    let token = prompt_token()?;
    api.set_token(&token);

    println!("\n⏳ Fetching your groups...");
    let mut stdout = io::stdout();
    let groups = groups_or_report(&mut stdout, api.list_groups())?;
    if groups.is_empty() {
        return wait_for_enter();
    }

    let group = select_group(&groups, read_choice)?;
    println!("\n✅ Selected Group: {} (ID: {})", group.name, group.id);

    let extractor = LinkExtractor::new().context("Failed to compile LinkedIn pattern")?;
    let harvest = harvest_with_spinner(&api, group, &extractor, config.page_delay)?;

    report_harvest(&mut stdout, &config.output_path, &harvest)?;
    wait_for_enter()
}

fn print_instructions() {
    println!("\n🔑 How to Get Your GroupMe API Key:");
    println!("1. Go to https://dev.groupme.com/");
    println!("2. Log in with your GroupMe account.");
    println!("3. Click on 'Developers' > 'Access Tokens'.");
    println!("4. Copy your API key and paste it here when prompted.\n");
}

/// `Password` hides the token while it is typed or pasted.
fn prompt_token() -> Result<String> {
    let token: String = Password::new()
        .with_prompt("Enter your GroupMe API key")
        .interact()?;
    Ok(token.trim().to_string())
}

/// Show the numbered group list, or explain why there is nothing to pick.
/// A failed listing is reported and then treated like an empty one.
pub fn groups_or_report<W: Write>(
    console: &mut W,
    listing: Result<Vec<Group>, ApiError>,
) -> io::Result<Vec<Group>> {
    let groups = listing.or_else(|e| {
        writeln!(console, "Error fetching groups: {e}")?;
        Ok::<_, io::Error>(Vec::new())
    })?;
    if groups.is_empty() {
        writeln!(console, "❌ No groups found or invalid API key. Exiting.")?;
        return Ok(groups);
    }
    writeln!(console, "\n📂 Available Groups:")?;
    for (i, group) in groups.iter().enumerate() {
        writeln!(console, "{}. {} (ID: {})", i + 1, group.name, group.id)?;
    }
    Ok(groups)
}

fn read_choice() -> Result<String> {
    println!();
    // Blank input goes to `parse_selection` so it gets the same error as
    // any other non-number.
    let input: String = Input::new()
        .with_prompt("Select a group by number")
        .allow_empty(true)
        .interact_text()?;
    Ok(input)
}

/// Turn a 1-based group number typed by the operator into an index into
/// a list of `count` groups.
pub fn parse_selection(input: &str, count: usize) -> Result<usize, SelectionError> {
    let n: i64 = input.trim().parse().map_err(|_| SelectionError::NotANumber)?;
    match usize::try_from(n) {
        Ok(n) if (1..=count).contains(&n) => Ok(n - 1),
        _ => Err(SelectionError::OutOfRange),
    }
}

/// Ask for a group number until a valid one is entered. There is no retry
/// cap; the only other way out is an error from `read_choice` itself.
pub fn select_group<'g, F>(groups: &'g [Group], mut read_choice: F) -> Result<&'g Group>
where
    F: FnMut() -> Result<String>,
{
    loop {
        let input = read_choice()?;
        match parse_selection(&input, groups.len()) {
            Ok(index) => return Ok(&groups[index]),
            Err(e) => println!("❌ {e}"),
        }
    }
}

fn harvest_with_spinner(
    api: &ApiClient,
    group: &Group,
    extractor: &LinkExtractor,
    delay: Duration,
) -> Result<Harvest> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(format!("Reading messages from {}...", group.name));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let harvest = harvest_links(api, &group.id, extractor, delay, |p| {
        spinner.set_message(format!(
            "Read {} pages ({} messages), {} LinkedIn URLs so far...",
            p.pages, p.messages, p.links
        ));
    });

    spinner.finish_and_clear();
    Ok(harvest)
}

fn wait_for_enter() -> Result<()> {
    println!();
    let _: String = Input::new()
        .with_prompt("Press Enter to exit...")
        .allow_empty(true)
        .interact_text()?;
    Ok(())
}
