// Result writer: print the collected links and save them to a text file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::extract::LinkSet;
use crate::harvest::Harvest;

/// Write one `Name: <sender> - LinkedIn URL: <url>` line per link, in set
/// order, replacing any existing file. Rust strings are UTF-8, so non-ASCII
/// sender names are written as-is.
///
/// An empty set leaves the filesystem untouched and returns `false`.
pub fn write_links(path: &Path, links: &LinkSet) -> Result<bool> {
    if links.is_empty() {
        return Ok(false);
    }
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    for link in links {
        writeln!(out, "{link}").with_context(|| format!("Failed to write {}", path.display()))?;
    }
    out.flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), count = links.len(), "links saved");
    Ok(true)
}

/// Print the links to `console` and save them to `path` when there are any.
pub fn report_links<W: Write>(console: &mut W, path: &Path, links: &LinkSet) -> Result<()> {
    writeln!(console, "\n🔗 Extracted LinkedIn URLs:")?;
    if links.is_empty() {
        writeln!(console, "No LinkedIn URLs found.")?;
        return Ok(());
    }
    for link in links {
        writeln!(console, "{link}")?;
    }
    write_links(path, links)?;
    writeln!(console, "\n✅ URLs have been saved to {}", path.display())?;
    Ok(())
}

/// Finish a run: warn when pagination stopped on an error, then report
/// whatever links were gathered up to that point.
pub fn report_harvest<W: Write>(console: &mut W, path: &Path, harvest: &Harvest) -> Result<()> {
    if let Some(e) = &harvest.error {
        writeln!(
            console,
            "⚠️  Error fetching messages: {e}. The history may be incomplete: only the {} \
             messages read before the failure were scanned.",
            harvest.progress.messages
        )?;
    }
    report_links(console, path, &harvest.links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::extract::ExtractedLink;
    use crate::harvest::HarvestProgress;
    use reqwest::StatusCode;
    use tempfile::TempDir;

    #[test]
    fn writes_sorted_lines_with_trailing_newline() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("linkedin_urls.txt");
        let links: LinkSet = [
            ExtractedLink::new("Bob", "https://linkedin.com/in/jane-doe"),
            ExtractedLink::new("Alice", "https://www.linkedin.com/in/jane-doe/"),
        ]
        .into_iter()
        .collect();

        assert!(write_links(&path, &links).unwrap());
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "Name: Alice - LinkedIn URL: https://www.linkedin.com/in/jane-doe/\n\
             Name: Bob - LinkedIn URL: https://linkedin.com/in/jane-doe\n"
        );
    }

    #[test]
    fn overwrites_existing_file_and_keeps_non_ascii_names() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        let stale = "stale contents that are longer than the new ones\n".repeat(10);
        std::fs::write(&path, stale).unwrap();
        let links: LinkSet = [ExtractedLink::new("José Ñúñez", "https://linkedin.com/in/jose")]
            .into_iter()
            .collect();

        write_links(&path, &links).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Name: José Ñúñez - LinkedIn URL: https://linkedin.com/in/jose\n"
        );
    }

    #[test]
    fn empty_set_does_not_create_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("linkedin_urls.txt");
        assert!(!write_links(&path, &LinkSet::new()).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn empty_set_leaves_existing_file_alone() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("linkedin_urls.txt");
        std::fs::write(&path, "previous run\n").unwrap();
        let mut console = Vec::new();
        report_links(&mut console, &path, &LinkSet::new()).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "previous run\n");
        let printed = String::from_utf8(console).unwrap();
        assert!(printed.contains("No LinkedIn URLs found.\n"), "{printed}");
    }

    #[test]
    fn failed_harvest_warns_and_still_saves_links() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("linkedin_urls.txt");
        let harvest = Harvest {
            links: [ExtractedLink::new("Alice", "https://www.linkedin.com/in/alice/")]
                .into_iter()
                .collect(),
            progress: HarvestProgress {
                pages: 1,
                messages: 100,
                links: 1,
            },
            error: Some(ApiError::Status(StatusCode::BAD_GATEWAY)),
        };
        let mut console = Vec::new();
        report_harvest(&mut console, &path, &harvest).unwrap();

        let printed = String::from_utf8(console).unwrap();
        assert!(printed.contains("Error fetching messages: HTTP status 502"), "{printed}");
        assert!(printed.contains("history may be incomplete"), "{printed}");
        assert!(printed.contains("only the 100 messages"), "{printed}");
        assert!(
            printed.contains("Name: Alice - LinkedIn URL: https://www.linkedin.com/in/alice/\n"),
            "{printed}"
        );
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Name: Alice - LinkedIn URL: https://www.linkedin.com/in/alice/\n"
        );
    }

    #[test]
    fn complete_harvest_without_links_prints_no_results() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("linkedin_urls.txt");
        let harvest = Harvest {
            links: LinkSet::new(),
            progress: HarvestProgress::default(),
            error: None,
        };
        let mut console = Vec::new();
        report_harvest(&mut console, &path, &harvest).unwrap();

        let printed = String::from_utf8(console).unwrap();
        assert!(!printed.contains("Error fetching messages"), "{printed}");
        assert!(printed.contains("No LinkedIn URLs found.\n"), "{printed}");
        assert!(!path.exists());
    }
}
