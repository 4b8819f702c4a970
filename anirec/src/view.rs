//! Plain-text rendering of the fetched profile and watch list.

use mal_api::list::{group_by_status, status_counts};
use mal_api::models::{AnimeListEntry, UserProfile};
use std::fmt::Write;

pub fn render_profile(profile: &UserProfile) -> String {
    let mut out = format!("Signed in as {} (id {})", profile.name, profile.id);
    if let Some(location) = &profile.location {
        let _ = write!(out, ", {}", location);
    }
    out.push('\n');
    out
}

/// Summary line plus one section per status, entries in list order.
pub fn render_watch_list(entries: &[AnimeListEntry]) -> String {
    if entries.is_empty() {
        return "Your anime list is empty.\n".to_string();
    }

    let mut out = String::new();

    let counts = status_counts(entries);
    let summary: Vec<String> = counts
        .iter()
        .map(|(status, count)| format!("{}: {}", status, count))
        .collect();
    let _ = writeln!(out, "{} anime ({})", entries.len(), summary.join(", "));

    for (status, items) in group_by_status(entries) {
        let _ = writeln!(out, "\n{} ({})", status, items.len());
        for item in items {
            let _ = write!(out, "  - {}", item.node.title);
            if item.list_status.score > 0 {
                let _ = write!(out, " [score {}]", item.list_status.score);
            }
            if let Some(episodes) = item.node.num_episodes {
                let _ = write!(
                    out,
                    " ({}/{} eps)",
                    item.list_status.num_episodes_watched, episodes
                );
            }
            out.push('\n');
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mal_api::models::{AnimeDetails, AnimeStatus, WatchStatus};

    fn entry(title: &str, status: WatchStatus, score: u8) -> AnimeListEntry {
        AnimeListEntry {
            node: AnimeDetails {
                id: 1,
                title: title.to_string(),
                main_picture: None,
                mean: None,
                media_type: None,
                num_episodes: None,
            },
            list_status: AnimeStatus {
                status,
                score,
                num_episodes_watched: 0,
                is_rewatching: false,
                updated_at: None,
            },
        }
    }

    #[test]
    fn summary_counts_every_status() {
        let entries = vec![
            entry("a", WatchStatus::Watching, 0),
            entry("b", WatchStatus::Completed, 9),
            entry("c", WatchStatus::Completed, 0),
        ];
        let rendered = render_watch_list(&entries);
        assert!(rendered.contains("3 anime"));
        assert!(rendered.contains("Watching: 1"));
        assert!(rendered.contains("Completed: 2"));
        assert!(rendered.contains("b [score 9]"));
    }

    #[test]
    fn empty_list_has_a_message() {
        assert!(render_watch_list(&[]).contains("empty"));
    }
}
