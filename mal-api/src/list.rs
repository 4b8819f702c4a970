//! Pure grouping helpers for the watch list. No I/O, no error states;
//! failures happen upstream when the list is fetched.

use crate::models::{AnimeListEntry, WatchStatus};

/// Group entries by watch status.
///
/// Groups appear in first-seen order and entries keep their original
/// relative order within each group.
pub fn group_by_status(entries: &[AnimeListEntry]) -> Vec<(WatchStatus, Vec<&AnimeListEntry>)> {
    let mut groups: Vec<(WatchStatus, Vec<&AnimeListEntry>)> = Vec::new();
    for entry in entries {
        let status = entry.list_status.status;
        match groups.iter_mut().find(|(s, _)| *s == status) {
            Some((_, items)) => items.push(entry),
            None => groups.push((status, vec![entry])),
        }
    }
    groups
}

/// Per-status entry counts, in first-seen group order.
pub fn status_counts(entries: &[AnimeListEntry]) -> Vec<(WatchStatus, usize)> {
    group_by_status(entries)
        .into_iter()
        .map(|(status, items)| (status, items.len()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnimeDetails, AnimeStatus};

    fn entry(id: u64, title: &str, status: WatchStatus) -> AnimeListEntry {
        AnimeListEntry {
            node: AnimeDetails {
                id,
                title: title.to_string(),
                main_picture: None,
                mean: None,
                media_type: None,
                num_episodes: None,
            },
            list_status: AnimeStatus {
                status,
                score: 0,
                num_episodes_watched: 0,
                is_rewatching: false,
                updated_at: None,
            },
        }
    }

    #[test]
    fn groups_preserve_first_seen_order() {
        let entries = vec![
            entry(1, "a", WatchStatus::Watching),
            entry(2, "b", WatchStatus::Completed),
            entry(3, "c", WatchStatus::Completed),
            entry(4, "d", WatchStatus::Dropped),
            entry(5, "e", WatchStatus::PlanToWatch),
        ];

        let groups = group_by_status(&entries);
        let order: Vec<WatchStatus> = groups.iter().map(|(s, _)| *s).collect();
        assert_eq!(
            order,
            vec![
                WatchStatus::Watching,
                WatchStatus::Completed,
                WatchStatus::Dropped,
                WatchStatus::PlanToWatch,
            ]
        );

        let completed = &groups[1].1;
        assert_eq!(completed.len(), 2);
        assert_eq!(completed[0].node.id, 2);
        assert_eq!(completed[1].node.id, 3);
    }

    #[test]
    fn counts_match_spec_example() {
        let entries = vec![
            entry(1, "a", WatchStatus::Watching),
            entry(2, "b", WatchStatus::Completed),
            entry(3, "c", WatchStatus::Completed),
            entry(4, "d", WatchStatus::Dropped),
            entry(5, "e", WatchStatus::PlanToWatch),
        ];

        let counts = status_counts(&entries);
        assert_eq!(
            counts,
            vec![
                (WatchStatus::Watching, 1),
                (WatchStatus::Completed, 2),
                (WatchStatus::Dropped, 1),
                (WatchStatus::PlanToWatch, 1),
            ]
        );
    }

    #[test]
    fn empty_list_yields_no_groups() {
        assert!(group_by_status(&[]).is_empty());
        assert!(status_counts(&[]).is_empty());
    }
}
