//! The user's selection of distracting applications.

use log::info;

use crate::model::{AppDescriptor, display_order, sort_and_dedup};

/// Unique by `(id, detail)`, always sorted by display label.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KillList {
    entries: Vec<AppDescriptor>,
}

impl KillList {
    pub fn new(entries: Vec<AppDescriptor>) -> Self {
        let mut entries: Vec<AppDescriptor> =
            entries.into_iter().filter(|e| !e.is_error()).collect();
        sort_and_dedup(&mut entries);
        Self { entries }
    }

    /// Insert when absent, remove when present. Returns whether the app is
    /// selected afterwards.
    pub fn toggle(&mut self, app: &AppDescriptor) -> bool {
        let selected = if let Some(pos) = self.entries.iter().position(|e| e.same_target(app)) {
            let removed = self.entries.remove(pos);
            info!("Removed {} from kill list", removed);
            false
        } else {
            info!("Added {} to kill list", app);
            self.entries.push(app.clone());
            true
        };
        self.entries.sort_by(display_order);
        selected
    }

    pub fn contains(&self, app: &AppDescriptor) -> bool {
        self.entries.iter().any(|e| e.same_target(app))
    }

    pub fn entries(&self) -> &[AppDescriptor] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &KillList) -> Vec<&str> {
        list.entries().iter().map(|e| e.id.as_str()).collect()
    }

    fn is_sorted_and_unique(list: &KillList) -> bool {
        let entries = list.entries();
        let sorted = entries
            .windows(2)
            .all(|w| display_order(&w[0], &w[1]).is_le());
        let unique = entries.iter().enumerate().all(|(i, a)| {
            entries
                .iter()
                .skip(i + 1)
                .all(|b| !a.same_target(b))
        });
        sorted && unique
    }

    #[test]
    fn toggle_twice_restores_list() {
        let mut list = KillList::new(vec![
            AppDescriptor::named("zoom"),
            AppDescriptor::named("Discord"),
        ]);
        let before = list.clone();
        let slack = AppDescriptor::new("slack", "Slack", "/Applications/Slack.app");

        assert!(list.toggle(&slack));
        assert!(list.contains(&slack));
        assert!(is_sorted_and_unique(&list));

        assert!(!list.toggle(&slack));
        assert_eq!(list, before);
    }

    #[test]
    fn toggle_matches_on_id_and_detail() {
        let mut list = KillList::default();
        let a = AppDescriptor::new("Code.exe", "Code", r"C:\Stable\Code.exe");
        let b = AppDescriptor::new("Code.exe", "Code", r"C:\Insiders\Code.exe");
        list.toggle(&a);
        list.toggle(&b);
        assert_eq!(list.len(), 2);

        // Display label is not part of the identity.
        let relabelled = AppDescriptor::new("Code.exe", "VS Code", r"C:\Stable\Code.exe");
        assert!(list.contains(&relabelled));
        assert!(!list.toggle(&relabelled));
        assert_eq!(list.entries(), &[b]);
    }

    #[test]
    fn every_mutation_keeps_order() {
        let mut list = KillList::default();
        for name in ["spotify", "Slack", "discord", "Mail", "steam", "Discord"] {
            list.toggle(&AppDescriptor::named(name));
            assert!(is_sorted_and_unique(&list));
        }
        list.toggle(&AppDescriptor::named("Mail"));
        assert!(is_sorted_and_unique(&list));
        assert_eq!(
            ids(&list),
            vec!["Discord", "discord", "Slack", "spotify", "steam"]
        );
    }

    #[test]
    fn new_drops_duplicates_and_sentinels() {
        let list = KillList::new(vec![
            AppDescriptor::named("slack"),
            AppDescriptor::error("boom"),
            AppDescriptor::named("slack"),
        ]);
        assert_eq!(ids(&list), vec!["slack"]);
    }
}
