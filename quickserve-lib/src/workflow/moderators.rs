use crate::models::Customer;

/// Counts over the moderators currently shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeratorSummary {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
}

/// Why the moderator list is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// The user collection holds no moderators at all.
    NoModerators,
    /// There are moderators, but none matches the search.
    NoMatches,
}

impl EmptyState {
    pub fn message(self) -> &'static str {
        match self {
            EmptyState::NoModerators => "No moderators have been added yet.",
            EmptyState::NoMatches => "No moderators match your search.",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModeratorView {
    pub moderators: Vec<Customer>,
    pub summary: ModeratorSummary,
    pub empty: Option<EmptyState>,
}

/// Derive the moderator list from the full user collection.
///
/// Keeps users with the moderator role and, when `search` is not blank, only those whose name
/// or email contains it (case-insensitive). The summary is computed over the result.
pub fn filter_moderators(users: &[Customer], search: &str) -> ModeratorView {
    let needle = search.trim().to_lowercase();
    let mut any_moderator = false;

    let moderators: Vec<Customer> = users
        .iter()
        .filter(|user| user.is_moderator())
        .inspect(|_| any_moderator = true)
        .filter(|user| {
            needle.is_empty()
                || user.name.to_lowercase().contains(&needle)
                || user.email.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect();

    let total = moderators.len();
    let active = moderators.iter().filter(|m| m.is_active()).count();

    let empty = match (moderators.is_empty(), any_moderator) {
        (false, _) => None,
        (true, false) => Some(EmptyState::NoModerators),
        (true, true) => Some(EmptyState::NoMatches),
    };

    ModeratorView {
        moderators,
        summary: ModeratorSummary {
            total,
            active,
            inactive: total.saturating_sub(active),
        },
        empty,
    }
}

/// Moderator screen state. The derived view is recomputed whenever the users or the search term
/// change.
#[derive(Debug, Clone, Default)]
pub struct ModeratorDirectory {
    users: Vec<Customer>,
    search: String,
    view: ModeratorView,
}

impl ModeratorDirectory {
    pub fn new(users: Vec<Customer>) -> Self {
        let mut directory = Self::default();
        directory.set_users(users);
        directory
    }

    pub fn set_users(&mut self, users: Vec<Customer>) {
        self.users = users;
        self.recompute();
    }

    pub fn set_search(&mut self, search: String) {
        self.search = search;
        self.recompute();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn view(&self) -> &ModeratorView {
        &self.view
    }

    fn recompute(&mut self) {
        self.view = filter_moderators(&self.users, &self.search);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::models::Role;

    fn users() -> Vec<Customer> {
        vec![
            Customer::new(1, "Ada", "ada@example.com", "")
                .with_role(Role::Moderator)
                .with_active(Some(true)),
            Customer::new(2, "Grace", "grace@navy.mil", "")
                .with_role(Role::Moderator)
                .with_active(None),
            Customer::new(3, "Linus", "linus@example.com", "")
                .with_role(Role::Moderator)
                .with_active(Some(false)),
            Customer::new(4, "Ken", "ken@example.com", "").with_role(Role::Customer),
            Customer::new(5, "Dennis", "dennis@example.com", ""),
        ]
    }

    #[test]
    fn test_only_explicit_false_is_inactive() {
        let users = vec![
            Customer::new(1, "", "", "")
                .with_role(Role::Moderator)
                .with_active(Some(false)),
            Customer::new(2, "", "", "").with_role(Role::Customer),
        ];

        let view = filter_moderators(&users, "");

        assert_eq!(view.moderators.len(), 1);
        assert_eq!(view.summary.inactive, 1);
        assert_eq!(view.summary.active, 0);
    }

    #[test]
    fn test_missing_flag_counts_as_active() {
        let view = filter_moderators(&users(), "");

        assert_eq!(
            view.summary,
            ModeratorSummary {
                total: 3,
                active: 2,
                inactive: 1
            }
        );
        assert_eq!(view.empty, None);
    }

    #[test]
    fn test_search_name_or_email_case_insensitive() {
        let by_name = filter_moderators(&users(), "GRACE");
        let by_email = filter_moderators(&users(), "navy");

        assert_eq!(by_name.moderators, by_email.moderators);
        assert_eq!(by_name.summary.total, 1);
    }

    #[test]
    fn test_search_never_matches_non_moderators() {
        let view = filter_moderators(&users(), "ken");

        assert!(view.moderators.is_empty());
        assert_eq!(view.empty, Some(EmptyState::NoMatches));
    }

    #[test]
    fn test_empty_states() {
        let customers_only = vec![Customer::new(4, "Ken", "ken@example.com", "")];

        assert_eq!(
            filter_moderators(&customers_only, "").empty,
            Some(EmptyState::NoModerators)
        );
        assert_eq!(
            filter_moderators(&customers_only, "zzz").empty,
            Some(EmptyState::NoModerators)
        );
        assert_eq!(
            filter_moderators(&users(), "zzz").empty,
            Some(EmptyState::NoMatches)
        );
    }

    #[test]
    fn test_directory_recomputes() {
        let mut directory = ModeratorDirectory::new(users());
        assert_eq!(directory.view().summary.total, 3);

        directory.set_search("linus".into());
        assert_eq!(directory.view().summary.inactive, 1);
        assert_eq!(directory.view().summary.total, 1);

        directory.set_users(Vec::new());
        assert_eq!(directory.view().empty, Some(EmptyState::NoModerators));
        assert_eq!(directory.search(), "linus");
    }
}
