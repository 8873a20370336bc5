use crate::storage::CommandInvocation;

/// Fixed set of git commands the interface can issue. Every variant maps
/// to a discrete argument vector; no action ever goes through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitAction {
    Status,
    AddAll,
    Diff,
    Log,
    Commit { message: String },
    Push,
    Pull,
}

impl GitAction {
    /// Build a commit action from user input. Empty or whitespace-only
    /// messages are rejected before anything reaches the runner.
    pub fn commit(message: &str) -> Option<Self> {
        let message = message.trim();
        if message.is_empty() {
            return None;
        }
        Some(Self::Commit {
            message: message.to_string(),
        })
    }

    pub fn arguments(&self) -> Vec<String> {
        let args: Vec<&str> = match self {
            Self::Status => vec!["git", "status"],
            Self::AddAll => vec!["git", "add", "."],
            Self::Diff => vec!["git", "diff"],
            Self::Log => vec!["git", "log", "--oneline", "-10"],
            Self::Commit { message } => vec!["git", "commit", "-m", message.as_str()],
            Self::Push => vec!["git", "push"],
            Self::Pull => vec!["git", "pull"],
        };
        args.into_iter().map(|s| s.to_string()).collect()
    }

    pub fn invocation(&self) -> CommandInvocation {
        CommandInvocation::new(self.arguments())
    }
}

/// Items of the interface menu, one letter each. `CommitInput` focuses the
/// message line and `ShowHistory` queries the store; the rest run git
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Status,
    AddAll,
    Diff,
    Log,
    CommitInput,
    Push,
    Pull,
    ShowHistory,
}

impl MenuItem {
    pub const ALL: [MenuItem; 8] = [
        MenuItem::Status,
        MenuItem::AddAll,
        MenuItem::Diff,
        MenuItem::Log,
        MenuItem::CommitInput,
        MenuItem::Push,
        MenuItem::Pull,
        MenuItem::ShowHistory,
    ];

    pub fn key(self) -> char {
        match self {
            Self::Status => 's',
            Self::AddAll => 'a',
            Self::Diff => 'd',
            Self::Log => 'l',
            Self::CommitInput => 'c',
            Self::Push => 'p',
            Self::Pull => 'u',
            Self::ShowHistory => 'h',
        }
    }

    pub fn label_key(self) -> &'static str {
        match self {
            Self::Status => "action_status",
            Self::AddAll => "action_add_all",
            Self::Diff => "action_diff",
            Self::Log => "action_log",
            Self::CommitInput => "action_commit",
            Self::Push => "action_push",
            Self::Pull => "action_pull",
            Self::ShowHistory => "action_history",
        }
    }

    pub fn from_key(key: char) -> Option<Self> {
        Self::ALL.iter().copied().find(|item| item.key() == key)
    }

    /// The git action behind this menu item, if it runs one directly.
    pub fn action(self) -> Option<GitAction> {
        match self {
            Self::Status => Some(GitAction::Status),
            Self::AddAll => Some(GitAction::AddAll),
            Self::Diff => Some(GitAction::Diff),
            Self::Log => Some(GitAction::Log),
            Self::Push => Some(GitAction::Push),
            Self::Pull => Some(GitAction::Pull),
            Self::CommitInput | Self::ShowHistory => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_use_discrete_argument_vectors() {
        assert_eq!(GitAction::Status.arguments(), ["git", "status"]);
        assert_eq!(GitAction::AddAll.arguments(), ["git", "add", "."]);
        assert_eq!(
            GitAction::Log.arguments(),
            ["git", "log", "--oneline", "-10"]
        );
        // Nothing is pre-joined into a shell string
        for item in MenuItem::ALL {
            if let Some(action) = item.action() {
                assert!(action.arguments().len() >= 2);
                assert_eq!(action.arguments()[0], "git");
            }
        }
    }

    #[test]
    fn commit_message_with_spaces_stays_one_argument() {
        let action = GitAction::commit("fix: handle empty output").unwrap();
        assert_eq!(
            action.arguments(),
            ["git", "commit", "-m", "fix: handle empty output"]
        );
    }

    #[test]
    fn empty_commit_message_is_rejected() {
        assert_eq!(GitAction::commit(""), None);
        assert_eq!(GitAction::commit("   "), None);
        assert_eq!(GitAction::commit("\t\n"), None);
    }

    #[test]
    fn commit_message_is_trimmed() {
        let action = GitAction::commit("  initial  ").unwrap();
        assert_eq!(action.arguments()[3], "initial");
    }

    #[test]
    fn every_menu_item_has_a_unique_key() {
        for item in MenuItem::ALL {
            assert_eq!(MenuItem::from_key(item.key()), Some(item));
        }
        assert_eq!(MenuItem::from_key('x'), None);
        assert_eq!(MenuItem::from_key('u'), Some(MenuItem::Pull));
    }
}
