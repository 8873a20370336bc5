use crate::actions::{GitAction, MenuItem};
use crate::config::Config;
use crate::executor::CommandRunner;
use crate::history::{ConnectionState, HistoryStore};
use crate::i18n::I18n;
use crate::storage::HistoryRecord;
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    terminal,
};
use std::io::{self, Write};
use std::sync::Once;
use unicode_width::UnicodeWidthChar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Menu,
    CommitInput,
}

/// Interactive terminal front-end: an action menu, a commit-message input
/// line and an output panel showing the most recent result.
///
/// Command execution blocks the whole interface for its duration; the
/// actions are short-lived local git operations, so no background
/// execution is attempted.
pub struct App {
    config: Config,
    i18n: I18n,
    store: HistoryStore,
    output: String,
    commit_input: String,
    focus: Focus,
}

impl App {
    pub fn new(config: Config, i18n: I18n, store: HistoryStore) -> Self {
        Self {
            config,
            i18n,
            store,
            output: String::new(),
            commit_input: String::new(),
            focus: Focus::Menu,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();

        static INIT_CTRL_C: Once = Once::new();
        INIT_CTRL_C.call_once(|| {
            let _ = ctrlc::set_handler(move || {
                // Best-effort restore terminal state and exit with 130
                let _ = terminal::disable_raw_mode();
                print!("\x1b[?7h\x1b[?25h");
                let _ = io::stdout().flush();
                std::process::exit(130);
            });
        });

        terminal::enable_raw_mode().context(self.i18n.t("error_enable_raw_mode"))?;
        // Disable line wrap and hide cursor while drawing
        print!("\x1b[?7l\x1b[?25l");
        stdout.flush().ok();

        let result = self.event_loop();

        // Restore terminal settings before leaving raw mode
        print!("\x1b[2J\x1b[H\x1b[?7h\x1b[?25h");
        stdout.flush().ok();
        let _ = terminal::disable_raw_mode();

        result
    }

    fn event_loop(&mut self) -> Result<()> {
        loop {
            self.render()?;

            let Event::Key(key_event) = event::read().context(self.i18n.t("error_read_key"))?
            else {
                continue;
            };

            // Ctrl+C / Ctrl+D always exit, regardless of focus
            if key_event.modifiers.contains(KeyModifiers::CONTROL) {
                if let KeyCode::Char('c') | KeyCode::Char('d') = key_event.code {
                    return Ok(());
                }
            }

            match self.focus {
                Focus::CommitInput => match key_event.code {
                    KeyCode::Enter => self.submit_commit(),
                    KeyCode::Esc => {
                        self.focus = Focus::Menu;
                    }
                    KeyCode::Backspace => {
                        self.commit_input.pop();
                    }
                    KeyCode::Char(c) => {
                        self.commit_input.push(c);
                    }
                    _ => {}
                },
                Focus::Menu => match key_event.code {
                    KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                    KeyCode::Char(c) => {
                        if let Some(item) = MenuItem::from_key(c.to_ascii_lowercase()) {
                            self.handle_menu_item(item);
                        }
                    }
                    _ => {}
                },
            }
        }
    }

    fn handle_menu_item(&mut self, item: MenuItem) {
        match item {
            MenuItem::CommitInput => {
                self.focus = Focus::CommitInput;
            }
            MenuItem::ShowHistory => self.show_history(),
            _ => {
                if let Some(action) = item.action() {
                    self.run_action(action);
                }
            }
        }
    }

    fn run_action(&mut self, action: GitAction) {
        let invocation = action.invocation();
        let result = CommandRunner::execute_and_record(&invocation, &mut self.store);
        self.output = result.display_text;
    }

    fn submit_commit(&mut self) {
        match GitAction::commit(&self.commit_input) {
            Some(action) => {
                self.run_action(action);
                self.commit_input.clear();
                self.focus = Focus::Menu;
            }
            None => {
                // Empty message: never reaches the runner, keep the focus
                self.output = self.i18n.t("commit_message_required");
            }
        }
    }

    fn show_history(&mut self) {
        if self.store.state() == ConnectionState::Unavailable {
            self.output = self.i18n.t("history_unavailable");
            return;
        }
        let limit = self.config.display.max_history_shown;
        self.output = match self.store.list_recent(limit) {
            Ok(records) => format_history(&records, &self.i18n),
            Err(err) => self.i18n.t_format("history_error", &[&err.to_string()]),
        };
    }

    fn render(&self) -> Result<()> {
        let mut stdout = io::stdout();
        let (cols, rows) = terminal::size().unwrap_or((80, 24));
        let width = cols as usize;

        print!("\x1b[2J\x1b[H");

        // Title
        print!("\x1b[1;36m{}\x1b[0m\x1b[K\r\n\r\n", self.i18n.t("app_title"));

        // Action menu, one letter per action
        for item in MenuItem::ALL {
            print!(
                "  \x1b[32m{}\x1b[0m: {}\x1b[K\r\n",
                item.key(),
                self.i18n.t(item.label_key())
            );
        }

        // Commit message input line; highlighted while focused
        let prompt = self.i18n.t("commit_prompt");
        if self.focus == Focus::CommitInput {
            print!(
                "\r\n\x1b[44;37m{}: {}_\x1b[0m\x1b[K\r\n\r\n",
                prompt, self.commit_input
            );
        } else {
            print!("\r\n{}: {}\x1b[K\r\n\r\n", prompt, self.commit_input);
        }

        // Output panel, clipped to the remaining viewport
        let reserved_lines = MenuItem::ALL.len() + 7; // title + margins + input + hint
        let mut viewport = rows as usize;
        viewport = viewport.saturating_sub(reserved_lines);
        if viewport < 5 {
            viewport = 5;
        }
        for line in self.output.lines().take(viewport) {
            print!("{}\x1b[K\r\n", truncate_to_width(line, width));
        }

        // Navigation hint
        let hint = if self.focus == Focus::CommitInput {
            self.i18n.t("input_hint")
        } else {
            self.i18n.t("key_hint")
        };
        print!("\r\n\x1b[90m{}\x1b[0m\x1b[K", hint);

        stdout.flush()?;
        Ok(())
    }
}

/// Render history records as the output panel text, newest first.
fn format_history(records: &[HistoryRecord], i18n: &I18n) -> String {
    if records.is_empty() {
        return i18n.t("no_history");
    }
    let mut output = i18n.t("history_header");
    for record in records {
        let local_time = record.timestamp.with_timezone(&chrono::Local);
        output.push_str(&format!(
            "\n{}: {}",
            local_time.format("%Y-%m-%d %H:%M:%S"),
            record.command
        ));
    }
    output
}

/// Clip a line to the terminal width, accounting for wide characters.
fn truncate_to_width(line: &str, width: usize) -> String {
    let mut used = 0;
    let mut result = String::new();
    for c in line.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        result.push(c);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn truncation_respects_wide_characters() {
        assert_eq!(truncate_to_width("abcdef", 4), "abcd");
        assert_eq!(truncate_to_width("abc", 10), "abc");
        // CJK characters are two columns wide
        assert_eq!(truncate_to_width("状态状态", 5), "状态");
    }

    #[test]
    fn empty_history_renders_placeholder() {
        let i18n = I18n::new("en");
        assert_eq!(format_history(&[], &i18n), "No history");
    }

    #[test]
    fn history_lines_pair_timestamp_and_command() {
        let i18n = I18n::new("en");
        let records = vec![HistoryRecord {
            command: "git status".to_string(),
            timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        }];
        let text = format_history(&records, &i18n);
        assert!(text.starts_with("Command history"));
        assert!(text.ends_with(": git status"));
    }
}
