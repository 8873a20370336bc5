use std::collections::HashMap;

pub struct I18n {
    translations: HashMap<String, HashMap<String, String>>,
    current_lang: String,
}

impl I18n {
    pub fn new(lang: &str) -> Self {
        let mut translations = HashMap::new();

        let mut en = HashMap::new();
        // Interface
        en.insert("app_title".to_string(), "Git TUI".to_string());
        en.insert("action_status".to_string(), "Git Status".to_string());
        en.insert("action_add_all".to_string(), "Git Add All".to_string());
        en.insert("action_diff".to_string(), "Git Diff".to_string());
        en.insert("action_log".to_string(), "Git Log".to_string());
        en.insert("action_commit".to_string(), "Git Commit".to_string());
        en.insert("action_push".to_string(), "Git Push".to_string());
        en.insert("action_pull".to_string(), "Git Pull".to_string());
        en.insert("action_history".to_string(), "Command History".to_string());
        en.insert("commit_prompt".to_string(), "Commit message".to_string());
        en.insert("key_hint".to_string(), "s=status a=add d=diff l=log c=commit p=push u=pull h=history q=quit".to_string());
        en.insert("input_hint".to_string(), "Enter=commit, Esc=cancel".to_string());

        // Runtime messages
        en.insert("commit_message_required".to_string(), "Please enter a commit message.".to_string());
        en.insert("command_completed".to_string(), "Command completed, exit code: {0}".to_string());
        en.insert("history_header".to_string(), "Command history (most recent first):".to_string());
        en.insert("no_history".to_string(), "No history".to_string());
        en.insert("history_unavailable".to_string(), "Database not available".to_string());
        en.insert("history_error".to_string(), "Error: {0}".to_string());

        // Error messages
        en.insert("error_enable_raw_mode".to_string(), "Failed to enable terminal raw mode".to_string());
        en.insert("error_read_key".to_string(), "Failed to read keyboard input".to_string());

        let mut zh = HashMap::new();
        // Interface
        zh.insert("app_title".to_string(), "Git TUI".to_string());
        zh.insert("action_status".to_string(), "Git 状态".to_string());
        zh.insert("action_add_all".to_string(), "Git 添加全部".to_string());
        zh.insert("action_diff".to_string(), "Git 差异".to_string());
        zh.insert("action_log".to_string(), "Git 日志".to_string());
        zh.insert("action_commit".to_string(), "Git 提交".to_string());
        zh.insert("action_push".to_string(), "Git 推送".to_string());
        zh.insert("action_pull".to_string(), "Git 拉取".to_string());
        zh.insert("action_history".to_string(), "命令历史".to_string());
        zh.insert("commit_prompt".to_string(), "提交信息".to_string());
        zh.insert("key_hint".to_string(), "s=状态 a=添加 d=差异 l=日志 c=提交 p=推送 u=拉取 h=历史 q=退出".to_string());
        zh.insert("input_hint".to_string(), "Enter=提交, Esc=取消".to_string());

        // Runtime messages
        zh.insert("commit_message_required".to_string(), "请输入提交信息。".to_string());
        zh.insert("command_completed".to_string(), "命令执行完成，退出码: {0}".to_string());
        zh.insert("history_header".to_string(), "命令历史（最新在前）:".to_string());
        zh.insert("no_history".to_string(), "没有历史记录".to_string());
        zh.insert("history_unavailable".to_string(), "数据库不可用".to_string());
        zh.insert("history_error".to_string(), "错误: {0}".to_string());

        // Error messages
        zh.insert("error_enable_raw_mode".to_string(), "无法启用终端原始模式".to_string());
        zh.insert("error_read_key".to_string(), "无法读取键盘输入".to_string());

        translations.insert("en".to_string(), en);
        translations.insert("zh".to_string(), zh);

        // Accept several language code formats
        let effective_lang = if lang.starts_with("zh") || lang == "cn" || lang == "chinese" {
            "zh"
        } else {
            "en"
        };

        Self {
            translations,
            current_lang: effective_lang.to_string(),
        }
    }

    pub fn t(&self, key: &str) -> String {
        if let Some(lang_map) = self.translations.get(&self.current_lang) {
            if let Some(value) = lang_map.get(key) {
                return value.clone();
            }
        }
        key.to_string()
    }

    pub fn t_format(&self, key: &str, args: &[&str]) -> String {
        let template = self.t(key);
        let mut result = template;
        for (i, arg) in args.iter().enumerate() {
            result = result.replace(&format!("{{{}}}", i), arg);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_key_falls_back_to_the_key_itself() {
        let i18n = I18n::new("en");
        assert_eq!(i18n.t("definitely_missing"), "definitely_missing");
    }

    #[test]
    fn formatting_replaces_positional_arguments() {
        let i18n = I18n::new("en");
        assert_eq!(
            i18n.t_format("command_completed", &["128"]),
            "Command completed, exit code: 128"
        );
    }

    #[test]
    fn language_codes_are_normalized() {
        assert_eq!(I18n::new("zh_CN").t("no_history"), "没有历史记录");
        assert_eq!(I18n::new("en_US").t("no_history"), "No history");
        assert_eq!(I18n::new("fr_FR").t("no_history"), "No history");
    }
}
