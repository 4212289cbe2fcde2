//! Menu items and the two built-in menus.
//!
//! The selection menu is shown when text is selected, the global menu
//! otherwise. Order is render order.

use serde::{Deserialize, Serialize};

use crate::actions::ActionId;

/// One user-configurable entry in a menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub label: String,
    pub action: ActionId,
    pub icon: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl MenuItem {
    fn builtin(action: ActionId, label: &str, icon: &str, order: u32) -> Self {
        Self {
            id: action.as_str().to_string(),
            label: label.to_string(),
            action,
            icon: icon.to_string(),
            order,
            enabled: true,
        }
    }
}

/// Which of the two menus to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuContext {
    Selection,
    Global,
}

impl MenuContext {
    /// Selection menu when there is real selected text.
    pub fn for_selection(selected_text: &str) -> Self {
        if selected_text.trim().is_empty() {
            MenuContext::Global
        } else {
            MenuContext::Selection
        }
    }
}

pub fn default_selection_menu() -> Vec<MenuItem> {
    vec![
        MenuItem::builtin(ActionId::Translate, "翻译", "language", 0),
        MenuItem::builtin(ActionId::Summarize, "总结", "sparkles", 1),
        MenuItem::builtin(ActionId::Explain, "解释", "lightbulb", 2),
        MenuItem::builtin(ActionId::Rewrite, "改写", "edit", 3),
        MenuItem::builtin(ActionId::CodeExplain, "代码解释", "code", 4),
        MenuItem::builtin(ActionId::Search, "搜索", "search", 5),
        MenuItem::builtin(ActionId::Copy, "复制", "clipboard", 6),
        MenuItem::builtin(ActionId::SendToAi, "发送到 AI", "link", 7),
    ]
}

pub fn default_global_menu() -> Vec<MenuItem> {
    vec![
        MenuItem::builtin(ActionId::SwitchTab, "切换标签页", "tabs", 0),
        MenuItem::builtin(ActionId::SummarizePage, "总结页面", "file", 1),
        MenuItem::builtin(ActionId::AiChat, "AI 对话", "sparkles", 2),
        MenuItem::builtin(ActionId::History, "历史记录", "clock", 3),
        MenuItem::builtin(ActionId::Screenshot, "截图", "eye", 4),
        MenuItem::builtin(ActionId::Bookmark, "添加书签", "bookmark", 5),
        MenuItem::builtin(ActionId::NewTab, "新标签页", "plus", 6),
        MenuItem::builtin(ActionId::Settings, "设置", "settings", 7),
    ]
}

/// Visible items in render order: ascending `order`, ties keep list position.
pub fn visible_items(items: &[MenuItem]) -> Vec<MenuItem> {
    let mut visible: Vec<MenuItem> = items.iter().filter(|i| i.enabled).cloned().collect();
    visible.sort_by_key(|i| i.order);
    visible
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_action_once() {
        let mut actions: Vec<ActionId> = default_selection_menu()
            .into_iter()
            .chain(default_global_menu())
            .map(|i| i.action)
            .collect();
        actions.sort_by_key(|a| a.as_str());
        actions.dedup();
        assert_eq!(actions.len(), ActionId::ALL.len());
    }

    #[test]
    fn visible_items_sort_stably_and_hide_disabled() {
        let mut items = default_selection_menu();
        items[0].order = 9;
        items[1].enabled = false;
        items[2].order = 3; // ties with rewrite, keeps list position

        let visible = visible_items(&items);
        let ids: Vec<&str> = visible.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["explain", "rewrite", "codeExplain", "search", "copy", "sendToAI", "translate"]
        );
    }

    #[test]
    fn menu_item_wire_shape() {
        let json = serde_json::json!({
            "id": "t", "label": "T", "action": "sendToAI", "icon": "link"
        });
        let item: MenuItem = serde_json::from_value(json).unwrap();
        assert_eq!(item.action, ActionId::SendToAi);
        assert_eq!(item.order, 0);
        assert!(item.enabled);
    }

    #[test]
    fn context_follows_selection() {
        assert_eq!(MenuContext::for_selection("hi"), MenuContext::Selection);
        assert_eq!(MenuContext::for_selection(" \n"), MenuContext::Global);
    }
}
