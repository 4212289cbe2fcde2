//! User-visible notices, in Chinese and English.
//!
//! Chinese is used when the preferred language is a `zh*` tag.

use super::ActionId;
use crate::config::Configuration;

/// Short texts the dispatcher can show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Text action invoked without a selection.
    SelectTextFirst(ActionId),
    NothingSelected,
    CopiedToClipboard,
    CopyFailed,
    AiRequestFailed,
    MissingApiKey,
    NoAiResult,
    RequestFailed(String),
    TabsOpen(usize),
    GetTabsFailed,
    HistoryOpened,
    HistoryFailed,
    NewTabOpened,
    NewTabFailed,
    ScreenshotSaved,
    ScreenshotFailed,
    BookmarkAdded,
    BookmarkFailed,
    SettingsOpened,
    SettingsFailed,
    UnknownAction,
}

impl Notice {
    pub fn text(&self, config: &Configuration) -> String {
        if config.prefers_chinese() {
            self.zh()
        } else {
            self.en()
        }
    }

    fn zh(&self) -> String {
        match self {
            Notice::SelectTextFirst(action) => match action {
                ActionId::Translate => "请先选择要翻译的文字".into(),
                ActionId::Summarize => "请先选择要总结的文字".into(),
                ActionId::Explain => "请先选择要解释的文字".into(),
                ActionId::Rewrite => "请先选择要改写的文字".into(),
                ActionId::CodeExplain => "请先选择要解释的代码".into(),
                _ => "请先选择文字".into(),
            },
            Notice::NothingSelected => "没有选中的文字".into(),
            Notice::CopiedToClipboard => "已复制到剪贴板".into(),
            Notice::CopyFailed => "复制失败".into(),
            Notice::AiRequestFailed => "AI 请求失败".into(),
            Notice::MissingApiKey => "未配置 API 密钥，请在设置中添加".into(),
            Notice::NoAiResult => "AI 没有返回结果".into(),
            Notice::RequestFailed(detail) => format!("请求失败: {}", detail),
            Notice::TabsOpen(n) => format!("打开了 {} 个标签页", n),
            Notice::GetTabsFailed => "获取标签页失败".into(),
            Notice::HistoryOpened => "已打开历史记录".into(),
            Notice::HistoryFailed => "打开历史记录失败".into(),
            Notice::NewTabOpened => "已打开新标签页".into(),
            Notice::NewTabFailed => "打开新标签页失败".into(),
            Notice::ScreenshotSaved => "截图已保存".into(),
            Notice::ScreenshotFailed => "截图失败".into(),
            Notice::BookmarkAdded => "已添加书签".into(),
            Notice::BookmarkFailed => "添加书签失败".into(),
            Notice::SettingsOpened => "已打开设置页面".into(),
            Notice::SettingsFailed => "打开设置页面失败".into(),
            Notice::UnknownAction => "未知操作".into(),
        }
    }

    fn en(&self) -> String {
        match self {
            Notice::SelectTextFirst(action) => match action {
                ActionId::Translate => "Select some text to translate first".into(),
                ActionId::Summarize => "Select some text to summarize first".into(),
                ActionId::Explain => "Select some text to explain first".into(),
                ActionId::Rewrite => "Select some text to rewrite first".into(),
                ActionId::CodeExplain => "Select some code to explain first".into(),
                _ => "Select some text first".into(),
            },
            Notice::NothingSelected => "Nothing selected".into(),
            Notice::CopiedToClipboard => "Copied to clipboard".into(),
            Notice::CopyFailed => "Copy failed".into(),
            Notice::AiRequestFailed => "AI request failed".into(),
            Notice::MissingApiKey => "API key not configured. Add one in Settings.".into(),
            Notice::NoAiResult => "No response from AI".into(),
            Notice::RequestFailed(detail) => format!("Request failed: {}", detail),
            Notice::TabsOpen(n) => format!("{} tabs open", n),
            Notice::GetTabsFailed => "Could not list tabs".into(),
            Notice::HistoryOpened => "History opened".into(),
            Notice::HistoryFailed => "Could not open history".into(),
            Notice::NewTabOpened => "New tab opened".into(),
            Notice::NewTabFailed => "Could not open a new tab".into(),
            Notice::ScreenshotSaved => "Screenshot saved".into(),
            Notice::ScreenshotFailed => "Screenshot failed".into(),
            Notice::BookmarkAdded => "Bookmark added".into(),
            Notice::BookmarkFailed => "Could not add bookmark".into(),
            Notice::SettingsOpened => "Settings opened".into(),
            Notice::SettingsFailed => "Could not open settings".into(),
            Notice::UnknownAction => "Unknown action".into(),
        }
    }
}
