//! One menu interaction.
//!
//! Opening the menu fetches `{config, menus}` once over the bridge.
//! Items then run against that snapshot; a new menu fetches again.

use super::locale::Notice;
use super::{ActionDispatcher, ActionResult};
use crate::bridge::{Bridge, BridgeError, Request};
use crate::config::{menu::visible_items, Configuration, MenuContext, MenuItem, StorageData};

#[derive(Debug, Clone)]
pub struct MenuSession {
    context: MenuContext,
    selected_text: String,
    config: Configuration,
    items: Vec<MenuItem>,
}

impl MenuSession {
    /// Fetch settings and pick the menu for `selected_text`.
    ///
    /// A refused GET_STORAGE falls back to the built-in defaults. Only
    /// a broken bridge is an error.
    pub async fn open(bridge: &dyn Bridge, selected_text: &str) -> Result<Self, BridgeError> {
        let response = bridge.send(Request::GetStorage).await?;
        let data = match response.data {
            Some(data) if response.success => data,
            _ => {
                log::warn!(
                    "[ACTION] GET_STORAGE refused ({}), using defaults",
                    response.error.as_deref().unwrap_or("no data")
                );
                StorageData::default()
            }
        };

        let context = MenuContext::for_selection(selected_text);
        let items = visible_items(data.menu(context));
        log::info!("[ACTION] Menu opened: {:?}, {} items", context, items.len());

        Ok(Self {
            context,
            selected_text: selected_text.to_string(),
            config: data.config,
            items,
        })
    }

    pub fn context(&self) -> MenuContext {
        self.context
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Visible items, in render order.
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Run the item with `item_id` against this session's snapshot.
    pub async fn run(&self, dispatcher: &ActionDispatcher, item_id: &str) -> ActionResult {
        match self.items.iter().find(|i| i.id == item_id) {
            Some(item) => {
                dispatcher
                    .execute_action(item.action, &self.selected_text, &self.config)
                    .await
            }
            None => {
                log::warn!("[ACTION] No menu item '{}' in this menu", item_id);
                ActionResult::error(Notice::UnknownAction.text(&self.config))
            }
        }
    }
}
