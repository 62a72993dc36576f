//! Inline keyboard builders: dynamic menu grids, the start menu with its
//! fallback buttons, and the pickers used by the admin flows.

use std::collections::HashSet;

use panel_client::Inbound;
use panelbot_core::{Button, Keyboard};
use storage::MenuButton;

/// Purchase entry on the start menu.
pub const BUY_TARGET: &str = "buy_config_main";
/// Free-trial entry; hidden unless the trial switch is on.
pub const FREE_TRIAL_TARGET: &str = "get_free_config";

const START_FALLBACKS: [(&str, &str); 6] = [
    ("my_services", "\u{1F4DD} My services"),
    ("wallet_menu", "\u{1F4B3} Wallet"),
    ("support_menu", "\u{1F4AC} Support"),
    ("tutorials_menu", "\u{1F4D6} Tutorials"),
    ("referral_menu", "\u{1F517} Invite friends"),
    ("reseller_menu", "\u{1F4B5} Become a reseller"),
];

/// Telegram rejects inline keyboards with more rows than this, so stored rows
/// beyond it are dropped rather than sized for.
const MAX_GRID_ROWS: i64 = 100;

/// Lays dynamic buttons out on their 1-based (row, col) grid. Buttons with a
/// row outside `1..=MAX_GRID_ROWS` are dropped; empty rows collapse.
pub fn layout_buttons(buttons: &[MenuButton]) -> Keyboard {
    let max_row = buttons
        .iter()
        .map(|b| b.row)
        .filter(|r| (1..=MAX_GRID_ROWS).contains(r))
        .max()
        .unwrap_or(0);
    if max_row < 1 {
        return Keyboard::new();
    }

    let mut sorted: Vec<&MenuButton> = buttons.iter().collect();
    sorted.sort_by_key(|b| (b.row, b.col));

    let mut rows: Vec<Vec<Button>> = vec![Vec::new(); max_row as usize];
    for button in sorted {
        if !(1..=max_row).contains(&button.row) {
            continue;
        }
        let entry = if button.is_url {
            Button::url(&button.text, &button.target)
        } else {
            Button::callback(&button.text, &button.target)
        };
        rows[(button.row - 1) as usize].push(entry);
    }

    let mut keyboard = Keyboard::new();
    for row in rows {
        if !row.is_empty() {
            keyboard = keyboard.row(row);
        }
    }
    keyboard
}

/// Start menu: operator-defined buttons plus fallback defaults for the core
/// targets. A fallback is added only when no stored button already points at
/// its target, so operators can re-label or re-place any of them.
pub fn build_start_menu_keyboard(buttons: &[MenuButton], trial_enabled: bool) -> Keyboard {
    let visible: Vec<MenuButton> = buttons
        .iter()
        .filter(|b| trial_enabled || b.target != FREE_TRIAL_TARGET)
        .cloned()
        .collect();

    let mut keyboard = layout_buttons(&visible);
    let existing: HashSet<&str> = visible.iter().map(|b| b.target.as_str()).collect();

    let mut top_row = Vec::new();
    if !existing.contains(BUY_TARGET) {
        top_row.push(Button::callback("\u{1F4E1} Buy config", BUY_TARGET));
    }
    if trial_enabled && !existing.contains(FREE_TRIAL_TARGET) {
        top_row.push(Button::callback("\u{1F381} Free trial", FREE_TRIAL_TARGET));
    }
    if !top_row.is_empty() {
        keyboard = keyboard.row(top_row);
    }

    let mut row = Vec::new();
    for (target, label) in START_FALLBACKS {
        if existing.contains(target) {
            continue;
        }
        row.push(Button::callback(label, target));
        if row.len() == 2 {
            keyboard = keyboard.row(std::mem::take(&mut row));
        }
    }
    if !row.is_empty() {
        keyboard = keyboard.row(row);
    }

    keyboard
}

/// Dialect picker shown during panel registration. Callback data encodes the
/// stored `panel_type` value.
pub fn panel_type_keyboard() -> Keyboard {
    Keyboard::new()
        .row(vec![
            Button::callback("x-ui (Sanaei/Alireza)", "panel_type_xui"),
            Button::callback("3x-ui", "panel_type_3xui"),
        ])
        .row(vec![
            Button::callback("tx-ui", "panel_type_txui"),
            Button::callback("Netico", "panel_type_netico"),
        ])
}

/// Picker of inbounds fetched from a freshly registered panel, one per row,
/// plus a cancel row.
pub fn inbound_picker_keyboard(inbounds: &[Inbound]) -> Keyboard {
    let mut keyboard = Keyboard::new();
    for inbound in inbounds {
        keyboard = keyboard.row(vec![Button::callback(
            inbound.display_name(),
            format!("panel_inbound_{}", inbound.id),
        )]);
    }
    keyboard.row(vec![Button::callback("Cancel", "cancel")])
}

/// Join-gate keyboard: an optional join-URL button plus the recheck button.
pub fn join_gate_keyboard(join_url: Option<&str>) -> Keyboard {
    let mut keyboard = Keyboard::new();
    if let Some(url) = join_url {
        keyboard = keyboard.row(vec![Button::url("\u{1F195} Join the channel", url)]);
    }
    keyboard.row(vec![Button::callback("\u{2705} I joined", "check_join")])
}
