mod menu;
mod panel;
mod user;

pub use menu::{MenuButton, MenuMessage};
pub use panel::{InboundRecord, NewPanel, PanelRecord};
pub use user::UserRecord;
