// Handlers module

pub mod messages;
pub mod oauth;

pub use messages::{
    delete_handler, edit_handler, messages_handler, schedule_handler, send_handler,
};
pub use oauth::{callback_handler, login_handler};
