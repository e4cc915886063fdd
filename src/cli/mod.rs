mod commands;
mod handlers;

pub use commands::{Cli, Commands, UserAction, UserCommand};
pub use handlers::{
    handle_init, handle_list, handle_serve, handle_tracker, handle_user_add, handle_user_list,
};
