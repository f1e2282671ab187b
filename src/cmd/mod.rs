//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module     | Commands handled                            |
//! |------------|---------------------------------------------|
//! | `tasks`    | `AddTask`, `ShowTasks`, `CompleteTask`      |
//! | `progress` | `ShowProgress`                              |
//! | `menu`     | `Menu` (also the default with no command)   |
//! | `config`   | `Config`                                    |

pub mod config;
pub mod menu;
pub mod progress;
pub mod tasks;

pub use config::cmd_config;
pub use menu::cmd_menu;
pub use progress::cmd_show_progress;
pub use tasks::{cmd_add_task, cmd_complete_task, cmd_show_tasks};
