pub mod app;
pub mod cli;
pub mod constants;
pub mod gateway;
pub mod session;
pub mod tui;
pub mod utils;

pub use app::{load_config, Config};
pub use gateway::{HttpGateway, QueryGateway};
pub use session::{ConversationController, SessionStore};
pub use tui::run_ui;
pub use utils::{GatewayError, ProcuraError};
