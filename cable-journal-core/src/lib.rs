pub mod dialogs;
pub mod errors;
pub mod gateway;
pub mod ipc;
pub mod models;
pub mod naming;

pub use dialogs::*;
pub use errors::*;
pub use gateway::*;
pub use ipc::*;
pub use models::*;
pub use naming::*;
