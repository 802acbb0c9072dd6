pub mod augment;
pub mod server;

use std::path::PathBuf;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        token_url: String,
        session_url: String,
        dashboard_url: String,
    },
    Augment {
        root: PathBuf,
    },
}
