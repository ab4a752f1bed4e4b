pub mod backend_client;
pub mod transport;

pub use backend_client::BackendClient;
pub use transport::Transport;
