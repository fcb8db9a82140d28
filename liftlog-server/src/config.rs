use std::net::SocketAddr;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://liftlog.db";
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8080";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    pub database_url: String,
}
