// config.rs
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub poll_interval_secs: u64,
    pub session_file: PathBuf,
}

impl Config {
    pub fn init() -> Config {
        let api_base_url = std::env::var("FRELANCI_API_URL")
            .unwrap_or_else(|_| "https://frelanci-backend.onrender.com/api".to_string());

        let request_timeout_secs = std::env::var("FRELANCI_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let poll_interval_secs = std::env::var("FRELANCI_POLL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(5);

        let session_file = std::env::var("FRELANCI_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_session_file());

        Config {
            api_base_url,
            request_timeout_secs,
            poll_interval_secs,
            session_file,
        }
    }
}

fn default_session_file() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("frelanci");
    path.push("session.json");
    path
}
