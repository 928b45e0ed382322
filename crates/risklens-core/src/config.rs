use std::time::Duration;

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub endpoint: String,
    pub request_timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8000/clean_dataset_page/".to_string(),
            request_timeout: Duration::from_secs(8),
        }
    }
}
