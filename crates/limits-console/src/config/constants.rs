pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/v1/metadata";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
