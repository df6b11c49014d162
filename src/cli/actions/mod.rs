pub mod server;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        max_attempts: u32,
        lockout_seconds: u64,
        audit_log: Option<String>,
    },
}
