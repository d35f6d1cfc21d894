use tracing::{debug, error, info, warn};

/// Logs command start with consistent format
pub fn log_command_start(command: &str, user: &str, user_id: i64, chat_id: i64, details: Option<&str>) {
    match details {
        Some(d) => info!(
            "CMD_START: {} by {}({}) in chat {} - {}",
            command, user, user_id, chat_id, d
        ),
        None => info!(
            "CMD_START: {} by {}({}) in chat {}",
            command, user, user_id, chat_id
        ),
    }
}

/// Logs command completion with consistent format
pub fn log_command_success(command: &str, user: &str, user_id: i64, chat_id: i64, details: Option<&str>) {
    match details {
        Some(d) => info!(
            "CMD_SUCCESS: {} by {}({}) in chat {} - {}",
            command, user, user_id, chat_id, d
        ),
        None => info!(
            "CMD_SUCCESS: {} by {}({}) in chat {}",
            command, user, user_id, chat_id
        ),
    }
}

/// Logs command errors with consistent format
pub fn log_command_error(command: &str, user: &str, user_id: i64, chat_id: i64, error: &str) {
    error!(
        "CMD_ERROR: {} by {}({}) in chat {} - {}",
        command, user, user_id, chat_id, error
    );
}

/// Logs a privileged command refused to a non-admin
pub fn log_auth_denied(command: &str, user: &str, user_id: i64, chat_id: i64) {
    warn!(
        "AUTH_DENIED: {} by {}({}) in chat {}",
        command, user, user_id, chat_id
    );
}

/// Logs validation errors with consistent format
pub fn log_validation_error(command: &str, error: &str, user: &str, user_id: i64, chat_id: i64) {
    warn!(
        "VALIDATION_ERROR: {} - {} - user {}({}) in chat {}",
        command, error, user, user_id, chat_id
    );
}

/// Logs roster writes with consistent format
pub fn log_roster_operation(operation: &str, chat_id: i64, details: Option<&str>) {
    match details {
        Some(d) => debug!("ROSTER_OP: {} in chat {} - {}", operation, chat_id, d),
        None => debug!("ROSTER_OP: {} in chat {}", operation, chat_id),
    }
}

/// Logs roster persistence errors with consistent format
pub fn log_roster_error(operation: &str, error: &str, details: Option<&str>) {
    match details {
        Some(d) => error!("ROSTER_ERROR: {} failed: {} - {}", operation, error, d),
        None => error!("ROSTER_ERROR: {} failed: {}", operation, error),
    }
}

/// Logs system events with consistent format
pub fn log_system_event(event: &str, details: Option<&str>) {
    match details {
        Some(d) => info!("SYSTEM: {} - {}", event, d),
        None => info!("SYSTEM: {}", event),
    }
}
