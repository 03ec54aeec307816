use std::fmt::{ Debug, Display };

/// Standard format for activity logs: component - message: details
pub fn log_activity(component: &str, message: &str, details: Option<&str>) {
    let details_str = details.unwrap_or("");
    log::info!("{} - {}: {}", component, message, details_str);
}

/// Standard format for error logs: component - ERROR - context: error
pub fn log_error(component: &str, context: &str, err: &dyn Display) {
    log::error!("{} - ERROR - {}: {}", component, context, err);
}

/// Log debug information
pub fn log_debug<T: Debug>(component: &str, context: &str, details: &T) {
    if log::log_enabled!(log::Level::Debug) {
        log::debug!("{} - {} - Details: {:?}", component, context, details);
    }
}
