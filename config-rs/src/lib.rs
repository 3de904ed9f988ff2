//! config-rs/lib.rs
//! Shared configuration utilities for consistent service configuration
//! Provides standardized functions for port/address management

use std::env;
use std::net::SocketAddr;

/// Get service port from environment variables with proper fallback
///
/// # Arguments
/// * `service_name` - The name of the service (e.g., "MENTOR")
/// * `default_port` - The default port to use if not specified in environment
///
/// # Returns
/// The port number to use for the service
pub fn get_service_port(service_name: &str, default_port: u16) -> u16 {
    let var_name = format!("{}_SERVICE_PORT", service_name.to_uppercase());
    env::var(&var_name)
        .unwrap_or_else(|_| default_port.to_string())
        .parse::<u16>()
        .unwrap_or_else(|_| {
            log::warn!("Invalid port in {}, using default {}", var_name, default_port);
            default_port
        })
}

/// Create a SocketAddr for binding a service
///
/// # Arguments
/// * `service_name` - The name of the service (e.g., "MENTOR")
/// * `default_port` - The default port to use if not specified in environment
///
/// # Returns
/// A SocketAddr configured with the appropriate bind address and port
pub fn get_bind_address(service_name: &str, default_port: u16) -> SocketAddr {
    let var_name = format!("{}_SERVICE_ADDR", service_name.to_uppercase());

    // Check if there's a full address override
    if let Ok(addr_str) = env::var(&var_name) {
        if let Ok(addr) = addr_str.parse::<SocketAddr>() {
            return addr;
        } else {
            // Check if it's in http://host:port format
            if addr_str.starts_with("http://") || addr_str.starts_with("https://") {
                let addr_parts = addr_str.split("://").collect::<Vec<&str>>();
                if addr_parts.len() > 1 {
                    if let Ok(addr) = addr_parts[1].parse::<SocketAddr>() {
                        return addr;
                    }
                }
            }
            log::warn!("Invalid address format in {}, using default", var_name);
        }
    }

    // Use the port from environment or default
    let port = get_service_port(service_name, default_port);
    format!("0.0.0.0:{}", port).parse().unwrap()
}

/// Get client connection address for connecting to a service
///
/// # Arguments
/// * `service_name` - The name of the service (e.g., "MENTOR")
/// * `default_port` - The default port to use if not specified in environment
/// * `host` - Optional host to use if not specified in environment (default: "localhost")
///
/// # Returns
/// A connection string for the client to connect to the service
pub fn get_client_address(service_name: &str, default_port: u16, host: Option<&str>) -> String {
    let addr_var_name = format!("{}_SERVICE_ADDR", service_name.to_uppercase());
    let port_var_name = format!("{}_SERVICE_PORT", service_name.to_uppercase());

    // First check if there's a full address override
    if let Ok(addr) = env::var(&addr_var_name) {
        return addr;
    }

    // Then check for port override
    let port = env::var(&port_var_name)
        .unwrap_or_else(|_| default_port.to_string())
        .parse::<u16>()
        .unwrap_or(default_port);

    // Build the address with the host (default to localhost if not provided)
    let host = host.unwrap_or("localhost");
    format!("http://{}:{}", host, port)
}

/// Get default port for a specific service
///
/// # Arguments
/// * `service_name` - The name of the service (e.g., "MENTOR")
///
/// # Returns
/// The default port for the service
pub fn get_default_port(service_name: &str) -> u16 {
    match service_name.to_uppercase().as_str() {
        "MENTOR" => 8000,
        _ => 50100, // Unknown services start at 50100
    }
}
