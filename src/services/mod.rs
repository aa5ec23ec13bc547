//! Service layer: free functions bridging routes and sockets to the core.

/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Core session lifecycle, action dispatch, and snapshot fan-out.
pub mod session_service;
/// WebSocket connection and message handling service.
pub mod websocket_service;
