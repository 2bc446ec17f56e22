pub mod middleware;
pub mod protocol;
pub mod rest;
pub mod router;
pub mod state;
pub mod sweeper;

// Re-export what the binary needs to assemble and run the server.
pub use router::build_router;
pub use state::AppState;
pub use sweeper::spawn_sweeper;
