pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    default_browser_command, expand_path, load_hosts_from_file, parse_host_line,
};

// Re-export run functionality from geotrawl-core
pub use geotrawl_core::run::{RendererKind, RunOptions, execute_run, generate_run_report};
