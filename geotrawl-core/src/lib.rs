pub mod classify;
pub mod error;
pub mod extract;
pub mod gps;
pub mod links;
pub mod model;
pub mod pipeline;
pub mod run;
pub mod store;

pub use error::PipelineError;
pub use model::{ClassifiedUrl, ClassifiedUrls, Coordinate, GpsRecord, MapLink, UrlKind};
pub use pipeline::{HostOutcome, HostSummary, Pipeline, PipelineConfig};
pub use store::RecordStore;

pub fn print_banner() {
    println!(
        r#"
   ___  ___  ___  _____ ___  ___ __      __ _
  / __|| __|/ _ \|_   _|| _ \/   \\ \    / /| |
 | (_ || _|| (_) | | |  |   /| - | \ \/\/ / | |__
  \___||___|\___/  |_|  |_|_\|_|_|  \_/\_/  |____|
                                        v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
