pub mod config;
pub mod error;
pub mod headless;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod transport;
pub mod tui;

pub use config::*;
pub use error::*;
pub use headless::*;
pub use logging::*;
pub use metrics::*;
pub use pipeline::*;
pub use transport::*;
pub use tui::*;
