pub mod forecast;
pub mod main_chart;
pub mod realtime;
pub mod spec;
pub mod style;

pub use forecast::*;
pub use main_chart::*;
pub use realtime::*;
pub use spec::*;
