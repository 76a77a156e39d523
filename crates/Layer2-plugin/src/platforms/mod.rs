//! Platform implementations of [`DataWedgePlugin`](crate::DataWedgePlugin)

mod native;
mod web;

pub use native::NativePlugin;
pub use web::WebFallback;
