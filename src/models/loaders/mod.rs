pub mod toml_loader;

pub use toml_loader::{load_catalog_overrides, parse_catalog_overrides};
