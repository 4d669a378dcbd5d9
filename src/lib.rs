#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod access;
pub mod composer;
pub mod config;
pub mod content_type;
pub mod error;
pub mod models;
pub mod paths;
pub mod resolver;
pub mod tags;
pub mod version;

pub use access::Environment;
pub use composer::{AssetComposer, UnknownTypes};
pub use config::{ComposerConfig, UrlStyle};
pub use error::{AssetError, ErrorKind};
pub use models::{AssetReference, AssetResponse, ResolvedAsset};
pub use resolver::Resolver;
pub use tags::AssetTags;
pub use version::VersionToken;
