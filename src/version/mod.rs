//! Version tokens and the stylesheet/script URL rewriter that embeds them.

mod rewrite;
mod token;

pub use rewrite::{RewriteContext, append_version, rewrite_urls};
pub use token::{VersionToken, validate_token};
