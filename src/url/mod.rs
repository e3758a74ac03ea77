//! URL handling module for Blog-Harvest
//!
//! This module builds the listing, post and comments URLs of a blog from its
//! configuration, and turns post links back into post identifiers.

mod post_id;

pub use post_id::post_id_from_link;

use crate::config::SiteConfig;
use crate::Result;
use url::Url;

/// Resolved addresses of a single blog
#[derive(Debug, Clone)]
pub struct SiteUrls {
    base: Url,
    page_query: String,
    comments_path: String,
    blog_id: String,
}

impl SiteUrls {
    /// Builds the URL set for a site configuration
    ///
    /// # Returns
    ///
    /// * `Ok(SiteUrls)` - The base URL parsed and a blog id is known
    /// * `Err(HarvestError)` - The base URL is malformed or no blog id is available
    pub fn from_config(site: &SiteConfig) -> Result<Self> {
        let base = Url::parse(&site.base_url)?;
        let blog_id = blog_id_for(site, &base).ok_or_else(|| {
            crate::ConfigError::Validation(format!(
                "cannot derive a blog id from {}",
                site.base_url
            ))
        })?;

        Ok(Self {
            base,
            page_query: site.page_query.clone(),
            comments_path: site.comments_path.clone(),
            blog_id,
        })
    }

    /// The blog's base URL
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// The blog identifier used by the comments endpoint
    pub fn blog_id(&self) -> &str {
        &self.blog_id
    }

    /// URL of listing page `page`
    ///
    /// # Examples
    ///
    /// ```
    /// use blog_harvest::config::parse_config;
    /// use blog_harvest::url::SiteUrls;
    ///
    /// let config = parse_config("[site]\nbase-url = \"http://myblog.blogfa.com/\"").unwrap();
    /// let urls = SiteUrls::from_config(&config.site).unwrap();
    /// assert_eq!(urls.listing_url(3).unwrap().as_str(), "http://myblog.blogfa.com/?p=3");
    /// ```
    pub fn listing_url(&self, page: u32) -> Result<Url> {
        let suffix = self.page_query.replace("{page}", &page.to_string());
        Ok(self.base.join(&suffix)?)
    }

    /// URL of the post page a listing link points to
    pub fn post_url(&self, link: &str) -> Result<Url> {
        Ok(self.base.join(link)?)
    }

    /// URL of the comments listing for a post
    pub fn comments_url(&self, post_id: &str) -> Result<Url> {
        let suffix = self
            .comments_path
            .replace("{blog}", &self.blog_id)
            .replace("{post}", post_id);
        Ok(self.base.join(&suffix)?)
    }
}

/// Returns the configured blog id, or the first label of the base URL host
///
/// `shabeasheghan.blogfa.com` yields `shabeasheghan`. IP hosts and single-label
/// hosts such as `localhost` yield `None` unless a blog id is configured.
pub fn blog_id_for(site: &SiteConfig, base: &Url) -> Option<String> {
    if let Some(id) = site.blog_id.as_deref().map(str::trim) {
        return (!id.is_empty()).then(|| id.to_string());
    }

    match base.host()? {
        url::Host::Domain(domain) => {
            let (label, rest) = domain.split_once('.')?;
            (!label.is_empty() && !rest.is_empty()).then(|| label.to_lowercase())
        }
        _ => None,
    }
}
