use std::fmt;

/// Content-management family of a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Blogger / Blogspot, including custom domains.
    Blogger,
    WordPress,
    Joomla,
    Drupal,
    Unknown,
}

impl Platform {
    /// Only Blogger feeds understand `start-index`/`max-results`.
    pub fn supports_offset_pagination(self) -> bool {
        matches!(self, Platform::Blogger)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::Blogger => "blogspot",
            Platform::WordPress => "wordpress",
            Platform::Joomla => "joomla",
            Platform::Drupal => "drupal",
            Platform::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Where a marker is looked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Substring of the lower-cased home page markup.
    Markup(&'static str),
    /// Substring of the site URL.
    Url(&'static str),
}

impl Marker {
    fn matches(self, url: &str, markup_lower: &str) -> bool {
        match self {
            Marker::Markup(needle) => markup_lower.contains(needle),
            Marker::Url(needle) => url.contains(needle),
        }
    }
}

/// One classification rule: any marker matching selects the platform.
#[derive(Debug, Clone, Copy)]
pub struct SiteRule {
    pub platform: Platform,
    pub markers: &'static [Marker],
}

/// Evaluated in order; the first rule with a matching marker wins.
pub const SITE_RULES: &[SiteRule] = &[
    SiteRule {
        platform: Platform::Blogger,
        markers: &[Marker::Markup("blogger.com"), Marker::Url("blogspot")],
    },
    SiteRule {
        platform: Platform::WordPress,
        markers: &[Marker::Markup("wp-content"), Marker::Markup("wordpress")],
    },
    SiteRule {
        platform: Platform::Joomla,
        markers: &[Marker::Markup("joomla")],
    },
    SiteRule {
        platform: Platform::Drupal,
        markers: &[Marker::Markup("drupal")],
    },
];

/// Classify a site from its URL and home page markup.
pub fn classify_markup(url: &str, markup: &str) -> Platform {
    let lower = markup.to_lowercase();
    SITE_RULES
        .iter()
        .find(|rule| rule.markers.iter().any(|m| m.matches(url, &lower)))
        .map(|rule| rule.platform)
        .unwrap_or(Platform::Unknown)
}

/// Native Blogger feed path, probed before anything else.
pub const BLOGGER_FEED_SUFFIX: &str = "/feeds/posts/default?alt=rss";

const WORDPRESS_FEEDS: &[&str] = &["/feed/", "/comments/feed/"];
const JOOMLA_FEEDS: &[&str] = &["/index.php?option=com_rss&feed=rss"];
const DRUPAL_FEEDS: &[&str] = &["/rss.xml"];
const GENERIC_FEEDS: &[&str] = &["/feed/", "/rss.xml", "/atom.xml", "/feeds/"];

/// Ordered feed path suffixes worth probing for a platform.
pub fn feed_candidates(platform: Platform) -> &'static [&'static str] {
    match platform {
        Platform::WordPress => WORDPRESS_FEEDS,
        Platform::Joomla => JOOMLA_FEEDS,
        Platform::Drupal => DRUPAL_FEEDS,
        // Blogger is only reachable through its native feed.
        Platform::Blogger => &[],
        Platform::Unknown => GENERIC_FEEDS,
    }
}

/// `base` without trailing slashes, followed by `suffix`.
pub fn join_feed_path(base: &str, suffix: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), suffix)
}
