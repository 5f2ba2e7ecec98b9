//! Blogharvest core: pure run state machine, platform rules and naming helpers.
mod cursor;
mod effect;
mod filename;
mod image;
mod labels;
mod mode;
mod msg;
mod platform;
mod state;
mod update;

pub use cursor::{PageCursor, DEFAULT_PAGE_SIZE, FIRST_START_INDEX};
pub use effect::{Effect, MetadataFormat};
pub use filename::{
    document_filename, image_file_name, post_folder_name, sanitize_filename, sanitize_url_filename,
    site_folder_name,
};
pub use image::{image_media_type, is_supported_image, url_extension, IMAGE_EXTENSIONS};
pub use labels::label_feed_url;
pub use mode::{ExportMode, UnknownMode};
pub use msg::Msg;
pub use platform::{
    classify_markup, feed_candidates, join_feed_path, Marker, Platform, SiteRule,
    BLOGGER_FEED_SUFFIX, SITE_RULES,
};
pub use state::{RunPhase, RunState};
pub use update::update;
