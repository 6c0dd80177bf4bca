//! Listing data model and the raw wire shapes it is decoded from.
//!
//! The API returns pages as a `Listing` envelope wrapping "things"; only the
//! fields the pipeline consumes are decoded, everything else is ignored.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Media kind of a link, derived from the raw payload at decode time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Image,
    Gif,
    Album,
    SelfPost,
    LinkPost,
}

impl MediaKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Image => "image",
            Self::Gif => "gif",
            Self::Album => "album",
            Self::SelfPost => "selfpost",
            Self::LinkPost => "linkpost",
        }
    }
}

/// Pixel dimensions of a preview image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// One content item from a listing page. Immutable once decoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub subreddit: String,
    pub permalink: String,
    pub url: String,
    pub kind: MediaKind,
    pub self_text: Option<String>,
    pub preview_size: Option<ImageSize>,
    pub over_18: bool,
    pub created_at: Option<DateTime<Utc>>,
}

/// One page of links plus the cursor for the next page.
///
/// `after` is `None` when the server reports no further pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub links: Vec<Link>,
    pub after: Option<String>,
}

/// Sort mode applied to a listing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Hot,
    New,
    Rising,
    Controversial,
    Top,
}

impl ListingType {
    /// URL path segment for this sort; hot is the bare listing path.
    #[must_use]
    pub fn path(&self) -> &'static str {
        match self {
            Self::Hot => "",
            Self::New => "new",
            Self::Rising => "rising",
            Self::Controversial => "controversial",
            Self::Top => "top",
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::New => "new",
            Self::Rising => "rising",
            Self::Controversial => "controversial",
            Self::Top => "top",
        }
    }
}

impl Default for ListingType {
    fn default() -> Self {
        Self::Hot
    }
}

/// A subreddit as handed over by the navigation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subreddit {
    pub display_name: String,
    pub path: String,
}

/// A user-curated multireddit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Multireddit {
    pub name: String,
    pub path: String,
}

// ---------------------------------------------------------------------------
// Wire shapes

/// Raw listing envelope: `{"kind": "Listing", "data": {...}}`.
#[derive(Debug, Deserialize)]
pub struct RawListing {
    pub data: RawListingData,
}

#[derive(Debug, Deserialize)]
pub struct RawListingData {
    #[serde(default)]
    pub children: Vec<RawThing>,
    pub after: Option<String>,
}

/// A "thing" wrapper around one link (`kind` is `t3` for links).
#[derive(Debug, Deserialize)]
pub struct RawThing {
    pub data: RawLink,
}

/// The subset of raw link fields the pipeline consumes.
#[derive(Debug, Deserialize)]
pub struct RawLink {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub is_self: bool,
    #[serde(default)]
    pub is_video: bool,
    #[serde(default)]
    pub is_gallery: bool,
    pub post_hint: Option<String>,
    pub selftext: Option<String>,
    #[serde(default)]
    pub over_18: bool,
    pub created_utc: Option<f64>,
    pub preview: Option<RawPreview>,
}

#[derive(Debug, Deserialize)]
pub struct RawPreview {
    #[serde(default)]
    pub images: Vec<RawPreviewImage>,
}

#[derive(Debug, Deserialize)]
pub struct RawPreviewImage {
    pub source: RawImageSource,
}

#[derive(Debug, Deserialize)]
pub struct RawImageSource {
    pub width: u32,
    pub height: u32,
}

impl RawLink {
    /// Derive the media kind from the raw payload.
    ///
    /// Total over the raw field combinations: anything unrecognized falls
    /// through to `LinkPost`.
    fn media_kind(&self) -> MediaKind {
        if self.is_video {
            return MediaKind::Video;
        }
        if self.is_self {
            return MediaKind::SelfPost;
        }
        if self.is_gallery {
            return MediaKind::Album;
        }
        let url = self.url.to_ascii_lowercase();
        if url.ends_with(".gif") || url.ends_with(".gifv") {
            return MediaKind::Gif;
        }
        if self.post_hint.as_deref() == Some("image")
            || url.ends_with(".jpg")
            || url.ends_with(".jpeg")
            || url.ends_with(".png")
            || url.ends_with(".webp")
        {
            return MediaKind::Image;
        }
        MediaKind::LinkPost
    }
}

impl From<RawLink> for Link {
    fn from(raw: RawLink) -> Self {
        let kind = raw.media_kind();
        let preview_size = raw.preview.as_ref().and_then(|p| {
            p.images.first().map(|img| ImageSize {
                width: img.source.width,
                height: img.source.height,
            })
        });
        let created_at = raw
            .created_utc
            .and_then(|secs| Utc.timestamp_opt(secs as i64, 0).single());
        let self_text = raw.selftext.filter(|s| !s.is_empty());

        Self {
            id: raw.id,
            title: raw.title,
            author: raw.author,
            subreddit: raw.subreddit,
            permalink: raw.permalink,
            url: raw.url,
            kind,
            self_text,
            preview_size,
            over_18: raw.over_18,
            created_at,
        }
    }
}

impl From<RawListing> for Listing {
    fn from(raw: RawListing) -> Self {
        // An empty-string cursor means the same as a missing one.
        let after = raw.data.after.filter(|a| !a.is_empty());
        let links = raw
            .data
            .children
            .into_iter()
            .map(|thing| Link::from(thing.data))
            .collect();
        Self { links, after }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_link(json: serde_json::Value) -> RawLink {
        serde_json::from_value(json).expect("valid raw link")
    }

    #[test]
    fn test_media_kind_video() {
        let raw = raw_link(serde_json::json!({
            "id": "a", "title": "t", "is_video": true, "is_self": true
        }));
        assert_eq!(raw.media_kind(), MediaKind::Video);
    }

    #[test]
    fn test_media_kind_self_post() {
        let raw = raw_link(serde_json::json!({
            "id": "a", "title": "t", "is_self": true
        }));
        assert_eq!(raw.media_kind(), MediaKind::SelfPost);
    }

    #[test]
    fn test_media_kind_gif_beats_image_hint() {
        let raw = raw_link(serde_json::json!({
            "id": "a", "title": "t",
            "url": "https://i.example.com/clip.GIFV",
            "post_hint": "image"
        }));
        assert_eq!(raw.media_kind(), MediaKind::Gif);
    }

    #[test]
    fn test_media_kind_image_by_hint_and_extension() {
        let by_hint = raw_link(serde_json::json!({
            "id": "a", "title": "t",
            "url": "https://example.com/photo",
            "post_hint": "image"
        }));
        assert_eq!(by_hint.media_kind(), MediaKind::Image);

        let by_ext = raw_link(serde_json::json!({
            "id": "b", "title": "t",
            "url": "https://i.example.com/photo.png"
        }));
        assert_eq!(by_ext.media_kind(), MediaKind::Image);
    }

    #[test]
    fn test_media_kind_album() {
        let raw = raw_link(serde_json::json!({
            "id": "a", "title": "t", "is_gallery": true,
            "url": "https://example.com/gallery/xyz"
        }));
        assert_eq!(raw.media_kind(), MediaKind::Album);
    }

    #[test]
    fn test_media_kind_falls_back_to_link_post() {
        let raw = raw_link(serde_json::json!({
            "id": "a", "title": "t", "url": "https://example.com/article"
        }));
        assert_eq!(raw.media_kind(), MediaKind::LinkPost);
    }

    #[test]
    fn test_listing_conversion_keeps_order_and_cursor() {
        let raw: RawListing = serde_json::from_value(serde_json::json!({
            "kind": "Listing",
            "data": {
                "children": [
                    {"kind": "t3", "data": {"id": "one", "title": "first", "is_self": true}},
                    {"kind": "t3", "data": {"id": "two", "title": "second",
                        "url": "https://i.example.com/p.jpg"}}
                ],
                "after": "t3_two"
            }
        }))
        .unwrap();

        let listing = Listing::from(raw);
        assert_eq!(listing.after.as_deref(), Some("t3_two"));
        assert_eq!(listing.links.len(), 2);
        assert_eq!(listing.links[0].id, "one");
        assert_eq!(listing.links[0].kind, MediaKind::SelfPost);
        assert_eq!(listing.links[1].kind, MediaKind::Image);
    }

    #[test]
    fn test_empty_string_cursor_is_none() {
        let raw: RawListing = serde_json::from_value(serde_json::json!({
            "kind": "Listing",
            "data": {"children": [], "after": ""}
        }))
        .unwrap();
        assert!(Listing::from(raw).after.is_none());
    }

    #[test]
    fn test_preview_size_decoded() {
        let raw = raw_link(serde_json::json!({
            "id": "a", "title": "t",
            "url": "https://i.example.com/p.jpg",
            "preview": {"images": [{"source": {"url": "u", "width": 640, "height": 480}}]}
        }));
        let link = Link::from(raw);
        assert_eq!(
            link.preview_size,
            Some(ImageSize {
                width: 640,
                height: 480
            })
        );
    }

    #[test]
    fn test_listing_type_paths() {
        assert_eq!(ListingType::Hot.path(), "");
        assert_eq!(ListingType::New.path(), "new");
        assert_eq!(ListingType::Top.path(), "top");
        assert_eq!(ListingType::default(), ListingType::Hot);
    }
}
