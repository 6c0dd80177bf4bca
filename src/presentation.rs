//! Display-ready representations of fetched links.
//!
//! Classification is a closed dispatch over [`MediaKind`]; every link maps
//! to exactly one variant. Models are read-only after construction except
//! for the auxiliary signals resolved by [`PresentationModel::preload_data`].

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::auth::{AccessToken, User};
use crate::models::{ImageSize, Link, MediaKind};
use crate::signal::Signal;

/// Video player cell model.
#[derive(Debug)]
pub struct VideoPresentation {
    pub link: Link,
    pub user: Option<User>,
    pub token: Option<AccessToken>,
}

/// Image/GIF/album cell model; the size signal resolves during preload.
#[derive(Debug)]
pub struct ImagePresentation {
    pub link: Link,
    pub user: Option<User>,
    pub token: Option<AccessToken>,
    image_size: Signal<Option<ImageSize>>,
}

impl ImagePresentation {
    /// Resolved image dimensions, `None` until preload completes.
    #[must_use]
    pub fn image_size(&self) -> &Signal<Option<ImageSize>> {
        &self.image_size
    }
}

/// Self-post (text body) cell model.
#[derive(Debug)]
pub struct SelfPostPresentation {
    pub link: Link,
    pub user: Option<User>,
    pub token: Option<AccessToken>,
}

/// External-link cell model.
#[derive(Debug)]
pub struct LinkPostPresentation {
    pub link: Link,
    pub user: Option<User>,
    pub token: Option<AccessToken>,
}

/// One presentation model per fetched link; the variant is fixed at
/// classification and never changes.
#[derive(Debug)]
pub struct PresentationModel {
    variant: Variant,
    preloaded: AtomicBool,
}

#[derive(Debug)]
pub enum Variant {
    Video(VideoPresentation),
    Image(ImagePresentation),
    SelfPost(SelfPostPresentation),
    LinkPost(LinkPostPresentation),
}

/// Map a link to its presentation variant. Total over [`MediaKind`].
#[must_use]
pub fn classify(link: Link, user: Option<&User>, token: Option<&AccessToken>) -> PresentationModel {
    let user = user.cloned();
    let token = token.cloned();
    let variant = match link.kind {
        MediaKind::Video => Variant::Video(VideoPresentation { link, user, token }),
        MediaKind::Image | MediaKind::Gif | MediaKind::Album => Variant::Image(ImagePresentation {
            link,
            user,
            token,
            image_size: Signal::new(None),
        }),
        MediaKind::SelfPost => Variant::SelfPost(SelfPostPresentation { link, user, token }),
        MediaKind::LinkPost => Variant::LinkPost(LinkPostPresentation { link, user, token }),
    };
    PresentationModel {
        variant,
        preloaded: AtomicBool::new(false),
    }
}

impl PresentationModel {
    #[must_use]
    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    #[must_use]
    pub fn link(&self) -> &Link {
        match &self.variant {
            Variant::Video(v) => &v.link,
            Variant::Image(v) => &v.link,
            Variant::SelfPost(v) => &v.link,
            Variant::LinkPost(v) => &v.link,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.link().title
    }

    #[must_use]
    pub fn media_kind(&self) -> MediaKind {
        self.link().kind
    }

    /// Eagerly warm auxiliary display data.
    ///
    /// Runs at most once; repeated calls are no-ops. For image variants this
    /// resolves the size signal from the decoded preview payload.
    pub fn preload_data(&self) {
        if self.preloaded.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Variant::Image(image) = &self.variant {
            let size = image.link.preview_size;
            debug!(
                id = %image.link.id,
                width = size.map_or(0, |s| s.width),
                height = size.map_or(0, |s| s.height),
                "Resolved image size"
            );
            image.image_size.set(size);
        }
    }

    /// Whether preload has run.
    #[must_use]
    pub fn was_preloaded(&self) -> bool {
        self.preloaded.load(Ordering::Acquire)
    }
}
