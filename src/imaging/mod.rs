pub mod assets;
pub mod batch;
pub mod cache;
pub mod compress;

use serde::{Deserialize, Serialize};

pub use assets::{AssetKind, AssetStore};
pub use batch::ImageKey;
pub use cache::{ImageCache, PreprocessReport};
pub use compress::{CompressedImage, CompressionProfile};

/// Anything a page can draw as a raster image.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum ImageSource {
    Photo(ImageKey),
    Asset(AssetKind),
}

/// Lookup of compressed images by source. Layout uses it to decide between a
/// framed image and a placeholder; serializers use it to embed the bytes.
pub trait ImageCatalog {
    fn image(&self, source: &ImageSource) -> Option<&CompressedImage>;

    fn dimensions(&self, source: &ImageSource) -> Option<(u32, u32)> {
        self.image(source).map(|image| (image.width, image.height))
    }
}

/// Everything one generation call draws from: the request-scoped photo cache
/// and the loaded template assets.
#[derive(Debug, Default)]
pub struct RenderResources {
    pub images: ImageCache,
    pub assets: AssetStore,
}

impl RenderResources {
    pub fn new(images: ImageCache, assets: AssetStore) -> Self {
        Self { images, assets }
    }
}

impl ImageCatalog for RenderResources {
    fn image(&self, source: &ImageSource) -> Option<&CompressedImage> {
        match source {
            ImageSource::Photo(key) => self.images.get(key),
            ImageSource::Asset(kind) => self.assets.get(*kind),
        }
    }
}
