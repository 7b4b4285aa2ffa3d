use std::path::PathBuf;

/// Failures while turning an image reference into HTML.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("{url} is not an image (content-type: {content_type})")]
    NotAnImage { url: String, content_type: String },

    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode {origin}: {source}")]
    Decode {
        origin: String,
        #[source]
        source: image::ImageError,
    },

    #[error("{origin} ended before its dimensions could be read")]
    Truncated { origin: String },

    #[error("failed to encode thumbnail: {0}")]
    Encode(#[source] image::ImageError),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
