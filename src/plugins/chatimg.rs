//! Posts images linked in chat messages.
//!
//! A message that starts with the keyword (or any message, when the keyword
//! is optional) has every `href` fetched; each image is posted back to the
//! sender's channel as an inline data URI linking to the original URL.

use crate::config::ChatImgConfig;
use crate::error::ImageError;
use crate::host::Server;
use crate::host::ServerCallbacks;
use crate::host::ServerSelection;
use crate::host::TextMessage;
use crate::host::User;
use crate::host::send_or_warn;
use crate::html::HtmlImageEmitter;
use crate::html::escape_attribute;
use crate::resolver::RemoteResolver;
use crate::sizing::Bounds;
use crate::sizing::SizeClassifier;
use crate::trigger::UrlKeywordTrigger;
use image::ImageFormat;
use tokio::runtime::Runtime;
use tracing::debug;
use tracing::info;

#[derive(Debug)]
pub struct ChatImg {
    config: ChatImgConfig,
    trigger: UrlKeywordTrigger,
    classifier: SizeClassifier,
    emitter: HtmlImageEmitter,
    resolver: RemoteResolver,
    runtime: Runtime,
}

impl ChatImg {
    pub const NAME: &'static str = "chatimg";

    /// # Errors
    ///
    /// Returns an error if the HTTP client or its runtime cannot be created.
    pub fn new(config: ChatImgConfig) -> eyre::Result<Self> {
        let bounds = Bounds::new(config.max_width, config.max_height);
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(ChatImg {
            trigger: UrlKeywordTrigger::new(config.keyword.clone(), config.shebang_required)?,
            classifier: SizeClassifier::new(bounds).with_inline_attributes(true),
            emitter: HtmlImageEmitter::new(bounds, ImageFormat::Jpeg),
            resolver: RemoteResolver::new()?,
            runtime,
            config,
        })
    }

    /// Fetch `url` and render it as a linked `<img>` fragment.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be fetched, is not an image, or cannot be decoded.
    pub fn render(&self, url: &str) -> Result<String, ImageError> {
        let image = self.runtime.block_on(self.resolver.resolve(url))?;
        let decision = self.classifier.classify(&image.info);
        debug!(url, info = ?image.info, mode = ?decision.mode, "Classified image");
        self.emitter.emit(&image, &decision, Some(url))
    }

    /// Channel messages to post in answer to `text`, one per linked URL.
    ///
    /// Failures are only reported back when the keyword was used.
    #[must_use]
    pub fn replies(&self, user: &User, text: &str) -> Vec<String> {
        let Some(trigger) = self.trigger.parse(text) else {
            return Vec::new();
        };
        trigger
            .urls
            .iter()
            .filter_map(|url| match self.render(url) {
                Ok(html) => Some(html),
                Err(e) if trigger.shebang_used => {
                    info!(user = %user.name, "Could not post {}: {}", url, e);
                    Some(failure_message(&e, &user.name))
                }
                Err(e) => {
                    debug!(user = %user.name, "Ignoring {}: {}", url, e);
                    None
                }
            })
            .collect()
    }
}

/// Chat text telling `user` why their link was not posted.
#[must_use]
pub fn failure_message(error: &ImageError, user: &str) -> String {
    let user = escape_attribute(user);
    match error {
        ImageError::NotAnImage { .. } => {
            format!("Image Posted by {user}, isn't an image, or some odd format.")
        }
        _ => format!("Invalid URL linked by {user} , cannot resolve"),
    }
}

impl ServerCallbacks for ChatImg {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn connected(&mut self) -> ServerSelection {
        ServerSelection::from_configured(&self.config.servers)
    }

    fn user_text_message(&self, server: &dyn Server, user: &User, message: &TextMessage) {
        for reply in self.replies(user, &message.text) {
            send_or_warn(server, user.channel, &reply);
        }
    }
}
