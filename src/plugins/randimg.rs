//! Posts a random image from a local keyword directory.
//!
//! `!<keyword>` picks from `basedir/<keyword>/`, listed fresh on every request.
//! `!<baserand>` picks from every keyword directory, using the listing taken
//! when the plugin started.

use crate::catalog;
use crate::catalog::CatalogEntry;
use crate::config::RandImgConfig;
use crate::error::ImageError;
use crate::host::Server;
use crate::host::ServerCallbacks;
use crate::host::ServerSelection;
use crate::host::TextMessage;
use crate::host::User;
use crate::host::send_or_warn;
use crate::html::HtmlImageEmitter;
use crate::html::escape_attribute;
use crate::resolver::resolve_local;
use crate::sizing::Bounds;
use crate::sizing::SizeClassifier;
use crate::trigger::DirectoryPick;
use crate::trigger::KeywordDirectoryTrigger;
use image::ImageFormat;
use rand::Rng;
use std::path::PathBuf;
use tracing::debug;
use tracing::info;
use tracing::warn;

#[derive(Debug)]
pub struct RandImg {
    config: RandImgConfig,
    basedir: PathBuf,
    trigger: KeywordDirectoryTrigger,
    classifier: SizeClassifier,
    emitter: HtmlImageEmitter,
    snapshot: Vec<CatalogEntry>,
}

impl RandImg {
    pub const NAME: &'static str = "randimg";

    /// Resolve the base directory and take the startup listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the base directory cannot be made absolute.
    pub fn new(config: RandImgConfig) -> eyre::Result<Self> {
        let basedir = catalog::absolute_basedir(&config.basedir)?;
        let snapshot = catalog::list_all(&basedir, &config.keywords);
        debug!(
            basedir = %basedir.display(),
            images = snapshot.len(),
            "Listed keyword images"
        );
        let bounds = Bounds::new(config.max_width, config.max_height);
        Ok(RandImg {
            trigger: KeywordDirectoryTrigger::new(&config.baserand, &config.keywords),
            classifier: SizeClassifier::new(bounds),
            emitter: HtmlImageEmitter::new(bounds, ImageFormat::Png),
            basedir,
            snapshot,
            config,
        })
    }

    /// Images known at startup, across every keyword
    #[must_use]
    pub fn snapshot(&self) -> &[CatalogEntry] {
        &self.snapshot
    }

    /// Where a posted image links to, if anywhere.
    #[must_use]
    pub fn link_for(&self, entry: &CatalogEntry) -> Option<String> {
        let baselink = &self.config.baselink;
        if baselink.ends_with('/') {
            Some(format!("{baselink}{}/{}", entry.keyword, entry.filename))
        } else if baselink.is_empty() {
            None
        } else {
            Some(baselink.clone())
        }
    }

    /// Load `entry` and render it as an `<img>` fragment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    pub fn render(&self, entry: &CatalogEntry) -> Result<String, ImageError> {
        let image = resolve_local(&entry.path(&self.basedir))?;
        let decision = self.classifier.classify(&image.info);
        debug!(
            keyword = %entry.keyword,
            filename = %entry.filename,
            info = ?image.info,
            mode = ?decision.mode,
            "Classified image"
        );
        self.emitter
            .emit(&image, &decision, self.link_for(entry).as_deref())
    }

    fn choose<R: Rng + ?Sized>(&self, pick: &DirectoryPick, rng: &mut R) -> Option<CatalogEntry> {
        let chosen = match pick {
            DirectoryPick::AnyKeyword => catalog::pick(&self.snapshot, rng).cloned(),
            DirectoryPick::Keyword(keyword) => match catalog::list_keyword(&self.basedir, keyword) {
                Ok(entries) => catalog::pick(&entries, rng).cloned(),
                Err(e) => {
                    warn!(
                        "Cannot list {}: {}",
                        self.basedir.join(keyword).display(),
                        e
                    );
                    return None;
                }
            },
        };
        if chosen.is_none() {
            warn!(?pick, "No images to pick from");
        }
        chosen
    }

    /// Channel messages to post in answer to `text`, one per matched keyword.
    #[must_use]
    pub fn replies<R: Rng + ?Sized>(&self, user: &User, text: &str, rng: &mut R) -> Vec<String> {
        self.trigger
            .parse(text)
            .iter()
            .filter_map(|pick| self.choose(pick, rng))
            .map(|entry| match self.render(&entry) {
                Ok(html) => html,
                Err(e) => {
                    info!(user = %user.name, "Could not post {}/{}: {}", entry.keyword, entry.filename, e);
                    failure_message(&entry, &user.name)
                }
            })
            .collect()
    }
}

/// Chat text telling `user` the picked image could not be posted.
#[must_use]
pub fn failure_message(entry: &CatalogEntry, user: &str) -> String {
    format!(
        "Could not load image {}/{} picked for {}",
        escape_attribute(&entry.keyword),
        escape_attribute(&entry.filename),
        escape_attribute(user)
    )
}

impl ServerCallbacks for RandImg {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn connected(&mut self) -> ServerSelection {
        ServerSelection::from_configured(&self.config.servers)
    }

    fn user_text_message(&self, server: &dyn Server, user: &User, message: &TextMessage) {
        let mut rng = rand::rng();
        for reply in self.replies(user, &message.text, &mut rng) {
            send_or_warn(server, user.channel, &reply);
        }
    }
}
