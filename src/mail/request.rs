//! Message request data structures

use std::path::PathBuf;

/// An image embedded in the HTML body through a `cid:` reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    /// Identifier referenced as `cid:<content_id>` in the HTML body
    pub content_id: String,
    /// File to read the image bytes from
    pub path: PathBuf,
}

impl InlineImage {
    pub fn new(content_id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            content_id: content_id.into(),
            path: path.into(),
        }
    }
}

/// Everything needed for one send
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailRequest {
    pub subject: String,
    pub sender: String,
    /// Recipient addresses, in order
    pub recipients: Vec<String>,
    pub text_body: Option<String>,
    pub html_body: Option<String>,
    /// Inline images, attached in insertion order
    pub inline_images: Vec<InlineImage>,
}

impl MailRequest {
    /// Start a request from the fields every message needs
    pub fn new(
        subject: impl Into<String>,
        sender: impl Into<String>,
        recipients: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            subject: subject.into(),
            sender: sender.into(),
            recipients: recipients.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Set the plain text body
    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.text_body = Some(body.into());
        self
    }

    /// Set the HTML body
    pub fn html(mut self, body: impl Into<String>) -> Self {
        self.html_body = Some(body.into());
        self
    }

    /// Add an inline image referenced as `cid:<content_id>`
    pub fn inline_image(mut self, content_id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.inline_images.push(InlineImage::new(content_id, path));
        self
    }

    /// Add several inline images at once
    pub fn inline_images<I, K, P>(mut self, images: I) -> Self
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: Into<PathBuf>,
    {
        self.inline_images
            .extend(images.into_iter().map(|(cid, path)| InlineImage::new(cid, path)));
        self
    }

    /// The text body, treating an empty string as absent
    pub fn text_content(&self) -> Option<&str> {
        self.text_body.as_deref().filter(|body| !body.is_empty())
    }

    /// The HTML body, treating an empty string as absent
    pub fn html_content(&self) -> Option<&str> {
        self.html_body.as_deref().filter(|body| !body.is_empty())
    }
}
