//! MIME message assembly
//!
//! Every message has the same shape:
//!
//! ```text
//! multipart/related
//! ├── multipart/alternative
//! │   ├── text/plain   (when a text body is given)
//! │   └── text/html    (when an HTML body is given)
//! ├── image/*          (Content-ID: <id>, Content-Disposition: inline)
//! └── ...
//! ```

use std::fs;
use std::path::Path;

use lettre::Message;
use lettre::address::{Address, Envelope};
use lettre::message::header::{ContentDisposition, ContentId, ContentType};
use lettre::message::{Mailbox, MultiPart, SinglePart};

use crate::mail::error::{ComposeError, ComposeWarning};
use crate::mail::request::{InlineImage, MailRequest};

/// Content type used when an image's extension says nothing useful
pub const DEFAULT_IMAGE_TYPE: &str = "image/png";

/// A message ready to hand to a [`Connection`](crate::Connection)
#[derive(Debug, Clone)]
pub struct ComposedMessage {
    pub message: Message,
    pub envelope: Envelope,
    /// Problems recovered from while composing
    pub warnings: Vec<ComposeWarning>,
}

impl ComposedMessage {
    /// The full RFC 5322 message as sent on the wire
    pub fn formatted(&self) -> Vec<u8> {
        self.message.formatted()
    }
}

/// Build the MIME tree and SMTP envelope for a request
///
/// Missing inline images and a missing body are recorded as warnings and
/// do not fail the call. Unparseable addresses do.
pub fn compose(request: &MailRequest) -> Result<ComposedMessage, ComposeError> {
    if request.recipients.is_empty() {
        return Err(ComposeError::NoRecipients);
    }

    let sender = parse_mailbox(&request.sender)?;
    let mut forward_paths: Vec<Address> = Vec::with_capacity(request.recipients.len());
    let mut builder = Message::builder()
        .from(sender.clone())
        .subject(request.subject.clone());

    for recipient in &request.recipients {
        let mailbox = parse_mailbox(recipient)?;
        forward_paths.push(mailbox.email.clone());
        builder = builder.to(mailbox);
    }

    let envelope = Envelope::new(Some(sender.email), forward_paths)
        .map_err(|e| ComposeError::Build(e.to_string()))?;

    let mut warnings = Vec::new();
    let mut related = MultiPart::related().multipart(alternative_part(request, &mut warnings));

    for image in &request.inline_images {
        match fs::read(&image.path) {
            Ok(bytes) => related = related.singlepart(inline_part(image, bytes)?),
            Err(e) => {
                log::warn!(
                    "Inline image {} could not be read from {}: {e}",
                    image.content_id,
                    image.path.display()
                );
                warnings.push(ComposeWarning::MissingImage {
                    content_id: image.content_id.clone(),
                    path: image.path.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    let message = builder
        .multipart(related)
        .map_err(|e| ComposeError::Build(e.to_string()))?;

    log::debug!(
        "Composed message {:?} for {} recipient(s) with {} warning(s)",
        request.subject,
        request.recipients.len(),
        warnings.len()
    );

    Ok(ComposedMessage {
        message,
        envelope,
        warnings,
    })
}

fn alternative_part(request: &MailRequest, warnings: &mut Vec<ComposeWarning>) -> MultiPart {
    let alternative = MultiPart::alternative();

    match (request.text_content(), request.html_content()) {
        (Some(text), Some(html)) => alternative
            .singlepart(SinglePart::plain(text.to_owned()))
            .singlepart(SinglePart::html(html.to_owned())),
        (Some(text), None) => alternative.singlepart(SinglePart::plain(text.to_owned())),
        (None, Some(html)) => alternative.singlepart(SinglePart::html(html.to_owned())),
        (None, None) => {
            log::warn!("No email content provided, sending an empty text body");
            warnings.push(ComposeWarning::EmptyBody);
            alternative.singlepart(SinglePart::plain(String::new()))
        }
    }
}

fn inline_part(image: &InlineImage, bytes: Vec<u8>) -> Result<SinglePart, ComposeError> {
    let filename = image
        .path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| image.content_id.clone());

    let content_type = ContentType::parse(&image_content_type(&image.path))
        .map_err(|e| ComposeError::Build(e.to_string()))?;

    Ok(SinglePart::builder()
        .header(content_type)
        .header(ContentId::from(format!("<{}>", image.content_id)))
        .header(ContentDisposition::inline_with_name(&filename))
        .body(bytes))
}

/// Guess an `image/*` type from the file extension
fn image_content_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .iter()
        .find(|mime| mime.type_() == mime_guess::mime::IMAGE)
        .map(|mime| mime.essence_str().to_owned())
        .unwrap_or_else(|| DEFAULT_IMAGE_TYPE.to_owned())
}

fn parse_mailbox(address: &str) -> Result<Mailbox, ComposeError> {
    address
        .parse::<Mailbox>()
        .map_err(|e| ComposeError::InvalidAddress {
            address: address.to_owned(),
            reason: e.to_string(),
        })
}
