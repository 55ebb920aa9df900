//! Send an HTML message with an inline image
//!
//! Reads the SMTP_* variables (or a .env file) for the server, then sends
//! one message to the address given on the command line:
//!
//! ```text
//! cargo run --example send_inline -- sender@example.com recipient@example.com [image.png]
//! ```

use hagaki::{MailClient, MailRequest};
use std::env;
use std::process;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logger()?;

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <sender> <recipient> [image]", args[0]);
        process::exit(2);
    }

    let sender = args[1].as_str();
    let recipient = args[2].as_str();
    let image = args.get(3).map(String::as_str).unwrap_or("logo.png");

    let client = MailClient::new(None)?;
    println!("Hagaki Inline Image Example");
    println!("===========================");
    println!("Server: {}:{}", client.config().host(), client.config().port());
    println!("STARTTLS: {}", client.config().use_tls());

    let request = MailRequest::new("Hello from Hagaki", sender, [recipient])
        .text("Hello!\n\nThis message has an HTML version with an inline logo.")
        .html("<h1>Hello!</h1><p>Our logo:</p><img src=\"cid:logo\" alt=\"logo\">")
        .inline_image("logo", image);

    match client.send(&request) {
        Ok(delivery) => {
            println!("Sent to {} recipient(s)", delivery.recipients);
            for warning in &delivery.warnings {
                println!("  warning: {warning}");
            }
        }
        Err(e) => {
            eprintln!("Failed to send email: {e}");
            process::exit(1);
        }
    }

    Ok(())
}

fn setup_logger() -> Result<(), log::SetLoggerError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(log::LevelFilter::Debug)
        .chain(std::io::stderr())
        .apply()
}
