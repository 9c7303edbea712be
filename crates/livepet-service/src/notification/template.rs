//! Share email rendering.

use super::relay::ShareEmail;

/// A rendered email.
#[derive(Debug, Clone)]
pub struct RenderedEmail {
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html: String,
    /// Plain-text alternative.
    pub text: String,
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render subject, HTML, and text bodies for a share email.
pub fn render_share_email(email: &ShareEmail) -> RenderedEmail {
    let subject = format!("Health Profile Shared: {}", email.pet_name);
    let expires = email
        .expires_at
        .format("%A, %B %-d, %Y at %-I:%M %p UTC")
        .to_string();

    let greeting = match email.recipient_name.as_deref() {
        Some(name) => format!("Hi {name},"),
        None => "Hello,".to_string(),
    };

    let pet = escape_html(&email.pet_name);
    let url = escape_html(&email.share_url);

    let mut html = String::new();
    html.push_str("<!DOCTYPE html><html><head><meta charset=\"UTF-8\"></head>");
    html.push_str("<body style=\"font-family: Arial, sans-serif; color: #334155; max-width: 600px; margin: 0 auto;\">");
    html.push_str("<h1 style=\"color: #3b82f6;\">Livepet</h1><h2>Health Profile Shared</h2>");
    html.push_str(&format!("<p>{}</p>", escape_html(&greeting)));
    html.push_str(&format!(
        "<p>Someone has shared {pet}'s health profile with you.</p>"
    ));
    if let Some(message) = &email.message {
        html.push_str(&format!(
            "<div style=\"background: #f1f5f9; border-left: 4px solid #3b82f6; padding: 16px;\">\
             <strong>Personal Message:</strong><br>{}</div>",
            escape_html(message)
        ));
    }
    html.push_str(&format!(
        "<p><strong>Access Link</strong><br><a href=\"{url}\">{url}</a></p>\
         <p><a href=\"{url}\" style=\"background: #3b82f6; color: #fff; padding: 12px 24px; \
         border-radius: 8px; text-decoration: none;\">View Health Profile</a></p>"
    ));
    if let Some(code) = &email.access_code {
        html.push_str(&format!(
            "<div style=\"background: #fef3c7; border: 2px solid #f59e0b; padding: 16px; text-align: center;\">\
             <strong>Access Code Required</strong>\
             <p>You'll need this code to view the health profile:</p>\
             <div style=\"font-family: monospace; font-size: 32px; letter-spacing: 8px;\">{}</div></div>",
            escape_html(code)
        ));
    }
    html.push_str(&format!(
        "<p><strong>Pet:</strong> {pet}<br>\
         <strong>Link Expires:</strong> {expires}<br>\
         <strong>Expires In:</strong> {} hours</p>",
        email.expiration_hours
    ));
    html.push_str(
        "<p style=\"background: #fef2f2; border-left: 4px solid #ef4444; padding: 12px;\">\
         <strong>Security Notice:</strong> This link provides access to sensitive health information. \
         Please keep it secure and do not share it with others.</p>\
         <p style=\"font-size: 12px; color: #94a3b8;\">This email was sent by Livepet Health Sharing. \
         If you didn't expect this email, you can safely ignore it.</p></body></html>",
    );

    let mut text = format!(
        "{greeting}\n\nSomeone has shared {}'s health profile with you.\n\n",
        email.pet_name
    );
    if let Some(message) = &email.message {
        text.push_str(&format!("Personal message:\n{message}\n\n"));
    }
    text.push_str(&format!("View the health profile: {}\n\n", email.share_url));
    if let Some(code) = &email.access_code {
        text.push_str(&format!("Access code: {code}\n\n"));
    }
    text.push_str(&format!(
        "Pet: {}\nLink expires: {expires}\nExpires in: {} hours\n\n\
         Security notice: this link provides access to sensitive health information. \
         Please keep it secure and do not share it with others.\n",
        email.pet_name, email.expiration_hours
    ));

    RenderedEmail {
        subject,
        html,
        text,
    }
}
