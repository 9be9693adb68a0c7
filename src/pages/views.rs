//! View-models and HTML rendering for the server-rendered pages

use axum::http::StatusCode;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;

pub const PAGE_TITLE: &str = "Simple SSR Page";

const NAV_ITEMS: &[(&str, &str)] = &[("/", "Home"), ("/about", "About")];

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct NavItem {
    pub link: String,
    pub text: String,
    pub is_current: bool,
}

/// Everything a page template needs.
///
/// Serialized keys follow the page contract (`Title`, `NavItems`,
/// `ProcessedImage`, ...).
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PageView {
    pub page_title: String,
    pub title: String,
    pub description: String,
    pub nav_items: Vec<NavItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub greeting: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_name: Option<String>,
    /// Base64 of the original upload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Base64 of the transformed image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_image: Option<String>,
    pub reset_form: bool,
}

pub fn nav_items(current_path: &str) -> Vec<NavItem> {
    NAV_ITEMS
        .iter()
        .map(|(link, text)| NavItem {
            link: link.to_string(),
            text: text.to_string(),
            is_current: *link == current_path,
        })
        .collect()
}

pub fn base_view(title: &str, description: &str, current_path: &str) -> PageView {
    PageView {
        page_title: PAGE_TITLE.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        nav_items: nav_items(current_path),
        ..PageView::default()
    }
}

pub fn home_view() -> PageView {
    PageView {
        greeting: Some("Welcome to the homepage".to_string()),
        reset_form: false,
        ..base_view("Home", "Welcome to our site", "/")
    }
}

pub fn about_view() -> PageView {
    base_view("About Us", "Learn more about our company", "/about")
}

pub fn decode_image(image_base64: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(image_base64)
}

/// MIME type for a `data:` URI, sniffed from the decoded bytes.
fn image_mime(image_base64: &str) -> &'static str {
    decode_image(image_base64)
        .ok()
        .and_then(|bytes| infer::get(&bytes))
        .map(|kind| kind.mime_type())
        .filter(|mime| mime.starts_with("image/"))
        .unwrap_or("image/png")
}

fn data_uri(image_base64: &str) -> String {
    format!("data:{};base64,{}", image_mime(image_base64), image_base64)
}

pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn render_nav(items: &[NavItem]) -> String {
    items
        .iter()
        .map(|item| {
            let current = if item.is_current {
                r#" class="current" aria-current="page""#
            } else {
                ""
            };
            format!(
                r#"<li><a href="{}"{}>{}</a></li>"#,
                escape_html(&item.link),
                current,
                escape_html(&item.text)
            )
        })
        .collect::<Vec<_>>()
        .join("")
}

fn layout(view: &PageView, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title} | {page_title}</title>
    <meta name="description" content="{description}">
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; background: #f5f5f5; }}
        nav ul {{ list-style: none; display: flex; gap: 16px; padding: 0; }}
        nav a {{ color: #667eea; text-decoration: none; }}
        nav a.current {{ font-weight: bold; text-decoration: underline; }}
        .alert {{ padding: 15px; border-radius: 8px; margin: 20px 0; }}
        .success {{ background: #e8f5e9; border: 1px solid #4CAF50; }}
        .error {{ background: #fee; border: 1px solid #fcc; }}
        form {{ background: white; padding: 20px; border-radius: 12px; display: grid; gap: 12px; }}
        .images {{ display: flex; gap: 20px; flex-wrap: wrap; }}
        .images img {{ max-width: 360px; border-radius: 8px; }}
    </style>
</head>
<body>
    <header>
        <nav><ul>{nav}</ul></nav>
    </header>
    <main>
{content}
    </main>
    <footer><p>{page_title}</p></footer>
</body>
</html>
"#,
        title = escape_html(&view.title),
        page_title = escape_html(&view.page_title),
        description = escape_html(&view.description),
        nav = render_nav(&view.nav_items),
        content = content,
    )
}

fn render_alerts(view: &PageView) -> String {
    let mut html = String::new();
    if let Some(success) = view.success.as_deref().filter(|s| !s.is_empty()) {
        html.push_str(&format!(
            r#"<div class="alert success" role="status">{}</div>"#,
            escape_html(success)
        ));
    }
    if let Some(error) = view.error.as_deref().filter(|s| !s.is_empty()) {
        html.push_str(&format!(
            r#"<div class="alert error" role="alert">{}</div>"#,
            escape_html(error)
        ));
    }
    html
}

fn render_upload_form(view: &PageView) -> String {
    // Keep the typed name around after a failed attempt
    let name_value = if view.reset_form {
        String::new()
    } else {
        view.uploaded_name.as_deref().map(escape_html).unwrap_or_default()
    };
    let reset_script = if view.reset_form {
        r#"<script>document.getElementById("upload-form").reset();</script>"#
    } else {
        ""
    };

    format!(
        r#"<form id="upload-form" action="/upload" method="post" enctype="multipart/form-data">
    <label>Name <input type="text" name="name" value="{name_value}"></label>
    <label>Photo <input type="file" name="file" accept=".jpg,.jpeg,.png" required></label>
    <button type="submit">Upload</button>
</form>
{reset_script}"#
    )
}

fn render_results(view: &PageView) -> String {
    let mut figures = String::new();
    if let Some(original) = view.file_name.as_deref() {
        figures.push_str(&format!(
            r#"<figure><img src="{}" alt="Original upload"><figcaption>Original</figcaption></figure>"#,
            data_uri(original)
        ));
    }
    if let Some(processed) = view.processed_image.as_deref() {
        figures.push_str(&format!(
            r#"<figure><img id="processed-image" src="{}" alt="Processed image"><figcaption>Processed</figcaption></figure>"#,
            data_uri(processed)
        ));
    }
    if figures.is_empty() {
        return String::new();
    }

    let uploaded_by = view
        .uploaded_name
        .as_deref()
        .filter(|n| !n.is_empty())
        .map(|n| format!("<p>Uploaded by {}</p>", escape_html(n)))
        .unwrap_or_default();

    format!(r#"<section class="results">{uploaded_by}<div class="images">{figures}</div></section>"#)
}

pub fn render_index(view: &PageView) -> String {
    let greeting = view
        .greeting
        .as_deref()
        .map(|g| format!("<p>{}</p>", escape_html(g)))
        .unwrap_or_default();

    let content = format!(
        "<h1>{}</h1>\n<p>{}</p>\n{}\n{}\n{}\n{}",
        escape_html(&view.title),
        escape_html(&view.description),
        greeting,
        render_alerts(view),
        render_upload_form(view),
        render_results(view),
    );
    layout(view, &content)
}

pub fn render_about(view: &PageView) -> String {
    let content = format!(
        "<h1>{}</h1>\n<p>{}</p>\n<p>We turn everyday photos into professional profile pictures.</p>",
        escape_html(&view.title),
        escape_html(&view.description),
    );
    layout(view, &content)
}

pub fn render_error(status: StatusCode, message: &str) -> String {
    let title = status.canonical_reason().unwrap_or("Error");
    let view = base_view(title, message, "");
    let content = format!(
        r#"<div class="alert error"><h1>{} {}</h1><p>{}</p><p><a href="/">Back to home</a></p></div>"#,
        status.as_u16(),
        escape_html(title),
        escape_html(message)
    );
    layout(&view, &content)
}
