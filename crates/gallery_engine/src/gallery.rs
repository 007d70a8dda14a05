use chrono::{DateTime, Utc};
use gallery_core::UploadResult;

use crate::config::gateway_url;

pub const GALLERY_FILENAME: &str = "gallery.html";

const GALLERY_STYLE: &str = r#"
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            min-height: 100vh;
            padding: 20px;
        }
        .container {
            max-width: 1400px;
            margin: 0 auto;
            background: rgba(255, 255, 255, 0.95);
            border-radius: 20px;
            padding: 40px;
        }
        h1 { text-align: center; color: #333; margin-bottom: 10px; font-size: 2.5em; }
        .stats {
            text-align: center;
            margin-bottom: 40px;
            padding: 20px;
            background: linear-gradient(45deg, #f093fb 0%, #f5576c 100%);
            border-radius: 15px;
            color: white;
        }
        .gallery {
            display: grid;
            grid-template-columns: repeat(auto-fill, minmax(350px, 1fr));
            gap: 25px;
        }
        .image-card {
            background: white;
            border-radius: 15px;
            overflow: hidden;
            box-shadow: 0 10px 30px rgba(0, 0, 0, 0.1);
        }
        .image-card img { width: 100%; height: 250px; object-fit: cover; }
        .image-info { padding: 20px; text-align: center; }
        .filename { color: #666; font-size: 0.9em; margin-bottom: 15px; word-break: break-word; }
        .view-btn {
            display: inline-block;
            background: linear-gradient(45deg, #667eea, #764ba2);
            color: white;
            text-decoration: none;
            padding: 10px 20px;
            border-radius: 25px;
            font-weight: 600;
        }
        @media (max-width: 768px) {
            .container { padding: 20px; margin: 10px; }
            .gallery { grid-template-columns: repeat(auto-fill, minmax(280px, 1fr)); gap: 20px; }
        }
"#;

/// Static HTML page with one card per uploaded image.
pub fn render_gallery_html(
    results: &[UploadResult],
    gateway_base: &str,
    date: DateTime<Utc>,
) -> String {
    let day = date.format("%a %b %d %Y").to_string();
    let cards: String = results
        .iter()
        .map(|result| render_card(result, gateway_base))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Daily Image Gallery - {day}</title>
    <style>{GALLERY_STYLE}    </style>
</head>
<body>
    <div class="container">
        <h1>Daily Image Gallery</h1>
        <div class="stats">
            <h2>Upload Summary</h2>
            <p><strong>Date:</strong> {day}</p>
            <p><strong>Total Images:</strong> {count}</p>
        </div>
        <div class="gallery">
{cards}        </div>
    </div>
</body>
</html>
"#,
        count = results.len(),
    )
}

fn render_card(result: &UploadResult, gateway_base: &str) -> String {
    let href = escape_html(&gateway_url(gateway_base, &result.content_id));
    let name = escape_html(&result.file_name);
    format!(
        r#"            <div class="image-card">
                <img src="{href}" alt="{name}" loading="lazy">
                <div class="image-info">
                    <p class="filename">{name}</p>
                    <a href="{href}" target="_blank" class="view-btn">View Full Size</a>
                </div>
            </div>
"#
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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
