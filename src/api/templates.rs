use crate::models::UploadedImage;
use std::fmt::Write;

const PAGE_HEAD: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>Image Gallery</title>
  <style>
    body { font-family: Arial, sans-serif; margin: 2rem; color: #1d1d1f; }
    h1 { margin-bottom: 0.5rem; }
    .card { border: 1px solid #ddd; padding: 1rem; border-radius: 8px; margin-bottom: 1rem; }
    button { margin-top: 1rem; padding: 0.6rem 1rem; }
    ul.gallery { list-style: none; padding: 0; display: flex; flex-wrap: wrap; gap: 1rem; }
    ul.gallery li { width: 200px; }
    ul.gallery img { max-width: 200px; max-height: 200px; display: block; }
    .name { font-size: 0.85rem; word-break: break-all; }
  </style>
</head>
<body>
  <h1>Image Gallery</h1>

  <div class="card">
    <h2>Upload an image</h2>
    <form action="/upload" method="post" enctype="multipart/form-data">
      <input type="file" name="file" accept="image/*" />
      <button type="submit">Upload</button>
    </form>
  </div>

  <div class="card">
    <h2>Uploaded images</h2>
"#;

const PAGE_TAIL: &str = r#"  </div>
</body>
</html>
"#;

/// Renders the homepage: upload form followed by the image listing.
pub fn render_index(images: &[UploadedImage]) -> String {
    let mut page = String::from(PAGE_HEAD);

    if images.is_empty() {
        page.push_str("    <p>No images uploaded yet.</p>\n");
    } else {
        page.push_str("    <ul class=\"gallery\">\n");
        for image in images {
            let url = escape_html(&image.url);
            let filename = escape_html(&image.filename);
            // Writing into a String cannot fail
            let _ = writeln!(
                page,
                "      <li><a href=\"{url}\"><img src=\"{url}\" alt=\"{filename}\" /></a>\
                 <span class=\"name\">{filename}</span></li>"
            );
        }
        page.push_str("    </ul>\n");
    }

    page.push_str(PAGE_TAIL);
    page
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
