//! Markup handed to the renderer for editorial header bodies.

const EDITORIAL_HEAD: &str = concat!(
    "<!DOCTYPE html><html><head>",
    "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1, user-scalable=no\">",
    "<style>",
    "html,body{margin:0;padding:0;background:transparent;}",
    "body{font-family:AtlasGrotesk-Regular,sans-serif;font-size:14px;line-height:20px;color:#fff;}",
    "p{margin:0 0 8px 0;}",
    "a{color:#fff;text-decoration:underline;}",
    "</style></head><body><div class=\"editorial\">",
);

const EDITORIAL_TAIL: &str = "</div></body></html>";

/// Wraps server-provided editorial markup in the document the renderer
/// measures. The body is trusted markup and inserted verbatim.
pub fn editorial_html(body: &str) -> String {
    let mut html = String::with_capacity(EDITORIAL_HEAD.len() + body.len() + EDITORIAL_TAIL.len());
    html.push_str(EDITORIAL_HEAD);
    html.push_str(body);
    html.push_str(EDITORIAL_TAIL);
    html
}
