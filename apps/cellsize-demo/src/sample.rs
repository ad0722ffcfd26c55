//! Sample stream content and a stand-in markup measurer.

use std::thread;
use std::time::Duration;

use cellsize_core::{
    Announcement, Attachment, ItemContent, ItemId, MeasurableItem, PageHeader, PageHeaderKind,
    RenderError, RenderRequest,
};

const GLYPH_WIDTH: f32 = 7.0;
const LINE_HEIGHT: f32 = 20.0;
const PARAGRAPH_SPACING: f32 = 8.0;

pub fn first_page() -> Vec<MeasurableItem> {
    vec![
        MeasurableItem::new(
            ItemId(1),
            ItemContent::Announcement(Announcement {
                header: "New: collaborative boards".into(),
                body: "Invite up to ten artists to post to a shared board.".into(),
                cta_caption: "Try it".into(),
                preferred_attachment: Some(Attachment::new(600, 400)),
            }),
        ),
        MeasurableItem::new(
            ItemId(2),
            ItemContent::PageHeader(
                PageHeader::new(
                    PageHeaderKind::Editorial,
                    "Staff picks",
                    "<p>This week we look at <b>risograph</b> prints.</p><p>Twelve studios, one press.</p>",
                )
                .with_cta("Read more")
                .with_posted_by("ello"),
            ),
        ),
        MeasurableItem::new(ItemId(3), ItemContent::Unmeasurable),
    ]
}

pub fn second_page() -> Vec<MeasurableItem> {
    vec![
        MeasurableItem::new(
            ItemId(4),
            ItemContent::PageHeader(PageHeader::new(
                PageHeaderKind::Category,
                "Illustration",
                "Drawings, paintings and everything in between.",
            )),
        ),
        MeasurableItem::new(
            ItemId(5),
            ItemContent::PageHeader(PageHeader::new(
                PageHeaderKind::Generic,
                "Interview",
                "<p>A short conversation.</p>",
            )),
        ),
    ]
}

/// Rough markup height: visible characters laid out at a fixed advance,
/// one block per paragraph. Sleeps a little to behave like a real surface.
pub fn measure_markup(request: &RenderRequest) -> Result<f32, RenderError> {
    if request.width <= 0.0 {
        return Err(RenderError::Failed {
            reason: format!("surface for {} has no width", request.item),
        });
    }
    thread::sleep(Duration::from_millis(15));

    let per_line = (request.width / GLYPH_WIDTH).floor().max(1.0);
    let paragraphs = visible_paragraphs(&request.markup);
    let height = paragraphs
        .iter()
        .map(|chars| (*chars as f32 / per_line).ceil().max(1.0) * LINE_HEIGHT)
        .sum::<f32>()
        + PARAGRAPH_SPACING * paragraphs.len().saturating_sub(1) as f32;
    Ok(height)
}

/// Visible character counts of each `<p>` block, or of the whole body when
/// it has none.
fn visible_paragraphs(markup: &str) -> Vec<usize> {
    let body = markup
        .split_once("<div class=\"editorial\">")
        .map_or(markup, |(_, rest)| rest);
    let mut paragraphs = Vec::new();
    let mut current = 0usize;
    let mut in_tag = false;
    let mut tag = String::new();
    for ch in body.chars() {
        match ch {
            '<' => {
                in_tag = true;
                tag.clear();
            }
            '>' if in_tag => {
                in_tag = false;
                if tag == "/p" && current > 0 {
                    paragraphs.push(current);
                    current = 0;
                }
            }
            _ if in_tag => tag.push(ch),
            _ => current += 1,
        }
    }
    if current > 0 || paragraphs.is_empty() {
        paragraphs.push(current);
    }
    paragraphs
}
