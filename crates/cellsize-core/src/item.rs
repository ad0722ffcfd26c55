//! Items whose display height has to be measured.

use std::fmt;
use std::rc::Rc;

/// Stable identity of an item, chosen by the owning collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Computed heights for one item.
///
/// Both columns are always written together.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CellHeights {
    /// Height when the feed is laid out in a single column.
    pub one_column: f32,
    /// Height when the feed is laid out in a grid.
    pub multi_column: f32,
}

impl CellHeights {
    pub const ZERO: CellHeights = CellHeights {
        one_column: 0.0,
        multi_column: 0.0,
    };

    /// Same height for both layouts.
    pub const fn uniform(height: f32) -> Self {
        Self {
            one_column: height,
            multi_column: height,
        }
    }
}

/// Image attached to an announcement.
///
/// Servers occasionally omit the dimensions; a missing value means the image
/// contributes nothing to the height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Attachment {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl Attachment {
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }

    /// Height of the image when scaled to `target_width`, or `None` when a
    /// dimension is missing or zero.
    pub fn scaled_height(&self, target_width: f32) -> Option<f32> {
        match (self.width, self.height) {
            (Some(width), Some(height)) if width > 0 => {
                Some(height as f32 * target_width / width as f32)
            }
            _ => None,
        }
    }
}

/// A dismissable announcement banner.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Announcement {
    pub header: String,
    pub body: String,
    pub cta_caption: String,
    pub preferred_attachment: Option<Attachment>,
}

/// Kind of a promotional page header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PageHeaderKind {
    /// Header of a category page; its body is plain text.
    Category,
    /// Editorial header; its body is markup that must be rendered.
    Editorial,
    /// Any other server-provided kind; treated like an editorial header.
    Generic,
}

impl PageHeaderKind {
    /// Whether the body of this kind is markup sized by a renderer.
    pub fn has_markup(self) -> bool {
        !matches!(self, PageHeaderKind::Category)
    }
}

/// A promotional header shown at the top of a stream.
#[derive(Clone, Debug, PartialEq)]
pub struct PageHeader {
    pub kind: PageHeaderKind,
    pub header: String,
    pub subheader: String,
    pub cta_caption: Option<String>,
    pub posted_by: Option<String>,
}

impl PageHeader {
    pub fn new(kind: PageHeaderKind, header: impl Into<String>, subheader: impl Into<String>) -> Self {
        Self {
            kind,
            header: header.into(),
            subheader: subheader.into(),
            cta_caption: None,
            posted_by: None,
        }
    }

    pub fn with_cta(mut self, caption: impl Into<String>) -> Self {
        self.cta_caption = Some(caption.into());
        self
    }

    pub fn with_posted_by(mut self, username: impl Into<String>) -> Self {
        self.posted_by = Some(username.into());
        self
    }
}

/// The content an item displays.
#[derive(Clone, Debug, PartialEq)]
pub enum ItemContent {
    Announcement(Announcement),
    PageHeader(PageHeader),
    /// Content no size computer knows about. Always measures as zero.
    Unmeasurable,
}

impl ItemContent {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ItemContent::Announcement(_) => "announcement",
            ItemContent::PageHeader(_) => "page-header",
            ItemContent::Unmeasurable => "unmeasurable",
        }
    }
}

/// One unit of content that needs a computed display height.
///
/// Cloning shares the content; the queue only reads it.
#[derive(Clone, Debug)]
pub struct MeasurableItem {
    id: ItemId,
    content: Rc<ItemContent>,
}

impl MeasurableItem {
    pub fn new(id: ItemId, content: ItemContent) -> Self {
        Self {
            id,
            content: Rc::new(content),
        }
    }

    pub fn from_shared(id: ItemId, content: Rc<ItemContent>) -> Self {
        Self { id, content }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn content(&self) -> &ItemContent {
        &self.content
    }

    pub fn shared_content(&self) -> Rc<ItemContent> {
        Rc::clone(&self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_scales_to_target_width() {
        let attachment = Attachment::new(200, 100);
        assert_eq!(attachment.scaled_height(70.0), Some(35.0));
    }

    #[test]
    fn attachment_without_dimensions_has_no_height() {
        let missing_height = Attachment {
            width: Some(10),
            height: None,
        };
        let zero_width = Attachment::new(0, 10);
        assert_eq!(missing_height.scaled_height(70.0), None);
        assert_eq!(zero_width.scaled_height(70.0), None);
    }

    #[test]
    fn cloned_items_share_content() {
        let item = MeasurableItem::new(ItemId(1), ItemContent::Unmeasurable);
        let clone = item.clone();
        assert!(Rc::ptr_eq(&item.shared_content(), &clone.shared_content()));
    }

    #[test]
    fn only_category_headers_skip_markup() {
        assert!(!PageHeaderKind::Category.has_markup());
        assert!(PageHeaderKind::Editorial.has_markup());
        assert!(PageHeaderKind::Generic.has_markup());
    }
}
