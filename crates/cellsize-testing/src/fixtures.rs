//! Item builders.

use cellsize_core::{
    Announcement, ItemContent, ItemId, MeasurableItem, PageHeader, PageHeaderKind,
};

pub fn announcement_item(id: u64, header: &str, body: &str, cta: &str) -> MeasurableItem {
    MeasurableItem::new(
        ItemId(id),
        ItemContent::Announcement(Announcement {
            header: header.to_string(),
            body: body.to_string(),
            cta_caption: cta.to_string(),
            preferred_attachment: None,
        }),
    )
}

pub fn page_header_item(id: u64, kind: PageHeaderKind, header: &str, subheader: &str) -> MeasurableItem {
    MeasurableItem::new(
        ItemId(id),
        ItemContent::PageHeader(PageHeader::new(kind, header, subheader)),
    )
}

pub fn editorial_item(id: u64, header: &str, markup: &str) -> MeasurableItem {
    page_header_item(id, PageHeaderKind::Editorial, header, markup)
}

pub fn unmeasurable_item(id: u64) -> MeasurableItem {
    MeasurableItem::new(ItemId(id), ItemContent::Unmeasurable)
}
