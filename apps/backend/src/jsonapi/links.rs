//! Link builders for resource and relationship objects.

use super::document::Links;
use super::API_PREFIX;
use crate::schema::ResourceType;

pub fn resource_url(ty: ResourceType, id: &str) -> String {
    format!("{API_PREFIX}/{ty}/{id}")
}

pub fn resource_links(ty: ResourceType, id: &str) -> Links {
    Links {
        self_link: Some(resource_url(ty, id)),
        related: None,
    }
}

/// `self` points at the relationship endpoint, `related` at the related
/// resource endpoint.
pub fn relationship_links(ty: ResourceType, id: &str, relation: &str) -> Links {
    let base = resource_url(ty, id);
    Links {
        self_link: Some(format!("{base}/relationships/{relation}")),
        related: Some(format!("{base}/{relation}")),
    }
}
