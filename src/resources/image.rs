//! Images
//!
//! Distribution, application, snapshot and backup images.

use crate::request::{Links, Meta, Method, Null, PagedRequest, PagedResponse, Query, Request};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    Application,
    Snapshot,
    Backup,
    Base,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ImageType,
    pub distribution: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(rename = "public")]
    pub is_public: bool,
    pub regions: Vec<String>,
    #[serde(rename = "min_disk_size")]
    pub min_disk_in_gib: u64,
    /// Documented as an integer, returned as a fraction
    #[serde(rename = "size_gigabytes")]
    pub size_in_gib: f64,
    #[serde(with = "crate::date")]
    pub created_at: DateTime<Utc>,
}

/// `type` filter accepted by the list endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFilter {
    Distribution,
    Application,
    Snapshot,
    Custom,
    Backup,
}

impl ImageFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFilter::Distribution => "distribution",
            ImageFilter::Application => "application",
            ImageFilter::Snapshot => "snapshot",
            ImageFilter::Custom => "custom",
            ImageFilter::Backup => "backup",
        }
    }
}

impl fmt::Display for ImageFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ImageFilter::Distribution => "Distribution",
            ImageFilter::Application => "Application",
            ImageFilter::Snapshot => "Snapshot",
            ImageFilter::Custom => "Custom",
            ImageFilter::Backup => "Backup",
        };
        f.write_str(label)
    }
}

/// `GET images`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListImages {
    pub filter: Option<ImageFilter>,
    pub private_only: Option<bool>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl Default for ListImages {
    fn default() -> Self {
        Self {
            filter: None,
            private_only: None,
            page: Some(1),
            per_page: Some(200),
        }
    }
}

impl ListImages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: ImageFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn private_only(mut self, private_only: bool) -> Self {
        self.private_only = Some(private_only);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageList {
    pub meta: Meta,
    pub links: Links,
    pub images: Vec<Image>,
}

impl PagedResponse for ImageList {
    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn links(&self) -> &Links {
        &self.links
    }
}

impl Request for ListImages {
    type Body = Null;
    type Response = ImageList;

    fn method(&self) -> Method {
        Method::Get
    }

    fn path(&self) -> String {
        "images".to_string()
    }

    fn query(&self) -> Option<Query> {
        let mut query = Query::new();
        if let (Some(page), Some(per_page)) = (self.page, self.per_page) {
            query.insert("page".to_string(), page.to_string());
            query.insert("per_page".to_string(), per_page.to_string());
        }
        if let Some(filter) = self.filter {
            query.insert("type".to_string(), filter.as_str().to_string());
        }
        if let Some(private_only) = self.private_only {
            query.insert("private".to_string(), private_only.to_string());
        }
        (!query.is_empty()).then_some(query)
    }
}

impl PagedRequest for ListImages {
    fn page(&self) -> Option<u32> {
        self.page
    }

    fn per_page(&self) -> Option<u32> {
        self.per_page
    }

    fn set_pages(&mut self, page: Option<u32>, per_page: Option<u32>) {
        self.page = page;
        self.per_page = per_page;
    }
}

/// Single-image envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageResponse {
    pub image: Image,
}

/// `GET images/{id}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetImage {
    pub id: u64,
}

impl Request for GetImage {
    type Body = Null;
    type Response = ImageResponse;

    fn method(&self) -> Method {
        Method::Get
    }

    fn path(&self) -> String {
        format!("images/{}", self.id)
    }
}

/// `GET images/{slug}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetImageBySlug {
    pub slug: String,
}

impl Request for GetImageBySlug {
    type Body = Null;
    type Response = ImageResponse;

    fn method(&self) -> Method {
        Method::Get
    }

    fn path(&self) -> String {
        format!("images/{}", self.slug)
    }
}

/// `PUT images/{id}`, renames an image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateImage {
    #[serde(skip)]
    pub id: u64,
    pub name: String,
}

impl UpdateImage {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl Request for UpdateImage {
    type Body = Self;
    type Response = ImageResponse;

    fn method(&self) -> Method {
        Method::Put
    }

    fn path(&self) -> String {
        format!("images/{}", self.id)
    }

    fn body(&self) -> Option<&Self> {
        Some(self)
    }
}

/// `DELETE images/{id}`; answers 204
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteImage {
    pub id: u64,
}

impl Request for DeleteImage {
    type Body = Null;
    type Response = Null;

    fn method(&self) -> Method {
        Method::Delete
    }

    fn path(&self) -> String {
        format!("images/{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const IMAGE_JSON: &str = r#"{
        "id": 7555620,
        "name": "Nifty New Snapshot",
        "distribution": "Ubuntu",
        "slug": null,
        "public": false,
        "regions": ["nyc2", "nyc3"],
        "created_at": "2014-11-04T22:23:02Z",
        "type": "snapshot",
        "min_disk_size": 20,
        "size_gigabytes": 2.34
    }"#;

    #[test]
    fn test_decode_image() {
        let image: Image = serde_json::from_str(IMAGE_JSON).unwrap();
        assert_eq!(image.id, 7555620);
        assert_eq!(image.kind, ImageType::Snapshot);
        assert!(!image.is_public);
        assert_eq!(image.slug, None);
        assert_eq!(image.min_disk_in_gib, 20);
        assert_eq!(image.size_in_gib, 2.34);
        assert_eq!(
            image.created_at,
            Utc.with_ymd_and_hms(2014, 11, 4, 22, 23, 2).unwrap()
        );
    }

    #[test]
    fn test_fractional_size_is_accepted() {
        let json = IMAGE_JSON.replace("2.34", "20.5");
        let image: Image = serde_json::from_str(&json).unwrap();
        assert_eq!(image.size_in_gib, 20.5);

        let json = IMAGE_JSON.replace("2.34", "20");
        let image: Image = serde_json::from_str(&json).unwrap();
        assert_eq!(image.size_in_gib, 20.0);
    }

    #[test]
    fn test_encode_uses_wire_names() {
        let image: Image = serde_json::from_str(IMAGE_JSON).unwrap();
        let value = serde_json::to_value(&image).unwrap();
        assert_eq!(value["public"], false);
        assert_eq!(value["min_disk_size"], 20);
        assert_eq!(value["size_gigabytes"], 2.34);
        assert_eq!(value["created_at"], "2014-11-04T22:23:02Z");
        assert!(value.get("is_public").is_none());
    }

    #[test]
    fn test_rejects_fractional_created_at() {
        let json = IMAGE_JSON.replace("2014-11-04T22:23:02Z", "2014-11-04T22:23:02.123Z");
        assert!(serde_json::from_str::<Image>(&json).is_err());
    }

    #[test]
    fn test_list_query() {
        let request = ListImages::new()
            .filter(ImageFilter::Distribution)
            .private_only(true);
        let query = request.query().unwrap();
        assert_eq!(query.get("page").map(String::as_str), Some("1"));
        assert_eq!(query.get("per_page").map(String::as_str), Some("200"));
        assert_eq!(query.get("type").map(String::as_str), Some("distribution"));
        assert_eq!(query.get("private").map(String::as_str), Some("true"));
    }

    #[test]
    fn test_list_query_requires_both_page_fields() {
        let request = ListImages {
            page: Some(3),
            per_page: None,
            ..ListImages::default()
        };
        assert_eq!(request.query(), None);
    }

    #[test]
    fn test_list_with_pages_keeps_filters() {
        let request = ListImages::new().filter(ImageFilter::Backup);
        let next = request.with_pages(Some(4), Some(50));
        assert_eq!(next.filter, Some(ImageFilter::Backup));
        assert_eq!(next.page, Some(4));
        assert_eq!(next.per_page, Some(50));
    }

    #[test]
    fn test_paths() {
        assert_eq!(GetImage { id: 9 }.path(), "images/9");
        assert_eq!(
            GetImageBySlug {
                slug: "ubuntu-22-04-x64".into()
            }
            .path(),
            "images/ubuntu-22-04-x64"
        );
        assert_eq!(DeleteImage { id: 9 }.method(), Method::Delete);
    }

    #[test]
    fn test_update_body_only_has_name() {
        let request = UpdateImage::new(9, "renamed");
        assert_eq!(request.method(), Method::Put);
        assert_eq!(
            serde_json::to_string(request.body().unwrap()).unwrap(),
            r#"{"name":"renamed"}"#
        );
    }

    #[test]
    fn test_filter_display() {
        assert_eq!(ImageFilter::Snapshot.to_string(), "Snapshot");
        assert_eq!(ImageFilter::Snapshot.as_str(), "snapshot");
    }
}
