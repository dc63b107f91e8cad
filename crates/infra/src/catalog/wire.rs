use chrono::{DateTime, Utc};
use serde::Deserialize;

use aniscope_core::domain::entry::CatalogEntry;
use aniscope_core::domain::page::ResultPage;
use aniscope_core::error::FetchError;

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    data: Vec<EntryDto>,
    pagination: PaginationDto,
}

#[derive(Debug, Deserialize)]
struct DetailEnvelope {
    data: EntryDto,
}

#[derive(Debug, Deserialize)]
struct PaginationDto {
    current_page: u32,
    last_visible_page: u32,
    has_next_page: bool,
}

#[derive(Debug, Deserialize)]
struct EntryDto {
    mal_id: u64,
    title: String,
    #[serde(default)]
    images: Option<ImagesDto>,
    #[serde(default)]
    synopsis: Option<String>,
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    episodes: Option<u32>,
    #[serde(default)]
    aired: Option<AiredDto>,
}

#[derive(Debug, Deserialize)]
struct ImagesDto {
    #[serde(default)]
    webp: Option<ImageVariantDto>,
    #[serde(default)]
    jpg: Option<ImageVariantDto>,
}

#[derive(Debug, Deserialize)]
struct ImageVariantDto {
    #[serde(default)]
    image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AiredDto {
    #[serde(default)]
    from: Option<DateTime<Utc>>,
}

impl EntryDto {
    fn into_entry(self) -> CatalogEntry {
        let poster_url = self
            .images
            .and_then(|images| {
                images
                    .webp
                    .and_then(|variant| variant.image_url)
                    .or_else(|| images.jpg.and_then(|variant| variant.image_url))
            })
            .unwrap_or_default();
        CatalogEntry {
            id: self.mal_id,
            title: self.title,
            poster_url,
            synopsis: self.synopsis,
            score: self.score,
            episodes: self.episodes,
            aired_from: self.aired.and_then(|aired| aired.from),
        }
    }
}

/// A body that does not carry the expected result list (or carries it
/// ill-typed) is a failure, never an empty success.
pub(crate) fn parse_search_body(body: &str) -> Result<ResultPage, FetchError> {
    let envelope: SearchEnvelope =
        serde_json::from_str(body).map_err(|err| FetchError::Malformed(err.to_string()))?;
    Ok(ResultPage {
        entries: envelope
            .data
            .into_iter()
            .map(EntryDto::into_entry)
            .collect(),
        current_page: envelope.pagination.current_page,
        total_pages: envelope.pagination.last_visible_page,
        has_next: envelope.pagination.has_next_page,
    })
}

pub(crate) fn parse_detail_body(body: &str) -> Result<CatalogEntry, FetchError> {
    let envelope: DetailEnvelope =
        serde_json::from_str(body).map_err(|err| FetchError::Malformed(err.to_string()))?;
    Ok(envelope.data.into_entry())
}
