//! HTTP gateway for The Movie Database (TMDB) v3 API.

use async_trait::async_trait;
use movos_core::config::CatalogConfig;
use movos_core::{MediaDetail, MediaSummary, MediaType};
use serde::de::DeserializeOwned;

use super::MediaGateway;
use crate::errors::CatalogError;
use crate::types::{ImageUrls, TmdbDetails, TmdbListItem, TmdbPage};

/// TMDB-backed media gateway.
#[derive(Debug, Clone)]
pub struct TmdbGateway {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    language: String,
    images: ImageUrls,
    sort_search_by_year: bool,
    min_vote_count: u32,
}

impl TmdbGateway {
    /// Creates a gateway from catalog configuration.
    ///
    /// # Errors
    ///
    /// - `CatalogError::MissingApiKey` - If no API key is configured
    /// - `CatalogError::ClientSetup` - If the HTTP client cannot be built
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(CatalogError::MissingApiKey)?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| CatalogError::ClientSetup {
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
            images: ImageUrls::new(&config.image_base_url),
            sort_search_by_year: config.sort_search_by_year,
            min_vote_count: config.min_vote_count,
        })
    }

    /// Performs a GET with the API key attached and decodes the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%path, ?params, "Catalog request");

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| CatalogError::NetworkError {
                path: path.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(CatalogError::Unauthorized);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound {
                path: path.to_string(),
            });
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(CatalogError::RateLimited);
        }
        if !status.is_success() {
            return Err(CatalogError::UnexpectedStatus {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::ParseError {
                path: path.to_string(),
                reason: e.to_string(),
            })
    }

    async fn list(
        &self,
        path: &str,
        mut params: Vec<(&str, String)>,
        page: u32,
        hint: Option<MediaType>,
    ) -> Result<Vec<MediaSummary>, CatalogError> {
        params.push(("page", page.to_string()));
        let body: TmdbPage<TmdbListItem> = self.get_json(path, &params).await?;
        Ok(body
            .results
            .into_iter()
            .map(|item| item.into_summary(&self.images, hint))
            .collect())
    }

    fn language(&self) -> (&'static str, String) {
        ("language", self.language.clone())
    }
}

#[async_trait]
impl MediaGateway for TmdbGateway {
    async fn fetch_trending(&self, page: u32) -> Result<Vec<MediaSummary>, CatalogError> {
        self.list("/trending/all/week", vec![], page, None).await
    }

    async fn fetch_now_playing(&self, page: u32) -> Result<Vec<MediaSummary>, CatalogError> {
        self.list(
            "/movie/now_playing",
            vec![self.language()],
            page,
            Some(MediaType::Movie),
        )
        .await
    }

    async fn fetch_latest_tv(&self, page: u32) -> Result<Vec<MediaSummary>, CatalogError> {
        self.list(
            "/tv/on_the_air",
            vec![self.language()],
            page,
            Some(MediaType::Tv),
        )
        .await
    }

    async fn fetch_top_rated(&self, page: u32) -> Result<Vec<MediaSummary>, CatalogError> {
        self.list(
            "/movie/top_rated",
            vec![self.language()],
            page,
            Some(MediaType::Movie),
        )
        .await
    }

    async fn fetch_media_by_genre(
        &self,
        genre_id: u32,
        media_type: MediaType,
        page: u32,
    ) -> Result<Vec<MediaSummary>, CatalogError> {
        let path = format!("/discover/{media_type}");
        let params = vec![
            ("with_genres", genre_id.to_string()),
            ("sort_by", "popularity.desc".to_string()),
            ("vote_count.gte", self.min_vote_count.to_string()),
            self.language(),
        ];
        self.list(&path, params, page, Some(media_type)).await
    }

    async fn search_media(
        &self,
        query: &str,
        page: u32,
    ) -> Result<Vec<MediaSummary>, CatalogError> {
        let params = vec![
            self.language(),
            ("query", query.to_string()),
            ("page", page.to_string()),
            ("include_adult", "false".to_string()),
        ];
        let body: TmdbPage<TmdbListItem> = self.get_json("/search/multi", &params).await?;

        let mut items: Vec<MediaSummary> = body
            .results
            .into_iter()
            .filter(|item| !item.is_person() && item.has_image())
            .map(|item| item.into_summary(&self.images, None))
            .collect();

        if self.sort_search_by_year {
            items.sort_by(|a, b| b.year.cmp(&a.year));
        }

        tracing::debug!(%query, page, results = items.len(), "Search page");
        Ok(items)
    }

    async fn fetch_media_details(
        &self,
        id: &str,
        media_type: MediaType,
    ) -> Result<Option<MediaDetail>, CatalogError> {
        let path = format!("/{media_type}/{}", urlencoding::encode(id));
        let params = vec![("append_to_response", "credits,videos,images".to_string())];

        match self.get_json::<TmdbDetails>(&path, &params).await {
            Ok(details) => Ok(Some(details.into_detail(&self.images, media_type))),
            Err(CatalogError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use movos_core::TrailerResolution;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn gateway_for(server: &MockServer) -> TmdbGateway {
        let config = CatalogConfig {
            api_key: Some("test-key".to_string()),
            base_url: server.uri(),
            image_base_url: "https://img.test/t/p".to_string(),
            ..CatalogConfig::default()
        };
        TmdbGateway::new(&config).unwrap()
    }

    #[test]
    fn test_missing_api_key_rejected() {
        let result = TmdbGateway::new(&CatalogConfig::default());
        assert!(matches!(result, Err(CatalogError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_search_filters_people_and_imageless_then_sorts_by_year() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/multi"))
            .and(query_param("api_key", "test-key"))
            .and(query_param("query", "dune"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "page": 2,
                "total_pages": 3,
                "results": [
                    { "id": 1, "title": "Dune", "release_date": "1984-12-14", "poster_path": "/a.jpg", "media_type": "movie" },
                    { "id": 2, "name": "Someone", "media_type": "person", "profile_path": "/p.jpg" },
                    { "id": 3, "title": "No Art", "release_date": "2000-01-01", "media_type": "movie" },
                    { "id": 4, "name": "Dune: Prophecy", "first_air_date": "2024-11-17", "backdrop_path": "/b.jpg", "media_type": "tv" }
                ]
            })))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server).await;
        let results = gateway.search_media("dune", 2).await.unwrap();

        let ids: Vec<_> = results.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, ["4", "1"]);
        assert_eq!(results[0].media_type, MediaType::Tv);
    }

    #[tokio::test]
    async fn test_genre_discovery_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/discover/movie"))
            .and(query_param("with_genres", "27"))
            .and(query_param("sort_by", "popularity.desc"))
            .and(query_param("vote_count.gte", "10"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "page": 1,
                "results": [{ "id": 10, "title": "Scream", "release_date": "1996-12-20" }]
            })))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server).await;
        let results = gateway
            .fetch_media_by_genre(27, MediaType::Movie, 1)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Scream");
    }

    #[tokio::test]
    async fn test_details_with_teaser_only() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tv/1399"))
            .and(query_param("append_to_response", "credits,videos,images"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 1399,
                "name": "Game of Thrones",
                "first_air_date": "2011-04-17",
                "number_of_seasons": 8,
                "episode_run_time": [],
                "videos": { "results": [
                    { "key": "clip", "site": "YouTube", "type": "Clip" },
                    { "key": "teaser", "site": "YouTube", "type": "Teaser" }
                ]}
            })))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server).await;
        let detail = gateway
            .fetch_media_details("1399", MediaType::Tv)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(detail.duration, "8 Seasons");
        assert_eq!(
            detail.trailer,
            TrailerResolution::Video {
                key: "teaser".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/404"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/trending/all/week"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/movie/top_rated"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server).await;
        assert!(
            gateway
                .fetch_media_details("404", MediaType::Movie)
                .await
                .unwrap()
                .is_none()
        );
        assert!(matches!(
            gateway.fetch_trending(1).await,
            Err(CatalogError::Unauthorized)
        ));
        assert!(matches!(
            gateway.fetch_top_rated(1).await,
            Err(CatalogError::ParseError { .. })
        ));
    }
}
