//! HTTP client for the Finboard API.
//!
//! Provides both async and blocking client variants behind feature flags.
//! Routes are owned by the backend and kept here as constants.

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Transaction collection endpoint.
const TRANSACTIONS_PATH: &str = "/api/Transaction";

/// Server-side summary endpoint.
const SUMMARY_PATH: &str = "/api/Transaction/summary";

/// CSV upload endpoint.
const UPLOAD_PATH: &str = "/api/Transaction/upload";

/// Category collection endpoint.
const CATEGORIES_PATH: &str = "/api/Category";

/// Rule-based categorization endpoint.
const CATEGORIZE_PATH: &str = "/api/Category/categorize";

/// Pattern categorization endpoint.
const CATEGORIZE_PATTERN_PATH: &str = "/api/Category/categorize-with-pattern";

/// Media type of JSON bodies.
const JSON_MEDIA_TYPE: &str = "application/json";

/// Media type sent with uploaded statements.
const CSV_MEDIA_TYPE: &str = "text/csv";

/// Normalizes and validates a configured base URL.
///
/// Trailing slashes are stripped so paths can be appended verbatim.
fn normalize_base_url(raw: &str) -> crate::error::Result<String> {
    let parsed = url::Url::parse(raw.trim())?;
    Ok(parsed.as_str().trim_end_matches('/').to_owned())
}

/// Rejects files the backend's CSV importer cannot handle.
fn check_csv_file_name(file_name: &str) -> crate::error::Result<()> {
    let is_csv = std::path::Path::new(file_name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        Ok(())
    } else {
        Err(crate::error::FinboardError::InvalidUpload(format!(
            "{file_name} is not a CSV file"
        )))
    }
}

/// Generates a Finboard client (async or blocking) with builder, methods, and tests.
macro_rules! define_client {
    (
        client_name: $client:ident,
        builder_name: $builder:ident,
        http_type: $http_type:ty,
        request_type: $req_type:ty,
        response_type: $resp_type:ty,
        form_type: $form_type:ty,
        part_type: $part_type:ty,
        client_doc: $client_doc:expr,
        builder_doc: $builder_doc:expr,
        $(async_kw: $async_kw:tt,)?
        $(await_kw: $await_ext:tt,)?
    ) => {
        #[doc = $builder_doc]
        #[derive(Debug)]
        pub struct $builder {
            /// Optional bearer token.
            token: Option<SecretString>,
            /// Base URL override.
            base_url: Option<String>,
            /// Per-request timeout.
            timeout: Option<Duration>,
        }

        impl $builder {
            /// Sets the bearer token sent with every request.
            #[inline]
            #[must_use]
            pub fn token<T: Into<String>>(mut self, token: T) -> Self {
                self.token = Some(SecretString::from(token.into()));
                self
            }

            /// Overrides the base URL (useful for testing with a mock server).
            #[inline]
            #[must_use]
            pub fn base_url<T: Into<String>>(mut self, url: T) -> Self {
                self.base_url = Some(url.into());
                self
            }

            /// Sets a timeout applied to each request.
            #[inline]
            #[must_use]
            pub const fn timeout(mut self, timeout: Duration) -> Self {
                self.timeout = Some(timeout);
                self
            }

            /// Builds the client.
            ///
            /// # Errors
            ///
            /// Returns [`FinboardError::InvalidBaseUrl`] if the base URL does
            /// not parse.
            /// Returns [`FinboardError::Http`] if the HTTP client fails to build.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub fn build(self) -> Result<$client> {
                let base_url = normalize_base_url(
                    self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL),
                )?;
                tracing::debug!(base_url = %base_url, authenticated = self.token.is_some(), "building client");
                let mut http_builder = <$http_type>::builder();
                if let Some(timeout) = self.timeout {
                    http_builder = http_builder.timeout(timeout);
                }
                let http = http_builder.build()?;

                Ok($client {
                    http,
                    token: self.token,
                    base_url,
                })
            }
        }

        #[doc = $client_doc]
        #[derive(Debug)]
        pub struct $client {
            /// Underlying HTTP client.
            http: $http_type,
            /// Optional bearer token.
            token: Option<SecretString>,
            /// API base URL without a trailing slash.
            base_url: String,
        }

        impl $client {
            /// Creates a new builder for configuring the client.
            #[inline]
            #[must_use]
            pub const fn builder() -> $builder {
                $builder {
                    token: None,
                    base_url: None,
                    timeout: None,
                }
            }

            /// Returns the normalized base URL.
            #[inline]
            #[must_use]
            pub fn base_url(&self) -> &str {
                &self.base_url
            }

            /// Fetches one page of transactions.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip(self, query))]
            pub $($async_kw)? fn list_transactions(
                &self,
                page: u32,
                page_size: u32,
                query: &TransactionQuery,
            ) -> Result<Page<Transaction>> {
                let mut params = vec![
                    ("page", page.to_string()),
                    ("pageSize", page_size.to_string()),
                ];
                params.extend(query.to_params());
                let url = self.endpoint(TRANSACTIONS_PATH, &params)?;
                let page_result: Option<Page<Transaction>> =
                    self.execute(self.http.get(url)) $( .$await_ext )? ?;
                Ok(page_result.unwrap_or_default())
            }

            /// Fetches a single transaction.
            ///
            /// Returns `Ok(None)` if the server answered with an empty body.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip(self))]
            pub $($async_kw)? fn transaction(&self, id: TransactionId) -> Result<Option<Transaction>> {
                let url = self.endpoint(&format!("{TRANSACTIONS_PATH}/{id}"), &[])?;
                self.execute(self.http.get(url)) $( .$await_ext )?
            }

            /// Fetches the server-computed ledger summary.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip(self))]
            pub $($async_kw)? fn summary(
                &self,
                exclude_internal_transfers: bool,
            ) -> Result<TransactionSummary> {
                let params: Vec<(&str, String)> = if exclude_internal_transfers {
                    vec![("excludeInternalTransfers", "true".to_owned())]
                } else {
                    Vec::new()
                };
                let url = self.endpoint(SUMMARY_PATH, &params)?;
                let summary: Option<TransactionSummary> =
                    self.execute(self.http.get(url)) $( .$await_ext )? ?;
                Ok(summary.unwrap_or_default())
            }

            /// Lists all categories.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn categories(&self) -> Result<Vec<Category>> {
                let url = self.endpoint(CATEGORIES_PATH, &[])?;
                let categories: Option<Vec<Category>> =
                    self.execute(self.http.get(url)) $( .$await_ext )? ?;
                Ok(categories.unwrap_or_default())
            }

            /// Creates a category.
            ///
            /// Returns `Ok(None)` if the server answered with an empty body.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(name = %category.name))]
            pub $($async_kw)? fn create_category(
                &self,
                category: &NewCategory,
            ) -> Result<Option<Category>> {
                let url = self.endpoint(CATEGORIES_PATH, &[])?;
                self.execute(self.http.post(url).json(category)) $( .$await_ext )?
            }

            /// Applies a category to every transaction matching a rule.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(category_id = %request.category_id))]
            pub $($async_kw)? fn categorize(
                &self,
                request: &CategorizeRequest,
            ) -> Result<CategorizeResponse> {
                let url = self.endpoint(CATEGORIZE_PATH, &[])?;
                let response: Option<CategorizeResponse> =
                    self.execute(self.http.post(url).json(request)) $( .$await_ext )? ?;
                Ok(response.unwrap_or_default())
            }

            /// Categorizes a transaction and every transaction whose
            /// description matches the pattern the backend derives from it.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(transaction_id = %request.transaction_id))]
            pub $($async_kw)? fn categorize_with_pattern(
                &self,
                request: &PatternCategorizeRequest,
            ) -> Result<CategorizeResponse> {
                let url = self.endpoint(CATEGORIZE_PATTERN_PATH, &[])?;
                let response: Option<CategorizeResponse> =
                    self.execute(self.http.post(url).json(request)) $( .$await_ext )? ?;
                Ok(response.unwrap_or_default())
            }

            /// Assigns a category to a single transaction.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip(self))]
            pub $($async_kw)? fn update_transaction_category(
                &self,
                transaction_id: TransactionId,
                category_id: CategoryId,
            ) -> Result<CategorizeResponse> {
                let url = self.endpoint(
                    &format!("{TRANSACTIONS_PATH}/{transaction_id}/category"),
                    &[],
                )?;
                let body = CategoryAssignment { category_id };
                let response: Option<CategorizeResponse> =
                    self.execute(self.http.put(url).json(&body)) $( .$await_ext )? ?;
                Ok(response.unwrap_or_default())
            }

            /// Uploads a bank statement for server-side CSV import.
            ///
            /// # Errors
            ///
            /// Returns [`FinboardError::InvalidUpload`] if `file_name` does not
            /// end in `.csv`, otherwise an error if the HTTP request fails or
            /// the server rejects the file.
            #[inline]
            #[tracing::instrument(skip(self, contents), fields(bytes = contents.len()))]
            pub $($async_kw)? fn upload_csv(
                &self,
                file_name: &str,
                contents: Vec<u8>,
            ) -> Result<UploadResponse> {
                check_csv_file_name(file_name)?;
                let part = <$part_type>::bytes(contents)
                    .file_name(file_name.to_owned())
                    .mime_str(CSV_MEDIA_TYPE)?;
                let form = <$form_type>::new().part("file", part);
                let url = self.endpoint(UPLOAD_PATH, &[])?;
                let response: Option<UploadResponse> =
                    self.execute(self.http.post(url).multipart(form)) $( .$await_ext )? ?;
                Ok(response.unwrap_or_default())
            }

            /// Resolves a path and query parameters against the base URL.
            fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Result<url::Url> {
                let mut url = url::Url::parse(&format!("{}{path}", self.base_url))?;
                if !params.is_empty() {
                    let mut pairs = url.query_pairs_mut();
                    for pair in params {
                        _ = pairs.append_pair(pair.0, &pair.1);
                    }
                }
                Ok(url)
            }

            /// Adds the accept header and, when configured, the bearer token.
            fn authorize(&self, request: $req_type) -> $req_type {
                let with_accept = request.header(ACCEPT, JSON_MEDIA_TYPE);
                match self.token.as_ref() {
                    Some(token) => with_accept.bearer_auth(token.expose_secret()),
                    None => with_accept,
                }
            }

            /// Sends a request and decodes a JSON body.
            ///
            /// A success response without a JSON content type or with a blank
            /// body decodes to `None`.
            $($async_kw)? fn execute<Resp: serde::de::DeserializeOwned>(
                &self,
                request: $req_type,
            ) -> Result<Option<Resp>> {
                let response: $resp_type = self
                    .authorize(request)
                    .send()
                    $( .$await_ext )?
                    ?;

                let status = response.status();
                tracing::debug!(status = %status, url = %response.url(), "received response");
                if !status.is_success() {
                    let message = response
                        .text()
                        $( .$await_ext )?
                        .unwrap_or_else(|_| "unknown error".to_owned());
                    tracing::debug!(status = status.as_u16(), message = %message, "API error");
                    return Err(FinboardError::Api {
                        status: status.as_u16(),
                        message,
                    });
                }

                let is_json = response
                    .headers()
                    .get(CONTENT_TYPE)
                    .and_then(|value| value.to_str().ok())
                    .is_some_and(|value| value.contains(JSON_MEDIA_TYPE));
                let body = response.text() $( .$await_ext )? ?;
                tracing::trace!(body_len = body.len(), is_json, "parsing response body");
                if !is_json || body.trim().is_empty() {
                    return Ok(None);
                }
                serde_json::from_str(&body)
                    .map(Some)
                    .map_err(FinboardError::from)
            }
        }

        #[cfg(test)]
        mod tests {
            use super::*;

            #[test]
            fn builder_defaults_to_local_backend() {
                let client = $client::builder().build().unwrap();
                assert_eq!(client.base_url, DEFAULT_BASE_URL);
                assert!(client.token.is_none());
            }

            #[test]
            fn builder_with_token_succeeds() {
                let client = $client::builder()
                    .token("test-token")
                    .build()
                    .unwrap();
                assert!(client.token.is_some());
            }

            #[test]
            fn builder_custom_base_url_strips_trailing_slash() {
                let client = $client::builder()
                    .base_url("http://localhost:8080/")
                    .build()
                    .unwrap();
                assert_eq!(client.base_url(), "http://localhost:8080");
            }

            #[test]
            fn builder_rejects_invalid_base_url() {
                let result = $client::builder().base_url("localhost without scheme").build();
                assert!(matches!(result, Err(FinboardError::InvalidBaseUrl(_))));
            }

            #[test]
            fn endpoint_encodes_query_parameters() {
                let client = $client::builder()
                    .base_url("http://localhost:8080")
                    .build()
                    .unwrap();
                let url = client
                    .endpoint(
                        TRANSACTIONS_PATH,
                        &[("page", "2".to_owned()), ("search", "fish & chips".to_owned())],
                    )
                    .unwrap();
                assert_eq!(url.path(), "/api/Transaction");
                assert_eq!(url.query(), Some("page=2&search=fish+%26+chips"));
            }

            #[test]
            fn endpoint_without_params_has_no_query() {
                let client = $client::builder().build().unwrap();
                let url = client.endpoint(CATEGORIES_PATH, &[]).unwrap();
                assert!(url.query().is_none());
            }
        }
    };
}

#[cfg(feature = "async")]
mod async_client {
    //! Async HTTP client for the Finboard API.

    use core::time::Duration;

    use reqwest::header::{ACCEPT, CONTENT_TYPE};
    use secrecy::{ExposeSecret as _, SecretString};

    use super::{
        CATEGORIES_PATH, CATEGORIZE_PATH, CATEGORIZE_PATTERN_PATH, CSV_MEDIA_TYPE,
        DEFAULT_BASE_URL, JSON_MEDIA_TYPE, SUMMARY_PATH, TRANSACTIONS_PATH, UPLOAD_PATH,
        check_csv_file_name, normalize_base_url,
    };
    use crate::error::{FinboardError, Result};
    use crate::models::{
        CategorizeRequest, CategorizeResponse, Category, CategoryAssignment, CategoryId,
        NewCategory, Page, PatternCategorizeRequest, Transaction, TransactionId,
        TransactionQuery, TransactionSummary, UploadResponse,
    };

    define_client! {
        client_name: FinboardClient,
        builder_name: FinboardClientBuilder,
        http_type: reqwest::Client,
        request_type: reqwest::RequestBuilder,
        response_type: reqwest::Response,
        form_type: reqwest::multipart::Form,
        part_type: reqwest::multipart::Part,
        client_doc: "Async client for the Finboard API.\n\nUse [`FinboardClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`FinboardClient`].",
        async_kw: async,
        await_kw: await,
    }
}

#[cfg(feature = "blocking")]
mod blocking_client {
    //! Blocking (synchronous) HTTP client for the Finboard API.

    use core::time::Duration;

    use reqwest::header::{ACCEPT, CONTENT_TYPE};
    use secrecy::{ExposeSecret as _, SecretString};

    use super::{
        CATEGORIES_PATH, CATEGORIZE_PATH, CATEGORIZE_PATTERN_PATH, CSV_MEDIA_TYPE,
        DEFAULT_BASE_URL, JSON_MEDIA_TYPE, SUMMARY_PATH, TRANSACTIONS_PATH, UPLOAD_PATH,
        check_csv_file_name, normalize_base_url,
    };
    use crate::error::{FinboardError, Result};
    use crate::models::{
        CategorizeRequest, CategorizeResponse, Category, CategoryAssignment, CategoryId,
        NewCategory, Page, PatternCategorizeRequest, Transaction, TransactionId,
        TransactionQuery, TransactionSummary, UploadResponse,
    };

    define_client! {
        client_name: FinboardBlockingClient,
        builder_name: FinboardBlockingClientBuilder,
        http_type: reqwest::blocking::Client,
        request_type: reqwest::blocking::RequestBuilder,
        response_type: reqwest::blocking::Response,
        form_type: reqwest::blocking::multipart::Form,
        part_type: reqwest::blocking::multipart::Part,
        client_doc: "Blocking (synchronous) client for the Finboard API.\n\nUse [`FinboardBlockingClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`FinboardBlockingClient`].",
    }
}

#[cfg(feature = "async")]
pub use async_client::{FinboardClient, FinboardClientBuilder};
#[cfg(feature = "blocking")]
pub use blocking_client::{FinboardBlockingClient, FinboardBlockingClientBuilder};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_base_url_keeps_path_prefix() {
        assert_eq!(
            normalize_base_url("https://example.com/finboard/").unwrap(),
            "https://example.com/finboard"
        );
    }

    #[test]
    fn normalize_base_url_rejects_relative() {
        assert!(normalize_base_url("/api").is_err());
    }

    #[test]
    fn csv_file_names_are_checked_case_insensitively() {
        assert!(check_csv_file_name("statement.csv").is_ok());
        assert!(check_csv_file_name("EXPORT.CSV").is_ok());
        assert!(check_csv_file_name("statement.pdf").is_err());
        assert!(check_csv_file_name("csv").is_err());
    }
}
