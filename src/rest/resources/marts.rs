//! Partner marts.

use serde::{Deserialize, Serialize};

use crate::clients::{ApiClient, HttpMethod, HttpRequest};
use crate::rest::{ApiResult, ErrorMessages, Message};

const LIST: ErrorMessages = ErrorMessages::new(Message::Fixed("Server communication error."))
    .rejected(Message::ServerOr("Could not load marts."));

/// Warehouse chain a mart belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MartBrand {
    /// Costco.
    Costco,
    /// E-Mart Traders.
    Traders,
    /// Lotte Mart.
    LotteMart,
}

/// A mart meetings can take place at.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mart {
    /// Mart ID.
    pub mart_id: i64,
    /// Display name.
    pub mart_name: String,
    /// Chain.
    pub mart_brand: MartBrand,
    /// Street address.
    #[serde(default)]
    pub address: Option<String>,
    /// Latitude.
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude.
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// Mart endpoints.
#[derive(Clone, Copy, Debug)]
pub struct MartsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> MartsApi<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `GET /marts`
    pub async fn list(&self) -> ApiResult<Vec<Mart>> {
        let outcome = self
            .client
            .fetch_envelope(HttpRequest::builder(HttpMethod::Get, "/marts"))
            .await
            .map(|envelope| LIST.accept(envelope));
        LIST.settle("marts.list", outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mart_deserializes() {
        let mart: Mart = serde_json::from_value(json!({
            "martId": 1,
            "martName": "Lotte Mart Jamsil",
            "martBrand": "LOTTE_MART",
            "address": "Seoul Songpa-gu",
            "latitude": 37.51,
            "longitude": 127.1
        }))
        .unwrap();

        assert_eq!(mart.mart_brand, MartBrand::LotteMart);
        assert_eq!(mart.latitude, Some(37.51));
    }
}
