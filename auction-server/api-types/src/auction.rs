use {
    crate::bid::Bid,
    serde::{
        Deserialize,
        Serialize,
    },
    strum::{
        Display,
        EnumString,
    },
    time::OffsetDateTime,
    utoipa::{
        IntoParams,
        ToResponse,
        ToSchema,
    },
    uuid::Uuid,
};

pub type AuctionId = Uuid;

#[derive(
    Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq, Debug, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProductCondition {
    New,
    Used,
    Refurbished,
}

#[derive(
    Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq, Debug, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AuctionStatus {
    /// The auction accepts bids until its deadline.
    Active,
    /// The auction is closed. This state is final.
    Completed,
}

/// Descriptive fields of a new auction.
///
/// The closing interval is not part of the request. Every auction closes after the interval
/// configured for the server.
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
pub struct AuctionCreate {
    #[schema(example = "Vintage camera")]
    pub product_name: String,
    #[schema(example = "Photography")]
    pub category:     String,
    #[schema(example = "A fully working 1970s rangefinder camera")]
    pub description:  String,
    pub condition:    ProductCondition,
}

#[derive(Serialize, Deserialize, ToSchema, ToResponse, Clone, Debug, PartialEq)]
pub struct Auction {
    /// The unique id of the auction.
    #[schema(example = "beedbeed-58cc-4372-a567-0e02b2c3d479", value_type = String)]
    pub id:              AuctionId,
    pub product_name:    String,
    pub category:        String,
    pub description:     String,
    pub condition:       ProductCondition,
    pub status:          AuctionStatus,
    /// The time the auction was created formatted in rfc3339.
    #[schema(example = "2024-05-23T21:26:57.329954Z", value_type = String)]
    #[serde(with = "time::serde::rfc3339")]
    pub creation_time:   OffsetDateTime,
    /// The time after which no bid is accepted formatted in rfc3339.
    #[schema(example = "2024-05-23T21:31:57.329954Z", value_type = String)]
    #[serde(with = "time::serde::rfc3339")]
    pub deadline:        OffsetDateTime,
    /// The time the auction was closed in the store, if it already happened.
    #[schema(example = "2024-05-23T21:31:57.412000Z", value_type = Option<String>)]
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub conclusion_time: Option<OffsetDateTime>,
}

#[derive(Serialize, Deserialize, ToSchema, ToResponse, Clone, Debug)]
pub struct Auctions {
    pub items: Vec<Auction>,
}

#[derive(Serialize, Deserialize, ToSchema, ToResponse, Clone, Debug)]
pub struct WinningBid {
    pub auction: Auction,
    /// The highest bid of the auction. Null if the auction has no bids.
    pub bid:     Option<Bid>,
}

#[derive(Serialize, Deserialize, IntoParams, Clone, Debug)]
#[into_params(parameter_in = Path)]
pub struct AuctionParams {
    #[param(example = "beedbeed-58cc-4372-a567-0e02b2c3d479", value_type = String)]
    pub auction_id: AuctionId,
}

#[derive(Serialize, Deserialize, IntoParams, Clone, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct GetAuctionsQueryParams {
    #[param(example = "active", value_type = Option<String>)]
    pub status:       Option<AuctionStatus>,
    #[param(example = "Photography")]
    pub category:     Option<String>,
    /// Case insensitive substring of the product name.
    #[param(example = "camera")]
    pub product_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        std::str::FromStr,
    };

    #[test]
    fn test_status_names() {
        assert_eq!(AuctionStatus::Completed.to_string(), "completed");
        assert_eq!(
            AuctionStatus::from_str("active").unwrap(),
            AuctionStatus::Active
        );
        assert_eq!(
            serde_json::to_string(&ProductCondition::Refurbished).unwrap(),
            "\"refurbished\""
        );
    }

    #[test]
    fn test_auction_create_rejects_unknown_condition() {
        let result = serde_json::from_str::<AuctionCreate>(
            r#"{"product_name":"Lamp","category":"Home","description":"A very bright lamp","condition":"broken"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_auction_without_conclusion_time() {
        let auction = Auction {
            id:              AuctionId::nil(),
            product_name:    "Lamp".to_string(),
            category:        "Home".to_string(),
            description:     "A very bright lamp".to_string(),
            condition:       ProductCondition::New,
            status:          AuctionStatus::Active,
            creation_time:   OffsetDateTime::UNIX_EPOCH,
            deadline:        OffsetDateTime::UNIX_EPOCH + time::Duration::minutes(5),
            conclusion_time: None,
        };
        let value = serde_json::to_value(&auction).unwrap();
        assert_eq!(value["conclusion_time"], serde_json::Value::Null);
        assert_eq!(value["deadline"], "1970-01-01T00:05:00Z");

        let mut object = value.as_object().unwrap().clone();
        object.remove("conclusion_time");
        let parsed: Auction = serde_json::from_value(serde_json::Value::Object(object)).unwrap();
        assert_eq!(parsed, auction);
    }
}
