use {
    super::Service,
    crate::{
        api::RestError,
        auction::entities,
    },
};

const PRODUCT_NAME_MIN_LENGTH: usize = 2;
const CATEGORY_MIN_LENGTH: usize = 3;
const DESCRIPTION_MIN_LENGTH: usize = 10;

pub struct VerifyAuctionInput {
    pub auction_create: entities::AuctionCreate,
}

fn verify_text(field: &str, value: &str, min_length: usize) -> Result<String, RestError> {
    let value = value.trim();
    if value.chars().count() < min_length {
        return Err(RestError::BadParameters(format!(
            "{} must be at least {} characters long",
            field, min_length
        )));
    }
    Ok(value.to_string())
}

impl Service {
    /// Checks the descriptive fields of a new auction and returns them trimmed.
    pub fn verify_auction(
        &self,
        input: VerifyAuctionInput,
    ) -> Result<entities::AuctionCreate, RestError> {
        let auction_create = input.auction_create;
        Ok(entities::AuctionCreate {
            product_name: verify_text(
                "product_name",
                &auction_create.product_name,
                PRODUCT_NAME_MIN_LENGTH,
            )?,
            category:     verify_text("category", &auction_create.category, CATEGORY_MIN_LENGTH)?,
            description:  verify_text(
                "description",
                &auction_create.description,
                DESCRIPTION_MIN_LENGTH,
            )?,
            condition:    auction_create.condition,
        })
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::auction::{
            repository::MockDatabase,
            service::tests::get_config,
        },
        std::time::Duration,
    };

    fn get_auction_create(
        product_name: &str,
        category: &str,
        description: &str,
    ) -> entities::AuctionCreate {
        entities::AuctionCreate {
            product_name: product_name.to_string(),
            category:     category.to_string(),
            description:  description.to_string(),
            condition:    entities::ProductCondition::New,
        }
    }

    #[test]
    fn test_verify_auction_trims_fields() {
        let (service, _) =
            Service::new_with_mocks(MockDatabase::default(), get_config(Duration::from_secs(60)));
        let auction_create = service
            .verify_auction(VerifyAuctionInput {
                auction_create: get_auction_create(
                    "  Camera ",
                    "Photography\n",
                    " Mirrorless body with two lenses ",
                ),
            })
            .unwrap();
        assert_eq!(auction_create.product_name, "Camera");
        assert_eq!(auction_create.category, "Photography");
        assert_eq!(auction_create.description, "Mirrorless body with two lenses");
    }

    #[test]
    fn test_verify_auction_rejects_short_fields() {
        let (service, _) =
            Service::new_with_mocks(MockDatabase::default(), get_config(Duration::from_secs(60)));
        let cases = [
            ("C", "Photography", "Mirrorless body with two lenses", "product_name"),
            ("Camera", "  Ph  ", "Mirrorless body with two lenses", "category"),
            ("Camera", "Photography", "Too short", "description"),
        ];
        for (product_name, category, description, field) in cases {
            let result = service.verify_auction(VerifyAuctionInput {
                auction_create: get_auction_create(product_name, category, description),
            });
            match result {
                Err(RestError::BadParameters(message)) => assert!(message.starts_with(field)),
                other => panic!("Expected bad parameters for {}, got {:?}", field, other),
            }
        }
    }
}
